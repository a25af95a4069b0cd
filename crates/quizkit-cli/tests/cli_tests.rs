//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizkit() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizkit").unwrap();
    cmd.env_remove("QUIZKIT_CORPUS_DIR");
    cmd
}

#[test]
fn validate_directory() {
    quizkit()
        .arg("validate")
        .arg("--corpus")
        .arg("../../quizzes")
        .assert()
        .success()
        .stdout(predicate::str::contains("World Geography (5 questions)"))
        .stdout(predicate::str::contains("Rust Basics"))
        .stdout(predicate::str::contains("Web Fundamentals"))
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn validate_single_toml_file() {
    quizkit()
        .arg("validate")
        .arg("--corpus")
        .arg("../../quizzes/programming/web.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 questions"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("broken.json"),
        r#"{"id": "broken", "name": "Broken", "questions": [
            {"id": "1", "prompt": "Pick", "kind": "single-choice",
             "answers": [{"id": "a", "text": "A"}], "correct_answer_index": 3}
        ]}"#,
    )
    .unwrap();

    quizkit()
        .arg("validate")
        .arg("--corpus")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[broken/1] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    quizkit()
        .arg("validate")
        .arg("--corpus")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_shows_table() {
    quizkit()
        .arg("list")
        .arg("--corpus")
        .arg("../../quizzes")
        .assert()
        .success()
        .stdout(predicate::str::contains("geography"))
        .stdout(predicate::str::contains("programming/rust"))
        .stdout(predicate::str::contains("3 quiz(zes)"));
}

#[test]
fn list_filters_by_group() {
    quizkit()
        .arg("list")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--group")
        .arg("programming")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-basics"))
        .stdout(predicate::str::contains("World Geography").not())
        .stdout(predicate::str::contains("2 quiz(zes)"));
}

#[test]
fn list_group_filter_does_not_match_sibling_prefixes() {
    let dir = TempDir::new().unwrap();
    for (id, group) in [("current", "programming"), ("legacy", "programming-legacy")] {
        std::fs::write(
            dir.path().join(format!("{id}.json")),
            format!(
                r#"{{"id": "{id}", "name": "{id}", "group": "{group}", "questions": [
                    {{"id": "1", "prompt": "Sure?", "kind": "true-false", "correct_answer": true}}
                ]}}"#
            ),
        )
        .unwrap();
    }

    quizkit()
        .arg("list")
        .arg("--corpus")
        .arg(dir.path())
        .arg("--group")
        .arg("programming")
        .assert()
        .success()
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("legacy").not())
        .stdout(predicate::str::contains("1 quiz(zes)"));
}

#[test]
fn list_tree() {
    quizkit()
        .arg("list")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("programming/ (2 quizzes)"))
        .stdout(predicate::str::contains("- Rust Basics"));
}

#[test]
fn grade_text_report() {
    quizkit()
        .arg("grade")
        .arg("--attempt")
        .arg("../../attempts/geography-ada.json")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("QUIZ RESULTS: World Geography"))
        .stdout(predicate::str::contains("Score:      80% (4/5)"))
        .stdout(predicate::str::contains("[INCORRECT] What is the capital of France?"))
        .stdout(predicate::str::contains("Expected:    Paris"));
}

#[test]
fn grade_json_report() {
    let output = quizkit()
        .arg("grade")
        .arg("--attempt")
        .arg("../../attempts/rust-basics-anon.json")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["quiz"]["id"], "rust-basics");
    assert_eq!(report["score"]["correct"], 2);
    assert_eq!(report["score"]["incorrect"], 1);
    assert_eq!(report["score"]["manual"], 1);
    assert_eq!(report["score"]["percentage"], 50);
    assert_eq!(report["outcomes"][3]["verdict"], serde_json::Value::Null);
}

#[test]
fn grade_saves_report() {
    let dir = TempDir::new().unwrap();

    quizkit()
        .arg("grade")
        .arg("--attempt")
        .arg("../../attempts/geography-ada.json")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stderr(predicate::str::contains("Report saved to"));

    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].starts_with("attempt-"));
    assert!(saved[0].ends_with(".html"));
}

#[test]
fn grade_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("quizkit.toml");
    std::fs::write(
        &config,
        "corpus_dir = \"../../quizzes\"\ndefault_format = \"markdown\"\nparticipant = \"Grace\"\n",
    )
    .unwrap();

    quizkit()
        .arg("--config")
        .arg(&config)
        .arg("grade")
        .arg("--attempt")
        .arg("../../attempts/rust-basics-anon.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Rust Basics"))
        .stdout(predicate::str::contains("**Participant:** Grace"));
}

#[test]
fn grade_unknown_quiz() {
    let dir = TempDir::new().unwrap();
    let attempt = dir.path().join("attempt.json");
    std::fs::write(&attempt, r#"{"quiz_id": "cooking", "responses": {}}"#).unwrap();

    quizkit()
        .arg("grade")
        .arg("--attempt")
        .arg(&attempt)
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--format")
        .arg("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz cooking not found"));
}

#[test]
fn grade_rejects_unknown_format() {
    quizkit()
        .arg("grade")
        .arg("--attempt")
        .arg("../../attempts/geography-ada.json")
        .arg("--corpus")
        .arg("../../quizzes")
        .arg("--format")
        .arg("sarif")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizkit.toml"))
        .stdout(predicate::str::contains("Created quizzes/example.json"));

    assert!(dir.path().join("quizkit.toml").exists());
    assert!(dir.path().join("quizzes/example.json").exists());

    quizkit()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--corpus")
        .arg("quizzes")
        .assert()
        .success()
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz grading and difficulty estimation"));
}

#[test]
fn version_output() {
    quizkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizkit"));
}

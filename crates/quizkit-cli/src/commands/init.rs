//! The `quizkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.json");
    if example_path.exists() {
        println!("quizzes/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizkit validate --corpus quizzes");
    println!("  2. Run: quizkit list");
    println!("  3. Run: quizkit grade --attempt <attempt.json>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

corpus_dir = "./quizzes"
output_dir = "./quizkit-results"
default_format = "text"
participant = "${USER}"
"#;

const EXAMPLE_QUIZ: &str = r#"{
  "id": "example",
  "name": "Example Quiz",
  "description": "A short quiz to get started",
  "order": 0,
  "group": "getting-started",
  "questions": [
    {
      "id": "1",
      "prompt": "Rust has a garbage collector.",
      "short_prompt": "Garbage collector",
      "kind": "true-false",
      "correct_answer": false
    },
    {
      "id": "2",
      "prompt": "Which keyword declares a mutable binding?",
      "kind": "single-choice",
      "answers": [
        {"id": "a", "text": "let mut"},
        {"id": "b", "text": "var"},
        {"id": "c", "text": "mut let"}
      ],
      "correct_answer_index": 0
    },
    {
      "id": "3",
      "prompt": "What is 7 * 6?",
      "kind": "numeric",
      "correct_answer": 42
    },
    {
      "id": "4",
      "prompt": "A Rust package is called a {{blank:1}}.",
      "kind": "fill-blank",
      "blanks": [{"id": "1", "correct_answers": ["crate"]}]
    }
  ]
}
"#;

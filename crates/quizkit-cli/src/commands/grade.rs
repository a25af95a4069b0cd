//! The `quizkit grade` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizkit_core::config::load_config_from;
use quizkit_core::corpus::Corpus;
use quizkit_core::report::{grade_attempt, Attempt, AttemptReport};
use quizkit_report::html::{generate_html, write_html_report};
use quizkit_report::text::render_text;

pub fn execute(
    attempt_path: PathBuf,
    corpus_path: Option<PathBuf>,
    format: Option<String>,
    output: Option<PathBuf>,
    save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let corpus_path = corpus_path.unwrap_or_else(|| config.corpus_dir.clone());
    let format = format.unwrap_or_else(|| config.default_format.clone());
    let output = match output {
        Some(dir) => Some(dir),
        None if save => Some(config.output_dir.clone()),
        None => None,
    };

    let mut attempt = Attempt::load_json(&attempt_path)?;
    if attempt.participant.is_none() {
        attempt.participant = Some(config.participant.clone());
    }

    // Difficulty is corpus-relative, so the whole corpus is loaded.
    let corpus = Corpus::load(&corpus_path)?;
    let quiz = corpus.get(&attempt.quiz_id).with_context(|| {
        format!(
            "quiz {} not found in {}",
            attempt.quiz_id,
            corpus_path.display()
        )
    })?;

    tracing::debug!(
        quiz = %quiz.id,
        responses = attempt.responses.len(),
        "grading attempt from {}",
        attempt_path.display()
    );
    let report = grade_attempt(quiz, &attempt)?;

    match format.as_str() {
        "text" => println!("{}", render_text(&report)),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "html" => println!("{}", generate_html(&report)),
        other => anyhow::bail!("unknown format: {other} (expected text, json, markdown, html)"),
    }

    if let Some(dir) = output {
        let path = save_report(&report, &format, &dir)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn save_report(report: &AttemptReport, format: &str, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let path = match format {
        "json" => {
            let path = dir.join(format!("attempt-{timestamp}.json"));
            report.save_json(&path)?;
            path
        }
        "html" => {
            let path = dir.join(format!("attempt-{timestamp}.html"));
            write_html_report(report, &path)?;
            path
        }
        "markdown" | "md" => {
            let path = dir.join(format!("attempt-{timestamp}.md"));
            std::fs::write(&path, report.to_markdown())
                .with_context(|| format!("failed to write {}", path.display()))?;
            path
        }
        _ => {
            let path = dir.join(format!("attempt-{timestamp}.txt"));
            std::fs::write(&path, render_text(report))
                .with_context(|| format!("failed to write {}", path.display()))?;
            path
        }
    };
    Ok(path)
}

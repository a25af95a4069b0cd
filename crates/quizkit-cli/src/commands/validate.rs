//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::parser::{load_corpus, validate_corpus};

pub fn execute(corpus_path: PathBuf) -> Result<()> {
    let quizzes = load_corpus(&corpus_path)?;

    for quiz in &quizzes {
        println!("Quiz: {} ({} questions)", quiz.name, quiz.questions.len());
    }

    let warnings = validate_corpus(&quizzes);
    for w in &warnings {
        let prefix = match &w.question_id {
            Some(id) => format!("  [{}/{id}]", w.quiz_id),
            None => format!("  [{}]", w.quiz_id),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All quizzes valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

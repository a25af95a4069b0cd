//! Quiz file parser.
//!
//! Loads quizzes from JSON or TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{blank_placeholders, code_line_count, Quiz, QuestionBody};

/// Supported quiz file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFormat {
    Json,
    Toml,
}

impl QuizFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(QuizFormat::Json),
            "toml" => Some(QuizFormat::Toml),
            _ => None,
        }
    }
}

/// Parse a single quiz file.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let format = QuizFormat::from_path(path)
        .with_context(|| format!("unsupported quiz file extension: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, format, path)
}

/// Parse quiz file contents (useful for testing).
pub fn parse_quiz_str(content: &str, format: QuizFormat, source_path: &Path) -> Result<Quiz> {
    let quiz: Quiz = match format {
        QuizFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
        QuizFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
    };

    anyhow::ensure!(
        !quiz.id.trim().is_empty(),
        "quiz in {} has an empty id",
        source_path.display()
    );

    Ok(quiz)
}

/// Recursively load every quiz file from a directory.
///
/// Files that fail to parse are skipped with a warning; the rest of the
/// corpus still loads.
pub fn load_corpus_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    // read_dir order is platform-dependent
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_corpus_directory(&path)?);
        } else if QuizFormat::from_path(&path).is_some() {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// Load a single quiz file or a whole directory.
pub fn load_corpus(path: &Path) -> Result<Vec<Quiz>> {
    if path.is_dir() {
        load_corpus_directory(path)
    } else {
        Ok(vec![parse_quiz(path)?])
    }
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub quiz_id: String,
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

/// Validate a quiz for common authoring mistakes.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |question_id: Option<&str>, message: String| {
        warnings.push(ValidationWarning {
            quiz_id: quiz.id.clone(),
            question_id: question_id.map(str::to_string),
            message,
        });
    };

    if quiz.questions.is_empty() {
        warn(None, "quiz has no questions".into());
    }

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.id) {
            warn(Some(&question.id), format!("duplicate question ID: {}", question.id));
        }
    }

    for question in &quiz.questions {
        let id = Some(question.id.as_str());

        if question.prompt.trim().is_empty() {
            warn(id, "prompt is empty".into());
        }

        match &question.body {
            QuestionBody::TrueFalse { .. }
            | QuestionBody::Numeric { .. }
            | QuestionBody::Text { .. } => {}
            QuestionBody::SingleChoice {
                answers,
                correct_answer_index,
            } => {
                if *correct_answer_index >= answers.len() {
                    warn(
                        id,
                        format!(
                            "correct_answer_index {correct_answer_index} is out of range for {} answers",
                            answers.len()
                        ),
                    );
                }
            }
            QuestionBody::MultipleChoice { answers } => {
                if !answers.iter().any(|a| a.is_correct) {
                    warn(id, "no answer is marked correct".into());
                }
            }
            QuestionBody::Ordering { items } => {
                let mut positions: Vec<usize> = items.iter().map(|i| i.correct_position).collect();
                positions.sort_unstable();
                if positions.iter().enumerate().any(|(i, &p)| i != p) {
                    warn(id, "correct positions are not a permutation of 0..n".into());
                }
            }
            QuestionBody::Matching { items, matches } => {
                for m in matches {
                    if !items.iter().any(|i| i.id == m.matches_to) {
                        warn(
                            id,
                            format!("match {} points to unknown item {}", m.id, m.matches_to),
                        );
                    }
                }
            }
            QuestionBody::FillBlank { blanks } => {
                let placeholders = blank_placeholders(&question.prompt);
                for placeholder in &placeholders {
                    if !blanks.iter().any(|b| b.id == *placeholder) {
                        warn(id, format!("placeholder {{{{blank:{placeholder}}}}} has no blank"));
                    }
                }
                for blank in blanks {
                    if !placeholders.contains(&blank.id.as_str()) {
                        warn(id, format!("blank {} is never referenced in the prompt", blank.id));
                    }
                    if blank.correct_answers.is_empty() {
                        warn(id, format!("blank {} has no correct answers", blank.id));
                    }
                }
            }
            QuestionBody::Categorization { categories, items } => {
                for item in items {
                    if !categories.iter().any(|c| c.id == item.correct_category) {
                        warn(
                            id,
                            format!(
                                "item {} belongs to unknown category {}",
                                item.text, item.correct_category
                            ),
                        );
                    }
                }
            }
            QuestionBody::FileUpload { upload } => {
                if upload.max_files == 0 {
                    warn(id, "max_files is 0, no file can be uploaded".into());
                }
            }
            QuestionBody::SyntaxError {
                code,
                error_tokens,
                select_count,
                ..
            } => {
                let lines = code_line_count(code);
                for token in error_tokens {
                    if token.line == 0 || token.line > lines {
                        warn(
                            id,
                            format!(
                                "error token {} is on line {}, code has {lines} lines",
                                token.token, token.line
                            ),
                        );
                    }
                }
                if let Some(count) = select_count {
                    if *count < error_tokens.len() {
                        warn(
                            id,
                            format!(
                                "select_count {count} is smaller than the {} error tokens",
                                error_tokens.len()
                            ),
                        );
                    }
                }
            }
            QuestionBody::Unknown => {
                warn(id, "unknown question kind, it will not be graded".into());
            }
        }
    }

    warnings
}

/// Validate every quiz plus corpus-wide constraints.
pub fn validate_corpus(quizzes: &[Quiz]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for quiz in quizzes {
        if !seen_ids.insert(&quiz.id) {
            warnings.push(ValidationWarning {
                quiz_id: quiz.id.clone(),
                question_id: None,
                message: format!("duplicate quiz ID: {}", quiz.id),
            });
        }
    }

    for quiz in quizzes {
        warnings.extend(validate_quiz(quiz));
    }

    warnings
}

//! Core data model types for quizkit.
//!
//! Questions carry an explicit `kind` tag; every consumer dispatches on
//! [`QuestionBody`] with an exhaustive `match`, so adding a kind forces the
//! grading and estimation code to be updated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyLabel;

/// A single question inside a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its quiz.
    pub id: String,
    /// Display text. Fill-blank prompts contain `{{blank:<id>}}` placeholders.
    pub prompt: String,
    /// Short label used in navigation and summaries.
    #[serde(default)]
    pub short_prompt: String,
    /// Kind-specific reference data.
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Kind-specific reference data of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QuestionBody {
    TrueFalse {
        correct_answer: bool,
    },
    Numeric {
        correct_answer: f64,
        #[serde(default)]
        tolerance: Option<f64>,
    },
    /// Free text. Never auto-graded.
    Text {
        #[serde(default)]
        min_length: Option<u32>,
        #[serde(default)]
        max_length: Option<u32>,
    },
    SingleChoice {
        answers: Vec<Choice>,
        correct_answer_index: usize,
    },
    MultipleChoice {
        answers: Vec<MultipleChoiceOption>,
    },
    Ordering {
        items: Vec<OrderingItem>,
    },
    Matching {
        items: Vec<Choice>,
        matches: Vec<MatchTarget>,
    },
    FillBlank {
        blanks: Vec<Blank>,
    },
    Categorization {
        categories: Vec<Category>,
        items: Vec<CategorizedItem>,
    },
    /// File submission. Never auto-graded.
    FileUpload {
        upload: UploadConstraints,
    },
    SyntaxError {
        code: String,
        language: String,
        error_tokens: Vec<ErrorToken>,
        #[serde(default)]
        select_count: Option<usize>,
    },
    /// Any kind tag this version does not know about.
    #[serde(other)]
    Unknown,
}

/// A selectable answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingItem {
    pub id: String,
    pub text: String,
    /// Zero-based position in the canonical order.
    pub correct_position: usize,
}

/// Right-hand side of a matching pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTarget {
    pub id: String,
    pub text: String,
    /// Id of the item (left-hand side) this target belongs to.
    pub matches_to: String,
}

/// A gap in a fill-blank prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blank {
    pub id: String,
    /// Every accepted spelling.
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Blank {
    /// Whether `input` is one of the accepted answers for this blank.
    pub fn accepts(&self, input: &str) -> bool {
        self.correct_answers.iter().any(|correct| {
            if self.case_sensitive {
                input == correct
            } else {
                input.to_lowercase() == correct.to_lowercase()
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedItem {
    pub text: String,
    /// Id of the category this item belongs to.
    pub correct_category: String,
}

/// Limits for a file-upload question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConstraints {
    /// Accepted types: `.ext` suffixes, `type/*` wildcards, or exact MIME types.
    #[serde(default)]
    pub accept: Vec<String>,
    pub max_size_mb: f64,
    pub max_files: u32,
    #[serde(default)]
    pub required: bool,
}

const TEXT_LIKE_TYPES: &[&str] = &[
    ".txt",
    ".md",
    ".json",
    ".csv",
    "application/json",
    "application/xml",
];

impl UploadConstraints {
    /// Whether any accepted type is a text document a reviewer has to read.
    pub fn accepts_text(&self) -> bool {
        self.accept
            .iter()
            .any(|t| t.contains("text") || TEXT_LIKE_TYPES.contains(&t.as_str()))
    }

    /// Whether a file with this name and MIME type matches an accepted type.
    pub fn accepts_file(&self, name: &str, mime_type: &str) -> bool {
        self.accept.iter().any(|accepted| {
            if accepted.starts_with('.') {
                name.to_lowercase().ends_with(&accepted.to_lowercase())
            } else if let Some(prefix) = accepted.strip_suffix("/*") {
                mime_type.starts_with(&format!("{prefix}/"))
            } else {
                mime_type == accepted
            }
        })
    }

    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0) as u64
    }
}

/// A token the participant has to find in a syntax-error question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorToken {
    /// One-based line number.
    pub line: usize,
    pub token: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Fieldless discriminant of [`QuestionBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    TrueFalse,
    Numeric,
    Text,
    SingleChoice,
    MultipleChoice,
    Ordering,
    Matching,
    FillBlank,
    Categorization,
    FileUpload,
    SyntaxError,
    Unknown,
}

impl QuestionKind {
    /// Whether answers of this kind can be graded without a human reviewer.
    pub fn is_auto_gradable(self) -> bool {
        !matches!(
            self,
            QuestionKind::Text | QuestionKind::FileUpload | QuestionKind::Unknown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "true-false",
            QuestionKind::Numeric => "numeric",
            QuestionKind::Text => "text",
            QuestionKind::SingleChoice => "single-choice",
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::Ordering => "ordering",
            QuestionKind::Matching => "matching",
            QuestionKind::FillBlank => "fill-blank",
            QuestionKind::Categorization => "categorization",
            QuestionKind::FileUpload => "file-upload",
            QuestionKind::SyntaxError => "syntax-error",
            QuestionKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "true-false" => Ok(QuestionKind::TrueFalse),
            "numeric" => Ok(QuestionKind::Numeric),
            "text" => Ok(QuestionKind::Text),
            "single-choice" => Ok(QuestionKind::SingleChoice),
            "multiple-choice" => Ok(QuestionKind::MultipleChoice),
            "ordering" => Ok(QuestionKind::Ordering),
            "matching" => Ok(QuestionKind::Matching),
            "fill-blank" => Ok(QuestionKind::FillBlank),
            "categorization" => Ok(QuestionKind::Categorization),
            "file-upload" => Ok(QuestionKind::FileUpload),
            "syntax-error" => Ok(QuestionKind::SyntaxError),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::TrueFalse { .. } => QuestionKind::TrueFalse,
            QuestionBody::Numeric { .. } => QuestionKind::Numeric,
            QuestionBody::Text { .. } => QuestionKind::Text,
            QuestionBody::SingleChoice { .. } => QuestionKind::SingleChoice,
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::Ordering { .. } => QuestionKind::Ordering,
            QuestionBody::Matching { .. } => QuestionKind::Matching,
            QuestionBody::FillBlank { .. } => QuestionKind::FillBlank,
            QuestionBody::Categorization { .. } => QuestionKind::Categorization,
            QuestionBody::FileUpload { .. } => QuestionKind::FileUpload,
            QuestionBody::SyntaxError { .. } => QuestionKind::SyntaxError,
            QuestionBody::Unknown => QuestionKind::Unknown,
        }
    }
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }

    /// The short prompt, or the full prompt when none is set.
    pub fn label(&self) -> &str {
        if self.short_prompt.trim().is_empty() {
            &self.prompt
        } else {
            &self.short_prompt
        }
    }
}

/// Number of lines in a code snippet, counting a trailing empty line.
pub fn code_line_count(code: &str) -> usize {
    code.split('\n').count()
}

const BLANK_OPEN: &str = "{{blank:";
const BLANK_CLOSE: &str = "}}";

/// Ids of every `{{blank:<id>}}` placeholder in `prompt`, in order.
pub fn blank_placeholders(prompt: &str) -> Vec<&str> {
    let mut ids = Vec::new();
    let mut rest = prompt;
    while let Some(start) = rest.find(BLANK_OPEN) {
        let after = &rest[start + BLANK_OPEN.len()..];
        match after.find(BLANK_CLOSE) {
            Some(end) => {
                ids.push(after[..end].trim());
                rest = &after[end + BLANK_CLOSE.len()..];
            }
            None => break,
        }
    }
    ids
}

/// Replace every `{{blank:<id>}}` placeholder with `render(id)`.
///
/// Text outside placeholders is copied verbatim; an unterminated
/// placeholder is left as is.
pub fn resolve_blanks<F>(prompt: &str, mut render: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(prompt.len());
    let mut rest = prompt;
    while let Some(start) = rest.find(BLANK_OPEN) {
        let after = &rest[start + BLANK_OPEN.len()..];
        let Some(end) = after.find(BLANK_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&render(after[..end].trim()));
        rest = &after[end + BLANK_CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

/// A quiz: an ordered list of questions plus corpus-derived metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Sort key for listings.
    #[serde(default)]
    pub order: i64,
    /// Slash-delimited group path, e.g. `"programming/rust"`. May be empty.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Derived at corpus load time.
    #[serde(default)]
    pub estimated_time_seconds: u32,
    /// Derived at corpus load time, relative to the loaded corpus.
    #[serde(default)]
    pub difficulty_score: u8,
    /// Derived at corpus load time, relative to the loaded corpus.
    #[serde(default)]
    pub difficulty: DifficultyLabel,
}

impl Quiz {
    /// Non-empty segments of the group path.
    pub fn group_path(&self) -> Vec<&str> {
        self.group
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

//! Submitted responses and self-contained answer snapshots.
//!
//! A [`Response`] is what a participant submits: just the chosen values.
//! [`AnswerInput::from_question`] pairs it with a copy of the question's
//! reference data, so grading never has to look the question up again.
//! All consistency checks between the two happen here; once an
//! `AnswerInput` exists, its reference data is trusted.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AnswerError;
use crate::model::{
    Blank, CategorizedItem, Category, Choice, ErrorToken, MultipleChoiceOption, Question,
    QuestionBody, QuestionKind, UploadConstraints,
};

/// A file descriptor submitted for a file-upload question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    /// MIME type reported by the client.
    #[serde(default)]
    pub mime_type: String,
    pub size_bytes: u64,
}

/// A `(line, token)` pair selected in a syntax-error question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub line: usize,
    pub token: String,
}

/// The raw values a participant submitted for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Response {
    TrueFalse {
        value: bool,
    },
    Numeric {
        value: f64,
    },
    Text {
        value: String,
    },
    SingleChoice {
        index: usize,
    },
    MultipleChoice {
        indices: Vec<usize>,
    },
    /// Item indices in the order the participant placed them.
    Ordering {
        order: Vec<usize>,
    },
    /// Item id to match id.
    Matching {
        matches: BTreeMap<String, String>,
    },
    /// Blank id to typed text.
    FillBlank {
        blanks: BTreeMap<String, String>,
    },
    /// Item text to category id.
    Categorization {
        assignments: BTreeMap<String, String>,
    },
    FileUpload {
        files: Vec<UploadedFile>,
    },
    SyntaxError {
        selected: Vec<TokenRef>,
    },
    #[serde(other)]
    Unknown,
}

impl Response {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Response::TrueFalse { .. } => QuestionKind::TrueFalse,
            Response::Numeric { .. } => QuestionKind::Numeric,
            Response::Text { .. } => QuestionKind::Text,
            Response::SingleChoice { .. } => QuestionKind::SingleChoice,
            Response::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Response::Ordering { .. } => QuestionKind::Ordering,
            Response::Matching { .. } => QuestionKind::Matching,
            Response::FillBlank { .. } => QuestionKind::FillBlank,
            Response::Categorization { .. } => QuestionKind::Categorization,
            Response::FileUpload { .. } => QuestionKind::FileUpload,
            Response::SyntaxError { .. } => QuestionKind::SyntaxError,
            Response::Unknown => QuestionKind::Unknown,
        }
    }
}

/// A submitted answer together with everything needed to grade it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnswerInput {
    TrueFalse {
        correct_answer: bool,
        input_answer: bool,
    },
    Numeric {
        correct_answer: f64,
        #[serde(default)]
        tolerance: Option<f64>,
        input_answer: f64,
    },
    Text {
        #[serde(default)]
        min_length: Option<u32>,
        #[serde(default)]
        max_length: Option<u32>,
        input_answer: String,
    },
    SingleChoice {
        answers: Vec<String>,
        correct_answer_index: usize,
        input_answer: usize,
    },
    MultipleChoice {
        answers: Vec<MultipleChoiceOption>,
        input_answer: Vec<usize>,
    },
    Ordering {
        /// Item texts in question order; `input_answer` indexes into this.
        items: Vec<String>,
        /// Item texts sorted by their correct position.
        correct_answer_order: Vec<String>,
        input_answer: Vec<usize>,
    },
    Matching {
        items: Vec<Choice>,
        targets: Vec<Choice>,
        /// Item id to match id, for every item that has a match.
        correct_matches: BTreeMap<String, String>,
        input_matches: BTreeMap<String, String>,
    },
    FillBlank {
        blanks: Vec<Blank>,
        input_answers: BTreeMap<String, String>,
    },
    Categorization {
        categories: Vec<Category>,
        items: Vec<CategorizedItem>,
        input_categories: BTreeMap<String, String>,
    },
    FileUpload {
        upload: UploadConstraints,
        files: Vec<UploadedFile>,
    },
    SyntaxError {
        error_tokens: Vec<ErrorToken>,
        selected_tokens: Vec<TokenRef>,
    },
    #[serde(other)]
    Unknown,
}

impl AnswerInput {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerInput::TrueFalse { .. } => QuestionKind::TrueFalse,
            AnswerInput::Numeric { .. } => QuestionKind::Numeric,
            AnswerInput::Text { .. } => QuestionKind::Text,
            AnswerInput::SingleChoice { .. } => QuestionKind::SingleChoice,
            AnswerInput::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            AnswerInput::Ordering { .. } => QuestionKind::Ordering,
            AnswerInput::Matching { .. } => QuestionKind::Matching,
            AnswerInput::FillBlank { .. } => QuestionKind::FillBlank,
            AnswerInput::Categorization { .. } => QuestionKind::Categorization,
            AnswerInput::FileUpload { .. } => QuestionKind::FileUpload,
            AnswerInput::SyntaxError { .. } => QuestionKind::SyntaxError,
            AnswerInput::Unknown => QuestionKind::Unknown,
        }
    }

    /// Build an answer snapshot from a question and the participant's response.
    pub fn from_question(question: &Question, response: Response) -> Result<Self, AnswerError> {
        let mismatch = |actual: QuestionKind| AnswerError::KindMismatch {
            question_id: question.id.clone(),
            expected: question.kind(),
            actual,
        };

        match (&question.body, response) {
            (QuestionBody::TrueFalse { correct_answer }, Response::TrueFalse { value }) => {
                Ok(AnswerInput::TrueFalse {
                    correct_answer: *correct_answer,
                    input_answer: value,
                })
            }
            (
                QuestionBody::Numeric {
                    correct_answer,
                    tolerance,
                },
                Response::Numeric { value },
            ) => Ok(AnswerInput::Numeric {
                correct_answer: *correct_answer,
                tolerance: *tolerance,
                input_answer: value,
            }),
            (
                QuestionBody::Text {
                    min_length,
                    max_length,
                },
                Response::Text { value },
            ) => Ok(AnswerInput::Text {
                min_length: *min_length,
                max_length: *max_length,
                input_answer: value,
            }),
            (
                QuestionBody::SingleChoice {
                    answers,
                    correct_answer_index,
                },
                Response::SingleChoice { index },
            ) => {
                if *correct_answer_index >= answers.len() {
                    return Err(AnswerError::MalformedQuestion {
                        question_id: question.id.clone(),
                        reason: format!(
                            "correct answer index {correct_answer_index} exceeds {} answers",
                            answers.len()
                        ),
                    });
                }
                check_index(index, answers.len())?;
                Ok(AnswerInput::SingleChoice {
                    answers: answers.iter().map(|a| a.text.clone()).collect(),
                    correct_answer_index: *correct_answer_index,
                    input_answer: index,
                })
            }
            (QuestionBody::MultipleChoice { answers }, Response::MultipleChoice { indices }) => {
                for &i in &indices {
                    check_index(i, answers.len())?;
                }
                Ok(AnswerInput::MultipleChoice {
                    answers: answers.clone(),
                    input_answer: indices,
                })
            }
            (QuestionBody::Ordering { items }, Response::Ordering { order }) => {
                for &i in &order {
                    check_index(i, items.len())?;
                }
                let mut canonical: Vec<_> = items.iter().collect();
                canonical.sort_by_key(|item| item.correct_position);
                Ok(AnswerInput::Ordering {
                    items: items.iter().map(|i| i.text.clone()).collect(),
                    correct_answer_order: canonical.iter().map(|i| i.text.clone()).collect(),
                    input_answer: order,
                })
            }
            (QuestionBody::Matching { items, matches }, Response::Matching { matches: input }) => {
                let item_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
                let target_ids: HashSet<&str> = matches.iter().map(|m| m.id.as_str()).collect();

                let mut correct_matches = BTreeMap::new();
                for target in matches {
                    if !item_ids.contains(target.matches_to.as_str()) {
                        return Err(AnswerError::MalformedQuestion {
                            question_id: question.id.clone(),
                            reason: format!(
                                "match {} points to unknown item {}",
                                target.id, target.matches_to
                            ),
                        });
                    }
                    correct_matches.insert(target.matches_to.clone(), target.id.clone());
                }

                for (item, target) in &input {
                    if !item_ids.contains(item.as_str()) {
                        return Err(unknown_id("item", item));
                    }
                    if !target_ids.contains(target.as_str()) {
                        return Err(unknown_id("match", target));
                    }
                }

                Ok(AnswerInput::Matching {
                    items: items.clone(),
                    targets: matches
                        .iter()
                        .map(|m| Choice {
                            id: m.id.clone(),
                            text: m.text.clone(),
                        })
                        .collect(),
                    correct_matches,
                    input_matches: input,
                })
            }
            (QuestionBody::FillBlank { blanks }, Response::FillBlank { blanks: input }) => {
                for id in input.keys() {
                    if !blanks.iter().any(|b| &b.id == id) {
                        return Err(unknown_id("blank", id));
                    }
                }
                Ok(AnswerInput::FillBlank {
                    blanks: blanks.clone(),
                    input_answers: input,
                })
            }
            (
                QuestionBody::Categorization { categories, items },
                Response::Categorization { assignments },
            ) => {
                for (item, category) in &assignments {
                    if !items.iter().any(|i| &i.text == item) {
                        return Err(unknown_id("item", item));
                    }
                    if !categories.iter().any(|c| &c.id == category) {
                        return Err(unknown_id("category", category));
                    }
                }
                Ok(AnswerInput::Categorization {
                    categories: categories.clone(),
                    items: items.clone(),
                    input_categories: assignments,
                })
            }
            (QuestionBody::FileUpload { upload }, Response::FileUpload { files }) => {
                if files.len() > upload.max_files as usize {
                    return Err(AnswerError::TooManyFiles {
                        count: files.len(),
                        max: upload.max_files,
                    });
                }
                let limit_bytes = upload.max_size_bytes();
                for file in &files {
                    if !upload.accepts_file(&file.name, &file.mime_type) {
                        return Err(AnswerError::FileTypeRejected {
                            name: file.name.clone(),
                        });
                    }
                    if file.size_bytes > limit_bytes {
                        return Err(AnswerError::FileTooLarge {
                            name: file.name.clone(),
                            size_bytes: file.size_bytes,
                            limit_bytes,
                        });
                    }
                }
                Ok(AnswerInput::FileUpload {
                    upload: upload.clone(),
                    files,
                })
            }
            (
                QuestionBody::SyntaxError {
                    error_tokens,
                    select_count,
                    ..
                },
                Response::SyntaxError { selected },
            ) => {
                let allowed = select_count.unwrap_or(error_tokens.len());
                if selected.len() > allowed {
                    return Err(AnswerError::TooManySelections {
                        selected: selected.len(),
                        allowed,
                    });
                }
                Ok(AnswerInput::SyntaxError {
                    error_tokens: error_tokens.clone(),
                    selected_tokens: selected,
                })
            }
            (QuestionBody::Unknown, _) => Err(AnswerError::UnsupportedKind(question.id.clone())),
            (_, response) => Err(mismatch(response.kind())),
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), AnswerError> {
    if index < len {
        Ok(())
    } else {
        Err(AnswerError::IndexOutOfRange { index, len })
    }
}

fn unknown_id(what: &'static str, id: &str) -> AnswerError {
    AnswerError::UnknownId {
        what,
        id: id.to_string(),
    }
}

//! Answer construction error types.
//!
//! Raised at the boundary where a submitted [`Response`](crate::answer::Response)
//! is turned into a self-contained [`AnswerInput`](crate::answer::AnswerInput).
//! Grading itself never fails.

use thiserror::Error;

use crate::model::QuestionKind;

/// Errors that can occur when building an answer from a submitted response.
#[derive(Debug, Error, PartialEq)]
pub enum AnswerError {
    /// The response is for a different question kind than the question.
    #[error("question {question_id} is {expected}, but the response is {actual}")]
    KindMismatch {
        question_id: String,
        expected: QuestionKind,
        actual: QuestionKind,
    },

    /// The question kind is not known to this version.
    #[error("question {0} has an unsupported kind")]
    UnsupportedKind(String),

    /// A choice or item index points past the end of its list.
    #[error("index {index} is out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },

    /// An item, match, blank, or category id does not exist on the question.
    #[error("unknown {what} id: {id}")]
    UnknownId { what: &'static str, id: String },

    /// More tokens were selected than the question allows.
    #[error("selected {selected} tokens, at most {allowed} allowed")]
    TooManySelections { selected: usize, allowed: usize },

    /// More files were uploaded than the question allows.
    #[error("uploaded {count} files, at most {max} allowed")]
    TooManyFiles { count: usize, max: u32 },

    /// An uploaded file's type is not in the accepted list.
    #[error("file type of {name} is not accepted")]
    FileTypeRejected { name: String },

    /// An uploaded file exceeds the size limit.
    #[error("file {name} is {size_bytes} bytes, limit is {limit_bytes}")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    /// The question's own reference data is inconsistent.
    #[error("question {question_id} has malformed reference data: {reason}")]
    MalformedQuestion { question_id: String, reason: String },
}

impl AnswerError {
    /// Returns `true` if the submitter caused this error, `false` if the
    /// corpus data is at fault.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            AnswerError::UnsupportedKind(_) | AnswerError::MalformedQuestion { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_user_errors() {
        assert!(AnswerError::IndexOutOfRange { index: 5, len: 3 }.is_user_error());
        assert!(!AnswerError::UnsupportedKind("q1".into()).is_user_error());
        assert!(!AnswerError::MalformedQuestion {
            question_id: "q1".into(),
            reason: "duplicate position".into()
        }
        .is_user_error());
    }

    #[test]
    fn messages_name_the_question() {
        let err = AnswerError::KindMismatch {
            question_id: "q3".into(),
            expected: QuestionKind::Numeric,
            actual: QuestionKind::Text,
        };
        assert_eq!(err.to_string(), "question q3 is numeric, but the response is text");
    }
}

//! Per-kind correctness rules.
//!
//! Every rule is all-or-nothing: there is no partial credit.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::AnswerInput;

/// Tri-state grading outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Needs a human reviewer.
    Unscorable,
}

impl Verdict {
    fn from_bool(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
            Verdict::Unscorable => write!(f, "manual"),
        }
    }
}

/// Grade a single answer.
pub fn grade(answer: &AnswerInput) -> Verdict {
    match answer {
        AnswerInput::TrueFalse {
            correct_answer,
            input_answer,
        } => Verdict::from_bool(input_answer == correct_answer),

        AnswerInput::Numeric {
            correct_answer,
            tolerance,
            input_answer,
        } => Verdict::from_bool(numeric_matches(*input_answer, *correct_answer, *tolerance)),

        AnswerInput::SingleChoice {
            correct_answer_index,
            input_answer,
            ..
        } => Verdict::from_bool(input_answer == correct_answer_index),

        AnswerInput::MultipleChoice {
            answers,
            input_answer,
        } => {
            let correct: BTreeSet<usize> = answers
                .iter()
                .enumerate()
                .filter(|(_, a)| a.is_correct)
                .map(|(i, _)| i)
                .collect();
            let submitted: BTreeSet<usize> = input_answer.iter().copied().collect();
            // Duplicates shrink the set, so they fail the length check.
            Verdict::from_bool(submitted.len() == input_answer.len() && submitted == correct)
        }

        AnswerInput::Ordering {
            items,
            correct_answer_order,
            input_answer,
        } => Verdict::from_bool(
            input_answer.len() == correct_answer_order.len()
                && input_answer
                    .iter()
                    .zip(correct_answer_order)
                    .all(|(&index, expected)| items.get(index) == Some(expected)),
        ),

        AnswerInput::Matching {
            correct_matches,
            input_matches,
            ..
        } => Verdict::from_bool(input_matches == correct_matches),

        AnswerInput::FillBlank {
            blanks,
            input_answers,
        } => Verdict::from_bool(blanks.iter().all(|blank| {
            let input = input_answers.get(&blank.id).map(String::as_str).unwrap_or("");
            blank.accepts(input)
        })),

        AnswerInput::Categorization {
            items,
            input_categories,
            ..
        } => Verdict::from_bool(
            items
                .iter()
                .all(|item| input_categories.get(&item.text) == Some(&item.correct_category)),
        ),

        AnswerInput::SyntaxError {
            error_tokens,
            selected_tokens,
        } => {
            let selected: HashSet<(usize, &str)> = selected_tokens
                .iter()
                .map(|t| (t.line, t.token.as_str()))
                .collect();
            Verdict::from_bool(
                selected_tokens.len() == error_tokens.len()
                    && error_tokens
                        .iter()
                        .all(|e| selected.contains(&(e.line, e.token.as_str()))),
            )
        }

        AnswerInput::Text { .. } | AnswerInput::FileUpload { .. } | AnswerInput::Unknown => {
            Verdict::Unscorable
        }
    }
}

/// Exact comparison, or within `tolerance` when one is set and non-zero.
pub fn numeric_matches(input: f64, correct: f64, tolerance: Option<f64>) -> bool {
    match tolerance {
        Some(t) if t != 0.0 => (input - correct).abs() <= t,
        _ => input == correct,
    }
}

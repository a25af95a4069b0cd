//! Raw difficulty heuristics and difficulty labels.
//!
//! Raw scores are only meaningful relative to other quizzes; see
//! [`crate::statistics::normalize`] for the corpus-wide 0–100 mapping.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{code_line_count, Question, QuestionBody, QuestionKind};

/// Multiplier applied to quizzes that mix many question kinds.
pub const VARIETY_BONUS: f64 = 1.1;

/// Distinct kinds needed for the variety bonus.
pub const VARIETY_THRESHOLD: usize = 4;

/// Base and kind-specific extra difficulty for one question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyEstimate {
    pub base_score: f64,
    pub additional_score: f64,
}

impl DifficultyEstimate {
    pub fn total(&self) -> f64 {
        self.base_score + self.additional_score
    }
}

fn beyond(count: usize, free: usize) -> f64 {
    count.saturating_sub(free) as f64
}

pub fn difficulty_estimate(question: &Question) -> DifficultyEstimate {
    let (base_score, additional_score) = match &question.body {
        QuestionBody::TrueFalse { .. } => (10.0, 0.0),
        QuestionBody::SingleChoice { answers, .. } => (20.0, beyond(answers.len(), 4) * 3.0),
        QuestionBody::MultipleChoice { answers } => {
            let correct = answers.iter().filter(|a| a.is_correct).count() as f64;
            (35.0, correct * 5.0 + answers.len() as f64 * 3.0)
        }
        QuestionBody::Numeric { tolerance, .. } => {
            let extra = match tolerance {
                None => 20.0,
                Some(t) if *t == 0.0 => 20.0,
                Some(t) if *t > 5.0 => -10.0,
                Some(_) => 0.0,
            };
            (40.0, extra)
        }
        QuestionBody::Text { min_length, .. } => {
            let extra = if min_length.unwrap_or(0) > 100 { 15.0 } else { 0.0 };
            (45.0, extra)
        }
        QuestionBody::Ordering { items } => (50.0, beyond(items.len(), 4) * 8.0),
        QuestionBody::Matching { matches, .. } => (45.0, beyond(matches.len(), 4) * 6.0),
        QuestionBody::FillBlank { blanks } => {
            let case_bonus = if blanks.iter().any(|b| b.case_sensitive) {
                5.0
            } else {
                0.0
            };
            (40.0, blanks.len() as f64 * 10.0 + case_bonus)
        }
        QuestionBody::Categorization { categories, items } => (
            55.0,
            items.len() as f64 * 5.0 + beyond(categories.len(), 2) * 10.0,
        ),
        QuestionBody::FileUpload { .. } => (60.0, 0.0),
        QuestionBody::SyntaxError {
            code, error_tokens, ..
        } => (
            70.0,
            error_tokens.len() as f64 * 5.0 + (code_line_count(code) / 20) as f64 * 10.0,
        ),
        QuestionBody::Unknown => (30.0, 0.0),
    };

    DifficultyEstimate {
        base_score,
        additional_score,
    }
}

/// Raw difficulty of a single question.
pub fn estimate_question_difficulty(question: &Question) -> f64 {
    difficulty_estimate(question).total()
}

/// Raw difficulty of a quiz: mean question difficulty, with a bonus for
/// quizzes that use at least [`VARIETY_THRESHOLD`] distinct kinds.
pub fn estimate_difficulty(questions: &[Question]) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }

    let total: f64 = questions.iter().map(estimate_question_difficulty).sum();
    let mut average = total / questions.len() as f64;

    let kinds: HashSet<QuestionKind> = questions.iter().map(Question::kind).collect();
    if kinds.len() >= VARIETY_THRESHOLD {
        average *= VARIETY_BONUS;
    }

    average
}

/// Discrete difficulty label shown to participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DifficultyLabel {
    #[serde(rename = "Einfach")]
    Easy,
    #[default]
    #[serde(rename = "Mittel")]
    Medium,
    #[serde(rename = "Fortgeschritten")]
    Advanced,
    #[serde(rename = "Experte")]
    Expert,
}

impl DifficultyLabel {
    /// Map a normalized 0–100 score to its label.
    pub fn from_score(score: f64) -> Self {
        if score <= 35.0 {
            DifficultyLabel::Easy
        } else if score <= 55.0 {
            DifficultyLabel::Medium
        } else if score <= 80.0 {
            DifficultyLabel::Advanced
        } else {
            DifficultyLabel::Expert
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "Einfach",
            DifficultyLabel::Medium => "Mittel",
            DifficultyLabel::Advanced => "Fortgeschritten",
            DifficultyLabel::Expert => "Experte",
        }
    }
}

impl fmt::Display for DifficultyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

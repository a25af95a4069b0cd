//! Score aggregation over one attempt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answer::AnswerInput;
use crate::grading::{grade, Verdict};

/// Folded verdict counts for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub correct: u32,
    pub incorrect: u32,
    /// Answers that need a human reviewer.
    pub manual: u32,
    /// Number of questions in the quiz, answered or not.
    pub total: u32,
    /// `round(100 * correct / (total - manual))`, or 0 when nothing is auto-gradable.
    pub percentage: u32,
}

impl ScoreSummary {
    /// Fold verdicts into counts. `total_questions` is the full question
    /// count of the quiz, so unanswered questions count against the score.
    pub fn from_verdicts<I>(verdicts: I, total_questions: u32) -> Self
    where
        I: IntoIterator<Item = Verdict>,
    {
        let mut summary = ScoreSummary {
            total: total_questions,
            ..Default::default()
        };
        for verdict in verdicts {
            match verdict {
                Verdict::Correct => summary.correct += 1,
                Verdict::Incorrect => summary.incorrect += 1,
                Verdict::Unscorable => summary.manual += 1,
            }
        }

        let auto_gradable = summary.auto_gradable_total();
        summary.percentage = if auto_gradable > 0 {
            (100.0 * summary.correct as f64 / auto_gradable as f64).round() as u32
        } else {
            0
        };
        summary
    }

    /// Questions whose correctness is decided without a reviewer.
    pub fn auto_gradable_total(&self) -> u32 {
        self.total.saturating_sub(self.manual)
    }

    /// Questions in the quiz that received no answer.
    pub fn unanswered(&self) -> u32 {
        self.total
            .saturating_sub(self.correct + self.incorrect + self.manual)
    }
}

/// Grade every answer and fold the verdicts.
pub fn aggregate(answers: &BTreeMap<String, AnswerInput>, total_questions: u32) -> ScoreSummary {
    ScoreSummary::from_verdicts(answers.values().map(grade), total_questions)
}

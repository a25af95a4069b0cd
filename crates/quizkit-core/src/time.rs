//! Expected completion time per question and per quiz.

use crate::model::{code_line_count, Question, QuestionBody};

/// Base and kind-specific extra seconds for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEstimate {
    pub base_seconds: u32,
    pub additional_seconds: u32,
}

impl TimeEstimate {
    pub fn total(&self) -> u32 {
        self.base_seconds.saturating_add(self.additional_seconds)
    }
}

fn beyond(count: usize, free: usize) -> u32 {
    count_u32(count.saturating_sub(free))
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Break down the expected time for a question.
pub fn time_estimate(question: &Question) -> TimeEstimate {
    let (base_seconds, additional_seconds) = match &question.body {
        QuestionBody::TrueFalse { .. } => (25, 0),
        QuestionBody::SingleChoice { answers, .. } => (40, beyond(answers.len(), 4).saturating_mul(5)),
        QuestionBody::MultipleChoice { answers } => (60, count_u32(answers.len()).saturating_mul(8)),
        QuestionBody::Numeric { .. } => (55, 0),
        QuestionBody::Text { max_length, .. } => {
            let over = max_length.unwrap_or(0).saturating_sub(300);
            (90, (over / 200).saturating_mul(30))
        }
        QuestionBody::Ordering { items } => (60, beyond(items.len(), 4).saturating_mul(15)),
        QuestionBody::Matching { matches, .. } => (70, beyond(matches.len(), 4).saturating_mul(15)),
        QuestionBody::FillBlank { blanks } => (45, count_u32(blanks.len()).saturating_mul(15)),
        QuestionBody::Categorization { categories, items } => (
            60,
            count_u32(items.len())
                .saturating_mul(10)
                .saturating_add(beyond(categories.len(), 2).saturating_mul(20)),
        ),
        QuestionBody::FileUpload { upload } => {
            let extra = if upload.accepts_text() {
                upload.max_files.saturating_mul(120)
            } else {
                0
            };
            (300, extra)
        }
        QuestionBody::SyntaxError { code, .. } => (
            120,
            count_u32(code_line_count(code) / 10).saturating_mul(30),
        ),
        QuestionBody::Unknown => (45, 0),
    };

    TimeEstimate {
        base_seconds,
        additional_seconds,
    }
}

/// Expected seconds to answer a question.
pub fn estimate_time(question: &Question) -> u32 {
    time_estimate(question).total()
}

/// Expected seconds to complete a quiz; zero for an empty quiz.
///
/// Saturates at `u32::MAX` instead of overflowing.
pub fn estimate_quiz_time(questions: &[Question]) -> u32 {
    questions
        .iter()
        .map(estimate_time)
        .fold(0, u32::saturating_add)
}

/// Format seconds as `Xm Ys`, or `Xh Ym Zs` from one hour on.
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins >= 60 {
        format!("{}h {}m {}s", mins / 60, mins % 60, secs)
    } else {
        format!("{mins}m {secs}s")
    }
}

//! Graded attempt reports with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::{AnswerInput, Response};
use crate::difficulty::DifficultyLabel;
use crate::error::AnswerError;
use crate::grading::{grade, Verdict};
use crate::model::{resolve_blanks, QuestionKind, Quiz};
use crate::results::ScoreSummary;
use crate::time::format_duration;

/// One participant's submission for a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub quiz_id: String,
    #[serde(default)]
    pub participant: Option<String>,
    #[serde(default)]
    pub elapsed_seconds: u64,
    /// Responses keyed by question id. Unanswered questions are absent.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

impl Attempt {
    /// Load an attempt from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read attempt from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse attempt JSON: {}", path.display()))
    }
}

/// Summary of a quiz (without its questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub name: String,
    pub group: String,
    pub question_count: usize,
    pub estimated_time_seconds: u32,
    pub difficulty_score: u8,
    pub difficulty: DifficultyLabel,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            name: quiz.name.clone(),
            group: quiz.group.clone(),
            question_count: quiz.questions.len(),
            estimated_time_seconds: quiz.estimated_time_seconds,
            difficulty_score: quiz.difficulty_score,
            difficulty: quiz.difficulty,
        }
    }
}

/// Grading outcome of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub kind: QuestionKind,
    pub prompt: String,
    /// `None` when the question was not answered.
    pub verdict: Option<Verdict>,
    pub answer: Option<AnswerInput>,
}

impl QuestionOutcome {
    /// The prompt with fill-blank placeholders replaced by the submitted text.
    pub fn resolved_prompt(&self) -> String {
        match &self.answer {
            Some(AnswerInput::FillBlank { input_answers, .. }) => {
                resolve_blanks(&self.prompt, |id| match input_answers.get(id) {
                    Some(text) if !text.trim().is_empty() => format!("[{text}]"),
                    _ => "[___]".to_string(),
                })
            }
            _ => resolve_blanks(&self.prompt, |_| "___".to_string()),
        }
    }

    /// Short marker used by the text and markdown renderers.
    pub fn marker(&self) -> &'static str {
        match self.verdict {
            Some(Verdict::Correct) => "CORRECT",
            Some(Verdict::Incorrect) => "INCORRECT",
            Some(Verdict::Unscorable) => "MANUAL",
            None => "UNANSWERED",
        }
    }
}

/// A graded attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the attempt was graded.
    pub created_at: DateTime<Utc>,
    pub quiz: QuizSummary,
    pub participant: Option<String>,
    pub elapsed_seconds: u64,
    /// One entry per quiz question, in quiz order.
    pub outcomes: Vec<QuestionOutcome>,
    pub score: ScoreSummary,
}

/// Grade every response of an attempt against its quiz.
///
/// Responses to unknown-kind questions are kept for manual review. Any
/// other rejected response fails the whole attempt.
pub fn grade_attempt(quiz: &Quiz, attempt: &Attempt) -> Result<AttemptReport> {
    anyhow::ensure!(
        attempt.quiz_id == quiz.id,
        "attempt is for quiz {}, not {}",
        attempt.quiz_id,
        quiz.id
    );
    for id in attempt.responses.keys() {
        anyhow::ensure!(
            quiz.question(id).is_some(),
            "response for unknown question {id} in quiz {}",
            quiz.id
        );
    }

    let mut outcomes = Vec::with_capacity(quiz.questions.len());
    for question in &quiz.questions {
        let answer = match attempt.responses.get(&question.id) {
            None => None,
            Some(response) => match AnswerInput::from_question(question, response.clone()) {
                Ok(answer) => Some(answer),
                Err(AnswerError::UnsupportedKind(_)) => Some(AnswerInput::Unknown),
                Err(e) => {
                    return Err(e).with_context(|| format!("question {}", question.id));
                }
            },
        };
        outcomes.push(QuestionOutcome {
            question_id: question.id.clone(),
            kind: question.kind(),
            prompt: question.prompt.clone(),
            verdict: answer.as_ref().map(grade),
            answer,
        });
    }

    let score = ScoreSummary::from_verdicts(
        outcomes.iter().filter_map(|o| o.verdict),
        quiz.questions.len() as u32,
    );
    tracing::debug!(
        quiz = %quiz.id,
        correct = score.correct,
        total = score.total,
        "graded attempt"
    );

    Ok(AttemptReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        quiz: QuizSummary::from(quiz),
        participant: attempt.participant.clone(),
        elapsed_seconds: attempt.elapsed_seconds,
        outcomes,
        score,
    })
}

impl AttemptReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn participant_name(&self) -> &str {
        self.participant.as_deref().unwrap_or("Anonymous")
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", md_escape(&self.quiz.name)));
        md.push_str(&format!(
            "**Participant:** {}  \n**Time:** {}  \n**Graded:** {}\n\n",
            md_escape(self.participant_name()),
            format_duration(self.elapsed_seconds),
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let s = &self.score;
        md.push_str(&format!(
            "**Score:** {}% ({} of {} auto-graded correct, {} incorrect, {} for manual review, {} unanswered)\n\n",
            s.percentage,
            s.correct,
            s.auto_gradable_total(),
            s.incorrect,
            s.manual,
            s.unanswered()
        ));

        md.push_str("| # | Question | Kind | Result | Answer | Expected |\n");
        md.push_str("|---|----------|------|--------|--------|----------|\n");
        for (i, o) in self.outcomes.iter().enumerate() {
            let (given, expected) = match &o.answer {
                Some(a) => (
                    submitted_summary(a),
                    expected_summary(a).unwrap_or_else(|| "-".into()),
                ),
                None => ("-".into(), "-".into()),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                md_escape(&o.resolved_prompt()),
                o.kind,
                o.marker(),
                md_escape(&given),
                md_escape(&expected)
            ));
        }

        md
    }
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn or_none(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "(none)".to_string()
    } else {
        parts.join(", ")
    }
}

fn text_at(texts: &[String], index: usize) -> String {
    texts
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("#{index}"))
}

fn choice_text<'a>(choices: &'a [crate::model::Choice], id: &'a str) -> &'a str {
    choices
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.text.as_str())
        .unwrap_or(id)
}

/// Human-readable form of what was submitted.
pub fn submitted_summary(answer: &AnswerInput) -> String {
    match answer {
        AnswerInput::TrueFalse { input_answer, .. } => input_answer.to_string(),
        AnswerInput::Numeric { input_answer, .. } => input_answer.to_string(),
        AnswerInput::Text { input_answer, .. } => input_answer.clone(),
        AnswerInput::SingleChoice {
            answers,
            input_answer,
            ..
        } => text_at(answers, *input_answer),
        AnswerInput::MultipleChoice {
            answers,
            input_answer,
        } => or_none(
            input_answer
                .iter()
                .map(|&i| {
                    answers
                        .get(i)
                        .map(|a| a.text.clone())
                        .unwrap_or_else(|| format!("#{i}"))
                })
                .collect(),
        ),
        AnswerInput::Ordering {
            items,
            input_answer,
            ..
        } => input_answer
            .iter()
            .map(|&i| text_at(items, i))
            .collect::<Vec<_>>()
            .join(" > "),
        AnswerInput::Matching {
            items,
            targets,
            input_matches,
            ..
        } => or_none(
            input_matches
                .iter()
                .map(|(item, target)| {
                    format!("{} -> {}", choice_text(items, item), choice_text(targets, target))
                })
                .collect(),
        ),
        AnswerInput::FillBlank { input_answers, .. } => or_none(
            input_answers
                .iter()
                .map(|(id, text)| format!("{id}: {text}"))
                .collect(),
        ),
        AnswerInput::Categorization {
            categories,
            input_categories,
            ..
        } => or_none(
            input_categories
                .iter()
                .map(|(item, category)| {
                    let name = categories
                        .iter()
                        .find(|c| &c.id == category)
                        .map(|c| c.name.as_str())
                        .unwrap_or(category);
                    format!("{item} -> {name}")
                })
                .collect(),
        ),
        AnswerInput::FileUpload { files, .. } => {
            or_none(files.iter().map(|f| f.name.clone()).collect())
        }
        AnswerInput::SyntaxError {
            selected_tokens, ..
        } => or_none(
            selected_tokens
                .iter()
                .map(|t| format!("line {}: {}", t.line, t.token))
                .collect(),
        ),
        AnswerInput::Unknown => "(unsupported)".to_string(),
    }
}

/// Human-readable form of the reference answer, if the kind has one.
pub fn expected_summary(answer: &AnswerInput) -> Option<String> {
    let summary = match answer {
        AnswerInput::TrueFalse { correct_answer, .. } => correct_answer.to_string(),
        AnswerInput::Numeric {
            correct_answer,
            tolerance,
            ..
        } => match tolerance {
            Some(t) if *t != 0.0 => format!("{correct_answer} ± {t}"),
            _ => correct_answer.to_string(),
        },
        AnswerInput::SingleChoice {
            answers,
            correct_answer_index,
            ..
        } => text_at(answers, *correct_answer_index),
        AnswerInput::MultipleChoice { answers, .. } => or_none(
            answers
                .iter()
                .filter(|a| a.is_correct)
                .map(|a| a.text.clone())
                .collect(),
        ),
        AnswerInput::Ordering {
            correct_answer_order,
            ..
        } => correct_answer_order.join(" > "),
        AnswerInput::Matching {
            items,
            targets,
            correct_matches,
            ..
        } => or_none(
            correct_matches
                .iter()
                .map(|(item, target)| {
                    format!("{} -> {}", choice_text(items, item), choice_text(targets, target))
                })
                .collect(),
        ),
        AnswerInput::FillBlank { blanks, .. } => or_none(
            blanks
                .iter()
                .map(|b| format!("{}: {}", b.id, b.correct_answers.join(" / ")))
                .collect(),
        ),
        AnswerInput::Categorization {
            categories, items, ..
        } => or_none(
            items
                .iter()
                .map(|item| {
                    let name = categories
                        .iter()
                        .find(|c| c.id == item.correct_category)
                        .map(|c| c.name.as_str())
                        .unwrap_or(&item.correct_category);
                    format!("{} -> {name}", item.text)
                })
                .collect(),
        ),
        AnswerInput::SyntaxError { error_tokens, .. } => or_none(
            error_tokens
                .iter()
                .map(|t| format!("line {}: {}", t.line, t.token))
                .collect(),
        ),
        AnswerInput::Text { .. } | AnswerInput::FileUpload { .. } | AnswerInput::Unknown => {
            return None
        }
    };
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::TokenRef;
    use crate::model::{Blank, Choice, ErrorToken, Question, QuestionBody};

    fn question(id: &str, prompt: &str, body: QuestionBody) -> Question {
        Question {
            id: id.into(),
            prompt: prompt.into(),
            short_prompt: String::new(),
            body,
        }
    }

    fn make_quiz() -> Quiz {
        Quiz {
            id: "geo".into(),
            name: "Geography".into(),
            description: String::new(),
            order: 0,
            group: "general".into(),
            questions: vec![
                question(
                    "1",
                    "Is the Earth round?",
                    QuestionBody::TrueFalse {
                        correct_answer: true,
                    },
                ),
                question(
                    "2",
                    "Capital of France?",
                    QuestionBody::SingleChoice {
                        answers: vec![
                            Choice {
                                id: "a".into(),
                                text: "Paris".into(),
                            },
                            Choice {
                                id: "b".into(),
                                text: "Lyon".into(),
                            },
                        ],
                        correct_answer_index: 0,
                    },
                ),
                question(
                    "3",
                    "The capital of Italy is {{blank:1}}.",
                    QuestionBody::FillBlank {
                        blanks: vec![Blank {
                            id: "1".into(),
                            correct_answers: vec!["Rome".into()],
                            case_sensitive: false,
                        }],
                    },
                ),
                question(
                    "4",
                    "Describe a river.",
                    QuestionBody::Text {
                        min_length: None,
                        max_length: None,
                    },
                ),
                question(
                    "5",
                    "Find the typo",
                    QuestionBody::SyntaxError {
                        code: "fn main() {\n    pritnln!(\"hi\");\n}".into(),
                        language: "rust".into(),
                        error_tokens: vec![ErrorToken {
                            line: 2,
                            token: "pritnln".into(),
                            explanation: None,
                        }],
                        select_count: None,
                    },
                ),
                question("6", "Sketch a map", QuestionBody::Unknown),
            ],
            estimated_time_seconds: 0,
            difficulty_score: 0,
            difficulty: DifficultyLabel::default(),
        }
    }

    fn make_attempt() -> Attempt {
        let mut responses = BTreeMap::new();
        responses.insert("1".into(), Response::TrueFalse { value: true });
        responses.insert("2".into(), Response::SingleChoice { index: 1 });
        responses.insert(
            "3".into(),
            Response::FillBlank {
                blanks: BTreeMap::from([("1".to_string(), "rome".to_string())]),
            },
        );
        responses.insert(
            "4".into(),
            Response::Text {
                value: "Long and wet.".into(),
            },
        );
        responses.insert("6".into(), Response::Text { value: "...".into() });
        Attempt {
            quiz_id: "geo".into(),
            participant: Some("Ada".into()),
            elapsed_seconds: 125,
            responses,
        }
    }

    #[test]
    fn grades_every_question() {
        let report = grade_attempt(&make_quiz(), &make_attempt()).unwrap();
        let verdicts: Vec<_> = report.outcomes.iter().map(|o| o.verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                Some(Verdict::Correct),
                Some(Verdict::Incorrect),
                Some(Verdict::Correct),
                Some(Verdict::Unscorable),
                None,
                Some(Verdict::Unscorable),
            ]
        );
        assert_eq!(report.score.correct, 2);
        assert_eq!(report.score.incorrect, 1);
        assert_eq!(report.score.manual, 2);
        assert_eq!(report.score.total, 6);
        assert_eq!(report.score.percentage, 50);
        assert_eq!(report.score.unanswered(), 1);
    }

    #[test]
    fn rejects_attempt_for_other_quiz() {
        let mut attempt = make_attempt();
        attempt.quiz_id = "math".into();
        assert!(grade_attempt(&make_quiz(), &attempt).is_err());
    }

    #[test]
    fn rejects_unknown_question_and_bad_response() {
        let mut attempt = make_attempt();
        attempt
            .responses
            .insert("99".into(), Response::TrueFalse { value: true });
        assert!(grade_attempt(&make_quiz(), &attempt).is_err());

        let mut attempt = make_attempt();
        attempt
            .responses
            .insert("2".into(), Response::SingleChoice { index: 7 });
        let err = grade_attempt(&make_quiz(), &attempt).unwrap_err();
        assert!(format!("{err:#}").contains("question 2"));
    }

    #[test]
    fn resolved_prompt_shows_inputs() {
        let report = grade_attempt(&make_quiz(), &make_attempt()).unwrap();
        assert_eq!(
            report.outcomes[2].resolved_prompt(),
            "The capital of Italy is [rome]."
        );
    }

    #[test]
    fn summaries() {
        let answer = AnswerInput::SyntaxError {
            error_tokens: vec![ErrorToken {
                line: 2,
                token: "pritnln".into(),
                explanation: None,
            }],
            selected_tokens: vec![TokenRef {
                line: 1,
                token: "fn".into(),
            }],
        };
        assert_eq!(submitted_summary(&answer), "line 1: fn");
        assert_eq!(expected_summary(&answer).unwrap(), "line 2: pritnln");

        let text = AnswerInput::Text {
            min_length: None,
            max_length: None,
            input_answer: "essay".into(),
        };
        assert!(expected_summary(&text).is_none());
    }

    #[test]
    fn json_roundtrip() {
        let report = grade_attempt(&make_quiz(), &make_attempt()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        report.save_json(&path).unwrap();
        let loaded = AttemptReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.score, report.score);
        assert_eq!(loaded.outcomes.len(), 6);
    }

    #[test]
    fn markdown_output() {
        let report = grade_attempt(&make_quiz(), &make_attempt()).unwrap();
        let md = report.to_markdown();
        assert!(md.contains("# Geography"));
        assert!(md.contains("**Participant:** Ada"));
        assert!(md.contains("2m 5s"));
        assert!(md.contains("**Score:** 50%"));
        assert!(md.contains("| 2 | Capital of France? | single-choice | INCORRECT | Lyon | Paris |"));
        assert!(md.contains("UNANSWERED"));
    }
}

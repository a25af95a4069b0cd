//! Corpus-wide difficulty normalization.
//!
//! A quiz's difficulty score is relative to every other quiz loaded with
//! it. Raw scores are centered on the corpus median and squashed through
//! `tanh`, so outliers cannot stretch the 0–100 range:
//!
//! `score = 50 * (1 + tanh((raw - median) / median))`
//!
//! Degenerate corpora fall back step by step: a single quiz is scored by
//! its estimated time alone; identical raw scores use estimated times
//! instead; identical times use question counts; identical counts give
//! every quiz the midpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::difficulty::{estimate_difficulty, DifficultyLabel};
use crate::model::Quiz;
use crate::time::estimate_quiz_time;

/// The per-quiz inputs normalization works from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizProfile {
    pub id: String,
    pub question_count: usize,
    pub raw_difficulty: f64,
    pub estimated_time_seconds: u32,
}

impl QuizProfile {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            question_count: quiz.questions.len(),
            raw_difficulty: estimate_difficulty(&quiz.questions),
            estimated_time_seconds: estimate_quiz_time(&quiz.questions),
        }
    }
}

/// Which statistic a corpus was normalized on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationBasis {
    /// Only one quiz: linear in estimated minutes.
    SingleQuiz,
    RawDifficulty,
    EstimatedTime,
    QuestionCount,
}

/// Derived metadata for one quiz within a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub estimated_time_seconds: u32,
    pub raw_difficulty: f64,
    /// Rounded normalized score, 0–100.
    pub difficulty_score: u8,
    /// Label of the unrounded score.
    pub difficulty: DifficultyLabel,
    pub basis: NormalizationBasis,
}

/// Median of `values`; zero for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Median-centered tanh scores for a set of non-identical values.
///
/// When the median is zero the mean is used as the center instead, so the
/// deviation stays finite.
fn tanh_scores(values: &[f64]) -> Vec<f64> {
    let mut center = median(values);
    if center == 0.0 {
        center = values.iter().sum::<f64>() / values.len() as f64;
    }
    if center == 0.0 {
        return vec![50.0; values.len()];
    }
    values
        .iter()
        .map(|v| 50.0 * (1.0 + ((v - center) / center).tanh()))
        .collect()
}

fn all_identical<T: PartialEq>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Score a lone quiz by time: 5 minutes maps to 0, 30 minutes to 100.
fn single_quiz_score(estimated_time_seconds: u32) -> f64 {
    let minutes = estimated_time_seconds as f64 / 60.0;
    ((minutes - 5.0) / 25.0 * 100.0).clamp(0.0, 100.0)
}

/// Normalize a whole corpus. Must be given every quiz at once.
pub fn normalize(quizzes: &[Quiz]) -> HashMap<String, CorpusStats> {
    let profiles: Vec<QuizProfile> = quizzes.iter().map(QuizProfile::from_quiz).collect();
    normalize_profiles(&profiles)
}

/// Normalize precomputed profiles. Must be given every quiz at once.
pub fn normalize_profiles(profiles: &[QuizProfile]) -> HashMap<String, CorpusStats> {
    let (basis, scores) = match profiles {
        [] => return HashMap::new(),
        [single] => (
            NormalizationBasis::SingleQuiz,
            vec![single_quiz_score(single.estimated_time_seconds)],
        ),
        _ => {
            let raw: Vec<f64> = profiles.iter().map(|p| p.raw_difficulty).collect();
            let times: Vec<u32> = profiles.iter().map(|p| p.estimated_time_seconds).collect();
            if !all_identical(&raw) {
                (NormalizationBasis::RawDifficulty, tanh_scores(&raw))
            } else if !all_identical(&times) {
                let times: Vec<f64> = times.into_iter().map(f64::from).collect();
                (NormalizationBasis::EstimatedTime, tanh_scores(&times))
            } else {
                (NormalizationBasis::QuestionCount, count_scores(profiles))
            }
        }
    };

    tracing::debug!(
        quizzes = profiles.len(),
        ?basis,
        "normalized corpus difficulty"
    );

    profiles
        .iter()
        .zip(scores)
        .map(|(profile, score)| {
            (
                profile.id.clone(),
                CorpusStats {
                    estimated_time_seconds: profile.estimated_time_seconds,
                    raw_difficulty: profile.raw_difficulty,
                    difficulty_score: score.round().clamp(0.0, 100.0) as u8,
                    difficulty: DifficultyLabel::from_score(score),
                    basis,
                },
            )
        })
        .collect()
}

/// Linear interpolation between the smallest and largest question count.
fn count_scores(profiles: &[QuizProfile]) -> Vec<f64> {
    let min = profiles.iter().map(|p| p.question_count).min().unwrap_or(0);
    let max = profiles.iter().map(|p| p.question_count).max().unwrap_or(0);
    let spread = max - min;
    profiles
        .iter()
        .map(|p| {
            if spread == 0 {
                50.0
            } else {
                (p.question_count - min) as f64 / spread as f64 * 100.0
            }
        })
        .collect()
}

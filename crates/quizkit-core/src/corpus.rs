//! A loaded quiz corpus with its derived metadata.
//!
//! Difficulty is corpus-relative, so derived fields are only ever written
//! here, after the whole set of quizzes is known.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::model::Quiz;
use crate::parser::load_corpus;
use crate::statistics::normalize;

/// Every quiz loaded together, sorted for display.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    quizzes: Vec<Quiz>,
}

impl Corpus {
    /// Build a corpus, normalizing difficulty over all of `quizzes`.
    ///
    /// Any derived values already present on the input are overwritten.
    /// Quiz ids must be unique: a later quiz reusing an id is skipped.
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        let mut seen = HashSet::new();
        let mut quizzes: Vec<Quiz> = quizzes
            .into_iter()
            .filter(|quiz| {
                let first = seen.insert(quiz.id.clone());
                if !first {
                    tracing::warn!("skipping quiz {:?}: duplicate quiz ID", quiz.id);
                }
                first
            })
            .collect();
        quizzes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        let stats = normalize(&quizzes);
        for quiz in &mut quizzes {
            if let Some(s) = stats.get(&quiz.id) {
                quiz.estimated_time_seconds = s.estimated_time_seconds;
                quiz.difficulty_score = s.difficulty_score;
                quiz.difficulty = s.difficulty;
            }
        }

        tracing::info!(
            quizzes = quizzes.len(),
            questions = quizzes.iter().map(|q| q.questions.len()).sum::<usize>(),
            "loaded quiz corpus"
        );

        Self { quizzes }
    }

    /// Load a file or directory and build the corpus from it.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_corpus(path)?))
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn get(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Build the group tree. Quizzes with an empty group sit at the root.
    pub fn groups(&self) -> QuizGroup {
        let mut root = QuizGroup::new("");
        for quiz in &self.quizzes {
            let mut node = &mut root;
            for segment in quiz.group_path() {
                node = node
                    .subgroups
                    .entry(segment.to_string())
                    .or_insert_with(|| QuizGroup::new(segment));
            }
            node.quizzes.push(quiz.clone());
        }
        root
    }
}

/// A node in the quiz group hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizGroup {
    pub name: String,
    pub quizzes: Vec<Quiz>,
    pub subgroups: BTreeMap<String, QuizGroup>,
}

impl QuizGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            quizzes: Vec::new(),
            subgroups: BTreeMap::new(),
        }
    }

    /// Number of quizzes in this group and all of its subgroups.
    pub fn total_quizzes(&self) -> usize {
        self.quizzes.len()
            + self
                .subgroups
                .values()
                .map(QuizGroup::total_quizzes)
                .sum::<usize>()
    }

    /// Look up a nested group by a slash-delimited path.
    pub fn find(&self, path: &str) -> Option<&QuizGroup> {
        path.split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, segment| node.subgroups.get(segment))
    }
}

//! The `quizkit list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizkit_core::config::load_config_from;
use quizkit_core::corpus::{Corpus, QuizGroup};
use quizkit_core::model::Quiz;

pub fn execute(
    corpus_path: Option<PathBuf>,
    group_prefix: Option<String>,
    tree: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let corpus_path = match corpus_path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.corpus_dir,
    };
    let corpus = Corpus::load(&corpus_path)?;

    if corpus.is_empty() {
        println!("No quizzes found in {}.", corpus_path.display());
        return Ok(());
    }

    if tree {
        let root = corpus.groups();
        let node = match &group_prefix {
            Some(prefix) => root
                .find(prefix)
                .ok_or_else(|| anyhow::anyhow!("no group named {prefix}"))?,
            None => &root,
        };
        print_tree(node, 0);
        return Ok(());
    }

    let quizzes: Vec<&Quiz> = corpus
        .quizzes()
        .iter()
        .filter(|q| match &group_prefix {
            Some(prefix) => in_group(q, prefix),
            None => true,
        })
        .collect();

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Group",
        "Questions",
        "Time",
        "Difficulty",
        "Label",
    ]);
    for quiz in &quizzes {
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(&quiz.name),
            Cell::new(if quiz.group.is_empty() { "-" } else { quiz.group.as_str() }),
            Cell::new(quiz.questions.len()),
            Cell::new(format!("{} min", minutes(quiz))),
            Cell::new(quiz.difficulty_score),
            Cell::new(quiz.difficulty),
        ]);
    }

    println!("{table}");
    println!("{} quiz(zes)", quizzes.len());

    Ok(())
}

/// Whether `quiz` sits in the group at `path` or one of its subgroups.
fn in_group(quiz: &Quiz, path: &str) -> bool {
    let wanted: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    quiz.group_path().starts_with(&wanted)
}

/// Estimated time rounded up to whole minutes.
fn minutes(quiz: &Quiz) -> u32 {
    quiz.estimated_time_seconds.div_ceil(60)
}

fn print_tree(group: &QuizGroup, depth: usize) {
    let indent = "  ".repeat(depth);
    for quiz in &group.quizzes {
        println!(
            "{indent}- {} [{}, {} min]",
            quiz.name,
            quiz.difficulty,
            minutes(quiz)
        );
    }
    for sub in group.subgroups.values() {
        println!("{indent}{}/ ({} quizzes)", sub.name, sub.total_quizzes());
        print_tree(sub, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizkit_core::difficulty::DifficultyLabel;

    fn quiz_in(group: &str) -> Quiz {
        Quiz {
            id: "q".into(),
            name: "Q".into(),
            description: String::new(),
            order: 0,
            group: group.into(),
            questions: vec![],
            estimated_time_seconds: 0,
            difficulty_score: 0,
            difficulty: DifficultyLabel::default(),
        }
    }

    #[test]
    fn group_filter_matches_whole_segments() {
        assert!(in_group(&quiz_in("programming"), "programming"));
        assert!(in_group(&quiz_in("programming/rust"), "programming"));
        assert!(in_group(&quiz_in("programming/rust"), "/programming/rust/"));
        assert!(!in_group(&quiz_in("programming-legacy/cobol"), "programming"));
        assert!(!in_group(&quiz_in("programming"), "programming/rust"));
        assert!(in_group(&quiz_in("general"), ""));
    }
}

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizkit_core::answer::{AnswerInput, TokenRef};
use quizkit_core::grading::grade;
use quizkit_core::model::{Blank, ErrorToken, MultipleChoiceOption};
use quizkit_core::results::aggregate;

fn multiple_choice(options: usize) -> AnswerInput {
    AnswerInput::MultipleChoice {
        answers: (0..options)
            .map(|i| MultipleChoiceOption {
                id: i.to_string(),
                text: format!("Option {i}"),
                is_correct: i % 3 == 0,
            })
            .collect(),
        input_answer: (0..options).filter(|i| i % 3 == 0).collect(),
    }
}

fn fill_blank(blanks: usize) -> AnswerInput {
    AnswerInput::FillBlank {
        blanks: (0..blanks)
            .map(|i| Blank {
                id: i.to_string(),
                correct_answers: vec![format!("Answer{i}"), format!("Alt{i}")],
                case_sensitive: i % 2 == 0,
            })
            .collect(),
        input_answers: (0..blanks)
            .map(|i| (i.to_string(), format!("alt{i}")))
            .collect(),
    }
}

fn syntax_error(tokens: usize) -> AnswerInput {
    let error_tokens: Vec<ErrorToken> = (0..tokens)
        .map(|i| ErrorToken {
            line: i + 1,
            token: format!("tok{i}"),
            explanation: None,
        })
        .collect();
    AnswerInput::SyntaxError {
        selected_tokens: error_tokens
            .iter()
            .rev()
            .map(|t| TokenRef {
                line: t.line,
                token: t.token.clone(),
            })
            .collect(),
        error_tokens,
    }
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    let mc = multiple_choice(12);
    let fb = fill_blank(8);
    let se = syntax_error(20);

    group.bench_function("multiple_choice_12", |b| b.iter(|| grade(black_box(&mc))));
    group.bench_function("fill_blank_8", |b| b.iter(|| grade(black_box(&fb))));
    group.bench_function("syntax_error_20", |b| b.iter(|| grade(black_box(&se))));

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for n in [10usize, 100, 1000] {
        let answers: BTreeMap<String, AnswerInput> = (0..n)
            .map(|i| {
                let answer = match i % 3 {
                    0 => multiple_choice(6),
                    1 => fill_blank(3),
                    _ => syntax_error(4),
                };
                (format!("q{i}"), answer)
            })
            .collect();

        group.bench_function(format!("{n}_answers"), |b| {
            b.iter(|| aggregate(black_box(&answers), n as u32))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grade, bench_aggregate);
criterion_main!(benches);

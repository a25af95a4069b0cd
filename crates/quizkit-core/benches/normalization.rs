use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizkit_core::corpus::Corpus;
use quizkit_core::model::{Choice, Question, QuestionBody, Quiz};
use quizkit_core::statistics::{normalize, normalize_profiles, QuizProfile};

fn generate_quiz(i: usize) -> Quiz {
    let questions = (0..(i % 15) + 1)
        .map(|q| Question {
            id: q.to_string(),
            prompt: format!("Question {q}"),
            short_prompt: String::new(),
            body: match q % 3 {
                0 => QuestionBody::TrueFalse {
                    correct_answer: true,
                },
                1 => QuestionBody::Numeric {
                    correct_answer: q as f64,
                    tolerance: Some((i % 7) as f64),
                },
                _ => QuestionBody::SingleChoice {
                    answers: (0..(q % 6) + 2)
                        .map(|a| Choice {
                            id: a.to_string(),
                            text: format!("Answer {a}"),
                        })
                        .collect(),
                    correct_answer_index: 0,
                },
            },
        })
        .collect();

    Quiz {
        id: format!("quiz-{i}"),
        name: format!("Quiz {i}"),
        description: String::new(),
        order: (i % 5) as i64,
        group: format!("group-{}/sub-{}", i % 4, i % 3),
        questions,
        estimated_time_seconds: 0,
        difficulty_score: 0,
        difficulty: Default::default(),
    }
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for n in [10usize, 100, 1000] {
        let quizzes: Vec<Quiz> = (0..n).map(generate_quiz).collect();
        let profiles: Vec<QuizProfile> = quizzes.iter().map(QuizProfile::from_quiz).collect();

        group.bench_function(format!("{n}_quizzes"), |b| {
            b.iter(|| normalize(black_box(&quizzes)))
        });
        group.bench_function(format!("{n}_profiles"), |b| {
            b.iter(|| normalize_profiles(black_box(&profiles)))
        });
    }

    group.finish();
}

fn bench_corpus_build(c: &mut Criterion) {
    let quizzes: Vec<Quiz> = (0..200).map(generate_quiz).collect();

    c.bench_function("corpus_new_200", |b| {
        b.iter(|| Corpus::new(black_box(quizzes.clone())))
    });
    c.bench_function("corpus_groups_200", |b| {
        let corpus = Corpus::new(quizzes.clone());
        b.iter(|| black_box(&corpus).groups())
    });
}

criterion_group!(benches, bench_normalize, bench_corpus_build);
criterion_main!(benches);

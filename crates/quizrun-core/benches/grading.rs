use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizrun_core::answers::AnswerStore;
use quizrun_core::grader::grade;
use quizrun_core::parser::parse_quiz_str;
use quizrun_core::submission::compute_score;
use quizrun_core::{AnswerValue, Question, QuestionKind};

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| match i % 3 {
            0 => Question {
                id: format!("q{i}"),
                kind: QuestionKind::MultipleChoice,
                prompt: format!("Question {i}"),
                points: 1,
                options: vec!["alpha".into(), "beta".into(), "gamma".into(), "delta".into()],
                correct_answer: Some(AnswerValue::Number((i % 4) as i64)),
            },
            1 => Question {
                id: format!("q{i}"),
                kind: QuestionKind::TrueFalse,
                prompt: format!("Question {i}"),
                points: 1,
                options: vec![],
                correct_answer: Some("1".into()),
            },
            _ => Question {
                id: format!("q{i}"),
                kind: QuestionKind::Dictation,
                prompt: format!("Question {i}"),
                points: 2,
                options: vec![],
                correct_answer: Some(format!("Word{i}").into()),
            },
        })
        .collect()
}

fn make_answers(questions: &[Question]) -> AnswerStore {
    let mut answers = AnswerStore::new();
    for (i, q) in questions.iter().enumerate() {
        let value = match q.kind {
            QuestionKind::MultipleChoice => AnswerValue::Number((i % 3) as i64),
            QuestionKind::TrueFalse => AnswerValue::Text(" 1 ".into()),
            QuestionKind::Dictation => AnswerValue::Text(format!("  word{i} ")),
        };
        answers.record(q.id.clone(), value);
    }
    answers
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let questions = make_questions(3);
    let answers = make_answers(&questions);

    for q in &questions {
        group.bench_function(q.kind.to_string(), |b| {
            b.iter(|| grade(black_box(q), black_box(answers.get(&q.id))))
        });
    }

    group.finish();
}

fn bench_compute_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_score");

    for size in [10, 100, 1000] {
        let questions = make_questions(size);
        let answers = make_answers(&questions);
        group.bench_function(format!("{size}_questions"), |b| {
            b.iter(|| compute_score(black_box(&questions), black_box(&answers), 70))
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut toml = String::from("[quiz]\nid = \"bench\"\ntime_limit_secs = 600\n");
    for i in 0..100 {
        toml.push_str(&format!(
            "\n[[questions]]\nid = \"q{i}\"\ntype = \"multiple\"\nprompt = \"Question {i}\"\noptions = [\"a\", \"b\", \"c\"]\ncorrect_answer = {}\n",
            i % 3
        ));
    }

    c.bench_function("parse_quiz_100", |b| {
        b.iter(|| parse_quiz_str(black_box(&toml), Path::new("bench.toml")))
    });
}

criterion_group!(benches, bench_grade, bench_compute_score, bench_parse);
criterion_main!(benches);

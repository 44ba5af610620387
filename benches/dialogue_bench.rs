use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use wellbot::diagnosis::rank;
use wellbot::dialogue::DialogueController;
use wellbot::dialogue::phrases::PhrasePicker;
use wellbot::knowledge::{KnowledgeBase, SymptomIndex};
use wellbot::store::SessionStore;

fn bench_rank(c: &mut Criterion) {
    let kb = KnowledgeBase::builtin().expect("builtin kb");
    let vocabulary = SymptomIndex::build(&kb).vocabulary().to_vec();
    let mut group = c.benchmark_group("diagnosis_rank");

    for size in [2usize, 8, 32] {
        let reported: Vec<String> = vocabulary.iter().take(size).cloned().collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(rank(black_box(&reported), &kb)));
        });
    }

    group.finish();
}

fn bench_match_symptoms(c: &mut Criterion) {
    let kb = KnowledgeBase::builtin().expect("builtin kb");
    let index = SymptomIndex::build(&kb);

    c.bench_function("match_symptoms", |b| {
        b.iter(|| {
            black_box(index.match_symptoms(black_box(
                "I've had a headache and a high fever for 3 days, with some बदन दर्द",
            )))
        });
    });
}

fn bench_handle_turn(c: &mut Criterion) {
    let kb = Arc::new(KnowledgeBase::builtin().expect("builtin kb"));
    let bot = DialogueController::new(kb, SessionStore::shared()).with_phrases(PhrasePicker::seeded(1));

    c.bench_function("handle_turn_conversation", |b| {
        b.iter(|| {
            black_box(bot.handle_turn("bench", "hi"));
            black_box(bot.handle_turn("bench", "I have a headache"));
            black_box(bot.handle_turn("bench", "also fever for 3 days"));
        });
    });
}

criterion_group!(benches, bench_rank, bench_match_symptoms, bench_handle_turn);
criterion_main!(benches);

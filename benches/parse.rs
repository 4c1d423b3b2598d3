use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_hand_history::batch::parse_hands;
use rs_hand_history::hand_history::{
    classify, parse_hand,
    test_util::{fixture_file, ANTES_DEAD_BLIND_SHOWDOWN, THREE_HANDED_RIVER_FOLD},
};

fn bench_classify(c: &mut Criterion) {
    let lines: Vec<&str> = ANTES_DEAD_BLIND_SHOWDOWN.lines().collect();
    c.bench_function("classify_hand_lines", |b| {
        b.iter(|| {
            for line in &lines {
                std::hint::black_box(classify(line));
            }
        })
    });
}

fn bench_parse_hand(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_hand");
    for (name, text) in [
        ("three_handed", THREE_HANDED_RIVER_FOLD),
        ("antes_showdown", ANTES_DEAD_BLIND_SHOWDOWN),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| parse_hand(text).unwrap())
        });
    }
    group.finish();
}

fn bench_parse_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_hands");
    for copies in [1usize, 25, 250] {
        let text = vec![fixture_file(); copies].join("\n\n");
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(copies * 4), &text, |b, text| {
            b.iter(|| parse_hands(text))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_parse_hand, bench_parse_file);
criterion_main!(benches);

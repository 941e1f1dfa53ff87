use confmat::{
    classification_report, confusion_to_weighted_f1, format_confusion, ConfusionMatrix,
    FormatConfigBuilder,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

const TAGS: [&str; 4] = ["B", "I", "E", "S"];

/// Builds a BIES matrix over `n_types` entity types. Every gold label is mostly predicted
/// correctly and sometimes confused with its neighbours and with `O`.
fn build_ner_matrix(n_types: usize) -> ConfusionMatrix {
    let mut labels: Vec<String> = vec![String::from("O")];
    for t in 0..n_types {
        for tag in TAGS.iter() {
            labels.push(format!("{}-TYPE{}", tag, t));
        }
    }
    let mut matrix = ConfusionMatrix::new();
    for (i, gold) in labels.iter().enumerate() {
        matrix.add(gold, gold, 1000 + i);
        matrix.add(gold, &labels[(i + 1) % labels.len()], 10 + i % 7);
        matrix.add(gold, &labels[(i * 7 + 3) % labels.len()], 1 + i % 3);
        matrix.add(gold, "O", 5);
    }
    matrix
}

fn benchmark_format(c: &mut Criterion) {
    let matrix = build_ner_matrix(40);
    let wide = FormatConfigBuilder::default().condense_width(None).build();
    let condensed = FormatConfigBuilder::default().hide_zeroes(true).build();
    c.bench_function("format_full_matrix", |b| {
        b.iter(|| format_confusion(black_box(&matrix), &wide))
    });
    c.bench_function("format_condensed_matrix", |b| {
        b.iter(|| format_confusion(black_box(&matrix), &condensed))
    });
}

fn benchmark_report(c: &mut Criterion) {
    let matrix = build_ner_matrix(40);
    c.bench_function("weighted_f1", |b| {
        b.iter(|| confusion_to_weighted_f1(black_box(&matrix), &["O"]).unwrap())
    });
    c.bench_function("classification_report", |b| {
        b.iter(|| classification_report(black_box(&matrix), &["O"]).unwrap())
    });
}

criterion_group!(
    name=confusion_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets = benchmark_format,
    benchmark_report
);
criterion_main!(confusion_benches);

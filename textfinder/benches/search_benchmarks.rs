use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use textfinder::{search, Corpus};

fn create_corpus(line_count: usize) -> Corpus {
    Corpus::from_lines((0..line_count).map(|i| {
        format!(
            "Line {} lorem ipsum dolor sit amet, consectetur lorem adipiscing elit {}",
            i, i
        )
    }))
}

fn bench_worker_scaling(c: &mut Criterion) {
    let corpus = create_corpus(50_000);

    let mut group = c.benchmark_group("Worker Scaling");
    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &n| {
            b.iter(|| black_box(search(&corpus, "lorem", n).unwrap()));
        });
    }
    group.finish();
}

fn bench_corpus_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Corpus Scaling");
    for lines in [1_000, 10_000, 100_000] {
        let corpus = create_corpus(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &corpus, |b, corpus| {
            b.iter(|| black_box(search(corpus, "ipsum", 4).unwrap()));
        });
    }
    group.finish();
}

fn bench_target_length(c: &mut Criterion) {
    let corpus = create_corpus(20_000);
    let targets = ["L", "lorem", "consectetur lorem", "not present anywhere"];

    let mut group = c.benchmark_group("Target Length");
    for (i, target) in targets.iter().enumerate() {
        group.bench_function(format!("target_{}", i), |b| {
            b.iter(|| black_box(search(&corpus, target, 4).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_worker_scaling,
    bench_corpus_scaling,
    bench_target_length
);
criterion_main!(benches);

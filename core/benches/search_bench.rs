use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use search_core::{DocumentStatus, ExecutionMode, SearchServer};

fn dictionary(rng: &mut StdRng, size: usize) -> Vec<String> {
    (0..size)
        .map(|_| {
            let len = rng.gen_range(3..10);
            (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
        })
        .collect()
}

fn build_server(rng: &mut StdRng, words: &[String], docs: usize) -> SearchServer {
    let mut server = SearchServer::with_stop_words("and in on with").unwrap();
    for id in 0..docs {
        let len = rng.gen_range(10..70);
        let text: Vec<&str> = (0..len)
            .map(|_| words.choose(rng).unwrap().as_str())
            .collect();
        server
            .add_document(id as i32, &text.join(" "), DocumentStatus::Actual, &[1, 2, 3])
            .unwrap();
    }
    server
}

fn random_query(rng: &mut StdRng, words: &[String], size: usize) -> String {
    (0..size)
        .map(|i| {
            let word = words.choose(rng).unwrap();
            if i % 10 == 0 { format!("-{word}") } else { word.clone() }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_find_top(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let words = dictionary(&mut rng, 2_000);
    let server = build_server(&mut rng, &words, 10_000);
    let queries: Vec<String> = (0..20).map(|_| random_query(&mut rng, &words, 70)).collect();

    let mut group = c.benchmark_group("find_top_documents");
    for (name, mode) in [("seq", ExecutionMode::Sequential), ("par", ExecutionMode::Parallel)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &mode, |b, &mode| {
            b.iter(|| {
                for query in &queries {
                    server
                        .find_top_documents_with(mode, query, DocumentStatus::Actual.filter())
                        .unwrap();
                }
            })
        });
    }
    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let words = dictionary(&mut rng, 1_000);
    let server = build_server(&mut rng, &words, 2_000);
    let query = random_query(&mut rng, &words, 300);

    let mut group = c.benchmark_group("match_document");
    for (name, mode) in [("seq", ExecutionMode::Sequential), ("par", ExecutionMode::Parallel)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &mode, |b, &mode| {
            b.iter(|| {
                for id in &server {
                    server.match_document_with(mode, &query, id).unwrap();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_top, bench_match);
criterion_main!(benches);

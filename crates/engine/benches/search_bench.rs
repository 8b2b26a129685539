use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::board::Position;
use engine::io::parse_fen;
use engine::search::Searcher;

fn mtd_startpos_10k_nodes(c: &mut Criterion) {
    let pos = Position::initial();
    c.bench_function("mtd-bi startpos 10k nodes", |b| {
        b.iter(|| {
            let mut searcher = Searcher::with_max_nodes(10_000);
            searcher.search(black_box(&pos))
        })
    });
}

fn mtd_lauwen_10k_nodes(c: &mut Criterion) {
    let fen = "W:W15,19,24,29,32,41,49,50:B5,8,30,35,37,40,42,45";
    let (_, pos) = parse_fen(fen).unwrap();
    c.bench_function("mtd-bi lauwen 10k nodes", |b| {
        b.iter(|| {
            let mut searcher = Searcher::with_max_nodes(10_000);
            searcher.search(black_box(&pos))
        })
    });
}

fn window_startpos_10k_nodes(c: &mut Criterion) {
    let pos = Position::initial();
    c.bench_function("alpha-beta startpos 10k nodes", |b| {
        b.iter(|| {
            let mut searcher = Searcher::with_max_nodes(10_000);
            searcher.search_window(black_box(&pos))
        })
    });
}

fn forced_lauwen_10k_nodes(c: &mut Criterion) {
    let fen = "W:W15,19,24,29,32,41,49,50:B5,8,30,35,37,40,42,45";
    let (_, pos) = parse_fen(fen).unwrap();
    c.bench_function("forced lauwen 10k nodes", |b| {
        b.iter(|| {
            let mut searcher = Searcher::with_max_nodes(10_000);
            searcher.search_forced(black_box(&pos))
        })
    });
}

criterion_group!(
    benches,
    mtd_startpos_10k_nodes,
    mtd_lauwen_10k_nodes,
    window_startpos_10k_nodes,
    forced_lauwen_10k_nodes,
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use me::syntax::{detect, highlight_line};
use std::hint::black_box;

const SOURCE_LINE: &str =
    "static uint32_t parse_header(const char *buf, size_t len) { return 0xFF & len; } // fast path";

fn highlight_c_line(c: &mut Criterion) {
    let syntax = detect("bench.c");
    c.bench_function("highlight_c_line", |b| {
        b.iter(|| highlight_line(black_box(SOURCE_LINE.as_bytes()), syntax, false))
    });
}

fn highlight_comment_block(c: &mut Criterion) {
    let syntax = detect("bench.c");
    let line = "x".repeat(200);
    c.bench_function("highlight_open_comment_200", |b| {
        b.iter(|| highlight_line(black_box(line.as_bytes()), syntax, true))
    });
}

criterion_group!(benches, highlight_c_line, highlight_comment_block);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use schemini::{Environment, evaluate, lexer::tokenize, parser::parse_str};

// A reasonably nested arithmetic expression for benchmarking
const BENCH_INPUT: &str = "(+ (* 2 (+ 4 5) (- 10 3.5))
    (/ 100 (+ 1 (* 2 2)) 2)
    (- (+ 1 2 3 4 5 6 7 8 9 10)
       (* 1.5 (+ 2 2) (/ 8 2 2)))
    (+ (* (+ 1 1) (+ 2 2) (+ 3 3))
       (- 0 (/ 1 3))
       (* 2.718 (+ 3.14 (- 1 0.5)))))";

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Interpreter Pipeline");

    group.bench_with_input(
        BenchmarkId::new("tokenize", "nested_arithmetic"),
        &BENCH_INPUT,
        |b, input| b.iter(|| tokenize(black_box(input))),
    );

    group.bench_with_input(
        BenchmarkId::new("parse", "nested_arithmetic"),
        &BENCH_INPUT,
        |b, input| b.iter(|| parse_str(black_box(input))),
    );

    // Parse once, then benchmark pure tree-walking evaluation
    let tree = parse_str(BENCH_INPUT).expect("bench input should parse");
    let mut env = Environment::new();
    group.bench_function("evaluate", |b| {
        b.iter(|| evaluate(black_box(&tree), &mut env))
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

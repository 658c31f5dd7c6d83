use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqlang::script::{parse_program, CollectOutput, Interpreter};

const PI_SERIES: &str = "var n = 5000\n\
    var sequence = map({0, n}, i -> (-1)^i / (2 * i + 1))\n\
    var pi = 4 * reduce(sequence, 0.0, x y -> x + y)\n\
    print \"pi = \"\n\
    out pi";

const NESTED: &str = "out reduce(map({1, 200}, x -> reduce({1, x}, 0, a b -> a + b * x)), 0, a b -> a + b)";

fn make_program(statements: usize) -> String {
    (0..statements)
        .map(|i| format!("var v{i} = {i} * 2 + (3 - 1) ^ 2 / 4.0\nout map({{1, 5}}, x -> x * v{i})\n"))
        .collect()
}

fn run(src: &str) -> usize {
    let mut interp = Interpreter::new(CollectOutput::new());
    interp.run_source(src).expect("benchmark program runs");
    interp.output().lines.len()
}

fn bench_eval(c: &mut Criterion) {
    let mut g = c.benchmark_group("eval");
    g.bench_function("pi_series", |b| b.iter(|| run(black_box(PI_SERIES))));
    g.bench_function("nested_closures", |b| b.iter(|| run(black_box(NESTED))));
    g.finish();
}

fn bench_parse(c: &mut Criterion) {
    let small = make_program(10);
    let large = make_program(1000);

    let mut g = c.benchmark_group("parse");
    g.bench_function("small", |b| b.iter(|| parse_program(black_box(&small))));
    g.bench_function("large", |b| b.iter(|| parse_program(black_box(&large))));
    g.finish();
}

criterion_group!(benches, bench_eval, bench_parse);
criterion_main!(benches);

//! Lexer throughput benchmarks.
//!
//! Run with: `cargo bench --bench lexer_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ilc_lex::Lexer;
use ilc_util::{FileId, Handler};

const KEYWORDS_SOURCE: &str = r#"
routine main() is
    var x : integer is 1;
    var y : integer is 2;
    if x < y then
        print x;
    else
        print y;
    end
end
"#;

const EXPR_SOURCE: &str = "x := (a + b) * c - d / e % f <= g and h or not i;";

const ARRAY_RECORD_SOURCE: &str = r#"
type Point is record
    var x : integer;
    var y : integer;
end;

routine sum(arr : array[10] integer) : integer is
    var total : integer is 0;
    for i in 0 .. 9 loop
        total := total + arr[i];
    end
    return total;
end
"#;

fn count_tokens(source: &str) -> usize {
    let handler = Handler::new();
    let lexer = Lexer::new(source, FileId(0), &handler);
    lexer.count()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_keywords");
    group.throughput(Throughput::Bytes(KEYWORDS_SOURCE.len() as u64));
    group.bench_function("routine_with_if_else", |b| {
        b.iter(|| black_box(count_tokens(KEYWORDS_SOURCE)))
    });
    group.finish();
}

fn bench_lexer_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_expressions");
    group.throughput(Throughput::Bytes(EXPR_SOURCE.len() as u64));
    group.bench_function("mixed_operators", |b| {
        b.iter(|| black_box(count_tokens(EXPR_SOURCE)))
    });
    group.finish();
}

fn bench_lexer_array_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_array_record");
    group.throughput(Throughput::Bytes(ARRAY_RECORD_SOURCE.len() as u64));
    group.bench_function("record_and_loop", |b| {
        b.iter(|| black_box(count_tokens(ARRAY_RECORD_SOURCE)))
    });
    group.finish();
}

fn bench_lexer_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_scaling");

    for &repeats in &[1usize, 10, 100] {
        let source = KEYWORDS_SOURCE.repeat(repeats);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("repeated_routine", repeats),
            &source,
            |b, s| b.iter(|| black_box(count_tokens(s))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_expressions,
    bench_lexer_array_record,
    bench_lexer_scaling
);
criterion_main!(benches);

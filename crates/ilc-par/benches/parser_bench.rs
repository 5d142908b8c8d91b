//! Parser throughput benchmarks.
//!
//! Run with: `cargo bench --package ilc-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ilc_par::{parse, Program};
use ilc_util::{FileId, Handler};

fn parse_source(source: &str) -> Program {
    let handler = Handler::new();
    parse(source, FileId(0), &handler).expect("benchmark source must parse")
}

fn bench_parser_var_decl(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_var_decl");

    let source = "var x : integer is 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("single_var_decl", |b| {
        b.iter(|| black_box(parse_source(source)))
    });

    group.finish();
}

fn bench_parser_routine(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_routine");

    let source = r#"
        routine main() is
            var x : integer is 42;
            var y : integer is x + 1;
            return y;
        end
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("routine_with_locals", |b| {
        b.iter(|| black_box(parse_source(source)))
    });

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        routine classify(n : integer) : integer is
            if n < 0 then
                return 0;
            else
                for i in 1 .. n loop
                    print(i);
                end
                return 1;
            end
        end
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_if_for", |b| {
        b.iter(|| black_box(parse_source(source)))
    });

    group.finish();
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_scaling");

    let unit = "var x : integer is 1 + 2 * 3;\n";
    for &repeats in &[1usize, 10, 100] {
        let source = unit.repeat(repeats);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(format!("repeated_decls_{repeats}"), |b| {
            b.iter(|| black_box(parse_source(&source)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_var_decl,
    bench_parser_routine,
    bench_parser_control_flow,
    bench_parser_scaling
);
criterion_main!(benches);

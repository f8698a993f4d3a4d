//! Resolver throughput on nested brackets and on a typical method body.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jcpp::{MethodContext, TranslateOptions, parse_body, translate_method_body};

fn nested_parens(depth: usize) -> String {
    format!("x = {}a{};", "(".repeat(depth), ")".repeat(depth))
}

fn bench_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver_nesting");
    for depth in [10usize, 50, 200] {
        let line = nested_parens(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &line, |b, line| {
            b.iter(|| {
                let body = parse_body(
                    MethodContext::named("bench"),
                    TranslateOptions::default(),
                    [black_box(line.as_str())],
                )
                .unwrap();
                black_box(body.stats().max_depth)
            });
        });
    }
    group.finish();
}

const BODY: &[&str] = &[
    "int total = 0;",
    "List<Shape> copy = new ArrayList<Shape>(items);",
    "for (int i = 0; i < copy.size(); i++) {",
    "    Shape s = copy.get(i);",
    "    if (s != null && s.area() > limit * 2 + offset) {",
    "        total += s.area();",
    "    } else if (s instanceof Circle) {",
    "        total -= ((Circle) s).radius();",
    "    }",
    "}",
    "String label = \"total: \" + total;",
    "return label;",
];

fn bench_method(c: &mut Criterion) {
    let context = MethodContext::named("sum").with_parameter("items", "ArrayList<Shape>");
    c.bench_function("translate_method", |b| {
        b.iter(|| {
            translate_method_body(context.clone(), black_box(BODY), TranslateOptions::default())
                .unwrap()
                .code
                .len()
        });
    });
}

criterion_group!(benches, bench_nesting, bench_method);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vortex::lexer::tokenize;
use vortex::{List, MemoryStore, Value, load, parse};

fn large_program() -> String {
    let mut source = String::from("Schema Person { name string age int }\nEdge Knows TwoWay\n");
    for i in 0..500 {
        source.push_str(&format!(
            "Vertex P{i} Person {{ .name = \"person {i}\" .age = {} }}\n",
            i % 90
        ));
    }
    for i in 1..500 {
        source.push_str(&format!("Relation Knows {{ P{} P{i} }}\n", i - 1));
    }
    source.push_str(
        "Query Sum(Person as P { [1..3]Knows Person { .age > P.age + 1 and .name != \"x\" } })\n",
    );
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = large_program();
    c.bench_function("tokenize_program", |b| {
        b.iter(|| tokenize(black_box(&source)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = large_program();
    c.bench_function("parse_program", |b| {
        b.iter(|| parse(black_box(&source)).unwrap())
    });
}

fn bench_load(c: &mut Criterion) {
    let source = large_program();
    c.bench_function("load_program", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            load(black_box(&source), &mut store).unwrap()
        })
    });
}

fn bench_set_algebra(c: &mut Criterion) {
    let left = List::new((0..5_000).rev().map(Value::Int).collect()).unwrap();
    let right = List::new((2_500..7_500).map(Value::Int).collect()).unwrap();

    c.bench_function("list_intersect", |b| {
        b.iter(|| black_box(&left).intersect(black_box(&right)).unwrap())
    });
    c.bench_function("list_union", |b| {
        b.iter(|| black_box(&left).union(black_box(&right)).unwrap())
    });
}

criterion_group!(
    hot_paths,
    bench_tokenize,
    bench_parse,
    bench_load,
    bench_set_algebra
);
criterion_main!(hot_paths);

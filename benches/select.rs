use criterion::{black_box, criterion_group, criterion_main, Criterion};
use percolate_query::{Database, QueryEngine};
use serde_json::{json, Value};

fn engine(rows: usize) -> QueryEngine {
    let people: Vec<Value> = (0..rows)
        .map(|i| json!({"id": i, "name": format!("person-{}", i), "age": i % 90}))
        .collect();
    let badges: Vec<Value> = (0..rows)
        .map(|i| json!({"id": if i % 3 == 0 { i } else { i + 1 }, "badge": format!("B{}", i)}))
        .collect();

    let db = Database::from_value(json!({"people": people, "badges": badges}))
        .expect("benchmark fixture is well formed");
    QueryEngine::new(db)
}

fn bench_select(c: &mut Criterion) {
    let engine = engine(10_000);

    c.bench_function("parse", |b| {
        b.iter(|| {
            QueryEngine::parse(black_box(
                "SELECT people.name, people.age FROM people WHERE people.name = 'person-42'",
            ))
        })
    });

    c.bench_function("scan_project_10k", |b| {
        b.iter(|| engine.execute(black_box("SELECT people.name FROM people")))
    });

    c.bench_function("filter_literal_10k", |b| {
        b.iter(|| engine.execute(black_box("SELECT people.name FROM people WHERE people.age >= 45")))
    });

    c.bench_function("positional_merge_10k", |b| {
        b.iter(|| {
            engine.execute(black_box(
                "SELECT people.name, badges.badge FROM people, badges WHERE people.id = badges.id",
            ))
        })
    });
}

criterion_group!(benches, bench_select);
criterion_main!(benches);

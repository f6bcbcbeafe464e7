//! Benchmarks for parsing and serializing multi-table documents.
//!
//! Run with: cargo bench -p ttl-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Three related tables with `rows` rows each
fn build_document(rows: usize) -> String {
    let mut out = String::from("# generated benchmark input\n");

    out.push_str("#! User\n#@ id:uint, name:str, email:str?, active:bool\n");
    for i in 0..rows {
        out.push_str(&format!("{}, User {}, user{}@example.com, {}\n", i, i, i, i % 2 == 0));
    }

    out.push_str("\n#! Product\n#@ id:uint, title:text, price:decimal(10,2), tags:str[]?\n");
    for i in 0..rows {
        out.push_str(&format!("{}, \"Product \"\"{}\"\", boxed\", {}.99,\n", i, i, i % 500));
    }

    out.push_str(
        "\n#! Order\n#@ id:uint, user:ref(User.id), product:ref(Product.id), status:enum(pending|shipped|delivered)\n",
    );
    for i in 0..rows {
        out.push_str(&format!("{}, {}, {}, shipped\n", i, i % 97, i % 89));
    }

    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rows in [100, 1_000, 10_000] {
        let input = build_document(rows);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", rows), &input, |b, input| {
            b.iter(|| ttl_core::parse(black_box(input)))
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for rows in [100, 1_000, 10_000] {
        let doc = match ttl_core::parse(&build_document(rows)) {
            Ok(doc) => doc,
            Err(e) => panic!("benchmark input must parse: {}", e),
        };

        group.bench_with_input(BenchmarkId::new("compact", rows), &doc, |b, doc| {
            b.iter(|| ttl_core::serialize(black_box(doc), false))
        });
        group.bench_with_input(BenchmarkId::new("pretty", rows), &doc, |b, doc| {
            b.iter(|| ttl_core::serialize(black_box(doc), true))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize);
criterion_main!(benches);

//! Construction Benchmarks
//!
//! Measures the cost of building value objects and entities through the
//! attribute pipeline (coerce, kind check, preconditions, postconditions,
//! invariants).

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use domain_objects::{AttrKind, AttrValue, ValueObjectType, entity, field, value_object};
use std::collections::HashSet;

fn money_type() -> ValueObjectType {
    value_object("Money")
        .field(
            field("amount", AttrKind::Integer)
                .precondition(|v: &AttrValue| v.as_i64().is_some_and(|n| n >= 0)),
        )
        .field(
            field("currency", AttrKind::Text)
                .default("EUR")
                .coerce(|v| Ok(v.as_str().map(|s| s.to_uppercase().into()).unwrap_or(v)))
                .postcondition(|v: &AttrValue| v.as_str().is_some_and(|s| s.len() == 3)),
        )
        .unregistered()
        .build()
        .unwrap()
}

fn wide_type(width: usize) -> ValueObjectType {
    value_object(format!("Wide{width}"))
        .fields((0..width).map(|idx| field(format!("f{idx}"), AttrKind::Integer)))
        .unregistered()
        .build()
        .unwrap()
}

fn bench_value_object_construction(c: &mut Criterion) {
    let money = money_type();
    let mut group = c.benchmark_group("value_object_construction");

    group.bench_function("keyword", |b| {
        b.iter(|| {
            let price = money
                .construct([("amount", AttrValue::from(42)), ("currency", "usd".into())])
                .unwrap();
            black_box(price)
        });
    });

    group.bench_function("positional_with_default", |b| {
        b.iter(|| black_box(money.construct_positional([42]).unwrap()));
    });

    group.bench_function("rejected_precondition", |b| {
        b.iter(|| black_box(money.construct([("amount", -1)]).is_err()));
    });

    for width in [4usize, 16, 64] {
        let ty = wide_type(width);
        group.bench_with_input(BenchmarkId::new("wide", width), &width, |b, &width| {
            b.iter(|| black_box(ty.construct_positional(0..width as i64).unwrap()));
        });
    }

    group.finish();
}

fn bench_equality_and_hashing(c: &mut Criterion) {
    let money = money_type();
    let values: Vec<_> = (0..1_000)
        .map(|n| money.construct([("amount", n % 100)]).unwrap())
        .collect();

    c.bench_function("value_object_dedup_1000", |b| {
        b.iter(|| {
            let set: HashSet<_> = values.iter().cloned().collect();
            black_box(set.len())
        });
    });
}

fn bench_entity_mutation(c: &mut Criterion) {
    let account = entity("Account")
        .id_attr("id")
        .field(field("id", AttrKind::Integer))
        .field(field("balance", AttrKind::Integer))
        .invariant(|fields| (fields.get("balance").and_then(AttrValue::as_i64).unwrap_or(0) >= 0, "overdrawn"))
        .build()
        .unwrap();

    c.bench_function("entity_set_with_invariant", |b| {
        let mut instance = account.construct([("id", 1), ("balance", 0)]).unwrap();
        let mut n = 0i64;
        b.iter(|| {
            n += 1;
            instance.set("balance", n).unwrap();
            black_box(instance.get("balance").cloned())
        });
    });
}

criterion_group!(
    benches,
    bench_value_object_construction,
    bench_equality_and_hashing,
    bench_entity_mutation
);
criterion_main!(benches);

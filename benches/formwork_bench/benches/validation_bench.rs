//! Sync validation hot path benchmarks:
//! - Rule set evaluation
//! - `set_value` with cross-field re-validation
//! - Collection growth and error snapshots
//!
//! Run with: cargo bench --package formwork-bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formwork::prelude::*;

fn username_rules() -> RuleSet {
    RuleSet::new()
        .rule(RequiredRule::new())
        .rule(MinLengthRule::new(3))
        .rule(ReservedValueRule::new(["strider", "admin", "root"]))
}

fn benchmark_rule_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_set");

    let rules = username_rules();
    for input in ["", "ab", "Strider", "axel"] {
        let value = Value::from(input);
        group.bench_with_input(BenchmarkId::new("username", input), &value, |b, value| {
            b.iter(|| black_box(rules.evaluate(black_box(value))))
        });
    }

    let email = RuleSet::new()
        .rule(RequiredRule::new())
        .rule(PatternRule::email());
    let value = Value::from("axelmtz@gmail.com");
    group.bench_function("email_pattern", |b| {
        b.iter(|| black_box(email.evaluate(black_box(&value))))
    });

    let messages = MessageCatalog::default();
    let error = ErrorDescriptor::MinLength {
        required: 6,
        actual: 2,
    };
    group.bench_function("message_for", |b| {
        b.iter(|| black_box(messages.message_for(black_box(&error))))
    });

    group.finish();
}

fn benchmark_form_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("form");

    // password2 has no async rules, so nothing is scheduled here
    let mut form = forms::register_form(ValidationContext::new()).unwrap();
    let mut toggle = false;
    group.bench_function("set_value_with_cross_rule", |b| {
        b.iter(|| {
            toggle = !toggle;
            let value = if toggle { "secret1" } else { "secret2" };
            form.set_value("password2", black_box(value)).unwrap();
            black_box(form.cross_error().is_some())
        })
    });

    for size in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("grow_collection", size), &size, |b, &size| {
            b.iter(|| {
                let mut form = forms::dynamic_form().unwrap();
                for i in 0..size {
                    form.add_item("favoriteGames", format!("Game {i}")).unwrap();
                }
                black_box(form.errors())
            })
        });
    }

    let mut form = forms::dynamic_form().unwrap();
    for i in 0..100 {
        let value = if i % 4 == 0 { String::new() } else { format!("Game {i}") };
        form.add_item("favoriteGames", value).unwrap();
    }
    group.bench_function("error_snapshot_json", |b| {
        b.iter(|| black_box(serde_json::to_string(&form.errors()).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, benchmark_rule_sets, benchmark_form_updates);
criterion_main!(benches);

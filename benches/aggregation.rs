use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finance_tracker::domain::{Transaction, TransactionKind};
use finance_tracker::summary::summarize;
use finance_tracker::view::{filter_and_sort, TransactionQuery};
use rust_decimal::Decimal;

const CATEGORIES: [&str; 6] = ["Food", "Housing", "Transport", "Gifts", "Shopping", ""];

fn synthetic(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
    (0..count)
        .map(|i| {
            let kind = if i % 5 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            Transaction::new(
                kind,
                format!("entry {i}"),
                Decimal::from(1_000 + (i as i64 % 97) * 250),
                start + Duration::days((i % 365) as i64),
                CATEGORIES[i % CATEGORIES.len()],
            )
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    for size in [100usize, 1_000, 10_000] {
        let transactions = synthetic(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &transactions, |b, txns| {
            b.iter(|| summarize(black_box(txns)))
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let transactions = synthetic(10_000);
    let query = TransactionQuery::new("entry 1", "Food".into());
    c.bench_function("filter_and_sort_10k", |b| {
        b.iter(|| filter_and_sort(black_box(&transactions), black_box(&query)))
    });
}

criterion_group!(benches, bench_summarize, bench_filter);
criterion_main!(benches);

mod common;

use common::{date, txn};
use finance_tracker::domain::TransactionKind::{Expense, Income};
use finance_tracker::repository::SeedData;
use finance_tracker::view::{filter_and_sort, CategoryFilter, TransactionQuery};

fn descriptions(query: &TransactionQuery) -> Vec<String> {
    let seed = SeedData::builtin().unwrap();
    filter_and_sort(&seed.transactions, query)
        .into_iter()
        .map(|txn| txn.description)
        .collect()
}

#[test]
fn search_is_case_insensitive_substring() {
    assert_eq!(
        descriptions(&TransactionQuery::search("lunch")),
        vec!["Lunch with Bob"]
    );
    assert_eq!(
        descriptions(&TransactionQuery::search("LUNCH WITH")),
        vec!["Lunch with Bob"]
    );
}

#[test]
fn empty_query_returns_everything_newest_first() {
    let seed = SeedData::builtin().unwrap();
    let visible = filter_and_sort(&seed.transactions, &TransactionQuery::default());
    assert_eq!(visible.len(), seed.transactions.len());
    assert!(visible.windows(2).all(|pair| pair[0].date >= pair[1].date));
    assert_eq!(visible[0].description, "New headphones");
}

#[test]
fn equal_dates_keep_collection_order() {
    let tie = date(2026, 1, 1);
    let transactions = vec![
        txn(Expense, "first", 1, tie, "Food"),
        txn(Income, "second", 1, tie, ""),
        txn(Expense, "newer", 1, date(2026, 1, 2), "Food"),
    ];

    let visible = filter_and_sort(&transactions, &TransactionQuery::default());
    let order: Vec<_> = visible.iter().map(|txn| txn.description.as_str()).collect();
    assert_eq!(order, vec!["newer", "first", "second"]);
}

#[test]
fn category_filter_is_exact() {
    assert_eq!(
        descriptions(&TransactionQuery::category("Food")),
        vec!["Lunch with Bob", "Weekly groceries"]
    );
    assert!(descriptions(&TransactionQuery::category("food")).is_empty());
    assert_eq!(descriptions(&TransactionQuery::category("All")).len(), 10);
}

#[test]
fn search_and_category_combine() {
    let query = TransactionQuery::new("o", CategoryFilter::Named("Salary".into()));
    assert_eq!(
        descriptions(&query),
        vec!["Freelance design project", "Monthly salary"]
    );
}

#[test]
fn filtered_view_is_a_subset_of_the_collection() {
    let seed = SeedData::builtin().unwrap();
    let query = TransactionQuery::search("e");
    let visible = filter_and_sort(&seed.transactions, &query);
    assert!(visible.iter().all(|txn| seed.transactions.contains(txn)));
    assert!(visible.iter().all(|txn| query.matches(txn)));
    let hidden = seed.transactions.iter().filter(|txn| !query.matches(txn)).count();
    assert_eq!(visible.len() + hidden, seed.transactions.len());
}

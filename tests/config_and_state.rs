mod common;

use std::fs;

use common::{amount, date, seeded_state};
use finance_tracker::config::{Config, ConfigManager};
use finance_tracker::domain::{CategoryDraft, TransactionDraft, TransactionKind};
use finance_tracker::repository::{Latency, SeedData};
use finance_tracker::state::FinanceState;
use finance_tracker::store::{MutationOrdering, StoreStatus};
use finance_tracker::view::TransactionQuery;
use tempfile::tempdir;

#[test]
fn missing_config_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.currency_code().as_str(), "IDR");
    assert_eq!(config.ordering, MutationOrdering::Interleaved);
}

#[test]
fn saved_config_is_read_back() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
    let config = Config {
        locale: "en-US".into(),
        latency: Latency::none(),
        ordering: MutationOrdering::Serialized,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    assert!(manager.path().ends_with("config/config.json"));
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn partial_config_keeps_remaining_defaults() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
    fs::write(manager.path(), r#"{ "ordering": "serialized" }"#).unwrap();

    let config = manager.load().unwrap();
    assert_eq!(config.ordering, MutationOrdering::Serialized);
    assert_eq!(config.locale, "id-ID");
    assert_eq!(config.latency, Latency::default());
}

#[test]
fn partial_latency_fills_missing_field() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
    fs::write(manager.path(), r#"{ "latency": { "load_ms": 0 } }"#).unwrap();

    let config = manager.load().unwrap();
    assert_eq!(config.latency, Latency::new(0, Latency::default().mutation_ms));
}

#[test]
fn seed_directory_overrides_builtin_data() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("categories.json"),
        r#"[{ "id": "0b6f5a3e-1c2d-4e8f-9a01-0000000000aa", "name": "Pets" }]"#,
    )
    .unwrap();
    fs::write(dir.path().join("transactions.json"), "[]").unwrap();

    let seed = SeedData::resolve(Some(dir.path())).unwrap();
    assert_eq!(seed.categories.len(), 1);
    assert!(seed.transactions.is_empty());

    let missing = SeedData::resolve(Some(&dir.path().join("absent")));
    assert!(missing.unwrap_err().to_string().contains("absent"));
}

#[tokio::test]
async fn state_summary_follows_committed_changes() {
    let state = seeded_state();
    assert_eq!(state.transactions.status(), StoreStatus::Idle);
    state.ensure_loaded().await.unwrap();

    let before = state.summary();
    assert_eq!(before.net_balance, amount(5_989_000));

    state
        .transactions
        .create(TransactionDraft::expense(
            "Dinner",
            amount(11_000),
            date(2026, 2, 20),
            "",
        ))
        .await
        .unwrap();

    let after = state.summary();
    assert_eq!(after.total_expenses, amount(4_022_000));
    assert_eq!(after.category_breakdown.labels().last(), Some(&"Uncategorized"));

    let visible = state.visible_transactions(&TransactionQuery::search("dinner"));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].kind, TransactionKind::Expense);
}

#[tokio::test]
async fn rejected_mutation_leaves_summary_untouched() {
    let state = seeded_state();
    state.ensure_loaded().await.unwrap();
    let before = state.summary();

    let invalid = TransactionDraft::expense("", amount(10), date(2026, 2, 20), "Food");
    assert!(state.transactions.create(invalid).await.is_err());
    assert_eq!(state.summary(), before);
}

#[tokio::test]
async fn state_built_from_config() {
    let config = Config {
        latency: Latency::none(),
        ..Config::default()
    };
    let state = FinanceState::from_config(&config).unwrap();
    state.reload().await.unwrap();
    assert!(state.is_loaded());
    assert_eq!(state.category_names().len(), 8);

    state
        .categories
        .create(CategoryDraft::new("Pets"))
        .await
        .unwrap();
    assert_eq!(state.category_names().last().map(String::as_str), Some("Pets"));
}

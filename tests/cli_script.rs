use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn home_without_latency() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.json"),
        r#"{ "latency": { "load_ms": 0, "mutation_ms": 0 }, "color": false }"#,
    )
    .unwrap();
    home
}

fn run_script(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("finance_tracker_cli")
        .unwrap()
        .env("FINANCE_TRACKER_CLI_SCRIPT", "1")
        .env("FINANCE_TRACKER_HOME", home)
        .env("RUST_LOG", "off")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn script_mode_prints_seed_summary() {
    let home = home_without_latency();
    run_script(home.path(), "summary\nexit\n")
        .success()
        .stdout(contains("=== Summary ==="))
        .stdout(contains("Rp 10.000.000"))
        .stdout(contains("Rp 5.989.000"))
        .stdout(contains("Housing"));
}

#[test]
fn search_lists_matching_transactions() {
    let home = home_without_latency();
    run_script(home.path(), "list --search lunch\n")
        .success()
        .stdout(contains("Lunch with Bob"))
        .stdout(contains("1 transaction(s)"))
        .stdout(contains("Weekly groceries").not());
}

#[test]
fn duplicate_category_is_reported_and_shell_continues() {
    let home = home_without_latency();
    let script = "# categories\ncategory add food\ncategory add Pets\ncategory list\n";
    run_script(home.path(), script)
        .success()
        .stdout(contains("already exists"))
        .stdout(contains("Category `Pets` added."))
        .stdout(predicate::str::is_match(r"(?m)^[0-9a-f]{8}\s+Pets").unwrap());
}

#[test]
fn added_expense_updates_totals() {
    let home = home_without_latency();
    let script = "\
transaction add expense 11000 Late dinner --date 2026-02-20\n\
summary\n";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Added expense `Late dinner` (-Rp 11.000)"))
        .stdout(contains("Rp 4.022.000"))
        .stdout(contains("Uncategorized"));
}

#[test]
fn invalid_amount_is_rejected_without_changes() {
    let home = home_without_latency();
    run_script(home.path(), "transaction add expense -5 Refund\nsummary\n")
        .success()
        .stdout(contains("greater than 0"))
        .stdout(contains("Rp 4.011.000"));
}

#[test]
fn deleting_used_category_warns_but_proceeds() {
    let home = home_without_latency();
    run_script(home.path(), "category delete Food\nlist --category Food\n")
        .success()
        .stdout(contains("2 transactions still use category `Food`"))
        .stdout(contains("Category `Food` deleted."))
        .stdout(contains("2 transaction(s)"));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = home_without_latency();
    run_script(home.path(), "sumary\n")
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn exit_stops_reading_the_script() {
    let home = home_without_latency();
    run_script(home.path(), "exit\nsummary\n")
        .success()
        .stdout(contains("Total income").not());
}

#[test]
fn added_transaction_reports_short_id() {
    let home = home_without_latency();
    let output = run_script(
        home.path(),
        "transaction add income 250000 Tutoring --category Salary --date 2026-02-21\n",
    )
    .success()
    .get_output()
    .stdout
    .clone();
    let stdout = String::from_utf8(output).unwrap();

    let pattern =
        regex::Regex::new(r"Added income `Tutoring` \(\+Rp 250\.000\) as ([0-9a-f]{8})\.").unwrap();
    let captures = pattern.captures(&stdout).expect("success line");
    assert_eq!(captures[1].len(), 8);
}

#[test]
fn transaction_delete_accepts_full_id() {
    let home = home_without_latency();
    let script = "\
transaction delete 5d2e8c41-7a9b-4c3d-8e1f-000000000004\n\
list --search lunch\n";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Deleted transaction 5d2e8c41."))
        .stdout(contains("No transactions match."));
}

#[test]
fn quoted_multi_word_category_can_be_renamed() {
    let home = home_without_latency();
    let script = "\
category add \"Eating Out\"\n\
category rename \"Eating Out\" Dining\n\
category list\n";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Category `Eating Out` renamed to `Dining`."))
        .stdout(predicate::str::is_match(r"(?m)^[0-9a-f]{8}\s+Dining$").unwrap());
}

#[test]
fn config_set_persists_to_disk() {
    let home = home_without_latency();
    run_script(home.path(), "config set ordering serialized\nconfig show\n")
        .success()
        .stdout(contains("Saved ordering = serialized."))
        .stdout(contains("Takes effect the next time the shell starts."))
        .stdout(contains("ordering    : serialized"));

    let saved = fs::read_to_string(home.path().join("config").join("config.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["ordering"], "serialized");
    assert_eq!(json["latency"]["mutation_ms"], 0);
    assert_eq!(json["color"], false);
}

#[test]
fn quiet_setting_hides_hints() {
    let home = home_without_latency();
    let output = run_script(
        home.path(),
        "category rename\nconfig set quiet on\ncategory rename\n",
    )
    .success()
    .get_output()
    .stdout
    .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert_eq!(stdout.matches("usage: category rename").count(), 2);
    assert_eq!(stdout.matches("hint:").count(), 1);
}

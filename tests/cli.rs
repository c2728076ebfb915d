//! Binary runs with an isolated data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bankrec(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bankrec").unwrap();
    cmd.env("BANKREC_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn auto_matches_sample_catalog() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "249.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Auto-match: found City Limousines ($249.00)",
        ))
        .stdout(predicate::str::contains("(matched)"));
}

#[test]
fn auto_without_multi_reports_no_match() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "699.99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no exact match"));

    bankrec(&data_dir)
        .args(["auto", "--target", "699.99", "--multi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bayside Club"));
}

#[test]
fn tiny_budget_is_reported() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "699.99", "--multi", "--budget", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("try a larger --budget"));
}

#[test]
fn invalid_target_fails() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "12.345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn json_catalog_file() {
    let data_dir = TempDir::new().unwrap();
    let catalog = data_dir.path().join("open.json");
    std::fs::write(
        &catalog,
        r#"[
            {"id": "inv-1", "paid_to": "Harbor Freight", "amount": "120.00"},
            {"id": "inv-2", "paid_to": "Lakeside Dental", "amount": 80.5}
        ]"#,
    )
    .unwrap();

    bankrec(&data_dir)
        .args(["auto", "--target", "200.50", "--multi", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbor Freight ($120.00) + Lakeside Dental ($80.50)"));
}

#[test]
fn csv_catalog_file() {
    let data_dir = TempDir::new().unwrap();
    let catalog = data_dir.path().join("open.csv");
    std::fs::write(
        &catalog,
        "id,paid_to,transaction_date,amount,doc_type\n7,Acme Supplies,2 Oct,42.00,Bill\n",
    )
    .unwrap();

    bankrec(&data_dir)
        .args(["auto", "--target", "42", "--csv", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Supplies"));
}

#[test]
fn duplicate_ids_rejected() {
    let data_dir = TempDir::new().unwrap();
    let catalog = data_dir.path().join("dup.json");
    std::fs::write(
        &catalog,
        r#"[{"id": "1", "paid_to": "A", "amount": "1.00"}, {"id": "1", "paid_to": "B", "amount": "2.00"}]"#,
    )
    .unwrap();

    bankrec(&data_dir)
        .args(["auto", "--target", "1.00", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate item id"));
}

#[test]
fn interactive_session_from_stdin() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["session", "--target", "500.00"])
        .write_stdin("select 3\nselect 5\nremaining\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining: $5.00"))
        .stdout(predicate::str::contains("Cannot select '5'"));
}

#[test]
fn session_events_are_logged() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "249.00"])
        .assert()
        .success();

    bankrec(&data_dir)
        .args(["log", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STARTED"))
        .stdout(predicate::str::contains("AUTO-MATCHED"));
}

#[test]
fn init_and_config() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir).arg("init").assert().success();
    assert!(data_dir.path().join("config.json").exists());

    bankrec(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Max combo size:   4"));
}

#[test]
fn zero_max_combo_rejected() {
    let data_dir = TempDir::new().unwrap();
    bankrec(&data_dir)
        .args(["auto", "--target", "10.00", "--multi", "--max-combo", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-combo must be at least 1"));
}

#[test]
fn unbounded_max_combo_searches_whole_catalog() {
    let data_dir = TempDir::new().unwrap();
    let max = usize::MAX.to_string();
    bankrec(&data_dir)
        .args(["auto", "--target", "699.99", "--multi", "--max-combo", max.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("PC Complete ($216.99)"));
}

#[test]
fn targets_at_the_amount_limits() {
    let data_dir = TempDir::new().unwrap();
    for target in ["-92233720368547758.07", "92233720368547758.07"] {
        bankrec(&data_dir)
            .args(["auto", "--multi", "--target", target])
            .assert()
            .success()
            .stdout(predicate::str::contains("no exact match"));
    }

    bankrec(&data_dir)
        .args(["auto", "--target", "92233720368547758.08"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn three_decimal_currency_end_to_end() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        data_dir.path().join("config.json"),
        r#"{"currency_symbol": "KD ", "minor_unit_scale": 3}"#,
    )
    .unwrap();

    bankrec(&data_dir)
        .args(["auto", "--target", "249.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("City Limousines (KD 249.000)"));

    let catalog = data_dir.path().join("open.json");
    std::fs::write(
        &catalog,
        r#"[
            {"id": "a", "paid_to": "Gulf Freight", "amount": "1.234"},
            {"id": "b", "paid_to": "Souk Traders", "amount": 0.766}
        ]"#,
    )
    .unwrap();

    bankrec(&data_dir)
        .args(["auto", "--target", "2.000", "--multi", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Gulf Freight (KD 1.234) + Souk Traders (KD 0.766)",
        ));
}

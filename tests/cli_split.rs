//! Command-line behaviour of the non-interactive commands

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BILL_JSON: &str = r#"{
    "merchant_name": "Warung Bu Sri",
    "total_amount": 20000,
    "tax_amount": 0,
    "service_charge": 0,
    "items": [
        {"name": "Nasi Goreng", "quantity": 1, "unit_price": 15000, "total_price": 15000},
        {"name": "Snack", "quantity": 1, "unit_price": 5000, "total_price": 5000}
    ]
}"#;

fn patungan(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("patungan").unwrap();
    cmd.env("PATUNGAN_DATA_DIR", data_dir)
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("OPENROUTER_API_BASE")
        .env_remove("AI_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn bill_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("bill.json");
    fs::write(&path, BILL_JSON).unwrap();
    path
}

#[test]
fn even_split_prints_a_table() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-p", "Budi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warung Bu Sri (Even split)"))
        .stdout(predicate::str::contains("Rp 10,000.00"))
        .stdout(predicate::str::contains("Budi"));
}

#[test]
fn per_item_split_warns_about_unassigned_items() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-p", "Budi", "-m", "per-item", "-a", "1=Me,Budi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rp 7,500.00"))
        .stdout(predicate::str::contains(
            "Warning: Item 'Snack' has not been assigned to anyone (Rp 5,000.00)",
        ))
        .stderr(predicate::str::contains("item has not been assigned to anyone"));
}

#[test]
fn json_output_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    let output = patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-p", "Budi", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["merchant_name"], "Warung Bu Sri");
    let shares = report["shares"].as_array().unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[1]["participant"], "Budi");
    assert_eq!(shares[1]["amount"].as_f64(), Some(10000.0));
}

#[test]
fn csv_written_to_output_file() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);
    let out = dir.path().join("split.csv");

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-p", "Budi", "-f", "csv", "-o"])
        .arg(&out)
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("Kind,Name,Amount"));
    assert!(csv.contains("share,Budi,10000.00"));
}

#[test]
fn assignment_to_unknown_item_fails() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-m", "per-item", "-a", "7=Me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not found: #7"));
}

#[test]
fn malformed_assignment_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .args(["-p", "Me", "-a", "Me,Budi"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn split_requires_a_participant() {
    let dir = TempDir::new().unwrap();
    let bill = bill_file(&dir);

    patungan(dir.path())
        .args(["split", "--bill"])
        .arg(&bill)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--participant"));
}

#[test]
fn config_shows_paths_without_a_key() {
    let dir = TempDir::new().unwrap();

    patungan(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Patungan Configuration"))
        .stdout(predicate::str::contains("not set (OPENROUTER_API_KEY)"))
        .stdout(predicate::str::contains("Currency symbol:     Rp"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().into_owned()));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn config_never_prints_the_key() {
    let dir = TempDir::new().unwrap();

    patungan(dir.path())
        .env("OPENROUTER_API_KEY", "sk-or-v1-supersecret1234")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("supersecret").not());
}

#[test]
fn extract_without_api_key_names_the_variable() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("receipt.png");
    fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();

    patungan(dir.path())
        .arg("extract")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENROUTER_API_KEY is not set"));
}

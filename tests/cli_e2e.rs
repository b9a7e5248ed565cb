#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn rcbook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rcbook").unwrap();
    cmd.env("RCBOOK_DATA_DIR", data_dir)
        .env("NO_COLOR", "1")
        .current_dir(data_dir);
    cmd
}

fn seeded() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    rcbook(dir.path())
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added sample vehicle records"));
    dir
}

fn zip_names(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn archives_in(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "zip"))
        .collect()
}

#[test]
fn add_normalizes_number_and_lists_it() {
    let dir = tempfile::tempdir().unwrap();

    rcbook(dir.path())
        .args(["add", "-n", "tn01ab1234", "--owner", "RAJESH KUMAR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TN 01 AB 1234"))
        .stdout(predicate::str::contains("New vehicle has been added successfully"));

    rcbook(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. TN 01 AB 1234"))
        .stdout(predicate::str::contains("RAJESH KUMAR"));

    let stored = fs::read_to_string(dir.path().join("store").join("vehicles.json")).unwrap();
    assert!(stored.contains("\"vehicleNumber\": \"TN 01 AB 1234\""));
    assert!(stored.contains("\"createdAt\""));
}

#[test]
fn add_without_number_fails() {
    let dir = tempfile::tempdir().unwrap();

    rcbook(dir.path())
        .args(["add", "--owner", "NOBODY"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Please enter a vehicle number"));

    assert!(!dir.path().join("store").join("vehicles.json").exists());
}

#[test]
fn search_is_case_insensitive() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["list", "--search", "diesel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KA05MN9876"))
        .stdout(predicate::str::contains("MH12CD5678"))
        .stdout(predicate::str::contains("TN01AB1234").not());
}

#[test]
fn edit_and_view() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["edit", "2", "--owner", "PRIYA S", "--model", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated successfully"));

    rcbook(dir.path())
        .args(["view", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRIYA S"))
        .stdout(predicate::str::contains("SWIFT DZIRE").not())
        .stdout(predicate::str::contains("MARUTI SUZUKI INDIA LTD"));
}

#[test]
fn delete_removes_record() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vehicle has been removed successfully"));

    rcbook(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("TN01AB1234").not())
        .stdout(predicate::str::contains("2. MH12CD5678"));

    rcbook(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Total vehicles\s+\S*2").unwrap());
}

#[test]
fn bad_reference_is_an_error() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["view", "9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No vehicle at index 9"));
}

#[test]
fn export_all_writes_one_archive() {
    let dir = seeded();
    let out = dir.path().join("out");

    rcbook(dir.path())
        .args(["export", "--all", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 PDF(s) in ZIP file"));

    let archives = archives_in(&out);
    assert_eq!(archives.len(), 1);
    let name = archives[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("vehicle_pdfs_") && name.ends_with(".zip"));

    let mut names = zip_names(&archives[0]);
    names.sort();
    assert_eq!(
        names,
        vec![
            "KA05MN9876_RC.pdf".to_string(),
            "MH12CD5678_RC.pdf".to_string(),
            "TN01AB1234_RC.pdf".to_string(),
        ]
    );
}

#[test]
fn export_with_search_and_index() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["export", "--search", "pune", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 PDF(s) in ZIP file"));

    let archives = archives_in(dir.path());
    assert_eq!(zip_names(&archives[0]), vec!["MH12CD5678_RC.pdf".to_string()]);
}

#[test]
fn export_without_selection_is_rejected() {
    let dir = seeded();

    rcbook(dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please select vehicles to generate PDFs"));

    assert!(archives_in(dir.path()).is_empty());
}

#[test]
fn pdf_writes_certificate_to_configured_dir() {
    let dir = seeded();
    let out = dir.path().join("certs");

    rcbook(dir.path())
        .args(["config", "output-dir"])
        .arg(&out)
        .assert()
        .success();

    rcbook(dir.path()).args(["pdf", "1"]).assert().success();

    let pdf = fs::read(out.join("TN01AB1234_RC.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn missing_background_fails_export_without_archive() {
    let dir = seeded();

    rcbook(dir.path())
        .args(["config", "background-image", "no-such-template.png"])
        .assert()
        .success();

    rcbook(dir.path())
        .args(["export", "--all"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to generate bulk PDFs"));

    assert!(archives_in(dir.path()).is_empty());
}

#[test]
fn corrupt_store_lists_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store");
    fs::create_dir_all(&store).unwrap();
    fs::write(store.join("vehicles.json"), "{ not json").unwrap();

    rcbook(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No vehicles yet."));
}

#[test]
fn data_dir_flag_overrides_env() {
    let env_dir = tempfile::tempdir().unwrap();
    let flag_dir = tempfile::tempdir().unwrap();

    rcbook(env_dir.path())
        .arg("--data-dir")
        .arg(flag_dir.path())
        .arg("sample")
        .assert()
        .success();

    assert!(flag_dir.path().join("store").join("vehicles.json").exists());
    assert!(!env_dir.path().join("store").exists());
}

#[test]
fn choices_lists_fuel_types() {
    let dir = tempfile::tempdir().unwrap();
    rcbook(dir.path())
        .arg("choices")
        .assert()
        .success()
        .stdout(predicate::str::contains("ELECTRIC"))
        .stdout(predicate::str::contains("RTO PUNE"));
}

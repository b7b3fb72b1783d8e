//! CLI tests: running the binary the way a user would

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn treepack(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("treepack").unwrap();
    cmd.current_dir(cwd).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn make_project(cwd: &Path) {
    let project = cwd.join("project");
    fs::create_dir_all(project.join("src")).unwrap();
    fs::write(project.join("hello.txt"), "Hello, Treepack!").unwrap();
    fs::write(project.join("src/main.rs"), "fn main() {}\n").unwrap();
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();
    treepack(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pack"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_pack_extract_validate_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    make_project(cwd);

    treepack(cwd)
        .args(["pack", "project", "-o", "pkg.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated package"))
        .stdout(predicate::str::contains("✓"));
    assert!(cwd.join("outputs/pkg.json").is_file());
    assert!(cwd.join("config.json").is_file());

    treepack(cwd)
        .args(["extract", "outputs/pkg.json", "-o", "restored"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted to"));
    assert_eq!(
        fs::read_to_string(cwd.join("restored/src/main.rs")).unwrap(),
        "fn main() {}\n"
    );

    treepack(cwd)
        .args(["validate", "project", "restored", "--save-report", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
    assert!(cwd.join("report.json").is_file());

    fs::write(cwd.join("restored/hello.txt"), "changed").unwrap();
    treepack(cwd)
        .args(["validate", "project", "restored"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Validation failed"));
}

#[test]
fn test_default_output_locations() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();
    make_project(cwd);

    treepack(cwd).args(["pack", "project"]).assert().success();
    let packages: Vec<_> = fs::read_dir(cwd.join("outputs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(packages.len(), 1);
    let name = packages[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("project_") && name.ends_with(".json"), "{}", name);

    treepack(cwd)
        .arg("extract")
        .arg(&packages[0])
        .assert()
        .success();
    let extracted: Vec<_> = fs::read_dir(cwd.join("extracted"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(extracted.len(), 1);
    assert!(extracted[0].starts_with("project_extracted_"));
}

#[test]
fn test_pack_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    treepack(temp_dir.path())
        .args(["pack", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Root directory not found"));
}

#[test]
fn test_extract_missing_package_fails() {
    let temp_dir = TempDir::new().unwrap();
    treepack(temp_dir.path())
        .args(["extract", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_extract_rejects_non_package() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("list.json"), "[1, 2, 3]").unwrap();
    treepack(temp_dir.path())
        .args(["extract", "list.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid package document"));
}

#[test]
fn test_config_init_refuses_to_clobber() {
    let temp_dir = TempDir::new().unwrap();
    let cwd = temp_dir.path();

    treepack(cwd).args(["config", "init"]).assert().success();
    let written = fs::read_to_string(cwd.join("config.json")).unwrap();
    assert!(written.contains("\"max_content_size\": 10485760"));

    treepack(cwd)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    treepack(cwd).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_config_show_prints_defaults() {
    let temp_dir = TempDir::new().unwrap();
    treepack(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"capture_contents\": true"));
}

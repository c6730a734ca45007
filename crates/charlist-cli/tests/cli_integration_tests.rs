//! CLI integration tests
//!
//! Run the `charlist` binary against a scratch database and check its
//! stdout, exit status and the rows it leaves behind.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("character_data.db")
}

fn charlist(temp_dir: &TempDir, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_charlist");
    let db = db_path(temp_dir);
    Command::new(cli_bin)
        .current_dir(temp_dir.path())
        .env_remove("CHARLIST_DB")
        .env("RUST_LOG", "off")
        .args(args)
        .args(["--db", db.to_str().unwrap()])
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn count(db: &Path, sql: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn test_character_add_and_list() {
    let temp_dir = TempDir::new().unwrap();

    let output = charlist(
        &temp_dir,
        &[
            "character", "add", "--name", "Aragorn", "--campaign", "Fellowship", "--tag",
            "ranger",
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "Added character 1");

    let listed = stdout(&charlist(&temp_dir, &["character", "list"]));
    let fields: Vec<&str> = listed.trim().split('\t').collect();
    assert_eq!(fields[0], "1");
    assert_eq!(fields[1], "Aragorn");
    assert_eq!(fields[2], "Fellowship");
    assert_eq!(fields[4], "ranger");
}

#[test]
fn test_character_add_uses_default_name_and_sheet() {
    let temp_dir = TempDir::new().unwrap();

    let output = charlist(&temp_dir, &["character", "add", "--campaign", "Solo"]);
    assert!(output.status.success());

    let shown = stdout(&charlist(&temp_dir, &["character", "show", "1"]));
    assert!(shown.contains("name:        No name"));
    assert!(shown.contains("No name.xml"));
}

#[test]
fn test_tag_link_and_unlink() {
    let temp_dir = TempDir::new().unwrap();
    charlist(&temp_dir, &["character", "add", "--name", "Gimli", "--campaign", "C"]);

    let added = charlist(&temp_dir, &["tag", "add", "dwarf", "--color", "#FF0000"]);
    assert_eq!(stdout(&added).trim(), "1\tdwarf\t#FF0000");

    assert!(charlist(&temp_dir, &["tag", "link", "1", "dwarf"]).status.success());
    assert!(charlist(&temp_dir, &["tag", "link", "1", "dwarf"]).status.success());
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM character_tags"), 1);

    assert!(charlist(&temp_dir, &["tag", "unlink", "1", "dwarf"]).status.success());
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM character_tags"), 0);
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM tags"), 1);
}

#[test]
fn test_package_delete_refused_while_linked() {
    let temp_dir = TempDir::new().unwrap();
    charlist(&temp_dir, &["package", "add", "Core", "/core.pkg", "--version", "1.0"]);
    charlist(
        &temp_dir,
        &["character", "add", "--name", "Frodo", "--campaign", "C", "--package", "1"],
    );

    let refused = charlist(&temp_dir, &["package", "delete", "1"]);
    assert_eq!(refused.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&refused.stderr);
    assert!(stderr.starts_with("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("ERR_PACKAGE_IN_USE"));
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM packages"), 1);

    assert!(charlist(&temp_dir, &["package", "unlink", "1", "1"]).status.success());
    assert!(charlist(&temp_dir, &["package", "delete", "1"]).status.success());
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM packages"), 0);
}

#[test]
fn test_backup_add_list_delete() {
    let temp_dir = TempDir::new().unwrap();
    charlist(&temp_dir, &["character", "add", "--name", "Sam", "--campaign", "C"]);

    charlist(
        &temp_dir,
        &["backup", "add", "1", "/b/old", "--date", "2023-01-01 10:00:00"],
    );
    charlist(
        &temp_dir,
        &["backup", "add", "1", "/b/new", "--date", "2023-02-01 10:00:00"],
    );

    let listed = stdout(&charlist(&temp_dir, &["backup", "list", "1"]));
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines, vec!["2\t2023-02-01 10:00:00\t/b/new", "1\t2023-01-01 10:00:00\t/b/old"]);

    assert!(charlist(&temp_dir, &["backup", "delete", "2"]).status.success());
    assert_eq!(count(&db_path(&temp_dir), "SELECT COUNT(*) FROM character_backups"), 1);
}

#[test]
fn test_character_delete_cascades() {
    let temp_dir = TempDir::new().unwrap();
    charlist(
        &temp_dir,
        &["character", "add", "--name", "Boromir", "--campaign", "C", "--tag", "gondor"],
    );
    charlist(&temp_dir, &["backup", "add", "1", "/b/1"]);

    assert!(charlist(&temp_dir, &["character", "delete", "1"]).status.success());

    let db = db_path(&temp_dir);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM characters"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM character_tags"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM character_backups"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM tags"), 1);
}

#[test]
fn test_unknown_character_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = charlist(&temp_dir, &["character", "show", "42"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("character 42 not found"));
}

#[test]
fn test_malformed_settings_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("charlist.toml"), "log_profile = 3").unwrap();

    let output = charlist(&temp_dir, &["tag", "list"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

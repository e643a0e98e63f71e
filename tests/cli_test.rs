/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::process::Command;

use assert_cmd::prelude::*;
use common::{ExportDirBuilder, MessageLine, realistic_zip_export, write_zip_export};
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with HOME and the config dir pointed at an empty folder
fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chat-export-explorer"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("CHAT_EXPORT_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn two_party_export() -> TempDir {
    ExportDirBuilder::new()
        .with_transcript(&[
            MessageLine::new("Alice", "Hello there"),
            MessageLine::new("Bob", "see https://example.com").time("10:01"),
            MessageLine::system("Bob changed the group name").time("10:02"),
            MessageLine::new("Alice", "hello again").time("10:03"),
        ])
        .build()
}

#[test]
fn test_cli_no_command_shows_help_message() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Browse and search exported chat transcripts"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_cli_stats_with_me() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("stats")
        .arg(export.path())
        .args(["--me", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total messages: 4"))
        .stdout(predicate::str::contains("Outgoing: 2"))
        .stdout(predicate::str::contains("Incoming: 1"))
        .stdout(predicate::str::contains("System: 1"))
        .stdout(predicate::str::contains("Participants: Alice, Bob"))
        .stdout(predicate::str::contains("You: Alice"));
}

#[test]
fn test_cli_stats_without_me_lists_candidates() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("stats")
        .arg(export.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--me"))
        .stderr(predicate::str::contains("Alice, Bob"));
}

#[test]
fn test_cli_stats_unknown_me_fails() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("stats")
        .arg(export.path())
        .args(["--me", "Mallory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ambiguous choice"));
}

#[test]
fn test_cli_stats_accepts_transcript_path() {
    let home = TempDir::new().unwrap();
    let export = ExportDirBuilder::new()
        .with_text("chat a.txt", &MessageLine::new("Alice", "a").to_line())
        .with_text("chat b.txt", &MessageLine::new("Carol", "b").to_line())
        .build();
    cli(&home)
        .arg("stats")
        .arg(export.path().join("chat b.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcript: chat b.txt"))
        .stdout(predicate::str::contains("You: Carol"));
}

#[test]
fn test_cli_ambiguous_transcript_needs_file_flag() {
    let home = TempDir::new().unwrap();
    let export = ExportDirBuilder::new()
        .with_text("chat a.txt", &MessageLine::new("Alice", "a").to_line())
        .with_text("chat b.txt", &MessageLine::new("Carol", "b").to_line())
        .build();

    cli(&home)
        .arg("stats")
        .arg(export.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"))
        .stderr(predicate::str::contains("chat a.txt, chat b.txt"));

    cli(&home)
        .arg("stats")
        .arg(export.path())
        .args(["--file", "chat a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You: Alice"));
}

#[test]
fn test_cli_search_prints_matches() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("search")
        .arg(export.path())
        .arg("HELLO")
        .args(["--me", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] 1/2/2023 10:00 Alice: Hello there"))
        .stdout(predicate::str::contains("[3] 1/2/2023 10:03 Alice: hello again"))
        .stdout(predicate::str::contains("2 matches for \"HELLO\""));
}

#[test]
fn test_cli_search_empty_term_fails() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("search")
        .arg(export.path())
        .arg("")
        .args(["--me", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search term is empty"));
}

#[test]
fn test_cli_export_json() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    let output = cli(&home)
        .arg("export")
        .arg(export.path())
        .args(["--me", "Bob"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["file"], "_chat.txt");
    assert_eq!(value["principal"], "Bob");
    assert_eq!(value["messages"].as_array().unwrap().len(), 4);
    assert_eq!(value["messages"][1]["kind"], "outgoing");
}

#[test]
fn test_cli_export_html_to_file() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    let target = home.path().join("chat.html");

    cli(&home)
        .arg("export")
        .arg(export.path())
        .args(["--me", "Alice", "--format", "html", "--highlight", "hello"])
        .arg("--output")
        .arg(&target)
        .assert()
        .success();

    let html = std::fs::read_to_string(&target).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<mark>Hello</mark> there"));
    assert!(html.contains("<a href=\"https://example.com\""));
}

#[test]
fn test_cli_export_rejects_unknown_format() {
    let home = TempDir::new().unwrap();
    let export = two_party_export();
    cli(&home)
        .arg("export")
        .arg(export.path())
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_missing_export_folder() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["stats", "/nonexistent/chat/export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Export folder not found"));
}

#[test]
fn test_cli_transcript_without_messages() {
    let home = TempDir::new().unwrap();
    let export = ExportDirBuilder::new().with_text("_chat.txt", "no messages here").build();
    cli(&home)
        .arg("stats")
        .arg(export.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No messages found in _chat.txt"));
}

#[test]
fn test_cli_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("chat-export-explorer");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.json"), r#"{"batch_size": 0}"#).unwrap();

    let export = two_party_export();
    cli(&home)
        .arg("stats")
        .arg(export.path())
        .args(["--me", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch_size must be at least 1"));
}

#[test]
fn test_cli_stats_reads_zip_export() {
    let home = TempDir::new().unwrap();
    let (_dir, zip) = realistic_zip_export(25);
    cli(&home)
        .arg("stats")
        .arg(&zip)
        .args(["--me", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcript: Chat with Bob.txt"))
        .stdout(predicate::str::contains("Total messages: 25"))
        .stdout(predicate::str::contains("Outgoing: 13"));
}

#[test]
fn test_cli_search_reads_zip_export() {
    let home = TempDir::new().unwrap();
    let (_dir, zip) = realistic_zip_export(25);
    cli(&home)
        .arg("search")
        .arg(&zip)
        .arg("message 2")
        .args(["--me", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[21] 1/2/2023 10:21 Bob: message 21"))
        .stdout(predicate::str::contains("5 matches for \"message 2\""));
}

#[test]
fn test_cli_zip_without_transcript() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let zip = write_zip_export(dir.path(), "empty.zip", &[("IMG-1.jpg".into(), vec![1])]);
    cli(&home)
        .arg("stats")
        .arg(&zip)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No .txt files found"));
}

#[test]
fn test_cli_rejects_corrupt_zip() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let zip = dir.path().join("broken.zip");
    std::fs::write(&zip, "not a zip").unwrap();
    cli(&home)
        .arg("stats")
        .arg(&zip)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a readable zip archive"));
}

mod common;

use arboard::Clipboard;
use chat_export_explorer::archive::DirectoryArchive;
use chat_export_explorer::clipboard::{clip_text, copy_to_clipboard};
use chat_export_explorer::media::TempMediaStore;
use chat_export_explorer::session::ChatLoader;
use chat_export_explorer::tui::TranscriptView;
use common::{ExportDirBuilder, MessageLine};

/// Tests that actually access clipboard are disabled in automated testing
/// Set ENABLE_CLIPBOARD_TESTS=1 to run these tests locally.
fn should_test_clipboard() -> bool {
    std::env::var("ENABLE_CLIPBOARD_TESTS").is_ok()
}

fn assert_headless_error(e: &anyhow::Error) {
    let err_msg = e.to_string().to_lowercase();
    assert!(
        err_msg.contains("clipboard") || err_msg.contains("display"),
        "Unexpected error type: {}",
        e
    );
}

fn assert_clipboard_holds(expected: &str) {
    if let Ok(mut clipboard) = Clipboard::new()
        && let Ok(contents) = clipboard.get_text()
    {
        assert_eq!(contents, expected);
    }
}

#[test]
fn test_clipboard_integration_message_text() {
    if !should_test_clipboard() {
        eprintln!("Skipping clipboard access test (set ENABLE_CLIPBOARD_TESTS=1 to run)");
        return;
    }

    let text = "Unicode: 世界 🚀 émoji\nsecond line\twith tab";
    match copy_to_clipboard(text) {
        Ok(()) => assert_clipboard_holds(text),
        Err(e) => assert_headless_error(&e),
    }
}

#[test]
fn test_clipboard_integration_attachment_copies_file_url() {
    if !should_test_clipboard() {
        eprintln!("Skipping clipboard access test (set ENABLE_CLIPBOARD_TESTS=1 to run)");
        return;
    }

    let export = ExportDirBuilder::new()
        .with_transcript(&[MessageLine::new("Alice", "IMG-1.jpg (file attached)")])
        .with_media("IMG-1.jpg", &[0xff, 0xd8, 0xff])
        .build();
    let archive = DirectoryArchive::open(export.path()).unwrap();
    let chat = ChatLoader::new(Box::new(archive), "export").start().unwrap().into_ready().unwrap();
    let media = TempMediaStore::new().unwrap();
    let session =
        chat.open(TranscriptView::new(80, 20), Box::new(media), Default::default()).unwrap();

    let text = clip_text(session.view().rendered_message(0).unwrap()).to_string();
    assert!(text.starts_with("file://"));
    match copy_to_clipboard(&text) {
        Ok(()) => assert_clipboard_holds(&text),
        Err(e) => assert_headless_error(&e),
    }
}

#[test]
fn test_clipboard_integration_boundary_size() {
    if !should_test_clipboard() {
        eprintln!("Skipping clipboard access test (set ENABLE_CLIPBOARD_TESTS=1 to run)");
        return;
    }

    let boundary_text = "a".repeat(10 * 1024 * 1024);
    if let Err(e) = copy_to_clipboard(&boundary_text) {
        assert!(!e.to_string().to_lowercase().contains("too large"));
    }

    let over_boundary_text = "a".repeat(10 * 1024 * 1024 + 1);
    let result = copy_to_clipboard(&over_boundary_text);
    assert!(result.unwrap_err().to_string().contains("too large"));
}

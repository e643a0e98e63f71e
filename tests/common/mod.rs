//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for extracted chat export folders
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    /// Create a new builder with an empty export folder
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a text file (usually a transcript)
    pub fn with_text(self, name: &str, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write text file");
        self
    }

    /// Add `_chat.txt` built from message lines
    pub fn with_transcript(self, lines: &[MessageLine]) -> Self {
        let content = lines.iter().map(MessageLine::to_line).collect::<Vec<_>>().join("\n");
        self.with_text("_chat.txt", &content)
    }

    /// Add a media file
    pub fn with_media(self, name: &str, bytes: &[u8]) -> Self {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create media dir");
        }
        fs::write(path, bytes).expect("Failed to write media file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one transcript start line
pub struct MessageLine {
    date: String,
    time: String,
    sender: Option<String>,
    text: String,
}

impl MessageLine {
    /// Participant message with default date and time
    pub fn new(sender: &str, text: &str) -> Self {
        Self {
            date: "1/2/2023".to_string(),
            time: "10:00".to_string(),
            sender: Some(sender.to_string()),
            text: text.to_string(),
        }
    }

    /// Export system notice (no sender)
    pub fn system(text: &str) -> Self {
        Self { sender: None, ..Self::new("", text) }
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }

    pub fn to_line(&self) -> String {
        match &self.sender {
            Some(sender) => format!("{}, {} - {}: {}", self.date, self.time, sender, self.text),
            None => format!("{}, {} - {}", self.date, self.time, self.text),
        }
    }
}

/// `count` alternating Alice/Bob messages; every tenth one attaches `IMG-<i>.jpg`
pub fn conversation(count: usize) -> String {
    (0..count)
        .map(|i| {
            let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
            let text = if i % 10 == 0 {
                format!("IMG-{}.jpg (file attached)", i)
            } else {
                format!("message {}", i)
            };
            MessageLine::new(sender, &text).time(&format!("10:{:02}", i % 60)).to_line()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Export folder holding [`conversation`] and every image it refers to
pub fn realistic_export(count: usize) -> TempDir {
    let mut builder = ExportDirBuilder::new().with_text("_chat.txt", &conversation(count));
    for i in (0..count).step_by(10) {
        builder = builder.with_media(&format!("IMG-{}.jpg", i), &[0xff, 0xd8, 0xff]);
    }
    builder.build()
}

/// Pack `files` into `dir/name` the way the chat app exports a chat
pub fn write_zip_export(dir: &Path, name: &str, files: &[(String, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create zip file");
    let mut writer = ZipWriter::new(file);
    for (entry, bytes) in files {
        writer
            .start_file(entry.as_str(), SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(bytes).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip file");
    path
}

/// `Chat with Bob.zip` holding [`conversation`] as `Chat with Bob.txt`, its images and an
/// unrelated text file
pub fn realistic_zip_export(count: usize) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut files = vec![
        ("Chat with Bob.txt".to_string(), conversation(count).into_bytes()),
        ("notes.txt".to_string(), b"shopping list".to_vec()),
    ];
    for i in (0..count).step_by(10) {
        files.push((format!("IMG-{}.jpg", i), vec![0xff, 0xd8, 0xff]));
    }
    let path = write_zip_export(dir.path(), "Chat with Bob.zip", &files);
    (dir, path)
}

//! Output backends
//!
//! A backend receives `(level, message, metadata)` from a handler and owns
//! the actual write. Handlers never touch a terminal or file themselves.

use crate::error::Result;
use crate::formatters::{render_console_line, render_file_entry};
use crate::level::Level;
use chrono::Local;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sink that persists or displays formatted records
pub trait OutputBackend: Send + Sync {
	fn write(&self, level: Level, message: &str, metadata: &Value) -> Result<()>;
}

fn timestamp_of(metadata: &Value) -> String {
	metadata
		.get("timestamp")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string())
}

/// Writes colorized lines to standard output
#[derive(Debug, Clone)]
pub struct ConsoleBackend {
	colorize: bool,
}

impl ConsoleBackend {
	pub fn new() -> Self {
		Self { colorize: true }
	}

	/// Disable ANSI colors
	pub fn without_colors(mut self) -> Self {
		self.colorize = false;
		self
	}
}

impl Default for ConsoleBackend {
	fn default() -> Self {
		Self::new()
	}
}

impl OutputBackend for ConsoleBackend {
	fn write(&self, level: Level, message: &str, metadata: &Value) -> Result<()> {
		let line = render_console_line(
			level,
			&timestamp_of(metadata),
			message,
			metadata,
			self.colorize,
		);
		let mut stdout = std::io::stdout().lock();
		writeln!(stdout, "{}", line)?;
		Ok(())
	}
}

/// Appends one JSON object per line to a file
#[derive(Debug, Clone)]
pub struct FileBackend {
	filename: PathBuf,
}

impl FileBackend {
	pub fn new(filename: impl Into<PathBuf>) -> Self {
		Self {
			filename: filename.into(),
		}
	}

	pub fn filename(&self) -> &Path {
		&self.filename
	}
}

impl OutputBackend for FileBackend {
	fn write(&self, level: Level, message: &str, metadata: &Value) -> Result<()> {
		if let Some(parent) = self.filename.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}

		let entry = render_file_entry(level, &timestamp_of(metadata), message, metadata);
		let mut line = serde_json::to_string(&entry)?;
		line.push('\n');

		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.filename)?;
		file.write_all(line.as_bytes())?;
		Ok(())
	}
}

/// One write captured by a [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEntry {
	pub level: Level,
	pub message: String,
	pub metadata: Value,
}

/// Keeps every write in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	entries: Arc<Mutex<Vec<CapturedEntry>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> Vec<CapturedEntry> {
		self.entries.lock().clone()
	}

	pub fn messages(&self) -> Vec<String> {
		self.entries
			.lock()
			.iter()
			.map(|entry| entry.message.clone())
			.collect()
	}

	pub fn clear(&self) {
		self.entries.lock().clear();
	}
}

impl OutputBackend for MemoryBackend {
	fn write(&self, level: Level, message: &str, metadata: &Value) -> Result<()> {
		self.entries.lock().push(CapturedEntry {
			level,
			message: message.to_string(),
			metadata: metadata.clone(),
		});
		Ok(())
	}
}

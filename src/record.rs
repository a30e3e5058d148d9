//! Log records

use crate::level::Level;
use chrono::Local;
use std::collections::HashMap;
use std::panic::Location;

/// Arbitrary key/value payload attached to a record
pub type Metadata = HashMap<String, serde_json::Value>;

/// Module name used when the caller could not be determined
pub const UNKNOWN_MODULE: &str = "Unknown module";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Caller information and extra context for a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
	pub path: Option<String>,
	pub module_name: Option<String>,
	pub line_no: Option<u32>,
	pub action: Option<String>,
}

impl RecordOptions {
	/// Build caller information from a source location
	///
	/// `path` is the current working directory, `module_name` the source file
	/// of the call site.
	pub fn from_location(location: &Location<'_>) -> Self {
		Self {
			path: std::env::current_dir()
				.ok()
				.map(|dir| dir.display().to_string()),
			module_name: Some(location.file().to_string()),
			line_no: Some(location.line()),
			action: None,
		}
	}

	/// Set the action recorded alongside the caller information
	pub fn with_action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}
}

/// Immutable snapshot of a single log event
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
	pub name: String,
	pub level: Level,
	pub message: String,
	pub metadata: Option<Metadata>,
	pub timestamp: String,
	pub path: Option<String>,
	pub module_name: String,
	pub line_no: Option<u32>,
	pub action: Option<String>,
	pub pid: u32,
}

impl LogRecord {
	/// Create a record, stamping it with the current local time and process id
	///
	/// # Examples
	///
	/// ```
	/// use logtree::{Level, LogRecord, RecordOptions};
	///
	/// let record = LogRecord::new("app", Level::Info, "started", None, RecordOptions::default());
	/// assert_eq!(record.module_name, "Unknown module");
	/// assert_eq!(record.timestamp.len(), "2024-01-01 00:00:00.000".len());
	/// ```
	pub fn new(
		name: impl Into<String>,
		level: Level,
		message: impl Into<String>,
		metadata: Option<Metadata>,
		options: RecordOptions,
	) -> Self {
		let RecordOptions {
			path,
			module_name,
			line_no,
			action,
		} = options;

		Self {
			name: name.into(),
			level,
			message: message.into(),
			metadata,
			timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
			path,
			module_name: module_name.unwrap_or_else(|| UNKNOWN_MODULE.to_string()),
			line_no,
			action,
			pid: std::process::id(),
		}
	}
}

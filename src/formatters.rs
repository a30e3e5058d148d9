//! Record formatting
//!
//! Handlers project a [`LogRecord`] into a [`FormattedRecord`]: the message
//! plus a metadata bundle tailored to the sink. Backends then render that
//! bundle into the final console line or file entry.

use crate::level::Level;
use crate::record::LogRecord;
use colored::Colorize;
use serde_json::{Map, Value, json};

/// Message and sink-specific metadata produced by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRecord {
	pub message: String,
	pub metadata: Value,
}

fn context(record: &LogRecord) -> Value {
	record
		.metadata
		.as_ref()
		.map(|metadata| Value::Object(metadata.clone().into_iter().collect::<Map<_, _>>()))
		.unwrap_or(Value::Null)
}

/// Bundle used by console handlers
pub fn console_format(record: &LogRecord) -> FormattedRecord {
	FormattedRecord {
		message: record.message.clone(),
		metadata: json!({
			"pid": record.pid,
			"name": record.name,
			"timestamp": record.timestamp,
			"action": record.action,
			"path": record.path,
			"moduleName": record.module_name,
			"lineNo": record.line_no,
			"context": context(record),
		}),
	}
}

/// Bundle used by file handlers; unlike the console bundle it carries the level
pub fn file_format(record: &LogRecord) -> FormattedRecord {
	FormattedRecord {
		message: record.message.clone(),
		metadata: json!({
			"name": record.name,
			"pid": record.pid,
			"level": record.level,
			"timestamp": record.timestamp,
			"action": record.action,
			"path": record.path,
			"moduleName": record.module_name,
			"lineNo": record.line_no,
			"context": context(record),
		}),
	}
}

/// Escape control characters as `\xNN` so a message cannot forge extra lines
pub fn escape_control_chars(s: &str) -> String {
	let mut result = String::with_capacity(s.len());

	for ch in s.chars() {
		if ch.is_control() {
			let mut buf = [0u8; 4];
			for byte in ch.encode_utf8(&mut buf).as_bytes() {
				result.push_str(&format!("\\x{:02x}", byte));
			}
		} else {
			result.push(ch);
		}
	}

	result
}

/// Render one console line: `[timestamp] [LEVEL] message - {metadata}`
///
/// The metadata suffix is omitted when the bundle is empty.
pub fn render_console_line(
	level: Level,
	timestamp: &str,
	message: &str,
	metadata: &Value,
	colorize: bool,
) -> String {
	let paint = |text: String| {
		if colorize {
			text.color(level.color()).to_string()
		} else {
			text
		}
	};

	let has_metadata = match metadata {
		Value::Null => false,
		Value::Object(map) => !map.is_empty(),
		_ => true,
	};
	let suffix = if has_metadata {
		format!(" - {}", paint(metadata.to_string()))
	} else {
		String::new()
	};

	format!(
		"[{}] [{}] {}{}",
		paint(timestamp.to_string()),
		paint(level.as_str().to_uppercase()),
		paint(escape_control_chars(message)),
		suffix
	)
}

/// Render one file entry as a flat JSON object
pub fn render_file_entry(level: Level, timestamp: &str, message: &str, metadata: &Value) -> Value {
	json!({
		"level": level,
		"timestamp": timestamp,
		"message": message,
		"metadata": metadata,
	})
}

//! Log handlers
//!
//! A handler is a named, leveled sink. Loggers hand it every record that
//! passed their own level check; the handler applies its own threshold,
//! formats the record and forwards it to an [`OutputBackend`].

use crate::backends::{ConsoleBackend, FileBackend, OutputBackend};
use crate::error::{LoggingError, Result};
use crate::formatters::{FormattedRecord, console_format, file_format};
use crate::level::{DEFAULT_LEVEL, Level};
use crate::record::LogRecord;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the console handler installed on the root logger
pub const DEFAULT_HANDLER_NAME: &str = "defaultHandler";

/// Capability tag consulted by the default-handler policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
	Console,
	File,
	Other,
}

pub trait Handler: Send + Sync {
	/// Identity of the handler within a logger's handler set
	fn name(&self) -> &str;

	fn level(&self) -> Level;

	fn set_level(&self, level: Level);

	fn kind(&self) -> HandlerKind {
		HandlerKind::Other
	}

	/// Returns `false` for records less severe than the handler's threshold
	fn accepts(&self, level: Level) -> bool {
		!self.level().is_higher_severity(level)
	}

	fn format(&self, record: &LogRecord) -> FormattedRecord {
		file_format(record)
	}

	/// Write an already formatted record to the sink
	fn emit(&self, level: Level, output: &FormattedRecord) -> Result<()>;

	/// Format and emit `record`, silently dropping it if not accepted
	fn handle(&self, record: &LogRecord) -> Result<()> {
		if !self.accepts(record.level) {
			return Ok(());
		}
		let output = self.format(record);
		self.emit(record.level, &output)
	}
}

/// Sink-specific settings passed at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkConfig {
	/// Destination file for file handlers
	pub filename: Option<PathBuf>,
	/// Whether console output uses ANSI colors (defaults to `true`)
	pub colorize: Option<bool>,
}

/// Options accepted by handler constructors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOptions {
	pub config: SinkConfig,
}

impl HandlerOptions {
	pub fn with_filename(filename: impl Into<PathBuf>) -> Self {
		Self {
			config: SinkConfig {
				filename: Some(filename.into()),
				..SinkConfig::default()
			},
		}
	}
}

/// Handler writing colorized lines to the console
pub struct ConsoleHandler {
	name: String,
	level: RwLock<Level>,
	backend: Arc<dyn OutputBackend>,
}

impl ConsoleHandler {
	/// Create a console handler writing to standard output
	///
	/// # Examples
	///
	/// ```
	/// use logtree::{ConsoleHandler, Handler, HandlerKind, Level};
	///
	/// let handler = ConsoleHandler::new("console", Level::Info);
	/// assert_eq!(handler.kind(), HandlerKind::Console);
	/// assert!(handler.accepts(Level::Error));
	/// assert!(!handler.accepts(Level::Debug));
	/// ```
	pub fn new(name: impl Into<String>, level: Level) -> Self {
		Self::with_options(name, level, HandlerOptions::default())
	}

	pub fn with_options(name: impl Into<String>, level: Level, options: HandlerOptions) -> Self {
		let mut backend = ConsoleBackend::new();
		if options.config.colorize == Some(false) {
			backend = backend.without_colors();
		}
		Self::with_backend(name, level, Arc::new(backend))
	}

	/// Create a console handler forwarding to a custom backend
	pub fn with_backend(
		name: impl Into<String>,
		level: Level,
		backend: Arc<dyn OutputBackend>,
	) -> Self {
		Self {
			name: name.into(),
			level: RwLock::new(level),
			backend,
		}
	}
}

impl Handler for ConsoleHandler {
	fn name(&self) -> &str {
		&self.name
	}

	fn level(&self) -> Level {
		*self.level.read()
	}

	fn set_level(&self, level: Level) {
		*self.level.write() = level;
	}

	fn kind(&self) -> HandlerKind {
		HandlerKind::Console
	}

	fn format(&self, record: &LogRecord) -> FormattedRecord {
		console_format(record)
	}

	fn emit(&self, level: Level, output: &FormattedRecord) -> Result<()> {
		self.backend.write(level, &output.message, &output.metadata)
	}
}

/// Handler appending structured entries to a file
pub struct FileHandler {
	name: String,
	level: RwLock<Level>,
	backend: Arc<dyn OutputBackend>,
}

impl FileHandler {
	/// Create a file handler; `options.config.filename` is required
	pub fn new(name: impl Into<String>, level: Level, options: HandlerOptions) -> Result<Self> {
		let name = name.into();
		let filename = options.config.filename.ok_or_else(|| {
			LoggingError::Config(format!("file handler `{}` has no filename", name))
		})?;
		Ok(Self::with_backend(
			name,
			level,
			Arc::new(FileBackend::new(filename)),
		))
	}

	/// Create a file handler forwarding to a custom backend
	pub fn with_backend(
		name: impl Into<String>,
		level: Level,
		backend: Arc<dyn OutputBackend>,
	) -> Self {
		Self {
			name: name.into(),
			level: RwLock::new(level),
			backend,
		}
	}
}

impl Handler for FileHandler {
	fn name(&self) -> &str {
		&self.name
	}

	fn level(&self) -> Level {
		*self.level.read()
	}

	fn set_level(&self, level: Level) {
		*self.level.write() = level;
	}

	fn kind(&self) -> HandlerKind {
		HandlerKind::File
	}

	fn emit(&self, level: Level, output: &FormattedRecord) -> Result<()> {
		self.backend.write(level, &output.message, &output.metadata)
	}
}

/// Handler keeping accepted records in memory; clones share storage
#[derive(Clone)]
pub struct MemoryHandler {
	name: String,
	level: Arc<RwLock<Level>>,
	records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryHandler {
	pub fn new(name: impl Into<String>, level: Level) -> Self {
		Self {
			name: name.into(),
			level: Arc::new(RwLock::new(level)),
			records: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn get_records(&self) -> Vec<LogRecord> {
		self.records.lock().clone()
	}

	pub fn clear(&self) {
		self.records.lock().clear();
	}
}

impl Default for MemoryHandler {
	fn default() -> Self {
		Self::new("memory", DEFAULT_LEVEL)
	}
}

impl Handler for MemoryHandler {
	fn name(&self) -> &str {
		&self.name
	}

	fn level(&self) -> Level {
		*self.level.read()
	}

	fn set_level(&self, level: Level) {
		*self.level.write() = level;
	}

	/// Formatted output is not kept; records are captured whole by `handle`
	fn emit(&self, _level: Level, _output: &FormattedRecord) -> Result<()> {
		Ok(())
	}

	fn handle(&self, record: &LogRecord) -> Result<()> {
		if self.accepts(record.level) {
			self.records.lock().push(record.clone());
		}
		Ok(())
	}
}

/// Drop the root's default console handler when a user-named console
/// handler is also present
///
/// The default handler is kept only when it is the sole console handler.
pub fn remove_default_console_handler_if_needed(handlers: &mut Vec<Arc<dyn Handler>>) {
	let has_user_console = handlers
		.iter()
		.any(|h| h.kind() == HandlerKind::Console && h.name() != DEFAULT_HANDLER_NAME);
	if has_user_console {
		handlers
			.retain(|h| !(h.kind() == HandlerKind::Console && h.name() == DEFAULT_HANDLER_NAME));
	}
}

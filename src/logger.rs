//! Logger handles
//!
//! A [`Logger`] is a lightweight handle onto a node of the [`Manager`]'s
//! registry. Cloning it is cheap and every clone refers to the same node.

use crate::error::Result;
use crate::handlers::{Handler, remove_default_console_handler_if_needed};
use crate::level::Level;
use crate::manager::{LoggerId, Manager};
use crate::record::{LogRecord, Metadata, RecordOptions};
use colored::Colorize;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
	id: LoggerId,
	manager: Manager,
}

impl Logger {
	pub(crate) fn new(id: LoggerId, manager: Manager) -> Self {
		Self { id, manager }
	}

	pub fn name(&self) -> String {
		self.manager.read().node(self.id).name.clone()
	}

	pub fn manager(&self) -> &Manager {
		&self.manager
	}

	pub fn parent(&self) -> Option<Logger> {
		let parent = self.manager.read().node(self.id).parent;
		parent.map(|id| Logger::new(id, self.manager.clone()))
	}

	/// Logger for `"{self.name}.{suffix}"`
	pub fn get_child(&self, suffix: &str) -> Logger {
		let name = format!("{}.{}", self.name(), suffix);
		self.manager.get_logger(&name)
	}

	/// Own level; `None` means the level is inherited
	pub fn level(&self) -> Option<Level> {
		self.manager.read().node(self.id).level
	}

	pub fn set_level(&self, level: Option<Level>) {
		self.manager.write().node_mut(self.id).level = level;
	}

	pub fn propagate(&self) -> bool {
		self.manager.read().node(self.id).propagate
	}

	pub fn set_propagate(&self, propagate: bool) {
		self.manager.write().node_mut(self.id).propagate = propagate;
	}

	/// Own level if set, else the nearest ancestor's, else `trace`
	pub fn effective_level(&self) -> Level {
		self.manager.read().effective_level(self.id)
	}

	/// Whether a record at `level` would be dispatched
	///
	/// The manager's global threshold is checked first; then `level` must be at
	/// least as severe as the effective level.
	pub fn is_enabled_for(&self, level: Level) -> bool {
		let registry = self.manager.read();
		let priority = level.priority();
		if registry.disable() < priority {
			return false;
		}
		priority <= registry.effective_level(self.id).priority()
	}

	pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
		self.manager.read().node(self.id).handlers.clone()
	}

	/// Attach `handler` unless one with the same name is already attached
	pub fn add_handler(&self, handler: Arc<dyn Handler>) {
		let mut registry = self.manager.write();
		let handlers = &mut registry.node_mut(self.id).handlers;
		if !handlers.iter().any(|h| h.name() == handler.name()) {
			handlers.push(handler);
		}
	}

	/// Detach the handler named like `handler`, if any
	pub fn remove_handler(&self, handler: &dyn Handler) {
		self.remove_handler_named(handler.name());
	}

	pub fn remove_handler_named(&self, name: &str) {
		let mut registry = self.manager.write();
		let handlers = &mut registry.node_mut(self.id).handlers;
		if let Some(index) = handlers.iter().position(|h| h.name() == name) {
			handlers.remove(index);
		}
	}

	#[track_caller]
	pub fn fatal(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Fatal, message, metadata)
	}

	#[track_caller]
	pub fn error(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Error, message, metadata)
	}

	#[track_caller]
	pub fn warn(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Warn, message, metadata)
	}

	#[track_caller]
	pub fn info(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Info, message, metadata)
	}

	#[track_caller]
	pub fn debug(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Debug, message, metadata)
	}

	#[track_caller]
	pub fn trace(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<()> {
		self.log(Level::Trace, message, metadata)
	}

	/// Log at `level`, recording the caller's file and line
	///
	/// # Examples
	///
	/// ```
	/// use logtree::{Handler, Level, Manager, MemoryHandler};
	/// use std::sync::Arc;
	///
	/// let manager = Manager::new();
	/// let logger = manager.get_logger("svc");
	/// let handler = MemoryHandler::new("memory", Level::Trace);
	/// logger.add_handler(Arc::new(handler.clone()));
	/// logger.set_propagate(false);
	/// logger.set_level(Some(Level::Warn));
	///
	/// logger.log(Level::Info, "ignored", None).unwrap();
	/// logger.log(Level::Error, "kept", None).unwrap();
	///
	/// let records = handler.get_records();
	/// assert_eq!(records.len(), 1);
	/// assert_eq!(records[0].message, "kept");
	/// ```
	#[track_caller]
	pub fn log(
		&self,
		level: Level,
		message: impl Into<String>,
		metadata: Option<Metadata>,
	) -> Result<()> {
		if !self.is_enabled_for(level) {
			return Ok(());
		}
		let options = RecordOptions::from_location(Location::caller());
		self.dispatch(level, message.into(), metadata, options)
	}

	/// Log at the level named `level`; unknown names are treated as `trace`
	#[track_caller]
	pub fn log_str(
		&self,
		level: &str,
		message: impl Into<String>,
		metadata: Option<Metadata>,
	) -> Result<()> {
		self.log(Level::from_name_or_default(level), message, metadata)
	}

	/// Log at `level` with explicitly supplied caller information
	pub fn log_with(
		&self,
		level: Level,
		message: impl Into<String>,
		metadata: Option<Metadata>,
		options: RecordOptions,
	) -> Result<()> {
		if !self.is_enabled_for(level) {
			return Ok(());
		}
		self.dispatch(level, message.into(), metadata, options)
	}

	fn dispatch(
		&self,
		level: Level,
		message: String,
		metadata: Option<Metadata>,
		options: RecordOptions,
	) -> Result<()> {
		let record = LogRecord::new(self.name(), level, message, metadata, options);
		self.handle(&record)
	}

	/// Dispatch `record` to the handlers without any level check
	pub fn handle(&self, record: &LogRecord) -> Result<()> {
		self.call_handlers(record)
	}

	/// Offer `record` to this logger's handlers and, when propagating, to every
	/// ancestor's handlers
	///
	/// Every handler runs even if an earlier one fails; the first error is
	/// returned.
	pub fn call_handlers(&self, record: &LogRecord) -> Result<()> {
		let mut handlers = self.manager.read().collect_handlers(self.id);

		if handlers.is_empty() {
			self.warn_no_handlers(record);
			return Ok(());
		}

		remove_default_console_handler_if_needed(&mut handlers);

		let mut first_error = None;
		for handler in &handlers {
			if let Err(err) = handler.handle(record)
				&& first_error.is_none()
			{
				first_error = Some(err);
			}
		}
		first_error.map_or(Ok(()), Err)
	}

	fn warn_no_handlers(&self, record: &LogRecord) {
		{
			let mut registry = self.manager.write();
			let node = registry.node_mut(self.id);
			if node.warned_no_handlers {
				return;
			}
			node.warned_no_handlers = true;
		}

		let line = record
			.line_no
			.map(|line| line.to_string())
			.unwrap_or_default();
		tracing::warn!(
			logger = %record.name,
			module = %record.module_name,
			line = %line,
			"no handler bound to logger"
		);
		println!(
			"{}",
			format!(
				"\nWarning: No handler is bound to the logger named [{}], you may not see any output messages.\nPlease add at least one handler to this logger.\nModuleName: [{}].\nLineNo: [{}].\n",
				record.name, record.module_name, line
			)
			.yellow()
		);
	}
}

impl PartialEq for Logger {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.manager.same_registry(&other.manager)
	}
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registry = self.manager.read();
		let node = registry.node(self.id);
		f.debug_struct("Logger")
			.field("name", &node.name)
			.field("level", &node.level)
			.field("propagate", &node.propagate)
			.field("handlers", &node.handlers.len())
			.finish()
	}
}

//! # logtree
//!
//! A hierarchical logging facade. Loggers are named with dot-separated paths
//! (`"app.db.pool"`) and form a tree rooted at the `root` logger. A logger
//! without its own level inherits the nearest ancestor's; records are
//! offered to the logger's handlers and, unless propagation is disabled, to
//! every ancestor's handlers.
//!
//! ## Quick start
//!
//! ```
//! use logtree::{ConsoleHandler, Level, Manager};
//! use std::sync::Arc;
//!
//! let manager = Manager::new();
//! let logger = manager.get_logger("app.http");
//! logger.set_level(Some(Level::Info));
//! logger.add_handler(Arc::new(ConsoleHandler::new("console", Level::Info)));
//!
//! logger.info("listening", None).unwrap();
//! logger.debug("suppressed", None).unwrap();
//! ```
//!
//! ## Components
//!
//! - [`Level`]: the six severities, `fatal` through `trace`
//! - [`LogRecord`]: one log event with caller information
//! - [`Handler`]: leveled sinks ([`ConsoleHandler`], [`FileHandler`],
//!   [`MemoryHandler`]) writing through an [`OutputBackend`]
//! - [`Logger`]: per-level log methods and handler dispatch
//! - [`Manager`]: the registry that builds the logger tree
//! - [`LoggerConfig`]: declarative handler setup

pub mod backends;
pub mod config;
pub mod error;
pub mod formatters;
pub mod handlers;
pub mod level;
pub mod logger;
pub mod manager;
pub mod record;

pub use backends::{CapturedEntry, ConsoleBackend, FileBackend, MemoryBackend, OutputBackend};
pub use config::{
	HandlerConfig, HandlerType, LoggerConfig, LoggingConfig, create_handler, format_file_name,
};
pub use error::{LoggingError, Result};
pub use formatters::FormattedRecord;
pub use handlers::{
	ConsoleHandler, DEFAULT_HANDLER_NAME, FileHandler, Handler, HandlerKind, HandlerOptions,
	MemoryHandler, SinkConfig,
};
pub use level::{DEFAULT_LEVEL, Level, is_higher_severity, name_of, priority_of};
pub use logger::Logger;
pub use manager::{Manager, ROOT_NAME};
pub use record::{LogRecord, Metadata, RecordOptions};

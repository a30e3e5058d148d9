//! Declarative logger setup
//!
//! A [`LoggerConfig`] names a logger and lists the handlers to attach to it.
//! Configurations can be built in code or loaded from TOML or JSON.
//!
//! ```toml
//! [[loggers]]
//! name = "billing"
//! level = "info"
//!
//! [[loggers.handlers]]
//! handlerName = "audit"
//! handlerType = "FileHandler"
//! level = "warn"
//! path = "/var/log/billing"
//! logType = "monitor"
//! logName = "payments"
//! dataActivated = true
//! ```

use crate::error::Result;
use crate::handlers::{ConsoleHandler, FileHandler, Handler, HandlerOptions};
use crate::level::Level;
use crate::logger::Logger;
use crate::manager::{Manager, ROOT_NAME};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Handler variants that can be built from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandlerType {
	FileHandler,
	ConsoleHandler,
	/// Any other type name; such entries are skipped
	#[serde(other)]
	Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerConfig {
	pub handler_name: String,
	pub handler_type: HandlerType,
	/// Level name; missing or unknown names mean `trace`
	#[serde(default)]
	pub level: Option<String>,
	/// Directory for file handlers
	#[serde(default)]
	pub path: Option<PathBuf>,
	#[serde(default)]
	pub log_type: Option<String>,
	#[serde(default)]
	pub log_name: Option<String>,
	/// Append the current date to the file name
	#[serde(default)]
	pub data_activated: bool,
}

impl HandlerConfig {
	pub fn console(name: impl Into<String>, level: Level) -> Self {
		Self {
			handler_name: name.into(),
			handler_type: HandlerType::ConsoleHandler,
			level: Some(level.as_str().to_string()),
			path: None,
			log_type: None,
			log_name: None,
			data_activated: false,
		}
	}

	pub fn file(
		name: impl Into<String>,
		level: Level,
		path: impl Into<PathBuf>,
		log_type: impl Into<String>,
		log_name: impl Into<String>,
	) -> Self {
		Self {
			handler_name: name.into(),
			handler_type: HandlerType::FileHandler,
			level: Some(level.as_str().to_string()),
			path: Some(path.into()),
			log_type: Some(log_type.into()),
			log_name: Some(log_name.into()),
			data_activated: false,
		}
	}

	fn resolved_level(&self) -> Level {
		self.level
			.as_deref()
			.map_or(Level::Trace, Level::from_name_or_default)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
	/// Logger to configure; `None` targets the root logger
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub propagate: Option<bool>,
	#[serde(default)]
	pub handlers: Vec<HandlerConfig>,
}

impl LoggerConfig {
	pub fn from_toml_str(s: &str) -> Result<Self> {
		Ok(toml::from_str(s)?)
	}

	pub fn from_json_str(s: &str) -> Result<Self> {
		Ok(serde_json::from_str(s)?)
	}
}

/// A set of logger configurations applied together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	#[serde(default)]
	pub loggers: Vec<LoggerConfig>,
}

impl LoggingConfig {
	pub fn from_toml_str(s: &str) -> Result<Self> {
		Ok(toml::from_str(s)?)
	}

	pub fn from_json_str(s: &str) -> Result<Self> {
		Ok(serde_json::from_str(s)?)
	}
}

/// Log file name: `{app}-{logType}-{logName}-{date}.log`
///
/// The date (`YYYY-MM-DD`) is only filled in when `dated` is set; the
/// separator before it is always present.
pub fn format_file_name(app_name: &str, log_type: &str, log_name: &str, dated: bool) -> String {
	let date = if dated {
		Local::now().format("%Y-%m-%d").to_string()
	} else {
		String::new()
	};
	format!("{}-{}-{}-{}.log", app_name, log_type, log_name, date)
}

/// Build the handler described by `config`
///
/// Returns `Ok(None)` for unknown handler types.
pub fn create_handler(config: &HandlerConfig, app_name: &str) -> Result<Option<Arc<dyn Handler>>> {
	let level = config.resolved_level();
	match config.handler_type {
		HandlerType::FileHandler => {
			let file_name = format_file_name(
				app_name,
				config.log_type.as_deref().unwrap_or_default(),
				config.log_name.as_deref().unwrap_or_default(),
				config.data_activated,
			);
			let filename = config.path.clone().unwrap_or_default().join(file_name);
			let handler: Arc<dyn Handler> = Arc::new(FileHandler::new(
				config.handler_name.clone(),
				level,
				HandlerOptions::with_filename(filename),
			)?);
			Ok(Some(handler))
		}
		HandlerType::ConsoleHandler => {
			let handler: Arc<dyn Handler> =
				Arc::new(ConsoleHandler::new(config.handler_name.clone(), level));
			Ok(Some(handler))
		}
		HandlerType::Unknown => {
			tracing::warn!(
				handler = %config.handler_name,
				"skipping handler with unknown type"
			);
			Ok(None)
		}
	}
}

impl Manager {
	/// Resolve the configured logger and attach every handler it lists
	///
	/// The logger name doubles as the application name in file names.
	pub fn set_logger(&self, config: &LoggerConfig) -> Result<Logger> {
		let logger = self.get_logger_opt(config.name.as_deref());
		let app_name = config.name.as_deref().unwrap_or(ROOT_NAME);

		if let Some(level) = config.level.as_deref() {
			logger.set_level(Some(Level::from_name_or_default(level)));
		}
		if let Some(propagate) = config.propagate {
			logger.set_propagate(propagate);
		}
		for handler_config in &config.handlers {
			if let Some(handler) = create_handler(handler_config, app_name)? {
				logger.add_handler(handler);
			}
		}
		Ok(logger)
	}

	/// Apply every logger configuration in order
	pub fn configure(&self, config: &LoggingConfig) -> Result<Vec<Logger>> {
		config
			.loggers
			.iter()
			.map(|logger| self.set_logger(logger))
			.collect()
	}
}

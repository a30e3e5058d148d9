//! Error types for the logging facade

/// Errors raised while emitting records or loading logging configuration
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Unknown log level: {0}")]
	UnknownLevel(String),

	#[error("Invalid configuration: {0}")]
	Config(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LoggingError>;

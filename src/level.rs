//! Log levels and severity lookups
//!
//! Six levels modelled after log4j, from most to least severe:
//! `fatal > error > warn > info > debug > trace`. Each level maps to a
//! priority number where a lower number means a more severe level.

use crate::error::LoggingError;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record
///
/// Variants are declared in priority order, so the derived ordering sorts
/// `Fatal` first and `Trace` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Fatal,
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

/// Level used when nothing else is configured anywhere in the hierarchy
pub const DEFAULT_LEVEL: Level = Level::Trace;

impl Level {
	/// All levels, most severe first
	pub const ALL: [Level; 6] = [
		Level::Fatal,
		Level::Error,
		Level::Warn,
		Level::Info,
		Level::Debug,
		Level::Trace,
	];

	/// Priority number of this level (`fatal = 0` … `trace = 5`)
	pub const fn priority(self) -> u8 {
		match self {
			Level::Fatal => 0,
			Level::Error => 1,
			Level::Warn => 2,
			Level::Info => 3,
			Level::Debug => 4,
			Level::Trace => 5,
		}
	}

	/// Canonical lowercase name
	pub const fn as_str(self) -> &'static str {
		match self {
			Level::Fatal => "fatal",
			Level::Error => "error",
			Level::Warn => "warn",
			Level::Info => "info",
			Level::Debug => "debug",
			Level::Trace => "trace",
		}
	}

	/// Color used when rendering this level on a terminal
	pub const fn color(self) -> Color {
		match self {
			Level::Fatal => Color::Red,
			Level::Error => Color::Magenta,
			Level::Warn => Color::Yellow,
			Level::Info => Color::Green,
			Level::Debug => Color::Cyan,
			Level::Trace => Color::White,
		}
	}

	/// Look up a level by its exact lowercase name
	pub fn from_name(name: &str) -> Option<Level> {
		Level::ALL.into_iter().find(|level| level.as_str() == name)
	}

	/// Look up a level by name, degrading to [`DEFAULT_LEVEL`] for empty or
	/// unknown input
	///
	/// # Examples
	///
	/// ```
	/// use logtree::Level;
	///
	/// assert_eq!(Level::from_name_or_default("warn"), Level::Warn);
	/// assert_eq!(Level::from_name_or_default("verbose"), Level::Trace);
	/// ```
	pub fn from_name_or_default(name: &str) -> Level {
		Level::from_name(name).unwrap_or(DEFAULT_LEVEL)
	}

	/// Returns `true` if `self` is strictly more severe than `other`
	pub const fn is_higher_severity(self, other: Level) -> bool {
		self.priority() < other.priority()
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Level {
	type Err = LoggingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Level::from_name(s).ok_or_else(|| LoggingError::UnknownLevel(s.to_string()))
	}
}

/// Priority of the level named `name`
///
/// Unknown names map to `0`, the priority of `fatal`.
pub fn priority_of(name: &str) -> u8 {
	Level::from_name(name).map_or(0, Level::priority)
}

/// Canonical name of the level named `name`
///
/// Empty or unknown names map to `"trace"`.
pub fn name_of(name: &str) -> &'static str {
	Level::from_name_or_default(name).as_str()
}

/// Returns `true` iff `priority_of(a) < priority_of(b)`
pub fn is_higher_severity(a: &str, b: &str) -> bool {
	priority_of(a) < priority_of(b)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("fatal", 0)]
	#[case("error", 1)]
	#[case("warn", 2)]
	#[case("info", 3)]
	#[case("debug", 4)]
	#[case("trace", 5)]
	fn test_priority_of_known_levels(#[case] name: &str, #[case] expected: u8) {
		assert_eq!(priority_of(name), expected);
		assert_eq!(name_of(name), name);
	}

	#[rstest]
	#[case("")]
	#[case("WARN")]
	#[case("warning")]
	#[case("critical")]
	fn test_unknown_names_degrade(#[case] name: &str) {
		assert_eq!(priority_of(name), 0);
		assert_eq!(name_of(name), "trace");
		assert!(name.parse::<Level>().is_err());
	}

	#[rstest]
	fn test_is_higher_severity_is_irreflexive() {
		for level in Level::ALL {
			assert!(!is_higher_severity(level.as_str(), level.as_str()));
			assert!(!level.is_higher_severity(level));
		}
	}

	#[rstest]
	fn test_is_higher_severity_follows_priority() {
		for a in Level::ALL {
			for b in Level::ALL {
				assert_eq!(
					is_higher_severity(a.as_str(), b.as_str()),
					a.priority() < b.priority()
				);
			}
		}
		assert!(is_higher_severity("fatal", "trace"));
		assert!(!is_higher_severity("debug", "info"));
	}

	#[rstest]
	fn test_serde_uses_lowercase_names() {
		let json = serde_json::to_string(&Level::Warn).unwrap();
		assert_eq!(json, "\"warn\"");

		let level: Level = serde_json::from_str("\"debug\"").unwrap();
		assert_eq!(level, Level::Debug);
	}
}

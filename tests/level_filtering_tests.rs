//! Tests for log level filtering across loggers and handlers

use logtree::{
	ConsoleHandler, FileHandler, Handler, Level, Manager, MemoryBackend, MemoryHandler,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn manager() -> Manager {
	Manager::with_default_backend(Arc::new(MemoryBackend::new()))
}

#[rstest]
fn test_logger_basic_levels(manager: Manager) {
	// Test that different log levels are properly recorded
	let logger = manager.get_logger("test");
	let handler = MemoryHandler::new("memory", Level::Trace);
	logger.add_handler(Arc::new(handler.clone()));
	logger.set_level(Some(Level::Debug));

	logger.error("Hey, this is an error.", None).unwrap();
	logger.warn("warning", None).unwrap();
	logger.info("info", None).unwrap();
	logger.debug("debug", None).unwrap();
	logger.trace("trace", None).unwrap();

	let records = handler.get_records();
	assert_eq!(records.len(), 4);
	assert_eq!(records[0].level, Level::Error);
	assert_eq!(records[1].level, Level::Warn);
	assert_eq!(records[2].level, Level::Info);
	assert_eq!(records[3].level, Level::Debug);
}

#[rstest]
fn test_logger_only_outputs_when_level_allows(manager: Manager) {
	let logger = manager.get_logger("svc");
	let handler = MemoryHandler::new("memory", Level::Trace);
	logger.add_handler(Arc::new(handler.clone()));
	logger.set_level(Some(Level::Warn));

	logger.info("x", None).unwrap();
	assert!(handler.get_records().is_empty());

	logger.error("y", None).unwrap();
	let records = handler.get_records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].message, "y");

	handler.clear();

	// Now lower the threshold
	logger.set_level(Some(Level::Info));
	logger.info("x", None).unwrap();
	assert_eq!(handler.get_records().len(), 1);
}

#[rstest]
fn test_multiple_handlers_different_levels(manager: Manager) {
	let logger = manager.get_logger("test");
	let info = MemoryHandler::new("info", Level::Info);
	let error = MemoryHandler::new("error", Level::Error);
	logger.add_handler(Arc::new(info.clone()));
	logger.add_handler(Arc::new(error.clone()));

	logger.debug("debug", None).unwrap();
	logger.info("info", None).unwrap();
	logger.warn("warning", None).unwrap();
	logger.error("error", None).unwrap();

	// The info handler gets info, warn and error
	let levels: Vec<Level> = info.get_records().iter().map(|r| r.level).collect();
	assert_eq!(levels, vec![Level::Info, Level::Warn, Level::Error]);

	// The error handler only gets error
	let records = error.get_records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].level, Level::Error);
}

#[rstest]
fn test_file_handler_drops_less_severe_record(manager: Manager) {
	// Arrange
	let output = MemoryBackend::new();
	let logger = manager.get_logger("svc");
	logger.add_handler(Arc::new(FileHandler::with_backend(
		"file",
		Level::Warn,
		Arc::new(output.clone()),
	)));

	// Act
	logger.info("not written", None).unwrap();

	// Assert
	assert!(output.entries().is_empty());
}

#[rstest]
fn test_inherited_level_filters_children(manager: Manager) {
	let handler = MemoryHandler::new("memory", Level::Trace);
	let parent = manager.get_logger("svc");
	parent.add_handler(Arc::new(handler.clone()));
	parent.set_level(Some(Level::Error));
	let child = manager.get_logger("svc.jobs.cleanup");

	child.warn("ignored", None).unwrap();
	child.error("kept", None).unwrap();

	let records = handler.get_records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].name, "svc.jobs.cleanup");
}

#[rstest]
#[case(Level::Fatal, 1)]
#[case(Level::Warn, 3)]
#[case(Level::Trace, 6)]
fn test_global_disable_threshold(
	manager: Manager,
	#[case] threshold: Level,
	#[case] expected: usize,
) {
	let logger = manager.get_logger("svc");
	let handler = MemoryHandler::new("memory", Level::Trace);
	logger.add_handler(Arc::new(handler.clone()));
	manager.set_disable(threshold);

	for level in Level::ALL {
		logger.log(level, level.as_str(), None).unwrap();
	}

	assert_eq!(handler.get_records().len(), expected);
}

#[rstest]
fn test_handler_level_is_checked_after_logger_level(manager: Manager) {
	let output = MemoryBackend::new();
	let console = ConsoleHandler::with_backend("console", Level::Error, Arc::new(output.clone()));
	let logger = manager.get_logger("svc");
	logger.add_handler(Arc::new(console));

	logger.warn("passes the logger, not the handler", None).unwrap();
	logger.fatal("passes both", None).unwrap();

	assert_eq!(output.messages(), vec!["passes both"]);
	assert_eq!(logger.handlers()[0].level(), Level::Error);
}

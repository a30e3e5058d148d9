//! Logger registry
//!
//! Loggers live in an arena owned by the [`Manager`]. Names map either to a
//! real logger or to a placeholder that records which loggers are waiting
//! for an ancestor that has not been created yet. Parent links are arena
//! indices, never owning references.

use crate::backends::{ConsoleBackend, OutputBackend};
use crate::handlers::{ConsoleHandler, DEFAULT_HANDLER_NAME, Handler};
use crate::level::{DEFAULT_LEVEL, Level};
use crate::logger::Logger;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the root logger
pub const ROOT_NAME: &str = "root";

pub(crate) type LoggerId = usize;

pub(crate) const ROOT_ID: LoggerId = 0;

pub(crate) struct LoggerNode {
	pub(crate) name: String,
	pub(crate) level: Option<Level>,
	pub(crate) handlers: Vec<Arc<dyn Handler>>,
	pub(crate) parent: Option<LoggerId>,
	pub(crate) propagate: bool,
	pub(crate) warned_no_handlers: bool,
}

impl LoggerNode {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			level: None,
			handlers: Vec::new(),
			parent: None,
			propagate: true,
			warned_no_handlers: false,
		}
	}
}

enum Entry {
	Logger(LoggerId),
	/// Loggers whose ancestor at this name does not exist yet
	PlaceHolder(Vec<LoggerId>),
}

pub(crate) struct Registry {
	nodes: Vec<LoggerNode>,
	entries: HashMap<String, Entry>,
	disable: u8,
}

impl Registry {
	fn new(root: LoggerNode) -> Self {
		Self {
			nodes: vec![root],
			entries: HashMap::new(),
			disable: DEFAULT_LEVEL.priority(),
		}
	}

	pub(crate) fn node(&self, id: LoggerId) -> &LoggerNode {
		&self.nodes[id]
	}

	pub(crate) fn node_mut(&mut self, id: LoggerId) -> &mut LoggerNode {
		&mut self.nodes[id]
	}

	pub(crate) fn disable(&self) -> u8 {
		self.disable
	}

	fn get_logger(&mut self, name: &str) -> LoggerId {
		if name.is_empty() || name == ROOT_NAME {
			return ROOT_ID;
		}

		if let Some(Entry::Logger(id)) = self.entries.get(name) {
			return *id;
		}

		let id = self.push_node(name);
		match self.entries.insert(name.to_string(), Entry::Logger(id)) {
			Some(Entry::PlaceHolder(waiting)) => {
				tracing::debug!(
					logger = name,
					children = waiting.len(),
					"materialized placeholder"
				);
				self.fix_up_children(&waiting, id);
			}
			_ => tracing::debug!(logger = name, "created logger"),
		}
		let parent = self.fix_up_parents(id);
		self.nodes[id].parent = Some(parent);
		id
	}

	fn push_node(&mut self, name: &str) -> LoggerId {
		self.nodes.push(LoggerNode::new(name));
		self.nodes.len() - 1
	}

	/// Walk the dotted ancestors of `id` from the most specific to the least,
	/// registering `id` with every placeholder on the way, and return the
	/// first real logger found (or the root)
	fn fix_up_parents(&mut self, id: LoggerId) -> LoggerId {
		let name = self.nodes[id].name.clone();
		let mut end = name.rfind('.');

		while let Some(i) = end.filter(|&i| i > 0) {
			let ancestor = &name[..i];
			match self.entries.get_mut(ancestor) {
				Some(Entry::Logger(parent)) => return *parent,
				Some(Entry::PlaceHolder(waiting)) => waiting.push(id),
				None => {
					self.entries
						.insert(ancestor.to_string(), Entry::PlaceHolder(vec![id]));
				}
			}
			end = name[..i].rfind('.');
		}

		ROOT_ID
	}

	/// Re-parent loggers that waited on the placeholder now replaced by `id`
	///
	/// A child whose current parent already sits below `id` in the tree keeps
	/// that parent. The root is never below anything, whatever its name.
	fn fix_up_children(&mut self, waiting: &[LoggerId], id: LoggerId) {
		let scope = format!("{}.", self.nodes[id].name);
		for &child in waiting {
			let parent = self.nodes[child].parent.unwrap_or(ROOT_ID);
			let below = parent != ROOT_ID && self.nodes[parent].name.starts_with(&scope);
			if !below {
				self.nodes[child].parent = Some(id);
			}
		}
	}

	/// Handlers of `id` followed, if it propagates, by those of every
	/// ancestor in child-to-root order
	pub(crate) fn collect_handlers(&self, id: LoggerId) -> Vec<Arc<dyn Handler>> {
		let propagate = self.nodes[id].propagate;
		let mut handlers = Vec::new();
		let mut current = Some(id);
		while let Some(node_id) = current {
			let node = &self.nodes[node_id];
			handlers.extend(node.handlers.iter().cloned());
			current = if propagate { node.parent } else { None };
		}
		handlers
	}

	pub(crate) fn effective_level(&self, id: LoggerId) -> Level {
		let mut current = Some(id);
		while let Some(node_id) = current {
			let node = &self.nodes[node_id];
			if let Some(level) = node.level {
				return level;
			}
			current = node.parent;
		}
		DEFAULT_LEVEL
	}
}

/// Registry creating and owning every logger
///
/// `Manager` is a cheap handle; clones share the same registry. Create one at
/// application start and hand it (or loggers obtained from it) to the code
/// that logs.
///
/// # Examples
///
/// ```
/// use logtree::Manager;
///
/// let manager = Manager::new();
/// let child = manager.get_logger("app.db.pool");
/// let app = manager.get_logger("app");
///
/// assert_eq!(child.parent().unwrap().name(), "app");
/// assert_eq!(app.parent().unwrap().name(), "root");
/// assert_eq!(manager.get_logger("app"), app);
/// ```
#[derive(Clone)]
pub struct Manager {
	inner: Arc<RwLock<Registry>>,
}

impl Manager {
	/// Create a registry whose root logger prints to standard output
	pub fn new() -> Self {
		Self::with_default_backend(Arc::new(ConsoleBackend::new()))
	}

	/// Create a registry whose root default handler writes to `backend`
	pub fn with_default_backend(backend: Arc<dyn OutputBackend>) -> Self {
		let mut root = LoggerNode::new(ROOT_NAME);
		root.handlers.push(Arc::new(ConsoleHandler::with_backend(
			DEFAULT_HANDLER_NAME,
			DEFAULT_LEVEL,
			backend,
		)));
		Self {
			inner: Arc::new(RwLock::new(Registry::new(root))),
		}
	}

	/// Return the logger called `name`, creating it and any missing
	/// placeholders on first use
	///
	/// `""` and `"root"` resolve to the root logger.
	pub fn get_logger(&self, name: &str) -> Logger {
		let id = self.write().get_logger(name);
		Logger::new(id, self.clone())
	}

	/// Like [`Manager::get_logger`], with `None` meaning the root logger
	pub fn get_logger_opt(&self, name: Option<&str>) -> Logger {
		match name {
			Some(name) => self.get_logger(name),
			None => self.root(),
		}
	}

	pub fn root(&self) -> Logger {
		Logger::new(ROOT_ID, self.clone())
	}

	/// Global threshold as a priority number
	///
	/// Records whose level priority is greater than this are suppressed for
	/// every logger.
	pub fn disable(&self) -> u8 {
		self.read().disable
	}

	pub fn set_disable(&self, level: Level) {
		self.write().disable = level.priority();
	}

	/// Names of all real loggers, placeholders excluded
	pub fn logger_names(&self) -> Vec<String> {
		let registry = self.read();
		let mut names: Vec<String> = registry
			.entries
			.iter()
			.filter(|(_, entry)| matches!(entry, Entry::Logger(_)))
			.map(|(name, _)| name.clone())
			.collect();
		names.sort();
		names
	}

	pub(crate) fn read(&self) -> RwLockReadGuard<'_, Registry> {
		self.inner.read()
	}

	pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Registry> {
		self.inner.write()
	}

	pub(crate) fn same_registry(&self, other: &Manager) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	#[cfg(test)]
	fn is_placeholder(&self, name: &str) -> bool {
		matches!(self.read().entries.get(name), Some(Entry::PlaceHolder(_)))
	}
}

impl Default for Manager {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Manager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registry = self.read();
		f.debug_struct("Manager")
			.field("loggers", &registry.nodes.len())
			.field("disable", &registry.disable)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backends::MemoryBackend;
	use rstest::{fixture, rstest};

	#[fixture]
	fn manager() -> Manager {
		Manager::with_default_backend(Arc::new(MemoryBackend::new()))
	}

	fn parent_name(logger: &Logger) -> Option<String> {
		logger.parent().map(|parent| parent.name())
	}

	#[rstest]
	fn test_root_aliases(manager: Manager) {
		assert_eq!(manager.get_logger(""), manager.root());
		assert_eq!(manager.get_logger(ROOT_NAME), manager.root());
		assert_eq!(manager.root().name(), ROOT_NAME);
		assert!(manager.root().parent().is_none());
	}

	#[rstest]
	fn test_get_logger_is_idempotent(manager: Manager) {
		let first = manager.get_logger("svc");
		let second = manager.get_logger("svc");

		assert_eq!(first, second);
		assert_eq!(manager.logger_names(), vec!["svc".to_string()]);
	}

	#[rstest]
	fn test_placeholders_created_for_missing_ancestors(manager: Manager) {
		let leaf = manager.get_logger("a.b.c");

		assert_eq!(parent_name(&leaf).as_deref(), Some(ROOT_NAME));
		assert!(manager.is_placeholder("a"));
		assert!(manager.is_placeholder("a.b"));
		assert_eq!(manager.logger_names(), vec!["a.b.c".to_string()]);
	}

	#[rstest]
	fn test_materializing_placeholder_reparents_children(manager: Manager) {
		// Arrange
		let leaf = manager.get_logger("a.b.c");

		// Act
		let a = manager.get_logger("a");

		// Assert
		assert!(!manager.is_placeholder("a"));
		assert_eq!(parent_name(&leaf).as_deref(), Some("a"));
		assert_eq!(parent_name(&a).as_deref(), Some(ROOT_NAME));

		let ab = manager.get_logger("a.b");
		assert_eq!(parent_name(&leaf).as_deref(), Some("a.b"));
		assert_eq!(parent_name(&ab).as_deref(), Some("a"));
	}

	#[rstest]
	fn test_child_with_closer_parent_is_not_reparented(manager: Manager) {
		let leaf = manager.get_logger("a.b.c");
		manager.get_logger("a.b");

		manager.get_logger("a");

		assert_eq!(parent_name(&leaf).as_deref(), Some("a.b"));
		assert_eq!(
			parent_name(&manager.get_logger("a.b")).as_deref(),
			Some("a")
		);
	}

	#[rstest]
	fn test_sibling_waiting_on_shared_placeholder(manager: Manager) {
		let x = manager.get_logger("a.x");
		let y = manager.get_logger("a.y.z");

		manager.get_logger("a");

		assert_eq!(parent_name(&x).as_deref(), Some("a"));
		assert_eq!(parent_name(&y).as_deref(), Some("a"));
	}

	#[rstest]
	#[case(&["a", "a.b", "a.b.c", "a.d"])]
	#[case(&["a.b.c", "a.d", "a.b", "a"])]
	#[case(&["a.d", "a.b.c", "a", "a.b"])]
	#[case(&["a.b", "a.b.c", "a.d", "a"])]
	fn test_tree_is_order_independent(manager: Manager, #[case] order: &[&str]) {
		for name in order {
			manager.get_logger(name);
		}

		let parents: Vec<(String, Option<String>)> = ["a", "a.b", "a.b.c", "a.d"]
			.iter()
			.map(|name| (name.to_string(), parent_name(&manager.get_logger(name))))
			.collect();

		assert_eq!(
			parents,
			vec![
				("a".to_string(), Some(ROOT_NAME.to_string())),
				("a.b".to_string(), Some("a".to_string())),
				("a.b.c".to_string(), Some("a.b".to_string())),
				("a.d".to_string(), Some("a".to_string())),
			]
		);
	}

	#[rstest]
	#[case("r", "r.x")]
	#[case("ro", "ro.x")]
	#[case("roo", "roo.x.y")]
	fn test_prefix_of_root_name_is_order_independent(
		#[case] ancestor: &str,
		#[case] descendant: &str,
	) {
		let child_first = Manager::with_default_backend(Arc::new(MemoryBackend::new()));
		let leaf = child_first.get_logger(descendant);
		child_first.get_logger(ancestor);

		let parent_first = Manager::with_default_backend(Arc::new(MemoryBackend::new()));
		parent_first.get_logger(ancestor);
		let expected = parent_first.get_logger(descendant);

		assert_eq!(parent_name(&leaf).as_deref(), Some(ancestor));
		assert_eq!(parent_name(&leaf), parent_name(&expected));
	}

	#[rstest]
	fn test_similar_prefix_is_not_an_ancestor(manager: Manager) {
		let ab = manager.get_logger("ab.c");

		manager.get_logger("a");

		assert_eq!(parent_name(&ab).as_deref(), Some(ROOT_NAME));
	}

	#[rstest]
	fn test_disable_threshold(manager: Manager) {
		assert_eq!(manager.disable(), Level::Trace.priority());

		manager.set_disable(Level::Warn);

		assert_eq!(manager.disable(), 2);
	}
}

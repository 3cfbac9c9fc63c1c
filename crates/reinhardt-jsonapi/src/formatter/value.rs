//! Attribute value formatters

use crate::resource::Resource;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders an attribute value, with access to the owning resource
pub trait ValueFormatter: Send + Sync {
	fn format(&self, value: &Value, resource: &dyn Resource) -> Value;
}

impl<F> ValueFormatter for F
where
	F: Fn(&Value, &dyn Resource) -> Value + Send + Sync,
{
	fn format(&self, value: &Value, resource: &dyn Resource) -> Value {
		self(value, resource)
	}
}

/// Passes values through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFormatter;

impl ValueFormatter for IdentityFormatter {
	fn format(&self, value: &Value, _resource: &dyn Resource) -> Value {
		value.clone()
	}
}

/// Renders numeric identifiers as strings
#[derive(Debug, Clone, Copy, Default)]
pub struct IdFormatter;

impl ValueFormatter for IdFormatter {
	fn format(&self, value: &Value, _resource: &dyn Resource) -> Value {
		match value {
			Value::Number(n) => Value::String(n.to_string()),
			other => other.clone(),
		}
	}
}

/// Maps format tags to value formatters
///
/// Lookups for unregistered tags, and for attributes without a tag, fall back
/// to the identity formatter.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::ValueFormatterRegistry;
/// use serde_json::{Value, json};
///
/// let registry = ValueFormatterRegistry::new()
///     .with("upper", |value: &Value, _: &dyn reinhardt_jsonapi::Resource| {
///         json!(value.as_str().unwrap_or_default().to_uppercase())
///     });
///
/// assert!(registry.contains("upper"));
/// assert!(registry.contains("id"));
/// assert!(!registry.contains("date"));
/// ```
#[derive(Clone)]
pub struct ValueFormatterRegistry {
	formatters: HashMap<String, Arc<dyn ValueFormatter>>,
	fallback: Arc<dyn ValueFormatter>,
}

impl ValueFormatterRegistry {
	/// Create a registry holding the built-in `default` and `id` formatters
	pub fn new() -> Self {
		let mut formatters: HashMap<String, Arc<dyn ValueFormatter>> = HashMap::new();
		formatters.insert("default".to_string(), Arc::new(IdentityFormatter));
		formatters.insert("id".to_string(), Arc::new(IdFormatter));
		Self {
			formatters,
			fallback: Arc::new(IdentityFormatter),
		}
	}

	/// Register a formatter under a tag, replacing any previous one
	pub fn register(&mut self, tag: impl Into<String>, formatter: impl ValueFormatter + 'static) {
		self.formatters.insert(tag.into(), Arc::new(formatter));
	}

	/// Builder-style [`register`](Self::register)
	pub fn with(mut self, tag: impl Into<String>, formatter: impl ValueFormatter + 'static) -> Self {
		self.register(tag, formatter);
		self
	}

	/// Check if a tag has a registered formatter
	pub fn contains(&self, tag: &str) -> bool {
		self.formatters.contains_key(tag)
	}

	/// Formatter for a tag, falling back to identity
	pub fn formatter_for(&self, tag: Option<&str>) -> &dyn ValueFormatter {
		let formatter = tag
			.and_then(|tag| self.formatters.get(tag))
			.unwrap_or(&self.fallback);
		&**formatter
	}

	/// Format a value with the formatter registered for `tag`
	pub fn format(&self, tag: Option<&str>, value: &Value, resource: &dyn Resource) -> Value {
		self.formatter_for(tag).format(value, resource)
	}
}

impl Default for ValueFormatterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ValueFormatterRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut tags: Vec<&String> = self.formatters.keys().collect();
		tags.sort();
		f.debug_struct("ValueFormatterRegistry")
			.field("tags", &tags)
			.finish()
	}
}

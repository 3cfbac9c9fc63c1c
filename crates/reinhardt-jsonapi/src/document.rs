//! Result assembly
//!
//! Flattens the deduplication store and the link registry into the final
//! document:
//!
//! ```text
//! {
//!   "links":  { "<type>.<assoc>": <template> | { "href", "type" } },   // optional
//!   "<primary type>": <object> | [<object>, ...],
//!   "linked": { "<type>": [<object>, ...], ... }                       // optional
//! }
//! ```

use crate::error::SerializerResult;
use crate::links::LinkRegistry;
use crate::store::ResourceStore;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Key of the top-level relationship template section
pub const LINKS_KEY: &str = "links";
/// Key of the side-loaded resources section
pub const LINKED_KEY: &str = "linked";

/// A serialized JSON:API document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
	map: Map<String, Value>,
}

impl Document {
	/// The document returned for an absent or empty source
	pub fn empty() -> Self {
		Self::default()
	}

	/// Assemble a document from the per-call store and link registry
	///
	/// `primary_type` is the rendered type of the first primary resource. When
	/// `is_collection` is false its single primary entry is emitted as a bare
	/// object instead of a one-element array.
	pub fn assemble(
		store: ResourceStore,
		links: LinkRegistry,
		primary_type: &str,
		is_collection: bool,
	) -> Self {
		let mut primary: IndexMap<String, Vec<Value>> = IndexMap::new();
		primary.insert(primary_type.to_string(), Vec::new());
		let mut linked = Map::new();

		for (resource_type, entries) in store.into_groups() {
			let mut linked_objects = Vec::new();
			for entry in entries {
				let object = Value::Object(entry.fragment);
				if entry.primary {
					primary.entry(resource_type.clone()).or_default().push(object);
				} else {
					linked_objects.push(object);
				}
			}
			if !linked_objects.is_empty() {
				linked.insert(resource_type, Value::Array(linked_objects));
			}
		}

		let mut map = Map::new();
		if !links.is_empty() {
			map.insert(LINKS_KEY.to_string(), Value::Object(links.into_map()));
		}
		for (resource_type, mut objects) in primary {
			let value = if !is_collection && resource_type == primary_type && objects.len() == 1 {
				objects.remove(0)
			} else {
				Value::Array(objects)
			};
			map.insert(resource_type, value);
		}
		if !linked.is_empty() {
			map.insert(LINKED_KEY.to_string(), Value::Object(linked));
		}

		let linked_types = map.get(LINKED_KEY).and_then(Value::as_object).map_or(0, Map::len);
		tracing::debug!(sections = map.len(), linked_types, "assembled document");
		Self { map }
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Top-level value by rendered key
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.map.get(key)
	}

	/// The top-level `links` section, if any template was registered
	pub fn links(&self) -> Option<&Map<String, Value>> {
		self.map.get(LINKS_KEY).and_then(Value::as_object)
	}

	/// The `linked` section, if any non-primary resource was stored
	pub fn linked(&self) -> Option<&Map<String, Value>> {
		self.map.get(LINKED_KEY).and_then(Value::as_object)
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.map
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.map)
	}

	/// Render as indented JSON text
	pub fn to_string_pretty(&self) -> SerializerResult<String> {
		Ok(serde_json::to_string_pretty(&self.map)?)
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let json = serde_json::to_string(&self.map).map_err(|_| fmt::Error)?;
		f.write_str(&json)
	}
}

impl From<Document> for Value {
	fn from(document: Document) -> Self {
		document.into_value()
	}
}

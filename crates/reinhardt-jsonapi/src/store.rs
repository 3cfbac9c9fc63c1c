//! Deduplication store
//!
//! Holds every resource fragment rendered during one call, keyed by rendered
//! type and id. Each key is stored once; the first fragment written wins and
//! a later primary encounter only flips the `primary` flag.

use crate::resource::ResourceId;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A rendered resource and its placement in the document
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedEntry {
	/// Type name as rendered by the key formatter
	pub resource_type: String,
	pub id: ResourceId,
	/// Whether the resource belongs in the primary section
	pub primary: bool,
	pub fragment: Map<String, Value>,
}

/// Effect of an insertion on the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
	/// Stored, and it is the first entry of its type
	FirstOfType,
	/// Stored next to existing entries of the same type
	Added,
	/// Already present as linked, now marked primary
	Promoted,
	/// Already present, nothing changed
	Unchanged,
}

impl Insertion {
	pub fn is_first_of_type(self) -> bool {
		self == Insertion::FirstOfType
	}
}

/// Per-call store of rendered resources
///
/// Types and entries keep their insertion order.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{Insertion, ResourceId, ResourceStore};
/// use serde_json::Map;
///
/// let mut store = ResourceStore::new();
/// let id = ResourceId::Int(9);
///
/// assert_eq!(store.add_linked("tags", id.clone(), Map::new()), Insertion::FirstOfType);
/// assert_eq!(store.add_linked("tags", id.clone(), Map::new()), Insertion::Unchanged);
/// assert_eq!(store.add_primary("tags", id.clone(), Map::new()), Insertion::Promoted);
/// assert!(store.get("tags", &id).unwrap().primary);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
	types: IndexMap<String, IndexMap<ResourceId, SerializedEntry>>,
}

impl ResourceStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Membership test guarding full re-serialization of a resource
	pub fn contains(&self, resource_type: &str, id: &ResourceId) -> bool {
		self.get(resource_type, id).is_some()
	}

	pub fn get(&self, resource_type: &str, id: &ResourceId) -> Option<&SerializedEntry> {
		self.types.get(resource_type)?.get(id)
	}

	/// Store a primary resource, or promote the existing entry
	pub fn add_primary(&mut self, resource_type: &str, id: ResourceId, fragment: Map<String, Value>) -> Insertion {
		if self.promote(resource_type, &id) {
			return Insertion::Promoted;
		}
		if self.contains(resource_type, &id) {
			return Insertion::Unchanged;
		}
		self.store(resource_type, id, true, fragment)
	}

	/// Store a linked resource unless it is already present
	pub fn add_linked(&mut self, resource_type: &str, id: ResourceId, fragment: Map<String, Value>) -> Insertion {
		if self.contains(resource_type, &id) {
			return Insertion::Unchanged;
		}
		self.store(resource_type, id, false, fragment)
	}

	/// Mark an existing linked entry as primary
	///
	/// Returns `true` only when the flag actually changed.
	pub fn promote(&mut self, resource_type: &str, id: &ResourceId) -> bool {
		match self.types.get_mut(resource_type).and_then(|entries| entries.get_mut(id)) {
			Some(entry) if !entry.primary => {
				entry.primary = true;
				tracing::trace!(resource_type, %id, "promoted linked resource to primary");
				true
			}
			_ => false,
		}
	}

	fn store(&mut self, resource_type: &str, id: ResourceId, primary: bool, fragment: Map<String, Value>) -> Insertion {
		let first_of_type = !self.types.contains_key(resource_type);
		tracing::trace!(resource_type, %id, primary, "stored resource");

		let entry = SerializedEntry {
			resource_type: resource_type.to_string(),
			id: id.clone(),
			primary,
			fragment,
		};
		self.types
			.entry(resource_type.to_string())
			.or_default()
			.insert(id, entry);

		if first_of_type {
			Insertion::FirstOfType
		} else {
			Insertion::Added
		}
	}

	/// Rendered type names in first-stored order
	pub fn types(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(String::as_str)
	}

	/// Entries of one rendered type in insertion order
	pub fn entries(&self, resource_type: &str) -> impl Iterator<Item = &SerializedEntry> {
		self.types
			.get(resource_type)
			.into_iter()
			.flat_map(|entries| entries.values())
	}

	/// Consume the store, yielding entries grouped by type
	pub fn into_groups(self) -> impl Iterator<Item = (String, Vec<SerializedEntry>)> {
		self.types
			.into_iter()
			.map(|(resource_type, entries)| (resource_type, entries.into_values().collect()))
	}

	/// Total number of stored entries
	pub fn len(&self) -> usize {
		self.types.values().map(IndexMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Number of entries in the primary section
	pub fn primary_count(&self) -> usize {
		self.types
			.values()
			.flat_map(IndexMap::values)
			.filter(|entry| entry.primary)
			.count()
	}
}

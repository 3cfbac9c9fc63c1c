//! Relationship links
//!
//! Two outputs are produced here. The top-level `links` section holds one
//! relationship template per `(type, association)`, rendered the first time a
//! resource of that type is stored. Resource-level `links` hold the related
//! identifiers of each visible association, either bare or wrapped in a
//! descriptive object.
//!
//! Templates carry a `{type.association}` placeholder instead of concrete ids;
//! filling it in is left to the URL-building layer.

use crate::error::SerializerError;
use crate::formatter::{KeyFormat, KeyFormatter, normalize_name};
use crate::resource::{Association, Cardinality, RelatedIds, ResourceId};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Style of the top-level `links` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkStyle {
	/// No top-level links are emitted
	#[default]
	None,
	/// Each entry is the bare template string
	Href,
	/// Each entry is `{ "href": template, "type": target type }`
	Full,
}

impl FromStr for LinkStyle {
	type Err = SerializerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" | "suppressed" => Ok(LinkStyle::None),
			"href" | "href_only" => Ok(LinkStyle::Href),
			"full" => Ok(LinkStyle::Full),
			other => Err(SerializerError::InvalidLinkStyle(other.to_string())),
		}
	}
}

impl fmt::Display for LinkStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			LinkStyle::None => "none",
			LinkStyle::Href => "href",
			LinkStyle::Full => "full",
		})
	}
}

/// Style of resource-level relationship values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipStyle {
	/// The related id, or the ordered list of related ids
	#[default]
	Ids,
	/// `{ "ids": ..., "href": template, "type": target type }`
	CollectionObjects,
}

impl FromStr for RelationshipStyle {
	type Err = SerializerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ids" | "bare_ids" => Ok(RelationshipStyle::Ids),
			"collection_objects" | "descriptive_object" | "href" => {
				Ok(RelationshipStyle::CollectionObjects)
			}
			other => Err(SerializerError::InvalidRelationshipStyle(other.to_string())),
		}
	}
}

impl fmt::Display for RelationshipStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			RelationshipStyle::Ids => "ids",
			RelationshipStyle::CollectionObjects => "collection_objects",
		})
	}
}

/// Everything a template generator needs to know about one relationship
///
/// Type and association names are already rendered by the key formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget<'a> {
	pub owner_type: &'a str,
	pub association: &'a str,
	pub target_type: &'a str,
	pub namespace: &'a str,
	pub base_url: &'a str,
}

impl LinkTarget<'_> {
	/// Key of the relationship in the top-level `links` section
	pub fn key(&self) -> String {
		format!("{}.{}", self.owner_type, self.association)
	}

	/// Placeholder standing in for the related ids, e.g. `{posts.author}`
	pub fn placeholder(&self) -> String {
		format!("{{{}}}", self.key())
	}
}

/// Generates relationship href templates
///
/// Implement this to plug in a router-aware URL scheme. Closures taking a
/// [`LinkTarget`] implement it as well.
pub trait HrefTemplater: Send + Sync {
	fn template(&self, target: &LinkTarget<'_>) -> String;
}

impl<F> HrefTemplater for F
where
	F: Fn(&LinkTarget<'_>) -> String + Send + Sync,
{
	fn template(&self, target: &LinkTarget<'_>) -> String {
		self(target)
	}
}

/// `{base_url}/{namespace}/{target_type}/{owner.association}`
///
/// Empty base URL and namespace segments are dropped.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{DefaultHrefTemplater, HrefTemplater, LinkTarget};
///
/// let target = LinkTarget {
///     owner_type: "cats",
///     association: "mother",
///     target_type: "cats",
///     namespace: "",
///     base_url: "http://test",
/// };
/// assert_eq!(DefaultHrefTemplater.template(&target), "http://test/cats/{cats.mother}");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHrefTemplater;

impl HrefTemplater for DefaultHrefTemplater {
	fn template(&self, target: &LinkTarget<'_>) -> String {
		let mut href = String::new();
		if !target.base_url.is_empty() {
			href.push_str(target.base_url.trim_end_matches('/'));
			href.push('/');
		}
		if !target.namespace.is_empty() {
			href.push_str(&normalize_name(target.namespace));
			href.push('/');
		}
		href.push_str(target.target_type);
		href.push('/');
		href.push_str(&target.placeholder());
		href
	}
}

/// Renders link templates and relationship values for one call
pub struct LinkResolver<'a> {
	key_format: &'a KeyFormat,
	templater: &'a dyn HrefTemplater,
	namespace: &'a str,
	base_url: &'a str,
	link_style: LinkStyle,
	relationship_style: RelationshipStyle,
}

impl<'a> LinkResolver<'a> {
	pub fn new(
		key_format: &'a KeyFormat,
		templater: &'a dyn HrefTemplater,
		namespace: &'a str,
		base_url: &'a str,
	) -> Self {
		Self {
			key_format,
			templater,
			namespace,
			base_url,
			link_style: LinkStyle::default(),
			relationship_style: RelationshipStyle::default(),
		}
	}

	pub fn link_style(mut self, style: LinkStyle) -> Self {
		self.link_style = style;
		self
	}

	pub fn relationship_style(mut self, style: RelationshipStyle) -> Self {
		self.relationship_style = style;
		self
	}

	fn render<T>(&self, owner_type: &str, association: &Association, f: impl FnOnce(&LinkTarget<'_>) -> T) -> T {
		let owner_type = self.key_format.format(owner_type);
		let association_name = self.key_format.format(&association.name);
		let target_type = self.key_format.format(&association.target_type);
		f(&LinkTarget {
			owner_type: &owner_type,
			association: &association_name,
			target_type: &target_type,
			namespace: self.namespace,
			base_url: self.base_url,
		})
	}

	/// Top-level link entries for every declared association of a type
	///
	/// Returns `None` when top-level links are suppressed.
	pub fn type_links(&self, owner_type: &str, associations: &[Association]) -> Option<Map<String, Value>> {
		if self.link_style == LinkStyle::None {
			return None;
		}

		let links = associations
			.iter()
			.map(|association| {
				self.render(owner_type, association, |target| {
					let href = self.templater.template(target);
					let value = match self.link_style {
						LinkStyle::Full => json!({ "href": href, "type": target.target_type }),
						_ => Value::String(href),
					};
					(target.key(), value)
				})
			})
			.collect();
		Some(links)
	}

	/// Resource-level value of one association
	///
	/// Returns `None` when the association yields nothing, so the caller emits
	/// no entry. An empty to-many sequence still renders as `[]`.
	pub fn relationship_value(
		&self,
		owner_type: &str,
		association: &Association,
		ids: RelatedIds,
	) -> Option<Value> {
		let ids = match (association.cardinality, ids) {
			(Cardinality::One, RelatedIds::One(id)) => id?.to_value(),
			(Cardinality::Many, RelatedIds::Many(ids)) => {
				Value::Array(ids?.iter().map(ResourceId::to_value).collect())
			}
			(cardinality, ids) => {
				tracing::warn!(
					association = %association.name,
					?cardinality,
					?ids,
					"association accessor disagrees with declared cardinality"
				);
				return None;
			}
		};

		Some(match self.relationship_style {
			RelationshipStyle::Ids => ids,
			RelationshipStyle::CollectionObjects => self.render(owner_type, association, |target| {
				json!({
					"ids": ids,
					"href": self.templater.template(target),
					"type": target.target_type,
				})
			}),
		})
	}
}

/// Top-level link entries collected during one call
///
/// Entries are keyed by `"type.association"` and never overwritten once
/// written.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
	links: Map<String, Value>,
}

impl LinkRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add entries whose keys are not yet present
	pub fn extend(&mut self, links: Map<String, Value>) {
		for (key, value) in links {
			if !self.links.contains_key(&key) {
				self.links.insert(key, value);
			}
		}
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.links
	}
}

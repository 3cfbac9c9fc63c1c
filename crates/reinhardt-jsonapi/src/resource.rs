//! Resource capability contract
//!
//! The serializer never inspects concrete model types. Anything that can report
//! an identity, a set of attributes and a set of associations can be rendered by
//! implementing [`Resource`], typically as a thin adapter around an ORM model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a resource, as yielded by association accessors
pub type ResourceRef = Arc<dyn Resource>;

/// Identifier of a resource within its type
///
/// Serialized untagged, so integer ids render as JSON numbers and string ids
/// as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	Int(i64),
	Str(String),
}

impl ResourceId {
	/// Render the identifier as a JSON value
	pub fn to_value(&self) -> Value {
		match self {
			ResourceId::Int(id) => Value::from(*id),
			ResourceId::Str(id) => Value::from(id.as_str()),
		}
	}
}

impl fmt::Display for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceId::Int(id) => write!(f, "{}", id),
			ResourceId::Str(id) => f.write_str(id),
		}
	}
}

impl From<i64> for ResourceId {
	fn from(id: i64) -> Self {
		ResourceId::Int(id)
	}
}

impl From<i32> for ResourceId {
	fn from(id: i32) -> Self {
		ResourceId::Int(i64::from(id))
	}
}

impl From<&str> for ResourceId {
	fn from(id: &str) -> Self {
		ResourceId::Str(id.to_string())
	}
}

impl From<String> for ResourceId {
	fn from(id: String) -> Self {
		ResourceId::Str(id)
	}
}

/// A single attribute value together with its declared format tag
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	pub name: String,
	pub value: Value,
	/// Tag selecting a formatter from the
	/// [`ValueFormatterRegistry`](crate::ValueFormatterRegistry)
	pub format: Option<String>,
}

impl Attribute {
	/// Create an attribute rendered with the default formatter
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::Attribute;
	/// use serde_json::json;
	///
	/// let attr = Attribute::new("title", json!("New post")).format("default");
	/// assert_eq!(attr.name, "title");
	/// assert_eq!(attr.format.as_deref(), Some("default"));
	/// ```
	pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			format: None,
		}
	}

	/// Set the format tag
	pub fn format(mut self, tag: impl Into<String>) -> Self {
		self.format = Some(tag.into());
		self
	}
}

/// Number of resources on the far side of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	One,
	Many,
}

/// Declared association of a resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
	pub name: String,
	/// Logical type of the related resources
	pub target_type: String,
	pub cardinality: Cardinality,
}

impl Association {
	/// Declare a to-one association
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::{Association, Cardinality};
	///
	/// let author = Association::has_one("author", "people");
	/// assert_eq!(author.cardinality, Cardinality::One);
	/// assert_eq!(author.target_type, "people");
	/// ```
	pub fn has_one(name: impl Into<String>, target_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			target_type: target_type.into(),
			cardinality: Cardinality::One,
		}
	}

	/// Declare a to-many association
	pub fn has_many(name: impl Into<String>, target_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			target_type: target_type.into(),
			cardinality: Cardinality::Many,
		}
	}
}

/// Resources reached through an association accessor
///
/// `Many(None)` means the accessor produced nothing at all, which is distinct
/// from `Many(Some(vec![]))`.
#[derive(Clone)]
pub enum Related {
	One(Option<ResourceRef>),
	Many(Option<Vec<ResourceRef>>),
}

impl Related {
	/// Check the accessor's shape against the declared cardinality
	pub fn matches(&self, cardinality: Cardinality) -> bool {
		matches!(
			(self, cardinality),
			(Related::One(_), Cardinality::One) | (Related::Many(_), Cardinality::Many)
		)
	}

	/// Flatten into the list of reachable resources, in accessor order
	pub fn into_resources(self) -> Vec<ResourceRef> {
		match self {
			Related::One(resource) => resource.into_iter().collect(),
			Related::Many(resources) => resources.unwrap_or_default(),
		}
	}

	/// Identifiers of the related resources, preserving absence
	pub fn ids(&self) -> RelatedIds {
		match self {
			Related::One(resource) => RelatedIds::One(resource.as_ref().map(|r| r.id())),
			Related::Many(resources) => RelatedIds::Many(
				resources
					.as_ref()
					.map(|resources| resources.iter().map(|r| r.id()).collect()),
			),
		}
	}
}

impl fmt::Debug for Related {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Related").field(&self.ids()).finish()
	}
}

/// Identifiers on the far side of an association
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedIds {
	One(Option<ResourceId>),
	Many(Option<Vec<ResourceId>>),
}

/// Capability contract consumed by the serializer
///
/// `resource_type` and association names use the internal snake_case naming;
/// the serializer renders them through the configured key formatter.
pub trait Resource {
	fn id(&self) -> ResourceId;

	/// Logical type name, e.g. `"posts"`
	fn resource_type(&self) -> &str;

	/// Attribute values in declaration order
	fn attributes(&self) -> Vec<Attribute>;

	/// Declared associations in declaration order
	fn associations(&self) -> Vec<Association>;

	/// Resolve the resources behind an association
	fn related(&self, association: &str) -> Related;

	/// Resolve only the identifiers behind an association
	///
	/// Override when ids can be read without loading the related resources,
	/// e.g. from a foreign key column.
	fn related_ids(&self, association: &str) -> RelatedIds {
		self.related(association).ids()
	}

	/// Attribute and association names visible in the current context
	fn fetchable_fields(&self) -> Vec<String> {
		self.attributes()
			.into_iter()
			.map(|attr| attr.name)
			.chain(self.associations().into_iter().map(|assoc| assoc.name))
			.collect()
	}
}

impl fmt::Debug for dyn Resource + '_ {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.resource_type(), self.id())
	}
}

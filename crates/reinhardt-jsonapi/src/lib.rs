//! # Reinhardt JSON:API
//!
//! Serializes graphs of resources into JSON:API-style documents with a primary
//! section, a deduplicated `linked` side-load section and relationship link
//! templates.
//!
//! ## Features
//!
//! - **Deep side-loading**: dotted include paths such as `comments.tags`
//! - **Deduplication**: every `(type, id)` is rendered once per document, even on cyclic graphs
//! - **Link styles**: top-level templates as hrefs or `{ href, type }` objects, relationships as bare ids or descriptive objects
//! - **Key formatting**: underscored, camelized, dasherized or custom keys
//! - **Sparse fieldsets**: per-type attribute and association allow-lists
//!
//! ## Quick Start
//!
//! ```rust
//! use reinhardt_jsonapi::{
//!     Association, Attribute, LinkStyle, Related, Resource, ResourceId, ResourceRef,
//!     ResourceSerializer, SerializeOptions,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Person {
//!     id: i64,
//!     name: &'static str,
//! }
//!
//! impl Resource for Person {
//!     fn id(&self) -> ResourceId { self.id.into() }
//!     fn resource_type(&self) -> &str { "people" }
//!     fn attributes(&self) -> Vec<Attribute> { vec![Attribute::new("name", self.name)] }
//!     fn associations(&self) -> Vec<Association> { vec![] }
//!     fn related(&self, _name: &str) -> Related { Related::One(None) }
//! }
//!
//! struct Post {
//!     id: i64,
//!     author: Arc<Person>,
//! }
//!
//! impl Resource for Post {
//!     fn id(&self) -> ResourceId { self.id.into() }
//!     fn resource_type(&self) -> &str { "posts" }
//!     fn attributes(&self) -> Vec<Attribute> { vec![Attribute::new("title", "Rust")] }
//!     fn associations(&self) -> Vec<Association> {
//!         vec![Association::has_one("author", "people")]
//!     }
//!     fn related(&self, _name: &str) -> Related {
//!         Related::One(Some(self.author.clone() as ResourceRef))
//!     }
//! }
//!
//! let post = Post { id: 1, author: Arc::new(Person { id: 7, name: "Ferris" }) };
//! let options = SerializeOptions::new()
//!     .include(["author"])
//!     .toplevel_links_style(LinkStyle::Href)
//!     .base_url("http://example.com");
//!
//! let document = ResourceSerializer::new(options).serialize(&post).unwrap();
//! assert_eq!(
//!     document.into_value(),
//!     json!({
//!         "links": { "posts.author": "http://example.com/people/{posts.author}" },
//!         "posts": { "id": 1, "title": "Rust", "links": { "author": 7 } },
//!         "linked": { "people": [{ "id": 7, "name": "Ferris" }] },
//!     })
//! );
//! ```
//!
//! ## Module Organization
//!
//! - [`resource`]: the resource contract implemented by model adapters
//! - [`formatter`]: key casing and value formatters
//! - [`include`]: include path parsing
//! - [`links`]: link templates and relationship values
//! - [`store`]: per-call deduplication store
//! - [`serializer`]: the graph walker
//! - [`document`]: the assembled output
//! - [`settings`]: process-wide defaults and per-call options

pub mod document;
pub mod error;
pub mod formatter;
pub mod include;
pub mod links;
pub mod resource;
pub mod serializer;
pub mod settings;
pub mod store;

/// Media type of JSON:API documents
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

// Re-export commonly used types at the crate root for convenience
pub use document::{Document, LINKED_KEY, LINKS_KEY};
pub use error::{SerializerError, SerializerResult, SettingsError};
pub use formatter::{KeyFormat, KeyFormatter, ValueFormatter, ValueFormatterRegistry, normalize_name};
pub use include::{IncludeNode, IncludeTree};
pub use links::{
	DefaultHrefTemplater, HrefTemplater, LinkRegistry, LinkResolver, LinkStyle, LinkTarget,
	RelationshipStyle,
};
pub use resource::{
	Association, Attribute, Cardinality, Related, RelatedIds, Resource, ResourceId, ResourceRef,
};
pub use serializer::{PrimaryData, ResourceSerializer, serialize};
pub use settings::{
	JsonApiSettings, ResolvedOptions, SerializeOptions, configure, global_settings,
};
pub use store::{Insertion, ResourceStore, SerializedEntry};

//! Resource graph serializer
//!
//! Walks the primary resources and, following the include tree, every related
//! resource that was asked for. Each `(type, id)` is rendered at most once; a
//! resource reached again along another path only has its relationships
//! walked, so deeper include paths through it are still honored.

use crate::document::{Document, LINKS_KEY};
use crate::error::SerializerResult;
use crate::formatter::{KeyFormatter, normalize_name};
use crate::include::IncludeTree;
use crate::links::{LinkRegistry, LinkResolver};
use crate::resource::{Resource, ResourceRef};
use crate::settings::{JsonApiSettings, ResolvedOptions, SerializeOptions, global_settings};
use crate::store::ResourceStore;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Primary data of a document: nothing, one resource, or an ordered collection
#[derive(Debug, Clone, Copy)]
pub enum PrimaryData<'a> {
	None,
	One(&'a dyn Resource),
	Many(&'a [ResourceRef]),
}

impl<'a> PrimaryData<'a> {
	fn resources(&self) -> Vec<&'a dyn Resource> {
		match *self {
			PrimaryData::None => Vec::new(),
			PrimaryData::One(resource) => vec![resource],
			PrimaryData::Many(resources) => resources.iter().map(|r| r.as_ref()).collect(),
		}
	}

	fn is_collection(&self) -> bool {
		matches!(self, PrimaryData::Many(_))
	}
}

impl<'a> From<&'a dyn Resource> for PrimaryData<'a> {
	fn from(resource: &'a dyn Resource) -> Self {
		PrimaryData::One(resource)
	}
}

impl<'a, R: Resource> From<&'a R> for PrimaryData<'a> {
	fn from(resource: &'a R) -> Self {
		PrimaryData::One(resource)
	}
}

impl<'a> From<&'a ResourceRef> for PrimaryData<'a> {
	fn from(resource: &'a ResourceRef) -> Self {
		PrimaryData::One(resource.as_ref())
	}
}

impl<'a> From<&'a [ResourceRef]> for PrimaryData<'a> {
	fn from(resources: &'a [ResourceRef]) -> Self {
		PrimaryData::Many(resources)
	}
}

impl<'a> From<&'a Vec<ResourceRef>> for PrimaryData<'a> {
	fn from(resources: &'a Vec<ResourceRef>) -> Self {
		PrimaryData::Many(resources.as_slice())
	}
}

impl<'a, T> From<Option<T>> for PrimaryData<'a>
where
	T: Into<PrimaryData<'a>>,
{
	fn from(source: Option<T>) -> Self {
		source.map_or(PrimaryData::None, Into::into)
	}
}

/// Serializes resources into JSON:API documents
///
/// Options are resolved over the process-wide settings (or the settings given
/// to [`with_settings`](Self::with_settings)) on every call, and every call
/// works on its own store and link registry.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{
///     Association, Attribute, Related, Resource, ResourceId, ResourceSerializer,
///     SerializeOptions,
/// };
/// use serde_json::json;
///
/// struct Post;
///
/// impl Resource for Post {
///     fn id(&self) -> ResourceId { ResourceId::Int(1) }
///     fn resource_type(&self) -> &str { "posts" }
///     fn attributes(&self) -> Vec<Attribute> { vec![Attribute::new("title", "x")] }
///     fn associations(&self) -> Vec<Association> { vec![] }
///     fn related(&self, _name: &str) -> Related { Related::One(None) }
/// }
///
/// let document = ResourceSerializer::new(SerializeOptions::new())
///     .serialize(&Post)
///     .unwrap();
/// assert_eq!(document.into_value(), json!({ "posts": { "id": 1, "title": "x" } }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceSerializer {
	options: SerializeOptions,
	settings: Option<JsonApiSettings>,
}

impl ResourceSerializer {
	pub fn new(options: SerializeOptions) -> Self {
		Self {
			options,
			settings: None,
		}
	}

	/// Resolve options over these settings instead of the process-wide ones
	pub fn with_settings(mut self, settings: JsonApiSettings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Serialize a resource, a collection, or nothing
	///
	/// Invalid configuration fails before any resource is read, even when the
	/// source is empty.
	pub fn serialize<'a>(&self, source: impl Into<PrimaryData<'a>>) -> SerializerResult<Document> {
		let settings = self.settings.as_ref().unwrap_or_else(|| global_settings());
		let resolved = self.options.resolve(settings).inspect_err(|e| {
			tracing::warn!(error = %e, "rejected serializer configuration");
		})?;

		let source = source.into();
		let primaries = source.resources();
		let Some(first) = primaries.first() else {
			return Ok(Document::empty());
		};

		let primary_type = resolved.key_format.format(first.resource_type());
		let span = tracing::debug_span!(
			"jsonapi_serialize",
			primary_type = %primary_type,
			collection = source.is_collection(),
			count = primaries.len(),
		);
		let _guard = span.enter();
		tracing::trace!(include = ?resolved.include, "parsed include paths");

		let mut walker = GraphWalker::new(&resolved);
		for resource in primaries {
			walker.visit_primary(resource);
		}
		let (store, links) = walker.finish();

		Ok(Document::assemble(
			store,
			links,
			&primary_type,
			source.is_collection(),
		))
	}

	/// Serialize straight to JSON text
	pub fn serialize_to_string<'a>(&self, source: impl Into<PrimaryData<'a>>) -> SerializerResult<String> {
		Ok(serde_json::to_string(&self.serialize(source)?)?)
	}
}

/// Serialize with one-off options over the process-wide settings
pub fn serialize<'a>(source: impl Into<PrimaryData<'a>>, options: &SerializeOptions) -> SerializerResult<Document> {
	ResourceSerializer::new(options.clone()).serialize(source)
}

/// Per-call walk state
struct GraphWalker<'o> {
	options: &'o ResolvedOptions,
	links: LinkResolver<'o>,
	store: ResourceStore,
	registry: LinkRegistry,
}

impl<'o> GraphWalker<'o> {
	fn new(options: &'o ResolvedOptions) -> Self {
		let links = LinkResolver::new(
			&options.key_format,
			options.href_templater.as_ref(),
			&options.namespace,
			&options.base_url,
		)
		.link_style(options.link_style)
		.relationship_style(options.relationship_style);

		Self {
			options,
			links,
			store: ResourceStore::new(),
			registry: LinkRegistry::new(),
		}
	}

	fn finish(self) -> (ResourceStore, LinkRegistry) {
		(self.store, self.registry)
	}

	fn key(&self, name: &str) -> String {
		self.options.key_format.format(name)
	}

	fn visit_primary(&mut self, resource: &dyn Resource) {
		let options = self.options;
		let resource_type = self.key(resource.resource_type());
		let id = resource.id();

		if self.store.contains(&resource_type, &id) {
			// Reached earlier through an include; keep its fragment, but walk
			// the primary-level include paths from it too.
			self.store.promote(&resource_type, &id);
			self.relationship_fragment(resource, &options.include, false);
		} else {
			let fragment = self.object_fragment(resource, &options.include);
			self.record(resource, fragment, true);
		}
	}

	/// Attribute and association names rendered for this resource
	fn visible_fields(&self, resource: &dyn Resource) -> HashSet<String> {
		let resource_type = normalize_name(resource.resource_type());
		resource
			.fetchable_fields()
			.into_iter()
			.filter(|field| self.options.field_allowed(&resource_type, field))
			.collect()
	}

	fn object_fragment(&mut self, resource: &dyn Resource, include: &IncludeTree) -> Map<String, Value> {
		let mut fragment = self.attribute_fragment(resource);
		let links = self.relationship_fragment(resource, include, true);
		if !links.is_empty() {
			fragment.insert(LINKS_KEY.to_string(), Value::Object(links));
		}
		fragment
	}

	fn attribute_fragment(&self, resource: &dyn Resource) -> Map<String, Value> {
		let visible = self.visible_fields(resource);
		let id_key = self.key("id");

		let mut fragment = Map::new();
		fragment.insert(id_key.clone(), resource.id().to_value());

		for attribute in resource.attributes() {
			if !visible.contains(&attribute.name) {
				continue;
			}
			let value = self.options.value_formatters.format(
				attribute.format.as_deref(),
				&attribute.value,
				resource,
			);
			// A declared `id` attribute only reformats the id slot
			let key = if attribute.name == "id" {
				id_key.clone()
			} else {
				self.key(&attribute.name)
			};
			fragment.insert(key, value);
		}
		fragment
	}

	/// Render relationship values and side-load requested associations
	///
	/// With `emit` unset only the include walk happens; this is the path for
	/// resources whose own fragment is already stored. Side-loading needs the
	/// association to pass the field allow-list, not only `fetchable_fields`.
	fn relationship_fragment(&mut self, resource: &dyn Resource, include: &IncludeTree, emit: bool) -> Map<String, Value> {
		let visible = self.visible_fields(resource);
		let mut links = Map::new();

		for association in resource.associations() {
			if !visible.contains(&association.name) {
				continue;
			}

			if emit {
				let ids = resource.related_ids(&association.name);
				if let Some(value) = self.links.relationship_value(resource.resource_type(), &association, ids) {
					links.insert(self.key(&association.name), value);
				}
			}

			let Some(node) = include.get(&association.name).filter(|node| node.is_requested()) else {
				continue;
			};

			let related = resource.related(&association.name);
			if !related.matches(association.cardinality) {
				tracing::warn!(
					association = %association.name,
					cardinality = ?association.cardinality,
					"skipping side-load of association with mismatched cardinality"
				);
				continue;
			}

			for related in related.into_resources() {
				let related_type = self.key(related.resource_type());
				let serialized = self.store.contains(&related_type, &related.id());

				if node.include && !serialized {
					let fragment = self.object_fragment(related.as_ref(), &node.children);
					self.record(related.as_ref(), fragment, false);
				} else {
					self.relationship_fragment(related.as_ref(), &node.children, false);
				}
			}
		}
		links
	}

	fn record(&mut self, resource: &dyn Resource, fragment: Map<String, Value>, primary: bool) {
		let resource_type = self.key(resource.resource_type());
		let id = resource.id();
		let insertion = if primary {
			self.store.add_primary(&resource_type, id, fragment)
		} else {
			self.store.add_linked(&resource_type, id, fragment)
		};

		if insertion.is_first_of_type() {
			let associations = resource.associations();
			if let Some(links) = self.links.type_links(resource.resource_type(), &associations) {
				self.registry.extend(links);
			}
		}
	}
}

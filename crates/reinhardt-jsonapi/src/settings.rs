//! Serializer configuration
//!
//! [`JsonApiSettings`] holds process-wide defaults. They can be loaded from a
//! file or the environment and installed once with [`configure`]; afterwards
//! they are an immutable snapshot. Each call layers its [`SerializeOptions`]
//! over a snapshot and resolves the result into typed configuration before any
//! resource is visited.

use crate::error::{SerializerError, SerializerResult, SettingsError};
use crate::formatter::{KeyFormat, KeyFormatter, ValueFormatterRegistry, normalize_name};
use crate::include::IncludeTree;
use crate::links::{DefaultHrefTemplater, HrefTemplater, LinkStyle, RelationshipStyle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

static GLOBAL_SETTINGS: OnceCell<JsonApiSettings> = OnceCell::new();

/// Process-wide serializer defaults
///
/// Style values are kept as configuration strings and checked by
/// [`validate`](Self::validate) or when a call resolves them.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiSettings {
	/// `underscored_key`, `camelized_key` or `dasherized_key`
	pub json_key_format: String,

	/// `none`, `href` or `full`
	pub toplevel_links_style: String,

	/// `ids` or `collection_objects`
	pub resource_links_style: String,

	/// Prefix of generated href templates
	pub base_url: String,

	/// Path segment placed between the base URL and the resource type
	pub namespace: String,
}

impl Default for JsonApiSettings {
	fn default() -> Self {
		Self {
			json_key_format: KeyFormat::Underscored.name().to_string(),
			toplevel_links_style: LinkStyle::None.to_string(),
			resource_links_style: RelationshipStyle::Ids.to_string(),
			base_url: String::new(),
			namespace: String::new(),
		}
	}
}

impl JsonApiSettings {
	/// Create settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_key_format(mut self, format: impl Into<String>) -> Self {
		self.json_key_format = format.into();
		self
	}

	pub fn with_toplevel_links_style(mut self, style: impl ToString) -> Self {
		self.toplevel_links_style = style.to_string();
		self
	}

	pub fn with_resource_links_style(mut self, style: impl ToString) -> Self {
		self.resource_links_style = style.to_string();
		self
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();
		self
	}

	/// Check that every style and key format name is known
	pub fn validate(&self) -> Result<(), SettingsError> {
		let invalid = |e: SerializerError| SettingsError::ValidationError(e.to_string());
		self.json_key_format.parse::<KeyFormat>().map_err(invalid)?;
		self.toplevel_links_style
			.parse::<LinkStyle>()
			.map_err(invalid)?;
		self.resource_links_style
			.parse::<RelationshipStyle>()
			.map_err(invalid)?;
		Ok(())
	}

	/// Load settings from environment variables
	///
	/// Unset variables keep their defaults.
	pub fn from_env() -> Result<Self, SettingsError> {
		let mut settings = Self::default();

		if let Ok(format) = std::env::var("JSONAPI_KEY_FORMAT") {
			settings.json_key_format = format;
		}
		if let Ok(style) = std::env::var("JSONAPI_TOPLEVEL_LINKS_STYLE") {
			settings.toplevel_links_style = style;
		}
		if let Ok(style) = std::env::var("JSONAPI_RESOURCE_LINKS_STYLE") {
			settings.resource_links_style = style;
		}
		if let Ok(base_url) = std::env::var("JSONAPI_BASE_URL") {
			settings.base_url = base_url;
		}
		if let Ok(namespace) = std::env::var("JSONAPI_NAMESPACE") {
			settings.namespace = namespace;
		}

		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a `.toml` or `.json` file
	///
	/// The result is validated before it is returned.
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;

		let settings: JsonApiSettings =
			if path.extension().and_then(|s| s.to_str()) == Some("toml") {
				toml::from_str(&contents)
					.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?
			} else if path.extension().and_then(|s| s.to_str()) == Some("json") {
				serde_json::from_str(&contents)
					.map_err(|e| SettingsError::ParseError(format!("JSON parse error: {}", e)))?
			} else {
				return Err(SettingsError::UnsupportedFormat(
					"Supported formats: .toml, .json".to_string(),
				));
			};

		settings.validate()?;
		Ok(settings)
	}
}

/// Install the process-wide defaults
///
/// Succeeds once per process; the installed snapshot is never modified.
pub fn configure(settings: JsonApiSettings) -> Result<(), SettingsError> {
	settings.validate()?;
	GLOBAL_SETTINGS
		.set(settings)
		.map_err(|_| SettingsError::AlreadyConfigured)?;
	tracing::debug!("installed process-wide JSON:API settings");
	Ok(())
}

/// The installed process-wide defaults, or the built-in ones
pub fn global_settings() -> &'static JsonApiSettings {
	GLOBAL_SETTINGS.get_or_init(JsonApiSettings::default)
}

/// Per-call options layered over [`JsonApiSettings`]
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{LinkStyle, SerializeOptions};
///
/// let options = SerializeOptions::new()
///     .include(["comments", "comments.tags"])
///     .fields("posts", ["title", "comments"])
///     .toplevel_links_style(LinkStyle::Href)
///     .base_url("http://example.com");
///
/// assert_eq!(options.include_paths(), ["comments", "comments.tags"]);
/// ```
#[derive(Clone, Default)]
pub struct SerializeOptions {
	include: Vec<String>,
	fields: HashMap<String, Vec<String>>,
	key_format: Option<String>,
	key_formatter: Option<Arc<dyn KeyFormatter>>,
	toplevel_links_style: Option<String>,
	resource_links_style: Option<String>,
	base_url: Option<String>,
	namespace: Option<String>,
	value_formatters: Option<ValueFormatterRegistry>,
	href_templater: Option<Arc<dyn HrefTemplater>>,
}

impl SerializeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Dotted association paths to side-load
	pub fn include<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.include.extend(paths.into_iter().map(Into::into));
		self
	}

	/// Restrict the attributes and associations rendered for a resource type
	pub fn fields<I, S>(mut self, resource_type: impl AsRef<str>, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields
			.entry(normalize_name(resource_type.as_ref()))
			.or_default()
			.extend(names.into_iter().map(Into::into));
		self
	}

	/// Key format by configuration name, e.g. `camelized_key`
	pub fn key_format(mut self, format: impl Into<String>) -> Self {
		self.key_format = Some(format.into());
		self
	}

	/// Custom key formatter, taking precedence over any key format name
	pub fn key_formatter(mut self, formatter: impl KeyFormatter + 'static) -> Self {
		self.key_formatter = Some(Arc::new(formatter));
		self
	}

	/// Top-level links style, as a [`LinkStyle`] or its configuration name
	pub fn toplevel_links_style(mut self, style: impl ToString) -> Self {
		self.toplevel_links_style = Some(style.to_string());
		self
	}

	/// Resource-level links style, as a [`RelationshipStyle`] or its configuration name
	pub fn resource_links_style(mut self, style: impl ToString) -> Self {
		self.resource_links_style = Some(style.to_string());
		self
	}

	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn value_formatters(mut self, registry: ValueFormatterRegistry) -> Self {
		self.value_formatters = Some(registry);
		self
	}

	pub fn href_templater(mut self, templater: impl HrefTemplater + 'static) -> Self {
		self.href_templater = Some(Arc::new(templater));
		self
	}

	pub fn include_paths(&self) -> &[String] {
		&self.include
	}

	/// Resolve these options over a settings snapshot
	///
	/// Fails on unknown style or key format names.
	pub fn resolve(&self, settings: &JsonApiSettings) -> SerializerResult<ResolvedOptions> {
		let key_format: KeyFormat = match &self.key_formatter {
			Some(formatter) => KeyFormat::Custom(Arc::clone(formatter)),
			None => self
				.key_format
				.as_deref()
				.unwrap_or(&settings.json_key_format)
				.parse()?,
		};
		let link_style: LinkStyle = self
			.toplevel_links_style
			.as_deref()
			.unwrap_or(&settings.toplevel_links_style)
			.parse()?;
		let relationship_style: RelationshipStyle = self
			.resource_links_style
			.as_deref()
			.unwrap_or(&settings.resource_links_style)
			.parse()?;

		let fields = self
			.fields
			.iter()
			.map(|(resource_type, names)| {
				let names = names.iter().map(|name| normalize_name(name)).collect();
				(resource_type.clone(), names)
			})
			.collect();

		Ok(ResolvedOptions {
			include: IncludeTree::parse(&self.include),
			fields,
			key_format,
			link_style,
			relationship_style,
			base_url: self.base_url.clone().unwrap_or_else(|| settings.base_url.clone()),
			namespace: self.namespace.clone().unwrap_or_else(|| settings.namespace.clone()),
			value_formatters: self.value_formatters.clone().unwrap_or_default(),
			href_templater: self
				.href_templater
				.clone()
				.unwrap_or_else(|| Arc::new(DefaultHrefTemplater)),
		})
	}
}

impl fmt::Debug for SerializeOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializeOptions")
			.field("include", &self.include)
			.field("fields", &self.fields)
			.field("key_format", &self.key_format)
			.field("custom_key_formatter", &self.key_formatter.is_some())
			.field("toplevel_links_style", &self.toplevel_links_style)
			.field("resource_links_style", &self.resource_links_style)
			.field("base_url", &self.base_url)
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

/// Typed configuration of a single serialization call
pub struct ResolvedOptions {
	pub include: IncludeTree,
	/// Allow-lists keyed by logical resource type
	pub fields: HashMap<String, HashSet<String>>,
	pub key_format: KeyFormat,
	pub link_style: LinkStyle,
	pub relationship_style: RelationshipStyle,
	pub base_url: String,
	pub namespace: String,
	pub value_formatters: ValueFormatterRegistry,
	pub href_templater: Arc<dyn HrefTemplater>,
}

impl ResolvedOptions {
	/// Check a field against the allow-list of its resource type
	///
	/// Types without an allow-list admit every field.
	pub fn field_allowed(&self, resource_type: &str, field: &str) -> bool {
		self.fields
			.get(resource_type)
			.is_none_or(|allowed| allowed.contains(field))
	}
}

impl fmt::Debug for ResolvedOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolvedOptions")
			.field("include", &self.include)
			.field("fields", &self.fields)
			.field("key_format", &self.key_format)
			.field("link_style", &self.link_style)
			.field("relationship_style", &self.relationship_style)
			.field("base_url", &self.base_url)
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

//! Key formatters
//!
//! Every name that appears in a document (type keys, attribute keys,
//! relationship keys and link keys) passes through exactly one formatter.

use crate::error::SerializerError;
use convert_case::{Boundary, Case, Casing};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// Digit transitions are not word boundaries: `tag2_name` camelizes to `tag2Name`.
const WORD_BOUNDARIES: &[Boundary] = &[
	Boundary::Underscore,
	Boundary::Hyphen,
	Boundary::Space,
	Boundary::LowerUpper,
	Boundary::Acronym,
];

/// Maps a logical name to its rendered form
pub trait KeyFormatter: Send + Sync {
	fn format(&self, name: &str) -> String;
}

impl<F> KeyFormatter for F
where
	F: Fn(&str) -> String + Send + Sync,
{
	fn format(&self, name: &str) -> String {
		self(name)
	}
}

/// Built-in key casing styles, plus an escape hatch for custom formatters
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{KeyFormat, KeyFormatter};
///
/// assert_eq!(KeyFormat::Underscored.format("comment_count"), "comment_count");
/// assert_eq!(KeyFormat::Camelized.format("comment_count"), "commentCount");
/// assert_eq!(KeyFormat::Dasherized.format("comment_count"), "comment-count");
///
/// let format: KeyFormat = "camelized_key".parse().unwrap();
/// assert_eq!(format.format("author_id"), "authorId");
/// ```
#[derive(Clone, Default)]
pub enum KeyFormat {
	#[default]
	Underscored,
	Camelized,
	Dasherized,
	Custom(Arc<dyn KeyFormatter>),
}

impl KeyFormat {
	/// Wrap a custom formatter
	pub fn custom(formatter: impl KeyFormatter + 'static) -> Self {
		KeyFormat::Custom(Arc::new(formatter))
	}

	/// Configuration name of the style
	pub fn name(&self) -> &'static str {
		match self {
			KeyFormat::Underscored => "underscored_key",
			KeyFormat::Camelized => "camelized_key",
			KeyFormat::Dasherized => "dasherized_key",
			KeyFormat::Custom(_) => "custom",
		}
	}
}

impl KeyFormatter for KeyFormat {
	fn format(&self, name: &str) -> String {
		match self {
			KeyFormat::Underscored => name.with_boundaries(WORD_BOUNDARIES).to_case(Case::Snake),
			KeyFormat::Camelized => name.with_boundaries(WORD_BOUNDARIES).to_case(Case::Camel),
			KeyFormat::Dasherized => name.with_boundaries(WORD_BOUNDARIES).to_case(Case::Kebab),
			KeyFormat::Custom(formatter) => formatter.format(name),
		}
	}
}

impl FromStr for KeyFormat {
	type Err = SerializerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"underscored_key" | "underscored" => Ok(KeyFormat::Underscored),
			"camelized_key" | "camelized" => Ok(KeyFormat::Camelized),
			"dasherized_key" | "dasherized" => Ok(KeyFormat::Dasherized),
			other => Err(SerializerError::InvalidKeyFormat(other.to_string())),
		}
	}
}

impl fmt::Debug for KeyFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Normalize a requested name to the internal snake_case convention
///
/// Include paths may arrive in whatever casing the client uses (`authorPosts`,
/// `author-posts`); association lookups always use `author_posts`.
pub fn normalize_name(name: &str) -> String {
	name.trim()
		.with_boundaries(WORD_BOUNDARIES)
		.to_case(Case::Snake)
}

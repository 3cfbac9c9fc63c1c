//! Error types for JSON:API serialization and settings loading

/// Result type for serializer operations
pub type SerializerResult<T> = Result<T, SerializerError>;

/// Errors raised by [`ResourceSerializer`](crate::ResourceSerializer)
///
/// Configuration errors are detected when a call resolves its options, before
/// any resource is visited, so a failed call never yields a partial document.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
	/// The key format name is not one of the known styles
	#[error("Invalid key format: {0}")]
	InvalidKeyFormat(String),

	/// The top-level links style is not one of `none`, `href`, `full`
	#[error("Invalid top-level links style: {0}")]
	InvalidLinkStyle(String),

	/// The resource-level links style is not one of `ids`, `collection_objects`
	#[error("Invalid resource links style: {0}")]
	InvalidRelationshipStyle(String),

	/// Rendering the finished document as JSON text failed
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl SerializerError {
	/// Check if this error stems from call configuration
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			SerializerError::InvalidKeyFormat(_)
				| SerializerError::InvalidLinkStyle(_)
				| SerializerError::InvalidRelationshipStyle(_)
		)
	}
}

/// Errors raised while loading or installing [`JsonApiSettings`](crate::JsonApiSettings)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	/// The process-wide defaults were already installed
	#[error("JSON:API settings are already configured")]
	AlreadyConfigured,
}

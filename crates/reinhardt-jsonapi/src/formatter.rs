//! Key and value formatting
//!
//! Keys are rendered through a [`KeyFormatter`] chosen per call; attribute
//! values go through the [`ValueFormatterRegistry`] entry matching their
//! declared format tag.

pub mod key;
pub mod value;

pub use key::{KeyFormat, KeyFormatter, normalize_name};
pub use value::{ValueFormatter, ValueFormatterRegistry};

//! Include path parsing
//!
//! Dotted include paths such as `["comments", "comments.tags", "author.posts"]`
//! fold into a tree keyed by association name. Each node records whether the
//! association itself is side-loaded (`include`) and whether deeper paths pass
//! through it (`include_children`).

use crate::formatter::normalize_name;
use indexmap::IndexMap;

/// Include request for one association
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeNode {
	/// The association's resources are side-loaded
	pub include: bool,
	/// Some requested path continues below this association
	pub include_children: bool,
	pub children: IncludeTree,
}

impl IncludeNode {
	/// Check if this node asks the walker to visit the related resources at all
	pub fn is_requested(&self) -> bool {
		self.include || self.include_children
	}
}

/// Tree of requested includes, keyed by normalized association name
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::IncludeTree;
///
/// let tree = IncludeTree::parse(["comments", "comments.tags"]);
/// let comments = tree.get("comments").unwrap();
///
/// // Requested directly and as a prefix of `comments.tags`
/// assert!(comments.include);
/// assert!(comments.include_children);
/// assert!(comments.children.get("tags").unwrap().include);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree {
	nodes: IndexMap<String, IncludeNode>,
}

impl IncludeTree {
	/// Create an empty tree
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a tree from dotted include paths
	///
	/// Merging is idempotent and independent of path order. Blank segments are
	/// ignored, so `"comments."` is the same request as `"comments"`.
	pub fn parse<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut tree = Self::new();
		for path in paths {
			tree.add_path(path.as_ref());
		}
		tree
	}

	/// Merge one dotted path into the tree
	pub fn add_path(&mut self, path: &str) {
		let segments: Vec<String> = path
			.split('.')
			.map(normalize_name)
			.filter(|segment| !segment.is_empty())
			.collect();
		self.add_segments(&segments);
	}

	fn add_segments(&mut self, segments: &[String]) {
		let Some((first, rest)) = segments.split_first() else {
			return;
		};

		let node = self.nodes.entry(first.clone()).or_default();
		if rest.is_empty() {
			node.include = true;
		} else {
			node.include_children = true;
			node.children.add_segments(rest);
		}
	}

	/// Node for an association, if any path mentions it at this level
	pub fn get(&self, association: &str) -> Option<&IncludeNode> {
		self.nodes.get(association)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}
}

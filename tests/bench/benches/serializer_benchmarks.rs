//! JSON:API serializer benchmarks
//!
//! - Wide primary collections with shared side-loaded resources
//! - Layered diamond graphs, where every node links to the whole next layer
//! - Include path parsing

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use reinhardt_jsonapi::{
	Association, Attribute, IncludeTree, JsonApiSettings, LinkStyle, Related, Resource,
	ResourceId, ResourceRef, ResourceSerializer, SerializeOptions,
};
use std::hint::black_box;
use std::sync::Arc;

/// Article pointing at one of a small pool of authors
struct Article {
	id: i64,
	authors: i64,
}

impl Resource for Article {
	fn id(&self) -> ResourceId {
		self.id.into()
	}

	fn resource_type(&self) -> &str {
		"articles"
	}

	fn attributes(&self) -> Vec<Attribute> {
		vec![
			Attribute::new("title", format!("Article {}", self.id)),
			Attribute::new("word_count", self.id * 31 % 2000),
		]
	}

	fn associations(&self) -> Vec<Association> {
		vec![Association::has_one("author", "authors")]
	}

	fn related(&self, _association: &str) -> Related {
		let author: ResourceRef = Arc::new(Author {
			id: self.id % self.authors,
		});
		Related::One(Some(author))
	}
}

struct Author {
	id: i64,
}

impl Resource for Author {
	fn id(&self) -> ResourceId {
		self.id.into()
	}

	fn resource_type(&self) -> &str {
		"authors"
	}

	fn attributes(&self) -> Vec<Attribute> {
		vec![Attribute::new("name", format!("Author {}", self.id))]
	}

	fn associations(&self) -> Vec<Association> {
		vec![]
	}

	fn related(&self, _association: &str) -> Related {
		Related::One(None)
	}
}

/// Node of a layered graph; links to every node of the next layer
struct LayerNode {
	layer: i64,
	index: i64,
	width: i64,
	depth: i64,
}

impl Resource for LayerNode {
	fn id(&self) -> ResourceId {
		(self.layer * self.width + self.index).into()
	}

	fn resource_type(&self) -> &str {
		"nodes"
	}

	fn attributes(&self) -> Vec<Attribute> {
		vec![Attribute::new("layer", self.layer)]
	}

	fn associations(&self) -> Vec<Association> {
		vec![Association::has_many("children", "nodes")]
	}

	fn related(&self, _association: &str) -> Related {
		if self.layer + 1 >= self.depth {
			return Related::Many(Some(Vec::new()));
		}
		let children = (0..self.width)
			.map(|index| {
				Arc::new(LayerNode {
					layer: self.layer + 1,
					index,
					width: self.width,
					depth: self.depth,
				}) as ResourceRef
			})
			.collect();
		Related::Many(Some(children))
	}
}

fn serializer(options: SerializeOptions) -> ResourceSerializer {
	ResourceSerializer::new(options).with_settings(JsonApiSettings::default())
}

fn benchmark_wide_collection(c: &mut Criterion) {
	let mut group = c.benchmark_group("jsonapi_wide_collection");

	for size in [10_i64, 100, 1000] {
		let articles: Vec<ResourceRef> = (0..size)
			.map(|id| Arc::new(Article { id, authors: 16 }) as ResourceRef)
			.collect();
		let serializer = serializer(
			SerializeOptions::new()
				.include(["author"])
				.toplevel_links_style(LinkStyle::Href)
				.base_url("http://bench"),
		);

		group.bench_with_input(BenchmarkId::from_parameter(size), &articles, |b, articles| {
			b.iter(|| black_box(serializer.serialize(articles).unwrap()));
		});
	}

	group.finish();
}

fn benchmark_diamond_graph(c: &mut Criterion) {
	let mut group = c.benchmark_group("jsonapi_diamond_graph");

	for (width, depth) in [(2_i64, 4_i64), (4, 4), (3, 6)] {
		let root = LayerNode {
			layer: 0,
			index: 0,
			width,
			depth,
		};
		let path = vec!["children"; (depth - 1) as usize].join(".");
		let serializer = serializer(SerializeOptions::new().include([path]));

		group.bench_function(format!("w{}_d{}", width, depth), |b| {
			b.iter(|| black_box(serializer.serialize(&root).unwrap()));
		});
	}

	group.finish();
}

fn benchmark_include_parsing(c: &mut Criterion) {
	let paths = [
		"author",
		"comments",
		"comments.author",
		"comments.tags",
		"tags.posts.comments.author",
	];

	c.bench_function("include_tree_parse", |b| {
		b.iter(|| black_box(IncludeTree::parse(black_box(paths))));
	});
}

criterion_group!(
	benches,
	benchmark_wide_collection,
	benchmark_diamond_graph,
	benchmark_include_parsing
);
criterion_main!(benches);

//! Shared fixtures for integration tests
//!
//! `Blog` is a small in-memory database of posts, people, comments and tags.
//! `Cattery` holds cats whose `mother`/`father` associations form cycles.

#![allow(dead_code)]

use reinhardt_jsonapi::{
	Association, Attribute, Related, Resource, ResourceId, ResourceRef,
};
use std::sync::Arc;

pub struct PostRow {
	pub id: i64,
	pub title: &'static str,
	pub reading_time: i64,
	pub author_id: Option<i64>,
	/// `None` models an accessor that yields nothing at all
	pub comment_ids: Option<Vec<i64>>,
	pub tag_ids: Vec<i64>,
}

pub struct PersonRow {
	pub id: i64,
	pub name: &'static str,
	pub email: &'static str,
	pub post_ids: Vec<i64>,
}

pub struct CommentRow {
	pub id: i64,
	pub body: &'static str,
	pub post_id: i64,
	pub tag_ids: Vec<i64>,
}

pub struct TagRow {
	pub id: i64,
	pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
	Post,
	Person,
	Comment,
	Tag,
}

pub struct Blog {
	pub posts: Vec<PostRow>,
	pub people: Vec<PersonRow>,
	pub comments: Vec<CommentRow>,
	pub tags: Vec<TagRow>,
}

impl Blog {
	pub fn sample() -> Arc<Self> {
		Arc::new(Self {
			posts: vec![
				PostRow {
					id: 1,
					title: "Rails is Omakase",
					reading_time: 4,
					author_id: Some(1),
					comment_ids: Some(vec![5, 12]),
					tag_ids: vec![3, 9],
				},
				PostRow {
					id: 2,
					title: "The Parley Letter",
					reading_time: 7,
					author_id: Some(1),
					comment_ids: Some(vec![]),
					tag_ids: vec![9],
				},
				PostRow {
					id: 3,
					title: "Dependency Injection",
					reading_time: 12,
					author_id: Some(2),
					comment_ids: None,
					tag_ids: vec![4],
				},
			],
			people: vec![
				PersonRow {
					id: 1,
					name: "Dan",
					email: "dan@example.com",
					post_ids: vec![1, 2],
				},
				PersonRow {
					id: 2,
					name: "Tom",
					email: "tom@example.com",
					post_ids: vec![3],
				},
			],
			comments: vec![
				CommentRow {
					id: 5,
					body: "Mmmmmakase",
					post_id: 1,
					tag_ids: vec![4],
				},
				CommentRow {
					id: 12,
					body: "I prefer unagi",
					post_id: 1,
					tag_ids: vec![9],
				},
			],
			tags: vec![
				TagRow { id: 3, name: "ruby" },
				TagRow { id: 4, name: "rust" },
				TagRow { id: 9, name: "web" },
			],
		})
	}

	pub fn resource(self: &Arc<Self>, kind: Kind, id: i64) -> ResourceRef {
		Arc::new(BlogResource {
			db: Arc::clone(self),
			kind,
			id,
		})
	}

	pub fn posts(self: &Arc<Self>, ids: &[i64]) -> Vec<ResourceRef> {
		ids.iter().map(|id| self.resource(Kind::Post, *id)).collect()
	}

	fn many(self: &Arc<Self>, kind: Kind, ids: &[i64]) -> Vec<ResourceRef> {
		ids.iter().map(|id| self.resource(kind, *id)).collect()
	}

	fn post(&self, id: i64) -> &PostRow {
		self.posts.iter().find(|row| row.id == id).unwrap()
	}

	fn person(&self, id: i64) -> &PersonRow {
		self.people.iter().find(|row| row.id == id).unwrap()
	}

	fn comment(&self, id: i64) -> &CommentRow {
		self.comments.iter().find(|row| row.id == id).unwrap()
	}

	fn tag(&self, id: i64) -> &TagRow {
		self.tags.iter().find(|row| row.id == id).unwrap()
	}
}

/// Adapter exposing one row of the blog database as a resource
pub struct BlogResource {
	db: Arc<Blog>,
	kind: Kind,
	id: i64,
}

impl Resource for BlogResource {
	fn id(&self) -> ResourceId {
		self.id.into()
	}

	fn resource_type(&self) -> &str {
		match self.kind {
			Kind::Post => "posts",
			Kind::Person => "people",
			Kind::Comment => "comments",
			Kind::Tag => "tags",
		}
	}

	fn attributes(&self) -> Vec<Attribute> {
		match self.kind {
			Kind::Post => {
				let row = self.db.post(self.id);
				vec![
					Attribute::new("title", row.title),
					Attribute::new("reading_time", row.reading_time),
				]
			}
			Kind::Person => {
				let row = self.db.person(self.id);
				vec![
					Attribute::new("name", row.name),
					Attribute::new("email", row.email),
				]
			}
			Kind::Comment => vec![Attribute::new("body", self.db.comment(self.id).body)],
			Kind::Tag => vec![Attribute::new("name", self.db.tag(self.id).name).format("label")],
		}
	}

	fn associations(&self) -> Vec<Association> {
		match self.kind {
			Kind::Post => vec![
				Association::has_one("author", "people"),
				Association::has_many("comments", "comments"),
				Association::has_many("tags", "tags"),
			],
			Kind::Person => vec![Association::has_many("posts", "posts")],
			Kind::Comment => vec![
				Association::has_one("post", "posts"),
				Association::has_many("tags", "tags"),
			],
			Kind::Tag => vec![],
		}
	}

	fn related(&self, association: &str) -> Related {
		match (self.kind, association) {
			(Kind::Post, "author") => {
				let author = self.db.post(self.id).author_id;
				Related::One(author.map(|id| self.db.resource(Kind::Person, id)))
			}
			(Kind::Post, "comments") => {
				let comments = self.db.post(self.id).comment_ids.as_deref();
				Related::Many(comments.map(|ids| self.db.many(Kind::Comment, ids)))
			}
			(Kind::Post, "tags") => {
				Related::Many(Some(self.db.many(Kind::Tag, &self.db.post(self.id).tag_ids)))
			}
			(Kind::Person, "posts") => {
				Related::Many(Some(self.db.many(Kind::Post, &self.db.person(self.id).post_ids)))
			}
			(Kind::Comment, "post") => {
				Related::One(Some(self.db.resource(Kind::Post, self.db.comment(self.id).post_id)))
			}
			(Kind::Comment, "tags") => {
				Related::Many(Some(self.db.many(Kind::Tag, &self.db.comment(self.id).tag_ids)))
			}
			(kind, other) => panic!("{kind:?} has no association {other}"),
		}
	}

	fn fetchable_fields(&self) -> Vec<String> {
		let mut fields: Vec<String> = self
			.attributes()
			.into_iter()
			.map(|attribute| attribute.name)
			.chain(self.associations().into_iter().map(|association| association.name))
			.collect();
		// Email addresses are never visible
		fields.retain(|field| field != "email");
		fields
	}
}

pub struct CatRow {
	pub id: i64,
	pub name: &'static str,
	pub mother_id: Option<i64>,
	pub father_id: Option<i64>,
}

pub struct Cattery {
	pub cats: Vec<CatRow>,
}

impl Cattery {
	/// Tabby and Mittens are each other's mother; both have Tom as father
	pub fn sample() -> Arc<Self> {
		Arc::new(Self {
			cats: vec![
				CatRow {
					id: 1,
					name: "Tabby",
					mother_id: Some(2),
					father_id: Some(3),
				},
				CatRow {
					id: 2,
					name: "Mittens",
					mother_id: Some(1),
					father_id: Some(3),
				},
				CatRow {
					id: 3,
					name: "Tom",
					mother_id: None,
					father_id: None,
				},
			],
		})
	}

	pub fn cat(self: &Arc<Self>, id: i64) -> ResourceRef {
		Arc::new(CatResource {
			db: Arc::clone(self),
			id,
		})
	}

	fn row(&self, id: i64) -> &CatRow {
		self.cats.iter().find(|row| row.id == id).unwrap()
	}
}

pub struct CatResource {
	db: Arc<Cattery>,
	id: i64,
}

impl Resource for CatResource {
	fn id(&self) -> ResourceId {
		self.id.into()
	}

	fn resource_type(&self) -> &str {
		"cats"
	}

	fn attributes(&self) -> Vec<Attribute> {
		vec![Attribute::new("name", self.db.row(self.id).name)]
	}

	fn associations(&self) -> Vec<Association> {
		vec![
			Association::has_one("mother", "cats"),
			Association::has_one("father", "cats"),
		]
	}

	fn related(&self, association: &str) -> Related {
		let row = self.db.row(self.id);
		let parent = match association {
			"mother" => row.mother_id,
			"father" => row.father_id,
			other => panic!("cats have no association {other}"),
		};
		Related::One(parent.map(|id| self.db.cat(id)))
	}
}

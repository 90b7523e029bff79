//! Node objects.
use crate::{Id, Indexed};
use indexmap::IndexMap;

use super::{IndexedObject, Object};

/// A node's non-keyword properties: an ordered map from property IRI/blank
/// node id to the (already-array-wrapped) list of its values (spec §3
/// "Node object ... any number of IRI-keyed property arrays").
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Properties(IndexMap<Id, Vec<IndexedObject>>);

impl Properties {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, prop: &Id) -> Option<&[IndexedObject]> {
		self.0.get(prop).map(Vec::as_slice)
	}

	pub fn insert(&mut self, prop: Id, mut values: Vec<IndexedObject>) {
		self.0.entry(prop).or_default().append(&mut values);
	}

	pub fn set(&mut self, prop: Id, values: Vec<IndexedObject>) {
		self.0.insert(prop, values);
	}

	pub fn remove(&mut self, prop: &Id) -> Option<Vec<IndexedObject>> {
		self.0.shift_remove(prop)
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, Id, Vec<IndexedObject>> {
		self.0.iter()
	}

	pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Id, Vec<IndexedObject>> {
		self.0.iter_mut()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}
}

impl IntoIterator for Properties {
	type Item = (Id, Vec<IndexedObject>);
	type IntoIter = indexmap::map::IntoIter<Id, Vec<IndexedObject>>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// The target of a reverse property: same shape as [`Properties`] but
/// holding node objects only (spec §3 "@reverse").
pub type ReverseProperties = IndexMap<Id, Vec<IndexedNode>>;

pub type Graph = Vec<IndexedObject>;
pub type Included = Vec<IndexedNode>;
pub type IndexedNode = Indexed<Node>;

/// A node object (spec §3 "Node object").
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Node {
	pub id: Option<Id>,
	pub types: Option<Vec<Id>>,
	pub graph: Option<Graph>,
	pub included: Option<Included>,
	pub properties: Properties,
	pub reverse_properties: Option<ReverseProperties>,
}

impl Node {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_id(id: Id) -> Self {
		Self {
			id: Some(id),
			..Self::default()
		}
	}

	/// A graph object: has a `@graph` entry (and optionally `@id`) but no
	/// other entries. A node with `@graph` alongside `@type`/properties/etc
	/// is an ordinary node that happens to carry a `@graph` property.
	pub fn is_graph(&self) -> bool {
		self.graph.is_some()
			&& self.types.is_none()
			&& self.included.is_none()
			&& self.properties.is_empty()
			&& self.reverse_properties.is_none()
	}

	/// A graph object without an `@id` entry.
	pub fn is_simple_graph(&self) -> bool {
		self.id.is_none() && self.is_graph()
	}

	/// A node object that carries nothing but an `@id` and possibly
	/// `@type` — what framing/compaction calls a "node reference" and
	/// expansion drops unless framing needs it (spec §4.2 "if only `@id`,
	/// drop (unless framing preserves it)").
	pub fn is_empty(&self) -> bool {
		self.id.is_none()
			&& self.types.is_none()
			&& self.graph.is_none()
			&& self.included.is_none()
			&& self.properties.is_empty()
			&& self.reverse_properties.is_none()
	}

	pub fn is_id_only(&self) -> bool {
		self.id.is_some()
			&& self.types.is_none()
			&& self.graph.is_none()
			&& self.included.is_none()
			&& self.properties.is_empty()
			&& self.reverse_properties.is_none()
	}

	pub fn types(&self) -> &[Id] {
		self.types.as_deref().unwrap_or(&[])
	}

	pub fn has_type(&self, ty: &Id) -> bool {
		self.types().iter().any(|t| t == ty)
	}

	pub fn into_object(self) -> Object {
		Object::Node(self)
	}
}

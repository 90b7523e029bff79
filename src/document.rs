//! Top-level results of the expansion and flattening algorithms.
use crate::json;
use crate::object::{IndexedObject, LangString, List, Node, Object, Value};
use crate::Keyword;

/// Result of the expansion algorithm (spec §4.2): a sequence of top-level
/// node objects, the default-graph entry of spec §3.
#[derive(Clone, Debug, Default)]
pub struct ExpandedDocument(Vec<IndexedObject>);

impl ExpandedDocument {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_objects(objects: Vec<IndexedObject>) -> Self {
		Self(objects)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn objects(&self) -> &[IndexedObject] {
		&self.0
	}

	pub fn into_objects(self) -> Vec<IndexedObject> {
		self.0
	}

	pub fn iter(&self) -> std::slice::Iter<'_, IndexedObject> {
		self.0.iter()
	}

	pub fn push(&mut self, object: IndexedObject) {
		self.0.push(object);
	}

	/// Serializes this document in the literal expanded JSON form of spec
	/// §3, with no term aliasing: every `@id`/`@type`/etc entry spelled out
	/// in full, no container-map folding.
	pub fn to_json(&self) -> json::Value {
		json::Value::Array(self.0.iter().map(indexed_object_to_json).collect())
	}
}

impl FromIterator<IndexedObject> for ExpandedDocument {
	fn from_iter<I: IntoIterator<Item = IndexedObject>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for ExpandedDocument {
	type Item = IndexedObject;
	type IntoIter = std::vec::IntoIter<IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Result of the flattening algorithm (spec §4.4): the default graph's
/// nodes followed by each named graph wrapped in a graph object.
#[derive(Clone, Debug, Default)]
pub struct FlattenedDocument(Vec<IndexedObject>);

impl FlattenedDocument {
	pub fn new(objects: Vec<IndexedObject>) -> Self {
		Self(objects)
	}

	pub fn objects(&self) -> &[IndexedObject] {
		&self.0
	}

	pub fn into_objects(self) -> Vec<IndexedObject> {
		self.0
	}

	/// See [`ExpandedDocument::to_json`]: flattened documents share the same
	/// per-object expanded JSON shape.
	pub fn to_json(&self) -> json::Value {
		json::Value::Array(self.0.iter().map(indexed_object_to_json).collect())
	}
}

fn indexed_object_to_json(object: &IndexedObject) -> json::Value {
	match object.inner() {
		Object::Value(value) => value_to_json(value, object.index()),
		Object::Node(node) => node_to_json(node, object.index()),
		Object::List(list) => list_to_json(list, object.index()),
	}
}

fn node_to_json(node: &Node, index: Option<&str>) -> json::Value {
	let mut result = json::Object::new();

	if let Some(id) = &node.id {
		result.insert(Keyword::Id.into_str().to_string(), json::Value::String(id.to_string()));
	}

	if let Some(types) = &node.types {
		let types = types.iter().map(|t| json::Value::String(t.to_string())).collect();
		result.insert(Keyword::Type.into_str().to_string(), json::Value::Array(types));
	}

	if let Some(index) = index {
		result.insert(Keyword::Index.into_str().to_string(), json::Value::String(index.to_string()));
	}

	if let Some(graph) = &node.graph {
		let graph = graph.iter().map(indexed_object_to_json).collect();
		result.insert(Keyword::Graph.into_str().to_string(), json::Value::Array(graph));
	}

	if let Some(included) = &node.included {
		let included = included.iter().map(|n| node_to_json(n.inner(), n.index())).collect();
		result.insert(Keyword::Included.into_str().to_string(), json::Value::Array(included));
	}

	for (property, values) in node.properties.iter() {
		let values = values.iter().map(indexed_object_to_json).collect();
		result.insert(property.to_string(), json::Value::Array(values));
	}

	if let Some(reverse_properties) = &node.reverse_properties {
		if !reverse_properties.is_empty() {
			let mut reverse = json::Object::new();
			for (property, nodes) in reverse_properties.iter() {
				let nodes = nodes.iter().map(|n| node_to_json(n.inner(), n.index())).collect();
				reverse.insert(property.to_string(), json::Value::Array(nodes));
			}
			result.insert(Keyword::Reverse.into_str().to_string(), json::Value::Object(reverse));
		}
	}

	json::Value::Object(result)
}

fn value_to_json(value: &Value, index: Option<&str>) -> json::Value {
	let mut result = json::Object::new();

	match value {
		Value::Literal(lit, ty) => {
			result.insert(Keyword::Value.into_str().to_string(), lit.clone().into_json());
			if let Some(ty) = ty {
				result.insert(Keyword::Type.into_str().to_string(), json::Value::String(ty.to_string()));
			}
		}
		Value::LangString(ls) => {
			result.insert(Keyword::Value.into_str().to_string(), json::Value::String(ls.as_str().to_string()));
			insert_lang_string_tags(&mut result, ls);
		}
		Value::Json(json_value) => {
			result.insert(Keyword::Value.into_str().to_string(), json_value.clone());
			result.insert(Keyword::Type.into_str().to_string(), json::Value::String(Keyword::Json.into_str().to_string()));
		}
	}

	if let Some(index) = index {
		result.insert(Keyword::Index.into_str().to_string(), json::Value::String(index.to_string()));
	}

	json::Value::Object(result)
}

fn insert_lang_string_tags(result: &mut json::Object, ls: &LangString) {
	if let Some(lang) = ls.language() {
		result.insert(Keyword::Language.into_str().to_string(), json::Value::String(lang.as_str().to_string()));
	}
	if let Some(dir) = ls.direction() {
		result.insert(Keyword::Direction.into_str().to_string(), json::Value::String(dir.to_string()));
	}
}

fn list_to_json(list: &List, index: Option<&str>) -> json::Value {
	let mut result = json::Object::new();
	let items = list.iter().map(indexed_object_to_json).collect();
	result.insert(Keyword::List.into_str().to_string(), json::Value::Array(items));
	if let Some(index) = index {
		result.insert(Keyword::Index.into_str().to_string(), json::Value::String(index.to_string()));
	}
	json::Value::Object(result)
}

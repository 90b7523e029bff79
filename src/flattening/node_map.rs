//! Node Map Generation (spec §4.4): walks an expanded document once, moving
//! every node into a flat `graph name -> node id -> node object` map and
//! reassigning blank node identifiers through a single generator shared
//! across the whole operation, so the same source blank node always maps to
//! the same output one.
use crate::id::BlankIdGenerator;
use crate::object::{IndexedNode, IndexedObject, Node, Object};
use crate::{Id, Indexed};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Raised when the same node id is declared twice under conflicting
/// `@index` values (spec §7 `conflicting indexes`).
#[derive(Clone, Debug)]
pub struct ConflictingIndexes {
	pub node_id: Id,
	pub defined_index: String,
	pub conflicting_index: String,
}

/// All the graphs produced by node map generation: the default graph plus
/// every named graph, keyed by its `@id`.
#[derive(Default)]
pub struct NodeMap {
	graphs: HashMap<Id, NodeMapGraph>,
	default_graph: NodeMapGraph,
}

impl NodeMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn into_parts(self) -> (NodeMapGraph, HashMap<Id, NodeMapGraph>) {
		(self.default_graph, self.graphs)
	}

	fn graph_mut(&mut self, id: Option<&Id>) -> &mut NodeMapGraph {
		match id {
			Some(id) => self.graphs.entry(id.clone()).or_default(),
			None => &mut self.default_graph,
		}
	}
}

/// The nodes of a single graph, keyed by `@id`, in first-declaration order.
#[derive(Default)]
pub struct NodeMapGraph {
	nodes: IndexMap<Id, IndexedNode>,
}

impl NodeMapGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get_mut(&mut self, id: &Id) -> Option<&mut IndexedNode> {
		self.nodes.get_mut(id)
	}

	pub fn get(&self, id: &Id) -> Option<&IndexedNode> {
		self.nodes.get(id)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &IndexedNode> {
		self.nodes.values()
	}

	pub fn declare_node(&mut self, id: Id, index: Option<&str>) -> Result<&mut IndexedNode, ConflictingIndexes> {
		if let Some(entry) = self.nodes.get_mut(&id) {
			match (entry.index(), index) {
				(Some(entry_index), Some(index)) if entry_index != index => {
					return Err(ConflictingIndexes {
						node_id: id,
						defined_index: entry_index.to_string(),
						conflicting_index: index.to_string(),
					});
				}
				(None, Some(index)) => entry.set_index(Some(index.to_string())),
				_ => {}
			}
		} else {
			self.nodes.insert(id.clone(), Indexed::new(Node::with_id(id.clone()), index.map(|s| s.to_string())));
		}

		Ok(self.nodes.get_mut(&id).unwrap())
	}

	pub fn into_nodes(self) -> impl Iterator<Item = IndexedNode> {
		self.nodes.into_values()
	}
}

/// Maps each blank node id seen in the source document to the one generated
/// for it the first time it was encountered (spec §4.4 "generated
/// deterministically ... shared across the operation").
#[derive(Default)]
struct Namespace {
	map: HashMap<String, Id>,
}

impl Namespace {
	fn assign_node_id(&mut self, generator: &mut BlankIdGenerator, id: Option<&Id>) -> Id {
		match id {
			Some(blank) if blank.is_blank() => {
				self.map.entry(blank.as_str().to_string()).or_insert_with(|| Id::Blank(generator.next())).clone()
			}
			Some(other) => other.clone(),
			None => Id::Blank(generator.next()),
		}
	}
}

pub fn generate_node_map(
	objects: &[IndexedObject],
	generator: &mut BlankIdGenerator,
) -> Result<NodeMap, ConflictingIndexes> {
	let mut node_map = NodeMap::new();
	let mut namespace = Namespace::default();
	for object in objects {
		extend_node_map(&mut namespace, generator, &mut node_map, object, None)?;
	}
	Ok(node_map)
}

fn extend_node_map(
	namespace: &mut Namespace,
	generator: &mut BlankIdGenerator,
	node_map: &mut NodeMap,
	element: &IndexedObject,
	active_graph: Option<&Id>,
) -> Result<IndexedObject, ConflictingIndexes> {
	match element.inner() {
		Object::Value(value) => Ok(Indexed::new(Object::Value(value.clone()), element.index().map(|s| s.to_string()))),
		Object::List(list) => {
			let mut flat_list = Vec::with_capacity(list.len());
			for item in list.iter() {
				flat_list.push(extend_node_map(namespace, generator, node_map, item, active_graph)?);
			}
			Ok(Indexed::new(
				Object::List(flat_list.into_iter().collect()),
				element.index().map(|s| s.to_string()),
			))
		}
		Object::Node(node) => {
			let flat = extend_node_map_from_node(namespace, generator, node_map, node, element.index(), active_graph)?;
			Ok(flat.map_inner(Object::Node))
		}
	}
}

fn extend_node_map_from_node(
	namespace: &mut Namespace,
	generator: &mut BlankIdGenerator,
	node_map: &mut NodeMap,
	node: &Node,
	index: Option<&str>,
	active_graph: Option<&Id>,
) -> Result<IndexedNode, ConflictingIndexes> {
	let id = namespace.assign_node_id(generator, node.id.as_ref());

	{
		let flat_node = node_map.graph_mut(active_graph).declare_node(id.clone(), index)?;
		flat_node.types = node.types.as_ref().map(|types| types.iter().map(|ty| namespace.assign_node_id(generator, Some(ty))).collect());
	}

	if let Some(graph) = &node.graph {
		let mut flat_graph = Vec::new();
		let mut seen = HashSet::new();
		for object in graph {
			let flat_object = extend_node_map(namespace, generator, node_map, object, Some(&id))?;
			if let Some(object_id) = flat_object.inner().id() {
				if !seen.insert(object_id.clone()) {
					continue;
				}
			}
			flat_graph.push(flat_object);
		}

		let flat_node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
		match &mut flat_node.graph {
			Some(existing) => existing.extend(flat_graph),
			None => flat_node.graph = Some(flat_graph),
		}
	}

	if let Some(included) = &node.included {
		let mut flat_included = Vec::new();
		let mut seen = HashSet::new();
		for inode in included.iter() {
			let flat_inode = extend_node_map_from_node(namespace, generator, node_map, inode.inner(), inode.index(), active_graph)?;
			if let Some(object_id) = flat_inode.id.clone() {
				if !seen.insert(object_id) {
					continue;
				}
			}
			flat_included.push(flat_inode);
		}

		let flat_node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
		match &mut flat_node.included {
			Some(existing) => existing.extend(flat_included),
			None => flat_node.included = Some(flat_included),
		}
	}

	for (property, objects) in node.properties.iter() {
		let mut flat_objects = Vec::with_capacity(objects.len());
		for object in objects {
			flat_objects.push(extend_node_map(namespace, generator, node_map, object, active_graph)?);
		}
		node_map.graph_mut(active_graph).get_mut(&id).unwrap().properties.insert(property.clone(), flat_objects);
	}

	if let Some(reverse_properties) = &node.reverse_properties {
		for (property, nodes) in reverse_properties.iter() {
			let mut flat_nodes = Vec::with_capacity(nodes.len());
			for rnode in nodes {
				flat_nodes.push(extend_node_map_from_node(namespace, generator, node_map, rnode.inner(), rnode.index(), active_graph)?);
			}
			let flat_node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
			let reverse = flat_node.reverse_properties.get_or_insert_with(Default::default);
			reverse.entry(property.clone()).or_insert_with(Vec::new).extend(flat_nodes);
		}
	}

	Ok(Indexed::new(Node::with_id(id), None))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::object::Properties;
	use iref::IriBuf;

	fn iri_id(s: &str) -> Id {
		Id::Iri(IriBuf::new(s.to_string()).unwrap())
	}

	#[test]
	fn merges_two_objects_sharing_an_id() {
		let mut generator = BlankIdGenerator::new();
		let a = {
			let mut n = Node::with_id(iri_id("http://example.org/a"));
			let mut props = Properties::new();
			props.insert(iri_id("http://example.org/name"), vec![Indexed::new(Object::Value(crate::object::Value::Literal(crate::object::Literal::String("x".into()), None)), None)]);
			n.properties = props;
			Indexed::new(Object::Node(n), None)
		};
		let objects = vec![a];
		let node_map = generate_node_map(&objects, &mut generator).unwrap();
		let (default_graph, named) = node_map.into_parts();
		assert!(named.is_empty());
		let nodes: Vec<_> = default_graph.into_nodes().collect();
		assert_eq!(nodes.len(), 1);
	}
}

//! Flattening (spec §4.4): turns an expanded document into a single flat
//! array of node objects with no nesting below the top level, by running
//! Node Map Generation and then re-serializing the map back into objects.
mod node_map;

pub use node_map::{generate_node_map, ConflictingIndexes, NodeMap, NodeMapGraph};

use crate::document::{ExpandedDocument, FlattenedDocument};
use crate::error::{Error, ErrorCode};
use crate::id::BlankIdGenerator;
use crate::object::{IndexedObject, Node, Object};
use crate::{Id, Indexed, ProcessingMode};

impl From<ConflictingIndexes> for Error {
	fn from(e: ConflictingIndexes) -> Self {
		Error::with(
			ErrorCode::ConflictingIndexes,
			format!(
				"node `{}` has conflicting indexes `{}` and `{}`",
				e.node_id, e.defined_index, e.conflicting_index
			),
		)
	}
}

/// Options accepted by [`flatten`], mirroring the fields of
/// [`crate::compaction::CompactionOptions`] that flattening's own expand+
/// compact passes need.
#[derive(Clone, Copy, Debug)]
pub struct FlattenOptions {
	pub processing_mode: ProcessingMode,
	pub ordered: bool,
	pub compact_arrays: bool,
	pub compact_to_relative: bool,
}

impl Default for FlattenOptions {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			ordered: false,
			compact_arrays: true,
			compact_to_relative: true,
		}
	}
}

impl FlattenOptions {
	pub fn expansion_options(&self) -> crate::expansion::Options {
		crate::expansion::Options {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
		}
	}

	pub fn compaction_options(&self) -> crate::compaction::CompactionOptions {
		crate::compaction::CompactionOptions {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
			compact_arrays: self.compact_arrays,
			compact_to_relative: self.compact_to_relative,
		}
	}
}

/// Drops a named graph's own `@graph`/`@included`/`@reverse` entries once
/// its nodes have been merged into the default graph's flat node list
/// (spec §4.4: graph objects become plain nodes once flattened).
fn filter_sub_graph(mut node: Node) -> Node {
	node.graph = None;
	node.included = None;
	node.reverse_properties = None;
	node
}

/// Runs Node Map Generation (spec §4.4) and serializes the resulting map
/// back into a single flat array: the default graph's nodes first, each
/// carrying its own named graph (if any) as a nested `@graph` array on the
/// node that names it.
pub fn flatten(document: &ExpandedDocument, generator: &mut BlankIdGenerator, ordered: bool) -> Result<FlattenedDocument, Error> {
	let node_map = generate_node_map(document.objects(), generator)?;
	let (default_graph, named_graphs) = node_map.into_parts();

	let mut nodes: Vec<Indexed<Node>> = default_graph.into_nodes().collect();

	for (graph_id, graph) in named_graphs {
		let mut graph_nodes: Vec<IndexedObject> = graph
			.into_nodes()
			.map(|n| n.map_inner(|node| Object::Node(filter_sub_graph(node))))
			.collect();

		if ordered {
			graph_nodes.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
		}

		if graph_nodes.is_empty() {
			continue;
		}

		match nodes.iter_mut().find(|n| n.id.as_ref() == Some(&graph_id)) {
			Some(existing) => existing.graph = Some(graph_nodes),
			None => {
				let mut host = Node::with_id(graph_id);
				host.graph = Some(std::mem::take(&mut graph_nodes));
				nodes.push(Indexed::new(host, None));
			}
		}
	}

	if ordered {
		nodes.sort_by(|a, b| sort_key_node(a).cmp(&sort_key_node(b)));
	}

	let objects = nodes.into_iter().map(|n| n.map_inner(Object::Node)).collect();
	Ok(FlattenedDocument::new(objects))
}

fn sort_key(object: &IndexedObject) -> String {
	object.inner().id().map(Id::to_string).unwrap_or_default()
}

fn sort_key_node(node: &Indexed<Node>) -> String {
	node.id.as_ref().map(Id::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::object::{Literal, Properties, Value};
	use iref::IriBuf;

	fn iri_id(s: &str) -> Id {
		Id::Iri(IriBuf::new(s.to_string()).unwrap())
	}

	#[test]
	fn flattens_nested_node() {
		let mut inner = Node::with_id(iri_id("http://example.org/b"));
		let mut inner_props = Properties::new();
		inner_props.insert(
			iri_id("http://example.org/name"),
			vec![Indexed::new(Object::Value(Value::Literal(Literal::String("b".into()), None)), None)],
		);
		inner.properties = inner_props;

		let mut outer = Node::with_id(iri_id("http://example.org/a"));
		let mut outer_props = Properties::new();
		outer_props.insert(
			iri_id("http://example.org/ref"),
			vec![Indexed::new(Object::Node(inner), None)],
		);
		outer.properties = outer_props;

		let document = ExpandedDocument::from_objects(vec![Indexed::new(Object::Node(outer), None)]);
		let mut generator = BlankIdGenerator::new();
		let flattened = flatten(&document, &mut generator, true).unwrap();

		assert_eq!(flattened.objects().len(), 2);
	}
}

//! Framing (spec §4.5): selects nodes from an expanded document that match
//! a frame template, then re-emits each match shaped the way the frame
//! describes, inlining or stubbing referenced nodes per an embedding
//! policy. Frames are parsed directly out of their raw JSON rather than run
//! through the ordinary Expansion algorithm: frame-only syntax (`@default`
//! values, `{}` wildcards, per-property `@embed`/`@explicit`) doesn't
//! survive node-object expansion, which silently drops unrecognized
//! keyword entries (spec §4.2).
use crate::context::ActiveContext;
use crate::document::ExpandedDocument;
use crate::error::{Error, ErrorCode};
use crate::flattening::{generate_node_map, NodeMapGraph};
use crate::id::BlankIdGenerator;
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, Literal, Node, Object, Value};
use crate::warning::Handler;
use crate::{Id, Indexed, Keyword, ProcessingMode, Term};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Embedding policy for a referenced node (spec §4.5 `@embed`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EmbedMode {
	Always,
	Once,
	Never,
	Link,
}

impl Default for EmbedMode {
	fn default() -> Self {
		EmbedMode::Once
	}
}

impl EmbedMode {
	fn from_str(s: &str) -> Option<Self> {
		match s {
			"@always" => Some(Self::Always),
			"@once" => Some(Self::Once),
			"@never" => Some(Self::Never),
			"@link" => Some(Self::Link),
			_ => None,
		}
	}
}

/// Options accepted by [`frame`] (spec §6 framing controls).
#[derive(Clone, Copy, Debug)]
pub struct FramingOptions {
	pub embed: EmbedMode,
	pub explicit: bool,
	pub require_all: bool,
	pub omit_default: bool,
	pub omit_graph: bool,
	pub processing_mode: ProcessingMode,
	pub ordered: bool,
}

impl Default for FramingOptions {
	fn default() -> Self {
		Self {
			embed: EmbedMode::default(),
			explicit: false,
			require_all: false,
			omit_default: false,
			omit_graph: false,
			processing_mode: ProcessingMode::default(),
			ordered: false,
		}
	}
}

impl FramingOptions {
	pub(crate) fn context_options(self) -> crate::context::ProcessingOptions {
		crate::context::ProcessingOptions {
			processing_mode: self.processing_mode,
			..Default::default()
		}
	}
}

/// What a frame expects of one of a matched node's properties (spec §4.5
/// step 3: "a frame property value acts as a pattern").
enum PropertyPattern {
	/// `{}`: any value matches; embedded per the active embed policy.
	Wildcard,
	/// One or more nested frame objects a referenced node must satisfy.
	Node(Vec<FrameNode>),
	/// `{"@default": value}`: synthesized when the node lacks the property.
	Default(Vec<IndexedObject>),
}

/// A parsed frame object.
#[derive(Default)]
struct FrameNode {
	ids: Option<Vec<Id>>,
	types: Option<Vec<Id>>,
	properties: IndexMap<Id, PropertyPattern>,
	embed: Option<EmbedMode>,
	explicit: Option<bool>,
	require_all: Option<bool>,
}

/// Normalizes a frame value that may or may not already be an array (same
/// shape as [`crate::expansion`]'s own `as_array` helper).
fn as_array(value: &json::Value) -> Vec<&json::Value> {
	match value {
		json::Value::Array(items) => items.iter().collect(),
		other => vec![other],
	}
}

async fn parse_id_values<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	value: &json::Value,
	loader: &L,
	warnings: &mut W,
	options: crate::context::ProcessingOptions,
) -> Result<Vec<Id>, Error> {
	let mut ids = Vec::new();
	for item in as_array(value) {
		let Some(s) = item.as_str() else { continue };
		let term = crate::context::expand_iri_simple(active_context, Some(s), true, false, loader, warnings, options).await?;
		if let Term::Id(id) = term {
			ids.push(id);
		}
	}
	Ok(ids)
}

async fn parse_type_values<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	value: &json::Value,
	loader: &L,
	warnings: &mut W,
	options: crate::context::ProcessingOptions,
) -> Result<Vec<Id>, Error> {
	let mut types = Vec::new();
	for item in as_array(value) {
		let Some(s) = item.as_str() else { continue };
		let term = crate::context::expand_iri_simple(active_context, Some(s), true, true, loader, warnings, options).await?;
		if let Term::Id(id) = term {
			types.push(id);
		}
	}
	Ok(types)
}

fn scalar_to_object(v: &json::Value) -> IndexedObject {
	let literal = match v {
		json::Value::String(s) => Literal::String(s.clone()),
		json::Value::Boolean(b) => Literal::Boolean(*b),
		json::Value::Number(n) => Literal::Number(n.clone()),
		json::Value::Null => Literal::Null,
		json::Value::Object(_) | json::Value::Array(_) => Literal::String(json::canonicalize(v)),
	};
	Indexed::new(Object::Value(Value::Literal(literal, None)), None)
}

fn default_values(value: &json::Value) -> Vec<IndexedObject> {
	as_array(value).into_iter().map(scalar_to_object).collect()
}

async fn parse_frame_node<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	object: &json::Object,
	loader: &L,
	warnings: &mut W,
	options: FramingOptions,
) -> Result<FrameNode, Error> {
	let mut frame = FrameNode::default();
	let ctx_opts = options.context_options();

	for (key, value) in object.iter() {
		let term = crate::context::expand_iri_simple(active_context, Some(key), false, true, loader, warnings, ctx_opts).await?;

		match term {
			Term::Null => continue,
			Term::Keyword(Keyword::Context) => continue,
			Term::Keyword(Keyword::Id) => {
				frame.ids = Some(parse_id_values(active_context, value, loader, warnings, ctx_opts).await?);
			}
			Term::Keyword(Keyword::Type) => {
				frame.types = Some(parse_type_values(active_context, value, loader, warnings, ctx_opts).await?);
			}
			Term::Keyword(Keyword::Embed) => {
				frame.embed = value.as_str().and_then(EmbedMode::from_str);
			}
			Term::Keyword(Keyword::Explicit) => frame.explicit = value.as_bool(),
			Term::Keyword(Keyword::RequireAll) => frame.require_all = value.as_bool(),
			Term::Keyword(_) => continue,
			Term::Id(prop) => {
				let pattern = Box::pin(parse_property_pattern(active_context, value, loader, warnings, options)).await?;
				frame.properties.insert(prop, pattern);
			}
		}
	}

	Ok(frame)
}

async fn parse_property_pattern<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	value: &json::Value,
	loader: &L,
	warnings: &mut W,
	options: FramingOptions,
) -> Result<PropertyPattern, Error> {
	let items = as_array(value);

	let mut patterns = Vec::new();
	for item in &items {
		let Some(object) = item.as_object() else { continue };

		if let Some(default) = object.get(Keyword::Default.into_str()) {
			return Ok(PropertyPattern::Default(default_values(default)));
		}

		if object.is_empty() {
			return Ok(PropertyPattern::Wildcard);
		}

		patterns.push(Box::pin(parse_frame_node(active_context, object, loader, warnings, options)).await?);
	}

	if patterns.is_empty() {
		Ok(PropertyPattern::Wildcard)
	} else {
		Ok(PropertyPattern::Node(patterns))
	}
}

fn matches_frame(node: &Node, frame: &FrameNode, graph: &NodeMapGraph, options: FramingOptions) -> bool {
	if let Some(ids) = &frame.ids {
		if !ids.iter().any(|id| node.id.as_ref() == Some(id)) {
			return false;
		}
	}

	if let Some(types) = &frame.types {
		if types.is_empty() {
			if node.types().is_empty() {
				return false;
			}
		} else if !types.iter().any(|ty| node.has_type(ty)) {
			return false;
		}
	}

	if frame.properties.is_empty() {
		return true;
	}

	let require_all = frame.require_all.unwrap_or(options.require_all);
	let mut any_matched = false;

	for (prop, pattern) in &frame.properties {
		let values = node.properties.get(prop).unwrap_or(&[]);
		let matched = match pattern {
			PropertyPattern::Wildcard => !values.is_empty(),
			PropertyPattern::Default(_) => true,
			PropertyPattern::Node(patterns) => values.iter().any(|v| {
				v.inner()
					.as_node()
					.and_then(|n| n.id.as_ref())
					.and_then(|id| graph.get(id))
					.map(|full| patterns.iter().any(|p| matches_frame(full.inner(), p, graph, options)))
					.unwrap_or(false)
			}),
		};

		if require_all && !matched {
			return false;
		}
		any_matched |= matched;
	}

	require_all || any_matched
}

/// Tracks, across the whole framing call, which node ids have already been
/// inlined at least once (spec §4.5 step 4's "link table").
struct FramingState {
	options: FramingOptions,
	embedded: HashSet<Id>,
}

fn emit_reference(graph: &NodeMapGraph, frame: &FrameNode, id: &Id, state: &mut FramingState, stack: &mut HashSet<Id>) -> IndexedObject {
	if stack.contains(id) {
		return Indexed::new(Object::Node(Node::with_id(id.clone())), None);
	}

	let embed = frame.embed.unwrap_or(state.options.embed);
	let should_embed = match embed {
		EmbedMode::Never => false,
		EmbedMode::Always => true,
		EmbedMode::Once | EmbedMode::Link => !state.embedded.contains(id),
	};

	if !should_embed {
		return Indexed::new(Object::Node(Node::with_id(id.clone())), None);
	}

	state.embedded.insert(id.clone());
	stack.insert(id.clone());
	let emitted = emit_node(graph, frame, id, state, stack);
	stack.remove(id);
	Indexed::new(Object::Node(emitted), None)
}

fn emit_value_default(graph: &NodeMapGraph, value: &IndexedObject, state: &mut FramingState, stack: &mut HashSet<Id>) -> IndexedObject {
	match value.inner() {
		Object::Node(n) if n.id.is_some() => {
			let id = n.id.clone().unwrap();
			let wildcard = FrameNode::default();
			emit_reference(graph, &wildcard, &id, state, stack)
		}
		_ => value.clone(),
	}
}

fn emit_property_values(graph: &NodeMapGraph, pattern: &PropertyPattern, values: &[IndexedObject], state: &mut FramingState, stack: &mut HashSet<Id>) -> Vec<IndexedObject> {
	match pattern {
		PropertyPattern::Wildcard | PropertyPattern::Default(_) => values.iter().map(|v| emit_value_default(graph, v, state, stack)).collect(),
		PropertyPattern::Node(patterns) => {
			let mut out = Vec::with_capacity(values.len());
			for v in values {
				let matched = v
					.inner()
					.as_node()
					.and_then(|n| n.id.as_ref())
					.and_then(|id| graph.get(id).map(|full| (id.clone(), full)))
					.and_then(|(id, full)| patterns.iter().find(|p| matches_frame(full.inner(), p, graph, state.options)).map(|p| (id, p)));

				match matched {
					Some((id, pattern)) => out.push(emit_reference(graph, pattern, &id, state, stack)),
					None => out.push(v.clone()),
				}
			}
			out
		}
	}
}

fn emit_node(graph: &NodeMapGraph, frame: &FrameNode, id: &Id, state: &mut FramingState, stack: &mut HashSet<Id>) -> Node {
	let source = graph.get(id).map(|n| n.inner().clone()).unwrap_or_else(|| Node::with_id(id.clone()));

	let mut result = Node::with_id(id.clone());
	result.types = source.types.clone();

	let explicit = frame.explicit.unwrap_or(state.options.explicit);
	let mut handled = HashSet::new();

	for (prop, pattern) in &frame.properties {
		handled.insert(prop.clone());
		let values = source.properties.get(prop).unwrap_or(&[]);

		if values.is_empty() {
			if let PropertyPattern::Default(defaults) = pattern {
				if !state.options.omit_default && !defaults.is_empty() {
					result.properties.insert(prop.clone(), defaults.clone());
				}
			}
			continue;
		}

		let emitted = emit_property_values(graph, pattern, values, state, stack);
		if !emitted.is_empty() {
			result.properties.insert(prop.clone(), emitted);
		}
	}

	if !explicit {
		for (prop, values) in source.properties.iter() {
			if handled.contains(prop) {
				continue;
			}
			let emitted: Vec<IndexedObject> = values.iter().map(|v| emit_value_default(graph, v, state, stack)).collect();
			result.properties.insert(prop.clone(), emitted);
		}
	}

	result
}

fn matching_subjects(graph: &NodeMapGraph, frame: &FrameNode, options: FramingOptions) -> Vec<Id> {
	let mut ids: Vec<Id> = graph.nodes().filter(|n| matches_frame(n.inner(), frame, graph, options)).filter_map(|n| n.inner().id.clone()).collect();
	if options.ordered {
		ids.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
	}
	ids
}

/// Runs Framing (spec §4.5) over an already-expanded document, returning
/// the matched, reshaped top-level node objects (pre-compaction: callers
/// compact the result against the frame's own `@context`, as spec step 6
/// describes).
pub async fn frame<L: Loader, W: Handler>(
	document: &ExpandedDocument,
	frame_value: &json::Value,
	active_context: &ActiveContext,
	generator: &mut BlankIdGenerator,
	loader: &L,
	warnings: &mut W,
	options: FramingOptions,
) -> Result<Vec<IndexedObject>, Error> {
	let frame_object = frame_value
		.as_object()
		.or_else(|| frame_value.as_array().and_then(|a| a.first()).and_then(json::Value::as_object))
		.ok_or_else(|| Error::with(ErrorCode::InvalidFrame, "frame must be a JSON object"))?;

	let root = parse_frame_node(active_context, frame_object, loader, warnings, options).await?;

	let node_map = generate_node_map(document.objects(), generator)?;
	let (default_graph, _named_graphs) = node_map.into_parts();

	let mut state = FramingState {
		options,
		embedded: HashSet::new(),
	};

	let subjects = matching_subjects(&default_graph, &root, options);
	let mut results = Vec::with_capacity(subjects.len());
	let mut stack = HashSet::new();

	for id in subjects {
		state.embedded.insert(id.clone());
		let node = emit_node(&default_graph, &root, &id, &mut state, &mut stack);
		results.push(Indexed::new(Object::Node(node), None));
	}

	Ok(results)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::object::Properties;
	use iref::IriBuf;

	fn iri_id(s: &str) -> Id {
		Id::Iri(IriBuf::new(s.to_string()).unwrap())
	}

	fn doc_with_two_nodes() -> ExpandedDocument {
		let mut a = Node::with_id(iri_id("http://example.org/a"));
		a.types = Some(vec![iri_id("http://example.org/Person")]);
		let mut b = Node::with_id(iri_id("http://example.org/b"));
		let mut props = Properties::new();
		props.insert(iri_id("http://example.org/name"), vec![Indexed::new(Object::Value(Value::Literal(Literal::String("b".into()), None)), None)]);
		b.properties = props;

		ExpandedDocument::from_objects(vec![Indexed::new(Object::Node(a), None), Indexed::new(Object::Node(b), None)])
	}

	#[tokio::test]
	async fn matches_by_type() {
		let document = doc_with_two_nodes();
		let mut frame_obj = json::Object::new();
		frame_obj.insert("@type", json::Value::String("http://example.org/Person".into()));
		let frame_value = json::Value::Object(frame_obj);

		let active_context = ActiveContext::new(None);
		let mut generator = BlankIdGenerator::new();
		let loader = crate::loader::NoLoader;
		let mut warnings = ();

		let result = frame(&document, &frame_value, &active_context, &mut generator, &loader, &mut warnings, FramingOptions::default())
			.await
			.unwrap();

		assert_eq!(result.len(), 1);
		assert_eq!(result[0].inner().id(), Some(&iri_id("http://example.org/a")));
	}

	#[tokio::test]
	async fn wildcard_frame_matches_every_node() {
		let document = doc_with_two_nodes();
		let frame_value = json::Value::Object(json::Object::new());
		let active_context = ActiveContext::new(None);
		let mut generator = BlankIdGenerator::new();
		let loader = crate::loader::NoLoader;
		let mut warnings = ();

		let result = frame(&document, &frame_value, &active_context, &mut generator, &loader, &mut warnings, FramingOptions::default())
			.await
			.unwrap();

		assert_eq!(result.len(), 2);
	}
}

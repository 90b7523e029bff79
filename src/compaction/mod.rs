//! Compaction algorithm (spec §4.3): the inverse of expansion, rewriting an
//! expanded document back into a compact form driven by a context. Picks
//! the shortest/most-specific alias for every IRI via an [Inverse
//! Context](crate::context::InverseContext), collapsing container map
//! shapes (`@index`/`@language`/`@id`/`@type`) back into JSON object keys.
mod collection;
mod iri;
mod node;
mod property;
mod value;

pub(crate) use collection::compact_collection_with;
pub(crate) use iri::{compact_iri, compact_iri_with};
pub(crate) use node::compact_indexed_node_with;
pub(crate) use property::{compact_property, select_nest_result};
pub(crate) use value::compact_indexed_value_with;

use crate::context::ActiveContext;
use crate::document::{ExpandedDocument, FlattenedDocument};
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, Object};
use crate::warning::Handler;
use crate::ProcessingMode;

/// Options threaded through the compaction algorithm (spec §6).
#[derive(Clone, Copy, Debug)]
pub struct CompactionOptions {
	pub processing_mode: ProcessingMode,
	/// Compact IRIs relative to the document's base IRI when no term/prefix
	/// applies (spec §6 `compactToRelative`).
	pub compact_to_relative: bool,
	/// Collapse single-element arrays down to their one element (spec §6
	/// `compactArrays`).
	pub compact_arrays: bool,
	/// Process object entries in lexicographic key order (spec §6
	/// `ordered`).
	pub ordered: bool,
}

impl Default for CompactionOptions {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			compact_to_relative: true,
			compact_arrays: true,
			ordered: false,
		}
	}
}

impl CompactionOptions {
	pub(crate) fn context_options(self) -> crate::context::ProcessingOptions {
		crate::context::ProcessingOptions {
			processing_mode: self.processing_mode,
			..Default::default()
		}
	}
}

/// Bundles the two active contexts and the current property that thread
/// through recursive compaction calls, so callers don't have to pass four
/// parameters at every recursion site (teacher's `Compactor` pattern).
#[derive(Clone, Copy)]
pub(crate) struct Compactor<'a> {
	pub options: CompactionOptions,
	pub active_context: &'a ActiveContext,
	pub type_scoped_context: &'a ActiveContext,
	pub active_property: Option<&'a str>,
}

impl<'a> Compactor<'a> {
	pub fn new(active_context: &'a ActiveContext, options: CompactionOptions) -> Self {
		Self {
			options,
			active_context,
			type_scoped_context: active_context,
			active_property: None,
		}
	}

	pub fn with_active_context(self, active_context: &'a ActiveContext) -> Self {
		Self { active_context, ..self }
	}

	pub fn with_type_scoped_context(self, type_scoped_context: &'a ActiveContext) -> Self {
		Self {
			type_scoped_context,
			..self
		}
	}

	pub fn with_active_property(self, active_property: Option<&'a str>) -> Self {
		Self { active_property, ..self }
	}
}

/// Inserts `value` under `key`, promoting a pre-existing scalar entry into
/// an array, and flattening array-valued inserts one level (spec §4.3
/// recurring "Initialize as array... and add..." phrasing around object
/// entries that may already hold one value, several, or none).
pub(crate) fn add_value(map: &mut json::Object, key: &str, value: json::Value, as_array: bool) {
	let is_array = map.get(key).map(json::Value::is_array);
	match is_array {
		Some(false) => {
			let existing = map.remove(key).unwrap();
			map.insert(key.to_string(), json::Value::Array(vec![existing]));
		}
		None if as_array => {
			map.insert(key.to_string(), json::Value::Array(Vec::new()));
		}
		_ => {}
	}

	match value {
		json::Value::Array(values) => {
			for value in values {
				add_value(map, key, value, false);
			}
		}
		value => match map.get(key) {
			Some(json::Value::Array(_)) => {
				if let Some(json::Value::Array(array)) = map.get(key).cloned() {
					let mut array = array;
					array.push(value);
					map.insert(key.to_string(), json::Value::Array(array));
				}
			}
			_ => {
				map.insert(key.to_string(), value);
			}
		},
	}
}

/// Extracts the raw JSON scalar carried by a value object (spec §4.3
/// "Value Compaction" bare-scalar shortcut).
pub(crate) fn value_value(value: &crate::object::Value) -> json::Value {
	use crate::object::{Literal, Value};
	match value {
		Value::Literal(lit, _) => lit.clone().into_json(),
		Value::LangString(s) => json::Value::String(s.as_str().to_string()),
		Value::Json(json) => json.clone(),
	}
}

/// Wraps a bare top-level array result in `{"@graph": [...]}` then
/// prepends `"@context"` to the resulting object (spec §4.3's last step:
/// "If compacted document is an array, set compacted document to a new map
/// ... Otherwise ... if context is not empty, prepend").
fn embed_context(compacted: json::Value, alias_graph: &str, context_value: Option<&json::Value>) -> json::Value {
	let mut compacted = compacted;
	if let json::Value::Array(items) = compacted {
		if items.is_empty() {
			compacted = json::Value::Object(json::Object::new());
		} else {
			let mut obj = json::Object::new();
			obj.insert(alias_graph.to_string(), json::Value::Array(items));
			compacted = json::Value::Object(obj);
		}
	}

	match (context_value, &mut compacted) {
		(Some(ctx), json::Value::Object(obj)) if !ctx.is_null() && !is_empty_context(ctx) => {
			let mut with_context = json::Object::new();
			with_context.insert("@context".to_string(), ctx.clone());
			for (k, v) in obj.iter() {
				with_context.insert(k.clone(), v.clone());
			}
			json::Value::Object(with_context)
		}
		_ => compacted,
	}
}

fn is_empty_context(value: &json::Value) -> bool {
	matches!(value, json::Value::Array(a) if a.is_empty()) || matches!(value, json::Value::Object(o) if o.is_empty())
}

/// Compacts a whole expanded document (spec §4.3's entry point; spec §6
/// `compact`). `context_value` is the original, unprocessed `@context`
/// value the caller compacted against, re-embedded at the top unless it is
/// absent, `null`, or empty.
pub async fn compact<L: Loader, W: Handler>(
	document: &ExpandedDocument,
	active_context: &ActiveContext,
	context_value: Option<&json::Value>,
	loader: &L,
	warnings: &mut W,
	options: CompactionOptions,
) -> Result<json::Value, Error> {
	let inverse_context = crate::context::InverseContext::from(active_context);
	let compactor = Compactor::new(active_context, options);

	let result = compact_collection_with(
		compactor,
		&inverse_context,
		document.objects().iter(),
		loader,
		warnings,
	)
	.await?;

	let alias_graph = compact_key_str(active_context, &inverse_context, options, crate::Keyword::Graph);
	Ok(embed_context(result, &alias_graph, context_value))
}

/// Compacts a flattened document the same way (spec §4.4's output is just
/// a particular shape of expanded document; compaction doesn't care).
pub async fn compact_flattened<L: Loader, W: Handler>(
	document: &FlattenedDocument,
	active_context: &ActiveContext,
	context_value: Option<&json::Value>,
	loader: &L,
	warnings: &mut W,
	options: CompactionOptions,
) -> Result<json::Value, Error> {
	let inverse_context = crate::context::InverseContext::from(active_context);
	let compactor = Compactor::new(active_context, options);
	let result = compact_collection_with(
		compactor,
		&inverse_context,
		document.objects().iter(),
		loader,
		warnings,
	)
	.await?;
	let alias_graph = compact_key_str(active_context, &inverse_context, options, crate::Keyword::Graph);
	Ok(embed_context(result, &alias_graph, context_value))
}

fn compact_key_str(
	active_context: &ActiveContext,
	inverse_context: &crate::context::InverseContext,
	options: CompactionOptions,
	keyword: crate::Keyword,
) -> String {
	compact_iri(
		active_context,
		inverse_context,
		&crate::Term::Keyword(keyword),
		true,
		false,
		options,
	)
	.ok()
	.flatten()
	.unwrap_or_else(|| keyword.into_str().to_string())
}

/// Entry point for a single indexed object fragment (spec §4.3's per-shape
/// dispatch: value / node / list objects).
pub(crate) async fn compact_indexed_fragment<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &crate::context::InverseContext,
	object: &IndexedObject,
	loader: &L,
	warnings: &mut W,
) -> Result<json::Value, Error> {
	match object.inner() {
		Object::Value(value) => {
			compact_indexed_value_with(compactor, inverse_context, value, object.index(), loader, warnings).await
		}
		Object::Node(node) => {
			compact_indexed_node_with(compactor, inverse_context, node, object.index(), loader, warnings).await
		}
		Object::List(list) => compact_indexed_list_with(compactor, inverse_context, list, object.index(), loader, warnings).await,
	}
}

async fn compact_indexed_list_with<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &crate::context::InverseContext,
	list: &crate::object::List,
	index: Option<&str>,
	loader: &L,
	warnings: &mut W,
) -> Result<json::Value, Error> {
	use std::borrow::Cow;

	let mut active_context: Cow<ActiveContext> = if compactor.active_context.previous_context.is_some() {
		Cow::Owned(compactor.active_context.previous().clone())
	} else {
		Cow::Borrowed(compactor.active_context)
	};

	let mut list_container = false;
	if let Some(active_property) = compactor.active_property {
		if let Some(def) = compactor.type_scoped_context.get(active_property) {
			if let Some(local) = &def.context {
				active_context = Cow::Owned(
					crate::context::process_context(
						active_context.as_ref(),
						local.as_ref(),
						def.base_url.as_deref(),
						loader,
						warnings,
						crate::context::ProcessingStack::new(),
						compactor.options.context_options().with_override(),
					)
					.await?,
				);
			}
			list_container = def.container.contains(crate::syntax::ContainerKind::List);
		}
	}

	let inner_compactor = compactor.with_active_context(active_context.as_ref());

	if list_container {
		compact_collection_with(inner_compactor, inverse_context, list.iter(), loader, warnings).await
	} else {
		let mut result = json::Object::new();
		compact_property(
			inner_compactor,
			inverse_context,
			&mut result,
			&crate::Term::Keyword(crate::Keyword::List),
			list.as_slice(),
			loader,
			false,
			warnings,
		)
		.await?;

		if let Some(index) = index {
			let mut index_container = false;
			if let Some(active_property) = inner_compactor.active_property {
				if let Some(def) = inner_compactor.active_context.get(active_property) {
					index_container = def.container.contains(crate::syntax::ContainerKind::Index);
				}
			}
			if !index_container {
				let alias = compact_iri(
					inner_compactor.active_context,
					inverse_context,
					&crate::Term::Keyword(crate::Keyword::Index),
					true,
					false,
					inner_compactor.options,
				)?
				.unwrap();
				result.insert(alias, json::Value::String(index.to_string()));
			}
		}

		Ok(json::Value::Object(result))
	}
}

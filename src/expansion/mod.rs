//! Expansion algorithm (spec §4.2): recursively turns a JSON-LD document,
//! together with the active context it starts from, into expanded form.
mod element;
mod literal;
mod node;
mod value;

pub(crate) use literal::expand_literal;
pub(crate) use node::expand_node;
pub(crate) use value::{expand_value_object, ExpandedEntry};

use crate::context::ActiveContext;
use crate::document::ExpandedDocument;
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::IndexedObject;
use crate::warning::Handler;
use crate::{Id, Indexed, ProcessingMode, Term};
use iref::Iri;

/// Options threaded through the expansion algorithm (spec §6).
#[derive(Clone, Copy, Debug)]
pub struct Options {
	pub processing_mode: ProcessingMode,
	/// Process object entries in lexicographic key order rather than
	/// document order (spec §6 `ordered`).
	pub ordered: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			ordered: false,
		}
	}
}

impl Options {
	pub(crate) fn context_options(self) -> crate::context::ProcessingOptions {
		crate::context::ProcessingOptions {
			processing_mode: self.processing_mode,
			..Default::default()
		}
	}
}

/// What the tree walk is currently attaching the value being expanded to: a
/// property IRI (including the synthetic `@graph`/`@included`/nest-key
/// properties), or nothing at the top of the document (spec §4.2's "active
/// property").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ActiveProperty<'a> {
	Some(&'a str),
	None,
}

impl<'a> ActiveProperty<'a> {
	pub fn as_str(&self) -> Option<&'a str> {
		match self {
			Self::Some(s) => Some(s),
			Self::None => None,
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}

	pub fn definition(&self, active_context: &ActiveContext) -> Option<crate::context::TermDefinition> {
		self.as_str().and_then(|s| active_context.get(s).cloned())
	}
}

/// The result of expanding a single element: nothing, one object, or
/// several (spec §4.2's "array of zero or more maps" output shape).
pub(crate) enum Expanded {
	Null,
	Object(IndexedObject),
	Array(Vec<IndexedObject>),
}

impl Expanded {
	pub fn is_list(&self) -> bool {
		matches!(self, Expanded::Object(o) if o.is_list())
	}

	pub fn into_vec(self) -> Vec<IndexedObject> {
		match self {
			Expanded::Null => Vec::new(),
			Expanded::Object(o) => vec![o],
			Expanded::Array(a) => a,
		}
	}
}

/// Converts the result of IRI expansion to a node identifier, dropping
/// `@null` (spec §4.2 `@id`/`@type` handling: a keyword result like `@none`
/// is kept verbatim as an invalid id rather than silently discarded, so
/// round-tripping frame/compaction code can still see it).
pub(crate) fn term_to_id(term: Term) -> Option<Id> {
	match term {
		Term::Null => None,
		Term::Id(id) => Some(id),
		Term::Keyword(k) => Some(Id::Invalid(k.into_str().to_string())),
	}
}

/// Normalizes a JSON-LD value that may or may not already be an array
/// (spec's recurring "if value is not an array, set it to an array
/// containing only value" step).
pub(crate) fn as_array(value: &json::Value) -> Vec<&json::Value> {
	match value {
		json::Value::Array(items) => items.iter().collect(),
		other => vec![other],
	}
}

/// Drops free-floating top-level values (spec §4.2: the top-level result is
/// always an array of node objects; scalars and list objects directly at
/// the top level are excluded, not an error).
fn filter_top_level_item(item: &IndexedObject) -> bool {
	!item.inner().is_value() && !item.inner().is_list()
}

/// Expands a whole document (spec §4.2's entry point; spec §6 `expand`).
/// `active_property` is always absent at the top level.
pub async fn expand<L: Loader, W: Handler>(
	document: &json::Value,
	active_context: &ActiveContext,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
) -> Result<ExpandedDocument, Error> {
	let expanded = Box::pin(element::expand_element(
		active_context,
		ActiveProperty::None,
		document,
		base_url,
		loader,
		warnings,
		options,
		false,
	))
	.await?;

	let objects: Vec<IndexedObject> = expanded
		.into_vec()
		.into_iter()
		.filter(filter_top_level_item)
		.collect();

	Ok(ExpandedDocument::from_objects(objects))
}

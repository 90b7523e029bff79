//! A JSON-LD 1.1 processor: context processing, expansion, compaction,
//! flattening, framing, and the RDF bridge (<https://www.w3.org/TR/json-ld11/>,
//! <https://www.w3.org/TR/json-ld11-api/>).
//!
//! The six entry points below (`expand`, `compact`, `flatten`, `frame`,
//! `to_rdf`, `from_rdf`) compose the per-algorithm modules; each of those
//! modules can also be used directly for finer control.
pub mod compaction;
pub mod context;
mod direction;
mod document;
pub mod error;
pub mod expansion;
pub mod flattening;
pub mod framing;
mod id;
mod indexed;
pub mod json;
mod lang;
pub mod loader;
pub mod media_type;
mod mode;
pub mod object;
pub mod rdf;
pub mod syntax;
mod term;
pub mod warning;

pub use context::{clear_preloaded_contexts, preload_context, ActiveContext};
pub use direction::Direction;
pub use document::{ExpandedDocument, FlattenedDocument};
pub use error::{Error, ErrorCode};
pub use flattening::{ConflictingIndexes, FlattenOptions};
pub use framing::{EmbedMode, FramingOptions};
pub use id::{BlankIdGenerator, Id};
pub use indexed::Indexed;
pub use lang::LenientLangTagBuf;
pub use loader::{FsLoader, Loader, MapLoader, NoLoader, RemoteDocumentReference};
pub use mode::ProcessingMode;
pub use object::{IndexedObject, Object};
pub use rdf::{FromRdfOptions, Quad, RdfDirection, RdfLiteral, RdfTerm, ToRdfOptions};
pub use syntax::{Context as SyntaxContext, Keyword, Nullable};
pub use term::Term;
pub use warning::{Handler, Warning};

#[cfg(feature = "reqwest")]
pub use loader::ReqwestLoader;

use context::ProcessingStack;
use iref::Iri;

/// Options shared by all six entry points (spec §6's "Recognized options"),
/// composed down into each algorithm's own narrower options struct.
#[derive(Clone, Copy, Debug)]
pub struct JsonLdOptions {
	pub processing_mode: ProcessingMode,
	pub compact_arrays: bool,
	pub compact_to_relative: bool,
	pub ordered: bool,
	pub produce_generalized_rdf: bool,
	pub use_native_types: bool,
	pub use_rdf_type: bool,
	pub rdf_direction: RdfDirection,
	pub embed: EmbedMode,
	pub explicit: bool,
	pub require_all: bool,
	pub omit_default: bool,
	pub omit_graph: bool,
}

impl Default for JsonLdOptions {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			compact_arrays: true,
			compact_to_relative: true,
			ordered: false,
			produce_generalized_rdf: false,
			use_native_types: false,
			use_rdf_type: false,
			rdf_direction: RdfDirection::default(),
			embed: EmbedMode::default(),
			explicit: false,
			require_all: false,
			omit_default: false,
			omit_graph: false,
		}
	}
}

impl JsonLdOptions {
	pub fn expansion_options(&self) -> expansion::Options {
		expansion::Options {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
		}
	}

	pub fn compaction_options(&self) -> compaction::CompactionOptions {
		compaction::CompactionOptions {
			processing_mode: self.processing_mode,
			compact_to_relative: self.compact_to_relative,
			compact_arrays: self.compact_arrays,
			ordered: self.ordered,
		}
	}

	pub fn framing_options(&self) -> framing::FramingOptions {
		framing::FramingOptions {
			embed: self.embed,
			explicit: self.explicit,
			require_all: self.require_all,
			omit_default: self.omit_default,
			omit_graph: self.omit_graph,
			processing_mode: self.processing_mode,
			ordered: self.ordered,
		}
	}

	pub fn to_rdf_options(&self) -> rdf::ToRdfOptions {
		rdf::ToRdfOptions {
			produce_generalized_rdf: self.produce_generalized_rdf,
			rdf_direction: self.rdf_direction,
		}
	}

	pub fn from_rdf_options(&self) -> rdf::FromRdfOptions {
		rdf::FromRdfOptions {
			use_native_types: self.use_native_types,
			use_rdf_type: self.use_rdf_type,
			rdf_direction: self.rdf_direction,
		}
	}
}

async fn build_active_context<L: Loader, W: Handler>(
	base: Option<&Iri>,
	context_value: Option<&json::Value>,
	loader: &L,
	warnings: &mut W,
	options: context::ProcessingOptions,
) -> Result<ActiveContext, Error> {
	let initial = ActiveContext::new(base.map(|b| b.to_owned()));
	match context_value {
		Some(value) => {
			let local = syntax::Context::from_json(value)?;
			context::process_context(&initial, &local, base, loader, warnings, ProcessingStack::new(), options).await
		}
		None => Ok(initial),
	}
}

/// Runs Expansion (spec §4.2; spec §6 `expand`). `expand_context` is a
/// context applied before the document's own, as if it were its outermost
/// `@context` entry.
pub async fn expand<L: Loader, W: Handler>(
	input: &json::Value,
	base: Option<&Iri>,
	expand_context: Option<&json::Value>,
	loader: &L,
	warnings: &mut W,
	options: JsonLdOptions,
) -> Result<ExpandedDocument, Error> {
	let active_context = build_active_context(
		base,
		expand_context,
		loader,
		warnings,
		options.expansion_options().context_options(),
	)
	.await?;
	expansion::expand(input, &active_context, base, loader, warnings, options.expansion_options()).await
}

/// Runs Expansion then Compaction against `context` (spec §4.3; spec §6
/// `compact`).
pub async fn compact<L: Loader, W: Handler>(
	input: &json::Value,
	context_value: Option<&json::Value>,
	base: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: JsonLdOptions,
) -> Result<json::Value, Error> {
	let expanded = expand(input, base, None, loader, warnings, options).await?;
	let active_context = build_active_context(
		base,
		context_value,
		loader,
		warnings,
		options.compaction_options().context_options(),
	)
	.await?;
	compaction::compact(&expanded, &active_context, context_value, loader, warnings, options.compaction_options()).await
}

/// Runs Expansion, Node Map Generation, then (if `context` is given)
/// Compaction over the flattened result (spec §4.4; spec §6 `flatten`).
pub async fn flatten<L: Loader, W: Handler>(
	input: &json::Value,
	context_value: Option<&json::Value>,
	base: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: JsonLdOptions,
) -> Result<json::Value, Error> {
	let expanded = expand(input, base, None, loader, warnings, options).await?;
	let mut generator = BlankIdGenerator::new();
	let flattened = flattening::flatten(&expanded, &mut generator, options.ordered)?;

	match context_value {
		Some(_) => {
			let active_context = build_active_context(
				base,
				context_value,
				loader,
				warnings,
				options.compaction_options().context_options(),
			)
			.await?;
			compaction::compact_flattened(&flattened, &active_context, context_value, loader, warnings, options.compaction_options()).await
		}
		None => Ok(flattened.to_json()),
	}
}

/// Unwraps a single-node `{"@graph": [node]}` compaction result back down
/// to the bare node, per `omit_graph` (spec §6's framing control; the
/// general-purpose alias for `@graph` is assumed unremapped here, matching
/// the overwhelmingly common case of a frame context that doesn't alias it).
fn unwrap_omit_graph(compacted: json::Value, omit_graph: bool) -> json::Value {
	if !omit_graph {
		return compacted;
	}

	let json::Value::Object(obj) = &compacted else {
		return compacted;
	};

	let Some(json::Value::Array(items)) = obj.get(Keyword::Graph.into_str()) else {
		return compacted;
	};

	if items.len() != 1 {
		return compacted;
	}

	let json::Value::Object(node) = items[0].clone() else {
		return compacted;
	};

	let mut result = node;
	if let Some(ctx) = obj.get(Keyword::Context.into_str()) {
		result.insert(Keyword::Context.into_str().to_string(), ctx.clone());
	}
	json::Value::Object(result)
}

/// Runs Expansion, Framing, then Compaction against the frame's own
/// `@context` (spec §4.5; spec §6 `frame`).
pub async fn frame<L: Loader, W: Handler>(
	input: &json::Value,
	frame_value: &json::Value,
	base: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: JsonLdOptions,
) -> Result<json::Value, Error> {
	let expanded = expand(input, base, None, loader, warnings, options).await?;

	let frame_context_value = frame_value
		.as_object()
		.or_else(|| frame_value.as_array().and_then(|a| a.first()).and_then(json::Value::as_object))
		.and_then(|o| o.get(Keyword::Context.into_str()))
		.cloned();

	let active_context = build_active_context(
		base,
		frame_context_value.as_ref(),
		loader,
		warnings,
		options.framing_options().context_options(),
	)
	.await?;

	let mut generator = BlankIdGenerator::new();
	let matched = framing::frame(
		&expanded,
		frame_value,
		&active_context,
		&mut generator,
		loader,
		warnings,
		options.framing_options(),
	)
	.await?;

	let framed_document = ExpandedDocument::from_objects(matched);
	let compacted = compaction::compact(
		&framed_document,
		&active_context,
		frame_context_value.as_ref(),
		loader,
		warnings,
		options.compaction_options(),
	)
	.await?;

	Ok(unwrap_omit_graph(compacted, options.omit_graph))
}

/// Runs Expansion then To-RDF (spec §4.6; spec §6 `to_rdf`).
pub async fn to_rdf<L: Loader, W: Handler>(
	input: &json::Value,
	base: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: JsonLdOptions,
) -> Result<Vec<Quad>, Error> {
	let expanded = expand(input, base, None, loader, warnings, options).await?;
	let mut generator = BlankIdGenerator::new();
	Ok(rdf::to_rdf(&expanded, &mut generator, options.to_rdf_options()))
}

/// Runs From-RDF over a flat quad set (spec §4.6; spec §6 `from_rdf`).
pub fn from_rdf(quads: &[Quad], options: JsonLdOptions) -> ExpandedDocument {
	rdf::from_rdf(quads, options.from_rdf_options())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn expands_a_plain_node() {
		let input = json::parse_str(r#"{"@context": {"name": "http://example.org/name"}, "@id": "http://example.org/a", "name": "Ann"}"#).unwrap();
		let expanded = expand(&input, None, None, &NoLoader, &mut (), JsonLdOptions::default()).await.unwrap();
		assert_eq!(expanded.len(), 1);
	}

	#[tokio::test]
	async fn compacts_back_to_the_same_context() {
		let context = json::parse_str(r#"{"name": "http://example.org/name"}"#).unwrap();
		let input = json::parse_str(r#"{"@context": {"name": "http://example.org/name"}, "@id": "http://example.org/a", "name": "Ann"}"#).unwrap();
		let compacted = compact(&input, Some(&context), None, &NoLoader, &mut (), JsonLdOptions::default()).await.unwrap();
		assert_eq!(compacted.as_object().and_then(|o| o.get("name")).and_then(json::Value::as_str), Some("Ann"));
	}

	#[tokio::test]
	async fn round_trips_through_rdf() {
		let input = json::parse_str(r#"{"@context": {"name": "http://example.org/name"}, "@id": "http://example.org/a", "name": "Ann"}"#).unwrap();
		let quads = to_rdf(&input, None, &NoLoader, &mut (), JsonLdOptions::default()).await.unwrap();
		assert_eq!(quads.len(), 1);
		let back = from_rdf(&quads, JsonLdOptions::default());
		assert_eq!(back.len(), 1);
	}
}

//! Active contexts and the context processing algorithm (spec §4.1).
mod define;
mod inverse;
mod iri;
mod process;
mod registry;
mod stack;

pub use inverse::{InverseContext, LangSelection, Selection, TypeSelection};
pub use iri::{expand_iri, expand_iri_simple};
pub use process::process_context;
pub use registry::{clear_preloaded_contexts, preload_context};
pub use stack::ProcessingStack;

use crate::{syntax, Direction, Id, LenientLangTagBuf, ProcessingMode, Term};
use indexmap::IndexMap;
use iref::IriBuf;
use std::sync::Arc;

/// A processed term definition: the result of the Create Term Definition
/// algorithm (spec §4.1), as opposed to [`syntax::TermDefinition`] which is
/// its unresolved JSON form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermDefinition {
	/// The IRI mapping: `None` only for a `@type` keyword slot.
	pub value: Option<Term>,
	pub prefix: bool,
	pub protected: bool,
	pub reverse_property: bool,
	pub base_url: Option<IriBuf>,
	pub context: Option<Arc<syntax::Context>>,
	pub container: syntax::Container,
	pub direction: Option<crate::Nullable<Direction>>,
	pub index: Option<String>,
	pub language: Option<crate::Nullable<LenientLangTagBuf>>,
	pub nest: Option<String>,
	pub typ: Option<Term>,
}

impl TermDefinition {
	pub fn is_keyword_alias_of(&self, keyword: crate::Keyword) -> bool {
		matches!(&self.value, Some(Term::Keyword(k)) if *k == keyword)
	}
}

/// An active context (spec §4.1 "Context Processing"): the base IRI,
/// `@vocab`, default `@language`/`@direction`, and the set of term
/// definitions currently in scope, linked to the context it was built from
/// so the Inverse Context / "no entry at all for a term" distinctions hold.
#[derive(Clone, Debug)]
pub struct ActiveContext {
	pub original_base_url: Option<IriBuf>,
	pub base_iri: Option<IriBuf>,
	pub vocab: Option<Term>,
	pub default_language: Option<LenientLangTagBuf>,
	pub default_base_direction: Option<Direction>,
	pub previous_context: Option<Box<ActiveContext>>,
	definitions: IndexMap<String, TermDefinition>,
}

impl Default for ActiveContext {
	fn default() -> Self {
		Self {
			original_base_url: None,
			base_iri: None,
			vocab: None,
			default_language: None,
			default_base_direction: None,
			previous_context: None,
			definitions: IndexMap::new(),
		}
	}
}

impl ActiveContext {
	pub fn new(base_iri: Option<IriBuf>) -> Self {
		Self {
			original_base_url: base_iri.clone(),
			base_iri,
			..Self::default()
		}
	}

	pub fn get(&self, term: &str) -> Option<&TermDefinition> {
		self.definitions.get(term)
	}

	pub fn contains_term(&self, term: &str) -> bool {
		self.definitions.contains_key(term)
	}

	pub fn set(&mut self, term: String, definition: Option<TermDefinition>) {
		match definition {
			Some(d) => {
				self.definitions.insert(term, d);
			}
			None => {
				self.definitions.shift_remove(&term);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, String, TermDefinition> {
		self.definitions.iter()
	}

	pub fn has_protected_terms(&self) -> bool {
		self.definitions.values().any(|d| d.protected)
	}

	/// The "previous context" used to revert a `@propagate: false` scoped
	/// context at the end of Expansion/Compaction (spec §4.1, §4.3).
	pub fn previous(&self) -> &ActiveContext {
		self.previous_context.as_deref().unwrap_or(self)
	}
}

/// Options threaded through context processing (spec §4.1's "options"
/// parameter, as opposed to the API-level option set which also covers
/// algorithms outside context processing).
#[derive(Clone, Copy, Debug)]
pub struct ProcessingOptions {
	pub processing_mode: ProcessingMode,
	pub override_protected: bool,
	pub propagate: bool,
}

impl Default for ProcessingOptions {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			override_protected: false,
			propagate: true,
		}
	}
}

impl ProcessingOptions {
	pub fn with_override(self) -> Self {
		Self {
			override_protected: true,
			..self
		}
	}

	pub fn with_no_override(self) -> Self {
		Self {
			override_protected: false,
			..self
		}
	}

	pub fn without_propagation(self) -> Self {
		Self {
			propagate: false,
			..self
		}
	}
}

/// How many remote contexts a single `@context` processing chain may load
/// before failing with `context overflow` (spec §4.1 note on infinite
/// reference loops; the spec leaves the exact bound to implementations).
pub const MAX_REMOTE_CONTEXTS: usize = 50;

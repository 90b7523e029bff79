//! The raw syntax of a `@context` object entry (spec §4.1 context object).
use super::TermDefinition;
use crate::{Direction, LenientLangTagBuf, Nullable};
use indexmap::IndexMap;

/// JSON-LD version pinned by a context's `@version` entry. 1.1 is the only
/// value this processor accepts (spec §4.1 "@version" — any other numeric
/// value is an `invalid @version value` error upstream in the parser).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Version1_1;

/// A context object: `@base`/`@import`/`@language`/`@direction`/
/// `@propagate`/`@protected`/`@type`/`@version`/`@vocab` plus an ordered set
/// of term bindings.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Definition {
	pub base: Option<Nullable<String>>,
	pub import: Option<String>,
	pub language: Option<Nullable<LenientLangTagBuf>>,
	pub direction: Option<Nullable<Direction>>,
	pub propagate: Option<bool>,
	pub protected: Option<bool>,
	/// The context-level `@type` entry: spec §4.1 permits only
	/// `{"@container": "@set"}` here, so this simply records whether the
	/// entry was present.
	pub type_container_set: Option<bool>,
	pub version: Option<Version1_1>,
	pub vocab: Option<Nullable<String>>,
	pub bindings: IndexMap<String, Nullable<TermDefinition>>,
}

impl Definition {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Nullable<TermDefinition>> {
		self.bindings.get(key)
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, String, Nullable<TermDefinition>> {
		self.bindings.iter()
	}
}

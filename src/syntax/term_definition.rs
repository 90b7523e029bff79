//! The raw (unresolved) syntax of a term definition, as it appears inside a
//! `@context` object, before context processing resolves it into an active
//! context entry (spec §4.1 "Create Term Definition").
use super::{Container, Context};
use crate::{Direction, LenientLangTagBuf, Nullable};

/// A term definition entry: either a bare IRI/compact-IRI/keyword string, or
/// a full expanded-term-definition object (spec §3 term definitions).
#[derive(Clone, PartialEq, Debug)]
pub enum TermDefinition {
	Simple(String),
	Expanded(Box<ExpandedTermDefinition>),
}

impl TermDefinition {
	pub fn is_expanded(&self) -> bool {
		matches!(self, Self::Expanded(_))
	}

	pub fn simple(s: impl Into<String>) -> Self {
		Self::Simple(s.into())
	}
}

/// The `@type` value of a term definition: a keyword (`@id`/`@vocab`/`@json`/
/// `@none`) or an arbitrary datatype IRI.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TermType {
	Id,
	Vocab,
	Json,
	None,
	Iri(String),
}

/// A full `{ ... }` term definition (spec §3 "expanded term definition").
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ExpandedTermDefinition {
	pub id: Option<Nullable<String>>,
	pub type_: Option<Nullable<TermType>>,
	pub context: Option<Box<Context>>,
	pub reverse: Option<String>,
	pub index: Option<String>,
	pub language: Option<Nullable<LenientLangTagBuf>>,
	pub direction: Option<Nullable<Direction>>,
	pub container: Option<Nullable<Container>>,
	pub nest: Option<String>,
	pub prefix: Option<bool>,
	pub propagate: Option<bool>,
	pub protected: Option<bool>,
}

impl ExpandedTermDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	/// True if this entry carries nothing but defaults — spec §4.1 treats
	/// `{"@id": null}`-shaped "null" expanded definitions as the
	/// term-undefinition case, same as a bare JSON `null`.
	pub fn is_null(&self) -> bool {
		matches!(&self.id, None | Some(Nullable::Null))
			&& self.type_.is_none()
			&& self.context.is_none()
			&& self.reverse.is_none()
			&& self.index.is_none()
			&& self.language.is_none()
			&& self.direction.is_none()
			&& self.container.is_none()
			&& self.nest.is_none()
			&& self.prefix.is_none()
	}
}

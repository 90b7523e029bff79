use crate::{Id, Keyword};
use std::fmt;

/// The result of expanding a key or a `@vocab`-relative value: a node
/// identifier, a keyword, or `@null` when the active context has no mapping
/// and the value does not otherwise resolve (spec §4.1 "IRI expansion").
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
	Null,
	Id(Id),
	Keyword(Keyword),
}

impl Term {
	pub fn is_null(&self) -> bool {
		matches!(self, Term::Null)
	}

	pub fn is_keyword(&self) -> bool {
		matches!(self, Term::Keyword(_))
	}

	pub fn as_iri(&self) -> Option<&iref::Iri> {
		match self {
			Term::Id(id) => id.as_iri(),
			_ => None,
		}
	}

	pub fn into_iri(self) -> Result<iref::IriBuf, Self> {
		match self {
			Term::Id(Id::Iri(iri)) => Ok(iri),
			term => Err(term),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Term::Id(id) => id.as_str(),
			Term::Keyword(k) => k.into_str(),
			Term::Null => "",
		}
	}
}

impl From<Id> for Term {
	fn from(id: Id) -> Self {
		Term::Id(id)
	}
}

impl From<Keyword> for Term {
	fn from(k: Keyword) -> Self {
		Term::Keyword(k)
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Term::Id(id) => id.fmt(f),
			Term::Keyword(k) => k.fmt(f),
			Term::Null => write!(f, "null"),
		}
	}
}

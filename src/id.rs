//! Node identifiers.
use iref::{Iri, IriBuf};
use rdf_types::BlankIdBuf;
use std::fmt;

/// A node identifier: a valid IRI, a valid blank node identifier, or an
/// invalid reference kept around verbatim (spec §3: "Every non-keyword
/// property key is an absolute IRI or blank node identifier", but `@id`
/// values on values expanded from JSON need not be valid, e.g. during
/// framing where `@id` patterns may be arbitrary strings).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Id {
	Iri(IriBuf),
	Blank(BlankIdBuf),
	Invalid(String),
}

impl Id {
	pub fn from_string(s: String) -> Self {
		match IriBuf::new(s) {
			Ok(iri) => Self::Iri(iri),
			Err(e) => match BlankIdBuf::new(e.0) {
				Ok(blank) => Self::Blank(blank),
				Err(rdf_types::InvalidBlankId(s)) => Self::Invalid(s),
			},
		}
	}

	pub fn is_valid(&self) -> bool {
		!matches!(self, Self::Invalid(_))
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Blank(_))
	}

	pub fn is_iri(&self) -> bool {
		matches!(self, Self::Iri(_))
	}

	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Self::Iri(iri) => Some(iri.as_iri()),
			_ => None,
		}
	}

	pub fn as_blank(&self) -> Option<&BlankIdBuf> {
		match self {
			Self::Blank(b) => Some(b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Iri(iri) => iri.as_str(),
			Self::Blank(b) => b.as_str(),
			Self::Invalid(s) => s.as_str(),
		}
	}

	pub fn into_term(self) -> crate::Term {
		crate::Term::Id(self)
	}
}

impl From<IriBuf> for Id {
	fn from(iri: IriBuf) -> Self {
		Self::Iri(iri)
	}
}

impl From<BlankIdBuf> for Id {
	fn from(b: BlankIdBuf) -> Self {
		Self::Blank(b)
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl PartialEq<str> for Id {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

/// Monotonic blank node identifier allocator (spec §4.4: "generated
/// deterministically by a stateful allocator (prefix `_:b`, monotonically
/// increasing counter)").
#[derive(Clone, Debug, Default)]
pub struct BlankIdGenerator {
	count: usize,
}

impl BlankIdGenerator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn next(&mut self) -> BlankIdBuf {
		let id = BlankIdBuf::from_suffix(&format!("b{}", self.count))
			.expect("generated blank node suffix is always valid");
		self.count += 1;
		id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generator_is_monotonic() {
		let mut gen = BlankIdGenerator::new();
		assert_eq!(gen.next().as_str(), "_:b0");
		assert_eq!(gen.next().as_str(), "_:b1");
	}

	#[test]
	fn classifies_iri_blank_and_invalid() {
		assert!(Id::from_string("http://example.org/x".into()).is_iri());
		assert!(Id::from_string("_:a".into()).is_blank());
		assert!(!Id::from_string("not an iri".into()).is_valid());
	}
}

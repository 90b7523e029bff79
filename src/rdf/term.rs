//! Concrete RDF term model: an IRI, a blank node, or a literal. Subjects,
//! predicates and graph names are represented by [`crate::Id`] directly —
//! this crate has no vocabulary-interning layer to thread through, so
//! there is nothing a generic `Vocabulary` parameter would buy here.
use crate::LenientLangTagBuf;
use iref::IriBuf;
use rdf_types::BlankIdBuf;

/// An RDF literal: a typed literal (lexical form + datatype IRI) or a
/// plain/language-tagged string.
#[derive(Clone, Debug, PartialEq)]
pub enum RdfLiteral {
	Typed { value: String, datatype: IriBuf },
	LangString { value: String, language: Option<LenientLangTagBuf> },
}

/// The object position of a quad (subjects/predicates/graph names are
/// always [`crate::Id`], never literals).
#[derive(Clone, Debug, PartialEq)]
pub enum RdfTerm {
	Iri(IriBuf),
	Blank(BlankIdBuf),
	Literal(RdfLiteral),
}

impl RdfTerm {
	pub fn as_iri(&self) -> Option<&iref::Iri> {
		match self {
			Self::Iri(iri) => Some(iri.as_iri()),
			_ => None,
		}
	}

	pub fn as_literal(&self) -> Option<&RdfLiteral> {
		match self {
			Self::Literal(lit) => Some(lit),
			_ => None,
		}
	}
}

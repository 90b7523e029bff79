//! Non-fatal conditions surfaced while processing a document.
//!
//! These never abort an operation (spec §7 "Propagation": only structural
//! violations, protected-term conflicts, cycles and load failures are hard
//! errors) but are worth logging; callers that want them collected rather
//! than logged can supply their own [`Handler`].
use rdf_types::BlankIdBuf;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Warning {
	#[error("keyword-like term `{0}`")]
	KeywordLikeTerm(String),

	#[error("keyword-like value `{0}`")]
	KeywordLikeValue(String),

	#[error("malformed IRI `{0}`")]
	MalformedIri(String),

	#[error("empty term")]
	EmptyTerm,

	#[error("blank node identifier `{0}` used as a property")]
	BlankNodeIdProperty(BlankIdBuf),

	#[error("malformed language tag `{0}`")]
	MalformedLanguageTag(String),
}

/// Collects or discards [`Warning`]s produced during processing.
pub trait Handler {
	fn handle(&mut self, warning: Warning);
}

impl Handler for () {
	fn handle(&mut self, warning: Warning) {
		log::debug!("{warning}");
	}
}

impl Handler for Vec<Warning> {
	fn handle(&mut self, warning: Warning) {
		self.push(warning);
	}
}

impl<H: Handler + ?Sized> Handler for &mut H {
	fn handle(&mut self, warning: Warning) {
		H::handle(self, warning)
	}
}

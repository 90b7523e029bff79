//! The closed JSON-LD error taxonomy (spec §7).
//!
//! Every error the processor can raise carries one of these codes plus an
//! optional human-readable message naming the offending term/IRI/value.
//! Language bindings can match on [`ErrorCode`] to build their own native
//! error type; this crate itself always returns [`Error`].
use std::fmt;

/// One name per failure class in the JSON-LD error taxonomy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorCode {
	CollidingKeywords,
	ConflictingIndexes,
	CyclicIriMapping,
	InvalidIdValue,
	InvalidIriMapping,
	IriConfusedWithPrefix,
	InvalidLocalContext,
	InvalidRemoteContext,
	InvalidContainerMapping,
	InvalidTypeMapping,
	InvalidTypeValue,
	InvalidLanguageMapping,
	InvalidLanguageTaggedString,
	InvalidLanguageTaggedValue,
	InvalidTypedValue,
	InvalidValueObject,
	InvalidValueObjectValue,
	InvalidReverseProperty,
	InvalidReversePropertyMap,
	InvalidReversePropertyValue,
	InvalidScopedContext,
	InvalidTermDefinition,
	InvalidBaseIri,
	InvalidVocabMapping,
	InvalidDefaultLanguage,
	InvalidBaseDirection,
	InvalidContextNullification,
	InvalidContextEntry,
	InvalidImportValue,
	InvalidNestValue,
	InvalidIndexValue,
	InvalidIncludedValue,
	InvalidSetOrListObject,
	InvalidKeywordAlias,
	InvalidPropagateValue,
	InvalidProtectedValue,
	InvalidEmbedValue,
	InvalidFrame,
	KeywordRedefinition,
	KeyExpansionFailed,
	ContextOverflow,
	LoadingDocumentFailed,
	LoadingRemoteContextFailed,
	MultipleContextLinkHeaders,
	ProtectedTermRedefinition,
	ProcessingModeConflict,
	ListOfLists,
	RecursionLimitExceeded,
}

impl ErrorCode {
	/// The wire-level error name, exactly as it appears in spec §7 and in
	/// the published JSON-LD 1.1 API test suite.
	pub fn as_str(&self) -> &'static str {
		use ErrorCode::*;
		match self {
			CollidingKeywords => "colliding keywords",
			ConflictingIndexes => "conflicting indexes",
			CyclicIriMapping => "cyclic IRI mapping",
			InvalidIdValue => "invalid @id value",
			InvalidIriMapping => "invalid IRI mapping",
			IriConfusedWithPrefix => "IRI confused with prefix",
			InvalidLocalContext => "invalid local context",
			InvalidRemoteContext => "invalid remote context",
			InvalidContainerMapping => "invalid container mapping",
			InvalidTypeMapping => "invalid type mapping",
			InvalidTypeValue => "invalid type value",
			InvalidLanguageMapping => "invalid language mapping",
			InvalidLanguageTaggedString => "invalid language-tagged string",
			InvalidLanguageTaggedValue => "invalid language-tagged value",
			InvalidTypedValue => "invalid typed value",
			InvalidValueObject => "invalid value object",
			InvalidValueObjectValue => "invalid value object value",
			InvalidReverseProperty => "invalid reverse property",
			InvalidReversePropertyMap => "invalid reverse property map",
			InvalidReversePropertyValue => "invalid reverse property value",
			InvalidScopedContext => "invalid scoped context",
			InvalidTermDefinition => "invalid term definition",
			InvalidBaseIri => "invalid base IRI",
			InvalidVocabMapping => "invalid vocab mapping",
			InvalidDefaultLanguage => "invalid default language",
			InvalidBaseDirection => "invalid base direction",
			InvalidContextNullification => "invalid context nullification",
			InvalidContextEntry => "invalid context entry",
			InvalidImportValue => "invalid @import value",
			InvalidNestValue => "invalid @nest value",
			InvalidIndexValue => "invalid @index value",
			InvalidIncludedValue => "invalid @included value",
			InvalidSetOrListObject => "invalid set or list object",
			InvalidKeywordAlias => "invalid keyword alias",
			InvalidPropagateValue => "invalid @propagate value",
			InvalidProtectedValue => "invalid @protected value",
			InvalidEmbedValue => "invalid @embed value",
			InvalidFrame => "invalid frame",
			KeywordRedefinition => "keyword redefinition",
			KeyExpansionFailed => "key expansion failed",
			ContextOverflow => "context overflow",
			LoadingDocumentFailed => "loading document failed",
			LoadingRemoteContextFailed => "loading remote context failed",
			MultipleContextLinkHeaders => "multiple context link headers",
			ProtectedTermRedefinition => "protected term redefinition",
			ProcessingModeConflict => "processing mode conflict",
			ListOfLists => "list of lists",
			RecursionLimitExceeded => "recursion limit exceeded",
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A JSON-LD processing error: a machine-readable [`ErrorCode`] plus an
/// optional human-readable message naming the offending term, IRI or value
/// (spec §7 "User-visible failure").
#[derive(Clone, Debug, thiserror::Error)]
#[error("{code}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
	pub code: ErrorCode,
	pub message: Option<String>,
}

impl Error {
	pub fn new(code: ErrorCode) -> Self {
		Self {
			code,
			message: None,
		}
	}

	pub fn with(code: ErrorCode, message: impl Into<String>) -> Self {
		Self {
			code,
			message: Some(message.into()),
		}
	}

	pub fn code(&self) -> ErrorCode {
		self.code
	}
}

impl From<ErrorCode> for Error {
	fn from(code: ErrorCode) -> Self {
		Self::new(code)
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_includes_message() {
		let e = Error::with(ErrorCode::CyclicIriMapping, "term `a`");
		assert_eq!(e.to_string(), "cyclic IRI mapping: term `a`");
	}

	#[test]
	fn display_without_message() {
		let e = Error::new(ErrorCode::ContextOverflow);
		assert_eq!(e.to_string(), "context overflow");
	}
}

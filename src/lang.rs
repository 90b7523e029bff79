//! Lenient language tags.
//!
//! JSON-LD accepts any string as `@language`, well-formed per [BCP47] or
//! not: malformed tags are preserved verbatim and only rejected by
//! processors that opt into strict validation. We keep both the raw string
//! and a cached well-formedness check, matching how the reference crate's
//! `LenientLangTag` wraps an unchecked string but still exposes
//! [`LangTag`](langtag::LangTag) when parseable.
//!
//! [BCP47]: https://www.rfc-editor.org/info/bcp47
use langtag::LangTag;
use std::fmt;

/// An owned, possibly ill-formed, language tag.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LenientLangTagBuf(String);

impl LenientLangTagBuf {
	pub fn new(s: impl Into<String>) -> Self {
		Self(s.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_well_formed(&self) -> bool {
		LangTag::new(&self.0).is_ok()
	}

	pub fn as_well_formed(&self) -> Option<LangTag<&str>> {
		LangTag::new(&self.0).ok()
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl PartialEq for LenientLangTagBuf {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_ignore_ascii_case(&other.0)
	}
}

impl std::hash::Hash for LenientLangTagBuf {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		for b in self.0.bytes() {
			b.to_ascii_lowercase().hash(state);
		}
	}
}

impl AsRef<str> for LenientLangTagBuf {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for LenientLangTagBuf {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl From<String> for LenientLangTagBuf {
	fn from(s: String) -> Self {
		Self(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn case_insensitive_equality() {
		assert_eq!(
			LenientLangTagBuf::new("en-US"),
			LenientLangTagBuf::new("EN-us")
		);
	}

	#[test]
	fn malformed_tag_is_preserved() {
		let tag = LenientLangTagBuf::new("not a tag!!");
		assert!(!tag.is_well_formed());
		assert_eq!(tag.as_str(), "not a tag!!");
	}
}

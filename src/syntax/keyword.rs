//! JSON-LD keywords.
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug)]
pub struct NotAKeyword<T = String>(pub T);

impl<T: ?Sized + ToOwned> NotAKeyword<&T> {
	pub fn into_owned(self) -> NotAKeyword<T::Owned> {
		NotAKeyword(self.0.to_owned())
	}
}

macro_rules! keyword {
	{
		$(
			$(#[$meta:meta])*
			$ident:ident : $lit:literal
		),* $(,)?
	} => {
		/// JSON-LD keyword.
		///
		/// The set is closed: any `@`-prefixed string not matching one of
		/// these variants is not a keyword and is an error in strict
		/// processing mode.
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
		#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
		pub enum Keyword {
			$(
				$(#[$meta])*
				#[cfg_attr(feature = "serde", serde(rename = $lit))]
				$ident
			),*
		}

		impl Keyword {
			pub fn into_str(self) -> &'static str {
				match self {
					$(
						Self::$ident => $lit
					),*
				}
			}
		}

		impl<'a> TryFrom<&'a str> for Keyword {
			type Error = NotAKeyword<&'a str>;

			fn try_from(input: &'a str) -> Result<Keyword, NotAKeyword<&'a str>> {
				match input {
					$(
						$lit => Ok(Self::$ident),
					)*
					_ => Err(NotAKeyword(input))
				}
			}
		}
	};
}

keyword! {
	/// `@annotation`. JSON-LD-star embedded statement annotation.
	Annotation : "@annotation",

	/// `@base`.
	Base : "@base",

	/// `@container`.
	Container : "@container",

	/// `@context`.
	Context : "@context",

	/// `@default`. Default value for a framing property, or default-graph selector.
	Default : "@default",

	/// `@direction`.
	Direction : "@direction",

	/// `@embed`. Framing embed policy.
	Embed : "@embed",

	/// `@explicit`. Framing explicit-inclusion flag.
	Explicit : "@explicit",

	/// `@first`. Head of an `rdf:List` chain produced by list expansion.
	First : "@first",

	/// `@graph`.
	Graph : "@graph",

	/// `@id`.
	Id : "@id",

	/// `@import`.
	Import : "@import",

	/// `@included`.
	Included : "@included",

	/// `@index`.
	Index : "@index",

	/// `@json`. Datatype marker for JSON literals.
	Json : "@json",

	/// `@language`.
	Language : "@language",

	/// `@list`.
	List : "@list",

	/// `@nest`.
	Nest : "@nest",

	/// `@none`.
	None : "@none",

	/// `@omitDefault`. Framing: suppress synthesized `@default` values.
	OmitDefault : "@omitDefault",

	/// `@prefix`. Marks a term definition usable as a compact-IRI prefix.
	Prefix : "@prefix",

	/// `@propagate`.
	Propagate : "@propagate",

	/// `@protected`.
	Protected : "@protected",

	/// `@preserve`. Internal marker used while flattening to keep indexed values distinct.
	Preserve : "@preserve",

	/// `@requireAll`. Framing: require all frame properties to match (vs. any).
	RequireAll : "@requireAll",

	/// `@reverse`.
	Reverse : "@reverse",

	/// `@set`.
	Set : "@set",

	/// `@type`.
	Type : "@type",

	/// `@value`.
	Value : "@value",

	/// `@version`.
	Version : "@version",

	/// `@vocab`.
	Vocab : "@vocab",
}

impl Keyword {
	pub fn as_str(&self) -> &'static str {
		self.into_str()
	}
}

impl FromStr for Keyword {
	type Err = NotAKeyword;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::try_from(s).map_err(NotAKeyword::into_owned)
	}
}

impl From<Keyword> for &'static str {
	fn from(k: Keyword) -> &'static str {
		k.into_str()
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.into_str().fmt(f)
	}
}

impl PartialEq<str> for Keyword {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

/// Checks whether `s` looks like a keyword slot (`@` followed only by ASCII
/// letters) without actually being one of the reserved [`Keyword`]s.
///
/// JSON-LD 1.1 reserves this whole namespace so that future keywords do not
/// collide with user terms; processors in strict mode must reject it (spec
/// §3 "Keywords").
pub fn is_reserved_keyword_form(s: &str) -> bool {
	s.starts_with('@') && s[1..].chars().all(|c| c.is_ascii_alphabetic()) && s.len() > 1
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_every_keyword() {
		for lit in [
			"@annotation",
			"@base",
			"@container",
			"@context",
			"@default",
			"@direction",
			"@embed",
			"@explicit",
			"@first",
			"@graph",
			"@id",
			"@import",
			"@included",
			"@index",
			"@json",
			"@language",
			"@list",
			"@nest",
			"@none",
			"@omitDefault",
			"@prefix",
			"@propagate",
			"@protected",
			"@preserve",
			"@requireAll",
			"@reverse",
			"@set",
			"@type",
			"@value",
			"@version",
			"@vocab",
		] {
			let kw = Keyword::try_from(lit).unwrap();
			assert_eq!(kw.into_str(), lit);
		}
	}

	#[test]
	fn rejects_unknown_at_keyword() {
		assert!(Keyword::try_from("@foo").is_err());
		assert!(is_reserved_keyword_form("@foo"));
		assert!(!is_reserved_keyword_form("foo"));
		assert!(!is_reserved_keyword_form("@3foo"));
	}
}

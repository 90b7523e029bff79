//! `application/ld+json` media type and `profile` parameter handling
//! (https://www.w3.org/TR/json-ld11/#iana-considerations).
use iref::{Iri, IriBuf};
use std::fmt;

/// The standard `profile` parameter values defined for `application/ld+json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardProfile {
	Expanded,
	Compacted,
	Context,
	Flattened,
	Framed,
}

impl StandardProfile {
	pub fn from_iri(iri: &Iri) -> Option<Self> {
		match iri.as_str() {
			"http://www.w3.org/ns/json-ld#expanded" => Some(Self::Expanded),
			"http://www.w3.org/ns/json-ld#compacted" => Some(Self::Compacted),
			"http://www.w3.org/ns/json-ld#context" => Some(Self::Context),
			"http://www.w3.org/ns/json-ld#flattened" => Some(Self::Flattened),
			"http://www.w3.org/ns/json-ld#framed" => Some(Self::Framed),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Expanded => "http://www.w3.org/ns/json-ld#expanded",
			Self::Compacted => "http://www.w3.org/ns/json-ld#compacted",
			Self::Context => "http://www.w3.org/ns/json-ld#context",
			Self::Flattened => "http://www.w3.org/ns/json-ld#flattened",
			Self::Framed => "http://www.w3.org/ns/json-ld#framed",
		}
	}
}

/// A single `profile` parameter value: one of the [`StandardProfile`]s, or
/// an arbitrary IRI a server or document declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Profile {
	Standard(StandardProfile),
	Custom(IriBuf),
}

impl Profile {
	pub fn new(iri: &Iri) -> Self {
		match StandardProfile::from_iri(iri) {
			Some(p) => Self::Standard(p),
			None => Self::Custom(iri.to_owned()),
		}
	}

	pub fn iri(&self) -> &Iri {
		match self {
			Self::Standard(s) => Iri::new(s.as_str()).expect("standard profile iri is always valid"),
			Self::Custom(c) => c,
		}
	}
}

impl fmt::Display for Profile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.iri())
	}
}

/// Parses the `profile` parameter of an `application/ld+json` media type
/// (a space-separated list of IRIs) into individual [`Profile`] values.
pub fn parse_profile_parameter(value: &str) -> Vec<Profile> {
	value
		.split_whitespace()
		.filter_map(|s| Iri::new(s).ok().map(Profile::new))
		.collect()
}

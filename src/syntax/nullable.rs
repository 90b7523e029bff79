//! `Nullable<T>`: a context entry that is either absent, explicitly `null`,
//! or a value — JSON-LD 1.1 context syntax gives `null` a distinct meaning
//! from "not present" in several places (`@base`, `@language`, `@type`,
//! `@vocab`, `@container`, and a term definition's `@id`/`@type`).
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Nullable<T> {
	Null,
	Some(T),
}

impl<T> Nullable<T> {
	pub fn as_ref(&self) -> Nullable<&T> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(t),
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(f(t)),
		}
	}

	pub fn into_option(self) -> Option<T> {
		match self {
			Self::Null => None,
			Self::Some(t) => Some(t),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl<T: fmt::Display> fmt::Display for Nullable<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Null => write!(f, "null"),
			Self::Some(t) => t.fmt(f),
		}
	}
}

impl<T> From<T> for Nullable<T> {
	fn from(t: T) -> Self {
		Self::Some(t)
	}
}

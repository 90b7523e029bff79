//! Value objects.
use crate::{json, Direction, Id, LenientLangTagBuf};

/// The datatype of a [`Literal`] value, or the `@json` marker.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ValueType {
	Json,
	Id(Id),
}

/// A typed literal's lexical payload: the literal JSON scalar carried by a
/// value object that is neither a language string nor a JSON literal (spec
/// §3 "Value object").
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
	Null,
	Boolean(bool),
	Number(json::Number),
	String(String),
}

impl Literal {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<&json::Number> {
		match self {
			Self::Number(n) => Some(n),
			_ => None,
		}
	}

	pub fn into_json(self) -> json::Value {
		match self {
			Self::Null => json::Value::Null,
			Self::Boolean(b) => json::Value::Boolean(b),
			Self::Number(n) => json::Value::Number(n),
			Self::String(s) => json::Value::String(s),
		}
	}
}

/// A directional language-tagged string (spec §3 value object with
/// `@language` + optional `@direction`).
#[derive(Clone, PartialEq, Debug)]
pub struct LangString {
	data: String,
	language: Option<LenientLangTagBuf>,
	direction: Option<Direction>,
}

/// Raised attempting to build a [`LangString`] without a language or
/// direction — a plain string has no business being one.
#[derive(Clone, Copy, Debug)]
pub struct InvalidLangString;

impl LangString {
	pub fn new(
		data: String,
		language: Option<LenientLangTagBuf>,
		direction: Option<Direction>,
	) -> Result<Self, String> {
		if language.is_some() || direction.is_some() {
			Ok(Self {
				data,
				language,
				direction,
			})
		} else {
			Err(data)
		}
	}

	pub fn as_str(&self) -> &str {
		&self.data
	}

	pub fn language(&self) -> Option<&LenientLangTagBuf> {
		self.language.as_ref()
	}

	pub fn direction(&self) -> Option<Direction> {
		self.direction
	}
}

/// A value object: either a typed literal, a language-tagged string, or a
/// JSON literal (spec §3 "Value object"; invariant: never both a type and a
/// language).
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
	Literal(Literal, Option<Id>),
	LangString(LangString),
	Json(json::Value),
}

impl Value {
	pub fn null() -> Self {
		Self::Literal(Literal::Null, None)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Literal(lit, _) => lit.as_str(),
			Self::LangString(s) => Some(s.as_str()),
			Self::Json(_) => None,
		}
	}

	pub fn literal_type(&self) -> Option<&Id> {
		match self {
			Self::Literal(_, ty) => ty.as_ref(),
			_ => None,
		}
	}

	pub fn typ(&self) -> Option<ValueType> {
		match self {
			Self::Literal(_, Some(ty)) => Some(ValueType::Id(ty.clone())),
			Self::Json(_) => Some(ValueType::Json),
			_ => None,
		}
	}

	pub fn language(&self) -> Option<&LenientLangTagBuf> {
		match self {
			Self::LangString(s) => s.language(),
			_ => None,
		}
	}

	pub fn direction(&self) -> Option<Direction> {
		match self {
			Self::LangString(s) => s.direction(),
			_ => None,
		}
	}

	pub fn is_json(&self) -> bool {
		matches!(self, Self::Json(_))
	}
}

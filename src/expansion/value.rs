//! `@value`-object expansion (spec §4.2 "value object expansion").
use crate::error::{Error, ErrorCode};
use crate::json;
use crate::object::{IndexedObject, Literal, Object, Value};
use crate::warning::{Handler, Warning};
use crate::{Direction, Id, Indexed, Keyword, LenientLangTagBuf, Term};

/// One already-key-expanded entry of the object being processed, threaded
/// through so node/value expansion only expands each key once.
pub(crate) struct ExpandedEntry<'a> {
	pub key: &'a str,
	pub expanded_key: Term,
	pub value: &'a json::Value,
}

/// Expands a value object's entries (spec §4.2 step "If result has an
/// `@value` entry"). Returns `None` when the value object is dropped (a
/// null literal with no language/direction/type).
pub(crate) fn expand_value_object(
	entries: &[ExpandedEntry<'_>],
	value_entry: &json::Value,
	warnings: &mut impl Handler,
) -> Result<Option<IndexedObject>, Error> {
	let mut language: Option<String> = None;
	let mut direction: Option<Direction> = None;
	let mut index: Option<String> = None;
	let mut is_json = false;
	let mut datatype: Option<Id> = None;

	for entry in entries {
		match &entry.expanded_key {
			Term::Keyword(Keyword::Language) => {
				language = Some(
					entry
						.value
						.as_str()
						.ok_or_else(|| Error::new(ErrorCode::InvalidLanguageTaggedString))?
						.to_string(),
				);
			}
			Term::Keyword(Keyword::Direction) => {
				let s = entry
					.value
					.as_str()
					.ok_or_else(|| Error::new(ErrorCode::InvalidBaseDirection))?;
				direction = Some(Direction::try_from(s).map_err(|_| Error::new(ErrorCode::InvalidBaseDirection))?);
			}
			Term::Keyword(Keyword::Index) => {
				index = Some(
					entry
						.value
						.as_str()
						.ok_or_else(|| Error::new(ErrorCode::InvalidIndexValue))?
						.to_string(),
				);
			}
			Term::Keyword(Keyword::Type) => {
				let s = entry
					.value
					.as_str()
					.ok_or_else(|| Error::new(ErrorCode::InvalidTypedValue))?;
				if s == "@json" {
					is_json = true;
				} else {
					match Id::from_string(s.to_string()) {
						Id::Iri(iri) => datatype = Some(Id::Iri(iri)),
						_ => return Err(Error::new(ErrorCode::InvalidTypedValue)),
					}
				}
			}
			Term::Keyword(Keyword::Value) => {}
			_ => return Err(Error::new(ErrorCode::InvalidValueObject)),
		}
	}

	if is_json {
		if language.is_some() || direction.is_some() {
			return Err(Error::new(ErrorCode::InvalidValueObject));
		}
		return Ok(Some(Indexed::new(
			Object::Value(Value::Json(value_entry.clone())),
			index,
		)));
	}

	let literal = match value_entry {
		json::Value::Null => Literal::Null,
		json::Value::Boolean(b) => Literal::Boolean(*b),
		json::Value::Number(n) => Literal::Number(n.clone()),
		json::Value::String(s) => Literal::String(s.clone()),
		json::Value::Array(_) | json::Value::Object(_) => {
			return Err(Error::new(ErrorCode::InvalidValueObjectValue))
		}
	};

	if matches!(literal, Literal::Null) {
		return Ok(None);
	}

	if language.is_some() || direction.is_some() {
		if datatype.is_some() {
			return Err(Error::new(ErrorCode::InvalidValueObject));
		}
		let Literal::String(s) = literal else {
			return Err(Error::new(ErrorCode::InvalidLanguageTaggedValue));
		};
		let tag = language.map(LenientLangTagBuf::new);
		if let Some(tag) = &tag {
			if !tag.is_well_formed() {
				warnings.handle(Warning::MalformedLanguageTag(tag.as_str().to_string()));
			}
		}
		let lang_string = crate::object::LangString::new(s, tag, direction)
			.map_err(|_| Error::new(ErrorCode::InvalidLanguageTaggedValue))?;
		return Ok(Some(Indexed::new(Object::Value(Value::LangString(lang_string)), index)));
	}

	Ok(Some(Indexed::new(Object::Value(Value::Literal(literal, datatype)), index)))
}

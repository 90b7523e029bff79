//! Parses a raw [`json::Value`] into the `@context` syntax tree (spec §4.1
//! context object grammar).
use super::{
	Container, ContainerKind, Context, ContextEntry, Definition, ExpandedTermDefinition,
	TermDefinition, TermType, Version1_1,
};
use crate::{
	error::{Error, ErrorCode},
	json, Direction, Keyword, LenientLangTagBuf, Nullable,
};

type Result<T> = std::result::Result<T, Error>;

impl Context {
	pub fn from_json(value: &json::Value) -> Result<Self> {
		match value {
			json::Value::Array(items) => Ok(Self::Many(
				items
					.iter()
					.map(ContextEntry::from_json)
					.collect::<Result<_>>()?,
			)),
			other => Ok(Self::One(ContextEntry::from_json(other)?)),
		}
	}
}

impl ContextEntry {
	pub fn from_json(value: &json::Value) -> Result<Self> {
		match value {
			json::Value::Null => Ok(Self::Null),
			json::Value::String(s) => Ok(Self::IriRef(s.clone())),
			json::Value::Object(_) => Ok(Self::Definition(Definition::from_json(value)?)),
			_ => Err(Error::with(
				ErrorCode::InvalidLocalContext,
				"a context entry must be null, a string, or an object",
			)),
		}
	}
}

fn as_str<'a>(value: &'a json::Value, code: ErrorCode) -> Result<&'a str> {
	value
		.as_str()
		.ok_or_else(|| Error::with(code, "expected a string"))
}

fn as_bool(value: &json::Value, code: ErrorCode) -> Result<bool> {
	value
		.as_bool()
		.ok_or_else(|| Error::with(code, "expected a boolean"))
}

impl Definition {
	pub fn from_json(value: &json::Value) -> Result<Self> {
		let object = value
			.as_object()
			.ok_or_else(|| Error::with(ErrorCode::InvalidLocalContext, "expected an object"))?;
		let mut def = Self::new();
		for (key, value) in object {
			match Keyword::try_from(key.as_str()) {
				Ok(Keyword::Base) => {
					def.base = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(as_str(v, ErrorCode::InvalidBaseIri)?.to_string()),
					})
				}
				Ok(Keyword::Import) => {
					def.import = Some(as_str(value, ErrorCode::InvalidImportValue)?.to_string())
				}
				Ok(Keyword::Language) => {
					def.language = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(LenientLangTagBuf::from(
							as_str(v, ErrorCode::InvalidDefaultLanguage)?.to_string(),
						)),
					})
				}
				Ok(Keyword::Direction) => def.direction = Some(parse_nullable_direction(value)?),
				Ok(Keyword::Propagate) => {
					def.propagate = Some(as_bool(value, ErrorCode::InvalidPropagateValue)?)
				}
				Ok(Keyword::Protected) => {
					def.protected = Some(as_bool(value, ErrorCode::InvalidProtectedValue)?)
				}
				Ok(Keyword::Version) => {
					let n = value
						.as_str()
						.map(|s| s.to_string())
						.or_else(|| match value {
							json::Value::Number(n) => Some(n.as_str().to_string()),
							_ => None,
						})
						.ok_or_else(|| {
							Error::with(ErrorCode::InvalidContextEntry, "invalid @version value")
						})?;
					if n != "1.1" {
						return Err(Error::with(
							ErrorCode::InvalidContextEntry,
							"invalid @version value",
						));
					}
					def.version = Some(Version1_1);
				}
				Ok(Keyword::Vocab) => {
					def.vocab = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(as_str(v, ErrorCode::InvalidVocabMapping)?.to_string()),
					})
				}
				Ok(Keyword::Type) => {
					let o = value
						.as_object()
						.ok_or_else(|| Error::with(ErrorCode::InvalidContextEntry, "invalid @type entry"))?;
					let is_set = o
						.get("@container")
						.and_then(json::Value::as_str)
						.map(|s| s == "@set")
						.unwrap_or(false);
					if !is_set || o.len() != 1 {
						return Err(Error::with(
							ErrorCode::InvalidContextEntry,
							"the only valid context @type value is {\"@container\": \"@set\"}",
						));
					}
					def.type_container_set = Some(true);
				}
				Ok(_) => {
					return Err(Error::with(
						ErrorCode::InvalidContextEntry,
						format!("`{key}` is not a valid context entry"),
					))
				}
				Err(_) => {
					if def.bindings.contains_key(key) {
						return Err(Error::new(ErrorCode::CollidingKeywords));
					}
					let binding = match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(TermDefinition::from_json(v)?),
					};
					def.bindings.insert(key.clone(), binding);
				}
			}
		}
		Ok(def)
	}
}

fn parse_nullable_direction(value: &json::Value) -> Result<Nullable<Direction>> {
	match value {
		json::Value::Null => Ok(Nullable::Null),
		json::Value::String(s) => Direction::try_from(s.as_str())
			.map(Nullable::Some)
			.map_err(|_| Error::new(ErrorCode::InvalidBaseDirection)),
		_ => Err(Error::new(ErrorCode::InvalidBaseDirection)),
	}
}

impl TermDefinition {
	pub fn from_json(value: &json::Value) -> Result<Self> {
		match value {
			json::Value::String(s) => Ok(Self::Simple(s.clone())),
			json::Value::Object(_) => Ok(Self::Expanded(Box::new(
				ExpandedTermDefinition::from_json(value)?,
			))),
			_ => Err(Error::new(ErrorCode::InvalidTermDefinition)),
		}
	}
}

impl ExpandedTermDefinition {
	pub fn from_json(value: &json::Value) -> Result<Self> {
		let object = value
			.as_object()
			.ok_or_else(|| Error::new(ErrorCode::InvalidTermDefinition))?;
		let mut def = Self::new();
		for (key, value) in object {
			match Keyword::try_from(key.as_str()) {
				Ok(Keyword::Id) => {
					def.id = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(as_str(v, ErrorCode::InvalidIriMapping)?.to_string()),
					})
				}
				Ok(Keyword::Type) => def.type_ = Some(parse_nullable_term_type(value)?),
				Ok(Keyword::Context) => {
					def.context = Some(Box::new(Context::from_json(value)?))
				}
				Ok(Keyword::Reverse) => {
					def.reverse = Some(as_str(value, ErrorCode::InvalidReverseProperty)?.to_string())
				}
				Ok(Keyword::Index) => {
					def.index = Some(as_str(value, ErrorCode::InvalidIndexValue)?.to_string())
				}
				Ok(Keyword::Language) => {
					def.language = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(LenientLangTagBuf::from(
							as_str(v, ErrorCode::InvalidLanguageMapping)?.to_string(),
						)),
					})
				}
				Ok(Keyword::Direction) => def.direction = Some(parse_nullable_direction(value)?),
				Ok(Keyword::Container) => {
					def.container = Some(match value {
						json::Value::Null => Nullable::Null,
						v => Nullable::Some(parse_container(v)?),
					})
				}
				Ok(Keyword::Nest) => {
					let s = as_str(value, ErrorCode::InvalidNestValue)?;
					if Keyword::try_from(s).is_ok() && s != "@nest" {
						return Err(Error::new(ErrorCode::InvalidNestValue));
					}
					def.nest = Some(s.to_string());
				}
				Ok(Keyword::Prefix) => {
					def.prefix = Some(as_bool(value, ErrorCode::InvalidTermDefinition)?)
				}
				Ok(Keyword::Propagate) => {
					def.propagate = Some(as_bool(value, ErrorCode::InvalidTermDefinition)?)
				}
				Ok(Keyword::Protected) => {
					def.protected = Some(as_bool(value, ErrorCode::InvalidProtectedValue)?)
				}
				_ => return Err(Error::new(ErrorCode::InvalidTermDefinition)),
			}
		}
		Ok(def)
	}
}

fn parse_nullable_term_type(value: &json::Value) -> Result<Nullable<TermType>> {
	match value {
		json::Value::Null => Ok(Nullable::Null),
		json::Value::String(s) => Ok(Nullable::Some(match s.as_str() {
			"@id" => TermType::Id,
			"@vocab" => TermType::Vocab,
			"@json" => TermType::Json,
			"@none" => TermType::None,
			other if other.starts_with('@') => {
				return Err(Error::new(ErrorCode::InvalidTypeMapping))
			}
			other => TermType::Iri(other.to_string()),
		})),
		_ => Err(Error::new(ErrorCode::InvalidTypeMapping)),
	}
}

fn parse_container(value: &json::Value) -> Result<Container> {
	let kinds: Vec<ContainerKind> = match value {
		json::Value::String(s) => vec![ContainerKind::try_from(s.as_str())
			.map_err(|_| Error::new(ErrorCode::InvalidContainerMapping))?],
		json::Value::Array(items) => items
			.iter()
			.map(|v| {
				as_str(v, ErrorCode::InvalidContainerMapping).and_then(|s| {
					ContainerKind::try_from(s)
						.map_err(|_| Error::new(ErrorCode::InvalidContainerMapping))
				})
			})
			.collect::<Result<_>>()?,
		_ => return Err(Error::new(ErrorCode::InvalidContainerMapping)),
	};
	Container::validate(kinds).map_err(|_| Error::new(ErrorCode::InvalidContainerMapping))
}

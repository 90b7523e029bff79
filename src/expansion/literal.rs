//! Value Expansion (spec §4.2 "value expansion"): turns a JSON scalar
//! attached to a property into a value object or node reference, driven by
//! that property's type/language/direction mapping.
use super::Options;
use crate::context::{ActiveContext, TermDefinition};
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, Literal, Node, Object, Value};
use crate::warning::{Handler, Warning};
use crate::{Direction, Indexed, LenientLangTagBuf, Nullable, Term};

fn resolved_language(
	active_context: &ActiveContext,
	def: Option<&TermDefinition>,
) -> Option<LenientLangTagBuf> {
	match def.and_then(|d| d.language.as_ref()) {
		Some(Nullable::Null) => None,
		Some(Nullable::Some(tag)) => Some(tag.clone()),
		None => active_context.default_language.clone(),
	}
}

fn resolved_direction(active_context: &ActiveContext, def: Option<&TermDefinition>) -> Option<Direction> {
	match def.and_then(|d| d.direction.as_ref()) {
		Some(Nullable::Null) => None,
		Some(Nullable::Some(dir)) => Some(*dir),
		None => active_context.default_base_direction,
	}
}

/// Expands a scalar `value` attached to `active_property` (spec §4.2 value
/// expansion). `active_property_definition` is the term definition of the
/// property the value is attached to, if any.
pub(crate) async fn expand_literal<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	active_property_definition: Option<&TermDefinition>,
	value: &json::Value,
	loader: &L,
	warnings: &mut W,
	options: Options,
) -> Result<IndexedObject, Error> {
	let type_mapping = active_property_definition.and_then(|d| d.typ.clone());

	if let Some(Term::Keyword(crate::Keyword::Id)) = &type_mapping {
		if let Some(s) = value.as_str() {
			let id = super::term_to_id(
				crate::context::expand_iri_simple(
					active_context,
					Some(s),
					true,
					false,
					loader,
					warnings,
					options.context_options(),
				)
				.await?,
			);
			let node = id.map(Node::with_id).unwrap_or_default();
			return Ok(Indexed::new(Object::Node(node), None));
		}
	}

	if let Some(Term::Keyword(crate::Keyword::Vocab)) = &type_mapping {
		if let Some(s) = value.as_str() {
			let id = super::term_to_id(
				crate::context::expand_iri_simple(
					active_context,
					Some(s),
					true,
					true,
					loader,
					warnings,
					options.context_options(),
				)
				.await?,
			);
			let node = id.map(Node::with_id).unwrap_or_default();
			return Ok(Indexed::new(Object::Node(node), None));
		}
	}

	let literal = match value {
		json::Value::Null => Literal::Null,
		json::Value::Boolean(b) => Literal::Boolean(*b),
		json::Value::Number(n) => Literal::Number(n.clone()),
		json::Value::String(s) => Literal::String(s.clone()),
		json::Value::Array(_) | json::Value::Object(_) => unreachable!("scalar value expected"),
	};

	let explicit_datatype = match &type_mapping {
		Some(Term::Keyword(crate::Keyword::Id))
		| Some(Term::Keyword(crate::Keyword::Vocab))
		| Some(Term::Keyword(crate::Keyword::None))
		| None => None,
		Some(Term::Id(id)) => Some(id.clone()),
		Some(Term::Keyword(_)) | Some(Term::Null) => None,
	};

	if explicit_datatype.is_none() {
		if let Literal::String(s) = &literal {
			let language = resolved_language(active_context, active_property_definition);
			let direction = resolved_direction(active_context, active_property_definition);

			if let Some(tag) = &language {
				if !tag.is_well_formed() {
					warnings.handle(Warning::MalformedLanguageTag(tag.as_str().to_string()));
				}
			}

			return match crate::object::LangString::new(s.clone(), language, direction) {
				Ok(lang_string) => Ok(Indexed::new(Object::Value(Value::LangString(lang_string)), None)),
				Err(plain) => Ok(Indexed::new(
					Object::Value(Value::Literal(Literal::String(plain), None)),
					None,
				)),
			};
		}
	}

	Ok(Indexed::new(
		Object::Value(Value::Literal(literal, explicit_datatype)),
		None,
	))
}

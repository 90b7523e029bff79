//! Value Compaction (spec §4.3 "Value Compaction Algorithm"): collapses a
//! value object back to a bare JSON scalar when the active property's
//! language/direction/type mapping already accounts for it, otherwise
//! rebuilds the `{"@value": ..., "@type"/"@language"/"@direction": ...}`
//! object using compacted keys.
use super::{compact_iri, Compactor};
use crate::context::InverseContext;
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::{Literal, Value};
use crate::syntax::ContainerKind;
use crate::warning::Handler;
use crate::{Keyword, Term};
use std::borrow::Cow;

fn compact_key(
	active_context: &crate::context::ActiveContext,
	inverse_context: &InverseContext,
	options: super::CompactionOptions,
	keyword: Keyword,
) -> Option<String> {
	compact_iri(active_context, inverse_context, &Term::Keyword(keyword), true, false, options).ok().flatten()
}

pub(crate) async fn compact_indexed_value_with<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &InverseContext,
	value: &Value,
	index: Option<&str>,
	loader: &L,
	warnings: &mut W,
) -> Result<json::Value, Error> {
	let mut active_context: Cow<crate::context::ActiveContext> = Cow::Borrowed(compactor.active_context);
	if let Some(active_property) = compactor.active_property {
		if let Some(def) = active_context.get(active_property) {
			if let Some(local) = &def.context {
				active_context = Cow::Owned(
					crate::context::process_context(
						active_context.as_ref(),
						local.as_ref(),
						def.base_url.as_deref(),
						loader,
						warnings,
						crate::context::ProcessingStack::new(),
						compactor.options.context_options().with_override(),
					)
					.await?,
				);
			}
		}
	}

	let active_property_definition = compactor.active_property.and_then(|p| active_context.get(p));

	let language = match active_property_definition.and_then(|def| def.language.as_ref()) {
		Some(crate::Nullable::Some(lang)) => Some(lang.clone()),
		Some(crate::Nullable::Null) => None,
		None => active_context.default_language.clone(),
	};

	let direction = match active_property_definition.and_then(|def| def.direction) {
		Some(crate::Nullable::Some(dir)) => Some(dir),
		Some(crate::Nullable::Null) => None,
		None => active_context.default_base_direction,
	};

	let type_mapping = active_property_definition.and_then(|def| def.typ.clone());

	let container_mapping = active_property_definition.map(|def| &def.container);
	let remove_index =
		(index.is_some() && container_mapping.is_some_and(|c| c.contains(ContainerKind::Index))) || index.is_none();

	let mut result = json::Object::new();

	let compacted = match value {
		Value::Literal(lit, ty) => {
			let ty_term = ty.clone().map(Term::Id);
			if ty_term == type_mapping && remove_index {
				match lit {
					Literal::Null => Some(json::Value::Null),
					Literal::Boolean(b) => Some(json::Value::Boolean(*b)),
					Literal::Number(n) => Some(json::Value::Number(n.clone())),
					Literal::String(s) => {
						if ty.is_some() || (language.is_none() && direction.is_none()) {
							Some(json::Value::String(s.clone()))
						} else {
							let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Value);
							result.insert(key.unwrap(), json::Value::String(s.clone()));
							None
						}
					}
				}
			} else {
				let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Value);
				result.insert(key.unwrap(), lit.clone().into_json());

				if let Some(ty) = ty {
					let type_key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Type);
					let compact_ty = compact_iri(
						active_context.as_ref(),
						inverse_context,
						&Term::Id(ty.clone()),
						true,
						false,
						compactor.options,
					)?;
					result.insert(
						type_key.unwrap(),
						compact_ty.map(json::Value::String).unwrap_or(json::Value::Null),
					);
				}
				None
			}
		}
		Value::LangString(ls) => {
			let ls_language = ls.language();
			let ls_direction = ls.direction();

			if remove_index
				&& (ls_language.is_none() || language.as_ref() == ls_language)
				&& (ls_direction.is_none() || direction == ls_direction)
			{
				Some(json::Value::String(ls.as_str().to_string()))
			} else {
				let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Value);
				result.insert(key.unwrap(), json::Value::String(ls.as_str().to_string()));

				if let Some(lang) = ls.language() {
					let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Language);
					result.insert(key.unwrap(), json::Value::String(lang.as_str().to_string()));
				}

				if let Some(dir) = ls.direction() {
					let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Direction);
					result.insert(key.unwrap(), json::Value::String(dir.to_string()));
				}
				None
			}
		}
		Value::Json(json_value) => {
			if type_mapping == Some(Term::Keyword(Keyword::Json)) && remove_index {
				Some(json_value.clone())
			} else {
				let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Value);
				result.insert(key.unwrap(), json_value.clone());

				let type_key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Type);
				let compact_ty =
					compact_iri(active_context.as_ref(), inverse_context, &Term::Keyword(Keyword::Json), true, false, compactor.options)?;
				result.insert(
					type_key.unwrap(),
					compact_ty.map(json::Value::String).unwrap_or(json::Value::Null),
				);
				None
			}
		}
	};

	if let Some(scalar) = compacted {
		return Ok(scalar);
	}

	if !remove_index {
		if let Some(index) = index {
			let key = compact_key(active_context.as_ref(), inverse_context, compactor.options, Keyword::Index);
			result.insert(key.unwrap(), json::Value::String(index.to_string()));
		}
	}

	Ok(json::Value::Object(result))
}

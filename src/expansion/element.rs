//! Element dispatch (spec §4.2): the central recursive entry point. Decides
//! whether a JSON value is null, an array, an object or a scalar, threads
//! property-scoped / `@context`-entry / type-scoped context resolution for
//! objects, and hands off to value/node/list expansion.
use std::borrow::Cow;

use super::value::ExpandedEntry;
use super::{as_array, expand_node, expand_value_object, ActiveProperty, Expanded, Options};
use crate::context::ActiveContext;
use crate::error::{Error, ErrorCode};
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, List, Object};
use crate::syntax::ContainerKind;
use crate::warning::Handler;
use crate::{Indexed, Keyword, Term};
use iref::Iri;

/// Expands one JSON value. `from_map` marks elements reached through an
/// `@index`/`@id`/`@type`/`@graph` container map value, which skip the
/// free-floating-scalar drop that otherwise applies at a null/`@graph`
/// active property (spec §4.2 "from map").
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_element<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	active_property: ActiveProperty<'_>,
	element: &json::Value,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	from_map: bool,
) -> Result<Expanded, Error> {
	match element {
		json::Value::Null => Ok(Expanded::Null),

		json::Value::Array(items) => {
			expand_array(active_context, active_property, items, base_url, loader, warnings, options).await
		}

		json::Value::Object(object) => {
			Box::pin(expand_object(
				active_context,
				active_property,
				object,
				base_url,
				loader,
				warnings,
				options,
				from_map,
			))
			.await
		}

		scalar => {
			if active_property.is_none() || active_property.as_str() == Some("@graph") {
				return Ok(Expanded::Null);
			}

			let active_property_definition = active_property.definition(active_context);

			let scoped: Cow<ActiveContext> = match active_property_definition.as_ref().and_then(|d| d.context.clone())
			{
				Some(local) => Cow::Owned(
					crate::context::process_context(
						active_context,
						local.as_ref(),
						active_property_definition
							.as_ref()
							.and_then(|d| d.base_url.as_deref())
							.or(base_url),
						loader,
						warnings,
						crate::context::ProcessingStack::new(),
						options.context_options().with_override(),
					)
					.await?,
				),
				None => Cow::Borrowed(active_context),
			};

			let indexed = super::expand_literal(
				scoped.as_ref(),
				active_property_definition.as_ref(),
				scalar,
				loader,
				warnings,
				options,
			)
			.await?;

			Ok(Expanded::Object(indexed))
		}
	}
}

async fn expand_array<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	active_property: ActiveProperty<'_>,
	items: &[json::Value],
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
) -> Result<Expanded, Error> {
	let in_list = active_property
		.definition(active_context)
		.map(|d| d.container.contains(ContainerKind::List))
		.unwrap_or(false);

	let mut result = Vec::new();
	for item in items {
		let expanded = Box::pin(expand_element(
			active_context,
			active_property,
			item,
			base_url,
			loader,
			warnings,
			options,
			false,
		))
		.await?;
		if in_list && expanded.is_list() {
			return Err(Error::new(ErrorCode::ListOfLists));
		}
		result.extend(expanded.into_vec());
	}
	Ok(Expanded::Array(result))
}

#[allow(clippy::too_many_arguments)]
async fn expand_object<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	active_property: ActiveProperty<'_>,
	object: &json::Object,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	from_map: bool,
) -> Result<Expanded, Error> {
	// Preliminary scan: an element with a `@value` entry, or consisting of
	// a single `@id` entry, keeps the active context as-is rather than
	// reverting a `@propagate: false` scoped context (spec §4.2).
	let mut has_value_entry = false;
	let mut lone_id_entry = object.len() == 1;
	for (key, _) in object.iter() {
		let expanded = crate::context::expand_iri_simple(
			active_context,
			Some(key),
			false,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;
		match expanded {
			Term::Keyword(Keyword::Value) => has_value_entry = true,
			Term::Keyword(Keyword::Id) => {}
			_ => lone_id_entry = false,
		}
	}

	let mut active_context: Cow<ActiveContext> =
		if !from_map && active_context.previous_context.is_some() && !has_value_entry && !lone_id_entry {
			Cow::Owned(active_context.previous().clone())
		} else {
			Cow::Borrowed(active_context)
		};

	// Property-scoped context (spec §4.2 step applying the active
	// property's own local context before anything else).
	let active_property_definition = active_property.definition(active_context.as_ref());
	if let Some(local) = active_property_definition.as_ref().and_then(|d| d.context.clone()) {
		active_context = Cow::Owned(
			crate::context::process_context(
				active_context.as_ref(),
				local.as_ref(),
				active_property_definition
					.as_ref()
					.and_then(|d| d.base_url.as_deref())
					.or(base_url),
				loader,
				warnings,
				crate::context::ProcessingStack::new(),
				options.context_options().with_override(),
			)
			.await?,
		);
	}

	// `@context` entry, if present.
	if let Some(context_value) = object.get("@context") {
		let local = crate::syntax::Context::from_json(context_value)?;
		active_context = Cow::Owned(
			crate::context::process_context(
				active_context.as_ref(),
				&local,
				base_url,
				loader,
				warnings,
				crate::context::ProcessingStack::new(),
				options.context_options(),
			)
			.await?,
		);
	}

	let type_scoped_context: ActiveContext = active_context.as_ref().clone();

	// Type-scoped contexts: every `@type`-expanding entry's own values,
	// each of which may carry a local context, applied in lexicographic
	// order of both the entry keys and the (also sorted) type values.
	let mut type_entry_keys: Vec<&str> = Vec::new();
	for (key, _) in object.iter() {
		let expanded = crate::context::expand_iri_simple(
			&type_scoped_context,
			Some(key),
			false,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;
		if matches!(expanded, Term::Keyword(Keyword::Type)) {
			type_entry_keys.push(key);
		}
	}
	type_entry_keys.sort_unstable();

	for type_key in type_entry_keys.iter().copied() {
		let value = object.get(type_key).expect("key came from this object");
		let mut type_values: Vec<&str> = as_array(value).into_iter().filter_map(json::Value::as_str).collect();
		type_values.sort_unstable();
		for type_value in type_values {
			if let Some(local) = type_scoped_context.get(type_value).and_then(|d| d.context.clone()) {
				let def_base_url = type_scoped_context.get(type_value).and_then(|d| d.base_url.as_deref());
				active_context = Cow::Owned(
					crate::context::process_context(
						active_context.as_ref(),
						local.as_ref(),
						def_base_url.or(base_url),
						loader,
						warnings,
						crate::context::ProcessingStack::new(),
						options.context_options().with_no_override().without_propagation(),
					)
					.await?,
				);
			}
		}
	}

	// Expand every key exactly once against the final active context.
	let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
	if options.ordered {
		keys.sort_unstable();
	}

	let mut entries: Vec<ExpandedEntry<'_>> = Vec::new();
	let mut list_entry: Option<&json::Value> = None;
	let mut set_entry: Option<&json::Value> = None;
	let mut value_entry: Option<&json::Value> = None;

	for key in keys {
		if key == "@context" {
			continue;
		}
		let value = object.get(key).expect("key came from this object");
		let expanded_key = crate::context::expand_iri_simple(
			active_context.as_ref(),
			Some(key),
			false,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;

		match &expanded_key {
			Term::Keyword(Keyword::List) => list_entry = Some(value),
			Term::Keyword(Keyword::Set) => set_entry = Some(value),
			Term::Keyword(Keyword::Value) => value_entry = Some(value),
			_ => {}
		}

		entries.push(ExpandedEntry {
			key,
			expanded_key,
			value,
		});
	}

	if let Some(list_value) = list_entry {
		for entry in &entries {
			if !matches!(
				entry.expanded_key,
				Term::Keyword(Keyword::List) | Term::Keyword(Keyword::Index)
			) {
				return Err(Error::new(ErrorCode::InvalidSetOrListObject));
			}
		}

		let mut items: Vec<IndexedObject> = Vec::new();
		for item in as_array(list_value) {
			let expanded = Box::pin(expand_element(
				active_context.as_ref(),
				active_property,
				item,
				base_url,
				loader,
				warnings,
				options,
				false,
			))
			.await?;
			if expanded.is_list() {
				return Err(Error::new(ErrorCode::ListOfLists));
			}
			items.extend(expanded.into_vec());
		}

		let index = entries.iter().find_map(|e| match &e.expanded_key {
			Term::Keyword(Keyword::Index) => e.value.as_str().map(str::to_string),
			_ => None,
		});

		return Ok(Expanded::Object(Indexed::new(Object::List(List::new(items)), index)));
	}

	if let Some(set_value) = set_entry {
		for entry in &entries {
			if !matches!(
				entry.expanded_key,
				Term::Keyword(Keyword::Set) | Term::Keyword(Keyword::Index)
			) {
				return Err(Error::new(ErrorCode::InvalidSetOrListObject));
			}
		}

		return Box::pin(expand_element(
			active_context.as_ref(),
			active_property,
			set_value,
			base_url,
			loader,
			warnings,
			options,
			from_map,
		))
		.await;
	}

	if let Some(value) = value_entry {
		return match expand_value_object(&entries, value, warnings)? {
			Some(obj) => Ok(Expanded::Object(obj)),
			None => Ok(Expanded::Null),
		};
	}

	expand_node(
		active_context.as_ref(),
		&type_scoped_context,
		active_property,
		&entries,
		base_url,
		loader,
		warnings,
		options,
	)
	.await
}

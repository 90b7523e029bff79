//! Node Compaction (spec §4.3 "Node Object Compaction Algorithm"): the bulk
//! of compaction's work — applies type-scoped contexts, compacts `@id`/
//! `@type`/`@reverse`/`@index`/`@graph`/`@included`, and hands every
//! remaining property off to [`compact_property`](super::compact_property).
use super::{compact_iri, compact_property, CompactionOptions, Compactor};
use crate::context::InverseContext;
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::Node;
use crate::syntax::ContainerKind;
use crate::warning::Handler;
use crate::{Keyword, ProcessingMode, Term};
use std::borrow::Cow;

fn optional_string(s: Option<String>) -> json::Value {
	s.map(json::Value::String).unwrap_or(json::Value::Null)
}

pub(crate) async fn compact_indexed_node_with<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &InverseContext,
	node: &Node,
	index: Option<&str>,
	loader: &L,
	warnings: &mut W,
) -> Result<json::Value, Error> {
	let mut active_context = compactor.active_context;
	if !((node.is_empty() || node.is_id_only()) && node.id.is_some()) {
		if active_context.previous_context.is_some() {
			active_context = active_context.previous();
		}
	}

	let mut active_context: Cow<crate::context::ActiveContext> = Cow::Borrowed(active_context);
	if let Some(active_property) = compactor.active_property {
		if let Some(def) = compactor.type_scoped_context.get(active_property) {
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

	let mut result = json::Object::new();

	if !node.types().is_empty() {
		let mut compacted_types: Vec<Option<String>> = Vec::new();
		for ty in node.types() {
			compacted_types.push(compact_iri(
				compactor.type_scoped_context,
				inverse_context,
				&ty.clone().into_term(),
				true,
				false,
				compactor.options,
			)?);
		}
		compacted_types.sort_by(|a, b| a.as_ref().unwrap().cmp(b.as_ref().unwrap()));

		for term in &compacted_types {
			if let Some(def) = compactor.type_scoped_context.get(term.as_ref().unwrap().as_str()) {
				if let Some(local) = &def.context {
					active_context = Cow::Owned(
						crate::context::process_context(
							active_context.as_ref(),
							local.as_ref(),
							def.base_url.as_deref(),
							loader,
							warnings,
							crate::context::ProcessingStack::new(),
							compactor.options.context_options().without_propagation(),
						)
						.await?,
					);
				}
			}
		}
	}

	if let Some(id) = &node.id {
		let id_term = Term::Id(id.clone());

		if node.is_empty() {
			let type_mapping = compactor
				.active_property
				.and_then(|p| active_context.get(p))
				.and_then(|def| def.typ.clone());

			if type_mapping == Some(Term::Keyword(Keyword::Id)) {
				let compacted = compact_iri(active_context.as_ref(), inverse_context, &id_term, false, false, compactor.options)?;
				return Ok(optional_string(compacted));
			}

			if type_mapping == Some(Term::Keyword(Keyword::Vocab)) {
				let compacted = compact_iri(active_context.as_ref(), inverse_context, &id_term, true, false, compactor.options)?;
				return Ok(optional_string(compacted));
			}
		}

		let compacted_value = compact_iri(active_context.as_ref(), inverse_context, &id_term, false, false, compactor.options)?;
		let alias = compact_iri(
			active_context.as_ref(),
			inverse_context,
			&Term::Keyword(Keyword::Id),
			true,
			false,
			compactor.options,
		)?;
		if let Some(key) = alias {
			result.insert(key, optional_string(compacted_value));
		}
	}

	compact_types(
		&mut result,
		node.types.as_deref(),
		active_context.as_ref(),
		compactor.type_scoped_context,
		inverse_context,
		compactor.options,
	)?;

	if let Some(reverse_properties) = &node.reverse_properties {
		if !reverse_properties.is_empty() {
			if let Some(def) = active_context.get("@reverse") {
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

			let reverse_compactor = compactor.with_active_context(active_context.as_ref()).with_active_property(None);
			let mut reverse_result = json::Object::new();
			for (property, values) in reverse_properties.iter() {
				let expanded: Vec<_> = values.iter().map(|n| n.clone().map_inner(crate::object::Object::Node)).collect();
				compact_property(
					reverse_compactor,
					inverse_context,
					&mut reverse_result,
					&Term::Id(property.clone()),
					&expanded,
					loader,
					true,
					warnings,
				)
				.await?;
			}

			let mut reverse_map = json::Object::new();
			for (property, value) in reverse_result.into_iter() {
				let is_reverse_property = active_context.get(&property).is_some_and(|def| def.reverse_property);
				if is_reverse_property {
					let as_array = active_context
						.get(&property)
						.is_some_and(|def| def.container.contains(ContainerKind::Set))
						|| !compactor.options.compact_arrays;
					super::add_value(&mut result, &property, value, as_array);
				} else {
					reverse_map.insert(property, value);
				}
			}

			if !reverse_map.is_empty() {
				let alias = compact_iri(
					active_context.as_ref(),
					inverse_context,
					&Term::Keyword(Keyword::Reverse),
					true,
					false,
					compactor.options,
				)?;
				result.insert(alias.unwrap(), json::Value::Object(reverse_map));
			}
		}
	}

	if let Some(index_entry) = index {
		let index_container = compactor
			.active_property
			.and_then(|p| active_context.get(p))
			.is_some_and(|def| def.container.contains(ContainerKind::Index));

		if !index_container {
			let alias = compact_iri(
				active_context.as_ref(),
				inverse_context,
				&Term::Keyword(Keyword::Index),
				true,
				false,
				compactor.options,
			)?;
			result.insert(alias.unwrap(), json::Value::String(index_entry.to_string()));
		}
	}

	let inner_compactor = compactor.with_active_context(active_context.as_ref()).with_type_scoped_context(compactor.type_scoped_context);

	if let Some(graph) = &node.graph {
		compact_property(
			inner_compactor.with_active_property(None),
			inverse_context,
			&mut result,
			&Term::Keyword(Keyword::Graph),
			graph,
			loader,
			false,
			warnings,
		)
		.await?;
	}

	let mut entries: Vec<_> = node.properties.iter().collect();
	if compactor.options.ordered {
		entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
	}
	for (property, values) in entries {
		compact_property(
			inner_compactor.with_active_property(None),
			inverse_context,
			&mut result,
			&Term::Id(property.clone()),
			values,
			loader,
			false,
			warnings,
		)
		.await?;
	}

	if let Some(included) = &node.included {
		let expanded: Vec<_> = included.iter().map(|n| n.clone().map_inner(crate::object::Object::Node)).collect();
		compact_property(
			inner_compactor.with_active_property(None),
			inverse_context,
			&mut result,
			&Term::Keyword(Keyword::Included),
			&expanded,
			loader,
			false,
			warnings,
		)
		.await?;
	}

	Ok(json::Value::Object(result))
}

fn compact_types(
	result: &mut json::Object,
	types: Option<&[crate::Id]>,
	active_context: &crate::context::ActiveContext,
	type_scoped_context: &crate::context::ActiveContext,
	inverse_context: &InverseContext,
	options: CompactionOptions,
) -> Result<(), Error> {
	let Some(types) = types else { return Ok(()) };
	if types.is_empty() {
		return Ok(());
	}

	let compacted_value = if types.len() == 1 {
		optional_string(compact_iri(type_scoped_context, inverse_context, &types[0].clone().into_term(), true, false, options)?)
	} else {
		let mut values = Vec::with_capacity(types.len());
		for ty in types {
			let compacted = compact_iri(type_scoped_context, inverse_context, &ty.clone().into_term(), true, false, options)?;
			values.push(optional_string(compacted));
		}
		json::Value::Array(values)
	};

	let alias = compact_iri(active_context, inverse_context, &Term::Keyword(Keyword::Type), true, false, options)?.unwrap();

	let container_mapping = active_context.get(alias.as_str()).map(|def| &def.container);
	let as_array = (options.processing_mode == ProcessingMode::JsonLd1_1
		&& container_mapping.is_some_and(|c| c.contains(ContainerKind::Set)))
		|| !options.compact_arrays;

	super::add_value(result, &alias, compacted_value, as_array);
	Ok(())
}

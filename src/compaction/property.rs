//! Property Compaction (spec §4.3 "Compact Iris" used per-property, plus
//! the `@nest`, container-map, and graph/list special cases built on top of
//! it): the one-property-at-a-time entry point node compaction calls for
//! every property it finds on a node.
use super::{compact_indexed_fragment, compact_iri, compact_iri_with, value_value, Compactor};
use crate::context::{ActiveContext, InverseContext};
use crate::error::{Error, ErrorCode};
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, List, Node, Object};
use crate::syntax::{Container, ContainerKind};
use crate::warning::Handler;
use crate::{Id, Keyword, Term};

/// Finds the object (possibly nested under `@nest`) a compacted property
/// entry should land in, plus its container mapping and array-wrapping
/// policy (spec §4.3 step "If the term definition ... has a nest value
/// entry").
pub(crate) fn select_nest_result<'r>(
	result: &'r mut json::Object,
	active_context: &ActiveContext,
	item_active_property: &str,
	compact_arrays: bool,
) -> Result<(&'r mut json::Object, Container, bool), Error> {
	let (nest_result, container) = match active_context.get(item_active_property) {
		Some(def) => {
			let nest_result = match &def.nest {
				Some(nest_term) => {
					if nest_term != "@nest" {
						match active_context.get(nest_term.as_str()) {
							Some(nest_def) if nest_def.is_keyword_alias_of(Keyword::Nest) => {}
							_ => return Err(Error::new(ErrorCode::InvalidNestValue)),
						}
					}

					if result.get(nest_term.as_str()).is_none() {
						result.insert(nest_term.clone(), json::Value::Object(json::Object::new()));
					}

					result.get_mut(nest_term.as_str()).unwrap().as_object_mut().unwrap()
				}
				None => result,
			};

			(nest_result, def.container.clone())
		}
		None => (result, Container::new()),
	};

	let as_array = if container.contains(ContainerKind::Set) || item_active_property == "@graph" || item_active_property == "@list" {
		true
	} else {
		!compact_arrays
	};

	Ok((nest_result, container, as_array))
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn compact_property<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &InverseContext,
	result: &mut json::Object,
	expanded_property: &Term,
	expanded_value: &[IndexedObject],
	loader: &L,
	inside_reverse: bool,
	warnings: &mut W,
) -> Result<(), Error> {
	let mut is_empty = true;

	for expanded_item in expanded_value {
		is_empty = false;

		let item_active_property =
			compact_iri_with(compactor.active_context, inverse_context, expanded_property, expanded_item, true, inside_reverse, compactor.options)?;

		let Some(item_active_property) = item_active_property else {
			continue;
		};

		let (nest_result, container, as_array) =
			select_nest_result(result, compactor.active_context, &item_active_property, compactor.options.compact_arrays)?;

		match expanded_item.inner() {
			Object::List(list) => {
				compact_property_list(
					compactor,
					inverse_context,
					list,
					expanded_item.index(),
					nest_result,
					container,
					as_array,
					&item_active_property,
					loader,
					warnings,
				)
				.await?;
			}
			Object::Node(node) if node.is_graph() => {
				compact_property_graph(
					compactor,
					inverse_context,
					node,
					expanded_item.index(),
					nest_result,
					container,
					as_array,
					&item_active_property,
					loader,
					warnings,
				)
				.await?;
			}
			_ => {
				let item_compactor = compactor.with_active_property(Some(item_active_property.as_str()));
				let mut compacted_item =
					Box::pin(compact_indexed_fragment(item_compactor, inverse_context, expanded_item, loader, warnings)).await?;

				if !container.contains(ContainerKind::Graph)
					&& (container.contains(ContainerKind::Language)
						|| container.contains(ContainerKind::Index)
						|| container.contains(ContainerKind::Id)
						|| container.contains(ContainerKind::Type))
				{
					if nest_result.get(item_active_property.as_str()).is_none() {
						nest_result.insert(item_active_property.clone(), json::Value::Object(json::Object::new()));
					}
					let map_object = nest_result.get_mut(item_active_property.as_str()).unwrap().as_object_mut().unwrap();

					let container_kind = if container.contains(ContainerKind::Language) {
						ContainerKind::Language
					} else if container.contains(ContainerKind::Index) {
						ContainerKind::Index
					} else if container.contains(ContainerKind::Id) {
						ContainerKind::Id
					} else {
						ContainerKind::Type
					};

					let mut container_key =
						compact_iri(compactor.active_context, inverse_context, &Term::Keyword(container_kind.keyword()), true, false, compactor.options)?;

					let index_key = compactor.active_context.get(item_active_property.as_str()).and_then(|def| def.index.as_deref());

					let map_key = if container_kind == ContainerKind::Language && expanded_item.inner().is_value() {
						if let Object::Value(value) = expanded_item.inner() {
							compacted_item = value_value(value);
						}
						expanded_item.inner().language().map(|l| l.as_str().to_string())
					} else if container_kind == ContainerKind::Index {
						match index_key {
							Some(index_key) => {
								container_key = compact_iri(
									compactor.active_context,
									inverse_context,
									&Term::Id(Id::Invalid(index_key.to_string())),
									true,
									false,
									compactor.options,
								)?;
								take_map_key(&mut compacted_item, container_key.as_deref().unwrap())
							}
							None => expanded_item.index().map(ToOwned::to_owned),
						}
					} else if container_kind == ContainerKind::Id {
						compacted_item
							.as_object_mut()
							.and_then(|map| map.remove(container_key.as_deref().unwrap()))
							.and_then(|v| v.as_str().map(ToOwned::to_owned))
					} else {
						let map_key = take_map_key(&mut compacted_item, container_key.as_deref().unwrap());

						if let Some(map) = compacted_item.as_object() {
							if map.len() == 1 && map.get("@id").is_some() {
								let id = expanded_item.inner().id().unwrap().clone();
								let node_only = Object::Node(Node::with_id(id));
								let node_only = crate::Indexed::new(node_only, None);
								compacted_item =
									Box::pin(compact_indexed_fragment(item_compactor, inverse_context, &node_only, loader, warnings)).await?;
							}
						}

						map_key
					};

					let map_key = match map_key {
						Some(key) => key,
						None => compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::None), true, false, compactor.options)?.unwrap(),
					};

					super::add_value(map_object, &map_key, compacted_item, as_array);
				} else {
					super::add_value(nest_result, &item_active_property, compacted_item, as_array);
				}
			}
		}
	}

	if is_empty {
		let item_active_property = compact_iri_with(
			compactor.active_context,
			inverse_context,
			expanded_property,
			&crate::Indexed::new(Object::Node(Node::new()), None),
			true,
			inside_reverse,
			compactor.options,
		)?;

		if let Some(item_active_property) = item_active_property {
			let (nest_result, _, _) = select_nest_result(result, compactor.active_context, &item_active_property, compactor.options.compact_arrays)?;
			super::add_value(nest_result, &item_active_property, json::Value::Array(Vec::new()), true);
		}
	}

	Ok(())
}

/// Pulls the first value out of `container_key` in `compacted_item`
/// (stashing any others back under the same key) to use as a container map
/// key (spec §4.3 "set `map_key` to the first value of `container_key`").
fn take_map_key(compacted_item: &mut json::Value, container_key: &str) -> Option<String> {
	let (map_key, remaining) = match compacted_item.as_object_mut() {
		Some(map) => match map.remove(container_key) {
			Some(json::Value::String(s)) => (Some(s), Vec::new()),
			Some(json::Value::Array(values)) => {
				let mut values = values.into_iter();
				match values.next() {
					Some(first) => (first.as_str().map(ToOwned::to_owned), values.collect()),
					None => (None, values.collect()),
				}
			}
			Some(other) => (None, vec![other]),
			None => (None, Vec::new()),
		},
		None => (None, Vec::new()),
	};

	if !remaining.is_empty() {
		if let Some(map) = compacted_item.as_object_mut() {
			for value in remaining {
				super::add_value(map, container_key, value, false);
			}
		}
	}

	map_key
}

#[allow(clippy::too_many_arguments)]
async fn compact_property_list<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &InverseContext,
	list: &List,
	expanded_index: Option<&str>,
	nest_result: &mut json::Object,
	container: Container,
	as_array: bool,
	item_active_property: &str,
	loader: &L,
	warnings: &mut W,
) -> Result<(), Error> {
	let item_compactor = compactor.with_active_property(Some(item_active_property));

	let mut compacted_item = Box::pin(super::compact_collection_with(item_compactor, inverse_context, list.iter(), loader, warnings)).await?;

	if !compacted_item.is_array() {
		compacted_item = json::Value::Array(vec![compacted_item]);
	}

	if !container.contains(ContainerKind::List) {
		let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::List), true, false, compactor.options)?;
		let mut wrapper = json::Object::new();
		wrapper.insert(key.unwrap(), compacted_item);

		if let Some(index) = expanded_index {
			let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::Index), true, false, compactor.options)?;
			wrapper.insert(key.unwrap(), json::Value::String(index.to_string()));
		}

		super::add_value(nest_result, item_active_property, json::Value::Object(wrapper), as_array);
	} else {
		nest_result.insert(item_active_property.to_string(), compacted_item);
	}

	Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn compact_property_graph<L: Loader, W: Handler>(
	compactor: Compactor<'_>,
	inverse_context: &InverseContext,
	node: &Node,
	expanded_index: Option<&str>,
	nest_result: &mut json::Object,
	container: Container,
	as_array: bool,
	item_active_property: &str,
	loader: &L,
	warnings: &mut W,
) -> Result<(), Error> {
	let item_compactor = compactor.with_active_property(Some(item_active_property));
	let graph = node.graph.as_ref().unwrap();
	let mut compacted_item = Box::pin(super::compact_collection_with(item_compactor, inverse_context, graph.iter(), loader, warnings)).await?;

	if container.contains(ContainerKind::Graph) && container.contains(ContainerKind::Id) {
		if nest_result.get(item_active_property).is_none() {
			nest_result.insert(item_active_property.to_string(), json::Value::Object(json::Object::new()));
		}
		let map_object = nest_result.get_mut(item_active_property).unwrap().as_object_mut().unwrap();

		let (id_value, vocab) = match &node.id {
			Some(id) => (Term::Id(id.clone()), false),
			None => (Term::Keyword(Keyword::None), true),
		};
		let map_key = compact_iri(compactor.active_context, inverse_context, &id_value, vocab, false, compactor.options)?.unwrap();
		super::add_value(map_object, &map_key, compacted_item, as_array);
	} else if container.contains(ContainerKind::Graph) && container.contains(ContainerKind::Index) && node.is_simple_graph() {
		if nest_result.get(item_active_property).is_none() {
			nest_result.insert(item_active_property.to_string(), json::Value::Object(json::Object::new()));
		}
		let map_object = nest_result.get_mut(item_active_property).unwrap().as_object_mut().unwrap();
		let map_key = expanded_index.unwrap_or("@none");
		super::add_value(map_object, map_key, compacted_item, as_array);
	} else if container.contains(ContainerKind::Graph) && node.is_simple_graph() {
		if let json::Value::Array(items) = &compacted_item {
			if items.len() > 1 {
				let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::Included), true, false, compactor.options)?.unwrap();
				let mut wrapper = json::Object::new();
				wrapper.insert(key, compacted_item);
				compacted_item = json::Value::Object(wrapper);
			}
		}
		super::add_value(nest_result, item_active_property, compacted_item, as_array);
	} else {
		let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::Graph), true, false, compactor.options)?.unwrap();
		let mut wrapper = json::Object::new();
		wrapper.insert(key, compacted_item);

		if let Some(id) = &node.id {
			let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::Id), true, false, compactor.options)?.unwrap();
			let value = compact_iri(compactor.active_context, inverse_context, &Term::Id(id.clone()), false, false, compactor.options)?;
			wrapper.insert(key, value.map(json::Value::String).unwrap_or(json::Value::Null));
		}

		if let Some(index) = expanded_index {
			let key = compact_iri(compactor.active_context, inverse_context, &Term::Keyword(Keyword::Index), true, false, compactor.options)?.unwrap();
			wrapper.insert(key, json::Value::String(index.to_string()));
		}

		super::add_value(nest_result, item_active_property, json::Value::Object(wrapper), as_array);
	}

	Ok(())
}


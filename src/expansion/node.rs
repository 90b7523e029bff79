//! Node-object expansion (spec §4.2 "node object expansion"): builds a
//! [`Node`] from `@id`, `@type`, `@graph`, `@included`, `@index`,
//! `@reverse`, `@nest` and non-keyword properties driven by each property's
//! `@container` mapping.
use std::borrow::Cow;

use super::value::ExpandedEntry;
use super::{as_array, term_to_id, ActiveProperty, Expanded, Options};
use crate::context::{ActiveContext, TermDefinition};
use crate::error::{Error, ErrorCode};
use crate::json;
use crate::loader::Loader;
use crate::object::{IndexedObject, LangString, Literal, Node, Object, Value};
use crate::syntax::{Container, ContainerKind};
use crate::warning::{Handler, Warning};
use crate::{Id, Indexed, Keyword, LenientLangTagBuf, ProcessingMode, Term};
use iref::Iri;

struct NodeState {
	node: Node,
	has_value_object_entries: bool,
	index: Option<String>,
	seen: Vec<Keyword>,
}

/// Expands a node object's already-key-expanded entries into an
/// [`Expanded`] (spec §4.2 steps 11 onward). `type_scoped_context` is the
/// context captured right after `@context`/property-scoped processing but
/// before any `@type`-triggered local contexts were applied, used to
/// resolve `@id`/`@type` values themselves.
pub(crate) async fn expand_node<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	type_scoped_context: &ActiveContext,
	active_property: ActiveProperty<'_>,
	entries: &[ExpandedEntry<'_>],
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
) -> Result<Expanded, Error> {
	let mut state = NodeState {
		node: Node::new(),
		has_value_object_entries: false,
		index: None,
		seen: Vec::new(),
	};

	expand_node_entries(
		active_context,
		type_scoped_context,
		entries,
		base_url,
		loader,
		warnings,
		options,
		&mut state,
	)
	.await?;

	let node = state.node;

	if (state.has_value_object_entries || active_property.is_none() || active_property.as_str() == Some("@graph"))
		&& node.is_empty()
	{
		return Ok(Expanded::Null);
	}

	Ok(Expanded::Object(Indexed::new(Object::Node(node), state.index)))
}

fn check_collision(state: &mut NodeState, kw: Keyword, options: Options) -> Result<(), Error> {
	let allows_repeats = options.processing_mode == ProcessingMode::JsonLd1_1
		&& matches!(kw, Keyword::Included | Keyword::Type);
	if state.seen.contains(&kw) && !allows_repeats {
		return Err(Error::new(ErrorCode::CollidingKeywords));
	}
	state.seen.push(kw);
	Ok(())
}

async fn expand_node_entries<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	type_scoped_context: &ActiveContext,
	entries: &[ExpandedEntry<'_>],
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	state: &mut NodeState,
) -> Result<(), Error> {
	for entry in entries {
		match &entry.expanded_key {
			Term::Null => continue,
			Term::Keyword(Keyword::Context) => continue,

			Term::Keyword(kw) => {
				check_collision(state, *kw, options)?;

				match kw {
					Keyword::Id => {
						let s = entry
							.value
							.as_str()
							.ok_or_else(|| Error::new(ErrorCode::InvalidIdValue))?;
						state.node.id = term_to_id(
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
					}

					Keyword::Type => {
						for v in as_array(entry.value) {
							let s = v.as_str().ok_or_else(|| Error::new(ErrorCode::InvalidTypeValue))?;
							let expanded = crate::context::expand_iri_simple(
								type_scoped_context,
								Some(s),
								true,
								true,
								loader,
								warnings,
								options.context_options(),
							)
							.await?;
							if let Some(id) = term_to_id(expanded) {
								state.node.types.get_or_insert_with(Vec::new).push(id);
							}
						}
					}

					Keyword::Graph => {
						let expanded = Box::pin(super::element::expand_element(
							active_context,
							ActiveProperty::Some("@graph"),
							entry.value,
							base_url,
							loader,
							warnings,
							options,
							false,
						))
						.await?;
						let items: Vec<_> = expanded
							.into_vec()
							.into_iter()
							.filter(|item| !item.inner().is_value() && !item.inner().is_list())
							.collect();
						state.node.graph = Some(items);
					}

					Keyword::Included => {
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							continue;
						}
						let expanded = Box::pin(super::element::expand_element(
							active_context,
							ActiveProperty::None,
							entry.value,
							base_url,
							loader,
							warnings,
							options,
							false,
						))
						.await?;
						let mut included = state.node.included.take().unwrap_or_default();
						for item in expanded.into_vec() {
							let (obj, _index) = item.into_parts();
							let node = obj
								.into_node()
								.ok_or_else(|| Error::new(ErrorCode::InvalidIncludedValue))?;
							included.push(Indexed::new(node, None));
						}
						state.node.included = Some(included);
					}

					Keyword::Language | Keyword::Direction => {
						state.has_value_object_entries = true;
					}

					Keyword::Index => {
						let s = entry
							.value
							.as_str()
							.ok_or_else(|| Error::new(ErrorCode::InvalidIndexValue))?;
						state.index = Some(s.to_string());
					}

					Keyword::Reverse => {
						let object = entry
							.value
							.as_object()
							.ok_or_else(|| Error::new(ErrorCode::InvalidReversePropertyValue))?;
						expand_reverse(active_context, object, base_url, loader, warnings, options, state).await?;
					}

					Keyword::Nest => {
						for nested in as_array(entry.value) {
							let nested_object = nested
								.as_object()
								.ok_or_else(|| Error::new(ErrorCode::InvalidNestValue))?;
							Box::pin(expand_nest(
								active_context,
								type_scoped_context,
								nested_object,
								base_url,
								loader,
								warnings,
								options,
								state,
							))
							.await?;
						}
					}

					Keyword::Value => return Err(Error::new(ErrorCode::InvalidValueObject)),

					_ => {}
				}
			}

			Term::Id(prop) => {
				if let Id::Blank(b) = prop {
					warnings.handle(Warning::BlankNodeIdProperty(b.clone()));
				}
				expand_node_property(
					active_context,
					entry.key,
					prop.clone(),
					entry.value,
					base_url,
					loader,
					warnings,
					options,
					state,
				)
				.await?;
			}
		}
	}
	Ok(())
}

async fn expand_reverse<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	object: &json::Object,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	state: &mut NodeState,
) -> Result<(), Error> {
	for (key, value) in object.iter() {
		let expanded_key = crate::context::expand_iri_simple(
			active_context,
			Some(key),
			false,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;

		let prop = match expanded_key {
			Term::Id(id) => id,
			Term::Null => continue,
			Term::Keyword(_) => return Err(Error::new(ErrorCode::InvalidReversePropertyMap)),
		};

		let expanded = Box::pin(super::element::expand_element(
			active_context,
			ActiveProperty::Some(key),
			value,
			base_url,
			loader,
			warnings,
			options,
			false,
		))
		.await?;

		let double_reversed = active_context.get(key).map(|d| d.reverse_property).unwrap_or(false);

		if double_reversed {
			state.node.properties.insert(prop, expanded.into_vec());
		} else {
			let mut nodes = Vec::new();
			for item in expanded.into_vec() {
				let (obj, _index) = item.into_parts();
				let node = obj
					.into_node()
					.ok_or_else(|| Error::new(ErrorCode::InvalidReversePropertyValue))?;
				nodes.push(Indexed::new(node, None));
			}
			state
				.node
				.reverse_properties
				.get_or_insert_with(Default::default)
				.entry(prop)
				.or_default()
				.extend(nodes);
		}
	}
	Ok(())
}

async fn expand_nest<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	type_scoped_context: &ActiveContext,
	object: &json::Object,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	state: &mut NodeState,
) -> Result<(), Error> {
	let mut expanded_entries = Vec::new();
	for (key, value) in object.iter() {
		if key == "@context" {
			continue;
		}
		if let Some(def) = active_context.get(key) {
			if def.is_keyword_alias_of(Keyword::Value) {
				return Err(Error::new(ErrorCode::InvalidNestValue));
			}
		}
		let expanded_key = crate::context::expand_iri_simple(
			active_context,
			Some(key),
			false,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;
		expanded_entries.push((key, expanded_key, value));
	}

	let owned: Vec<ExpandedEntry<'_>> = expanded_entries
		.into_iter()
		.map(|(key, expanded_key, value)| ExpandedEntry {
			key,
			expanded_key,
			value,
		})
		.collect();

	expand_node_entries(
		active_context,
		type_scoped_context,
		&owned,
		base_url,
		loader,
		warnings,
		options,
		state,
	)
	.await
}

/// Expands one non-keyword property entry, dispatching on its `@container`
/// mapping (spec's "Container-driven interpretation": `@language`, `@index`,
/// `@id`, `@type`, `@graph` each require a map value and attach the map key
/// to the corresponding slot of every resulting item).
#[allow(clippy::too_many_arguments)]
async fn expand_node_property<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	key: &str,
	prop: Id,
	value: &json::Value,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
	state: &mut NodeState,
) -> Result<(), Error> {
	let def = active_context.get(key).cloned();
	let container = def.as_ref().map(|d| d.container.clone()).unwrap_or_default();

	let scoped_context = def.as_ref().and_then(|d| d.context.clone());
	let property_active_context: Cow<ActiveContext> = match &scoped_context {
		Some(local) => Cow::Owned(
			crate::context::process_context(
				active_context,
				local.as_ref(),
				def.as_ref().and_then(|d| d.base_url.as_deref()).or(base_url),
				loader,
				warnings,
				crate::context::ProcessingStack::new(),
				options.context_options().with_override(),
			)
			.await?,
		),
		None => Cow::Borrowed(active_context),
	};

	let items = if container.contains(ContainerKind::Language) && value.is_object() {
		expand_language_map(property_active_context.as_ref(), def.as_ref(), value, warnings)?
	} else if (container.contains(ContainerKind::Index)
		|| container.contains(ContainerKind::Id)
		|| container.contains(ContainerKind::Type))
		&& value.is_object()
	{
		Box::pin(expand_index_like_map(
			property_active_context.as_ref(),
			&container,
			def.as_ref(),
			value,
			base_url,
			loader,
			warnings,
			options,
		))
		.await?
	} else {
		Box::pin(super::element::expand_element(
			property_active_context.as_ref(),
			ActiveProperty::Some(key),
			value,
			base_url,
			loader,
			warnings,
			options,
			false,
		))
		.await?
		.into_vec()
	};

	let items = if container.contains(ContainerKind::List) {
		let already_list = items.len() == 1 && items[0].inner().is_list();
		if already_list {
			items
		} else {
			vec![Indexed::new(Object::List(crate::object::List::new(items)), None)]
		}
	} else if container.contains(ContainerKind::Graph)
		&& !container.contains(ContainerKind::Id)
		&& !container.contains(ContainerKind::Index)
	{
		items
			.into_iter()
			.map(|item| {
				let mut node = Node::new();
				node.graph = Some(vec![item]);
				Indexed::new(Object::Node(node), None)
			})
			.collect()
	} else {
		items
	};

	let is_reverse = def.as_ref().map(|d| d.reverse_property).unwrap_or(false);
	if is_reverse {
		let mut nodes = Vec::new();
		for item in items {
			let (obj, _index) = item.into_parts();
			let node = obj
				.into_node()
				.ok_or_else(|| Error::new(ErrorCode::InvalidReversePropertyValue))?;
			nodes.push(Indexed::new(node, None));
		}
		state
			.node
			.reverse_properties
			.get_or_insert_with(Default::default)
			.entry(prop)
			.or_default()
			.extend(nodes);
	} else {
		state.node.properties.insert(prop, items);
	}

	Ok(())
}

fn expand_language_map(
	active_context: &ActiveContext,
	def: Option<&TermDefinition>,
	value: &json::Value,
	warnings: &mut impl Handler,
) -> Result<Vec<IndexedObject>, Error> {
	let object = value
		.as_object()
		.ok_or_else(|| Error::new(ErrorCode::InvalidLanguageMapping))?;

	let default_direction = match def.and_then(|d| d.direction.clone()) {
		Some(n) => n.into_option(),
		None => active_context.default_base_direction,
	};

	let mut items = Vec::new();
	for (key, value) in object.iter() {
		let language = if key == "@none" {
			None
		} else {
			let tag = LenientLangTagBuf::new(key.clone());
			if !tag.is_well_formed() {
				warnings.handle(Warning::MalformedLanguageTag(tag.as_str().to_string()));
			}
			Some(tag)
		};

		for item in as_array(value) {
			let s = item
				.as_str()
				.ok_or_else(|| Error::new(ErrorCode::InvalidLanguageMapping))?;
			let object = match LangString::new(s.to_string(), language.clone(), default_direction) {
				Ok(lang_string) => Object::Value(Value::LangString(lang_string)),
				Err(plain) => Object::Value(Value::Literal(Literal::String(plain), None)),
			};
			items.push(Indexed::new(object, None));
		}
	}
	Ok(items)
}

#[allow(clippy::too_many_arguments)]
async fn expand_index_like_map<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	container: &Container,
	def: Option<&TermDefinition>,
	value: &json::Value,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	options: Options,
) -> Result<Vec<IndexedObject>, Error> {
	let object = value
		.as_object()
		.ok_or_else(|| Error::new(ErrorCode::InvalidSetOrListObject))?;

	let index_key = def.and_then(|d| d.index.clone()).unwrap_or_else(|| "@index".to_string());

	let map_context: &ActiveContext = if container.contains(ContainerKind::Id) || container.contains(ContainerKind::Type)
	{
		active_context.previous()
	} else {
		active_context
	};

	let mut items = Vec::new();

	for (key, value) in object.iter() {
		let per_entry_context: Cow<ActiveContext> = if container.contains(ContainerKind::Type) {
			match map_context.get(key).and_then(|d| d.context.clone()) {
				Some(local) => Cow::Owned(
					crate::context::process_context(
						map_context,
						local.as_ref(),
						base_url,
						loader,
						warnings,
						crate::context::ProcessingStack::new(),
						options.context_options().with_no_override(),
					)
					.await?,
				),
				None => Cow::Borrowed(map_context),
			}
		} else {
			Cow::Borrowed(map_context)
		};

		let expanded_index = crate::context::expand_iri_simple(
			&per_entry_context,
			Some(key),
			true,
			true,
			loader,
			warnings,
			options.context_options(),
		)
		.await?;

		for entry_value in as_array(value) {
			let wrapped;
			let entry_value = if !entry_value.is_object() && container.contains(ContainerKind::Type) {
				let mut object = json::Object::new();
				object.insert("@id", entry_value.clone());
				wrapped = json::Value::Object(object);
				&wrapped
			} else {
				entry_value
			};

			let expanded = Box::pin(super::element::expand_element(
				per_entry_context.as_ref(),
				ActiveProperty::None,
				entry_value,
				base_url,
				loader,
				warnings,
				options,
				true,
			))
			.await?;

			for item in expanded.into_vec() {
				let (mut obj, mut index) = item.into_parts();

				if container.contains(ContainerKind::Graph) {
					let mut node = Node::new();
					node.graph = Some(vec![Indexed::new(obj, index)]);
					items.push(Indexed::new(Object::Node(node), None));
					continue;
				}

				if container.contains(ContainerKind::Index) && index_key != "@index" {
					if let Term::Id(expanded_key_id) = &expanded_index {
						let literal = Box::pin(super::literal::expand_literal(
							&per_entry_context,
							None,
							&json::Value::String(key.clone()),
							loader,
							warnings,
							options,
						))
						.await?;
						if let Some(node) = obj.as_node_mut() {
							node.properties.insert(expanded_key_id.clone(), vec![literal]);
						}
					}
				} else if container.contains(ContainerKind::Index) {
					if index.is_none() {
						index = Some(key.clone());
					}
				} else if container.contains(ContainerKind::Id) {
					if let Some(node) = obj.as_node_mut() {
						if node.id.is_none() {
							node.id = term_to_id(
								crate::context::expand_iri_simple(
									&per_entry_context,
									Some(key),
									true,
									false,
									loader,
									warnings,
									options.context_options(),
								)
								.await?,
							);
						}
					}
				} else if container.contains(ContainerKind::Type) {
					if let Term::Id(type_id) = &expanded_index {
						if let Some(node) = obj.as_node_mut() {
							node.types.get_or_insert_with(Vec::new).insert(0, type_id.clone());
						}
					}
				}

				items.push(Indexed::new(obj, index));
			}
		}
	}

	Ok(items)
}

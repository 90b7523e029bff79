//! IRI Compaction algorithm (spec §4.3): picks a compact representation for
//! an expanded IRI (or keyword), optionally informed by the shape of the
//! value it is attached to.
use crate::context::{ActiveContext, InverseContext, LangSelection, Selection, TypeSelection};
use crate::error::{Error, ErrorCode};
use crate::object::{IndexedObject, Object, Ref, Value};
use crate::syntax::{Container, ContainerKind};
use crate::{Direction, Keyword, LenientLangTagBuf, Nullable, ProcessingMode, Term};

use super::CompactionOptions;

fn c(kinds: &[ContainerKind]) -> Container {
	kinds.iter().copied().collect()
}

/// Compacts `var` without considering any attached value.
pub(crate) fn compact_iri(
	active_context: &ActiveContext,
	inverse_context: &InverseContext,
	var: &Term,
	vocab: bool,
	reverse: bool,
	options: CompactionOptions,
) -> Result<Option<String>, Error> {
	compact_iri_full(active_context, inverse_context, var, None, vocab, reverse, options)
}

/// Compacts `var` considering the shape of `value` (container/type/language
/// selection, spec §4.3's "IRI Compaction algorithm" value-dependent steps).
pub(crate) fn compact_iri_with(
	active_context: &ActiveContext,
	inverse_context: &InverseContext,
	var: &Term,
	value: &IndexedObject,
	vocab: bool,
	reverse: bool,
	options: CompactionOptions,
) -> Result<Option<String>, Error> {
	compact_iri_full(active_context, inverse_context, var, Some(value), vocab, reverse, options)
}

type LangDir = Nullable<(Option<LenientLangTagBuf>, Option<Direction>)>;

enum TypeLangValue {
	Type(TypeSelection),
	Lang(LangDir),
}

#[allow(clippy::too_many_lines)]
fn compact_iri_full(
	active_context: &ActiveContext,
	inverse_context: &InverseContext,
	var: &Term,
	value: Option<&IndexedObject>,
	vocab: bool,
	reverse: bool,
	options: CompactionOptions,
) -> Result<Option<String>, Error> {
	if var.is_null() {
		return Ok(None);
	}

	if vocab && inverse_context.contains(var) {
		let mut cs: Vec<Container> = Vec::new();
		let mut type_lang_value: Option<TypeLangValue> = None;

		if let Some(value) = value {
			if value.index().is_some() && !value.inner().is_graph() {
				cs.push(c(&[ContainerKind::Index]));
				cs.push(c(&[ContainerKind::Index, ContainerKind::Set]));
			}
		}

		let mut has_index = false;
		let mut is_simple_value = false;

		if reverse {
			type_lang_value = Some(TypeLangValue::Type(TypeSelection::Reverse));
			cs.push(c(&[ContainerKind::Set]));
		} else {
			has_index = value.is_some_and(|v| v.index().is_some());

			match value.map(|v| v.inner().as_ref()) {
				Some(Ref::List(list)) => {
					if !has_index {
						cs.push(c(&[ContainerKind::List]));
					}

					let mut common_type: Option<Option<Term>> = None;
					let mut common_lang_dir: Option<LangDir> = None;

					if list.is_empty() {
						common_lang_dir = Some(Nullable::Some((
							active_context.default_language.clone(),
							active_context.default_base_direction,
						)));
					} else {
						for item in list.iter() {
							let mut item_type: Option<Term> = None;
							let mut item_lang_dir: Option<LangDir> = None;
							let mut is_value = false;

							match item.inner() {
								Object::Value(value) => {
									is_value = true;
									match value {
										Value::LangString(s) => {
											item_lang_dir = Some(Nullable::Some((s.language().cloned(), s.direction())));
										}
										Value::Literal(_, Some(ty)) => item_type = Some(Term::Id(ty.clone())),
										Value::Literal(_, None) => item_lang_dir = Some(Nullable::Null),
										Value::Json(_) => item_type = Some(Term::Keyword(Keyword::Json)),
									}
								}
								_ => item_type = Some(Term::Keyword(Keyword::Id)),
							}

							if common_lang_dir.is_none() {
								common_lang_dir = item_lang_dir;
							} else if is_value && common_lang_dir != item_lang_dir {
								common_lang_dir = Some(Nullable::Some((None, None)));
							}

							match &common_type {
								None => common_type = Some(item_type),
								Some(existing) if existing != &item_type => common_type = Some(None),
								_ => {}
							}

							if common_lang_dir == Some(Nullable::Some((None, None))) && common_type == Some(None) {
								break;
							}
						}
					}

					let common_lang_dir = common_lang_dir.unwrap_or(Nullable::Some((None, None)));
					let common_type = common_type.unwrap_or(None);

					type_lang_value = Some(match common_type {
						Some(ty) => TypeLangValue::Type(TypeSelection::Type(ty)),
						None => TypeLangValue::Lang(common_lang_dir),
					});
				}
				Some(Ref::Node(node)) if node.is_graph() => {
					if has_index {
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Index]));
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Index, ContainerKind::Set]));
					}
					if node.id.is_some() {
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Id]));
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Id, ContainerKind::Set]));
					}
					cs.push(c(&[ContainerKind::Graph]));
					cs.push(c(&[ContainerKind::Graph, ContainerKind::Set]));
					cs.push(c(&[ContainerKind::Set]));
					if !has_index {
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Index]));
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Index, ContainerKind::Set]));
					}
					if node.id.is_none() {
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Id]));
						cs.push(c(&[ContainerKind::Graph, ContainerKind::Id, ContainerKind::Set]));
					}
					cs.push(c(&[ContainerKind::Index]));
					cs.push(c(&[ContainerKind::Index, ContainerKind::Set]));

					type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(Term::Keyword(Keyword::Id))));
				}
				Some(Ref::Value(v)) => {
					if (v.direction().is_some() || v.language().is_some()) && !has_index {
						type_lang_value = Some(TypeLangValue::Lang(Nullable::Some((v.language().cloned(), v.direction()))));
						cs.push(c(&[ContainerKind::Language]));
						cs.push(c(&[ContainerKind::Language, ContainerKind::Set]));
					} else if let Some(ty) = value_type_mapping(v) {
						type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(ty)));
					} else {
						is_simple_value = v.direction().is_none() && v.language().is_none() && !has_index;
					}
					cs.push(c(&[ContainerKind::Set]));
				}
				_ => {
					type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(Term::Keyword(Keyword::Id))));
					cs.push(c(&[ContainerKind::Id]));
					cs.push(c(&[ContainerKind::Id, ContainerKind::Set]));
					cs.push(c(&[ContainerKind::Type]));
					cs.push(c(&[ContainerKind::Set, ContainerKind::Type]));
					cs.push(c(&[ContainerKind::Set]));
				}
			}
		}

		cs.push(Container::new());

		if options.processing_mode != ProcessingMode::JsonLd1_0 && !has_index {
			cs.push(c(&[ContainerKind::Index]));
			cs.push(c(&[ContainerKind::Index, ContainerKind::Set]));
		}

		if options.processing_mode != ProcessingMode::JsonLd1_0 && is_simple_value {
			cs.push(c(&[ContainerKind::Language]));
			cs.push(c(&[ContainerKind::Language, ContainerKind::Set]));
		}

		let is_empty_list = value.is_some_and(|v| matches!(v.inner(), Object::List(l) if l.is_empty()));

		let result = if is_empty_list {
			inverse_context.select(var, &cs, &Selection::Any)
		} else {
			match type_lang_value {
				Some(TypeLangValue::Type(type_value)) => {
					let mut selection: Vec<TypeSelection> = Vec::new();
					if type_value == TypeSelection::Reverse {
						selection.push(TypeSelection::Reverse);
					}

					let mut has_id_type = false;
					if let Some(value) = value {
						if let Some(id) = value.inner().id() {
							if type_value == TypeSelection::Type(Term::Keyword(Keyword::Id)) || type_value == TypeSelection::Reverse {
								has_id_type = true;
								let id_term = id.clone().into_term();
								let mut is_vocab = false;
								if let Some(compacted) = compact_iri(active_context, inverse_context, &id_term, true, false, options)? {
									if let Some(def) = active_context.get(&compacted) {
										if let Some(iri_mapping) = &def.value {
											is_vocab = iri_mapping == &id_term;
										}
									}
								}

								if is_vocab {
									selection.push(TypeSelection::Type(Term::Keyword(Keyword::Vocab)));
									selection.push(TypeSelection::Type(Term::Keyword(Keyword::Id)));
								} else {
									selection.push(TypeSelection::Type(Term::Keyword(Keyword::Id)));
									selection.push(TypeSelection::Type(Term::Keyword(Keyword::Vocab)));
								}
								selection.push(TypeSelection::Type(Term::Keyword(Keyword::None)));
							}
						}
					}

					if !has_id_type {
						selection.push(type_value);
						selection.push(TypeSelection::Type(Term::Keyword(Keyword::None)));
					}

					selection.push(TypeSelection::Any);
					inverse_context.select(var, &cs, &Selection::Type(selection))
				}
				Some(TypeLangValue::Lang(lang_value)) => {
					let tags: Vec<LenientLangTagBuf> = match &lang_value {
						Nullable::Some((Some(tag), _)) => vec![tag.clone()],
						_ => Vec::new(),
					};
					let lang_ref = tags.first();
					let dir = match &lang_value {
						Nullable::Some((_, d)) => *d,
						Nullable::Null => None,
					};

					let mut selection = vec![
						LangSelection::Lang(match &lang_value {
							Nullable::Null => Nullable::Null,
							Nullable::Some(_) => Nullable::Some((lang_ref, dir)),
						}),
						LangSelection::Lang(Nullable::Some((None, None))),
						LangSelection::Any,
					];
					if let Nullable::Some((Some(_), Some(dir))) = &lang_value {
						selection.push(LangSelection::Lang(Nullable::Some((None, Some(*dir)))));
					}
					inverse_context.select(var, &cs, &Selection::Lang(selection))
				}
				None => inverse_context.select(
					var,
					&cs,
					&Selection::Lang(vec![
						LangSelection::Lang(Nullable::Null),
						LangSelection::Lang(Nullable::Some((None, None))),
						LangSelection::Any,
					]),
				),
			}
		};

		if let Some(term) = result {
			return Ok(Some(term.to_string()));
		}
	}

	if vocab {
		if let Some(vocab_mapping) = &active_context.vocab {
			let vocab_str = vocab_mapping.as_str();
			if !vocab_str.is_empty() {
				if let Some(suffix) = var.as_str().strip_prefix(vocab_str) {
					if !suffix.is_empty() && active_context.get(suffix).is_none() {
						return Ok(Some(suffix.to_string()));
					}
				}
			}
		}
	}

	let mut compact_iri_candidate = String::new();
	for (key, definition) in active_context.iter() {
		if !definition.prefix {
			continue;
		}
		let Some(iri_mapping) = &definition.value else {
			continue;
		};
		let Some(suffix) = var.as_str().strip_prefix(iri_mapping.as_str()) else {
			continue;
		};
		if suffix.is_empty() {
			continue;
		}

		let mut candidate = key.clone();
		candidate.push(':');
		candidate.push_str(suffix);

		let candidate_def = active_context.get(&candidate);
		let usable = candidate_def.is_none()
			|| (candidate_def.and_then(|d| d.value.as_ref()).is_some_and(|v| v == var) && value.is_none());

		if (compact_iri_candidate.is_empty() || (candidate.len() <= compact_iri_candidate.len() && candidate < compact_iri_candidate))
			&& usable
		{
			compact_iri_candidate = candidate;
		}
	}

	if !compact_iri_candidate.is_empty() {
		return Ok(Some(compact_iri_candidate));
	}

	if let Some(iri) = var.as_iri() {
		if active_context.contains_term(iri.scheme().as_str()) {
			return Err(Error::new(ErrorCode::IriConfusedWithPrefix));
		}
	}

	if !vocab {
		if let Some(base_iri) = &active_context.base_iri {
			if let Some(iri) = var.as_iri() {
				return Ok(Some(iri.relative_to(base_iri).as_str().to_string()));
			}
		}
	}

	Ok(Some(var.to_string()))
}

fn value_type_mapping(value: &Value) -> Option<Term> {
	match value.typ() {
		Some(crate::object::ValueType::Json) => Some(Term::Keyword(Keyword::Json)),
		Some(crate::object::ValueType::Id(id)) => Some(Term::Id(id)),
		None => None,
	}
}

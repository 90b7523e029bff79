//! Inverse Context (spec §4.3 "Inverse Context Creation"): built once per
//! active context and consulted by IRI compaction to pick the best term
//! alias for a given IRI, given the container/type/language shape of the
//! value it's attached to.
use super::{ActiveContext, TermDefinition};
use crate::syntax::Container;
use crate::{Direction, Keyword, LenientLangTagBuf, Nullable, Term};
use std::cmp::Ordering;
use std::collections::HashMap;

/// What to prefer when selecting among terms that share a container: a
/// reverse property, a specific type mapping, or "whichever, as long as a
/// type-mapped term exists at all" (spec §4.3 step "If type/language is
/// null" fallbacks).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeSelection {
	Reverse,
	Any,
	Type(Term),
}

struct InverseType {
	reverse: Option<String>,
	any: Option<String>,
	map: HashMap<Term, String>,
}

impl InverseType {
	fn select(&self, selection: &TypeSelection) -> Option<&str> {
		match selection {
			TypeSelection::Reverse => self.reverse.as_deref(),
			TypeSelection::Any => self.any.as_deref(),
			TypeSelection::Type(ty) => self.map.get(ty).map(String::as_str),
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_string());
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(&Term::Keyword(Keyword::None), term)
	}

	fn set(&mut self, ty: &Term, term: &str) {
		self.map.entry(ty.clone()).or_insert_with(|| term.to_string());
	}
}

type LangDir = Nullable<(Option<LenientLangTagBuf>, Option<Direction>)>;

struct InverseLang {
	any: Option<String>,
	map: HashMap<LangDir, String>,
}

/// Same shape as [`TypeSelection`] but for the language/direction axis
/// (spec §4.3 "Otherwise, if value has an `@language` entry").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LangSelection<'a> {
	Any,
	Lang(Nullable<(Option<&'a LenientLangTagBuf>, Option<Direction>)>),
}

impl InverseLang {
	fn select(&self, selection: LangSelection<'_>) -> Option<&str> {
		match selection {
			LangSelection::Any => self.any.as_deref(),
			LangSelection::Lang(lang_dir) => {
				let lang_dir = lang_dir.map(|(l, d)| (l.cloned(), d));
				self.map.get(&lang_dir).map(String::as_str)
			}
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_string());
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(Nullable::Some((None, None)), term)
	}

	fn set(&mut self, lang_dir: Nullable<(Option<&LenientLangTagBuf>, Option<Direction>)>, term: &str) {
		let lang_dir = lang_dir.map(|(l, d)| (l.cloned(), d));
		self.map.entry(lang_dir).or_insert_with(|| term.to_string());
	}
}

struct InverseContainer {
	language: InverseLang,
	typ: InverseType,
	none: String,
}

impl InverseContainer {
	fn new(term: &str) -> Self {
		Self {
			language: InverseLang {
				any: None,
				map: HashMap::new(),
			},
			typ: InverseType {
				reverse: None,
				any: None,
				map: HashMap::new(),
			},
			none: term.to_string(),
		}
	}
}

/// What a term should be selected to match: no particular shape, a set of
/// acceptable type mappings (tried in order), or a set of acceptable
/// language/direction combinations (tried in order).
#[derive(Debug)]
pub enum Selection<'a> {
	Any,
	Type(Vec<TypeSelection>),
	Lang(Vec<LangSelection<'a>>),
}

struct InverseDefinition {
	map: HashMap<Container, InverseContainer>,
}

impl InverseDefinition {
	fn new() -> Self {
		Self { map: HashMap::new() }
	}

	fn reference_mut(&mut self, container: &Container, insert: impl FnOnce() -> InverseContainer) -> &mut InverseContainer {
		if !self.map.contains_key(container) {
			self.map.insert(container.clone(), insert());
		}
		self.map.get_mut(container).unwrap()
	}

	fn select(&self, containers: &[Container], selection: &Selection) -> Option<&str> {
		for container in containers {
			if let Some(entry) = self.map.get(container) {
				match selection {
					Selection::Any => return Some(entry.none.as_str()),
					Selection::Type(preferred) => {
						for item in preferred {
							if let Some(term) = entry.typ.select(item) {
								return Some(term);
							}
						}
					}
					Selection::Lang(preferred) => {
						for item in preferred {
							if let Some(term) = entry.language.select(*item) {
								return Some(term);
							}
						}
					}
				}
			}
		}
		None
	}
}

/// The inverse context: `Term -> Container -> Selection -> best term`,
/// built once from an [`ActiveContext`] and reused for every IRI
/// compaction call made against that context.
pub struct InverseContext {
	map: HashMap<Term, InverseDefinition>,
}

impl InverseContext {
	pub fn contains(&self, var: &Term) -> bool {
		self.map.contains_key(var)
	}

	pub fn select(&self, var: &Term, containers: &[Container], selection: &Selection) -> Option<&str> {
		self.map.get(var).and_then(|def| def.select(containers, selection))
	}
}

impl From<&ActiveContext> for InverseContext {
	fn from(context: &ActiveContext) -> Self {
		let mut result = InverseContext { map: HashMap::new() };

		let mut definitions: Vec<(&str, &TermDefinition)> = context.iter().map(|(k, v)| (k.as_str(), v)).collect();
		definitions.sort_by(|(a, _), (b, _)| {
			let ord = a.len().cmp(&b.len());
			if ord == Ordering::Equal {
				a.cmp(b)
			} else {
				ord
			}
		});

		for (term, definition) in definitions {
			let Some(var) = definition.value.as_ref() else {
				continue;
			};
			if var.is_null() {
				continue;
			}

			let container_map = result.map.entry(var.clone()).or_insert_with(InverseDefinition::new);
			let entry = container_map.reference_mut(&definition.container, || InverseContainer::new(term));

			if definition.reverse_property {
				if entry.typ.reverse.is_none() {
					entry.typ.reverse = Some(term.to_string());
				}
				continue;
			}

			match &definition.typ {
				Some(Term::Keyword(Keyword::None)) => {
					entry.typ.set_any(term);
					entry.language.set_any(term);
				}
				Some(typ) => entry.typ.set(typ, term),
				None => match (&definition.language, &definition.direction) {
					(Some(language), Some(direction)) => match (language, direction) {
						(Nullable::Some(language), Nullable::Some(direction)) => {
							entry.language.set(Nullable::Some((Some(language), Some(*direction))), term)
						}
						(Nullable::Some(language), Nullable::Null) => {
							entry.language.set(Nullable::Some((Some(language), None)), term)
						}
						(Nullable::Null, Nullable::Some(direction)) => {
							entry.language.set(Nullable::Some((None, Some(*direction))), term)
						}
						(Nullable::Null, Nullable::Null) => entry.language.set(Nullable::Null, term),
					},
					(Some(language), None) => match language {
						Nullable::Some(language) => entry.language.set(Nullable::Some((Some(language), None)), term),
						Nullable::Null => entry.language.set(Nullable::Null, term),
					},
					(None, Some(direction)) => match direction {
						Nullable::Some(direction) => entry.language.set(Nullable::Some((None, Some(*direction))), term),
						Nullable::Null => entry.language.set(Nullable::Some((None, None)), term),
					},
					(None, None) => {
						entry.language.set(
							Nullable::Some((context.default_language.as_ref(), context.default_base_direction)),
							term,
						);
						entry.language.set_none(term);
						entry.typ.set_none(term);
					}
				},
			}
		}

		result
	}
}

//! Create Term Definition algorithm (spec §4.1).
use super::iri::{expand_iri, DefinedState, DefinedTerms};
use super::{process_context, ActiveContext, ProcessingOptions, ProcessingStack, TermDefinition};
use crate::error::{Error, ErrorCode};
use crate::loader::Loader;
use crate::syntax::{self, ContainerKind, Nullable, TermType};
use crate::warning::{Handler, Warning};
use crate::{Id, ProcessingMode, Term};
use iref::Iri;
use std::sync::Arc;

fn is_gen_delim(c: char) -> bool {
	matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

fn is_gen_delim_or_blank(t: &Term) -> bool {
	match t {
		Term::Id(Id::Blank(_)) => true,
		Term::Id(Id::Iri(iri)) => iri.as_str().chars().last().is_some_and(is_gen_delim),
		_ => false,
	}
}

fn contains_between_boundaries(s: &str, c: char) -> bool {
	match (s.find(c), s.rfind(c)) {
		(Some(i), Some(j)) => i > 0 && j < s.len() - 1,
		_ => false,
	}
}

fn keyword_like(s: &str) -> bool {
	syntax::Keyword::try_from(s).is_ok() || syntax::is_reserved_keyword_form(s)
}

/// Creates (or refreshes) the term definition for `term` in `active_context`
/// out of its raw entry in `local_context`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn create_term_definition<L: Loader, W: Handler>(
	active_context: &mut ActiveContext,
	local_context: &syntax::Definition,
	term: &str,
	defined: &mut DefinedTerms,
	loader: &L,
	warnings: &mut W,
	remote_contexts: ProcessingStack,
	base_url: Option<&Iri>,
	protected: bool,
	options: ProcessingOptions,
) -> Result<(), Error> {
	match defined.get(term) {
		Some(DefinedState::Done) => return Ok(()),
		Some(DefinedState::InProgress) => return Err(Error::new(ErrorCode::CyclicIriMapping)),
		None => {
			defined.insert(term.to_string(), DefinedState::InProgress);
		}
	}

	if term.is_empty() {
		return Err(Error::new(ErrorCode::InvalidTermDefinition));
	}

	let Some(raw) = local_context.get(term) else {
		defined.insert(term.to_string(), DefinedState::Done);
		return Ok(());
	};

	let previous_definition = active_context.get(term).cloned();
	active_context.set(term.to_string(), None);

	let base_url_owned = base_url.map(|i| i.to_owned());

	let raw = match raw {
		Nullable::Null => {
			active_context.set(term.to_string(), None);
			defined.insert(term.to_string(), DefinedState::Done);
			return Ok(());
		}
		Nullable::Some(d) => d,
	};

	let simple_term = !raw.is_expanded();
	let (id, type_, context, reverse, index, language, direction, container, nest, prefix, proto, propagate) =
		match raw {
			syntax::TermDefinition::Simple(s) => (
				Some(Nullable::Some(s.clone())),
				None,
				None,
				None,
				None,
				None,
				None,
				None,
				None,
				None,
				None,
				None,
			),
			syntax::TermDefinition::Expanded(e) => (
				e.id.clone(),
				e.type_.clone(),
				e.context.clone(),
				e.reverse.clone(),
				e.index.clone(),
				e.language.clone(),
				e.direction.clone(),
				e.container.clone(),
				e.nest.clone(),
				e.prefix,
				e.protected,
				e.propagate,
			),
		};

	if propagate.is_some() {
		return Err(Error::new(ErrorCode::InvalidTermDefinition));
	}

	let mut definition = TermDefinition {
		protected,
		..TermDefinition::default()
	};
	if let Some(p) = proto {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		definition.protected = p;
	}

	if let Some(type_) = type_ {
		let type_str = match &type_ {
			Nullable::Null => None,
			Nullable::Some(TermType::Iri(s)) => Some(s.clone()),
			Nullable::Some(TermType::Id) => Some("@id".to_string()),
			Nullable::Some(TermType::Vocab) => Some("@vocab".to_string()),
			Nullable::Some(TermType::Json) => Some("@json".to_string()),
			Nullable::Some(TermType::None) => Some("@none".to_string()),
		};
		if let Some(type_str) = type_str {
			let expanded = Box::pin(expand_iri(
				active_context,
				Some(&type_str),
				false,
				true,
				Some((local_context, defined)),
				loader,
				warnings,
				&remote_contexts,
				options,
			))
			.await?;
			if options.processing_mode == ProcessingMode::JsonLd1_0
				&& matches!(
					expanded,
					Term::Keyword(syntax::Keyword::Json) | Term::Keyword(syntax::Keyword::None)
				) {
				return Err(Error::new(ErrorCode::InvalidTypeMapping));
			}
			match &expanded {
				Term::Keyword(syntax::Keyword::Json)
				| Term::Keyword(syntax::Keyword::None)
				| Term::Keyword(syntax::Keyword::Id)
				| Term::Keyword(syntax::Keyword::Vocab) => definition.typ = Some(expanded),
				Term::Id(id) if id.is_valid() => definition.typ = Some(expanded),
				_ => return Err(Error::new(ErrorCode::InvalidTypeMapping)),
			}
		}
	}

	if let Some(reverse_value) = reverse {
		if id.is_some() || nest.is_some() {
			return Err(Error::new(ErrorCode::InvalidReverseProperty));
		}
		if keyword_like(&reverse_value) {
			warnings.handle(Warning::KeywordLikeValue(reverse_value));
			defined.insert(term.to_string(), DefinedState::Done);
			return Ok(());
		}
		let expanded = Box::pin(expand_iri(
			active_context,
			Some(&reverse_value),
			false,
			true,
			Some((local_context, defined)),
			loader,
			warnings,
			&remote_contexts,
			options,
		))
		.await?;
		match expanded {
			Term::Id(id) if id.is_valid() => definition.value = Some(Term::Id(id)),
			_ => return Err(Error::new(ErrorCode::InvalidIriMapping)),
		}
		if let Some(Nullable::Some(c)) = container.clone() {
			if c.contains(ContainerKind::Set) && c.len() == 1
				|| c.contains(ContainerKind::Index) && c.len() == 1
			{
				definition.container = c;
			} else {
				return Err(Error::new(ErrorCode::InvalidReverseProperty));
			}
		}
		definition.reverse_property = true;
		active_context.set(term.to_string(), Some(definition));
		defined.insert(term.to_string(), DefinedState::Done);
		return Ok(());
	}

	let id_differs_from_term = matches!(&id, Some(Nullable::Some(s)) if s != term);

	match &id {
		Some(id_value) if id_differs_from_term => {
			match id_value {
				Nullable::Null => (),
				Nullable::Some(id_str) => {
					if keyword_like(id_str) && syntax::Keyword::try_from(id_str.as_str()).is_err() {
						warnings.handle(Warning::KeywordLikeValue(id_str.clone()));
						defined.insert(term.to_string(), DefinedState::Done);
						return Ok(());
					}
					let expanded = Box::pin(expand_iri(
						active_context,
						Some(id_str),
						false,
						true,
						Some((local_context, defined)),
						loader,
						warnings,
						&remote_contexts,
						options,
					))
					.await?;
					match &expanded {
						Term::Keyword(syntax::Keyword::Context) => {
							return Err(Error::new(ErrorCode::InvalidKeywordAlias))
						}
						Term::Id(id) if !id.is_valid() => {
							return Err(Error::new(ErrorCode::InvalidIriMapping))
						}
						_ => {}
					}
					definition.value = Some(expanded);

					if contains_between_boundaries(term, ':') || term.contains('/') {
						defined.insert(term.to_string(), DefinedState::Done);
						let expanded_term = Box::pin(expand_iri(
							active_context,
							Some(term),
							false,
							true,
							Some((local_context, defined)),
							loader,
							warnings,
							&remote_contexts,
							options,
						))
						.await?;
						if Some(&expanded_term) != definition.value.as_ref() {
							return Err(Error::new(ErrorCode::InvalidIriMapping));
						}
					}
				}
			}
		}
		// `@id` absent, or equal to `term` verbatim: resolve the IRI mapping
		// from `term` itself (compact IRI, slash-relative, `@type`, vocab).
		_ => {
			if term.starts_with("_:") {
				let blank = rdf_types::BlankIdBuf::new(term.to_string())
					.map_err(|_| Error::new(ErrorCode::InvalidIriMapping))?;
				definition.value = Some(Term::Id(Id::Blank(blank)));
			} else if let Some((prefix, suffix)) = term.split_once(':') {
				if !prefix.is_empty() && !suffix.starts_with("//") {
					if local_context.get(prefix).is_some()
						&& !matches!(defined.get(prefix), Some(DefinedState::Done))
					{
						Box::pin(create_term_definition(
							active_context,
							local_context,
							prefix,
							defined,
							loader,
							warnings,
							remote_contexts.clone(),
							base_url_owned.as_deref(),
							false,
							options.with_no_override(),
						))
						.await?;
					}
					if let Some(prefix_def) = active_context.get(prefix) {
						if let Some(Term::Id(Id::Iri(prefix_iri))) = &prefix_def.value {
							definition.value =
								Some(Term::Id(Id::from_string(format!("{prefix_iri}{suffix}"))));
						}
					}
				}
				if definition.value.is_none() {
					definition.value = Some(Term::Id(Id::from_string(term.to_string())));
				}
			} else if term.contains('/') {
				let expanded = Box::pin(expand_iri(
					active_context,
					Some(term),
					false,
					true,
					None,
					loader,
					warnings,
					&remote_contexts,
					options,
				))
				.await?;
				match expanded {
					Term::Id(Id::Iri(iri)) => definition.value = Some(Term::Id(Id::Iri(iri))),
					_ => return Err(Error::new(ErrorCode::InvalidIriMapping)),
				}
			} else if term == "@type" {
				definition.value = Some(Term::Keyword(syntax::Keyword::Type));
			} else {
				match &active_context.vocab {
					Some(Term::Id(vocab_id)) => {
						let candidate = format!("{}{}", vocab_id.as_str(), term);
						definition.value = Some(Term::Id(Id::from_string(candidate)));
					}
					_ => return Err(Error::new(ErrorCode::InvalidIriMapping)),
				}
			}
		}
	}

	if !term.contains(':')
		&& !term.contains('/')
		&& simple_term
		&& definition.value.as_ref().is_some_and(is_gen_delim_or_blank)
	{
		definition.prefix = true;
	}

	if let Some(container_value) = container {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			match &container_value {
				Nullable::Null => return Err(Error::new(ErrorCode::InvalidContainerMapping)),
				Nullable::Some(c) if c.len() != 1 => {
					return Err(Error::new(ErrorCode::InvalidContainerMapping))
				}
				Nullable::Some(c)
					if c.contains(ContainerKind::Graph)
						|| c.contains(ContainerKind::Id)
						|| c.contains(ContainerKind::Type) =>
				{
					return Err(Error::new(ErrorCode::InvalidContainerMapping))
				}
				_ => {}
			}
		}
		definition.container = container_value.into_option().unwrap_or_default();

		if definition.container.contains(ContainerKind::Type) {
			match &definition.typ {
				Some(Term::Keyword(syntax::Keyword::Id)) | Some(Term::Keyword(syntax::Keyword::Vocab)) => {}
				None => definition.typ = Some(Term::Keyword(syntax::Keyword::Id)),
				_ => return Err(Error::new(ErrorCode::InvalidTypeMapping)),
			}
		}
	}

	if let Some(index_value) = index {
		if !definition.container.contains(ContainerKind::Index)
			|| options.processing_mode == ProcessingMode::JsonLd1_0
		{
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		let expanded = Box::pin(expand_iri(
			active_context,
			Some(&index_value),
			false,
			true,
			None,
			loader,
			warnings,
			&remote_contexts,
			options,
		))
		.await?;
		if !matches!(expanded, Term::Id(Id::Iri(_))) {
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		definition.index = Some(index_value);
	}

	if let Some(scoped_context) = context {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		let mut probe = active_context.clone();
		Box::pin(process_context(
			&mut probe,
			&scoped_context,
			base_url_owned.as_deref(),
			loader,
			warnings,
			remote_contexts.clone(),
			options.with_override(),
		))
		.await
		.map_err(|_| Error::new(ErrorCode::InvalidScopedContext))?;
		definition.context = Some(Arc::new((*scoped_context).clone()));
		definition.base_url = base_url_owned.clone();
	}

	if definition.typ.is_none() {
		if let Some(language_value) = language {
			definition.direction = None;
			match language_value {
				Nullable::Null => definition.language = Some(Nullable::Null),
				Nullable::Some(tag) => definition.language = Some(Nullable::Some(tag)),
			}
		}
		if let Some(direction_value) = direction {
			definition.direction = Some(direction_value);
		}
	}

	if let Some(nest_value) = nest {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		definition.nest = Some(nest_value);
	}

	if let Some(prefix_value) = prefix {
		if term.contains(':') || term.contains('/') || options.processing_mode == ProcessingMode::JsonLd1_0
		{
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
		definition.prefix = prefix_value;
		if definition.prefix && matches!(definition.value, Some(Term::Keyword(_))) {
			return Err(Error::new(ErrorCode::InvalidTermDefinition));
		}
	}

	if !options.override_protected {
		if let Some(previous) = previous_definition {
			if previous.protected {
				if !same_modulo_protected(&definition, &previous) {
					return Err(Error::new(ErrorCode::ProtectedTermRedefinition));
				}
				definition.protected = true;
			}
		}
	}

	active_context.set(term.to_string(), Some(definition));
	defined.insert(term.to_string(), DefinedState::Done);
	Ok(())
}

fn same_modulo_protected(a: &TermDefinition, b: &TermDefinition) -> bool {
	a.value == b.value
		&& a.reverse_property == b.reverse_property
		&& a.typ == b.typ
		&& a.container == b.container
		&& a.language == b.language
		&& a.direction == b.direction
		&& a.index == b.index
		&& a.nest == b.nest
		&& a.prefix == b.prefix
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn differing_type_mapping_is_not_same_modulo_protected() {
		let base = TermDefinition {
			value: Some(Term::Id(Id::Iri(Iri::new("http://example.org/name").unwrap().to_owned()))),
			..Default::default()
		};
		let with_id_type = TermDefinition {
			typ: Some(Term::Keyword(crate::Keyword::Id)),
			..base.clone()
		};
		let with_vocab_type = TermDefinition {
			typ: Some(Term::Keyword(crate::Keyword::Vocab)),
			..base
		};

		assert!(!same_modulo_protected(&with_id_type, &with_vocab_type));
		assert!(same_modulo_protected(&with_id_type, &with_id_type.clone()));
	}
}

//! IRI Expansion algorithm (spec §4.1 "IRI Expansion"). The single most
//! reused primitive in this crate: Expansion, Compaction and Context
//! Processing itself all resolve terms and compact IRIs through this
//! function.
use super::{define::create_term_definition, ActiveContext, ProcessingOptions};
use crate::error::{Error, ErrorCode};
use crate::loader::Loader;
use crate::syntax::{self, is_reserved_keyword_form, Keyword};
use crate::{warning::Handler, Id, Term};
use iref::{Iri, IriBuf, IriRefBuf};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum DefinedState {
	InProgress,
	Done,
}

pub(crate) type DefinedTerms = HashMap<String, DefinedState>;

/// Resolves a string that may be a keyword, a term, a compact IRI, a blank
/// node identifier, or an absolute/relative IRI, into a [`Term`].
///
/// `local_context`/`defined` are `Some` only while this call is itself part
/// of processing a local context (spec step "if `local context` is not
/// null..."); ordinary Expansion/Compaction calls pass `None`.
#[allow(clippy::too_many_arguments)]
pub async fn expand_iri<L: Loader, W: Handler>(
	active_context: &mut ActiveContext,
	value: Option<&str>,
	document_relative: bool,
	vocab: bool,
	local_context: Option<(&syntax::Definition, &mut DefinedTerms)>,
	loader: &L,
	warnings: &mut W,
	remote_contexts: &super::ProcessingStack,
	options: ProcessingOptions,
) -> Result<Term, Error> {
	let Some(value) = value else {
		return Ok(Term::Null);
	};

	if let Ok(keyword) = Keyword::try_from(value) {
		return Ok(Term::Keyword(keyword));
	}

	if is_reserved_keyword_form(value) {
		return Ok(Term::Null);
	}

	if let Some((local_def, defined)) = local_context {
		if local_def.bindings.contains_key(value)
			&& !matches!(defined.get(value), Some(DefinedState::Done))
		{
			Box::pin(create_term_definition(
				active_context,
				local_def,
				value,
				defined,
				loader,
				warnings,
				remote_contexts.clone(),
				None,
				false,
				options.with_no_override(),
			))
			.await?;
		}
	}

	if let Some(def) = active_context.get(value) {
		if let Some(Term::Keyword(k)) = &def.value {
			return Ok(Term::Keyword(*k));
		}
		if vocab {
			return Ok(def.value.clone().unwrap_or(Term::Null));
		}
	}

	if let Some((prefix, suffix)) = value.split_once(':') {
		if prefix == "_" || suffix.starts_with("//") {
			return Ok(classify_iri_like(value));
		}

		if let Some(def) = active_context.get(prefix).cloned() {
			if def.prefix {
				if let Some(Term::Id(Id::Iri(base))) = &def.value {
					return Ok(classify_iri_like(&format!("{base}{suffix}")));
				}
			}
		}

		if Iri::new(value).is_ok() {
			return Ok(classify_iri_like(value));
		}
	}

	if vocab {
		if let Some(Term::Id(id)) = &active_context.vocab {
			return Ok(classify_iri_like(&format!("{}{}", id.as_str(), value)));
		}
		if active_context.vocab.is_some() {
			return Err(Error::new(ErrorCode::InvalidVocabMapping));
		}
	}

	if document_relative {
		let base = active_context.base_iri.as_ref();
		return Ok(resolve_relative(value, base));
	}

	Ok(Term::Id(Id::from_string(value.to_string())))
}

/// Convenience wrapper around [`expand_iri`] for Expansion and Compaction,
/// which never carry a local context of their own and so never trigger
/// on-demand term definition: the mutable borrow `expand_iri` needs for that
/// case is confined to a throwaway clone.
pub async fn expand_iri_simple<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	value: Option<&str>,
	document_relative: bool,
	vocab: bool,
	loader: &L,
	warnings: &mut W,
	options: ProcessingOptions,
) -> Result<Term, Error> {
	let mut ctx = active_context.clone();
	expand_iri(
		&mut ctx,
		value,
		document_relative,
		vocab,
		None,
		loader,
		warnings,
		&super::ProcessingStack::new(),
		options,
	)
	.await
}

fn classify_iri_like(s: &str) -> Term {
	Term::Id(Id::from_string(s.to_string()))
}

fn resolve_relative(value: &str, base: Option<&IriBuf>) -> Term {
	match (IriRefBuf::new(value.to_string()), base) {
		(Ok(iri_ref), Some(base)) => Term::Id(Id::Iri(iri_ref.resolved(base.as_iri()))),
		(Ok(iri_ref), None) => {
			if let Some(iri) = iri_ref.as_iri() {
				Term::Id(Id::Iri(iri.to_owned()))
			} else {
				Term::Id(Id::Invalid(value.to_string()))
			}
		}
		(Err(_), _) => Term::Id(Id::Invalid(value.to_string())),
	}
}

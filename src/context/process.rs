//! Context Processing algorithm (spec §4.1 "Context Processing Algorithm").
//! Turns a raw `@context` value into an [`ActiveContext`], following remote
//! references, merging `@import`, and defining every term it binds.
use super::define::create_term_definition;
use super::iri::DefinedTerms;
use super::{ActiveContext, ProcessingOptions, ProcessingStack};
use crate::error::{Error, ErrorCode};
use crate::loader::Loader;
use crate::syntax;
use crate::warning::Handler;
use crate::{Id, ProcessingMode, Term};
use iref::{Iri, IriBuf, IriRefBuf};

fn resolve_iri_ref(value: &str, base: Option<&IriBuf>) -> Result<IriBuf, Error> {
	match (IriRefBuf::new(value.to_string()), base) {
		(Ok(iri_ref), Some(base)) => Ok(iri_ref.resolved(base.as_iri())),
		(Ok(iri_ref), None) => iri_ref
			.as_iri()
			.map(|i| i.to_owned())
			.ok_or_else(|| Error::new(ErrorCode::LoadingDocumentFailed)),
		(Err(_), _) => Err(Error::new(ErrorCode::LoadingDocumentFailed)),
	}
}

/// Merges an `@import`ed context definition with the context that imports
/// it: the importing context's own entries take precedence (spec §4.1
/// step "set context to the result of merging context into import
/// context, replacing common entries with those from context").
fn merge_import(context: &syntax::Definition, import: syntax::Definition) -> syntax::Definition {
	let mut merged = import;
	if context.base.is_some() {
		merged.base = context.base.clone();
	}
	if context.language.is_some() {
		merged.language = context.language.clone();
	}
	if context.direction.is_some() {
		merged.direction = context.direction.clone();
	}
	if context.propagate.is_some() {
		merged.propagate = context.propagate;
	}
	if context.protected.is_some() {
		merged.protected = context.protected;
	}
	if context.type_container_set.is_some() {
		merged.type_container_set = context.type_container_set;
	}
	if context.version.is_some() {
		merged.version = context.version;
	}
	if context.vocab.is_some() {
		merged.vocab = context.vocab.clone();
	}
	for (key, value) in context.iter() {
		merged.bindings.insert(key.clone(), value.clone());
	}
	merged
}

async fn load_remote_context<L: Loader>(
	loader: &L,
	url: &Iri,
) -> Result<syntax::Context, Error> {
	if let Some(preloaded) = super::registry::lookup(url) {
		return Ok(preloaded);
	}

	let document = loader
		.load(url)
		.await
		.map_err(|_| Error::new(ErrorCode::LoadingRemoteContextFailed))?
		.into_document();
	let object = document
		.as_object()
		.ok_or_else(|| Error::new(ErrorCode::InvalidRemoteContext))?;
	let entry = object
		.get("@context")
		.ok_or_else(|| Error::new(ErrorCode::InvalidRemoteContext))?;
	syntax::Context::from_json(entry)
}

/// Processes `local_context` against `active_context`, returning the new
/// active context (spec §4.1). `remote_contexts` tracks the chain of
/// already-dereferenced URLs for loop/overflow detection and `base_url` is
/// the IRI `local_context` itself was retrieved from, if any.
#[allow(clippy::too_many_arguments)]
pub async fn process_context<L: Loader, W: Handler>(
	active_context: &ActiveContext,
	local_context: &syntax::Context,
	base_url: Option<&Iri>,
	loader: &L,
	warnings: &mut W,
	mut remote_contexts: ProcessingStack,
	mut options: ProcessingOptions,
) -> Result<ActiveContext, Error> {
	let mut result = active_context.clone();

	if let syntax::Context::One(syntax::ContextEntry::Definition(def)) = local_context {
		if let Some(propagate) = def.propagate {
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::new(ErrorCode::InvalidContextEntry));
			}
			options.propagate = propagate;
		}
	}

	if !options.propagate && result.previous_context.is_none() {
		result.previous_context = Some(Box::new(active_context.clone()));
	}

	for entry in local_context.iter() {
		match entry {
			syntax::ContextEntry::Null => {
				if !options.override_protected && result.has_protected_terms() {
					return Err(Error::new(ErrorCode::InvalidContextNullification));
				}
				let previous_result = result;
				result = ActiveContext::new(active_context.original_base_url.clone());
				if !options.propagate {
					result.previous_context = Some(Box::new(previous_result));
				}
			}

			syntax::ContextEntry::IriRef(iri_ref) => {
				let context_iri = resolve_iri_ref(iri_ref, base_url.map(|i| i.to_owned()).as_ref())
					.map_err(|_| Error::new(ErrorCode::LoadingDocumentFailed))?;

				if remote_contexts.len() >= super::MAX_REMOTE_CONTEXTS {
					return Err(Error::new(ErrorCode::ContextOverflow));
				}
				if remote_contexts.cycle(context_iri.as_iri()) {
					return Err(Error::new(ErrorCode::ContextOverflow));
				}
				remote_contexts = remote_contexts.push(context_iri.clone());

				let loaded_context = load_remote_context(loader, context_iri.as_iri()).await?;

				let nested_options = ProcessingOptions {
					processing_mode: options.processing_mode,
					override_protected: false,
					propagate: true,
				};

				result = Box::pin(process_context(
					&result,
					&loaded_context,
					Some(context_iri.as_iri()),
					loader,
					warnings,
					remote_contexts.clone(),
					nested_options,
				))
				.await?;
			}

			syntax::ContextEntry::Definition(context) => {
				if context.version.is_some() && options.processing_mode == ProcessingMode::JsonLd1_0 {
					return Err(Error::new(ErrorCode::ProcessingModeConflict));
				}

				let context = match &context.import {
					Some(import_value) => {
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							return Err(Error::new(ErrorCode::InvalidContextEntry));
						}
						let import_iri = resolve_iri_ref(import_value, base_url.map(|i| i.to_owned()).as_ref())
							.map_err(|_| Error::new(ErrorCode::InvalidImportValue))?;
						let imported = load_remote_context(loader, import_iri.as_iri())
							.await
							.map_err(|_| Error::new(ErrorCode::LoadingRemoteContextFailed))?;
						let imported_def = match imported {
							syntax::Context::One(syntax::ContextEntry::Definition(d)) => {
								if d.import.is_some() {
									return Err(Error::new(ErrorCode::InvalidContextEntry));
								}
								d
							}
							_ => return Err(Error::new(ErrorCode::InvalidRemoteContext)),
						};
						merge_import(context, imported_def)
					}
					None => context.clone(),
				};

				if remote_contexts.is_empty() {
					if let Some(value) = &context.base {
						match value {
							syntax::Nullable::Null => result.base_iri = None,
							syntax::Nullable::Some(iri_ref) => {
								let resolved = resolve_iri_ref(iri_ref, result.base_iri.as_ref())
									.map_err(|_| Error::new(ErrorCode::InvalidBaseIri))?;
								result.base_iri = Some(resolved);
							}
						}
					}
				}

				if let Some(value) = &context.vocab {
					match value {
						syntax::Nullable::Null => result.vocab = None,
						syntax::Nullable::Some(value) => {
							if value.starts_with("_:") {
								result.vocab = Some(Term::Id(Id::from_string(value.clone())));
							} else {
								let expanded = Box::pin(super::expand_iri(
									&mut result,
									Some(value.as_str()),
									true,
									true,
									None,
									loader,
									warnings,
									&remote_contexts,
									options,
								))
								.await?;
								match expanded {
									Term::Id(id) => result.vocab = Some(Term::Id(id)),
									_ => return Err(Error::new(ErrorCode::InvalidVocabMapping)),
								}
							}
						}
					}
				}

				if let Some(value) = &context.language {
					match value {
						syntax::Nullable::Null => result.default_language = None,
						syntax::Nullable::Some(tag) => result.default_language = Some(tag.clone()),
					}
				}

				if let Some(value) = &context.direction {
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::new(ErrorCode::InvalidContextEntry));
					}
					match value {
						syntax::Nullable::Null => result.default_base_direction = None,
						syntax::Nullable::Some(dir) => result.default_base_direction = Some(*dir),
					}
				}

				let mut defined = DefinedTerms::new();
				let protected = context.protected.unwrap_or(false);

				if context.type_container_set.is_some() {
					defined.insert("@type".to_string(), super::iri::DefinedState::Done);
					let mut type_def = super::TermDefinition {
						protected,
						container: syntax::Container::one(syntax::ContainerKind::Set),
						..super::TermDefinition::default()
					};
					type_def.value = Some(Term::Keyword(syntax::Keyword::Type));
					result.set("@type".to_string(), Some(type_def));
				}

				for (key, _) in context.iter() {
					create_term_definition(
						&mut result,
						&context,
						key,
						&mut defined,
						loader,
						warnings,
						remote_contexts.clone(),
						base_url,
						protected,
						options,
					)
					.await?;
				}
			}
		}
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::{clear_preloaded_contexts, preload_context};
	use crate::loader::NoLoader;
	use static_iref::iri;

	#[tokio::test]
	async fn preloaded_context_bypasses_the_loader() {
		clear_preloaded_contexts();
		let context_iri = iri!("https://example.org/preloaded.jsonld");
		preload_context(
			context_iri.to_owned(),
			syntax::Context::from_json(&crate::json::parse_str(r#"{"name": "http://schema.org/name"}"#).unwrap()).unwrap(),
		);

		let local_context = syntax::Context::from_json(&crate::json::parse_str(r#""https://example.org/preloaded.jsonld""#).unwrap()).unwrap();
		let active_context = ActiveContext::new(None);
		let result = process_context(&active_context, &local_context, None, &NoLoader, &mut (), ProcessingStack::new(), ProcessingOptions::default())
			.await
			.unwrap();

		assert!(result.get("name").is_some());
		clear_preloaded_contexts();
	}
}

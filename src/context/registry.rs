//! Preloaded-context registry (spec §5 "Shared resources"): a process-wide
//! cache of remote context documents an application has registered ahead of
//! time, consulted before falling back to the [`Loader`](crate::loader::Loader),
//! mirroring the teacher's static-map loader for well-known vocabularies.
use crate::syntax;
use iref::{Iri, IriBuf};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

static PRELOADED: Lazy<RwLock<HashMap<IriBuf, syntax::Context>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `context` as the content of `iri`'s remote `@context`, so
/// later processing of a document referencing `iri` skips the loader
/// entirely. Overwrites any context already registered under `iri`.
pub fn preload_context(iri: IriBuf, context: syntax::Context) {
	PRELOADED.write().expect("preloaded-context registry poisoned").insert(iri, context);
}

/// Removes every preloaded context. Mostly useful for tests that need a
/// clean registry.
pub fn clear_preloaded_contexts() {
	PRELOADED.write().expect("preloaded-context registry poisoned").clear();
}

pub(crate) fn lookup(iri: &Iri) -> Option<syntax::Context> {
	PRELOADED.read().expect("preloaded-context registry poisoned").get(iri).cloned()
}

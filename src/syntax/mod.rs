//! The raw JSON-LD syntax layer: keywords, containers, and the unresolved
//! `@context` grammar, as they appear in a document before context
//! processing or expansion interprets them (spec §3, §4.1).
pub mod container;
pub mod context;
pub mod definition;
mod from_json;
pub mod keyword;
pub mod nullable;
pub mod term_definition;

pub use container::{Container, ContainerKind};
pub use context::{Context, ContextEntry};
pub use definition::{Definition, Version1_1};
pub use keyword::{is_reserved_keyword_form, Keyword, NotAKeyword};
pub use nullable::Nullable;
pub use term_definition::{ExpandedTermDefinition, TermDefinition, TermType};

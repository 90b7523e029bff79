//! The raw `@context` value: a single entry or an array of entries (spec
//! §4.1 "if the local context is an array, process each entry in order").
use super::Definition;

#[derive(Clone, PartialEq, Debug)]
pub enum ContextEntry {
	Null,
	IriRef(String),
	Definition(Definition),
}

impl ContextEntry {
	pub fn is_object(&self) -> bool {
		matches!(self, Self::Definition(_))
	}
}

#[derive(Clone, PartialEq, Debug)]
pub enum Context {
	One(ContextEntry),
	Many(Vec<ContextEntry>),
}

impl Default for Context {
	fn default() -> Self {
		Self::Many(Vec::new())
	}
}

impl Context {
	pub fn one(entry: ContextEntry) -> Self {
		Self::One(entry)
	}

	pub fn null() -> Self {
		Self::one(ContextEntry::Null)
	}

	pub fn len(&self) -> usize {
		match self {
			Self::One(_) => 1,
			Self::Many(l) => l.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Many(l) if l.is_empty())
	}

	pub fn as_slice(&self) -> &[ContextEntry] {
		match self {
			Self::One(c) => std::slice::from_ref(c),
			Self::Many(list) => list,
		}
	}

	pub fn iter(&self) -> std::slice::Iter<'_, ContextEntry> {
		self.as_slice().iter()
	}
}

impl From<ContextEntry> for Context {
	fn from(c: ContextEntry) -> Self {
		Self::One(c)
	}
}

impl From<Definition> for Context {
	fn from(d: Definition) -> Self {
		Self::One(ContextEntry::Definition(d))
	}
}

impl<'a> IntoIterator for &'a Context {
	type Item = &'a ContextEntry;
	type IntoIter = std::slice::Iter<'a, ContextEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

use super::IndexedObject;

/// A list object (spec §3 "List object"): `{@list: [...]}`. Spec invariant:
/// a list's entries never contain a nested list object ("list of lists" is
/// rejected by To-RDF expansion, spec §4.2).
#[derive(Clone, PartialEq, Debug, Default)]
pub struct List(Vec<IndexedObject>);

impl List {
	pub fn new(items: Vec<IndexedObject>) -> Self {
		Self(items)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, IndexedObject> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn into_vec(self) -> Vec<IndexedObject> {
		self.0
	}

	pub fn as_slice(&self) -> &[IndexedObject] {
		&self.0
	}
}

impl FromIterator<IndexedObject> for List {
	fn from_iter<I: IntoIterator<Item = IndexedObject>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for List {
	type Item = IndexedObject;
	type IntoIter = std::vec::IntoIter<IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

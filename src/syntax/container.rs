//! Container mappings (`@container`).
use crate::Keyword;
use std::convert::TryFrom;

/// A single container kind that a term's `@container` mapping may hold.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
	#[cfg_attr(feature = "serde", serde(rename = "@graph"))]
	Graph,
	#[cfg_attr(feature = "serde", serde(rename = "@id"))]
	Id,
	#[cfg_attr(feature = "serde", serde(rename = "@index"))]
	Index,
	#[cfg_attr(feature = "serde", serde(rename = "@language"))]
	Language,
	#[cfg_attr(feature = "serde", serde(rename = "@list"))]
	List,
	#[cfg_attr(feature = "serde", serde(rename = "@set"))]
	Set,
	#[cfg_attr(feature = "serde", serde(rename = "@type"))]
	Type,
}

impl ContainerKind {
	pub fn keyword(&self) -> Keyword {
		match self {
			Self::Graph => Keyword::Graph,
			Self::Id => Keyword::Id,
			Self::Index => Keyword::Index,
			Self::Language => Keyword::Language,
			Self::List => Keyword::List,
			Self::Set => Keyword::Set,
			Self::Type => Keyword::Type,
		}
	}

	pub fn as_str(&self) -> &'static str {
		self.keyword().into_str()
	}
}

impl<'a> TryFrom<&'a str> for ContainerKind {
	type Error = &'a str;

	fn try_from(s: &'a str) -> Result<Self, &'a str> {
		use ContainerKind::*;
		match s {
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@index" => Ok(Index),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			_ => Err(s),
		}
	}
}

/// The `@container` value of a term definition: either a single kind or a
/// validated combination (spec §3 `container_mapping`: `@graph` may combine
/// with `@id` or `@index`, either of which may further combine with `@set`).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container(Vec<ContainerKind>);

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn one(kind: ContainerKind) -> Self {
		Self(vec![kind])
	}

	pub fn contains(&self, kind: ContainerKind) -> bool {
		self.0.contains(&kind)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = ContainerKind> + '_ {
		self.0.iter().copied()
	}

	/// Validates and constructs a container mapping from a set of kinds
	/// parsed out of a `@container` value (order-insensitive per spec §3).
	///
	/// Valid combinations: any single kind; `{@set, X}` for any `X != @set`;
	/// `{@graph, @id}`, `{@graph, @index}`, `{@graph, @id, @set}`,
	/// `{@graph, @index, @set}`.
	pub fn validate(kinds: Vec<ContainerKind>) -> Result<Self, Vec<ContainerKind>> {
		use ContainerKind::*;
		let mut sorted = kinds.clone();
		sorted.sort();
		sorted.dedup();
		let ok = match sorted.as_slice() {
			[] => true,
			[_] => true,
			[Graph, Id] | [Graph, Index] => true,
			[Graph, Id, Set] | [Graph, Index, Set] => true,
			[a, Set] if *a != Set => true,
			_ => false,
		};
		if ok {
			Ok(Self(sorted))
		} else {
			Err(kinds)
		}
	}
}

impl FromIterator<ContainerKind> for Container {
	fn from_iter<I: IntoIterator<Item = ContainerKind>>(iter: I) -> Self {
		let mut v: Vec<_> = iter.into_iter().collect();
		v.sort();
		v.dedup();
		Self(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_graph_id_set_combination() {
		assert!(Container::validate(vec![ContainerKind::Graph, ContainerKind::Id, ContainerKind::Set]).is_ok());
	}

	#[test]
	fn rejects_list_set_combination() {
		assert!(Container::validate(vec![ContainerKind::List, ContainerKind::Set]).is_err());
	}

	#[test]
	fn rejects_id_and_language_combination() {
		assert!(Container::validate(vec![ContainerKind::Id, ContainerKind::Language]).is_err());
	}
}

//! Nodes, lists and values: the three shapes an expanded JSON-LD entity can
//! take (spec §3).
use crate::{Id, Indexed, LenientLangTagBuf};

pub mod list;
pub mod node;
pub mod value;

pub use list::List;
pub use node::{Graph, IndexedNode, Node, Properties, ReverseProperties};
pub use value::{LangString, Literal, Value};

/// Any of the three expanded object shapes.
#[derive(Clone, PartialEq, Debug)]
pub enum Object {
	Value(Value),
	Node(Node),
	List(List),
}

pub type IndexedObject = Indexed<Object>;
pub type Objects = Vec<IndexedObject>;

impl Object {
	pub fn as_ref(&self) -> Ref<'_> {
		match self {
			Self::Value(v) => Ref::Value(v),
			Self::Node(n) => Ref::Node(n),
			Self::List(l) => Ref::List(l),
		}
	}

	pub fn id(&self) -> Option<&Id> {
		match self {
			Self::Node(n) => n.id.as_ref(),
			_ => None,
		}
	}

	pub fn language(&self) -> Option<&LenientLangTagBuf> {
		match self {
			Self::Value(v) => v.language(),
			_ => None,
		}
	}

	pub fn is_value(&self) -> bool {
		matches!(self, Self::Value(_))
	}

	pub fn is_node(&self) -> bool {
		matches!(self, Self::Node(_))
	}

	pub fn is_list(&self) -> bool {
		matches!(self, Self::List(_))
	}

	pub fn is_graph(&self) -> bool {
		matches!(self, Self::Node(n) if n.is_graph())
	}

	pub fn as_node(&self) -> Option<&Node> {
		match self {
			Self::Node(n) => Some(n),
			_ => None,
		}
	}

	pub fn as_node_mut(&mut self) -> Option<&mut Node> {
		match self {
			Self::Node(n) => Some(n),
			_ => None,
		}
	}

	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&List> {
		match self {
			Self::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn into_node(self) -> Option<Node> {
		match self {
			Self::Node(n) => Some(n),
			_ => None,
		}
	}
}

pub enum Ref<'a> {
	Value(&'a Value),
	Node(&'a Node),
	List(&'a List),
}

impl From<Node> for Object {
	fn from(n: Node) -> Self {
		Self::Node(n)
	}
}

impl From<Value> for Object {
	fn from(v: Value) -> Self {
		Self::Value(v)
	}
}

impl From<List> for Object {
	fn from(l: List) -> Self {
		Self::List(l)
	}
}

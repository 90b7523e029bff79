//! Loop detection for remote `@context` resolution (spec §4.1 "load remote
//! context" note on infinite reference loops).
use iref::{Iri, IriBuf};
use std::sync::Arc;

struct Node {
	previous: Option<Arc<Node>>,
	url: IriBuf,
}

impl Node {
	fn contains(&self, url: &Iri) -> bool {
		self.url.as_iri() == url || self.previous.as_ref().is_some_and(|p| p.contains(url))
	}
}

/// The chain of remote context URLs loaded so far along the current
/// processing path.
#[derive(Clone, Default)]
pub struct ProcessingStack {
	head: Option<Arc<Node>>,
}

impl ProcessingStack {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	pub fn len(&self) -> usize {
		let mut n = 0;
		let mut cur = &self.head;
		while let Some(node) = cur {
			n += 1;
			cur = &node.previous;
		}
		n
	}

	pub fn cycle(&self, url: &Iri) -> bool {
		self.head.as_ref().is_some_and(|n| n.contains(url))
	}

	pub fn push(&self, url: IriBuf) -> Self {
		Self {
			head: Some(Arc::new(Node {
				previous: self.head.clone(),
				url,
			})),
		}
	}
}

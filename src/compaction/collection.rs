//! Compacts a run of sibling expanded objects into either a bare value or a
//! JSON array, depending on `compactArrays` and the active property's
//! container mapping (spec §4.3 "Compaction Algorithm" step that folds a
//! one-element result array back down to its element).
use super::{compact_indexed_fragment, Compactor};
use crate::context::InverseContext;
use crate::error::Error;
use crate::json;
use crate::loader::Loader;
use crate::object::IndexedObject;
use crate::syntax::ContainerKind;
use crate::warning::Handler;

pub(crate) async fn compact_collection_with<'a, L: Loader, W: Handler>(
	compactor: Compactor<'a>,
	inverse_context: &InverseContext,
	items: impl Iterator<Item = &'a IndexedObject>,
	loader: &L,
	warnings: &mut W,
) -> Result<json::Value, Error> {
	let mut result = Vec::new();

	for item in items {
		let compacted_item =
			Box::pin(compact_indexed_fragment(compactor, inverse_context, item, loader, warnings)).await?;

		if !compacted_item.is_null() {
			result.push(compacted_item);
		}
	}

	let mut list_or_set = false;
	if let Some(active_property) = compactor.active_property {
		if let Some(def) = compactor.active_context.get(active_property) {
			list_or_set = def.container.contains(ContainerKind::List) || def.container.contains(ContainerKind::Set);
		}
	}

	if result.is_empty()
		|| result.len() > 1
		|| !compactor.options.compact_arrays
		|| compactor.active_property == Some("@graph")
		|| compactor.active_property == Some("@set")
		|| list_or_set
	{
		return Ok(json::Value::Array(result));
	}

	Ok(result.into_iter().next().unwrap())
}

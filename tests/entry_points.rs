//! End-to-end coverage of the six top-level entry points against small,
//! self-contained documents.
use json_ld::{compact, expand, flatten, frame, from_rdf, to_rdf, JsonLdOptions, MapLoader, NoLoader, RemoteDocumentReference};
use static_iref::iri;

fn person_doc() -> json_ld::json::Value {
	json_ld::json::parse_str(
		r#"{
			"@context": { "name": "http://schema.org/name", "knows": "http://schema.org/knows" },
			"@id": "http://example.org/alice",
			"name": "Alice",
			"knows": { "@id": "http://example.org/bob", "name": "Bob" }
		}"#,
	)
	.unwrap()
}

#[tokio::test]
async fn expand_flattens_nested_nodes_into_separate_objects() {
	let input = person_doc();
	let expanded = expand(&input, None, None, &NoLoader, &mut (), JsonLdOptions::default())
		.await
		.unwrap();
	assert_eq!(expanded.len(), 1);
}

#[tokio::test]
async fn compact_round_trips_a_value_through_the_same_context() {
	let context = json_ld::json::parse_str(r#"{"name": "http://schema.org/name", "knows": "http://schema.org/knows"}"#).unwrap();
	let input = person_doc();
	let compacted = compact(&input, Some(&context), None, &NoLoader, &mut (), JsonLdOptions::default())
		.await
		.unwrap();
	let obj = compacted.as_object().unwrap();
	assert_eq!(obj.get("name").and_then(json_ld::json::Value::as_str), Some("Alice"));
	assert!(obj.get("knows").is_some());
}

#[tokio::test]
async fn flatten_without_a_context_produces_a_flat_node_array() {
	let input = person_doc();
	let flattened = flatten(&input, None, None, &NoLoader, &mut (), JsonLdOptions::default())
		.await
		.unwrap();
	let graph = flattened.as_object().unwrap().get("@graph").and_then(json_ld::json::Value::as_array).unwrap();
	assert_eq!(graph.len(), 2);
}

#[tokio::test]
async fn frame_selects_only_the_node_matching_the_frame_type() {
	let input = json_ld::json::parse_str(
		r#"{
			"@context": {"name": "http://schema.org/name", "@vocab": "http://schema.org/"},
			"@graph": [
				{"@id": "http://example.org/alice", "@type": "Person", "name": "Alice"},
				{"@id": "http://example.org/acme", "@type": "Organization", "name": "Acme"}
			]
		}"#,
	)
	.unwrap();
	let frame_value = json_ld::json::parse_str(
		r#"{
			"@context": {"name": "http://schema.org/name", "@vocab": "http://schema.org/"},
			"@type": "Person"
		}"#,
	)
	.unwrap();

	let mut options = JsonLdOptions::default();
	options.omit_graph = true;
	let framed = frame(&input, &frame_value, None, &NoLoader, &mut (), options).await.unwrap();

	let obj = framed.as_object().unwrap();
	assert_eq!(obj.get("name").and_then(json_ld::json::Value::as_str), Some("Alice"));
}

#[tokio::test]
async fn to_rdf_then_from_rdf_preserves_the_triple_count() {
	let input = person_doc();
	let quads = to_rdf(&input, None, &NoLoader, &mut (), JsonLdOptions::default()).await.unwrap();
	assert_eq!(quads.len(), 3);

	let back = from_rdf(&quads, JsonLdOptions::default());
	assert_eq!(back.len(), 2);
}

#[tokio::test]
async fn expand_resolves_a_remote_context_through_the_loader() {
	let context_iri = iri!("https://example.org/context.jsonld");
	let mut loader = MapLoader::new();
	loader.insert(
		context_iri.to_owned(),
		json_ld::loader::RemoteDocument::new(
			Some(context_iri.to_owned()),
			None,
			json_ld::json::parse_str(r#"{"@context": {"name": "http://schema.org/name"}}"#).unwrap(),
		),
	);

	let input = json_ld::json::parse_str(
		r#"{"@context": "https://example.org/context.jsonld", "@id": "http://example.org/alice", "name": "Alice"}"#,
	)
	.unwrap();

	let expanded = expand(&input, None, None, &loader, &mut (), JsonLdOptions::default()).await.unwrap();
	assert_eq!(expanded.len(), 1);
}

#[tokio::test]
async fn remote_document_reference_loads_through_the_loader() {
	let doc_iri = iri!("https://example.org/doc.jsonld");
	let mut loader = MapLoader::new();
	loader.insert(
		doc_iri.to_owned(),
		json_ld::loader::RemoteDocument::new(Some(doc_iri.to_owned()), None, person_doc()),
	);

	let reference: RemoteDocumentReference = RemoteDocumentReference::Iri(doc_iri.to_owned());
	let loaded = reference.load_with(&loader).await.unwrap();
	assert!(loaded.document.as_object().is_some());
}

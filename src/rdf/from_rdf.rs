//! RDF → Expanded (spec §4.6): groups quads by graph then by subject,
//! reconstructing node/value/list objects.
use super::{FromRdfOptions, Quad, RdfDirection, RdfLiteral, RdfTerm, RDF_FIRST, RDF_JSON, RDF_NIL, RDF_REST, RDF_TYPE, XSD_BOOLEAN, XSD_DOUBLE, XSD_INTEGER, XSD_STRING};
use crate::document::ExpandedDocument;
use crate::object::{LangString, List, Literal, Node, Value};
use crate::{Direction, Id, Indexed, Object};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;

/// Runs RDF → Expanded (spec §4.6) over a flat quad set, reconstructing
/// nodes, lists and value objects and attaching named graphs to the node
/// that carries their `@id`.
pub fn from_rdf(quads: &[Quad], options: FromRdfOptions) -> ExpandedDocument {
	let mut graphs: IndexMap<Option<Id>, Vec<&Quad>> = IndexMap::new();
	for quad in quads {
		graphs.entry(quad.graph.clone()).or_default().push(quad);
	}

	let mut default_nodes = build_graph_nodes(graphs.get(&None).map(|v| v.as_slice()).unwrap_or(&[]), options);

	for (graph_id, triples) in &graphs {
		let Some(graph_id) = graph_id else { continue };
		let nodes = build_graph_nodes(triples, options);
		match default_nodes.iter_mut().find(|object| object.inner().id() == Some(graph_id)) {
			Some(existing) => {
				if let Object::Node(node) = existing.inner_mut() {
					node.graph = Some(nodes);
				}
			}
			None => {
				let mut host = Node::with_id(graph_id.clone());
				host.graph = Some(nodes);
				default_nodes.push(Indexed::new(Object::Node(host), None));
			}
		}
	}

	ExpandedDocument::from_objects(default_nodes)
}

fn build_graph_nodes(triples: &[&Quad], options: FromRdfOptions) -> Vec<crate::object::IndexedObject> {
	let mut by_subject: IndexMap<Id, Vec<(Id, RdfTerm)>> = IndexMap::new();
	for quad in triples {
		by_subject.entry(quad.subject.clone()).or_default().push((quad.predicate.clone(), quad.object.clone()));
	}

	let cells = collect_list_cells(&by_subject);
	let usage = compute_object_usage(triples);
	let consumed: HashSet<Id> = cells.keys().filter(|id| usage.get(*id).copied().unwrap_or(0) == 1).cloned().collect();

	let mut nodes = Vec::new();
	for (subject, properties) in &by_subject {
		if consumed.contains(subject) {
			continue;
		}

		let mut node = Node::with_id(subject.clone());
		for (predicate, object) in properties {
			if predicate.as_str() == RDF_TYPE.as_str() {
				match object {
					RdfTerm::Iri(iri) => {
						node.types.get_or_insert_with(Vec::new).push(Id::Iri(iri.clone()));
						continue;
					}
					RdfTerm::Blank(b) => {
						node.types.get_or_insert_with(Vec::new).push(Id::Blank(b.clone()));
						continue;
					}
					RdfTerm::Literal(_) => {}
				}
			}

			let value = term_to_object(object, &cells, &consumed, options);
			node.properties.insert(predicate.clone(), vec![value]);
		}
		nodes.push(Indexed::new(Object::Node(node), None));
	}
	nodes
}

/// Blank-node subjects whose only properties are `rdf:first`/`rdf:rest`
/// (spec §4.6 "well-formed rdf:first/rdf:rest chains rooted at blank nodes
/// with exactly those two properties").
fn collect_list_cells(by_subject: &IndexMap<Id, Vec<(Id, RdfTerm)>>) -> IndexMap<Id, (RdfTerm, RdfTerm)> {
	let mut cells = IndexMap::new();
	for (subject, properties) in by_subject {
		if !subject.is_blank() || properties.len() != 2 {
			continue;
		}
		let first = properties.iter().find(|(p, _)| p.as_str() == RDF_FIRST.as_str()).map(|(_, o)| o.clone());
		let rest = properties.iter().find(|(p, _)| p.as_str() == RDF_REST.as_str()).map(|(_, o)| o.clone());
		if let (Some(first), Some(rest)) = (first, rest) {
			cells.insert(subject.clone(), (first, rest));
		}
	}
	cells
}

fn compute_object_usage(triples: &[&Quad]) -> HashMap<Id, usize> {
	let mut usage = HashMap::new();
	for quad in triples {
		if let RdfTerm::Blank(b) = &quad.object {
			*usage.entry(Id::Blank(b.clone())).or_insert(0) += 1;
		}
	}
	usage
}

fn term_to_object(term: &RdfTerm, cells: &IndexMap<Id, (RdfTerm, RdfTerm)>, consumed: &HashSet<Id>, options: FromRdfOptions) -> crate::object::IndexedObject {
	match term {
		RdfTerm::Iri(iri) => Indexed::new(Object::Node(Node::with_id(Id::Iri(iri.clone()))), None),
		RdfTerm::Blank(b) => {
			let id = Id::Blank(b.clone());
			if consumed.contains(&id) {
				let items = walk_list(&id, cells, consumed, options);
				Indexed::new(Object::List(items.into_iter().collect::<List>()), None)
			} else {
				Indexed::new(Object::Node(Node::with_id(id)), None)
			}
		}
		RdfTerm::Literal(lit) => Indexed::new(Object::Value(literal_to_value(lit, options)), None),
	}
}

fn walk_list(start: &Id, cells: &IndexMap<Id, (RdfTerm, RdfTerm)>, consumed: &HashSet<Id>, options: FromRdfOptions) -> Vec<crate::object::IndexedObject> {
	let mut items = Vec::new();
	let mut current = start.clone();
	loop {
		let Some((first, rest)) = cells.get(&current) else { break };
		items.push(term_to_object(first, cells, consumed, options));
		match rest {
			RdfTerm::Iri(iri) if iri.as_str() == RDF_NIL.as_str() => break,
			RdfTerm::Blank(b) => {
				let next = Id::Blank(b.clone());
				if !consumed.contains(&next) {
					break;
				}
				current = next;
			}
			_ => break,
		}
	}
	items
}

fn literal_to_value(literal: &RdfLiteral, options: FromRdfOptions) -> Value {
	match literal {
		RdfLiteral::LangString { value, language } => {
			match LangString::new(value.clone(), language.clone(), None) {
				Ok(ls) => Value::LangString(ls),
				Err(s) => Value::Literal(Literal::String(s), None),
			}
		}
		RdfLiteral::Typed { value, datatype } => {
			if datatype.as_str() == RDF_JSON.as_str() {
				return match crate::json::parse_str(value) {
					Ok(parsed) => Value::Json(parsed),
					Err(_) => Value::Literal(Literal::String(value.clone()), Some(Id::Iri(datatype.clone()))),
				};
			}

			if options.rdf_direction == RdfDirection::I18nDatatype {
				if let Some((language, direction)) = parse_i18n_iri(datatype.as_str()) {
					if let Ok(ls) = LangString::new(value.clone(), language, Some(direction)) {
						return Value::LangString(ls);
					}
				}
			}

			if options.use_native_types {
				if datatype.as_str() == XSD_BOOLEAN.as_str() {
					match value.as_str() {
						"true" => return Value::Literal(Literal::Boolean(true), None),
						"false" => return Value::Literal(Literal::Boolean(false), None),
						_ => {}
					}
				} else if (datatype.as_str() == XSD_INTEGER.as_str() || datatype.as_str() == XSD_DOUBLE.as_str()) && value.parse::<f64>().is_ok() {
					return Value::Literal(Literal::Number(crate::json::Number::from_f64(value.parse().unwrap())), None);
				}
			}

			if datatype.as_str() == XSD_STRING.as_str() {
				return Value::Literal(Literal::String(value.clone()), None);
			}

			Value::Literal(Literal::String(value.clone()), Some(Id::Iri(datatype.clone())))
		}
	}
}

fn parse_i18n_iri(iri: &str) -> Option<(Option<crate::LenientLangTagBuf>, Direction)> {
	let suffix = iri.strip_prefix("https://www.w3.org/ns/i18n#")?;
	let (lang, dir) = match suffix.rsplit_once('_') {
		Some((lang, dir)) => (Some(lang.to_string()), dir),
		None => (None, suffix),
	};
	let direction = Direction::try_from(dir).ok()?;
	Some((lang.map(crate::LenientLangTagBuf::new), direction))
}

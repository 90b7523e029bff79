//! The RDF bridge (spec §4.6): converts between an expanded document and a
//! flat list of RDF quads, via a concrete term/quad model rather than a
//! vocabulary-generic one — this crate has no use for interning terms
//! against a shared vocabulary, so `Id` already doubles as the term type.
mod term;

pub use term::{RdfLiteral, RdfTerm};

use crate::document::ExpandedDocument;
use crate::id::BlankIdGenerator;
use crate::object::{List, Node, Value};
use crate::{Direction, Id, IndexedObject, Object};
use once_cell::sync::Lazy;

static RDF_TYPE: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type".to_string()).expect("vocabulary iri is always valid"));
static RDF_FIRST: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#first".to_string()).expect("vocabulary iri is always valid"));
static RDF_REST: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest".to_string()).expect("vocabulary iri is always valid"));
static RDF_NIL: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil".to_string()).expect("vocabulary iri is always valid"));
static RDF_VALUE: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#value".to_string()).expect("vocabulary iri is always valid"));
static RDF_LANGUAGE: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#language".to_string()).expect("vocabulary iri is always valid"));
static RDF_DIRECTION: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#direction".to_string()).expect("vocabulary iri is always valid"));
static RDF_JSON: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON".to_string()).expect("vocabulary iri is always valid"));
static XSD_BOOLEAN: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/2001/XMLSchema#boolean".to_string()).expect("vocabulary iri is always valid"));
static XSD_INTEGER: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/2001/XMLSchema#integer".to_string()).expect("vocabulary iri is always valid"));
static XSD_DOUBLE: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/2001/XMLSchema#double".to_string()).expect("vocabulary iri is always valid"));
static XSD_STRING: Lazy<iref::IriBuf> = Lazy::new(|| iref::IriBuf::new("http://www.w3.org/2001/XMLSchema#string".to_string()).expect("vocabulary iri is always valid"));

/// Which strategy To-RDF uses for a directional language-tagged string
/// (spec §4.6; no single RDF 1.1 datatype carries base direction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RdfDirection {
	/// Encode direction in the datatype IRI, `https://www.w3.org/ns/i18n#{lang}_{dir}`.
	#[default]
	I18nDatatype,
	/// Encode direction as a blank node carrying `rdf:value`/`rdf:language`/`rdf:direction`.
	CompoundLiteral,
}

#[derive(Clone, Copy, Debug)]
pub struct ToRdfOptions {
	pub produce_generalized_rdf: bool,
	pub rdf_direction: RdfDirection,
}

impl Default for ToRdfOptions {
	fn default() -> Self {
		Self {
			produce_generalized_rdf: false,
			rdf_direction: RdfDirection::default(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FromRdfOptions {
	pub use_native_types: bool,
	pub use_rdf_type: bool,
	pub rdf_direction: RdfDirection,
}

/// An RDF quad: subject, predicate, object and an optional graph name
/// (spec §4.6 "Named graphs ... attach a graph component to each contained
/// triple; unnamed graphs go to the default graph").
#[derive(Clone, Debug, PartialEq)]
pub struct Quad {
	pub graph: Option<Id>,
	pub subject: Id,
	pub predicate: Id,
	pub object: RdfTerm,
}

fn id_to_term(id: &Id) -> Option<RdfTerm> {
	match id {
		Id::Iri(iri) => Some(RdfTerm::Iri(iri.clone())),
		Id::Blank(b) => Some(RdfTerm::Blank(b.clone())),
		Id::Invalid(_) => None,
	}
}

fn i18n_iri(language: Option<&crate::LenientLangTagBuf>, direction: Direction) -> iref::IriBuf {
	let dir = match direction {
		Direction::Ltr => "ltr",
		Direction::Rtl => "rtl",
	};
	let suffix = match language {
		Some(lang) => format!("{}_{}", lang.as_str().to_lowercase(), dir),
		None => dir.to_string(),
	};
	iref::IriBuf::new(format!("https://www.w3.org/ns/i18n#{suffix}")).expect("i18n iri suffix is always valid")
}

fn canonical_double(n: &crate::json::Number) -> String {
	let f = n.to_f64();
	if f == 0.0 {
		return if f.is_sign_negative() { "-0.0E0".to_string() } else { "0.0E0".to_string() };
	}
	if !f.is_finite() {
		return n.as_str().to_string();
	}
	let mut rendered = format!("{f:E}");
	if let Some(epos) = rendered.find('E') {
		let (mantissa, exponent) = rendered.split_at(epos);
		let exponent = &exponent[1..];
		let mantissa = if mantissa.contains('.') { mantissa.to_string() } else { format!("{mantissa}.0") };
		rendered = format!("{mantissa}E{exponent}");
	}
	rendered
}

/// Runs To-RDF (spec §4.6) over every top-level node of an expanded
/// document, returning the flattened quad set.
pub fn to_rdf(document: &ExpandedDocument, generator: &mut BlankIdGenerator, options: ToRdfOptions) -> Vec<Quad> {
	let mut quads = Vec::new();
	for object in document.objects() {
		if let Object::Node(node) = object.inner() {
			node_to_quads(node, None, &mut quads, generator, options);
		}
	}
	quads
}

fn node_to_quads(node: &Node, graph: Option<&Id>, quads: &mut Vec<Quad>, generator: &mut BlankIdGenerator, options: ToRdfOptions) -> Option<Id> {
	let subject = match &node.id {
		Some(id) if !id.is_valid() => return None,
		Some(id) => id.clone(),
		None => Id::Blank(generator.next()),
	};

	if let Some(types) = &node.types {
		for ty in types {
			if let Some(object) = id_to_term(ty) {
				quads.push(Quad {
					graph: graph.cloned(),
					subject: subject.clone(),
					predicate: Id::Iri(RDF_TYPE.clone()),
					object,
				});
			}
		}
	}

	for (property, values) in node.properties.iter() {
		if property.is_blank() && !options.produce_generalized_rdf {
			continue;
		}
		for value in values {
			if let Some(object) = object_to_term(value, Some(&subject), quads, generator, options) {
				quads.push(Quad {
					graph: graph.cloned(),
					subject: subject.clone(),
					predicate: property.clone(),
					object,
				});
			}
		}
	}

	if let Some(reverse) = &node.reverse_properties {
		for (property, nodes) in reverse.iter() {
			for rnode in nodes {
				if let (Some(rsubject), Some(object)) = (node_to_quads(rnode.inner(), graph, quads, generator, options), id_to_term(&subject)) {
					quads.push(Quad {
						graph: graph.cloned(),
						subject: rsubject,
						predicate: property.clone(),
						object,
					});
				}
			}
		}
	}

	if let Some(graph_contents) = &node.graph {
		for object in graph_contents {
			if let Object::Node(inner) = object.inner() {
				node_to_quads(inner, Some(&subject), quads, generator, options);
			}
		}
	}

	if let Some(included) = &node.included {
		for inode in included {
			node_to_quads(inode.inner(), graph, quads, generator, options);
		}
	}

	Some(subject)
}

fn object_to_term(object: &IndexedObject, graph: Option<&Id>, quads: &mut Vec<Quad>, generator: &mut BlankIdGenerator, options: ToRdfOptions) -> Option<RdfTerm> {
	match object.inner() {
		Object::Node(node) => node_to_quads(node, graph, quads, generator, options).and_then(|id| id_to_term(&id)),
		Object::Value(value) => value_to_term(value, graph, quads, generator, options),
		Object::List(list) => Some(list_to_term(list, graph, quads, generator, options)),
	}
}

fn value_to_term(value: &Value, graph: Option<&Id>, quads: &mut Vec<Quad>, generator: &mut BlankIdGenerator, options: ToRdfOptions) -> Option<RdfTerm> {
	match value {
		Value::Literal(lit, ty) => {
			let lexical = match lit {
				crate::object::Literal::Null => return None,
				crate::object::Literal::Boolean(b) => b.to_string(),
				crate::object::Literal::Number(n) if n.is_integer() => n.as_str().to_string(),
				crate::object::Literal::Number(n) => canonical_double(n),
				crate::object::Literal::String(s) => s.clone(),
			};
			let datatype = match ty.as_ref().and_then(Id::as_iri) {
				Some(iri) => iri.to_owned(),
				None => match lit {
					crate::object::Literal::Boolean(_) => XSD_BOOLEAN.clone(),
					crate::object::Literal::Number(n) if n.is_integer() => XSD_INTEGER.clone(),
					crate::object::Literal::Number(_) => XSD_DOUBLE.clone(),
					_ => XSD_STRING.clone(),
				},
			};
			Some(RdfTerm::Literal(RdfLiteral::Typed { value: lexical, datatype }))
		}
		Value::Json(json_value) => Some(RdfTerm::Literal(RdfLiteral::Typed {
			value: crate::json::canonicalize(json_value),
			datatype: RDF_JSON.clone(),
		})),
		Value::LangString(ls) => match ls.direction() {
			None => Some(RdfTerm::Literal(RdfLiteral::LangString {
				value: ls.as_str().to_string(),
				language: ls.language().cloned(),
			})),
			Some(direction) => match options.rdf_direction {
				RdfDirection::I18nDatatype => Some(RdfTerm::Literal(RdfLiteral::Typed {
					value: ls.as_str().to_string(),
					datatype: i18n_iri(ls.language(), direction),
				})),
				RdfDirection::CompoundLiteral => {
					let subject = Id::Blank(generator.next());
					quads.push(Quad {
						graph: graph.cloned(),
						subject: subject.clone(),
						predicate: Id::Iri(RDF_VALUE.clone()),
						object: RdfTerm::Literal(RdfLiteral::Typed { value: ls.as_str().to_string(), datatype: XSD_STRING.clone() }),
					});
					if let Some(lang) = ls.language() {
						quads.push(Quad {
							graph: graph.cloned(),
							subject: subject.clone(),
							predicate: Id::Iri(RDF_LANGUAGE.clone()),
							object: RdfTerm::Literal(RdfLiteral::Typed { value: lang.as_str().to_string(), datatype: XSD_STRING.clone() }),
						});
					}
					quads.push(Quad {
						graph: graph.cloned(),
						subject: subject.clone(),
						predicate: Id::Iri(RDF_DIRECTION.clone()),
						object: RdfTerm::Literal(RdfLiteral::Typed { value: direction.to_string(), datatype: XSD_STRING.clone() }),
					});
					id_to_term(&subject)
				}
			},
		},
	}
}

fn list_to_term(list: &List, graph: Option<&Id>, quads: &mut Vec<Quad>, generator: &mut BlankIdGenerator, options: ToRdfOptions) -> RdfTerm {
	let items: Vec<RdfTerm> = list.iter().filter_map(|item| object_to_term(item, graph, quads, generator, options)).collect();
	if items.is_empty() {
		return RdfTerm::Iri(RDF_NIL.clone());
	}

	let cells: Vec<_> = (0..items.len()).map(|_| generator.next()).collect();
	for (i, item) in items.into_iter().enumerate() {
		let subject = Id::Blank(cells[i].clone());
		quads.push(Quad {
			graph: graph.cloned(),
			subject: subject.clone(),
			predicate: Id::Iri(RDF_FIRST.clone()),
			object: item,
		});
		let rest = match cells.get(i + 1) {
			Some(next) => RdfTerm::Blank(next.clone()),
			None => RdfTerm::Iri(RDF_NIL.clone()),
		};
		quads.push(Quad { graph: graph.cloned(), subject, predicate: Id::Iri(RDF_REST.clone()), object: rest });
	}

	RdfTerm::Blank(cells[0].clone())
}

mod from_rdf;
pub use from_rdf::from_rdf;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::object::{IndexedObject, Literal, Properties};
	use crate::Indexed;
	use iref::IriBuf;

	fn iri_id(s: &str) -> Id {
		Id::Iri(IriBuf::new(s.to_string()).unwrap())
	}

	#[test]
	fn emits_type_and_property_triples() {
		let mut node = Node::with_id(iri_id("http://example.org/a"));
		node.types = Some(vec![iri_id("http://example.org/Person")]);
		let mut props = Properties::new();
		props.insert(
			iri_id("http://example.org/name"),
			vec![Indexed::<Object>::new(Object::Value(Value::Literal(Literal::String("Ann".into()), None)), None)],
		);
		node.properties = props;

		let document = ExpandedDocument::from_objects(vec![Indexed::new(Object::Node(node), None)]);
		let mut generator = BlankIdGenerator::new();
		let quads = to_rdf(&document, &mut generator, ToRdfOptions::default());

		assert_eq!(quads.len(), 2);
		assert!(quads.iter().any(|q| q.predicate == iri_id("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")));
	}

	#[test]
	fn empty_list_becomes_rdf_nil() {
		let mut node = Node::with_id(iri_id("http://example.org/a"));
		let mut props = Properties::new();
		let list: IndexedObject = Indexed::new(Object::List(List::new(vec![])), None);
		props.insert(iri_id("http://example.org/items"), vec![list]);
		node.properties = props;

		let document = ExpandedDocument::from_objects(vec![Indexed::new(Object::Node(node), None)]);
		let mut generator = BlankIdGenerator::new();
		let quads = to_rdf(&document, &mut generator, ToRdfOptions::default());

		assert_eq!(quads.len(), 1);
		assert_eq!(quads[0].object, RdfTerm::Iri(RDF_NIL.clone()));
	}
}

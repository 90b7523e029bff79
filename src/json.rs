//! The generic JSON value tree the algorithms operate on.
//!
//! Spec §3 models a JSON value as `null | bool | number | string | array |
//! object (ordered mapping)`; that tree, plus the concrete lexer/parser that
//! produces it, is explicitly a collaborator interface (spec §1), not part
//! of the core. This module is a minimal, dependency-free implementation of
//! that contract built on [`indexmap::IndexMap`] — the same ordered-map
//! type the rest of this crate uses for term definitions and node maps —
//! rather than the teacher's own in-progress `json-syntax`, whose richer
//! permissive model (duplicate object keys, source-span metadata on every
//! node) targets concerns spec §3 does not ask for (key order is
//! significant only where algorithms explicitly depend on it; duplicate
//! keys are not part of the data model at all).
use indexmap::IndexMap;
use std::fmt;

/// A JSON number, kept in its original lexical form so expansion/compaction
/// round-trip it byte-for-byte (spec §8 round-trip laws) while still
/// exposing a parsed `f64` for RDF literal conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Number(String);

impl Number {
	pub fn from_f64(f: f64) -> Self {
		Self(if f.fract() == 0.0 && f.abs() < 1e15 {
			format!("{}", f as i64)
		} else {
			format!("{f}")
		})
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn to_f64(&self) -> f64 {
		self.0.parse().unwrap_or(f64::NAN)
	}

	pub fn is_integer(&self) -> bool {
		!self.0.contains(['.', 'e', 'E'])
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<i64> for Number {
	fn from(n: i64) -> Self {
		Self(n.to_string())
	}
}

/// An ordered JSON object: insertion order is observable and preserved
/// through every operation, matching spec §3 "ordered mapping".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object(IndexMap<String, Value>);

impl Object {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Inserts or overwrites `key`, preserving its original position if it
	/// already existed, appending otherwise.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.0.shift_remove(key)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.0.get_mut(key)
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
		self.0.iter()
	}

	pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
		self.0.keys()
	}

	pub fn into_iter(self) -> indexmap::map::IntoIter<String, Value> {
		self.0.into_iter()
	}
}

impl FromIterator<(String, Value)> for Object {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Object {
	type Item = (&'a String, &'a Value);
	type IntoIter = indexmap::map::Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl IntoIterator for Object {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// A JSON value tree (spec §3).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Null,
	Boolean(bool),
	Number(Number),
	String(String),
	Array(Vec<Value>),
	Object(Object),
}

impl Value {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn as_object_mut(&mut self) -> Option<&mut Object> {
		match self {
			Self::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
		match self {
			Self::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn into_object(self) -> Option<Object> {
		match self {
			Self::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn into_array(self) -> Option<Vec<Value>> {
		match self {
			Self::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn is_object(&self) -> bool {
		matches!(self, Self::Object(_))
	}

	pub fn is_array(&self) -> bool {
		matches!(self, Self::Array(_))
	}

	pub fn is_string(&self) -> bool {
		matches!(self, Self::String(_))
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Boolean(b)
	}
}

impl From<Object> for Value {
	fn from(o: Object) -> Self {
		Self::Object(o)
	}
}

impl From<Vec<Value>> for Value {
	fn from(a: Vec<Value>) -> Self {
		Self::Array(a)
	}
}

/// An error produced while parsing a JSON text (spec §3's data model is
/// silent on lexical syntax; this follows RFC 8259).
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
	pub offset: usize,
	pub message: String,
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "JSON parse error at byte {}: {}", self.offset, self.message)
	}
}

impl std::error::Error for ParseError {}

/// Parses a complete JSON text into a [`Value`], rejecting trailing content.
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
	let mut parser = Parser {
		input: input.as_bytes(),
		pos: 0,
	};
	parser.skip_ws();
	let value = parser.parse_value()?;
	parser.skip_ws();
	if parser.pos != parser.input.len() {
		return Err(parser.err("trailing content after JSON value"));
	}
	Ok(value)
}

struct Parser<'a> {
	input: &'a [u8],
	pos: usize,
}

impl<'a> Parser<'a> {
	fn err(&self, message: impl Into<String>) -> ParseError {
		ParseError {
			offset: self.pos,
			message: message.into(),
		}
	}

	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
			self.pos += 1;
		}
	}

	fn expect(&mut self, b: u8) -> Result<(), ParseError> {
		if self.peek() == Some(b) {
			self.pos += 1;
			Ok(())
		} else {
			Err(self.err(format!("expected '{}'", b as char)))
		}
	}

	fn literal(&mut self, lit: &str) -> Result<(), ParseError> {
		let bytes = lit.as_bytes();
		if self.input[self.pos..].starts_with(bytes) {
			self.pos += bytes.len();
			Ok(())
		} else {
			Err(self.err(format!("expected `{lit}`")))
		}
	}

	fn parse_value(&mut self) -> Result<Value, ParseError> {
		self.skip_ws();
		match self.peek() {
			Some(b'{') => self.parse_object(),
			Some(b'[') => self.parse_array(),
			Some(b'"') => self.parse_string().map(Value::String),
			Some(b't') => {
				self.literal("true")?;
				Ok(Value::Boolean(true))
			}
			Some(b'f') => {
				self.literal("false")?;
				Ok(Value::Boolean(false))
			}
			Some(b'n') => {
				self.literal("null")?;
				Ok(Value::Null)
			}
			Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_number(),
			_ => Err(self.err("unexpected character")),
		}
	}

	fn parse_object(&mut self) -> Result<Value, ParseError> {
		self.expect(b'{')?;
		let mut object = Object::new();
		self.skip_ws();
		if self.peek() == Some(b'}') {
			self.pos += 1;
			return Ok(Value::Object(object));
		}
		loop {
			self.skip_ws();
			let key = self.parse_string()?;
			self.skip_ws();
			self.expect(b':')?;
			let value = self.parse_value()?;
			object.insert(key, value);
			self.skip_ws();
			match self.peek() {
				Some(b',') => {
					self.pos += 1;
				}
				Some(b'}') => {
					self.pos += 1;
					break;
				}
				_ => return Err(self.err("expected ',' or '}'")),
			}
		}
		Ok(Value::Object(object))
	}

	fn parse_array(&mut self) -> Result<Value, ParseError> {
		self.expect(b'[')?;
		let mut items = Vec::new();
		self.skip_ws();
		if self.peek() == Some(b']') {
			self.pos += 1;
			return Ok(Value::Array(items));
		}
		loop {
			items.push(self.parse_value()?);
			self.skip_ws();
			match self.peek() {
				Some(b',') => {
					self.pos += 1;
				}
				Some(b']') => {
					self.pos += 1;
					break;
				}
				_ => return Err(self.err("expected ',' or ']'")),
			}
		}
		Ok(Value::Array(items))
	}

	fn parse_string(&mut self) -> Result<String, ParseError> {
		self.expect(b'"')?;
		let mut out = String::new();
		loop {
			match self.peek() {
				None => return Err(self.err("unterminated string")),
				Some(b'"') => {
					self.pos += 1;
					break;
				}
				Some(b'\\') => {
					self.pos += 1;
					match self.peek() {
						Some(b'"') => {
							out.push('"');
							self.pos += 1;
						}
						Some(b'\\') => {
							out.push('\\');
							self.pos += 1;
						}
						Some(b'/') => {
							out.push('/');
							self.pos += 1;
						}
						Some(b'b') => {
							out.push('\u{8}');
							self.pos += 1;
						}
						Some(b'f') => {
							out.push('\u{c}');
							self.pos += 1;
						}
						Some(b'n') => {
							out.push('\n');
							self.pos += 1;
						}
						Some(b'r') => {
							out.push('\r');
							self.pos += 1;
						}
						Some(b't') => {
							out.push('\t');
							self.pos += 1;
						}
						Some(b'u') => {
							self.pos += 1;
							let cp = self.parse_hex4()?;
							if (0xD800..=0xDBFF).contains(&cp) {
								if self.input[self.pos..].starts_with(b"\\u") {
									self.pos += 2;
									let low = self.parse_hex4()?;
									let c = 0x10000
										+ (cp - 0xD800) * 0x400
										+ (low - 0xDC00);
									out.push(char::from_u32(c).unwrap_or('\u{FFFD}'));
								} else {
									out.push('\u{FFFD}');
								}
							} else {
								out.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
							}
						}
						_ => return Err(self.err("invalid escape sequence")),
					}
				}
				Some(_) => {
					let start = self.pos;
					while !matches!(self.peek(), None | Some(b'"') | Some(b'\\')) {
						self.pos += 1;
					}
					out.push_str(
						std::str::from_utf8(&self.input[start..self.pos])
							.map_err(|_| self.err("invalid utf-8"))?,
					);
				}
			}
		}
		Ok(out)
	}

	fn parse_hex4(&mut self) -> Result<u32, ParseError> {
		if self.pos + 4 > self.input.len() {
			return Err(self.err("truncated unicode escape"));
		}
		let hex = std::str::from_utf8(&self.input[self.pos..self.pos + 4])
			.map_err(|_| self.err("invalid unicode escape"))?;
		let cp = u32::from_str_radix(hex, 16).map_err(|_| self.err("invalid unicode escape"))?;
		self.pos += 4;
		Ok(cp)
	}

	fn parse_number(&mut self) -> Result<Value, ParseError> {
		let start = self.pos;
		if self.peek() == Some(b'-') {
			self.pos += 1;
		}
		while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
			self.pos += 1;
		}
		if self.peek() == Some(b'.') {
			self.pos += 1;
			while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
				self.pos += 1;
			}
		}
		if matches!(self.peek(), Some(b'e' | b'E')) {
			self.pos += 1;
			if matches!(self.peek(), Some(b'+' | b'-')) {
				self.pos += 1;
			}
			while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
				self.pos += 1;
			}
		}
		let text = std::str::from_utf8(&self.input[start..self.pos]).unwrap();
		if text.parse::<f64>().is_err() {
			return Err(self.err("invalid number"));
		}
		Ok(Value::Number(Number(text.to_string())))
	}
}

/// Builds a [`Value`] from a JSON-like literal in tests, without pulling in
/// `serde_json` for what is otherwise a handful of ad hoc documents.
#[cfg(test)]
macro_rules! jval {
	(null) => { $crate::json::Value::Null };
	(true) => { $crate::json::Value::Boolean(true) };
	(false) => { $crate::json::Value::Boolean(false) };
	([ $($elem:tt),* $(,)? ]) => {
		$crate::json::Value::Array(vec![ $(jval!($elem)),* ])
	};
	({ $($key:expr => $val:tt),* $(,)? }) => {{
		let mut o = $crate::json::Object::new();
		$(o.insert($key, jval!($val));)*
		$crate::json::Value::Object(o)
	}};
	($other:expr) => {
		$crate::json::Value::from($other)
	};
}

#[cfg(test)]
pub(crate) use jval;

/// JSON Canonicalization Scheme subset used for `rdf:JSON` literal lexical
/// forms (spec §4.6): object keys sorted lexicographically by UTF-16 code
/// unit, numbers rendered via the ECMAScript Number::toString algorithm, no
/// insignificant whitespace, strings escaped per RFC 8259.
pub fn canonicalize(value: &Value) -> String {
	let mut out = String::new();
	let mut buffer = ryu_js::Buffer::new();
	write_canonical(value, &mut out, &mut buffer);
	out
}

fn write_canonical(value: &Value, out: &mut String, buffer: &mut ryu_js::Buffer) {
	match value {
		Value::Null => out.push_str("null"),
		Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
		Value::Number(n) => {
			let f = n.to_f64();
			if f.is_finite() {
				out.push_str(buffer.format(f));
			} else {
				out.push_str(n.as_str());
			}
		}
		Value::String(s) => write_canonical_string(s, out),
		Value::Array(items) => {
			out.push('[');
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				write_canonical(item, out, buffer);
			}
			out.push(']');
		}
		Value::Object(object) => {
			let mut keys: Vec<&String> = object.keys().collect();
			keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
			out.push('{');
			for (i, key) in keys.into_iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				write_canonical_string(key, out);
				out.push(':');
				write_canonical(object.get(key).unwrap(), out, buffer);
			}
			out.push('}');
		}
	}
}

fn write_canonical_string(s: &str, out: &mut String) {
	out.push('"');
	for c in s.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
			c => out.push(c),
		}
	}
	out.push('"');
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn object_preserves_insertion_order() {
		let mut o = Object::new();
		o.insert("b", Value::Boolean(true));
		o.insert("a", Value::Null);
		let keys: Vec<_> = o.keys().cloned().collect();
		assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
	}

	#[test]
	fn number_round_trips_integer_form() {
		let n = Number::from(42i64);
		assert_eq!(n.as_str(), "42");
		assert!(n.is_integer());
	}

	#[test]
	fn parses_nested_document() {
		let v = parse_str(r#"{"@id": "http://example.com", "list": [1, 2.5, true, null]}"#)
			.unwrap();
		let o = v.as_object().unwrap();
		assert_eq!(o.get("@id").unwrap().as_str(), Some("http://example.com"));
		let list = o.get("list").unwrap().as_array().unwrap();
		assert_eq!(list.len(), 4);
		assert_eq!(list[0], Value::Number(Number("1".into())));
	}

	#[test]
	fn parses_escaped_string() {
		let v = parse_str(r#""a\nbé""#).unwrap();
		assert_eq!(v.as_str(), Some("a\nb\u{e9}"));
	}

	#[test]
	fn rejects_trailing_garbage() {
		assert!(parse_str("1 2").is_err());
	}

	#[test]
	fn canonicalizes_object_keys_in_sorted_order() {
		let v = parse_str(r#"{"b": 1, "a": 2}"#).unwrap();
		assert_eq!(canonicalize(&v), r#"{"a":2,"b":1}"#);
	}

	#[test]
	fn canonicalizes_numbers_to_their_shortest_ecmascript_form() {
		assert_eq!(canonicalize(&parse_str("1.0").unwrap()), "1");
		assert_eq!(canonicalize(&parse_str("1e2").unwrap()), "100");
		assert_eq!(canonicalize(&parse_str("0.5").unwrap()), "0.5");
	}
}

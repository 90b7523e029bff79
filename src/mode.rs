use std::convert::TryFrom;
use std::fmt;

/// JSON-LD processing mode.
///
/// New features defined in JSON-LD 1.1 (scoped contexts, `@nest`,
/// `@included`, `@direction`, `@json`, the `@type: @none`/`@id` type maps,
/// ...) are only available unless `processing_mode` is set to
/// [`ProcessingMode::JsonLd1_0`], in which case their use raises
/// `processing mode conflict` (spec §7).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ProcessingMode {
	/// JSON-LD 1.0.
	JsonLd1_0,

	/// JSON-LD 1.1.
	JsonLd1_1,
}

impl Default for ProcessingMode {
	fn default() -> ProcessingMode {
		ProcessingMode::JsonLd1_1
	}
}

impl ProcessingMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProcessingMode::JsonLd1_0 => "json-ld-1.0",
			ProcessingMode::JsonLd1_1 => "json-ld-1.1",
		}
	}

	pub fn is_1_1(&self) -> bool {
		matches!(self, ProcessingMode::JsonLd1_1)
	}
}

impl<'a> TryFrom<&'a str> for ProcessingMode {
	type Error = &'a str;

	fn try_from(name: &'a str) -> Result<ProcessingMode, &'a str> {
		match name {
			"json-ld-1.0" => Ok(ProcessingMode::JsonLd1_0),
			"json-ld-1.1" => Ok(ProcessingMode::JsonLd1_1),
			_ => Err(name),
		}
	}
}

impl fmt::Display for ProcessingMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

use std::convert::TryFrom;
use std::fmt;

/// Base direction of a directional language-tagged string (`@direction`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
	/// Left-to-right.
	#[cfg_attr(feature = "serde", serde(rename = "ltr"))]
	Ltr,

	/// Right-to-left.
	#[cfg_attr(feature = "serde", serde(rename = "rtl"))]
	Rtl,
}

impl<'a> TryFrom<&'a str> for Direction {
	type Error = &'a str;

	fn try_from(name: &'a str) -> Result<Direction, &'a str> {
		match name {
			"ltr" => Ok(Direction::Ltr),
			"rtl" => Ok(Direction::Rtl),
			_ => Err(name),
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Direction::Ltr => write!(f, "ltr"),
			Direction::Rtl => write!(f, "rtl"),
		}
	}
}

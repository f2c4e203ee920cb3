use std::fmt;
use std::str::FromStr;

use crate::attr::AttrError;

/// Closed set of value kinds a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
	/// Fresh cell with no kind yet.
	#[default]
	Unknown,
	/// `i32` elements.
	Integer,
	/// `f32` elements.
	Float,
	/// Owned `String` elements.
	String,
	/// Four-component float vectors.
	Vector,
	/// 4x4 float matrices.
	Matrix,
	/// Shared references to polymorphic objects.
	Pointer,
	/// Owned child scopes.
	Table,
}

impl Kind {
	/// Every settable kind, in declaration order.
	pub const ALL: [Kind; 7] = [Kind::Integer, Kind::Float, Kind::String, Kind::Vector, Kind::Matrix, Kind::Pointer, Kind::Table];

	/// Stable lowercase label, also used as the JSON `type` name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Unknown => "unknown",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::String => "string",
			Self::Vector => "vector",
			Self::Matrix => "matrix",
			Self::Pointer => "pointer",
			Self::Table => "table",
		}
	}

	/// Whether elements are plain bytes compared bitwise.
	pub fn is_plain_data(self) -> bool {
		matches!(self, Self::Integer | Self::Float | Self::Vector | Self::Matrix)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Kind {
	type Err = AttrError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or_else(|| AttrError::JsonShape {
			path: String::new(),
			reason: format!("unknown kind name {s:?}"),
		})
	}
}

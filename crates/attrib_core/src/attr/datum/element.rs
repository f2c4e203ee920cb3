use std::fmt;

use super::storage::Storable;
use crate::attr::{AttrError, Kind, Mat4, ObjectRef, Result, Vec4};

/// Element types a cell can store, one per settable non-table kind.
///
/// The set is closed: the trait is sealed through its storage supertrait.
pub trait Element: Clone + fmt::Debug + Storable + 'static {
	/// Kind tag of cells holding this element type.
	const KIND: Kind;

	/// Value used to fill slots created by `Datum::resize`.
	fn default_value() -> Self;

	/// Kind-appropriate equality: bitwise for plain data, target equality for pointers.
	fn same(&self, other: &Self) -> bool;

	/// Textual form used by `Datum::to_string_at`.
	fn render(&self) -> String;

	/// Parse the textual form produced by `render`.
	fn parse(text: &str) -> Result<Self>;
}

impl Element for i32 {
	const KIND: Kind = Kind::Integer;

	fn default_value() -> Self {
		0
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn render(&self) -> String {
		self.to_string()
	}

	fn parse(text: &str) -> Result<Self> {
		text.parse().map_err(|_| invalid(Self::KIND, text))
	}
}

impl Element for f32 {
	const KIND: Kind = Kind::Float;

	fn default_value() -> Self {
		0.0
	}

	fn same(&self, other: &Self) -> bool {
		self.to_bits() == other.to_bits()
	}

	fn render(&self) -> String {
		format!("{self:?}")
	}

	fn parse(text: &str) -> Result<Self> {
		text.parse().map_err(|_| invalid(Self::KIND, text))
	}
}

impl Element for String {
	const KIND: Kind = Kind::String;

	fn default_value() -> Self {
		String::new()
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn render(&self) -> String {
		self.clone()
	}

	fn parse(text: &str) -> Result<Self> {
		Ok(text.to_owned())
	}
}

impl Element for Vec4 {
	const KIND: Kind = Kind::Vector;

	fn default_value() -> Self {
		Vec4::default()
	}

	fn same(&self, other: &Self) -> bool {
		self.bits_eq(other)
	}

	fn render(&self) -> String {
		self.to_string()
	}

	fn parse(text: &str) -> Result<Self> {
		text.parse()
	}
}

impl Element for Mat4 {
	const KIND: Kind = Kind::Matrix;

	fn default_value() -> Self {
		Mat4::IDENTITY
	}

	fn same(&self, other: &Self) -> bool {
		self.bits_eq(other)
	}

	fn render(&self) -> String {
		self.to_string()
	}

	fn parse(text: &str) -> Result<Self> {
		text.parse()
	}
}

impl Element for ObjectRef {
	const KIND: Kind = Kind::Pointer;

	fn default_value() -> Self {
		ObjectRef::NULL
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn render(&self) -> String {
		self.to_string()
	}

	/// Only the null literal has a textual form.
	fn parse(text: &str) -> Result<Self> {
		if text == "null" {
			return Ok(ObjectRef::NULL);
		}
		Err(AttrError::ParseUnsupported { kind: Self::KIND })
	}
}

fn invalid(kind: Kind, text: &str) -> AttrError {
	AttrError::InvalidLiteral {
		kind,
		input: text.to_owned(),
	}
}

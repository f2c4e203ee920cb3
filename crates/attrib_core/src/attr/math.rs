use std::fmt;
use std::str::FromStr;

use crate::attr::{AttrError, Kind};

/// Four-component float vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vec4(pub [f32; 4]);

/// Row-major 4x4 float matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Vec4 {
	/// Build a vector from components.
	pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
		Self([x, y, z, w])
	}

	/// Bitwise component equality.
	pub fn bits_eq(&self, other: &Self) -> bool {
		self.0.iter().zip(other.0.iter()).all(|(a, b)| a.to_bits() == b.to_bits())
	}
}

impl Mat4 {
	/// Identity matrix.
	pub const IDENTITY: Mat4 = Mat4([[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]]);

	/// Build a matrix from rows.
	pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
		Self(rows)
	}

	/// Bitwise element equality.
	pub fn bits_eq(&self, other: &Self) -> bool {
		self.0.iter().flatten().zip(other.0.iter().flatten()).all(|(a, b)| a.to_bits() == b.to_bits())
	}
}

impl fmt::Display for Vec4 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "vec4(")?;
		write_components(f, &self.0)?;
		write!(f, ")")
	}
}

impl fmt::Display for Mat4 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "mat4x4(")?;
		for (idx, row) in self.0.iter().enumerate() {
			if idx > 0 {
				write!(f, ", ")?;
			}
			write!(f, "(")?;
			write_components(f, row)?;
			write!(f, ")")?;
		}
		write!(f, ")")
	}
}

impl FromStr for Vec4 {
	type Err = AttrError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || AttrError::InvalidLiteral {
			kind: Kind::Vector,
			input: s.to_owned(),
		};
		let inner = s.strip_prefix("vec4(").and_then(|rest| rest.strip_suffix(')')).ok_or_else(invalid)?;
		parse_components(inner).map(Vec4).ok_or_else(invalid)
	}
}

impl FromStr for Mat4 {
	type Err = AttrError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || AttrError::InvalidLiteral {
			kind: Kind::Matrix,
			input: s.to_owned(),
		};
		let mut rest = s.strip_prefix("mat4x4(").and_then(|rest| rest.strip_suffix(')')).ok_or_else(invalid)?;

		let mut rows = [[0.0_f32; 4]; 4];
		for (idx, row) in rows.iter_mut().enumerate() {
			if idx > 0 {
				rest = rest.strip_prefix(',').ok_or_else(invalid)?.trim_start();
			}
			let body = rest.strip_prefix('(').ok_or_else(invalid)?;
			let close = body.find(')').ok_or_else(invalid)?;
			*row = parse_components(&body[..close]).ok_or_else(invalid)?;
			rest = &body[close + 1..];
		}

		if !rest.is_empty() {
			return Err(invalid());
		}
		Ok(Mat4(rows))
	}
}

fn write_components(f: &mut fmt::Formatter<'_>, values: &[f32; 4]) -> fmt::Result {
	for (idx, value) in values.iter().enumerate() {
		if idx > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{value:?}")?;
	}
	Ok(())
}

fn parse_components(text: &str) -> Option<[f32; 4]> {
	let mut out = [0.0_f32; 4];
	let mut parts = text.split(',');
	for slot in &mut out {
		let part = parts.next()?.trim();
		if part.is_empty() {
			return None;
		}
		*slot = part.parse::<f32>().ok()?;
	}
	if parts.next().is_some() {
		return None;
	}
	Some(out)
}

use std::fmt;

use crate::attr::{Datum, Kind, ScopeId, Table};

use super::SELF_KEY;

/// Output limits and switches for the textual table rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
	/// Nested scopes deeper than this render as `{...}`.
	pub max_depth: u32,
	/// Maximum elements printed per cell.
	pub max_items: usize,
	/// Print the reserved self-reference entry.
	pub include_self_key: bool,
	/// Join attributes with `; ` instead of one line each.
	pub one_line: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			max_depth: 8,
			max_items: 64,
			include_self_key: true,
			one_line: false,
		}
	}
}

impl RenderOptions {
	/// Preset for single-line debug output.
	pub fn compact() -> Self {
		Self {
			max_depth: 4,
			max_items: 8,
			include_self_key: false,
			one_line: true,
		}
	}
}

impl Table {
	/// Render `scope` as `key: (value) (value) ...`, one attribute per line.
	///
	/// Nested scopes render inline as `{key: (value); ...}`.
	pub fn render(&self, scope: ScopeId, options: &RenderOptions) -> String {
		let lines = self.render_lines(scope, options, 0);
		if options.one_line {
			return lines.join("; ");
		}
		let mut out = String::new();
		for line in lines {
			out.push_str(&line);
			out.push('\n');
		}
		out
	}

	/// Render the elements of `datum`, a cell of this table, as `(value) (value) ...`.
	pub fn render_datum(&self, datum: &Datum, options: &RenderOptions) -> String {
		let mut out = String::new();
		self.render_values(datum, options, 0, &mut out);
		out.trim_start().to_owned()
	}

	fn render_lines(&self, scope: ScopeId, options: &RenderOptions, depth: u32) -> Vec<String> {
		self.entries(scope)
			.filter(|(key, _)| options.include_self_key || *key != SELF_KEY)
			.map(|(key, datum)| {
				let mut line = format!("{key}:");
				self.render_values(datum, options, depth, &mut line);
				line
			})
			.collect()
	}

	fn render_values(&self, datum: &Datum, options: &RenderOptions, depth: u32, line: &mut String) {
		let shown = datum.len().min(options.max_items);
		for index in 0..shown {
			let text = if datum.kind() == Kind::Table {
				self.render_nested(datum.scopes()[index], options, depth + 1)
			} else {
				datum.to_string_at(index).unwrap_or_default()
			};
			line.push_str(" (");
			line.push_str(&text);
			line.push(')');
		}
		if datum.len() > shown {
			line.push_str(&format!(" ... {} more", datum.len() - shown));
		}
	}

	fn render_nested(&self, scope: ScopeId, options: &RenderOptions, depth: u32) -> String {
		if depth >= options.max_depth {
			return "{...}".to_owned();
		}
		format!("{{{}}}", self.render_lines(scope, options, depth).join("; "))
	}
}

impl fmt::Display for Table {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render(ScopeId::ROOT, &RenderOptions::default()))
	}
}

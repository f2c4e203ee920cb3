use crate::attr::{AttrError, Kind, Result, ScopeId, Table};

impl Table {
	/// Resolve a dotted path such as `kids.toys[1]` to a scope handle.
	///
	/// Each segment names a table-kind cell of the current scope, with an
	/// optional `[index]` picking one of its children (default `0`). The empty
	/// path names the root.
	pub fn resolve_path(&self, path: &str) -> Result<ScopeId> {
		let mut scope = ScopeId::ROOT;
		if path.is_empty() {
			return Ok(scope);
		}

		for segment in path.split('.') {
			let (key, index) = split_segment(segment).ok_or_else(|| path_error(path, format!("malformed segment `{segment}`")))?;
			let datum = self.find(scope, key).ok_or_else(|| path_error(path, format!("no attribute `{key}`")))?;
			if datum.kind() != Kind::Table {
				return Err(path_error(path, format!("`{key}` is a {} attribute", datum.kind())));
			}
			scope = *datum
				.scopes()
				.get(index)
				.ok_or_else(|| path_error(path, format!("`{key}` has {} scopes, wanted index {index}", datum.len())))?;
		}
		Ok(scope)
	}

	/// Dotted path of `scope` from the root, in the form [`Table::resolve_path`] reads.
	pub fn scope_path(&self, scope: ScopeId) -> Result<String> {
		let mut segments = Vec::new();
		let mut current = scope;
		while let Some((parent, entry_index, element_index)) = self.find_containing(current)? {
			let (key, _) = self.entry(parent, entry_index).ok_or_else(|| AttrError::StaleScope { scope: parent.to_string() })?;
			segments.push(if element_index == 0 { key.to_owned() } else { format!("{key}[{element_index}]") });
			current = parent;
		}
		segments.reverse();
		Ok(segments.join("."))
	}
}

fn split_segment(segment: &str) -> Option<(&str, usize)> {
	let Some(open) = segment.find('[') else {
		return (!segment.is_empty()).then_some((segment, 0));
	};
	let key = &segment[..open];
	let index = segment[open + 1..].strip_suffix(']')?.parse().ok()?;
	(!key.is_empty()).then_some((key, index))
}

fn path_error(path: &str, reason: String) -> AttrError {
	AttrError::ScopePath {
		path: path.to_owned(),
		reason,
	}
}

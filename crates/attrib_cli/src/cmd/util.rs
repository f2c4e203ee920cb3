use std::path::Path;

use attrib::attr::{JsonOptions, Result, Table, load_table};

/// Read and parse the JSON attribute document at `path`.
pub(crate) fn load_document(path: &Path, lenient: bool) -> Result<Table> {
	let text = std::fs::read_to_string(path)?;
	let options = if lenient { JsonOptions::lenient() } else { JsonOptions::default() };
	load_table(&text, &options)
}

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Label for a scope path, naming the root explicitly.
pub(crate) fn scope_label(path: &str) -> &str {
	if path.is_empty() { "<root>" } else { path }
}

use std::path::PathBuf;

use attrib::attr::{Datum, Kind, RenderOptions, Result, Table};

use crate::cmd::util::{emit_json, load_document, scope_label};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Dotted scope path such as `kids.toys[1]`; the root when omitted.
	#[arg(long, default_value = "")]
	pub scope: String,
	#[arg(long)]
	pub key: String,
	/// Only look in the named scope, not its ancestors.
	#[arg(long)]
	pub local: bool,
	#[arg(long)]
	pub json: bool,
}

/// Resolve `key` from a scope, falling back to ancestors unless `--local`.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		scope,
		key,
		local,
		json,
	} = args;

	let table = load_document(&path, false)?;
	let start = table.resolve_path(&scope)?;
	let found = if local {
		table.find(start, &key).map(|datum| (start, datum))
	} else {
		table.search(start, &key)
	};

	let Some((owner, datum)) = found else {
		if json {
			return emit_json(&LookupJson {
				path: path.display().to_string(),
				scope,
				key,
				found: false,
				owner: None,
				kind: None,
				values: Vec::new(),
			});
		}
		println!("{key}: not found from {}", scope_label(&scope));
		return Ok(());
	};

	let owner_path = table.scope_path(owner)?;
	if json {
		return emit_json(&LookupJson {
			path: path.display().to_string(),
			scope,
			key,
			found: true,
			owner: Some(owner_path),
			kind: Some(datum.kind().as_str()),
			values: element_texts(&table, datum),
		});
	}

	println!("scope: {}", scope_label(&owner_path));
	println!("kind: {}", datum.kind());
	println!("{key}: {}", table.render_datum(datum, &RenderOptions::default()));
	Ok(())
}

fn element_texts(table: &Table, datum: &Datum) -> Vec<String> {
	if datum.kind() == Kind::Table {
		let options = RenderOptions::compact();
		return datum.scopes().iter().map(|child| format!("{{{}}}", table.render(*child, &options))).collect();
	}
	(0..datum.len()).filter_map(|index| datum.to_string_at(index).ok()).collect()
}

#[derive(serde::Serialize)]
struct LookupJson {
	path: String,
	scope: String,
	key: String,
	found: bool,
	owner: Option<String>,
	kind: Option<&'static str>,
	values: Vec<String>,
}

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use attrib::attr::{RenderOptions, Result, to_json};

use crate::cmd::util::{emit_json, load_document};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Re-encode the loaded document as JSON instead of rendering it.
	#[arg(long)]
	pub json: bool,
	/// Single-line rendering with tighter depth and item limits.
	#[arg(long)]
	pub compact: bool,
	/// Skip members of unknown kind instead of failing.
	#[arg(long)]
	pub lenient: bool,
}

/// Print the whole document, one attribute per line.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json, compact, lenient } = args;

	let table = load_document(&path, lenient)?;
	if json {
		return emit_json(&to_json(&table));
	}

	let options = if compact { RenderOptions::compact() } else { RenderOptions::default() };
	let rendered = table.render(table.root(), &options);
	if compact {
		println!("{rendered}");
	} else {
		print!("{rendered}");
	}
	Ok(())
}

#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "attrib", about = "Attribute table inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Load a JSON attribute document and print it.
	Show(cmd::show::Args),
	/// Resolve one key from a scope of a JSON attribute document.
	Lookup(cmd::lookup::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> attrib::attr::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Show(args) => cmd::show::run(args),
		Commands::Lookup(args) => cmd::lookup::run(args),
	}
}

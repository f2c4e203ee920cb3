use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static ATTRIB_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_arg(name: &str) -> String {
	attrib_testkit::fixture_path(name).to_string_lossy().into_owned()
}

pub(crate) fn run_attrib(args: &[&str]) -> Output {
	Command::new(attrib_bin()).args(args).output().expect("attrib command executes")
}

pub(crate) fn run_attrib_stdout(args: &[&str]) -> String {
	let output = run_attrib(args);
	assert!(
		output.status.success(),
		"attrib command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

pub(crate) fn run_attrib_json(args: &[&str]) -> serde_json::Value {
	let stdout = run_attrib_stdout(args);
	serde_json::from_str(&stdout).expect("stdout should be valid json")
}

fn attrib_bin() -> &'static PathBuf {
	ATTRIB_BIN.get_or_init(resolve_attrib_bin)
}

fn resolve_attrib_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_attrib") {
		return PathBuf::from(path);
	}

	let mut bin = attrib_testkit::target_dir().join("debug");
	bin.push(if cfg!(windows) { "attrib.exe" } else { "attrib" });

	let status = Command::new("cargo")
		.current_dir(attrib_testkit::workspace_root())
		.args(["build", "--quiet", "--bin", "attrib"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build attrib binary at {}", bin.display());

	bin
}

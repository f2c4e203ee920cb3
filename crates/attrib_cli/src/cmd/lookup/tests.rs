use crate::cmd::test_support::{fixture_arg, run_attrib, run_attrib_json, run_attrib_stdout};

#[test]
fn lookup_falls_back_to_ancestor_scopes() {
	let fixture = fixture_arg("scene.json");
	let stdout = run_attrib_stdout(&["lookup", &fixture, "--scope", "actors[1].loot", "--key", "title"]);
	assert_eq!(stdout, "scope: <root>\nkind: string\ntitle: (demo scene)\n");
}

#[test]
fn lookup_local_stays_in_named_scope() {
	let fixture = fixture_arg("scene.json");
	let stdout = run_attrib_stdout(&["lookup", &fixture, "--scope", "actors[1].loot", "--key", "title", "--local"]);
	assert_eq!(stdout, "title: not found from actors[1].loot\n");

	let stdout = run_attrib_stdout(&["lookup", &fixture, "--scope", "actors[1].loot", "--key", "gold", "--local"]);
	assert_eq!(stdout, "scope: actors[1].loot\nkind: integer\ngold: (3)\n");
}

#[test]
fn lookup_json_reports_owner_and_values() {
	let fixture = fixture_arg("scene.json");
	let json = run_attrib_json(&["lookup", &fixture, "--scope", "actors", "--key", "health", "--json"]);
	assert_eq!(json["found"], true);
	assert_eq!(json["owner"], "actors");
	assert_eq!(json["kind"], "integer");
	assert_eq!(json["values"], serde_json::json!(["100"]));

	let json = run_attrib_json(&["lookup", &fixture, "--key", "layers", "--json"]);
	assert_eq!(json["owner"], "");
	assert_eq!(json["values"], serde_json::json!(["1", "2", "4"]));

	let json = run_attrib_json(&["lookup", &fixture, "--key", "missing", "--json"]);
	assert_eq!(json["found"], false);
	assert!(json["owner"].is_null());
}

#[test]
fn lookup_reports_bad_scope_path() {
	let fixture = fixture_arg("scene.json");
	let output = run_attrib(&["lookup", &fixture, "--scope", "title", "--key", "x"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error: scope path `title`"), "stderr: {stderr}");
}

use super::{RenderOptions, SELF_KEY, ScopeId, Table};
use crate::attr::{AttrError, Datum, Kind, Slot};

fn sample() -> (Table, ScopeId, ScopeId) {
	let mut table = Table::new();
	let root = table.root();
	table.append(root, "health").expect("append").push_back(100_i32).expect("push");
	table.append(root, "name").expect("append").push_back("hero".to_owned()).expect("push");
	let child = table.append_scope(root, "kids").expect("child scope");
	table.append(child, "age").expect("append").push_back(7_i32).expect("push");
	let grandchild = table.append_scope(child, "toys").expect("grandchild scope");
	table.append(grandchild, "count").expect("append").push_back(3_i32).expect("push");
	(table, child, grandchild)
}

#[test]
fn append_keeps_insertion_order_and_reuses_existing_cells() {
	let (mut table, _, _) = sample();
	let root = table.root();
	assert_eq!(table.keys(root).collect::<Vec<_>>(), vec!["health", "name", "kids"]);
	table.append(root, "health").expect("existing").push_back(5_i32).expect("push");
	assert_eq!(table.len(root), 3);
	assert_eq!(table.find(root, "health").expect("health").len(), 2);
	assert_eq!(table.index_of(root, "kids"), Some(2));
	let (key, datum) = table.entry(root, 1).expect("entry 1");
	assert_eq!(key, "name");
	assert_eq!(datum.kind(), Kind::String);
}

#[test]
fn search_walks_ancestors_but_find_stays_local() {
	let (table, child, grandchild) = sample();
	assert!(table.find(grandchild, "health").is_none());
	let (owner, datum) = table.search(grandchild, "health").expect("found in root");
	assert_eq!(owner, ScopeId::ROOT);
	assert_eq!(*datum.front::<i32>().expect("health"), 100);
	let (owner, _) = table.search(grandchild, "age").expect("found in child");
	assert_eq!(owner, child);
	assert!(table.search(grandchild, "missing").is_none());
}

#[test]
fn append_scope_rejects_non_table_key() {
	let (mut table, _, _) = sample();
	let err = table.append_scope(ScopeId::ROOT, "health").expect_err("integer key");
	assert!(matches!(err, AttrError::KeyKindConflict { kind: Kind::Integer, .. }));
}

#[test]
fn append_scope_sets_parent_link() {
	let (table, child, grandchild) = sample();
	assert_eq!(table.parent(child).expect("live"), Some(ScopeId::ROOT));
	assert_eq!(table.parent(grandchild).expect("live"), Some(child));
	assert_eq!(table.parent(ScopeId::ROOT).expect("live"), None);
}

#[test]
fn adopt_rejects_self_and_ancestors_without_changes() {
	let (mut table, child, grandchild) = sample();
	let before = table.clone();

	let err = table.adopt(child, child, "x").expect_err("self adoption");
	assert!(matches!(err, AttrError::AdoptCycle { .. }));
	let err = table.adopt(grandchild, child, "x").expect_err("ancestor adoption");
	assert!(matches!(err, AttrError::AdoptCycle { .. }));
	let err = table.adopt(grandchild, ScopeId::ROOT, "x").expect_err("root adoption");
	assert!(matches!(err, AttrError::AdoptCycle { .. }));

	assert_eq!(table, before);
	assert_eq!(table.parent(child).expect("live"), Some(ScopeId::ROOT));
	assert!(table.find(grandchild, "x").is_none());
}

#[test]
fn adopt_moves_scope_between_parents() {
	let (mut table, child, grandchild) = sample();
	table.adopt(ScopeId::ROOT, grandchild, "moved").expect("adopt");
	assert_eq!(table.parent(grandchild).expect("live"), Some(ScopeId::ROOT));
	assert!(table.find(child, "toys").expect("cell stays").is_empty());
	assert_eq!(table.find(ScopeId::ROOT, "moved").expect("moved").scopes(), &[grandchild]);
}

#[test]
fn orphan_then_graft_preserves_subtree() {
	let (mut table, child, _) = sample();
	let snapshot = table.subtree(child).expect("copy");

	let orphan = table.orphan(child).expect("orphan").expect("non-root");
	assert!(!table.contains(child));
	assert!(table.find(ScopeId::ROOT, "kids").expect("cell stays").is_empty());
	assert_eq!(orphan, snapshot);
	assert_eq!(orphan.parent(ScopeId::ROOT).expect("root"), None);

	let mut other = Table::new();
	let grafted = other.graft(ScopeId::ROOT, orphan, "adopted").expect("graft");
	assert_eq!(other.parent(grafted).expect("live"), Some(ScopeId::ROOT));
	assert!(other.scope_eq(grafted, &snapshot, ScopeId::ROOT));
	let (owner, _) = other.search(grafted, "adopted").expect("sees parent key");
	assert_eq!(owner, ScopeId::ROOT);
}

#[test]
fn orphan_of_root_is_a_no_op() {
	let (mut table, _, _) = sample();
	let before = table.clone();
	assert!(table.orphan(ScopeId::ROOT).expect("root orphan").is_none());
	assert_eq!(table, before);
}

#[test]
fn stale_handles_are_detected_after_slot_reuse() {
	let (mut table, child, grandchild) = sample();
	let _ = table.orphan(child).expect("orphan");
	let fresh = table.append_scope(ScopeId::ROOT, "kids").expect("reuse slot");
	assert_ne!(fresh, child);
	assert!(matches!(table.parent(grandchild), Err(AttrError::StaleScope { .. })));
	assert!(matches!(table.append(child, "x"), Err(AttrError::StaleScope { .. })));
}

#[test]
fn clone_is_deep_and_independent() {
	let (table, child, _) = sample();
	let mut copy = table.clone();
	assert_eq!(copy, table);

	copy.find_mut(child, "age").expect("age").set(8_i32, 0).expect("set");
	assert_ne!(copy, table);
	assert_eq!(*table.find(child, "age").expect("age").front::<i32>().expect("front"), 7);
}

#[test]
fn equality_matches_by_key_and_skips_self_entry() {
	let mut a = Table::new();
	a.append(ScopeId::ROOT, "x").expect("x").push_back(1_i32).expect("push");
	a.append(ScopeId::ROOT, "y").expect("y").push_back(2_i32).expect("push");
	a.append(ScopeId::ROOT, SELF_KEY).expect("self").set_kind(Kind::Pointer).expect("kind");

	let mut b = Table::new();
	b.append(ScopeId::ROOT, "y").expect("y").push_back(2_i32).expect("push");
	b.append(ScopeId::ROOT, "x").expect("x").push_back(1_i32).expect("push");
	assert_eq!(a, b);

	b.append(ScopeId::ROOT, "z").expect("z");
	assert_ne!(a, b);
}

#[test]
fn clear_releases_children() {
	let (mut table, child, grandchild) = sample();
	assert_eq!(table.scope_count(), 3);
	table.clear(ScopeId::ROOT).expect("clear");
	assert_eq!(table.scope_count(), 1);
	assert!(!table.contains(child));
	assert!(!table.contains(grandchild));
	assert!(table.is_empty(ScopeId::ROOT));
}

#[test]
fn find_containing_reports_cell_and_index() {
	let (mut table, child, _) = sample();
	let sibling = table.append_scope(ScopeId::ROOT, "kids").expect("second kid");
	assert_eq!(table.find_containing(sibling).expect("live"), Some((ScopeId::ROOT, 2, 1)));
	assert_eq!(table.find_containing(child).expect("live"), Some((ScopeId::ROOT, 2, 0)));
	assert_eq!(table.find_containing(ScopeId::ROOT).expect("live"), None);
}

#[test]
fn find_scope_index_compares_structure() {
	let (mut table, _, _) = sample();
	let empty = table.append_scope(ScopeId::ROOT, "kids").expect("second kid");
	let probe = table.subtree(empty).expect("copy");
	assert_eq!(table.find_scope_index(ScopeId::ROOT, "kids", &probe, ScopeId::ROOT), Some(1));
	assert_eq!(table.find_scope_index(ScopeId::ROOT, "health", &probe, ScopeId::ROOT), None);
}

#[test]
fn default_rendering_is_one_line_per_attribute() {
	let (table, _, _) = sample();
	assert_eq!(table.to_string(), "health: (100)\nname: (hero)\nkids: ({age: (7); toys: ({count: (3)})})\n");
}

#[test]
fn compact_rendering_truncates_depth_and_items() {
	let (mut table, _, _) = sample();
	let options = RenderOptions {
		max_depth: 1,
		max_items: 2,
		..RenderOptions::compact()
	};
	let cell = table.append(ScopeId::ROOT, "many").expect("append");
	for value in 0..5_i32 {
		cell.push_back(value).expect("push");
	}
	assert_eq!(
		table.render(ScopeId::ROOT, &options),
		"health: (100); name: (hero); kids: ({...}); many: (0) (1) ... 3 more"
	);
}

#[test]
fn clone_does_not_write_into_the_source_slot() {
	let slot = Slot::single(1_i32);
	let mut table = Table::new();
	table.append(ScopeId::ROOT, "v").expect("append").bind_external(&slot).expect("bind");
	let mut copy = table.clone();
	copy.find_mut(ScopeId::ROOT, "v").expect("v").set(2_i32, 0).expect("set");
	assert_eq!(slot.value(), Some(1));
	assert_eq!(*table.find(ScopeId::ROOT, "v").expect("v").front::<i32>().expect("front"), 1);
	assert_ne!(copy, table);
}

#[test]
fn subtree_does_not_write_into_the_source_slot() {
	let slot = Slot::single(1_i32);
	let mut table = Table::new();
	let kid = table.append_scope(ScopeId::ROOT, "kids").expect("kid");
	table.append(kid, "v").expect("append").bind_external(&slot).expect("bind");
	let mut copy = table.subtree(kid).expect("subtree");
	copy.find_mut(ScopeId::ROOT, "v").expect("v").set(2_i32, 0).expect("set");
	assert_eq!(slot.value(), Some(1));
}

#[test]
fn resolve_path_walks_table_cells() {
	let (mut table, child, grandchild) = sample();
	let second = table.append_scope(ScopeId::ROOT, "kids").expect("second kid");
	assert_eq!(table.resolve_path("").expect("root"), ScopeId::ROOT);
	assert_eq!(table.resolve_path("kids").expect("first kid"), child);
	assert_eq!(table.resolve_path("kids[1]").expect("second kid"), second);
	assert_eq!(table.resolve_path("kids.toys").expect("toys"), grandchild);

	for bad in ["health", "kids[2]", "kids.missing", "kids[x]", "kids..toys"] {
		assert!(matches!(table.resolve_path(bad), Err(AttrError::ScopePath { .. })), "{bad} should fail");
	}
}

#[test]
fn scope_path_inverts_resolve_path() {
	let (mut table, _, grandchild) = sample();
	let second = table.append_scope(ScopeId::ROOT, "kids").expect("second kid");
	assert_eq!(table.scope_path(ScopeId::ROOT).expect("root"), "");
	assert_eq!(table.scope_path(grandchild).expect("toys"), "kids.toys");
	assert_eq!(table.scope_path(second).expect("second"), "kids[1]");
	assert_eq!(table.resolve_path(&table.scope_path(second).expect("path")).expect("resolve"), second);
}

#[test]
fn render_datum_prints_one_cell() {
	let (table, _, _) = sample();
	let options = RenderOptions::default();
	assert_eq!(table.render_datum(table.find(ScopeId::ROOT, "health").expect("health"), &options), "(100)");
	assert_eq!(
		table.render_datum(table.find(ScopeId::ROOT, "kids").expect("kids"), &options),
		"({age: (7); toys: ({count: (3)})})"
	);
}

#[test]
fn table_cells_compare_through_their_tables() {
	let mut left = Table::new();
	let mut right = Table::new();
	let a = left.append_scope(ScopeId::ROOT, "kids").expect("left kid");
	let b = right.append_scope(ScopeId::ROOT, "kids").expect("right kid");
	assert_eq!(a, b);
	left.append(a, "x").expect("x").push_back(1_i32).expect("push");
	right.append(b, "x").expect("x").push_back(2_i32).expect("push");

	let (mine, theirs) = (left.find(ScopeId::ROOT, "kids").expect("kids"), right.find(ScopeId::ROOT, "kids").expect("kids"));
	assert_ne!(mine, theirs);
	assert!(!left.scope_eq(ScopeId::ROOT, &right, ScopeId::ROOT));
	assert_ne!(left, right);

	right.find_mut(b, "x").expect("x").set(1_i32, 0).expect("set");
	assert!(left.scope_eq(ScopeId::ROOT, &right, ScopeId::ROOT));
	assert_eq!(Datum::with_kind(Kind::Table), Datum::with_kind(Kind::Table));
}

mod path;
mod render;

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::attr::{AttrError, Datum, Kind, Result};

pub use render::RenderOptions;

/// Reserved key of the self entry that equality skips.
///
/// Bound hosts hold a single null pointer under this key as a placeholder;
/// the host itself is reached through [`crate::attr::resolve_host`].
pub const SELF_KEY: &str = "this";

/// Handle of one scope inside a [`Table`].
///
/// Handles carry a generation so a handle to a scope that was orphaned or
/// cleared away is reported as stale instead of silently naming a newer scope
/// that reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId {
	index: u32,
	generation: u32,
}

impl ScopeId {
	/// Root scope of every table.
	pub const ROOT: ScopeId = ScopeId { index: 0, generation: 0 };
}

impl fmt::Display for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scope#{}.{}", self.index, self.generation)
	}
}

#[derive(Debug, Clone)]
struct Node {
	parent: Option<ScopeId>,
	entries: Vec<(Box<str>, Datum)>,
	lookup: HashMap<Box<str>, usize>,
}

impl Node {
	fn new(parent: Option<ScopeId>) -> Self {
		Self {
			parent,
			entries: Vec::new(),
			lookup: HashMap::new(),
		}
	}
}

#[derive(Debug, Clone)]
struct ArenaSlot {
	generation: u32,
	node: Option<Node>,
}

/// Insertion-ordered tree of named cells.
///
/// All scopes of one tree live in a single arena addressed by [`ScopeId`];
/// [`ScopeId::ROOT`] is always live. A scope's table-kind cells list the handles
/// of the children it owns, and every non-root scope has exactly one parent.
/// Cloning copies the whole arena, so handles stay valid in the copy.
#[derive(Debug, Clone)]
pub struct Table {
	slots: Vec<ArenaSlot>,
	free: Vec<u32>,
}

impl Default for Table {
	fn default() -> Self {
		Self::new()
	}
}

impl Table {
	/// Create a table holding one empty root scope.
	pub fn new() -> Self {
		Self {
			slots: vec![ArenaSlot {
				generation: 0,
				node: Some(Node::new(None)),
			}],
			free: Vec::new(),
		}
	}

	/// Handle of the root scope.
	pub fn root(&self) -> ScopeId {
		ScopeId::ROOT
	}

	/// Whether `scope` names a live scope.
	pub fn contains(&self, scope: ScopeId) -> bool {
		self.node(scope).is_ok()
	}

	/// Number of live scopes, root included.
	pub fn scope_count(&self) -> usize {
		self.slots.len() - self.free.len()
	}

	/// Owning parent of `scope`; `None` for the root.
	pub fn parent(&self, scope: ScopeId) -> Result<Option<ScopeId>> {
		Ok(self.node(scope)?.parent)
	}

	/// Number of entries in `scope`.
	pub fn len(&self, scope: ScopeId) -> usize {
		self.node(scope).map(|node| node.entries.len()).unwrap_or(0)
	}

	/// Whether `scope` has no entries.
	pub fn is_empty(&self, scope: ScopeId) -> bool {
		self.len(scope) == 0
	}

	/// Insertion position of `key` in `scope`.
	pub fn index_of(&self, scope: ScopeId, key: &str) -> Option<usize> {
		self.node(scope).ok()?.lookup.get(key).copied()
	}

	/// Entry at insertion position `index`.
	pub fn entry(&self, scope: ScopeId, index: usize) -> Option<(&str, &Datum)> {
		let (key, datum) = self.node(scope).ok()?.entries.get(index)?;
		Some((&**key, datum))
	}

	/// Mutable entry at insertion position `index`.
	pub fn entry_mut(&mut self, scope: ScopeId, index: usize) -> Option<(&str, &mut Datum)> {
		let (key, datum) = self.node_mut(scope).ok()?.entries.get_mut(index)?;
		Some((&**key, datum))
	}

	/// Entries of `scope` in insertion order.
	pub fn entries(&self, scope: ScopeId) -> impl Iterator<Item = (&str, &Datum)> + '_ {
		self.node(scope)
			.ok()
			.into_iter()
			.flat_map(|node| node.entries.iter().map(|(key, datum)| (&**key, datum)))
	}

	/// Keys of `scope` in insertion order.
	pub fn keys(&self, scope: ScopeId) -> impl Iterator<Item = &str> + '_ {
		self.entries(scope).map(|(key, _)| key)
	}

	/// Local lookup of `key` in `scope`.
	pub fn find(&self, scope: ScopeId, key: &str) -> Option<&Datum> {
		let node = self.node(scope).ok()?;
		let index = *node.lookup.get(key)?;
		node.entries.get(index).map(|(_, datum)| datum)
	}

	/// Mutable local lookup of `key` in `scope`.
	pub fn find_mut(&mut self, scope: ScopeId, key: &str) -> Option<&mut Datum> {
		let node = self.node_mut(scope).ok()?;
		let index = *node.lookup.get(key)?;
		node.entries.get_mut(index).map(|(_, datum)| datum)
	}

	/// Lookup of `key` in `scope`, then in each ancestor in turn.
	///
	/// Returns the cell together with the scope that owns it.
	pub fn search(&self, scope: ScopeId, key: &str) -> Option<(ScopeId, &Datum)> {
		let mut current = Some(scope);
		while let Some(id) = current {
			if let Some(datum) = self.find(id, key) {
				return Some((id, datum));
			}
			current = self.node(id).ok()?.parent;
		}
		None
	}

	/// Cell for `key` in `scope`, inserted empty at the end when absent.
	pub fn append(&mut self, scope: ScopeId, key: &str) -> Result<&mut Datum> {
		let node = self.node_mut(scope)?;
		let index = match node.lookup.get(key) {
			Some(index) => *index,
			None => {
				node.entries.push((key.into(), Datum::new()));
				let index = node.entries.len() - 1;
				node.lookup.insert(key.into(), index);
				index
			}
		};
		Ok(&mut node.entries[index].1)
	}

	/// Create a new empty child scope of `scope` under `key`.
	pub fn append_scope(&mut self, scope: ScopeId, key: &str) -> Result<ScopeId> {
		self.check_scope_key(scope, key)?;
		let child = self.alloc(Some(scope));
		self.append(scope, key)?.push_scope(child)?;
		Ok(child)
	}

	/// Move `child` under `key` of `parent`, detaching it from its current parent.
	///
	/// Fails when `child` is `parent` or one of its ancestors.
	pub fn adopt(&mut self, parent: ScopeId, child: ScopeId, key: &str) -> Result<()> {
		self.node(child)?;
		if self.is_ancestor_or_self(child, parent)? {
			return Err(AttrError::AdoptCycle {
				child: child.to_string(),
				parent: parent.to_string(),
			});
		}
		self.check_scope_key(parent, key)?;

		self.detach(child)?;
		self.node_mut(child)?.parent = Some(parent);
		self.append(parent, key)?.push_scope(child)?;
		debug!(%child, %parent, key, "adopt scope");
		Ok(())
	}

	/// Detach `scope` and its subtree from this table and hand it back as its own table.
	///
	/// Orphaning the root detaches nothing and yields `None`.
	pub fn orphan(&mut self, scope: ScopeId) -> Result<Option<Table>> {
		self.node(scope)?;
		if scope == ScopeId::ROOT {
			return Ok(None);
		}

		self.detach(scope)?;
		let mut out = Table::new();
		out.import(ScopeId::ROOT, self, scope)?;
		self.release(scope);
		debug!(%scope, scopes = out.scope_count(), "orphan scope");
		Ok(Some(out))
	}

	/// Move every scope of `table` under `key` of `parent`; returns the new handle of its root.
	pub fn graft(&mut self, parent: ScopeId, table: Table, key: &str) -> Result<ScopeId> {
		self.check_scope_key(parent, key)?;
		let child = self.alloc(Some(parent));
		self.import(child, &table, ScopeId::ROOT)?;
		self.append(parent, key)?.push_scope(child)?;
		debug!(%child, %parent, key, scopes = table.scope_count(), "graft table");
		Ok(child)
	}

	/// Deep copy of `scope` and its subtree as a new table.
	pub fn subtree(&self, scope: ScopeId) -> Result<Table> {
		let mut out = Table::new();
		out.import(ScopeId::ROOT, self, scope)?;
		Ok(out)
	}

	/// Locate the cell holding `child`: its parent, entry index, and element index.
	pub fn find_containing(&self, child: ScopeId) -> Result<Option<(ScopeId, usize, usize)>> {
		let Some(parent) = self.node(child)?.parent else {
			return Ok(None);
		};
		let node = self.node(parent)?;
		for (entry_index, (_, datum)) in node.entries.iter().enumerate() {
			if let Some(element_index) = datum.scopes().iter().position(|id| *id == child) {
				return Ok(Some((parent, entry_index, element_index)));
			}
		}
		Ok(None)
	}

	/// Release every child of `scope` and remove all its entries.
	pub fn clear(&mut self, scope: ScopeId) -> Result<()> {
		let children: Vec<ScopeId> = self.node(scope)?.entries.iter().flat_map(|(_, datum)| datum.scopes().iter().copied()).collect();
		for child in children {
			self.release(child);
		}
		let node = self.node_mut(scope)?;
		node.entries.clear();
		node.lookup.clear();
		Ok(())
	}

	/// Structural equality of `scope` here and `other_scope` in `other`.
	///
	/// Entries are matched by key, the reserved [`SELF_KEY`] entry is skipped,
	/// and table-kind cells compare the referenced scopes recursively.
	pub fn scope_eq(&self, scope: ScopeId, other: &Table, other_scope: ScopeId) -> bool {
		let (Ok(a), Ok(b)) = (self.node(scope), other.node(other_scope)) else {
			return false;
		};
		let counted = |node: &Node| node.entries.iter().filter(|(key, _)| &**key != SELF_KEY).count();
		if counted(a) != counted(b) {
			return false;
		}

		a.entries.iter().filter(|(key, _)| &**key != SELF_KEY).all(|(key, datum)| {
			let Some(theirs) = other.find(other_scope, key) else {
				return false;
			};
			if datum.kind() != Kind::Table || theirs.kind() != Kind::Table {
				return datum == theirs;
			}
			let (mine, their_ids) = (datum.scopes(), theirs.scopes());
			mine.len() == their_ids.len() && mine.iter().zip(their_ids).all(|(x, y)| self.scope_eq(*x, other, *y))
		})
	}

	/// Element index of the first child under `key` structurally equal to `probe_scope` of `probe`.
	pub fn find_scope_index(&self, scope: ScopeId, key: &str, probe: &Table, probe_scope: ScopeId) -> Option<usize> {
		self.find(scope, key)?.scopes().iter().position(|id| self.scope_eq(*id, probe, probe_scope))
	}

	fn node(&self, scope: ScopeId) -> Result<&Node> {
		self.slots
			.get(scope.index as usize)
			.filter(|slot| slot.generation == scope.generation)
			.and_then(|slot| slot.node.as_ref())
			.ok_or_else(|| AttrError::StaleScope { scope: scope.to_string() })
	}

	fn node_mut(&mut self, scope: ScopeId) -> Result<&mut Node> {
		self.slots
			.get_mut(scope.index as usize)
			.filter(|slot| slot.generation == scope.generation)
			.and_then(|slot| slot.node.as_mut())
			.ok_or_else(|| AttrError::StaleScope { scope: scope.to_string() })
	}

	fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
		if let Some(index) = self.free.pop() {
			let slot = &mut self.slots[index as usize];
			slot.node = Some(Node::new(parent));
			return ScopeId {
				index,
				generation: slot.generation,
			};
		}
		self.slots.push(ArenaSlot {
			generation: 0,
			node: Some(Node::new(parent)),
		});
		ScopeId {
			index: (self.slots.len() - 1) as u32,
			generation: 0,
		}
	}

	/// Free `scope` and every descendant; the caller has already unlinked it.
	fn release(&mut self, scope: ScopeId) {
		let mut pending = vec![scope];
		while let Some(id) = pending.pop() {
			let Some(slot) = self.slots.get_mut(id.index as usize).filter(|slot| slot.generation == id.generation) else {
				continue;
			};
			let Some(node) = slot.node.take() else {
				continue;
			};
			slot.generation = slot.generation.wrapping_add(1);
			self.free.push(id.index);
			pending.extend(node.entries.iter().flat_map(|(_, datum)| datum.scopes().iter().copied()));
		}
	}

	/// Unlink `scope` from its parent's cell and clear its parent link.
	fn detach(&mut self, scope: ScopeId) -> Result<()> {
		let Some(parent) = self.node(scope)?.parent else {
			return Ok(());
		};
		let node = self.node_mut(parent)?;
		for (_, datum) in &mut node.entries {
			if datum.remove_scope(scope).is_some() {
				break;
			}
		}
		self.node_mut(scope)?.parent = None;
		Ok(())
	}

	fn is_ancestor_or_self(&self, candidate: ScopeId, scope: ScopeId) -> Result<bool> {
		let mut current = Some(scope);
		while let Some(id) = current {
			if id == candidate {
				return Ok(true);
			}
			current = self.node(id)?.parent;
		}
		Ok(false)
	}

	fn check_scope_key(&self, scope: ScopeId, key: &str) -> Result<()> {
		self.node(scope)?;
		match self.find(scope, key).map(Datum::kind) {
			None | Some(Kind::Unknown) | Some(Kind::Table) => Ok(()),
			Some(kind) => Err(AttrError::KeyKindConflict { key: key.to_owned(), kind }),
		}
	}

	/// Copy the entries of `src_scope` in `src` into the existing scope `target`,
	/// recreating the whole subtree with fresh handles.
	fn import(&mut self, target: ScopeId, src: &Table, src_scope: ScopeId) -> Result<()> {
		let src_node = src.node(src_scope)?;
		let mut entries = src_node.entries.clone();
		for (_, datum) in &mut entries {
			let Some(ids) = datum.scopes_mut() else {
				continue;
			};
			for id in ids.iter_mut() {
				let child = self.alloc(Some(target));
				self.import(child, src, *id)?;
				*id = child;
			}
		}

		let node = self.node_mut(target)?;
		node.lookup = src_node.lookup.clone();
		node.entries = entries;
		Ok(())
	}
}

impl PartialEq for Table {
	fn eq(&self, other: &Self) -> bool {
		self.scope_eq(ScopeId::ROOT, other, ScopeId::ROOT)
	}
}

#[cfg(test)]
mod tests;

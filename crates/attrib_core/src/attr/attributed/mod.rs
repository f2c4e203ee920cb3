use std::any::{Any, type_name};
use std::rc::Rc;

use tracing::debug;

use crate::attr::{AttrError, Datum, Kind, ObjectRef, Result, SELF_KEY, Schema, SchemaRegistry, ScopeId, Signature, Table};

/// A value whose fields are exposed as named attributes.
///
/// Composition stands in for inheritance: a type built over another keeps it
/// as a field, returns it from [`Host::base`], and forwards
/// [`Host::attributes`] to it, so the whole chain shares one [`Attributed`].
pub trait Host: Any {
	/// Upcast for downcasting through the base chain.
	fn as_any(&self) -> &dyn Any;

	/// The value this one is composed over, if any.
	fn base(&self) -> Option<&dyn Host> {
		None
	}

	/// Attribute table of this value.
	fn attributes(&self) -> &Attributed;

	/// Mutable attribute table of this value.
	fn attributes_mut(&mut self) -> &mut Attributed;

	/// Type name used in diagnostics.
	fn host_name(&self) -> &'static str {
		type_name::<Self>()
	}
}

/// Find the `H` part of `host` by walking its base chain.
pub fn resolve_host<H: Host>(host: &dyn Host) -> Option<&H> {
	let mut current = Some(host);
	while let Some(item) = current {
		if let Some(found) = item.as_any().downcast_ref::<H>() {
			return Some(found);
		}
		current = item.base();
	}
	None
}

/// Attribute table of one host instance.
///
/// After [`bind`] the root scope starts with the [`SELF_KEY`] entry followed
/// by one cell per registered signature, in registration order. Those are the
/// prescribed attributes; anything appended afterwards is auxiliary.
#[derive(Debug, Clone)]
pub struct Attributed {
	table: Table,
	type_name: &'static str,
	signatures: Rc<[Signature]>,
	prescribed: usize,
}

impl Default for Attributed {
	fn default() -> Self {
		Self {
			table: Table::new(),
			type_name: "",
			signatures: Rc::from(Vec::new()),
			prescribed: 0,
		}
	}
}

impl Attributed {
	fn from_schema(schema: &Schema) -> Result<Self> {
		let mut table = Table::new();
		table.append(ScopeId::ROOT, SELF_KEY)?.push_back(ObjectRef::NULL)?;
		for signature in schema.signatures.iter() {
			table.append(ScopeId::ROOT, &signature.name)?.set_kind(signature.kind)?;
		}
		Ok(Self {
			prescribed: table.len(ScopeId::ROOT),
			table,
			type_name: schema.type_name,
			signatures: schema.signatures.clone(),
		})
	}

	fn alias(&mut self, host: &dyn Host) -> Result<()> {
		for (index, signature) in self.signatures.iter().enumerate() {
			if signature.kind == Kind::Table {
				continue;
			}
			let (_, datum) = self.table.entry_mut(ScopeId::ROOT, index + 1).ok_or_else(|| AttrError::HostMismatch {
				name: signature.name.to_string(),
				host: host.host_name(),
			})?;
			signature.alias(host, datum)?;
		}
		Ok(())
	}

	/// Whether this table was built from a schema.
	pub fn is_bound(&self) -> bool {
		self.prescribed > 0
	}

	/// Type name of the schema this table was bound with.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Signatures this table was bound with.
	pub fn signatures(&self) -> &[Signature] {
		&self.signatures
	}

	/// Number of prescribed entries, self entry included.
	pub fn prescribed_len(&self) -> usize {
		self.prescribed
	}

	/// Underlying table.
	pub fn table(&self) -> &Table {
		&self.table
	}

	/// Underlying table, for adopting children into table-kind attributes.
	pub fn table_mut(&mut self) -> &mut Table {
		&mut self.table
	}

	/// Root cell for `key`.
	pub fn get(&self, key: &str) -> Option<&Datum> {
		self.table.find(ScopeId::ROOT, key)
	}

	/// Mutable root cell for `key`.
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Datum> {
		self.table.find_mut(ScopeId::ROOT, key)
	}

	/// Whether the root holds `key`.
	pub fn is_attribute(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Whether `key` is the self entry or a registered signature name.
	pub fn is_prescribed_attribute(&self, key: &str) -> bool {
		(self.is_bound() && key == SELF_KEY) || self.signatures.iter().any(|signature| &*signature.name == key)
	}

	/// Whether `key` is present but not prescribed.
	pub fn is_auxiliary_attribute(&self, key: &str) -> bool {
		self.is_attribute(key) && !self.is_prescribed_attribute(key)
	}

	/// Owned cell for an auxiliary attribute, created when absent.
	pub fn append_auxiliary(&mut self, key: &str) -> Result<&mut Datum> {
		if self.is_prescribed_attribute(key) {
			return Err(AttrError::PrescribedCollision { key: key.to_owned() });
		}
		self.table.append(ScopeId::ROOT, key)
	}

	/// Every root entry in order.
	pub fn attributes(&self) -> impl Iterator<Item = (&str, &Datum)> + '_ {
		self.table.entries(ScopeId::ROOT)
	}

	/// The self entry followed by one entry per signature.
	pub fn prescribed_attributes(&self) -> impl Iterator<Item = (&str, &Datum)> + '_ {
		self.attributes().take(self.prescribed)
	}

	/// Entries appended after binding.
	pub fn auxiliary_attributes(&self) -> impl Iterator<Item = (&str, &Datum)> + '_ {
		self.attributes().skip(self.prescribed)
	}
}

impl PartialEq for Attributed {
	fn eq(&self, other: &Self) -> bool {
		self.table == other.table
	}
}

/// Build the attribute table of `host` from the schema registered for `H`.
///
/// Replaces whatever table the host had. Non-table signatures alias host storage,
/// table signatures start as empty table cells.
pub fn bind<H: Host>(registry: &SchemaRegistry, host: &mut H) -> Result<()> {
	let mut attributes = Attributed::from_schema(registry.get::<H>()?)?;
	attributes.alias(&*host)?;
	debug!(host = type_name::<H>(), prescribed = attributes.prescribed, "bind attributes");
	*host.attributes_mut() = attributes;
	Ok(())
}

/// Re-point every aliased prescribed cell at the storage of `host`.
///
/// Values and auxiliary entries stay as they are. Run after cloning a host;
/// moving a host needs nothing since slots live on the heap.
pub fn rebind<H: Host>(host: &mut H) -> Result<()> {
	let mut attributes = std::mem::take(host.attributes_mut());
	let outcome = attributes.alias(&*host);
	*host.attributes_mut() = attributes;
	outcome
}

/// Clone `host` so the copy's prescribed cells alias the copy's own storage.
pub fn clone_host<H: Host + Clone>(host: &H) -> Result<H> {
	let mut copy = host.clone();
	rebind(&mut copy)?;
	Ok(copy)
}

/// Overwrite `target` with a rebound clone of `source`.
pub fn assign_host<H: Host + Clone>(target: &mut H, source: &H) -> Result<()> {
	*target = clone_host(source)?;
	Ok(())
}

use std::any::{TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::attr::{AttrError, Datum, Element, Host, Kind, Result, Slot, resolve_host};

type Accessor = Rc<dyn Fn(&dyn Host, &mut Datum) -> Result<()>>;

/// One attribute a host type exposes: name, kind, element count, and how to reach its storage.
///
/// Non-table signatures carry an accessor that finds the declaring type inside
/// a host and aliases the matching [`Slot`] into a cell. Table signatures have
/// no storage to alias; their children are adopted explicitly.
#[derive(Clone)]
pub struct Signature {
	/// Attribute key.
	pub name: Box<str>,
	/// Value kind.
	pub kind: Kind,
	/// Element count; `0` on a table signature means variable length.
	pub count: usize,
	accessor: Option<Accessor>,
}

impl Signature {
	/// Signature aliasing the slot `field` returns on a host of type `H`.
	pub fn field<H: Host, T: Element>(name: &str, count: usize, field: fn(&H) -> &Slot<T>) -> Self {
		let label: Box<str> = name.into();
		let accessor: Accessor = Rc::new(move |host: &dyn Host, datum: &mut Datum| -> Result<()> {
			let owner = resolve_host::<H>(host).ok_or_else(|| AttrError::HostMismatch {
				name: label.to_string(),
				host: host.host_name(),
			})?;
			let slot = field(owner);
			if slot.len() != count {
				return Err(AttrError::BindLengthMismatch {
					name: label.to_string(),
					expected: count,
					got: slot.len(),
				});
			}
			datum.bind_external(slot)
		});
		Self {
			name: name.into(),
			kind: T::KIND,
			count,
			accessor: Some(accessor),
		}
	}

	/// Signature of a nested-table attribute.
	pub fn table(name: &str, count: usize) -> Self {
		Self {
			name: name.into(),
			kind: Kind::Table,
			count,
			accessor: None,
		}
	}

	/// Whether binding aliases host storage for this signature.
	pub fn is_aliased(&self) -> bool {
		self.accessor.is_some()
	}

	pub(crate) fn alias(&self, host: &dyn Host, datum: &mut Datum) -> Result<()> {
		match &self.accessor {
			Some(accessor) => accessor(host, datum),
			None => Ok(()),
		}
	}
}

impl fmt::Debug for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signature")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("count", &self.count)
			.field("aliased", &self.is_aliased())
			.finish()
	}
}

/// Registered attribute layout of one host type.
#[derive(Debug, Clone)]
pub struct Schema {
	/// Rust type name, for diagnostics.
	pub type_name: &'static str,
	/// Type this schema was composed over.
	pub parent: Option<TypeId>,
	/// Own signatures first, then the parent's full list.
	pub signatures: Rc<[Signature]>,
}

/// Map from host type to its ordered signature list.
///
/// Build one at startup, register every host type before constructing
/// instances, and pass it by reference to [`crate::attr::bind`]. Bound
/// instances keep their own handle on the signatures, so removing a type
/// later does not disturb live instances.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	entries: HashMap<TypeId, Schema>,
}

impl SchemaRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `H` with `signatures`; returns `false` when `H` is already present.
	pub fn add<H: 'static>(&mut self, signatures: Vec<Signature>) -> bool {
		let id = TypeId::of::<H>();
		if self.entries.contains_key(&id) {
			return false;
		}
		debug!(type_name = type_name::<H>(), signatures = signatures.len(), "register schema");
		self.entries.insert(
			id,
			Schema {
				type_name: type_name::<H>(),
				parent: None,
				signatures: signatures.into(),
			},
		);
		true
	}

	/// Register `H` composed over the already registered `P`.
	///
	/// The stored list is `signatures` followed by every signature of `P`.
	/// The parent list is copied, so later changes to `P` do not reach `H`.
	/// A name that appears twice in the combined list is a
	/// [`AttrError::PrescribedCollision`].
	pub fn add_with_parent<H: 'static, P: 'static>(&mut self, mut signatures: Vec<Signature>) -> Result<bool> {
		let parent = self.entries.get(&TypeId::of::<P>()).ok_or(AttrError::ParentNotRegistered {
			type_name: type_name::<H>(),
			parent: type_name::<P>(),
		})?;
		let id = TypeId::of::<H>();
		if self.entries.contains_key(&id) {
			return Ok(false);
		}

		signatures.extend(parent.signatures.iter().cloned());
		let mut seen = HashSet::new();
		if let Some(clash) = signatures.iter().find(|signature| !seen.insert(&*signature.name)) {
			return Err(AttrError::PrescribedCollision { key: clash.name.to_string() });
		}
		debug!(
			type_name = type_name::<H>(),
			parent = type_name::<P>(),
			signatures = signatures.len(),
			"register derived schema"
		);
		self.entries.insert(
			id,
			Schema {
				type_name: type_name::<H>(),
				parent: Some(TypeId::of::<P>()),
				signatures: signatures.into(),
			},
		);
		Ok(true)
	}

	/// Drop the schema of `H`; returns whether it was present.
	pub fn remove<H: 'static>(&mut self) -> bool {
		let removed = self.entries.remove(&TypeId::of::<H>()).is_some();
		if removed {
			debug!(type_name = type_name::<H>(), "remove schema");
		}
		removed
	}

	/// Drop every schema.
	pub fn clear(&mut self) {
		debug!(count = self.entries.len(), "clear schemas");
		self.entries.clear();
	}

	/// Whether `H` is registered.
	pub fn contains<H: 'static>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<H>())
	}

	/// Schema of `H`.
	pub fn get<H: 'static>(&self) -> Result<&Schema> {
		self.entries.get(&TypeId::of::<H>()).ok_or(AttrError::TypeNotRegistered { type_name: type_name::<H>() })
	}

	/// Schema by raw type identity.
	pub fn get_by_id(&self, id: TypeId) -> Option<&Schema> {
		self.entries.get(&id)
	}

	/// Every registered schema.
	pub fn all(&self) -> &HashMap<TypeId, Schema> {
		&self.entries
	}

	/// Number of registered types.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests;

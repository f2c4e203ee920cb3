mod element;
mod storage;

use tracing::trace;

use crate::attr::{AttrError, Kind, Mat4, ObjectRef, Result, ScopeId, Slot, Vec4};

pub use element::Element;
pub use storage::ElemRef;
use storage::{Data, Storage};

/// Capacity increment to apply when an owned cell is full.
pub type GrowthPolicy = fn(usize) -> usize;

/// Grow one slot at a time while small, then by half the current capacity.
pub fn default_growth(capacity: usize) -> usize {
	if capacity < 16 { 1 } else { capacity / 2 }
}

/// Homogeneous, kind-tagged, growable array of values.
///
/// A cell picks its kind once, on first use or through [`Datum::set_kind`],
/// and keeps it for life. Storage is either owned by the cell or aliased onto
/// a host [`Slot`]; aliased cells have a fixed length and only accept element
/// writes. Table-kind cells hold handles of child scopes and are edited only
/// through the owning [`crate::attr::Table`].
#[derive(Debug, Clone)]
pub struct Datum {
	data: Data,
	growth: GrowthPolicy,
}

impl Default for Datum {
	fn default() -> Self {
		Self::new()
	}
}

impl Datum {
	/// Create an empty cell with no kind.
	pub fn new() -> Self {
		Self {
			data: Data::Unknown,
			growth: default_growth,
		}
	}

	/// Create an empty cell of `kind`.
	pub fn with_kind(kind: Kind) -> Self {
		let mut datum = Self::new();
		datum.data = empty_data(kind);
		datum
	}

	/// Replace the growth policy used by implicit appends.
	pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
		self.growth = growth;
		self
	}

	/// Create an owned cell holding `values`.
	pub fn from_values<T: Element>(values: Vec<T>) -> Self {
		let mut datum = Self::new();
		datum.data = T::wrap(Storage::Owned(values));
		datum
	}

	/// Current kind.
	pub fn kind(&self) -> Kind {
		match &self.data {
			Data::Unknown => Kind::Unknown,
			Data::Integer(_) => Kind::Integer,
			Data::Float(_) => Kind::Float,
			Data::String(_) => Kind::String,
			Data::Vector(_) => Kind::Vector,
			Data::Matrix(_) => Kind::Matrix,
			Data::Pointer(_) => Kind::Pointer,
			Data::Table(_) => Kind::Table,
		}
	}

	/// Fix the kind of an empty cell; re-setting the same kind is a no-op.
	pub fn set_kind(&mut self, kind: Kind) -> Result<()> {
		let current = self.kind();
		if current == kind {
			return Ok(());
		}
		if current != Kind::Unknown {
			return Err(AttrError::KindAlreadySet { current, requested: kind });
		}
		self.data = empty_data(kind);
		Ok(())
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		match &self.data {
			Data::Unknown => 0,
			Data::Integer(storage) => storage.len(),
			Data::Float(storage) => storage.len(),
			Data::String(storage) => storage.len(),
			Data::Vector(storage) => storage.len(),
			Data::Matrix(storage) => storage.len(),
			Data::Pointer(storage) => storage.len(),
			Data::Table(ids) => ids.len(),
		}
	}

	/// Whether the cell has no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Allocated element slots; equals `len` for aliased cells.
	pub fn capacity(&self) -> usize {
		match &self.data {
			Data::Unknown => 0,
			Data::Integer(storage) => storage.capacity(),
			Data::Float(storage) => storage.capacity(),
			Data::String(storage) => storage.capacity(),
			Data::Vector(storage) => storage.capacity(),
			Data::Matrix(storage) => storage.capacity(),
			Data::Pointer(storage) => storage.capacity(),
			Data::Table(ids) => ids.capacity(),
		}
	}

	/// Whether the cell aliases host memory.
	pub fn is_aliased(&self) -> bool {
		match &self.data {
			Data::Unknown | Data::Table(_) => false,
			Data::Integer(storage) => storage.is_aliased(),
			Data::Float(storage) => storage.is_aliased(),
			Data::String(storage) => storage.is_aliased(),
			Data::Vector(storage) => storage.is_aliased(),
			Data::Matrix(storage) => storage.is_aliased(),
			Data::Pointer(storage) => storage.is_aliased(),
		}
	}

	/// Ensure room for at least `capacity` elements without reallocating.
	pub fn reserve(&mut self, capacity: usize) -> Result<()> {
		const OP: &str = "reserve";
		match &mut self.data {
			Data::Unknown => Err(AttrError::KindUnset),
			Data::Integer(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::Float(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::String(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::Vector(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::Matrix(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::Pointer(storage) => reserve_to(storage.owned_mut(OP)?, capacity),
			Data::Table(ids) => reserve_to(ids, capacity),
		}
	}

	/// Drop spare capacity.
	pub fn shrink_to_fit(&mut self) -> Result<()> {
		const OP: &str = "shrink";
		match &mut self.data {
			Data::Unknown => {}
			Data::Integer(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::Float(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::String(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::Vector(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::Matrix(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::Pointer(storage) => storage.owned_mut(OP)?.shrink_to_fit(),
			Data::Table(ids) => ids.shrink_to_fit(),
		}
		Ok(())
	}

	/// Grow or truncate to `len` elements, filling new slots with kind defaults.
	pub fn resize(&mut self, len: usize) -> Result<()> {
		const OP: &str = "resize";
		match &mut self.data {
			Data::Unknown => Err(AttrError::KindUnset),
			Data::Integer(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::Float(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::String(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::Vector(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::Matrix(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::Pointer(storage) => resize_to(storage.owned_mut(OP)?, len),
			Data::Table(_) => Err(AttrError::ScopeCellManaged { op: OP }),
		}
	}

	/// Remove every element, keeping the kind.
	pub fn clear(&mut self) -> Result<()> {
		const OP: &str = "clear";
		match &mut self.data {
			Data::Unknown => {}
			Data::Integer(storage) => storage.owned_mut(OP)?.clear(),
			Data::Float(storage) => storage.owned_mut(OP)?.clear(),
			Data::String(storage) => storage.owned_mut(OP)?.clear(),
			Data::Vector(storage) => storage.owned_mut(OP)?.clear(),
			Data::Matrix(storage) => storage.owned_mut(OP)?.clear(),
			Data::Pointer(storage) => storage.owned_mut(OP)?.clear(),
			Data::Table(ids) if ids.is_empty() => {}
			Data::Table(_) => return Err(AttrError::ScopeCellManaged { op: OP }),
		}
		Ok(())
	}

	/// Append one element, fixing the kind on first use.
	pub fn push_back<T: Element>(&mut self, value: T) -> Result<()> {
		if self.kind() == Kind::Unknown {
			self.data = T::wrap(Storage::Owned(Vec::new()));
		}
		let growth = self.growth;
		let items = self.storage_mut::<T>()?.owned_mut("push onto")?;
		if items.len() == items.capacity() {
			let increment = growth(items.capacity()).max(1);
			trace!(kind = %T::KIND, capacity = items.capacity(), increment, "grow cell");
			items.reserve_exact(increment);
		}
		items.push(value);
		Ok(())
	}

	/// Remove the last element.
	pub fn pop_back(&mut self) -> Result<()> {
		let len = self.len();
		if len == 0 {
			return Err(AttrError::IndexOutOfRange { index: 0, len });
		}
		self.remove_at(len - 1)
	}

	/// Remove the element at `index`, shifting the tail down.
	pub fn remove_at(&mut self, index: usize) -> Result<()> {
		const OP: &str = "remove from";
		let len = self.len();
		if index >= len {
			return Err(AttrError::IndexOutOfRange { index, len });
		}
		match &mut self.data {
			Data::Unknown => return Err(AttrError::KindUnset),
			Data::Integer(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::Float(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::String(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::Vector(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::Matrix(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::Pointer(storage) => drop(storage.owned_mut(OP)?.remove(index)),
			Data::Table(_) => return Err(AttrError::ScopeCellManaged { op: OP }),
		}
		Ok(())
	}

	/// Read the element at `index`; aliased elements are copied out.
	pub fn get<T: Element>(&self, index: usize) -> Result<ElemRef<'_, T>> {
		let storage = self.storage::<T>()?;
		let len = storage.len();
		storage.get(index).ok_or(AttrError::IndexOutOfRange { index, len })
	}

	/// Read the first element.
	pub fn front<T: Element>(&self) -> Result<ElemRef<'_, T>> {
		self.get(0)
	}

	/// Read the last element.
	pub fn back<T: Element>(&self) -> Result<ElemRef<'_, T>> {
		let storage = self.storage::<T>()?;
		let len = storage.len();
		match len.checked_sub(1) {
			Some(last) => self.get(last),
			None => Err(AttrError::IndexOutOfRange { index: 0, len }),
		}
	}

	/// Overwrite the element at `index`; allowed on aliased cells.
	pub fn set<T: Element>(&mut self, value: T, index: usize) -> Result<()> {
		let storage = self.storage_mut::<T>()?;
		let len = storage.len();
		if storage.set(index, value) {
			Ok(())
		} else if index < len {
			Err(AttrError::SlotBorrowed { index })
		} else {
			Err(AttrError::IndexOutOfRange { index, len })
		}
	}

	/// Copy every element out.
	pub fn values<T: Element>(&self) -> Result<Vec<T>> {
		let storage = self.storage::<T>()?;
		Ok((0..storage.len()).filter_map(|index| storage.get(index).map(|item| item.clone())).collect())
	}

	/// Position of the first element equal to `value` under kind-appropriate equality.
	pub fn find_index<T: Element>(&self, value: &T) -> Option<usize> {
		let storage = T::storage(&self.data)?;
		(0..storage.len()).find(|index| storage.get(*index).is_some_and(|item| item.same(value)))
	}

	/// Drop owned storage and alias the elements of `slot` instead.
	///
	/// The cell keeps a handle to the host buffer; it cannot grow, shrink, or be
	/// cleared afterwards, but element writes go straight to the host.
	pub fn bind_external<T: Element>(&mut self, slot: &Slot<T>) -> Result<()> {
		let current = self.kind();
		if current != Kind::Unknown && current != T::KIND {
			return Err(AttrError::KindAlreadySet {
				current,
				requested: T::KIND,
			});
		}
		if slot.is_empty() {
			return Err(AttrError::EmptyExternal);
		}
		self.data = T::wrap(Storage::Aliased(slot.share()));
		Ok(())
	}

	/// Render the element at `index` in its textual form.
	pub fn to_string_at(&self, index: usize) -> Result<String> {
		match &self.data {
			Data::Unknown => Err(AttrError::IndexOutOfRange { index, len: 0 }),
			Data::Integer(storage) => render_at(storage, index),
			Data::Float(storage) => render_at(storage, index),
			Data::String(storage) => render_at(storage, index),
			Data::Vector(storage) => render_at(storage, index),
			Data::Matrix(storage) => render_at(storage, index),
			Data::Pointer(storage) => render_at(storage, index),
			Data::Table(ids) => ids.get(index).map(ToString::to_string).ok_or(AttrError::IndexOutOfRange { index, len: ids.len() }),
		}
	}

	/// Parse `text` in the cell's textual form and store it at `index`.
	pub fn set_from_string(&mut self, text: &str, index: usize) -> Result<()> {
		match self.kind() {
			Kind::Unknown => Err(AttrError::KindUnset),
			Kind::Integer => self.set(i32::parse(text)?, index),
			Kind::Float => self.set(f32::parse(text)?, index),
			Kind::String => self.set(String::parse(text)?, index),
			Kind::Vector => self.set(Vec4::parse(text)?, index),
			Kind::Matrix => self.set(Mat4::parse(text)?, index),
			Kind::Pointer => self.set(ObjectRef::parse(text)?, index),
			Kind::Table => Err(AttrError::ParseUnsupported { kind: Kind::Table }),
		}
	}

	/// Parse `text` as an element of `kind` and append it.
	pub fn push_from_string(&mut self, kind: Kind, text: &str) -> Result<()> {
		self.set_kind(kind)?;
		match kind {
			Kind::Unknown => Err(AttrError::KindUnset),
			Kind::Integer => self.push_back(i32::parse(text)?),
			Kind::Float => self.push_back(f32::parse(text)?),
			Kind::String => self.push_back(String::parse(text)?),
			Kind::Vector => self.push_back(Vec4::parse(text)?),
			Kind::Matrix => self.push_back(Mat4::parse(text)?),
			Kind::Pointer => self.push_back(ObjectRef::parse(text)?),
			Kind::Table => Err(AttrError::ParseUnsupported { kind: Kind::Table }),
		}
	}

	/// Child scope handles of a table-kind cell.
	pub fn scopes(&self) -> &[ScopeId] {
		match &self.data {
			Data::Table(ids) => ids,
			_ => &[],
		}
	}

	pub(crate) fn push_scope(&mut self, scope: ScopeId) -> Result<()> {
		self.set_kind(Kind::Table)?;
		if let Data::Table(ids) = &mut self.data {
			if ids.len() == ids.capacity() {
				ids.reserve_exact((self.growth)(ids.capacity()).max(1));
			}
			ids.push(scope);
		}
		Ok(())
	}

	pub(crate) fn remove_scope(&mut self, scope: ScopeId) -> Option<usize> {
		let Data::Table(ids) = &mut self.data else {
			return None;
		};
		let index = ids.iter().position(|id| *id == scope)?;
		ids.remove(index);
		Some(index)
	}

	pub(crate) fn scopes_mut(&mut self) -> Option<&mut Vec<ScopeId>> {
		match &mut self.data {
			Data::Table(ids) => Some(ids),
			_ => None,
		}
	}

	fn storage<T: Element>(&self) -> Result<&Storage<T>> {
		let got = self.kind();
		T::storage(&self.data).ok_or(AttrError::KindMismatch { expected: T::KIND, got })
	}

	fn storage_mut<T: Element>(&mut self) -> Result<&mut Storage<T>> {
		let got = self.kind();
		T::storage_mut(&mut self.data).ok_or(AttrError::KindMismatch { expected: T::KIND, got })
	}
}

/// Same kind, same length, and pairwise equal elements; aliasing is ignored.
///
/// Table-kind cells are equal only when both are empty: their handles mean
/// nothing without the owning table, so comparing children goes through
/// [`crate::attr::Table::scope_eq`].
impl PartialEq for Datum {
	fn eq(&self, other: &Self) -> bool {
		match (&self.data, &other.data) {
			(Data::Unknown, Data::Unknown) => true,
			(Data::Integer(a), Data::Integer(b)) => storage_eq(a, b),
			(Data::Float(a), Data::Float(b)) => storage_eq(a, b),
			(Data::String(a), Data::String(b)) => storage_eq(a, b),
			(Data::Vector(a), Data::Vector(b)) => storage_eq(a, b),
			(Data::Matrix(a), Data::Matrix(b)) => storage_eq(a, b),
			(Data::Pointer(a), Data::Pointer(b)) => storage_eq(a, b),
			(Data::Table(a), Data::Table(b)) => a.is_empty() && b.is_empty(),
			_ => false,
		}
	}
}

fn empty_data(kind: Kind) -> Data {
	match kind {
		Kind::Unknown => Data::Unknown,
		Kind::Integer => Data::Integer(Storage::Owned(Vec::new())),
		Kind::Float => Data::Float(Storage::Owned(Vec::new())),
		Kind::String => Data::String(Storage::Owned(Vec::new())),
		Kind::Vector => Data::Vector(Storage::Owned(Vec::new())),
		Kind::Matrix => Data::Matrix(Storage::Owned(Vec::new())),
		Kind::Pointer => Data::Pointer(Storage::Owned(Vec::new())),
		Kind::Table => Data::Table(Vec::new()),
	}
}

fn reserve_to<T>(items: &mut Vec<T>, capacity: usize) -> Result<()> {
	if capacity > items.capacity() {
		items.reserve_exact(capacity - items.len());
	}
	Ok(())
}

fn resize_to<T: Element>(items: &mut Vec<T>, len: usize) -> Result<()> {
	items.resize_with(len, T::default_value);
	Ok(())
}

fn render_at<T: Element>(storage: &Storage<T>, index: usize) -> Result<String> {
	let len = storage.len();
	storage.get(index).map(|item| item.render()).ok_or(AttrError::IndexOutOfRange { index, len })
}

fn storage_eq<T: Element>(a: &Storage<T>, b: &Storage<T>) -> bool {
	a.len() == b.len() && (0..a.len()).all(|index| matches!((a.get(index), b.get(index)), (Some(x), Some(y)) if x.same(&y)))
}

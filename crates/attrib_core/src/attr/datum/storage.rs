use std::ops::Deref;

use crate::attr::{AttrError, Mat4, ObjectRef, Result, ScopeId, Slot, Vec4};

/// Element buffer of one typed cell.
#[derive(Debug)]
pub enum Storage<T> {
	/// Cell owns and may resize its elements.
	Owned(Vec<T>),
	/// Cell aliases host memory; only element writes are allowed.
	Aliased(Slot<T>),
}

/// Kind-tagged payload of a cell.
#[derive(Debug, Default)]
pub enum Data {
	/// No kind chosen yet.
	#[default]
	Unknown,
	/// `i32` elements.
	Integer(Storage<i32>),
	/// `f32` elements.
	Float(Storage<f32>),
	/// String elements.
	String(Storage<String>),
	/// Vector elements.
	Vector(Storage<Vec4>),
	/// Matrix elements.
	Matrix(Storage<Mat4>),
	/// Object references.
	Pointer(Storage<ObjectRef>),
	/// Handles of owned child scopes.
	Table(Vec<ScopeId>),
}

/// Wiring between an element type and its `Data` variant.
pub trait Storable: Sized {
	/// Typed storage when `data` holds this element type.
	fn storage(data: &Data) -> Option<&Storage<Self>>;
	/// Mutable typed storage when `data` holds this element type.
	fn storage_mut(data: &mut Data) -> Option<&mut Storage<Self>>;
	/// Wrap typed storage in its variant.
	fn wrap(storage: Storage<Self>) -> Data;
}

macro_rules! storable {
	($ty:ty, $variant:ident) => {
		impl Storable for $ty {
			fn storage(data: &Data) -> Option<&Storage<Self>> {
				match data {
					Data::$variant(storage) => Some(storage),
					_ => None,
				}
			}

			fn storage_mut(data: &mut Data) -> Option<&mut Storage<Self>> {
				match data {
					Data::$variant(storage) => Some(storage),
					_ => None,
				}
			}

			fn wrap(storage: Storage<Self>) -> Data {
				Data::$variant(storage)
			}
		}
	};
}

storable!(i32, Integer);
storable!(f32, Float);
storable!(String, String);
storable!(Vec4, Vector);
storable!(Mat4, Matrix);
storable!(ObjectRef, Pointer);

/// Read access to one element, over owned or aliased storage.
///
/// Aliased elements are copied out of the host slot, so holding one never
/// blocks a write to the host field.
pub enum ElemRef<'a, T> {
	/// Element inside an owned buffer.
	Owned(&'a T),
	/// Copy of an element inside a host slot.
	Aliased(T),
}

impl<T> Deref for ElemRef<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		match self {
			Self::Owned(item) => item,
			Self::Aliased(item) => item,
		}
	}
}

impl<T> Storage<T> {
	pub fn len(&self) -> usize {
		match self {
			Self::Owned(items) => items.len(),
			Self::Aliased(slot) => slot.len(),
		}
	}

	pub fn capacity(&self) -> usize {
		match self {
			Self::Owned(items) => items.capacity(),
			Self::Aliased(slot) => slot.len(),
		}
	}

	pub fn is_aliased(&self) -> bool {
		matches!(self, Self::Aliased(_))
	}

	pub fn set(&mut self, index: usize, value: T) -> bool {
		match self {
			Self::Owned(items) => match items.get_mut(index) {
				Some(item) => {
					*item = value;
					true
				}
				None => false,
			},
			Self::Aliased(slot) => slot.set(index, value),
		}
	}

	/// Owned buffer, or an ownership violation naming `op`.
	pub fn owned_mut(&mut self, op: &'static str) -> Result<&mut Vec<T>> {
		match self {
			Self::Owned(items) => Ok(items),
			Self::Aliased(_) => Err(AttrError::AliasedStorage { op }),
		}
	}
}

impl<T: Clone> Storage<T> {
	pub fn get(&self, index: usize) -> Option<ElemRef<'_, T>> {
		match self {
			Self::Owned(items) => items.get(index).map(ElemRef::Owned),
			Self::Aliased(slot) => slot.get(index).map(ElemRef::Aliased),
		}
	}
}

impl<T> Clone for Storage<T>
where
	T: Clone,
{
	/// Aliased buffers are copied into a private slot of the same length; the
	/// copy never writes into the source host until it is bound again.
	fn clone(&self) -> Self {
		match self {
			Self::Owned(items) => Self::Owned(items.clone()),
			Self::Aliased(slot) => Self::Aliased(slot.clone()),
		}
	}
}

impl Clone for Data {
	fn clone(&self) -> Self {
		match self {
			Self::Unknown => Self::Unknown,
			Self::Integer(storage) => Self::Integer(storage.clone()),
			Self::Float(storage) => Self::Float(storage.clone()),
			Self::String(storage) => Self::String(storage.clone()),
			Self::Vector(storage) => Self::Vector(storage.clone()),
			Self::Matrix(storage) => Self::Matrix(storage.clone()),
			Self::Pointer(storage) => Self::Pointer(storage.clone()),
			Self::Table(ids) => Self::Table(ids.clone()),
		}
	}
}

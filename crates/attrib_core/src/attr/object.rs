use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Capability interface for values referenced by pointer-kind cells.
pub trait Object: Any {
	/// Human-readable type label.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Upcast for safe downcasting to the concrete type.
	fn as_any(&self) -> &dyn Any;

	/// Target equality against another object of any concrete type.
	fn equals(&self, other: &dyn Object) -> bool;

	/// Textual form used when a pointer cell is rendered.
	fn describe(&self) -> String {
		self.type_name().to_owned()
	}
}

impl dyn Object {
	/// Borrow as concrete `T` when the object is one.
	pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	/// Whether the object is a `T`.
	pub fn is<T: Object>(&self) -> bool {
		self.as_any().is::<T>()
	}
}

/// Pointer-kind element: a shared, possibly null, object reference.
#[derive(Clone, Default)]
pub struct ObjectRef(pub Option<Rc<dyn Object>>);

impl ObjectRef {
	/// The null reference.
	pub const NULL: ObjectRef = ObjectRef(None);

	/// Wrap a shared object.
	pub fn new(object: Rc<dyn Object>) -> Self {
		Self(Some(object))
	}

	/// Whether this is the null reference.
	pub fn is_null(&self) -> bool {
		self.0.is_none()
	}

	/// Borrow the referenced object.
	pub fn get(&self) -> Option<&dyn Object> {
		self.0.as_deref()
	}

	/// Whether both refer to the same allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		match (&self.0, &other.0) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		}
	}
}

impl PartialEq for ObjectRef {
	fn eq(&self, other: &Self) -> bool {
		match (self.get(), other.get()) {
			(Some(a), Some(b)) => a.equals(b),
			(None, None) => true,
			_ => false,
		}
	}
}

impl fmt::Debug for ObjectRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string())
	}
}

impl fmt::Display for ObjectRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.get() {
			Some(object) => f.write_str(&object.describe()),
			None => f.write_str("null"),
		}
	}
}

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Fixed-length host field storage that attribute cells can alias.
///
/// A host keeps its exposed fields in slots; binding points a cell at the
/// slot's buffer so writes through either side are seen by both. The length
/// is fixed at construction. Cloning copies the elements into a fresh buffer,
/// so a cloned host never shares field memory with its source.
pub struct Slot<T> {
	buf: Rc<RefCell<Box<[T]>>>,
}

impl<T> Slot<T> {
	/// Create a slot holding `values`.
	pub fn new(values: Vec<T>) -> Self {
		Self {
			buf: Rc::new(RefCell::new(values.into_boxed_slice())),
		}
	}

	/// Create a one-element slot.
	pub fn single(value: T) -> Self {
		Self::new(vec![value])
	}

	/// Element count.
	pub fn len(&self) -> usize {
		self.buf.borrow().len()
	}

	/// Whether the slot has no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Borrow all elements.
	pub fn borrow(&self) -> Ref<'_, [T]> {
		Ref::map(self.buf.borrow(), |items| &**items)
	}

	/// Overwrite one element.
	///
	/// Returns `false` when `index` is out of range or the buffer is held by a
	/// guard from [`Slot::borrow`].
	pub fn set(&self, index: usize, value: T) -> bool {
		let Ok(mut items) = self.buf.try_borrow_mut() else {
			return false;
		};
		match items.get_mut(index) {
			Some(item) => {
				*item = value;
				true
			}
			None => false,
		}
	}

	/// Whether both slots share one buffer.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.buf, &other.buf)
	}

	pub(crate) fn share(&self) -> Self {
		Self { buf: Rc::clone(&self.buf) }
	}
}

impl<T: Clone> Slot<T> {
	/// Copy of one element.
	pub fn get(&self, index: usize) -> Option<T> {
		self.buf.borrow().get(index).cloned()
	}

	/// Copy of the first element.
	pub fn value(&self) -> Option<T> {
		self.get(0)
	}
}

impl<T: Clone> Clone for Slot<T> {
	fn clone(&self) -> Self {
		Self::new(self.buf.borrow().to_vec())
	}
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Slot").field(&&**self.buf.borrow()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::Slot;

	#[test]
	fn clone_copies_into_fresh_buffer() {
		let a = Slot::new(vec![1, 2, 3]);
		let b = a.clone();
		assert!(!a.ptr_eq(&b));
		assert!(b.set(0, 9));
		assert_eq!(a.get(0), Some(1));
		assert_eq!(b.get(0), Some(9));
	}

	#[test]
	fn share_aliases_the_same_buffer() {
		let a = Slot::single(5_i32);
		let b = a.share();
		assert!(a.ptr_eq(&b));
		b.set(0, 6);
		assert_eq!(a.value(), Some(6));
	}

	#[test]
	fn set_while_borrowed_is_rejected() {
		let a = Slot::new(vec![1_i32, 2]);
		let guard = a.borrow();
		assert!(!a.set(0, 7));
		drop(guard);
		assert!(a.set(0, 7));
		assert_eq!(a.get(0), Some(7));
	}

	#[test]
	fn set_out_of_range_is_rejected() {
		let a = Slot::single(1_i32);
		assert!(!a.set(1, 2));
		assert_eq!(a.len(), 1);
	}
}

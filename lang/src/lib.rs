//! # Fixed Array
//!
//! Fixed-capacity, contiguous array types synthesized at compile time from
//! marker declarations.
//!
//! A *marker declaration* is a field-less struct inside a module annotated with
//! [`#[fixed_arrays]`](macro@fixed_arrays) that bounds `Self` by
//! [`FixedArray<T>`] and optionally carries a capacity marker:
//!
//! ```rust
//! #[fixed_array::fixed_arrays]
//! mod buffers {
//!     use fixed_array::FixedArray;
//!
//!     #[derive(Debug, Clone, Copy, PartialEq)]
//!     #[fixed_array_size(4)]
//!     pub struct Quad where Self: FixedArray<u32>;
//! }
//!
//! use buffers::Quad;
//! use fixed_array::FixedArray;
//!
//! let mut quad = Quad::new();
//! quad[0] = 10;
//! quad[3] = 99;
//!
//! assert_eq!(quad.len(), 4);
//! assert_eq!(quad.as_slice(), &[10, 0, 0, 99]);
//! assert_eq!(quad.iter().copied().collect::<Vec<_>>(), vec![10, 0, 0, 99]);
//! assert!(quad.get(4).is_err());
//! ```
//!
//! ## What gets generated
//!
//! For every qualifying declaration the attribute replaces the marker with:
//!
//! - the struct itself, holding exactly `N` slots of the element type
//!   (no storage at all when `N == 0`);
//! - a `CAPACITY` constant, `len`, `is_empty` and constructors;
//! - `Index<usize>`/`IndexMut<usize>`, bounds checked unless the
//!   `unchecked-indexing` feature is enabled;
//! - `as_slice`/`as_mut_slice` views aliasing the storage;
//! - a `<Name>Iter` cursor implementing [`Enumerator`] and [`Iterator`],
//!   reachable through `iter()`, `IntoIterator for &Name` and the type-erased
//!   [`FixedArray::enumerator`].
//!
//! ## Capacity
//!
//! The capacity comes from `#[fixed_array_size(N)]` (or the qualified
//! `#[fixed_array::fixed_array_size(N)]`) where `N` is an integer literal.
//! A missing marker, or one whose argument is anything but a single integer
//! literal, yields a zero-capacity array. When several markers are present
//! the first valid one wins.
//!
//! ## Zero capacity
//!
//! A zero-capacity array has no valid index: indexing panics with
//! [`IndexOutOfRange`], the checked accessors return it as an error, the view
//! is empty and the cursor never advances.

extern crate self as fixed_array;

mod enumerator;
mod error;

use core::ops::{Index, IndexMut};

pub use enumerator::Enumerator;
pub use error::IndexOutOfRange;
pub use fixed_array_attribute::{fixed_array_size, fixed_arrays};

/// Capability implemented by every generated fixed array.
///
/// The trait is only meant to be implemented by [`#[fixed_arrays]`](macro@fixed_arrays);
/// bounding a marker declaration by it is what requests the generation.
pub trait FixedArray<T>: Index<usize, Output = T> + IndexMut<usize> {
    /// Number of slots.
    const CAPACITY: usize;

    fn len(&self) -> usize {
        Self::CAPACITY
    }

    fn is_empty(&self) -> bool {
        Self::CAPACITY == 0
    }

    /// Contiguous view over all slots.
    fn as_slice(&self) -> &[T];

    /// Mutable contiguous view over all slots.
    fn as_mut_slice(&mut self) -> &mut [T];

    /// Checked read access.
    fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.as_slice()
            .get(index)
            .ok_or(IndexOutOfRange::new(index, Self::CAPACITY))
    }

    /// Checked write access.
    fn get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(IndexOutOfRange::new(index, Self::CAPACITY))
    }

    /// Overwrites the slot at `index`.
    fn set(&mut self, index: usize, value: T) -> Result<(), IndexOutOfRange> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Type-erased cursor over the slots, proxying the generated iterator.
    fn enumerator<'a>(&'a self) -> Box<dyn Enumerator<T> + 'a>
    where
        T: 'a;
}

pub mod prelude {
    pub use super::{fixed_arrays, Enumerator, FixedArray, IndexOutOfRange};
}

/// Support items referenced by generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    use super::IndexOutOfRange;

    pub use std::boxed::Box;

    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn out_of_range(index: usize, capacity: usize) -> ! {
        panic!("{}", IndexOutOfRange::new(index, capacity))
    }

    /// Slot `index` of a generated array's storage.
    #[cfg(not(feature = "unchecked-indexing"))]
    #[inline]
    #[track_caller]
    pub fn slot<T, const N: usize>(storage: &[T; N], index: usize) -> &T {
        match storage.get(index) {
            Some(slot) => slot,
            None => out_of_range(index, N),
        }
    }

    #[cfg(not(feature = "unchecked-indexing"))]
    #[inline]
    #[track_caller]
    pub fn slot_mut<T, const N: usize>(storage: &mut [T; N], index: usize) -> &mut T {
        match storage.get_mut(index) {
            Some(slot) => slot,
            None => out_of_range(index, N),
        }
    }

    /// Slot `index` of a generated array's storage, addressed from the first
    /// slot. Only debug builds check the index.
    #[cfg(feature = "unchecked-indexing")]
    #[inline]
    #[track_caller]
    pub fn slot<T, const N: usize>(storage: &[T; N], index: usize) -> &T {
        debug_assert!(index < N, "{}", IndexOutOfRange::new(index, N));
        // SAFETY: callers index below `N`; debug builds assert it above.
        unsafe { &*storage.as_ptr().add(index) }
    }

    #[cfg(feature = "unchecked-indexing")]
    #[inline]
    #[track_caller]
    pub fn slot_mut<T, const N: usize>(storage: &mut [T; N], index: usize) -> &mut T {
        debug_assert!(index < N, "{}", IndexOutOfRange::new(index, N));
        // SAFETY: callers index below `N`; debug builds assert it above.
        unsafe { &mut *storage.as_mut_ptr().add(index) }
    }
}

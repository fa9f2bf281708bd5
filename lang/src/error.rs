use thiserror::Error;

/// Raised when a slot outside `0..capacity` is addressed.
///
/// Returned by the checked accessors of [`FixedArray`](crate::FixedArray) and
/// used as the panic message of the generated `Index`/`IndexMut` impls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("index out of range: the capacity is {capacity} but the index is {index}")]
pub struct IndexOutOfRange {
    /// The offending index.
    pub index: usize,
    /// Capacity of the array that rejected it.
    pub capacity: usize,
}

impl IndexOutOfRange {
    pub const fn new(index: usize, capacity: usize) -> Self {
        Self { index, capacity }
    }
}

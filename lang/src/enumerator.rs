//! Forward-only, restartable iteration protocol.

/// Cursor over the slots of a fixed array.
///
/// Every generated array type comes with an iterator implementing both this
/// trait and [`Iterator`]. The two are views over the same cursor state: an
/// `advance` moves the iterator exactly as a `next` would.
///
/// ```ignore
/// let mut cursor = quad.enumerator();
/// while cursor.advance() {
///     println!("{:?}", cursor.current());
/// }
/// cursor.reset();
/// ```
pub trait Enumerator<T> {
    /// Moves to the next slot. Returns `false` once every slot was visited,
    /// and keeps returning `false` until [`reset`](Enumerator::reset).
    fn advance(&mut self) -> bool;

    /// The slot reached by the last successful [`advance`](Enumerator::advance),
    /// or `None` before the first one and after the last one.
    fn current(&self) -> Option<&T>;

    /// Rewinds the cursor to before the first slot.
    fn reset(&mut self);

    /// Releases resources held by the cursor. Generated cursors hold none.
    fn dispose(&mut self) {}

    /// Advances and returns a copy of the reached slot.
    fn next_value(&mut self) -> Option<T>
    where
        T: Clone,
    {
        if self.advance() {
            self.current().cloned()
        } else {
            None
        }
    }
}

impl<T, E: Enumerator<T> + ?Sized> Enumerator<T> for Box<E> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn current(&self) -> Option<&T> {
        (**self).current()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

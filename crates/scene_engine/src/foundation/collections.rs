//! Specialized collection types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use slotmap::{Key, SlotMap};

/// Slot map key tagged with the payload type it is expected to resolve to.
///
/// The tag is a compile-time promise only; resolving the handle still checks
/// the stored value and yields `None` on mismatch or after removal.
pub struct TypedHandle<K: Key, T> {
    key: K,
    _phantom: PhantomData<fn() -> T>,
}

impl<K: Key, T> TypedHandle<K, T> {
    /// Create a new typed handle from a key
    pub fn new(key: K) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying key
    pub fn key(&self) -> K {
        self.key
    }
}

impl<K: Key, T> Clone for TypedHandle<K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Key, T> Copy for TypedHandle<K, T> {}

impl<K: Key, T> PartialEq for TypedHandle<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Key, T> Eq for TypedHandle<K, T> {}

impl<K: Key, T> Hash for TypedHandle<K, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: Key, T> fmt::Debug for TypedHandle<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedHandle")
            .field(&self.key)
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

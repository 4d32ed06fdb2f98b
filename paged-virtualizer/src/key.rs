#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyOffsetMap<K> = HashMap<K, f64>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyOffsetMap<K> = BTreeMap<K, f64>;

/// Bound for row identities used as sticky-cache keys.
///
/// With `std` this is `Hash + Eq`; without it, `Ord`.
#[cfg(feature = "std")]
pub trait RowKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> RowKey for K {}

#[cfg(not(feature = "std"))]
pub trait RowKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> RowKey for K {}

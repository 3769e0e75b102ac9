#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KindMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KindMap<K, V> = BTreeMap<K, V>;

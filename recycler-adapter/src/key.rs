#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use recycler::VisualKey;

/// Visual key → owning item kind.
#[cfg(feature = "std")]
pub(crate) type OwnerMap<T> = HashMap<VisualKey, T>;
#[cfg(not(feature = "std"))]
pub(crate) type OwnerMap<T> = BTreeMap<VisualKey, T>;

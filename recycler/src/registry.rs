use alloc::vec::Vec;

use crate::KindId;
use crate::key::KindMap;

/// Rolling hash `h = 31 * h + unit` over the UTF-16 code units of `name`, seeded at 0.
///
/// Deterministic and dependency-free, but not collision-free: `"Aa"` and `"BB"` hash alike.
pub fn kind_hash(name: &str) -> KindId {
    let h = name
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
    KindId(h)
}

/// Derives and memoizes kind identities for one engine instance.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    by_name: KindMap<&'static str, KindId>,
    names: KindMap<KindId, &'static str>,
    collisions: Vec<(&'static str, &'static str)>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity_for(&mut self, name: &'static str) -> KindId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = kind_hash(name);
        if let Some(&other) = self.names.get(&id) {
            rwarn!(first = other, second = name, id = id.0, "kind identity collision");
            self.collisions.push((other, name));
        } else {
            self.names.insert(id, name);
        }
        rtrace!(name, id = id.0, "identity_for");
        self.by_name.insert(name, id);
        id
    }

    pub fn identity_of<T: ?Sized>(&mut self) -> KindId {
        self.identity_for(core::any::type_name::<T>())
    }

    /// Pairs of distinct kind names that produced the same identity, in discovery order.
    pub fn collisions(&self) -> &[(&'static str, &'static str)] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ops::Range;

use crate::{Item, KindId, StoreError, Tag, TypeRegistry, VisualKey};

/// Ordered items plus a parallel cache of their kind identities.
///
/// The cache always has one entry per item; `None` means "not resolved yet". Reads take
/// `&self` (the cache fills lazily through interior mutability), so a host can query the
/// store from inside a replay callback.
pub struct ItemStore<V> {
    items: Vec<Item<V>>,
    kind_ids: Vec<Cell<Option<KindId>>>,
    registry: RefCell<TypeRegistry>,
    caching: bool,
}

impl<V: 'static> ItemStore<V> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            kind_ids: Vec::new(),
            registry: RefCell::new(TypeRegistry::new()),
            caching: true,
        }
    }

    pub fn with_items(items: Vec<Item<V>>) -> Self {
        let mut store = Self::new();
        store.replace_all(items);
        store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item<V>] {
        &self.items
    }

    pub fn kind_id_caching(&self) -> bool {
        self.caching
    }

    /// Enables/disables the kind identity cache.
    ///
    /// Disabling drops every cached entry; while disabled, identities are recomputed on every
    /// query.
    pub fn set_kind_id_caching(&mut self, enabled: bool) {
        if self.caching == enabled {
            return;
        }
        self.caching = enabled;
        for slot in &self.kind_ids {
            slot.set(None);
        }
    }

    /// Inserts `items` at `at` (clamped to `len`) and returns the inserted index range.
    ///
    /// Empty input leaves the store untouched and returns an empty range.
    pub fn insert(&mut self, items: impl IntoIterator<Item = Item<V>>, at: usize) -> Range<usize> {
        let at = at.min(self.items.len());
        let tail = self.items.split_off(at);
        self.items.extend(items);
        let count = self.items.len() - at;
        self.items.extend(tail);
        if count == 0 {
            return at..at;
        }
        let tail = self.kind_ids.split_off(at);
        self.kind_ids.resize_with(at + count, || Cell::new(None));
        self.kind_ids.extend(tail);
        rtrace!(at, count, len = self.items.len(), "ItemStore::insert");
        at..at + count
    }

    pub fn push(&mut self, item: Item<V>) -> usize {
        self.items.push(item);
        self.kind_ids.push(Cell::new(None));
        self.items.len() - 1
    }

    /// Replaces the whole content and returns the previous items.
    pub fn replace_all(&mut self, items: Vec<Item<V>>) -> Vec<Item<V>> {
        let old = core::mem::replace(&mut self.items, items);
        self.kind_ids.clear();
        self.kind_ids.resize_with(self.items.len(), || Cell::new(None));
        rdebug!(old = old.len(), new = self.items.len(), "ItemStore::replace_all");
        old
    }

    pub fn clear(&mut self) -> Vec<Item<V>> {
        self.replace_all(Vec::new())
    }

    /// Removes `count` items starting at `from` and returns them.
    ///
    /// Fails without mutating anything when `count == 0` or the range overflows the store.
    pub fn remove_range(&mut self, from: usize, count: usize) -> Result<Vec<Item<V>>, StoreError> {
        let len = self.items.len();
        let end = from.checked_add(count).filter(|&end| end <= len);
        let Some(end) = end.filter(|_| count > 0) else {
            rwarn!(from, count, len, "ItemStore::remove_range: invalid range");
            return Err(StoreError::InvalidRange { from, count, len });
        };
        self.kind_ids.drain(from..end);
        let removed: Vec<Item<V>> = self.items.drain(from..end).collect();
        debug_assert_eq!(self.items.len(), self.kind_ids.len());
        rtrace!(from, count, len = self.items.len(), "ItemStore::remove_range");
        Ok(removed)
    }

    /// Replaces the item at `index` and returns the previous one, or `None` when out of range.
    pub fn replace_at(&mut self, index: usize, item: Item<V>) -> Option<Item<V>> {
        let slot = self.items.get_mut(index)?;
        let old = core::mem::replace(slot, item);
        self.kind_ids[index].set(None);
        Some(old)
    }

    pub fn item_at(&self, index: usize) -> Option<&Item<V>> {
        self.items.get(index)
    }

    pub fn kind_name_at(&self, index: usize) -> Option<&'static str> {
        self.items.get(index).map(Item::kind_name)
    }

    pub fn is_sticky_header_at(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(Item::is_sticky_header)
    }

    pub fn find_by_tag(&self, tag: &Tag) -> Option<(&Item<V>, usize)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.has_tag(tag))
            .map(|(index, item)| (item, index))
    }

    pub fn position_for_tag(&self, tag: &Tag) -> Option<usize> {
        self.find_by_tag(tag).map(|(_, index)| index)
    }

    /// All positions carrying `tag`, in render order.
    pub fn positions_with_tag<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = usize> + 'a {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.has_tag(tag))
            .map(|(index, _)| index)
    }

    pub fn has_any_sticky_header(&self) -> bool {
        self.items.iter().any(Item::is_sticky_header)
    }

    /// Nearest sticky header at or before `position`.
    pub fn header_position_for(&self, position: usize) -> Option<usize> {
        if position >= self.items.len() {
            return None;
        }
        self.items[..=position]
            .iter()
            .rposition(Item::is_sticky_header)
    }

    /// Kind identity of the item at `index`, through the cache when enabled.
    pub fn resolve_kind_id(&self, index: usize) -> Option<KindId> {
        let item = self.items.get(index)?;
        if self.caching {
            if let Some(id) = self.kind_ids[index].get() {
                return Some(id);
            }
        }
        let id = self.registry.borrow_mut().identity_for(item.kind_name());
        if self.caching {
            self.kind_ids[index].set(Some(id));
        }
        Some(id)
    }

    /// Cached identity at `index` without computing it.
    pub fn cached_kind_id(&self, index: usize) -> Option<KindId> {
        self.kind_ids.get(index).and_then(Cell::get)
    }

    pub fn first_index_of_kind(&self, kind: KindId) -> Option<usize> {
        (0..self.items.len()).find(|&i| self.resolve_kind_id(i) == Some(kind))
    }

    /// Identity of a kind known at compile time, for comparisons outside the store.
    pub fn kind_id_of<T: ?Sized>(&self) -> KindId {
        self.registry.borrow_mut().identity_of::<T>()
    }

    pub fn kind_collisions(&self) -> Vec<(&'static str, &'static str)> {
        self.registry.borrow().collisions().to_vec()
    }

    pub fn set_bound_visual(&mut self, index: usize, key: Option<VisualKey>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.set_bound_visual(key);
                true
            }
            None => false,
        }
    }

    /// Clears every back reference to `key`.
    pub fn release_visual(&mut self, key: VisualKey) {
        for item in &mut self.items {
            if item.bound_visual() == Some(key) {
                item.set_bound_visual(None);
            }
        }
    }
}

impl<V: 'static> Default for ItemStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> fmt::Debug for ItemStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("len", &self.items.len())
            .field("caching", &self.caching)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

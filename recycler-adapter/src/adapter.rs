use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use recycler::{
    AdapterOptions, AnimationId, ChangeSink, Item, ItemKind, ItemStore, KindId, Margins,
    OpBatcher, Orientation, Presenter, ReplayFailure, Resolved, StoreError, StructuralOp, Tag,
    VisualKey, diff, refresh_all, replay,
};

use crate::key::OwnerMap;

/// How a mutation is announced to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notify {
    /// Mutate silently; the host is expected to refresh on its own.
    None,
    /// Report the exact affected range.
    #[default]
    Range,
    /// Ask the host to rebind everything.
    Full,
}

/// Host-facing list: the item store plus bind-time presentation and lifecycle bookkeeping.
///
/// Every mutation commits to the store first, then notifies the optional `sink`. A missing
/// sink (e.g. the host view is gone) turns the notification into a no-op; refusals from a
/// present sink are logged and kept in [`ListAdapter::last_replay_failure`].
pub struct ListAdapter<V> {
    store: ItemStore<V>,
    presenter: Presenter,
    options: AdapterOptions,
    owners: OwnerMap<Arc<dyn ItemKind<V>>>,
    last_replay_failure: Option<ReplayFailure>,
}

impl<V: 'static> ListAdapter<V> {
    pub fn new(options: AdapterOptions) -> Self {
        let mut store = ItemStore::new();
        store.set_kind_id_caching(options.kind_id_caching);
        Self {
            store,
            presenter: Presenter::new(options.presentation()),
            options,
            owners: OwnerMap::default(),
            last_replay_failure: None,
        }
    }

    pub fn with_items(items: Vec<Item<V>>, options: AdapterOptions) -> Self {
        let mut adapter = Self::new(options);
        adapter.store.replace_all(items);
        adapter
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub fn store(&self) -> &ItemStore<V> {
        &self.store
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Outcome of the most recent notification: `Some` when the host refused part of it.
    pub fn last_replay_failure(&self) -> Option<&ReplayFailure> {
        self.last_replay_failure.as_ref()
    }

    pub fn take_replay_failure(&mut self) -> Option<ReplayFailure> {
        self.last_replay_failure.take()
    }

    pub fn set_kind_id_caching(&mut self, enabled: bool) {
        self.options.kind_id_caching = enabled;
        self.store.set_kind_id_caching(enabled);
    }

    pub fn set_default_margins(&mut self, margins: Margins) {
        self.options.default_margins = margins;
        self.presenter.set_default_margins(margins);
    }

    /// Sets the default start and end margins; top and bottom defaults become zero.
    pub fn set_default_side_margins(&mut self, start_and_end: u32) {
        self.set_default_margins(Margins::new(start_and_end, 0, start_and_end, 0));
    }

    pub fn set_default_animation(&mut self, animation: Option<AnimationId>) {
        self.options.default_animation = animation;
        self.presenter.set_default_animation(animation);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.options.orientation = orientation;
        self.presenter.set_orientation(orientation);
    }

    pub fn set_fade_sticky_headers(&mut self, fade: bool) {
        self.options.fade_sticky_headers = fade;
    }

    pub fn set_detect_moves(&mut self, detect_moves: bool) {
        self.options.detect_moves = detect_moves;
    }

    // Queries.

    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    pub fn item_at(&self, position: usize) -> Option<&Item<V>> {
        self.store.item_at(position)
    }

    pub fn kind_id_at(&self, position: usize) -> Option<KindId> {
        self.store.resolve_kind_id(position)
    }

    pub fn kind_name_at(&self, position: usize) -> Option<&'static str> {
        self.store.kind_name_at(position)
    }

    /// Identity the adapter reports for kind `T`, for comparisons outside the adapter.
    pub fn kind_id_for<T: ?Sized>(&self) -> KindId {
        self.store.kind_id_of::<T>()
    }

    pub fn find_by_tag(&self, tag: &Tag) -> Option<&Item<V>> {
        self.store.find_by_tag(tag).map(|(item, _)| item)
    }

    pub fn position_for_tag(&self, tag: &Tag) -> Option<usize> {
        self.store.position_for_tag(tag)
    }

    pub fn has_sticky_headers(&self) -> bool {
        self.store.has_any_sticky_header()
    }

    /// Margins the row at `position` is laid out with.
    pub fn margins_at(&self, position: usize) -> Option<Margins> {
        self.store
            .item_at(position)
            .map(|item| self.presenter.margins_for(item))
    }

    // Mutations.

    /// Inserts `items` at `at` (clamped to the end). Empty input is a no-op, notification
    /// included.
    pub fn insert_items(
        &mut self,
        items: Vec<Item<V>>,
        at: usize,
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> Range<usize> {
        let range = self.store.insert(items, at);
        if !range.is_empty() {
            let op = StructuralOp::RangeInserted {
                at: range.start,
                count: range.len(),
            };
            self.dispatch(&[op], notify, sink);
        }
        range
    }

    pub fn push_item(
        &mut self,
        item: Item<V>,
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> usize {
        let end = self.store.len();
        self.insert_items(alloc::vec![item], end, notify, sink).start
    }

    /// Replaces the whole sequence without diffing.
    ///
    /// With [`Notify::Range`] the host sees the old rows removed and the new ones inserted.
    pub fn set_items(
        &mut self,
        items: Vec<Item<V>>,
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> Vec<Item<V>> {
        let old = self.store.replace_all(items);
        self.presenter.reset_watermark();

        let mut batch = OpBatcher::new(old.len());
        for _ in 0..old.len() {
            batch.remove(0);
        }
        for at in 0..self.store.len() {
            batch.insert(at);
        }
        self.dispatch(&batch.finish(), notify, sink);
        old
    }

    /// Replaces the whole sequence and notifies only what changed.
    ///
    /// Returns the operations that were replayed (or would have been, without a sink).
    pub fn update_items(
        &mut self,
        items: Vec<Item<V>>,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> Vec<StructuralOp> {
        let ops = diff(self.store.items(), &items, self.options.diff());
        self.store.replace_all(items);
        self.presenter.reset_watermark();
        self.dispatch(&ops, Notify::Range, sink);
        ops
    }

    pub fn remove_items(
        &mut self,
        from: usize,
        count: usize,
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> Result<Vec<Item<V>>, StoreError> {
        let removed = self.store.remove_range(from, count)?;
        self.presenter.reset_watermark();
        self.dispatch(&[StructuralOp::RangeRemoved { at: from, count }], notify, sink);
        Ok(removed)
    }

    pub fn remove_all(
        &mut self,
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) -> Vec<Item<V>> {
        let count = self.store.len();
        if count == 0 {
            return Vec::new();
        }
        self.remove_items(0, count, notify, sink).unwrap_or_default()
    }

    /// Reports every row carrying `tag` as changed, contiguous rows merged.
    pub fn notify_tag_changed(&mut self, tag: &Tag, sink: Option<&mut dyn ChangeSink<V>>) {
        let mut batch = OpBatcher::new(self.store.len());
        for position in self.store.positions_with_tag(tag) {
            batch.change(position);
        }
        let ops = batch.finish();
        rdebug!(?tag, ops = ops.len(), "notify_tag_changed");
        self.dispatch(&ops, Notify::Range, sink);
    }

    fn dispatch(
        &mut self,
        ops: &[StructuralOp],
        notify: Notify,
        sink: Option<&mut dyn ChangeSink<V>>,
    ) {
        let Some(sink) = sink else {
            rtrace!(ops = ops.len(), "dispatch: no host, skipped");
            self.last_replay_failure = None;
            return;
        };
        self.last_replay_failure = match notify {
            Notify::None => None,
            Notify::Range if ops.is_empty() => None,
            Notify::Range => replay(ops, &self.store, sink),
            Notify::Full => refresh_all(&self.store, sink),
        };
    }

    // Binding and lifecycle.

    /// Produces a fresh, data-independent visual for `kind` from the first item of that kind.
    pub fn create_visual(&self, kind: KindId) -> Option<V> {
        let position = self.store.first_index_of_kind(kind)?;
        self.store
            .item_at(position)
            .map(|item| item.kind().produce_visual())
    }

    /// Populates `visual` (host key `key`) with the row at `position` and resolves its
    /// presentation. `None` when `position` is out of range.
    pub fn bind(&mut self, position: usize, key: VisualKey, visual: &mut V) -> Option<Resolved<V>> {
        let item = self.store.item_at(position)?;
        let kind = Arc::clone(item.kind());
        kind.populate_visual(visual);
        let resolved = self.presenter.resolve(item, position);

        if self.owners.insert(key, kind).is_some() {
            rwarn!(key, position, "visual rebound without a recycle notification");
            self.store.release_visual(key);
        }
        self.store.set_bound_visual(position, Some(key));
        rtrace!(position, key, "bind");
        Some(resolved)
    }

    /// Forwards "attached to window" to the kind currently owning `key`.
    pub fn on_visual_attached(&self, key: VisualKey, visual: &mut V) -> bool {
        self.forward(key, |kind| kind.on_attached(visual))
    }

    pub fn on_visual_detached(&self, key: VisualKey, visual: &mut V) -> bool {
        self.forward(key, |kind| kind.on_detached(visual))
    }

    /// Forwards the recycle and forgets which item `key` belonged to.
    pub fn on_visual_recycled(&mut self, key: VisualKey, visual: &mut V) -> bool {
        let Some(kind) = self.owners.remove(&key) else {
            return false;
        };
        kind.on_recycled(visual);
        self.store.release_visual(key);
        true
    }

    pub fn on_failed_to_recycle(&self, key: VisualKey, visual: &mut V) -> bool {
        self.forward(key, |kind| kind.on_failed_to_recycle(visual))
    }

    fn forward(&self, key: VisualKey, f: impl FnOnce(&dyn ItemKind<V>)) -> bool {
        match self.owners.get(&key) {
            Some(kind) => {
                f(kind.as_ref());
                true
            }
            None => {
                rdebug!(key, "lifecycle event for unknown visual");
                false
            }
        }
    }
}

impl<V: 'static> Default for ListAdapter<V> {
    fn default() -> Self {
        Self::new(AdapterOptions::default())
    }
}

impl<V: 'static> fmt::Debug for ListAdapter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAdapter")
            .field("options", &self.options)
            .field("len", &self.store.len())
            .field("watermark", &self.presenter.watermark())
            .field("bound", &self.owners.len())
            .field("last_replay_failure", &self.last_replay_failure)
            .finish_non_exhaustive()
    }
}

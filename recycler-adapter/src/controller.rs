use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use recycler::{
    AdapterOptions, ChangeSink, Item, MeasureError, OverlayFrame, OverlayHost, StickyOverlay,
    VisibleRow,
};

use crate::{ListAdapter, Notify};

/// How a refresh hands the provider's items to the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchMethod {
    /// Diff against the current items and notify only what changed.
    #[default]
    OnlyChanges,
    /// Replace the items and ask the host to rebind everything.
    SetAndRefresh,
    /// Replace the items without notifying the host.
    SetOnly,
}

/// Produces the full item list on every refresh.
pub type DataProvider<V> = Arc<dyn Fn() -> Vec<Item<V>> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingRefresh {
    method: DispatchMethod,
    due_ms: u64,
}

/// A framework-neutral controller that owns a [`ListAdapter`] and a data provider and drives
/// the common host workflows (refreshing, sticky headers).
///
/// It does not hold any UI objects. Hosts drive it by calling:
/// - `refresh` / `refresh_after` / `refresh_when_laid_out` when the data should be reloaded
/// - `tick(now_ms, host)` from a timer or each frame, to run scheduled refreshes
/// - `on_draw(rows, host)` on every scroll/draw pass, to place the sticky header overlay
/// - `detach()` when the host view goes away
///
/// Every host parameter is optional at call time: `None` makes the call a no-op.
pub struct Controller<V> {
    adapter: ListAdapter<V>,
    provider: DataProvider<V>,
    sticky: Option<StickyOverlay<V>>,
    pending: Option<PendingRefresh>,
}

impl<V: 'static> Controller<V> {
    pub fn new(
        options: AdapterOptions,
        provider: impl Fn() -> Vec<Item<V>> + Send + Sync + 'static,
    ) -> Self {
        Self::from_adapter(ListAdapter::new(options), provider)
    }

    pub fn from_adapter(
        adapter: ListAdapter<V>,
        provider: impl Fn() -> Vec<Item<V>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            adapter,
            provider: Arc::new(provider),
            sticky: None,
            pending: None,
        }
    }

    pub fn adapter(&self) -> &ListAdapter<V> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut ListAdapter<V> {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> ListAdapter<V> {
        self.adapter
    }

    pub fn set_provider(&mut self, provider: impl Fn() -> Vec<Item<V>> + Send + Sync + 'static) {
        self.provider = Arc::new(provider);
    }

    pub fn sticky(&self) -> Option<&StickyOverlay<V>> {
        self.sticky.as_ref()
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending.is_some()
    }

    /// Reloads the items right away. Returns `false` (and does nothing) without a host.
    pub fn refresh<H>(&mut self, method: DispatchMethod, host: Option<&mut H>) -> bool
    where
        H: ChangeSink<V>,
    {
        let Some(host) = host else {
            rdebug!(?method, "refresh skipped: no host");
            return false;
        };
        let items = (self.provider)();
        rdebug!(?method, items = items.len(), "refresh");
        let sink: &mut dyn ChangeSink<V> = host;
        match method {
            DispatchMethod::OnlyChanges => {
                self.adapter.update_items(items, Some(sink));
            }
            DispatchMethod::SetAndRefresh => {
                self.adapter.set_items(items, Notify::Full, Some(sink));
            }
            DispatchMethod::SetOnly => {
                self.adapter.set_items(items, Notify::None, Some(sink));
            }
        }

        match self.sticky.as_mut() {
            Some(sticky) => sticky.invalidate(),
            None if self.adapter.has_sticky_headers() => {
                rdebug!("sticky headers found, attaching overlay");
                self.sticky = Some(
                    StickyOverlay::new().with_fade(self.adapter.options().fade_sticky_headers),
                );
            }
            None => {}
        }
        true
    }

    /// Schedules a refresh `delay_ms` after `now_ms`. A newer request replaces a pending one.
    pub fn refresh_after(&mut self, method: DispatchMethod, now_ms: u64, delay_ms: u64) {
        self.pending = Some(PendingRefresh {
            method,
            due_ms: now_ms.saturating_add(delay_ms),
        });
    }

    /// Defers a refresh to the next `tick`, once the host finished its current layout pass.
    pub fn refresh_when_laid_out(&mut self, method: DispatchMethod) {
        self.pending = Some(PendingRefresh { method, due_ms: 0 });
    }

    /// Runs the pending refresh if it is due. Returns whether a refresh ran.
    ///
    /// A due refresh is consumed even when `host` is `None`: the host it was meant for is gone.
    pub fn tick<H>(&mut self, now_ms: u64, host: Option<&mut H>) -> bool
    where
        H: ChangeSink<V>,
    {
        let Some(pending) = self.pending else {
            return false;
        };
        if now_ms < pending.due_ms {
            return false;
        }
        self.pending = None;
        self.refresh(pending.method, host)
    }

    /// Places the sticky header overlay for this frame's visible rows.
    pub fn on_draw<H>(
        &mut self,
        rows: &[VisibleRow],
        host: &mut H,
    ) -> Result<Option<OverlayFrame>, MeasureError>
    where
        H: OverlayHost<V> + ?Sized,
    {
        match self.sticky.as_mut() {
            Some(sticky) => sticky.tick(rows, self.adapter.store(), host),
            None => Ok(None),
        }
    }

    /// Drops the overlay and any pending refresh.
    pub fn detach(&mut self) {
        if let Some(mut sticky) = self.sticky.take() {
            sticky.detach();
        }
        self.pending = None;
    }
}

impl<V: 'static> fmt::Debug for Controller<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("adapter", &self.adapter)
            .field("sticky", &self.sticky)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

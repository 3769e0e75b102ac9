use core::fmt;

use crate::{
    Dimension, Item, ItemStore, LayoutSize, MeasureError, MeasureSpec, Size, Viewport, VisibleRow,
};

/// Host services the overlay needs: viewport geometry and measurement of detached visuals.
pub trait OverlayHost<V> {
    fn viewport(&self) -> Viewport;

    /// Measures `visual` (the overlay copy of the header at `position`) under the given
    /// constraints.
    fn measure(
        &mut self,
        position: usize,
        visual: &mut V,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<Size, MeasureError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayState {
    #[default]
    NoHeader,
    /// The header at `position` is pinned to the top edge.
    Showing { position: usize },
    /// The header at `from` is being pushed off by the header at `to`.
    Transitioning { from: usize, to: usize },
}

/// Where and how the host should draw the overlay this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayFrame {
    pub state: OverlayState,
    /// Position of the header the overlay duplicates.
    pub position: usize,
    pub size: Size,
    /// Vertical translation of the overlay visual; never positive.
    pub offset: i32,
    /// Height of the band the overlay occupies at the top of the viewport.
    pub band: u32,
    /// Opacity, below 1.0 only while fading during a hand-off.
    pub alpha: f32,
}

struct HeaderOverlay<V> {
    position: usize,
    /// Item the visual was populated from.
    item: Item<V>,
    visual: V,
    size: Size,
    offset: i32,
    band: u32,
}

/// Floating copy of the group header governing the top-most visible row.
///
/// The host calls [`StickyOverlay::tick`] on every scroll/draw pass with the rows currently
/// on screen, then draws [`StickyOverlay::visual`] translated by the returned frame's offset.
pub struct StickyOverlay<V> {
    state: OverlayState,
    header: Option<HeaderOverlay<V>>,
    fade: bool,
    stale: bool,
}

impl<V: 'static> StickyOverlay<V> {
    pub fn new() -> Self {
        Self {
            state: OverlayState::NoHeader,
            header: None,
            fade: false,
            stale: false,
        }
    }

    /// Fades the outgoing header while the next one pushes it off.
    pub fn with_fade(mut self, fade: bool) -> Self {
        self.fade = fade;
        self
    }

    pub fn set_fade(&mut self, fade: bool) {
        self.fade = fade;
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn header_position(&self) -> Option<usize> {
        self.header.as_ref().map(|h| h.position)
    }

    pub fn visual(&self) -> Option<&V> {
        self.header.as_ref().map(|h| &h.visual)
    }

    pub fn visual_mut(&mut self) -> Option<&mut V> {
        self.header.as_mut().map(|h| &mut h.visual)
    }

    /// Forces the header visual to be rebuilt on the next tick (e.g. after a data change).
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Drops the overlay; used when the host view goes away.
    pub fn detach(&mut self) {
        if self.header.take().is_some() {
            rdebug!("StickyOverlay::detach");
        }
        self.state = OverlayState::NoHeader;
        self.stale = false;
    }

    pub fn frame(&self) -> Option<OverlayFrame> {
        let header = self.header.as_ref()?;
        let alpha = match self.state {
            OverlayState::Transitioning { .. } if self.fade && header.size.height > 0 => {
                header.band as f32 / header.size.height as f32
            }
            _ => 1.0,
        };
        Some(OverlayFrame {
            state: self.state,
            position: header.position,
            size: header.size,
            offset: header.offset,
            band: header.band,
            alpha,
        })
    }

    /// Re-evaluates the overlay for the rows on screen (ordered top to bottom).
    ///
    /// With no visible rows nothing changes. Measurement errors are returned as-is and leave
    /// the previous overlay in place.
    pub fn tick<H>(
        &mut self,
        rows: &[VisibleRow],
        store: &ItemStore<V>,
        host: &mut H,
    ) -> Result<Option<OverlayFrame>, MeasureError>
    where
        H: OverlayHost<V> + ?Sized,
    {
        let Some(top) = rows.first() else {
            return Ok(self.frame());
        };

        let Some(governing) = store.header_position_for(top.position) else {
            if self.header.take().is_some() {
                rdebug!(top = top.position, "StickyOverlay: no header governs the top row");
            }
            self.state = OverlayState::NoHeader;
            return Ok(None);
        };

        let (width_spec, height_spec) = host.viewport().detached_constraints(LayoutSize {
            width: Dimension::MatchParent,
            height: Dimension::WrapContent,
        });

        let item = store
            .item_at(governing)
            .ok_or(MeasureError::MissingHeader(governing))?;
        // Rebuild when the header moved or its item was edited in place.
        let reuse = !self.stale
            && self
                .header
                .as_ref()
                .is_some_and(|h| h.position == governing && h.item == *item);
        if !reuse {
            let mut visual = item.kind().produce_visual();
            item.kind().populate_visual(&mut visual);
            let size = host.measure(governing, &mut visual, width_spec, height_spec)?;
            rdebug!(
                position = governing,
                height = size.height,
                "StickyOverlay: new governing header"
            );
            self.header = Some(HeaderOverlay {
                position: governing,
                item: item.clone(),
                visual,
                size,
                offset: 0,
                band: size.height,
            });
            self.stale = false;
        }
        let Some(header) = self.header.as_mut() else {
            return Ok(None);
        };
        if reuse {
            header.size = host.measure(governing, &mut header.visual, width_spec, height_spec)?;
        }

        let height = i32::try_from(header.size.height).unwrap_or(i32::MAX);
        let contact = rows.iter().find(|row| row.straddles(height));
        match contact {
            Some(next) if next.position != governing && store.is_sticky_header_at(next.position) => {
                let offset = next.top.saturating_sub(height).min(0);
                header.offset = offset;
                header.band = height.saturating_add(offset).max(0) as u32;
                self.state = OverlayState::Transitioning {
                    from: governing,
                    to: next.position,
                };
                rtrace!(from = governing, to = next.position, offset, "StickyOverlay: hand-off");
            }
            _ => {
                header.offset = 0;
                header.band = header.size.height;
                self.state = OverlayState::Showing {
                    position: governing,
                };
            }
        }

        Ok(self.frame())
    }
}

impl<V: 'static> Default for StickyOverlay<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> fmt::Debug for StickyOverlay<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyOverlay")
            .field("state", &self.state)
            .field("frame", &self.frame())
            .field("fade", &self.fade)
            .finish_non_exhaustive()
    }
}

use crate::{AnimationId, ClickHandler, Item, LayoutSize, Margins, Orientation, Tag};

/// Adapter-wide presentation defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationDefaults {
    pub margins: Margins,
    pub animation: Option<AnimationId>,
    pub orientation: Orientation,
}

/// Attributes a host applies to a visual when binding a row.
pub struct Resolved<V> {
    pub margins: Margins,
    /// Effective animation reference (item's own, else the default).
    pub animation: Option<AnimationId>,
    /// `Some` only when the animation should play now (first bind of a row not seen yet).
    pub entry_animation: Option<AnimationId>,
    pub on_click: Option<ClickHandler<V>>,
    pub tag: Option<Tag>,
    /// Size the host should give a visual that has no layout params yet.
    pub size: LayoutSize,
}

impl<V: 'static> core::fmt::Debug for Resolved<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolved")
            .field("margins", &self.margins)
            .field("animation", &self.animation)
            .field("entry_animation", &self.entry_animation)
            .field("on_click", &self.on_click.as_ref().map(|_| ".."))
            .field("tag", &self.tag)
            .field("size", &self.size)
            .finish()
    }
}

/// Resolves bind-time attributes and gates one-shot entry animations.
///
/// The watermark is the highest position bound so far. A row animates only when bound at a
/// position above it, so rows re-bound after recycling never replay their entry animation.
#[derive(Clone, Debug, Default)]
pub struct Presenter {
    defaults: PresentationDefaults,
    watermark: Option<usize>,
}

impl Presenter {
    pub fn new(defaults: PresentationDefaults) -> Self {
        Self {
            defaults,
            watermark: None,
        }
    }

    pub fn defaults(&self) -> &PresentationDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: PresentationDefaults) {
        self.defaults = defaults;
    }

    pub fn set_default_margins(&mut self, margins: Margins) {
        self.defaults.margins = margins;
    }

    pub fn set_default_animation(&mut self, animation: Option<AnimationId>) {
        self.defaults.animation = animation;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.defaults.orientation = orientation;
    }

    pub fn watermark(&self) -> Option<usize> {
        self.watermark
    }

    /// Forgets every bound position; the next bind of any row animates again.
    pub fn reset_watermark(&mut self) {
        self.watermark = None;
    }

    /// Effective margins of `item`: per side, its own non-zero value, else the default.
    pub fn margins_for<V: 'static>(&self, item: &Item<V>) -> Margins {
        // Sticky headers never carry margins, defaults included.
        if item.is_sticky_header() {
            Margins::ZERO
        } else {
            item.margins().or(self.defaults.margins)
        }
    }

    pub fn resolve<V: 'static>(&mut self, item: &Item<V>, position: usize) -> Resolved<V> {
        let animation = item.animation().or(self.defaults.animation);
        let first_bind = self.watermark.is_none_or(|w| position > w);
        if first_bind {
            self.watermark = Some(position);
        }
        let entry_animation = animation.filter(|_| first_bind);
        rtrace!(position, first_bind, "Presenter::resolve");

        Resolved {
            margins: self.margins_for(item),
            animation,
            entry_animation,
            on_click: item.click_handler().cloned(),
            tag: item.tag().cloned(),
            size: LayoutSize::for_orientation(self.defaults.orientation),
        }
    }
}

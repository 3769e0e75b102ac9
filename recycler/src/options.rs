use crate::{AnimationId, DiffOptions, Margins, Orientation, PresentationDefaults};

/// Configuration for a list adapter.
///
/// Plain data: adapters copy it and update a few fields through the `with_*` builders or the
/// matching setters on the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdapterOptions {
    /// Memoize each row's kind identity after the first lookup.
    pub kind_id_caching: bool,

    /// Margins applied to rows whose own margin is zero on a side.
    pub default_margins: Margins,

    /// Entry animation used by rows that do not set one.
    pub default_animation: Option<AnimationId>,

    /// Scroll axis of the host list; drives the default size policy of new visuals.
    pub orientation: Orientation,

    /// Fade the outgoing sticky header while the next one pushes it off.
    pub fade_sticky_headers: bool,

    /// Report relocated rows as moves instead of remove + insert pairs.
    pub detect_moves: bool,
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self {
            kind_id_caching: true,
            default_margins: Margins::ZERO,
            default_animation: None,
            orientation: Orientation::Vertical,
            fade_sticky_headers: false,
            detect_moves: false,
        }
    }

    pub fn with_kind_id_caching(mut self, kind_id_caching: bool) -> Self {
        self.kind_id_caching = kind_id_caching;
        self
    }

    pub fn with_default_margins(mut self, default_margins: Margins) -> Self {
        self.default_margins = default_margins;
        self
    }

    pub fn with_default_animation(mut self, default_animation: Option<AnimationId>) -> Self {
        self.default_animation = default_animation;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_fade_sticky_headers(mut self, fade_sticky_headers: bool) -> Self {
        self.fade_sticky_headers = fade_sticky_headers;
        self
    }

    pub fn with_detect_moves(mut self, detect_moves: bool) -> Self {
        self.detect_moves = detect_moves;
        self
    }

    pub fn presentation(&self) -> PresentationDefaults {
        PresentationDefaults {
            margins: self.default_margins,
            animation: self.default_animation,
            orientation: self.orientation,
        }
    }

    pub fn diff(&self) -> DiffOptions {
        DiffOptions::default().with_detect_moves(self.detect_moves)
    }
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self::new()
    }
}

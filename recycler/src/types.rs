/// Integer identity of a concrete item kind.
///
/// Hosts use it to decide whether a recycled visual can be reused without reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindId(pub i32);

/// Host-side lookup key of a visual element (a recycling pool slot, a view id, ...).
///
/// Items only ever hold this key; the visual itself is owned by the host.
pub type VisualKey = u64;

/// Reference to an entry animation resource owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub start: u32,
    pub top: u32,
    pub end: u32,
    pub bottom: u32,
}

impl Margins {
    pub const ZERO: Self = Self::all(0);

    pub const fn new(start: u32, top: u32, end: u32, bottom: u32) -> Self {
        Self {
            start,
            top,
            end,
            bottom,
        }
    }

    pub const fn all(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Per-side override: a non-zero side of `self` wins, otherwise `defaults` applies.
    pub fn or(self, defaults: Margins) -> Margins {
        let pick = |own: u32, fallback: u32| if own != 0 { own } else { fallback };
        Margins {
            start: pick(self.start, defaults.start),
            top: pick(self.top, defaults.top),
            end: pick(self.end, defaults.end),
            bottom: pick(self.bottom, defaults.bottom),
        }
    }

    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }

    pub fn horizontal(&self) -> u32 {
        self.start.saturating_add(self.end)
    }
}

/// Layout orientation of the host list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Requested size of a visual along one axis, as understood by the host layout system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    MatchParent,
    WrapContent,
    Fixed(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutSize {
    /// Default size of a row for a list laid out along `orientation`.
    pub fn for_orientation(orientation: Orientation) -> Self {
        let width = match orientation {
            Orientation::Vertical => Dimension::MatchParent,
            Orientation::Horizontal => Dimension::WrapContent,
        };
        Self {
            width,
            height: Dimension::WrapContent,
        }
    }
}

impl Default for LayoutSize {
    fn default() -> Self {
        Self {
            width: Dimension::WrapContent,
            height: Dimension::WrapContent,
        }
    }
}

/// A row currently on screen, as reported by the host for one frame.
///
/// `top`/`bottom` are relative to the top edge of the list viewport; rows partially scrolled
/// out have a negative `top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRow {
    pub position: usize,
    pub top: i32,
    pub bottom: i32,
}

impl VisibleRow {
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }

    /// Whether the horizontal line at `y` crosses this row (`top <= y < bottom`).
    pub fn straddles(&self, y: i32) -> bool {
        self.top <= y && self.bottom > y
    }
}

/// One structural update of a rendered list.
///
/// Positions refer to the list as it looks after all previously emitted operations were
/// applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralOp {
    RangeInserted { at: usize, count: usize },
    RangeRemoved { at: usize, count: usize },
    RangeChanged { at: usize, count: usize },
    Moved { from: usize, to: usize },
}

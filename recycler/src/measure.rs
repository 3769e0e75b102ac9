use crate::{Dimension, LayoutSize, Margins};

/// Constraint handed to the host when it measures a visual along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasureSpec {
    /// The visual must be exactly this size.
    Exactly(u32),
    /// The visual may be at most this size.
    AtMost(u32),
    /// No constraint; the value is only a hint (usually the parent size).
    Unspecified(u32),
}

impl MeasureSpec {
    pub fn size(self) -> u32 {
        match self {
            Self::Exactly(v) | Self::AtMost(v) | Self::Unspecified(v) => v,
        }
    }

    /// Clamps a desired size to this constraint.
    pub fn resolve(self, desired: u32) -> u32 {
        match self {
            Self::Exactly(v) => v,
            Self::AtMost(v) => desired.min(v),
            Self::Unspecified(_) => desired,
        }
    }
}

/// Derives a child's constraint from its parent's, the parent's padding on that axis and the
/// child's requested dimension.
pub fn child_measure_spec(parent: MeasureSpec, padding: u32, child: Dimension) -> MeasureSpec {
    let available = parent.size().saturating_sub(padding);
    match (parent, child) {
        (_, Dimension::Fixed(v)) => MeasureSpec::Exactly(v),
        (MeasureSpec::Exactly(_), Dimension::MatchParent) => MeasureSpec::Exactly(available),
        (MeasureSpec::Exactly(_), Dimension::WrapContent) => MeasureSpec::AtMost(available),
        (MeasureSpec::AtMost(_), _) => MeasureSpec::AtMost(available),
        (MeasureSpec::Unspecified(_), _) => MeasureSpec::Unspecified(available),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Geometry of the list viewport the overlay is drawn over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub padding: Margins,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: Margins::ZERO,
        }
    }

    pub fn with_padding(mut self, padding: Margins) -> Self {
        self.padding = padding;
        self
    }

    /// Height available to rows once vertical padding is removed.
    pub fn inner_height(&self) -> u32 {
        self.height.saturating_sub(self.padding.vertical())
    }

    /// Constraints for a visual laid out outside the list flow: width pinned to the viewport,
    /// height free.
    pub fn detached_constraints(&self, size: LayoutSize) -> (MeasureSpec, MeasureSpec) {
        let width = child_measure_spec(
            MeasureSpec::Exactly(self.width),
            self.padding.horizontal(),
            size.width,
        );
        let height = child_measure_spec(
            MeasureSpec::Unspecified(self.height),
            self.padding.vertical(),
            size.height,
        );
        (width, height)
    }
}

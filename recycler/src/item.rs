use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::{AnimationId, Margins, Tag, VisualKey};

/// Value equality across erased item kinds.
///
/// Blanket-implemented for every `PartialEq + 'static` type; kinds never implement it by hand.
pub trait ContentEq: Any {
    fn as_any(&self) -> &dyn Any;
    fn content_eq(&self, other: &dyn Any) -> bool;
}

impl<T: Any + PartialEq> ContentEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn content_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// The capability pair a concrete item kind provides to the host, plus lifecycle hooks.
///
/// `V` is the host's visual element type. Kinds are plain data (`PartialEq`), so two
/// descriptors holding equal data are considered the same content.
pub trait ItemKind<V>: ContentEq + fmt::Debug + Send + Sync {
    /// Creates a new visual for this kind.
    ///
    /// The host may call this on *any* item of the kind just to grow its pool, so the visual
    /// must not carry item-specific data.
    fn produce_visual(&self) -> V;

    /// Applies this item's content to a visual previously produced for the same kind.
    fn populate_visual(&self, visual: &mut V);

    fn on_attached(&self, _visual: &mut V) {}

    fn on_detached(&self, _visual: &mut V) {}

    fn on_recycled(&self, _visual: &mut V) {}

    fn on_failed_to_recycle(&self, _visual: &mut V) {}

    /// Name the kind identity is derived from.
    fn kind_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Click behaviour attached to an item. Compared by pointer.
pub type ClickHandler<V> = Arc<dyn Fn(&mut V) + Send + Sync>;

/// One row of a heterogeneous list: a concrete kind plus presentation hints.
pub struct Item<V> {
    kind: Arc<dyn ItemKind<V>>,
    margins: Margins,
    animation: Option<AnimationId>,
    on_click: Option<ClickHandler<V>>,
    tag: Option<Tag>,
    sticky_header: bool,
    bound: Option<VisualKey>,
}

impl<V: 'static> Item<V> {
    pub fn new(kind: impl ItemKind<V> + 'static) -> Self {
        Self::from_shared(Arc::new(kind))
    }

    pub fn from_shared(kind: Arc<dyn ItemKind<V>>) -> Self {
        Self {
            kind,
            margins: Margins::ZERO,
            animation: None,
            on_click: None,
            tag: None,
            sticky_header: false,
            bound: None,
        }
    }

    pub fn kind(&self) -> &Arc<dyn ItemKind<V>> {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    /// Exact Rust type of the kind; used for "same logical row" checks.
    pub fn kind_type_id(&self) -> TypeId {
        Any::type_id(self.kind.as_any())
    }

    pub fn is_same_kind(&self, other: &Item<V>) -> bool {
        self.kind_type_id() == other.kind_type_id()
    }

    pub fn downcast_kind<T: 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Effective margins. Sticky headers live in an overlay and never carry margins.
    pub fn margins(&self) -> Margins {
        if self.sticky_header {
            Margins::ZERO
        } else {
            self.margins
        }
    }

    pub fn animation(&self) -> Option<AnimationId> {
        self.animation
    }

    pub fn click_handler(&self) -> Option<&ClickHandler<V>> {
        self.on_click.as_ref()
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tag.as_ref() == Some(tag)
    }

    pub fn is_sticky_header(&self) -> bool {
        self.sticky_header
    }

    /// Key of the visual this item was last bound to, if any.
    ///
    /// This is a back reference only: the host's pool owns the visual, and the key may
    /// already have been recycled for another item.
    pub fn bound_visual(&self) -> Option<VisualKey> {
        self.bound
    }

    pub fn set_bound_visual(&mut self, key: Option<VisualKey>) {
        self.bound = key;
    }

    /// Sets margins per side; `None` keeps the current value of that side.
    pub fn with_margins(
        mut self,
        start: Option<u32>,
        top: Option<u32>,
        end: Option<u32>,
        bottom: Option<u32>,
    ) -> Self {
        self.margins = Margins {
            start: start.unwrap_or(self.margins.start),
            top: top.unwrap_or(self.margins.top),
            end: end.unwrap_or(self.margins.end),
            bottom: bottom.unwrap_or(self.margins.bottom),
        };
        self
    }

    pub fn with_side_margins(self, start_and_end: u32) -> Self {
        self.with_margins(Some(start_and_end), None, Some(start_and_end), None)
    }

    pub fn with_top_bottom_margins(self, top_and_bottom: u32) -> Self {
        self.with_margins(None, Some(top_and_bottom), None, Some(top_and_bottom))
    }

    pub fn with_all_margins(mut self, all: u32) -> Self {
        self.margins = Margins::all(all);
        self
    }

    pub fn with_animation(mut self, animation: Option<AnimationId>) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_click_handler(mut self, on_click: impl Fn(&mut V) + Send + Sync + 'static) -> Self {
        let on_click: ClickHandler<V> = Arc::new(on_click);
        self.on_click = Some(on_click);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_sticky_header(mut self, sticky_header: bool) -> Self {
        self.sticky_header = sticky_header;
        self
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    pub fn set_animation(&mut self, animation: Option<AnimationId>) {
        self.animation = animation;
    }

    pub fn set_click_handler(&mut self, on_click: Option<ClickHandler<V>>) {
        self.on_click = on_click;
    }

    pub fn set_tag(&mut self, tag: Option<Tag>) {
        self.tag = tag;
    }

    pub fn set_sticky_header(&mut self, sticky_header: bool) {
        self.sticky_header = sticky_header;
    }
}

impl<V: 'static> Clone for Item<V> {
    fn clone(&self) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            margins: self.margins,
            animation: self.animation,
            on_click: self.on_click.clone(),
            tag: self.tag.clone(),
            sticky_header: self.sticky_header,
            bound: self.bound,
        }
    }
}

/// Content equality: same kind with equal data and equal presentation hints.
///
/// The bound visual key is host bookkeeping and does not take part.
impl<V: 'static> PartialEq for Item<V> {
    fn eq(&self, other: &Self) -> bool {
        let same_click = match (&self.on_click, &other.on_click) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.kind.content_eq(other.kind.as_any())
            && self.margins() == other.margins()
            && self.animation == other.animation
            && same_click
            && self.tag == other.tag
            && self.sticky_header == other.sticky_header
    }
}

impl<V: 'static> fmt::Debug for Item<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("kind", &self.kind)
            .field("margins", &self.margins())
            .field("animation", &self.animation)
            .field("on_click", &self.on_click.as_ref().map(|_| ".."))
            .field("tag", &self.tag)
            .field("sticky_header", &self.sticky_header)
            .field("bound", &self.bound)
            .finish()
    }
}

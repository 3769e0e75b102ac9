use crate::*;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use recycler::{
    AdapterOptions, AnimationId, ChangeSink, Item, ItemKind, ItemStore, Margins, MeasureError,
    MeasureSpec, OverlayHost, OverlayState, ReplayError, Size, StoreError, StructuralOp, Tag,
    Viewport, VisibleRow,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Visual {
    kind: &'static str,
    text: String,
    log: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct Label(&'static str);

impl ItemKind<Visual> for Label {
    fn produce_visual(&self) -> Visual {
        Visual {
            kind: "label",
            ..Visual::default()
        }
    }

    fn populate_visual(&self, visual: &mut Visual) {
        visual.text = self.0.to_string();
    }

    fn on_attached(&self, visual: &mut Visual) {
        visual.log.push(format!("attached:{}", self.0));
    }

    fn on_detached(&self, visual: &mut Visual) {
        visual.log.push(format!("detached:{}", self.0));
    }

    fn on_recycled(&self, visual: &mut Visual) {
        visual.log.push(format!("recycled:{}", self.0));
    }

    fn on_failed_to_recycle(&self, visual: &mut Visual) {
        visual.log.push(format!("failed:{}", self.0));
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Header(&'static str);

impl ItemKind<Visual> for Header {
    fn produce_visual(&self) -> Visual {
        Visual {
            kind: "header",
            ..Visual::default()
        }
    }

    fn populate_visual(&self, visual: &mut Visual) {
        visual.text = self.0.to_string();
    }
}

fn label(s: &'static str) -> Item<Visual> {
    Item::new(Label(s))
}

fn header(s: &'static str) -> Item<Visual> {
    Item::new(Header(s)).with_sticky_header(true)
}

#[derive(Debug, Default)]
struct Host {
    ops: Vec<StructuralOp>,
    full_refreshes: usize,
    refuse: bool,
    header_height: u32,
    viewport: Viewport,
}

impl Host {
    fn new() -> Self {
        Self {
            header_height: 40,
            viewport: Viewport::new(320, 600),
            ..Self::default()
        }
    }

    fn record(&mut self, op: StructuralOp) -> Result<(), ReplayError> {
        if self.refuse {
            return Err(ReplayError::Rejected("computing layout".to_string()));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl ChangeSink<Visual> for Host {
    fn notify_range_inserted(
        &mut self,
        _store: &ItemStore<Visual>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        self.record(StructuralOp::RangeInserted { at, count })
    }

    fn notify_range_removed(
        &mut self,
        _store: &ItemStore<Visual>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        self.record(StructuralOp::RangeRemoved { at, count })
    }

    fn notify_range_changed(
        &mut self,
        _store: &ItemStore<Visual>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        self.record(StructuralOp::RangeChanged { at, count })
    }

    fn notify_moved(
        &mut self,
        _store: &ItemStore<Visual>,
        from: usize,
        to: usize,
    ) -> Result<(), ReplayError> {
        self.record(StructuralOp::Moved { from, to })
    }

    fn notify_all(&mut self, _store: &ItemStore<Visual>) -> Result<(), ReplayError> {
        if self.refuse {
            return Err(ReplayError::Rejected("detached".to_string()));
        }
        self.full_refreshes += 1;
        Ok(())
    }
}

impl OverlayHost<Visual> for Host {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn measure(
        &mut self,
        _position: usize,
        _visual: &mut Visual,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<Size, MeasureError> {
        Ok(Size {
            width: width.resolve(0),
            height: height.resolve(self.header_height),
        })
    }
}

fn rows_at(offset: i32, count: usize, row_height: i32) -> Vec<VisibleRow> {
    (0..count)
        .map(|p| {
            let top = p as i32 * row_height - offset;
            VisibleRow {
                position: p,
                top,
                bottom: top + row_height,
            }
        })
        .filter(|row| row.bottom > 0 && row.top < 600)
        .collect()
}

#[test]
fn insert_notifies_inserted_range() {
    let mut adapter = ListAdapter::with_items(vec![label("a"), label("b")], AdapterOptions::new());
    let mut host = Host::new();

    let range = adapter.insert_items(vec![label("x"), label("y")], 1, Notify::Range, Some(&mut host));
    assert_eq!(range, 1..3);
    assert_eq!(host.ops, vec![StructuralOp::RangeInserted { at: 1, count: 2 }]);

    // Clamped to the end.
    assert_eq!(adapter.push_item(label("z"), Notify::Range, Some(&mut host)), 4);
    assert_eq!(host.ops[1], StructuralOp::RangeInserted { at: 4, count: 1 });

    // Empty input: no mutation, no notification.
    adapter.insert_items(Vec::new(), 0, Notify::Full, Some(&mut host));
    assert_eq!(host.ops.len(), 2);
    assert_eq!(host.full_refreshes, 0);

    // No host: the store still changes.
    adapter.insert_items(vec![label("w")], 0, Notify::Range, None);
    assert_eq!(adapter.item_count(), 6);
    assert_eq!(adapter.item_at(0), Some(&label("w")));
}

#[test]
fn set_items_honours_notify_flag() {
    let mut adapter = ListAdapter::with_items(vec![label("a"), label("b")], AdapterOptions::new());
    let mut host = Host::new();

    let old = adapter.set_items(vec![label("c")], Notify::Range, Some(&mut host));
    assert_eq!(old.len(), 2);
    assert_eq!(
        host.ops,
        vec![
            StructuralOp::RangeRemoved { at: 0, count: 2 },
            StructuralOp::RangeInserted { at: 0, count: 1 },
        ]
    );

    adapter.set_items(vec![label("d")], Notify::Full, Some(&mut host));
    assert_eq!(host.full_refreshes, 1);

    adapter.set_items(vec![label("e")], Notify::None, Some(&mut host));
    assert_eq!(host.ops.len(), 2);
    assert_eq!(host.full_refreshes, 1);
    assert_eq!(adapter.item_at(0), Some(&label("e")));
}

#[test]
fn update_items_replays_diff() {
    let mut adapter = ListAdapter::with_items(
        vec![label("a"), label("b"), label("c")],
        AdapterOptions::new(),
    );
    let mut host = Host::new();

    let ops = adapter.update_items(vec![label("a"), label("c")], Some(&mut host));
    assert_eq!(ops, vec![StructuralOp::RangeRemoved { at: 1, count: 1 }]);
    assert_eq!(host.ops, ops);
    assert!(adapter.last_replay_failure().is_none());

    let ops = adapter.update_items(vec![label("a"), label("c")], Some(&mut host));
    assert!(ops.is_empty());
}

#[test]
fn refused_replay_is_recorded_and_store_kept() {
    let mut adapter = ListAdapter::with_items(vec![label("a")], AdapterOptions::new());
    let mut host = Host {
        refuse: true,
        ..Host::new()
    };

    adapter.update_items(vec![label("a"), label("b")], Some(&mut host));
    assert_eq!(adapter.item_count(), 2);
    let failure = adapter.take_replay_failure().unwrap();
    assert_eq!(failure.op, Some(StructuralOp::RangeInserted { at: 1, count: 1 }));
    assert_eq!(failure.error, ReplayError::Rejected("computing layout".to_string()));
    assert!(adapter.last_replay_failure().is_none());

    adapter.set_items(vec![label("c")], Notify::Full, Some(&mut host));
    assert_eq!(adapter.last_replay_failure().map(|f| f.op), Some(None));

    // A later mutation without a host leaves nothing refused behind.
    adapter.push_item(label("d"), Notify::Range, None);
    assert!(adapter.last_replay_failure().is_none());
    assert_eq!(adapter.item_count(), 2);
}

#[test]
fn remove_items_validates_then_notifies() {
    let mut adapter = ListAdapter::with_items(
        vec![label("a"), label("b"), label("c")],
        AdapterOptions::new(),
    );
    let mut host = Host::new();

    assert_eq!(
        adapter.remove_items(2, 2, Notify::Range, Some(&mut host)),
        Err(StoreError::InvalidRange {
            from: 2,
            count: 2,
            len: 3
        })
    );
    assert!(host.ops.is_empty());

    let removed = adapter.remove_items(2, 1, Notify::Range, Some(&mut host)).unwrap();
    assert_eq!(removed, vec![label("c")]);
    assert_eq!(host.ops, vec![StructuralOp::RangeRemoved { at: 2, count: 1 }]);

    assert_eq!(adapter.remove_all(Notify::Range, Some(&mut host)).len(), 2);
    assert_eq!(host.ops[1], StructuralOp::RangeRemoved { at: 0, count: 2 });
    assert!(adapter.remove_all(Notify::Range, Some(&mut host)).is_empty());
    assert_eq!(host.ops.len(), 2);
}

#[test]
fn tag_changes_are_merged_per_run() {
    let mut adapter = ListAdapter::with_items(
        vec![
            label("a"),
            label("b").with_tag("hot"),
            label("c").with_tag("hot"),
            label("d"),
            label("e").with_tag("hot"),
        ],
        AdapterOptions::new(),
    );
    let mut host = Host::new();
    adapter.notify_tag_changed(&Tag::from("hot"), Some(&mut host));
    assert_eq!(
        host.ops,
        vec![
            StructuralOp::RangeChanged { at: 1, count: 2 },
            StructuralOp::RangeChanged { at: 4, count: 1 },
        ]
    );
    assert_eq!(adapter.position_for_tag(&Tag::from("hot")), Some(1));
    assert_eq!(adapter.find_by_tag(&Tag::from("hot")), Some(&label("b").with_tag("hot")));
    assert_eq!(adapter.position_for_tag(&Tag::from("cold")), None);
}

#[test]
fn bind_populates_and_resolves() {
    let options = AdapterOptions::new()
        .with_default_margins(Margins::all(4))
        .with_default_animation(Some(AnimationId(3)));
    let mut adapter = ListAdapter::with_items(
        vec![label("a").with_margins(Some(8), None, None, None), header("h")],
        options,
    );

    let mut visual = adapter.create_visual(adapter.kind_id_at(0).unwrap()).unwrap();
    assert_eq!(visual.kind, "label");
    assert!(visual.text.is_empty());

    let resolved = adapter.bind(0, 1, &mut visual).unwrap();
    assert_eq!(visual.text, "a");
    assert_eq!(resolved.margins, Margins::new(8, 4, 4, 4));
    assert_eq!(resolved.entry_animation, Some(AnimationId(3)));
    assert_eq!(adapter.item_at(0).and_then(|i| i.bound_visual()), Some(1));

    // Re-binding below the watermark does not replay the animation.
    let resolved = adapter.bind(0, 1, &mut visual).unwrap();
    assert_eq!(resolved.entry_animation, None);

    let mut header_visual = adapter.create_visual(adapter.kind_id_at(1).unwrap()).unwrap();
    let resolved = adapter.bind(1, 2, &mut header_visual).unwrap();
    assert_eq!(resolved.margins, Margins::ZERO);
    assert_eq!(resolved.entry_animation, Some(AnimationId(3)));

    assert!(adapter.bind(2, 3, &mut visual).is_none());

    adapter.set_default_side_margins(6);
    assert_eq!(adapter.margins_at(0), Some(Margins::new(8, 0, 6, 0)));
}

#[test]
fn kind_identity_queries() {
    let adapter = ListAdapter::with_items(vec![label("a"), header("h")], AdapterOptions::new());
    assert_eq!(adapter.kind_id_at(0), Some(adapter.kind_id_for::<Label>()));
    assert_eq!(adapter.kind_id_at(1), Some(adapter.kind_id_for::<Header>()));
    assert_ne!(adapter.kind_id_at(0), adapter.kind_id_at(1));
    assert_eq!(adapter.kind_id_at(2), None);
    assert!(adapter.create_visual(adapter.kind_id_for::<String>()).is_none());
    assert!(adapter.has_sticky_headers());
}

#[test]
fn lifecycle_events_reach_the_owning_item() {
    let mut adapter = ListAdapter::with_items(vec![label("a"), label("b")], AdapterOptions::new());
    let mut visual = Visual::default();

    assert!(!adapter.on_visual_attached(9, &mut visual));
    adapter.bind(0, 9, &mut visual);
    assert!(adapter.on_visual_attached(9, &mut visual));
    assert!(adapter.on_visual_detached(9, &mut visual));

    // The host reuses key 9 for row 1 without recycling first.
    adapter.bind(1, 9, &mut visual);
    assert_eq!(adapter.item_at(0).and_then(|i| i.bound_visual()), None);
    assert_eq!(adapter.item_at(1).and_then(|i| i.bound_visual()), Some(9));
    assert!(adapter.on_failed_to_recycle(9, &mut visual));

    assert!(adapter.on_visual_recycled(9, &mut visual));
    assert_eq!(adapter.item_at(1).and_then(|i| i.bound_visual()), None);
    assert!(!adapter.on_visual_recycled(9, &mut visual));

    assert_eq!(
        visual.log,
        vec!["attached:a", "detached:a", "failed:b", "recycled:b"]
    );
}

#[test]
fn option_setters_flow_into_the_engine() {
    let mut adapter = ListAdapter::with_items(vec![label("a")], AdapterOptions::new());
    adapter.set_kind_id_caching(false);
    adapter.kind_id_at(0);
    assert_eq!(adapter.store().cached_kind_id(0), None);
    assert!(!adapter.options().kind_id_caching);

    adapter.set_orientation(recycler::Orientation::Horizontal);
    let mut visual = Visual::default();
    let resolved = adapter.bind(0, 1, &mut visual).unwrap();
    assert_eq!(resolved.size.width, recycler::Dimension::WrapContent);

    adapter.set_detect_moves(true);
    adapter.set_items(vec![label("a"), label("b"), label("c")], Notify::None, None);
    let ops = adapter.update_items(vec![label("c"), label("a"), label("b")], None);
    assert_eq!(ops, vec![StructuralOp::Moved { from: 2, to: 0 }]);
}

fn sections(generation: usize) -> Vec<Item<Visual>> {
    let mut items = Vec::new();
    for section in 0..3 {
        items.push(header(["one", "two", "three"][section]));
        for _ in 0..9 {
            items.push(label(if generation == 0 { "row" } else { "row'" }));
        }
    }
    items
}

#[test]
fn controller_refresh_requires_host() {
    let mut controller = Controller::new(AdapterOptions::new(), || vec![label("a")]);
    assert!(!controller.refresh(DispatchMethod::OnlyChanges, None::<&mut Host>));
    assert_eq!(controller.adapter().item_count(), 0);

    let mut host = Host::new();
    assert!(controller.refresh(DispatchMethod::OnlyChanges, Some(&mut host)));
    assert_eq!(host.ops, vec![StructuralOp::RangeInserted { at: 0, count: 1 }]);
    assert!(controller.sticky().is_none());

    assert!(controller.refresh(DispatchMethod::SetAndRefresh, Some(&mut host)));
    assert_eq!(host.full_refreshes, 1);
    assert!(controller.refresh(DispatchMethod::SetOnly, Some(&mut host)));
    assert_eq!(host.ops.len(), 1);
    assert_eq!(host.full_refreshes, 1);
}

#[test]
fn controller_delayed_refresh_most_recent_wins() {
    let generation = Arc::new(AtomicUsize::new(0));
    let provider_generation = Arc::clone(&generation);
    let mut controller = Controller::new(AdapterOptions::new(), move || {
        sections(provider_generation.load(Ordering::Relaxed))
    });
    let mut host = Host::new();

    controller.refresh_after(DispatchMethod::SetOnly, 0, 100);
    controller.refresh_after(DispatchMethod::OnlyChanges, 10, 50);
    assert!(!controller.tick(59, Some(&mut host)));
    assert!(controller.has_pending_refresh());
    assert!(controller.tick(60, Some(&mut host)));
    assert!(!controller.has_pending_refresh());
    assert_eq!(host.ops, vec![StructuralOp::RangeInserted { at: 0, count: 30 }]);

    // Deferred until the host is laid out, i.e. the next tick.
    generation.store(1, Ordering::Relaxed);
    controller.refresh_when_laid_out(DispatchMethod::OnlyChanges);
    assert!(controller.tick(61, Some(&mut host)));
    assert_eq!(host.ops.len(), 4);
    assert!(
        host.ops[1..]
            .iter()
            .all(|op| matches!(op, StructuralOp::RangeChanged { count: 9, .. }))
    );

    // The host vanished before the timer fired: the request is dropped.
    controller.refresh_after(DispatchMethod::SetAndRefresh, 61, 10);
    assert!(!controller.tick(80, None::<&mut Host>));
    assert!(!controller.has_pending_refresh());
    assert_eq!(host.full_refreshes, 0);
}

#[test]
fn controller_attaches_sticky_overlay() {
    let options = AdapterOptions::new().with_fade_sticky_headers(true);
    let mut controller = Controller::new(options, || sections(0));
    let mut host = Host::new();

    assert_eq!(controller.on_draw(&rows_at(0, 30, 50), &mut host), Ok(None));
    controller.refresh(DispatchMethod::OnlyChanges, Some(&mut host));
    assert!(controller.sticky().is_some());

    let frame = controller.on_draw(&rows_at(600, 30, 50), &mut host).unwrap().unwrap();
    assert_eq!(frame.state, OverlayState::Showing { position: 10 });

    let frame = controller.on_draw(&rows_at(980, 30, 50), &mut host).unwrap().unwrap();
    assert_eq!(frame.state, OverlayState::Transitioning { from: 10, to: 20 });
    assert_eq!(frame.offset, -20);
    assert_eq!(frame.alpha, 0.5);

    let frame = controller.on_draw(&rows_at(1000, 30, 50), &mut host).unwrap().unwrap();
    assert_eq!(frame.state, OverlayState::Showing { position: 20 });
    assert_eq!(
        controller.sticky().and_then(|s| s.visual()).map(|v| v.text.as_str()),
        Some("three")
    );

    controller.refresh_after(DispatchMethod::OnlyChanges, 0, 10);
    controller.detach();
    assert!(controller.sticky().is_none());
    assert!(!controller.has_pending_refresh());
}

#[test]
fn footer_offset_pins_last_row() {
    let options = AdapterOptions::new().with_default_margins(Margins::new(0, 5, 0, 5));
    let adapter = ListAdapter::with_items(vec![label("a"), label("b"), label("c")], options);
    let mut host = Host::new();
    let rows = rows_at(0, 3, 50);
    let mut footer = Visual::default();

    assert_eq!(footer_top_offset(&adapter, 1, &rows, &mut footer, 50, &mut host), Ok(0));
    // 600 - (2 * (50 + 10)) - 50
    assert_eq!(footer_top_offset(&adapter, 2, &rows, &mut footer, 50, &mut host), Ok(430));
    // Not laid out yet: measured at the header height.
    assert_eq!(footer_top_offset(&adapter, 2, &rows, &mut footer, 0, &mut host), Ok(440));

    host.viewport = Viewport::new(320, 150).with_padding(Margins::new(0, 10, 0, 10));
    assert_eq!(footer_top_offset(&adapter, 2, &rows, &mut footer, 50, &mut host), Ok(0));
}

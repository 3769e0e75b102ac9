// Example: a provider-driven controller feeding a host that logs notifications.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use recycler::{
    AdapterOptions, AnimationId, ChangeSink, Item, ItemKind, ItemStore, Margins, ReplayError,
};
use recycler_adapter::{Controller, DispatchMethod};

#[derive(Debug, PartialEq)]
struct TextRow(String);

impl ItemKind<String> for TextRow {
    fn produce_visual(&self) -> String {
        String::new()
    }

    fn populate_visual(&self, visual: &mut String) {
        visual.clone_from(&self.0);
    }
}

#[derive(Debug, PartialEq)]
struct ImageRow(u32);

impl ItemKind<String> for ImageRow {
    fn produce_visual(&self) -> String {
        String::new()
    }

    fn populate_visual(&self, visual: &mut String) {
        *visual = format!("[image #{}]", self.0);
    }
}

struct LogHost;

impl ChangeSink<String> for LogHost {
    fn notify_range_inserted(
        &mut self,
        _store: &ItemStore<String>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  inserted {count} at {at}");
        Ok(())
    }

    fn notify_range_removed(
        &mut self,
        _store: &ItemStore<String>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  removed {count} at {at}");
        Ok(())
    }

    fn notify_range_changed(
        &mut self,
        _store: &ItemStore<String>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  changed {count} at {at}");
        Ok(())
    }

    fn notify_moved(
        &mut self,
        _store: &ItemStore<String>,
        from: usize,
        to: usize,
    ) -> Result<(), ReplayError> {
        println!("  moved {from} -> {to}");
        Ok(())
    }

    fn notify_all(&mut self, store: &ItemStore<String>) -> Result<(), ReplayError> {
        println!("  refresh all ({} rows)", store.len());
        Ok(())
    }
}

fn main() {
    let generation = Arc::new(AtomicUsize::new(0));
    let provider_generation = Arc::clone(&generation);
    let options = AdapterOptions::new()
        .with_default_margins(Margins::new(16, 0, 16, 0))
        .with_default_animation(Some(AnimationId(1)))
        .with_detect_moves(true);

    let mut controller = Controller::new(options, move || {
        let g = provider_generation.load(Ordering::Relaxed);
        let mut items: Vec<Item<String>> = (0..5)
            .map(|i| Item::new(TextRow(format!("row {i}"))))
            .collect();
        if g > 0 {
            items.insert(2, Item::new(ImageRow(7)));
            items.swap(0, 4);
        }
        items
    });
    let mut host = LogHost;

    println!("initial refresh");
    controller.refresh(DispatchMethod::OnlyChanges, Some(&mut host));

    println!("delayed refresh scheduled at t=0 for t=100");
    generation.store(1, Ordering::Relaxed);
    controller.refresh_after(DispatchMethod::OnlyChanges, 0, 100);
    for now in [50, 100] {
        let ran = controller.tick(now, Some(&mut host));
        println!("tick t={now}: ran={ran}");
    }

    let adapter = controller.adapter_mut();
    for position in 0..adapter.item_count() {
        let Some(kind) = adapter.kind_id_at(position) else {
            continue;
        };
        let Some(mut visual) = adapter.create_visual(kind) else {
            continue;
        };
        if let Some(resolved) = adapter.bind(position, position as u64, &mut visual) {
            println!(
                "bind {position}: {visual:12} kind={kind:?} margins={:?} animate={:?}",
                resolved.margins, resolved.entry_animation
            );
        }
    }

    println!("refresh with the host gone");
    let ran = controller.refresh(DispatchMethod::SetAndRefresh, None::<&mut LogHost>);
    println!("  ran={ran}");
}

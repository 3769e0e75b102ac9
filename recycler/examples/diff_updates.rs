// Example: reconcile two versions of a heterogeneous list and replay the result.
use recycler::{
    ChangeSink, DiffOptions, Item, ItemKind, ItemStore, ReplayError, StructuralOp, diff, replay,
};

#[derive(Debug, Default)]
struct Cell {
    kind: &'static str,
    content: String,
}

#[derive(Debug, PartialEq)]
struct TextRow(String);

impl ItemKind<Cell> for TextRow {
    fn produce_visual(&self) -> Cell {
        Cell {
            kind: "text",
            ..Cell::default()
        }
    }

    fn populate_visual(&self, cell: &mut Cell) {
        cell.content = self.0.clone();
    }
}

#[derive(Debug, PartialEq)]
struct ImageRow {
    url: &'static str,
}

impl ItemKind<Cell> for ImageRow {
    fn produce_visual(&self) -> Cell {
        Cell {
            kind: "image",
            ..Cell::default()
        }
    }

    fn populate_visual(&self, cell: &mut Cell) {
        cell.content = format!("<img {}>", self.url);
    }
}

/// Prints every operation, then rebinds from the committed store like a real host would.
struct Printer {
    cells: Vec<Cell>,
}

impl Printer {
    fn rebind(&mut self, store: &ItemStore<Cell>) {
        for (cell, item) in self.cells.iter_mut().zip(store.items()) {
            *cell = item.kind().produce_visual();
            item.kind().populate_visual(cell);
        }
    }
}

impl ChangeSink<Cell> for Printer {
    fn notify_range_inserted(
        &mut self,
        _store: &ItemStore<Cell>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  insert {count} at {at}");
        for i in at..at + count {
            self.cells.insert(i, Cell::default());
        }
        Ok(())
    }

    fn notify_range_removed(
        &mut self,
        _store: &ItemStore<Cell>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  remove {count} at {at}");
        self.cells.drain(at..at + count);
        Ok(())
    }

    fn notify_range_changed(
        &mut self,
        _store: &ItemStore<Cell>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError> {
        println!("  change {count} at {at}");
        Ok(())
    }

    fn notify_moved(
        &mut self,
        _store: &ItemStore<Cell>,
        from: usize,
        to: usize,
    ) -> Result<(), ReplayError> {
        println!("  move {from} -> {to}");
        let cell = self.cells.remove(from);
        self.cells.insert(to, cell);
        Ok(())
    }

    fn notify_all(&mut self, store: &ItemStore<Cell>) -> Result<(), ReplayError> {
        println!("  refresh all");
        self.cells.resize_with(store.len(), Cell::default);
        Ok(())
    }
}

fn text(s: &str) -> Item<Cell> {
    Item::new(TextRow(s.to_string()))
}

fn image(url: &'static str) -> Item<Cell> {
    Item::new(ImageRow { url })
}

fn main() {
    let v1 = vec![text("Hello"), image("cat.png"), text("World"), text("Bye")];
    let v2 = vec![text("Bye"), text("Hello"), text("cat.png"), text("World!")];

    let mut store = ItemStore::with_items(v1.clone());
    let mut printer = Printer { cells: Vec::new() };
    let _ = printer.notify_all(&store);
    printer.rebind(&store);

    for detect_moves in [false, true] {
        println!("detect_moves={detect_moves}");
        let ops = diff(store.items(), &v2, DiffOptions::default().with_detect_moves(detect_moves));
        store.replace_all(v2.clone());
        if let Some(failure) = replay(&ops, &store, &mut printer) {
            println!("  host refused: {failure:?}");
        }
        printer.rebind(&store);
        let rendered: Vec<_> = printer
            .cells
            .iter()
            .map(|c| format!("{}:{}", c.kind, c.content))
            .collect();
        println!("  rendered={rendered:?}");
        let changes = ops
            .iter()
            .filter(|op| matches!(op, StructuralOp::RangeChanged { .. }))
            .count();
        println!("  ops={} changes={changes}", ops.len());

        // Back to v1 for the next round.
        let ops = diff(store.items(), &v1, DiffOptions::default());
        store.replace_all(v1.clone());
        let _ = replay(&ops, &store, &mut printer);
        printer.rebind(&store);
    }

    for (a, b) in store.kind_collisions() {
        println!("kind identity collision: {a} / {b}");
    }
}

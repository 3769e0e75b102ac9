// Example: drive the sticky header overlay while scrolling through sectioned rows.
use recycler::{
    Item, ItemKind, ItemStore, MeasureError, MeasureSpec, OverlayHost, Size, StickyOverlay,
    Viewport, VisibleRow,
};

#[derive(Debug, PartialEq)]
struct SectionHeader(usize);

impl ItemKind<String> for SectionHeader {
    fn produce_visual(&self) -> String {
        String::new()
    }

    fn populate_visual(&self, visual: &mut String) {
        *visual = format!("Section {}", self.0);
    }
}

#[derive(Debug, PartialEq)]
struct TextRow(usize);

impl ItemKind<String> for TextRow {
    fn produce_visual(&self) -> String {
        String::new()
    }

    fn populate_visual(&self, visual: &mut String) {
        *visual = format!("row {}", self.0);
    }
}

struct Screen {
    viewport: Viewport,
    header_height: u32,
}

impl OverlayHost<String> for Screen {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn measure(
        &mut self,
        _position: usize,
        _visual: &mut String,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<Size, MeasureError> {
        Ok(Size {
            width: width.resolve(0),
            height: height.resolve(self.header_height),
        })
    }
}

fn main() {
    let row_height = 50;
    let mut items = Vec::new();
    for i in 0..40 {
        if i % 10 == 0 {
            items.push(Item::new(SectionHeader(i / 10)).with_sticky_header(true));
        } else {
            items.push(Item::new(TextRow(i)));
        }
    }
    let store = ItemStore::with_items(items);

    let mut screen = Screen {
        viewport: Viewport::new(320, 600),
        header_height: 40,
    };
    let mut overlay = StickyOverlay::new().with_fade(true);

    for offset in (0..=1200).step_by(120).chain([470, 480, 490, 500]) {
        let rows: Vec<VisibleRow> = (0..store.len())
            .map(|p| {
                let top = p as i32 * row_height - offset;
                VisibleRow {
                    position: p,
                    top,
                    bottom: top + row_height,
                }
            })
            .filter(|row| row.bottom > 0 && row.top < 600)
            .collect();

        match overlay.tick(&rows, &store, &mut screen) {
            Ok(Some(frame)) => println!(
                "offset={offset:4} {:?} header={:?} y={} alpha={:.2}",
                frame.state,
                overlay.visual(),
                frame.offset,
                frame.alpha
            ),
            Ok(None) => println!("offset={offset:4} no header"),
            Err(err) => println!("offset={offset:4} measure failed: {err}"),
        }
    }
}

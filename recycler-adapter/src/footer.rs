use recycler::{LayoutSize, MeasureError, OverlayHost, VisibleRow};

use crate::ListAdapter;

/// Top offset that pins the last row to the bottom of the viewport.
///
/// Returns 0 for every row but the last, and when the rows on screen already fill the
/// viewport. `rows` are the rows currently on screen; only those above the footer count.
/// A footer reported with zero height (not laid out yet) is measured through `host` with
/// wrap-content constraints first.
pub fn footer_top_offset<V: 'static, H>(
    adapter: &ListAdapter<V>,
    position: usize,
    rows: &[VisibleRow],
    footer: &mut V,
    footer_height: u32,
    host: &mut H,
) -> Result<u32, MeasureError>
where
    H: OverlayHost<V> + ?Sized,
{
    let count = adapter.item_count();
    if count == 0 || position + 1 != count {
        return Ok(0);
    }

    let viewport = host.viewport();
    let above: u32 = rows
        .iter()
        .filter(|row| row.position < position)
        .map(|row| {
            let margins = adapter.margins_at(row.position).unwrap_or_default();
            row.height().saturating_add(margins.vertical())
        })
        .fold(0u32, u32::saturating_add);

    let footer_height = if footer_height == 0 {
        let (width, height) = viewport.detached_constraints(LayoutSize::default());
        host.measure(position, footer, width, height)?.height
    } else {
        footer_height
    };

    let offset = viewport
        .inner_height()
        .saturating_sub(above.saturating_add(footer_height));
    rtrace!(position, above, footer_height, offset, "footer_top_offset");
    Ok(offset)
}

use crate::foundation::core::{Canvas, Rgba8};

/// Tile `images` left to right, wrapping after `columns` images.
///
/// Each column is as wide as its widest image and each row as tall as its tallest, so nothing
/// overlaps. Gaps show `background`. An empty input yields a 0x0 canvas.
pub fn stick(images: &[Canvas], columns: usize, background: Rgba8) -> Canvas {
    let columns = columns.max(1);
    let rows = images.len().div_ceil(columns);

    let mut col_widths = vec![0u32; columns.min(images.len())];
    let mut row_heights = vec![0u32; rows];
    for (i, img) in images.iter().enumerate() {
        let (r, c) = (i / columns, i % columns);
        col_widths[c] = col_widths[c].max(img.width());
        row_heights[r] = row_heights[r].max(img.height());
    }

    let width = col_widths.iter().sum();
    let height = row_heights.iter().sum();
    let mut canvas = Canvas::filled(width, height, background);

    for (i, img) in images.iter().enumerate() {
        let (r, c) = (i / columns, i % columns);
        let x: u32 = col_widths[..c].iter().sum();
        let y: u32 = row_heights[..r].iter().sum();
        canvas.draw_image(img, i64::from(x), i64::from(y));
    }
    canvas
}

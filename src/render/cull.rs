use macroquad::prelude::*;
use std::ops::Range;

use crate::viewport::Viewport;

const CULL_MARGIN_TILES: i64 = 1;

/// Columns and rows of a `width x height` grid that intersect `view`,
/// padded by one tile on every side.
pub fn tile_range_for_rect(
    view: Rect,
    tile_extent: Vec2,
    width: usize,
    height: usize,
) -> (Range<usize>, Range<usize>) {
    if tile_extent.x <= 0.0 || tile_extent.y <= 0.0 {
        return (0..0, 0..0);
    }

    let mut x_min = (view.x / tile_extent.x).floor() as i64;
    let mut y_min = (view.y / tile_extent.y).floor() as i64;
    let mut x_max = ((view.x + view.w) / tile_extent.x).floor() as i64;
    let mut y_max = ((view.y + view.h) / tile_extent.y).floor() as i64;

    if x_min > x_max {
        std::mem::swap(&mut x_min, &mut x_max);
    }
    if y_min > y_max {
        std::mem::swap(&mut y_min, &mut y_max);
    }

    x_min -= CULL_MARGIN_TILES;
    y_min -= CULL_MARGIN_TILES;
    x_max += CULL_MARGIN_TILES;
    y_max += CULL_MARGIN_TILES;

    (
        clip(x_min, x_max, width),
        clip(y_min, y_max, height),
    )
}

/// Tiles the viewport's camera can currently see.
pub fn visible_tile_range(
    viewport: &Viewport,
    width: usize,
    height: usize,
) -> (Range<usize>, Range<usize>) {
    tile_range_for_rect(viewport.visible_rect(), viewport.tile_extent(), width, height)
}

fn clip(min: i64, max_inclusive: i64, len: usize) -> Range<usize> {
    let len = len as i64;
    let start = min.clamp(0, len);
    let end = (max_inclusive + 1).clamp(start, len);
    start as usize..end as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_padded_and_clipped_to_grid() {
        let (xs, ys) = tile_range_for_rect(Rect::new(32.0, 32.0, 32.0, 16.0), vec2(16.0, 16.0), 10, 10);
        assert_eq!(xs, 1..6);
        assert_eq!(ys, 1..5);

        let (xs, ys) = tile_range_for_rect(Rect::new(-500.0, -500.0, 2000.0, 2000.0), vec2(16.0, 16.0), 4, 3);
        assert_eq!(xs, 0..4);
        assert_eq!(ys, 0..3);
    }

    #[test]
    fn rect_outside_grid_is_empty() {
        let (xs, ys) = tile_range_for_rect(Rect::new(1000.0, 0.0, 10.0, 10.0), vec2(16.0, 16.0), 4, 4);
        assert!(xs.is_empty());
        assert_eq!(ys, 0..2);

        let (xs, _) = tile_range_for_rect(Rect::new(-200.0, 0.0, 10.0, 10.0), vec2(16.0, 16.0), 4, 4);
        assert!(xs.is_empty());
    }

    #[test]
    fn visible_range_follows_viewport() {
        let mut vp = Viewport::default();
        vp.reset(vec2(16.0, 16.0));
        vp.center_on(50, 50, vec2(800.0, 800.0));
        let (xs, ys) = visible_tile_range(&vp, 100, 100);
        // 6 tiles above and below the anchor, 8 left and right on a 4:3 display
        assert_eq!(ys, 43..58);
        assert_eq!(xs, 41..60);
    }
}

//! Culling and Macroquad drawing for a [`TileManager`](crate::TileManager).

mod cull;

use macroquad::prelude::*;

use crate::manager::TileManager;

pub use cull::{tile_range_for_rect, visible_tile_range};

/// Tint of the overlay drawn over remembered (`Seen`) tiles.
pub const SEEN_OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.55);

/// Draw every displayed tile the camera can see, layers back to front, with
/// the dimming overlay on `Seen` tiles. Sets and then restores the default
/// camera.
pub fn draw_grid(manager: &TileManager<Texture2D>) {
    let Some(grid) = manager.grid() else {
        return;
    };
    let viewport = manager.viewport();
    let extent = grid.tile_extent();
    let (xs, ys) = visible_tile_range(viewport, grid.width(), grid.height());

    set_camera(&viewport.camera());
    for y in ys {
        for tile in grid.row_span(y, xs.clone()) {
            if !tile.is_displayed() {
                continue;
            }
            for layer in tile.displayed_layers() {
                draw_texture_ex(
                    &layer.sprite,
                    layer.position.x,
                    layer.position.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(extent),
                        ..Default::default()
                    },
                );
            }
            if tile.overlay_displayed() {
                let p = tile.position();
                draw_rectangle(p.x, p.y, extent.x, extent.y, SEEN_OVERLAY);
            }
        }
    }
    set_default_camera();
}

#![warn(missing_docs)]

//! Layered roguelike tile grid with unseen/seen/visible tiles and a
//! look-at camera, rendered with Macroquad.

mod error;
mod grid;
mod loader {
    pub mod manifest;
}
mod manager;
pub mod render;
mod sprite_catalog;
mod tile;
pub mod viewport;

pub use error::{GridError, ManifestError};
pub use grid::TileGrid;
pub use loader::manifest::{decode_manifest_file, decode_manifest_str, SpriteManifest};
pub use manager::TileManager;
pub use sprite_catalog::{SpriteCatalog, SpriteExtent, SpriteId};
pub use tile::{LayerSprite, Tile, Visibility};
pub use viewport::{Viewport, ViewportConfig};

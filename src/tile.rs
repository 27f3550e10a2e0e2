use macroquad::prelude::*;
use tracing::warn;

use crate::sprite_catalog::{SpriteCatalog, SpriteId};

/// How much of a tile the player knows about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Never seen: nothing is drawn.
    #[default]
    Unseen,
    /// Remembered: only always-show layers are drawn, under a dimming overlay.
    Seen,
    /// In view: every layer is drawn.
    Visible,
}

/// One sprite drawn at a tile's position.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSprite<S> {
    /// Requested id, kept even when it resolved to the fallback.
    pub sprite_id: SpriteId,
    /// Resolved sprite handle.
    pub sprite: S,
    /// World position of the top-left corner.
    pub position: Vec2,
    /// Shown while the tile is `Seen`, not only while `Visible`.
    pub always_show: bool,
    displayed: bool,
}

impl<S> LayerSprite<S> {
    /// Whether this layer is currently drawn (ignoring the tile's own state).
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }
}

/// A single grid cell: a back-to-front stack of layers and a visibility.
///
/// Layers are owned by the tile and released at the start of every
/// [`Tile::set_layers`]. Visibility changes only flip display flags.
#[derive(Debug, Clone)]
pub struct Tile<S> {
    x: usize,
    y: usize,
    position: Vec2,
    layers: Vec<LayerSprite<S>>,
    visibility: Visibility,
    displayed: bool,
    overlay_displayed: bool,
}

impl<S: Clone> Tile<S> {
    pub(crate) fn new(x: usize, y: usize, position: Vec2) -> Self {
        Self {
            x,
            y,
            position,
            layers: Vec::new(),
            visibility: Visibility::Unseen,
            displayed: false,
            overlay_displayed: false,
        }
    }

    /// Replace every layer of this tile, then apply `visibility`.
    ///
    /// `sprite_ids[0]` is drawn first (rearmost). A layer without a matching
    /// `always_show` entry is only drawn while the tile is `Visible`.
    pub fn set_layers(
        &mut self,
        catalog: &SpriteCatalog<S>,
        sprite_ids: &[SpriteId],
        always_show: &[bool],
        visibility: Visibility,
    ) {
        self.clear_layers();

        if sprite_ids.is_empty() {
            self.set_visibility(visibility);
            return;
        }

        if always_show.len() > sprite_ids.len() {
            warn!(
                x = self.x,
                y = self.y,
                layers = sprite_ids.len(),
                flags = always_show.len(),
                "extra_always_show_flags_ignored"
            );
        }

        self.layers.reserve(sprite_ids.len());
        for (i, &id) in sprite_ids.iter().enumerate() {
            self.layers.push(LayerSprite {
                sprite_id: id,
                sprite: catalog.resolve(id).clone(),
                position: self.position,
                always_show: always_show.get(i).copied().unwrap_or(false),
                displayed: false,
            });
        }

        self.set_visibility(visibility);
    }

    /// Release all layers. Safe to call on a tile with none.
    pub fn clear_layers(&mut self) -> usize {
        let released = self.layers.len();
        self.layers.clear();
        released
    }
}

impl<S> Tile<S> {
    /// Switch visibility state; layers are kept, only display flags change.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;

        match visibility {
            Visibility::Unseen => {
                self.displayed = false;
            }
            Visibility::Seen => {
                self.displayed = true;
                self.overlay_displayed = true;
                for layer in &mut self.layers {
                    layer.displayed = layer.always_show;
                }
            }
            Visibility::Visible => {
                self.displayed = true;
                self.overlay_displayed = false;
                for layer in &mut self.layers {
                    layer.displayed = true;
                }
            }
        }
    }

    /// Grid coordinates `(x, y)`.
    pub fn coords(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// World position of the tile's top-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether anything of this tile is drawn.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Whether the dimming overlay is drawn.
    pub fn overlay_displayed(&self) -> bool {
        self.displayed && self.overlay_displayed
    }

    /// All layers, back to front.
    pub fn layers(&self) -> &[LayerSprite<S>] {
        &self.layers
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layers that are drawn right now, back to front. Empty while `Unseen`.
    pub fn displayed_layers(&self) -> impl Iterator<Item = &LayerSprite<S>> {
        let shown = self.displayed;
        self.layers.iter().filter(move |l| shown && l.displayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpriteCatalog<&'static str> {
        SpriteCatalog::new(vec!["floor", "wall", "orc"], "blank")
    }

    fn shown(tile: &Tile<&'static str>) -> Vec<&'static str> {
        tile.displayed_layers().map(|l| l.sprite).collect()
    }

    #[test]
    fn new_tile_is_unseen_and_empty() {
        let tile: Tile<&str> = Tile::new(1, 2, vec2(16.0, 32.0));
        assert_eq!(tile.visibility(), Visibility::Unseen);
        assert!(!tile.is_displayed());
        assert_eq!(tile.layer_count(), 0);
        assert_eq!(tile.coords(), (1, 2));
    }

    #[test]
    fn visibility_transitions_toggle_layers() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        tile.set_layers(&c, &[1, 2], &[true, false], Visibility::Visible);
        assert_eq!(shown(&tile), vec!["wall", "orc"]);
        assert!(!tile.overlay_displayed());

        tile.set_visibility(Visibility::Seen);
        assert!(tile.is_displayed());
        assert!(tile.overlay_displayed());
        assert_eq!(shown(&tile), vec!["wall"]);

        tile.set_visibility(Visibility::Unseen);
        assert!(!tile.is_displayed());
        assert!(shown(&tile).is_empty());
        // layers survive while hidden
        assert_eq!(tile.layer_count(), 2);

        tile.set_visibility(Visibility::Visible);
        assert_eq!(shown(&tile), vec!["wall", "orc"]);
    }

    #[test]
    fn missing_always_show_defaults_to_visible_only() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        tile.set_layers(&c, &[0, 1, 2], &[true], Visibility::Seen);
        assert_eq!(shown(&tile), vec!["floor"]);
    }

    #[test]
    fn extra_always_show_flags_are_ignored() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        tile.set_layers(&c, &[2], &[false, true, true], Visibility::Seen);
        assert_eq!(tile.layer_count(), 1);
        assert!(shown(&tile).is_empty());
    }

    #[test]
    fn set_layers_replaces_previous_layers() {
        let c = catalog();
        let mut tile = Tile::new(3, 4, vec2(48.0, 64.0));
        tile.set_layers(&c, &[0, 1, 2], &[], Visibility::Visible);
        tile.set_layers(&c, &[2], &[], Visibility::Visible);
        assert_eq!(tile.layer_count(), 1);
        assert_eq!(tile.layers()[0].sprite, "orc");
        assert_eq!(tile.layers()[0].position, vec2(48.0, 64.0));
    }

    #[test]
    fn empty_layers_still_apply_visibility() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        tile.set_layers(&c, &[0], &[true], Visibility::Visible);
        tile.set_layers(&c, &[], &[], Visibility::Seen);
        assert_eq!(tile.layer_count(), 0);
        assert_eq!(tile.visibility(), Visibility::Seen);
        assert!(tile.is_displayed());
    }

    #[test]
    fn invalid_ids_use_fallback_sprite() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        tile.set_layers(&c, &[-1, 7], &[], Visibility::Visible);
        assert_eq!(shown(&tile), vec!["blank", "blank"]);
        assert_eq!(tile.layers()[1].sprite_id, 7);
    }

    #[test]
    fn clear_layers_is_idempotent() {
        let c = catalog();
        let mut tile = Tile::new(0, 0, Vec2::ZERO);
        assert_eq!(tile.clear_layers(), 0);
        tile.set_layers(&c, &[0, 1], &[], Visibility::Visible);
        assert_eq!(tile.clear_layers(), 2);
        assert_eq!(tile.clear_layers(), 0);
    }
}

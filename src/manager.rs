use macroquad::prelude::*;
use tracing::{error, info, warn};

use crate::error::GridError;
use crate::grid::TileGrid;
use crate::sprite_catalog::{SpriteCatalog, SpriteExtent, SpriteId};
use crate::tile::{Tile, Visibility};
use crate::viewport::{Viewport, ViewportConfig};

/// Owns the sprites, the tile grid and the camera.
///
/// Direct tile access (`get`, `get_mut`, `set_layers`) treats bad coordinates
/// as a caller bug and returns an error. Camera moves (`look_at`, `look_by`)
/// treat them as ordinary input: they return `false`, log, and leave the
/// camera where it was.
pub struct TileManager<S> {
    catalog: SpriteCatalog<S>,
    grid: Option<TileGrid<S>>,
    viewport: Viewport,
}

impl<S: Clone + SpriteExtent> TileManager<S> {
    /// (Re)build the grid as `width * height` unseen tiles and center the
    /// camera on tile `(width / 2, height / 2)`.
    ///
    /// Non-positive sizes are logged and leave the manager untouched.
    pub fn initialize(&mut self, width: i32, height: i32) -> Result<(), GridError> {
        if width <= 0 || height <= 0 {
            error!(width, height, "invalid_grid_size");
            return Err(GridError::InvalidSize { width, height });
        }

        // Drop the old tiles (and their layers) before allocating new ones.
        self.grid = None;

        let extent = self.catalog.reference().extent();
        let grid = TileGrid::new(width as usize, height as usize, extent);
        self.viewport.reset(extent);

        let (cx, cy) = (width as usize / 2, height as usize / 2);
        let center = grid.get(cx as i32, cy as i32)?.position();
        self.viewport.center_on(cx, cy, center);
        self.grid = Some(grid);

        info!(
            width,
            height,
            tile_w = extent.x,
            tile_h = extent.y,
            "tile_grid_initialized"
        );
        Ok(())
    }
}

impl<S: Clone> TileManager<S> {
    /// An uninitialized manager; call [`TileManager::initialize`] before
    /// touching tiles.
    pub fn new(catalog: SpriteCatalog<S>, config: ViewportConfig) -> Self {
        Self {
            catalog,
            grid: None,
            viewport: Viewport::new(config),
        }
    }

    /// Sprites layers are resolved against.
    pub fn catalog(&self) -> &SpriteCatalog<S> {
        &self.catalog
    }

    /// The grid, if [`TileManager::initialize`] succeeded at least once.
    pub fn grid(&self) -> Option<&TileGrid<S>> {
        self.grid.as_ref()
    }

    /// Camera state.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// `(width, height)` of the grid.
    pub fn size(&self) -> Option<(usize, usize)> {
        self.grid.as_ref().map(|g| (g.width(), g.height()))
    }

    /// Tile at `(x, y)`. Errors when uninitialized or out of range.
    pub fn get(&self, x: i32, y: i32) -> Result<&Tile<S>, GridError> {
        self.grid.as_ref().ok_or(GridError::Uninitialized)?.get(x, y)
    }

    /// Mutable tile at `(x, y)`, same contract as [`TileManager::get`].
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile<S>, GridError> {
        self.grid
            .as_mut()
            .ok_or(GridError::Uninitialized)?
            .get_mut(x, y)
    }

    /// [`Tile::set_layers`] on the tile at `(x, y)`, resolving sprites
    /// through this manager's catalog.
    pub fn set_layers(
        &mut self,
        x: i32,
        y: i32,
        sprite_ids: &[SpriteId],
        always_show: &[bool],
        visibility: Visibility,
    ) -> Result<(), GridError> {
        let grid = self.grid.as_mut().ok_or(GridError::Uninitialized)?;
        grid.get_mut(x, y)?
            .set_layers(&self.catalog, sprite_ids, always_show, visibility);
        Ok(())
    }

    /// [`Tile::set_visibility`] on the tile at `(x, y)`.
    pub fn set_visibility(&mut self, x: i32, y: i32, visibility: Visibility) -> Result<(), GridError> {
        self.get_mut(x, y)?.set_visibility(visibility);
        Ok(())
    }

    /// Center the camera on tile `(x, y)`. Returns `false` and keeps the
    /// current camera when the grid is uninitialized or `(x, y)` is outside it.
    pub fn look_at(&mut self, x: i32, y: i32) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            warn!(x, y, "look_at_before_initialize");
            return false;
        };
        let Ok(tile) = grid.get(x, y) else {
            warn!(
                x,
                y,
                width = grid.width(),
                height = grid.height(),
                "look_at_out_of_bounds"
            );
            return false;
        };
        let (tx, ty) = tile.coords();
        self.viewport.center_on(tx, ty, tile.position());
        true
    }

    /// Move the camera by `(dx, dy)` tiles; same failure rules as
    /// [`TileManager::look_at`].
    pub fn look_by(&mut self, dx: i32, dy: i32) -> bool {
        let Some((cx, cy)) = self.camera_position() else {
            warn!(dx, dy, "look_by_before_initialize");
            return false;
        };
        let (Some(x), Some(y)) = (
            i32::try_from(cx).ok().and_then(|cx| cx.checked_add(dx)),
            i32::try_from(cy).ok().and_then(|cy| cy.checked_add(dy)),
        ) else {
            warn!(dx, dy, "look_by_overflow");
            return false;
        };
        self.look_at(x, y)
    }

    /// Grid coordinate the camera is centered on.
    pub fn camera_position(&self) -> Option<(usize, usize)> {
        self.viewport.center_tile()
    }

    /// World position of the top-left corner of tile `(x, y)`.
    pub fn tile_display_position(&self, x: i32, y: i32) -> Result<Vec2, GridError> {
        Ok(self.get(x, y)?.position())
    }

    /// See [`Viewport::rescale`].
    pub fn rescale(&mut self, display_width: f32, display_height: f32) {
        self.viewport.rescale(display_width, display_height);
    }

    /// Poll macroquad's screen size; the first poll records the original
    /// display, later ones rescale when the size changed.
    pub fn sync_display_size(&mut self) {
        let size = vec2(screen_width(), screen_height());
        if !self.viewport.is_measured() || size != self.viewport.display_size() {
            self.rescale(size.x, size.y);
        }
    }

    /// See [`Viewport::set_user_scale`].
    pub fn set_user_scale(&mut self, factor: f32) {
        self.viewport.set_user_scale(factor);
    }

    /// See [`Viewport::scale_up`].
    pub fn scale_up(&mut self) {
        self.viewport.scale_up();
    }

    /// See [`Viewport::scale_down`].
    pub fn scale_down(&mut self) {
        self.viewport.scale_down();
    }

    /// See [`Viewport::reset_user_scale`].
    pub fn reset_user_scale(&mut self) {
        self.viewport.reset_user_scale();
    }

    /// Camera for `set_camera`, looking at the centered tile.
    pub fn camera(&self) -> Camera2D {
        self.viewport.camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Sprite(&'static str);

    impl SpriteExtent for Sprite {
        fn extent(&self) -> Vec2 {
            vec2(16.0, 16.0)
        }
    }

    fn manager() -> TileManager<Sprite> {
        let catalog = SpriteCatalog::new(vec![Sprite("floor"), Sprite("wall")], Sprite("blank"));
        TileManager::new(catalog, ViewportConfig::default())
    }

    #[test]
    fn invalid_size_leaves_previous_grid() {
        let mut m = manager();
        m.initialize(3, 2).expect("init");
        m.set_layers(1, 1, &[1], &[true], Visibility::Visible).expect("layers");

        for (w, h) in [(0, 5), (5, 0), (-1, 3)] {
            assert_eq!(
                m.initialize(w, h),
                Err(GridError::InvalidSize { width: w, height: h })
            );
        }
        assert_eq!(m.size(), Some((3, 2)));
        assert_eq!(m.get(1, 1).expect("tile").layer_count(), 1);
        assert_eq!(m.camera_position(), Some((1, 1)));
    }

    #[test]
    fn reinitialize_discards_old_tiles() {
        let mut m = manager();
        m.initialize(2, 2).expect("init");
        m.set_layers(0, 0, &[0, 1], &[], Visibility::Visible).expect("layers");
        m.initialize(2, 2).expect("reinit");
        let tile = m.get(0, 0).expect("tile");
        assert_eq!(tile.layer_count(), 0);
        assert_eq!(tile.visibility(), Visibility::Unseen);
    }

    #[test]
    fn uninitialized_access_is_an_error() {
        let mut m = manager();
        assert_eq!(m.get(0, 0).err(), Some(GridError::Uninitialized));
        assert_eq!(
            m.set_layers(0, 0, &[0], &[], Visibility::Visible),
            Err(GridError::Uninitialized)
        );
        assert!(!m.look_at(0, 0));
        assert!(!m.look_by(1, 0));
        assert_eq!(m.camera_position(), None);
    }

    #[test]
    fn look_by_moves_relative_to_camera() {
        let mut m = manager();
        m.initialize(5, 5).expect("init");
        assert!(m.look_by(-1, 1));
        assert_eq!(m.camera_position(), Some((1, 3)));
        assert!(!m.look_by(-2, 0));
        assert_eq!(m.camera_position(), Some((1, 3)));
        assert!(!m.look_by(i32::MAX, 0));
    }

    #[test]
    fn anchor_tracks_tile_center() {
        let mut m = manager();
        m.initialize(4, 4).expect("init");
        assert_eq!(m.viewport().anchor(), vec2(40.0, 40.0));
        assert!(m.look_at(3, 0));
        assert_eq!(m.viewport().anchor(), vec2(56.0, 8.0));
        assert_eq!(m.camera().target, vec2(56.0, 8.0));
    }

    #[test]
    fn tile_display_position_is_bounds_checked() {
        let mut m = manager();
        assert_eq!(m.tile_display_position(0, 0), Err(GridError::Uninitialized));
        m.initialize(4, 3).expect("init");
        assert_eq!(m.tile_display_position(3, 2), Ok(vec2(48.0, 32.0)));
        assert!(matches!(
            m.tile_display_position(4, 0),
            Err(GridError::OutOfBounds { .. })
        ));
    }
}

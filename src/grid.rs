use macroquad::prelude::*;
use std::ops::Range;

use crate::error::GridError;
use crate::tile::Tile;

/// Fixed-size, row-major array of tiles.
///
/// `(0, 0)` is the top-left tile; x grows rightward and y grows downward,
/// both in grid and in world space.
#[derive(Debug, Clone)]
pub struct TileGrid<S> {
    width: usize,
    height: usize,
    tile_extent: Vec2,
    tiles: Vec<Tile<S>>,
}

impl<S: Clone> TileGrid<S> {
    /// Allocate `width * height` unseen, empty tiles laid out `tile_extent` apart.
    pub(crate) fn new(width: usize, height: usize, tile_extent: Vec2) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let position = vec2(x as f32 * tile_extent.x, y as f32 * tile_extent.y);
                tiles.push(Tile::new(x, y, position));
            }
        }
        Self {
            width,
            height,
            tile_extent,
            tiles,
        }
    }
}

impl<S> TileGrid<S> {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// World size of one tile.
    pub fn tile_extent(&self) -> Vec2 {
        self.tile_extent
    }

    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// True when `(x, y)` names a tile of this grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some()
    }

    /// Tile at `(x, y)`; out-of-range coordinates are an error, never clamped.
    pub fn get(&self, x: i32, y: i32) -> Result<&Tile<S>, GridError> {
        let index = self.checked_index(x, y)?;
        Ok(&self.tiles[index])
    }

    /// Mutable tile at `(x, y)`, same contract as [`TileGrid::get`].
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile<S>, GridError> {
        let index = self.checked_index(x, y)?;
        Ok(&mut self.tiles[index])
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile<S>> {
        self.tiles.iter()
    }

    /// Tiles in row-major order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile<S>> {
        self.tiles.iter_mut()
    }

    /// Tiles of row `y` with `x` in `xs`. Ranges are clipped to the grid.
    pub fn row_span(&self, y: usize, xs: Range<usize>) -> &[Tile<S>] {
        if y >= self.height {
            return &[];
        }
        let start = xs.start.min(self.width);
        let end = xs.end.clamp(start, self.width);
        let row = y * self.width;
        &self.tiles[row + start..row + end]
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        self.index_of(x, y).ok_or(GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }
}

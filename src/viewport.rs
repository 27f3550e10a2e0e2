//! Camera state: look-at anchor, display rescaling and user zoom.

use macroquad::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Smallest accepted user scale.
pub const USER_SCALE_MIN: f32 = 0.3;
/// Largest accepted user scale.
pub const USER_SCALE_MAX: f32 = 3.0;
/// Neutral user scale.
pub const USER_SCALE_DEFAULT: f32 = 1.0;
/// Multiplier applied by one [`Viewport::scale_up`] / [`Viewport::scale_down`] step.
pub const USER_SCALE_STEP: f32 = 1.1;

fn default_base_scale() -> f32 {
    6.0
}
fn default_reference_width() -> f32 {
    1024.0
}
fn default_reference_height() -> f32 {
    768.0
}

/// Camera settings: `base_scale` half-rows of tiles are visible above and
/// below the centered tile on the first measured display.
///
/// The reference size stands in for the display until it is measured.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportConfig {
    /// Visible half-height, in tiles, at the first measured display size.
    #[serde(default = "default_base_scale")]
    pub base_scale: f32,
    /// Display width assumed before the first measurement.
    #[serde(default = "default_reference_width", alias = "reference_display_width")]
    pub reference_width: f32,
    /// Display height assumed before the first measurement.
    #[serde(default = "default_reference_height", alias = "reference_display_height")]
    pub reference_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            base_scale: default_base_scale(),
            reference_width: default_reference_width(),
            reference_height: default_reference_height(),
        }
    }
}

/// Which tile the camera is centered on and how much of the grid fits on
/// screen.
///
/// `scale` is the half-height of the visible area measured in tiles:
/// `base_scale * (display_height / original_display_height) * user_scale`,
/// where the original display height is the first one passed to
/// [`Viewport::rescale`].
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center_tile: Option<(usize, usize)>,
    tile_extent: Vec2,
    anchor: Vec2,
    base_scale: f32,
    original_display_height: f32,
    measured: bool,
    display_size: Vec2,
    user_scale: f32,
    scale: f32,
}

impl Viewport {
    /// A viewport assuming `config`'s reference size until the display is
    /// measured.
    pub fn new(config: ViewportConfig) -> Self {
        let display_size = vec2(config.reference_width, config.reference_height);
        Self {
            center_tile: None,
            tile_extent: Vec2::ONE,
            anchor: Vec2::ZERO,
            base_scale: config.base_scale,
            original_display_height: config.reference_height,
            measured: false,
            display_size,
            user_scale: USER_SCALE_DEFAULT,
            scale: config.base_scale,
        }
    }

    /// Forget the centered tile and adopt a new tile footprint. Called when
    /// the grid is rebuilt.
    pub(crate) fn reset(&mut self, tile_extent: Vec2) {
        self.center_tile = None;
        self.tile_extent = tile_extent;
        self.anchor = Vec2::ZERO;
    }

    /// Center on the tile whose top-left corner is at `tile_position`.
    /// Callers guarantee `(x, y)` exists in the current grid.
    pub(crate) fn center_on(&mut self, x: usize, y: usize, tile_position: Vec2) {
        self.anchor = tile_position + self.tile_extent * 0.5;
        self.center_tile = Some((x, y));
        debug!(x, y, anchor_x = self.anchor.x, anchor_y = self.anchor.y, "look_at");
    }

    /// Recompute the scale for a display of the given pixel size.
    ///
    /// The first valid call records the original display height, so it
    /// leaves the scale at `base_scale * user_scale`.
    pub fn rescale(&mut self, display_width: f32, display_height: f32) {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(display_width) && valid(display_height)) {
            warn!(display_width, display_height, "invalid_display_size");
            return;
        }
        let size = vec2(display_width, display_height);
        if !self.measured {
            self.measured = true;
            self.original_display_height = display_height;
            info!(display_width, display_height, "display_measured");
        } else if size != self.display_size {
            info!(display_width, display_height, "display_resized");
        }
        self.display_size = size;
        self.apply_scale();
    }

    /// Set the user zoom factor, clamped to `[USER_SCALE_MIN, USER_SCALE_MAX]`.
    pub fn set_user_scale(&mut self, factor: f32) {
        self.user_scale = clamp_user_scale(factor);
        self.apply_scale();
    }

    /// Show more of the grid by one step.
    pub fn scale_up(&mut self) {
        self.set_user_scale(self.user_scale * USER_SCALE_STEP);
    }

    /// Show less of the grid by one step.
    pub fn scale_down(&mut self) {
        self.set_user_scale(self.user_scale / USER_SCALE_STEP);
    }

    /// Back to [`USER_SCALE_DEFAULT`].
    pub fn reset_user_scale(&mut self) {
        self.set_user_scale(USER_SCALE_DEFAULT);
    }

    fn apply_scale(&mut self) {
        self.scale =
            self.base_scale * (self.display_size.y / self.original_display_height) * self.user_scale;
    }

    /// Grid coordinate currently centered, `None` before the first look-at.
    pub fn center_tile(&self) -> Option<(usize, usize)> {
        self.center_tile
    }

    /// World point the camera looks at (center of the centered tile).
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// World size of one tile.
    pub fn tile_extent(&self) -> Vec2 {
        self.tile_extent
    }

    /// Current visible half-height in tiles.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// User zoom factor.
    pub fn user_scale(&self) -> f32 {
        self.user_scale
    }

    /// Scale at the original display height with neutral user scale.
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Last measured display size, or the reference size before that.
    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    /// Whether [`Viewport::rescale`] has recorded the original display.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Display height the scale ratio is taken against.
    pub fn original_display_height(&self) -> f32 {
        self.original_display_height
    }

    /// Half of the visible area in world units.
    pub fn half_extent(&self) -> Vec2 {
        let half_h = self.scale * self.tile_extent.y;
        let aspect = self.display_size.x / self.display_size.y;
        vec2(half_h * aspect, half_h)
    }

    /// World-space rectangle currently on screen.
    pub fn visible_rect(&self) -> Rect {
        let half = self.half_extent();
        let min = self.anchor - half;
        Rect::new(min.x, min.y, half.x * 2.0, half.y * 2.0)
    }

    /// Macroquad camera looking at the anchor; world y grows downward.
    pub fn camera(&self) -> Camera2D {
        let half = self.half_extent();
        Camera2D {
            target: self.anchor,
            zoom: vec2(1.0 / half.x, -1.0 / half.y),
            ..Default::default()
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

fn clamp_user_scale(factor: f32) -> f32 {
    if !factor.is_finite() {
        return USER_SCALE_DEFAULT;
    }
    factor.clamp(USER_SCALE_MIN, USER_SCALE_MAX)
}

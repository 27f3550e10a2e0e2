use macroquad::prelude::*;
use tracing::warn;

/// Index into a [`SpriteCatalog`]. Negative values are accepted and resolve to
/// the fallback sprite.
pub type SpriteId = i32;

/// Intrinsic display size of a sprite, in world units.
pub trait SpriteExtent {
    /// Width and height of one sprite.
    fn extent(&self) -> Vec2;
}

impl SpriteExtent for Texture2D {
    fn extent(&self) -> Vec2 {
        self.size()
    }
}

/// Immutable list of sprites plus the blank sprite used for unknown ids.
///
/// All sprites are expected to share the same size; tiles are laid out using
/// the size of [`SpriteCatalog::reference`].
#[derive(Debug, Clone)]
pub struct SpriteCatalog<S> {
    sprites: Vec<S>,
    fallback: S,
}

impl<S> SpriteCatalog<S> {
    /// Build a catalog from an ordered sprite list and a fallback sprite.
    pub fn new(sprites: Vec<S>, fallback: S) -> Self {
        Self { sprites, fallback }
    }

    /// Returns the sprite at `id`, or the fallback when `id` is unknown.
    pub fn resolve(&self, id: SpriteId) -> &S {
        match self.get(id) {
            Some(sprite) => sprite,
            None => {
                warn!(sprite_id = id, catalog_len = self.sprites.len(), "invalid_sprite_id");
                &self.fallback
            }
        }
    }

    /// Returns the sprite at `id` without falling back.
    #[inline]
    pub fn get(&self, id: SpriteId) -> Option<&S> {
        usize::try_from(id).ok().and_then(|i| self.sprites.get(i))
    }

    /// The blank sprite.
    pub fn fallback(&self) -> &S {
        &self.fallback
    }

    /// Sprite used to measure one tile's footprint.
    pub fn reference(&self) -> &S {
        self.sprites.first().unwrap_or(&self.fallback)
    }

    /// Number of sprites, not counting the fallback.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True when only the fallback is available.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

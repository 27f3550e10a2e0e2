use crate::error::ManifestError;
use crate::manager::TileManager;
use crate::sprite_catalog::SpriteCatalog;
use crate::viewport::ViewportConfig;
use anyhow::Context;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// JSON description of the sprites a grid draws with.
///
/// ```json
/// { "sprites": ["floor.png", "wall.png"], "fallback": "blank.png",
///   "base_scale": 6.0, "reference_width": 1024, "reference_height": 768 }
/// ```
///
/// Image paths are relative to the manifest file. Viewport keys default to
/// [`ViewportConfig::default`]; `reference_display_width` and
/// `reference_display_height` are accepted as aliases. Unknown keys are
/// rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteManifest {
    /// Sprite images, indexed by [`crate::SpriteId`].
    #[serde(default)]
    pub sprites: Vec<String>,
    /// Image drawn for unknown sprite ids.
    pub fallback: String,
    /// Visible half-height in tiles at the first measured display.
    #[serde(default = "default_base_scale")]
    pub base_scale: f32,
    /// Display width assumed before the first measurement.
    #[serde(default = "default_reference_width", alias = "reference_display_width")]
    pub reference_width: f32,
    /// Display height assumed before the first measurement.
    #[serde(default = "default_reference_height", alias = "reference_display_height")]
    pub reference_height: f32,
}

fn default_base_scale() -> f32 {
    ViewportConfig::default().base_scale
}
fn default_reference_width() -> f32 {
    ViewportConfig::default().reference_width
}
fn default_reference_height() -> f32 {
    ViewportConfig::default().reference_height
}

impl SpriteManifest {
    /// Camera settings carried by this manifest.
    pub fn viewport(&self) -> ViewportConfig {
        ViewportConfig {
            base_scale: self.base_scale,
            reference_width: self.reference_width,
            reference_height: self.reference_height,
        }
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let vp = self.viewport();
        if !(vp.base_scale.is_finite() && vp.base_scale > 0.0) {
            return Err(ManifestError::Invalid(format!(
                "base_scale must be positive, got {}",
                vp.base_scale
            )));
        }
        if !(vp.reference_width > 0.0 && vp.reference_height > 0.0) {
            return Err(ManifestError::Invalid(format!(
                "reference display must be positive, got {}x{}",
                vp.reference_width, vp.reference_height
            )));
        }
        if self.fallback.is_empty() {
            return Err(ManifestError::Invalid("fallback sprite path is empty".into()));
        }
        Ok(())
    }
}

/// Parse and validate manifest text. `path` only labels errors.
pub fn decode_manifest_str(txt: &str, path: &Path) -> Result<SpriteManifest, ManifestError> {
    let manifest: SpriteManifest =
        serde_json::from_str(txt).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    manifest.validate()?;
    Ok(manifest)
}

/// Read a `.json` manifest and return it with the directory its image
/// paths are relative to.
pub fn decode_manifest_file(path: &str) -> Result<(SpriteManifest, PathBuf), ManifestError> {
    let p = Path::new(path);
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(ManifestError::UnsupportedFormat(p.to_path_buf()));
    }

    let txt = std::fs::read_to_string(p).map_err(|source| ManifestError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    let manifest = decode_manifest_str(&txt, p)?;

    let base_dir = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    Ok((manifest, base_dir))
}

async fn load_sprite(base_dir: &Path, rel: &str) -> anyhow::Result<Texture2D> {
    let img_path = base_dir.join(rel);
    let img_str = img_path
        .to_str()
        .with_context(|| format!("Sprite path is not UTF-8: {}", img_path.display()))?;
    let tex = load_texture(img_str)
        .await
        .with_context(|| format!("Loading texture {}", rel))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

impl SpriteCatalog<Texture2D> {
    /// Load every texture named by `manifest`.
    pub async fn from_manifest(manifest: &SpriteManifest, base_dir: &Path) -> anyhow::Result<Self> {
        let mut sprites = Vec::with_capacity(manifest.sprites.len());
        for rel in &manifest.sprites {
            sprites.push(load_sprite(base_dir, rel).await?);
        }
        let fallback = load_sprite(base_dir, &manifest.fallback).await?;
        Ok(Self::new(sprites, fallback))
    }
}

impl TileManager<Texture2D> {
    /// Build an uninitialized manager from a manifest file, scaled for the
    /// current screen size.
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let (manifest, base_dir) = decode_manifest_file(path)?;
        let catalog = SpriteCatalog::from_manifest(&manifest, &base_dir)
            .await
            .with_context(|| format!("Loading sprites from {}", path))?;
        let mut manager = Self::new(catalog, manifest.viewport());
        manager.sync_display_size();
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("tile_grid_manifest_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn parses_manifest_with_defaults() {
        let dir = temp_dir();
        let path = dir.join("sprites.json");
        fs::write(&path, r#"{ "sprites": ["a.png", "b.png"], "fallback": "blank.png" }"#)
            .expect("failed to write manifest");

        let (manifest, base) =
            decode_manifest_file(path.to_str().expect("path utf8")).expect("decode");
        assert_eq!(manifest.sprites, vec!["a.png", "b.png"]);
        assert_eq!(manifest.fallback, "blank.png");
        assert_eq!(manifest.viewport(), ViewportConfig::default());
        assert_eq!(base, dir);
    }

    #[test]
    fn reads_viewport_settings() {
        let manifest = decode_manifest_str(
            r#"{ "fallback": "blank.png", "base_scale": 4.5, "reference_height": 1080 }"#,
            Path::new("inline.json"),
        )
        .expect("decode");
        assert!(manifest.sprites.is_empty());
        let vp = manifest.viewport();
        assert_eq!(vp.base_scale, 4.5);
        assert_eq!(vp.reference_height, 1080.0);
        assert_eq!(vp.reference_width, 1024.0);
    }

    #[test]
    fn accepts_reference_display_aliases() {
        let manifest = decode_manifest_str(
            r#"{ "fallback": "blank.png", "reference_display_width": 1920.0, "reference_display_height": 1080.0 }"#,
            Path::new("inline.json"),
        )
        .expect("decode");
        assert_eq!(manifest.viewport().reference_width, 1920.0);
        assert_eq!(manifest.viewport().reference_height, 1080.0);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = decode_manifest_str(
            r#"{ "fallback": "blank.png", "reference_hieght": 1080.0 }"#,
            Path::new("inline.json"),
        )
        .expect_err("expected unknown key error");
        assert!(matches!(err, ManifestError::Json { .. }));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = decode_manifest_str(
            r#"{ "fallback": "blank.png", "base_scale": 0 }"#,
            Path::new("inline.json"),
        )
        .expect_err("expected invalid manifest");
        assert!(matches!(err, ManifestError::Invalid(_)));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let path = dir.join("sprites.json");
        fs::write(&path, "{ not json").expect("failed to write manifest");

        let err = decode_manifest_file(path.to_str().expect("path utf8"))
            .expect_err("expected decode error");
        assert!(matches!(err, ManifestError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file() {
        let dir = temp_dir();
        let path = dir.join("missing.json");
        let err = decode_manifest_file(path.to_str().expect("path utf8"))
            .expect_err("expected decode error");
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn rejects_non_json_extension() {
        let err = decode_manifest_file("sprites.toml").expect_err("expected format error");
        assert!(matches!(err, ManifestError::UnsupportedFormat(p) if p == Path::new("sprites.toml")));
    }
}

use macroquad::prelude::*;
use roguelike_tile_grid::render::draw_grid;
use roguelike_tile_grid::{SpriteCatalog, TileManager, ViewportConfig, Visibility};
use tracing_subscriber::EnvFilter;

const SPRITE_PX: u16 = 16;
const SPRITE_COUNT: i32 = 40;

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Grid".into(),
        window_width: 1024,
        window_height: 768,
        window_resizable: true,
        ..Default::default()
    }
}

/// Solid square with a darker border, so layers are easy to tell apart.
fn solid_sprite(color: Color) -> Texture2D {
    let n = SPRITE_PX as usize;
    let mut bytes = Vec::with_capacity(n * n * 4);
    for y in 0..n {
        for x in 0..n {
            let edge = x == 0 || y == 0 || x == n - 1 || y == n - 1;
            let c = if edge {
                Color::new(color.r * 0.5, color.g * 0.5, color.b * 0.5, 1.0)
            } else {
                color
            };
            bytes.extend_from_slice(&<[u8; 4]>::from(c));
        }
    }
    let tex = Texture2D::from_rgba8(SPRITE_PX, SPRITE_PX, &bytes);
    tex.set_filter(FilterMode::Nearest);
    tex
}

fn catalog() -> SpriteCatalog<Texture2D> {
    let sprites = (0..SPRITE_COUNT)
        .map(|i| {
            let t = i as f32 / SPRITE_COUNT as f32;
            solid_sprite(Color::new(t, 1.0 - t, (t * 7.0).fract(), 1.0))
        })
        .collect();
    SpriteCatalog::new(sprites, solid_sprite(MAGENTA))
}

/// Movement delta for vi-style keys.
fn movement() -> (i32, i32) {
    let keys = [
        (KeyCode::H, (-1, 0)),
        (KeyCode::J, (0, 1)),
        (KeyCode::K, (0, -1)),
        (KeyCode::L, (1, 0)),
        (KeyCode::Y, (-1, -1)),
        (KeyCode::U, (1, -1)),
        (KeyCode::B, (-1, 1)),
        (KeyCode::N, (1, 1)),
    ];
    keys.iter()
        .filter(|(k, _)| is_key_pressed(*k))
        .fold((0, 0), |(dx, dy), (_, (x, y))| (dx + x, dy + y))
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "demo_failed");
    }
}

async fn run() -> anyhow::Result<()> {
    let mut tiles = TileManager::new(catalog(), ViewportConfig::default());
    let size = ((SPRITE_COUNT as f64).sqrt().floor() as i32) * 2;
    tiles.initialize(size, size)?;

    // Fill with a prime stride so neighbours rarely repeat.
    let mut s = 0;
    for x in 0..size {
        for y in 0..size {
            let vis = if (x + y) % 5 == 0 { Visibility::Seen } else { Visibility::Visible };
            tiles.set_layers(x, y, &[s, (s + 1) % SPRITE_COUNT], &[true], vis)?;
            s = (s + 37) % SPRITE_COUNT;
        }
    }

    loop {
        tiles.sync_display_size();

        let (dx, dy) = movement();
        if dx != 0 || dy != 0 {
            tiles.look_by(dx, dy);
        }
        if is_key_pressed(KeyCode::Equal) {
            tiles.scale_down();
        }
        if is_key_pressed(KeyCode::Minus) {
            tiles.scale_up();
        }
        if is_key_pressed(KeyCode::Key0) {
            tiles.reset_user_scale();
        }

        clear_background(BLACK);
        draw_grid(&tiles);

        let (cx, cy) = tiles.camera_position().unwrap_or_default();
        draw_text(
            &format!("camera {cx},{cy}  scale {:.2}  FPS: {}", tiles.viewport().scale(), get_fps()),
            20.0,
            30.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
}

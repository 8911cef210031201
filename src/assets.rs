//! Sprite loading with fallback visuals
//!
//! A missing image never stops the game; the scene gets a solid-colored
//! rectangle instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image '{0}' not found")]
    NotFound(String),
    #[error("image '{name}' could not be decoded: {reason}")]
    Decode { name: String, reason: String },
}

/// Opaque handle issued by the platform loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle(pub u32);

/// RGBA color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const CYAN: Color = Color([0, 255, 255, 255]);
    pub const GREEN: Color = Color([0, 200, 0, 255]);
    pub const RED: Color = Color([220, 40, 40, 255]);
    pub const BLUE: Color = Color([40, 80, 220, 255]);
    pub const GOLD: Color = Color([255, 200, 0, 255]);
}

/// What the scene draws for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Image(ImageHandle),
    Solid(Color),
}

/// Platform image loader
pub trait AssetLoader {
    fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError>;
}

/// Loader with no images at all (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError> {
        Err(AssetError::NotFound(name.to_string()))
    }
}

/// Load an image, or fall back to a solid color
pub fn load_sprite(loader: &mut dyn AssetLoader, name: &str, fallback: Color) -> Sprite {
    match loader.load_image(name) {
        Ok(handle) => Sprite::Image(handle),
        Err(e) => {
            log::warn!("Using fallback visual for '{}': {}", name, e);
            Sprite::Solid(fallback)
        }
    }
}

/// Every visual the scene needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSet {
    pub background: Sprite,
    pub ground: Sprite,
    pub player: Sprite,
    pub obstacle: Sprite,
    pub coin: Sprite,
}

impl SpriteSet {
    pub fn load(loader: &mut dyn AssetLoader) -> Self {
        Self {
            background: load_sprite(loader, "Background", Color::CYAN),
            ground: load_sprite(loader, "Ground", Color::GREEN),
            player: load_sprite(loader, "Player", Color::RED),
            obstacle: load_sprite(loader, "Obstacle1", Color::BLUE),
            coin: load_sprite(loader, "Coin", Color::GOLD),
        }
    }

    /// True when every sprite fell back to a solid color
    pub fn is_fallback_only(&self) -> bool {
        [self.background, self.ground, self.player, self.obstacle, self.coin]
            .iter()
            .all(|s| matches!(s, Sprite::Solid(_)))
    }
}

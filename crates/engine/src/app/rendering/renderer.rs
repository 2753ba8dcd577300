use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::warn;
use winit::window::Window;

use crate::app::{DrawCommand, Rect, RenderFrame};
use crate::sprite_keys::validate_sprite_key;

use super::raster::{Canvas, LoadedSprite};
use super::text::draw_text;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
    #[error("surface resize failed: {0}")]
    Resize(#[from] pixels::TextureError),
}

/// Presents `RenderFrame`s into a fixed logical buffer that `pixels` scales
/// to the window.
pub struct Renderer {
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
        asset_root: PathBuf,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(logical_width, logical_height, surface)?;
        Ok(Self {
            pixels,
            logical_width,
            logical_height,
            sprites: SpriteCache::new(asset_root),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    pub fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        let mut canvas = Canvas::new(
            self.pixels.frame_mut(),
            self.logical_width,
            self.logical_height,
        );
        paint_frame(&mut canvas, frame, &mut self.sprites);
        self.pixels.render()?;
        Ok(())
    }
}

pub(crate) fn paint_frame(canvas: &mut Canvas<'_>, frame: &RenderFrame, sprites: &mut SpriteCache) {
    canvas.clear(frame.clear_color());
    for item in frame.sorted_items() {
        match &item.command {
            DrawCommand::Sprite {
                sprite_id,
                dest,
                fallback,
            } => {
                let (x, y, w, h) = snap_rect(dest);
                match sprites.resolve(sprite_id) {
                    Some(sprite) => canvas.blit_scaled(sprite, x, y, w, h),
                    None => canvas.fill_rect(x, y, w, h, *fallback),
                }
            }
            DrawCommand::Fill { rect, color } => {
                let (x, y, w, h) = snap_rect(rect);
                canvas.fill_rect(x, y, w, h, *color);
            }
            DrawCommand::Outline { rect, color } => {
                let (x, y, w, h) = snap_rect(rect);
                canvas.outline_rect(x, y, w, h, *color);
            }
            DrawCommand::Text { x, y, text, color } => {
                draw_text(canvas, x.round() as i32, y.round() as i32, text, *color);
            }
        }
    }
}

fn snap_rect(rect: &Rect) -> (i32, i32, i32, i32) {
    (
        rect.x.round() as i32,
        rect.y.round() as i32,
        rect.w.round().max(0.0) as i32,
        rect.h.round().max(0.0) as i32,
    )
}

/// Sprite lookup by id. A failed load is cached as `None` and warned about
/// once, so callers fall back to their placeholder color every frame without
/// retrying the filesystem.
pub(crate) struct SpriteCache {
    asset_root: PathBuf,
    sprites: HashMap<String, Option<LoadedSprite>>,
    warned_missing: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            sprites: HashMap::new(),
            warned_missing: HashSet::new(),
        }
    }

    pub(crate) fn resolve(&mut self, key: &str) -> Option<&LoadedSprite> {
        if !self.sprites.contains_key(key) {
            let loaded = self.load(key);
            self.sprites.insert(key.to_string(), loaded);
        }
        self.sprites.get(key).and_then(Option::as_ref)
    }

    fn load(&mut self, key: &str) -> Option<LoadedSprite> {
        let path = match resolve_sprite_image_path(&self.asset_root, key) {
            Ok(path) => path,
            Err(reason) => {
                warn_sprite_load_once(&mut self.warned_missing, key, None, &reason);
                return None;
            }
        };
        match load_sprite_rgba(&path) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                warn_sprite_load_once(&mut self.warned_missing, key, Some(&path), &reason);
                None
            }
        }
    }

    #[cfg(test)]
    fn warned_count(&self) -> usize {
        self.warned_missing.len()
    }
}

fn resolve_sprite_image_path(asset_root: &Path, key: &str) -> Result<PathBuf, String> {
    validate_sprite_key(key).map_err(|error| format!("invalid_key:{error}"))?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        sprite_id = key,
        path = %path_display,
        reason = reason,
        "renderer_sprite_load_failed_using_placeholder"
    );
}

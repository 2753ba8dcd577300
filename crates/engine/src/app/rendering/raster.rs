use crate::app::Rgba;

pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// RGBA8 pixel buffer view with clipped drawing primitives.
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn clear(&mut self, color: Rgba) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(w).min(self.width as i32);
        let end_y = y.saturating_add(h).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub(crate) fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 1 || h <= 1 {
            self.fill_rect(x, y, w.max(1), h.max(1), color);
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    /// Nearest-neighbour blit of `sprite` stretched into the destination rect.
    pub(crate) fn blit_scaled(&mut self, sprite: &LoadedSprite, x: i32, y: i32, w: i32, h: i32) {
        if sprite.width == 0 || sprite.height == 0 || w <= 0 || h <= 0 {
            return;
        }
        let expected_len = sprite.width as usize * sprite.height as usize * 4;
        if sprite.rgba.len() < expected_len {
            return;
        }

        let draw_left = x.max(0);
        let draw_top = y.max(0);
        let draw_right = x.saturating_add(w).min(self.width as i32);
        let draw_bottom = y.saturating_add(h).min(self.height as i32);
        let sprite_width = sprite.width as usize;

        for out_y in draw_top..draw_bottom {
            let src_y = (((out_y - y) as u64 * sprite.height as u64) / h as u64) as usize;
            let src_y = src_y.min(sprite.height as usize - 1);
            for out_x in draw_left..draw_right {
                let src_x = (((out_x - x) as u64 * sprite.width as u64) / w as u64) as usize;
                let src_x = src_x.min(sprite_width - 1);
                let offset = (src_y * sprite_width + src_x) * 4;
                let color = [
                    sprite.rgba[offset],
                    sprite.rgba[offset + 1],
                    sprite.rgba[offset + 2],
                    sprite.rgba[offset + 3],
                ];
                self.blend_pixel(out_x, out_y, color);
            }
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = color[3];
        if alpha == 0 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        let a = alpha as u16;
        for channel in 0..3 {
            let blended = (color[channel] as u16 * a + dst[channel] as u16 * (255 - a)) / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = 255;
    }
}

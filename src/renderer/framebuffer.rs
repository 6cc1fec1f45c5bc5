use super::{Canvas, CopyOptions};
use crate::core::Texture;
use crate::error::RenderError;
use crate::math::{Flip, Rect};

/// Software render target. Pixels are row-major `0x00RRGGBB`.
pub struct Framebuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    clear_color: u32,
}

impl Framebuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
            clear_color: 0x0000_0000,
        }
    }

    #[must_use]
    pub fn with_clear_color(mut self, color: u32) -> Self {
        self.clear_color = color;
        self
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn fill(&mut self) {
        self.pixels.fill(self.clear_color);
    }

    /// Draws `src` of `texture` scaled (nearest neighbour) into `dst`.
    ///
    /// `None` for `src` selects the whole texture, `None` for `dst` the whole
    /// framebuffer. Destination pixels outside the framebuffer are clipped.
    pub fn blit(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    ) -> Result<(), RenderError> {
        if texture.is_empty() {
            return Err(RenderError::EmptyTexture {
                width: texture.width,
                height: texture.height,
            });
        }

        let src = src.unwrap_or_else(|| texture.bounds());
        if src.is_empty() || !src.contained_in(&texture.bounds()) {
            return Err(RenderError::SourceOutOfBounds {
                x: src.x,
                y: src.y,
                w: src.w,
                h: src.h,
                tex_width: texture.width,
                tex_height: texture.height,
            });
        }

        let dst = dst.unwrap_or_else(|| self.bounds());
        let Some(visible) = dst.intersection(&self.bounds()) else {
            // Fully off-target draws are not an error.
            return Ok(());
        };

        let (src_w, src_h) = (i64::from(src.w), i64::from(src.h));
        let (dst_w, dst_h) = (i64::from(dst.w), i64::from(dst.h));

        for py in visible.y..visible.bottom() {
            let mut ty = i64::from(py - dst.y) * src_h / dst_h;
            if options.flip == Flip::Vertical {
                ty = src_h - 1 - ty;
            }
            let sy = (i64::from(src.y) + ty) as u32;
            let row = py as usize * self.width as usize;

            for px in visible.x..visible.right() {
                let mut tx = i64::from(px - dst.x) * src_w / dst_w;
                if options.flip == Flip::Horizontal {
                    tx = src_w - 1 - tx;
                }
                let sx = (i64::from(src.x) + tx) as u32;

                let [r, g, b, a] = texture.pixel(sx, sy);
                let alpha = u32::from(a) * u32::from(options.alpha) / 255;
                if alpha == 0 {
                    continue;
                }

                let out = &mut self.pixels[row + px as usize];
                *out = blend(*out, r, g, b, alpha);
            }
        }

        Ok(())
    }

    /// Scales the frame into a `dw * dh` row-major window buffer, nearest
    /// neighbour with the aspect ratio kept. Borders are black.
    pub fn scale_into(&self, dst: &mut [u32], dw: usize, dh: usize) {
        dst.fill(0x0000_0000);
        let Some((x0, y0, tw, th)) = letterbox(self.width as usize, self.height as usize, dw, dh)
        else {
            return;
        };

        let sw = self.width as usize;
        let sh = self.height as usize;
        let rows = dst.chunks_exact_mut(dw).skip(y0).take(th);
        for (y, dst_row) in rows.enumerate() {
            let src_row = &self.pixels[(y * sh / th) * sw..][..sw];
            for (x, out) in dst_row[x0..x0 + tw].iter_mut().enumerate() {
                *out = src_row[x * sw / tw];
            }
        }
    }
}

/// Largest `sw:sh` area centred in `dw x dh`, as `(x, y, w, h)`.
fn letterbox(sw: usize, sh: usize, dw: usize, dh: usize) -> Option<(usize, usize, usize, usize)> {
    if sw == 0 || sh == 0 {
        return None;
    }
    let (tw, th) = if dw * sh <= dh * sw {
        (dw, dw * sh / sw)
    } else {
        (dh * sw / sh, dh)
    };
    (tw > 0 && th > 0).then(|| ((dw - tw) / 2, (dh - th) / 2, tw, th))
}

fn blend(dst: u32, r: u8, g: u8, b: u8, alpha: u32) -> u32 {
    let mix = |src: u8, shift: u32| {
        let d = (dst >> shift) & 0xFF;
        (u32::from(src) * alpha + d * (255 - alpha)) / 255
    };
    (mix(r, 16) << 16) | (mix(g, 8) << 8) | mix(b, 0)
}

impl Canvas for Framebuffer {
    fn clear(&mut self) {
        self.fill();
    }

    fn copy_ex(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    ) -> Result<(), RenderError> {
        self.blit(texture, src, dst, options)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        // Offscreen target: the pixels are the result.
        Ok(())
    }

    fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

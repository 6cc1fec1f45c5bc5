use crate::error::GameError;
use crate::math::Rect;
use std::path::Path;

const BYTES_PER_PIXEL: usize = 4;

/// Side of the stand-in texture; large enough for every crop the sprite
/// sheet is cut into.
const PLACEHOLDER_SIZE: u32 = 512;

/// RGBA8 pixel data kept on the CPU for the software rasteriser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| GameError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba_image = image.to_rgba8();
        let (width, height) = rgba_image.dimensions();

        Ok(Self {
            pixels: rgba_image.into_raw(),
            width,
            height,
        })
    }

    /// Loads `path`, falling back to a checkerboard when the file is missing
    /// or unreadable so the game keeps running without its assets.
    pub fn load_or_placeholder(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(texture) => {
                log::info!(
                    "Loaded {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                texture
            }
            Err(e) => {
                log::error!("{e}");
                log::warn!("Using placeholder texture for {}", path.display());
                Self::checkerboard(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, 16)
            }
        }
    }

    pub fn create_from_data(data: &[u8], width: u32, height: u32) -> Result<Self, GameError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(GameError::TextureData {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            pixels: data.to_vec(),
            width,
            height,
        })
    }

    /// Magenta/black checkerboard with `cell` sized squares.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);

        for y in 0..height {
            for x in 0..width {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                if on {
                    pixels.extend_from_slice(&[255, 0, 255, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 255]);
                }
            }
        }

        Self {
            pixels,
            width,
            height,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA of the texel at `(x, y)`. Callers keep coordinates in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

use crate::core::Texture;

const GLYPH_SIZE: u32 = 8;
/// Blank columns between two glyphs, before scaling.
const GLYPH_SPACING: u32 = 1;

/// Built-in 8x8 monospace bitmap font, one `u64` per glyph, top row in the
/// most significant byte.
pub struct BitmapFont;

impl BitmapFont {
    #[must_use]
    pub fn glyph(ch: char) -> Option<u64> {
        let bitmap = match ch.to_ascii_uppercase() {
            '0' => 0x3C66666E76663C00,
            '1' => 0x1818381818187E00,
            '2' => 0x3C66060C30607E00,
            '3' => 0x3C66061C06663C00,
            '4' => 0x060E1E667F060600,
            '5' => 0x7E607C0606663C00,
            '6' => 0x3C66607C66663C00,
            '7' => 0x7E660C1818181800,
            '8' => 0x3C66663C66663C00,
            '9' => 0x3C66663E06663C00,
            'A' => 0x183C66667E666600,
            'D' => 0x786C6666666C7800,
            'E' => 0x7E60607C60607E00,
            'F' => 0x7E60607C60606000,
            'L' => 0x6060606060607E00,
            'N' => 0x66767E7E6E666600,
            'P' => 0x7C66667C60606000,
            'R' => 0x7C66667C6C666600,
            'S' => 0x3C66603C06663C00,
            'U' => 0x6666666666663C00,
            ' ' => 0,
            _ => return None,
        };
        Some(bitmap)
    }

    /// Pixel size of `text` rendered at `scale`.
    #[must_use]
    pub fn measure(text: &str, scale: u32) -> (u32, u32) {
        let count = text.chars().count() as u32;
        if count == 0 {
            return (0, 0);
        }
        let width = (count * (GLYPH_SIZE + GLYPH_SPACING) - GLYPH_SPACING) * scale;
        (width, GLYPH_SIZE * scale)
    }

    /// Renders `text` into a transparent texture with `color` glyph pixels.
    /// Characters without a glyph leave a blank cell.
    #[must_use]
    pub fn render(text: &str, color: [u8; 4], scale: u32) -> Texture {
        let scale = scale.max(1);
        let (width, height) = Self::measure(text, scale);
        let mut data = vec![0u8; width as usize * height as usize * 4];

        for (index, ch) in text.chars().enumerate() {
            let Some(bitmap) = Self::glyph(ch) else {
                log::warn!("No glyph for {ch:?}");
                continue;
            };
            let origin_x = index as u32 * (GLYPH_SIZE + GLYPH_SPACING) * scale;

            for gy in 0..GLYPH_SIZE {
                for gx in 0..GLYPH_SIZE {
                    let bit = (bitmap >> (63 - (gy * GLYPH_SIZE + gx))) & 1;
                    if bit == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let px = origin_x + gx * scale + sx;
                            let py = gy * scale + sy;
                            let idx = (py as usize * width as usize + px as usize) * 4;
                            data[idx..idx + 4].copy_from_slice(&color);
                        }
                    }
                }
            }
        }

        // Size always matches the buffer built above
        Texture::create_from_data(&data, width, height)
            .unwrap_or_else(|_| Texture::checkerboard(width, height, GLYPH_SIZE))
    }
}

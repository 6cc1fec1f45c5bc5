mod font;

pub use font::BitmapFont;

use crate::core::Texture;
use crate::engine::GameState;
use crate::math::Rect;

/// Label colour; glyph pixels are opaque, fading is done through the alpha mod.
pub const LABEL_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Pre-rendered text with its size and current alpha mod.
pub struct Text {
    pub width: u32,
    pub height: u32,
    pub texture: Texture,
    alpha: u8,
}

impl Text {
    #[must_use]
    pub fn render(text: &str, color: [u8; 4], scale: u32) -> Self {
        let texture = BitmapFont::render(text, color, scale);
        Self {
            width: texture.width,
            height: texture.height,
            texture,
            alpha: 255,
        }
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Destination centred horizontally on `center_x` with its top at `top`.
    #[must_use]
    pub fn placed_at(&self, center_x: i32, top: i32) -> Rect {
        Rect::new(
            center_x - self.width as i32 / 2,
            top,
            self.width as i32,
            self.height as i32,
        )
    }
}

/// One label per game state, rendered once at load time.
pub struct StateLabels {
    run: Text,
    flap: Text,
    dead: Text,
}

impl StateLabels {
    #[must_use]
    pub fn new(scale: u32) -> Self {
        let render = |state: GameState| Text::render(state.label(), LABEL_COLOR, scale);
        Self {
            run: render(GameState::Run),
            flap: render(GameState::Flap),
            dead: render(GameState::Dead),
        }
    }

    #[must_use]
    pub fn get(&self, state: GameState) -> &Text {
        match state {
            GameState::Run => &self.run,
            GameState::Flap => &self.flap,
            GameState::Dead => &self.dead,
        }
    }

    pub fn get_mut(&mut self, state: GameState) -> &mut Text {
        match state {
            GameState::Run => &mut self.run,
            GameState::Flap => &mut self.flap,
            GameState::Dead => &mut self.dead,
        }
    }
}

pub const FADE_OPAQUE: u8 = 255;
pub const FADE_STEP: u8 = 10;
/// At or below this alpha the label is hidden and the fade restarts.
pub const FADE_FLOOR: u8 = 10;

/// Fade-out of the state label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFade {
    alpha: u8,
    visible: bool,
}

impl LabelFade {
    #[must_use]
    pub fn new() -> Self {
        Self {
            alpha: FADE_OPAQUE,
            visible: true,
        }
    }

    /// Back to fully opaque and shown.
    pub fn reset(&mut self) {
        self.alpha = FADE_OPAQUE;
        self.visible = true;
    }

    /// Advances the fade by one frame.
    pub fn step(&mut self) {
        self.alpha = self.alpha.saturating_sub(FADE_STEP);
        if self.alpha <= FADE_FLOOR {
            self.alpha = FADE_OPAQUE;
            self.visible = false;
        }
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for LabelFade {
    fn default() -> Self {
        Self::new()
    }
}

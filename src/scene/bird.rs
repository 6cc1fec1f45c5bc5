use crate::core::Texture;
use crate::error::RenderError;
use crate::math::Rect;
use crate::renderer::Canvas;
use std::rc::Rc;

pub const JUMP_SPEED: i32 = 5;
pub const BIRD_WIDTH: i32 = 60;
pub const BIRD_HEIGHT: i32 = 43;
const FRAME_COUNT: usize = 3;

/// Animation frames on the sprite sheet.
const FRAMES: [Rect; FRAME_COUNT] = [
    Rect::new(0, 490, 20, 20),
    Rect::new(28, 490, 20, 20),
    Rect::new(56, 490, 20, 20),
];

pub struct Bird {
    ticks: u64,
    speed: i32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    texture: Rc<Texture>,
}

impl Bird {
    /// A bird at the left edge, vertically centred in a window of
    /// `window_height`.
    pub fn new(texture: Rc<Texture>, window_height: u32) -> Self {
        Self {
            ticks: 0,
            speed: 1,
            x: 0,
            y: window_height as i32 / 2,
            w: BIRD_WIDTH,
            h: BIRD_HEIGHT,
            texture,
        }
    }

    /// Advances the animation by one tick.
    pub fn update(&mut self) {
        self.ticks += 1;
    }

    /// Each frame is shown for two ticks.
    #[must_use]
    pub fn frame_index(&self) -> usize {
        ((self.ticks / 2) % FRAME_COUNT as u64) as usize
    }

    #[must_use]
    pub fn dst_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), RenderError> {
        let src = FRAMES[self.frame_index()];
        canvas
            .copy(&self.texture, Some(src), Some(self.dst_rect()))
            .inspect_err(|e| log::error!("Bird paint: {e}"))
    }

    /// Sets the upward speed. The speed does not feed into the position.
    pub fn jump(&mut self) {
        self.speed = -JUMP_SPEED;
    }

    pub fn apply_movement(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Releases the sprite sheet.
    pub fn destroy(self) {
        log::debug!("Bird destroyed after {} ticks", self.ticks);
    }
}

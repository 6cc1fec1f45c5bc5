mod bird;
mod pipes;

pub use bird::{Bird, BIRD_HEIGHT, BIRD_WIDTH, JUMP_SPEED};
pub use pipes::{
    Pipe, PipeField, PipeSpawner, PIPE_HEIGHT_RANGE, PIPE_MIN_HEIGHT, PIPE_START_X, PIPE_WIDTH,
};

use crate::config::GameConfig;
use crate::core::Texture;
use crate::error::RenderError;
use crate::math::Rect;
use crate::renderer::Canvas;
use std::rc::Rc;

/// Crop of the sprite sheet used as the background.
pub const BACKGROUND_SRC: Rect = Rect::new(146, 0, 145, 256);

/// Background, pipes and bird, painted in that order.
pub struct Scene {
    bird: Bird,
    pipes: PipeField,
    background: Rc<Texture>,
}

impl Scene {
    /// Loads the assets named by `config` and starts spawning pipes.
    /// Missing assets are replaced by placeholders.
    pub fn new(config: &GameConfig) -> Self {
        let sprite_sheet = Rc::new(Texture::load_or_placeholder(config.sprite_path()));
        let pipe_texture = Texture::load_or_placeholder(config.pipe_path());

        let bird = Bird::new(sprite_sheet.clone(), config.height);
        let pipes = PipeField::new(pipe_texture, config);

        Self::from_parts(sprite_sheet, bird, pipes)
    }

    pub fn from_parts(background: Rc<Texture>, bird: Bird, pipes: PipeField) -> Self {
        Self {
            bird,
            pipes,
            background,
        }
    }

    pub fn update(&mut self) {
        self.bird.update();
        self.pipes.update();
    }

    /// Clears, draws every layer and presents. Layer failures are logged and
    /// skipped; only a failed present is returned.
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), RenderError> {
        canvas.clear();

        if let Err(e) = canvas.copy(&self.background, Some(BACKGROUND_SRC), None) {
            log::error!("Painting background: {e}");
        }
        if let Err(e) = self.pipes.paint(canvas) {
            log::error!("Painting pipes: {e}");
        }
        // Bird logs its own failure
        let _ = self.bird.paint(canvas);

        canvas.present()
    }

    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    #[must_use]
    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut PipeField {
        &mut self.pipes
    }

    /// Tears down the bird, then the pipes, then the background.
    pub fn destroy(self) {
        let Self {
            bird,
            pipes,
            background,
        } = self;
        bird.destroy();
        pipes.destroy();
        drop(background);
        log::debug!("Scene destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CopyOptions, DrawCall, RecordingCanvas};

    fn scene() -> (Scene, std::sync::mpsc::Sender<Pipe>) {
        let config = GameConfig::default();
        let sheet = Rc::new(Texture::checkerboard(256, 512, 16));
        let bird = Bird::new(sheet.clone(), config.height);
        let (pipes, sender) = PipeField::detached(Texture::checkerboard(52, 320, 4), &config);
        (Scene::from_parts(sheet, bird, pipes), sender)
    }

    fn pipe() -> Pipe {
        Pipe {
            x: PIPE_START_X,
            w: PIPE_WIDTH,
            h: 150,
            inverted: false,
        }
    }

    #[test]
    fn test_update_advances_bird_and_pipes() {
        let (mut scene, sender) = scene();
        sender.send(pipe()).unwrap();

        scene.update();
        scene.update();

        assert_eq!(scene.bird().ticks(), 2);
        assert_eq!(scene.pipes().pipes()[0].x, 590);
    }

    #[test]
    fn test_paint_order() {
        let (mut scene, sender) = scene();
        sender.send(pipe()).unwrap();
        scene.update();

        let mut canvas = RecordingCanvas::new(480, 800);
        scene.paint(&mut canvas).unwrap();

        let calls = canvas.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], DrawCall::Clear);
        assert_eq!(
            calls[1],
            DrawCall::Copy {
                texture_size: (256, 512),
                src: Some(BACKGROUND_SRC),
                dst: None,
                options: CopyOptions::default(),
            }
        );
        assert!(matches!(
            calls[2],
            DrawCall::Copy {
                texture_size: (52, 320),
                ..
            }
        ));
        assert_eq!(
            canvas.copy_destinations()[2],
            Some(Rect::new(0, 400, 60, 43))
        );
        assert_eq!(calls[4], DrawCall::Present);
    }

    #[test]
    fn test_paint_continues_after_layer_failure() {
        let (mut scene, sender) = scene();
        sender.send(pipe()).unwrap();
        sender.send(pipe()).unwrap();
        scene.update();

        // Background and first pipe fail: the second pipe is skipped, the bird
        // is still drawn and the frame presented.
        let mut canvas = RecordingCanvas::new(480, 800).failing_copies(&[0, 1]);
        scene.paint(&mut canvas).unwrap();

        assert_eq!(
            canvas.calls(),
            &[
                DrawCall::Clear,
                DrawCall::Copy {
                    texture_size: (256, 512),
                    src: Some(Rect::new(0, 490, 20, 20)),
                    dst: Some(Rect::new(0, 400, 60, 43)),
                    options: CopyOptions::default(),
                },
                DrawCall::Present,
            ]
        );
    }

    #[test]
    fn test_placeholder_sheet_covers_background_crop() {
        let sheet = Texture::load_or_placeholder("no/such/FlappySprite.png");
        assert!(BACKGROUND_SRC.contained_in(&sheet.bounds()));

        let mut canvas = crate::renderer::Framebuffer::new(480, 800);
        assert!(canvas.copy(&sheet, Some(BACKGROUND_SRC), None).is_ok());
    }

    #[test]
    fn test_destroy() {
        let (scene, _sender) = scene();
        scene.destroy();
    }
}

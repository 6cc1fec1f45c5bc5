//! Game state machine and the body of one loop iteration.

use crate::config::GameConfig;
use crate::renderer::{Canvas, CopyOptions};
use crate::scene::Scene;
use crate::ui::{LabelFade, StateLabels};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Run,
    Flap,
    Dead,
}

impl GameState {
    pub const ALL: [GameState; 3] = [GameState::Run, GameState::Flap, GameState::Dead];

    /// State after a click.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            GameState::Run => GameState::Flap,
            GameState::Flap => GameState::Dead,
            GameState::Dead => GameState::Run,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            GameState::Run => "RUN",
            GameState::Flap => "FLAP",
            GameState::Dead => "DEAD",
        }
    }
}

pub struct Engine {
    state: GameState,
    fade: LabelFade,
    frame: u32,
    label_offset: i32,
    running: bool,
}

impl Engine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: GameState::Run,
            fade: LabelFade::new(),
            frame: 0,
            label_offset: config.label_offset,
            running: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn fade(&self) -> LabelFade {
        self.fade
    }

    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Left click: next state, label shown again at full opacity.
    pub fn click(&mut self) {
        self.fade.reset();
        self.state = self.state.next();
        log::debug!("State changed to {}", self.state.label());
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One loop iteration after input was drained: update, label, scene
    /// paint, then frame counter and fade.
    ///
    /// The label is drawn before `Scene::paint`, which clears the target
    /// again, so it never reaches the screen.
    pub fn run_frame<C: Canvas + ?Sized>(
        &mut self,
        scene: &mut Scene,
        labels: &mut StateLabels,
        canvas: &mut C,
    ) {
        scene.update();
        canvas.clear();

        if self.fade.is_visible() {
            let (width, height) = canvas.output_size();
            let text = labels.get_mut(self.state);
            text.set_alpha(self.fade.alpha());

            let dst = text.placed_at(width as i32 / 2, height as i32 / 2 - self.label_offset);
            let options = CopyOptions {
                alpha: text.alpha(),
                ..CopyOptions::default()
            };
            if let Err(e) = canvas.copy_ex(&text.texture, None, Some(dst), options) {
                log::error!("Painting state label: {e}");
            }
        }

        if let Err(e) = scene.paint(canvas) {
            log::error!("Presenting frame: {e}");
        }

        self.frame += 1;
        if self.frame / 2 >= 2 {
            self.frame = 0;
        }

        self.fade.step();
    }
}

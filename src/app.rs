use crate::{
    config::GameConfig,
    core::FrameClock,
    engine::Engine,
    error::GameError,
    input::InputState,
    renderer::{Framebuffer, PlatformPresenter, WindowCanvas},
    scene::Scene,
    ui::StateLabels,
};
use std::rc::Rc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

/// Sky blue shown wherever nothing was drawn.
const CLEAR_COLOR: u32 = 0x004E_C0CA;

pub struct App {
    config: GameConfig,
    window: Option<Rc<Window>>,
    canvas: Option<WindowCanvas<PlatformPresenter>>,
    scene: Option<Scene>,
    labels: Option<StateLabels>,
    engine: Engine,
    input_state: InputState,
    clock: FrameClock,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: Engine::new(&config),
            input_state: InputState::new(config.move_step),
            clock: FrameClock::new(config.frame_delay),
            window: None,
            canvas: None,
            scene: None,
            labels: None,
            config,
        }
    }

    pub fn run(config: GameConfig) -> Result<(), GameError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(config);
        let result = event_loop.run_app(&mut app);
        app.destroy();
        result.map_err(GameError::from)
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Rc<Window>, GameError> {
        let window_attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ))
            .with_resizable(false);

        Ok(Rc::new(event_loop.create_window(window_attributes)?))
    }

    fn handle_key(&mut self, physical_key: PhysicalKey, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if InputState::is_quit_key(physical_key) {
                    log::info!("Quit key pressed, exiting");
                    self.engine.quit();
                    return;
                }

                self.input_state.key_pressed(physical_key);

                // Fires again on key repeat, so held keys keep moving the bird
                let (dx, dy) = self.input_state.movement();
                if let Some(scene) = &mut self.scene {
                    if dx != 0 || dy != 0 {
                        scene.bird_mut().apply_movement(dx, dy);
                    }
                    if physical_key == PhysicalKey::Code(KeyCode::Space) {
                        scene.bird_mut().jump();
                    }
                }
            }
            ElementState::Released => self.input_state.key_released(physical_key),
        }
    }

    /// Key releases are not delivered once focus is gone.
    fn focus_lost(&mut self) {
        self.input_state.clear();
        log::debug!("Focus lost, held keys cleared");
    }

    fn redraw(&mut self) {
        if let (Some(scene), Some(labels), Some(canvas)) =
            (&mut self.scene, &mut self.labels, &mut self.canvas)
        {
            self.engine.run_frame(scene, labels, canvas);
        }
        self.clock.frame_done(Instant::now());
    }

    /// Releases everything in reverse order of acquisition.
    fn destroy(&mut self) {
        if self.labels.take().is_some() {
            log::info!("State labels released");
        }
        if self.canvas.take().is_some() {
            log::info!("Renderer released");
        }
        if self.window.take().is_some() {
            log::info!("Window closed");
        }
        if let Some(scene) = self.scene.take() {
            scene.destroy();
            log::info!("Scene released");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match self.create_window(event_loop) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{e}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created ({}x{})",
            self.config.width,
            self.config.height
        );

        match PlatformPresenter::new(window.clone()) {
            Ok(presenter) => {
                let framebuffer = Framebuffer::new(self.config.width, self.config.height)
                    .with_clear_color(CLEAR_COLOR);
                self.canvas = Some(WindowCanvas::new(framebuffer, presenter));
                log::info!("Renderer initialized successfully");
            }
            Err(e) => {
                // Nothing could ever be shown
                log::error!("{e}");
                event_loop.exit();
                return;
            }
        }

        self.scene = Some(Scene::new(&self.config));
        self.labels = Some(StateLabels::new(self.config.font_scale));
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested");
                self.engine.quit();
            }
            WindowEvent::Resized(size) => {
                if let Some(canvas) = &mut self.canvas {
                    canvas.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => self.handle_key(physical_key, state),
            WindowEvent::Focused(false) => self.focus_lost(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.engine.click(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }

        if !self.engine.is_running() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.engine.is_running() {
            event_loop.exit();
            return;
        }

        let Some(window) = &self.window else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if self.clock.request(Instant::now()) {
            window.request_redraw();
        }
        // A held back redraw leaves nothing to time, sleep until it arrives
        let control_flow = self
            .clock
            .next_wake()
            .map_or(ControlFlow::Wait, ControlFlow::WaitUntil);
        event_loop.set_control_flow(control_flow);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Texture;
    use crate::scene::{Bird, PipeField, JUMP_SPEED};

    fn app() -> App {
        let config = GameConfig::default();
        let sheet = Rc::new(Texture::checkerboard(256, 512, 16));
        let bird = Bird::new(sheet.clone(), config.height);
        let (pipes, _sender) = PipeField::detached(Texture::checkerboard(52, 320, 4), &config);

        let mut app = App::new(config);
        app.scene = Some(Scene::from_parts(sheet, bird, pipes));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(app: &mut App, code: KeyCode) {
        app.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    fn bird(app: &App) -> &Bird {
        app.scene.as_ref().unwrap().bird()
    }

    #[test]
    fn test_quit_keys_stop_the_loop() {
        for code in [KeyCode::Escape, KeyCode::BrowserBack] {
            let mut app = app();
            assert!(app.engine.is_running());

            press(&mut app, code);
            assert!(!app.engine.is_running(), "{code:?}");
        }
    }

    #[test]
    fn test_held_keys_move_on_every_press() {
        let mut app = app();

        press(&mut app, KeyCode::KeyD);
        assert_eq!(bird(&app).position(), (2, 400));

        // Key repeat for the held key
        press(&mut app, KeyCode::KeyD);
        assert_eq!(bird(&app).position(), (4, 400));

        // Both held: the axes add up
        press(&mut app, KeyCode::KeyW);
        assert_eq!(bird(&app).position(), (6, 398));

        // Opposite keys cancel
        press(&mut app, KeyCode::KeyA);
        assert_eq!(bird(&app).position(), (6, 396));
    }

    #[test]
    fn test_released_key_stops_moving() {
        let mut app = app();

        press(&mut app, KeyCode::KeyS);
        press(&mut app, KeyCode::KeyD);
        assert_eq!(bird(&app).position(), (2, 404));

        release(&mut app, KeyCode::KeyD);
        press(&mut app, KeyCode::KeyS);
        assert_eq!(bird(&app).position(), (2, 406));

        release(&mut app, KeyCode::KeyS);
        press(&mut app, KeyCode::KeyQ);
        assert_eq!(bird(&app).position(), (2, 406));
    }

    #[test]
    fn test_quit_key_does_not_move() {
        let mut app = app();

        press(&mut app, KeyCode::KeyD);
        press(&mut app, KeyCode::Escape);

        assert_eq!(bird(&app).position(), (2, 400));
        assert!(!app.input_state.is_key_pressed(PhysicalKey::Code(KeyCode::Escape)));
    }

    #[test]
    fn test_space_jumps_in_place() {
        let mut app = app();
        assert_eq!(bird(&app).speed(), 1);

        press(&mut app, KeyCode::Space);

        assert_eq!(bird(&app).speed(), -JUMP_SPEED);
        assert_eq!(bird(&app).position(), (0, 400));
        assert!(app.engine.is_running());
    }

    #[test]
    fn test_focus_loss_releases_held_keys() {
        let mut app = app();

        press(&mut app, KeyCode::KeyA);
        app.focus_lost();
        press(&mut app, KeyCode::Space);

        assert_eq!(bird(&app).position(), (-2, 400));
    }

    #[test]
    fn test_keys_before_scene_is_loaded() {
        let mut app = App::new(GameConfig::default());
        press(&mut app, KeyCode::KeyD);
        press(&mut app, KeyCode::Space);

        assert!(app.input_state.is_key_pressed(PhysicalKey::Code(KeyCode::KeyD)));
        assert!(app.engine.is_running());
    }
}

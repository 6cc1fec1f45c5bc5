use flappy::config::GameConfig;
use flappy::core::Texture;
use flappy::engine::{Engine, GameState};
use flappy::renderer::{Canvas, Framebuffer};
use flappy::scene::{Bird, Pipe, PipeField, Scene, PIPE_START_X, PIPE_WIDTH};
use flappy::ui::StateLabels;
use std::rc::Rc;
use std::time::Duration;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 520;

/// Texture big enough for every crop the scene uses, coloured per row.
fn texture(color_for_row: impl Fn(u32) -> [u8; 4]) -> Texture {
    let data: Vec<u8> = (0..HEIGHT)
        .flat_map(|y| std::iter::repeat(color_for_row(y)).take(WIDTH as usize))
        .flatten()
        .collect();
    Texture::create_from_data(&data, WIDTH, HEIGHT).unwrap()
}

/// Blue background area on top, red bird frames from row 480 down.
fn sprite_sheet() -> Texture {
    texture(|y| if y < 480 { [0, 0, 255, 255] } else { [255, 0, 0, 255] })
}

fn headless_scene(config: &GameConfig) -> (Scene, std::sync::mpsc::Sender<Pipe>) {
    let sheet = Rc::new(sprite_sheet());
    let bird = Bird::new(sheet.clone(), config.height);
    let (pipes, sender) = PipeField::detached(texture(|_| [0, 255, 0, 255]), config);
    (Scene::from_parts(sheet, bird, pipes), sender)
}

#[test]
fn test_frames_render_background_pipes_and_bird() {
    let config = GameConfig::default();
    let (mut scene, sender) = headless_scene(&config);
    let mut labels = StateLabels::new(config.font_scale);
    let mut canvas = Framebuffer::new(config.width, config.height);
    let mut engine = Engine::new(&config);

    sender
        .send(Pipe {
            x: PIPE_START_X,
            w: PIPE_WIDTH,
            h: 200,
            inverted: false,
        })
        .unwrap();

    // 40 frames bring the pipe to x = 400, inside the window
    for _ in 0..40 {
        engine.run_frame(&mut scene, &mut labels, &mut canvas);
    }

    assert_eq!(scene.pipes().pipes()[0].x, 400);
    assert_eq!(canvas.output_size(), (480, 800));

    // Pipe rises from the floor
    assert_eq!(canvas.pixel(420, 790), 0x0000_FF00);
    assert_eq!(canvas.pixel(420, 500), 0x0000_00FF);

    // Bird at the left edge, vertically centred
    assert_eq!(canvas.pixel(10, 410), 0x00FF_0000);
    assert_eq!(canvas.pixel(70, 410), 0x0000_00FF);
}

#[test]
fn test_state_label_is_overdrawn_by_scene() {
    let config = GameConfig::default();
    let (mut scene, _sender) = headless_scene(&config);
    let mut labels = StateLabels::new(config.font_scale);
    let mut canvas = Framebuffer::new(config.width, config.height);
    let mut engine = Engine::new(&config);

    engine.run_frame(&mut scene, &mut labels, &mut canvas);

    // The label area only shows the background
    for x in 201..279 {
        for y in 208..232 {
            assert_eq!(canvas.pixel(x, y), 0x0000_00FF);
        }
    }
}

#[test]
fn test_clicks_and_fade_over_many_frames() {
    let config = GameConfig::default();
    let (mut scene, _sender) = headless_scene(&config);
    let mut labels = StateLabels::new(config.font_scale);
    let mut canvas = Framebuffer::new(config.width, config.height);
    let mut engine = Engine::new(&config);

    for (clicks, state) in [
        (1, GameState::Flap),
        (2, GameState::Dead),
        (3, GameState::Run),
    ] {
        engine.click();
        for _ in 0..10 {
            engine.run_frame(&mut scene, &mut labels, &mut canvas);
        }
        assert_eq!(engine.state(), state, "after {clicks} clicks");
        assert_eq!(engine.fade().alpha(), 155);
        assert!(engine.fade().is_visible());
    }
}

#[test]
fn test_scene_with_missing_assets_keeps_running() {
    let config = GameConfig {
        asset_dir: "no/such/assets".into(),
        spawn_interval: Duration::from_millis(5),
        ..GameConfig::default()
    };
    let mut scene = Scene::new(&config);
    let mut labels = StateLabels::new(config.font_scale);
    let mut canvas = Framebuffer::new(config.width, config.height);
    let mut engine = Engine::new(&config);

    for _ in 0..20 {
        engine.run_frame(&mut scene, &mut labels, &mut canvas);
        std::thread::sleep(Duration::from_millis(1));
    }

    // Placeholder background is stretched over the window, pipes are still
    // to the right of it
    let row: Vec<u32> = (0..config.width).map(|x| canvas.pixel(x, 100)).collect();
    assert!(row.contains(&0x00FF_00FF));
    assert!(row.contains(&0x0000_0000));

    let spawned = scene.pipes_mut().stop_spawning().unwrap();
    scene.pipes_mut().collect_spawned();
    assert!(spawned >= 1);
    assert_eq!(scene.pipes().total_spawned(), spawned);
    assert_eq!(scene.bird().ticks(), 20);

    scene.destroy();
}

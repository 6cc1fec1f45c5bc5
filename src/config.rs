use std::path::PathBuf;
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Flappy";
pub const WINDOW_WIDTH: u32 = 480;
pub const WINDOW_HEIGHT: u32 = 800;

/// Runtime knobs for the game. `Default` carries the stock values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Delay between two frames of the game loop.
    pub frame_delay: Duration,
    /// Interval between two pipe spawns.
    pub spawn_interval: Duration,
    /// Pixels every pipe moves left per update.
    pub pipe_step: i32,
    /// Pixels the bird moves per held movement key per key event.
    pub move_step: i32,
    /// Distance of the state label above the window centre.
    pub label_offset: i32,
    /// Integer scale of the 8x8 bitmap font used for labels.
    pub font_scale: u32,
    /// Drop pipes once they have scrolled past the left edge.
    pub evict_offscreen: bool,
    pub asset_dir: PathBuf,
}

impl GameConfig {
    /// Defaults, with `FLAPPY_ASSETS` overriding the asset directory and
    /// `FLAPPY_KEEP_PIPES=1` turning off-screen eviction off.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("FLAPPY_ASSETS") {
            config.asset_dir = PathBuf::from(dir);
        }
        if std::env::var("FLAPPY_KEEP_PIPES").is_ok_and(|v| v == "1") {
            config.evict_offscreen = false;
        }
        config
    }

    #[must_use]
    pub fn sprite_path(&self) -> PathBuf {
        self.asset_dir.join("imgs").join("FlappySprite.png")
    }

    #[must_use]
    pub fn pipe_path(&self) -> PathBuf {
        self.asset_dir.join("imgs").join("pipe.png")
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            frame_delay: Duration::from_millis(50),
            spawn_interval: Duration::from_secs(1),
            pipe_step: 5,
            move_step: 2,
            // 1.5 sprite heights of 128 px
            label_offset: 192,
            // 24 pt over an 8 px glyph
            font_scale: 3,
            evict_offscreen: true,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 480);
        assert_eq!(config.height, 800);
        assert_eq!(config.frame_delay, Duration::from_millis(50));
        assert_eq!(config.spawn_interval, Duration::from_secs(1));
        assert!(config.evict_offscreen);
    }

    #[test]
    fn test_asset_paths() {
        let config = GameConfig {
            asset_dir: PathBuf::from("/tmp/flappy"),
            ..GameConfig::default()
        };
        assert_eq!(
            config.sprite_path(),
            PathBuf::from("/tmp/flappy/imgs/FlappySprite.png")
        );
        assert_eq!(config.pipe_path(), PathBuf::from("/tmp/flappy/imgs/pipe.png"));
    }
}

use std::path::PathBuf;

/// Failure of a single draw or present call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture has no pixels ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },
    #[error("source rect {x},{y} {w}x{h} lies outside the {tex_width}x{tex_height} texture")]
    SourceOutOfBounds {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        tex_width: u32,
        tex_height: u32,
    },
    #[error("present failed: {0}")]
    Present(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid texture data: expected {expected} bytes, got {actual}")]
    TextureData { expected: usize, actual: usize },
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("could not create renderer: {0}")]
    Renderer(String),
}

//! Drawing surface used by the scene and the engine.
//!
//! Everything is rasterised in software into a [`Framebuffer`]; a platform
//! [`Presenter`] then puts the finished frame on screen.

mod framebuffer;
mod recording;

#[cfg(target_os = "macos")]
mod metal;
#[cfg(not(target_os = "macos"))]
mod soft;

pub use framebuffer::Framebuffer;
pub use recording::{DrawCall, RecordingCanvas};

#[cfg(target_os = "macos")]
pub use metal::MetalPresenter as PlatformPresenter;
#[cfg(not(target_os = "macos"))]
pub use soft::SoftbufferPresenter as PlatformPresenter;

use crate::core::Texture;
use crate::error::RenderError;
use crate::math::{Flip, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub flip: Flip,
    /// Multiplied into every texel's alpha.
    pub alpha: u8,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            flip: Flip::None,
            alpha: 255,
        }
    }
}

pub trait Canvas {
    fn clear(&mut self);

    fn copy_ex(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    ) -> Result<(), RenderError>;

    fn copy(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<(), RenderError> {
        self.copy_ex(texture, src, dst, CopyOptions::default())
    }

    fn present(&mut self) -> Result<(), RenderError>;

    fn output_size(&self) -> (u32, u32);
}

/// Puts a finished framebuffer on screen.
pub trait Presenter {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), RenderError>;

    fn resize(&mut self, width: u32, height: u32);
}

/// Canvas drawing into a framebuffer and presenting through `P`.
pub struct WindowCanvas<P> {
    framebuffer: Framebuffer,
    presenter: P,
}

impl<P: Presenter> WindowCanvas<P> {
    pub fn new(framebuffer: Framebuffer, presenter: P) -> Self {
        Self {
            framebuffer,
            presenter,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.presenter.resize(width, height);
    }
}

impl<P: Presenter> Canvas for WindowCanvas<P> {
    fn clear(&mut self) {
        self.framebuffer.fill();
    }

    fn copy_ex(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    ) -> Result<(), RenderError> {
        self.framebuffer.blit(texture, src, dst, options)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.presenter.present(&self.framebuffer)
    }

    fn output_size(&self) -> (u32, u32) {
        (self.framebuffer.width(), self.framebuffer.height())
    }
}

use super::{Framebuffer, Presenter};
use crate::error::{GameError, RenderError};
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::window::Window;

/// Blits the framebuffer into a `softbuffer` surface, scaled to the window
/// with its aspect ratio preserved.
pub struct SoftbufferPresenter {
    window: Rc<Window>,
    _context: softbuffer::Context<Rc<Window>>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    size: Option<(NonZeroU32, NonZeroU32)>,
}

impl SoftbufferPresenter {
    pub fn new(window: Rc<Window>) -> Result<Self, GameError> {
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| GameError::Renderer(format!("softbuffer context: {e}")))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| GameError::Renderer(format!("softbuffer surface: {e}")))?;

        let mut presenter = Self {
            window,
            _context: context,
            surface,
            size: None,
        };
        let size = presenter.window.inner_size();
        presenter.resize(size.width, size.height);

        Ok(presenter)
    }
}

impl Presenter for SoftbufferPresenter {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), RenderError> {
        let Some((width, height)) = self.size else {
            // Minimised: nothing to draw into.
            return Ok(());
        };

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| RenderError::Present(e.to_string()))?;

        frame.scale_into(&mut buffer, width.get() as usize, height.get() as usize);

        buffer
            .present()
            .map_err(|e| RenderError::Present(e.to_string()))
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            self.size = None;
            return;
        };

        match self.surface.resize(w, h) {
            Ok(()) => self.size = Some((w, h)),
            Err(e) => {
                log::error!("Failed to resize surface to {width}x{height}: {e}");
                self.size = None;
            }
        }
    }
}

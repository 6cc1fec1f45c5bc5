use super::{Canvas, CopyOptions};
use crate::core::Texture;
use crate::error::RenderError;
use crate::math::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Copy {
        texture_size: (u32, u32),
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    },
    Present,
}

/// Canvas that records calls instead of drawing them. Lets the paint order
/// of the scene be inspected without a window.
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
    size: (u32, u32),
    fail_copies: Vec<usize>,
    copies: usize,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            calls: Vec::new(),
            size: (width, height),
            fail_copies: Vec::new(),
            copies: 0,
        }
    }

    /// Makes the copy calls with the given zero-based indices fail.
    #[must_use]
    pub fn failing_copies(mut self, indices: &[usize]) -> Self {
        self.fail_copies = indices.to_vec();
        self
    }

    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Destination rects of all recorded copies, in order.
    #[must_use]
    pub fn copy_destinations(&self) -> Vec<Option<Rect>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Copy { dst, .. } => Some(*dst),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn copy_ex(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Option<Rect>,
        options: CopyOptions,
    ) -> Result<(), RenderError> {
        let index = self.copies;
        self.copies += 1;

        if self.fail_copies.contains(&index) {
            return Err(RenderError::EmptyTexture {
                width: texture.width,
                height: texture.height,
            });
        }

        self.calls.push(DrawCall::Copy {
            texture_size: (texture.width, texture.height),
            src,
            dst,
            options,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }

    fn output_size(&self) -> (u32, u32) {
        self.size
    }
}

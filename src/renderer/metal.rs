use super::{Framebuffer, Presenter};
use crate::error::{GameError, RenderError};
use objc2::msg_send;
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_core_foundation::CGSize;
use objc2_foundation::NSString;
use objc2_metal::{
    MTLClearColor, MTLCommandBuffer, MTLCommandEncoder, MTLCommandQueue, MTLCompileOptions,
    MTLCreateSystemDefaultDevice, MTLDevice, MTLDrawable, MTLLibrary, MTLLoadAction,
    MTLPixelFormat, MTLPrimitiveType, MTLRenderCommandEncoder, MTLRenderPassDescriptor,
    MTLRenderPipelineDescriptor, MTLRenderPipelineState, MTLSamplerDescriptor,
    MTLSamplerMinMagFilter, MTLSamplerState, MTLStoreAction, MTLTexture, MTLTextureDescriptor,
    MTLTextureUsage,
};
use objc2_quartz_core::{CAMetalDrawable, CAMetalLayer};
use std::rc::Rc;
use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::Window;

/// Uploads the framebuffer into a Metal texture each frame and draws it over
/// the whole drawable with a single triangle.
pub struct MetalPresenter {
    _window: Rc<Window>,
    device: Retained<ProtocolObject<dyn MTLDevice>>,
    command_queue: Retained<ProtocolObject<dyn MTLCommandQueue>>,
    layer: Retained<CAMetalLayer>,
    pipeline_state: Retained<ProtocolObject<dyn MTLRenderPipelineState>>,
    sampler_state: Retained<ProtocolObject<dyn MTLSamplerState>>,
    frame_texture: Option<(Retained<ProtocolObject<dyn MTLTexture>>, u32, u32)>,
}

impl MetalPresenter {
    pub fn new(window: Rc<Window>) -> Result<Self, GameError> {
        let device = MTLCreateSystemDefaultDevice()
            .ok_or_else(|| GameError::Renderer("Failed to get default Metal device".to_string()))?;

        let command_queue = device
            .newCommandQueue()
            .ok_or_else(|| GameError::Renderer("Failed to create command queue".to_string()))?;

        let handle = window
            .window_handle()
            .map_err(|e| GameError::Renderer(format!("Failed to get window handle: {e}")))?;
        let layer =
            Self::create_metal_layer(&device, handle.as_raw()).map_err(GameError::Renderer)?;

        let pipeline_state = Self::create_pipeline_state(&device).map_err(GameError::Renderer)?;
        let sampler_state = Self::create_sampler_state(&device).map_err(GameError::Renderer)?;

        let mut presenter = Self {
            _window: window.clone(),
            device,
            command_queue,
            layer,
            pipeline_state,
            sampler_state,
            frame_texture: None,
        };
        let size = window.inner_size();
        presenter.resize(size.width, size.height);

        Ok(presenter)
    }

    fn create_metal_layer(
        device: &ProtocolObject<dyn MTLDevice>,
        window_handle: RawWindowHandle,
    ) -> Result<Retained<CAMetalLayer>, String> {
        let layer = unsafe { CAMetalLayer::new() };

        unsafe {
            layer.setDevice(Some(device));
            layer.setPixelFormat(MTLPixelFormat::BGRA8Unorm);
            layer.setOpaque(true);
        }

        match window_handle {
            RawWindowHandle::AppKit(handle) => unsafe {
                use objc2::runtime::AnyObject;

                let view = handle.ns_view.as_ptr().cast::<AnyObject>();
                let _: () = msg_send![view, setWantsLayer: true];
                let _: () = msg_send![view, setLayer: &*layer];
            },
            _ => return Err("Unsupported window handle type".to_string()),
        }

        Ok(layer)
    }

    fn create_pipeline_state(
        device: &ProtocolObject<dyn MTLDevice>,
    ) -> Result<Retained<ProtocolObject<dyn MTLRenderPipelineState>>, String> {
        let shader_source = NSString::from_str(include_str!("../shaders/present.metal"));
        let compile_options = MTLCompileOptions::new();

        let library = device
            .newLibraryWithSource_options_error(&shader_source, Some(&compile_options))
            .map_err(|e| format!("Failed to compile present shaders: {e:?}"))?;

        let vertex_function = library
            .newFunctionWithName(&NSString::from_str("present_vertex"))
            .ok_or_else(|| "Failed to find present vertex function".to_string())?;

        let fragment_function = library
            .newFunctionWithName(&NSString::from_str("present_fragment"))
            .ok_or_else(|| "Failed to find present fragment function".to_string())?;

        let pipeline_descriptor = MTLRenderPipelineDescriptor::new();
        pipeline_descriptor.setVertexFunction(Some(&vertex_function));
        pipeline_descriptor.setFragmentFunction(Some(&fragment_function));

        unsafe {
            let color_attachment = pipeline_descriptor
                .colorAttachments()
                .objectAtIndexedSubscript(0);
            color_attachment.setPixelFormat(MTLPixelFormat::BGRA8Unorm);
        }

        device
            .newRenderPipelineStateWithDescriptor_error(&pipeline_descriptor)
            .map_err(|e| format!("Failed to create present pipeline state: {e:?}"))
    }

    fn create_sampler_state(
        device: &ProtocolObject<dyn MTLDevice>,
    ) -> Result<Retained<ProtocolObject<dyn MTLSamplerState>>, String> {
        let descriptor = MTLSamplerDescriptor::new();
        // Pixel art: keep texels sharp
        descriptor.setMinFilter(MTLSamplerMinMagFilter::Nearest);
        descriptor.setMagFilter(MTLSamplerMinMagFilter::Nearest);

        device
            .newSamplerStateWithDescriptor(&descriptor)
            .ok_or_else(|| "Failed to create sampler state".to_string())
    }

    /// Returns the texture backing the framebuffer, recreating it when the
    /// framebuffer size changed.
    fn frame_texture(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Retained<ProtocolObject<dyn MTLTexture>>, RenderError> {
        if let Some((texture, w, h)) = &self.frame_texture {
            if *w == width && *h == height {
                return Ok(texture.clone());
            }
        }

        let descriptor = unsafe { MTLTextureDescriptor::new() };
        unsafe {
            // 0x00RRGGBB little endian is B, G, R, X in memory
            descriptor.setPixelFormat(MTLPixelFormat::BGRA8Unorm);
            descriptor.setWidth(width as usize);
            descriptor.setHeight(height as usize);
            descriptor.setUsage(MTLTextureUsage::ShaderRead);
        }

        let texture = self
            .device
            .newTextureWithDescriptor(&descriptor)
            .ok_or_else(|| RenderError::Present("Failed to create frame texture".to_string()))?;

        self.frame_texture = Some((texture.clone(), width, height));
        Ok(texture)
    }

    fn upload(
        texture: &ProtocolObject<dyn MTLTexture>,
        frame: &Framebuffer,
    ) -> Result<(), RenderError> {
        let region = objc2_metal::MTLRegion {
            origin: objc2_metal::MTLOrigin { x: 0, y: 0, z: 0 },
            size: objc2_metal::MTLSize {
                width: frame.width() as usize,
                height: frame.height() as usize,
                depth: 1,
            },
        };
        let bytes_per_row = frame.width() as usize * std::mem::size_of::<u32>();

        // Safety: the framebuffer holds width * height pixels for the whole
        // call and Metal copies them into the texture before returning.
        unsafe {
            let data_ptr = std::ptr::NonNull::new(frame.pixels().as_ptr().cast_mut().cast())
                .ok_or_else(|| RenderError::Present("Framebuffer has no pixels".to_string()))?;

            texture.replaceRegion_mipmapLevel_withBytes_bytesPerRow(
                region,
                0,
                data_ptr,
                bytes_per_row,
            );
        }

        Ok(())
    }
}

impl Presenter for MetalPresenter {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), RenderError> {
        let texture = self.frame_texture(frame.width(), frame.height())?;
        Self::upload(&texture, frame)?;

        let drawable = unsafe { self.layer.nextDrawable() }
            .ok_or_else(|| RenderError::Present("Failed to get next drawable".to_string()))?;

        let command_buffer = self
            .command_queue
            .commandBuffer()
            .ok_or_else(|| RenderError::Present("Failed to create command buffer".to_string()))?;

        let label = NSString::from_str("Present Pass");
        command_buffer.setLabel(Some(&label));

        let render_pass_descriptor = unsafe { MTLRenderPassDescriptor::new() };
        let color_attachment = unsafe {
            render_pass_descriptor
                .colorAttachments()
                .objectAtIndexedSubscript(0)
        };

        unsafe {
            color_attachment.setTexture(Some(&drawable.texture()));
            color_attachment.setLoadAction(MTLLoadAction::Clear);
            color_attachment.setClearColor(MTLClearColor {
                red: 0.0,
                green: 0.0,
                blue: 0.0,
                alpha: 1.0,
            });
            color_attachment.setStoreAction(MTLStoreAction::Store);
        }

        if let Some(render_encoder) =
            command_buffer.renderCommandEncoderWithDescriptor(&render_pass_descriptor)
        {
            let label = NSString::from_str("Framebuffer Blit");
            render_encoder.setLabel(Some(&label));
            render_encoder.setRenderPipelineState(&self.pipeline_state);

            unsafe {
                render_encoder.setFragmentTexture_atIndex(Some(&texture), 0);
                render_encoder.setFragmentSamplerState_atIndex(Some(&self.sampler_state), 0);
                render_encoder.drawPrimitives_vertexStart_vertexCount(
                    MTLPrimitiveType::Triangle,
                    0,
                    3,
                );
            }

            render_encoder.endEncoding();
        }

        // Safety: CAMetalDrawable conforms to MTLDrawable.
        unsafe {
            let mtl_drawable = (&raw const *drawable).cast::<ProtocolObject<dyn MTLDrawable>>();
            command_buffer.presentDrawable(&*mtl_drawable);
        }

        command_buffer.commit();

        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let size = CGSize {
            width: f64::from(width),
            height: f64::from(height),
        };
        unsafe {
            self.layer.setDrawableSize(size);
        }
    }
}

//! OpenGL halftone renderer
//!
//! Runs the halftone fragment program over a single full-surface quad and
//! draws straight into the window's default framebuffer. The surface is
//! centered in the window with the viewport; the rest stays black.

use halftone_core::fit::letterbox_offset;
use halftone_core::logging::{log, LogCategory, LogLevel};
use halftone_core::types::Frame;
use halftone_core::{HalftoneError, HalftoneRenderer, RenderResult, UniformSink, UniformValue};

use glow::HasContext;

pub struct OpenGLProcessor {
    gl: glow::Context,
    program: glow::Program,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    texture: glow::Texture,
    width: u32,
    height: u32,
    window: Option<(u32, u32)>,
}

impl OpenGLProcessor {
    /// Build the halftone program and quad on the current context. Fails
    /// if either shader does not compile or the program does not link.
    pub fn new(gl: glow::Context) -> RenderResult<Self> {
        unsafe {
            let vertex_shader = compile_shader(
                &gl,
                glow::VERTEX_SHADER,
                include_str!("../shaders/vertex.glsl"),
            )?;

            let fragment_shader = compile_shader(
                &gl,
                glow::FRAGMENT_SHADER,
                include_str!("../shaders/fragment_halftone.glsl"),
            )?;

            let program = gl.create_program().map_err(HalftoneError::Render)?;
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);

            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            if !gl.get_program_link_status(program) {
                let info = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(HalftoneError::render(format!(
                    "failed to link halftone program: {}",
                    info
                )));
            }

            let vao = gl.create_vertex_array().map_err(HalftoneError::Render)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(HalftoneError::Render)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

            // Two triangles covering clip space; uv comes from the vertex shader
            #[rustfmt::skip]
            let vertices: [f32; 12] = [
                -1.0, -1.0,
                 1.0, -1.0,
                -1.0,  1.0,
                -1.0,  1.0,
                 1.0, -1.0,
                 1.0,  1.0,
            ];

            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(
                0,
                2,
                glow::FLOAT,
                false,
                2 * std::mem::size_of::<f32>() as i32,
                0,
            );
            gl.enable_vertex_attrib_array(0);

            let texture = gl.create_texture().map_err(HalftoneError::Render)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );

            log(LogCategory::Render, LogLevel::Info, || {
                format!("OpenGL {}", gl.get_parameter_string(glow::VERSION))
            });

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                texture,
                width: 0,
                height: 0,
                window: None,
            })
        }
    }

    fn viewport(&self) -> (i32, i32) {
        let window = self.window.unwrap_or((self.width, self.height));
        let (x, y) = letterbox_offset(window, (self.width, self.height));
        (x as i32, y as i32)
    }
}

/// Converts 0xAARRGGBB pixels to the RGBA byte order GL expects.
pub fn argb_to_rgba(pixels: &[u32]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for pixel in pixels {
        rgba.push(((pixel >> 16) & 0xFF) as u8);
        rgba.push(((pixel >> 8) & 0xFF) as u8);
        rgba.push((pixel & 0xFF) as u8);
        rgba.push(((pixel >> 24) & 0xFF) as u8);
    }
    rgba
}

impl UniformSink for OpenGLProcessor {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        unsafe {
            self.gl.use_program(Some(self.program));
            // Unknown or optimized-out uniforms have no location
            let Some(loc) = self.gl.get_uniform_location(self.program, name) else {
                return;
            };
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(Some(&loc), v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(Some(&loc), x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(Some(&loc), x, y, z),
            }
        }
    }
}

impl HalftoneRenderer for OpenGLProcessor {
    fn init(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        unsafe {
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            self.gl.use_program(Some(self.program));
            if let Some(loc) = self.gl.get_uniform_location(self.program, "uTexture") {
                self.gl.uniform_1_i32(Some(&loc), 0);
            }
        }
        Ok(())
    }

    fn upload_frame(&mut self, frame: &Frame) -> RenderResult<()> {
        if frame.is_empty() {
            return Ok(());
        }
        frame.validate()?;
        let rgba = argb_to_rgba(&frame.pixels);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                frame.width as i32,
                frame.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&rgba),
            );
        }
        Ok(())
    }

    fn uniforms(&mut self) -> &mut dyn UniformSink {
        self
    }

    fn draw(&mut self) -> RenderResult<()> {
        let (window_w, window_h) = self.window.unwrap_or((self.width, self.height));
        let (x, y) = self.viewport();
        unsafe {
            self.gl.viewport(0, 0, window_w as i32, window_h as i32);
            self.gl.clear(glow::COLOR_BUFFER_BIT);

            self.gl
                .viewport(x, y, self.width as i32, self.height as i32);
            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.gl.use_program(Some(self.program));
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, 6);

            let err = self.gl.get_error();
            if err != glow::NO_ERROR {
                return Err(HalftoneError::render(format!("GL error 0x{:04X}", err)));
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window = Some((width, height));
    }

    fn name(&self) -> &str {
        "OpenGL Renderer"
    }

    fn is_hardware_accelerated(&self) -> bool {
        true
    }
}

impl Drop for OpenGLProcessor {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_texture(self.texture);
        }
    }
}

unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> RenderResult<glow::Shader> {
    let shader = gl.create_shader(shader_type).map_err(HalftoneError::Render)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let info = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(HalftoneError::render(format!(
            "failed to compile shader: {}",
            info
        )));
    }

    Ok(shader)
}

//! SDL2 window backend supporting both software and OpenGL rendering

use super::{Key, WindowBackend};
use halftone_core::fit::letterbox_offset;
use halftone_core::logging::{log, LogCategory, LogLevel};
use halftone_core::{HalftoneRenderer, SoftwareRenderer};
use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::{EventPump, Sdl, VideoSubsystem};
use std::collections::HashSet;
use std::error::Error;

pub enum RenderMode {
    Software {
        canvas: Canvas<Window>,
    },
    #[cfg(feature = "opengl")]
    OpenGL {
        window: Window,
        _gl_context: sdl2::video::GLContext,
    },
}

pub struct Sdl2Backend {
    _sdl_context: Sdl,
    #[cfg_attr(not(feature = "opengl"), allow(dead_code))]
    video_subsystem: VideoSubsystem,
    render_mode: RenderMode,
    event_pump: EventPump,
    pressed_keys: HashSet<Key>,
    /// Presses since the last poll, in arrival order
    key_presses: Vec<Key>,
    is_open: bool,
}

impl Sdl2Backend {
    /// Open a resizable window. `use_opengl` asks for a GL 3.3 core context;
    /// builds without the `opengl` feature fall back to the software canvas.
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        use_opengl: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let render_mode = if use_opengl {
            Self::open_gl_window(&video_subsystem, title, width, height)?
        } else {
            let window = video_subsystem
                .window(title, width, height)
                .resizable()
                .build()?;
            let canvas = window.into_canvas().present_vsync().build()?;
            RenderMode::Software { canvas }
        };

        let event_pump = sdl_context.event_pump()?;

        Ok(Self {
            _sdl_context: sdl_context,
            video_subsystem,
            render_mode,
            event_pump,
            pressed_keys: HashSet::new(),
            key_presses: Vec::new(),
            is_open: true,
        })
    }

    #[cfg(feature = "opengl")]
    fn open_gl_window(
        video_subsystem: &VideoSubsystem,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<RenderMode, Box<dyn Error>> {
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        if needs_forward_compatible() {
            // macOS only hands out 3.2+ core contexts with this flag
            gl_attr.set_context_flags().forward_compatible().set();
        }

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()?;

        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;
        // vsync paces the frame loop
        if let Err(e) = video_subsystem.gl_set_swap_interval(1) {
            log(LogCategory::Render, LogLevel::Warn, || {
                format!("vsync unavailable: {}", e)
            });
        }

        Ok(RenderMode::OpenGL {
            window,
            _gl_context: gl_context,
        })
    }

    #[cfg(not(feature = "opengl"))]
    fn open_gl_window(
        video_subsystem: &VideoSubsystem,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<RenderMode, Box<dyn Error>> {
        log(LogCategory::Render, LogLevel::Warn, || {
            "built without the opengl feature, using software rendering".to_string()
        });
        let window = video_subsystem
            .window(title, width, height)
            .resizable()
            .build()?;
        let canvas = window.into_canvas().present_vsync().build()?;
        Ok(RenderMode::Software { canvas })
    }

    /// The halftone renderer matching this window: the GL processor on a GL
    /// context, the CPU renderer on a software canvas.
    pub fn create_renderer(&self) -> Result<Box<dyn HalftoneRenderer>, Box<dyn Error>> {
        match &self.render_mode {
            RenderMode::Software { .. } => Ok(Box::new(SoftwareRenderer::new())),
            #[cfg(feature = "opengl")]
            RenderMode::OpenGL { .. } => {
                // Load GL functions
                let gl = unsafe {
                    glow::Context::from_loader_function(|s| {
                        self.video_subsystem.gl_get_proc_address(s) as *const _
                    })
                };
                let processor = crate::video_processor::OpenGLProcessor::new(gl)?;
                Ok(Box::new(processor))
            }
        }
    }

    pub fn is_opengl(&self) -> bool {
        !matches!(self.render_mode, RenderMode::Software { .. })
    }

    /// Convert SDL2 Keycode to our unified Key
    fn from_sdl2_key(k: Keycode) -> Option<Key> {
        match k {
            Keycode::F1 => Some(Key::F1),
            Keycode::Up => Some(Key::Up),
            Keycode::Down => Some(Key::Down),
            Keycode::Left => Some(Key::Left),
            Keycode::Right => Some(Key::Right),
            Keycode::Escape => Some(Key::Escape),
            Keycode::Return => Some(Key::Enter),
            Keycode::Space => Some(Key::Space),
            Keycode::Tab => Some(Key::Tab),
            Keycode::LShift => Some(Key::LeftShift),
            Keycode::RShift => Some(Key::RightShift),
            Keycode::LeftBracket => Some(Key::LeftBracket),
            Keycode::RightBracket => Some(Key::RightBracket),
            _ => None,
        }
    }

    /// Physical-position fallback for layouts where the brackets live
    /// elsewhere
    fn from_sdl2_scancode(s: Scancode) -> Option<Key> {
        match s {
            Scancode::LeftBracket => Some(Key::LeftBracket),
            Scancode::RightBracket => Some(Key::RightBracket),
            _ => None,
        }
    }
}

/// Whether a core profile context must be requested forward compatible.
#[cfg_attr(not(feature = "opengl"), allow(dead_code))]
pub fn needs_forward_compatible() -> bool {
    cfg!(target_os = "macos")
}

impl WindowBackend for Sdl2Backend {
    fn is_open(&self) -> bool {
        self.is_open
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn keys_pressed(&self) -> &[Key] {
        &self.key_presses
    }

    fn present(&mut self, renderer: &dyn HalftoneRenderer) -> Result<(), Box<dyn Error>> {
        match &mut self.render_mode {
            #[cfg(feature = "opengl")]
            RenderMode::OpenGL { window, .. } => {
                // The processor already drew into the back buffer
                window.gl_swap_window();
            }
            RenderMode::Software { canvas } => {
                canvas.set_draw_color(Color::RGB(0, 0, 0));
                canvas.clear();

                if let Some(frame) = renderer.output().filter(|f| !f.is_empty()) {
                    let texture_creator = canvas.texture_creator();
                    let mut texture = texture_creator.create_texture_streaming(
                        PixelFormatEnum::ARGB8888,
                        frame.width,
                        frame.height,
                    )?;
                    texture.update(
                        None,
                        bytemuck::cast_slice(&frame.pixels),
                        frame.width as usize * 4,
                    )?;

                    let window_size = canvas.output_size()?;
                    let (x, y) = letterbox_offset(window_size, (frame.width, frame.height));
                    canvas.copy(
                        &texture,
                        None,
                        Rect::new(x as i32, y as i32, frame.width, frame.height),
                    )?;
                }
                canvas.present();
            }
        }

        Ok(())
    }

    fn get_size(&self) -> (u32, u32) {
        match &self.render_mode {
            #[cfg(feature = "opengl")]
            RenderMode::OpenGL { window, .. } => window.drawable_size(),
            RenderMode::Software { canvas } => canvas
                .output_size()
                .unwrap_or_else(|_| canvas.window().size()),
        }
    }

    fn poll_events(&mut self) {
        self.key_presses.clear();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    self.is_open = false;
                }
                Event::KeyDown {
                    keycode,
                    scancode,
                    repeat,
                    ..
                } => {
                    // Try keycode first, fall back to scancode for international keyboards
                    let key = keycode
                        .and_then(Self::from_sdl2_key)
                        .or_else(|| scancode.and_then(Self::from_sdl2_scancode));

                    if let Some(key) = key {
                        self.pressed_keys.insert(key);
                        if !repeat {
                            self.key_presses.push(key);
                        }
                    }
                }
                Event::KeyUp {
                    keycode, scancode, ..
                } => {
                    let key = keycode
                        .and_then(Self::from_sdl2_key)
                        .or_else(|| scancode.and_then(Self::from_sdl2_scancode));

                    if let Some(key) = key {
                        self.pressed_keys.remove(&key);
                    }
                }
                _ => {}
            }
        }
    }

    fn set_title(&mut self, title: &str) -> Result<(), Box<dyn Error>> {
        match &mut self.render_mode {
            #[cfg(feature = "opengl")]
            RenderMode::OpenGL { window, .. } => {
                window.set_title(title)?;
            }
            RenderMode::Software { canvas } => {
                canvas.window_mut().set_title(title)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match &self.render_mode {
            #[cfg(feature = "opengl")]
            RenderMode::OpenGL { .. } => "SDL2 (OpenGL)",
            RenderMode::Software { .. } => "SDL2 (Software)",
        }
    }
}

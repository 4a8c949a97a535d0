//! Desktop stand-in for the OLED panel

use super::{DisplayDriver, Framebuffer};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

/// Pixel colors of a white-on-black SSD1306
const ON_COLOR: (u8, u8, u8) = (230, 240, 255);
const OFF_COLOR: (u8, u8, u8) = (0, 0, 0);

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
}

/// SDL window showing the framebuffer scaled by an integer factor
pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    // Declared before the creator so it is dropped first
    texture: Texture<'static>,
    _texture_creator: &'static TextureCreator<WindowContext>,
    scratch: Vec<u8>,
    width: u32,
    height: u32,
}

impl Display {
    /// Open a window for a `width` x `height` panel, each panel pixel drawn
    /// as a `scale` x `scale` block
    pub fn new(title: &str, width: u32, height: u32, scale: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width * scale.max(1), height * scale.max(1))
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;

        // The creator lives as long as the process, like the panel
        let texture_creator: &'static TextureCreator<WindowContext> =
            Box::leak(Box::new(canvas.texture_creator()));
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        let event_pump = sdl_context.event_pump()?;

        log::info!("simulator window open: {}x{} panel at {}x", width, height, scale);

        Ok(Self {
            canvas,
            event_pump,
            texture,
            _texture_creator: texture_creator,
            scratch: Vec::with_capacity((width * height * 4) as usize),
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::KeyUp {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyUp(k)),
                _ => {},
            }
        }

        events
    }
}

impl DisplayDriver for Display {
    fn flush(&mut self, buffer: &Framebuffer) -> Result<(), String> {
        if buffer.width() != self.width || buffer.height() != self.height {
            return Err(format!(
                "framebuffer is {}x{}, panel is {}x{}",
                buffer.width(),
                buffer.height(),
                self.width,
                self.height
            ));
        }
        buffer.to_rgba(ON_COLOR, OFF_COLOR, &mut self.scratch);
        self.texture
            .update(None, &self.scratch, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&self.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

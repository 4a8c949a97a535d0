mod font;
mod framebuffer;
#[cfg(feature = "simulator")]
mod sdl;

pub use font::{
    draw_char, draw_number, draw_text, glyph_index, text_width, CHAR_HEIGHT, CHAR_MAP, CHAR_WIDTH,
};
pub use framebuffer::Framebuffer;
#[cfg(feature = "simulator")]
pub use sdl::{Display, InputEvent};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const DEFAULT_WIDTH: u32 = SCREEN_WIDTH;
pub const DEFAULT_HEIGHT: u32 = SCREEN_HEIGHT;

/// Transfer side of the panel.
///
/// The renderer only promises that `Framebuffer::as_bytes` is in the
/// controller's page layout; transport (I2C, SPI, a desktop window) and
/// command sequencing belong to the driver.
pub trait DisplayDriver {
    /// Push the whole framebuffer to the panel
    fn flush(&mut self, buffer: &Framebuffer) -> Result<(), String>;
}

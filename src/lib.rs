//! 1-bit raycaster rendering backend for small monochrome OLED panels.
//!
//! Everything draws into a packed page-layout [`display::Framebuffer`]
//! through a single [`render::Renderer`]: dithered wall columns with a
//! coarse depth buffer, scaled and masked sprites, HUD bitmaps and text.
//! [`effects::Melt`] runs the level transition on the finished frame and
//! [`timing::FramePacer`] keeps the loop at a fixed frame rate.

pub mod config;
pub mod demo;
pub mod display;
pub mod effects;
pub mod render;
pub mod timing;
pub mod util;

pub use config::RenderConfig;
pub use display::{DisplayDriver, Framebuffer};
pub use effects::Melt;
pub use render::{GradientShader, Renderer, SpriteSheet, Viewport};
pub use timing::{Clock, FramePacer, SystemClock};

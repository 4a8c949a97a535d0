//! Full-screen effects that work on the finished framebuffer

mod melt;

pub use melt::{column_offset, Melt, MELT_OFFSETS, MELT_OFFSET_PERIOD};

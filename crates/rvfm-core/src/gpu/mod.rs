//! GPU opcode space.

pub mod command;
mod encoders;
pub mod types;

pub use command::{opcode, Blit, GpuCommand};
pub use types::{
    ConstantColor, ImageDataLayout, PixelDataLayout, PixelDataType, TextureConfig, VideoLayers,
    VideoMode, VideoResolution,
};

/// Marker for lists consumed by the GPU.
#[derive(Debug)]
pub enum Gpu {}

impl crate::recorder::Coprocessor for Gpu {
    const NAME: &'static str = "GPU";
    type Command = GpuCommand;
}

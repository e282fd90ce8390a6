//! GPU convenience encoders on the recorder.

use crate::completion::EffectFlag;
use crate::error::BufferFull;
use crate::recorder::Recorder;

use super::command::{Blit, GpuCommand};
use super::types::{ConstantColor, ImageDataLayout, PixelDataType, TextureConfig, VideoMode};
use super::Gpu;

impl<'a> Recorder<'a, Gpu> {
    pub fn clear_texture(&mut self, texture: u8, sampler: u8) -> Result<(), BufferFull> {
        self.record(&GpuCommand::ClearTexture { texture, sampler })
    }

    /// Present `texture`. The GPU writes 1 to `flag` once it is on screen,
    /// so `flag` should be armed with [`EffectFlag::arm_present`].
    pub fn present_texture(
        &mut self,
        texture: u8,
        flag: &EffectFlag<'_>,
        interrupt: bool,
    ) -> Result<(), BufferFull> {
        self.record(&GpuCommand::PresentTexture {
            texture,
            interrupt,
            completion_address: flag.address(),
        })
    }

    pub fn set_constant_sampler(
        &mut self,
        sampler: u8,
        color: ConstantColor,
    ) -> Result<(), BufferFull> {
        self.record(&GpuCommand::SetConstantSampler { sampler, color })
    }

    pub fn set_constant_sampler_f32(&mut self, sampler: u8, color: [f32; 4]) -> Result<(), BufferFull> {
        self.set_constant_sampler(sampler, ConstantColor::Rgba32F(color))
    }

    pub fn set_constant_sampler_unorm8(&mut self, sampler: u8, color: [u8; 4]) -> Result<(), BufferFull> {
        self.set_constant_sampler(sampler, ConstantColor::Rgba8(color))
    }

    pub fn set_video_mode(&mut self, mode: VideoMode) -> Result<(), BufferFull> {
        self.record(&GpuCommand::SetVideoMode(mode))
    }

    /// Have the GPU set `flag` when it reaches this point of the list.
    pub fn write_flag(&mut self, flag: &EffectFlag<'_>, interrupt: bool) -> Result<(), BufferFull> {
        self.record(&GpuCommand::WriteFlag {
            interrupt,
            address: flag.address(),
            value: flag.value(),
        })
    }

    pub fn configure_texture(&mut self, texture: u8, config: &TextureConfig) -> Result<(), BufferFull> {
        self.record(&GpuCommand::ConfigureTexture {
            texture,
            config: *config,
        })
    }

    /// Copy texel data from bus address `source` into `texture`.
    pub fn upload_texture(
        &mut self,
        texture: u8,
        layout: ImageDataLayout,
        source: u32,
    ) -> Result<(), BufferFull> {
        self.record(&GpuCommand::UploadTexture {
            texture,
            layout,
            source,
        })
    }

    pub fn configure_buffer(&mut self, buffer: u8, length: u32) -> Result<(), BufferFull> {
        self.record(&GpuCommand::ConfigureBuffer { buffer, length })
    }

    pub fn upload_buffer(&mut self, buffer: u8, source: u32) -> Result<(), BufferFull> {
        self.record(&GpuCommand::UploadBuffer { buffer, source })
    }

    pub fn direct_blit(&mut self, blit: &Blit) -> Result<(), BufferFull> {
        self.record(&GpuCommand::DirectBlit(*blit))
    }

    pub fn cutout_blit(&mut self, blit: &Blit, alpha: PixelDataType) -> Result<(), BufferFull> {
        self.record(&GpuCommand::CutoutBlit { blit: *blit, alpha })
    }
}

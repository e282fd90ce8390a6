//! GPU command shapes and their wire encoding.
//!
//! Every GPU command starts with a little-endian u16 opcode.

use crate::error::DecodeError;
use crate::recorder::WireCommand;
use crate::wire::{CommandReader, CommandWriter, EncodedCommand};

use super::types::{
    ConstantColor, ImageDataLayout, PixelDataLayout, PixelDataType, TextureConfig, VideoMode,
};

pub mod opcode {
    pub const CLEAR_TEXTURE: u16 = 0x00;
    pub const PRESENT_TEXTURE: u16 = 0x01;
    pub const SET_CONSTANT_SAMPLER: u16 = 0x02;
    pub const SET_VIDEO_MODE: u16 = 0x03;
    pub const WRITE_FLAG: u16 = 0x04;
    pub const CONFIGURE_TEXTURE: u16 = 0x05;
    pub const UPLOAD_TEXTURE: u16 = 0x06;
    pub const CONFIGURE_BUFFER: u16 = 0x07;
    pub const UPLOAD_BUFFER: u16 = 0x08;
    pub const DIRECT_BLIT: u16 = 0x09;
    pub const CUTOUT_BLIT: u16 = 0x0A;
}

/// Source and destination rectangle of a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
    pub src_texture: u8,
    pub dst_texture: u8,
    pub src_x: u16,
    pub src_y: u16,
    pub dst_x: u16,
    pub dst_y: u16,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpuCommand {
    /// Fill `texture` from a constant sampler.
    ClearTexture { texture: u8, sampler: u8 },
    /// Scan `texture` out, then write 1 to `completion_address`.
    PresentTexture {
        texture: u8,
        interrupt: bool,
        completion_address: u32,
    },
    SetConstantSampler { sampler: u8, color: ConstantColor },
    SetVideoMode(VideoMode),
    /// Write `value` to `address` when reached.
    WriteFlag {
        interrupt: bool,
        address: u32,
        value: u32,
    },
    ConfigureTexture { texture: u8, config: TextureConfig },
    UploadTexture {
        texture: u8,
        layout: ImageDataLayout,
        source: u32,
    },
    ConfigureBuffer { buffer: u8, length: u32 },
    UploadBuffer { buffer: u8, source: u32 },
    DirectBlit(Blit),
    /// Blit skipping texels whose alpha, read as `alpha`, is zero.
    CutoutBlit { blit: Blit, alpha: PixelDataType },
}

impl GpuCommand {
    pub fn opcode(&self) -> u16 {
        match self {
            GpuCommand::ClearTexture { .. } => opcode::CLEAR_TEXTURE,
            GpuCommand::PresentTexture { .. } => opcode::PRESENT_TEXTURE,
            GpuCommand::SetConstantSampler { .. } => opcode::SET_CONSTANT_SAMPLER,
            GpuCommand::SetVideoMode(_) => opcode::SET_VIDEO_MODE,
            GpuCommand::WriteFlag { .. } => opcode::WRITE_FLAG,
            GpuCommand::ConfigureTexture { .. } => opcode::CONFIGURE_TEXTURE,
            GpuCommand::UploadTexture { .. } => opcode::UPLOAD_TEXTURE,
            GpuCommand::ConfigureBuffer { .. } => opcode::CONFIGURE_BUFFER,
            GpuCommand::UploadBuffer { .. } => opcode::UPLOAD_BUFFER,
            GpuCommand::DirectBlit(_) => opcode::DIRECT_BLIT,
            GpuCommand::CutoutBlit { .. } => opcode::CUTOUT_BLIT,
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            GpuCommand::ClearTexture { .. } | GpuCommand::SetVideoMode(_) => 4,
            GpuCommand::PresentTexture { .. }
            | GpuCommand::UploadTexture { .. }
            | GpuCommand::ConfigureBuffer { .. }
            | GpuCommand::UploadBuffer { .. } => 8,
            GpuCommand::WriteFlag { .. } | GpuCommand::ConfigureTexture { .. } => 12,
            GpuCommand::DirectBlit(_) => 16,
            GpuCommand::SetConstantSampler { .. } | GpuCommand::CutoutBlit { .. } => 20,
        }
    }
}

fn write_blit(w: CommandWriter, blit: &Blit) -> CommandWriter {
    w.u8(blit.src_texture)
        .u8(blit.dst_texture)
        .u16(blit.src_x)
        .u16(blit.src_y)
        .u16(blit.dst_x)
        .u16(blit.dst_y)
        .u16(blit.width)
        .u16(blit.height)
}

fn read_blit(r: &mut CommandReader<'_>) -> Result<Blit, DecodeError> {
    Ok(Blit {
        src_texture: r.u8()?,
        dst_texture: r.u8()?,
        src_x: r.u16()?,
        src_y: r.u16()?,
        dst_x: r.u16()?,
        dst_y: r.u16()?,
        width: r.u16()?,
        height: r.u16()?,
    })
}

/// Read an enumerated byte operand.
fn read_enum<T>(
    r: &mut CommandReader<'_>,
    op: u16,
    from_bits: impl Fn(u8) -> Option<T>,
) -> Result<T, DecodeError> {
    let offset = r.consumed();
    let bits = r.u8()?;
    from_bits(bits).ok_or(DecodeError::InvalidOperand {
        opcode: op,
        value: bits as u32,
        offset,
    })
}

impl WireCommand for GpuCommand {
    fn encode(&self) -> EncodedCommand {
        let w = CommandWriter::new().u16(self.opcode());
        let w = match self {
            GpuCommand::ClearTexture { texture, sampler } => w.u8(*texture).u8(*sampler),
            GpuCommand::PresentTexture {
                texture,
                interrupt,
                completion_address,
            } => w.u8(*texture).flag(*interrupt).u32(*completion_address),
            GpuCommand::SetConstantSampler { sampler, color } => w
                .u8(*sampler)
                .u8(color.data_type().bits())
                .bytes(&color.to_data()),
            GpuCommand::SetVideoMode(mode) => w.u8(0).u8(mode.bits()),
            GpuCommand::WriteFlag {
                interrupt,
                address,
                value,
            } => w.u8(0).flag(*interrupt).u32(*address).u32(*value),
            GpuCommand::ConfigureTexture { texture, config } => w
                .u16(config.width)
                .u16(config.height)
                .u8(*texture)
                .u8(config.pixel_layout.bits())
                .u8(config.image_layout.bits())
                .zeros(3),
            GpuCommand::UploadTexture {
                texture,
                layout,
                source,
            } => w.u8(*texture).u8(layout.bits()).u32(*source),
            GpuCommand::ConfigureBuffer { buffer, length } => w.u8(0).u8(*buffer).u32(*length),
            GpuCommand::UploadBuffer { buffer, source } => w.u8(0).u8(*buffer).u32(*source),
            GpuCommand::DirectBlit(blit) => write_blit(w, blit),
            GpuCommand::CutoutBlit { blit, alpha } => write_blit(w, blit).zeros(3).u8(alpha.bits()),
        };
        w.finish()
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut r = CommandReader::new(bytes);
        let op = r.u16()?;
        let command = match op {
            opcode::CLEAR_TEXTURE => GpuCommand::ClearTexture {
                texture: r.u8()?,
                sampler: r.u8()?,
            },
            opcode::PRESENT_TEXTURE => GpuCommand::PresentTexture {
                texture: r.u8()?,
                interrupt: r.flag()?,
                completion_address: r.u32()?,
            },
            opcode::SET_CONSTANT_SAMPLER => {
                let sampler = r.u8()?;
                let data_type = read_enum(&mut r, op, PixelDataType::from_bits)?;
                let data = r.array::<{ ConstantColor::DATA_LEN }>()?;
                GpuCommand::SetConstantSampler {
                    sampler,
                    color: ConstantColor::from_data(data_type, &data),
                }
            }
            opcode::SET_VIDEO_MODE => {
                r.skip(1)?;
                GpuCommand::SetVideoMode(read_enum(&mut r, op, VideoMode::from_bits)?)
            }
            opcode::WRITE_FLAG => {
                r.skip(1)?;
                GpuCommand::WriteFlag {
                    interrupt: r.flag()?,
                    address: r.u32()?,
                    value: r.u32()?,
                }
            }
            opcode::CONFIGURE_TEXTURE => {
                let width = r.u16()?;
                let height = r.u16()?;
                let texture = r.u8()?;
                let pixel_layout = read_enum(&mut r, op, PixelDataLayout::from_bits)?;
                let image_layout = read_enum(&mut r, op, ImageDataLayout::from_bits)?;
                r.skip(3)?;
                GpuCommand::ConfigureTexture {
                    texture,
                    config: TextureConfig {
                        width,
                        height,
                        pixel_layout,
                        image_layout,
                    },
                }
            }
            opcode::UPLOAD_TEXTURE => GpuCommand::UploadTexture {
                texture: r.u8()?,
                layout: read_enum(&mut r, op, ImageDataLayout::from_bits)?,
                source: r.u32()?,
            },
            opcode::CONFIGURE_BUFFER => {
                r.skip(1)?;
                GpuCommand::ConfigureBuffer {
                    buffer: r.u8()?,
                    length: r.u32()?,
                }
            }
            opcode::UPLOAD_BUFFER => {
                r.skip(1)?;
                GpuCommand::UploadBuffer {
                    buffer: r.u8()?,
                    source: r.u32()?,
                }
            }
            opcode::DIRECT_BLIT => GpuCommand::DirectBlit(read_blit(&mut r)?),
            opcode::CUTOUT_BLIT => {
                let blit = read_blit(&mut r)?;
                r.skip(3)?;
                GpuCommand::CutoutBlit {
                    blit,
                    alpha: read_enum(&mut r, op, PixelDataType::from_bits)?,
                }
            }
            _ => return Err(DecodeError::UnknownOpcode { opcode: op, offset: 0 }),
        };
        Ok((command, r.consumed()))
    }
}

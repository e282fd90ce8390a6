//! Operand types of GPU commands.

/// Component layout of texture texels.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelDataLayout {
    D8x1 = 0,
    D8x2 = 1,
    D8x4 = 2,
    D16x1 = 3,
    D16x2 = 4,
    D16x4 = 5,
    D32x1 = 6,
    D32x2 = 7,
    D32x4 = 8,
}

impl PixelDataLayout {
    /// `None` for bit patterns with no layout.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::D8x1,
            1 => Self::D8x2,
            2 => Self::D8x4,
            3 => Self::D16x1,
            4 => Self::D16x2,
            5 => Self::D16x4,
            6 => Self::D32x1,
            7 => Self::D32x2,
            8 => Self::D32x4,
            _ => return None,
        })
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Bytes per texel.
    pub const fn texel_size(&self) -> usize {
        match self {
            Self::D8x1 => 1,
            Self::D8x2 | Self::D16x1 => 2,
            Self::D8x4 | Self::D16x2 | Self::D32x1 => 4,
            Self::D16x4 | Self::D32x2 => 8,
            Self::D32x4 => 16,
        }
    }
}

/// Arrangement of texels in memory.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDataLayout {
    Contiguous = 0,
    Block8x8 = 1,
    Block4x4 = 2,
}

impl ImageDataLayout {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::Contiguous,
            1 => Self::Block8x8,
            2 => Self::Block4x4,
            _ => return None,
        })
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Interpretation of texel components.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelDataType {
    RUNorm8 = 0,
    RgUNorm8 = 1,
    RgbUNorm8 = 2,
    RgbaUNorm8 = 3,
    RF32 = 4,
    RgF32 = 5,
    RgbF32 = 6,
    RgbaF32 = 7,
}

impl PixelDataType {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::RUNorm8,
            1 => Self::RgUNorm8,
            2 => Self::RgbUNorm8,
            3 => Self::RgbaUNorm8,
            4 => Self::RF32,
            5 => Self::RgF32,
            6 => Self::RgbF32,
            7 => Self::RgbaF32,
            _ => return None,
        })
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Bytes one value of this type occupies.
    pub const fn size(&self) -> usize {
        match self {
            Self::RUNorm8 => 1,
            Self::RgUNorm8 => 2,
            Self::RgbUNorm8 => 3,
            Self::RgbaUNorm8 | Self::RF32 => 4,
            Self::RgF32 => 8,
            Self::RgbF32 => 12,
            Self::RgbaF32 => 16,
        }
    }
}

/// Colour held by a constant sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantColor {
    R8(u8),
    Rg8([u8; 2]),
    Rgb8([u8; 3]),
    Rgba8([u8; 4]),
    R32F(f32),
    Rg32F([f32; 2]),
    Rgb32F([f32; 3]),
    Rgba32F([f32; 4]),
}

impl ConstantColor {
    /// Size of the colour field in a set-constant-sampler command.
    pub const DATA_LEN: usize = 16;

    pub fn data_type(&self) -> PixelDataType {
        match self {
            Self::R8(_) => PixelDataType::RUNorm8,
            Self::Rg8(_) => PixelDataType::RgUNorm8,
            Self::Rgb8(_) => PixelDataType::RgbUNorm8,
            Self::Rgba8(_) => PixelDataType::RgbaUNorm8,
            Self::R32F(_) => PixelDataType::RF32,
            Self::Rg32F(_) => PixelDataType::RgF32,
            Self::Rgb32F(_) => PixelDataType::RgbF32,
            Self::Rgba32F(_) => PixelDataType::RgbaF32,
        }
    }

    /// Little-endian components, zero padded to [`Self::DATA_LEN`].
    pub fn to_data(&self) -> [u8; Self::DATA_LEN] {
        let mut data = [0u8; Self::DATA_LEN];
        match self {
            Self::R8(v) => data[0] = *v,
            Self::Rg8(v) => data[..2].copy_from_slice(v),
            Self::Rgb8(v) => data[..3].copy_from_slice(v),
            Self::Rgba8(v) => data[..4].copy_from_slice(v),
            Self::R32F(v) => data[..4].copy_from_slice(&v.to_le_bytes()),
            Self::Rg32F(v) => put_f32s(&mut data, v),
            Self::Rgb32F(v) => put_f32s(&mut data, v),
            Self::Rgba32F(v) => put_f32s(&mut data, v),
        }
        data
    }

    /// Rebuild a colour from its type and colour field. Padding is ignored.
    pub fn from_data(data_type: PixelDataType, data: &[u8; Self::DATA_LEN]) -> Self {
        match data_type {
            PixelDataType::RUNorm8 => Self::R8(data[0]),
            PixelDataType::RgUNorm8 => Self::Rg8([data[0], data[1]]),
            PixelDataType::RgbUNorm8 => Self::Rgb8([data[0], data[1], data[2]]),
            PixelDataType::RgbaUNorm8 => Self::Rgba8([data[0], data[1], data[2], data[3]]),
            PixelDataType::RF32 => Self::R32F(get_f32s::<1>(data)[0]),
            PixelDataType::RgF32 => Self::Rg32F(get_f32s(data)),
            PixelDataType::RgbF32 => Self::Rgb32F(get_f32s(data)),
            PixelDataType::RgbaF32 => Self::Rgba32F(get_f32s(data)),
        }
    }
}

fn put_f32s(data: &mut [u8; ConstantColor::DATA_LEN], values: &[f32]) {
    for (chunk, v) in data.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

fn get_f32s<const N: usize>(data: &[u8; ConstantColor::DATA_LEN]) -> [f32; N] {
    let mut out = [0f32; N];
    for (v, chunk) in out.iter_mut().zip(data.chunks_exact(4)) {
        *v = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    out
}

/// Output resolution.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoResolution {
    R256x192 = 0,
    R512x384 = 1,
}

bitflags::bitflags! {
    /// Layers composited into the output image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VideoLayers: u8 {
        const BACKGROUNDS = 0b0000_0010;
        const SPRITES     = 0b0000_0100;
        const TRIANGLES   = 0b0000_1000;
    }
}

/// Operand of the set-video-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    pub resolution: VideoResolution,
    pub layers: VideoLayers,
}

impl VideoMode {
    pub const fn new(resolution: VideoResolution, layers: VideoLayers) -> Self {
        Self { resolution, layers }
    }

    pub const fn bits(&self) -> u8 {
        self.resolution as u8 | self.layers.bits()
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        let resolution = if bits & 0x01 == 0 {
            VideoResolution::R256x192
        } else {
            VideoResolution::R512x384
        };
        let layers = VideoLayers::from_bits(bits & !0x01)?;
        Some(Self { resolution, layers })
    }
}

/// Shape of a texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    pub width: u16,
    pub height: u16,
    pub pixel_layout: PixelDataLayout,
    pub image_layout: ImageDataLayout,
}

impl TextureConfig {
    /// Bytes an upload into this texture copies. The image layout only
    /// reorders texels.
    pub const fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel_layout.texel_size()
    }
}

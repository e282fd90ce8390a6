//! Operand types of SPU commands.

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square = 0,
    Triangle = 1,
    Sin = 2,
    SuperSaw = 3,
    Noise = 4,
}

impl Waveform {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::Square,
            1 => Self::Triangle,
            2 => Self::Sin,
            3 => Self::SuperSaw,
            4 => Self::Noise,
            _ => return None,
        })
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Filter response. The suffix is the roll-off in dB per octave.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    AllPass = 0,
    LowPass6 = 1,
    LowPass12 = 2,
    LowPass18 = 3,
    LowPass24 = 4,
    HighPass6 = 5,
    HighPass12 = 6,
    HighPass18 = 7,
    HighPass24 = 8,
    BandPass6 = 9,
    BandPass12 = 10,
    BandPass18 = 11,
    BandPass24 = 12,
}

impl FilterMode {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::AllPass,
            1 => Self::LowPass6,
            2 => Self::LowPass12,
            3 => Self::LowPass18,
            4 => Self::LowPass24,
            5 => Self::HighPass6,
            6 => Self::HighPass12,
            7 => Self::HighPass18,
            8 => Self::HighPass24,
            9 => Self::BandPass6,
            10 => Self::BandPass12,
            11 => Self::BandPass18,
            12 => Self::BandPass24,
            _ => return None,
        })
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchMode {
    Constant = 0,
    PortamentoQuadratic = 1,
}

impl PitchMode {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Constant),
            1 => Some(Self::PortamentoQuadratic),
            _ => None,
        }
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCount {
    Mono = 0,
    Stereo = 1,
}

impl ChannelCount {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Mono),
            1 => Some(Self::Stereo),
            _ => None,
        }
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// How many times a sampler replays its sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Infinite,
    Finite(u32),
}

impl LoopMode {
    const INFINITE_BITS: u32 = 0xFFFF_FFFF;

    pub const fn bits(&self) -> u32 {
        match self {
            Self::Infinite => Self::INFINITE_BITS,
            Self::Finite(count) => *count,
        }
    }

    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            Self::INFINITE_BITS => Self::Infinite,
            count => Self::Finite(count),
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoSide {
    Left = 0,
    Right = 1,
}

/// One side of a voice's stereo mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixChannel {
    pub voice: u8,
    pub side: StereoSide,
}

impl MixChannel {
    pub const fn left(voice: u8) -> Self {
        Self {
            voice,
            side: StereoSide::Left,
        }
    }

    pub const fn right(voice: u8) -> Self {
        Self {
            voice,
            side: StereoSide::Right,
        }
    }

    /// Channel index: the voice in the upper bits, the side in bit 0.
    pub const fn bits(&self) -> u8 {
        (self.voice << 1) | self.side as u8
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self {
            voice: bits >> 1,
            side: if bits & 1 == 0 {
                StereoSide::Left
            } else {
                StereoSide::Right
            },
        }
    }
}

//! Field Enum: SAMPLE_RATE

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRateE {
    /// 16 kHz
    Rate16k = 0,
    /// 32 kHz
    Rate32k = 1,
    /// 41 kHz
    Rate41k = 2,
    /// 48 kHz
    Rate48k = 3,
}

impl SampleRateE {
    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Rate16k),
            1 => Ok(Self::Rate32k),
            2 => Ok(Self::Rate41k),
            3 => Ok(Self::Rate48k),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Nominal rate in samples per second.
    #[must_use]
    pub const fn hz(&self) -> u32 {
        match self {
            Self::Rate16k => 16_000,
            Self::Rate32k => 32_000,
            Self::Rate41k => 41_000,
            Self::Rate48k => 48_000,
        }
    }
}

//! Field Enum: INTERRUPT

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptE {
    /// Raised by a GPU write-flag command with its interrupt bit set
    Gpu = 0,
    /// Raised by a GPU present command with its interrupt bit set
    Present = 1,
    /// Vertical blank
    VSync = 2,
    /// Raised by an SPU write-flag command with its interrupt bit set
    Spu = 3,
}

impl InterruptE {
    /// Every interrupt line, in line order.
    pub const ALL: [Self; 4] = [Self::Gpu, Self::Present, Self::VSync, Self::Spu];

    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Gpu),
            1 => Ok(Self::Present),
            2 => Ok(Self::VSync),
            3 => Ok(Self::Spu),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

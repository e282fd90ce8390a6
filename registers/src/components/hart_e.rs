//! Field Enum: HART

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HartE {
    Hart0 = 0,
    Hart1 = 1,
    Hart2 = 2,
    Hart3 = 3,
}

impl HartE {
    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Hart0),
            1 => Ok(Self::Hart1),
            2 => Ok(Self::Hart2),
            3 => Ok(Self::Hart3),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

//! Field Enum: SPU_QUEUE

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpuQueueE {
    Queue0 = 0,
    Queue1 = 1,
    Queue2 = 2,
    Queue3 = 3,
}

impl SpuQueueE {
    /// Every SPU queue, in port order.
    pub const ALL: [Self; 4] = [Self::Queue0, Self::Queue1, Self::Queue2, Self::Queue3];

    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Queue0),
            1 => Ok(Self::Queue1),
            2 => Ok(Self::Queue2),
            3 => Ok(Self::Queue3),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

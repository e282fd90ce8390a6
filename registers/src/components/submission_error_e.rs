//! Field Enum: SUBMISSION_ERROR

/// Reasons a coprocessor may drop a submitted list.
///
/// The register holds zero while no error is latched.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorE {
    /// The header address is outside shared RAM
    HeaderNotInRam = 1,
    /// The payload runs past the end of shared RAM
    ListNotInRam = 2,
    /// The header length exceeds the coprocessor's list limit
    ListTooLong = 3,
    /// The queue had no room for another list
    QueueFull = 4,
}

impl SubmissionErrorE {
    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            1 => Ok(Self::HeaderNotInRam),
            2 => Ok(Self::ListNotInRam),
            3 => Ok(Self::ListTooLong),
            4 => Ok(Self::QueueFull),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

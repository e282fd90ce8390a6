//! Helpers for decoding enumerated register fields

/// A bit pattern that does not correspond to any variant of a field enum.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UnknownVariant<T>(T);

impl<T: Copy> UnknownVariant<T> {
    #[must_use]
    pub const fn new(bits: T) -> Self {
        Self(bits)
    }

    /// The rejected bit pattern.
    #[must_use]
    pub const fn bits(&self) -> T {
        self.0
    }
}

impl<T: core::fmt::Display> core::fmt::Display for UnknownVariant<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown enum variant {}", self.0)
    }
}

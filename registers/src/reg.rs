//! Typed register descriptors

use core::marker::PhantomData;

use crate::access::{Access, AccessMode};

/// A value type that can be held by a 32-bit register.
pub trait Register: Copy {
    fn from_raw(val: u32) -> Self;

    fn to_raw(self) -> u32;
}

impl Register for u32 {
    fn from_raw(val: u32) -> Self {
        val
    }

    fn to_raw(self) -> u32 {
        self
    }
}

/// Descriptor of one memory-mapped register.
///
/// A descriptor only names the register (bus address, width, access mode
/// and value type); it performs no access itself. Reads and writes go
/// through whichever bus owns the hardware, which checks `A` at compile
/// time.
pub struct Reg<T: Register, A: Access> {
    addr: u32,
    _marker: PhantomData<(T, A)>,
}

impl<T: Register, A: Access> Reg<T, A> {
    /// Width of every rvfm register in bytes.
    pub const WIDTH: usize = 4;

    #[inline(always)]
    #[must_use]
    pub const fn at(addr: u32) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn addr(&self) -> u32 {
        self.addr
    }

    #[inline(always)]
    #[must_use]
    pub const fn width(&self) -> usize {
        Self::WIDTH
    }

    #[inline(always)]
    #[must_use]
    pub const fn access(&self) -> AccessMode {
        A::MODE
    }
}

impl<T: Register, A: Access> Clone for Reg<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Register, A: Access> Copy for Reg<T, A> {}

impl<T: Register, A: Access> PartialEq for Reg<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl<T: Register, A: Access> Eq for Reg<T, A> {}

impl<T: Register, A: Access> core::fmt::Debug for Reg<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reg")
            .field("addr", &format_args!("{:#010X}", self.addr))
            .field("access", &A::MODE)
            .finish()
    }
}

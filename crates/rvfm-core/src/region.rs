//! Caller-supplied memory backing one command list.
//!
//! Wire layout of a region:
//!
//! ```text
//! [0, 4)          capacity mirror, u32 LE (= len - 12)
//! [4, 8)          header: payload length, u32 LE
//! [8, 12)         header: completion cell bus address, u32 LE
//! [12, 12 + len)  command payload
//! ```

use core::ptr::NonNull;

/// Size of the capacity mirror at the start of a region.
pub const CAPACITY_MIRROR_LEN: usize = 4;
/// Size of the list header read by the coprocessors.
pub const HEADER_LEN: usize = 8;
/// Bytes reserved ahead of the payload.
pub const RESERVED_PREFIX: usize = CAPACITY_MIRROR_LEN + HEADER_LEN;

/// Offset of the header within the region. Submission ports receive the
/// bus address of this byte.
pub const HEADER_OFFSET: usize = CAPACITY_MIRROR_LEN;
pub const HEADER_LENGTH_OFFSET: usize = HEADER_OFFSET;
pub const HEADER_CELL_OFFSET: usize = HEADER_OFFSET + 4;
pub const PAYLOAD_OFFSET: usize = RESERVED_PREFIX;

/// Exclusive handle to the memory a recorder writes into.
///
/// The handle carries the region's base and length from `Recorder::new`
/// through `finish` and submission back to reclamation.
pub struct OwnedRegion<'a> {
    bytes: &'a mut [u8],
}

impl<'a> OwnedRegion<'a> {
    /// Take exclusive use of `bytes` for recording.
    ///
    /// ```
    /// use rvfm_core::OwnedRegion;
    ///
    /// let mut buf = [0u8; 64];
    /// let base = buf.as_ptr();
    /// let region = OwnedRegion::new(&mut buf);
    /// assert_eq!(region.len(), 64);
    /// assert_eq!(region.capacity(), 52);
    /// assert_eq!(region.as_ptr(), base);
    /// ```
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Total length, prefix included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload bytes available once the 12-byte prefix is reserved.
    pub fn capacity(&self) -> usize {
        self.bytes.len().saturating_sub(RESERVED_PREFIX)
    }

    /// Host address of the region's first byte (the capacity mirror).
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// The whole region, prefix included.
    pub fn as_slice(&self) -> &[u8] {
        self.bytes
    }

    /// Give the memory back to the caller.
    pub fn into_inner(self) -> &'a mut [u8] {
        self.bytes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        self.bytes
    }

    pub(crate) fn into_raw(self) -> (NonNull<u8>, usize) {
        let len = self.bytes.len();
        (NonNull::from(self.bytes).cast(), len)
    }

    /// # Safety
    ///
    /// `ptr` and `len` must come from [`OwnedRegion::into_raw`] on a region
    /// of lifetime `'a`, and no other reference to that memory may be live.
    pub(crate) unsafe fn from_raw(ptr: NonNull<u8>, len: usize) -> Self {
        Self {
            bytes: unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr(), len) },
        }
    }
}

impl<'a> From<&'a mut [u8]> for OwnedRegion<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a mut [u8; N]> for OwnedRegion<'a> {
    fn from(bytes: &'a mut [u8; N]) -> Self {
        Self::new(bytes.as_mut_slice())
    }
}

impl core::fmt::Debug for OwnedRegion<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OwnedRegion")
            .field("base", &self.bytes.as_ptr())
            .field("len", &self.bytes.len())
            .finish()
    }
}

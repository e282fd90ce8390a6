//! Frozen, read-only view of a finished recording.

use core::marker::PhantomData;

use crate::error::DecodeError;
use crate::recorder::{Coprocessor, WireCommand};
use crate::region::{OwnedRegion, HEADER_CELL_OFFSET, HEADER_LENGTH_OFFSET, HEADER_OFFSET, PAYLOAD_OFFSET};

/// A finished list of commands for coprocessor `C`.
///
/// The list cannot be appended to. Submitting it consumes it, so it can
/// be handed to a queue at most once.
pub struct CommandList<'a, C: Coprocessor> {
    region: OwnedRegion<'a>,
    len: usize,
    _coprocessor: PhantomData<C>,
}

impl<'a, C: Coprocessor> CommandList<'a, C> {
    pub(crate) fn new(region: OwnedRegion<'a>, len: usize) -> Self {
        Self {
            region,
            len,
            _coprocessor: PhantomData,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The recorded command bytes.
    pub fn payload(&self) -> &[u8] {
        &self.region.as_slice()[PAYLOAD_OFFSET..PAYLOAD_OFFSET + self.len]
    }

    /// Length field as stored in the header.
    pub fn header_length(&self) -> u32 {
        self.read_u32(HEADER_LENGTH_OFFSET)
    }

    /// Completion cell address as stored in the header. Zero before submission.
    pub fn header_completion_address(&self) -> u32 {
        self.read_u32(HEADER_CELL_OFFSET)
    }

    /// Capacity mirror stored ahead of the header.
    pub fn stored_capacity(&self) -> u32 {
        self.read_u32(0)
    }

    /// Decode the payload back into typed commands.
    pub fn commands(&self) -> Commands<'_, C> {
        Commands::new(self.payload())
    }

    /// Discard a list that was never submitted and recover its region.
    pub fn reset(self) -> OwnedRegion<'a> {
        self.region
    }

    /// Pointer to the header, the address coprocessors are given.
    pub(crate) fn header_ptr(&self) -> *const u8 {
        self.region.as_ptr().wrapping_add(HEADER_OFFSET)
    }

    pub(crate) fn set_completion_address(&mut self, address: u32) {
        self.region.as_mut_slice()[HEADER_CELL_OFFSET..PAYLOAD_OFFSET]
            .copy_from_slice(&address.to_le_bytes());
    }

    pub(crate) fn into_region(self) -> OwnedRegion<'a> {
        self.region
    }

    fn read_u32(&self, offset: usize) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.region.as_slice()[offset..offset + 4]);
        u32::from_le_bytes(raw)
    }
}

impl<C: Coprocessor> core::fmt::Debug for CommandList<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandList")
            .field("coprocessor", &C::NAME)
            .field("header", &self.header_ptr())
            .field("len", &self.len)
            .finish()
    }
}

/// Iterator decoding a payload command by command.
///
/// Stops after the first decode error.
pub struct Commands<'l, C: Coprocessor> {
    payload: &'l [u8],
    cursor: usize,
    failed: bool,
    _coprocessor: PhantomData<C>,
}

impl<'l, C: Coprocessor> Commands<'l, C> {
    pub fn new(payload: &'l [u8]) -> Self {
        Self {
            payload,
            cursor: 0,
            failed: false,
            _coprocessor: PhantomData,
        }
    }

    /// Byte offset of the next command.
    pub fn offset(&self) -> usize {
        self.cursor
    }
}

impl<C: Coprocessor> Iterator for Commands<'_, C> {
    type Item = Result<C::Command, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.payload.len() {
            return None;
        }
        match C::Command::decode(&self.payload[self.cursor..]) {
            Ok((command, size)) => {
                self.cursor += size;
                Some(Ok(command))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e.offset_by(self.cursor)))
            }
        }
    }
}

impl<C: Coprocessor> core::iter::FusedIterator for Commands<'_, C> {}

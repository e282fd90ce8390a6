//! Bump recorder that appends encoded commands to an owned region.

use core::marker::PhantomData;

use crate::command_list::CommandList;
use crate::error::{BufferFull, DecodeError, RecorderError};
use crate::region::{OwnedRegion, HEADER_CELL_OFFSET, HEADER_LENGTH_OFFSET, PAYLOAD_OFFSET, RESERVED_PREFIX};
use crate::wire::EncodedCommand;

/// A command shape with a fixed binary encoding.
pub trait WireCommand: Sized + core::fmt::Debug {
    fn encode(&self) -> EncodedCommand;

    /// Decode the command at the front of `bytes`, returning it together
    /// with the number of bytes it occupies.
    fn decode(bytes: &[u8]) -> Result<(Self, usize), DecodeError>;
}

/// A coprocessor with its own opcode space.
///
/// Implemented by uninhabited marker types; lists are tagged with one so
/// that GPU commands never end up on an SPU queue.
pub trait Coprocessor {
    const NAME: &'static str;
    type Command: WireCommand;
}

/// Records commands for coprocessor `C` into an [`OwnedRegion`].
pub struct Recorder<'a, C: Coprocessor> {
    region: OwnedRegion<'a>,
    capacity: usize,
    used: usize,
    _coprocessor: PhantomData<C>,
}

impl<'a, C: Coprocessor> Recorder<'a, C> {
    /// Reserve the 12-byte prefix of `region` and start an empty list.
    ///
    /// Writes the capacity mirror and clears the header.
    pub fn new(region: impl Into<OwnedRegion<'a>>) -> Result<Self, RecorderError> {
        let mut region = region.into();
        let len = region.len();
        if len <= RESERVED_PREFIX {
            return Err(RecorderError::RegionTooSmall { len });
        }
        let capacity = len - RESERVED_PREFIX;
        let mirror = u32::try_from(capacity).map_err(|_| RecorderError::RegionTooLarge { len })?;

        let bytes = region.as_mut_slice();
        bytes[..HEADER_LENGTH_OFFSET].copy_from_slice(&mirror.to_le_bytes());
        bytes[HEADER_LENGTH_OFFSET..PAYLOAD_OFFSET].fill(0);

        Ok(Self {
            region,
            capacity,
            used: 0,
            _coprocessor: PhantomData,
        })
    }

    /// Usable payload bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Payload bytes written so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Payload bytes still free.
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// True until the first command is written.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Append `bytes` verbatim at the cursor.
    ///
    /// All-or-nothing: when the bytes do not fit, neither the cursor nor
    /// the region contents change.
    pub fn push_command(&mut self, bytes: &[u8]) -> Result<(), BufferFull> {
        let remaining = self.remaining();
        if bytes.len() > remaining {
            log::trace!(
                "{} recorder full: {} bytes requested, {} remaining",
                C::NAME,
                bytes.len(),
                remaining
            );
            return Err(BufferFull {
                requested: bytes.len(),
                remaining,
            });
        }

        let start = PAYLOAD_OFFSET + self.used;
        self.region.as_mut_slice()[start..start + bytes.len()].copy_from_slice(bytes);
        self.used += bytes.len();
        Ok(())
    }

    /// Encode `command` and append it.
    pub fn record(&mut self, command: &C::Command) -> Result<(), BufferFull> {
        self.push_command(&command.encode())
    }

    /// Record every command in `commands`, stopping at the first one that
    /// does not fit. Commands before it stay recorded.
    pub fn record_all<'c, I>(&mut self, commands: I) -> Result<(), BufferFull>
    where
        I: IntoIterator<Item = &'c C::Command>,
        C::Command: 'c,
    {
        for command in commands {
            self.record(command)?;
        }
        Ok(())
    }

    /// Freeze the recorded commands into a list.
    ///
    /// Writes the payload length into the header. The completion cell field
    /// stays zero until the list is submitted.
    pub fn finish(mut self) -> CommandList<'a, C> {
        // `used <= capacity`, which `new` checked against u32.
        let length = self.used as u32;
        let bytes = self.region.as_mut_slice();
        bytes[HEADER_LENGTH_OFFSET..HEADER_CELL_OFFSET].copy_from_slice(&length.to_le_bytes());
        log::trace!("{} list finished with {} bytes", C::NAME, self.used);
        CommandList::new(self.region, self.used)
    }

    /// Abandon the recording and give the region back.
    pub fn into_region(self) -> OwnedRegion<'a> {
        self.region
    }
}

impl<C: Coprocessor> core::fmt::Debug for Recorder<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Recorder")
            .field("coprocessor", &C::NAME)
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .finish()
    }
}

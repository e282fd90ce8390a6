//! Little-endian command byte writer and reader.

use crate::error::DecodeError;

/// Longest command in either opcode space.
pub const MAX_COMMAND_LEN: usize = 20;

/// One encoded command.
pub type EncodedCommand = heapless::Vec<u8, MAX_COMMAND_LEN>;

pub(crate) struct CommandWriter {
    bytes: EncodedCommand,
}

impl CommandWriter {
    pub(crate) fn new() -> Self {
        Self {
            bytes: EncodedCommand::new(),
        }
    }

    pub(crate) fn u8(self, val: u8) -> Self {
        self.put(&[val])
    }

    pub(crate) fn flag(self, val: bool) -> Self {
        self.u8(val as u8)
    }

    pub(crate) fn u16(self, val: u16) -> Self {
        self.put(&val.to_le_bytes())
    }

    pub(crate) fn i16(self, val: i16) -> Self {
        self.put(&val.to_le_bytes())
    }

    pub(crate) fn u32(self, val: u32) -> Self {
        self.put(&val.to_le_bytes())
    }

    pub(crate) fn bytes(self, val: &[u8]) -> Self {
        self.put(val)
    }

    pub(crate) fn zeros(mut self, count: usize) -> Self {
        for _ in 0..count {
            self = self.u8(0);
        }
        self
    }

    fn put(mut self, val: &[u8]) -> Self {
        let fits = self.bytes.extend_from_slice(val).is_ok();
        debug_assert!(fits, "command longer than MAX_COMMAND_LEN");
        self
    }

    pub(crate) fn finish(self) -> EncodedCommand {
        self.bytes
    }
}

pub(crate) struct CommandReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CommandReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.pos
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.pos + N;
        let src = self
            .bytes
            .get(self.pos..end)
            .ok_or(DecodeError::Truncated { offset: self.pos })?;
        let mut out = [0u8; N];
        out.copy_from_slice(src);
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn flag(&mut self) -> Result<bool, DecodeError> {
        Ok(self.u8()? != 0)
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub(crate) fn i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn skip(&mut self, count: usize) -> Result<(), DecodeError> {
        let end = self.pos + count;
        if end > self.bytes.len() {
            return Err(DecodeError::Truncated { offset: self.pos });
        }
        self.pos = end;
        Ok(())
    }
}

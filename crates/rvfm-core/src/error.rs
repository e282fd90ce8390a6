//! Error types for recording, submitting and decoding command lists.

use core::fmt;

use rvfm_registers::components::spu_regs::submission_error::SubmissionErrorReg;
use rvfm_registers::components::submission_error_e::SubmissionErrorE;

/// A region could not back a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderError {
    /// The region does not extend past the 12-byte reserved prefix.
    RegionTooSmall { len: usize },
    /// The payload capacity does not fit the 32-bit header length field.
    RegionTooLarge { len: usize },
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderError::RegionTooSmall { len } => {
                write!(f, "region of {len} bytes leaves no room after the 12-byte prefix")
            }
            RecorderError::RegionTooLarge { len } => {
                write!(f, "region of {len} bytes exceeds the 32-bit list length")
            }
        }
    }
}

impl core::error::Error for RecorderError {}

/// A command did not fit in the recorder's remaining capacity.
///
/// The recorder is left untouched and stays usable for smaller commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferFull {
    pub requested: usize,
    pub remaining: usize,
}

impl fmt::Display for BufferFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "command of {} bytes does not fit in {} remaining bytes",
            self.requested, self.remaining
        )
    }
}

impl core::error::Error for BufferFull {}

/// Error type for submission and hardware status, generic over bus errors.
#[derive(Debug)]
pub enum SubmitError<E: fmt::Debug> {
    /// Register or address-translation failure on the bus.
    Bus(E),
    /// The coprocessor latched a submission error.
    ///
    /// The status is shared by every queue and is not tied to a specific list.
    SubmissionRejected { status: SubmissionErrorReg },
}

impl<E: fmt::Debug> SubmitError<E> {
    /// The latched reason, when the status code is a known one.
    pub fn rejection(&self) -> Option<SubmissionErrorE> {
        match self {
            SubmitError::SubmissionRejected { status } => status.error(),
            SubmitError::Bus(_) => None,
        }
    }
}

impl<E: fmt::Debug> From<E> for SubmitError<E> {
    fn from(e: E) -> Self {
        SubmitError::Bus(e)
    }
}

impl<E: fmt::Debug> fmt::Display for SubmitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Bus(e) => write!(f, "bus error: {e:?}"),
            SubmitError::SubmissionRejected { status } => match status.error() {
                Some(reason) => write!(f, "submission rejected: {reason:?}"),
                None => write!(f, "submission rejected with status {:#x}", status.raw()),
            },
        }
    }
}

impl<E: fmt::Debug> core::error::Error for SubmitError<E> {}

/// A payload could not be decoded back into commands.
///
/// Offsets are byte offsets from the start of the decoded slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownOpcode { opcode: u16, offset: usize },
    UnknownSubcommand { opcode: u16, subcommand: u8, offset: usize },
    /// An enumerated operand holds a value with no meaning.
    InvalidOperand { opcode: u16, value: u32, offset: usize },
    /// The payload ends in the middle of a command.
    Truncated { offset: usize },
}

impl DecodeError {
    /// Shift the reported offset by `base` bytes.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            DecodeError::UnknownOpcode { opcode, offset } => DecodeError::UnknownOpcode {
                opcode,
                offset: offset + base,
            },
            DecodeError::UnknownSubcommand {
                opcode,
                subcommand,
                offset,
            } => DecodeError::UnknownSubcommand {
                opcode,
                subcommand,
                offset: offset + base,
            },
            DecodeError::InvalidOperand {
                opcode,
                value,
                offset,
            } => DecodeError::InvalidOperand {
                opcode,
                value,
                offset: offset + base,
            },
            DecodeError::Truncated { offset } => DecodeError::Truncated {
                offset: offset + base,
            },
        }
    }

    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::UnknownSubcommand { offset, .. }
            | DecodeError::InvalidOperand { offset, .. }
            | DecodeError::Truncated { offset } => offset,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownOpcode { opcode, offset } => {
                write!(f, "unknown opcode {opcode:#04x} at byte {offset}")
            }
            DecodeError::UnknownSubcommand {
                opcode,
                subcommand,
                offset,
            } => write!(
                f,
                "unknown subcommand {subcommand} of opcode {opcode:#04x} at byte {offset}"
            ),
            DecodeError::InvalidOperand {
                opcode,
                value,
                offset,
            } => write!(
                f,
                "invalid operand {value} for opcode {opcode:#04x} at byte {offset}"
            ),
            DecodeError::Truncated { offset } => write!(f, "command truncated at byte {offset}"),
        }
    }
}

impl core::error::Error for DecodeError {}

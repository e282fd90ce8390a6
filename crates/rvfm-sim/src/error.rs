use rvfm_core::{BufferFull, RecorderError, SubmitError};
use rvfm_registers::components::submission_error_e::SubmissionErrorE;

/// Errors raised by the simulated machine and its host-side helpers.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The RAM arena has no room for an allocation.
    #[error("out of simulated RAM: {requested} bytes requested, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    /// A host pointer does not point into the RAM arena.
    #[error("pointer {addr:#x} is outside simulated RAM")]
    NotInRam { addr: usize },

    /// No register is mapped at the address.
    #[error("no register at {addr:#010x}")]
    UnmappedRegister { addr: u32 },

    /// Write to a read-only register.
    #[error("register {addr:#010x} is read-only")]
    ReadOnlyRegister { addr: u32 },

    /// Read from a write-only register.
    #[error("register {addr:#010x} is write-only")]
    WriteOnlyRegister { addr: u32 },

    /// The wait strategy saw no progress for too long.
    #[error("no progress after {waits} waits")]
    Stalled { waits: usize },

    /// The machine latched a submission error.
    #[error("submission rejected: {0:?}")]
    Rejected(SubmissionErrorE),

    /// A submission error code with no known meaning.
    #[error("submission rejected with status {0:#x}")]
    RejectedUnknown(u32),

    #[error("recorder error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("list overflow: {0}")]
    BufferFull(#[from] BufferFull),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<SubmitError<SimError>> for SimError {
    fn from(e: SubmitError<SimError>) -> Self {
        match e {
            SubmitError::Bus(e) => e,
            SubmitError::SubmissionRejected { status } => match status.error() {
                Some(reason) => SimError::Rejected(reason),
                None => SimError::RejectedUnknown(status.raw()),
            },
        }
    }
}

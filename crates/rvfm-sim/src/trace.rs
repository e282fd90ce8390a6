//! Record of what the simulated coprocessors did.

use core::fmt;

use rvfm_core::{DecodeError, GpuCommand, Interrupt, SpuCommand, SpuQueue};
use rvfm_registers::components::submission_error_e::SubmissionErrorE;

/// A coprocessor queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueId {
    Gpu,
    Spu(SpuQueue),
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueId::Gpu => write!(f, "gpu"),
            QueueId::Spu(queue) => write!(f, "spu{}", queue.index()),
        }
    }
}

/// One observable step of the simulated coprocessors.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A list was copied out of RAM and its fence signalled.
    Accepted {
        queue: QueueId,
        header: u32,
        len: u32,
        fence: u32,
    },
    /// A list was dropped, at submission or when its header was read.
    Rejected {
        queue: QueueId,
        header: u32,
        reason: SubmissionErrorE,
    },
    Gpu { header: u32, command: GpuCommand },
    Spu {
        queue: SpuQueue,
        header: u32,
        command: SpuCommand,
    },
    /// Execution of a list stopped at an undecodable command.
    DecodeFailed {
        queue: QueueId,
        header: u32,
        error: DecodeError,
    },
    /// A command stored into a completion cell.
    FlagWritten {
        queue: QueueId,
        address: u32,
        value: u32,
        interrupt: Option<Interrupt>,
    },
    /// A command targeted an address outside RAM.
    FlagFault { queue: QueueId, address: u32 },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Accepted {
                queue,
                header,
                len,
                fence,
            } => write!(
                f,
                "[{queue}] accepted list {header:#010x} ({len} bytes), fence {fence:#010x}"
            ),
            TraceEvent::Rejected {
                queue,
                header,
                reason,
            } => write!(f, "[{queue}] rejected list {header:#010x}: {reason:?}"),
            TraceEvent::Gpu { command, .. } => write!(f, "[gpu]   {command:?}"),
            TraceEvent::Spu { queue, command, .. } => {
                write!(f, "[spu{}]  {command:?}", queue.index())
            }
            TraceEvent::DecodeFailed {
                queue,
                header,
                error,
            } => write!(f, "[{queue}] list {header:#010x}: {error}"),
            TraceEvent::FlagWritten {
                queue,
                address,
                value,
                interrupt,
            } => {
                write!(f, "[{queue}] flag {address:#010x} <- {value:#x}")?;
                if let Some(irq) = interrupt {
                    write!(f, ", raise {irq:?}")?;
                }
                Ok(())
            }
            TraceEvent::FlagFault { queue, address } => {
                write!(f, "[{queue}] flag write to unmapped {address:#010x} dropped")
            }
        }
    }
}

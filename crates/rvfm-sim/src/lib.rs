//! Host-side model of the rvfm machine.
//!
//! [`SimMachine`] owns a RAM arena and the coprocessor queues and implements
//! [`RegisterBus`](rvfm_core::RegisterBus), so producer code written against
//! [`Hardware`](rvfm_core::Hardware) runs unchanged against it. The
//! coprocessors only advance when the machine is stepped, which
//! [`SimWait`] does from inside the producer's waits.

pub mod config;
pub mod demo;
pub mod error;
pub mod machine;
pub mod memory;
pub mod trace;
pub mod wait;

pub use config::{SimConfig, MAX_LIST_LEN, MAX_QUEUE_DEPTH};
pub use error::SimError;
pub use machine::SimMachine;
pub use memory::SimMemory;
pub use trace::{QueueId, TraceEvent};
pub use wait::SimWait;

//! rvfm hart-side backend: volatile MMIO register access and the wait
//! strategies used while a coprocessor works through a list.
#![no_std]

pub mod hart;
pub mod mmio;
pub mod wait;

pub use hart::{current_hart, hart_from_id};
pub use mmio::{MmioBus, MmioError};
pub use wait::{InterruptWait, SpinWait};

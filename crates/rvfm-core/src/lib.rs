//! Command-list protocol for the rvfm coprocessors.
//!
//! A producer hart records binary commands into a caller-supplied region,
//! freezes them into a [`CommandList`], hands the list to a GPU or SPU queue
//! through a [`Hardware`] capability and gets the region back only after the
//! coprocessor signals that it has consumed the list.
//!
//! ```text
//! OwnedRegion -> Recorder::new -> record/push -> finish -> CommandList
//!     -> Hardware::submit -> InFlight -> reclaim -> OwnedRegion
//! ```
#![no_std]

pub mod command_list;
pub mod completion;
pub mod control;
pub mod error;
pub mod gpu;
pub mod recorder;
pub mod region;
pub mod spu;
pub mod submit;
mod wire;

pub use command_list::{CommandList, Commands};
pub use completion::{CompletionCell, EffectFlag};
pub use control::{Hart, Interrupt, SampleRate};
pub use error::{BufferFull, DecodeError, RecorderError, SubmitError};
pub use gpu::{Gpu, GpuCommand};
pub use recorder::{Coprocessor, Recorder, WireCommand};
pub use region::OwnedRegion;
pub use spu::{Spu, SpuCommand};
pub use submit::{GpuQueue, Hardware, InFlight, SpuQueue, SubmissionTarget, SubmitFailure};
pub use wire::{EncodedCommand, MAX_COMMAND_LEN};

pub use rvfm_hal::{RegisterBus, WaitStrategy};
pub use rvfm_registers::RegisterFile;
pub use rvfm_registers as registers;

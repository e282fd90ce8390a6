//! rvfm memory-mapped register descriptors
#![no_std]
#![allow(clippy::cast_lossless)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::identity_op)]
#![allow(clippy::inline_always)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod access;
pub mod components;
pub mod encode;
pub mod reg;

pub use crate::components::gpu_regs::GpuRegs;
pub use crate::components::intc_regs::IntcRegs;
pub use crate::components::spu_regs::SpuRegs;

/// Base address of the GPU register block.
pub const GPU_BASE: u32 = 0x8001_0000;
/// Base address of the interrupt controller.
pub const INTC_BASE: u32 = 0x8003_0000;
/// Base address of the SPU register block.
pub const SPU_BASE: u32 = 0x8004_0000;

/// First byte of shared RAM as seen by the harts and coprocessors.
pub const RAM_START: u32 = 0x0000_0000;
/// Last addressable byte of shared RAM.
pub const RAM_END: u32 = 0x07FF_FFFF;

/// Complete register file of the machine.
///
/// Built once at start-up and handed to whatever owns hardware access.
/// Relocated maps (mock backends, simulators) use [`RegisterFile::with_bases`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterFile {
    pub gpu: GpuRegs,
    pub spu: SpuRegs,
    pub intc: IntcRegs,
}

impl RegisterFile {
    /// The register file at the machine's fixed addresses.
    #[must_use]
    pub const fn rvfm() -> Self {
        Self::with_bases(GPU_BASE, SPU_BASE, INTC_BASE)
    }

    #[must_use]
    pub const fn with_bases(gpu: u32, spu: u32, intc: u32) -> Self {
        Self {
            gpu: GpuRegs::at(gpu),
            spu: SpuRegs::at(spu),
            intc: IntcRegs::at(intc),
        }
    }
}

impl core::default::Default for RegisterFile {
    fn default() -> Self {
        Self::rvfm()
    }
}

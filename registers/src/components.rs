//! Register block and field enum definitions

pub mod gpu_regs;
pub mod hart_e;
pub mod intc_regs;
pub mod interrupt_e;
pub mod sample_rate_e;
pub mod spu_queue_e;
pub mod spu_regs;
pub mod submission_error_e;

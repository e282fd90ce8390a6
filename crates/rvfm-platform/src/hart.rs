//! Hart identification and low-power idling.

use rvfm_core::Hart;

/// The hart executing this code, or `None` if its `mhartid` names no hart
/// the interrupt controller can target.
pub fn current_hart() -> Option<Hart> {
    hart_from_id(hart_id())
}

/// Map a raw hart id onto an interrupt target.
pub fn hart_from_id(id: u32) -> Option<Hart> {
    u8::try_from(id).ok().and_then(|bits| Hart::from_bits(bits).ok())
}

#[cfg(target_arch = "riscv32")]
fn hart_id() -> u32 {
    let id: u32;
    // SAFETY: reading mhartid has no side effects.
    unsafe { core::arch::asm!("csrr {0}, mhartid", out(reg) id) };
    id
}

#[cfg(not(target_arch = "riscv32"))]
fn hart_id() -> u32 {
    0
}

/// Idle until an interrupt is pending for this hart.
///
/// May return early; callers re-check whatever they were waiting on.
#[cfg(target_arch = "riscv32")]
#[inline(always)]
pub fn wait_for_interrupt() {
    // SAFETY: wfi only suspends the hart until an interrupt is pending.
    unsafe { core::arch::asm!("wfi") }
}

/// Host builds have no `wfi`; spin once instead.
#[cfg(not(target_arch = "riscv32"))]
#[inline(always)]
pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

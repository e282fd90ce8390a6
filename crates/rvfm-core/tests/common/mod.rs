//! Shared mocks for the rvfm-core integration tests.
//!
//! `MockBus` captures (address, value) register writes and returns
//! configurable read values. `MockWait` counts idle calls and can play the
//! coprocessor by signalling a completion cell after a number of waits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rvfm_core::{CompletionCell, Hardware, RegisterBus, RegisterFile, WaitStrategy};

/// Captured register write: (address, value).
pub type WriteRecord = (u32, u32);

#[derive(Debug)]
pub struct MockError;

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MockError")
    }
}

#[derive(Clone, Default, Debug)]
pub struct MockBus {
    writes: Rc<RefCell<Vec<WriteRecord>>>,
    read_values: Rc<RefCell<Vec<WriteRecord>>>,
    fail_writes: Rc<Cell<bool>>,
    fail_translation: Rc<Cell<bool>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a read return value for the given address.
    pub fn set_read_value(&self, addr: u32, value: u32) {
        self.read_values.borrow_mut().push((addr, value));
    }

    pub fn get_writes(&self) -> Vec<WriteRecord> {
        self.writes.borrow().clone()
    }

    pub fn last_write_to(&self, addr: u32) -> Option<u32> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn fail_translation(&self, fail: bool) {
        self.fail_translation.set(fail);
    }
}

impl RegisterBus for MockBus {
    type Error = MockError;

    fn write_register(&mut self, addr: u32, value: u32) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MockError);
        }
        self.writes.borrow_mut().push((addr, value));
        Ok(())
    }

    fn read_register(&mut self, addr: u32) -> Result<u32, Self::Error> {
        let vals = self.read_values.borrow();
        for (a, v) in vals.iter().rev() {
            if *a == addr {
                return Ok(*v);
            }
        }
        Ok(0)
    }

    fn bus_address(&self, ptr: *const u8) -> Result<u32, Self::Error> {
        if self.fail_translation.get() {
            return Err(MockError);
        }
        Ok(ptr as usize as u32)
    }
}

/// Helper: hardware over a mock bus, plus a handle on the captured writes.
pub fn make_hardware() -> (Hardware<MockBus>, MockBus) {
    let bus = MockBus::new();
    let handle = bus.clone();
    (Hardware::new(bus, RegisterFile::rvfm()), handle)
}

#[derive(Debug)]
pub struct MockStall;

/// Wait strategy that counts calls and optionally signals a cell.
pub struct MockWait<'c> {
    pub waits: usize,
    signal: Option<(&'c CompletionCell, usize, u32)>,
    give_up_after: Option<usize>,
}

impl<'c> MockWait<'c> {
    pub fn new() -> Self {
        Self {
            waits: 0,
            signal: None,
            give_up_after: None,
        }
    }

    /// Store `value` into `cell` on the `after`-th wait.
    pub fn signalling(cell: &'c CompletionCell, after: usize, value: u32) -> Self {
        Self {
            signal: Some((cell, after, value)),
            ..Self::new()
        }
    }

    /// Fail with `MockStall` on the `after`-th wait.
    pub fn giving_up(after: usize) -> Self {
        Self {
            give_up_after: Some(after),
            ..Self::new()
        }
    }
}

impl WaitStrategy for MockWait<'_> {
    type Error = MockStall;

    fn wait(&mut self) -> Result<(), Self::Error> {
        self.waits += 1;
        if self.give_up_after == Some(self.waits) {
            return Err(MockStall);
        }
        if let Some((cell, after, value)) = self.signal {
            if self.waits == after {
                cell.signal(value);
            }
        }
        Ok(())
    }
}

//! Register access modes

/// Access mode of a register, as reported by a descriptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// Marker trait for access-mode types.
pub trait Access: Copy {
    const MODE: AccessMode;
}

/// Access modes that allow reading.
pub trait Read: Access {}

/// Access modes that allow writing.
pub trait Write: Access {}

/// Read-only
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct R;

/// Write-only
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct W;

/// Read-write
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RW;

impl Access for R {
    const MODE: AccessMode = AccessMode::ReadOnly;
}
impl Access for W {
    const MODE: AccessMode = AccessMode::WriteOnly;
}
impl Access for RW {
    const MODE: AccessMode = AccessMode::ReadWrite;
}

impl Read for R {}
impl Read for RW {}
impl Write for W {}
impl Write for RW {}

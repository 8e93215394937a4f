//! Per-target register identity.
//!
//! The classifier never looks at raw DWARF register numbers. Every target maps
//! its numbers onto a handful of logical roles once, and that table is the only
//! architecture specific data in the crate.

use core::fmt::Debug;

/// The role a register plays in a frame, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    StackPointer,
    FramePointer,
    /// The register holding the return address on targets that have one.
    LinkRegister,
    /// Any other register, by its DWARF number.
    Other(u16),
}

pub trait Arch: Debug {
    const NAME: &'static str;
    /// DWARF number of the frame pointer.
    const FP: u16;
    /// DWARF number of the stack pointer.
    const SP: u16;
    /// DWARF number of the link register. `None` means the return address lives
    /// on the stack and frames of this target are never classified as standard.
    const LR: Option<u16>;

    fn role(register: u16) -> Register {
        if register == Self::SP {
            Register::StackPointer
        } else if register == Self::FP {
            Register::FramePointer
        } else if Some(register) == Self::LR {
            Register::LinkRegister
        } else {
            Register::Other(register)
        }
    }
}

/// AArch64, see the "DWARF for the Arm 64-bit Architecture" register mapping.
#[derive(Debug, Clone, Copy)]
pub struct Aarch64;

impl Arch for Aarch64 {
    const NAME: &'static str = "aarch64";
    const FP: u16 = 29;
    const SP: u16 = 31;
    const LR: Option<u16> = Some(30);
}

/// 32-bit Arm. r11 is the frame pointer in the AAPCS frame chain.
#[derive(Debug, Clone, Copy)]
pub struct Arm;

impl Arch for Arm {
    const NAME: &'static str = "arm";
    const FP: u16 = 11;
    const SP: u16 = 13;
    const LR: Option<u16> = Some(14);
}

/// x86-64. The return address column (16) is a pseudo register backed by a
/// stack slot, so it maps to `Other(16)`.
#[derive(Debug, Clone, Copy)]
pub struct X86_64;

impl Arch for X86_64 {
    const NAME: &'static str = "x86_64";
    const FP: u16 = 6;
    const SP: u16 = 7;
    const LR: Option<u16> = None;
}

#[cfg(target_arch = "aarch64")]
pub type NativeArch = Aarch64;
#[cfg(target_arch = "arm")]
pub type NativeArch = Arm;
#[cfg(target_arch = "x86_64")]
pub type NativeArch = X86_64;

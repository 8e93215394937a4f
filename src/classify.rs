//! figuring out whether a frame is boring enough to cache.
//!
//! a "standard" frame is one where:
//! - the CFA is some offset off the frame pointer or the stack pointer
//! - the return address sits in the link register
//! - fp, lr and sp are either untouched or saved at `CFA + offset`
//!
//! if that holds, the walker can skip evaluating the rules for it and just do
//! arithmetic. everything else (prologues, epilogues, weird hand written asm)
//! stays [`FrameDescriptor::Unclassified`], which is totally normal and not an
//! error, the walker just takes the slow path.


use crate::arch::Register;
use crate::rules::{bounded, LocationRule, UnwindRuleSet};

/// The shape of the current frame, cached on the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameDescriptor {
    /// No cacheable shape. The walker evaluates the rules for this frame.
    #[default]
    Unclassified,
    Standard(StandardFrame),
    /// A signal trampoline, recognized by the walker itself.
    Sigreturn,
}

impl FrameDescriptor {
    pub fn standard(&self) -> Option<&StandardFrame> {
        match self {
            FrameDescriptor::Standard(frame) => Some(frame),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFrame {
    /// Whether the CFA is computed from the stack pointer rather than the
    /// frame pointer.
    pub cfa_base_is_stack_pointer: bool,
    pub cfa_offset: i32,
    /// `None` if the register is not touched by this frame, `Some(n)` if its
    /// previous value lives at `CFA + n`.
    pub fp_offset: Option<i32>,
    pub lr_offset: Option<i32>,
    pub sp_offset: Option<i32>,
}

impl StandardFrame {
    /// Rebuilds a canonical rule set that classifies to this frame.
    pub fn rule_set(&self) -> UnwindRuleSet {
        fn rule(offset: Option<i32>) -> LocationRule {
            match offset {
                None => LocationRule::SameValue,
                Some(0) => LocationRule::AtCfa,
                Some(offset) => LocationRule::CfaRelative(offset as isize),
            }
        }

        UnwindRuleSet {
            cfa_base: if self.cfa_base_is_stack_pointer {
                Register::StackPointer
            } else {
                Register::FramePointer
            },
            cfa_offset: self.cfa_offset as isize,
            return_address: Register::LinkRegister,
            fp: rule(self.fp_offset),
            lr: rule(self.lr_offset),
            sp: rule(self.sp_offset),
        }
    }
}

/// Decides whether `rules` describe a standard frame.
pub fn classify(rules: &UnwindRuleSet) -> FrameDescriptor {
    match standard_frame(rules) {
        Some(frame) => FrameDescriptor::Standard(frame),
        None => FrameDescriptor::Unclassified,
    }
}

fn standard_frame(rules: &UnwindRuleSet) -> Option<StandardFrame> {
    let cfa_base_is_stack_pointer = match rules.cfa_base {
        Register::StackPointer => true,
        Register::FramePointer => false,
        _ => return None,
    };
    let cfa_offset = bounded(rules.cfa_offset)?;

    if rules.return_address != Register::LinkRegister {
        return None;
    }

    Some(StandardFrame {
        cfa_base_is_stack_pointer,
        cfa_offset,
        fp_offset: rules.fp.cached_offset()?,
        lr_offset: rules.lr.cached_offset()?,
        sp_offset: rules.sp.cached_offset()?,
    })
}

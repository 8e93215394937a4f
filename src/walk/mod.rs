//! the fast path for walking through a cached standard frame.
//!
//! for a [`StandardFrame`] the caller's state is just arithmetic:
//! - `CFA = (SP or FP) + cfa_offset`
//! - a register with no offset keeps its value
//! - a register with offset `n` is loaded from `CFA + n`
//!
//! we only compute where things are. actually reading memory is up to the
//! caller, it knows better which addresses are safe to touch.


use crate::classify::StandardFrame;

/// Register values of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub sp: u64,
    pub fp: u64,
    pub lr: u64,
}

/// How to get a register's value in the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Unchanged,
    Load(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub cfa: u64,
    pub fp: Recovery,
    pub lr: Recovery,
    pub sp: Recovery,
}

impl StandardFrame {
    /// Computes the CFA and the save slots for the caller's registers.
    ///
    /// Returns `None` if any address overflows, in which case the walker has to
    /// take the slow path for this frame.
    pub fn step_plan(&self, regs: &Registers) -> Option<StepPlan> {
        let base = if self.cfa_base_is_stack_pointer {
            regs.sp
        } else {
            regs.fp
        };
        let cfa = base.checked_add_signed(i64::from(self.cfa_offset))?;

        let recover = |offset: Option<i32>| match offset {
            None => Some(Recovery::Unchanged),
            Some(offset) => cfa
                .checked_add_signed(i64::from(offset))
                .map(Recovery::Load),
        };

        let plan = StepPlan {
            cfa,
            fp: recover(self.fp_offset)?,
            lr: recover(self.lr_offset)?,
            sp: recover(self.sp_offset)?,
        };
        trace!(?plan, "standard frame step");
        Some(plan)
    }
}

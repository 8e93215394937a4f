//! Resolved location rules for the registers the classifier looks at.

use crate::arch::Register;

/// Offsets at or beyond this magnitude are treated as a corrupt unwind table.
/// Everything below it also fits the 32-bit offsets of [`StandardFrame`].
///
/// [`StandardFrame`]: crate::classify::StandardFrame
pub const MAX_OFFSET: usize = 1 << 29;

/// Marks a location as invalid in the cached frame record. It can never be
/// cached as a real offset.
pub const INVALID_OFFSET: isize = -1;

/// Where the caller's value of a register can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRule {
    /// Not recoverable from this frame.
    Undefined,
    /// Unchanged from the caller.
    SameValue,
    /// Saved exactly at the CFA.
    AtCfa,
    /// Saved in memory at `CFA + N`.
    CfaRelative(isize),
    /// Copied into another register.
    InRegister(Register),
    /// Produced by an expression, a `val_offset` rule or an architectural rule.
    Computed,
}

impl LocationRule {
    /// The value a standard frame record stores for this rule.
    ///
    /// `None` if the rule cannot be cached, `Some(None)` if the register is left
    /// alone by the frame, `Some(Some(n))` if it is saved at `CFA + n`.
    pub fn cached_offset(self) -> Option<Option<i32>> {
        match self {
            LocationRule::Undefined | LocationRule::SameValue => Some(None),
            LocationRule::AtCfa => Some(Some(0)),
            LocationRule::CfaRelative(INVALID_OFFSET) => None,
            LocationRule::CfaRelative(offset) => bounded(offset).map(Some),
            LocationRule::InRegister(_) | LocationRule::Computed => None,
        }
    }
}

pub(crate) fn bounded(offset: isize) -> Option<i32> {
    if offset.unsigned_abs() < MAX_OFFSET {
        i32::try_from(offset).ok()
    } else {
        None
    }
}

/// The rules computed by the CFI interpreter for one instruction pointer,
/// addressed by logical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwindRuleSet {
    /// Register the CFA is computed from.
    pub cfa_base: Register,
    pub cfa_offset: isize,
    /// Column holding the return address.
    pub return_address: Register,
    pub fp: LocationRule,
    pub lr: LocationRule,
    pub sp: LocationRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_not_cacheable() {
        assert_eq!(LocationRule::CfaRelative(-1).cached_offset(), None);
        assert_eq!(LocationRule::CfaRelative(-2).cached_offset(), Some(Some(-2)));
    }

    #[test]
    fn offset_bound() {
        let max = MAX_OFFSET as isize;
        assert_eq!(LocationRule::CfaRelative(max).cached_offset(), None);
        assert_eq!(LocationRule::CfaRelative(-max).cached_offset(), None);
        assert_eq!(
            LocationRule::CfaRelative(max - 1).cached_offset(),
            Some(Some((max - 1) as i32))
        );
        assert_eq!(LocationRule::CfaRelative(isize::MIN).cached_offset(), None);
    }

    #[test]
    fn unsaved_registers() {
        assert_eq!(LocationRule::Undefined.cached_offset(), Some(None));
        assert_eq!(LocationRule::SameValue.cached_offset(), Some(None));
        assert_eq!(LocationRule::AtCfa.cached_offset(), Some(Some(0)));
        assert_eq!(
            LocationRule::InRegister(Register::FramePointer).cached_offset(),
            None
        );
        assert_eq!(LocationRule::Computed.cached_offset(), None);
    }
}

//! this is where the DWARF call frame information interpreter hands us its stuff.
//!
//! the interpreter (which lives elsewhere, and is basically a whole little
//! programming language) gives us one row of the CFI table for the current
//! instruction pointer:
//! ```text
//! LOC CFA R0 R1 ... RN
//! ```
//! we only care about a few of those columns, so we pick them out and turn the
//! DWARF register numbers into roles the classifier understands.
//!
//! See https://dwarfstd.org/doc/DWARF5.pdf §6.4 Call Frame Information if more
//! information is desired.


use alloc::{format, string::String};

use crate::arch::{Arch, Register};
use crate::rules::{LocationRule, UnwindRuleSet};

/// The register state handed to us is malformed. This is a bug in the caller.
#[derive(Debug, PartialEq, Eq)]
pub struct Error(String);

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An unevaluated DWARF expression. We never look inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRule {
    /// A register that has this rule has no recoverable value in the previous
    /// frame. (By convention, it is not preserved by a callee.)
    Undefined,
    /// This register has not been modified from the previous frame.
    /// (By convention, it is preserved by the callee, but the callee has not
    /// modified it.)
    SameValue,
    /// The previous value of this register is saved at the address CFA+N where
    /// CFA is the current CFA value and N is a signed offset
    Offset(isize),
    /// The previous value of this register is the value CFA+N where CFA is the
    /// current CFA value and N is a signed offset.
    ValOffset(isize),
    /// The previous value of this register is stored in another register
    /// numbered R.
    Register(u16),
    /// The previous value of this register is located at the address produced
    /// by executing the DWARF expression E.
    Expression(Expr),
    /// The previous value of this register is the value produced by executing
    /// the DWARF expression E.
    ValExpression(Expr),
    /// The rule is defined externally to this specification by the augmenter.
    Architectural,
}

impl RegisterRule {
    fn location(self, arch_role: impl Fn(u16) -> Register) -> LocationRule {
        match self {
            RegisterRule::Undefined => LocationRule::Undefined,
            RegisterRule::SameValue => LocationRule::SameValue,
            RegisterRule::Offset(0) => LocationRule::AtCfa,
            RegisterRule::Offset(offset) => LocationRule::CfaRelative(offset),
            RegisterRule::Register(register) => LocationRule::InRegister(arch_role(register)),
            RegisterRule::ValOffset(_)
            | RegisterRule::Expression(_)
            | RegisterRule::ValExpression(_)
            | RegisterRule::Architectural => LocationRule::Computed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaRule {
    RegisterAndOffset { register: u16, offset: isize },
    Expression(Expr),
}

/// One resolved row of the CFI table.
#[derive(Debug, Clone, Copy)]
pub struct RegisterState<'a> {
    pub cfa: CfaRule,
    /// The CIE's return address column.
    pub return_address_column: u16,
    /// Rules indexed by DWARF register number.
    pub rules: &'a [RegisterRule],
}

impl<'a> RegisterState<'a> {
    fn column(&self, register: u16) -> Result<RegisterRule> {
        self.rules.get(usize::from(register)).copied().ok_or_else(|| {
            Error(format!(
                "no rule for register {register}, only {} columns present",
                self.rules.len()
            ))
        })
    }

    /// Picks out the logical slots for `A`.
    ///
    /// Returns `Ok(None)` if the CFA is computed by an expression, which is
    /// never a standard frame.
    pub fn rule_set<A: Arch>(&self) -> Result<Option<UnwindRuleSet>> {
        let (cfa_base, cfa_offset) = match self.cfa {
            CfaRule::RegisterAndOffset { register, offset } => (A::role(register), offset),
            CfaRule::Expression(_) => return Ok(None),
        };

        let lr = match A::LR {
            Some(lr) => self.column(lr)?.location(A::role),
            None => LocationRule::Undefined,
        };

        Ok(Some(UnwindRuleSet {
            cfa_base,
            cfa_offset,
            return_address: A::role(self.return_address_column),
            fp: self.column(A::FP)?.location(A::role),
            lr,
            sp: self.column(A::SP)?.location(A::role),
        }))
    }
}

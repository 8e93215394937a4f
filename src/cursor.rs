use core::marker::PhantomData;

use crate::arch::Arch;
use crate::classify::{classify, FrameDescriptor};
use crate::dwarf::{RegisterState, Result};
use crate::rules::UnwindRuleSet;

/// One in-progress stack walk.
///
/// The cursor owns the cached [`FrameDescriptor`] for the frame it currently
/// sits on. It is not meant to be shared between threads while walking, but
/// separate cursors are fully independent.
#[derive(Debug)]
pub struct Cursor<A: Arch> {
    ip: u64,
    cfa: u64,
    frame: FrameDescriptor,
    arch: PhantomData<A>,
}

impl<A: Arch> Cursor<A> {
    pub fn new(ip: u64, cfa: u64) -> Self {
        Self {
            ip,
            cfa,
            frame: FrameDescriptor::Unclassified,
            arch: PhantomData,
        }
    }

    pub fn ip(&self) -> u64 {
        self.ip
    }

    pub fn cfa(&self) -> u64 {
        self.cfa
    }

    pub fn frame(&self) -> &FrameDescriptor {
        &self.frame
    }

    /// Classifies the current frame from the interpreter's register state and
    /// caches the result.
    ///
    /// Errors only if `state` lacks a column the target needs.
    #[instrument(level = "trace", skip_all, fields(arch = A::NAME, ip = self.ip))]
    pub fn stash_frame(&mut self, state: &RegisterState<'_>) -> Result<()> {
        trace!(
            cfa = ?state.cfa,
            ra = state.return_address_column,
            fp = ?state.rules.get(usize::from(A::FP)),
            lr = ?A::LR.and_then(|lr| state.rules.get(usize::from(lr))),
            sp = ?state.rules.get(usize::from(A::SP)),
            "register state"
        );

        // nothing from an earlier call may survive a rejected state
        if self.frame != FrameDescriptor::Sigreturn {
            self.frame = FrameDescriptor::Unclassified;
        }

        match state.rule_set::<A>()? {
            Some(rules) => self.stash_rules(&rules),
            None => debug!("unusual frame, CFA is an expression"),
        }
        Ok(())
    }

    /// Classifies the current frame from rules that are already mapped to
    /// logical roles.
    #[instrument(level = "trace", skip_all, fields(ip = self.ip))]
    pub fn stash_rules(&mut self, rules: &UnwindRuleSet) {
        if self.frame == FrameDescriptor::Sigreturn {
            debug!("sigreturn frame, not classifying");
            return;
        }

        trace!(?rules);
        self.frame = classify(rules);

        match &self.frame {
            FrameDescriptor::Standard(frame) => debug!(?frame, "standard frame"),
            _ => debug!("unusual frame"),
        }
    }

    /// Records that the walker found a signal trampoline at this frame.
    pub fn mark_sigreturn(&mut self) {
        self.frame = FrameDescriptor::Sigreturn;
    }

    /// Moves to the caller's frame. Whatever was cached for the old frame is
    /// dropped.
    pub fn advance(&mut self, ip: u64, cfa: u64) {
        trace!(ip, cfa, "advancing cursor");
        self.ip = ip;
        self.cfa = cfa;
        self.frame = FrameDescriptor::Unclassified;
    }
}

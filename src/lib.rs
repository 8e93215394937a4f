//! Frame shape classification for a DWARF unwinder.
//!
//! After the CFI interpreter has resolved the rules for the current
//! instruction pointer, [`Cursor::stash_frame`] checks whether the frame has
//! the standard shape and caches a small [`StandardFrame`] record. Walking
//! through such frames is then plain arithmetic (see [`walk`]) instead of a
//! full rule evaluation.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate tracing;

pub mod arch;
pub mod classify;
pub mod cursor;
pub mod dwarf;
pub mod rules;
pub mod walk;

pub use classify::{classify, FrameDescriptor, StandardFrame};
pub use cursor::Cursor;
pub use rules::{LocationRule, UnwindRuleSet};

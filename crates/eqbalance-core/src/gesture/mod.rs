//! Drag gestures.
//!
//! A gesture starts on pointer-down over a term element and is driven by the
//! controller's tick until pointer-up:
//! - `InitialTouch` until the term leaves the equation body
//! - `Separated` while it is carried around, with a drop cursor
//! - `MergeCandidate` while it hovers a term it can combine with
//! - one of `TouchAborted`, `Committed` or `MergeCommitted` on release

mod mover;
mod state;

pub use mover::Mover;
pub use state::{GesturePhase, MoveKind};

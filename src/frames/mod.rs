//! Activation record layout.
//!
//! Gives every function a [`frame::Frame`] and every variable, parameter and
//! type definition an [`access::Access`] describing where its value lives:
//!
//! - Top-level definitions are globals addressed by a label
//! - Parameters grow upward from the frame pointer, after the static link
//! - Locals grow downward from the frame pointer
//!
//! Static levels count function nesting: top-level functions are at level 1.

pub mod access;
pub mod frame;
pub mod frame_evaluator;

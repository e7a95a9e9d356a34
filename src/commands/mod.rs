//! Command-line command handlers for duskr.
//!
//! One-shot CLI commands, each in its own submodule: `apply` evaluates and
//! applies Night Light state once, `status` prints the current decision
//! without actuating, and `set` updates configuration fields.

pub mod apply;
pub mod set;
pub mod status;

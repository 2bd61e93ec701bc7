//! Detection rules for the consistency checker.
//!
//! Each rule is a pure function over exactly the data it needs; the engine
//! wires them together and owns all I/O.

pub mod hardcoded;
pub mod invalid_key;
pub mod missing;
pub mod orphan;
pub mod placeholder;

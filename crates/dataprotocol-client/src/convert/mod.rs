//! Pure translations between host-domain values and wire shapes.
//!
//! Most calls pass their params through untouched; only the call sites with a
//! real difference between the two shapes have a function here.

pub mod from_wire;
pub mod to_wire;

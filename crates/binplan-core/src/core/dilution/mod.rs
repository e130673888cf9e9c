//! Volume Calculator: dilution policies and the per-well sample/diluent split.

pub mod policy;
pub mod volume;

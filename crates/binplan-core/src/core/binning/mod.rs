//! Amount/Bin Classifier.
//!
//! Bins are either configured as a numeric [`table::BinTable`] (continuous
//! classification of amounts) or derived from the distinct discrete values
//! observed on the wells. Either way classification is a stable partition:
//! wells that share a bin keep their column-major order.

pub mod classify;
pub mod table;

//! Destination Layout Planner.
//!
//! [`binner::layout`] places bins column-major on the destination plate. When
//! every bin can start on a fresh column the layout is padded, which keeps bins
//! visually grouped for operators; otherwise it falls back to a gapless,
//! compressed stream. [`stamp::stamp`] covers unbinned transfers where each
//! well keeps its coordinate.

pub mod binner;
pub mod stamp;

//! # Workflows Module
//!
//! Top-level entry points. A workflow validates its input, runs each core
//! component in turn and assembles the final result; it either returns a
//! complete plan or an error, never a partial plan.
//!
//! - **Planning Workflow** ([`plan`]) - volumes, bins, destinations and QC
//!   concentrations for one batch of wells.

pub mod plan;

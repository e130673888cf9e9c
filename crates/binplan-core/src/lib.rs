//! # binplan Core Library
//!
//! A deterministic planning engine for laboratory plate transfers: it computes
//! sample and diluent volumes for source wells, groups the wells into ordered
//! bins, lays them out column-major on a destination plate and derives the
//! resulting destination concentrations for QC.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless models (`WellCoordinate`,
//!   `ColumnMajorWells`, `PlateDimensions`) and the pure components: volume
//!   calculation, bin classification, destination layout and QC derivation.
//!
//! - **[`engine`]: Configuration and Plumbing.** The validated `PlanConfig` and
//!   its builder, the `EngineError` surfaced to callers, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** [`workflows::plan::run`] ties the
//!   components together into a single planning call returning a `PlanResult`.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Engine Module
//!
//! Configuration, errors and progress reporting shared by the planning
//! workflows.
//!
//! - **Configuration** ([`config`]) - `PlanConfig`, `BinningMode` and the builder
//! - **Error Handling** ([`error`]) - `EngineError` and its conversions
//! - **Progress Monitoring** ([`progress`]) - phase and step events for callers

pub mod config;
pub mod error;
pub mod progress;

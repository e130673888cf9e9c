//! # Core Module
//!
//! Stateless data models and the pure planning components. Nothing in here
//! performs I/O or keeps state between calls.
//!
//! - **Models** ([`models`]) - well coordinates, wells, plate dimensions
//! - **Volume Calculator** ([`dilution`]) - dilution policies and sample/diluent splits
//! - **Amount/Bin Classifier** ([`binning`]) - bin tables and stable classification
//! - **Destination Layout Planner** ([`layout`]) - padded, compressed and stamp placement
//! - **Concentration/QC Deriver** ([`qc`]) - destination concentrations and QC records

pub mod binning;
pub mod dilution;
pub mod layout;
pub mod models;
pub mod qc;

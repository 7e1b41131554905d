#![doc = "harness-lens-core: core logic library for harness-lens."]

//! This crate contains all data models, the Harness NextGen API contract and
//! the aggregation pipelines for harness-lens. The CLI surface lives in the
//! root binary crate.
//!
//! # Usage
//! Add this as a dependency for the API client, config diffing, pipeline
//! census and report rendering code.

pub mod census;
pub mod client;
pub mod contract;
pub mod diff;
pub mod report;
pub mod settings;
pub mod tags;

//! Pipeline orchestration for the walkscore enrichment run.
//!
//! This crate ties together loading, fetching, extraction, and reporting
//! into the end-to-end [`pipeline::run`].

pub mod loader;
pub mod pipeline;
pub mod report;

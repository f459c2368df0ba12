//! oncoclass-mutations: mutation-level inputs for driver gene classification.
//!
//! This crate holds the reference gene lists (oncogenes, tumor suppressors,
//! significantly mutated genes), a small protein HGVS parser, a reader for
//! the tab-separated mutation table export, and the descriptive statistics
//! computed from it: per-gene positional entropy and reference list coverage.
pub mod amino_acid;
pub mod coverage;
pub mod entropy;
pub mod error;
pub mod records;
pub mod reference;

//! Pure condition evaluation and scenario checking (no IO).
//!
//! Input: a parsed template document and scenarios constructed elsewhere.
//! Output: check results, verdict, and summary data.

#![forbid(unsafe_code)]

pub mod constraints;
pub mod error;
pub mod eval;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod policy;
pub mod registry;
pub mod report;
pub mod scenario;
pub mod value;

mod engine;
pub mod checks;

pub use engine::evaluate_suite;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

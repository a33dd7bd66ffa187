//! Stable DTOs and IDs used across the condeval workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    CheckCounts, CheckResult, CondevalReport, ReportEnvelope, ScenarioReport, Severity, SuiteData,
    ToolMeta, Verdict, SCHEMA_REPORT_V1,
};

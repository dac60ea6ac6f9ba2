//! Runtime diagnostics.
//!
//! - [`validity`]: per-value guard policies and whole-field population scans

pub mod validity;

pub use validity::{
    FailFast, FieldStatus, FieldWarning, GuardMode, Unchecked, ValidityPolicy, is_valid,
    scan_populations,
};

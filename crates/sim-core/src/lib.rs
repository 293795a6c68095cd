#![deny(warnings)]

//! Core domain models and invariants for Throne.
//!
//! This crate defines the rules bundle and the reign state carried between
//! years, the shared `key=value` text codec, and validation helpers that
//! guarantee both are usable before a reign is played.

use std::fmt::Display;
use thiserror::Error;

pub mod kv;
mod params;
mod state;

pub use kv::{parse_kv, KvMap, KvWriter};
pub use params::{ReignParams, ScoreThresholds, TierBound};
pub use state::{ReignState, YearPhase, YearReport};

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required key was absent from a key/value source.
    #[error("missing key: {0}")]
    MissingKey(String),
    /// A value could not be parsed as the expected type.
    #[error("invalid value for {key}: {raw:?}")]
    Unparsable { key: String, raw: String },
    /// A value parsed but lies outside its permitted range.
    #[error("{field} must be {rule}, got {value}")]
    OutOfRange {
        field: &'static str,
        rule: &'static str,
        value: String,
    },
}

/// Fail with [`ValidationError::OutOfRange`] unless `ok` holds.
///
/// Callers phrase `ok` positively so that NaN inputs fail the check.
pub(crate) fn ensure(
    ok: bool,
    field: &'static str,
    rule: &'static str,
    value: impl Display,
) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            rule,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_reports_field_and_rule() {
        let err = ensure(false, "population", "> 0", 0).unwrap_err();
        assert_eq!(err.to_string(), "population must be > 0, got 0");
        assert!(ensure(true, "population", "> 0", 5).is_ok());
    }

    #[test]
    fn nan_fails_positive_checks() {
        let x = f64::NAN;
        assert!(ensure(x >= 0.0, "grain", ">= 0", x).is_err());
    }
}

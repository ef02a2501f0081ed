//! Validator configuration
//!
//! Options are fixed when the validator is built and never change
//! during validation.
//! - Value coercion is off by default
//! - Date-time coercion is off by default; `date-time` strings pass
//!   through unchanged until a coercer is configured

use std::sync::Arc;

use super::format::{DateTimeCoercer, Rfc3339Coercer};
use crate::observability::Severity;

/// Configuration for a [`SchemaValidator`](super::SchemaValidator).
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Coerce string inputs into integers, numbers and booleans when the
    /// schema declares those types.
    pub coerce_value: bool,
    /// Target for `format: date-time` coercion.
    pub datetime_coercer: Option<Arc<dyn DateTimeCoercer>>,
    /// Lowest severity that is logged.
    pub log_threshold: Severity,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            coerce_value: false,
            datetime_coercer: None,
            log_threshold: Severity::Warn,
        }
    }
}

impl ValidatorOptions {
    /// Create options with RFC 3339 date-time coercion enabled.
    pub fn with_datetime_coercion() -> Self {
        Self::default().datetime_coercer(Arc::new(Rfc3339Coercer))
    }

    /// Use `coercer` as the date-time coercion target.
    pub fn datetime_coercer(mut self, coercer: Arc<dyn DateTimeCoercer>) -> Self {
        self.datetime_coercer = Some(coercer);
        self
    }

    /// Enable or disable string → scalar coercion.
    pub fn coerce_values(mut self, enabled: bool) -> Self {
        self.coerce_value = enabled;
        self
    }

    /// Log events at `threshold` and above.
    pub fn logging_at(mut self, threshold: Severity) -> Self {
        self.log_threshold = threshold;
        self
    }

    /// Check if date-time coercion is enabled.
    pub fn coerces_date_time(&self) -> bool {
        self.datetime_coercer.is_some()
    }
}

//! Observability for aeroschema
//!
//! Structured JSON logging only. Observability is read-only: it never
//! changes a validation outcome and holds no state beyond the logger's
//! threshold.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

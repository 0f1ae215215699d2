//! Core library for the `qweather` CLI.
//!
//! This crate defines:
//! - Configuration & credential resolution
//! - The transport seam over the provider's HTTP APIs
//! - The report dispatcher and per-report projections
//! - The error taxonomy shared with the binary
//!
//! It is used by `qweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod locale;
pub mod model;
pub mod report;
pub mod transport;

pub use config::{Config, Credential};
pub use dispatch::{Dispatcher, dispatch_to_json};
pub use error::QWeatherError;
pub use locale::{Lang, Locale, UnitSystem};
pub use model::{ForecastRange, IndexKind, IndexSelector, Location, Query, Report, ReportKind};
pub use report::NormalizedReport;
pub use transport::{HttpTransport, Transport};

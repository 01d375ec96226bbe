//! Energy Dashboard library
//!
//! Localized labels, metering data loading and the dashboard summary,
//! exposed for the CLI and for tests.

pub mod cache;
pub mod core;
pub mod dashboard;
pub mod fetch;
pub mod i18n;

//! Core module - Configuration, errors, and common types

mod config;
mod error;
mod types;

pub use config::{Config, Credentials, DataConfig, EicNickname, GeneralConfig};
pub use error::{Error, Result};
pub use types::{DashboardData, Interval, MeterData, Series, Summary};

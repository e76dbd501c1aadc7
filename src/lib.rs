//! Speedtest Collector Library
//!
//! This library provides components for running an external speed-test
//! utility and recording the result as a time-series point in InfluxDB.

pub mod collector;
pub mod config;
pub mod errors;
pub mod influx;
pub mod measurement;
pub mod provision;
pub mod speedtest;

pub use collector::SpeedtestCollector;
pub use config::Config;
pub use errors::{CollectorError, Result};
pub use influx::{DataPoint, InfluxClient};
pub use measurement::SpeedMeasurement;
pub use speedtest::SpeedtestRunner;

//! Speed measurement model and JSON parsing

use crate::errors::{CollectorError, Result};
use serde::Deserialize;

/// One fully-populated speed measurement, ready to be written as a point.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedMeasurement {
    /// Download bandwidth in bytes per second
    pub download: f64,
    /// Upload bandwidth in bytes per second
    pub upload: f64,
    /// Ping latency in milliseconds
    pub ping: f64,
    /// Ping jitter in milliseconds
    pub jitter: f64,
    /// Packet loss percentage
    pub packet_loss: f64,
    pub server_name: String,
    pub server_location: String,
}

/// Wire shape of `speedtest --format=json` output, reduced to the
/// fields the collector records. Every field is required: a report with
/// anything missing or non-numeric is rejected as a whole, so a partial
/// measurement is never written.
#[derive(Debug, Deserialize)]
struct SpeedtestReport {
    download: Throughput,
    upload: Throughput,
    ping: Ping,
    #[serde(rename = "packetLoss")]
    packet_loss: f64,
    server: Server,
}

#[derive(Debug, Deserialize)]
struct Throughput {
    bandwidth: f64,
}

#[derive(Debug, Deserialize)]
struct Ping {
    latency: f64,
    jitter: f64,
}

#[derive(Debug, Deserialize)]
struct Server {
    name: String,
    location: String,
}

impl SpeedMeasurement {
    /// Parse the JSON emitted by the speedtest utility.
    pub fn from_json(output: &str) -> Result<Self> {
        let report: SpeedtestReport = serde_json::from_str(output)
            .map_err(|e| CollectorError::Speedtest(format!("unusable speedtest output: {}", e)))?;

        Ok(Self {
            download: report.download.bandwidth,
            upload: report.upload.bandwidth,
            ping: report.ping.latency,
            jitter: report.ping.jitter,
            packet_loss: report.packet_loss,
            server_name: report.server.name,
            server_location: report.server.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = r#"{
        "type": "result",
        "timestamp": "2025-01-01T10:30:45Z",
        "download": {"bandwidth": 125000000.0, "bytes": 1500000000, "elapsed": 12000},
        "upload": {"bandwidth": 20000000.0, "bytes": 240000000, "elapsed": 12000},
        "ping": {"latency": 12.5, "jitter": 1.2},
        "packetLoss": 0.0,
        "isp": "Example ISP",
        "server": {"id": 1234, "name": "ISP-A", "location": "CityX", "country": "Nowhere"}
    }"#;

    #[test]
    fn test_parse_full_report() {
        let measurement = SpeedMeasurement::from_json(FULL_REPORT).unwrap();

        assert_eq!(measurement.download, 125000000.0);
        assert_eq!(measurement.upload, 20000000.0);
        assert_eq!(measurement.ping, 12.5);
        assert_eq!(measurement.jitter, 1.2);
        assert_eq!(measurement.packet_loss, 0.0);
        assert_eq!(measurement.server_name, "ISP-A");
        assert_eq!(measurement.server_location, "CityX");
    }

    #[test]
    fn test_integer_bandwidth_converts_to_float() {
        let json = r#"{
            "download": {"bandwidth": 125000000},
            "upload": {"bandwidth": 20000000},
            "ping": {"latency": 12, "jitter": 1},
            "packetLoss": 0,
            "server": {"name": "ISP-A", "location": "CityX"}
        }"#;

        let measurement = SpeedMeasurement::from_json(json).unwrap();
        assert_eq!(measurement.download, 125000000.0);
        assert_eq!(measurement.packet_loss, 0.0);
    }

    #[test]
    fn test_missing_numeric_field_rejected() {
        // No packetLoss: the whole measurement is discarded.
        let json = r#"{
            "download": {"bandwidth": 125000000.0},
            "upload": {"bandwidth": 20000000.0},
            "ping": {"latency": 12.5, "jitter": 1.2},
            "server": {"name": "ISP-A", "location": "CityX"}
        }"#;

        let err = SpeedMeasurement::from_json(json).unwrap_err();
        assert!(matches!(err, CollectorError::Speedtest(_)));
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let json = r#"{
            "download": {"bandwidth": "fast"},
            "upload": {"bandwidth": 20000000.0},
            "ping": {"latency": 12.5, "jitter": 1.2},
            "packetLoss": 0.0,
            "server": {"name": "ISP-A", "location": "CityX"}
        }"#;

        assert!(SpeedMeasurement::from_json(json).is_err());
    }

    #[test]
    fn test_empty_output_rejected() {
        assert!(SpeedMeasurement::from_json("").is_err());
        assert!(SpeedMeasurement::from_json("not json").is_err());
    }
}

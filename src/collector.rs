//! Measurement-and-write orchestration

use crate::errors::Result;
use crate::influx::{DataPoint, InfluxClient};
use crate::measurement::SpeedMeasurement;
use crate::speedtest::SpeedtestRunner;
use tracing::info;

/// Measurement name every point is written under.
pub const MEASUREMENT_NAME: &str = "internet_speed";

/// Fixed host tag identifying this probe in the store.
pub const HOST_TAG: &str = "speed_test_2";

/// Runs one speed test and writes the result as a single point.
pub struct SpeedtestCollector {
    runner: SpeedtestRunner,
    client: InfluxClient,
    database: String,
}

impl SpeedtestCollector {
    pub fn new(runner: SpeedtestRunner, client: InfluxClient, database: String) -> Self {
        Self {
            runner,
            client,
            database,
        }
    }

    /// One measurement-and-write cycle.
    ///
    /// Any failure in here is best-effort territory: the caller logs it
    /// and exits cleanly so a single bad run does not fail the
    /// recurring job. Nothing is written unless the measurement parsed
    /// completely.
    pub async fn collect_and_write(&self) -> Result<SpeedMeasurement> {
        let measurement = self.runner.run().await?;

        info!(
            "Measured {} via {} ({}): download {} B/s, upload {} B/s, ping {} ms",
            MEASUREMENT_NAME,
            measurement.server_name,
            measurement.server_location,
            measurement.download,
            measurement.upload,
            measurement.ping
        );

        let point = build_point(&measurement);
        self.client.write_point(&self.database, &point).await?;

        Ok(measurement)
    }
}

/// Build the point for one measurement: fixed host tag, the measured
/// server's name and location as tags, the five numeric values as fields.
pub fn build_point(measurement: &SpeedMeasurement) -> DataPoint {
    DataPoint::new(MEASUREMENT_NAME)
        .with_tag("host", HOST_TAG)
        .with_tag("server", &measurement.server_name)
        .with_tag("location", &measurement.server_location)
        .with_field("download", measurement.download)
        .with_field("upload", measurement.upload)
        .with_field("ping", measurement.ping)
        .with_field("jitter", measurement.jitter)
        .with_field("packet_loss", measurement.packet_loss)
}

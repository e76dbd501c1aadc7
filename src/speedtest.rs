//! External speed-test invocation

use crate::errors::{CollectorError, Result};
use crate::measurement::SpeedMeasurement;
use tokio::process::Command;
use tracing::{debug, info};

/// Path of the speed-test binary invoked in production.
pub const SPEEDTEST_BIN: &str = "/usr/bin/speedtest";

/// Runs the external speed-test utility and parses its JSON output.
///
/// The command is awaited without a deadline; a wedged utility blocks
/// the run until the external scheduler gives up on it.
#[derive(Debug, Clone)]
pub struct SpeedtestRunner {
    program: String,
    args: Vec<String>,
}

impl SpeedtestRunner {
    /// Runner for the fixed production command `speedtest --format=json`.
    pub fn new() -> Self {
        Self::with_command(SPEEDTEST_BIN, &["--format=json"])
    }

    /// Runner over an arbitrary command producing speedtest-shaped JSON.
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Execute the speed test once and parse the result.
    pub async fn run(&self) -> Result<SpeedMeasurement> {
        info!("Running speed test: {} {}", self.program, self.args.join(" "));

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| {
                CollectorError::Speedtest(format!("failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollectorError::Speedtest(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Speed test produced {} bytes of output", stdout.len());

        SpeedMeasurement::from_json(&stdout)
    }
}

impl Default for SpeedtestRunner {
    fn default() -> Self {
        Self::new()
    }
}

//! CLI configuration for the collector

use clap::Parser;

/// Runs one speed test and records the result in InfluxDB.
///
/// Intended to be triggered by an external scheduler (cron, systemd timer);
/// the process performs a single measurement-and-write cycle and exits.
#[derive(Debug, Clone, Parser)]
#[command(name = "speedtest_collector", version)]
pub struct Config {
    /// The username of the InfluxDB user
    #[arg(value_name = "influx-user")]
    pub influx_user: String,

    /// The password of the InfluxDB user
    #[arg(value_name = "influx-pass")]
    pub influx_pass: String,

    /// The InfluxDB host
    #[arg(long, default_value = "localhost")]
    pub influx_host: String,

    /// The InfluxDB port
    #[arg(long, default_value_t = 8086)]
    pub influx_port: u16,

    /// The InfluxDB database name
    #[arg(long, default_value = "internetspeed")]
    pub influx_db: String,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.influx_user.is_empty() {
            return Err("influx-user cannot be empty".to_string());
        }

        if self.influx_pass.is_empty() {
            return Err("influx-pass cannot be empty".to_string());
        }

        if self.influx_host.is_empty() {
            return Err("influx-host cannot be empty".to_string());
        }

        if self.influx_port == 0 {
            return Err("influx-port must be greater than 0".to_string());
        }

        if self.influx_db.is_empty() {
            return Err("influx-db cannot be empty".to_string());
        }

        Ok(())
    }

    /// Base URL of the InfluxDB HTTP API
    pub fn influx_url(&self) -> String {
        format!("http://{}:{}", self.influx_host, self.influx_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["speedtest_collector", "admin", "secret"]).unwrap();

        assert_eq!(config.influx_user, "admin");
        assert_eq!(config.influx_pass, "secret");
        assert_eq!(config.influx_host, "localhost");
        assert_eq!(config.influx_port, 8086);
        assert_eq!(config.influx_db, "internetspeed");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flag_overrides() {
        let config = Config::try_parse_from([
            "speedtest_collector",
            "admin",
            "secret",
            "--influx-host",
            "metrics.example.com",
            "--influx-port",
            "9999",
            "--influx-db",
            "netperf",
        ])
        .unwrap();

        assert_eq!(config.influx_host, "metrics.example.com");
        assert_eq!(config.influx_port, 9999);
        assert_eq!(config.influx_db, "netperf");
        assert_eq!(config.influx_url(), "http://metrics.example.com:9999");
    }

    #[test]
    fn test_missing_positionals_rejected() {
        assert!(Config::try_parse_from(["speedtest_collector"]).is_err());
        assert!(Config::try_parse_from(["speedtest_collector", "admin"]).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = Config::try_parse_from(["speedtest_collector", "admin", "secret"]).unwrap();
        config.influx_db = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::try_parse_from(["speedtest_collector", "admin", "secret"]).unwrap();
        config.influx_port = 0;
        assert!(config.validate().is_err());
    }
}

//! InfluxDB 1.x HTTP client and line-protocol encoding

use crate::errors::{CollectorError, Result};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One tagged, fielded data point in the InfluxDB line protocol.
///
/// No explicit timestamp is carried; the store assigns the write time.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, f64)>,
}

impl DataPoint {
    pub fn new(measurement: &str) -> Self {
        Self {
            measurement: measurement.to_string(),
            tags: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_field(mut self, key: &str, value: f64) -> Self {
        self.fields.push((key.to_string(), value));
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn fields(&self) -> &[(String, f64)] {
        &self.fields
    }

    /// Encode as a single line-protocol line:
    /// `measurement,tag=value,... field=value,...`
    pub fn line_protocol(&self) -> String {
        let mut line = escape_measurement(&self.measurement);

        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(&escape_tag(key));
            line.push('=');
            line.push_str(&escape_tag(value));
        }

        line.push(' ');

        let fields = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}={}", escape_tag(key), value))
            .collect::<Vec<_>>()
            .join(",");
        line.push_str(&fields);

        line
    }
}

/// Escape commas and spaces in a measurement name.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Escape commas, equals signs and spaces in tag keys, tag values and
/// field keys.
fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}

/// Minimal client for the InfluxDB 1.x HTTP API: database listing and
/// creation, retention policy changes, and single-point writes.
#[derive(Debug, Clone)]
pub struct InfluxClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl InfluxClient {
    pub fn new(base_url: String, username: String, password: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(format!("speedtest_collector/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CollectorError::Http)?;

        Ok(Self {
            client,
            base_url,
            username,
            password,
        })
    }

    /// Names of all databases visible to the configured user.
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        let body = self.query("SHOW DATABASES").await?;

        let names = body["results"][0]["series"][0]["values"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row[0].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(names)
    }

    pub async fn create_database(&self, name: &str) -> Result<()> {
        self.query(&format!("CREATE DATABASE \"{}\"", name)).await?;
        Ok(())
    }

    /// Set the duration of the database's default retention policy.
    /// `duration` is an InfluxQL duration literal such as `7d`.
    pub async fn alter_retention_policy(&self, database: &str, duration: &str) -> Result<()> {
        self.query(&format!(
            "ALTER RETENTION POLICY \"autogen\" ON \"{}\" DURATION {}",
            database, duration
        ))
        .await?;
        Ok(())
    }

    /// Write a single point into the given database. The store assigns
    /// the timestamp.
    pub async fn write_point(&self, database: &str, point: &DataPoint) -> Result<()> {
        let url = format!("{}/write", self.base_url);
        let line = point.line_protocol();

        debug!("Writing point to {}: {}", database, line);

        let response = self
            .client
            .post(&url)
            .query(&[("db", database)])
            .basic_auth(&self.username, Some(&self.password))
            .body(line)
            .send()
            .await
            .map_err(CollectorError::Http)?;

        self.handle_response(response).await?;
        Ok(())
    }

    /// Run an InfluxQL statement against the `/query` endpoint.
    /// `SHOW` statements go over GET, schema mutations over POST.
    async fn query(&self, statement: &str) -> Result<Value> {
        let url = format!("{}/query", self.base_url);

        debug!("Running InfluxQL: {}", statement);

        let request = if statement.starts_with("SHOW") {
            self.client.get(&url)
        } else {
            self.client.post(&url)
        };

        let response = request
            .query(&[("q", statement)])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(CollectorError::Http)?;

        let response = self.handle_response(response).await?;

        if response.content_length() == Some(0) {
            return Ok(Value::Null);
        }

        let body: Value = response.json().await.map_err(CollectorError::Http)?;

        if let Some(error) = body["results"][0]["error"].as_str() {
            return Err(CollectorError::Influx(format!(
                "statement failed: {}",
                error
            )));
        }

        Ok(body)
    }

    /// Map non-2xx responses to status-specific errors.
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let error_message = match status.as_u16() {
            400 => format!("Bad request: {}", error_body),
            401 => format!("Unauthorized: {}", error_body),
            403 => format!("Forbidden: {}", error_body),
            404 => format!("Endpoint not found: {}", error_body),
            500..=599 => format!("Server error: {}", error_body),
            _ => format!("Unexpected response {}: {}", status, error_body),
        };

        Err(CollectorError::Influx(error_message))
    }
}

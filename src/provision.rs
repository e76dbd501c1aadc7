//! Database provisioning

use crate::errors::Result;
use crate::influx::InfluxClient;
use tracing::{debug, warn};

/// How long written points are kept before the store deletes them.
pub const RETENTION_DURATION: &str = "7d";

/// Ensure the target database exists with the fixed retention policy.
///
/// Runs once at startup, before any write is attempted. Errors are not
/// handled here: a store that cannot be provisioned is a setup defect
/// and must fail the whole run.
pub async fn ensure_database(client: &InfluxClient, name: &str) -> Result<()> {
    let databases = client.list_databases().await?;

    if databases.iter().any(|db| db == name) {
        debug!("Skipping creation of database '{}'", name);
        return Ok(());
    }

    warn!("Creating database '{}'", name);
    client.create_database(name).await?;
    client.alter_retention_policy(name, RETENTION_DURATION).await?;

    Ok(())
}

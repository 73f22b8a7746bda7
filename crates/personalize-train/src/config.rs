//! Provisioning configuration
//!
//! Built once in `main` from the command line and the stack outputs, then
//! passed by reference to every pipeline step.

use crate::error::{Result, TrainError};
use crate::names::ResourceNames;
use crate::poller::PollPolicy;
use std::path::{Path, PathBuf};

// ============================================================================
// Provisioning Defaults
// ============================================================================

/// Deployment stage when `--stage` is not given.
pub const DEFAULT_STAGE: &str = "dev";

/// Recipe used for new solutions.
pub const DEFAULT_RECIPE_ARN: &str = "arn:aws:personalize:::recipe/aws-hrnn";

/// Location of the raw ratings file.
pub const DEFAULT_DATA_FILE: &str = "data/u.data";

/// Delay between status checks, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Wait budget per asynchronous resource, in seconds (3 hours).
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 3 * 60 * 60;

/// Minimum provisioned transactions per second for new campaigns.
pub const DEFAULT_MIN_PROVISIONED_TPS: i32 = 1;

/// Dataset type of the training data.
pub const DATASET_TYPE: &str = "Interactions";

/// Interactions schema shipped with the crate.
pub const BUNDLED_SCHEMA: &str = include_str!("../schema/interactions.json");

/// Bucket and role the import job needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Infrastructure {
    pub bucket: String,
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Bundled,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub names: ResourceNames,
    pub infrastructure: Infrastructure,
    /// Raw ratings file
    pub data_file: PathBuf,
    pub schema: SchemaSource,
    pub recipe_arn: String,
    pub event_type: String,
    pub min_provisioned_tps: i32,
    pub poll: PollPolicy,
    /// Train a new solution version even when a usable one exists
    pub force_retrain: bool,
}

impl TrainConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.infrastructure.bucket.is_empty() {
            return Err(TrainError::Config("bucket name cannot be empty".to_string()));
        }

        if !self.infrastructure.role_arn.starts_with("arn:") {
            return Err(TrainError::Config(format!(
                "role '{}' is not an ARN",
                self.infrastructure.role_arn
            )));
        }

        if !self.recipe_arn.starts_with("arn:") {
            return Err(TrainError::Config(format!(
                "recipe '{}' is not an ARN",
                self.recipe_arn
            )));
        }

        if self.event_type.trim().is_empty() {
            return Err(TrainError::Config("event type cannot be empty".to_string()));
        }

        if self.min_provisioned_tps < 1 {
            return Err(TrainError::Config(format!(
                "min provisioned TPS must be at least 1, got {}",
                self.min_provisioned_tps
            )));
        }

        if self.poll.interval.is_zero() {
            return Err(TrainError::Config(
                "poll interval must be greater than 0".to_string(),
            ));
        }

        if self.poll.timeout < self.poll.interval {
            return Err(TrainError::Config(format!(
                "wait timeout ({}s) cannot be shorter than the poll interval ({}s)",
                self.poll.timeout.as_secs(),
                self.poll.interval.as_secs()
            )));
        }

        Ok(())
    }

    /// Local path of the reshaped CSV, next to the raw ratings file
    pub fn local_csv_path(&self) -> PathBuf {
        let file_name = self.names.data_file_name();
        match self.data_file.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Read the schema document and check that it parses as JSON
    ///
    /// The document is sent to the service as-is.
    pub fn load_schema(&self) -> Result<String> {
        match &self.schema {
            SchemaSource::Bundled => Ok(BUNDLED_SCHEMA.to_string()),
            SchemaSource::File(path) => read_schema(path),
        }
    }
}

fn read_schema(path: &Path) -> Result<String> {
    let document = std::fs::read_to_string(path)?;

    serde_json::from_str::<serde_json::Value>(&document).map_err(|source| {
        TrainError::InvalidSchema {
            path: path.display().to_string(),
            source,
        }
    })?;

    Ok(document)
}

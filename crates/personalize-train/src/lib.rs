//! Personalize Train Library
//!
//! Provisions and trains the recommendation pipeline for one deployment
//! stage.
//!
//! # Overview
//!
//! - **Naming**: every resource is named `{service}-{stage}-{kind}` ([`names`])
//! - **Get-or-create**: existing resources are reused by exact name ([`resolver`])
//! - **Waiting**: asynchronous resources are polled to a terminal status ([`poller`])
//! - **Training data**: MovieLens ratings are reshaped and uploaded ([`dataset`], [`storage`])
//! - **Pipeline**: the steps above in dependency order ([`pipeline`])
//!
//! Re-running the pipeline against a fully provisioned stage creates nothing.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod aws;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod names;
pub mod pipeline;
pub mod poller;
pub mod resolver;
pub mod stack;
pub mod status;
pub mod storage;

// Re-export commonly used types
pub use client::PersonalizeApi;
pub use config::TrainConfig;
pub use error::{Result, TrainError};
pub use names::{ResourceKind, ResourceNames};
pub use pipeline::{Pipeline, PipelineReport};

use crate::aws::AwsPersonalize;
use crate::config::{
    Infrastructure, SchemaSource, DEFAULT_DATA_FILE, DEFAULT_MIN_PROVISIONED_TPS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RECIPE_ARN, DEFAULT_STAGE, DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::dataset::DEFAULT_EVENT_TYPE;
use crate::poller::PollPolicy;
use crate::storage::S3Store;
use anyhow::Context;
use clap::Parser;
use personalize_common::aws::{load_sdk_config, AwsSettings};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Provision, train and deploy the Personalize recommendation campaign
#[derive(Parser, Debug, Clone)]
#[command(name = "personalize-train")]
#[command(author, version, about, long_about = None)]
pub struct TrainArgs {
    /// Deployment stage; selects the stack and the resource names
    #[arg(long, env = "STAGE", default_value = DEFAULT_STAGE)]
    pub stage: String,

    /// Train a new solution version even when a usable one exists
    #[arg(long)]
    pub force_retrain: bool,

    /// Raw tab-separated ratings file
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Interactions schema (defaults to the bundled schema)
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Recipe for new solutions
    #[arg(long, default_value = DEFAULT_RECIPE_ARN)]
    pub recipe_arn: String,

    /// Event type recorded for every rating
    #[arg(long, default_value = DEFAULT_EVENT_TYPE)]
    pub event_type: String,

    /// Minimum provisioned TPS for a new campaign
    #[arg(long, default_value_t = DEFAULT_MIN_PROVISIONED_TPS)]
    pub min_tps: i32,

    /// Seconds between status checks
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Seconds to wait for each asynchronous resource
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Training data bucket; skips the stack lookup together with --role-arn
    #[arg(long, requires = "role_arn")]
    pub bucket: Option<String>,

    /// Role Personalize assumes to read the bucket
    #[arg(long, requires = "bucket")]
    pub role_arn: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom AWS endpoint, e.g. LocalStack
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl TrainArgs {
    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings::from_env().with_overrides(self.region.clone(), self.endpoint_url.clone())
    }

    /// Bucket and role given on the command line, if both are present
    pub fn infrastructure_override(&self) -> Option<Infrastructure> {
        match (&self.bucket, &self.role_arn) {
            (Some(bucket), Some(role_arn)) => Some(Infrastructure {
                bucket: bucket.clone(),
                role_arn: role_arn.clone(),
            }),
            _ => None,
        }
    }

    pub fn into_config(self, infrastructure: Infrastructure) -> Result<TrainConfig> {
        let names = ResourceNames::for_stage(&self.stage)?;

        let config = TrainConfig {
            names,
            infrastructure,
            data_file: self.data_file,
            schema: self
                .schema_file
                .map(SchemaSource::File)
                .unwrap_or(SchemaSource::Bundled),
            recipe_arn: self.recipe_arn,
            event_type: self.event_type,
            min_provisioned_tps: self.min_tps,
            poll: PollPolicy::new(
                Duration::from_secs(self.poll_interval_secs),
                Duration::from_secs(self.timeout_secs),
            ),
            force_retrain: self.force_retrain,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Run the whole pipeline against AWS
pub async fn run(args: TrainArgs, cancel: CancellationToken) -> anyhow::Result<PipelineReport> {
    let settings = args.aws_settings();
    let sdk_config = load_sdk_config(&settings).await;

    let names = ResourceNames::for_stage(&args.stage)?;
    let infrastructure = match args.infrastructure_override() {
        Some(infrastructure) => {
            info!(bucket = %infrastructure.bucket, "Using bucket and role from the command line");
            infrastructure
        },
        None => {
            let cloudformation = aws_sdk_cloudformation::Client::new(&sdk_config);
            let outputs = stack::fetch_stack_outputs(&cloudformation, names.stack_name())
                .await
                .context("Failed to read stack outputs")?;
            Infrastructure {
                bucket: outputs.bucket()?.to_string(),
                role_arn: outputs.role_arn()?.to_string(),
            }
        },
    };

    let path_style = settings.endpoint_url.is_some();
    let config = args.into_config(infrastructure)?;

    info!(
        stage = %config.names.stage(),
        bucket = %config.infrastructure.bucket,
        force_retrain = config.force_retrain,
        "Starting training pipeline"
    );

    let store = S3Store::new(&sdk_config, config.infrastructure.bucket.clone(), path_style);
    let personalize = AwsPersonalize::new(&sdk_config);

    let report = Pipeline::new(&config, &personalize, &store, cancel)
        .run()
        .await?;

    Ok(report)
}

//! Personalize Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared plumbing for the recommendation Lambda and the provisioning CLI.
//!
//! - **Error Handling**: [`CommonError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **AWS**: region/endpoint settings and SDK config loading
//!
//! # Example
//!
//! ```no_run
//! use personalize_common::aws::{load_sdk_config, AwsSettings};
//! use personalize_common::logging::{init_logging, LogConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     let sdk_config = load_sdk_config(&AwsSettings::from_env()).await;
//!     tracing::info!(region = ?sdk_config.region(), "AWS configuration loaded");
//!     Ok(())
//! }
//! ```

pub mod aws;
pub mod error;
pub mod logging;

pub use error::{CommonError, Result};

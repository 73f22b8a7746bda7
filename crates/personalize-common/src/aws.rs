//! AWS SDK configuration shared by both binaries

use aws_config::{BehaviorVersion, Region, SdkConfig};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Region and endpoint overrides applied on top of the default provider chain
///
/// Credentials always come from the standard chain (environment, profile,
/// Lambda execution role).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSettings {
    pub region: Option<String>,
    /// Custom endpoint, e.g. a LocalStack URL
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    pub fn from_env() -> Self {
        Self {
            region: non_empty_var("AWS_REGION").or_else(|| non_empty_var("AWS_DEFAULT_REGION")),
            endpoint_url: non_empty_var("AWS_ENDPOINT_URL"),
        }
    }

    /// Overlay explicitly given values (e.g. CLI flags)
    pub fn with_overrides(mut self, region: Option<String>, endpoint_url: Option<String>) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve an [`SdkConfig`] for the service clients
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    debug!(
        region = ?settings.region,
        endpoint_url = ?settings.endpoint_url,
        "Loading AWS configuration"
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

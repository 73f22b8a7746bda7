//! Lambda configuration

use crate::error::{ApiError, Result};

// ============================================================================
// Endpoint Configuration Constants
// ============================================================================

/// Variable holding the campaign to query.
pub const CAMPAIGN_ARN_VAR: &str = "CAMPAIGN_ARN";

/// Variable holding the optional result count.
pub const NUM_RESULTS_VAR: &str = "NUM_RESULTS";

/// Largest result count the service accepts.
pub const MAX_NUM_RESULTS: i32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub campaign_arn: String,
    /// Service default when unset
    pub num_results: Option<i32>,
}

impl ApiConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let campaign_arn = std::env::var(CAMPAIGN_ARN_VAR)
            .map_err(|_| ApiError::Config(format!("{} must be set", CAMPAIGN_ARN_VAR)))?;

        let num_results = match std::env::var(NUM_RESULTS_VAR) {
            Ok(value) if !value.trim().is_empty() => {
                Some(value.trim().parse::<i32>().map_err(|_| {
                    ApiError::Config(format!("{} must be an integer, got '{}'", NUM_RESULTS_VAR, value))
                })?)
            },
            _ => None,
        };

        let config = ApiConfig {
            campaign_arn,
            num_results,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.campaign_arn.starts_with("arn:") {
            return Err(ApiError::Config(format!(
                "{} '{}' is not an ARN",
                CAMPAIGN_ARN_VAR, self.campaign_arn
            )));
        }

        if let Some(n) = self.num_results {
            if !(1..=MAX_NUM_RESULTS).contains(&n) {
                return Err(ApiError::Config(format!(
                    "{} must be between 1 and {}, got {}",
                    NUM_RESULTS_VAR, MAX_NUM_RESULTS, n
                )));
            }
        }

        Ok(())
    }
}

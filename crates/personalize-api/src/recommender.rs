//! Real-time inference against a deployed campaign

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_personalizeruntime::error::DisplayErrorContext;
use aws_sdk_personalizeruntime::types::PredictedItem;
use aws_sdk_personalizeruntime::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One entry of a recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedItem {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RecommendedItem {
    /// Items the service returned without an id are dropped
    fn from_predicted(item: &PredictedItem) -> Option<Self> {
        Some(Self {
            item_id: item.item_id()?.to_string(),
            score: item.score(),
        })
    }
}

#[async_trait]
pub trait Recommender: Send + Sync {
    /// Recommended items for a user, best first
    async fn recommend(&self, user_id: &str) -> Result<Vec<RecommendedItem>>;
}

pub struct PersonalizeRecommender {
    client: Client,
    config: ApiConfig,
}

impl PersonalizeRecommender {
    pub fn new(sdk_config: &SdkConfig, config: ApiConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            config,
        }
    }
}

#[async_trait]
impl Recommender for PersonalizeRecommender {
    #[instrument(skip(self), fields(campaign_arn = %self.config.campaign_arn))]
    async fn recommend(&self, user_id: &str) -> Result<Vec<RecommendedItem>> {
        let response = self
            .client
            .get_recommendations()
            .campaign_arn(&self.config.campaign_arn)
            .user_id(user_id)
            .set_num_results(self.config.num_results)
            .send()
            .await
            .map_err(|e| ApiError::Upstream {
                operation: "GetRecommendations",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let items: Vec<RecommendedItem> = response
            .item_list()
            .iter()
            .filter_map(RecommendedItem::from_predicted)
            .collect();

        debug!(count = items.len(), "Received recommendations");

        Ok(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_shape_matches_service_item_list() {
        let items = vec![
            RecommendedItem {
                item_id: "242".to_string(),
                score: Some(0.0417),
            },
            RecommendedItem {
                item_id: "302".to_string(),
                score: None,
            },
        ];

        let json = serde_json::to_string(&items).unwrap();
        assert_eq!(json, r#"[{"itemId":"242","score":0.0417},{"itemId":"302"}]"#);
    }

    #[test]
    fn test_predicted_items_without_id_are_skipped() {
        let with_id = PredictedItem::builder().item_id("242").score(0.5).build();
        let without_id = PredictedItem::builder().score(0.1).build();

        assert_eq!(
            RecommendedItem::from_predicted(&with_id),
            Some(RecommendedItem {
                item_id: "242".to_string(),
                score: Some(0.5),
            })
        );
        assert_eq!(RecommendedItem::from_predicted(&without_id), None);
    }
}

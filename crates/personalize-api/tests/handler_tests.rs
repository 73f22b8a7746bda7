//! Handler behaviour with a scripted recommender

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use aws_lambda_events::encodings::Body;
use personalize_api::handler::{get_recommendations, USER_ID_PARAM};
use personalize_api::{ApiError, RecommendedItem, Recommender, Result};
use std::sync::Mutex;

/// Returns fixed items, or an upstream error when `items` is `None`
struct ScriptedRecommender {
    items: Option<Vec<RecommendedItem>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRecommender {
    fn returning(items: Vec<RecommendedItem>) -> Self {
        Self {
            items: Some(items),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            items: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recommender for ScriptedRecommender {
    async fn recommend(&self, user_id: &str) -> Result<Vec<RecommendedItem>> {
        self.calls.lock().unwrap().push(user_id.to_string());
        self.items.clone().ok_or_else(|| ApiError::Upstream {
            operation: "GetRecommendations",
            message: "ResourceNotFoundException: campaign not found".to_string(),
        })
    }
}

fn request_for(user_id: Option<&str>) -> ApiGatewayProxyRequest {
    let mut request = ApiGatewayProxyRequest::default();
    if let Some(id) = user_id {
        request
            .path_parameters
            .insert(USER_ID_PARAM.to_string(), id.to_string());
    }
    request
}

fn item(id: &str, score: Option<f64>) -> RecommendedItem {
    RecommendedItem {
        item_id: id.to_string(),
        score,
    }
}

fn body_text(body: Option<Body>) -> String {
    match body {
        Some(Body::Text(text)) => text,
        other => panic!("expected a text body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_returns_items_as_json_list() {
    let recommender = ScriptedRecommender::returning(vec![
        item("242", Some(0.0417)),
        item("302", Some(0.0233)),
        item("377", None),
    ]);

    let response = get_recommendations(&recommender, request_for(Some("196")))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "application/json"
    );

    let items: Vec<RecommendedItem> = serde_json::from_str(&body_text(response.body)).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].item_id, "242");
    assert_eq!(items[2].score, None);

    assert_eq!(recommender.calls(), vec!["196".to_string()]);
}

#[tokio::test]
async fn test_empty_recommendations_are_an_empty_list() {
    let recommender = ScriptedRecommender::returning(Vec::new());

    let response = get_recommendations(&recommender, request_for(Some("1")))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(body_text(response.body), "[]");
}

#[tokio::test]
async fn test_upstream_failure_is_returned_as_error() {
    let recommender = ScriptedRecommender::failing();

    let err = get_recommendations(&recommender, request_for(Some("196")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Upstream {
            operation: "GetRecommendations",
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_user_id_never_reaches_the_service() {
    let recommender = ScriptedRecommender::returning(vec![item("242", None)]);

    let missing = get_recommendations(&recommender, request_for(None)).await;
    let empty = get_recommendations(&recommender, request_for(Some(""))).await;

    assert!(matches!(missing, Err(ApiError::MissingPathParameter(USER_ID_PARAM))));
    assert!(matches!(empty, Err(ApiError::MissingPathParameter(_))));
    assert!(recommender.calls().is_empty());
}

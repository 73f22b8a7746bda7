//! API Gateway handler for `GET /recommendations/{user_id}`

use crate::error::{ApiError, Result};
use crate::recommender::Recommender;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use tracing::{info, instrument};

/// Path parameter carrying the user id
pub const USER_ID_PARAM: &str = "user_id";

/// Look up the user's recommendations and return them as a JSON list
///
/// Upstream failures are returned as errors so the Lambda runtime reports
/// the invocation as failed.
#[instrument(skip_all)]
pub async fn get_recommendations(
    recommender: &dyn Recommender,
    request: ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse> {
    let user_id = request
        .path_parameters
        .get(USER_ID_PARAM)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingPathParameter(USER_ID_PARAM))?;

    let items = recommender.recommend(user_id).await?;
    info!(user_id = %user_id, count = items.len(), "Returning recommendations");

    let body = serde_json::to_string(&items)?;

    let mut response = ApiGatewayProxyResponse::default();
    response.status_code = 200;
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.body = Some(Body::Text(body));

    Ok(response)
}

//! Personalize API - Lambda entry point

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::{service_fn, LambdaEvent};
use personalize_api::{handler, ApiConfig, PersonalizeRecommender};
use personalize_common::aws::{load_sdk_config, AwsSettings};
use personalize_common::logging::{init_logging, LogConfig, LogFormat, LogOutput};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // CloudWatch does not render colours
    let log_config = LogConfig::builder()
        .format(LogFormat::Json)
        .output(LogOutput::Console)
        .ansi(false)
        .log_file_prefix("get-recommendations")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let config = ApiConfig::load()?;
    let sdk_config = load_sdk_config(&AwsSettings::from_env()).await;

    info!(
        campaign_arn = %config.campaign_arn,
        num_results = ?config.num_results,
        "Recommendation handler ready"
    );

    let recommender = PersonalizeRecommender::new(&sdk_config, config);
    let recommender = &recommender;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ApiGatewayProxyRequest>| async move {
            handler::get_recommendations(recommender, event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        },
    ))
    .await
    .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

//! Personalize Train - Main entry point

use clap::Parser;
use personalize_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use personalize_train::TrainArgs;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let args = TrainArgs::parse();

    // Training runs for hours, so progress is logged at info by default
    let log_config = LogConfig::builder()
        .level(if args.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
        .output(LogOutput::Console)
        .log_file_prefix("personalize-train")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // Keep the guard alive so file logs are flushed on exit
    let _guard = init_logging(&log_config).ok().flatten();

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current step");
            shutdown.cancel();
        }
    });

    match personalize_train::run(args, cancel).await {
        Ok(report) => {
            info!(
                campaign_arn = %report.campaign.arn,
                solution_version_arn = %report.solution_version.arn,
                "Campaign is active"
            );
            println!("{}", report.campaign.arn);
        },
        Err(e) => {
            error!(error = %format!("{e:#}"), "Training failed");
            eprintln!("Error: {:#}", e);
            process::exit(1);
        },
    }
}

//! Provisioning pipeline
//!
//! Builds the resource chain for one stage, in order:
//!
//! 1. dataset group
//! 2. schema
//! 3. training data (reshape + upload)
//! 4. dataset
//! 5. import job (waited on)
//! 6. solution
//! 7. solution version (waited on)
//! 8. campaign (waited on)
//!
//! Each step's ARN feeds the next. Nothing is rolled back on failure; the
//! next run picks up whatever already exists.

use crate::client::{
    CreateCampaign, CreateDataset, CreateImportJob, CreateSolution, PersonalizeApi,
    SolutionVersionSummary,
};
use crate::config::{TrainConfig, DATASET_TYPE};
use crate::dataset::prepare_training_data;
use crate::error::Result;
use crate::names::ResourceKind;
use crate::poller::wait_for_terminal;
use crate::resolver::{get_or_create, Resolved};
use crate::storage::{ObjectStore, UploadResult};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Everything one run resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub dataset_group: Resolved,
    pub schema: Resolved,
    pub training_data: UploadResult,
    pub dataset: Resolved,
    pub import_job: Resolved,
    pub solution: Resolved,
    pub solution_version: Resolved,
    pub campaign: Resolved,
}

impl PipelineReport {
    /// Kinds of the resources this run created
    pub fn created(&self) -> Vec<ResourceKind> {
        [
            (ResourceKind::DatasetGroup, &self.dataset_group),
            (ResourceKind::Schema, &self.schema),
            (ResourceKind::Dataset, &self.dataset),
            (ResourceKind::ImportJob, &self.import_job),
            (ResourceKind::Solution, &self.solution),
            (ResourceKind::SolutionVersion, &self.solution_version),
            (ResourceKind::Campaign, &self.campaign),
        ]
        .into_iter()
        .filter(|(_, resolved)| resolved.created)
        .map(|(kind, _)| kind)
        .collect()
    }
}

/// Newest solution version that is usable or still training
pub fn reusable_solution_version(
    versions: &[SolutionVersionSummary],
) -> Option<&SolutionVersionSummary> {
    versions
        .iter()
        .filter(|version| version.status.can_become_active())
        .max_by_key(|version| version.created_at.unwrap_or(i64::MIN))
}

pub struct Pipeline<'a> {
    config: &'a TrainConfig,
    personalize: &'a dyn PersonalizeApi,
    store: &'a dyn ObjectStore,
    cancel: CancellationToken,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a TrainConfig,
        personalize: &'a dyn PersonalizeApi,
        store: &'a dyn ObjectStore,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            personalize,
            store,
            cancel,
        }
    }

    #[instrument(skip(self), fields(stage = %self.config.names.stage()))]
    pub async fn run(&self) -> Result<PipelineReport> {
        info!("Preparing dataset group");
        let dataset_group = self.resolve_dataset_group().await?;

        info!("Preparing dataset");
        let schema = self.resolve_schema().await?;
        let training_data = self.stage_training_data().await?;
        let dataset = self.resolve_dataset(&dataset_group.arn, &schema.arn).await?;
        let import_job = self
            .resolve_import_job(&dataset.arn, &training_data.location)
            .await?;
        self.wait(ResourceKind::ImportJob, &import_job.arn).await?;

        info!("Training solution");
        let solution = self.resolve_solution(&dataset_group.arn).await?;
        let solution_version = self.resolve_solution_version(&solution.arn).await?;
        self.wait(ResourceKind::SolutionVersion, &solution_version.arn)
            .await?;

        info!("Deploying campaign");
        let campaign = self.deploy_campaign(&solution_version.arn).await?;
        self.wait(ResourceKind::Campaign, &campaign.arn).await?;

        let report = PipelineReport {
            dataset_group,
            schema,
            training_data,
            dataset,
            import_job,
            solution,
            solution_version,
            campaign,
        };

        info!(
            campaign_arn = %report.campaign.arn,
            created = ?report.created(),
            "Training finished"
        );

        Ok(report)
    }

    async fn resolve_dataset_group(&self) -> Result<Resolved> {
        let name = self.config.names.name_for(ResourceKind::DatasetGroup);
        get_or_create(self.personalize, ResourceKind::DatasetGroup, &name, || {
            self.personalize.create_dataset_group(&name)
        })
        .await
    }

    async fn resolve_schema(&self) -> Result<Resolved> {
        let name = self.config.names.name_for(ResourceKind::Schema);
        let schema = self.config.load_schema()?;
        get_or_create(self.personalize, ResourceKind::Schema, &name, || {
            self.personalize.create_schema(&name, &schema)
        })
        .await
    }

    /// Reshape the ratings and upload them under the stage's data key
    async fn stage_training_data(&self) -> Result<UploadResult> {
        let source = self.config.data_file.clone();
        let destination = self.config.local_csv_path();
        let event_type = self.config.event_type.clone();

        let csv = tokio::task::spawn_blocking(move || {
            prepare_training_data(&source, &destination, &event_type)
        })
        .await??;

        let key = self.config.names.data_file_name();
        self.store.upload(&key, csv, Some("text/csv")).await
    }

    async fn resolve_dataset(&self, dataset_group_arn: &str, schema_arn: &str) -> Result<Resolved> {
        let request = CreateDataset {
            name: self.config.names.name_for(ResourceKind::Dataset),
            dataset_type: DATASET_TYPE.to_string(),
            dataset_group_arn: dataset_group_arn.to_string(),
            schema_arn: schema_arn.to_string(),
        };
        get_or_create(self.personalize, ResourceKind::Dataset, &request.name, || {
            self.personalize.create_dataset(&request)
        })
        .await
    }

    async fn resolve_import_job(&self, dataset_arn: &str, data_location: &str) -> Result<Resolved> {
        let request = CreateImportJob {
            job_name: self.config.names.name_for(ResourceKind::ImportJob),
            dataset_arn: dataset_arn.to_string(),
            data_location: data_location.to_string(),
            role_arn: self.config.infrastructure.role_arn.clone(),
        };
        let resolved = get_or_create(
            self.personalize,
            ResourceKind::ImportJob,
            &request.job_name,
            || self.personalize.create_dataset_import_job(&request),
        )
        .await?;

        if !resolved.created {
            info!(
                arn = %resolved.arn,
                "Import job already exists; the freshly uploaded data is not re-imported"
            );
        }

        Ok(resolved)
    }

    async fn resolve_solution(&self, dataset_group_arn: &str) -> Result<Resolved> {
        let request = CreateSolution {
            name: self.config.names.name_for(ResourceKind::Solution),
            dataset_group_arn: dataset_group_arn.to_string(),
            recipe_arn: self.config.recipe_arn.clone(),
        };
        get_or_create(self.personalize, ResourceKind::Solution, &request.name, || {
            self.personalize.create_solution(&request)
        })
        .await
    }

    async fn resolve_solution_version(&self, solution_arn: &str) -> Result<Resolved> {
        if self.config.force_retrain {
            info!("Forced retrain requested");
        } else {
            let versions = self.personalize.list_solution_versions(solution_arn).await?;
            if let Some(version) = reusable_solution_version(&versions) {
                info!(
                    arn = %version.arn,
                    status = %version.status,
                    "Reusing solution version"
                );
                return Ok(Resolved::existing(version.arn.clone()));
            }
        }

        let arn = self
            .personalize
            .create_solution_version(solution_arn)
            .await?;
        info!(arn = %arn, "Started training a new solution version");

        Ok(Resolved::created(arn))
    }

    /// Create the campaign, or move an existing one to `solution_version_arn`
    async fn deploy_campaign(&self, solution_version_arn: &str) -> Result<Resolved> {
        let request = CreateCampaign {
            name: self.config.names.name_for(ResourceKind::Campaign),
            solution_version_arn: solution_version_arn.to_string(),
            min_provisioned_tps: self.config.min_provisioned_tps,
        };
        let campaign = get_or_create(self.personalize, ResourceKind::Campaign, &request.name, || {
            self.personalize.create_campaign(&request)
        })
        .await?;

        if !campaign.created {
            let serving = self
                .personalize
                .campaign_solution_version(&campaign.arn)
                .await?;

            if serving.as_deref() != Some(solution_version_arn) {
                warn!(
                    campaign_arn = %campaign.arn,
                    from = ?serving,
                    to = %solution_version_arn,
                    "Updating campaign to the new solution version"
                );
                self.personalize
                    .update_campaign(&campaign.arn, solution_version_arn)
                    .await?;
            }
        }

        Ok(campaign)
    }

    async fn wait(&self, kind: ResourceKind, arn: &str) -> Result<String> {
        let policy = &self.config.poll;
        let outcome = wait_for_terminal(kind, arn, policy, &self.cancel, || {
            self.personalize.describe_status(kind, arn)
        })
        .await?;

        outcome.into_result(kind, policy)
    }
}

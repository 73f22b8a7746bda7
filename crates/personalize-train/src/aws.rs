//! [`PersonalizeApi`] over the AWS SDK

use crate::client::{
    CreateCampaign, CreateDataset, CreateImportJob, CreateSolution, PersonalizeApi,
    ResourceSummary, SolutionVersionSummary,
};
use crate::error::{Result, TrainError};
use crate::names::ResourceKind;
use crate::status::{ResourceStatus, StatusReport};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_personalize::types::{
    Campaign, CampaignSummary, DataSource, DatasetGroupSummary, DatasetImportJobSummary,
    DatasetSchemaSummary, DatasetSummary, SolutionSummary,
};
use aws_sdk_personalize::Client;
use tracing::{debug, instrument};

/// Summaries whose name and ARN feed the get-or-create lookups
trait NamedSummary {
    fn summary(&self) -> Option<ResourceSummary>;
}

macro_rules! named_summary {
    ($ty:ty, $name:ident, $arn:ident) => {
        impl NamedSummary for $ty {
            fn summary(&self) -> Option<ResourceSummary> {
                Some(ResourceSummary {
                    name: self.$name()?.to_string(),
                    arn: self.$arn()?.to_string(),
                })
            }
        }
    };
}

named_summary!(DatasetGroupSummary, name, dataset_group_arn);
named_summary!(DatasetSchemaSummary, name, schema_arn);
named_summary!(DatasetSummary, name, dataset_arn);
named_summary!(DatasetImportJobSummary, job_name, dataset_import_job_arn);
named_summary!(SolutionSummary, name, solution_arn);
named_summary!(CampaignSummary, name, campaign_arn);

fn summarize<T: NamedSummary>(items: Vec<T>) -> Vec<ResourceSummary> {
    items.iter().filter_map(NamedSummary::summary).collect()
}

fn report(status: Option<&str>, failure_reason: Option<&str>) -> StatusReport {
    StatusReport {
        status: status.map(ResourceStatus::from).unwrap_or(ResourceStatus::CreatePending),
        failure_reason: failure_reason.map(str::to_string),
    }
}

/// Status of a campaign, or of its latest update when one exists
///
/// A failed update is reported as a failure so the run that issued it stops.
fn campaign_status(campaign: &Campaign) -> StatusReport {
    match campaign.latest_campaign_update() {
        Some(update) if update.status().is_some() => {
            report(update.status(), update.failure_reason())
        },
        _ => report(campaign.status(), campaign.failure_reason()),
    }
}

/// Solution version the campaign serves, or is being moved to
///
/// The target of a failed update is ignored so the next run issues the
/// update again instead of treating it as deployed.
fn serving_solution_version(campaign: &Campaign) -> Option<String> {
    let pending_target = campaign.latest_campaign_update().and_then(|update| {
        let failed = update
            .status()
            .map(|status| ResourceStatus::from(status).is_failure())
            .unwrap_or(false);
        if failed {
            None
        } else {
            update.solution_version_arn()
        }
    });

    pending_target
        .or_else(|| campaign.solution_version_arn())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct AwsPersonalize {
    client: Client,
}

impl AwsPersonalize {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    async fn describe_import_job(&self, arn: &str) -> Result<StatusReport> {
        let output = self
            .client
            .describe_dataset_import_job()
            .dataset_import_job_arn(arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("DescribeDatasetImportJob", e))?;

        let job = output
            .dataset_import_job()
            .ok_or_else(|| TrainError::missing("DescribeDatasetImportJob", "datasetImportJob"))?;

        Ok(report(job.status(), job.failure_reason()))
    }

    async fn describe_solution_version(&self, arn: &str) -> Result<StatusReport> {
        let output = self
            .client
            .describe_solution_version()
            .solution_version_arn(arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("DescribeSolutionVersion", e))?;

        let version = output
            .solution_version()
            .ok_or_else(|| TrainError::missing("DescribeSolutionVersion", "solutionVersion"))?;

        Ok(report(version.status(), version.failure_reason()))
    }

    async fn describe_campaign(&self, arn: &str) -> Result<StatusReport> {
        let output = self
            .client
            .describe_campaign()
            .campaign_arn(arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("DescribeCampaign", e))?;

        let campaign = output
            .campaign()
            .ok_or_else(|| TrainError::missing("DescribeCampaign", "campaign"))?;

        Ok(campaign_status(campaign))
    }
}

#[async_trait]
impl PersonalizeApi for AwsPersonalize {
    #[instrument(skip(self))]
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>> {
        let summaries = match kind {
            ResourceKind::DatasetGroup => summarize(
                self.client
                    .list_dataset_groups()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListDatasetGroups", e))?,
            ),
            ResourceKind::Schema => summarize(
                self.client
                    .list_schemas()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListSchemas", e))?,
            ),
            ResourceKind::Dataset => summarize(
                self.client
                    .list_datasets()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListDatasets", e))?,
            ),
            ResourceKind::ImportJob => summarize(
                self.client
                    .list_dataset_import_jobs()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListDatasetImportJobs", e))?,
            ),
            ResourceKind::Solution => summarize(
                self.client
                    .list_solutions()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListSolutions", e))?,
            ),
            ResourceKind::Campaign => summarize(
                self.client
                    .list_campaigns()
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(|e| TrainError::aws("ListCampaigns", e))?,
            ),
            ResourceKind::SolutionVersion => return Err(TrainError::Unlistable(kind)),
        };

        debug!(kind = %kind, count = summaries.len(), "Listed existing resources");
        Ok(summaries)
    }

    #[instrument(skip(self))]
    async fn create_dataset_group(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .create_dataset_group()
            .name(name)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateDatasetGroup", e))?;

        output
            .dataset_group_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateDatasetGroup", "datasetGroupArn"))
    }

    #[instrument(skip(self, schema))]
    async fn create_schema(&self, name: &str, schema: &str) -> Result<String> {
        let output = self
            .client
            .create_schema()
            .name(name)
            .schema(schema)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateSchema", e))?;

        output
            .schema_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateSchema", "schemaArn"))
    }

    #[instrument(skip(self))]
    async fn create_dataset(&self, request: &CreateDataset) -> Result<String> {
        let output = self
            .client
            .create_dataset()
            .name(&request.name)
            .dataset_type(&request.dataset_type)
            .dataset_group_arn(&request.dataset_group_arn)
            .schema_arn(&request.schema_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateDataset", e))?;

        output
            .dataset_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateDataset", "datasetArn"))
    }

    #[instrument(skip(self))]
    async fn create_dataset_import_job(&self, request: &CreateImportJob) -> Result<String> {
        let data_source = DataSource::builder()
            .data_location(&request.data_location)
            .build();

        let output = self
            .client
            .create_dataset_import_job()
            .job_name(&request.job_name)
            .dataset_arn(&request.dataset_arn)
            .data_source(data_source)
            .role_arn(&request.role_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateDatasetImportJob", e))?;

        output
            .dataset_import_job_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateDatasetImportJob", "datasetImportJobArn"))
    }

    #[instrument(skip(self))]
    async fn create_solution(&self, request: &CreateSolution) -> Result<String> {
        let output = self
            .client
            .create_solution()
            .name(&request.name)
            .dataset_group_arn(&request.dataset_group_arn)
            .recipe_arn(&request.recipe_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateSolution", e))?;

        output
            .solution_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateSolution", "solutionArn"))
    }

    #[instrument(skip(self))]
    async fn list_solution_versions(
        &self,
        solution_arn: &str,
    ) -> Result<Vec<SolutionVersionSummary>> {
        let versions = self
            .client
            .list_solution_versions()
            .solution_arn(solution_arn)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| TrainError::aws("ListSolutionVersions", e))?;

        Ok(versions
            .iter()
            .filter_map(|version| {
                Some(SolutionVersionSummary {
                    arn: version.solution_version_arn()?.to_string(),
                    status: version
                        .status()
                        .map(ResourceStatus::from)
                        .unwrap_or(ResourceStatus::CreatePending),
                    created_at: version.creation_date_time().map(|t| t.secs()),
                })
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn create_solution_version(&self, solution_arn: &str) -> Result<String> {
        let output = self
            .client
            .create_solution_version()
            .solution_arn(solution_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateSolutionVersion", e))?;

        output
            .solution_version_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateSolutionVersion", "solutionVersionArn"))
    }

    #[instrument(skip(self))]
    async fn create_campaign(&self, request: &CreateCampaign) -> Result<String> {
        let output = self
            .client
            .create_campaign()
            .name(&request.name)
            .solution_version_arn(&request.solution_version_arn)
            .min_provisioned_tps(request.min_provisioned_tps)
            .send()
            .await
            .map_err(|e| TrainError::aws("CreateCampaign", e))?;

        output
            .campaign_arn()
            .map(str::to_string)
            .ok_or_else(|| TrainError::missing("CreateCampaign", "campaignArn"))
    }

    #[instrument(skip(self))]
    async fn update_campaign(&self, campaign_arn: &str, solution_version_arn: &str) -> Result<()> {
        self.client
            .update_campaign()
            .campaign_arn(campaign_arn)
            .solution_version_arn(solution_version_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("UpdateCampaign", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn campaign_solution_version(&self, campaign_arn: &str) -> Result<Option<String>> {
        let output = self
            .client
            .describe_campaign()
            .campaign_arn(campaign_arn)
            .send()
            .await
            .map_err(|e| TrainError::aws("DescribeCampaign", e))?;

        Ok(output.campaign().and_then(serving_solution_version))
    }

    async fn describe_status(&self, kind: ResourceKind, arn: &str) -> Result<StatusReport> {
        match kind {
            ResourceKind::ImportJob => self.describe_import_job(arn).await,
            ResourceKind::SolutionVersion => self.describe_solution_version(arn).await,
            ResourceKind::Campaign => self.describe_campaign(arn).await,
            other => Err(TrainError::Config(format!(
                "{} resources have no asynchronous status",
                other
            ))),
        }
    }
}

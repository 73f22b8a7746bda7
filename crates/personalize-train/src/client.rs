//! Control-plane operations the pipeline needs from Personalize
//!
//! The trait keeps the pipeline independent of the SDK so it can run against
//! an in-memory fake in tests; [`crate::aws::AwsPersonalize`] is the real
//! implementation.

use crate::error::Result;
use crate::names::ResourceKind;
use crate::status::{ResourceStatus, StatusReport};
use async_trait::async_trait;

/// Name and ARN of an existing resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionVersionSummary {
    pub arn: String,
    pub status: ResourceStatus,
    /// Creation time, seconds since the epoch
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDataset {
    pub name: String,
    pub dataset_type: String,
    pub dataset_group_arn: String,
    pub schema_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateImportJob {
    pub job_name: String,
    pub dataset_arn: String,
    /// `s3://bucket/key` of the training data
    pub data_location: String,
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSolution {
    pub name: String,
    pub dataset_group_arn: String,
    pub recipe_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCampaign {
    pub name: String,
    pub solution_version_arn: String,
    pub min_provisioned_tps: i32,
}

#[async_trait]
pub trait PersonalizeApi: Send + Sync {
    /// List every resource of a named kind, across all result pages
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>>;

    async fn create_dataset_group(&self, name: &str) -> Result<String>;

    async fn create_schema(&self, name: &str, schema: &str) -> Result<String>;

    async fn create_dataset(&self, request: &CreateDataset) -> Result<String>;

    async fn create_dataset_import_job(&self, request: &CreateImportJob) -> Result<String>;

    async fn create_solution(&self, request: &CreateSolution) -> Result<String>;

    async fn list_solution_versions(&self, solution_arn: &str)
        -> Result<Vec<SolutionVersionSummary>>;

    async fn create_solution_version(&self, solution_arn: &str) -> Result<String>;

    async fn create_campaign(&self, request: &CreateCampaign) -> Result<String>;

    /// Point an existing campaign at another solution version
    async fn update_campaign(&self, campaign_arn: &str, solution_version_arn: &str) -> Result<()>;

    /// The solution version a campaign currently serves
    async fn campaign_solution_version(&self, campaign_arn: &str) -> Result<Option<String>>;

    /// Current status of an asynchronous resource (import job, solution
    /// version or campaign)
    async fn describe_status(&self, kind: ResourceKind, arn: &str) -> Result<StatusReport>;
}

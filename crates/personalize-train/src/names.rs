//! Canonical resource naming
//!
//! Every Personalize resource owned by a deployment stage is named
//! `{service}-{stage}-{kind}`; that name is the only identity the get-or-create
//! lookups use.

use crate::error::{Result, TrainError};
use std::fmt;

/// Service prefix shared by the stack and every resource name
pub const SERVICE_BASE: &str = "serverless-personalize-example";

/// Personalize caps resource names at 63 characters
const MAX_NAME_LEN: usize = 63;

/// The resource kinds the pipeline provisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    DatasetGroup,
    Schema,
    Dataset,
    ImportJob,
    Solution,
    SolutionVersion,
    Campaign,
}

impl ResourceKind {
    /// Every kind, in pipeline order
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::DatasetGroup,
        ResourceKind::Schema,
        ResourceKind::Dataset,
        ResourceKind::ImportJob,
        ResourceKind::Solution,
        ResourceKind::SolutionVersion,
        ResourceKind::Campaign,
    ];

    /// Name suffix used in canonical names
    pub fn suffix(self) -> &'static str {
        match self {
            ResourceKind::DatasetGroup => "dataset-group",
            ResourceKind::Schema => "schema",
            ResourceKind::Dataset => "dataset",
            ResourceKind::ImportJob => "import-job",
            ResourceKind::Solution => "solution",
            ResourceKind::SolutionVersion => "solution-version",
            ResourceKind::Campaign => "campaign",
        }
    }

    /// Whether resources of this kind carry a user-chosen name
    pub fn is_named(self) -> bool {
        !matches!(self, ResourceKind::SolutionVersion)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::DatasetGroup => "DatasetGroup",
            ResourceKind::Schema => "Schema",
            ResourceKind::Dataset => "Dataset",
            ResourceKind::ImportJob => "DatasetImportJob",
            ResourceKind::Solution => "Solution",
            ResourceKind::SolutionVersion => "SolutionVersion",
            ResourceKind::Campaign => "Campaign",
        };
        f.write_str(label)
    }
}

/// Names derived from the service prefix and a deployment stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    stage: String,
    service: String,
}

impl ResourceNames {
    pub fn new(base: &str, stage: &str) -> Result<Self> {
        validate_stage(stage)?;

        let names = Self {
            stage: stage.to_string(),
            service: format!("{}-{}", base, stage),
        };

        let longest = names.name_for(ResourceKind::DatasetGroup);
        if longest.len() > MAX_NAME_LEN {
            return Err(TrainError::Config(format!(
                "stage '{}' is too long: '{}' exceeds {} characters",
                stage, longest, MAX_NAME_LEN
            )));
        }

        Ok(names)
    }

    /// Names for the default service prefix
    pub fn for_stage(stage: &str) -> Result<Self> {
        Self::new(SERVICE_BASE, stage)
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// `{service}-{stage}`
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The CloudFormation stack deployed for this stage
    pub fn stack_name(&self) -> &str {
        &self.service
    }

    /// Canonical resource name for a kind
    pub fn name_for(&self, kind: ResourceKind) -> String {
        format!("{}-{}", self.service, kind.suffix())
    }

    /// File name of the reshaped training data, locally and in S3
    pub fn data_file_name(&self) -> String {
        format!("{}-data.csv", self.service)
    }
}

fn validate_stage(stage: &str) -> Result<()> {
    if stage.is_empty() {
        return Err(TrainError::Config("stage must not be empty".to_string()));
    }

    if !stage
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TrainError::Config(format!(
            "stage '{}' may only contain letters, digits, '-' and '_'",
            stage
        )));
    }

    Ok(())
}

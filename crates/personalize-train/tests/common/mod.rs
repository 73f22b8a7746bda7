//! In-memory stand-ins for Personalize and S3
//!
//! `FakePersonalize` keeps every created resource in a map keyed by kind, so
//! the get-or-create lookups see what earlier calls created. Status checks
//! read from a per-kind script; the last scripted entry repeats, and an
//! unscripted kind reports ACTIVE.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use personalize_train::client::{
    CreateCampaign, CreateDataset, CreateImportJob, CreateSolution, PersonalizeApi,
    ResourceSummary, SolutionVersionSummary,
};
use personalize_train::config::{Infrastructure, SchemaSource, TrainConfig, DEFAULT_RECIPE_ARN};
use personalize_train::poller::PollPolicy;
use personalize_train::status::{ResourceStatus, StatusReport};
use personalize_train::storage::{s3_location, ObjectStore, UploadResult};
use personalize_train::{ResourceKind, ResourceNames, Result};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub const TEST_BUCKET: &str = "serverless-personalize-example-test-bucket";
pub const TEST_ROLE_ARN: &str = "arn:aws:iam::123456789012:role/serverless-personalize-example-test";

/// A few MovieLens rows
pub const SAMPLE_RATINGS: &str = "196\t242\t3\t881250949\n\
                                  186\t302\t3\t891717742\n\
                                  22\t377\t1\t878887116\n";

const ARN_PREFIX: &str = "arn:aws:personalize:us-east-1:123456789012";

#[derive(Debug, Default)]
struct FakeState {
    resources: HashMap<ResourceKind, Vec<ResourceSummary>>,
    created: Vec<(ResourceKind, String)>,
    schemas: Vec<String>,
    import_jobs: Vec<CreateImportJob>,
    solution_versions: HashMap<String, Vec<SolutionVersionSummary>>,
    campaign_versions: HashMap<String, String>,
    campaign_updates: Vec<(String, String)>,
    scripts: HashMap<ResourceKind, VecDeque<StatusReport>>,
    status_checks: HashMap<ResourceKind, usize>,
    clock: i64,
}

#[derive(Debug, Default)]
pub struct FakePersonalize {
    state: Mutex<FakeState>,
}

impl FakePersonalize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses `describe_status` reports for `kind`, in order
    pub fn script(&self, kind: ResourceKind, statuses: Vec<StatusReport>) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(kind, statuses.into());
    }

    /// Pretend a resource was created before the run started
    pub fn seed(&self, kind: ResourceKind, name: &str) -> String {
        let arn = arn_for(kind, name);
        self.state
            .lock()
            .unwrap()
            .resources
            .entry(kind)
            .or_default()
            .push(ResourceSummary {
                name: name.to_string(),
                arn: arn.clone(),
            });
        arn
    }

    /// Every create call so far, in order
    pub fn created(&self) -> Vec<(ResourceKind, String)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn created_kinds(&self) -> Vec<ResourceKind> {
        self.created().into_iter().map(|(kind, _)| kind).collect()
    }

    pub fn create_count(&self, kind: ResourceKind) -> usize {
        self.created().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn schemas(&self) -> Vec<String> {
        self.state.lock().unwrap().schemas.clone()
    }

    pub fn import_jobs(&self) -> Vec<CreateImportJob> {
        self.state.lock().unwrap().import_jobs.clone()
    }

    pub fn campaign_updates(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().campaign_updates.clone()
    }

    pub fn status_checks(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .status_checks
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, kind: ResourceKind, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let arn = arn_for(kind, name);
        state.resources.entry(kind).or_default().push(ResourceSummary {
            name: name.to_string(),
            arn: arn.clone(),
        });
        state.created.push((kind, name.to_string()));
        arn
    }
}

fn arn_for(kind: ResourceKind, name: &str) -> String {
    format!("{}:{}/{}", ARN_PREFIX, kind.suffix(), name)
}

#[async_trait]
impl PersonalizeApi for FakePersonalize {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .resources
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_dataset_group(&self, name: &str) -> Result<String> {
        Ok(self.record(ResourceKind::DatasetGroup, name))
    }

    async fn create_schema(&self, name: &str, schema: &str) -> Result<String> {
        self.state.lock().unwrap().schemas.push(schema.to_string());
        Ok(self.record(ResourceKind::Schema, name))
    }

    async fn create_dataset(&self, request: &CreateDataset) -> Result<String> {
        Ok(self.record(ResourceKind::Dataset, &request.name))
    }

    async fn create_dataset_import_job(&self, request: &CreateImportJob) -> Result<String> {
        self.state.lock().unwrap().import_jobs.push(request.clone());
        Ok(self.record(ResourceKind::ImportJob, &request.job_name))
    }

    async fn create_solution(&self, request: &CreateSolution) -> Result<String> {
        Ok(self.record(ResourceKind::Solution, &request.name))
    }

    async fn list_solution_versions(
        &self,
        solution_arn: &str,
    ) -> Result<Vec<SolutionVersionSummary>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .solution_versions
            .get(solution_arn)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_solution_version(&self, solution_arn: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let created_at = state.clock;
        let versions = state
            .solution_versions
            .entry(solution_arn.to_string())
            .or_default();
        let arn = format!("{}/{}", solution_arn, versions.len() + 1);
        versions.push(SolutionVersionSummary {
            arn: arn.clone(),
            status: ResourceStatus::CreatePending,
            created_at: Some(created_at),
        });
        state
            .created
            .push((ResourceKind::SolutionVersion, arn.clone()));
        Ok(arn)
    }

    async fn create_campaign(&self, request: &CreateCampaign) -> Result<String> {
        let arn = self.record(ResourceKind::Campaign, &request.name);
        self.state
            .lock()
            .unwrap()
            .campaign_versions
            .insert(arn.clone(), request.solution_version_arn.clone());
        Ok(arn)
    }

    async fn update_campaign(&self, campaign_arn: &str, solution_version_arn: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .campaign_versions
            .insert(campaign_arn.to_string(), solution_version_arn.to_string());
        state
            .campaign_updates
            .push((campaign_arn.to_string(), solution_version_arn.to_string()));
        Ok(())
    }

    async fn campaign_solution_version(&self, campaign_arn: &str) -> Result<Option<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .campaign_versions
            .get(campaign_arn)
            .cloned())
    }

    async fn describe_status(&self, kind: ResourceKind, arn: &str) -> Result<StatusReport> {
        let mut state = self.state.lock().unwrap();
        *state.status_checks.entry(kind).or_default() += 1;

        let report = match state.scripts.get_mut(&kind) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue.front().cloned().unwrap(),
            _ => StatusReport::new(ResourceStatus::Active),
        };

        // Settle the listed status of solution versions as they are observed
        if kind == ResourceKind::SolutionVersion {
            for versions in state.solution_versions.values_mut() {
                if let Some(version) = versions.iter_mut().find(|v| v.arn == arn) {
                    version.status = report.status.clone();
                }
            }
        }

        Ok(report)
    }
}

/// Object store that keeps uploads in memory
#[derive(Debug, Default)]
pub struct FakeStore {
    uploads: Mutex<Vec<(String, Vec<u8>, Option<String>)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(key, body, content type)` of every upload
    pub fn uploads(&self) -> Vec<(String, Vec<u8>, Option<String>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: Option<&str>) -> Result<UploadResult> {
        let size = data.len() as i64;
        self.uploads.lock().unwrap().push((
            key.to_string(),
            data,
            content_type.map(str::to_string),
        ));

        Ok(UploadResult {
            key: key.to_string(),
            location: s3_location(TEST_BUCKET, key),
            checksum: String::new(),
            size,
        })
    }
}

/// Config for stage `test` with the ratings file in `dir`
pub fn test_config(dir: &Path) -> TrainConfig {
    let data_file = dir.join("u.data");
    std::fs::write(&data_file, SAMPLE_RATINGS).unwrap();

    TrainConfig {
        names: ResourceNames::for_stage("test").unwrap(),
        infrastructure: Infrastructure {
            bucket: TEST_BUCKET.to_string(),
            role_arn: TEST_ROLE_ARN.to_string(),
        },
        data_file,
        schema: SchemaSource::Bundled,
        recipe_arn: DEFAULT_RECIPE_ARN.to_string(),
        event_type: "rating".to_string(),
        min_provisioned_tps: 1,
        poll: PollPolicy::new(Duration::from_secs(60), Duration::from_secs(60 * 60)),
        force_retrain: false,
    }
}

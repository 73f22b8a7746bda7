//! Get-or-create lookups for named resources

use crate::client::{PersonalizeApi, ResourceSummary};
use crate::error::Result;
use crate::names::ResourceKind;
use std::future::Future;
use tracing::info;

/// ARN of a resolved resource and whether this run created it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub arn: String,
    pub created: bool,
}

impl Resolved {
    pub fn existing(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            created: false,
        }
    }

    pub fn created(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            created: true,
        }
    }
}

/// Exact-name lookup
pub fn find_by_name<'a>(resources: &'a [ResourceSummary], name: &str) -> Option<&'a ResourceSummary> {
    resources.iter().find(|resource| resource.name == name)
}

/// Return the ARN of the `kind` resource called `name`, creating it when absent
///
/// `create` runs at most once, and only when no resource with exactly that
/// name is listed.
pub async fn get_or_create<C, Fut>(
    api: &dyn PersonalizeApi,
    kind: ResourceKind,
    name: &str,
    create: C,
) -> Result<Resolved>
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let existing = api.list(kind).await?;

    if let Some(found) = find_by_name(&existing, name) {
        info!(kind = %kind, name = %name, arn = %found.arn, "Using existing resource");
        return Ok(Resolved::existing(found.arn.clone()));
    }

    info!(kind = %kind, name = %name, "Creating resource");
    let arn = create().await?;
    info!(kind = %kind, name = %name, arn = %arn, "Created resource");

    Ok(Resolved::created(arn))
}

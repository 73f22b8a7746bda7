//! Remote status vocabulary of asynchronous Personalize resources

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    CreatePending,
    CreateInProgress,
    Active,
    CreateFailed,
    /// A stop was requested while training
    CreateStopping,
    CreateStopped,
    DeletePending,
    DeleteInProgress,
    /// A status string this crate does not know; treated as in progress
    Other(String),
}

impl ResourceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceStatus::CreatePending => "CREATE PENDING",
            ResourceStatus::CreateInProgress => "CREATE IN_PROGRESS",
            ResourceStatus::Active => "ACTIVE",
            ResourceStatus::CreateFailed => "CREATE FAILED",
            ResourceStatus::CreateStopping => "CREATE STOPPING",
            ResourceStatus::CreateStopped => "CREATE STOPPED",
            ResourceStatus::DeletePending => "DELETE PENDING",
            ResourceStatus::DeleteInProgress => "DELETE IN_PROGRESS",
            ResourceStatus::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResourceStatus::Active
                | ResourceStatus::CreateFailed
                | ResourceStatus::CreateStopped
                | ResourceStatus::DeletePending
                | ResourceStatus::DeleteInProgress
        )
    }

    /// Terminal and not usable
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != ResourceStatus::Active
    }

    /// Usable now, or on its way to ACTIVE
    pub fn can_become_active(&self) -> bool {
        !self.is_failure() && *self != ResourceStatus::CreateStopping
    }
}

impl From<&str> for ResourceStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATE PENDING" => ResourceStatus::CreatePending,
            "CREATE IN_PROGRESS" => ResourceStatus::CreateInProgress,
            "ACTIVE" => ResourceStatus::Active,
            "CREATE FAILED" => ResourceStatus::CreateFailed,
            "CREATE STOPPING" => ResourceStatus::CreateStopping,
            "CREATE STOPPED" => ResourceStatus::CreateStopped,
            "DELETE PENDING" => ResourceStatus::DeletePending,
            "DELETE IN_PROGRESS" => ResourceStatus::DeleteInProgress,
            other => ResourceStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a resource's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: ResourceStatus,
    pub failure_reason: Option<String>,
}

impl StatusReport {
    pub fn new(status: ResourceStatus) -> Self {
        Self {
            status,
            failure_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: ResourceStatus::CreateFailed,
            failure_reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_service_status_strings() {
        assert_eq!(ResourceStatus::from("ACTIVE"), ResourceStatus::Active);
        assert_eq!(
            ResourceStatus::from("CREATE IN_PROGRESS"),
            ResourceStatus::CreateInProgress
        );
        assert_eq!(
            ResourceStatus::from("CREATE FAILED"),
            ResourceStatus::CreateFailed
        );
        assert_eq!(
            ResourceStatus::from("CREATE STOPPING"),
            ResourceStatus::CreateStopping
        );
        assert_eq!(
            ResourceStatus::from("UPDATE PENDING"),
            ResourceStatus::Other("UPDATE PENDING".to_string())
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(ResourceStatus::Active.is_terminal());
        assert!(!ResourceStatus::Active.is_failure());
        assert!(ResourceStatus::CreateFailed.is_failure());
        assert!(ResourceStatus::DeletePending.is_failure());
        assert!(!ResourceStatus::CreatePending.is_terminal());
        assert!(!ResourceStatus::Other("UPDATE PENDING".into()).is_terminal());
    }

    #[test]
    fn test_stopped_training_is_a_failure() {
        assert!(ResourceStatus::CreateStopped.is_failure());
        assert!(!ResourceStatus::CreateStopping.is_terminal());

        assert!(!ResourceStatus::CreateStopped.can_become_active());
        assert!(!ResourceStatus::CreateStopping.can_become_active());
        assert!(ResourceStatus::CreateInProgress.can_become_active());
        assert!(ResourceStatus::Active.can_become_active());
    }

    #[test]
    fn test_display_round_trips_known_statuses() {
        for raw in ["ACTIVE", "CREATE PENDING", "DELETE IN_PROGRESS"] {
            assert_eq!(ResourceStatus::from(raw).to_string(), raw);
        }
    }
}

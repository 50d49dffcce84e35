//! IAM lookups used to enrich user records

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::StatusType;
use aws_sdk_iam::Client;
use chrono::{DateTime, Utc};

/// Credential status of an IAM user's access keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKeyStatus {
    /// The user has no access keys
    None,
    /// At least one key is active
    Active,
    /// Keys exist but all are inactive
    Inactive,
}

impl AccessKeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKeyStatus::None => "None",
            AccessKeyStatus::Active => "Active",
            AccessKeyStatus::Inactive => "Inactive",
        }
    }

    /// Summarize a list of per-key "is active" flags
    pub fn from_keys(active_flags: impl IntoIterator<Item = bool>) -> Self {
        let mut seen_any = false;
        for active in active_flags {
            if active {
                return AccessKeyStatus::Active;
            }
            seen_any = true;
        }
        if seen_any {
            AccessKeyStatus::Inactive
        } else {
            AccessKeyStatus::None
        }
    }
}

/// Secondary identity-management API
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Status of the user's long-lived access keys
    async fn access_key_status(&self, user_name: &str) -> Result<AccessKeyStatus>;

    /// Last console sign-in, `None` if the password was never used
    async fn last_console_login(&self, user_name: &str) -> Result<Option<DateTime<Utc>>>;
}

/// Identity source backed by AWS IAM
#[derive(Clone)]
pub struct IamIdentity {
    client: Client,
}

impl IamIdentity {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentitySource for IamIdentity {
    async fn access_key_status(&self, user_name: &str) -> Result<AccessKeyStatus> {
        let output = self
            .client
            .list_access_keys()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| anyhow!("ListAccessKeys failed: {}", DisplayErrorContext(&e)))?;

        Ok(AccessKeyStatus::from_keys(
            output
                .access_key_metadata()
                .iter()
                .map(|key| matches!(key.status(), Some(StatusType::Active))),
        ))
    }

    async fn last_console_login(&self, user_name: &str) -> Result<Option<DateTime<Utc>>> {
        let output = self
            .client
            .get_user()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| anyhow!("GetUser failed: {}", DisplayErrorContext(&e)))?;

        let Some(last_used) = output.user().and_then(|u| u.password_last_used()) else {
            return Ok(None);
        };

        DateTime::from_timestamp(last_used.secs(), last_used.subsec_nanos())
            .map(Some)
            .ok_or_else(|| anyhow!("PasswordLastUsed out of range: {}", last_used.secs()))
    }
}

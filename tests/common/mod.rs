//! Shared fakes for integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cfgview::aws::aggregator::{AggregatorSource, SelectPage};
use cfgview::aws::client::AwsClients;
use cfgview::aws::identity::{AccessKeyStatus, IdentitySource};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Aggregator serving canned pages per resource type.
/// Page `n > 0` is requested with token `page-n`.
#[derive(Default)]
pub struct FakeAggregator {
    pages: HashMap<String, Vec<Vec<String>>>,
    failing: HashSet<String>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, resource_type: &str, pages: Vec<Vec<String>>) -> Self {
        self.pages.insert(resource_type.to_string(), pages);
        self
    }

    pub fn failing_for(mut self, resource_type: &str) -> Self {
        self.failing.insert(resource_type.to_string());
        self
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl AggregatorSource for FakeAggregator {
    async fn select_page(
        &self,
        expression: &str,
        _limit: i32,
        next_token: Option<String>,
    ) -> Result<SelectPage> {
        let resource_type = expression
            .rsplit("resourceType = '")
            .next()
            .unwrap_or_default()
            .trim_end_matches('\'')
            .to_string();
        self.calls
            .lock()
            .unwrap()
            .push((resource_type.clone(), next_token.clone()));

        if self.failing.contains(&resource_type) {
            return Err(anyhow!(
                "SelectAggregateResourceConfig failed: AccessDeniedException: not authorized"
            ));
        }

        let Some(pages) = self.pages.get(&resource_type) else {
            return Ok(SelectPage::default());
        };

        let index = match next_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| anyhow!("InvalidNextTokenException: {}", token))?,
        };

        let results = pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));

        Ok(SelectPage {
            results,
            next_token,
        })
    }
}

/// IAM fake: users listed in `failing_keys` fail the access key lookup
#[derive(Default)]
pub struct FakeIdentity {
    pub failing_keys: HashSet<String>,
    pub active_keys: HashSet<String>,
}

#[async_trait]
impl IdentitySource for FakeIdentity {
    async fn access_key_status(&self, user_name: &str) -> Result<AccessKeyStatus> {
        if self.failing_keys.contains(user_name) {
            return Err(anyhow!("ListAccessKeys failed: AccessDenied"));
        }
        Ok(AccessKeyStatus::from_keys(
            self.active_keys.contains(user_name).then_some(true),
        ))
    }

    async fn last_console_login(&self, _user_name: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(Some(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()))
    }
}

pub fn clients(aggregator: FakeAggregator, identity: FakeIdentity) -> AwsClients {
    AwsClients {
        aggregator: Arc::new(aggregator),
        identity: Arc::new(identity),
    }
}

/// One aggregator result row, configuration encoded as a JSON string
pub fn row(account_id: &str, region: &str, resource_id: &str, config: Value, name: Option<&str>) -> String {
    let tags = match name {
        Some(n) => json!([{"key": "Name", "value": n}, {"key": "env", "value": "prod"}]),
        None => Value::Null,
    };
    json!({
        "accountId": account_id,
        "awsRegion": region,
        "resourceId": resource_id,
        "configuration": config.to_string(),
        "tags": tags
    })
    .to_string()
}

pub fn instance_row(account_id: &str, instance_id: &str, ip: &str, name: Option<&str>) -> String {
    row(
        account_id,
        "ap-northeast-1",
        instance_id,
        json!({
            "instanceId": instance_id,
            "instanceType": "t3.small",
            "privateIpAddress": ip,
            "state": {"code": 16, "name": "running"}
        }),
        name,
    )
}

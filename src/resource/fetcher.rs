//! Query Executor
//!
//! Runs advanced queries against the aggregator, following continuation
//! tokens, and decodes every returned row.

use crate::aws::aggregator::AggregatorSource;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// Rows requested per page (the service maximum)
pub const PAGE_SIZE: i32 = 100;

/// Columns selected for every resource type
pub const SELECT_COLUMNS: &str = "accountId, awsRegion, resourceId, resourceName, configuration, tags";

/// Key/value tag attached to a resource
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// One aggregator row as returned by the query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResource {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub aws_region: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: Option<String>,
    /// JSON string, already-decoded object, or null
    #[serde(default)]
    pub configuration: Value,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// A row or configuration payload that could not be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    /// Resource id when the row itself was readable
    pub resource_id: Option<String>,
    pub reason: String,
}

/// Decoded rows plus everything that was skipped on the way
#[derive(Debug, Clone, Default)]
pub struct QueryBatch {
    pub records: Vec<RawResource>,
    pub failures: Vec<DecodeFailure>,
}

impl QueryBatch {
    /// Decode one result string, recording a failure instead of aborting
    pub fn push_row(&mut self, row: &str) {
        match serde_json::from_str::<RawResource>(row) {
            Ok(record) => self.records.push(record),
            Err(e) => self.failures.push(DecodeFailure {
                resource_id: None,
                reason: format!("invalid result row: {}", e),
            }),
        }
    }

    /// Log a summary of skipped rows
    pub fn log_failures(&self, resource_type: &str) {
        if self.failures.is_empty() {
            return;
        }
        tracing::warn!(
            "{}: skipped {} undecodable row(s)",
            resource_type,
            self.failures.len()
        );
        for failure in &self.failures {
            tracing::debug!(
                "{}: skipped {}: {}",
                resource_type,
                failure.resource_id.as_deref().unwrap_or("<unknown>"),
                failure.reason
            );
        }
    }
}

/// Build the advanced query expression for a resource type
pub fn build_expression(resource_type: &str) -> String {
    format!(
        "SELECT {} WHERE resourceType = '{}'",
        SELECT_COLUMNS,
        resource_type.replace('\'', "")
    )
}

/// Fetch all rows of a resource type (auto-paginate)
pub async fn execute_query(
    source: &dyn AggregatorSource,
    resource_type: &str,
) -> Result<QueryBatch> {
    let expression = build_expression(resource_type);
    let mut batch = QueryBatch::default();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source
            .select_page(&expression, PAGE_SIZE, next_token.take())
            .await?;
        pages += 1;

        tracing::debug!(
            "{}: page {} returned {} row(s)",
            resource_type,
            pages,
            page.results.len()
        );

        for row in &page.results {
            batch.push_row(row);
        }

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(
        "{}: {} row(s) decoded over {} page(s)",
        resource_type,
        batch.records.len(),
        pages
    );

    Ok(batch)
}

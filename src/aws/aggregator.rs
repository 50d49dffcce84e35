//! AWS Config aggregator access
//!
//! The executor only needs "run one page of an advanced query", so the
//! aggregator is modelled as a trait that tests can replace.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_config::error::DisplayErrorContext;
use aws_sdk_config::Client;

/// One page returned by `SelectAggregateResourceConfig`
#[derive(Debug, Clone, Default)]
pub struct SelectPage {
    /// Raw JSON rows, one string per resource
    pub results: Vec<String>,
    pub next_token: Option<String>,
}

/// Source of aggregated resource configuration
#[async_trait]
pub trait AggregatorSource: Send + Sync {
    /// Run one page of an advanced query expression
    async fn select_page(
        &self,
        expression: &str,
        limit: i32,
        next_token: Option<String>,
    ) -> Result<SelectPage>;
}

/// Aggregator backed by the AWS Config service
#[derive(Clone)]
pub struct ConfigAggregator {
    client: Client,
    aggregator_name: String,
}

impl ConfigAggregator {
    pub fn new(client: Client, aggregator_name: &str) -> Self {
        Self {
            client,
            aggregator_name: aggregator_name.to_string(),
        }
    }
}

#[async_trait]
impl AggregatorSource for ConfigAggregator {
    async fn select_page(
        &self,
        expression: &str,
        limit: i32,
        next_token: Option<String>,
    ) -> Result<SelectPage> {
        tracing::debug!(
            "SelectAggregateResourceConfig: aggregator={}, has_token={}",
            self.aggregator_name,
            next_token.is_some()
        );

        let output = self
            .client
            .select_aggregate_resource_config()
            .configuration_aggregator_name(&self.aggregator_name)
            .expression(expression)
            .limit(limit)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "SelectAggregateResourceConfig failed: {}",
                    DisplayErrorContext(&e)
                )
            })?;

        Ok(SelectPage {
            results: output.results().to_vec(),
            next_token: output
                .next_token()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string()),
        })
    }
}

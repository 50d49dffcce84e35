//! AWS clients
//!
//! Builds the shared SDK configuration once at startup and hands out the
//! aggregator and identity sources used by the request handlers.

use super::aggregator::{AggregatorSource, ConfigAggregator};
use super::identity::{IamIdentity, IdentitySource};
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_types::region::Region;
use aws_types::SdkConfig;
use std::sync::Arc;

/// Load the SDK configuration from the ambient environment
/// (credentials chain, profile), pinned to the given region.
/// Retries are disabled: a failed page fails the request.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}

/// Clients shared by all requests
#[derive(Clone)]
pub struct AwsClients {
    pub aggregator: Arc<dyn AggregatorSource>,
    pub identity: Arc<dyn IdentitySource>,
}

impl AwsClients {
    /// Create clients for the given aggregator, querying through `region`
    pub async fn new(aggregator_name: &str, region: &str) -> Self {
        let sdk_config = load_sdk_config(region).await;
        Self::from_sdk_config(&sdk_config, aggregator_name)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, aggregator_name: &str) -> Self {
        let config_client = aws_sdk_config::Client::new(sdk_config);
        let iam_client = aws_sdk_iam::Client::new(sdk_config);

        Self {
            aggregator: Arc::new(ConfigAggregator::new(config_client, aggregator_name)),
            identity: Arc::new(IamIdentity::new(iam_client)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sdk_config_uses_given_region() {
        let sdk_config = load_sdk_config("eu-west-3").await;
        assert_eq!(sdk_config.region(), Some(&Region::new("eu-west-3")));
    }
}

//! Resource kinds served by the viewer

use super::filter::SearchParams;
use super::kinds::{self, ResourceView};
use crate::aws::client::AwsClients;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// One searchable resource kind, addressed by its URL key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Ec2,
    Vpc,
    Rds,
    Lambda,
    LoadBalancer,
    NetworkInterface,
    S3,
    Iam,
    Ses,
    CloudFront,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Ec2,
        ResourceKind::Vpc,
        ResourceKind::Rds,
        ResourceKind::Lambda,
        ResourceKind::LoadBalancer,
        ResourceKind::NetworkInterface,
        ResourceKind::S3,
        ResourceKind::Iam,
        ResourceKind::Ses,
        ResourceKind::CloudFront,
    ];

    /// URL key, e.g. `/api/ec2`
    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Ec2 => "ec2",
            ResourceKind::Vpc => "vpc",
            ResourceKind::Rds => "rds",
            ResourceKind::Lambda => "lambda",
            ResourceKind::LoadBalancer => "lb",
            ResourceKind::NetworkInterface => "eni",
            ResourceKind::S3 => "s3",
            ResourceKind::Iam => "iam",
            ResourceKind::Ses => "ses",
            ResourceKind::CloudFront => "cloudfront",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// AWS Config resource type queried for this kind
    pub fn resource_type(self) -> &'static str {
        match self {
            ResourceKind::Ec2 => kinds::Ec2Instance::RESOURCE_TYPE,
            ResourceKind::Vpc => kinds::Vpc::RESOURCE_TYPE,
            ResourceKind::Rds => kinds::RdsInstance::RESOURCE_TYPE,
            ResourceKind::Lambda => kinds::LambdaFunction::RESOURCE_TYPE,
            ResourceKind::LoadBalancer => kinds::LoadBalancer::RESOURCE_TYPE,
            ResourceKind::NetworkInterface => kinds::NetworkInterface::RESOURCE_TYPE,
            ResourceKind::S3 => kinds::S3Bucket::RESOURCE_TYPE,
            ResourceKind::Iam => kinds::IamUser::RESOURCE_TYPE,
            ResourceKind::Ses => kinds::SesIdentity::RESOURCE_TYPE,
            ResourceKind::CloudFront => kinds::Distribution::RESOURCE_TYPE,
        }
    }

    /// Query-string allow-list
    pub fn params(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Ec2 => kinds::Ec2Instance::PARAMS,
            ResourceKind::Vpc => kinds::Vpc::PARAMS,
            ResourceKind::Rds => kinds::RdsInstance::PARAMS,
            ResourceKind::Lambda => kinds::LambdaFunction::PARAMS,
            ResourceKind::LoadBalancer => kinds::LoadBalancer::PARAMS,
            ResourceKind::NetworkInterface => kinds::NetworkInterface::PARAMS,
            ResourceKind::S3 => kinds::S3Bucket::PARAMS,
            ResourceKind::Iam => kinds::IamUser::PARAMS,
            ResourceKind::Ses => kinds::SesIdentity::PARAMS,
            ResourceKind::CloudFront => kinds::Distribution::PARAMS,
        }
    }

    /// Run the kind's query and serialize the records
    pub async fn query(self, clients: &AwsClients, params: &SearchParams) -> Result<Vec<Value>> {
        let source = clients.aggregator.as_ref();

        match self {
            ResourceKind::Ec2 => to_values(kinds::query_ec2_instances(source, params).await?),
            ResourceKind::Vpc => to_values(kinds::query_vpcs(source, params).await?),
            ResourceKind::Rds => to_values(kinds::query_rds_instances(source, params).await?),
            ResourceKind::Lambda => to_values(kinds::query_lambda_functions(source, params).await?),
            ResourceKind::LoadBalancer => {
                to_values(kinds::query_load_balancers(source, params).await?)
            }
            ResourceKind::NetworkInterface => {
                to_values(kinds::query_network_interfaces(source, params).await?)
            }
            ResourceKind::S3 => to_values(kinds::query_s3_buckets(source, params).await?),
            ResourceKind::Iam => to_values(
                kinds::query_iam_users(source, clients.identity.as_ref(), params).await?,
            ),
            ResourceKind::Ses => to_values(kinds::query_ses_identities(source, params).await?),
            ResourceKind::CloudFront => {
                to_values(kinds::query_cloudfront_distributions(source, params).await?)
            }
        }
    }
}

fn to_values<T: Serialize>(records: Vec<T>) -> Result<Vec<Value>> {
    records
        .into_iter()
        .map(|r| serde_json::to_value(r).context("Failed to serialize record"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::get_resource;

    #[test]
    fn test_keys_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ResourceKind::from_key("ec3"), None);
    }

    #[test]
    fn test_every_kind_has_matching_registry_entry() {
        for kind in ResourceKind::ALL {
            let def = get_resource(kind.key())
                .unwrap_or_else(|| panic!("missing registry entry for {}", kind.key()));
            assert_eq!(def.resource_type, kind.resource_type(), "{}", kind.key());
            assert_eq!(def.param_keys(), kind.params().to_vec(), "{}", kind.key());
        }
    }

    #[test]
    fn test_every_allowed_param_is_accepted() {
        for kind in ResourceKind::ALL {
            for key in kind.params() {
                let params = SearchParams::from_query(kind.params(), [(*key, "x")]);
                assert_ne!(params, SearchParams::default(), "{}: {}", kind.key(), key);
            }
        }
    }

    #[test]
    fn test_every_kind_filters_account_and_region() {
        for kind in ResourceKind::ALL {
            assert!(kind.params().contains(&"accountId"));
            assert!(kind.params().contains(&"region"));
        }
    }
}

//! Per-kind resource records
//!
//! Each kind pairs a typed configuration (what AWS Config stores) with the
//! flat record returned to the browser. [`query`] composes the executor,
//! the configuration decode and the kind's filters.

mod compute;
mod identity;
mod network;
mod storage;

pub use compute::{query_ec2_instances, query_lambda_functions, Ec2Instance, LambdaFunction};
pub use identity::{query_iam_users, query_ses_identities, IamUser, SesIdentity};
pub use network::{
    query_cloudfront_distributions, query_load_balancers, query_network_interfaces, query_vpcs,
    Distribution, LoadBalancer, NetworkInterface, Vpc,
};
pub use storage::{query_rds_instances, query_s3_buckets, RdsInstance, S3Bucket};

use super::fetcher::{execute_query, DecodeFailure, RawResource};
use super::filter::{SearchParams, Width};
use crate::aws::aggregator::AggregatorSource;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A flat, serializable view of one aggregator resource type
pub trait ResourceView: Serialize + Sized + Send {
    /// AWS Config resource type, e.g. `AWS::EC2::Instance`
    const RESOURCE_TYPE: &'static str;

    /// Query-string parameters accepted for this kind
    const PARAMS: &'static [&'static str];

    /// Filter normalization for this kind
    const WIDTH: Width = Width::AsTyped;

    /// Typed configuration payload with defaults for missing fields
    type Config: DeserializeOwned + Default;

    /// Project a decoded row onto the flat record
    fn project(raw: &RawResource, config: Self::Config) -> Self;

    /// Whether the record satisfies every supplied filter
    fn matches(&self, params: &SearchParams) -> bool;
}

/// Query one resource kind: fetch all pages, decode, project and filter
pub async fn query<V: ResourceView>(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<V>> {
    let mut batch = execute_query(source, V::RESOURCE_TYPE).await?;
    let total = batch.records.len();
    let mut records = Vec::new();

    for raw in std::mem::take(&mut batch.records) {
        match super::extract::decode_configuration::<V::Config>(&raw.configuration) {
            Ok(config) => {
                let record = V::project(&raw, config);
                if record.matches(params) {
                    records.push(record);
                }
            }
            Err(e) => batch.failures.push(DecodeFailure {
                resource_id: Some(raw.resource_id.clone()),
                reason: format!("{:#}", e),
            }),
        }
    }

    batch.log_failures(V::RESOURCE_TYPE);
    tracing::info!(
        "{}: {} of {} row(s) matched",
        V::RESOURCE_TYPE,
        records.len(),
        total
    );

    Ok(records)
}

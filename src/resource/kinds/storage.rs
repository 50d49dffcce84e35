//! Data stores: RDS instances and S3 buckets

use super::{query, ResourceView};
use crate::aws::aggregator::AggregatorSource;
use crate::resource::extract::{first_non_empty, lenient, name_tag};
use crate::resource::fetcher::RawResource;
use crate::resource::filter::{matches_filter, SearchParams};
use anyhow::Result;
use serde::{Deserialize, Serialize};

// =============================================================================
// RDS instances
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DbInstanceConfig {
    #[serde(rename = "dBInstanceIdentifier", alias = "dbInstanceIdentifier")]
    #[serde(deserialize_with = "lenient")]
    db_instance_identifier: Option<String>,
    #[serde(rename = "dBInstanceClass", alias = "dbInstanceClass")]
    #[serde(deserialize_with = "lenient")]
    db_instance_class: Option<String>,
    #[serde(rename = "dBInstanceStatus", alias = "dbInstanceStatus")]
    #[serde(deserialize_with = "lenient")]
    db_instance_status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    engine: Option<String>,
    #[serde(rename = "engineVersion")]
    #[serde(deserialize_with = "lenient")]
    engine_version: Option<String>,
    #[serde(deserialize_with = "lenient")]
    endpoint: Option<DbEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DbEndpoint {
    #[serde(deserialize_with = "lenient")]
    address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsInstance {
    pub account_id: String,
    pub region: String,
    pub db_instance_id: String,
    pub name: String,
    pub engine: String,
    pub engine_version: String,
    pub db_instance_class: String,
    pub status: String,
    pub endpoint: String,
}

impl ResourceView for RdsInstance {
    const RESOURCE_TYPE: &'static str = "AWS::RDS::DBInstance";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "dbInstanceId", "name"];
    type Config = DbInstanceConfig;

    fn project(raw: &RawResource, config: DbInstanceConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            // resourceId is the opaque "db-XXXX" resource id
            db_instance_id: first_non_empty([
                config.db_instance_identifier.as_deref(),
                raw.resource_name.as_deref(),
                Some(raw.resource_id.as_str()),
            ]),
            name: name_tag(raw.tags.as_deref()),
            engine: config.engine.unwrap_or_default(),
            engine_version: config.engine_version.unwrap_or_default(),
            db_instance_class: config.db_instance_class.unwrap_or_default(),
            status: config.db_instance_status.unwrap_or_default(),
            endpoint: config
                .endpoint
                .and_then(|e| e.address)
                .unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.db_instance_id, p.db_instance_id.as_deref(), w)
            && matches_filter(&self.name, p.name.as_deref(), w)
    }
}

/// Search RDS DB instances across the aggregator
pub async fn query_rds_instances(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<RdsInstance>> {
    query(source, params).await
}

// =============================================================================
// S3 buckets
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BucketConfig {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    creation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Bucket {
    pub account_id: String,
    pub region: String,
    pub bucket_name: String,
    pub name: String,
    pub creation_date: String,
}

impl ResourceView for S3Bucket {
    const RESOURCE_TYPE: &'static str = "AWS::S3::Bucket";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "bucketName"];
    type Config = BucketConfig;

    fn project(raw: &RawResource, config: BucketConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            bucket_name: first_non_empty([config.name.as_deref(), Some(raw.resource_id.as_str())]),
            name: name_tag(raw.tags.as_deref()),
            creation_date: config.creation_date.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.bucket_name, p.bucket_name.as_deref(), w)
    }
}

/// Search S3 buckets across the aggregator
pub async fn query_s3_buckets(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<S3Bucket>> {
    query(source, params).await
}

//! Compute resources: EC2 instances and Lambda functions

use super::{query, ResourceView};
use crate::aws::aggregator::AggregatorSource;
use crate::resource::extract::{first_non_empty, lenient, name_tag};
use crate::resource::fetcher::RawResource;
use crate::resource::filter::{matches_any, matches_filter, SearchParams, Width};
use anyhow::Result;
use serde::{Deserialize, Serialize};

// =============================================================================
// EC2 instances
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceConfig {
    #[serde(deserialize_with = "lenient")]
    instance_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    instance_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    private_ip_address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    public_ip_address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    state: Option<InstanceState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstanceState {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Instance {
    pub account_id: String,
    pub region: String,
    pub instance_id: String,
    pub name: String,
    pub instance_type: String,
    pub state: String,
    pub private_ip_address: String,
    pub public_ip_address: String,
}

impl ResourceView for Ec2Instance {
    const RESOURCE_TYPE: &'static str = "AWS::EC2::Instance";
    const PARAMS: &'static [&'static str] =
        &["accountId", "region", "instanceId", "ipAddress", "name"];
    const WIDTH: Width = Width::FoldFullWidth;
    type Config = InstanceConfig;

    fn project(raw: &RawResource, config: InstanceConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            instance_id: first_non_empty([
                Some(raw.resource_id.as_str()),
                config.instance_id.as_deref(),
            ]),
            name: name_tag(raw.tags.as_deref()),
            instance_type: config.instance_type.unwrap_or_default(),
            state: config.state.and_then(|s| s.name).unwrap_or_default(),
            private_ip_address: config.private_ip_address.unwrap_or_default(),
            public_ip_address: config.public_ip_address.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.instance_id, p.instance_id.as_deref(), w)
            && matches_filter(&self.name, p.name.as_deref(), w)
            && matches_any(
                &[self.private_ip_address.as_str(), self.public_ip_address.as_str()],
                p.ip_address.as_deref(),
                w,
            )
    }
}

/// Search EC2 instances across the aggregator
pub async fn query_ec2_instances(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<Ec2Instance>> {
    query(source, params).await
}

// =============================================================================
// Lambda functions
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionConfig {
    #[serde(deserialize_with = "lenient")]
    function_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    runtime: Option<String>,
    #[serde(deserialize_with = "lenient")]
    handler: Option<String>,
    #[serde(deserialize_with = "lenient")]
    memory_size: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    timeout: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaFunction {
    pub account_id: String,
    pub region: String,
    pub function_name: String,
    pub name: String,
    pub runtime: String,
    pub handler: String,
    pub memory_size: i64,
    pub timeout: i64,
    pub last_modified: String,
}

impl ResourceView for LambdaFunction {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Function";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "functionName", "name"];
    type Config = FunctionConfig;

    fn project(raw: &RawResource, config: FunctionConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            function_name: first_non_empty([
                config.function_name.as_deref(),
                Some(raw.resource_id.as_str()),
            ]),
            name: name_tag(raw.tags.as_deref()),
            runtime: config.runtime.unwrap_or_default(),
            handler: config.handler.unwrap_or_default(),
            memory_size: config.memory_size.unwrap_or_default(),
            timeout: config.timeout.unwrap_or_default(),
            last_modified: config.last_modified.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.function_name, p.function_name.as_deref(), w)
            && matches_filter(&self.name, p.name.as_deref(), w)
    }
}

/// Search Lambda functions across the aggregator
pub async fn query_lambda_functions(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<LambdaFunction>> {
    query(source, params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::extract::decode_configuration;
    use crate::resource::fetcher::Tag;
    use serde_json::json;

    fn raw(resource_id: &str, configuration: serde_json::Value) -> RawResource {
        RawResource {
            account_id: "123456789012".into(),
            aws_region: "ap-northeast-1".into(),
            resource_id: resource_id.into(),
            resource_name: None,
            configuration,
            tags: Some(vec![Tag {
                key: Some("Name".into()),
                value: Some("web-01".into()),
            }]),
        }
    }

    fn instance(configuration: serde_json::Value) -> Ec2Instance {
        let raw = raw("i-0abc", configuration);
        let config = decode_configuration(&raw.configuration).unwrap();
        Ec2Instance::project(&raw, config)
    }

    #[test]
    fn test_instance_projection() {
        let i = instance(json!({
            "instanceType": "t3.micro",
            "privateIpAddress": "10.0.1.123",
            "publicIpAddress": null,
            "state": {"code": 16, "name": "running"}
        }));
        assert_eq!(i.instance_id, "i-0abc");
        assert_eq!(i.name, "web-01");
        assert_eq!(i.instance_type, "t3.micro");
        assert_eq!(i.state, "running");
        assert_eq!(i.public_ip_address, "");
    }

    #[test]
    fn test_instance_ip_filter_checks_public_address() {
        let i = instance(json!({
            "privateIpAddress": "10.0.1.5",
            "publicIpAddress": "54.250.1.9"
        }));
        let mut p = SearchParams::default();
        p.ip_address = Some("54.250".into());
        assert!(i.matches(&p));
        p.ip_address = Some("１０．０".into());
        assert!(!i.matches(&p), "full-width dot is not folded");
        p.ip_address = Some("１０".into());
        assert!(i.matches(&p));
    }

    #[test]
    fn test_instance_filters_are_anded() {
        let i = instance(json!({}));
        let mut p = SearchParams::default();
        p.account_id = Some("123456789012".into());
        p.name = Some("WEB".into());
        assert!(i.matches(&p));
        p.region = Some("us-east-1".into());
        assert!(!i.matches(&p));
    }

    #[test]
    fn test_function_prefers_configured_name() {
        let raw = raw("resource-id-1", json!({"functionName": "thumbnailer", "memorySize": 256}));
        let config = decode_configuration(&raw.configuration).unwrap();
        let f = LambdaFunction::project(&raw, config);
        assert_eq!(f.function_name, "thumbnailer");
        assert_eq!(f.memory_size, 256);
        assert_eq!(f.timeout, 0);
    }

    #[test]
    fn test_function_falls_back_to_resource_id() {
        let raw = raw("legacy-fn", json!({}));
        let config = decode_configuration(&raw.configuration).unwrap();
        let f = LambdaFunction::project(&raw, config);
        assert_eq!(f.function_name, "legacy-fn");
    }

    #[test]
    fn test_function_filter_does_not_fold_full_width() {
        let raw = raw("fn", json!({"functionName": "job123"}));
        let config = decode_configuration(&raw.configuration).unwrap();
        let f = LambdaFunction::project(&raw, config);
        let mut p = SearchParams::default();
        p.function_name = Some("１２３".into());
        assert!(!f.matches(&p));
        p.function_name = Some("JOB1".into());
        assert!(f.matches(&p));
    }
}

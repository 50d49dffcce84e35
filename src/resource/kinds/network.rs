//! Network resources: VPCs, network interfaces, load balancers and
//! CloudFront distributions

use super::{query, ResourceView};
use crate::aws::aggregator::AggregatorSource;
use crate::resource::extract::{first_non_empty, lenient, name_tag};
use crate::resource::fetcher::RawResource;
use crate::resource::filter::{matches_any, matches_filter, SearchParams, Width};
use anyhow::Result;
use serde::{Deserialize, Serialize};

// =============================================================================
// VPCs
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VpcConfig {
    #[serde(deserialize_with = "lenient")]
    cidr_block: Option<String>,
    #[serde(deserialize_with = "lenient")]
    is_default: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub account_id: String,
    pub region: String,
    pub vpc_id: String,
    pub name: String,
    pub cidr_block: String,
    pub is_default: bool,
    pub state: String,
}

impl ResourceView for Vpc {
    const RESOURCE_TYPE: &'static str = "AWS::EC2::VPC";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "vpcId", "cidr", "name"];
    const WIDTH: Width = Width::FoldFullWidth;
    type Config = VpcConfig;

    fn project(raw: &RawResource, config: VpcConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            vpc_id: raw.resource_id.clone(),
            name: name_tag(raw.tags.as_deref()),
            cidr_block: config.cidr_block.unwrap_or_default(),
            is_default: config.is_default.unwrap_or_default(),
            state: config.state.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.vpc_id, p.vpc_id.as_deref(), w)
            && matches_filter(&self.cidr_block, p.cidr.as_deref(), w)
            && matches_filter(&self.name, p.name.as_deref(), w)
    }
}

/// Search VPCs across the aggregator
pub async fn query_vpcs(source: &dyn AggregatorSource, params: &SearchParams) -> Result<Vec<Vpc>> {
    query(source, params).await
}

// =============================================================================
// Network interfaces
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceConfig {
    #[serde(deserialize_with = "lenient")]
    network_interface_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    private_ip_address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    association: Option<InterfaceAssociation>,
    #[serde(deserialize_with = "lenient")]
    attachment: Option<InterfaceAttachment>,
    #[serde(deserialize_with = "lenient")]
    subnet_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    vpc_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    interface_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InterfaceAssociation {
    #[serde(deserialize_with = "lenient")]
    public_ip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InterfaceAttachment {
    #[serde(deserialize_with = "lenient")]
    instance_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub account_id: String,
    pub region: String,
    pub network_interface_id: String,
    pub name: String,
    pub private_ip_address: String,
    pub public_ip_address: String,
    pub subnet_id: String,
    pub vpc_id: String,
    pub interface_type: String,
    pub status: String,
    pub attached_instance_id: String,
    pub description: String,
}

impl ResourceView for NetworkInterface {
    const RESOURCE_TYPE: &'static str = "AWS::EC2::NetworkInterface";
    const PARAMS: &'static [&'static str] = &[
        "accountId",
        "region",
        "networkInterfaceId",
        "ipAddress",
        "subnetId",
        "vpcId",
    ];
    const WIDTH: Width = Width::FoldFullWidth;
    type Config = InterfaceConfig;

    fn project(raw: &RawResource, config: InterfaceConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            network_interface_id: first_non_empty([
                Some(raw.resource_id.as_str()),
                config.network_interface_id.as_deref(),
            ]),
            name: name_tag(raw.tags.as_deref()),
            private_ip_address: config.private_ip_address.unwrap_or_default(),
            public_ip_address: config
                .association
                .and_then(|a| a.public_ip)
                .unwrap_or_default(),
            subnet_id: config.subnet_id.unwrap_or_default(),
            vpc_id: config.vpc_id.unwrap_or_default(),
            interface_type: config.interface_type.unwrap_or_default(),
            status: config.status.unwrap_or_default(),
            attached_instance_id: config
                .attachment
                .and_then(|a| a.instance_id)
                .unwrap_or_default(),
            description: config.description.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(
                &self.network_interface_id,
                p.network_interface_id.as_deref(),
                w,
            )
            && matches_any(
                &[self.private_ip_address.as_str(), self.public_ip_address.as_str()],
                p.ip_address.as_deref(),
                w,
            )
            && matches_filter(&self.subnet_id, p.subnet_id.as_deref(), w)
            && matches_filter(&self.vpc_id, p.vpc_id.as_deref(), w)
    }
}

/// Search network interfaces across the aggregator
pub async fn query_network_interfaces(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<NetworkInterface>> {
    query(source, params).await
}

// =============================================================================
// Load balancers (ELBv2)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancerConfig {
    #[serde(deserialize_with = "lenient")]
    load_balancer_name: Option<String>,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "lenient")]
    lb_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    scheme: Option<String>,
    #[serde(rename = "dNSName", alias = "dnsName")]
    #[serde(deserialize_with = "lenient")]
    dns_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    vpc_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    state: Option<LoadBalancerState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoadBalancerState {
    #[serde(deserialize_with = "lenient")]
    code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub account_id: String,
    pub region: String,
    pub load_balancer_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub lb_type: String,
    pub scheme: String,
    pub dns_name: String,
    pub vpc_id: String,
    pub state: String,
}

impl ResourceView for LoadBalancer {
    const RESOURCE_TYPE: &'static str = "AWS::ElasticLoadBalancingV2::LoadBalancer";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "loadBalancerName"];
    type Config = LoadBalancerConfig;

    fn project(raw: &RawResource, config: LoadBalancerConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            load_balancer_name: first_non_empty([
                config.load_balancer_name.as_deref(),
                Some(raw.resource_id.as_str()),
            ]),
            name: name_tag(raw.tags.as_deref()),
            lb_type: config.lb_type.unwrap_or_default(),
            scheme: config.scheme.unwrap_or_default(),
            dns_name: config.dns_name.unwrap_or_default(),
            vpc_id: config.vpc_id.unwrap_or_default(),
            state: config.state.and_then(|s| s.code).unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.load_balancer_name, p.load_balancer_name.as_deref(), w)
    }
}

/// Search ELBv2 load balancers across the aggregator
pub async fn query_load_balancers(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<LoadBalancer>> {
    query(source, params).await
}

// =============================================================================
// CloudFront distributions
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributionConfig {
    #[serde(deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    domain_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    distribution_config: Option<DistributionSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DistributionSettings {
    #[serde(deserialize_with = "lenient")]
    aliases: Option<Aliases>,
    #[serde(deserialize_with = "lenient")]
    enabled: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Aliases {
    #[serde(deserialize_with = "lenient")]
    items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub account_id: String,
    pub region: String,
    pub distribution_id: String,
    pub name: String,
    pub domain_name: String,
    pub aliases: Vec<String>,
    pub status: String,
    pub enabled: bool,
    pub comment: String,
}

impl ResourceView for Distribution {
    const RESOURCE_TYPE: &'static str = "AWS::CloudFront::Distribution";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "distributionId", "domainName"];
    type Config = DistributionConfig;

    fn project(raw: &RawResource, config: DistributionConfig) -> Self {
        let settings = config.distribution_config.unwrap_or_default();
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            distribution_id: first_non_empty([
                config.id.as_deref(),
                Some(raw.resource_id.as_str()),
            ]),
            name: name_tag(raw.tags.as_deref()),
            domain_name: config.domain_name.unwrap_or_default(),
            aliases: settings
                .aliases
                .and_then(|a| a.items)
                .unwrap_or_default(),
            status: config.status.unwrap_or_default(),
            enabled: settings.enabled.unwrap_or_default(),
            comment: settings.comment.unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        let mut domains: Vec<&str> = vec![self.domain_name.as_str()];
        domains.extend(self.aliases.iter().map(String::as_str));

        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.distribution_id, p.distribution_id.as_deref(), w)
            && matches_any(&domains, p.domain_name.as_deref(), w)
    }
}

/// Search CloudFront distributions across the aggregator
pub async fn query_cloudfront_distributions(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<Distribution>> {
    query(source, params).await
}

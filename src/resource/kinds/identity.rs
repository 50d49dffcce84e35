//! Identities: IAM users and SES email identities

use super::{query, ResourceView};
use crate::aws::aggregator::AggregatorSource;
use crate::aws::identity::IdentitySource;
use crate::resource::enrich::{enrich_users, UNKNOWN};
use crate::resource::extract::{first_non_empty, lenient, name_tag};
use crate::resource::fetcher::RawResource;
use crate::resource::filter::{matches_filter, SearchParams};
use anyhow::Result;
use serde::{Deserialize, Serialize};

// =============================================================================
// IAM users
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    #[serde(deserialize_with = "lenient")]
    user_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    user_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    arn: Option<String>,
    #[serde(deserialize_with = "lenient")]
    create_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IamUser {
    pub account_id: String,
    pub region: String,
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    pub create_date: String,
    /// `None`, `Active`, `Inactive` or `Unknown`
    pub access_key_status: String,
    /// RFC 3339 timestamp, `Never` or `Unknown`
    pub last_console_login: String,
}

impl ResourceView for IamUser {
    const RESOURCE_TYPE: &'static str = "AWS::IAM::User";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "userName"];
    type Config = UserConfig;

    fn project(raw: &RawResource, config: UserConfig) -> Self {
        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            // resourceId is the opaque "AIDA..." user id
            user_name: first_non_empty([
                config.user_name.as_deref(),
                raw.resource_name.as_deref(),
                Some(raw.resource_id.as_str()),
            ]),
            user_id: first_non_empty([config.user_id.as_deref(), Some(raw.resource_id.as_str())]),
            arn: config.arn.unwrap_or_default(),
            create_date: config.create_date.unwrap_or_default(),
            access_key_status: UNKNOWN.to_string(),
            last_console_login: UNKNOWN.to_string(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.user_name, p.user_name.as_deref(), w)
    }
}

/// Search IAM users and enrich each match with credential details
pub async fn query_iam_users(
    source: &dyn AggregatorSource,
    identity: &dyn IdentitySource,
    params: &SearchParams,
) -> Result<Vec<IamUser>> {
    let users = query(source, params).await?;
    Ok(enrich_users(identity, users).await)
}

// =============================================================================
// SES email identities
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailIdentityConfig {
    #[serde(rename = "EmailIdentity", alias = "emailIdentity")]
    #[serde(deserialize_with = "lenient")]
    email_identity: Option<String>,
    #[serde(rename = "DkimAttributes", alias = "dkimAttributes")]
    #[serde(deserialize_with = "lenient")]
    dkim_attributes: Option<DkimAttributes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DkimAttributes {
    #[serde(rename = "SigningEnabled", alias = "signingEnabled")]
    #[serde(deserialize_with = "lenient")]
    signing_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SesIdentity {
    pub account_id: String,
    pub region: String,
    pub identity_name: String,
    /// `EMAIL_ADDRESS` or `DOMAIN`
    pub identity_type: String,
    pub dkim_signing_enabled: bool,
}

impl ResourceView for SesIdentity {
    const RESOURCE_TYPE: &'static str = "AWS::SES::EmailIdentity";
    const PARAMS: &'static [&'static str] = &["accountId", "region", "identityName"];
    type Config = EmailIdentityConfig;

    fn project(raw: &RawResource, config: EmailIdentityConfig) -> Self {
        let identity_name = first_non_empty([
            config.email_identity.as_deref(),
            Some(raw.resource_id.as_str()),
        ]);
        let identity_type = if identity_name.contains('@') {
            "EMAIL_ADDRESS"
        } else {
            "DOMAIN"
        };

        Self {
            account_id: raw.account_id.clone(),
            region: raw.aws_region.clone(),
            identity_type: identity_type.to_string(),
            identity_name,
            dkim_signing_enabled: config
                .dkim_attributes
                .and_then(|d| d.signing_enabled)
                .unwrap_or_default(),
        }
    }

    fn matches(&self, p: &SearchParams) -> bool {
        let w = Self::WIDTH;
        matches_filter(&self.account_id, p.account_id.as_deref(), w)
            && matches_filter(&self.region, p.region.as_deref(), w)
            && matches_filter(&self.identity_name, p.identity_name.as_deref(), w)
    }
}

/// Search SES email identities across the aggregator
pub async fn query_ses_identities(
    source: &dyn AggregatorSource,
    params: &SearchParams,
) -> Result<Vec<SesIdentity>> {
    query(source, params).await
}

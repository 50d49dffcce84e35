//! Search filters
//!
//! Every filter is a case-insensitive substring match; a record must
//! satisfy all supplied filters. Some resource kinds additionally fold
//! full-width letters and digits in the filter to ASCII, so input typed
//! through a double-byte IME still matches.

/// Offset between full-width ASCII variants (U+FF01..) and ASCII
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// How filter input is normalized before matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Compare as typed (lowercased)
    AsTyped,
    /// Fold full-width alphanumerics to half-width first
    FoldFullWidth,
}

/// Optional search filters accepted by the HTTP endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub account_id: Option<String>,
    pub region: Option<String>,
    pub name: Option<String>,
    pub instance_id: Option<String>,
    pub ip_address: Option<String>,
    pub vpc_id: Option<String>,
    pub cidr: Option<String>,
    pub db_instance_id: Option<String>,
    pub function_name: Option<String>,
    pub load_balancer_name: Option<String>,
    pub network_interface_id: Option<String>,
    pub subnet_id: Option<String>,
    pub bucket_name: Option<String>,
    pub user_name: Option<String>,
    pub identity_name: Option<String>,
    pub distribution_id: Option<String>,
    pub domain_name: Option<String>,
}

impl SearchParams {
    /// Build filters from query-string pairs, keeping only `allowed` keys
    /// with non-empty values. The first occurrence of a repeated key wins.
    pub fn from_query<'a, I>(allowed: &[&str], pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            if value.trim().is_empty() {
                continue;
            }
            if !allowed.contains(&key) {
                tracing::debug!("Ignoring unsupported search parameter: {}", key);
                continue;
            }
            if let Some(slot) = params.slot_mut(key) {
                if slot.is_none() {
                    *slot = Some(value.to_string());
                }
            }
        }
        params
    }

    /// Filter slot for a query-string key
    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "accountId" => &mut self.account_id,
            "region" => &mut self.region,
            "name" => &mut self.name,
            "instanceId" => &mut self.instance_id,
            "ipAddress" => &mut self.ip_address,
            "vpcId" => &mut self.vpc_id,
            "cidr" => &mut self.cidr,
            "dbInstanceId" => &mut self.db_instance_id,
            "functionName" => &mut self.function_name,
            "loadBalancerName" => &mut self.load_balancer_name,
            "networkInterfaceId" => &mut self.network_interface_id,
            "subnetId" => &mut self.subnet_id,
            "bucketName" => &mut self.bucket_name,
            "userName" => &mut self.user_name,
            "identityName" => &mut self.identity_name,
            "distributionId" => &mut self.distribution_id,
            "domainName" => &mut self.domain_name,
            _ => return None,
        };
        Some(slot)
    }
}

/// Convert full-width ASCII letters and digits to half-width
pub fn to_half_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => {
                char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Case-insensitive substring match; an absent filter always matches
pub fn matches_filter(value: &str, filter: Option<&str>, width: Width) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    let needle = match width {
        Width::AsTyped => filter.to_lowercase(),
        Width::FoldFullWidth => to_half_width(filter).to_lowercase(),
    };

    value.to_lowercase().contains(&needle)
}

/// Match a filter against several candidate fields (e.g. private and
/// public addresses); any candidate matching is enough
pub fn matches_any(values: &[&str], filter: Option<&str>, width: Width) -> bool {
    if filter.is_none() {
        return true;
    }
    values.iter().any(|v| matches_filter(v, filter, width))
}

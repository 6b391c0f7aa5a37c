//! Billing usage models
//!
//! Usage counters are read-only. Query, limit and decision usage cover a
//! time window; record, monitor and filter chain usage are current totals.

use serde::{Deserialize, Serialize};

/// Query usage over a window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUsage {
    #[serde(default)]
    pub clean_queries: u64,

    #[serde(default)]
    pub ddos_queries: u64,

    #[serde(default)]
    pub nxd_responses: u64,

    #[serde(default)]
    pub by_network: Vec<NetworkQueryUsage>,
}

/// Query usage on one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkQueryUsage {
    pub network: u32,

    #[serde(default)]
    pub clean_queries: u64,

    #[serde(default)]
    pub ddos_queries: u64,

    #[serde(default)]
    pub nxd_responses: u64,

    #[serde(default)]
    pub billable_queries: u64,
}

/// Plan limits in effect over a window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    #[serde(default)]
    pub queries_limit: u64,

    #[serde(default)]
    pub china_queries_limit: u64,

    #[serde(default)]
    pub records_limit: u64,

    #[serde(default)]
    pub filter_chains_limit: u64,

    #[serde(default)]
    pub monitors_limit: u64,

    #[serde(default)]
    pub decisions_limit: u64,

    #[serde(default)]
    pub nxd_protection_enabled: bool,

    #[serde(default)]
    pub ddos_protection_enabled: bool,

    #[serde(default)]
    pub include_dedicated_dns_network_in_managed_dns_usage: bool,
}

/// A single usage total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalUsage {
    #[serde(default)]
    pub total_usage: u64,
}

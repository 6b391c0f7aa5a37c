// Billing usage endpoints
//
// Windows are Unix timestamps in seconds, sent as `from`/`to` query
// parameters.

use ns1_core::Result;

use crate::client::Ns1Client;
use crate::model::{QueryUsage, TotalUsage, UsageLimits};

impl Ns1Client {
    fn windowed_url(&self, path: &str, from: i64, to: i64) -> String {
        format!("{}?from={}&to={}", self.url(path), from, to)
    }

    /// `GET /billing-usage/queries`
    pub async fn get_query_usage(&self, from: i64, to: i64) -> Result<QueryUsage> {
        self.get(&self.windowed_url("billing-usage/queries", from, to)).await
    }

    /// `GET /billing-usage/limits`
    pub async fn get_usage_limits(&self, from: i64, to: i64) -> Result<UsageLimits> {
        self.get(&self.windowed_url("billing-usage/limits", from, to)).await
    }

    /// `GET /billing-usage/decisions`
    pub async fn get_decision_usage(&self, from: i64, to: i64) -> Result<TotalUsage> {
        self.get(&self.windowed_url("billing-usage/decisions", from, to)).await
    }

    /// `GET /billing-usage/records`
    pub async fn get_record_usage(&self) -> Result<TotalUsage> {
        self.get(&self.url("billing-usage/records")).await
    }

    /// `GET /billing-usage/monitors`
    pub async fn get_monitor_usage(&self) -> Result<TotalUsage> {
        self.get(&self.url("billing-usage/monitors")).await
    }

    /// `GET /billing-usage/filter-chains`
    pub async fn get_filter_chain_usage(&self) -> Result<TotalUsage> {
        self.get(&self.url("billing-usage/filter-chains")).await
    }
}

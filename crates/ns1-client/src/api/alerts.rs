// Alerts live under the separate alerting API

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::Alert;

impl Ns1Client {
    /// `GET /alerting/v1/alerts/{id}`
    pub async fn get_alert(&self, id: &str) -> Result<Alert> {
        self.get(&self.alerting_url(&format!("alerts/{}", id))).await
    }

    /// `POST /alerting/v1/alerts`
    pub async fn create_alert(&self, alert: &Alert) -> Result<Alert> {
        self.post(&self.alerting_url("alerts"), alert).await
    }

    /// `PATCH /alerting/v1/alerts/{id}`
    pub async fn update_alert(&self, alert: &Alert) -> Result<Alert> {
        let id = alert
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("alert update requires an id"))?;
        self.patch(&self.alerting_url(&format!("alerts/{}", id)), alert).await
    }

    /// `DELETE /alerting/v1/alerts/{id}`
    pub async fn delete_alert(&self, id: &str) -> Result<()> {
        self.delete(&self.alerting_url(&format!("alerts/{}", id))).await
    }
}

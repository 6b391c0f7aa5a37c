// Monitoring endpoints: jobs, notification lists and regions

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::{Job, MonitorRegion, NotifyList};

impl Ns1Client {
    /// `GET /monitoring/jobs/{id}`
    pub async fn get_job(&self, id: &str) -> Result<Job> {
        self.get(&self.url(&format!("monitoring/jobs/{}", id))).await
    }

    /// `PUT /monitoring/jobs`
    pub async fn create_job(&self, job: &Job) -> Result<Job> {
        self.put(&self.url("monitoring/jobs"), job).await
    }

    /// `POST /monitoring/jobs/{id}`
    pub async fn update_job(&self, job: &Job) -> Result<Job> {
        let id = job
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("monitoring job update requires an id"))?;
        self.post(&self.url(&format!("monitoring/jobs/{}", id)), job).await
    }

    /// `DELETE /monitoring/jobs/{id}`
    pub async fn delete_job(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("monitoring/jobs/{}", id))).await
    }

    /// `GET /lists/{id}`
    pub async fn get_notify_list(&self, id: &str) -> Result<NotifyList> {
        self.get(&self.url(&format!("lists/{}", id))).await
    }

    /// `PUT /lists`
    pub async fn create_notify_list(&self, list: &NotifyList) -> Result<NotifyList> {
        self.put(&self.url("lists"), list).await
    }

    /// `POST /lists/{id}`
    pub async fn update_notify_list(&self, list: &NotifyList) -> Result<NotifyList> {
        let id = list
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("notify list update requires an id"))?;
        self.post(&self.url(&format!("lists/{}", id)), list).await
    }

    /// `DELETE /lists/{id}`
    pub async fn delete_notify_list(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("lists/{}", id))).await
    }

    /// `GET /monitoring/regions`
    pub async fn list_monitor_regions(&self) -> Result<Vec<MonitorRegion>> {
        self.get(&self.url("monitoring/regions")).await
    }
}

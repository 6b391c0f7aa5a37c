// Pulsar applications and jobs

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::{Application, PulsarJob};

impl Ns1Client {
    /// `GET /pulsar/apps/{id}`
    pub async fn get_application(&self, id: &str) -> Result<Application> {
        self.get(&self.url(&format!("pulsar/apps/{}", id))).await
    }

    /// `PUT /pulsar/apps`
    pub async fn create_application(&self, app: &Application) -> Result<Application> {
        self.put(&self.url("pulsar/apps"), app).await
    }

    /// `POST /pulsar/apps/{id}`
    pub async fn update_application(&self, app: &Application) -> Result<Application> {
        let id = app
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("application update requires an id"))?;
        self.post(&self.url(&format!("pulsar/apps/{}", id)), app).await
    }

    /// `DELETE /pulsar/apps/{id}`
    pub async fn delete_application(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("pulsar/apps/{}", id))).await
    }

    /// `GET /pulsar/apps/{app_id}/jobs/{job_id}`
    pub async fn get_pulsar_job(&self, app_id: &str, job_id: &str) -> Result<PulsarJob> {
        self.get(&self.url(&format!("pulsar/apps/{}/jobs/{}", app_id, job_id)))
            .await
    }

    /// `PUT /pulsar/apps/{app_id}/jobs`
    pub async fn create_pulsar_job(&self, job: &PulsarJob) -> Result<PulsarJob> {
        self.put(&self.url(&format!("pulsar/apps/{}/jobs", job.app_id)), job)
            .await
    }

    /// `POST /pulsar/apps/{app_id}/jobs/{job_id}`
    pub async fn update_pulsar_job(&self, job: &PulsarJob) -> Result<PulsarJob> {
        let id = job
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("pulsar job update requires an id"))?;
        self.post(
            &self.url(&format!("pulsar/apps/{}/jobs/{}", job.app_id, id)),
            job,
        )
        .await
    }

    /// `DELETE /pulsar/apps/{app_id}/jobs/{job_id}`
    pub async fn delete_pulsar_job(&self, app_id: &str, job_id: &str) -> Result<()> {
        self.delete(&self.url(&format!("pulsar/apps/{}/jobs/{}", app_id, job_id)))
            .await
    }
}

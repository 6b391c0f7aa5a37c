// Redirect configurations and certificates

use ns1_core::{Error, Result};
use serde_json::json;

use crate::client::Ns1Client;
use crate::model::{RedirectCertificate, RedirectConfiguration};

impl Ns1Client {
    /// `GET /redirect/{id}`
    pub async fn get_redirect(&self, id: &str) -> Result<RedirectConfiguration> {
        self.get(&self.url(&format!("redirect/{}", id))).await
    }

    /// `PUT /redirect`
    pub async fn create_redirect(
        &self,
        redirect: &RedirectConfiguration,
    ) -> Result<RedirectConfiguration> {
        self.put(&self.url("redirect"), redirect).await
    }

    /// `POST /redirect/{id}`
    pub async fn update_redirect(
        &self,
        redirect: &RedirectConfiguration,
    ) -> Result<RedirectConfiguration> {
        let id = redirect
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("redirect update requires an id"))?;
        self.post(&self.url(&format!("redirect/{}", id)), redirect).await
    }

    /// `DELETE /redirect/{id}`
    pub async fn delete_redirect(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("redirect/{}", id))).await
    }

    /// `GET /redirect/certificates/{id}`
    pub async fn get_redirect_certificate(&self, id: &str) -> Result<RedirectCertificate> {
        self.get(&self.url(&format!("redirect/certificates/{}", id))).await
    }

    /// `PUT /redirect/certificates` with the domain to issue for
    pub async fn create_redirect_certificate(&self, domain: &str) -> Result<RedirectCertificate> {
        self.put(&self.url("redirect/certificates"), &json!({ "domain": domain }))
            .await
    }

    /// `POST /redirect/certificates/{id}` requests a renewal
    pub async fn renew_redirect_certificate(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(&self.url(&format!("redirect/certificates/{}", id)), &json!({}))
            .await?;
        Ok(())
    }

    /// `DELETE /redirect/certificates/{id}`
    ///
    /// Revocation is asynchronous, the certificate stays readable for a while.
    pub async fn delete_redirect_certificate(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("redirect/certificates/{}", id)))
            .await
    }
}

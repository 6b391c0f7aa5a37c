// Datasets. The API offers no update endpoint.

use ns1_core::Result;

use crate::client::Ns1Client;
use crate::model::Dataset;

impl Ns1Client {
    /// `GET /datasets/{id}`
    pub async fn get_dataset(&self, id: &str) -> Result<Dataset> {
        self.get(&self.url(&format!("datasets/{}", id))).await
    }

    /// `PUT /datasets`
    pub async fn create_dataset(&self, dataset: &Dataset) -> Result<Dataset> {
        self.put(&self.url("datasets"), dataset).await
    }

    /// `DELETE /datasets/{id}`
    pub async fn delete_dataset(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("datasets/{}", id))).await
    }
}

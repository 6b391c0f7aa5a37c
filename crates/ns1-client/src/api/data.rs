// Data sources and data feeds

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::{DataFeed, DataSource};

impl Ns1Client {
    /// `GET /data/sources/{id}`
    pub async fn get_data_source(&self, id: &str) -> Result<DataSource> {
        self.get(&self.url(&format!("data/sources/{}", id))).await
    }

    /// `PUT /data/sources`
    pub async fn create_data_source(&self, source: &DataSource) -> Result<DataSource> {
        self.put(&self.url("data/sources"), source).await
    }

    /// `POST /data/sources/{id}`
    pub async fn update_data_source(&self, source: &DataSource) -> Result<DataSource> {
        let id = source
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("data source update requires an id"))?;
        self.post(&self.url(&format!("data/sources/{}", id)), source).await
    }

    /// `DELETE /data/sources/{id}`
    pub async fn delete_data_source(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("data/sources/{}", id))).await
    }

    /// `GET /data/feeds/{source_id}/{feed_id}`
    pub async fn get_data_feed(&self, source_id: &str, feed_id: &str) -> Result<DataFeed> {
        self.get(&self.url(&format!("data/feeds/{}/{}", source_id, feed_id)))
            .await
    }

    /// `PUT /data/feeds/{source_id}`
    pub async fn create_data_feed(&self, source_id: &str, feed: &DataFeed) -> Result<DataFeed> {
        self.put(&self.url(&format!("data/feeds/{}", source_id)), feed).await
    }

    /// `POST /data/feeds/{source_id}/{feed_id}`
    pub async fn update_data_feed(&self, source_id: &str, feed: &DataFeed) -> Result<DataFeed> {
        let id = feed
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("data feed update requires an id"))?;
        self.post(&self.url(&format!("data/feeds/{}/{}", source_id, id)), feed)
            .await
    }

    /// `DELETE /data/feeds/{source_id}/{feed_id}`
    pub async fn delete_data_feed(&self, source_id: &str, feed_id: &str) -> Result<()> {
        self.delete(&self.url(&format!("data/feeds/{}/{}", source_id, feed_id)))
            .await
    }
}

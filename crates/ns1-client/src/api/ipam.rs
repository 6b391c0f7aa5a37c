// IPAM subnets and networks

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::{Network, Subnet};

impl Ns1Client {
    /// `GET /ipam/address/{id}`
    pub async fn get_subnet(&self, id: u64) -> Result<Subnet> {
        self.get(&self.url(&format!("ipam/address/{}", id))).await
    }

    /// `PUT /ipam/address`
    pub async fn create_subnet(&self, subnet: &Subnet) -> Result<Subnet> {
        self.put(&self.url("ipam/address"), subnet).await
    }

    /// `POST /ipam/address/{id}`
    pub async fn update_subnet(&self, subnet: &Subnet) -> Result<Subnet> {
        let id = subnet
            .id
            .ok_or_else(|| Error::invalid_input("subnet update requires an id"))?;
        self.post(&self.url(&format!("ipam/address/{}", id)), subnet).await
    }

    /// `DELETE /ipam/address/{id}`
    pub async fn delete_subnet(&self, id: u64) -> Result<()> {
        self.delete(&self.url(&format!("ipam/address/{}", id))).await
    }

    /// `GET /networks`
    pub async fn list_networks(&self) -> Result<Vec<Network>> {
        self.get(&self.url("networks")).await
    }
}

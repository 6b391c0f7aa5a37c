// Account endpoints: teams, users, API keys and the global IP whitelist

use ns1_core::{Error, Result};

use crate::client::Ns1Client;
use crate::model::{ApiKey, IpWhitelist, Team, User};

impl Ns1Client {
    /// `GET /account/teams/{id}`
    pub async fn get_team(&self, id: &str) -> Result<Team> {
        self.get(&self.url(&format!("account/teams/{}", id))).await
    }

    /// `PUT /account/teams`
    pub async fn create_team(&self, team: &Team) -> Result<Team> {
        self.put(&self.url("account/teams"), team).await
    }

    /// `POST /account/teams/{id}`
    pub async fn update_team(&self, team: &Team) -> Result<Team> {
        let id = team
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("team update requires an id"))?;
        self.post(&self.url(&format!("account/teams/{}", id)), team).await
    }

    /// `DELETE /account/teams/{id}`
    pub async fn delete_team(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("account/teams/{}", id))).await
    }

    /// `GET /account/users/{username}`
    pub async fn get_user(&self, username: &str) -> Result<User> {
        self.get(&self.url(&format!("account/users/{}", username))).await
    }

    /// `PUT /account/users`
    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.put(&self.url("account/users"), user).await
    }

    /// `POST /account/users/{username}`
    pub async fn update_user(&self, user: &User) -> Result<User> {
        self.post(&self.url(&format!("account/users/{}", user.username)), user)
            .await
    }

    /// `DELETE /account/users/{username}`
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        self.delete(&self.url(&format!("account/users/{}", username))).await
    }

    /// `GET /account/apikeys/{id}`
    pub async fn get_api_key(&self, id: &str) -> Result<ApiKey> {
        self.get(&self.url(&format!("account/apikeys/{}", id))).await
    }

    /// `PUT /account/apikeys`
    pub async fn create_api_key(&self, key: &ApiKey) -> Result<ApiKey> {
        self.put(&self.url("account/apikeys"), key).await
    }

    /// `POST /account/apikeys/{id}`
    pub async fn update_api_key(&self, key: &ApiKey) -> Result<ApiKey> {
        let id = key
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("API key update requires an id"))?;
        self.post(&self.url(&format!("account/apikeys/{}", id)), key).await
    }

    /// `DELETE /account/apikeys/{id}`
    pub async fn delete_api_key(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("account/apikeys/{}", id))).await
    }

    /// `GET /account/whitelist/{id}`
    pub async fn get_account_whitelist(&self, id: &str) -> Result<IpWhitelist> {
        self.get(&self.url(&format!("account/whitelist/{}", id))).await
    }

    /// `PUT /account/whitelist`
    pub async fn create_account_whitelist(&self, list: &IpWhitelist) -> Result<IpWhitelist> {
        self.put(&self.url("account/whitelist"), list).await
    }

    /// `POST /account/whitelist/{id}`
    pub async fn update_account_whitelist(&self, list: &IpWhitelist) -> Result<IpWhitelist> {
        let id = list
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("whitelist update requires an id"))?;
        self.post(&self.url(&format!("account/whitelist/{}", id)), list).await
    }

    /// `DELETE /account/whitelist/{id}`
    pub async fn delete_account_whitelist(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("account/whitelist/{}", id))).await
    }
}

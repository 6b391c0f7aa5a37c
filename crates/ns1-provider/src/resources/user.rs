//! `ns1_user`: an account user, identified by username
//!
//! Users inherit the permissions of their teams. The API reports effective
//! permissions, so permission diffs are suppressed for team members and the
//! user is re-read after team membership changes.

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{NotificationSettings, User};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{deleted, found, require};
use crate::permissions::{PermissionAttrs, is_permission_field, suppress_permission_diff};

pub const TYPE_NAME: &str = "ns1_user";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Team IDs
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub teams: Vec<String>,
    #[serde(default)]
    pub notify: NotifyAttrs,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub ip_whitelist: Vec<String>,
    #[serde(default)]
    pub ip_whitelist_strict: bool,
    #[serde(flatten)]
    pub permissions: PermissionAttrs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyAttrs {
    #[serde(default)]
    pub billing: bool,
}

impl UserAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "username", &self.username);
        require(&mut errors, "email", &self.email);
        if !self.email.is_empty() && !self.email.contains('@') {
            errors.push(format!("email: {:?} is not an email address", self.email));
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self) -> User {
        User {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            teams: self.teams.clone(),
            notify: NotificationSettings {
                billing: self.notify.billing,
            },
            ip_whitelist: self.ip_whitelist.clone(),
            ip_whitelist_strict: self.ip_whitelist_strict,
            permissions: self.permissions.to_model(),
            last_access: None,
        }
    }

    pub fn from_model(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            teams: user.teams.clone(),
            notify: NotifyAttrs {
                billing: user.notify.billing,
            },
            ip_whitelist: user.ip_whitelist.clone(),
            ip_whitelist_strict: user.ip_whitelist_strict,
            permissions: PermissionAttrs::from_model(&user.permissions),
        }
    }
}

pub struct UserResource {
    client: Arc<Ns1Client>,
}

impl UserResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for UserResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<UserAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["username"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<UserAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: UserAttrs = data.decode()?;

        let mut user = self.client.create_user(&attrs.to_model()).await?;
        info!("Created user {}", user.username);

        if !attrs.teams.is_empty() {
            debug!("user {} joined teams, refreshing permissions", user.username);
            user = self.client.get_user(&user.username).await?;
        }

        data.set_id(user.username.clone());
        data.set_state(&UserAttrs::from_model(&user))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(user) = found(data, TYPE_NAME, self.client.get_user(&id).await)? else {
            return Ok(());
        };
        data.set_state(&UserAttrs::from_model(&user))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: UserAttrs = data.decode()?;
        let teams_changed = data.has_change("teams");

        let mut user = self.client.update_user(&attrs.to_model()).await?;
        if teams_changed {
            debug!("user {} teams changed, refreshing permissions", user.username);
            user = self.client.get_user(&user.username).await?;
        }

        data.set_state(&UserAttrs::from_model(&user))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_user(&id).await;
        deleted(data, result)
    }

    fn suppress_diff(&self, key: &str, old: &str, new: &str, data: &ResourceData) -> bool {
        is_permission_field(key) && suppress_permission_diff(old, new, data)
    }
}

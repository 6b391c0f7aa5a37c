//! Account models: teams, users, API keys, IP whitelists and permissions

use serde::{Deserialize, Serialize};

/// Permission set granted to a user, API key or team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub dns: DnsPermissions,

    #[serde(default)]
    pub data: DataPermissions,

    #[serde(default)]
    pub account: AccountPermissions,

    #[serde(default)]
    pub monitoring: MonitoringPermissions,

    #[serde(default)]
    pub security: SecurityPermissions,

    /// Only present on accounts with DDI enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<DhcpPermissions>,

    /// Only present on accounts with DDI enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<IpamPermissions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsPermissions {
    #[serde(default)]
    pub view_zones: bool,
    #[serde(default)]
    pub manage_zones: bool,
    #[serde(default)]
    pub zones_allow_by_default: bool,
    #[serde(default)]
    pub zones_deny: Vec<String>,
    #[serde(default)]
    pub zones_allow: Vec<String>,
    #[serde(default)]
    pub records_allow: Vec<RecordPermission>,
    #[serde(default)]
    pub records_deny: Vec<RecordPermission>,
}

/// Record-level permission grant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPermission {
    pub domain: String,
    #[serde(default)]
    pub include_subdomains: bool,
    pub zone: String,
    #[serde(rename = "type")]
    pub record_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPermissions {
    #[serde(default)]
    pub push_to_datafeeds: bool,
    #[serde(default)]
    pub manage_datasources: bool,
    #[serde(default)]
    pub manage_datafeeds: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPermissions {
    #[serde(default)]
    pub manage_users: bool,
    #[serde(default)]
    pub manage_payment_methods: bool,
    #[serde(default)]
    pub manage_plan: bool,
    #[serde(default)]
    pub manage_teams: bool,
    #[serde(default)]
    pub manage_apikeys: bool,
    #[serde(default)]
    pub manage_account_settings: bool,
    #[serde(default)]
    pub view_activity_log: bool,
    #[serde(default)]
    pub view_invoices: bool,
    #[serde(default)]
    pub manage_ip_whitelist: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringPermissions {
    #[serde(default)]
    pub manage_lists: bool,
    #[serde(default)]
    pub manage_jobs: bool,
    #[serde(default)]
    pub view_jobs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPermissions {
    #[serde(default)]
    pub manage_global_2fa: bool,
    #[serde(default)]
    pub manage_active_directory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpPermissions {
    #[serde(default)]
    pub manage_dhcp: bool,
    #[serde(default)]
    pub view_dhcp: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpamPermissions {
    #[serde(default)]
    pub manage_ipam: bool,
    #[serde(default)]
    pub view_ipam: bool,
}

/// A named IP whitelist, attached to a team or account-wide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpWhitelist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A team whose permissions its members inherit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default)]
    pub ip_whitelist: Vec<IpWhitelist>,
}

/// Email notification preferences of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub billing: bool,
}

/// An account user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,

    pub username: String,

    pub email: String,

    /// IDs of teams the user belongs to
    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub notify: NotificationSettings,

    #[serde(default)]
    pub ip_whitelist: Vec<String>,

    #[serde(default)]
    pub ip_whitelist_strict: bool,

    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default, skip_serializing)]
    pub last_access: Option<f64>,
}

/// An API key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Secret key value, only ever returned by the API
    #[serde(default, skip_serializing)]
    pub key: Option<String>,

    pub name: String,

    /// IDs of teams the key belongs to
    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub ip_whitelist: Vec<String>,

    #[serde(default)]
    pub ip_whitelist_strict: bool,

    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default, skip_serializing)]
    pub last_access: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permissions_tolerate_missing_sections() {
        let perms: Permissions = serde_json::from_value(json!({
            "dns": {"view_zones": true},
            "account": {"manage_users": true}
        }))
        .unwrap();

        assert!(perms.dns.view_zones);
        assert!(!perms.dns.manage_zones);
        assert!(perms.account.manage_users);
        assert!(perms.dhcp.is_none());
    }

    #[test]
    fn test_api_key_never_sends_key() {
        let key = ApiKey {
            key: Some("secret".to_string()),
            name: "ci".to_string(),
            ..ApiKey::default()
        };
        let body = serde_json::to_value(key).unwrap();
        assert!(body.get("key").is_none());
    }
}

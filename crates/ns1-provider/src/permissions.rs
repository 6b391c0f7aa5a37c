//! Permission attributes shared by teams, users and API keys
//!
//! The attribute side carries permissions as flat fields
//! (`dns_view_zones`, `account_manage_users`, ...) that map onto the nested
//! API `permissions` object in both directions.
//!
//! Users and API keys that belong to a team inherit the team's permissions,
//! and the API reports the merged result. Diffs on permission fields are
//! therefore suppressed for team members, see [`suppress_permission_diff`].

use ns1_client::model::account::{
    AccountPermissions, DataPermissions, DhcpPermissions, DnsPermissions, IpamPermissions,
    MonitoringPermissions, SecurityPermissions,
};
use ns1_client::model::{Permissions, RecordPermission};
use ns1_core::ResourceData;
use ns1_core::data::attr;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat attribute names of every permission
pub const PERMISSION_FIELDS: &[&str] = &[
    "dns_view_zones",
    "dns_manage_zones",
    "dns_zones_allow_by_default",
    "dns_zones_deny",
    "dns_zones_allow",
    "dns_records_allow",
    "dns_records_deny",
    "data_push_to_datafeeds",
    "data_manage_datasources",
    "data_manage_datafeeds",
    "account_manage_users",
    "account_manage_payment_methods",
    "account_manage_plan",
    "account_manage_teams",
    "account_manage_apikeys",
    "account_manage_account_settings",
    "account_view_activity_log",
    "account_view_invoices",
    "account_manage_ip_whitelist",
    "monitoring_manage_lists",
    "monitoring_manage_jobs",
    "monitoring_view_jobs",
    "security_manage_global_2fa",
    "security_manage_active_directory",
    "dhcp_manage_dhcp",
    "dhcp_view_dhcp",
    "ipam_manage_ipam",
    "ipam_view_ipam",
];

/// Flat permission attributes, flattened into each owning resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionAttrs {
    pub dns_view_zones: bool,
    pub dns_manage_zones: bool,
    pub dns_zones_allow_by_default: bool,
    #[serde(deserialize_with = "attr::nullable_vec")]
    pub dns_zones_deny: Vec<String>,
    #[serde(deserialize_with = "attr::nullable_vec")]
    pub dns_zones_allow: Vec<String>,
    #[serde(deserialize_with = "attr::nullable_vec")]
    pub dns_records_allow: Vec<RecordPermission>,
    #[serde(deserialize_with = "attr::nullable_vec")]
    pub dns_records_deny: Vec<RecordPermission>,

    pub data_push_to_datafeeds: bool,
    pub data_manage_datasources: bool,
    pub data_manage_datafeeds: bool,

    pub account_manage_users: bool,
    pub account_manage_payment_methods: bool,
    pub account_manage_plan: bool,
    pub account_manage_teams: bool,
    pub account_manage_apikeys: bool,
    pub account_manage_account_settings: bool,
    pub account_view_activity_log: bool,
    pub account_view_invoices: bool,
    pub account_manage_ip_whitelist: bool,

    pub monitoring_manage_lists: bool,
    pub monitoring_manage_jobs: bool,
    pub monitoring_view_jobs: bool,

    pub security_manage_global_2fa: bool,
    pub security_manage_active_directory: bool,

    pub dhcp_manage_dhcp: bool,
    pub dhcp_view_dhcp: bool,

    pub ipam_manage_ipam: bool,
    pub ipam_view_ipam: bool,
}

impl PermissionAttrs {
    /// Build the nested API permissions
    ///
    /// DHCP and IPAM sections are only sent when one of their fields is set,
    /// accounts without DDI reject them.
    pub fn to_model(&self) -> Permissions {
        let dhcp = (self.dhcp_manage_dhcp || self.dhcp_view_dhcp).then(|| DhcpPermissions {
            manage_dhcp: self.dhcp_manage_dhcp,
            view_dhcp: self.dhcp_view_dhcp,
        });
        let ipam = (self.ipam_manage_ipam || self.ipam_view_ipam).then(|| IpamPermissions {
            manage_ipam: self.ipam_manage_ipam,
            view_ipam: self.ipam_view_ipam,
        });

        Permissions {
            dns: DnsPermissions {
                view_zones: self.dns_view_zones,
                manage_zones: self.dns_manage_zones,
                zones_allow_by_default: self.dns_zones_allow_by_default,
                zones_deny: self.dns_zones_deny.clone(),
                zones_allow: self.dns_zones_allow.clone(),
                records_allow: self.dns_records_allow.clone(),
                records_deny: self.dns_records_deny.clone(),
            },
            data: DataPermissions {
                push_to_datafeeds: self.data_push_to_datafeeds,
                manage_datasources: self.data_manage_datasources,
                manage_datafeeds: self.data_manage_datafeeds,
            },
            account: AccountPermissions {
                manage_users: self.account_manage_users,
                manage_payment_methods: self.account_manage_payment_methods,
                manage_plan: self.account_manage_plan,
                manage_teams: self.account_manage_teams,
                manage_apikeys: self.account_manage_apikeys,
                manage_account_settings: self.account_manage_account_settings,
                view_activity_log: self.account_view_activity_log,
                view_invoices: self.account_view_invoices,
                manage_ip_whitelist: self.account_manage_ip_whitelist,
            },
            monitoring: MonitoringPermissions {
                manage_lists: self.monitoring_manage_lists,
                manage_jobs: self.monitoring_manage_jobs,
                view_jobs: self.monitoring_view_jobs,
            },
            security: SecurityPermissions {
                manage_global_2fa: self.security_manage_global_2fa,
                manage_active_directory: self.security_manage_active_directory,
            },
            dhcp,
            ipam,
        }
    }

    /// Flatten API permissions into attributes
    pub fn from_model(p: &Permissions) -> Self {
        let dhcp = p.dhcp.clone().unwrap_or_default();
        let ipam = p.ipam.clone().unwrap_or_default();

        Self {
            dns_view_zones: p.dns.view_zones,
            dns_manage_zones: p.dns.manage_zones,
            dns_zones_allow_by_default: p.dns.zones_allow_by_default,
            dns_zones_deny: p.dns.zones_deny.clone(),
            dns_zones_allow: p.dns.zones_allow.clone(),
            dns_records_allow: p.dns.records_allow.clone(),
            dns_records_deny: p.dns.records_deny.clone(),
            data_push_to_datafeeds: p.data.push_to_datafeeds,
            data_manage_datasources: p.data.manage_datasources,
            data_manage_datafeeds: p.data.manage_datafeeds,
            account_manage_users: p.account.manage_users,
            account_manage_payment_methods: p.account.manage_payment_methods,
            account_manage_plan: p.account.manage_plan,
            account_manage_teams: p.account.manage_teams,
            account_manage_apikeys: p.account.manage_apikeys,
            account_manage_account_settings: p.account.manage_account_settings,
            account_view_activity_log: p.account.view_activity_log,
            account_view_invoices: p.account.view_invoices,
            account_manage_ip_whitelist: p.account.manage_ip_whitelist,
            monitoring_manage_lists: p.monitoring.manage_lists,
            monitoring_manage_jobs: p.monitoring.manage_jobs,
            monitoring_view_jobs: p.monitoring.view_jobs,
            security_manage_global_2fa: p.security.manage_global_2fa,
            security_manage_active_directory: p.security.manage_active_directory,
            dhcp_manage_dhcp: dhcp.manage_dhcp,
            dhcp_view_dhcp: dhcp.view_dhcp,
            ipam_manage_ipam: ipam.manage_ipam,
            ipam_view_ipam: ipam.view_ipam,
        }
    }
}

/// Whether `key` is one of the flat permission attributes
pub fn is_permission_field(key: &str) -> bool {
    PERMISSION_FIELDS.contains(&key)
}

/// Suppress a permission diff for resources that belong to a team
///
/// Never suppresses on first apply (`old` empty). Otherwise suppresses
/// whenever `teams` is non-empty in state or in configuration.
///
/// Known limitation: removing the last team together with the `teams`
/// attribute in one apply leaves both sides empty, so the inherited values
/// show up as a diff only on the following apply.
pub fn suppress_permission_diff(old: &str, _new: &str, data: &ResourceData) -> bool {
    if old.is_empty() {
        return false;
    }

    let (state_teams, config_teams) = data.get_change("teams");
    has_teams(state_teams) || has_teams(config_teams)
}

fn has_teams(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(teams)) if !teams.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(state_teams: Value, config_teams: Value) -> ResourceData {
        ResourceData::from_state("jdoe", json!({ "teams": state_teams }))
            .unwrap()
            .with_config(json!({ "teams": config_teams }))
            .unwrap()
    }

    #[test]
    fn test_never_suppress_on_first_apply() {
        let d = data(json!(["team1"]), json!(["team1"]));
        assert!(!suppress_permission_diff("", "true", &d));
    }

    #[test]
    fn test_suppress_when_teams_in_state_or_config() {
        assert!(suppress_permission_diff("false", "true", &data(json!(["t1"]), json!([]))));
        assert!(suppress_permission_diff("false", "true", &data(json!([]), json!(["t1"]))));
        assert!(suppress_permission_diff("true", "false", &data(json!(["t1"]), json!(["t2"]))));
    }

    #[test]
    fn test_no_suppression_without_teams() {
        assert!(!suppress_permission_diff("false", "true", &data(json!([]), json!([]))));
        assert!(!suppress_permission_diff("false", "true", &data(Value::Null, Value::Null)));
    }

    #[test]
    fn test_model_round_trip_keeps_ddi_sections_optional() {
        let attrs = PermissionAttrs {
            dns_view_zones: true,
            dns_zones_allow: vec!["example.io".into()],
            account_manage_users: true,
            ..Default::default()
        };

        let model = attrs.to_model();
        assert!(model.dhcp.is_none());
        assert!(model.ipam.is_none());
        assert_eq!(PermissionAttrs::from_model(&model), attrs);

        let with_ipam = PermissionAttrs {
            ipam_view_ipam: true,
            ..Default::default()
        };
        assert_eq!(with_ipam.to_model().ipam.unwrap().view_ipam, true);
    }

    #[test]
    fn test_field_list_matches_attributes() {
        let value = serde_json::to_value(PermissionAttrs::default()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys.len(), PERMISSION_FIELDS.len());
        for field in PERMISSION_FIELDS {
            assert!(keys.contains(&field.to_string()), "missing {}", field);
        }
    }
}

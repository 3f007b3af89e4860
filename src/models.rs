//! Documents exchanged with the Operations Center.
//!
//! Resource documents use the service's upper-case keys and tolerate missing
//! fields. Request bodies only carry the fields that are set.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Backup servers
// ---------------------------------------------------------------------------

/// A Spectrum Protect server as reported by the Operations Center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupServer {
    /// Server name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Status code reported by the hub.
    #[serde(rename = "STATUS")]
    pub status: i64,
    /// Role in the hub/spoke topology.
    #[serde(rename = "ROLE")]
    pub role: String,
    /// Version, release, modification and fix level.
    #[serde(rename = "VRMF")]
    pub vrmf: String,
    /// Non-zero when the server is configured in the Operations Center.
    #[serde(rename = "CONFIGURED")]
    pub configured: i64,
    /// Link to the server resource.
    #[serde(rename = "LINK")]
    pub link: String,
    /// Number of registered clients.
    #[serde(rename = "NUMCLIENTS")]
    pub num_clients: i64,
    /// Number of active alerts.
    #[serde(rename = "NUMALERTS")]
    pub num_alerts: i64,
    /// Uptime in seconds.
    #[serde(rename = "SEC_UPTIME")]
    pub sec_uptime: i64,
    /// Non-zero when backup data is stored.
    #[serde(rename = "HAS_BACKUP")]
    pub has_backup: i64,
    /// Non-zero when archive data is stored.
    #[serde(rename = "HAS_ARCHIVE")]
    pub has_archive: i64,
    /// Non-zero when space-managed data is stored.
    #[serde(rename = "HAS_SPACEMG")]
    pub has_space_mg: i64,
    /// Database (catalog) location.
    #[serde(rename = "CATALOG")]
    pub catalog: String,
    /// Space used by the database.
    #[serde(rename = "CATALOG_USED_SPACE")]
    pub catalog_used_space: i64,
    /// Seconds since the last database backup.
    #[serde(rename = "SEC_LAST_CATALOG_BACKUP")]
    pub sec_last_catalog_backup: i64,
    /// Active log directory.
    #[serde(rename = "ACTIVELOG")]
    pub active_log: String,
    /// Space used by the active log.
    #[serde(rename = "ACTIVELOG_USED_SPACE")]
    pub active_log_used_space: i64,
    /// Archive log directory.
    #[serde(rename = "ARCHIVELOG")]
    pub archive_log: String,
    /// Space used by the archive log.
    #[serde(rename = "ARCHIVELOG_USED_SPACE")]
    pub archive_log_used_space: i64,
    /// Storage occupancy recorded by the last usage report.
    #[serde(rename = "SUR_OCC")]
    pub sur_occ: f64,
    /// When `sur_occ` was recorded.
    #[serde(rename = "SUROCC_TIMESTAMP")]
    pub sur_occ_timestamp: String,
    /// Front-end capacity in terabytes.
    #[serde(rename = "FE_CAPACITY_TB")]
    pub fe_capacity_tb: f64,
    /// When `fe_capacity_tb` was recorded.
    #[serde(rename = "FE_TIMESTAMP")]
    pub fe_timestamp: String,
}

/// The backup server collection document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerList {
    /// Servers in the collection.
    #[serde(default)]
    pub servers: Vec<BackupServer>,
    /// Count reported by the service.
    #[serde(default)]
    pub servers_count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerDetailRoot {
    pub serverdetail: BackupServer,
}

// ---------------------------------------------------------------------------
// Backup clients
// ---------------------------------------------------------------------------

/// A backup client node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupClient {
    /// Node name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Server the node is registered on.
    #[serde(rename = "SERVER")]
    pub server: String,
    /// Policy domain of the node.
    #[serde(rename = "DOMAIN")]
    pub domain: String,
    /// Client platform.
    #[serde(rename = "PLATFORM")]
    pub platform: String,
    /// Non-zero when the node is locked.
    #[serde(rename = "LOCKED")]
    pub locked: i64,
    /// Client version.
    #[serde(rename = "VERSION")]
    pub version: i64,
    /// Node type code.
    #[serde(rename = "TYPE")]
    pub client_type: i64,
    /// Virtual machine type code.
    #[serde(rename = "VM_TYPE")]
    pub vm_type: i64,
    /// Data mover that owns the virtual machine.
    #[serde(rename = "VM_OWNER")]
    pub vm_owner: String,
    /// Globally unique identifier of the node.
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Link to the client resource.
    #[serde(rename = "LINK")]
    pub link: String,
}

/// The backup client collection document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientList {
    /// Clients in the collection.
    #[serde(default)]
    pub clients: Vec<BackupClient>,
    /// Count reported by the service.
    #[serde(default)]
    pub clients_count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientDetailRoot {
    pub clientdetail: BackupClient,
}

/// At-risk status of a backup client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupClientAtRisk {
    /// Node name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Server the node is registered on.
    #[serde(rename = "SERVER")]
    pub server: String,
    /// At-risk state as reported.
    #[serde(rename = "AT_RISK")]
    pub at_risk: String,
    /// Node type code.
    #[serde(rename = "TYPE")]
    pub client_type: i64,
    /// Link to the client resource.
    #[serde(rename = "LINK")]
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientAtRiskRoot {
    pub clientatrisk: BackupClientAtRisk,
}

/// Registration of a new backup client node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterClientRequest {
    /// Node name.
    pub name: String,
    /// Authentication method, `local` or `ldap`.
    pub authentication: String,
    /// Initial password.
    pub password: String,
    /// Policy domain to register into.
    pub domain: String,
    /// Contact person.
    pub contact: String,
    /// Contact e-mail address.
    pub email: String,
    /// Client schedule to associate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Client option set.
    #[serde(default, rename = "optionset", skip_serializing_if = "Option::is_none")]
    pub option_set: Option<String>,
    /// Deduplication location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication: Option<String>,
    /// Whether SSL is required.
    #[serde(default, rename = "sslrequired", skip_serializing_if = "Option::is_none")]
    pub ssl_required: Option<String>,
    /// Session initiation mode.
    #[serde(
        default,
        rename = "sessioninitiation",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_initiation: Option<String>,
}

/// A yes/no switch as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// `yes`
    Yes,
    /// `no`
    No,
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Flag::Yes
        } else {
            Flag::No
        }
    }
}

/// A client schedule association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSchedule {
    /// Policy domain the schedule belongs to.
    pub domain: String,
    /// Schedule name.
    pub schedule: String,
}

/// The general update document for a backup client (8.1.0 layout).
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    /// New node password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Schedule association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ClientSchedule>,
    /// Lock or unlock the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<Flag>,
    /// Decommission the node.
    // The service spells the key this way.
    #[serde(
        default,
        rename = "decommision",
        skip_serializing_if = "Option::is_none"
    )]
    pub decommission: Option<Flag>,
}

// ---------------------------------------------------------------------------
// Policy domains
// ---------------------------------------------------------------------------

/// A policy domain on a backup server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupDomain {
    /// Domain name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Domain identifier.
    #[serde(rename = "ID")]
    pub id: String,
    /// Server the domain is defined on.
    #[serde(rename = "SERVER")]
    pub server: String,
    /// Status code of that server.
    #[serde(rename = "SERVERSTATUS")]
    pub server_status: i64,
    /// Link to the domain resource.
    #[serde(rename = "LINK")]
    pub link: String,
    /// Number of member nodes.
    #[serde(rename = "NUM_CLIENTS")]
    pub num_clients: i64,
    /// Number of client schedules.
    #[serde(rename = "SCHEDULE_COUNT")]
    pub schedule_count: i64,
    /// Number of management classes.
    #[serde(rename = "MGMTCLASS_COUNT")]
    pub mgmt_class_count: i64,
    /// Number of option sets.
    #[serde(rename = "OPTSET_COUNT")]
    pub opt_set_count: i64,
    /// Default management class.
    #[serde(rename = "DEF_MC")]
    pub default_mgmt_class: String,
    /// Default backup destination.
    #[serde(rename = "DEFDESTBKUP")]
    pub default_dest_backup: String,
    /// Default archive destination.
    #[serde(rename = "DEFDESTARCH")]
    pub default_dest_archive: String,
    /// Default space management destination.
    #[serde(rename = "DEFDESTSPMAN")]
    pub default_dest_space_mgmt: String,
    /// Non-zero when backup is provided.
    #[serde(rename = "PROVIDES_BKUP")]
    pub provides_backup: i64,
    /// Non-zero when archive is provided.
    #[serde(rename = "PROVIDES_ARCH")]
    pub provides_archive: i64,
    /// Non-zero when space management is provided.
    #[serde(rename = "PROVIDES_SPMG")]
    pub provides_space_mgmt: i64,
}

/// The policy domain collection document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainList {
    /// Domains in the collection.
    #[serde(default)]
    pub domains: Vec<BackupDomain>,
    /// Count reported by the service.
    #[serde(default)]
    pub domains_count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainDetailRoot {
    pub domaindetail: BackupDomain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_only_sends_set_fields() {
        let update = UpdateClientRequest {
            lock: Some(Flag::Yes),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"lock": "yes"}));

        let update = UpdateClientRequest {
            decommission: Some(Flag::Yes),
            schedule: Some(ClientSchedule {
                domain: "STANDARD".to_string(),
                schedule: "DAILY".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "decommision": "yes",
                "schedule": {"domain": "STANDARD", "schedule": "DAILY"}
            })
        );
    }

    #[test]
    fn test_server_tolerates_missing_fields() {
        let server: BackupServer =
            serde_json::from_value(json!({"NAME": "SERVER1", "SUR_OCC": 1.5})).unwrap();
        assert_eq!(server.name, "SERVER1");
        assert_eq!(server.sur_occ, 1.5);
        assert_eq!(server.num_clients, 0);
    }

    #[test]
    fn test_register_request_keys() {
        let request = RegisterClientRequest {
            name: "NODE1".to_string(),
            authentication: "local".to_string(),
            password: "pw".to_string(),
            domain: "STANDARD".to_string(),
            contact: "ops".to_string(),
            email: "ops@example.com".to_string(),
            option_set: Some("WINDOWS".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["optionset"], "WINDOWS");
        assert!(value.get("schedule").is_none());
        assert!(value.get("sslrequired").is_none());
    }

    #[test]
    fn test_flag_from_bool() {
        assert_eq!(Flag::from(true), Flag::Yes);
        assert_eq!(Flag::from(false), Flag::No);
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json;
use crate::states::SessionVisibility;

#[cfg(test)]
mod tests;

/// Fixed behaviors a session is created with. All flags are tri-state: unset
/// flags are omitted from the wire entirely and the service applies template
/// defaults.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectivity:                           Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppress_presence_activity_check:       Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameplay:                               Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large:                                  Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_required_for_active_members: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "crossPlay")]
    pub crossplay:                              Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable:                             Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_owners:                             Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team:                                   Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbitration:                            Option<bool>,
}

impl SessionCapabilities {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Managed-initialization episode configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInitialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_timeout:            Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_timeout:     Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_timeout:      Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_evaluation:     Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_needed_to_start: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeerToPeerRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_maximum:   Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_minimum: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeerToHostRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_maximum:        Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_down_minimum: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_up_minimum:   Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_selection_metric:  Option<String>,
}

/// Immutable-at-creation session configuration. Only meaningful on the
/// request that creates a session; the service rejects changes afterwards,
/// so an already-created session never serializes this again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConstants {
    pub max_members_count:            Option<u32>,
    pub visibility:                   SessionVisibility,
    pub initiator_xuids:              Option<Vec<String>>,
    pub capabilities:                 SessionCapabilities,
    pub member_reserved_timeout_ms:   Option<u64>,
    pub member_inactive_timeout_ms:   Option<u64>,
    pub member_ready_timeout_ms:      Option<u64>,
    pub session_empty_timeout_ms:     Option<u64>,
    pub member_initialization:        Option<MemberInitialization>,
    pub peer_to_peer_requirements:    Option<PeerToPeerRequirements>,
    pub peer_to_host_requirements:    Option<PeerToHostRequirements>,
    pub measurement_server_addresses: Option<Value>,
    pub custom:                       Option<Value>,
}

impl SessionConstants {
    /// The `constants` section of a PATCH body, or `None` when nothing was
    /// ever set and the section should be omitted.
    pub fn to_json(&self) -> Option<Value> {
        let mut system = Map::new();

        if let Some(count) = self.max_members_count {
            system.insert("maxMembersCount".to_owned(), count.into());
        }

        if let Some(visibility) = self.visibility.as_wire_str() {
            system.insert("visibility".to_owned(), visibility.into());
        }

        if let Some(initiators) = &self.initiator_xuids {
            system.insert("initiators".to_owned(), initiators.clone().into());
        }

        if let Some(timeout) = self.member_reserved_timeout_ms {
            system.insert("reservedRemovalTimeout".to_owned(), timeout.into());
        }

        if let Some(timeout) = self.member_inactive_timeout_ms {
            system.insert("inactiveRemovalTimeout".to_owned(), timeout.into());
        }

        if let Some(timeout) = self.member_ready_timeout_ms {
            system.insert("readyRemovalTimeout".to_owned(), timeout.into());
        }

        if let Some(timeout) = self.session_empty_timeout_ms {
            system.insert("sessionEmptyTimeout".to_owned(), timeout.into());
        }

        if !self.capabilities.is_empty() {
            system.insert("capabilities".to_owned(),
                          serde_json::to_value(self.capabilities).expect("capabilities serialize"));
        }

        if let Some(initialization) = &self.member_initialization {
            system.insert("memberInitialization".to_owned(),
                          serde_json::to_value(initialization).expect("member initialization serialize"));
        }

        if let Some(requirements) = &self.peer_to_peer_requirements {
            system.insert("peerToPeerRequirements".to_owned(),
                          serde_json::to_value(requirements).expect("peer to peer requirements serialize"));
        }

        if let Some(requirements) = &self.peer_to_host_requirements {
            system.insert("peerToHostRequirements".to_owned(),
                          serde_json::to_value(requirements).expect("peer to host requirements serialize"));
        }

        if let Some(addresses) = &self.measurement_server_addresses {
            system.insert("measurementServerAddresses".to_owned(), addresses.clone());
        }

        let mut constants = Map::new();
        if !system.is_empty() {
            constants.insert("system".to_owned(), system.into());
        }
        if let Some(custom) = &self.custom {
            constants.insert("custom".to_owned(), custom.clone());
        }

        if constants.is_empty() {
            None
        } else {
            Some(constants.into())
        }
    }

    /// Best-effort parse of a document's `constants` section; missing fields
    /// stay unset.
    pub fn from_json(constants: &Value) -> Self {
        let mut parsed = Self::default();

        if let Some(system) = json::optional_field(constants, "system") {
            parsed.max_members_count = json::opt_u32_field(system, "maxMembersCount");

            if let Some(visibility) = system.get("visibility").and_then(Value::as_str) {
                parsed.visibility = SessionVisibility::from_wire_str(visibility);
            }

            parsed.initiator_xuids = json::optional_field(system, "initiators")
                .map(|_| json::string_vec_field(system, "initiators"));

            parsed.member_reserved_timeout_ms = json::opt_u64_field(system, "reservedRemovalTimeout");
            parsed.member_inactive_timeout_ms = json::opt_u64_field(system, "inactiveRemovalTimeout");
            parsed.member_ready_timeout_ms = json::opt_u64_field(system, "readyRemovalTimeout");
            parsed.session_empty_timeout_ms = json::opt_u64_field(system, "sessionEmptyTimeout");

            parsed.capabilities = json::optional_field(system, "capabilities")
                .and_then(|capabilities| serde_json::from_value(capabilities.clone()).ok())
                .unwrap_or_default();

            parsed.member_initialization = json::optional_field(system, "memberInitialization")
                .and_then(|initialization| serde_json::from_value(initialization.clone()).ok());

            parsed.peer_to_peer_requirements = json::optional_field(system, "peerToPeerRequirements")
                .and_then(|requirements| serde_json::from_value(requirements.clone()).ok());

            parsed.peer_to_host_requirements = json::optional_field(system, "peerToHostRequirements")
                .and_then(|requirements| serde_json::from_value(requirements.clone()).ok());

            parsed.measurement_server_addresses = json::cloned_field(system, "measurementServerAddresses");
        }

        parsed.custom = json::cloned_field(constants, "custom");
        parsed
    }
}

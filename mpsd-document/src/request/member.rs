use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::states::{ArbitrationOutcome, SessionChangeTypes, TeamResult};

/// Subscription to session document change notifications. An empty change
/// mask serializes as `null`, which tears the subscription down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSubscription {
    pub id:           String,
    pub change_types: SessionChangeTypes,
}

/// Sparse patch for one member entry of a session document.
///
/// Every optional field is written iff it was explicitly set, so "no change"
/// and "set to empty" stay distinguishable. The identity fields (member id,
/// xuid, creation constants) are fixed at construction; everything else is
/// mutable behind the member's own lock, since the owning request hands this
/// object out for further mutation.
pub struct SessionMemberRequest {
    member_id:            String,
    xuid:                 String,
    write_request:        bool,
    custom_constants:     Option<Value>,
    initialize_requested: Option<bool>,
    state:                Mutex<MemberPatchState>,
}

#[derive(Clone, Debug, Default)]
struct MemberPatchState {
    active:                Option<bool>,
    rta_connection_id:     String,
    secure_device_address: Option<String>,
    roles:                 HashMap<String, String>,
    custom_properties:     Option<Value>,
    measurements:          Option<Value>,
    server_measurements:   Option<Value>,
    members_in_group:      Option<Vec<u32>>,
    groups:                Vec<String>,
    encounters:            Vec<String>,
    subscription:          Option<ChangeSubscription>,
    arbitration_results:   HashMap<String, TeamResult>,
}

impl SessionMemberRequest {
    pub fn new(write_request: bool,
               member_id: impl Into<String>,
               xuid: impl Into<String>,
               custom_constants: Option<Value>,
               initialize_requested: Option<bool>)
               -> Self {
        Self { member_id: member_id.into(),
               xuid: xuid.into(),
               write_request,
               custom_constants,
               initialize_requested,
               state: Mutex::new(MemberPatchState::default()), }
    }

    fn state(&self) -> MutexGuard<'_, MemberPatchState> {
        self.state.lock().expect("member request lock")
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn xuid(&self) -> &str {
        &self.xuid
    }

    pub fn write_request(&self) -> bool {
        self.write_request
    }

    pub fn custom_constants(&self) -> Option<&Value> {
        self.custom_constants.as_ref()
    }

    pub fn initialize_requested(&self) -> Option<bool> {
        self.initialize_requested
    }

    pub fn is_active(&self) -> Option<bool> {
        self.state().active
    }

    pub fn set_active(&self, active: bool) {
        self.state().active = Some(active);
    }

    /// Real-time connection id; emitted as `connection` only while the
    /// member is marked active.
    pub fn set_rta_connection_id(&self, connection_id: impl Into<String>) {
        self.state().rta_connection_id = connection_id.into();
    }

    pub fn set_secure_device_address(&self, address: impl Into<String>) {
        self.state().secure_device_address = Some(address.into());
    }

    pub fn roles(&self) -> HashMap<String, String> {
        self.state().roles.clone()
    }

    pub fn set_roles(&self, roles: HashMap<String, String>) {
        self.state().roles = roles;
    }

    pub fn custom_properties(&self) -> Option<Value> {
        self.state().custom_properties.clone()
    }

    pub fn set_custom_properties(&self, properties: Value) {
        self.state().custom_properties = Some(properties);
    }

    /// Upsert a single named custom property. Writing `null` marks the
    /// property for deletion on the service.
    pub fn set_custom_property(&self, name: &str, value: Value) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("custom property name"));
        }

        let mut state = self.state();
        match state.custom_properties.as_mut().and_then(Value::as_object_mut) {
            Some(properties) => {
                properties.insert(name.to_owned(), value);
            }
            None => {
                let mut properties = Map::new();
                properties.insert(name.to_owned(), value);
                state.custom_properties = Some(properties.into());
            }
        }

        Ok(())
    }

    pub fn set_measurements(&self, measurements: Value) {
        self.state().measurements = Some(measurements);
    }

    pub fn set_server_measurements(&self, measurements: Value) {
        self.state().server_measurements = Some(measurements);
    }

    pub fn set_members_in_group(&self, member_indices: Vec<u32>) {
        self.state().members_in_group = Some(member_indices);
    }

    pub fn set_groups(&self, groups: Vec<String>) {
        self.state().groups = groups;
    }

    pub fn set_encounters(&self, encounters: Vec<String>) {
        self.state().encounters = encounters;
    }

    pub fn subscription(&self) -> Option<ChangeSubscription> {
        self.state().subscription.clone()
    }

    pub fn set_change_subscription(&self, id: impl Into<String>, change_types: SessionChangeTypes) {
        self.state().subscription = Some(ChangeSubscription { id: id.into(),
                                                              change_types });
    }

    pub fn arbitration_results(&self) -> HashMap<String, TeamResult> {
        self.state().arbitration_results.clone()
    }

    /// Replaces any previous result reported for the same team.
    pub fn set_arbitration_result(&self, team: impl Into<String>, result: TeamResult) {
        self.state().arbitration_results.insert(team.into(), result);
    }

    pub fn set_arbitration_results(&self, results: HashMap<String, TeamResult>) {
        self.state().arbitration_results = results;
    }

    pub(crate) fn deep_copy(&self) -> Self {
        Self { member_id:            self.member_id.clone(),
               xuid:                 self.xuid.clone(),
               write_request:        self.write_request,
               custom_constants:     self.custom_constants.clone(),
               initialize_requested: self.initialize_requested,
               state:                Mutex::new(self.state().clone()), }
    }

    /// The `members.<memberId>` fragment of a PATCH body, or `None` when
    /// nothing was set and the member should be skipped.
    pub fn to_json(&self) -> Option<Value> {
        let state = self.state();
        let mut root = Map::new();

        if self.write_request || self.custom_constants.is_some() {
            let mut system = Map::new();
            system.insert("xuid".to_owned(), self.xuid.clone().into());

            if let Some(initialize) = self.initialize_requested {
                system.insert("initialize".to_owned(), initialize.into());
            }

            let mut constants = Map::new();
            constants.insert("system".to_owned(), system.into());
            if let Some(custom) = &self.custom_constants {
                constants.insert("custom".to_owned(), custom.clone());
            }
            root.insert("constants".to_owned(), constants.into());
        }

        if !state.roles.is_empty() {
            let roles: Map<String, Value> = state.roles
                                                 .iter()
                                                 .map(|(name, value)| (name.clone(), Value::from(value.clone())))
                                                 .collect();
            root.insert("roles".to_owned(), roles.into());
        }

        let mut system = Map::new();

        if let Some(active) = state.active {
            system.insert("active".to_owned(), active.into());
            if !active {
                // Going inactive always clears readiness as well.
                system.insert("ready".to_owned(), false.into());
            } else if !state.rta_connection_id.is_empty() {
                system.insert("connection".to_owned(), state.rta_connection_id.clone().into());
            }
        }

        if let Some(subscription) = &state.subscription {
            let subscription_json = if subscription.change_types.is_empty() {
                Value::Null
            } else {
                let mut fields = Map::new();
                fields.insert("id".to_owned(), subscription.id.clone().into());
                fields.insert("changeTypes".to_owned(), subscription.change_types.wire_names().into());
                fields.into()
            };
            system.insert("subscription".to_owned(), subscription_json);
        }

        if !state.arbitration_results.is_empty() {
            let mut results = Map::new();
            for (team, result) in &state.arbitration_results {
                let mut team_json = Map::new();
                team_json.insert("outcome".to_owned(), result.outcome.as_wire_str().into());
                if result.outcome == ArbitrationOutcome::Rank {
                    team_json.insert("ranking".to_owned(), result.ranking.into());
                }
                results.insert(team.clone(), team_json.into());
            }

            let mut arbitration = Map::new();
            arbitration.insert("results".to_owned(), results.into());
            system.insert("arbitration".to_owned(), arbitration.into());
        }

        if let Some(address) = &state.secure_device_address {
            system.insert("secureDeviceAddress".to_owned(), address.clone().into());
        }

        if let Some(member_indices) = &state.members_in_group {
            system.insert("initializationGroup".to_owned(), member_indices.clone().into());
        }

        if !state.groups.is_empty() {
            system.insert("groups".to_owned(), state.groups.clone().into());
        }

        if !state.encounters.is_empty() {
            system.insert("encounters".to_owned(), state.encounters.clone().into());
        }

        if let Some(measurements) = &state.measurements {
            system.insert("measurements".to_owned(), measurements.clone());
        }

        if let Some(measurements) = &state.server_measurements {
            system.insert("serverMeasurements".to_owned(), measurements.clone());
        }

        let mut properties = Map::new();
        if !system.is_empty() {
            properties.insert("system".to_owned(), system.into());
        }
        if let Some(custom) = &state.custom_properties {
            properties.insert("custom".to_owned(), custom.clone());
        }
        if !properties.is_empty() {
            root.insert("properties".to_owned(), properties.into());
        }

        if root.is_empty() {
            None
        } else {
            Some(root.into())
        }
    }
}

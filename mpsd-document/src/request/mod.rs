use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::*;

use crate::constants::SessionConstants;
use crate::error::{Error, Result};
use crate::reference::SessionReference;
use crate::states::SessionRestriction;

pub mod member;

pub use member::{ChangeSubscription, SessionMemberRequest};


/// Capacity constraints for one named role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleInfo {
    pub max_members_count: u32,
    pub target_count:      u32,
}

/// A named category of member roles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleType {
    pub roles: HashMap<String, RoleInfo>,
}

/// Builder for one outbound session PATCH body.
///
/// A request is created fresh per mutating operation (join, property update,
/// leave), filled in through the setters, serialized once with [`to_json`]
/// and then discarded. The owning session handle may be shared across
/// threads, so every mutator and the serializer take the same internal lock.
///
/// [`to_json`]: SessionRequest::to_json
pub struct SessionRequest {
    state: Mutex<RequestState>,
}

#[derive(Clone, Default)]
struct RequestState {
    session_reference:                    Option<SessionReference>,
    session_constants:                    Option<SessionConstants>,
    keywords:                             Vec<String>,
    turns:                                Vec<u32>,
    join_restriction:                     SessionRestriction,
    read_restriction:                     SessionRestriction,
    custom_properties:                    Option<Value>,
    target_session_constants:             Option<Value>,
    matchmaking_server_connection_string: Option<String>,
    matchmaking_resubmit:                 Option<bool>,
    initialization_succeeded:             Option<bool>,
    host_device_token:                    Option<String>,
    server_connection_string_candidates:  Option<Vec<String>>,
    closed:                               Option<bool>,
    locked:                               Option<bool>,
    allocate_cloud_compute:               Option<bool>,
    role_types:                           HashMap<String, RoleType>,
    members:                              Vec<Arc<SessionMemberRequest>>,
    servers:                              Option<Value>,
    leave_session:                        bool,
    member_request_index:                 u32,
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRequest {
    pub fn new() -> Self {
        Self { state: Mutex::new(RequestState::default()), }
    }

    fn state(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().expect("session request lock")
    }

    /// Adds a member patch and returns it for further mutation. The local
    /// user is always keyed `me`; reservations get `reserve_<n>` ids in
    /// call order from a counter owned by this request.
    pub fn add_member_request(&self,
                              write_request: bool,
                              is_me: bool,
                              xuid: impl Into<String>,
                              custom_constants: Option<Value>,
                              initialize_requested: Option<bool>)
                              -> Arc<SessionMemberRequest> {
        let mut state = self.state();

        let member_id = if is_me {
            "me".to_owned()
        } else {
            let member_id = format!("reserve_{}", state.member_request_index);
            state.member_request_index += 1;
            member_id
        };

        let member = Arc::new(SessionMemberRequest::new(write_request,
                                                        member_id,
                                                        xuid,
                                                        custom_constants,
                                                        initialize_requested));
        state.members.push(Arc::clone(&member));
        member
    }

    pub fn members(&self) -> Vec<Arc<SessionMemberRequest>> {
        self.state().members.clone()
    }

    pub fn leave_session(&self) {
        self.set_leave_session(true);
    }

    pub fn set_leave_session(&self, leave_session: bool) {
        self.state().leave_session = leave_session;
    }

    pub fn is_leave_session(&self) -> bool {
        self.state().leave_session
    }

    pub fn session_reference(&self) -> Option<SessionReference> {
        self.state().session_reference.clone()
    }

    pub fn set_session_reference(&self, reference: SessionReference) {
        self.state().session_reference = Some(reference);
    }

    pub fn session_constants(&self) -> Option<SessionConstants> {
        self.state().session_constants.clone()
    }

    pub fn set_session_constants(&self, constants: SessionConstants) {
        self.state().session_constants = Some(constants);
    }

    pub fn keywords(&self) -> Vec<String> {
        self.state().keywords.clone()
    }

    pub fn set_keywords(&self, keywords: Vec<String>) {
        self.state().keywords = keywords;
    }

    pub fn turns(&self) -> Vec<u32> {
        self.state().turns.clone()
    }

    pub fn set_turns(&self, member_indices: Vec<u32>) {
        self.state().turns = member_indices;
    }

    pub fn join_restriction(&self) -> SessionRestriction {
        self.state().join_restriction
    }

    /// Unvalidated store; [`SessionProperties`](crate::SessionProperties)
    /// validates before forwarding here.
    pub fn set_join_restriction(&self, restriction: SessionRestriction) {
        self.state().join_restriction = restriction;
    }

    pub fn read_restriction(&self) -> SessionRestriction {
        self.state().read_restriction
    }

    pub fn set_read_restriction(&self, restriction: SessionRestriction) {
        self.state().read_restriction = restriction;
    }

    pub fn custom_properties(&self) -> Option<Value> {
        self.state().custom_properties.clone()
    }

    pub fn set_custom_properties(&self, properties: Value) {
        self.state().custom_properties = Some(properties);
    }

    /// Upsert a single named session custom property; `null` marks the
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

    pub fn target_session_constants(&self) -> Option<Value> {
        self.state().target_session_constants.clone()
    }

    pub fn set_target_session_constants(&self, constants: Value) {
        self.state().target_session_constants = Some(constants);
    }

    pub fn matchmaking_server_connection_string(&self) -> Option<String> {
        self.state().matchmaking_server_connection_string.clone()
    }

    pub fn set_matchmaking_server_connection_string(&self, connection_string: impl Into<String>) {
        self.state().matchmaking_server_connection_string = Some(connection_string.into());
    }

    pub fn matchmaking_resubmit(&self) -> Option<bool> {
        self.state().matchmaking_resubmit
    }

    pub fn set_matchmaking_resubmit(&self, resubmit: bool) {
        self.state().matchmaking_resubmit = Some(resubmit);
    }

    pub fn initialization_succeeded(&self) -> Option<bool> {
        self.state().initialization_succeeded
    }

    pub fn set_initialization_succeeded(&self, succeeded: bool) {
        self.state().initialization_succeeded = Some(succeeded);
    }

    pub fn host_device_token(&self) -> Option<String> {
        self.state().host_device_token.clone()
    }

    pub fn set_host_device_token(&self, token: impl Into<String>) {
        self.state().host_device_token = Some(token.into());
    }

    pub fn server_connection_string_candidates(&self) -> Option<Vec<String>> {
        self.state().server_connection_string_candidates.clone()
    }

    pub fn set_server_connection_string_candidates(&self, candidates: Vec<String>) {
        self.state().server_connection_string_candidates = Some(candidates);
    }

    pub fn closed(&self) -> Option<bool> {
        self.state().closed
    }

    pub fn set_closed(&self, closed: bool) {
        self.state().closed = Some(closed);
    }

    pub fn locked(&self) -> Option<bool> {
        self.state().locked
    }

    pub fn set_locked(&self, locked: bool) {
        self.state().locked = Some(locked);
    }

    pub fn allocate_cloud_compute(&self) -> Option<bool> {
        self.state().allocate_cloud_compute
    }

    pub fn set_allocate_cloud_compute(&self, allocate: bool) {
        self.state().allocate_cloud_compute = Some(allocate);
    }

    pub fn role_types(&self) -> HashMap<String, RoleType> {
        self.state().role_types.clone()
    }

    pub fn set_role_types(&self, role_types: HashMap<String, RoleType>) {
        self.state().role_types = role_types;
    }

    pub fn servers(&self) -> Option<Value> {
        self.state().servers.clone()
    }

    /// Server-owned blob, passed through verbatim.
    pub fn set_servers(&self, servers: Value) {
        self.state().servers = Some(servers);
    }

    /// Consistent snapshot of this request. The source's lock is held for
    /// the duration of the copy; member patches are copied too, so the
    /// snapshot and the live request mutate independently afterwards.
    pub fn create_deep_copy(&self) -> SessionRequest {
        let state = self.state();
        let mut copy = state.clone();
        copy.members = state.members.iter().map(|member| Arc::new(member.deep_copy())).collect();

        SessionRequest { state: Mutex::new(copy), }
    }

    /// The PATCH body. Top-level sections with no written constituent are
    /// omitted entirely; an untouched request serializes to `{}`.
    pub fn to_json(&self) -> Value {
        let state = self.state();
        let mut root = Map::new();

        if let Some(constants) = &state.session_constants {
            if let Some(json) = constants.to_json() {
                root.insert("constants".to_owned(), json);
            }
        }

        if !state.role_types.is_empty() {
            root.insert("roleTypes".to_owned(), role_types_json(&state.role_types));
        }

        if let Some(properties) = properties_json(&state) {
            root.insert("properties".to_owned(), properties);
        }

        if !state.members.is_empty() || state.leave_session {
            let mut members = Map::new();
            for member in &state.members {
                if let Some(json) = member.to_json() {
                    members.insert(member.member_id().to_owned(), json);
                }
            }

            if state.leave_session {
                // "me": null removes the local member. This wins over any
                // pending patch for "me" in the same request.
                members.insert("me".to_owned(), Value::Null);
            }

            if !members.is_empty() {
                root.insert("members".to_owned(), members.into());
            }
        }

        if let Some(servers) = &state.servers {
            root.insert("servers".to_owned(), servers.clone());
        }

        debug!(members = state.members.len(),
               leave = state.leave_session,
               sections = root.len(),
               "serialized session patch");

        root.into()
    }
}

fn role_types_json(role_types: &HashMap<String, RoleType>) -> Value {
    let mut json = Map::new();

    for (type_name, role_type) in role_types {
        let mut roles = Map::new();
        for (role_name, info) in &role_type.roles {
            let mut role = Map::new();
            if info.max_members_count > 0 {
                role.insert("max".to_owned(), info.max_members_count.into());
            }
            if info.target_count > 0 {
                role.insert("target".to_owned(), info.target_count.into());
            }
            roles.insert(role_name.clone(), role.into());
        }

        let mut role_type_json = Map::new();
        role_type_json.insert("roles".to_owned(), roles.into());
        json.insert(type_name.clone(), role_type_json.into());
    }

    json.into()
}

fn properties_json(state: &RequestState) -> Option<Value> {
    let mut system = Map::new();

    if !state.keywords.is_empty() {
        system.insert("keywords".to_owned(), state.keywords.clone().into());
    }

    if !state.turns.is_empty() {
        system.insert("turn".to_owned(), state.turns.clone().into());
    }

    if let Some(restriction) = state.join_restriction.as_wire_str() {
        system.insert("joinRestriction".to_owned(), restriction.into());
    }

    if let Some(restriction) = state.read_restriction.as_wire_str() {
        system.insert("readRestriction".to_owned(), restriction.into());
    }

    if let Some(closed) = state.closed {
        system.insert("closed".to_owned(), closed.into());
    }

    if let Some(locked) = state.locked {
        system.insert("locked".to_owned(), locked.into());
    }

    if let Some(allocate) = state.allocate_cloud_compute {
        system.insert("allocateCloudCompute".to_owned(), allocate.into());
    }

    if state.target_session_constants.is_some() || state.matchmaking_server_connection_string.is_some() {
        let mut matchmaking = Map::new();
        if let Some(constants) = &state.target_session_constants {
            matchmaking.insert("targetSessionConstants".to_owned(), constants.clone());
        }
        if let Some(connection_string) = &state.matchmaking_server_connection_string {
            matchmaking.insert("serverConnectionString".to_owned(), connection_string.clone().into());
        }
        system.insert("matchmaking".to_owned(), matchmaking.into());
    }

    if let Some(resubmit) = state.matchmaking_resubmit {
        system.insert("matchmakingResubmit".to_owned(), resubmit.into());
    }

    if let Some(succeeded) = state.initialization_succeeded {
        system.insert("initializationSucceeded".to_owned(), succeeded.into());
    }

    if let Some(token) = &state.host_device_token {
        system.insert("host".to_owned(), token.clone().into());
    }

    if let Some(candidates) = &state.server_connection_string_candidates {
        system.insert("serverConnectionStringCandidates".to_owned(), candidates.clone().into());
    }

    let mut properties = Map::new();
    if !system.is_empty() {
        properties.insert("system".to_owned(), system.into());
    }
    if let Some(custom) = &state.custom_properties {
        properties.insert("custom".to_owned(), custom.clone());
    }

    if properties.is_empty() {
        None
    } else {
        Some(properties.into())
    }
}

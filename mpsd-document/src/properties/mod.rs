use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::json;
use crate::member::SessionMember;
use crate::request::SessionRequest;
use crate::states::SessionRestriction;


/// Session-level mutable state as last seen from the service, plus the
/// outbound request the next write will submit.
///
/// Mutators update the cached view and forward into the owned request, so a
/// caller working through a shared session handle reads back what it wrote
/// while the sparse patch accumulates independently. Deserialization is
/// two-phase: [`from_json`] captures turn order as raw member indices, and
/// [`initialize`] resolves them against parsed members once the member list
/// is known.
///
/// [`from_json`]: SessionProperties::from_json
/// [`initialize`]: SessionProperties::initialize
pub struct SessionProperties {
    state: Mutex<PropertiesState>,
}

#[derive(Clone)]
struct PropertiesState {
    keywords:                            Vec<String>,
    owner_indices:                       Vec<u32>,
    turn_index_list:                     Vec<u32>,
    turn_collection:                     Vec<Arc<SessionMember>>,
    join_restriction:                    SessionRestriction,
    read_restriction:                    SessionRestriction,
    closed:                              bool,
    locked:                              bool,
    allocate_cloud_compute:              bool,
    target_session_constants:            Option<Value>,
    custom_properties:                   Option<Value>,
    host_device_token:                   String,
    server_connection_string:            String,
    server_connection_string_candidates: Vec<String>,
    request:                             Arc<SessionRequest>,
}

impl Default for PropertiesState {
    fn default() -> Self {
        Self { keywords:                            Vec::new(),
               owner_indices:                       Vec::new(),
               turn_index_list:                     Vec::new(),
               turn_collection:                     Vec::new(),
               join_restriction:                    SessionRestriction::Unknown,
               read_restriction:                    SessionRestriction::Unknown,
               closed:                              false,
               locked:                              false,
               allocate_cloud_compute:              false,
               target_session_constants:            None,
               custom_properties:                   None,
               host_device_token:                   String::new(),
               server_connection_string:            String::new(),
               server_connection_string_candidates: Vec::new(),
               request:                             Arc::new(SessionRequest::new()), }
    }
}

impl Default for SessionProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProperties {
    pub fn new() -> Self {
        Self { state: Mutex::new(PropertiesState::default()), }
    }

    /// Rebuilds a properties view from the `properties` object of a server
    /// session document. `system` is the only required field; everything
    /// else defaults when absent.
    pub fn from_json(properties: &Value) -> Result<Self> {
        if properties.is_null() {
            // a document without a properties section reads as all-defaults
            return Ok(Self::new());
        }

        let system = json::required_field(properties, "system")?;
        let matchmaking = json::optional_field(system, "matchmaking");

        let mut state = PropertiesState::default();
        state.keywords = json::string_vec_field(system, "keywords");
        state.owner_indices = json::u32_vec_field(system, "owners");
        state.turn_index_list = json::u32_vec_field(system, "turn");

        let join_restriction = json::string_field(system, "joinRestriction");
        if !join_restriction.is_empty() {
            state.join_restriction = SessionRestriction::from_wire_str(&join_restriction);
        }

        let read_restriction = json::string_field(system, "readRestriction");
        if !read_restriction.is_empty() {
            state.read_restriction = SessionRestriction::from_wire_str(&read_restriction);
        }

        state.closed = json::bool_field(system, "closed");
        state.locked = json::bool_field(system, "locked");
        state.allocate_cloud_compute = json::bool_field(system, "allocateCloudCompute");

        state.target_session_constants =
            matchmaking.and_then(|matchmaking| json::cloned_field(matchmaking, "targetSessionConstants"));
        state.custom_properties = json::cloned_field(properties, "custom");

        state.host_device_token = json::string_field(system, "host");
        state.server_connection_string =
            matchmaking.map(|matchmaking| json::string_field(matchmaking, "serverConnectionString"))
                       .unwrap_or_default();
        state.server_connection_string_candidates = json::string_vec_field(system, "serverConnectionStringCandidates");

        Ok(Self { state: Mutex::new(state), })
    }

    fn state(&self) -> MutexGuard<'_, PropertiesState> {
        self.state.lock().expect("session properties lock")
    }

    /// Attaches the live request and resolves the captured turn indices
    /// against the parsed member list.
    pub fn initialize(&self, request: Arc<SessionRequest>, members: &[Arc<SessionMember>]) {
        let mut state = self.state();
        state.request = request;

        let resolved: Vec<Arc<SessionMember>> =
            state.turn_index_list
                 .iter()
                 .filter_map(|index| {
                     members.iter()
                            .find(|member| member.member_index == *index)
                            .cloned()
                 })
                 .collect();
        state.turn_collection = resolved;
    }

    pub fn session_request(&self) -> Arc<SessionRequest> {
        Arc::clone(&self.state().request)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.state().keywords.clone()
    }

    pub fn set_keywords(&self, keywords: Vec<String>) {
        let mut state = self.state();
        state.keywords = keywords.clone();
        state.request.set_keywords(keywords);
    }

    pub fn owner_indices(&self) -> Vec<u32> {
        self.state().owner_indices.clone()
    }

    pub fn turn_collection(&self) -> Vec<Arc<SessionMember>> {
        self.state().turn_collection.clone()
    }

    /// Replaces the turn order. The request carries member indices; the
    /// resolved member objects stay cached for readers.
    pub fn set_turn_collection(&self, turn_collection: Vec<Arc<SessionMember>>) -> Result<()> {
        if turn_collection.is_empty() {
            return Err(Error::InvalidArgument("turn collection"));
        }

        let mut state = self.state();
        let indices = turn_collection.iter().map(|member| member.member_index).collect();
        state.request.set_turns(indices);
        state.turn_collection = turn_collection;
        Ok(())
    }

    pub fn join_restriction(&self) -> SessionRestriction {
        self.state().join_restriction
    }

    pub fn set_join_restriction(&self, restriction: SessionRestriction) -> Result<()> {
        if !restriction.is_writable() {
            return Err(Error::InvalidArgument("join restriction"));
        }

        let mut state = self.state();
        state.join_restriction = restriction;
        state.request.set_join_restriction(restriction);
        Ok(())
    }

    pub fn read_restriction(&self) -> SessionRestriction {
        self.state().read_restriction
    }

    pub fn set_read_restriction(&self, restriction: SessionRestriction) -> Result<()> {
        if !restriction.is_writable() {
            return Err(Error::InvalidArgument("read restriction"));
        }

        let mut state = self.state();
        state.read_restriction = restriction;
        state.request.set_read_restriction(restriction);
        Ok(())
    }

    pub fn closed(&self) -> bool {
        self.state().closed
    }

    pub fn locked(&self) -> bool {
        self.state().locked
    }

    pub fn allocate_cloud_compute(&self) -> bool {
        self.state().allocate_cloud_compute
    }

    pub fn matchmaking_target_session_constants(&self) -> Option<Value> {
        self.state().target_session_constants.clone()
    }

    pub fn set_matchmaking_target_session_constants(&self, constants: Value) {
        let mut state = self.state();
        state.target_session_constants = Some(constants.clone());
        state.request.set_target_session_constants(constants);
    }

    pub fn custom_properties(&self) -> Option<Value> {
        self.state().custom_properties.clone()
    }

    /// Queues a named custom-property write on the outbound request. The
    /// cached view keeps the service's last-known value until the next
    /// document refresh.
    pub fn set_custom_property(&self, name: &str, value: Value) -> Result<()> {
        self.state().request.set_custom_property(name, value)
    }

    /// Writing `null` deletes the property on the service.
    pub fn delete_custom_property(&self, name: &str) -> Result<()> {
        self.set_custom_property(name, Value::Null)
    }

    pub fn host_device_token(&self) -> String {
        self.state().host_device_token.clone()
    }

    pub fn server_connection_string(&self) -> String {
        self.state().server_connection_string.clone()
    }

    pub fn server_connection_string_candidates(&self) -> Vec<String> {
        self.state().server_connection_string_candidates.clone()
    }
}

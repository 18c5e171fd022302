use std::sync::Arc;

use serde_json::Value;

use crate::json;

/// Read-side view of one `members.<index>` entry of a server session
/// document. Carries what turn resolution and client-side decisions need;
/// anything else stays in the raw document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionMember {
    pub member_index:      u32,
    pub xuid:              String,
    pub is_active:         bool,
    pub is_ready:          bool,
    pub is_turn:           bool,
    pub custom_properties: Option<Value>,
}

impl SessionMember {
    /// Best-effort parse of a single member entry keyed by its document
    /// index.
    pub fn from_json(member_index: u32, json: &Value) -> Self {
        let mut member = SessionMember { member_index,
                                         ..Default::default() };

        if let Some(system) = json.pointer("/constants/system") {
            member.xuid = json::string_field(system, "xuid");
        }

        if let Some(system) = json.pointer("/properties/system") {
            member.is_active = json::bool_field(system, "active");
            member.is_ready = json::bool_field(system, "ready");
            member.is_turn = json::bool_field(system, "turn");
        }

        member.custom_properties = json.pointer("/properties/custom")
                                       .filter(|properties| !properties.is_null())
                                       .cloned();

        member
    }

    /// All members of a session document, ordered by document index.
    /// Non-numeric keys (a pending `me` entry, for example) are skipped.
    pub fn parse_members(document: &Value) -> Vec<Arc<SessionMember>> {
        let mut members: Vec<Arc<SessionMember>> =
            document.get("members")
                    .and_then(Value::as_object)
                    .map(|entries| {
                        entries.iter()
                               .filter_map(|(key, value)| {
                                   let index = key.parse().ok()?;
                                   Some(Arc::new(SessionMember::from_json(index, value)))
                               })
                               .collect()
                    })
                    .unwrap_or_default();

        members.sort_by_key(|member| member.member_index);
        members
    }
}

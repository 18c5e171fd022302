use serde_json::json;

use super::*;

#[test]
fn to_json_is_none_when_nothing_set() {
    assert_eq!(SessionConstants::default().to_json(), None);
}

#[test]
fn custom_only_constants_omit_system() {
    let constants = SessionConstants { custom: Some(json!({"mode": "ranked"})),
                                       ..Default::default() };

    assert_eq!(constants.to_json(), Some(json!({"custom": {"mode": "ranked"}})));
}

#[test]
fn capabilities_serialize_only_set_flags() {
    let mut constants = SessionConstants::default();
    constants.capabilities.connectivity = Some(true);
    constants.capabilities.crossplay = Some(true);
    constants.capabilities.large = Some(false);
    constants.max_members_count = Some(8);

    let json = constants.to_json().expect("constants should serialize");
    assert_eq!(json,
               json!({
                   "system": {
                       "maxMembersCount": 8,
                       "capabilities": {
                           "connectivity": true,
                           "crossPlay": true,
                           "large": false
                       }
                   }
               }));
}

#[test]
fn visibility_and_timeouts_round_trip() {
    let constants =
        SessionConstants { max_members_count:          Some(16),
                           visibility:                 crate::states::SessionVisibility::Open,
                           member_reserved_timeout_ms: Some(10_000),
                           session_empty_timeout_ms:   Some(0),
                           member_initialization:      Some(MemberInitialization { join_timeout: Some(4_000),
                                                                                   members_needed_to_start: Some(2),
                                                                                   ..Default::default() }),
                           peer_to_host_requirements:
                               Some(PeerToHostRequirements { latency_maximum:       Some(250),
                                                             host_selection_metric: Some("bandwidthUp".to_owned()),
                                                             ..Default::default() }),
                           ..Default::default() };

    let json = constants.to_json().expect("constants should serialize");
    let parsed = SessionConstants::from_json(&json);

    assert_eq!(parsed, constants);
}

#[test]
fn from_json_tolerates_partial_documents() {
    let parsed = SessionConstants::from_json(&json!({
                     "system": {
                         "visibility": "private",
                         "capabilities": "not-an-object"
                     }
                 }));

    assert_eq!(parsed.visibility, crate::states::SessionVisibility::Private);
    assert!(parsed.capabilities.is_empty());
    assert_eq!(parsed.max_members_count, None);
    assert_eq!(parsed.custom, None);
}

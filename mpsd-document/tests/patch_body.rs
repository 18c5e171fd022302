use maplit::hashmap;
use serde_json::json;
use trim_margin::MarginTrimmable;

use mpsd_document::{RoleInfo, RoleType, SessionCapabilities, SessionChangeTypes, SessionConstants, SessionMember,
                    SessionProperties, SessionReference, SessionRequest, SessionRestriction};

#[test]
fn full_join_patch_matches_captured_body() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let request = SessionRequest::new();
    request.set_session_reference(SessionReference::new("scid-1", "deathmatch", "lobby-44"));
    request.set_session_constants(SessionConstants { max_members_count: Some(8),
                                                     capabilities: SessionCapabilities { connectivity: Some(true),
                                                                                         ..Default::default() },
                                                     ..Default::default() });
    request.set_role_types(hashmap! {
                "lfg".to_owned() => RoleType { roles: hashmap! {
                                        "confirmed".to_owned() => RoleInfo { max_members_count: 8, target_count: 4 },
                                    }, },
            });
    request.set_keywords(vec!["ranked".to_owned()]);
    request.set_join_restriction(SessionRestriction::Followed);
    request.set_closed(false);
    request.set_custom_properties(json!({"map": "atoll"}));
    request.set_servers(json!({"gameServer": {"constants": {"system": {}}}}));

    let me = request.add_member_request(true, true, "2814612345678901", None, None);
    me.set_active(true);
    me.set_rta_connection_id("rta-77");
    me.set_change_subscription("sub-1", SessionChangeTypes::EVERYTHING | SessionChangeTypes::JOINABILITY);
    me.set_custom_property("team", json!("blue")).expect("member custom property");

    let reservation = request.add_member_request(true, false, "2814600000000002", None, None);
    assert_eq!(reservation.member_id(), "reserve_0");

    let expected = r#"|{
                      |	"constants": {
                      |		"system": {
                      |			"maxMembersCount": 8,
                      |			"capabilities": {
                      |				"connectivity": true
                      |			}
                      |		}
                      |	},
                      |	"roleTypes": {
                      |		"lfg": {
                      |			"roles": {
                      |				"confirmed": {
                      |					"max": 8,
                      |					"target": 4
                      |				}
                      |			}
                      |		}
                      |	},
                      |	"properties": {
                      |		"system": {
                      |			"keywords": ["ranked"],
                      |			"joinRestriction": "followed",
                      |			"closed": false
                      |		},
                      |		"custom": {
                      |			"map": "atoll"
                      |		}
                      |	},
                      |	"members": {
                      |		"me": {
                      |			"constants": {
                      |				"system": {
                      |					"xuid": "2814612345678901"
                      |				}
                      |			},
                      |			"properties": {
                      |				"system": {
                      |					"active": true,
                      |					"connection": "rta-77",
                      |					"subscription": {
                      |						"id": "sub-1",
                      |						"changeTypes": ["everything", "joinability"]
                      |					}
                      |				},
                      |				"custom": {
                      |					"team": "blue"
                      |				}
                      |			}
                      |		},
                      |		"reserve_0": {
                      |			"constants": {
                      |				"system": {
                      |					"xuid": "2814600000000002"
                      |				}
                      |			}
                      |		}
                      |	},
                      |	"servers": {
                      |		"gameServer": {
                      |			"constants": {
                      |				"system": {}
                      |			}
                      |		}
                      |	}
                      |}"#.trim_margin()
                          .expect("Failed to trim margin from captured JSON");

    let expected: serde_json::Value = serde_json::from_str(&expected).expect("Captured body should parse");
    assert_eq!(request.to_json(), expected);
}

#[test]
fn patch_then_document_refresh_round_trip() {
    let request = SessionRequest::new();
    request.set_keywords(vec!["ranked".to_owned()]);
    request.set_join_restriction(SessionRestriction::Local);
    request.set_host_device_token("host-device-7");
    request.set_custom_properties(json!({"map": "atoll"}));
    request.set_turns(vec![1, 0]);

    // shape the patch back into a server document and read it again
    let document = json!({
        "properties": request.to_json().get("properties").expect("properties section").clone(),
        "members": {
            "0": {"constants": {"system": {"xuid": "1000"}}},
            "1": {"constants": {"system": {"xuid": "1001"}},
                  "properties": {"system": {"active": true, "turn": true}}}
        }
    });

    let properties = SessionProperties::from_json(document.get("properties").expect("properties section"))
        .expect("document should deserialize");
    let members = SessionMember::parse_members(&document);
    properties.initialize(std::sync::Arc::new(SessionRequest::new()), &members);

    assert_eq!(properties.keywords(), vec!["ranked"]);
    assert_eq!(properties.join_restriction(), SessionRestriction::Local);
    assert_eq!(properties.host_device_token(), "host-device-7");
    assert_eq!(properties.custom_properties(), Some(json!({"map": "atoll"})));

    let turns = properties.turn_collection();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].xuid, "1001");
    assert!(turns[0].is_turn);
    assert_eq!(turns[1].xuid, "1000");
}

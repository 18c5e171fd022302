use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies a session by service config, template and name. Immutable once
/// constructed; used as a map key and as the request path of every session
/// document call.
#[derive(Serialize, Deserialize, Display, Clone, Debug, PartialEq, Eq, Hash)]
#[display(fmt = "/serviceconfigs/{}/sessionTemplates/{}/sessions/{}", scid, template_name, session_name)]
pub struct SessionReference {
    pub scid:          String,
    #[serde(rename = "templateName")]
    pub template_name: String,
    #[serde(rename = "name")]
    pub session_name:  String,
}

impl SessionReference {
    pub fn new(scid: impl Into<String>, template_name: impl Into<String>, session_name: impl Into<String>) -> Self {
        Self { scid:          scid.into(),
               template_name: template_name.into(),
               session_name:  session_name.into(), }
    }

    /// A reference is addressable only when all three parts are present.
    pub fn is_complete(&self) -> bool {
        !self.scid.is_empty() && !self.template_name.is_empty() && !self.session_name.is_empty()
    }

    pub fn to_uri_path(&self) -> String {
        self.to_string()
    }

    pub fn parse_uri_path(path: &str) -> Result<Self> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();

        match parts.as_slice() {
            ["serviceconfigs", scid, "sessionTemplates", template, "sessions", name] => {
                Ok(Self::new(*scid, *template, *name))
            }
            _ => Err(Error::InvalidArgument("session reference uri path")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_path_round_trip() {
        let reference = SessionReference::new("361f8dc5-cb81-4a0a-8afe-4db6b56f18bc", "deathmatch", "lobby-44");
        let path = reference.to_uri_path();

        assert_eq!(path,
                   "/serviceconfigs/361f8dc5-cb81-4a0a-8afe-4db6b56f18bc/sessionTemplates/deathmatch/sessions/lobby-44");
        assert_eq!(SessionReference::parse_uri_path(&path).expect("path should parse"), reference);
    }

    #[test]
    fn malformed_uri_path_is_rejected() {
        assert!(SessionReference::parse_uri_path("/serviceconfigs/scid/sessions/name").is_err());
        assert!(SessionReference::parse_uri_path("").is_err());
        assert!(SessionReference::parse_uri_path("/serviceconfigs/a/sessionTemplates/b/sessions/c/extra").is_err());
    }

    #[test]
    fn wire_field_names() {
        let reference = SessionReference::new("scid-1", "template-1", "session-1");
        let json = serde_json::to_value(&reference).expect("reference should serialize");

        assert_eq!(json,
                   serde_json::json!({"scid": "scid-1", "templateName": "template-1", "name": "session-1"}));

        let parsed: SessionReference = serde_json::from_value(json).expect("reference should deserialize");
        assert_eq!(parsed, reference);
    }
}

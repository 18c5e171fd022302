pub mod constants;
pub mod error;
pub mod json;
pub mod member;
pub mod properties;
pub mod reference;
pub mod request;
pub mod states;

pub use constants::{MemberInitialization, PeerToHostRequirements, PeerToPeerRequirements, SessionCapabilities,
                    SessionConstants};
pub use error::{Error, Result};
pub use member::SessionMember;
pub use properties::SessionProperties;
pub use reference::SessionReference;
pub use request::{ChangeSubscription, RoleInfo, RoleType, SessionMemberRequest, SessionRequest};
pub use states::{ArbitrationOutcome, SessionChangeTypes, SessionRestriction, SessionVisibility, TeamResult};

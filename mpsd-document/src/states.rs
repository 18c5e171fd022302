use bitflags::bitflags;
use tracing::*;

/// Who may join or read a session document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionRestriction {
    /// Not set by the service; never serialized into a patch.
    #[default]
    Unknown,
    None,
    Local,
    Followed,
}

impl SessionRestriction {
    /// Wire string, or `None` for `Unknown` which is omitted from patches.
    pub fn as_wire_str(self) -> Option<&'static str> {
        match self {
            SessionRestriction::Unknown => None,
            SessionRestriction::None => Some("none"),
            SessionRestriction::Local => Some("local"),
            SessionRestriction::Followed => Some("followed"),
        }
    }

    pub fn from_wire_str(value: &str) -> Self {
        match value {
            "none" => SessionRestriction::None,
            "local" => SessionRestriction::Local,
            "followed" => SessionRestriction::Followed,
            other => {
                warn!(restriction = other, "unrecognized session restriction");
                SessionRestriction::Unknown
            }
        }
    }

    /// Only explicit restrictions may be written to a session.
    pub fn is_writable(self) -> bool {
        !matches!(self, SessionRestriction::Unknown)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionVisibility {
    #[default]
    Unknown,
    Any,
    Private,
    Visible,
    Full,
    Open,
}

impl SessionVisibility {
    pub fn as_wire_str(self) -> Option<&'static str> {
        match self {
            SessionVisibility::Unknown => None,
            SessionVisibility::Any => Some("any"),
            SessionVisibility::Private => Some("private"),
            SessionVisibility::Visible => Some("visible"),
            SessionVisibility::Full => Some("full"),
            SessionVisibility::Open => Some("open"),
        }
    }

    pub fn from_wire_str(value: &str) -> Self {
        match value {
            "any" => SessionVisibility::Any,
            "private" => SessionVisibility::Private,
            "visible" => SessionVisibility::Visible,
            "full" => SessionVisibility::Full,
            "open" => SessionVisibility::Open,
            other => {
                warn!(visibility = other, "unrecognized session visibility");
                SessionVisibility::Unknown
            }
        }
    }
}

/// Outcome a team reports for an arbitrated match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArbitrationOutcome {
    NoContest,
    Loss,
    Win,
    Draw,
    Rank,
}

impl ArbitrationOutcome {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            ArbitrationOutcome::NoContest => "noContest",
            ArbitrationOutcome::Loss => "loss",
            ArbitrationOutcome::Win => "win",
            ArbitrationOutcome::Draw => "draw",
            ArbitrationOutcome::Rank => "rank",
        }
    }
}

/// Per-team arbitration result. `ranking` is meaningful only for `Rank`
/// outcomes and is serialized only then.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamResult {
    pub outcome: ArbitrationOutcome,
    pub ranking: u64,
}

bitflags! {
    /// Categories of session document change a real-time subscription
    /// notifies on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SessionChangeTypes: u32 {
        const EVERYTHING              = 0x0001;
        const HOST                    = 0x0002;
        const INITIALIZATION          = 0x0004;
        const MATCHMAKING_STATUS      = 0x0008;
        const TOURNAMENTS             = 0x0010;
        const MEMBERS_LIST            = 0x0020;
        const MEMBERS_STATUS          = 0x0040;
        const JOINABILITY             = 0x0080;
        const CUSTOM_PROPERTY         = 0x0100;
        const MEMBERS_CUSTOM_PROPERTY = 0x0200;
    }
}

// The service is sensitive to the order of changeTypes entries, so the table
// below is the canonical emission order, not alphabetical.
const CHANGE_TYPE_NAMES: &[(SessionChangeTypes, &str)] =
    &[(SessionChangeTypes::EVERYTHING, "everything"),
      (SessionChangeTypes::HOST, "host"),
      (SessionChangeTypes::INITIALIZATION, "initialization"),
      (SessionChangeTypes::MATCHMAKING_STATUS, "matchmakingStatus"),
      (SessionChangeTypes::TOURNAMENTS, "tournaments"),
      (SessionChangeTypes::MEMBERS_LIST, "membersList"),
      (SessionChangeTypes::MEMBERS_STATUS, "membersStatus"),
      (SessionChangeTypes::JOINABILITY, "joinability"),
      (SessionChangeTypes::CUSTOM_PROPERTY, "customProperty"),
      (SessionChangeTypes::MEMBERS_CUSTOM_PROPERTY, "membersCustomProperty")];

impl SessionChangeTypes {
    /// Wire names for every set bit, in canonical order.
    pub fn wire_names(self) -> Vec<&'static str> {
        CHANGE_TYPE_NAMES.iter()
                         .filter(|(flag, _)| self.contains(*flag))
                         .map(|(_, name)| *name)
                         .collect()
    }
}

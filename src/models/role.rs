use serde::{Deserialize, Serialize};

/// Access class of an authenticated identity.
///
/// `Bmc` is the default for profiles without an assigned role and has no
/// landing screen of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
    #[default]
    Bmc,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
            Role::Bmc => "bmc",
        }
    }

    /// Convert stored string → enum. Unknown strings yield `None`.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "driver" => Some(Role::Driver),
            "bmc" => Some(Role::Bmc),
            _ => None,
        }
    }

    /// Role taken from a profile document: missing or unrecognized → `Bmc`.
    pub fn from_profile(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Role::from_db_str(&s.to_lowercase()))
            .unwrap_or_default()
    }

    /// Roles that own a landing screen and may be restored at startup.
    pub fn has_landing(&self) -> bool {
        matches!(self, Role::Admin | Role::Driver)
    }
}

use serde::{Deserialize, Serialize};

/// Who can see a task or work plan.
///
/// - `Private`: only the owning manager
/// - `Public`: anonymous visitors and every authenticated user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privacy {
    Private,
    Public,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Public => "PUBLIC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PRIVATE" => Some(Self::Private),
            "PUBLIC" => Some(Self::Public),
            _ => None,
        }
    }
}

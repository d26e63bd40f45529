use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{require_not_blank, Violations};

/// A registered user. Credentials live with the external authenticator;
/// only the username is known here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// The manager role of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manager {
    pub id: Uuid,
    pub user_account_id: Uuid,
}

/// The consumer role of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consumer {
    pub id: Uuid,
    pub user_account_id: Uuid,
    pub company: String,
    pub sector: String,
}

/// Input for registering or updating consumer data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerForm {
    pub company: String,
    pub sector: String,
}

impl ConsumerForm {
    pub fn validate(&self) -> Violations {
        require_not_blank(&[
            ("company", self.company.as_str()),
            ("sector", self.sector.as_str()),
        ])
    }
}

/// The user behind a request, with the roles it holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub user_account_id: Uuid,
    pub username: String,
    pub manager_id: Option<Uuid>,
    pub consumer_id: Option<Uuid>,
}

impl Principal {
    pub fn is_manager(&self) -> bool {
        self.manager_id.is_some()
    }
}

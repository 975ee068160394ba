//! Account and session entities.

use crate::domain::value_objects::Nickname;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;
pub type SessionToken = Uuid;

/// A player account. Created once at first login; the nickname is unique
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub nickname: Nickname,
}

impl Account {
    pub fn new(nickname: Nickname) -> Self {
        Account {
            id: Uuid::new_v4(),
            nickname,
        }
    }
}

/// Ephemeral login credential. Issued on login, deleted on logout.
/// An account may hold any number of concurrent sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSession {
    pub token: SessionToken,
    pub account_id: AccountId,
    pub created: DateTime<Utc>,
}

impl AccountSession {
    /// Open a fresh session for the account with a random token.
    pub fn open(account_id: AccountId) -> Self {
        AccountSession {
            token: Uuid::new_v4(),
            account_id,
            created: Utc::now(),
        }
    }
}

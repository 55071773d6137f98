use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub username: String,
    /// Inactive users can still read but every mutation is refused
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A person who can own boards, join them and act on them.
///
/// Uniqueness of email and username is the persistence boundary's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct User {
    state: UserRecord,
}

impl User {
    pub fn create(id: UserId, email: &str, username: &str, now: DateTime<Utc>) -> Result<Self> {
        let email = email.trim().to_ascii_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("A valid email is required"));
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation("Username is required"));
        }

        Ok(Self {
            state: UserRecord {
                id,
                email,
                username: username.to_string(),
                is_active: true,
                created_at: now,
            },
        })
    }

    pub fn restore(state: UserRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> UserId {
        self.state.id
    }

    pub fn email(&self) -> &str {
        &self.state.email
    }

    pub fn username(&self) -> &str {
        &self.state.username
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn deactivate(&mut self) {
        self.state.is_active = false;
    }

    pub fn activate(&mut self) {
        self.state.is_active = true;
    }

    pub fn record(&self) -> &UserRecord {
        &self.state
    }
}

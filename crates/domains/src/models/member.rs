use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, UserId};
use crate::errors::{DomainError, Result};

/// A member's permission level on a board: OWNER > ADMIN > MEMBER > VIEWER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    /// Roles that membership management may grant. OWNER is only ever set
    /// when the board is created.
    pub const ASSIGNABLE: [Role; 3] = [Role::Admin, Role::Member, Role::Viewer];

    /// Higher rank means more authority.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Owner => 4,
            Role::Admin => 3,
            Role::Member => 2,
            Role::Viewer => 1,
        }
    }

    pub const fn at_least(self, threshold: Role) -> bool {
        self.rank() >= threshold.rank()
    }

    pub const fn is_assignable(self) -> bool {
        !matches!(self, Role::Owner)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Viewer => "VIEWER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Role::Owner),
            "ADMIN" => Ok(Role::Admin),
            "MEMBER" => Ok(Role::Member),
            "VIEWER" => Ok(Role::Viewer),
            other => Err(DomainError::validation(format!("Unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMemberRecord {
    pub board_id: BoardId,
    pub user_id: UserId,
    /// OWNER only on the row written at board creation; otherwise one of `Role::ASSIGNABLE`
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Membership of a user on a board. `(board_id, user_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoardMember {
    state: BoardMemberRecord,
}

impl BoardMember {
    /// The membership row written alongside a new board.
    pub fn create_owner(board_id: BoardId, owner_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            state: BoardMemberRecord {
                board_id,
                user_id: owner_id,
                role: Role::Owner,
                joined_at: now,
            },
        }
    }

    pub fn create(
        board_id: BoardId,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        ensure_assignable(role)?;
        Ok(Self {
            state: BoardMemberRecord {
                board_id,
                user_id,
                role,
                joined_at: now,
            },
        })
    }

    pub fn restore(state: BoardMemberRecord) -> Self {
        Self { state }
    }

    pub fn board_id(&self) -> BoardId {
        self.state.board_id
    }

    pub fn user_id(&self) -> UserId {
        self.state.user_id
    }

    pub fn role(&self) -> Role {
        self.state.role
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.state.joined_at
    }

    pub fn record(&self) -> &BoardMemberRecord {
        &self.state
    }

    pub fn change_role(&mut self, role: Role) -> Result<()> {
        if self.state.role == Role::Owner {
            return Err(DomainError::validation("Cannot change the owner's role"));
        }
        ensure_assignable(role)?;
        self.state.role = role;
        Ok(())
    }
}

fn ensure_assignable(role: Role) -> Result<()> {
    if !role.is_assignable() {
        return Err(DomainError::validation("Cannot assign the OWNER role"));
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, UserId};
use crate::errors::{DomainError, Result};
use crate::validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub id: BoardId,
    pub title: String,
    pub description: Option<String>,
    /// Public boards are readable by any user, member or not
    pub is_public: bool,
    /// Archived boards stay readable and still show up in listings
    pub is_archived: bool,
    /// Always OWNER, whatever the member row says
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`Board::create`].
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub owner_id: UserId,
}

/// Top-level container owning Lists, Labels and (transitively) Cards.
///
/// The owner is fixed at creation and is implicitly a member with role
/// OWNER. Authorization checks live in [`crate::access`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Board {
    state: BoardRecord,
}

impl Board {
    pub fn create(id: BoardId, input: NewBoard, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            state: BoardRecord {
                id,
                title: validation::title("Title", &input.title)?,
                description: validation::optional_text(input.description),
                is_public: input.is_public,
                is_archived: false,
                owner_id: input.owner_id,
                created_at: now,
                updated_at: now,
            },
        })
    }

    pub fn restore(state: BoardRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> BoardId {
        self.state.id
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn description(&self) -> Option<&str> {
        self.state.description.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.state.is_public
    }

    pub fn is_archived(&self) -> bool {
        self.state.is_archived
    }

    pub fn owner_id(&self) -> UserId {
        self.state.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.updated_at
    }

    pub fn record(&self) -> &BoardRecord {
        &self.state
    }

    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.state.title = validation::title("Title", title)?;
        Ok(())
    }

    pub fn describe(&mut self, description: Option<String>) {
        self.state.description = validation::optional_text(description);
    }

    pub fn set_visibility(&mut self, is_public: bool) {
        self.state.is_public = is_public;
    }

    pub fn archive(&mut self) -> Result<()> {
        if self.state.is_archived {
            return Err(DomainError::already_in_state("Board is already archived"));
        }
        self.state.is_archived = true;
        Ok(())
    }

    pub fn unarchive(&mut self) -> Result<()> {
        if !self.state.is_archived {
            return Err(DomainError::already_in_state("Board is not archived"));
        }
        self.state.is_archived = false;
        Ok(())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.state.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn board() -> Board {
        Board::create(
            BoardId::from(Uuid::from_u128(1)),
            NewBoard {
                title: "  Launch plan ".into(),
                description: Some("   ".into()),
                is_public: false,
                owner_id: UserId::from(Uuid::from_u128(2)),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_trims_title_and_drops_blank_description() {
        let board = board();
        assert_eq!(board.title(), "Launch plan");
        assert_eq!(board.description(), None);
        assert!(!board.is_archived());
        assert_eq!(board.created_at(), board.updated_at());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut board = board();
        let err = board.rename("").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(board.title(), "Launch plan");
    }

    #[test]
    fn archive_is_guarded_both_ways() {
        let mut board = board();
        assert_eq!(
            board.unarchive().unwrap_err().to_string(),
            "Board is not archived"
        );
        board.archive().unwrap();
        assert_eq!(
            board.archive().unwrap_err().to_string(),
            "Board is already archived"
        );
    }
}

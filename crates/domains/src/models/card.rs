use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CardId, ListId, UserId};
use crate::errors::{DomainError, Result};
use crate::validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub title: String,
    pub description: Option<String>,
    /// Sort key within the list, ascending. Gaps are expected
    pub position: f64,
    pub due_date: Option<DateTime<Utc>>,
    /// Never later than `due_date` when both are set
    pub start_date: Option<DateTime<Utc>>,
    pub is_archived: bool,
    /// Image shown on the card face. Blank input clears it
    pub cover_url: Option<String>,
    pub list_id: ListId,
    /// May delete the card even without edit rights
    pub creator_id: UserId,
    /// Must be the board owner or a member at assignment time
    pub assignee_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub position: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub list_id: ListId,
    pub creator_id: UserId,
    pub assignee_id: Option<UserId>,
}

/// A unit of work living in a list.
///
/// Lifecycle is `Active ⇄ Archived`. Title length and the due/start date
/// ordering are validated by the orchestrators, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Card {
    state: CardRecord,
}

impl Card {
    pub fn create(id: CardId, input: NewCard, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            state: CardRecord {
                id,
                title: input.title,
                description: validation::optional_text(input.description),
                position: validation::position(input.position)?,
                due_date: input.due_date,
                start_date: input.start_date,
                is_archived: false,
                cover_url: None,
                list_id: input.list_id,
                creator_id: input.creator_id,
                assignee_id: input.assignee_id,
                created_at: now,
                updated_at: now,
            },
        })
    }

    pub fn restore(state: CardRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> CardId {
        self.state.id
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn description(&self) -> Option<&str> {
        self.state.description.as_deref()
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.state.due_date
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.state.start_date
    }

    pub fn is_archived(&self) -> bool {
        self.state.is_archived
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.state.cover_url.as_deref()
    }

    pub fn list_id(&self) -> ListId {
        self.state.list_id
    }

    pub fn creator_id(&self) -> UserId {
        self.state.creator_id
    }

    pub fn assignee_id(&self) -> Option<UserId> {
        self.state.assignee_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.updated_at
    }

    pub fn record(&self) -> &CardRecord {
        &self.state
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.state.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.state.description = validation::optional_text(description);
    }

    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.state.due_date = due_date;
    }

    pub fn set_start_date(&mut self, start_date: Option<DateTime<Utc>>) {
        self.state.start_date = start_date;
    }

    pub fn assign(&mut self, assignee: UserId) {
        self.state.assignee_id = Some(assignee);
    }

    pub fn unassign(&mut self) {
        self.state.assignee_id = None;
    }

    pub fn set_cover(&mut self, cover_url: Option<String>) {
        self.state.cover_url = validation::optional_text(cover_url);
    }

    pub fn reposition(&mut self, position: f64) -> Result<()> {
        self.state.position = validation::position(position)?;
        Ok(())
    }

    pub fn move_to(&mut self, list_id: ListId, position: f64) -> Result<()> {
        self.state.position = validation::position(position)?;
        self.state.list_id = list_id;
        Ok(())
    }

    pub fn archive(&mut self) -> Result<()> {
        if self.state.is_archived {
            return Err(DomainError::already_in_state("Card is already archived"));
        }
        self.state.is_archived = true;
        Ok(())
    }

    pub fn unarchive(&mut self) -> Result<()> {
        if !self.state.is_archived {
            return Err(DomainError::already_in_state("Card is not archived"));
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

    fn card() -> Card {
        Card::create(
            CardId::from(Uuid::from_u128(10)),
            NewCard {
                title: String::new(),
                description: None,
                position: 1000.0,
                due_date: None,
                start_date: None,
                list_id: ListId::from(Uuid::from_u128(20)),
                creator_id: UserId::from(Uuid::from_u128(30)),
                assignee_id: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_titles_are_allowed_by_the_entity() {
        assert_eq!(card().title(), "");
    }

    #[test]
    fn archive_state_machine() {
        let mut card = card();
        assert_eq!(card.unarchive().unwrap_err().to_string(), "Card is not archived");
        card.archive().unwrap();
        assert!(card.is_archived());
        assert_eq!(card.archive().unwrap_err().to_string(), "Card is already archived");
        card.unarchive().unwrap();
        assert!(!card.is_archived());
    }

    #[test]
    fn move_rejects_non_finite_positions_without_changing_list() {
        let mut card = card();
        let original = card.list_id();
        assert!(card.move_to(ListId::from(Uuid::from_u128(99)), f64::NAN).is_err());
        assert_eq!(card.list_id(), original);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::{ActivityId, BoardId, CardId, UserId};
use crate::audit::ChangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Move,
    /// Recorded against the container whose children were reordered.
    Reorder,
    Archive,
    Unarchive,
    AddMember,
    UpdateMember,
    RemoveMember,
    AttachLabel,
    DetachLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Board,
    List,
    Card,
    Label,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    /// Raw id of the entity named by `entity_type`
    pub entity_id: Uuid,
    /// Title at the time of the action, kept after deletes
    pub entity_title: String,
    /// `{ field: { from, to } }` for updates, free-form snapshot otherwise.
    pub data: Option<Value>,
    pub description: Option<String>,
    pub user_id: UserId,
    pub board_id: BoardId,
    /// Set for card-scoped entries so the card feed can filter on it
    pub card_id: Option<CardId>,
    pub created_at: DateTime<Utc>,
}

/// Everything an [`Activity`] needs apart from identity and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub entity_title: String,
    pub data: Option<Value>,
    pub description: Option<String>,
    pub user_id: UserId,
    pub board_id: BoardId,
    pub card_id: Option<CardId>,
}

impl NewActivity {
    pub fn new(
        action: ActivityAction,
        entity_type: EntityType,
        entity_id: impl Into<Uuid>,
        entity_title: impl Into<String>,
        user_id: UserId,
        board_id: BoardId,
    ) -> Self {
        Self {
            action,
            entity_type,
            entity_id: entity_id.into(),
            entity_title: entity_title.into(),
            data: None,
            description: None,
            user_id,
            board_id,
            card_id: None,
        }
    }

    pub fn with_card(mut self, card_id: CardId) -> Self {
        self.card_id = Some(card_id);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Uses the change set as both the diff payload and the description.
    pub fn with_changes(self, changes: &ChangeSet) -> Self {
        let description = changes.describe();
        self.with_data(changes.to_data()).with_description(description)
    }
}

/// Append-only audit fact. Nothing can change it once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Activity {
    state: ActivityRecord,
}

impl Activity {
    pub fn create(id: ActivityId, input: NewActivity, now: DateTime<Utc>) -> Self {
        Self {
            state: ActivityRecord {
                id,
                action: input.action,
                entity_type: input.entity_type,
                entity_id: input.entity_id,
                entity_title: input.entity_title,
                data: input.data,
                description: input.description,
                user_id: input.user_id,
                board_id: input.board_id,
                card_id: input.card_id,
                created_at: now,
            },
        }
    }

    pub fn restore(state: ActivityRecord) -> Self {
        Self { state }
    }

    pub fn id(&self) -> ActivityId {
        self.state.id
    }

    pub fn action(&self) -> ActivityAction {
        self.state.action
    }

    pub fn entity_type(&self) -> EntityType {
        self.state.entity_type
    }

    pub fn entity_id(&self) -> Uuid {
        self.state.entity_id
    }

    pub fn entity_title(&self) -> &str {
        &self.state.entity_title
    }

    pub fn data(&self) -> Option<&Value> {
        self.state.data.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.state.description.as_deref()
    }

    pub fn user_id(&self) -> UserId {
        self.state.user_id
    }

    pub fn board_id(&self) -> BoardId {
        self.state.board_id
    }

    pub fn card_id(&self) -> Option<CardId> {
        self.state.card_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn record(&self) -> &ActivityRecord {
        &self.state
    }
}

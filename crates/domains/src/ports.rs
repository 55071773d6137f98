//! # Ports
//!
//! Persistence and runtime contracts the core depends on. Any adapter must
//! implement these traits to be wired into the services.
//!
//! Enable the `testing` feature to get `MockXxx` types generated by mockall.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::PortError;
use crate::models::{
    Activity, Board, BoardId, BoardMember, Card, CardId, Label, LabelId, List, ListId, Role,
    User, UserId,
};
use crate::ordering::PositionUpdate;

pub type PortResult<T> = std::result::Result<T, PortError>;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> PortResult<Option<User>>;
    async fn save(&self, user: &User) -> PortResult<()>;
}

/// Boards and their memberships.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_by_id(&self, id: BoardId) -> PortResult<Option<Board>>;
    /// Boards the user owns or is a member of.
    async fn find_for_user(&self, user_id: UserId) -> PortResult<Vec<Board>>;
    async fn save(&self, board: &Board) -> PortResult<()>;
    /// Cascades to the board's lists, cards, labels and memberships.
    async fn delete(&self, id: BoardId) -> PortResult<()>;

    async fn get_member_role(&self, board_id: BoardId, user_id: UserId)
        -> PortResult<Option<Role>>;
    async fn is_member(&self, board_id: BoardId, user_id: UserId) -> PortResult<bool>;
    async fn find_member(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> PortResult<Option<BoardMember>>;
    async fn find_members(&self, board_id: BoardId) -> PortResult<Vec<BoardMember>>;
    async fn add_member(&self, member: &BoardMember) -> PortResult<()>;
    async fn save_member(&self, member: &BoardMember) -> PortResult<()>;
    async fn remove_member(&self, board_id: BoardId, user_id: UserId) -> PortResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn find_by_id(&self, id: ListId) -> PortResult<Option<List>>;
    /// Ordered by position.
    async fn find_by_board(&self, board_id: BoardId) -> PortResult<Vec<List>>;
    async fn exists_in_board(&self, list_id: ListId, board_id: BoardId) -> PortResult<bool>;
    async fn save(&self, list: &List) -> PortResult<()>;
    /// Cascades to the list's cards.
    async fn delete(&self, id: ListId) -> PortResult<()>;
    /// Applies the whole batch or nothing.
    async fn reorder(
        &self,
        board_id: BoardId,
        updates: Vec<PositionUpdate<ListId>>,
    ) -> PortResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn find_by_id(&self, id: CardId) -> PortResult<Option<Card>>;
    /// Ordered by position, archived cards included.
    async fn find_by_list(&self, list_id: ListId) -> PortResult<Vec<Card>>;
    async fn exists_in_list(&self, card_id: CardId, list_id: ListId) -> PortResult<bool>;
    async fn save(&self, card: &Card) -> PortResult<()>;
    async fn delete(&self, id: CardId) -> PortResult<()>;
    /// Applies the whole batch or nothing.
    async fn reorder(
        &self,
        list_id: ListId,
        updates: Vec<PositionUpdate<CardId>>,
    ) -> PortResult<()>;
}

/// Board labels and their attachment to cards.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn find_by_id(&self, id: LabelId) -> PortResult<Option<Label>>;
    async fn find_by_board(&self, board_id: BoardId) -> PortResult<Vec<Label>>;
    async fn save(&self, label: &Label) -> PortResult<()>;
    /// Also detaches the label from every card.
    async fn delete(&self, id: LabelId) -> PortResult<()>;

    async fn find_by_card(&self, card_id: CardId) -> PortResult<Vec<Label>>;
    async fn card_label_ids(&self, card_id: CardId) -> PortResult<HashSet<LabelId>>;
    async fn attach(&self, card_id: CardId, label_id: LabelId) -> PortResult<()>;
    async fn detach(&self, card_id: CardId, label_id: LabelId) -> PortResult<()>;
}

/// Append-only activity log.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn save(&self, activity: &Activity) -> PortResult<()>;
    /// Newest first.
    async fn find_by_board(&self, board_id: BoardId, limit: usize) -> PortResult<Vec<Activity>>;
    /// Newest first.
    async fn find_by_card(&self, card_id: CardId, limit: usize) -> PortResult<Vec<Activity>>;
}

/// Source of fresh entity identities.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

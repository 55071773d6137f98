//! Entity-chain resolution.
//!
//! Operations on nested entities resolve in a fixed order, e.g. for a card:
//! User → Card → List → Board → role. The first missing link raises its own
//! `NotFound` and nothing after it is queried.

use domains::access::Access;
use domains::{
    Board, BoardId, Card, CardId, DomainError, Label, LabelId, List, ListId, Resource, Result,
    Role, User, UserId,
};

use crate::context::Ports;

/// The actor's standing on a board.
#[derive(Debug, Clone)]
pub struct BoardScope {
    pub actor: User,
    pub board: Board,
    pub role: Option<Role>,
}

impl BoardScope {
    pub fn access(&self) -> Access<'_> {
        Access::new(&self.board, self.actor.id(), self.role)
    }
}

#[derive(Debug, Clone)]
pub struct ListScope {
    pub list: List,
    pub scope: BoardScope,
}

#[derive(Debug, Clone)]
pub struct CardScope {
    pub card: Card,
    pub list: List,
    pub scope: BoardScope,
}

#[derive(Debug, Clone)]
pub struct LabelScope {
    pub label: Label,
    pub scope: BoardScope,
}

/// Whether the actor is about to mutate something. Inactive users may be
/// resolved for reads but never act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Mutate,
}

pub struct Resolver<'a> {
    ports: &'a Ports,
}

impl<'a> Resolver<'a> {
    pub fn new(ports: &'a Ports) -> Self {
        Self { ports }
    }

    pub async fn user(&self, id: UserId) -> Result<User> {
        self.ports
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Resource::User))
    }

    pub async fn actor(&self, id: UserId, intent: Intent) -> Result<User> {
        let user = self.user(id).await?;
        if intent == Intent::Mutate && !user.is_active() {
            tracing::warn!(user_id = %id, "inactive user attempted a mutation");
            return Err(DomainError::access_denied("User account is inactive"));
        }
        Ok(user)
    }

    pub async fn board(&self, id: BoardId) -> Result<Board> {
        self.ports
            .boards
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Resource::Board))
    }

    pub async fn list(&self, id: ListId) -> Result<List> {
        self.ports
            .lists
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Resource::List))
    }

    pub async fn card(&self, id: CardId) -> Result<Card> {
        self.ports
            .cards
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Resource::Card))
    }

    pub async fn label(&self, id: LabelId) -> Result<Label> {
        self.ports
            .labels
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(Resource::Label))
    }

    /// The owner never needs a membership lookup.
    pub async fn role(&self, board: &Board, user_id: UserId) -> Result<Option<Role>> {
        if board.is_owner(user_id) {
            return Ok(Some(Role::Owner));
        }
        Ok(self.ports.boards.get_member_role(board.id(), user_id).await?)
    }

    async fn scope_for(&self, actor: User, board: Board) -> Result<BoardScope> {
        let role = self.role(&board, actor.id()).await?;
        Ok(BoardScope { actor, board, role })
    }

    /// User → Board → role
    pub async fn board_scope(
        &self,
        actor_id: UserId,
        board_id: BoardId,
        intent: Intent,
    ) -> Result<BoardScope> {
        let actor = self.actor(actor_id, intent).await?;
        let board = self.board(board_id).await?;
        self.scope_for(actor, board).await
    }

    /// User → List → Board → role
    pub async fn list_scope(
        &self,
        actor_id: UserId,
        list_id: ListId,
        intent: Intent,
    ) -> Result<ListScope> {
        let actor = self.actor(actor_id, intent).await?;
        let list = self.list(list_id).await?;
        let board = self.board(list.board_id()).await?;
        let scope = self.scope_for(actor, board).await?;
        Ok(ListScope { list, scope })
    }

    /// User → Card → List → Board → role
    pub async fn card_scope(
        &self,
        actor_id: UserId,
        card_id: CardId,
        intent: Intent,
    ) -> Result<CardScope> {
        let actor = self.actor(actor_id, intent).await?;
        let card = self.card(card_id).await?;
        let list = self.list(card.list_id()).await?;
        let board = self.board(list.board_id()).await?;
        let scope = self.scope_for(actor, board).await?;
        Ok(CardScope { card, list, scope })
    }

    /// User → Label → Board → role
    pub async fn label_scope(
        &self,
        actor_id: UserId,
        label_id: LabelId,
        intent: Intent,
    ) -> Result<LabelScope> {
        let actor = self.actor(actor_id, intent).await?;
        let label = self.label(label_id).await?;
        let board = self.board(label.board_id()).await?;
        let scope = self.scope_for(actor, board).await?;
        Ok(LabelScope { label, scope })
    }
}

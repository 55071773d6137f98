//! Board use cases: create, read, update, archive, delete.

use domains::audit::ChangeSet;
use domains::{
    ActivityAction, Board, BoardId, BoardMember, EntityType, NewActivity, NewBoard, Result,
    UserId,
};

use crate::audit::AuditRecorder;
use crate::context::Ports;
use crate::resolve::{Intent, Resolver};

#[derive(Debug, Clone)]
pub struct CreateBoard {
    pub actor_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// `None` leaves a field untouched; `Some(None)` clears a clearable field.
#[derive(Debug, Clone)]
pub struct UpdateBoard {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// Identifies a board operation that carries no payload.
#[derive(Debug, Clone, Copy)]
pub struct BoardRef {
    pub actor_id: UserId,
    pub board_id: BoardId,
}

#[derive(Clone)]
pub struct BoardService {
    ports: Ports,
    audit: AuditRecorder,
}

impl BoardService {
    pub fn new(ports: Ports, audit: AuditRecorder) -> Self {
        Self { ports, audit }
    }

    /// Creates the board, its OWNER membership, then the activity.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id))]
    pub async fn create(&self, req: CreateBoard) -> Result<Board> {
        let actor = Resolver::new(&self.ports)
            .actor(req.actor_id, Intent::Mutate)
            .await?;

        let now = self.ports.clock.now();
        let board = Board::create(
            BoardId::from(self.ports.ids.next_id()),
            NewBoard {
                title: req.title,
                description: req.description,
                is_public: req.is_public,
                owner_id: actor.id(),
            },
            now,
        )?;

        self.ports.boards.save(&board).await?;
        self.ports
            .boards
            .add_member(&BoardMember::create_owner(board.id(), actor.id(), now))
            .await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Create,
                    EntityType::Board,
                    board.id(),
                    board.title(),
                    actor.id(),
                    board.id(),
                )
                .with_description(format!("created board {}", board.title())),
            )
            .await?;

        Ok(board)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn get(&self, req: BoardRef) -> Result<Board> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Read)
            .await?;
        scope.access().ensure_view()?;
        Ok(scope.board)
    }

    /// Boards the user owns or belongs to, archived ones included.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Board>> {
        let user = Resolver::new(&self.ports).user(user_id).await?;
        Ok(self.ports.boards.find_for_user(user.id()).await?)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn update(&self, req: UpdateBoard) -> Result<Board> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let mut board = scope.board;
        let mut changes = ChangeSet::new();

        if let Some(title) = req.title {
            let before = board.title().to_string();
            board.rename(&title)?;
            changes.track("title", "title", before.as_str(), board.title());
        }
        if let Some(description) = req.description {
            let before = board.description().map(str::to_string);
            board.describe(description);
            let after = board.description().map(str::to_string);
            changes.track("description", "description", &before, &after);
        }
        if let Some(is_public) = req.is_public {
            let before = board.is_public();
            board.set_visibility(is_public);
            changes.track("is_public", "visibility", &before, &board.is_public());
        }

        if changes.is_empty() {
            tracing::debug!("board update changed nothing");
            return Ok(board);
        }

        board.touch(self.ports.clock.now());
        self.ports.boards.save(&board).await?;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Update,
                    EntityType::Board,
                    board.id(),
                    board.title(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_changes(&changes),
            )
            .await?;

        Ok(board)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn archive(&self, req: BoardRef) -> Result<Board> {
        self.set_archived(req, true).await
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn unarchive(&self, req: BoardRef) -> Result<Board> {
        self.set_archived(req, false).await
    }

    async fn set_archived(&self, req: BoardRef, archived: bool) -> Result<Board> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_archive_board()?;

        let mut board = scope.board;
        let action = if archived {
            board.archive()?;
            ActivityAction::Archive
        } else {
            board.unarchive()?;
            ActivityAction::Unarchive
        };
        board.touch(self.ports.clock.now());
        self.ports.boards.save(&board).await?;

        let verb = if archived { "archived" } else { "restored" };
        self.audit
            .record(
                NewActivity::new(
                    action,
                    EntityType::Board,
                    board.id(),
                    board.title(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_description(format!("{verb} board {}", board.title())),
            )
            .await?;

        Ok(board)
    }

    /// Owner only. The activity is written before the delete is issued.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn delete(&self, req: BoardRef) -> Result<()> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_delete_board()?;

        let board = scope.board;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Delete,
                    EntityType::Board,
                    board.id(),
                    board.title(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_data(serde_json::json!({ "title": board.title() }))
                .with_description(format!("deleted board {}", board.title())),
            )
            .await?;

        self.ports.boards.delete(board.id()).await?;
        tracing::info!(board = %board.id(), "board deleted");
        Ok(())
    }
}

//! List use cases. Lists are ordered within their board by position.

use std::collections::HashSet;

use domains::audit::ChangeSet;
use domains::ordering::{self, PositionAllocator, PositionUpdate};
use domains::{
    ActivityAction, BoardId, EntityType, List, ListId, NewActivity, NewList, Result, UserId,
};
use serde_json::json;

use crate::audit::AuditRecorder;
use crate::context::Ports;
use crate::resolve::{Intent, Resolver};

#[derive(Debug, Clone)]
pub struct CreateList {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub title: String,
    pub color: Option<String>,
    /// Appended after the last list when absent.
    pub position: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UpdateList {
    pub actor_id: UserId,
    pub list_id: ListId,
    pub title: Option<String>,
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ListRef {
    pub actor_id: UserId,
    pub list_id: ListId,
}

#[derive(Debug, Clone)]
pub struct ReorderLists {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub positions: Vec<PositionUpdate<ListId>>,
}

#[derive(Clone)]
pub struct ListService {
    ports: Ports,
    audit: AuditRecorder,
    positions: PositionAllocator,
}

impl ListService {
    pub fn new(ports: Ports, audit: AuditRecorder, positions: PositionAllocator) -> Self {
        Self {
            ports,
            audit,
            positions,
        }
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id))]
    pub async fn create(&self, req: CreateList) -> Result<List> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let board = &scope.board;
        let siblings: Vec<f64> = self
            .ports
            .lists
            .find_by_board(board.id())
            .await?
            .iter()
            .map(List::position)
            .collect();
        let position = match req.position {
            Some(p) => {
                ordering::ensure_position_free(p, siblings, format!("board {}", board.id()))?
            }
            None => self.positions.next(siblings),
        };

        let list = List::create(
            ListId::from(self.ports.ids.next_id()),
            NewList {
                title: req.title,
                position,
                color: req.color,
                board_id: board.id(),
            },
            self.ports.clock.now(),
        )?;
        self.ports.lists.save(&list).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Create,
                    EntityType::List,
                    list.id(),
                    list.title(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_description(format!("added list {}", list.title())),
            )
            .await?;

        Ok(list)
    }

    /// Lists of a board ordered by position.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_board(&self, actor_id: UserId, board_id: BoardId) -> Result<Vec<List>> {
        let scope = Resolver::new(&self.ports)
            .board_scope(actor_id, board_id, Intent::Read)
            .await?;
        scope.access().ensure_view()?;

        let mut lists = self.ports.lists.find_by_board(board_id).await?;
        lists.sort_by(|a, b| a.position().total_cmp(&b.position()));
        Ok(lists)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, list = %req.list_id))]
    pub async fn update(&self, req: UpdateList) -> Result<List> {
        let scoped = Resolver::new(&self.ports)
            .list_scope(req.actor_id, req.list_id, Intent::Mutate)
            .await?;
        scoped.scope.access().ensure_edit()?;

        let mut list = scoped.list;
        let mut changes = ChangeSet::new();
        if let Some(title) = req.title {
            let before = list.title().to_string();
            list.rename(&title)?;
            changes.track("title", "title", before.as_str(), list.title());
        }
        if let Some(color) = req.color {
            let before = list.color().map(str::to_string);
            list.recolor(color);
            let after = list.color().map(str::to_string);
            changes.track("color", "color", &before, &after);
        }

        if changes.is_empty() {
            tracing::debug!("list update changed nothing");
            return Ok(list);
        }

        list.touch(self.ports.clock.now());
        self.ports.lists.save(&list).await?;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Update,
                    EntityType::List,
                    list.id(),
                    list.title(),
                    scoped.scope.actor.id(),
                    list.board_id(),
                )
                .with_changes(&changes),
            )
            .await?;

        Ok(list)
    }

    /// Records the activity first; the list is only deleted once that succeeded.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, list = %req.list_id))]
    pub async fn delete(&self, req: ListRef) -> Result<()> {
        let scoped = Resolver::new(&self.ports)
            .list_scope(req.actor_id, req.list_id, Intent::Mutate)
            .await?;
        scoped.scope.access().ensure_edit()?;

        let list = scoped.list;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Delete,
                    EntityType::List,
                    list.id(),
                    list.title(),
                    scoped.scope.actor.id(),
                    list.board_id(),
                )
                .with_data(json!({ "title": list.title(), "position": list.position() }))
                .with_description(format!("deleted list {}", list.title())),
            )
            .await?;

        self.ports.lists.delete(list.id()).await?;
        Ok(())
    }

    /// Validates the whole batch, then hands it to the repository as one unit.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id, count = req.positions.len()))]
    pub async fn reorder(&self, req: ReorderLists) -> Result<Vec<List>> {
        let scope = Resolver::new(&self.ports)
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_edit()?;

        let board = &scope.board;
        let current = self.ports.lists.find_by_board(board.id()).await?;
        let children: HashSet<ListId> = current.iter().map(List::id).collect();
        ordering::validate_reorder(
            &req.positions,
            &children,
            "List",
            format!("board {}", board.id()),
        )?;
        ordering::ensure_batch_fits(
            &req.positions,
            current.iter().map(|l| (l.id(), l.position())),
            format!("board {}", board.id()),
        )?;

        if req.positions.is_empty() {
            return Ok(current);
        }

        self.ports
            .lists
            .reorder(board.id(), req.positions.clone())
            .await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::Reorder,
                    EntityType::Board,
                    board.id(),
                    board.title(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_data(json!({ "positions": req.positions }))
                .with_description(format!("reordered {} lists", req.positions.len())),
            )
            .await?;

        let mut lists = self.ports.lists.find_by_board(board.id()).await?;
        lists.sort_by(|a, b| a.position().total_cmp(&b.position()));
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{board, list, ports, user, MockSet};
    use domains::{DomainError, PortError, Role};

    fn service(mocks: MockSet) -> ListService {
        let ports = ports(mocks);
        let audit = AuditRecorder::new(
            ports.activities.clone(),
            ports.ids.clone(),
            ports.clock.clone(),
        );
        ListService::new(ports, audit, PositionAllocator::default())
    }

    fn member_on_board(mocks: &mut MockSet, role: Option<Role>) {
        mocks.users.expect_find_by_id().returning(|_| Ok(Some(user(2))));
        mocks.boards.expect_find_by_id().returning(|_| Ok(Some(board(1, 1))));
        mocks
            .boards
            .expect_get_member_role()
            .returning(move |_, _| Ok(role));
    }

    #[tokio::test]
    async fn update_with_same_title_saves_nothing_and_logs_nothing() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Member));
        mocks.lists.expect_find_by_id().returning(|_| Ok(Some(list(3, 1))));
        mocks.lists.expect_save().times(0);
        mocks.activities.expect_save().times(0);

        let list = service(mocks)
            .update(UpdateList {
                actor_id: user(2).id(),
                list_id: list(3, 1).id(),
                title: Some("List 3".into()),
                color: None,
            })
            .await
            .unwrap();
        assert_eq!(list.title(), "List 3");
    }

    #[tokio::test]
    async fn append_goes_after_the_last_sibling() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Admin));
        mocks
            .lists
            .expect_find_by_board()
            .returning(|_| Ok(vec![list(1, 1), list(4, 1)]));
        mocks.lists.expect_save().times(1).returning(|_| Ok(()));
        mocks.activities.expect_save().times(1).returning(|_| Ok(()));

        let list = service(mocks)
            .create(CreateList {
                actor_id: user(2).id(),
                board_id: board(1, 1).id(),
                title: "Done".into(),
                color: None,
                position: None,
            })
            .await
            .unwrap();
        assert_eq!(list.position(), 5000.0);
    }

    #[tokio::test]
    async fn duplicate_positions_reject_the_whole_batch() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Member));
        mocks
            .lists
            .expect_find_by_board()
            .returning(|_| Ok(vec![list(1, 1), list(2, 1)]));
        mocks.lists.expect_reorder().never();
        mocks.activities.expect_save().never();

        let err = service(mocks)
            .reorder(ReorderLists {
                actor_id: user(2).id(),
                board_id: board(1, 1).id(),
                positions: vec![
                    PositionUpdate::new(list(1, 1).id(), 1000.0),
                    PositionUpdate::new(list(2, 1).id(), 1000.0),
                ],
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate positions are not allowed");
    }

    #[tokio::test]
    async fn viewers_cannot_create_lists() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Viewer));
        mocks.lists.expect_find_by_board().never();
        mocks.lists.expect_save().never();

        let err = service(mocks)
            .create(CreateList {
                actor_id: user(2).id(),
                board_id: board(1, 1).id(),
                title: "Nope".into(),
                color: None,
                position: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn create_saves_the_list_before_recording() {
        let mut mocks = MockSet::default();
        let mut seq = mockall::Sequence::new();
        member_on_board(&mut mocks, Some(Role::Member));
        mocks.lists.expect_find_by_board().returning(|_| Ok(vec![]));
        mocks
            .lists
            .expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .activities
            .expect_save()
            .withf(|a| {
                a.action() == ActivityAction::Create && a.entity_type() == EntityType::List
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let list = service(mocks)
            .create(CreateList {
                actor_id: user(2).id(),
                board_id: board(1, 1).id(),
                title: "Todo".into(),
                color: None,
                position: None,
            })
            .await
            .unwrap();
        assert_eq!(list.position(), 1000.0);
    }

    #[tokio::test]
    async fn rename_stays_saved_when_the_audit_write_fails() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Member));
        mocks.lists.expect_find_by_id().returning(|_| Ok(Some(list(3, 1))));
        mocks
            .lists
            .expect_save()
            .withf(|l| l.title() == "Backlog")
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .activities
            .expect_save()
            .times(1)
            .returning(|_| Err(PortError::new("log unavailable")));

        let err = service(mocks)
            .update(UpdateList {
                actor_id: user(2).id(),
                list_id: list(3, 1).id(),
                title: Some("Backlog".into()),
                color: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DependencyFailure(_)));
    }

    #[tokio::test]
    async fn delete_is_not_issued_when_the_audit_write_fails() {
        let mut mocks = MockSet::default();
        member_on_board(&mut mocks, Some(Role::Admin));
        mocks.lists.expect_find_by_id().returning(|_| Ok(Some(list(3, 1))));
        mocks
            .activities
            .expect_save()
            .times(1)
            .returning(|_| Err(PortError::new("log unavailable")));
        mocks.lists.expect_delete().never();

        let err = service(mocks)
            .delete(ListRef {
                actor_id: user(2).id(),
                list_id: list(3, 1).id(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DependencyFailure(_)));
    }
}

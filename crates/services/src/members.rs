//! Board membership management.
//!
//! OWNER is never granted here; it comes from board creation only.

use domains::audit::ChangeSet;
use domains::{
    ActivityAction, BoardId, BoardMember, DomainError, EntityType, NewActivity, Resource, Result,
    Role, UserId,
};
use serde_json::json;

use crate::audit::AuditRecorder;
use crate::context::Ports;
use crate::resolve::{Intent, Resolver};

#[derive(Debug, Clone, Copy)]
pub struct AddBoardMember {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateMemberRole {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, Copy)]
pub struct RemoveBoardMember {
    pub actor_id: UserId,
    pub board_id: BoardId,
    pub user_id: UserId,
}

#[derive(Clone)]
pub struct MemberService {
    ports: Ports,
    audit: AuditRecorder,
}

impl MemberService {
    pub fn new(ports: Ports, audit: AuditRecorder) -> Self {
        Self { ports, audit }
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id, user = %req.user_id))]
    pub async fn add(&self, req: AddBoardMember) -> Result<BoardMember> {
        let resolver = Resolver::new(&self.ports);
        let scope = resolver
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_manage_members("add")?;

        let board = &scope.board;
        if board.is_archived() {
            return Err(DomainError::validation(
                "Cannot add members to an archived board",
            ));
        }
        if !req.role.is_assignable() {
            return Err(DomainError::validation("Cannot assign the OWNER role"));
        }

        let user = resolver.user(req.user_id).await?;
        if board.is_owner(user.id())
            || self.ports.boards.is_member(board.id(), user.id()).await?
        {
            return Err(DomainError::validation(
                "User is already a member of this board",
            ));
        }

        let member = BoardMember::create(board.id(), user.id(), req.role, self.ports.clock.now())?;
        self.ports.boards.add_member(&member).await?;

        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::AddMember,
                    EntityType::Member,
                    user.id(),
                    user.username(),
                    scope.actor.id(),
                    board.id(),
                )
                .with_data(json!({ "role": member.role() }))
                .with_description(format!("added {} as {}", user.username(), member.role())),
            )
            .await?;

        Ok(member)
    }

    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id, user = %req.user_id))]
    pub async fn update_role(&self, req: UpdateMemberRole) -> Result<BoardMember> {
        let resolver = Resolver::new(&self.ports);
        let scope = resolver
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        scope.access().ensure_manage_members("update")?;

        let user = resolver.user(req.user_id).await?;
        let mut member = self
            .ports
            .boards
            .find_member(scope.board.id(), user.id())
            .await?
            .ok_or(DomainError::NotFound(Resource::Member))?;
        if scope.board.is_owner(user.id()) {
            return Err(DomainError::validation("Cannot change the owner's role"));
        }

        let before = member.role();
        member.change_role(req.role)?;
        let mut changes = ChangeSet::new();
        changes.track("role", "role", &before, &member.role());
        if changes.is_empty() {
            return Ok(member);
        }

        self.ports.boards.save_member(&member).await?;
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::UpdateMember,
                    EntityType::Member,
                    user.id(),
                    user.username(),
                    scope.actor.id(),
                    scope.board.id(),
                )
                .with_changes(&changes),
            )
            .await?;

        Ok(member)
    }

    /// Managers may remove anyone but the owner; any member may leave.
    #[tracing::instrument(skip_all, fields(actor = %req.actor_id, board = %req.board_id, user = %req.user_id))]
    pub async fn remove(&self, req: RemoveBoardMember) -> Result<()> {
        let resolver = Resolver::new(&self.ports);
        let scope = resolver
            .board_scope(req.actor_id, req.board_id, Intent::Mutate)
            .await?;
        let leaving = req.actor_id == req.user_id;
        if !leaving {
            scope.access().ensure_manage_members("remove")?;
        }

        let user = if leaving {
            scope.actor.clone()
        } else {
            resolver.user(req.user_id).await?
        };
        if scope.board.is_owner(user.id()) {
            return Err(DomainError::validation("Cannot remove the board owner"));
        }
        let member = self
            .ports
            .boards
            .find_member(scope.board.id(), user.id())
            .await?
            .ok_or(DomainError::NotFound(Resource::Member))?;

        let description = if leaving {
            format!("{} left the board", user.username())
        } else {
            format!("removed {}", user.username())
        };
        self.audit
            .record(
                NewActivity::new(
                    ActivityAction::RemoveMember,
                    EntityType::Member,
                    user.id(),
                    user.username(),
                    scope.actor.id(),
                    scope.board.id(),
                )
                .with_data(json!({ "role": member.role() }))
                .with_description(description),
            )
            .await?;

        self.ports
            .boards
            .remove_member(scope.board.id(), user.id())
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, actor_id: UserId, board_id: BoardId) -> Result<Vec<BoardMember>> {
        let scope = Resolver::new(&self.ports)
            .board_scope(actor_id, board_id, Intent::Read)
            .await?;
        scope.access().ensure_view()?;

        let mut members = self.ports.boards.find_members(board_id).await?;
        members.sort_by(|a, b| {
            b.role()
                .rank()
                .cmp(&a.role().rank())
                .then(a.joined_at().cmp(&b.joined_at()))
        });
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{board, ports, user, user_by_id, MockSet};

    fn service(mocks: MockSet) -> MemberService {
        let ports = ports(mocks);
        let audit = AuditRecorder::new(
            ports.activities.clone(),
            ports.ids.clone(),
            ports.clock.clone(),
        );
        MemberService::new(ports, audit)
    }

    fn as_role(mocks: &mut MockSet, role: Role) {
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user_by_id(id))));
        mocks.boards.expect_find_by_id().returning(|_| Ok(Some(board(1, 1))));
        mocks
            .boards
            .expect_get_member_role()
            .returning(move |_, _| Ok(Some(role)));
    }

    fn add(role: Role) -> AddBoardMember {
        AddBoardMember {
            actor_id: user(2).id(),
            board_id: board(1, 1).id(),
            user_id: user(3).id(),
            role,
        }
    }

    #[tokio::test]
    async fn members_cannot_add_members() {
        let mut mocks = MockSet::default();
        as_role(&mut mocks, Role::Member);
        mocks.boards.expect_add_member().never();

        let err = service(mocks).add(add(Role::Viewer)).await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient permissions to add members");
    }

    #[tokio::test]
    async fn granting_owner_is_a_validation_error() {
        let mut mocks = MockSet::default();
        as_role(&mut mocks, Role::Admin);
        mocks.boards.expect_add_member().never();

        let err = service(mocks).add(add(Role::Owner)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn admin_adds_member_with_requested_role() {
        let mut mocks = MockSet::default();
        as_role(&mut mocks, Role::Admin);
        mocks.boards.expect_is_member().returning(|_, _| Ok(false));
        mocks.boards.expect_add_member().times(1).returning(|_| Ok(()));
        mocks.activities.expect_save().times(1).returning(|_| Ok(()));

        let member = service(mocks).add(add(Role::Viewer)).await.unwrap();
        assert_eq!(member.role(), Role::Viewer);
        assert_eq!(member.user_id(), user(3).id());
    }

    #[tokio::test]
    async fn owner_cannot_be_removed() {
        let mut mocks = MockSet::default();
        as_role(&mut mocks, Role::Admin);
        mocks.boards.expect_remove_member().never();
        mocks.activities.expect_save().never();

        let err = service(mocks)
            .remove(RemoveBoardMember {
                actor_id: user(2).id(),
                board_id: board(1, 1).id(),
                user_id: user(1).id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot remove the board owner");
    }
}

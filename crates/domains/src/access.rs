//! # Authorization
//!
//! Pure checks deciding whether an actor may view, edit or delete
//! board-scoped resources. The actor's role is `None` when they are not a
//! member; the board owner always counts as OWNER even without a
//! membership row.
//!
//! | Operation                         | Allowed                              |
//! |-----------------------------------|--------------------------------------|
//! | view                              | public board, owner, any role        |
//! | edit lists/cards/labels           | OWNER, ADMIN, MEMBER                 |
//! | delete list/card/label            | OWNER, ADMIN, MEMBER (+ card creator)|
//! | add/update/remove members, archive| OWNER, ADMIN                         |
//! | delete board                      | the owner only                       |

use crate::errors::{DomainError, Result};
use crate::models::{Board, Card, Role, UserId};

/// Lowest role allowed to mutate board content.
pub const EDIT_THRESHOLD: Role = Role::Member;
/// Lowest role allowed to manage members and archive the board.
pub const MANAGE_THRESHOLD: Role = Role::Admin;

impl Board {
    pub fn is_owner(&self, actor: UserId) -> bool {
        self.owner_id() == actor
    }

    /// The role that actually applies to `actor`, folding in ownership.
    pub fn effective_role(&self, actor: UserId, role: Option<Role>) -> Option<Role> {
        if self.is_owner(actor) {
            Some(Role::Owner)
        } else {
            role
        }
    }

    pub fn can_view(&self, actor: UserId, role: Option<Role>) -> bool {
        self.is_public() || self.effective_role(actor, role).is_some()
    }

    pub fn can_edit(&self, actor: UserId, role: Option<Role>) -> bool {
        self.effective_role(actor, role)
            .is_some_and(|r| r.at_least(EDIT_THRESHOLD))
    }

    pub fn can_manage(&self, actor: UserId, role: Option<Role>) -> bool {
        self.effective_role(actor, role)
            .is_some_and(|r| r.at_least(MANAGE_THRESHOLD))
    }

    /// ADMIN is not enough; only the exact owner may delete a board.
    pub fn can_delete(&self, actor: UserId) -> bool {
        self.is_owner(actor)
    }
}

/// An actor's resolved standing on one board.
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    board: &'a Board,
    actor: UserId,
    role: Option<Role>,
}

impl<'a> Access<'a> {
    pub fn new(board: &'a Board, actor: UserId, role: Option<Role>) -> Self {
        Self { board, actor, role }
    }

    pub fn actor(&self) -> UserId {
        self.actor
    }

    pub fn role(&self) -> Option<Role> {
        self.board.effective_role(self.actor, self.role)
    }

    pub fn ensure_view(&self) -> Result<()> {
        if self.board.can_view(self.actor, self.role) {
            Ok(())
        } else {
            Err(DomainError::access_denied("Access denied"))
        }
    }

    pub fn ensure_edit(&self) -> Result<()> {
        if self.board.can_edit(self.actor, self.role) {
            Ok(())
        } else {
            Err(DomainError::access_denied("Insufficient permissions"))
        }
    }

    /// Deleting a card: edit rights, or being the card's creator.
    pub fn ensure_delete_card(&self, card: &Card) -> Result<()> {
        if card.creator_id() == self.actor {
            return Ok(());
        }
        self.ensure_edit()
    }

    /// `verb` completes "Insufficient permissions to {verb} members".
    pub fn ensure_manage_members(&self, verb: &str) -> Result<()> {
        if self.board.can_manage(self.actor, self.role) {
            Ok(())
        } else {
            Err(DomainError::access_denied(format!(
                "Insufficient permissions to {verb} members"
            )))
        }
    }

    pub fn ensure_archive_board(&self) -> Result<()> {
        if self.board.can_manage(self.actor, self.role) {
            Ok(())
        } else {
            Err(DomainError::access_denied(
                "Insufficient permissions to archive this board",
            ))
        }
    }

    pub fn ensure_delete_board(&self) -> Result<()> {
        if self.board.can_delete(self.actor) {
            Ok(())
        } else {
            Err(DomainError::access_denied(
                "Only the board owner can delete this board",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoardId, CardId, ListId, NewBoard, NewCard};
    use chrono::Utc;
    use uuid::Uuid;

    const ROLES: [Option<Role>; 5] = [
        None,
        Some(Role::Viewer),
        Some(Role::Member),
        Some(Role::Admin),
        Some(Role::Owner),
    ];

    fn user(n: u128) -> UserId {
        UserId::from(Uuid::from_u128(n))
    }

    fn board(is_public: bool) -> Board {
        Board::create(
            BoardId::from(Uuid::from_u128(100)),
            NewBoard {
                title: "Board".into(),
                description: None,
                is_public,
                owner_id: user(1),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn view_matrix() {
        for is_public in [true, false] {
            let board = board(is_public);
            for role in ROLES {
                let expected = is_public || role.is_some();
                assert_eq!(board.can_view(user(2), role), expected, "{is_public} {role:?}");
            }
            assert!(board.can_view(user(1), None));
        }
    }

    #[test]
    fn edit_matrix() {
        let board = board(true);
        for role in ROLES {
            let expected = matches!(role, Some(Role::Owner | Role::Admin | Role::Member));
            assert_eq!(board.can_edit(user(2), role), expected, "{role:?}");
        }
        assert!(board.can_edit(user(1), None));
    }

    #[test]
    fn only_the_exact_owner_deletes_the_board() {
        let board = board(false);
        let admin = Access::new(&board, user(2), Some(Role::Admin));
        assert!(matches!(
            admin.ensure_delete_board(),
            Err(DomainError::AccessDenied(_))
        ));
        assert!(Access::new(&board, user(1), None).ensure_delete_board().is_ok());
    }

    #[test]
    fn card_creator_may_delete_without_a_role() {
        let board = board(true);
        let card = Card::create(
            CardId::from(Uuid::from_u128(5)),
            NewCard {
                title: "Mine".into(),
                description: None,
                position: 1.0,
                due_date: None,
                start_date: None,
                list_id: ListId::from(Uuid::from_u128(6)),
                creator_id: user(3),
                assignee_id: None,
            },
            Utc::now(),
        )
        .unwrap();

        assert!(Access::new(&board, user(3), None).ensure_delete_card(&card).is_ok());
        assert!(Access::new(&board, user(4), Some(Role::Viewer))
            .ensure_delete_card(&card)
            .is_err());
    }

    #[test]
    fn member_management_needs_admin() {
        let board = board(false);
        let err = Access::new(&board, user(2), Some(Role::Member))
            .ensure_manage_members("add")
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient permissions to add members");
        assert!(Access::new(&board, user(2), Some(Role::Admin))
            .ensure_manage_members("add")
            .is_ok());
    }
}

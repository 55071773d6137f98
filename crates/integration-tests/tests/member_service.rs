use domains::{ActivityAction, DomainError, ErrorKind, Resource, Role, UserId};
use integration_tests::TestWorld;
use services::{AddBoardMember, BoardRef, RemoveBoardMember, UpdateMemberRole};

#[tokio::test]
async fn member_role_cannot_add_members() {
    let world = TestWorld::new();
    let team = world.team().await;
    let newcomer = world.user("newcomer").await;

    let err = world
        .app
        .members
        .add(AddBoardMember {
            actor_id: team.member,
            board_id: team.board.id(),
            user_id: newcomer,
            role: Role::Viewer,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::AccessDenied("Insufficient permissions to add members".into())
    );
}

#[tokio::test]
async fn admin_and_owner_can_add_members() {
    let world = TestWorld::new();
    let team = world.team().await;

    for (actor, role) in [(team.admin, Role::Member), (team.owner, Role::Admin)] {
        let newcomer = world.user(&format!("new-{role}")).await;
        let member = world
            .app
            .members
            .add(AddBoardMember {
                actor_id: actor,
                board_id: team.board.id(),
                user_id: newcomer,
                role,
            })
            .await
            .unwrap();
        assert_eq!(member.user_id(), newcomer);
        assert_eq!(member.role(), role);
    }

    let latest = &world.activities(team.board.id()).await[0];
    assert_eq!(latest.action(), ActivityAction::AddMember);
}

#[tokio::test]
async fn add_guards() {
    let world = TestWorld::new();
    let team = world.team().await;
    let newcomer = world.user("newcomer").await;
    let add = |user_id: UserId, role: Role| AddBoardMember {
        actor_id: team.owner,
        board_id: team.board.id(),
        user_id,
        role,
    };

    let err = world.app.members.add(add(newcomer, Role::Owner)).await.unwrap_err();
    assert_eq!(err, DomainError::Validation("Cannot assign the OWNER role".into()));

    let err = world.app.members.add(add(team.viewer, Role::Member)).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Validation("User is already a member of this board".into())
    );

    let ghost = UserId::from(uuid::Uuid::from_u128(0xBEEF));
    let err = world.app.members.add(add(ghost, Role::Member)).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound(Resource::User));

    world
        .app
        .boards
        .archive(BoardRef {
            actor_id: team.owner,
            board_id: team.board.id(),
        })
        .await
        .unwrap();
    let err = world.app.members.add(add(newcomer, Role::Member)).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Validation("Cannot add members to an archived board".into())
    );
}

#[tokio::test]
async fn role_changes() {
    let world = TestWorld::new();
    let team = world.team().await;

    let promoted = world
        .app
        .members
        .update_role(UpdateMemberRole {
            actor_id: team.admin,
            board_id: team.board.id(),
            user_id: team.viewer,
            role: Role::Member,
        })
        .await
        .unwrap();
    assert_eq!(promoted.role(), Role::Member);

    let err = world
        .app
        .members
        .update_role(UpdateMemberRole {
            actor_id: team.admin,
            board_id: team.board.id(),
            user_id: team.owner,
            role: Role::Viewer,
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Validation("Cannot change the owner's role".into()));

    let err = world
        .app
        .members
        .update_role(UpdateMemberRole {
            actor_id: team.admin,
            board_id: team.board.id(),
            user_id: team.outsider,
            role: Role::Viewer,
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound(Resource::Member));
}

#[tokio::test]
async fn removal_rules() {
    let world = TestWorld::new();
    let team = world.team().await;
    let remove = |actor_id: UserId, user_id: UserId| RemoveBoardMember {
        actor_id,
        board_id: team.board.id(),
        user_id,
    };

    let err = world
        .app
        .members
        .remove(remove(team.member, team.viewer))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = world
        .app
        .members
        .remove(remove(team.admin, team.owner))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Validation("Cannot remove the board owner".into()));

    // Leaving needs no management rights.
    world
        .app
        .members
        .remove(remove(team.viewer, team.viewer))
        .await
        .unwrap();
    let latest = &world.activities(team.board.id()).await[0];
    assert_eq!(latest.description(), Some("viewer left the board"));

    world
        .app
        .members
        .remove(remove(team.admin, team.member))
        .await
        .unwrap();
    let err = world
        .app
        .lists
        .list_for_board(team.member, team.board.id())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

#[tokio::test]
async fn members_are_listed_by_rank() {
    let world = TestWorld::new();
    let team = world.team().await;

    let roles: Vec<Role> = world
        .app
        .members
        .list(team.viewer, team.board.id())
        .await
        .unwrap()
        .iter()
        .map(|m| m.role())
        .collect();

    assert_eq!(roles, vec![Role::Owner, Role::Admin, Role::Member, Role::Viewer]);
}

#[tokio::test]
async fn activity_feed_limit_is_clamped() {
    let world = TestWorld::new();
    let team = world.team().await;

    let feed = world
        .app
        .activity
        .for_board(team.viewer, team.board.id(), Some(2))
        .await
        .unwrap();
    assert_eq!(feed.len(), 2);

    let err = world
        .app
        .activity
        .for_board(team.outsider, team.board.id(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

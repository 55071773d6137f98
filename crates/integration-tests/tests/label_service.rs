use domains::{ActivityAction, BoardId, DomainError, ErrorKind, Label, LabelId, UserId};
use integration_tests::TestWorld;
use services::{CardLabel, CreateLabel, LabelRef, UpdateLabel};

async fn bug_label(world: &TestWorld, actor: UserId, board: BoardId) -> Label {
    world
        .app
        .labels
        .create(CreateLabel {
            actor_id: actor,
            board_id: board,
            name: "Bug".into(),
            color: "#ff0000".into(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn admin_creates_and_viewer_cannot_delete() {
    let world = TestWorld::new();
    let team = world.team().await;

    let label = bug_label(&world, team.admin, team.board.id()).await;
    assert_eq!(label.color(), "#FF0000");

    let err = world
        .app
        .labels
        .delete(LabelRef {
            actor_id: team.viewer,
            label_id: label.id(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let labels = world
        .app
        .labels
        .list_for_board(team.viewer, team.board.id())
        .await
        .unwrap();
    assert_eq!(labels, vec![label]);
}

#[tokio::test]
async fn malformed_color_is_rejected() {
    let world = TestWorld::new();
    let team = world.team().await;

    let err = world
        .app
        .labels
        .create(CreateLabel {
            actor_id: team.owner,
            board_id: team.board.id(),
            name: "Bug".into(),
            color: "red".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[tokio::test]
async fn update_normalizes_and_skips_noops() {
    let world = TestWorld::new();
    let team = world.team().await;
    let label = bug_label(&world, team.owner, team.board.id()).await;
    let before = world.activities(team.board.id()).await.len();

    world
        .app
        .labels
        .update(UpdateLabel {
            actor_id: team.member,
            label_id: label.id(),
            name: Some("Bug".into()),
            color: Some("#FF0000".into()),
        })
        .await
        .unwrap();
    assert_eq!(world.activities(team.board.id()).await.len(), before);

    let renamed = world
        .app
        .labels
        .update(UpdateLabel {
            actor_id: team.member,
            label_id: label.id(),
            name: Some("Defect".into()),
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(renamed.name(), "Defect");
    assert_eq!(world.activities(team.board.id()).await.len(), before + 1);
}

#[tokio::test]
async fn attach_and_detach_on_a_card() {
    let world = TestWorld::new();
    let team = world.team().await;
    let list = world.list(team.owner, team.board.id(), "Todo").await;
    let card = world.card(team.owner, list.id(), "Crash on save").await;
    let label = bug_label(&world, team.owner, team.board.id()).await;
    let link = CardLabel {
        actor_id: team.member,
        card_id: card.id(),
        label_id: label.id(),
    };

    let attached = world.app.labels.attach(link).await.unwrap();
    let ids: Vec<LabelId> = attached.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec![label.id()]);

    let err = world.app.labels.attach(link).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::AlreadyInState("Label is already attached to this card".into())
    );

    let remaining = world.app.labels.detach(link).await.unwrap();
    assert!(remaining.is_empty());
    let err = world.app.labels.detach(link).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyInState);

    let feed = world
        .app
        .activity
        .for_card(team.owner, card.id(), Some(2))
        .await
        .unwrap();
    let actions: Vec<ActivityAction> = feed.iter().map(|a| a.action()).collect();
    assert_eq!(actions, vec![ActivityAction::DetachLabel, ActivityAction::AttachLabel]);
}

#[tokio::test]
async fn labels_from_another_board_cannot_be_attached() {
    let world = TestWorld::new();
    let team = world.team().await;
    let list = world.list(team.owner, team.board.id(), "Todo").await;
    let card = world.card(team.owner, list.id(), "Task").await;
    let other = world.board(team.owner, "Other").await;
    let foreign = bug_label(&world, team.owner, other.id()).await;

    let err = world
        .app
        .labels
        .attach(CardLabel {
            actor_id: team.owner,
            card_id: card.id(),
            label_id: foreign.id(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::Validation("Label does not belong to this board".into())
    );
}

#[tokio::test]
async fn deleting_a_label_detaches_it_from_cards() {
    let world = TestWorld::new();
    let team = world.team().await;
    let list = world.list(team.owner, team.board.id(), "Todo").await;
    let card = world.card(team.owner, list.id(), "Task").await;
    let label = bug_label(&world, team.owner, team.board.id()).await;
    world
        .app
        .labels
        .attach(CardLabel {
            actor_id: team.owner,
            card_id: card.id(),
            label_id: label.id(),
        })
        .await
        .unwrap();

    world
        .app
        .labels
        .delete(LabelRef {
            actor_id: team.admin,
            label_id: label.id(),
        })
        .await
        .unwrap();

    let on_card = world
        .app
        .labels
        .list_for_card(team.viewer, card.id())
        .await
        .unwrap();
    assert!(on_card.is_empty());
}

//! Composition root: loads settings, installs logging, wires the in-memory
//! adapters into the services and walks one board through a short demo.

use std::sync::Arc;

use anyhow::Context;
use configs::{LogFormat, Settings};
use domains::ordering::PositionUpdate;
use domains::ports::{Clock, IdGenerator, UserRepository};
use domains::{Role, User, UserId};
use services::{
    AddBoardMember, CardLabel, CreateBoard, CreateCard, CreateLabel, CreateList, MoveCard, Ports,
    ReorderLists, ServiceOptions, TaskBoard, UpdateCard,
};
use storage_adapters::{MemoryStore, SystemClock, UuidV4Generator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings);

    info!("Starting taskboard v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(MemoryStore::new());
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidV4Generator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ports = Ports {
        users: store.clone(),
        boards: store.clone(),
        lists: store.clone(),
        cards: store.clone(),
        labels: store.clone(),
        activities: store.clone(),
        ids: ids.clone(),
        clock: clock.clone(),
    };
    let app = TaskBoard::new(ports, service_options(&settings))?;

    let ada = seed_user(store.as_ref(), ids.as_ref(), clock.as_ref(), "ada").await?;
    let grace = seed_user(store.as_ref(), ids.as_ref(), clock.as_ref(), "grace").await?;

    run_demo(&app, ada, grace).await?;

    info!(
        boards = store.board_count(),
        activities = store.activity_count(),
        "demo finished"
    );
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));

    match settings.log.format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

fn service_options(settings: &Settings) -> ServiceOptions {
    ServiceOptions {
        position_step: settings.ordering.position_step,
        activity_default_limit: settings.activity.default_limit,
        activity_max_limit: settings.activity.max_limit,
    }
}

async fn seed_user(
    users: &dyn UserRepository,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
    name: &str,
) -> anyhow::Result<UserId> {
    let user = User::create(
        UserId::from(ids.next_id()),
        &format!("{name}@example.com"),
        name,
        clock.now(),
    )?;
    users.save(&user).await?;
    Ok(user.id())
}

async fn run_demo(app: &TaskBoard, owner: UserId, teammate: UserId) -> anyhow::Result<()> {
    let board = app
        .boards
        .create(CreateBoard {
            actor_id: owner,
            title: "Launch plan".into(),
            description: Some("Everything left before the release".into()),
            is_public: false,
        })
        .await?;

    let mut lists = Vec::new();
    for title in ["Todo", "Doing", "Done"] {
        let list = app
            .lists
            .create(CreateList {
                actor_id: owner,
                board_id: board.id(),
                title: title.into(),
                color: None,
                position: None,
            })
            .await?;
        lists.push(list);
    }
    let [todo, doing, done] = [lists[0].id(), lists[1].id(), lists[2].id()];

    app.members
        .add(AddBoardMember {
            actor_id: owner,
            board_id: board.id(),
            user_id: teammate,
            role: Role::Member,
        })
        .await?;

    let card = app
        .cards
        .create(CreateCard {
            actor_id: teammate,
            list_id: todo,
            title: "Write release notes".into(),
            description: None,
            position: None,
            due_date: None,
            start_date: None,
            assignee_id: Some(teammate),
        })
        .await?;

    let urgent = app
        .labels
        .create(CreateLabel {
            actor_id: owner,
            board_id: board.id(),
            name: "urgent".into(),
            color: "#e5484d".into(),
        })
        .await?;
    app.labels
        .attach(CardLabel {
            actor_id: teammate,
            card_id: card.id(),
            label_id: urgent.id(),
        })
        .await?;

    let mut patch = UpdateCard::new(teammate, card.id());
    patch.description = Some(Some("Cover the new ordering rules".into()));
    app.cards.update(patch).await?;

    app.cards
        .move_card(MoveCard {
            actor_id: teammate,
            card_id: card.id(),
            list_id: doing,
            position: None,
        })
        .await?;

    app.lists
        .reorder(ReorderLists {
            actor_id: owner,
            board_id: board.id(),
            positions: vec![
                PositionUpdate { id: done, position: 500.0 },
                PositionUpdate { id: todo, position: 1500.0 },
            ],
        })
        .await?;

    let feed = app.activity.for_board(owner, board.id(), None).await?;
    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}

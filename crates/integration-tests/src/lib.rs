//! Shared fixtures for the scenario tests: the real services wired to the
//! in-memory store, with sequential ids and a frozen clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use domains::ports::{ActivityRepository, Clock, IdGenerator, UserRepository};
use domains::{Activity, Board, BoardId, Card, List, ListId, Role, User, UserId};
use services::{
    AddBoardMember, CreateBoard, CreateCard, CreateList, Ports, ServiceOptions, TaskBoard,
};
use storage_adapters::MemoryStore;
use uuid::Uuid;

/// Ids count up from 1 so failures print readable values.
#[derive(Default)]
pub struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.0.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
}

/// A board with one actor per role plus somebody who has no role at all.
pub struct Team {
    pub board: Board,
    pub owner: UserId,
    pub admin: UserId,
    pub member: UserId,
    pub viewer: UserId,
    pub outsider: UserId,
}

pub struct TestWorld {
    pub store: Arc<MemoryStore>,
    pub app: TaskBoard,
    ids: Arc<SequentialIds>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_options(ServiceOptions::default())
    }

    pub fn with_options(options: ServiceOptions) -> Self {
        let store = Arc::new(MemoryStore::new());
        let ids = Arc::new(SequentialIds::default());
        let ports = Ports {
            users: store.clone(),
            boards: store.clone(),
            lists: store.clone(),
            cards: store.clone(),
            labels: store.clone(),
            activities: store.clone(),
            ids: ids.clone(),
            clock: Arc::new(FrozenClock(epoch())),
        };
        let app = TaskBoard::new(ports, options).unwrap();
        Self { store, app, ids }
    }

    pub async fn user(&self, name: &str) -> UserId {
        let user = User::create(
            UserId::from(self.ids.next_id()),
            &format!("{name}@example.com"),
            name,
            epoch(),
        )
        .unwrap();
        UserRepository::save(self.store.as_ref(), &user).await.unwrap();
        user.id()
    }

    pub async fn deactivate(&self, id: UserId) {
        let users: &dyn UserRepository = self.store.as_ref();
        let mut user = users.find_by_id(id).await.unwrap().unwrap();
        user.deactivate();
        users.save(&user).await.unwrap();
    }

    pub async fn board(&self, owner: UserId, title: &str) -> Board {
        self.app
            .boards
            .create(CreateBoard {
                actor_id: owner,
                title: title.into(),
                description: None,
                is_public: false,
            })
            .await
            .unwrap()
    }

    pub async fn team(&self) -> Team {
        let owner = self.user("owner").await;
        let admin = self.user("admin").await;
        let member = self.user("member").await;
        let viewer = self.user("viewer").await;
        let outsider = self.user("outsider").await;
        let board = self.board(owner, "Team board").await;

        let roles = [
            (admin, Role::Admin),
            (member, Role::Member),
            (viewer, Role::Viewer),
        ];
        for (user_id, role) in roles {
            self.app
                .members
                .add(AddBoardMember {
                    actor_id: owner,
                    board_id: board.id(),
                    user_id,
                    role,
                })
                .await
                .unwrap();
        }

        Team {
            board,
            owner,
            admin,
            member,
            viewer,
            outsider,
        }
    }

    pub async fn list(&self, actor: UserId, board: BoardId, title: &str) -> List {
        self.app
            .lists
            .create(CreateList {
                actor_id: actor,
                board_id: board,
                title: title.into(),
                color: None,
                position: None,
            })
            .await
            .unwrap()
    }

    pub async fn card(&self, actor: UserId, list: ListId, title: &str) -> Card {
        self.app
            .cards
            .create(CreateCard {
                actor_id: actor,
                list_id: list,
                title: title.into(),
                description: None,
                position: None,
                due_date: None,
                start_date: None,
                assignee_id: None,
            })
            .await
            .unwrap()
    }

    /// Every activity recorded for `board`, newest first.
    pub async fn activities(&self, board: BoardId) -> Vec<Activity> {
        ActivityRepository::find_by_board(self.store.as_ref(), board, usize::MAX)
            .await
            .unwrap()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

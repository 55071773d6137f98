//! Mock wiring and entity fixtures for the unit tests in this crate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use domains::ports::{
    Clock, IdGenerator, MockActivityRepository, MockBoardRepository, MockCardRepository,
    MockLabelRepository, MockListRepository, MockUserRepository,
};
use domains::{
    Board, BoardId, Card, CardId, Label, LabelId, List, ListId, NewBoard, NewCard, NewLabel,
    NewList, User, UserId,
};
use uuid::Uuid;

use crate::context::{Ports, ServiceOptions};

#[derive(Default)]
pub struct MockSet {
    pub users: MockUserRepository,
    pub boards: MockBoardRepository,
    pub lists: MockListRepository,
    pub cards: MockCardRepository,
    pub labels: MockLabelRepository,
    pub activities: MockActivityRepository,
}

pub struct CountingIds(AtomicU64);

impl IdGenerator for CountingIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(0xA000 + u128::from(self.0.fetch_add(1, Ordering::SeqCst)))
    }
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
}

pub fn ports(mocks: MockSet) -> Ports {
    Ports {
        users: Arc::new(mocks.users),
        boards: Arc::new(mocks.boards),
        lists: Arc::new(mocks.lists),
        cards: Arc::new(mocks.cards),
        labels: Arc::new(mocks.labels),
        activities: Arc::new(mocks.activities),
        ids: Arc::new(CountingIds(AtomicU64::new(0))),
        clock: Arc::new(FixedClock),
    }
}

pub fn options() -> ServiceOptions {
    ServiceOptions::default()
}

pub fn user(n: u128) -> User {
    User::create(
        UserId::from(Uuid::from_u128(n)),
        &format!("user{n}@example.com"),
        &format!("user{n}"),
        now(),
    )
    .unwrap()
}

/// The fixture user whose id is `id`.
pub fn user_by_id(id: UserId) -> User {
    user(id.as_uuid().as_u128())
}

pub fn board(n: u128, owner: u128) -> Board {
    Board::create(
        BoardId::from(Uuid::from_u128(n)),
        NewBoard {
            title: format!("Board {n}"),
            description: None,
            is_public: false,
            owner_id: UserId::from(Uuid::from_u128(owner)),
        },
        now(),
    )
    .unwrap()
}

pub fn list(n: u128, board: u128) -> List {
    List::create(
        ListId::from(Uuid::from_u128(n)),
        NewList {
            title: format!("List {n}"),
            position: 1000.0 * n as f64,
            color: None,
            board_id: BoardId::from(Uuid::from_u128(board)),
        },
        now(),
    )
    .unwrap()
}

pub fn card(n: u128, list: u128, creator: u128) -> Card {
    Card::create(
        CardId::from(Uuid::from_u128(n)),
        NewCard {
            title: format!("Card {n}"),
            description: None,
            position: 1000.0 * n as f64,
            due_date: None,
            start_date: None,
            list_id: ListId::from(Uuid::from_u128(list)),
            creator_id: UserId::from(Uuid::from_u128(creator)),
            assignee_id: None,
        },
        now(),
    )
    .unwrap()
}

pub fn label(n: u128, board: u128) -> Label {
    Label::create(
        LabelId::from(Uuid::from_u128(n)),
        NewLabel {
            name: format!("Label {n}"),
            color: "#00AA00".into(),
            board_id: BoardId::from(Uuid::from_u128(board)),
        },
        now(),
    )
    .unwrap()
}

//! # In-memory persistence
//!
//! A process-local implementation of every repository port, backed by
//! `DashMap`s. Cascading deletes and all-or-nothing reorder batches are
//! handled here, the way a relational schema would handle them with
//! foreign keys and a transaction.
//!
//! Writes from concurrent requests are last-write-wins per entity.

mod activities;
mod boards;
mod cards;
mod labels;
mod lists;
mod users;

use std::collections::HashSet;
use std::sync::RwLock;

use dashmap::DashMap;
use domains::{
    Activity, Board, BoardId, BoardMember, Card, CardId, Label, LabelId, List, ListId, PortError,
    User, UserId,
};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    boards: DashMap<BoardId, Board>,
    members: DashMap<(BoardId, UserId), BoardMember>,
    lists: DashMap<ListId, List>,
    cards: DashMap<CardId, Card>,
    labels: DashMap<LabelId, Label>,
    card_labels: DashMap<CardId, HashSet<LabelId>>,
    activities: RwLock<Vec<Activity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn activity_count(&self) -> usize {
        self.activities.read().map(|log| log.len()).unwrap_or_default()
    }

    /// Removes a card and its label links.
    fn drop_card(&self, id: CardId) {
        self.cards.remove(&id);
        self.card_labels.remove(&id);
    }

    /// Removes a list and every card in it.
    fn drop_list(&self, id: ListId) {
        let card_ids: Vec<CardId> = self
            .cards
            .iter()
            .filter(|c| c.list_id() == id)
            .map(|c| c.id())
            .collect();
        for card_id in card_ids {
            self.drop_card(card_id);
        }
        self.lists.remove(&id);
    }
}

fn poisoned<T>(_: T) -> PortError {
    PortError::new("activity log lock poisoned")
}

use async_trait::async_trait;
use domains::ports::{ActivityRepository, PortResult};
use domains::{Activity, BoardId, CardId};

use super::{poisoned, MemoryStore};

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn save(&self, activity: &Activity) -> PortResult<()> {
        let mut log = self.activities.write().map_err(poisoned)?;
        log.push(activity.clone());
        Ok(())
    }

    async fn find_by_board(&self, board_id: BoardId, limit: usize) -> PortResult<Vec<Activity>> {
        let log = self.activities.read().map_err(poisoned)?;
        Ok(log
            .iter()
            .rev()
            .filter(|a| a.board_id() == board_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_card(&self, card_id: CardId, limit: usize) -> PortResult<Vec<Activity>> {
        let log = self.activities.read().map_err(poisoned)?;
        Ok(log
            .iter()
            .rev()
            .filter(|a| a.card_id() == Some(card_id))
            .take(limit)
            .cloned()
            .collect())
    }
}

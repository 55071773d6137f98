use async_trait::async_trait;
use domains::ordering::PositionUpdate;
use domains::ports::{ListRepository, PortResult};
use domains::{BoardId, List, ListId, PortError};

use super::MemoryStore;

#[async_trait]
impl ListRepository for MemoryStore {
    async fn find_by_id(&self, id: ListId) -> PortResult<Option<List>> {
        Ok(self.lists.get(&id).map(|l| l.clone()))
    }

    async fn find_by_board(&self, board_id: BoardId) -> PortResult<Vec<List>> {
        let mut lists: Vec<List> = self
            .lists
            .iter()
            .filter(|l| l.board_id() == board_id)
            .map(|l| l.clone())
            .collect();
        lists.sort_by(|a, b| a.position().total_cmp(&b.position()));
        Ok(lists)
    }

    async fn exists_in_board(&self, list_id: ListId, board_id: BoardId) -> PortResult<bool> {
        Ok(self
            .lists
            .get(&list_id)
            .is_some_and(|l| l.board_id() == board_id))
    }

    async fn save(&self, list: &List) -> PortResult<()> {
        self.lists.insert(list.id(), list.clone());
        Ok(())
    }

    async fn delete(&self, id: ListId) -> PortResult<()> {
        self.drop_list(id);
        Ok(())
    }

    async fn reorder(
        &self,
        board_id: BoardId,
        updates: Vec<PositionUpdate<ListId>>,
    ) -> PortResult<()> {
        // Stage every change first so a bad entry leaves nothing applied.
        let mut staged = Vec::with_capacity(updates.len());
        for update in &updates {
            let mut list = self
                .lists
                .get(&update.id)
                .filter(|l| l.board_id() == board_id)
                .map(|l| l.clone())
                .ok_or_else(|| {
                    PortError::new(format!("list {} is not in board {board_id}", update.id))
                })?;
            list.reposition(update.position)
                .map_err(|e| PortError::new(e.to_string()))?;
            staged.push(list);
        }

        for list in staged {
            self.lists.insert(list.id(), list);
        }
        Ok(())
    }
}

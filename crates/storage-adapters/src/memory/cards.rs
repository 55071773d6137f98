use async_trait::async_trait;
use domains::ordering::PositionUpdate;
use domains::ports::{CardRepository, PortResult};
use domains::{Card, CardId, ListId, PortError};

use super::MemoryStore;

#[async_trait]
impl CardRepository for MemoryStore {
    async fn find_by_id(&self, id: CardId) -> PortResult<Option<Card>> {
        Ok(self.cards.get(&id).map(|c| c.clone()))
    }

    async fn find_by_list(&self, list_id: ListId) -> PortResult<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.list_id() == list_id)
            .map(|c| c.clone())
            .collect();
        cards.sort_by(|a, b| a.position().total_cmp(&b.position()));
        Ok(cards)
    }

    async fn exists_in_list(&self, card_id: CardId, list_id: ListId) -> PortResult<bool> {
        Ok(self
            .cards
            .get(&card_id)
            .is_some_and(|c| c.list_id() == list_id))
    }

    async fn save(&self, card: &Card) -> PortResult<()> {
        self.cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn delete(&self, id: CardId) -> PortResult<()> {
        self.drop_card(id);
        Ok(())
    }

    async fn reorder(
        &self,
        list_id: ListId,
        updates: Vec<PositionUpdate<CardId>>,
    ) -> PortResult<()> {
        let mut staged = Vec::with_capacity(updates.len());
        for update in &updates {
            let mut card = self
                .cards
                .get(&update.id)
                .filter(|c| c.list_id() == list_id)
                .map(|c| c.clone())
                .ok_or_else(|| {
                    PortError::new(format!("card {} is not in list {list_id}", update.id))
                })?;
            card.reposition(update.position)
                .map_err(|e| PortError::new(e.to_string()))?;
            staged.push(card);
        }

        for card in staged {
            self.cards.insert(card.id(), card);
        }
        Ok(())
    }
}

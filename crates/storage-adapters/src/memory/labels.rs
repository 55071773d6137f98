use std::collections::HashSet;

use async_trait::async_trait;
use domains::ports::{LabelRepository, PortResult};
use domains::{BoardId, CardId, Label, LabelId, PortError};

use super::MemoryStore;

#[async_trait]
impl LabelRepository for MemoryStore {
    async fn find_by_id(&self, id: LabelId) -> PortResult<Option<Label>> {
        Ok(self.labels.get(&id).map(|l| l.clone()))
    }

    async fn find_by_board(&self, board_id: BoardId) -> PortResult<Vec<Label>> {
        let mut labels: Vec<Label> = self
            .labels
            .iter()
            .filter(|l| l.board_id() == board_id)
            .map(|l| l.clone())
            .collect();
        labels.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(labels)
    }

    async fn save(&self, label: &Label) -> PortResult<()> {
        self.labels.insert(label.id(), label.clone());
        Ok(())
    }

    async fn delete(&self, id: LabelId) -> PortResult<()> {
        self.labels.remove(&id);
        for mut entry in self.card_labels.iter_mut() {
            entry.value_mut().remove(&id);
        }
        Ok(())
    }

    async fn find_by_card(&self, card_id: CardId) -> PortResult<Vec<Label>> {
        let ids = self.card_label_ids(card_id).await?;
        let mut labels: Vec<Label> = ids
            .iter()
            .filter_map(|id| self.labels.get(id).map(|l| l.clone()))
            .collect();
        labels.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(labels)
    }

    async fn card_label_ids(&self, card_id: CardId) -> PortResult<HashSet<LabelId>> {
        Ok(self
            .card_labels
            .get(&card_id)
            .map(|set| set.clone())
            .unwrap_or_default())
    }

    async fn attach(&self, card_id: CardId, label_id: LabelId) -> PortResult<()> {
        if !self.cards.contains_key(&card_id) {
            return Err(PortError::new(format!("card {card_id} does not exist")));
        }
        if !self.labels.contains_key(&label_id) {
            return Err(PortError::new(format!("label {label_id} does not exist")));
        }
        self.card_labels.entry(card_id).or_default().insert(label_id);
        Ok(())
    }

    async fn detach(&self, card_id: CardId, label_id: LabelId) -> PortResult<()> {
        if let Some(mut set) = self.card_labels.get_mut(&card_id) {
            set.remove(&label_id);
        }
        Ok(())
    }
}

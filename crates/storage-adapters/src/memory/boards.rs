use async_trait::async_trait;
use domains::ports::{BoardRepository, PortResult};
use domains::{Board, BoardId, BoardMember, LabelId, ListId, PortError, Role, UserId};

use super::MemoryStore;

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn find_by_id(&self, id: BoardId) -> PortResult<Option<Board>> {
        Ok(self.boards.get(&id).map(|b| b.clone()))
    }

    async fn find_for_user(&self, user_id: UserId) -> PortResult<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .boards
            .iter()
            .filter(|b| b.is_owner(user_id) || self.members.contains_key(&(b.id(), user_id)))
            .map(|b| b.clone())
            .collect();
        boards.sort_by_key(|b| b.created_at());
        Ok(boards)
    }

    async fn save(&self, board: &Board) -> PortResult<()> {
        self.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn delete(&self, id: BoardId) -> PortResult<()> {
        if self.boards.remove(&id).is_none() {
            return Err(PortError::new(format!("board {id} does not exist")));
        }

        let list_ids: Vec<ListId> = self
            .lists
            .iter()
            .filter(|l| l.board_id() == id)
            .map(|l| l.id())
            .collect();
        for list_id in list_ids {
            self.drop_list(list_id);
        }

        let label_ids: Vec<LabelId> = self
            .labels
            .iter()
            .filter(|l| l.board_id() == id)
            .map(|l| l.id())
            .collect();
        for label_id in label_ids {
            self.labels.remove(&label_id);
        }
        self.members.retain(|(board_id, _), _| *board_id != id);

        tracing::debug!(board = %id, "board and its children removed");
        Ok(())
    }

    async fn get_member_role(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> PortResult<Option<Role>> {
        Ok(self.members.get(&(board_id, user_id)).map(|m| m.role()))
    }

    async fn is_member(&self, board_id: BoardId, user_id: UserId) -> PortResult<bool> {
        Ok(self.members.contains_key(&(board_id, user_id)))
    }

    async fn find_member(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> PortResult<Option<BoardMember>> {
        Ok(self.members.get(&(board_id, user_id)).map(|m| m.clone()))
    }

    async fn find_members(&self, board_id: BoardId) -> PortResult<Vec<BoardMember>> {
        Ok(self
            .members
            .iter()
            .filter(|m| m.board_id() == board_id)
            .map(|m| m.clone())
            .collect())
    }

    /// `(board_id, user_id)` is unique.
    async fn add_member(&self, member: &BoardMember) -> PortResult<()> {
        let key = (member.board_id(), member.user_id());
        if self.members.contains_key(&key) {
            return Err(PortError::new(format!(
                "user {} is already a member of board {}",
                key.1, key.0
            )));
        }
        self.members.insert(key, member.clone());
        Ok(())
    }

    async fn save_member(&self, member: &BoardMember) -> PortResult<()> {
        self.members
            .insert((member.board_id(), member.user_id()), member.clone());
        Ok(())
    }

    async fn remove_member(&self, board_id: BoardId, user_id: UserId) -> PortResult<()> {
        self.members.remove(&(board_id, user_id));
        Ok(())
    }
}

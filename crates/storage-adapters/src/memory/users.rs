use async_trait::async_trait;
use domains::ports::{PortResult, UserRepository};
use domains::{PortError, User, UserId};

use super::MemoryStore;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> PortResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    /// Email and username are unique across users.
    async fn save(&self, user: &User) -> PortResult<()> {
        let taken = self.users.iter().any(|u| {
            u.id() != user.id() && (u.email() == user.email() || u.username() == user.username())
        });
        if taken {
            return Err(PortError::new(format!(
                "email or username already in use: {}",
                user.email()
            )));
        }
        self.users.insert(user.id(), user.clone());
        Ok(())
    }
}

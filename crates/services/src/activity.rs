//! Read side of the audit trail.

use domains::{Activity, BoardId, CardId, Result, UserId};

use crate::context::{Ports, ServiceOptions};
use crate::resolve::{Intent, Resolver};

#[derive(Clone)]
pub struct ActivityService {
    ports: Ports,
    options: ServiceOptions,
}

impl ActivityService {
    pub fn new(ports: Ports, options: ServiceOptions) -> Self {
        Self { ports, options }
    }

    /// Newest first. `limit` is clamped to the configured maximum.
    #[tracing::instrument(skip(self))]
    pub async fn for_board(
        &self,
        actor_id: UserId,
        board_id: BoardId,
        limit: Option<usize>,
    ) -> Result<Vec<Activity>> {
        let scope = Resolver::new(&self.ports)
            .board_scope(actor_id, board_id, Intent::Read)
            .await?;
        scope.access().ensure_view()?;

        let limit = self.options.activity_limit(limit);
        Ok(self.ports.activities.find_by_board(board_id, limit).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn for_card(
        &self,
        actor_id: UserId,
        card_id: CardId,
        limit: Option<usize>,
    ) -> Result<Vec<Activity>> {
        let scoped = Resolver::new(&self.ports)
            .card_scope(actor_id, card_id, Intent::Read)
            .await?;
        scoped.scope.access().ensure_view()?;

        let limit = self.options.activity_limit(limit);
        Ok(self.ports.activities.find_by_card(card_id, limit).await?)
    }
}

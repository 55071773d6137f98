//! # Audit trail recorder
//!
//! Turns a [`NewActivity`] into an immutable [`Activity`] and persists it.
//!
//! Ordering relative to the triggering mutation is the caller's contract:
//! - create: record after the entity is saved
//! - update: record only when the change set is non-empty
//! - delete: record first; a failed record aborts the delete

use std::sync::Arc;

use domains::ports::{ActivityRepository, Clock, IdGenerator};
use domains::{Activity, ActivityId, DomainError, NewActivity, Result};

#[derive(Clone)]
pub struct AuditRecorder {
    activities: Arc<dyn ActivityRepository>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl AuditRecorder {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            activities,
            ids,
            clock,
        }
    }

    pub async fn record(&self, entry: NewActivity) -> Result<Activity> {
        let activity = Activity::create(ActivityId::from(self.ids.next_id()), entry, self.clock.now());

        if let Err(e) = self.activities.save(&activity).await {
            tracing::error!(
                action = ?activity.action(),
                entity_type = ?activity.entity_type(),
                entity_id = %activity.entity_id(),
                error = %e,
                "failed to record activity"
            );
            return Err(DomainError::from(e));
        }

        tracing::info!(
            activity_id = %activity.id(),
            action = ?activity.action(),
            entity_type = ?activity.entity_type(),
            entity_id = %activity.entity_id(),
            board_id = %activity.board_id(),
            "activity recorded"
        );
        Ok(activity)
    }
}

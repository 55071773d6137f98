//! Explicit wiring of the ports every service depends on.

use std::sync::Arc;

use domains::ordering::{PositionAllocator, DEFAULT_POSITION_STEP};
use domains::ports::{
    ActivityRepository, BoardRepository, CardRepository, Clock, IdGenerator, LabelRepository,
    ListRepository, UserRepository,
};
use domains::Result;

/// Every collaborator a use case may call.
#[derive(Clone)]
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub cards: Arc<dyn CardRepository>,
    pub labels: Arc<dyn LabelRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

/// Tunables handed over by the composition root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceOptions {
    /// Gap between appended positions.
    pub position_step: f64,
    pub activity_default_limit: usize,
    pub activity_max_limit: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            position_step: DEFAULT_POSITION_STEP,
            activity_default_limit: 50,
            activity_max_limit: 200,
        }
    }
}

impl ServiceOptions {
    pub(crate) fn allocator(&self) -> Result<PositionAllocator> {
        PositionAllocator::new(self.position_step)
    }

    /// Clamps a requested page size into `1..=activity_max_limit`.
    pub(crate) fn activity_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.activity_default_limit)
            .clamp(1, self.activity_max_limit.max(1))
    }
}

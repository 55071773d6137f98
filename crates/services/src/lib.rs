//! crates/services/src/lib.rs
//!
//! Use case orchestrators for the task board. Every mutating operation runs
//! the same five steps: resolve the entity chain, resolve the containing
//! board, evaluate the actor's permission, apply the domain mutation, then
//! record the audit activity.

pub mod activity;
pub mod audit;
pub mod boards;
pub mod cards;
pub mod context;
pub mod labels;
pub mod lists;
pub mod members;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::ActivityService;
pub use audit::AuditRecorder;
pub use boards::{BoardRef, BoardService, CreateBoard, UpdateBoard};
pub use cards::{CardRef, CardService, CreateCard, MoveCard, ReorderCards, UpdateCard};
pub use context::{Ports, ServiceOptions};
pub use labels::{CardLabel, CreateLabel, LabelRef, LabelService, UpdateLabel};
pub use lists::{CreateList, ListRef, ListService, ReorderLists, UpdateList};
pub use members::{AddBoardMember, MemberService, RemoveBoardMember, UpdateMemberRole};

use domains::Result;

/// Every service wired against one set of ports.
#[derive(Clone)]
pub struct TaskBoard {
    pub boards: BoardService,
    pub lists: ListService,
    pub cards: CardService,
    pub labels: LabelService,
    pub members: MemberService,
    pub activity: ActivityService,
}

impl TaskBoard {
    /// Fails only when `options` carries an invalid position step.
    pub fn new(ports: Ports, options: ServiceOptions) -> Result<Self> {
        let positions = options.allocator()?;
        let audit = AuditRecorder::new(
            ports.activities.clone(),
            ports.ids.clone(),
            ports.clock.clone(),
        );

        Ok(Self {
            boards: BoardService::new(ports.clone(), audit.clone()),
            lists: ListService::new(ports.clone(), audit.clone(), positions),
            cards: CardService::new(ports.clone(), audit.clone(), positions),
            labels: LabelService::new(ports.clone(), audit.clone()),
            members: MemberService::new(ports.clone(), audit),
            activity: ActivityService::new(ports, options),
        })
    }
}

//! # Domain Models
//!
//! These structs represent the core entities of the task board.
//! Each entity wraps a plain `*Record` holding its persisted state. The
//! record is only reachable read-only; state changes go through named
//! methods that enforce the entity's invariants.
//!
//! Entities are built in exactly two ways: `create` (fresh identity and
//! timestamps) or `restore` (state loaded from persistence).

mod activity;
mod board;
mod card;
mod ids;
mod label;
mod list;
mod member;
mod user;

pub use activity::{Activity, ActivityAction, ActivityRecord, EntityType, NewActivity};
pub use board::{Board, BoardRecord, NewBoard};
pub use card::{Card, CardRecord, NewCard};
pub use ids::{ActivityId, BoardId, CardId, LabelId, ListId, UserId};
pub use label::{Label, LabelRecord, NewLabel};
pub use list::{List, ListRecord, NewList};
pub use member::{BoardMember, BoardMemberRecord, Role};
pub use user::{User, UserRecord};

//! Production implementations of the runtime ports.

use chrono::{DateTime, Utc};
use domains::ports::{Clock, IdGenerator};
use uuid::Uuid;

/// Random UUIDv4 identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_v4_and_distinct() {
        let ids = UuidV4Generator;
        let (a, b) = (ids.next_id(), ids.next_id());
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }
}

use std::fmt::Debug;
use uuid::Uuid;

/// Source of opaque identifiers for players and history records.
pub trait IdSource: Debug {
    fn next_id(&mut self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        let first = ids.next_id();
        assert_eq!(first.len(), 32);
        assert_ne!(first, ids.next_id());
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("g");
        assert_eq!(ids.next_id(), "g-1");
        assert_eq!(ids.next_id(), "g-2");
    }
}

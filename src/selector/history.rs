//! Append-only invocation history

use crate::models::HistoryRecord;

/// Records are only ever appended. Reads hand out clones.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    /// Copy of the most recent record
    pub fn last(&self) -> Option<HistoryRecord> {
        self.records.last().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(state: &str) -> HistoryRecord {
        HistoryRecord::new(Utc::now(), state.to_string(), vec![], String::new(), vec![])
    }

    #[test]
    fn test_last_returns_independent_copy() {
        let mut log = HistoryLog::new();
        assert!(log.last().is_none());
        assert!(log.is_empty());

        log.append(record("first"));
        log.append(record("second"));
        assert!(!log.is_empty());

        let mut copy = log.last().unwrap();
        copy.state = "tampered".to_string();

        assert_eq!(log.last().unwrap().state, "second");
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().next().unwrap().state, "first");
    }
}

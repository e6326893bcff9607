//! In-memory associative store for development
//!
//! Keeps timestamped records in a Vec behind a lock. It has no embedding
//! index, so "similarity" is approximated by recency: newest first.

use crate::clock::format_timestamp;
use crate::memory::AssociativeMemory;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A single remembered statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    pub memory_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl MemoryRecord {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            memory_id: Uuid::new_v4(),
            timestamp,
            text: text.into(),
        }
    }

    pub fn render(&self, add_time: bool) -> String {
        if add_time {
            format!("[{}] {}", format_timestamp(&self.timestamp), self.text)
        } else {
            self.text.clone()
        }
    }
}

/// In-memory store, newest records ranked first
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssociativeMemory {
    records: Arc<RwLock<Vec<MemoryRecord>>>,
}

impl InMemoryAssociativeMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, text: impl Into<String>, timestamp: DateTime<Utc>) {
        let mut records = self.records.write().await;
        records.push(MemoryRecord::new(text, timestamp));
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AssociativeMemory for InMemoryAssociativeMemory {
    async fn retrieve_associative(
        &self,
        query: &str,
        limit: usize,
        add_time: bool,
    ) -> Result<Vec<String>> {
        let records = self.records.read().await;

        let mut ranked: Vec<&MemoryRecord> = records.iter().collect();
        // Stable sort keeps insertion order among equal timestamps
        ranked.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let results: Vec<String> = ranked
            .into_iter()
            .take(limit)
            .map(|record| record.render(add_time))
            .collect();

        debug!(
            query_chars = query.len(),
            limit,
            returned = results.len(),
            "Retrieved memories"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_retrieve_newest_first_with_timestamps() {
        let store = InMemoryAssociativeMemory::new();
        store
            .add("The bakery opened.", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
            .await;
        store
            .add("The bakery closed.", Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap())
            .await;

        let memories = store.retrieve_associative("bakery", 10, true).await.unwrap();
        assert_eq!(
            memories,
            vec![
                "[2024-01-02 08:00:00] The bakery closed.".to_string(),
                "[2024-01-01 08:00:00] The bakery opened.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_retrieve_honours_limit_and_plain_rendering() {
        let store = InMemoryAssociativeMemory::new();
        for i in 0..5 {
            store
                .add(format!("memory {}", i), Utc.timestamp_opt(i, 0).unwrap())
                .await;
        }

        let memories = store.retrieve_associative("q", 2, false).await.unwrap();
        assert_eq!(memories, vec!["memory 4".to_string(), "memory 3".to_string()]);
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_nothing() {
        let store = InMemoryAssociativeMemory::new();
        store.add("x", Utc::now()).await;
        assert!(store.retrieve_associative("x", 0, true).await.unwrap().is_empty());
    }
}

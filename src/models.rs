//! Core data models for the selector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use uuid::Uuid;

//
// ================= History =================
//

/// One completed selector invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub record_id: Uuid,
    pub date: DateTime<Utc>,
    /// Relevant-memory text returned to the caller
    pub state: String,
    /// Summarizer transcript
    pub initial_chain_of_thought: Vec<String>,
    pub query: String,
    /// Relevance filter transcript
    pub final_chain_of_thought: Vec<String>,
}

impl HistoryRecord {
    pub fn new(
        date: DateTime<Utc>,
        state: String,
        initial_chain_of_thought: Vec<String>,
        query: String,
        final_chain_of_thought: Vec<String>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            date,
            state,
            initial_chain_of_thought,
            query,
            final_chain_of_thought,
        }
    }

    /// SHA-256 of the serialized record, hex encoded.
    /// Streams JSON straight into the hasher.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();

        if serde_json::to_writer(&mut HashWriter(&mut hasher), self).is_err() {
            return String::new();
        }

        hex::encode(hasher.finalize())
    }
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

//! Relevant Memories
//!
//! Working-memory filter for an autonomous agent:
//! - Summarizes the agent's current state from named sub-components
//! - Retrieves the most similar memories from an associative store
//! - Asks a language model to keep, verbatim, only what matters now,
//!   preferring the most recent statement when memories conflict
//! - Keeps an append-only history of every invocation for auditing
//!
//! PIPELINE:
//! COMPONENT STATES → SUMMARY QUERY → CANDIDATES → RELEVANT MEMORIES

pub mod clock;
pub mod components;
pub mod document;
pub mod error;
pub mod language_model;
pub mod memory;
pub mod models;
pub mod selector;

pub use error::Result;

// Re-export common types
pub use clock::{Clock, FixedIntervalClock, SystemClock};
pub use components::{ComponentMap, ConstantState, StateProvider};
pub use error::SelectorError;
pub use language_model::{GeminiClient, LanguageModel, MockLanguageModel};
pub use memory::{AssociativeMemory, InMemoryAssociativeMemory};
pub use models::HistoryRecord;
pub use selector::{RelevantMemorySelector, SelectorBuilder, SelectorConfig};

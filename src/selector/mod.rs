//! Relevant memory selection
//!
//! Three stages run in order on every invocation:
//!
//! SUMMARIZE (component states → query) → RETRIEVE (query → candidates)
//! → FILTER (candidates → relevant memories)
//!
//! Each successful invocation appends one [`HistoryRecord`]. A failure in
//! any stage returns before the append, so history is untouched.

pub mod history;
pub mod prompts;

pub use history::HistoryLog;

use crate::clock::Clock;
use crate::components::{render_component_states, ComponentMap, StateProvider};
use crate::document::Transcript;
use crate::error::SelectorError;
use crate::language_model::{LanguageModel, DEFAULT_TERMINATORS};
use crate::memory::AssociativeMemory;
use crate::models::HistoryRecord;
use crate::Result;
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tunables for a selector
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub agent_name: String,
    /// Upper bound on candidates fetched from memory
    pub retrieval_count: usize,
    pub summary_max_tokens: u32,
    pub filter_max_tokens: u32,
    /// Append a [`HistoryRecord`] per invocation. Requires a clock.
    /// Unset means "record whenever a clock is configured".
    pub record_history: Option<bool>,
    /// Print both transcripts, the query and the result
    pub verbose: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            agent_name: String::new(),
            retrieval_count: 25,
            summary_max_tokens: 750,
            filter_max_tokens: 2000,
            record_history: None,
            verbose: false,
        }
    }
}

/// Builder for [`RelevantMemorySelector`]
pub struct SelectorBuilder {
    model: Arc<dyn LanguageModel>,
    memory: Arc<dyn AssociativeMemory>,
    components: ComponentMap,
    clock: Option<Arc<dyn Clock>>,
    config: SelectorConfig,
    trace_sink: Option<Box<dyn Write + Send>>,
}

impl SelectorBuilder {
    pub fn component(mut self, name: impl Into<String>, provider: Arc<dyn StateProvider>) -> Self {
        self.components.insert(name.into(), provider);
        self
    }

    pub fn components(mut self, components: ComponentMap) -> Self {
        self.components.extend(components);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn retrieval_count(mut self, count: usize) -> Self {
        self.config.retrieval_count = count;
        self
    }

    pub fn record_history(mut self, enabled: bool) -> Self {
        self.config.record_history = Some(enabled);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    /// Where verbose transcripts go. Defaults to stderr.
    pub fn trace_sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.trace_sink = Some(Box::new(sink));
        self
    }

    /// Replace every tunable at once. The agent name is kept if the
    /// supplied config leaves it empty.
    pub fn config(mut self, config: SelectorConfig) -> Self {
        let agent_name = if config.agent_name.is_empty() {
            std::mem::take(&mut self.config.agent_name)
        } else {
            config.agent_name.clone()
        };
        self.config = SelectorConfig { agent_name, ..config };
        self
    }

    pub fn build(self) -> Result<RelevantMemorySelector> {
        if self.config.agent_name.trim().is_empty() {
            return Err(SelectorError::InvalidConfig(
                "agent name must not be empty".to_string(),
            ));
        }
        if self.config.summary_max_tokens == 0 || self.config.filter_max_tokens == 0 {
            return Err(SelectorError::InvalidConfig(
                "token ceilings must be positive".to_string(),
            ));
        }
        let record_history = self
            .config
            .record_history
            .unwrap_or(self.clock.is_some());
        if record_history && self.clock.is_none() {
            return Err(SelectorError::MissingTimeProvider);
        }

        let trace_sink = if self.config.verbose {
            let sink = self
                .trace_sink
                .unwrap_or_else(|| Box::new(std::io::stderr()) as Box<dyn Write + Send>);
            Some(Mutex::new(sink))
        } else {
            None
        };

        info!(
            agent = %self.config.agent_name,
            components = self.components.len(),
            retrieval_count = self.config.retrieval_count,
            has_clock = self.clock.is_some(),
            record_history,
            "Relevant memory selector configured"
        );

        Ok(RelevantMemorySelector {
            model: self.model,
            memory: self.memory,
            components: self.components,
            clock: self.clock,
            config: self.config,
            record_history,
            trace_sink,
            history: HistoryLog::new(),
            last_context: None,
        })
    }
}

/// Retrieves memories similar to the agent's current state and asks the
/// language model to keep only those that matter right now.
///
/// Contradictions are resolved by asking the model to prefer the most
/// recent statement. That rule lives in the prompt only and is not
/// verified, so conflict resolution is best-effort.
///
/// Invocations take `&mut self`; share a selector across tasks only
/// behind a lock.
pub struct RelevantMemorySelector {
    model: Arc<dyn LanguageModel>,
    memory: Arc<dyn AssociativeMemory>,
    components: ComponentMap,
    clock: Option<Arc<dyn Clock>>,
    config: SelectorConfig,
    record_history: bool,
    trace_sink: Option<Mutex<Box<dyn Write + Send>>>,
    history: HistoryLog,
    last_context: Option<String>,
}

impl RelevantMemorySelector {
    pub fn builder(
        model: Arc<dyn LanguageModel>,
        memory: Arc<dyn AssociativeMemory>,
        agent_name: impl Into<String>,
    ) -> SelectorBuilder {
        SelectorBuilder {
            model,
            memory,
            components: ComponentMap::new(),
            clock: None,
            config: SelectorConfig {
                agent_name: agent_name.into(),
                ..SelectorConfig::default()
            },
            trace_sink: None,
        }
    }

    /// Run the pipeline for `entity_name` and return the relevant memories
    pub async fn invoke(&mut self, entity_name: &str) -> Result<String> {
        info!(agent = entity_name, "Selecting relevant memories");

        let (query, summary_transcript) = self.summarize_context(entity_name).await?;
        let candidates = self.retrieve_candidates(&query).await?;
        let (result, filter_transcript) = self
            .filter_relevant(&summary_transcript, entity_name, &candidates)
            .await?;

        if self.config.verbose {
            self.trace(&summary_transcript, &query, &filter_transcript, &result);
        }

        if self.record_history {
            let date = self
                .clock
                .as_ref()
                .map(|clock| clock.now())
                .ok_or(SelectorError::MissingTimeProvider)?;

            let record = HistoryRecord::new(
                date,
                result.clone(),
                summary_transcript.lines(),
                query,
                filter_transcript.lines(),
            );
            debug!(
                record_id = %record.record_id,
                digest = %record.digest(),
                "Appending history record"
            );
            self.history.append(record);
        }

        info!(
            candidates = candidates.len(),
            result_chars = result.len(),
            "Relevant memories selected"
        );

        self.last_context = Some(result.clone());
        Ok(result)
    }

    /// [`invoke`](Self::invoke) using the configured agent name
    pub async fn make_context(&mut self) -> Result<String> {
        let agent_name = self.config.agent_name.clone();
        self.invoke(&agent_name).await
    }

    /// Copy of the most recent history record
    pub fn last_record(&self) -> Option<HistoryRecord> {
        self.history.last()
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Result of the last successful invocation
    pub fn last_context(&self) -> Option<&str> {
        self.last_context.as_deref()
    }

    // =============================
    // Stages
    // =============================

    async fn summarize_context(&self, entity_name: &str) -> Result<(String, Transcript)> {
        let component_states = render_component_states(entity_name, &self.components);

        let mut transcript = Transcript::new(Arc::clone(&self.model));
        transcript.statement(&prompts::statements_block(&component_states));

        let summary = transcript
            .open_question(
                prompts::SUMMARY_QUESTION,
                self.config.summary_max_tokens,
                DEFAULT_TERMINATORS,
            )
            .await?;

        let now = self.clock.as_ref().map(|clock| clock.now());
        let query = prompts::build_query(entity_name, &summary, now.as_ref());

        debug!(
            components = self.components.len(),
            query = %query,
            "Context summarized"
        );

        Ok((query, transcript))
    }

    async fn retrieve_candidates(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.config.retrieval_count;
        let mut candidates = self
            .memory
            .retrieve_associative(query, limit, true)
            .await?;

        if candidates.len() > limit {
            warn!(
                returned = candidates.len(),
                limit,
                "Memory store returned more candidates than requested, truncating"
            );
            candidates.truncate(limit);
        }

        debug!(candidates = candidates.len(), "Candidates retrieved");
        Ok(candidates)
    }

    async fn filter_relevant(
        &self,
        summary_transcript: &Transcript,
        entity_name: &str,
        candidates: &[String],
    ) -> Result<(String, Transcript)> {
        let now = self.clock.as_ref().map(|clock| clock.now());
        let instruction = prompts::relevance_instruction(entity_name, now.as_ref());

        let mut transcript = summary_transcript.fresh();
        let result = transcript
            .open_question(
                &prompts::filter_question(&instruction, candidates),
                self.config.filter_max_tokens,
                &[],
            )
            .await?;

        Ok((result, transcript))
    }

    fn trace(
        &self,
        summary_transcript: &Transcript,
        query: &str,
        filter_transcript: &Transcript,
        result: &str,
    ) {
        let Some(sink) = self.trace_sink.as_ref() else {
            return;
        };

        let mut sink = sink.lock();
        let written = write_trace(
            &mut **sink,
            summary_transcript,
            query,
            filter_transcript,
            result,
        );
        if let Err(e) = written {
            warn!("Failed to write selector trace: {}", e);
        }
    }
}

fn write_trace(
    sink: &mut (dyn Write + Send),
    summary_transcript: &Transcript,
    query: &str,
    filter_transcript: &Transcript,
    result: &str,
) -> std::io::Result<()> {
    write!(sink, "{}", summary_transcript.text().green())?;
    write!(sink, "{}", format!("Query: {}\n", query).green())?;
    write!(sink, "{}", filter_transcript.text().green())?;
    write!(sink, "{}", result.green())?;
    sink.flush()
}

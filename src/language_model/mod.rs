//! Language model abstraction
//!
//! The selector only needs plain prompt-in, text-out generation with an
//! output ceiling and a set of stop sequences.

use crate::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

pub mod gemini;
pub use gemini::GeminiClient;

/// Stop sequences used when a caller does not ask for anything else
pub const DEFAULT_TERMINATORS: &[&str] = &["\n"];

/// Trait for text generation backends
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a continuation of `prompt`.
    ///
    /// An empty `terminators` slice disables stop sequences entirely.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        terminators: &[&str],
    ) -> Result<String>;
}

/// A single request seen by [`MockLanguageModel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCall {
    pub prompt: String,
    pub max_tokens: u32,
    pub terminators: Vec<String>,
}

/// Deterministic offline backend for development & testing
///
/// Replies with queued responses first. Once the queue is empty it echoes
/// the statement lines of the last `Statements:` block in the prompt.
#[derive(Debug, Default)]
pub struct MockLanguageModel {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ModelCall>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, oldest first
    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().clone()
    }

    fn echo_statements(prompt: &str, terminators: &[&str]) -> String {
        let Some(start) = prompt.rfind("Statements:\n") else {
            return String::new();
        };
        let block = &prompt[start + "Statements:\n".len()..];
        let end = ["\nQuestion: ", "\nAnswer: "]
            .iter()
            .filter_map(|marker| block.find(marker))
            .min()
            .unwrap_or(block.len());

        let lines: Vec<&str> = block[..end]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        // A model told to stop at newlines answers on one line
        if terminators.contains(&"\n") {
            lines.join(" ")
        } else {
            lines.join("\n")
        }
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        terminators: &[&str],
    ) -> Result<String> {
        self.calls.lock().push(ModelCall {
            prompt: prompt.to_string(),
            max_tokens,
            terminators: terminators.iter().map(|t| t.to_string()).collect(),
        });

        let queued = self.responses.lock().pop_front();
        let mut text = queued.unwrap_or_else(|| Self::echo_statements(prompt, terminators));

        if let Some(cut) = terminators.iter().filter_map(|t| text.find(t)).min() {
            text.truncate(cut);
        }

        let words: Vec<&str> = text.split_inclusive(' ').collect();
        if words.len() > max_tokens as usize {
            text = words[..max_tokens as usize].concat();
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_last_statement_block() {
        let model = MockLanguageModel::new();
        let prompt = "Statements:\nold\nQuestion: ignore\nAnswer: x\n\
                      Question: pick\nStatements:\n[2024] a\n[2025] b\nAnswer: ";

        let text = model.generate(prompt, 100, &[]).await.unwrap();
        assert_eq!(text, "[2024] a\n[2025] b");
    }

    #[tokio::test]
    async fn test_mock_respects_terminators_and_records_calls() {
        let model = MockLanguageModel::with_responses(["first line\nsecond line"]);

        let text = model.generate("anything", 50, DEFAULT_TERMINATORS).await.unwrap();
        assert_eq!(text, "first line");

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 50);
        assert_eq!(calls[0].terminators, vec!["\n".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_token_ceiling() {
        let model = MockLanguageModel::with_responses(["one two three four"]);
        let text = model.generate("p", 2, &[]).await.unwrap();
        assert_eq!(text, "one two ");
    }
}

//! Prompt transcripts
//!
//! A [`Transcript`] is the ordered record of one backend session: the
//! statements fed in, the questions asked and the answers returned. The
//! whole transcript is the prompt for each new question.

use crate::language_model::LanguageModel;
use crate::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Statement(String),
    Question(String),
    Answer(String),
}

/// Ordered prompt/response log of a single backend session
pub struct Transcript {
    model: Arc<dyn LanguageModel>,
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            entries: Vec::new(),
        }
    }

    /// Empty transcript on the same backend
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.model))
    }

    pub fn statement(&mut self, text: &str) {
        self.entries.push(Entry::Statement(format!("{}\n", text)));
    }

    /// Ask the backend a free-form question about everything so far.
    ///
    /// The `Answer: ` prefix is part of the transcript before sampling. On
    /// failure the transcript ends with that empty answer.
    pub async fn open_question(
        &mut self,
        question: &str,
        max_tokens: u32,
        terminators: &[&str],
    ) -> Result<String> {
        self.entries
            .push(Entry::Question(format!("Question: {}\n", question)));
        self.entries.push(Entry::Answer("Answer: ".to_string()));

        let prompt = self.text();
        let response = self
            .model
            .generate(&prompt, max_tokens, terminators)
            .await?;

        if let Some(Entry::Answer(answer)) = self.entries.last_mut() {
            answer.push_str(&response);
            answer.push('\n');
        }
        Ok(response)
    }

    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Statement(text) | Entry::Question(text) | Entry::Answer(text) => {
                    text.as_str()
                }
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectorError;
    use crate::language_model::MockLanguageModel;
    use async_trait::async_trait;

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn generate(&self, _: &str, _: u32, _: &[&str]) -> Result<String> {
            Err(SelectorError::BackendFailure("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_open_question_sends_whole_transcript() {
        let model = Arc::new(MockLanguageModel::with_responses(["a summary"]));
        let mut transcript = Transcript::new(model.clone());

        transcript.statement("Statements:\nfact one\n");
        let answer = transcript
            .open_question("Summarize the statements above.", 750, &["\n"])
            .await
            .unwrap();

        assert_eq!(answer, "a summary");
        let calls = model.calls();
        assert_eq!(
            calls[0].prompt,
            "Statements:\nfact one\n\nQuestion: Summarize the statements above.\nAnswer: "
        );
        assert_eq!(
            transcript.lines(),
            vec![
                "Statements:",
                "fact one",
                "",
                "Question: Summarize the statements above.",
                "Answer: a summary",
            ]
        );
    }

    #[tokio::test]
    async fn test_fresh_transcript_shares_model_not_entries() {
        let model = Arc::new(MockLanguageModel::new());
        let mut first = Transcript::new(model);
        first.statement("something");

        let second = first.fresh();
        assert!(second.is_empty());
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_failure_leaves_empty_answer() {
        let mut transcript = Transcript::new(Arc::new(FailingModel));
        let result = transcript.open_question("Anything?", 10, &[]).await;

        assert!(matches!(result, Err(SelectorError::BackendFailure(_))));
        assert_eq!(transcript.text(), "Question: Anything?\nAnswer: ");
        assert_eq!(
            transcript.lines(),
            vec!["Question: Anything?", "Answer: "]
        );
    }
}

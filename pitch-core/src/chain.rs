//! Generation chains.
//!
//! A chain binds one prompt template to the shared backend and owns one
//! conversation memory. Each successful run records exactly one turn.

use crate::generator::{GenerationError, TextGenerator};
use crate::memory::ConversationMemory;
use crate::template::{PromptInputs, PromptTemplate};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

/// Errors from running or building a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Memory input key '{key}' is not one of the chain inputs {declared:?}")]
    UnknownInputKey {
        key: String,
        declared: &'static [&'static str],
    },
}

/// Template + backend + memory.
pub struct GenerationChain<I> {
    name: &'static str,
    template: Arc<PromptTemplate<I>>,
    generator: Arc<dyn TextGenerator>,
    memory: ConversationMemory,
}

impl<I: PromptInputs> GenerationChain<I> {
    /// Build a chain. The memory's input key must name one of `I`'s fields.
    pub fn new(
        name: &'static str,
        template: Arc<PromptTemplate<I>>,
        generator: Arc<dyn TextGenerator>,
        memory: ConversationMemory,
    ) -> Result<Self, ChainError> {
        if !I::NAMES.contains(&memory.input_key()) {
            return Err(ChainError::UnknownInputKey {
                key: memory.input_key().to_string(),
                declared: I::NAMES,
            });
        }

        Ok(Self {
            name,
            template,
            generator,
            memory,
        })
    }

    /// Render the prompt, generate, record the turn and return the output.
    ///
    /// Nothing is recorded when generation fails.
    pub async fn run(&mut self, inputs: &I) -> Result<String, ChainError> {
        let span = info_span!("chain", name = self.name, turn = self.memory.len() + 1);

        async {
            let prompt = self.template.render(inputs);
            debug!(prompt_len = prompt.len(), "Prompt rendered");

            let output = self.generator.generate(&prompt).await.map_err(|e| {
                warn!(error = %e, backend = self.generator.name(), "Generation failed");
                e
            })?;
            if output.trim().is_empty() {
                warn!("Backend returned an empty completion");
                return Err(GenerationError::EmptyOutput.into());
            }
            debug!(output_len = output.len(), "Output generated");

            // Checked in `new`, so the key is always present.
            let recorded = inputs.value(self.memory.input_key()).unwrap_or_default();
            self.memory.append(recorded, output.clone());
            Ok(output)
        }
        .instrument(span)
        .await
    }
}

impl<I> GenerationChain<I> {
    /// The chain's memory.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}

impl<I> fmt::Debug for GenerationChain<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationChain")
            .field("name", &self.name)
            .field("backend", &self.generator.name())
            .field("turns", &self.memory.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{title_template, TitleInputs};
    use crate::testing::{CallLog, MockGenerator};

    fn title_chain(generator: MockGenerator) -> GenerationChain<TitleInputs> {
        GenerationChain::new(
            "title",
            Arc::new(title_template().unwrap()),
            Arc::new(generator),
            ConversationMemory::new("topic"),
        )
        .unwrap()
    }

    fn topic(value: &str) -> TitleInputs {
        TitleInputs {
            topic: value.to_string(),
        }
    }

    #[test]
    fn test_unknown_memory_key_rejected() {
        let result = GenerationChain::new(
            "title",
            Arc::new(title_template().unwrap()),
            Arc::new(MockGenerator::new(CallLog::new())),
            ConversationMemory::new("title"),
        );
        assert!(matches!(
            result,
            Err(ChainError::UnknownInputKey { ref key, .. }) if key == "title"
        ));
    }

    #[tokio::test]
    async fn test_run_records_turn() {
        let log = CallLog::new();
        let mut chain = title_chain(MockGenerator::new(log.clone()).reply("Brew Better"));

        let output = chain.run(&topic("coffee")).await.unwrap();

        assert_eq!(output, "Brew Better");
        assert_eq!(chain.memory().transcript(), "Human: coffee\nAI: Brew Better");
        assert_eq!(
            log.prompts(),
            vec!["Write me a sales pitch title about coffee".to_string()]
        );
    }

    #[tokio::test]
    async fn test_n_runs_record_n_turns_in_order() {
        let mut chain = title_chain(MockGenerator::new(CallLog::new()));

        for (n, value) in ["coffee", "tea", "cocoa"].into_iter().enumerate() {
            chain.run(&topic(value)).await.unwrap();
            assert_eq!(chain.memory().len(), n + 1);
        }

        let inputs: Vec<_> = chain
            .memory()
            .turns()
            .iter()
            .map(|turn| turn.input.as_str())
            .collect();
        assert_eq!(inputs, vec!["coffee", "tea", "cocoa"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_append() {
        let mut chain = title_chain(
            MockGenerator::new(CallLog::new())
                .reply("First")
                .fail("backend down"),
        );

        chain.run(&topic("coffee")).await.unwrap();
        let before = chain.memory().transcript();

        let err = chain.run(&topic("tea")).await.unwrap_err();
        assert!(matches!(err, ChainError::Generation(GenerationError::Other(_))));
        assert_eq!(chain.memory().len(), 1);
        assert_eq!(chain.memory().transcript(), before);
    }

    #[tokio::test]
    async fn test_blank_output_rejected() {
        let mut chain = title_chain(MockGenerator::new(CallLog::new()).reply("   "));

        let err = chain.run(&topic("coffee")).await.unwrap_err();
        assert!(matches!(err, ChainError::Generation(GenerationError::EmptyOutput)));
        assert!(chain.memory().is_empty());
    }
}

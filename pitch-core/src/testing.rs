//! Test doubles for the pipeline.
//!
//! - `MockGenerator` returns scripted completions without API calls
//! - `MockEncyclopedia` returns canned research text
//! - `CallLog` records every call from both, in order, so tests can check
//!   what each collaborator received and when

use crate::generator::{GenerationError, TextGenerator};
use crate::research::{Encyclopedia, LookupError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// A prompt sent to the generator.
    Generate(String),
    /// A query sent to the encyclopedia.
    Lookup(String),
}

/// Shared, ordered record of calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        // A test that panicked mid-push still leaves a usable log.
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: Call) {
        self.lock().push(call);
    }

    /// All calls in the order they happened.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    /// Prompts sent to the generator, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                Call::Generate(prompt) => Some(prompt.clone()),
                Call::Lookup(_) => None,
            })
            .collect()
    }

    /// Queries sent to the encyclopedia, in order.
    pub fn queries(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                Call::Lookup(query) => Some(query.clone()),
                Call::Generate(_) => None,
            })
            .collect()
    }

    /// Number of generator calls.
    pub fn generate_count(&self) -> usize {
        self.prompts().len()
    }
}

enum Scripted {
    Reply(String),
    Fail(String),
}

/// A generator that returns scripted replies.
///
/// Replies are consumed in order. Once the script runs out, each prompt is
/// echoed back as `Generated from: <prompt>`.
pub struct MockGenerator {
    log: CallLog,
    script: Mutex<VecDeque<Scripted>>,
}

impl MockGenerator {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Reply(text.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()));
        self
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(entry);
    }

    fn next(&self) -> Option<Scripted> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.log.record(Call::Generate(prompt.to_string()));
        match self.next() {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(GenerationError::Other(message)),
            None => Ok(format!("Generated from: {prompt}")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// An encyclopedia with a fixed answer.
pub struct MockEncyclopedia {
    log: CallLog,
    result: Result<String, LookupError>,
}

impl MockEncyclopedia {
    /// Always return `text`.
    pub fn returning(log: CallLog, text: impl Into<String>) -> Self {
        Self {
            log,
            result: Ok(text.into()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(log: CallLog, error: LookupError) -> Self {
        Self {
            log,
            result: Err(error),
        }
    }
}

#[async_trait]
impl Encyclopedia for MockEncyclopedia {
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        self.log.record(Call::Lookup(query.to_string()));
        self.result.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_script_then_echo() {
        let log = CallLog::new();
        let generator = MockGenerator::new(log.clone()).reply("one").fail("boom");

        assert_eq!(generator.generate("a").await.unwrap(), "one");
        assert!(generator.generate("b").await.is_err());
        assert_eq!(generator.generate("c").await.unwrap(), "Generated from: c");
        assert_eq!(log.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_call_log_keeps_interleaved_order() {
        let log = CallLog::new();
        let generator = MockGenerator::new(log.clone());
        let encyclopedia = MockEncyclopedia::returning(log.clone(), "facts");

        generator.generate("first").await.unwrap();
        encyclopedia.lookup("coffee").await.unwrap();
        generator.generate("second").await.unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::Generate("first".to_string()),
                Call::Lookup("coffee".to_string()),
                Call::Generate("second".to_string()),
            ]
        );
        assert_eq!(log.queries(), vec!["coffee"]);
        assert_eq!(log.generate_count(), 2);
    }
}

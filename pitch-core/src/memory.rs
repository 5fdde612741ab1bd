//! Conversation memory for generation chains.
//!
//! Each chain keeps an append-only log of (input, output) turns. The log is
//! never trimmed or summarized; it exists so the UI can show the history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const HUMAN_PREFIX: &str = "Human";
const AI_PREFIX: &str = "AI";

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Value of the chain's designated input field.
    pub input: String,
    /// Text the backend produced.
    pub output: String,
    /// When the turn was appended.
    pub recorded_at: DateTime<Utc>,
}

/// Ordered, append-only log of turns for one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    /// Which input field of the chain is recorded as the turn input.
    input_key: String,
    turns: Vec<Turn>,
}

impl ConversationMemory {
    /// Create an empty memory that records the `input_key` field.
    pub fn new(input_key: impl Into<String>) -> Self {
        Self {
            input_key: input_key.into(),
            turns: Vec::new(),
        }
    }

    /// The designated input field name.
    pub fn input_key(&self) -> &str {
        &self.input_key
    }

    /// Add one turn at the end of the log.
    pub fn append(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.turns.push(Turn {
            input: input.into(),
            output: output.into(),
            recorded_at: Utc::now(),
        });
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Human-readable transcript of every turn.
    ///
    /// Each turn renders as `Human: <input>` then `AI: <output>`, one per line.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| {
                format!(
                    "{HUMAN_PREFIX}: {}\n{AI_PREFIX}: {}",
                    turn.input, turn.output
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

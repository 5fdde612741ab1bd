//! Sales pitch generation engine.
//!
//! This crate provides:
//! - Typed prompt templates with placeholders checked at construction
//! - Generation chains that record every turn in a conversation memory
//! - Wikipedia grounding between the title and the email generation steps
//! - Session-scoped orchestration so each user gets isolated transcripts
//!
//! # Quick Start
//!
//! ```ignore
//! use pitch_core::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!     let mut session = orchestrator.new_session()?;
//!
//!     let pitch = orchestrator.handle_submission(&mut session, "coffee").await?;
//!     println!("{}\n\n{}", pitch.title, pitch.script);
//!     Ok(())
//! }
//! ```

// Lets `#[derive(PromptInputs)]` expand to `::pitch_core::...` inside this crate too.
extern crate self as pitch_core;

pub mod chain;
pub mod config;
pub mod generator;
pub mod id;
pub mod memory;
pub mod orchestrator;
pub mod prompts;
pub mod research;
pub mod template;
pub mod testing;

// Derive macro for the trait of the same name.
pub use pitch_macros::PromptInputs;

// Primary public API
pub use chain::{ChainError, GenerationChain};
pub use config::{Config, ConfigError, WikipediaConfig};
pub use generator::{ClaudeGenerator, GenerationError, TextGenerator};
pub use id::SessionId;
pub use memory::{ConversationMemory, Turn};
pub use orchestrator::{Orchestrator, PitchError, Session, Submission};
pub use prompts::{ScriptInputs, TitleInputs};
pub use research::{Encyclopedia, LookupError, ResearchLookup, Wikipedia};
pub use template::{PromptInputs, PromptTemplate, TemplateError};
pub use testing::{Call, CallLog, MockEncyclopedia, MockGenerator};

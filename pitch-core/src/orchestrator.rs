//! Submission orchestration.
//!
//! The [`Orchestrator`] holds the shared backend, the research lookup and the
//! parsed prompts. Per-user state lives in a [`Session`], which owns the two
//! chains and their memories. A submission runs strictly in sequence:
//!
//! 1. title chain with the topic
//! 2. research lookup with the topic
//! 3. script chain with the title and the research
//!
//! The first failure stops the submission and is returned as-is.

use crate::chain::{ChainError, GenerationChain};
use crate::config::Config;
use crate::generator::{ClaudeGenerator, GenerationError, TextGenerator};
use crate::id::SessionId;
use crate::memory::ConversationMemory;
use crate::prompts::{
    script_template, title_template, ScriptInputs, TitleInputs, SCRIPT_MEMORY_KEY,
    TITLE_MEMORY_KEY,
};
use crate::research::{LookupError, ResearchLookup, Wikipedia};
use crate::template::{PromptTemplate, TemplateError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors from building the orchestrator or handling a submission.
#[derive(Debug, Error)]
pub enum PitchError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("Research lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Backend setup failed: {0}")]
    Backend(#[from] GenerationError),

    #[error("Topic is empty")]
    EmptyTopic,
}

/// Everything produced by one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub topic: String,
    pub title: String,
    pub script: String,
    pub wiki_research: String,
    /// Title chain transcript, including this submission.
    pub title_transcript: String,
    /// Script chain transcript, including this submission.
    pub script_transcript: String,
}

/// One user's conversation state.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    title_chain: GenerationChain<TitleInputs>,
    script_chain: GenerationChain<ScriptInputs>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Title chain memory.
    pub fn title_memory(&self) -> &ConversationMemory {
        self.title_chain.memory()
    }

    /// Script chain memory.
    pub fn script_memory(&self) -> &ConversationMemory {
        self.script_chain.memory()
    }

    /// Number of completed submissions.
    pub fn submissions(&self) -> usize {
        self.script_chain.memory().len()
    }
}

/// Runs submissions against a shared backend and research lookup.
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    research: ResearchLookup,
    title_template: Arc<PromptTemplate<TitleInputs>>,
    script_template: Arc<PromptTemplate<ScriptInputs>>,
}

impl Orchestrator {
    /// Create an orchestrator and parse both prompts.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        research: ResearchLookup,
    ) -> Result<Self, PitchError> {
        Ok(Self {
            generator,
            research,
            title_template: Arc::new(title_template()?),
            script_template: Arc::new(script_template()?),
        })
    }

    /// Wire the Claude backend and Wikipedia from configuration.
    pub fn from_config(config: &Config) -> Result<Self, PitchError> {
        let generator = ClaudeGenerator::from_config(config)?;
        let wikipedia = Wikipedia::new(&config.wikipedia)?;
        info!(
            model = generator.client().model(),
            wiki = wikipedia.api_url(),
            "Backends ready"
        );
        Self::new(Arc::new(generator), ResearchLookup::new(Arc::new(wikipedia)))
    }

    /// Start a session with empty memories.
    pub fn new_session(&self) -> Result<Session, PitchError> {
        let title_chain = GenerationChain::new(
            "title",
            Arc::clone(&self.title_template),
            Arc::clone(&self.generator),
            ConversationMemory::new(TITLE_MEMORY_KEY),
        )?;
        let script_chain = GenerationChain::new(
            "script",
            Arc::clone(&self.script_template),
            Arc::clone(&self.generator),
            ConversationMemory::new(SCRIPT_MEMORY_KEY),
        )?;

        let session = Session {
            id: SessionId::new(),
            title_chain,
            script_chain,
        };
        info!(session = %session.id.short(), "Session started");
        Ok(session)
    }

    /// Run title, research and script for one topic.
    #[instrument(skip(self, session), fields(session = %session.id.short()))]
    pub async fn handle_submission(
        &self,
        session: &mut Session,
        topic: &str,
    ) -> Result<Submission, PitchError> {
        if topic.trim().is_empty() {
            return Err(PitchError::EmptyTopic);
        }

        let title = session
            .title_chain
            .run(&TitleInputs {
                topic: topic.to_string(),
            })
            .await?;

        let wiki_research = self.research.run(topic).await?;

        let script = session
            .script_chain
            .run(&ScriptInputs {
                title: title.clone(),
                wikipedia_research: wiki_research.clone(),
            })
            .await?;

        info!(
            title_len = title.len(),
            script_len = script.len(),
            research_len = wiki_research.len(),
            "Submission complete"
        );

        Ok(Submission {
            topic: topic.to_string(),
            title,
            script,
            wiki_research,
            title_transcript: session.title_chain.memory().transcript(),
            script_transcript: session.script_chain.memory().transcript(),
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("backend", &self.generator.name())
            .field("research", &self.research)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, MockEncyclopedia, MockGenerator};

    fn orchestrator(generator: MockGenerator, research: MockEncyclopedia) -> Orchestrator {
        Orchestrator::new(
            Arc::new(generator),
            ResearchLookup::new(Arc::new(research)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_blank_topic_rejected_before_any_call() {
        let log = CallLog::new();
        let orchestrator = orchestrator(
            MockGenerator::new(log.clone()),
            MockEncyclopedia::returning(log.clone(), "facts"),
        );
        let mut session = orchestrator.new_session().unwrap();

        let err = orchestrator
            .handle_submission(&mut session, "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, PitchError::EmptyTopic));
        assert!(log.calls().is_empty());
        assert!(session.title_memory().is_empty());
    }

    #[tokio::test]
    async fn test_submission_bundles_transcripts() {
        let log = CallLog::new();
        let orchestrator = orchestrator(
            MockGenerator::new(log.clone())
                .reply("Brew Better")
                .reply("Dear customer, ..."),
            MockEncyclopedia::returning(log.clone(), "Page: Coffee\nSummary: A drink."),
        );
        let mut session = orchestrator.new_session().unwrap();

        let submission = orchestrator
            .handle_submission(&mut session, "coffee")
            .await
            .unwrap();

        assert_eq!(submission.topic, "coffee");
        assert_eq!(submission.title, "Brew Better");
        assert_eq!(submission.script, "Dear customer, ...");
        assert_eq!(submission.wiki_research, "Page: Coffee\nSummary: A drink.");
        assert_eq!(submission.title_transcript, "Human: coffee\nAI: Brew Better");
        assert_eq!(
            submission.script_transcript,
            "Human: Brew Better\nAI: Dear customer, ..."
        );
        assert_eq!(session.submissions(), 1);
    }

    #[tokio::test]
    async fn test_submission_serializes() {
        let orchestrator = orchestrator(
            MockGenerator::new(CallLog::new()),
            MockEncyclopedia::returning(CallLog::new(), "facts"),
        );
        let mut session = orchestrator.new_session().unwrap();
        let submission = orchestrator
            .handle_submission(&mut session, "tea")
            .await
            .unwrap();

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["topic"], "tea");
        assert_eq!(
            json["title"],
            "Generated from: Write me a sales pitch title about tea"
        );
        assert!(json["script_transcript"].as_str().unwrap().starts_with("Human: "));
    }
}

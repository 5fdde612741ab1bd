//! Research lookup between the title and script steps.
//!
//! [`ResearchLookup`] is a thin wrapper over an [`Encyclopedia`]; the
//! production encyclopedia is [`Wikipedia`].

pub mod wikipedia;

pub use wikipedia::Wikipedia;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors from an encyclopedia lookup.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("No usable encyclopedia result for '{query}'")]
    NoResults { query: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Encyclopedia API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse encyclopedia response: {0}")]
    Parse(String),

    #[error("Invalid lookup configuration: {0}")]
    Config(String),
}

/// A source of background text for a query.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Look up `query` and return summary text.
    async fn lookup(&self, query: &str) -> Result<String, LookupError>;

    /// Source name for logs.
    fn name(&self) -> &str;
}

/// Fetches research text for a topic.
#[derive(Clone)]
pub struct ResearchLookup {
    source: Arc<dyn Encyclopedia>,
}

impl ResearchLookup {
    pub fn new(source: Arc<dyn Encyclopedia>) -> Self {
        Self { source }
    }

    /// Look up `query`. Failures propagate; there is no fallback text.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn run(&self, query: &str) -> Result<String, LookupError> {
        let text = self.source.lookup(query).await.map_err(|e| {
            warn!(error = %e, "Lookup failed");
            e
        })?;

        if text.trim().is_empty() {
            return Err(LookupError::NoResults {
                query: query.to_string(),
            });
        }

        debug!(research_len = text.len(), "Research fetched");
        Ok(text)
    }
}

impl std::fmt::Debug for ResearchLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchLookup")
            .field("source", &self.source.name())
            .finish()
    }
}

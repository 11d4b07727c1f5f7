//! Helpdesk knowledge base: keyword rules plus similarity search over a small,
//! fixed set of help documents.
//!
//! - [`rules`]: ordered keyword rules (connectivity first).
//! - [`corpus`] / [`document`]: help texts and their vectors, built once.
//! - [`Matcher`]: rules first, then the best document above the threshold.
//! - [`EmbeddingsProvider`]: the narrow seam to the embedding backend.

mod config;
pub mod corpus;
pub mod document;
mod embed;
mod errors;
mod matcher;
pub mod rules;
pub mod similarity;

pub use config::{DEFAULT_SIMILARITY_THRESHOLD, MatcherConfig};
pub use corpus::{Corpus, CorpusEntry};
pub use document::{Document, DocumentHit, DocumentIndex};
pub use embed::{EmbeddingsProvider, service_embedder::ServiceEmbedder};
pub use errors::{KbError, Result};
pub use matcher::{Matcher, Outcome};
pub use rules::{GuidedTopic, KeywordRule, RuleAction};

use std::sync::Arc;

use tracing::info;

/// Embeds `corpus` and wires a matcher with the default rules.
pub async fn build_matcher(
    corpus: &Corpus,
    provider: Arc<dyn EmbeddingsProvider>,
    cfg: MatcherConfig,
) -> Result<Matcher> {
    let index = DocumentIndex::build(corpus, provider.as_ref()).await?;
    let matcher = Matcher::new(index, provider, cfg)?;
    info!(
        documents = matcher.index().len(),
        rules = matcher.rules().len(),
        threshold = matcher.config().threshold,
        "matcher ready"
    );
    Ok(matcher)
}

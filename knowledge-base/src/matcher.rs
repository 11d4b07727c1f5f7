//! Classifies free text into a guided flow, a canned answer, a document
//! excerpt or no match.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    config::MatcherConfig,
    document::DocumentIndex,
    embed::EmbeddingsProvider,
    errors::Result,
    rules::{GuidedTopic, KeywordRule, RuleAction, default_rules, first_match},
};

/// Result of [`Matcher::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Start a multi-step diagnostic branch.
    GuidedFlow { topic: GuidedTopic },
    /// Canned answer from a keyword rule.
    DirectAnswer { rule: &'static str, text: String },
    /// Closest help document, already formatted for the user.
    DocumentAnswer {
        topic: String,
        text: String,
        score: f32,
    },
    /// Nothing relevant found.
    NoMatch,
}

impl Outcome {
    /// Reply text for answer outcomes.
    pub fn answer_text(&self) -> Option<&str> {
        match self {
            Outcome::DirectAnswer { text, .. } | Outcome::DocumentAnswer { text, .. } => {
                Some(text)
            }
            Outcome::GuidedFlow { .. } | Outcome::NoMatch => None,
        }
    }
}

/// Keyword rules first, similarity search second.
///
/// Holds only immutable data; the same input always yields the same outcome
/// for a deterministic embedding backend.
pub struct Matcher {
    rules: Vec<KeywordRule>,
    index: DocumentIndex,
    provider: Arc<dyn EmbeddingsProvider>,
    cfg: MatcherConfig,
}

impl Matcher {
    /// Matcher with the default rule list.
    pub fn new(
        index: DocumentIndex,
        provider: Arc<dyn EmbeddingsProvider>,
        cfg: MatcherConfig,
    ) -> Result<Self> {
        Self::with_rules(default_rules(), index, provider, cfg)
    }

    pub fn with_rules(
        rules: Vec<KeywordRule>,
        index: DocumentIndex,
        provider: Arc<dyn EmbeddingsProvider>,
        cfg: MatcherConfig,
    ) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            rules,
            index,
            provider,
            cfg,
        })
    }

    /// Rule-only classification; `None` when no rule fires.
    pub fn classify_rules(&self, text: &str) -> Option<Outcome> {
        first_match(&self.rules, text).map(|rule| match &rule.action {
            RuleAction::GuidedFlow(topic) => Outcome::GuidedFlow { topic: *topic },
            RuleAction::DirectAnswer(answer) => Outcome::DirectAnswer {
                rule: rule.name,
                text: answer.clone(),
            },
        })
    }

    /// Full classification.
    ///
    /// # Errors
    /// Only when the embedding backend fails for the query text.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<Outcome> {
        if let Some(outcome) = self.classify_rules(text) {
            debug!(?outcome, "keyword rule matched");
            return Ok(outcome);
        }

        if text.trim().is_empty() {
            return Ok(Outcome::NoMatch);
        }

        let query = self.provider.embed(text).await?;
        let Some(hit) = self.index.best_match(&query, self.provider.as_ref()) else {
            return Ok(Outcome::NoMatch);
        };

        debug!(
            topic = %hit.document.topic,
            score = hit.score,
            threshold = self.cfg.threshold,
            "best document"
        );

        if hit.score > self.cfg.threshold {
            Ok(Outcome::DocumentAnswer {
                topic: hit.document.topic.clone(),
                text: format!(
                    "📄 Basado en la documentación de {}:\n\n{}",
                    capitalize(&hit.document.topic),
                    hit.document.body
                ),
                score: hit.score,
            })
        } else {
            Ok(Outcome::NoMatch)
        }
    }

    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

//! Embedded help documents, built once at startup.

use tracing::{debug, info, instrument};

use crate::{
    corpus::Corpus,
    embed::EmbeddingsProvider,
    errors::{KbError, Result},
};

/// A help document with its precomputed vector. Immutable after build.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub topic: String,
    pub body: String,
    pub embedding: Vec<f32>,
}

/// Best-scoring document for a query vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentHit<'a> {
    pub index: usize,
    pub document: &'a Document,
    pub score: f32,
}

/// Fixed set of embedded documents, in corpus order.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    documents: Vec<Document>,
}

impl DocumentIndex {
    /// Embeds every corpus body with `provider`.
    ///
    /// # Errors
    /// Propagates embedding failures; `KbError::VectorSizeMismatch` if the
    /// backend returns vectors of different sizes.
    #[instrument(skip_all, fields(documents = corpus.len()))]
    pub async fn build(corpus: &Corpus, provider: &dyn EmbeddingsProvider) -> Result<Self> {
        let mut documents = Vec::with_capacity(corpus.len());
        for entry in corpus.entries() {
            let embedding = provider.embed(&entry.body).await?;
            debug!(topic = %entry.topic, dim = embedding.len(), "document embedded");
            documents.push(Document {
                topic: entry.topic.clone(),
                body: entry.body.clone(),
                embedding,
            });
        }
        let index = Self::from_documents(documents)?;
        info!(documents = index.len(), dim = index.dim(), "document index ready");
        Ok(index)
    }

    /// Wraps documents whose vectors are already known.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(KbError::Config("document index has no documents".into()));
        }
        let want = documents[0].embedding.len();
        if let Some(bad) = documents.iter().find(|d| d.embedding.len() != want) {
            return Err(KbError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want,
            });
        }
        Ok(Self { documents })
    }

    /// Highest-scoring document. Ties keep the lowest index.
    pub fn best_match(
        &self,
        query: &[f32],
        provider: &dyn EmbeddingsProvider,
    ) -> Option<DocumentHit<'_>> {
        let mut best: Option<DocumentHit<'_>> = None;
        for (index, document) in self.documents.iter().enumerate() {
            let score = provider.similarity(query, &document.embedding);
            if score.is_nan() {
                continue;
            }
            // Strict `>` keeps the earliest document on ties.
            if best.is_none_or(|b| score > b.score) {
                best = Some(DocumentHit {
                    index,
                    document,
                    score,
                });
            }
        }
        best
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Vector size shared by all documents.
    pub fn dim(&self) -> usize {
        self.documents.first().map_or(0, |d| d.embedding.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{future::Future, pin::Pin};

    struct Unit;

    impl EmbeddingsProvider for Unit {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
            Box::pin(async { Ok(vec![1.0, 0.0]) })
        }
    }

    fn doc(topic: &str, v: Vec<f32>) -> Document {
        Document {
            topic: topic.into(),
            body: format!("{topic} body"),
            embedding: v,
        }
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let index = DocumentIndex::from_documents(vec![
            doc("a", vec![0.0, 1.0]),
            doc("b", vec![1.0, 0.0]),
            doc("c", vec![2.0, 0.0]),
        ])
        .unwrap();
        let hit = index.best_match(&[1.0, 0.0], &Unit).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.document.topic, "b");
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let err = DocumentIndex::from_documents(vec![doc("a", vec![1.0]), doc("b", vec![1.0, 2.0])])
            .unwrap_err();
        assert!(matches!(err, KbError::VectorSizeMismatch { got: 2, want: 1 }));
    }

    #[tokio::test]
    async fn build_embeds_each_body() {
        let index = DocumentIndex::build(&Corpus::reference(), &Unit).await.unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.dim(), 2);
    }
}

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use knowledge_base::{
    Corpus, CorpusEntry, DocumentIndex, EmbeddingsProvider, GuidedTopic, KbError, Matcher,
    MatcherConfig, Outcome, build_matcher,
};

/// Fixed text -> vector table; unknown text maps to `fallback`.
struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl TableEmbedder {
    fn new(pairs: &[(&str, Vec<f32>)], fallback: Vec<f32>) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            fallback,
        }
    }
}

impl EmbeddingsProvider for TableEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>> {
        let v = self.table.get(text).cloned().unwrap_or_else(|| self.fallback.clone());
        Box::pin(async move { Ok(v) })
    }
}

struct FailingEmbedder;

impl EmbeddingsProvider for FailingEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>> {
        Box::pin(async { Err(KbError::Config("backend down".into())) })
    }
}

fn small_corpus() -> Corpus {
    Corpus::new(vec![
        CorpusEntry::new("vpn", "VPN HELP"),
        CorpusEntry::new("audio", "AUDIO HELP"),
    ])
    .unwrap()
}

async fn matcher_with(queries: &[(&str, Vec<f32>)]) -> Matcher {
    let mut pairs = vec![("VPN HELP", vec![1.0, 0.0]), ("AUDIO HELP", vec![0.0, 1.0])];
    pairs.extend(queries.iter().cloned());
    let provider = Arc::new(TableEmbedder::new(&pairs, vec![0.0, 0.0]));
    build_matcher(&small_corpus(), provider, MatcherConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn network_keywords_win_over_everything() {
    let m = matcher_with(&[]).await;
    for text in [
        "no tengo internet",
        "Sin red en la oficina",
        "mi correo no sincroniza porque no hay internet",
        "la impresora de RED",
    ] {
        assert_eq!(
            m.classify(text).await.unwrap(),
            Outcome::GuidedFlow {
                topic: GuidedTopic::Connectivity
            },
            "{text}"
        );
    }
}

#[tokio::test]
async fn direct_answers_follow_rule_priority() {
    let m = matcher_with(&[]).await;
    match m.classify("Outlook no abre en mi pc").await.unwrap() {
        Outcome::DirectAnswer { rule, text } => {
            assert_eq!(rule, "email");
            assert!(text.contains("SMTP"));
        }
        other => panic!("unexpected {other:?}"),
    }
    match m.classify("mi computadora va lenta").await.unwrap() {
        Outcome::DirectAnswer { rule, .. } => assert_eq!(rule, "device"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn similarity_above_threshold_returns_document() {
    let m = matcher_with(&[("se corta la vpn", vec![0.9, 0.1])]).await;
    match m.classify("se corta la vpn").await.unwrap() {
        Outcome::DocumentAnswer { topic, text, score } => {
            assert_eq!(topic, "vpn");
            assert!(text.starts_with("📄 Basado en la documentación de Vpn:"));
            assert!(text.ends_with("VPN HELP"));
            assert!(score > 0.5);
        }
        other => panic!("unexpected {other:?}"),
    }
}

/// Every pair scores the same fixed value.
struct FixedScore(f32);

impl EmbeddingsProvider for FixedScore {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>> {
        Box::pin(async { Ok(vec![1.0]) })
    }

    fn similarity(&self, _a: &[f32], _b: &[f32]) -> f32 {
        self.0
    }
}

#[tokio::test]
async fn similarity_at_or_below_threshold_is_no_match() {
    let at = build_matcher(&small_corpus(), Arc::new(FixedScore(0.5)), MatcherConfig::default())
        .await
        .unwrap();
    assert_eq!(at.classify("carpeta compartida").await.unwrap(), Outcome::NoMatch);

    let above = build_matcher(&small_corpus(), Arc::new(FixedScore(0.51)), MatcherConfig::default())
        .await
        .unwrap();
    assert!(matches!(
        above.classify("carpeta compartida").await.unwrap(),
        Outcome::DocumentAnswer { .. }
    ));

    let m = matcher_with(&[("far away", vec![1.0, -3.0])]).await;
    assert_eq!(m.classify("far away").await.unwrap(), Outcome::NoMatch);
}

#[tokio::test]
async fn ties_choose_first_document() {
    let m = matcher_with(&[("both", vec![1.0, 1.0])]).await;
    match m.classify("both").await.unwrap() {
        Outcome::DocumentAnswer { topic, .. } => assert_eq!(topic, "vpn"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn classification_is_idempotent() {
    let m = matcher_with(&[("se corta la vpn", vec![0.8, 0.3])]).await;
    for text in ["se corta la vpn", "hola", "impresora", "no hay internet"] {
        let a = m.classify(text).await.unwrap();
        let b = m.classify(text).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn blank_input_is_no_match_without_embedding() {
    let index = DocumentIndex::from_documents(vec![knowledge_base::Document {
        topic: "vpn".into(),
        body: "VPN HELP".into(),
        embedding: vec![1.0],
    }])
    .unwrap();
    let m = Matcher::new(index, Arc::new(FailingEmbedder), MatcherConfig::default()).unwrap();
    assert_eq!(m.classify("   ").await.unwrap(), Outcome::NoMatch);
    assert!(m.classify("carpeta compartida").await.is_err());
    // Rules never touch the backend.
    assert!(matches!(
        m.classify("sin red").await.unwrap(),
        Outcome::GuidedFlow { .. }
    ));
}

#[tokio::test]
async fn invalid_threshold_is_rejected() {
    let index = DocumentIndex::from_documents(vec![knowledge_base::Document {
        topic: "vpn".into(),
        body: "VPN HELP".into(),
        embedding: vec![1.0],
    }])
    .unwrap();
    let cfg = MatcherConfig { threshold: 1.5 };
    assert!(Matcher::new(index, Arc::new(FailingEmbedder), cfg).is_err());
}

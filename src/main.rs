mod config;
mod telemetry;

use std::{error::Error, sync::Arc};

use api::AppState;
use embedding_service::EmbeddingService;
use helpdesk_flow::{ConversationEngine, CsvTicketStore, SessionStore};
use knowledge_base::{Corpus, ServiceEmbedder, build_matcher};
use telegram_transport::{Poller, TelegramClient};
use tokio::{sync::watch, task::JoinSet};
use tracing::{error, info, warn};

use crate::config::BotConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `.env` is optional; variables already in the environment win.
    dotenvy::dotenv().ok();
    telemetry::init()?;

    let cfg = BotConfig::from_env()?;
    info!(
        transport = %cfg.transport,
        provider = %cfg.embedding.provider,
        model = %cfg.embedding.model,
        tickets = %cfg.tickets_path.display(),
        "starting helpdesk bot"
    );

    let embeddings = Arc::new(EmbeddingService::new(cfg.embedding.clone())?);
    let health = embeddings.health().await;
    if !health.ok {
        warn!(message = %health.message, endpoint = %health.endpoint, "embedding backend not ready");
    }

    let corpus = match &cfg.kb_documents_path {
        Some(path) => Corpus::from_json_file(path)?,
        None => Corpus::reference(),
    };
    let provider = Arc::new(ServiceEmbedder::new(Arc::clone(&embeddings)));
    let matcher = Arc::new(build_matcher(&corpus, provider, cfg.matcher.clone()).await?);

    let engine = Arc::new(ConversationEngine::new(
        matcher,
        Arc::new(SessionStore::new()),
        Arc::new(CsvTicketStore::new(&cfg.tickets_path)),
    ));

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut transports: JoinSet<Result<&'static str, String>> = JoinSet::new();

    if let Some(tg) = cfg.telegram.clone() {
        let poller = Poller::new(TelegramClient::new(tg)?, Arc::clone(&engine));
        let stop = stop_rx.clone();
        transports.spawn(async move {
            tokio::select! {
                res = poller.run() => res.map(|_| "telegram").map_err(|e| e.to_string()),
                _ = stopped(stop) => Ok("telegram"),
            }
        });
    }

    if cfg.transport.http() {
        let state = Arc::new(AppState::new(Arc::clone(&engine), Arc::clone(&embeddings)));
        let addr = cfg.api_address.clone();
        let stop = stop_rx.clone();
        transports.spawn(async move {
            api::start(state, &addr, stopped(stop))
                .await
                .map(|_| "http")
                .map_err(|e| e.to_string())
        });
    }

    let mut failure: Option<String> = None;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown requested");
        }
        Some(joined) = transports.join_next() => {
            failure = transport_result(joined);
        }
    }

    let _ = stop_tx.send(true);
    while let Some(joined) = transports.join_next().await {
        if let Some(e) = transport_result(joined) {
            failure.get_or_insert(e);
        }
    }

    match failure {
        Some(e) => Err(e.into()),
        None => {
            info!("helpdesk bot stopped");
            Ok(())
        }
    }
}

/// Logs how a transport ended; returns the failure, if any.
fn transport_result(
    joined: Result<Result<&'static str, String>, tokio::task::JoinError>,
) -> Option<String> {
    match joined {
        Ok(Ok(name)) => {
            info!(transport = name, "transport stopped");
            None
        }
        Ok(Err(e)) => {
            error!(error = %e, "transport failed");
            Some(e)
        }
        Err(e) => {
            error!(error = %e, "transport task panicked");
            Some(e.to_string())
        }
    }
}

/// Resolves once the stop flag flips (or its sender is gone).
async fn stopped(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use helpdesk_flow::{
    ConversationEngine, ConversationState, InMemoryTicketStore, SessionStore, replies,
};
use knowledge_base::{Corpus, EmbeddingsProvider, KbError, MatcherConfig, build_matcher};
use serde_json::{Value, json};
use telegram_transport::{MAX_MESSAGE_LEN, Poller, TelegramClient, TelegramConfig, TelegramError};

struct ZeroEmbedder;

impl EmbeddingsProvider for ZeroEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>> {
        Box::pin(async { Ok(vec![0.0, 0.0]) })
    }
}

#[derive(Clone, Default)]
struct FakeApi {
    pending: Arc<Mutex<Vec<Value>>>,
    sent: Arc<Mutex<Vec<(i64, String)>>>,
    offsets: Arc<Mutex<Vec<Option<i64>>>>,
    too_long: Arc<Mutex<usize>>,
}

async fn get_updates(State(api): State<FakeApi>, Json(body): Json<Value>) -> Json<Value> {
    api.offsets
        .lock()
        .unwrap()
        .push(body.get("offset").and_then(Value::as_i64));
    let batch: Vec<Value> = api.pending.lock().unwrap().drain(..).collect();
    Json(json!({ "ok": true, "result": batch }))
}

/// Rejects texts over the Bot API length limit like the real API does.
async fn send_message(
    State(api): State<FakeApi>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let chat_id = body["chat_id"].as_i64().unwrap();
    let text = body["text"].as_str().unwrap().to_string();
    if text.encode_utf16().count() > MAX_MESSAGE_LEN {
        *api.too_long.lock().unwrap() += 1;
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message is too long"
            })),
        );
    }
    api.sent.lock().unwrap().push((chat_id, text.clone()));
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "result": {"message_id": 1, "chat": {"id": chat_id, "type": "private"}, "text": text}
        })),
    )
}

fn bot_api(api: &FakeApi) -> Router {
    Router::new()
        .route("/botTEST/getUpdates", post(get_updates))
        .route("/botTEST/sendMessage", post(send_message))
        .with_state(api.clone())
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

fn client(base: String) -> TelegramClient {
    let mut cfg = TelegramConfig::new("TEST");
    cfg.api_base = base;
    cfg.poll_timeout_secs = 0;
    TelegramClient::new(cfg).unwrap()
}

async fn engine() -> Arc<ConversationEngine> {
    let matcher = build_matcher(
        &Corpus::reference(),
        Arc::new(ZeroEmbedder),
        MatcherConfig::default(),
    )
    .await
    .unwrap();
    Arc::new(ConversationEngine::new(
        Arc::new(matcher),
        Arc::new(SessionStore::new()),
        Arc::new(InMemoryTicketStore::new()),
    ))
}

fn text_update(update_id: i64, user: i64, chat: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 0,
            "chat": {"id": chat, "type": "private"},
            "from": {"id": user, "is_bot": false, "first_name": "U"},
            "text": text
        }
    })
}

#[tokio::test]
async fn poll_once_routes_messages_and_advances_offset() {
    let api = FakeApi::default();
    api.pending.lock().unwrap().extend([
        text_update(1, 77, 55, "/start"),
        text_update(2, 88, 66, "hola"),
        text_update(3, 77, 55, "no tengo internet"),
        json!({"update_id": 4, "message": {"message_id": 4,
            "chat": {"id": 66, "type": "private"},
            "from": {"id": 99, "is_bot": true, "first_name": "Bot"}, "text": "/start"}}),
    ]);
    let base = serve(bot_api(&api)).await;

    let engine = engine().await;
    let poller = Poller::new(client(base), Arc::clone(&engine));

    let next = poller.poll_once(None).await.unwrap();
    assert_eq!(next, Some(5));

    let sent = api.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![
            (55, replies::START.to_string()),
            (55, replies::ASK_CONNECTION_TYPE.to_string()),
        ]
    );
    assert_eq!(
        engine.sessions().state_of("tg:77").await,
        Some(ConversationState::AskingConnectionType)
    );
    assert_eq!(engine.sessions().state_of("tg:88").await, None);

    // Empty batch keeps the offset and sends it back.
    assert_eq!(poller.poll_once(next).await.unwrap(), Some(5));
    assert_eq!(*api.offsets.lock().unwrap(), vec![None, Some(5)]);
}

#[tokio::test]
async fn long_ticket_summary_is_delivered_in_pieces() {
    let api = FakeApi::default();
    let description = "zqz ".repeat(1020);
    let steps = [
        "/start",
        "carpeta",
        "si",
        "Ana",
        "ana@x.com",
        description.as_str(),
        "alta",
    ];
    api.pending.lock().unwrap().extend(
        steps
            .iter()
            .enumerate()
            .map(|(i, text)| text_update(i as i64 + 1, 77, 55, text)),
    );
    let base = serve(bot_api(&api)).await;

    let engine = engine().await;
    let poller = Poller::new(client(base), Arc::clone(&engine));
    poller.poll_once(None).await.unwrap();

    assert_eq!(*api.too_long.lock().unwrap(), 0);
    let sent = api.sent.lock().unwrap().clone();
    assert!(sent.iter().all(|(_, t)| t.encode_utf16().count() <= MAX_MESSAGE_LEN));
    let echoed: usize = sent.iter().map(|(_, t)| t.matches("zqz").count()).sum();
    assert_eq!(echoed, 1020);
    assert_eq!(
        sent.last().map(|(_, t)| t.as_str()),
        Some(replies::SESSION_CLOSED)
    );
    assert_eq!(engine.sessions().state_of("tg:77").await, None);
}

#[tokio::test]
async fn commands_for_other_bots_are_skipped() {
    let api = FakeApi::default();
    api.pending.lock().unwrap().extend([
        text_update(1, 77, 55, "/start@helpdesk_bot"),
        text_update(2, 88, 55, "/start@otro_bot"),
        text_update(3, 77, 55, "/cancel@otro_bot"),
    ]);
    let base = serve(bot_api(&api)).await;

    let engine = engine().await;
    let poller =
        Poller::new(client(base), Arc::clone(&engine)).with_bot_username("HelpDesk_Bot");
    assert_eq!(poller.poll_once(None).await.unwrap(), Some(4));

    let sent = api.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![(55, replies::START.to_string())]);
    assert_eq!(
        engine.sessions().state_of("tg:77").await,
        Some(ConversationState::AwaitingProblem)
    );
    assert_eq!(engine.sessions().state_of("tg:88").await, None);
}

#[tokio::test]
async fn bad_token_stops_the_loop() {
    let app = Router::new().fallback(|| async {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
        )
    });
    let base = serve(app).await;

    let poller = Poller::new(client(base), engine().await);
    let err = poller.run().await.unwrap_err();
    assert!(matches!(err, TelegramError::Unauthorized));
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let app = Router::new().fallback(|| async {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 3",
                "parameters": {"retry_after": 3}
            })),
        )
    });
    let base = serve(app).await;

    let err = client(base).get_updates(None, 0).await.unwrap_err();
    assert!(matches!(
        err,
        TelegramError::RateLimited {
            retry_after_secs: Some(3)
        }
    ));
    assert!(!err.is_fatal());
}

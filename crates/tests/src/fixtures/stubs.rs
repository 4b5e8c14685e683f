use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Canned replies and failure switches for the stub OpenAI server.
pub struct StubOpenAiOptions {
    pub transcription_text: String,
    pub topic_reply: String,
    pub sentiment_reply: String,
    pub fail_transcription: bool,
    pub fail_topic: bool,
    pub fail_sentiment: bool,
}

impl Default for StubOpenAiOptions {
    fn default() -> Self {
        Self {
            transcription_text: "hello world".to_string(),
            topic_reply: "Greeting example".to_string(),
            sentiment_reply: r#"{"sentiment":"happy","confidence":0.92}"#.to_string(),
            fail_transcription: false,
            fail_topic: false,
            fail_sentiment: false,
        }
    }
}

struct OpenAiState {
    options: StubOpenAiOptions,
    transcription_calls: AtomicUsize,
    completion_calls: AtomicUsize,
    call_log: Mutex<Vec<&'static str>>,
}

/// In-process stand-in for the OpenAI API, recording every call.
#[derive(Clone)]
pub struct StubOpenAi {
    pub base_url: String,
    state: Arc<OpenAiState>,
}

impl StubOpenAi {
    pub async fn spawn(options: StubOpenAiOptions) -> Self {
        let state = Arc::new(OpenAiState {
            options,
            transcription_calls: AtomicUsize::new(0),
            completion_calls: AtomicUsize::new(0),
            call_log: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/audio/transcriptions", post(stub_transcription))
            .route("/chat/completions", post(stub_completion))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub OpenAI server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn transcription_calls(&self) -> usize {
        self.state.transcription_calls.load(Ordering::SeqCst)
    }

    pub fn completion_calls(&self) -> usize {
        self.state.completion_calls.load(Ordering::SeqCst)
    }

    /// Endpoint hits in arrival order: "transcription", "topic", "sentiment".
    pub fn call_log(&self) -> Vec<&'static str> {
        self.state.call_log.lock().unwrap().clone()
    }
}

async fn stub_transcription(State(state): State<Arc<OpenAiState>>) -> Response {
    state.transcription_calls.fetch_add(1, Ordering::SeqCst);
    state.call_log.lock().unwrap().push("transcription");

    if state.options.fail_transcription {
        return upstream_error("transcription backend exploded");
    }

    Json(json!({ "text": state.options.transcription_text })).into_response()
}

async fn stub_completion(
    State(state): State<Arc<OpenAiState>>,
    Json(body): Json<Value>,
) -> Response {
    state.completion_calls.fetch_add(1, Ordering::SeqCst);

    // The two completion calls share an endpoint; tell them apart by the
    // system message.
    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    if system.contains("sentiment") {
        state.call_log.lock().unwrap().push("sentiment");
        if state.options.fail_sentiment {
            return upstream_error("sentiment model unavailable");
        }
        completion_reply(&state.options.sentiment_reply)
    } else {
        state.call_log.lock().unwrap().push("topic");
        if state.options.fail_topic {
            return upstream_error("completion backend exploded");
        }
        completion_reply(&state.options.topic_reply)
    }
}

fn completion_reply(content: &str) -> Response {
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
    .into_response()
}

fn upstream_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": message } })),
    )
        .into_response()
}

/// Failure switches for the stub PostgREST server.
#[derive(Default)]
pub struct StubSupabaseOptions {
    pub fail_insert: bool,
    /// Acknowledge the insert with an empty representation.
    pub empty_insert: bool,
}

struct SupabaseState {
    options: StubSupabaseOptions,
    insert_calls: AtomicUsize,
    rows: Mutex<Vec<Value>>,
}

/// In-process stand-in for the Supabase REST endpoint, keeping inserted
/// rows in memory.
#[derive(Clone)]
pub struct StubSupabase {
    pub base_url: String,
    state: Arc<SupabaseState>,
}

impl StubSupabase {
    pub async fn spawn(options: StubSupabaseOptions) -> Self {
        let state = Arc::new(SupabaseState {
            options,
            insert_calls: AtomicUsize::new(0),
            rows: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/rest/v1/Transcriptions",
                post(stub_insert).get(stub_select),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub Supabase server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn insert_calls(&self) -> usize {
        self.state.insert_calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Value> {
        self.state.rows.lock().unwrap().clone()
    }
}

async fn stub_insert(State(state): State<Arc<SupabaseState>>, Json(body): Json<Value>) -> Response {
    state.insert_calls.fetch_add(1, Ordering::SeqCst);

    if state.options.fail_insert {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "connection to the database failed" })),
        )
            .into_response();
    }
    if state.options.empty_insert {
        return Json(json!([])).into_response();
    }

    let mut rows = state.rows.lock().unwrap();
    let id = rows.len() as i64 + 1;

    let mut stored = body;
    stored["id"] = json!(id);
    stored["created_at"] = json!(format!("2024-01-01T00:00:{:02}Z", id));
    rows.push(stored.clone());

    (StatusCode::CREATED, Json(json!([stored]))).into_response()
}

async fn stub_select(State(state): State<Arc<SupabaseState>>) -> Json<Value> {
    Json(Value::Array(state.rows.lock().unwrap().clone()))
}

//! Request handling for the chatbot service

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::auth;
use super::microserver::{self, HttpRequest, HttpResponse};
use crate::chatbot::Chatbot;
use crate::conversation::ConversationContext;
use crate::intent::Intent;

impl HttpRequest {
    /// Get header value by name (case-insensitive)
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl HttpResponse {
    fn json(status: u16, value: &impl Serialize) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// State shared by every connection thread
pub struct ServerState {
    start_time: Instant,
    version: String,
    chatbot: Chatbot,
}

impl ServerState {
    pub fn new(chatbot: Chatbot) -> Self {
        Self {
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            chatbot,
        }
    }

    fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// === API types ===

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    intents: usize,
}

#[derive(Serialize)]
struct IntentJson {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// POST /chatbot body
#[derive(Deserialize)]
struct ChatRequest {
    user_message: String,
    /// Absent or null on the first turn
    #[serde(default)]
    context: Option<ConversationContext>,
}

// === Helpers ===

fn with_security_headers(response: HttpResponse) -> HttpResponse {
    response
        .with_header("X-Content-Type-Options", "nosniff")
        .with_header("X-Frame-Options", "DENY")
}

fn json_error(status: u16, message: &str) -> HttpResponse {
    HttpResponse::json(status, &serde_json::json!({"error": message}))
}

// === Handlers ===

fn route_request(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    let response = match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/health") => handle_health(state),
        ("GET", "/intents") => handle_intents(),
        ("POST", "/chatbot") => handle_chatbot(request, state),
        _ => json_error(404, "Not found"),
    };
    with_security_headers(response)
}

fn handle_health(state: &ServerState) -> HttpResponse {
    HttpResponse::json(
        200,
        &HealthResponse {
            status: "ok".to_string(),
            version: state.version.clone(),
            uptime_secs: state.uptime_secs(),
            intents: Intent::ALL.len(),
        },
    )
}

fn handle_intents() -> HttpResponse {
    let catalog: Vec<IntentJson> = Intent::ALL
        .iter()
        .map(|&intent| IntentJson {
            intent,
            keywords: intent.keywords(),
        })
        .collect();
    HttpResponse::json(200, &catalog)
}

/// Handle POST /chatbot
fn handle_chatbot(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    let user = match auth::caller_email(request.header("Authorization")) {
        Ok(email) => email,
        Err(e) => {
            tracing::debug!(error = %e, "rejected caller");
            return json_error(401, "Unauthorized");
        }
    };

    if request.body.is_empty() {
        return json_error(400, "Missing request body");
    }

    let body: ChatRequest = match serde_json::from_slice(&request.body) {
        Ok(req) => req,
        Err(e) => return json_error(400, &format!("Invalid JSON: {}", e)),
    };

    let context = body.context.unwrap_or_default();
    match state.chatbot.respond(&body.user_message, &user, context) {
        Ok(reply) => HttpResponse::json(200, &reply),
        Err(e) => json_error(500, e.kind()),
    }
}

// === Transport ===
// One request per connection. Thread per connection.

fn handle_connection(stream: &mut (impl Read + Write), state: &ServerState) {
    let span = tracing::info_span!("request", id = %Uuid::new_v4());
    let _enter = span.enter();

    let response = match microserver::read_request(stream) {
        Some(Ok(request)) => {
            let response = route_request(&request, state);
            tracing::info!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                "handled"
            );
            response
        }
        Some(Err(e)) => {
            tracing::debug!(status = e.status, error = %e.message, "unreadable request");
            with_security_headers(json_error(e.status, &e.message))
        }
        None => return,
    };

    microserver::write_response(stream, &response);
}

/// Accept connections until the listener fails
pub fn accept_loop(listener: TcpListener, state: Arc<ServerState>) {
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    handle_connection(&mut stream, &state);
                    let _ = stream.shutdown(Shutdown::Write);
                });
            }
            Err(e) => tracing::warn!(error = %e, "accept failed"),
        }
    }
}

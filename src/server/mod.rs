//! HTTP surface for the chatbot
//!
//! Design: blocking HTTP microserver (no async/tokio). Models load once
//! before the listener opens; each connection gets its own thread and
//! shares the loaded chatbot.
//!
//! Routes:
//! - `GET /health`
//! - `GET /intents`
//! - `POST /chatbot` (bearer token carrying an `email` claim)

pub mod auth;
mod internal;
pub mod microserver;

use anyhow::{Context, Result};
use std::net::TcpListener;
use std::sync::Arc;

use crate::chatbot::Chatbot;
use crate::config::Config;

pub use internal::ServerState;

/// Options for the serve command
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
}

impl ServeOptions {
    /// Listener address from config, with CLI values taking precedence
    pub fn from_config(config: &Config, host: Option<String>, port: Option<u16>) -> Self {
        Self {
            host: host.unwrap_or_else(|| config.server.host.clone()),
            port: port.unwrap_or(config.server.port),
        }
    }
}

/// Load the chatbot and serve until the listener fails
pub fn execute(config: &Config, options: ServeOptions) -> Result<()> {
    let chatbot = Chatbot::load(config)?;
    let state = Arc::new(ServerState::new(chatbot));

    let addr = format!("{}:{}", options.host, options.port);
    if options.host != "127.0.0.1" && options.host != "localhost" {
        tracing::warn!(
            %addr,
            "binding beyond localhost; the server speaks plain HTTP, put a TLS proxy in front"
        );
    }

    let listener = TcpListener::bind(&addr).with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "listening");
    println!("Docentify chatbot listening on http://{}", addr);
    println!("   Press Ctrl+C to stop\n");

    internal::accept_loop(listener, state);
    Ok(())
}

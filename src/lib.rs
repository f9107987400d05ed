//! Docentify student-support chatbot
//!
//! A question escalates through four intent matchers (lemma, fuzzy,
//! embedding, classifier) until one is confident. The resolved intent is
//! answered from a fixed catalog or the platform database, and a small
//! retry counter round-tripped by the caller bounds how often the bot asks
//! the user to rephrase.

pub mod chatbot;
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod intent;
pub mod matchers;
pub mod models;
pub mod nlp;
pub mod onnx;
pub mod paths;
pub mod pipeline;
pub mod responder;
pub mod server;

// Re-export commonly used types
pub use chatbot::Chatbot;
pub use conversation::{ConversationContext, TurnReply};
pub use error::ChatError;
pub use intent::Intent;

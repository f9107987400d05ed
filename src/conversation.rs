//! Conversation retry tracking
//!
//! The core keeps no session store. The caller sends the context it got back
//! from the previous turn, and the next context is returned with every reply.

use serde::{Deserialize, Serialize};

/// Unresolved turns tolerated before the fallback message
pub const MAX_ATTEMPTS: u32 = 2;

/// Asked after an unresolved turn while retries remain
pub const CLARIFICATION_PROMPT: &str = "Não entendi sua pergunta. Pode repetir, por favor?";

/// Sent once retries are exhausted; points the user to human support
pub const FALLBACK_MESSAGE: &str = "Infelizmente não consegui entender sua solicitação.\n\
Mas fique tranquilo que o nosso suporte poderá lhe ajudar através do email\n\
---> docentify@gmail.com <---";

/// Per-conversation state round-tripped by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    #[serde(default, alias = "tentativas")]
    pub attempts: u32,
}

impl ConversationContext {
    pub fn new(attempts: u32) -> Self {
        Self { attempts }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }
}

/// Reply text plus the context for the next turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub message: String,
    pub context: ConversationContext,
}

impl TurnReply {
    /// Intent resolved: the counter is carried over untouched
    pub fn answered(message: String, context: ConversationContext) -> Self {
        Self { message, context }
    }

    /// Nothing understood: ask again, or give up and reset
    pub fn not_understood(context: ConversationContext) -> Self {
        if context.is_exhausted() {
            tracing::warn!(attempts = context.attempts, "retries exhausted, sending fallback");
            return Self {
                message: FALLBACK_MESSAGE.to_string(),
                context: ConversationContext::new(0),
            };
        }

        let next = ConversationContext::new(context.attempts + 1);
        tracing::info!(attempts = next.attempts, "asking user to rephrase");
        Self {
            message: CLARIFICATION_PROMPT.to_string(),
            context: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_misses_end_in_fallback() {
        let first = TurnReply::not_understood(ConversationContext::default());
        assert_eq!(first.message, CLARIFICATION_PROMPT);
        assert_eq!(first.context.attempts, 1);

        let second = TurnReply::not_understood(first.context);
        assert_eq!(second.message, CLARIFICATION_PROMPT);
        assert_eq!(second.context.attempts, 2);

        let third = TurnReply::not_understood(second.context);
        assert_eq!(third.message, FALLBACK_MESSAGE);
        assert_eq!(third.context.attempts, 0);
    }

    #[test]
    fn test_counter_above_cap_still_falls_back() {
        let reply = TurnReply::not_understood(ConversationContext::new(7));
        assert_eq!(reply.message, FALLBACK_MESSAGE);
        assert_eq!(reply.context, ConversationContext::default());
    }

    #[test]
    fn test_large_counter_from_caller_falls_back() {
        let ctx: ConversationContext = serde_json::from_str(r#"{"attempts": 300}"#).unwrap();
        assert_eq!(ctx.attempts, 300);

        let reply = TurnReply::not_understood(ctx);
        assert_eq!(reply.message, FALLBACK_MESSAGE);
        assert_eq!(reply.context.attempts, 0);
    }

    #[test]
    fn test_answer_keeps_counter() {
        let reply = TurnReply::answered("ok".into(), ConversationContext::new(2));
        assert_eq!(reply.context.attempts, 2);
    }

    #[test]
    fn test_fallback_mentions_support_email() {
        assert!(FALLBACK_MESSAGE.contains("docentify@gmail.com"));
        assert_eq!(FALLBACK_MESSAGE.lines().count(), 3);
    }

    #[test]
    fn test_wire_format() {
        let ctx: ConversationContext = serde_json::from_str(r#"{"tentativas": 1}"#).unwrap();
        assert_eq!(ctx.attempts, 1);

        let ctx: ConversationContext = serde_json::from_str("{}").unwrap();
        assert_eq!(ctx.attempts, 0);

        let json = serde_json::to_value(TurnReply::answered("oi".into(), ctx)).unwrap();
        assert_eq!(json, serde_json::json!({"message": "oi", "context": {"attempts": 0}}));
    }
}

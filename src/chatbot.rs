//! The chatbot turn
//!
//! One `Chatbot` is built at startup (both models are loaded exactly once)
//! and shared by every request. A turn is a pure function of the message,
//! the user and the context the caller sends; nothing is kept between turns.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::classifier::create_classifier;
use crate::config::Config;
use crate::conversation::{ConversationContext, TurnReply};
use crate::db::{QueryExecutor, SqliteExecutor};
use crate::embeddings::create_embedder;
use crate::error::ChatError;
use crate::matchers::{ClassifierMatcher, EmbeddingMatcher, FuzzyMatcher, IntentMatcher, LemmaMatcher};
use crate::pipeline::EscalationController;
use crate::responder::{ResponseCatalog, ResponseResolver};

pub struct Chatbot {
    controller: EscalationController,
    resolver: ResponseResolver,
}

impl Chatbot {
    pub fn new(controller: EscalationController, resolver: ResponseResolver) -> Self {
        Self {
            controller,
            resolver,
        }
    }

    /// Build the four stages, load both models and open the response catalog
    pub fn load(config: &Config) -> Result<Self> {
        let thresholds = &config.thresholds;

        let embedder = create_embedder(&config.models).context("Failed to load embedding model")?;
        let embedding = EmbeddingMatcher::new(embedder, thresholds.embedding)
            .context("Failed to embed intent labels")?;
        let classifier =
            create_classifier(&config.models).context("Failed to load classifier model")?;

        let stages: Vec<Box<dyn IntentMatcher>> = vec![
            Box::new(LemmaMatcher::catalog()),
            Box::new(FuzzyMatcher::new(thresholds.fuzzy)),
            Box::new(embedding),
            Box::new(ClassifierMatcher::new(classifier, thresholds.classifier)),
        ];

        let catalog = ResponseCatalog::default()
            .with_overrides(&config.responses)
            .context("Invalid [responses] table")?;
        let db: Arc<dyn QueryExecutor> = Arc::new(SqliteExecutor::new(&config.database.path));

        tracing::info!(
            embedding = %config.models.embedding,
            classifier = %config.models.classifier,
            database = %config.database.path.display(),
            "chatbot ready"
        );

        Ok(Self::new(
            EscalationController::new(stages),
            ResponseResolver::new(db, catalog),
        ))
    }

    /// Answer one message
    ///
    /// On error the caller keeps the context it sent; nothing was consumed.
    pub fn respond(
        &self,
        message: &str,
        user_id: &str,
        context: ConversationContext,
    ) -> Result<TurnReply, ChatError> {
        tracing::debug!(text = message, attempts = context.attempts, "turn received");

        let detection = match self.controller.resolve(message) {
            Ok(detection) => detection,
            Err(err) => {
                tracing::error!(error = %err, kind = err.kind(), "intent resolution failed");
                return Err(err);
            }
        };

        let detection = match detection {
            Some(detection) => detection,
            None => return Ok(TurnReply::not_understood(context)),
        };

        tracing::info!(intent = %detection.intent, stage = %detection.stage, "intent resolved");
        match self.resolver.resolve(detection.intent, user_id) {
            Ok(text) => Ok(TurnReply::answered(text, context)),
            Err(err) => {
                tracing::error!(error = %err, intent = %detection.intent, "response lookup failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{CLARIFICATION_PROMPT, FALLBACK_MESSAGE};
    use crate::db::{Row, Value};
    use crate::intent::Intent;
    use crate::matchers::Stage;
    use anyhow::anyhow;

    struct Fixed(Stage, Result<Option<Intent>, String>);

    impl IntentMatcher for Fixed {
        fn stage(&self) -> Stage {
            self.0
        }

        fn detect(&self, _text: &str) -> Result<Option<Intent>> {
            self.1.clone().map_err(|e| anyhow!(e))
        }
    }

    struct Rows(Vec<Row>);

    impl QueryExecutor for Rows {
        fn execute(&self, _query: &str, _params: &[Value]) -> Result<Vec<Row>> {
            Ok(self.0.clone())
        }
    }

    fn chatbot(answer: Result<Option<Intent>, String>) -> Chatbot {
        let controller = EscalationController::new(vec![Box::new(Fixed(Stage::Lemma, answer))]);
        let resolver = ResponseResolver::new(
            Arc::new(Rows(vec![vec![Value::from("Rust"), Value::Integer(2)]])),
            ResponseCatalog::default(),
        );
        Chatbot::new(controller, resolver)
    }

    #[test]
    fn test_resolved_turn_keeps_context() {
        let bot = chatbot(Ok(Some(Intent::Progress)));
        let reply = bot
            .respond("meu progresso", "ana@example.com", ConversationContext::new(1))
            .unwrap();
        assert_eq!(reply.message, "Rust: 2 etapas");
        assert_eq!(reply.context.attempts, 1);
    }

    #[test]
    fn test_unresolved_turns() {
        let bot = chatbot(Ok(None));
        let mut context = ConversationContext::default();

        for expected in [1, 2] {
            let reply = bot.respond("blablabla", "ana@example.com", context).unwrap();
            assert_eq!(reply.message, CLARIFICATION_PROMPT);
            assert_eq!(reply.context.attempts, expected);
            context = reply.context;
        }

        let reply = bot.respond("blablabla", "ana@example.com", context).unwrap();
        assert_eq!(reply.message, FALLBACK_MESSAGE);
        assert_eq!(reply.context.attempts, 0);
    }

    #[test]
    fn test_model_failure_is_not_a_clarification() {
        let bot = chatbot(Err("session poisoned".into()));
        let err = bot
            .respond("qualquer coisa", "ana@example.com", ConversationContext::default())
            .unwrap_err();
        assert!(matches!(err, ChatError::Model { stage: Stage::Lemma, .. }));
    }
}

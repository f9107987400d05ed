//! End-to-end chatbot turns over the real lemma and fuzzy stages, stand-in
//! models for the embedding and classifier stages, and a SQLite database.

use anyhow::{bail, Result};
use rusqlite::Connection;
use std::sync::Arc;
use tempfile::TempDir;

use docentify::classifier::SequenceClassifier;
use docentify::conversation::{CLARIFICATION_PROMPT, FALLBACK_MESSAGE};
use docentify::db::SqliteExecutor;
use docentify::embeddings::EmbeddingEngine;
use docentify::matchers::{
    fuzzy, ClassifierMatcher, EmbeddingMatcher, FuzzyMatcher, IntentMatcher, LemmaMatcher, Stage,
};
use docentify::pipeline::EscalationController;
use docentify::responder::{ResponseCatalog, ResponseResolver};
use docentify::{ChatError, Chatbot, ConversationContext, Intent};

const DIM: usize = 16;

/// Intent labels embed to one-hot vectors; a few phrases are placed near a
/// chosen intent; everything else lands on an unused axis.
struct StubEncoder {
    fail_on: Option<&'static str>,
}

impl EmbeddingEngine for StubEncoder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        if self.fail_on == Some(text) {
            bail!("onnx session failed");
        }

        let mut vector = vec![0.0; DIM];
        if let Some(intent) = Intent::from_label(text) {
            vector[intent.index()] = 1.0;
        } else if text == "xyzzy" {
            vector[Intent::Feedback.index()] = 0.9;
            vector[DIM - 1] = 0.1;
        } else {
            vector[DIM - 1] = 1.0;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "stub-encoder"
    }
}

/// Confident about "qwqwqw" only
struct StubClassifier;

impl SequenceClassifier for StubClassifier {
    fn logits(&mut self, text: &str) -> Result<Vec<f32>> {
        let mut logits = vec![0.0; Intent::ALL.len()];
        if text == "qwqwqw" {
            logits[Intent::Cancellation.index()] = 10.0;
        }
        Ok(logits)
    }

    fn model_name(&self) -> &str {
        "stub-classifier"
    }
}

fn platform_db(dir: &TempDir) -> SqliteExecutor {
    let path = dir.path().join("docentify.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Users (id INTEGER PRIMARY KEY, email TEXT);
         CREATE TABLE Courses (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE Enrollments (id INTEGER PRIMARY KEY, userId INTEGER, courseId INTEGER, isActive INTEGER);
         CREATE TABLE UserProgress (id INTEGER PRIMARY KEY, enrollmentId INTEGER, stepId INTEGER);

         INSERT INTO Users VALUES (1, 'ana@example.com'), (2, 'bia@example.com');
         INSERT INTO Courses VALUES (1, 'Rust'), (2, 'SQL'), (3, 'Redes');
         INSERT INTO Enrollments VALUES (1, 1, 1, 1), (2, 1, 2, 0), (3, 2, 3, 1);
         INSERT INTO UserProgress VALUES (1, 1, 10), (2, 1, 11), (3, 2, 20), (4, 3, 30);",
    )
    .unwrap();
    SqliteExecutor::new(&path)
}

fn chatbot_with(db: SqliteExecutor, encoder: StubEncoder) -> Chatbot {
    let stages: Vec<Box<dyn IntentMatcher>> = vec![
        Box::new(LemmaMatcher::catalog()),
        Box::new(FuzzyMatcher::new(fuzzy::DEFAULT_CUTOFF)),
        Box::new(EmbeddingMatcher::new(Box::new(encoder), 0.70).unwrap()),
        Box::new(ClassifierMatcher::new(Box::new(StubClassifier), 0.70)),
    ];
    Chatbot::new(
        EscalationController::new(stages),
        ResponseResolver::new(Arc::new(db), ResponseCatalog::default()),
    )
}

fn chatbot(dir: &TempDir) -> Chatbot {
    chatbot_with(platform_db(dir), StubEncoder { fail_on: None })
}

fn ask(bot: &Chatbot, message: &str, attempts: u32) -> (String, u32) {
    let reply = bot
        .respond(message, "ana@example.com", ConversationContext::new(attempts))
        .unwrap();
    (reply.message, reply.context.attempts)
}

#[test]
fn test_lemma_stage_answers_completion_time() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, attempts) = ask(&bot, "qual o prazo para terminar o curso?", 1);
    assert_eq!(
        message,
        "Seu tempo de conclusão varia de acordo com seu progresso no curso."
    );
    assert_eq!(attempts, 1);
}

#[test]
fn test_fuzzy_stage_corrects_typo() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, _) = ask(&bot, "senah", 0);
    assert_eq!(
        message,
        "Caso tenha esquecido sua senha, redefina-a na página de login."
    );
}

#[test]
fn test_embedding_stage() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, attempts) = ask(&bot, "xyzzy", 2);
    assert_eq!(message, "Você pode avaliar os cursos na seção 'Avaliações'.");
    assert_eq!(attempts, 2);
}

#[test]
fn test_classifier_stage() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, _) = ask(&bot, "qwqwqw", 0);
    assert_eq!(
        message,
        "Para cancelar sua matrícula, entre em contato com a instituição."
    );
}

#[test]
fn test_progress_from_database() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, _) = ask(&bot, "qual é o meu progresso?", 0);
    let mut lines: Vec<&str> = message.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["Rust: 2 etapas", "SQL: 1 etapas"]);
}

#[test]
fn test_progress_for_user_without_enrollments() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let reply = bot
        .respond("meu progresso", "novo@example.com", ConversationContext::default())
        .unwrap();
    assert_eq!(reply.message, "Você ainda não começou nenhum curso.");
}

#[test]
fn test_certificates_only_for_active_enrollments() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, _) = ask(&bot, "quero meu certificado", 0);
    assert_eq!(message, "Cursos com certificado: Rust");
}

#[test]
fn test_retry_protocol() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot(&dir);

    let (message, attempts) = ask(&bot, "blablabla", 0);
    assert_eq!((message.as_str(), attempts), (CLARIFICATION_PROMPT, 1));

    let (message, attempts) = ask(&bot, "blablabla", attempts);
    assert_eq!((message.as_str(), attempts), (CLARIFICATION_PROMPT, 2));

    let (message, attempts) = ask(&bot, "blablabla", attempts);
    assert_eq!((message.as_str(), attempts), (FALLBACK_MESSAGE, 0));
}

#[test]
fn test_model_failure_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot_with(
        platform_db(&dir),
        StubEncoder {
            fail_on: Some("blablabla"),
        },
    );

    let err = bot
        .respond("blablabla", "ana@example.com", ConversationContext::new(1))
        .unwrap_err();
    assert!(matches!(err, ChatError::Model { stage: Stage::Embedding, .. }));
}

#[test]
fn test_database_failure_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let bot = chatbot_with(
        SqliteExecutor::new(dir.path().join("missing.db")),
        StubEncoder { fail_on: None },
    );

    let err = bot
        .respond("meu progresso", "ana@example.com", ConversationContext::default())
        .unwrap_err();
    assert!(matches!(err, ChatError::Database { intent: Intent::Progress, .. }));

    // Static intents never touch the database
    let reply = bot
        .respond("esqueci a senha", "ana@example.com", ConversationContext::default())
        .unwrap();
    assert!(reply.message.contains("senha"));
}

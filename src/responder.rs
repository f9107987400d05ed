//! Response resolution
//!
//! Turns a resolved intent into the reply text. Progress and certificate
//! questions are answered from the database, scoped to the asking user;
//! every other intent has a fixed answer.

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{QueryExecutor, Row, Value};
use crate::error::ChatError;
use crate::intent::Intent;

/// Reply when an intent has no database query and no canned text
pub const UNHANDLED_INTENT: &str = "Não encontrei informações relevantes para sua pergunta.";

/// Steps completed per course for the user
pub const PROGRESS_QUERY: &str = "
    SELECT c.name, COUNT(up.stepId)
    FROM UserProgress up
    JOIN Enrollments e ON up.enrollmentId = e.id
    JOIN Users u ON e.userId = u.id
    JOIN Courses c ON e.courseId = c.id
    WHERE u.email = ?1 GROUP BY c.name";

/// Active enrollments of the user (eligible for a certificate)
pub const CERTIFICATE_QUERY: &str = "
    SELECT c.name
    FROM Courses c
    JOIN Enrollments e ON c.id = e.courseId
    JOIN Users u ON e.userId = u.id
    WHERE u.email = ?1 AND e.isActive = 1";

const NO_PROGRESS: &str = "Você ainda não começou nenhum curso.";
const NO_CERTIFICATE: &str = "Nenhum certificado disponível.";

/// Fixed replies per intent
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    replies: HashMap<Intent, String>,
}

impl ResponseCatalog {
    /// No canned replies at all
    pub fn empty() -> Self {
        Self {
            replies: HashMap::new(),
        }
    }

    /// Replace (or add) the reply for an intent
    pub fn with_reply(mut self, intent: Intent, reply: impl Into<String>) -> Self {
        self.replies.insert(intent, reply.into());
        self
    }

    /// Apply label-keyed overrides, rejecting labels outside the catalog
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Result<Self> {
        for (label, reply) in overrides {
            let intent = match Intent::from_label(label) {
                Some(intent) => intent,
                None => bail!("Unknown intent '{}' in [responses]", label),
            };
            self.replies.insert(intent, reply.clone());
        }
        Ok(self)
    }

    pub fn get(&self, intent: Intent) -> Option<&str> {
        self.replies.get(&intent).map(String::as_str)
    }
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        let replies = [
            (Intent::CompletionTime, "Seu tempo de conclusão varia de acordo com seu progresso no curso."),
            (Intent::Support, "Entre em contato com suporte pelo email docentify@gmail.com"),
            (Intent::Feedback, "Você pode avaliar os cursos na seção 'Avaliações'."),
            (Intent::Institution, "Consulte sua instituição no seu painel de cursos."),
            (Intent::Duration, "Os cursos têm durações variadas, conforme o conteúdo."),
            (Intent::MyCourses, "Seus cursos estão listados no painel de controle."),
            (Intent::MandatoryCourses, "Consulte a instituição para saber os cursos obrigatórios."),
            (Intent::NextModule, "O próximo módulo pode ser acessado no painel do curso."),
            (Intent::Completion, "Você pode verificar sua conclusão no seu painel de aluno."),
            (Intent::Password, "Caso tenha esquecido sua senha, redefina-a na página de login."),
            (Intent::ChangeEmail, "Para alterar seu email, acesse suas configurações de perfil."),
            (Intent::Cancellation, "Para cancelar sua matrícula, entre em contato com a instituição."),
            (Intent::Activities, "Acesse seu painel para ver atividades pendentes e concluídas."),
        ];

        Self {
            replies: replies
                .into_iter()
                .map(|(intent, reply)| (intent, reply.to_string()))
                .collect(),
        }
    }
}

/// Produces the reply text for a resolved intent
pub struct ResponseResolver {
    db: Arc<dyn QueryExecutor>,
    catalog: ResponseCatalog,
}

impl ResponseResolver {
    pub fn new(db: Arc<dyn QueryExecutor>, catalog: ResponseCatalog) -> Self {
        Self { db, catalog }
    }

    /// Reply for `intent`, scoped to `user_id` where data is per-user
    pub fn resolve(&self, intent: Intent, user_id: &str) -> Result<String, ChatError> {
        match intent {
            Intent::Progress => {
                let rows = self.lookup(intent, PROGRESS_QUERY, user_id)?;
                Ok(format_progress(&rows))
            }
            Intent::Certificate => {
                let rows = self.lookup(intent, CERTIFICATE_QUERY, user_id)?;
                Ok(format_certificates(&rows))
            }
            _ => Ok(self
                .catalog
                .get(intent)
                .unwrap_or(UNHANDLED_INTENT)
                .to_string()),
        }
    }

    fn lookup(&self, intent: Intent, query: &str, user_id: &str) -> Result<Vec<Row>, ChatError> {
        let rows = self
            .db
            .execute(query, &[Value::from(user_id)])
            .map_err(|source| ChatError::Database { intent, source })?;
        tracing::debug!(%intent, rows = rows.len(), "database lookup");
        Ok(rows)
    }
}

fn column(row: &Row, index: usize) -> String {
    row.get(index).map(Value::to_string).unwrap_or_default()
}

/// One "<course>: <n> etapas" line per course
fn format_progress(rows: &[Row]) -> String {
    if rows.is_empty() {
        return NO_PROGRESS.to_string();
    }
    rows.iter()
        .map(|row| format!("{}: {} etapas", column(row, 0), column(row, 1)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_certificates(rows: &[Row]) -> String {
    if rows.is_empty() {
        return NO_CERTIFICATE.to_string();
    }
    let names: Vec<String> = rows.iter().map(|row| column(row, 0)).collect();
    format!("Cursos com certificado: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use parking_lot::Mutex;

    /// Returns canned rows and remembers what it was asked
    #[derive(Default)]
    struct Recorder {
        rows: Vec<Row>,
        calls: Mutex<Vec<(String, Vec<Value>)>>,
        fail: bool,
    }

    impl QueryExecutor for Recorder {
        fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<Row>> {
            self.calls.lock().push((query.to_string(), params.to_vec()));
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.rows.clone())
        }
    }

    fn resolver(db: Recorder) -> (ResponseResolver, Arc<Recorder>) {
        let db = Arc::new(db);
        (
            ResponseResolver::new(db.clone(), ResponseCatalog::default()),
            db,
        )
    }

    #[test]
    fn test_progress_rows_formatted() {
        let (resolver, db) = resolver(Recorder {
            rows: vec![
                vec![Value::from("Rust"), Value::Integer(3)],
                vec![Value::from("SQL"), Value::Integer(1)],
            ],
            ..Default::default()
        });

        let reply = resolver.resolve(Intent::Progress, "ana@example.com").unwrap();
        assert_eq!(reply, "Rust: 3 etapas\nSQL: 1 etapas");

        let calls = db.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PROGRESS_QUERY);
        assert_eq!(calls[0].1, vec![Value::from("ana@example.com")]);
    }

    #[test]
    fn test_progress_without_rows() {
        let (resolver, _) = resolver(Recorder::default());
        assert_eq!(
            resolver.resolve(Intent::Progress, "ana@example.com").unwrap(),
            "Você ainda não começou nenhum curso."
        );
    }

    #[test]
    fn test_certificates_formatted() {
        let (resolver, db) = resolver(Recorder {
            rows: vec![vec![Value::from("Rust")], vec![Value::from("SQL")]],
            ..Default::default()
        });
        assert_eq!(
            resolver.resolve(Intent::Certificate, "ana@example.com").unwrap(),
            "Cursos com certificado: Rust, SQL"
        );
        assert_eq!(db.calls.lock()[0].0, CERTIFICATE_QUERY);
    }

    #[test]
    fn test_certificates_without_rows() {
        let (resolver, _) = resolver(Recorder::default());
        assert_eq!(
            resolver.resolve(Intent::Certificate, "ana@example.com").unwrap(),
            "Nenhum certificado disponível."
        );
    }

    #[test]
    fn test_canned_reply_skips_database() {
        let (resolver, db) = resolver(Recorder::default());
        assert_eq!(
            resolver.resolve(Intent::CompletionTime, "ana@example.com").unwrap(),
            "Seu tempo de conclusão varia de acordo com seu progresso no curso."
        );
        assert!(db.calls.lock().is_empty());
    }

    #[test]
    fn test_every_static_intent_has_a_reply() {
        let catalog = ResponseCatalog::default();
        for intent in Intent::ALL {
            if matches!(intent, Intent::Progress | Intent::Certificate) {
                continue;
            }
            assert!(catalog.get(intent).is_some(), "{} has no canned reply", intent);
        }
    }

    #[test]
    fn test_missing_reply_falls_back_to_unhandled() {
        let catalog = ResponseCatalog::empty().with_reply(Intent::Support, "suporte@example.com");
        let resolver = ResponseResolver::new(Arc::new(Recorder::default()), catalog);
        assert_eq!(
            resolver.resolve(Intent::Password, "ana@example.com").unwrap(),
            UNHANDLED_INTENT
        );
        assert_eq!(
            resolver.resolve(Intent::Support, "ana@example.com").unwrap(),
            "suporte@example.com"
        );
    }

    #[test]
    fn test_database_failure_is_an_error() {
        let (resolver, _) = resolver(Recorder {
            fail: true,
            ..Default::default()
        });
        let err = resolver
            .resolve(Intent::Progress, "ana@example.com")
            .unwrap_err();
        assert!(matches!(err, ChatError::Database { intent: Intent::Progress, .. }));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("senha".to_string(), "Use o link 'Esqueci minha senha'.".to_string());
        let catalog = ResponseCatalog::default().with_overrides(&overrides).unwrap();
        assert_eq!(catalog.get(Intent::Password), Some("Use o link 'Esqueci minha senha'."));

        overrides.insert("graduacao".to_string(), "?".to_string());
        assert!(ResponseCatalog::default().with_overrides(&overrides).is_err());
    }
}

//! Intent catalog
//!
//! The closed set of question categories the chatbot understands. Catalog
//! order is fixed and is the tie-break order for every matcher stage: the
//! first intent reaching the best score wins.
//!
//! Each intent's label doubles as its identifier. The fuzzy stage matches
//! user words against label spelling and returns the label it hit, so the
//! two must stay the same string (`Intent::from_label(i.label()) == Some(i)`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// User question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intent {
    /// How long until the course is finished
    #[serde(rename = "tempo_conclusao")]
    CompletionTime,
    /// Steps completed per course (database-backed)
    #[serde(rename = "progresso")]
    Progress,
    /// Courses eligible for a certificate (database-backed)
    #[serde(rename = "certificado")]
    Certificate,
    #[serde(rename = "suporte")]
    Support,
    #[serde(rename = "feedback")]
    Feedback,
    #[serde(rename = "instituicao")]
    Institution,
    #[serde(rename = "duracao")]
    Duration,
    #[serde(rename = "meus_cursos")]
    MyCourses,
    #[serde(rename = "obrigatorios")]
    MandatoryCourses,
    #[serde(rename = "proximo_modulo")]
    NextModule,
    #[serde(rename = "conclusao")]
    Completion,
    #[serde(rename = "senha")]
    Password,
    #[serde(rename = "alterar_email")]
    ChangeEmail,
    #[serde(rename = "cancelamento")]
    Cancellation,
    #[serde(rename = "atividades")]
    Activities,
}

impl Intent {
    /// Every intent, in catalog order
    pub const ALL: [Intent; 15] = [
        Intent::CompletionTime,
        Intent::Progress,
        Intent::Certificate,
        Intent::Support,
        Intent::Feedback,
        Intent::Institution,
        Intent::Duration,
        Intent::MyCourses,
        Intent::MandatoryCourses,
        Intent::NextModule,
        Intent::Completion,
        Intent::Password,
        Intent::ChangeEmail,
        Intent::Cancellation,
        Intent::Activities,
    ];

    /// Catalog label, which is also the wire identifier
    pub fn label(self) -> &'static str {
        match self {
            Intent::CompletionTime => "tempo_conclusao",
            Intent::Progress => "progresso",
            Intent::Certificate => "certificado",
            Intent::Support => "suporte",
            Intent::Feedback => "feedback",
            Intent::Institution => "instituicao",
            Intent::Duration => "duracao",
            Intent::MyCourses => "meus_cursos",
            Intent::MandatoryCourses => "obrigatorios",
            Intent::NextModule => "proximo_modulo",
            Intent::Completion => "conclusao",
            Intent::Password => "senha",
            Intent::ChangeEmail => "alterar_email",
            Intent::Cancellation => "cancelamento",
            Intent::Activities => "atividades",
        }
    }

    /// Look up an intent by its catalog label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }

    /// Position in the catalog (also the classifier output index)
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&intent| intent == self)
            .unwrap_or_default()
    }

    /// Normalized keyword lemmas that signal this intent
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Intent::CompletionTime => &["tempo", "concluir", "restar", "prazo", "terminar", "estimar"],
            Intent::Progress => &["progresso", "etapa", "andamento", "evoluir"],
            Intent::Certificate => &["certificado", "diploma"],
            Intent::Support => &["ajudar", "suporte", "atender", "socorrer"],
            Intent::Feedback => &["avaliar", "comentar", "opinar"],
            Intent::Institution => &["instituição", "faculdade", "universidade", "escola"],
            Intent::Duration => &["duração", "tempo", "limitar", "período"],
            Intent::MyCourses => &["curso", "aula", "matricular", "inscrever"],
            Intent::MandatoryCourses => &["obrigar", "necessário", "requisito", "exigir"],
            Intent::NextModule => &[
                "módulo", "seguir", "etapa", "próximo", "passar", "lição", "depois",
            ],
            Intent::Completion => &["concluir", "finalizar", "terminar", "completar", "encerrar"],
            Intent::Password => &["senha", "acesso", "login", "esquecer"],
            Intent::ChangeEmail => &["email", "mudar", "trocar", "atualizar", "corrigir", "editar"],
            Intent::Cancellation => &["cancelar", "remover", "excluir", "desativar"],
            Intent::Activities => &["atividade", "tarefa", "pendência", "exercício", "entregar"],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

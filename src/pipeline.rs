//! Intent escalation
//!
//! Runs the matcher stages in a fixed order and stops at the first one that
//! names an intent. Every stage is tried in turn; nothing is skipped based
//! on what the question looks like.

use crate::error::ChatError;
use crate::intent::Intent;
use crate::matchers::{IntentMatcher, Stage};

/// A resolved intent and the stage that found it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub intent: Intent,
    pub stage: Stage,
}

/// Ordered matcher stages
pub struct EscalationController {
    stages: Vec<Box<dyn IntentMatcher>>,
}

impl EscalationController {
    /// Stages run in the order given
    pub fn new(stages: Vec<Box<dyn IntentMatcher>>) -> Self {
        Self { stages }
    }

    /// Stage order, for diagnostics
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.iter().map(|matcher| matcher.stage()).collect()
    }

    /// First confident intent, `Ok(None)` when every stage declines
    ///
    /// A failing stage aborts escalation with [`ChatError::Model`]; it is not
    /// treated as "no match".
    pub fn resolve(&self, text: &str) -> Result<Option<Detection>, ChatError> {
        for matcher in &self.stages {
            let stage = matcher.stage();
            match matcher.detect(text) {
                Ok(Some(intent)) => {
                    tracing::debug!(%stage, %intent, "stage matched");
                    return Ok(Some(Detection { intent, stage }));
                }
                Ok(None) => tracing::debug!(%stage, "stage found no match"),
                Err(source) => return Err(ChatError::Model { stage, source }),
            }
        }
        Ok(None)
    }
}

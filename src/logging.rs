use crate::context::Context;
use crate::error::{Violation, ViolationKind};
use crate::key::ContextKey;

/// Gate stage being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Authenticated,
    Authorized,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Authenticated => "authenticated",
            Stage::Authorized => "authorized",
        }
    }
}

/// Decision logger for one stage of one call.
///
/// Every event carries the request ID and the gate's key fingerprint so
/// decisions from nested gates can be told apart.
#[derive(Debug)]
pub(crate) struct StageLog<'a> {
    request_id: &'a str,
    gate: String,
    stage: Stage,
}

impl<'a> StageLog<'a> {
    pub(crate) fn new(ctx: &'a Context, key: &ContextKey, stage: Stage) -> Self {
        Self {
            request_id: ctx.request_id(),
            gate: key.fingerprint(),
            stage,
        }
    }

    /// Logs an accepted call.
    pub(crate) fn accepted(&self, principal_id: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            gate = %self.gate,
            stage = self.stage.as_str(),
            principal = %principal_id,
            "access granted"
        );
    }

    /// Logs a rejection and returns the violation for the caller to propagate.
    pub(crate) fn rejected(&self, kind: ViolationKind, message: impl Into<String>) -> Violation {
        let violation = Violation::new(kind, message);
        match kind {
            ViolationKind::Canceled => tracing::debug!(
                request_id = %self.request_id,
                gate = %self.gate,
                stage = self.stage.as_str(),
                kind = kind.as_str(),
                "call canceled before gate stage"
            ),
            _ => tracing::warn!(
                request_id = %self.request_id,
                gate = %self.gate,
                stage = self.stage.as_str(),
                kind = kind.as_str(),
                "{}",
                violation.message
            ),
        }
        violation
    }
}

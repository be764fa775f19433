use std::fmt;

/// Errors returned by an endpoint wrapped in an [`Authenticator`](crate::Authenticator).
#[derive(Debug)]
pub enum Error {
    /// The gate rejected the call before the next handler ran
    Violation(Violation),
    /// A downstream handler failed
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a downstream handler failure.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }

    /// Returns the violation kind if the gate rejected the call.
    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            Error::Violation(v) => Some(v.kind),
            Error::Handler(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Violation(v) => write!(f, "Access denied: {}", v),
            Error::Handler(e) => write!(f, "Handler failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Violation(v) => Some(v),
            Error::Handler(e) => Some(e.as_ref()),
        }
    }
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Error::Violation(v)
    }
}

/// A rejected call with details about which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of gate rejection.
///
/// Every kind is terminal for the current call. The kinds stay distinct so
/// callers can map them to different responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The payload is not an identity claim, or no principal is bound under the gate's key
    UnknownPrincipal,
    /// The principal was recognised but the authentication predicate rejected it
    Unauthenticated,
    /// The payload is not a subject, or the subject is null or empty
    UnknownSubject,
    /// The authorization predicate rejected the principal for this subject
    Unauthorized,
    /// The call context was canceled before the stage ran
    Canceled,
}

impl ViolationKind {
    /// Conventional HTTP status code for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ViolationKind::UnknownPrincipal => 400,
            ViolationKind::Unauthenticated => 401,
            ViolationKind::UnknownSubject => 400,
            ViolationKind::Unauthorized => 403,
            // Client closed request
            ViolationKind::Canceled => 499,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ViolationKind::UnknownPrincipal => "unknown_principal",
            ViolationKind::Unauthenticated => "unauthenticated",
            ViolationKind::UnknownSubject => "unknown_subject",
            ViolationKind::Unauthorized => "unauthorized",
            ViolationKind::Canceled => "canceled",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::UnknownPrincipal => write!(f, "Unknown principal"),
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::UnknownSubject => write!(f, "Unknown subject"),
            ViolationKind::Unauthorized => write!(f, "Unauthorized"),
            ViolationKind::Canceled => write!(f, "Canceled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_includes_kind_and_message() {
        let v = Violation::new(ViolationKind::Unauthorized, "alice may not read doc-2");
        assert_eq!(v.to_string(), "Unauthorized: alice may not read doc-2");
    }

    #[test]
    fn error_exposes_violation_kind() {
        let err: Error = Violation::new(ViolationKind::UnknownSubject, "null subject").into();
        assert_eq!(err.violation_kind(), Some(ViolationKind::UnknownSubject));
        assert!(err.to_string().starts_with("Access denied"));
    }

    #[test]
    fn handler_errors_have_no_violation_kind() {
        let err = Error::handler("storage offline");
        assert_eq!(err.violation_kind(), None);
        assert_eq!(err.to_string(), "Handler failed: storage offline");
    }

    #[test]
    fn status_codes_separate_authn_from_authz() {
        assert_eq!(ViolationKind::Unauthenticated.status_code(), 401);
        assert_eq!(ViolationKind::Unauthorized.status_code(), 403);
        assert_ne!(
            ViolationKind::UnknownPrincipal.as_str(),
            ViolationKind::UnknownSubject.as_str()
        );
    }
}

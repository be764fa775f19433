//! Identity types and the payload classification carried by each call.

/// A caller identity claim.
///
/// The gate never inspects a principal; only the caller's predicates do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Unique identifier for this principal
    pub id: String,
}

impl Principal {
    /// Creates a principal with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The resource (and optionally the action) a call targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
    /// Resource identifier
    pub resource: String,
    /// Action requested on the resource, if the caller distinguishes actions
    pub action: Option<String>,
}

impl Subject {
    /// Creates a subject for a resource with no specific action.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: None,
        }
    }

    /// Sets the action requested on the resource.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Returns `true` if the resource identifier is empty or whitespace.
    ///
    /// Empty subjects are never authorizable.
    pub fn is_empty(&self) -> bool {
        self.resource.trim().is_empty()
    }
}

/// The inbound payload of a call, classified by shape.
///
/// The authentication stage reads the principal half, the authorization
/// stage reads the subject half. A [`Payload::Claim`] carries both so a
/// single payload can pass through a whole gate.
///
/// # Examples
///
/// ```
/// use auth_gate::{Payload, Principal, Subject};
///
/// let payload = Payload::claim(Principal::new("alice"), Subject::new("doc-1"));
/// assert_eq!(payload.principal().map(|p| p.id.as_str()), Some("alice"));
/// assert!(matches!(payload.subject(), Some(Some(s)) if s.resource == "doc-1"));
///
/// let opaque = Payload::Opaque("ping".to_string());
/// assert!(opaque.principal().is_none());
/// assert!(opaque.subject().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// An identity claim on its own
    Principal(Principal),
    /// A target on its own; `None` is a null subject
    Subject(Option<Subject>),
    /// An identity claim together with its target
    Claim {
        /// Who is calling
        principal: Principal,
        /// What the call targets; `None` is a null subject
        subject: Option<Subject>,
    },
    /// Anything that is neither a principal nor a subject
    Opaque(String),
}

impl Payload {
    /// Builds a claim payload carrying both halves.
    pub fn claim(principal: Principal, subject: Subject) -> Self {
        Payload::Claim {
            principal,
            subject: Some(subject),
        }
    }

    /// Returns the principal half, if this payload is an identity claim.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Payload::Principal(p) | Payload::Claim { principal: p, .. } => Some(p),
            Payload::Subject(_) | Payload::Opaque(_) => None,
        }
    }

    /// Returns the subject half.
    ///
    /// The outer `Option` says whether the payload is a subject at all; the
    /// inner one is `None` for a null subject.
    pub fn subject(&self) -> Option<Option<&Subject>> {
        match self {
            Payload::Subject(s) | Payload::Claim { subject: s, .. } => Some(s.as_ref()),
            Payload::Principal(_) | Payload::Opaque(_) => None,
        }
    }
}

impl From<Principal> for Payload {
    fn from(p: Principal) -> Self {
        Payload::Principal(p)
    }
}

impl From<Subject> for Payload {
    fn from(s: Subject) -> Self {
        Payload::Subject(Some(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_subject_is_empty() {
        assert!(Subject::new("").is_empty());
        assert!(Subject::new("  \t").is_empty());
        assert!(!Subject::new("doc-1").is_empty());
    }

    #[test]
    fn principal_payload_has_no_subject() {
        let payload = Payload::from(Principal::new("alice"));
        assert_eq!(payload.principal(), Some(&Principal::new("alice")));
        assert_eq!(payload.subject(), None);
    }

    #[test]
    fn null_subject_is_still_a_subject() {
        let payload = Payload::Subject(None);
        assert_eq!(payload.subject(), Some(None));
        assert!(payload.principal().is_none());
    }

    #[test]
    fn claim_without_subject_reports_null_subject() {
        let payload = Payload::Claim {
            principal: Principal::new("bob"),
            subject: None,
        };
        assert!(payload.principal().is_some());
        assert_eq!(payload.subject(), Some(None));
    }

    #[test]
    fn subject_action_is_optional() {
        let s = Subject::new("doc-1").with_action("read");
        assert_eq!(s.action.as_deref(), Some("read"));
        assert_eq!(Subject::new("doc-1").action, None);
    }
}

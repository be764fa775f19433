use crate::request::{Principal, Subject};

/// Decides whether a principal is a valid identity.
///
/// Implemented for any `Fn(&Principal) -> bool` closure. Implementations
/// that do I/O own its blocking and timeout behaviour.
pub trait AuthnFunc: Send + Sync {
    /// Returns `true` if the principal is authenticated.
    fn authenticate(&self, principal: &Principal) -> bool;
}

impl<F> AuthnFunc for F
where
    F: Fn(&Principal) -> bool + Send + Sync,
{
    fn authenticate(&self, principal: &Principal) -> bool {
        self(principal)
    }
}

/// Decides whether a principal may act on a subject.
///
/// Implemented for any `Fn(&Principal, &Subject) -> bool` closure.
pub trait AuthzFunc: Send + Sync {
    /// Returns `true` if the principal is authorized for the subject.
    fn authorize(&self, principal: &Principal, subject: &Subject) -> bool;
}

impl<F> AuthzFunc for F
where
    F: Fn(&Principal, &Subject) -> bool + Send + Sync,
{
    fn authorize(&self, principal: &Principal, subject: &Subject) -> bool {
        self(principal, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct AllowList(HashSet<String>);

    impl AuthnFunc for AllowList {
        fn authenticate(&self, principal: &Principal) -> bool {
            self.0.contains(&principal.id)
        }
    }

    #[test]
    fn closures_are_predicates() {
        let authn = |p: &Principal| p.id == "alice";
        let authz = |p: &Principal, s: &Subject| p.id == "alice" && s.resource == "doc-1";

        assert!(authn.authenticate(&Principal::new("alice")));
        assert!(!authn.authenticate(&Principal::new("mallory")));
        assert!(authz.authorize(&Principal::new("alice"), &Subject::new("doc-1")));
        assert!(!authz.authorize(&Principal::new("alice"), &Subject::new("doc-2")));
    }

    #[test]
    fn named_types_are_predicates() {
        let allow = AllowList(["alice".to_string()].into_iter().collect());
        assert!(allow.authenticate(&Principal::new("alice")));
        assert!(!allow.authenticate(&Principal::new("bob")));
    }
}

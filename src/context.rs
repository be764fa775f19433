use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::key::ContextKey;
use crate::request::{Principal, Subject};

/// A value bound in a [`Context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A principal that passed authentication
    Principal(Principal),
    /// A subject that passed authorization
    Subject(Subject),
}

#[derive(Debug)]
struct Node {
    key: ContextKey,
    value: Binding,
    parent: Option<Arc<Node>>,
}

/// Per-call propagation channel threading state between gate stages.
///
/// A `Context` is immutable. [`with_value`](Self::with_value) returns a new
/// context holding one extra binding and leaves the receiver untouched, so
/// a context can be shared freely between the stages and handlers of one
/// call. Lookups see the most recent binding for a key.
///
/// # Examples
///
/// ```
/// use auth_gate::{Binding, Context, ContextKey, KeyMaterial, Principal};
///
/// let key = ContextKey::derive(KeyMaterial::Random);
/// let root = Context::new("req-1");
/// let bound = root.with_value(key.clone(), Binding::Principal(Principal::new("alice")));
///
/// assert!(root.value(&key).is_none());
/// assert_eq!(bound.principal(&key), Some(&Principal::new("alice")));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    request_id: Arc<str>,
    cancel: Option<Arc<AtomicBool>>,
    head: Option<Arc<Node>>,
}

impl Context {
    /// Creates an empty context for one inbound call.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into().into(),
            cancel: None,
            head: None,
        }
    }

    /// Returns the request ID for this call.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns a cancelable copy of this context and the handle that cancels it.
    ///
    /// Contexts derived from the returned one share its cancellation state.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Context {
            request_id: Arc::clone(&self.request_id),
            cancel: Some(Arc::clone(&flag)),
            head: self.head.clone(),
        };
        (ctx, CancelHandle { flag })
    }

    /// Returns `true` once the call has been canceled.
    pub fn is_canceled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Returns a new context extended with `key` bound to `value`.
    pub fn with_value(&self, key: ContextKey, value: Binding) -> Context {
        Context {
            request_id: Arc::clone(&self.request_id),
            cancel: self.cancel.clone(),
            head: Some(Arc::new(Node {
                key,
                value,
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up the most recent binding for `key`.
    pub fn value(&self, key: &ContextKey) -> Option<&Binding> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if &n.key == key {
                return Some(&n.value);
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// Returns the principal bound under `key`, if the binding is a principal.
    pub fn principal(&self, key: &ContextKey) -> Option<&Principal> {
        match self.value(key)? {
            Binding::Principal(p) => Some(p),
            Binding::Subject(_) => None,
        }
    }

    /// Returns the subject bound under `key`, if the binding is a subject.
    pub fn subject(&self, key: &ContextKey) -> Option<&Subject> {
        match self.value(key)? {
            Binding::Subject(s) => Some(s),
            Binding::Principal(_) => None,
        }
    }

    /// Number of bindings, including shadowed ones.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            count += 1;
            node = n.parent.as_deref();
        }
        count
    }

    /// Returns `true` if nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Marks the call canceled. Stages that have not started yet will not run.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyMaterial;

    fn key() -> ContextKey {
        ContextKey::derive(KeyMaterial::Random)
    }

    #[test]
    fn new_context_is_empty() {
        let ctx = Context::new("req-empty");
        assert_eq!(ctx.request_id(), "req-empty");
        assert!(ctx.is_empty());
        assert!(!ctx.is_canceled());
    }

    #[test]
    fn with_value_leaves_parent_untouched() {
        let k = key();
        let parent = Context::new("req-1");
        let child = parent.with_value(k.clone(), Binding::Principal(Principal::new("alice")));

        assert!(parent.value(&k).is_none());
        assert_eq!(child.principal(&k).map(|p| p.id.as_str()), Some("alice"));
        assert_eq!(child.request_id(), "req-1");
    }

    #[test]
    fn newest_binding_shadows_older() {
        let k = key();
        let ctx = Context::new("req-2")
            .with_value(k.clone(), Binding::Principal(Principal::new("alice")))
            .with_value(k.clone(), Binding::Principal(Principal::new("bob")));

        assert_eq!(ctx.principal(&k).map(|p| p.id.as_str()), Some("bob"));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn subject_binding_is_not_a_principal() {
        let k = key();
        let ctx =
            Context::new("req-3").with_value(k.clone(), Binding::Subject(Subject::new("doc")));

        assert!(ctx.principal(&k).is_none());
        assert_eq!(ctx.subject(&k), Some(&Subject::new("doc")));
    }

    #[test]
    fn keys_do_not_collide() {
        let (a, b) = (key(), key());
        let ctx = Context::new("req-4")
            .with_value(a.clone(), Binding::Principal(Principal::new("alice")));

        assert!(ctx.principal(&a).is_some());
        assert!(ctx.principal(&b).is_none());
    }

    #[test]
    fn cancellation_reaches_derived_contexts() {
        let (ctx, handle) = Context::new("req-5").with_cancel();
        let derived = ctx.with_value(key(), Binding::Principal(Principal::new("alice")));

        assert!(!derived.is_canceled());
        handle.cancel();
        assert!(ctx.is_canceled());
        assert!(derived.is_canceled());
    }
}

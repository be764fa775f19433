use std::sync::Arc;

use crate::context::{Binding, Context};
use crate::error::{Error, ViolationKind};
use crate::key::{ContextKey, KeyMaterial};
use crate::logging::{Stage, StageLog};
use crate::middleware::{endpoint, Endpoint, Middleware};
use crate::policy::{AuthnFunc, AuthzFunc};
use crate::request::{Payload, Principal, Subject};

/// Wiring-time options for an [`Authenticator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOptions {
    /// Re-bind the authorized subject into the context for downstream handlers.
    ///
    /// Defaults to `true`.
    pub bind_subject: bool,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self { bind_subject: true }
    }
}

/// A two-stage authentication and authorization gate.
///
/// The gate is built once at wiring time and is immutable afterwards; it
/// holds no per-call state, so one instance can serve any number of
/// concurrent calls. [`authenticated`](Self::authenticated) binds the
/// verified principal under this gate's own [`ContextKey`], and
/// [`authorized`](Self::authorized) only ever reads it back from that key.
/// Gates nested in the same call chain therefore never see each other's
/// principals.
///
/// # Examples
///
/// ```
/// use auth_gate::{
///     chain, endpoint, Authenticator, Context, KeyMaterial, Payload, Principal, Subject,
///     ViolationKind,
/// };
///
/// let gate = Authenticator::new(
///     KeyMaterial::Random,
///     |p: &Principal| p.id == "alice",
///     |p: &Principal, s: &Subject| p.id == "alice" && s.resource == "doc-1",
/// );
///
/// let handler = chain(gate.authenticated(), [gate.authorized()])(endpoint(
///     |_ctx: &Context, payload: Payload| Ok(payload.subject().flatten().cloned()),
/// ));
///
/// let ok = handler(
///     &Context::new("req-1"),
///     Payload::claim(Principal::new("alice"), Subject::new("doc-1")),
/// )
/// .unwrap();
/// assert_eq!(ok, Some(Subject::new("doc-1")));
///
/// let denied = handler(
///     &Context::new("req-2"),
///     Payload::claim(Principal::new("alice"), Subject::new("doc-2")),
/// )
/// .unwrap_err();
/// assert_eq!(denied.violation_kind(), Some(ViolationKind::Unauthorized));
/// ```
#[derive(Clone)]
pub struct Authenticator {
    key: ContextKey,
    authn: Arc<dyn AuthnFunc>,
    authz: Arc<dyn AuthzFunc>,
    options: GateOptions,
}

impl Authenticator {
    /// Creates a gate with default options.
    pub fn new(
        key_material: KeyMaterial,
        authn: impl AuthnFunc + 'static,
        authz: impl AuthzFunc + 'static,
    ) -> Self {
        Self::with_options(key_material, authn, authz, GateOptions::default())
    }

    /// Creates a gate with explicit options.
    pub fn with_options(
        key_material: KeyMaterial,
        authn: impl AuthnFunc + 'static,
        authz: impl AuthzFunc + 'static,
        options: GateOptions,
    ) -> Self {
        Self {
            key: ContextKey::derive(key_material),
            authn: Arc::new(authn),
            authz: Arc::new(authz),
            options,
        }
    }

    /// The key this gate binds its principal under.
    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    /// The options this gate was built with.
    pub fn options(&self) -> GateOptions {
        self.options
    }

    /// Returns the principal this gate bound in `ctx`, if any.
    pub fn principal<'c>(&self, ctx: &'c Context) -> Option<&'c Principal> {
        ctx.principal(&self.key)
    }

    /// Returns the subject this gate authorized in `ctx`, if subject binding is on.
    pub fn subject<'c>(&self, ctx: &'c Context) -> Option<&'c Subject> {
        ctx.subject(&self.key.subject_key())
    }

    /// Middleware for the authentication stage.
    ///
    /// The wrapped endpoint only runs when the payload carries a principal
    /// that the authentication predicate accepts. It receives a context with
    /// that principal bound under this gate's key, and the original payload.
    ///
    /// # Errors
    ///
    /// - [`ViolationKind::Canceled`] if the context was canceled
    /// - [`ViolationKind::UnknownPrincipal`] if the payload carries no principal
    /// - [`ViolationKind::Unauthenticated`] if the predicate rejects the principal
    pub fn authenticated<R: 'static>(&self) -> Middleware<R> {
        let gate = self.clone();
        Box::new(move |next: Endpoint<R>| {
            let gate = gate.clone();
            endpoint(move |ctx: &Context, payload: Payload| {
                let ctx = gate.authenticate(ctx, &payload)?;
                next(&ctx, payload)
            })
        })
    }

    /// Middleware for the authorization stage.
    ///
    /// The wrapped endpoint only runs when this gate's authentication stage
    /// already bound a principal in the context and the authorization
    /// predicate accepts it for the payload's subject.
    ///
    /// # Errors
    ///
    /// - [`ViolationKind::Canceled`] if the context was canceled
    /// - [`ViolationKind::UnknownPrincipal`] if this gate bound no principal
    /// - [`ViolationKind::UnknownSubject`] if the payload carries no subject,
    ///   or a null or empty one
    /// - [`ViolationKind::Unauthorized`] if the predicate rejects the pair
    pub fn authorized<R: 'static>(&self) -> Middleware<R> {
        let gate = self.clone();
        Box::new(move |next: Endpoint<R>| {
            let gate = gate.clone();
            endpoint(move |ctx: &Context, payload: Payload| {
                match gate.authorize(ctx, &payload)? {
                    Some(extended) => next(&extended, payload),
                    None => next(ctx, payload),
                }
            })
        })
    }

    fn authenticate(&self, ctx: &Context, payload: &Payload) -> Result<Context, Error> {
        let log = StageLog::new(ctx, &self.key, Stage::Authenticated);

        if ctx.is_canceled() {
            return Err(log
                .rejected(ViolationKind::Canceled, "call canceled before authentication")
                .into());
        }

        let principal = payload.principal().ok_or_else(|| {
            log.rejected(
                ViolationKind::UnknownPrincipal,
                "payload is not an identity claim",
            )
        })?;

        if !self.authn.authenticate(principal) {
            return Err(log
                .rejected(
                    ViolationKind::Unauthenticated,
                    format!("principal '{}' failed authentication", principal.id),
                )
                .into());
        }

        log.accepted(&principal.id);
        Ok(ctx.with_value(self.key.clone(), Binding::Principal(principal.clone())))
    }

    /// Returns the extended context when the subject is re-bound.
    fn authorize(&self, ctx: &Context, payload: &Payload) -> Result<Option<Context>, Error> {
        let log = StageLog::new(ctx, &self.key, Stage::Authorized);

        if ctx.is_canceled() {
            return Err(log
                .rejected(ViolationKind::Canceled, "call canceled before authorization")
                .into());
        }

        let principal = ctx.principal(&self.key).ok_or_else(|| {
            log.rejected(
                ViolationKind::UnknownPrincipal,
                "no principal authenticated by this gate",
            )
        })?;

        let subject = match payload.subject() {
            Some(Some(subject)) if !subject.is_empty() => subject,
            Some(_) => {
                return Err(log
                    .rejected(ViolationKind::UnknownSubject, "subject is null or empty")
                    .into())
            }
            None => {
                return Err(log
                    .rejected(ViolationKind::UnknownSubject, "payload is not a subject")
                    .into())
            }
        };

        if !self.authz.authorize(principal, subject) {
            return Err(log
                .rejected(
                    ViolationKind::Unauthorized,
                    format!(
                        "principal '{}' may not act on '{}'",
                        principal.id, subject.resource
                    ),
                )
                .into());
        }

        log.accepted(&principal.id);
        if self.options.bind_subject {
            Ok(Some(ctx.with_value(
                self.key.subject_key(),
                Binding::Subject(subject.clone()),
            )))
        } else {
            Ok(None)
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

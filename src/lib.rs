//! Two-stage request gate: authentication, then authorization.
//!
//! An [`Authenticator`] produces two middlewares that wrap any RPC-style
//! [`Endpoint`]:
//! - **Authenticated**: checks the payload's [`Principal`] and binds it in
//!   the call [`Context`] under the gate's own key
//! - **Authorized**: reads that principal back and checks it against the
//!   payload's [`Subject`]
//!
//! Each gate derives a unique [`ContextKey`], so several gates can be nested
//! in one call chain without reading or overwriting each other's principal.
//! Every rejection is a typed [`Violation`]; the next handler never runs.
//!
//! # Examples
//!
//! ```
//! use auth_gate::{
//!     chain, endpoint, Authenticator, Context, KeyMaterial, Payload, Principal, Subject,
//!     ViolationKind,
//! };
//!
//! let gate = Authenticator::new(
//!     KeyMaterial::named("documents"),
//!     |p: &Principal| p.id == "alice",
//!     |_p: &Principal, s: &Subject| s.resource.starts_with("doc-"),
//! );
//!
//! let handler = chain(gate.authenticated(), [gate.authorized()])(endpoint(
//!     |_ctx: &Context, _payload: Payload| Ok("served"),
//! ));
//!
//! let served = handler(
//!     &Context::new("req-1"),
//!     Payload::claim(Principal::new("alice"), Subject::new("doc-1")),
//! );
//! assert_eq!(served.unwrap(), "served");
//!
//! let rejected = handler(&Context::new("req-2"), Payload::Opaque("ping".into()));
//! assert_eq!(
//!     rejected.unwrap_err().violation_kind(),
//!     Some(ViolationKind::UnknownPrincipal)
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod error;
mod gate;
mod key;
mod logging;
mod middleware;
mod policy;
mod request;
mod secret;

pub use context::{Binding, CancelHandle, Context};
pub use error::{Error, Violation, ViolationKind};
pub use gate::{Authenticator, GateOptions};
pub use key::{ContextKey, KeyMaterial, KEY_PREFIX};
pub use middleware::{chain, endpoint, Endpoint, Middleware};
pub use policy::{AuthnFunc, AuthzFunc};
pub use request::{Payload, Principal, Subject};
pub use secret::Secret;

//! Endpoint and middleware plumbing.
//!
//! An [`Endpoint`] handles one call given its [`Context`] and [`Payload`].
//! A [`Middleware`] wraps an endpoint and returns a new one. Gates produce
//! middlewares; the transport layer composes them around a terminal handler:
//!
//! ```text
//! Authenticated -> Authorized -> handler
//! ```

use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::request::Payload;

/// A handler for one call.
pub type Endpoint<R> = Arc<dyn Fn(&Context, Payload) -> Result<R, Error> + Send + Sync>;

/// Wraps an endpoint, producing a new endpoint.
pub type Middleware<R> = Box<dyn Fn(Endpoint<R>) -> Endpoint<R> + Send + Sync>;

/// Turns a closure into an [`Endpoint`].
///
/// # Examples
///
/// ```
/// use auth_gate::{endpoint, Context, Payload};
///
/// let echo = endpoint(|_ctx: &Context, payload: Payload| Ok(payload));
/// let out = echo(&Context::new("req-1"), Payload::Opaque("ping".into())).unwrap();
/// assert_eq!(out, Payload::Opaque("ping".into()));
/// ```
pub fn endpoint<R, F>(f: F) -> Endpoint<R>
where
    F: Fn(&Context, Payload) -> Result<R, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Composes middlewares so that `outer` runs first and the last of `others`
/// runs closest to the wrapped endpoint.
pub fn chain<R: 'static>(
    outer: Middleware<R>,
    others: impl IntoIterator<Item = Middleware<R>>,
) -> Middleware<R> {
    let others: Vec<Middleware<R>> = others.into_iter().collect();
    Box::new(move |next: Endpoint<R>| {
        let inner = others.iter().rev().fold(next, |acc, m| m(acc));
        outer(inner)
    })
}

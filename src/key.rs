//! Per-gate context keys.
//!
//! Every [`Authenticator`](crate::Authenticator) binds its principal under its
//! own [`ContextKey`]. Two gates nested in one call chain only stay isolated
//! if their keys differ, so the default material is a fresh random token.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::secret::Secret;

/// Fixed namespace shared by every derived key.
pub const KEY_PREFIX: &str = "auth-gate/";

const SECRET_TAG: &str = "sha256:";

/// Input used to derive a gate's [`ContextKey`].
///
/// # Examples
///
/// ```
/// use auth_gate::{ContextKey, KeyMaterial};
///
/// let a = ContextKey::derive(KeyMaterial::Random);
/// let b = ContextKey::derive(KeyMaterial::Random);
/// assert_ne!(a, b);
///
/// let named = ContextKey::derive(KeyMaterial::named("billing"));
/// assert_eq!(named, ContextKey::derive(KeyMaterial::named("billing")));
/// ```
#[derive(Debug, Default)]
pub enum KeyMaterial {
    /// A freshly generated UUID v4 token, unique per construction
    #[default]
    Random,
    /// A caller secret, hashed with SHA-256
    Secret(Secret<String>),
    /// A caller-chosen identifier, namespaced under [`KEY_PREFIX`]
    Named(String),
}

impl KeyMaterial {
    /// Key material from a caller secret.
    pub fn secret(secret: impl Into<Secret<String>>) -> Self {
        KeyMaterial::Secret(secret.into())
    }

    /// Key material from a caller-chosen identifier.
    pub fn named(id: impl Into<String>) -> Self {
        KeyMaterial::Named(id.into())
    }
}

/// Which kind of material a key was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Origin {
    Random,
    Secret,
    Named,
}

/// Which value of a gate a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Principal,
    Subject,
}

/// Opaque key under which a gate binds values in a [`Context`](crate::Context).
///
/// Equality covers the derived id, the kind of material it came from and
/// the slot it addresses. No caller-chosen name can therefore reproduce
/// another gate's subject key, or a key derived from other material.
///
/// Formatting shows a short fingerprint only, so a key derived from a secret
/// never leaks the full digest into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextKey {
    id: Arc<str>,
    origin: Origin,
    slot: Slot,
}

impl ContextKey {
    /// Derives a key from the given material.
    pub fn derive(material: KeyMaterial) -> Self {
        let (id, origin) = match material {
            KeyMaterial::Random => (
                format!("{}{}", KEY_PREFIX, uuid::Uuid::new_v4()),
                Origin::Random,
            ),
            KeyMaterial::Secret(secret) => {
                let digest = Sha256::digest(secret.expose_secret().as_bytes());
                (
                    format!("{}{}{}", KEY_PREFIX, SECRET_TAG, hex::encode(digest)),
                    Origin::Secret,
                )
            }
            KeyMaterial::Named(id) => (format!("{}{}", KEY_PREFIX, id), Origin::Named),
        };
        ContextKey {
            id: id.into(),
            origin,
            slot: Slot::Principal,
        }
    }

    /// The key under which the same gate re-binds the authorized subject.
    pub fn subject_key(&self) -> ContextKey {
        ContextKey {
            id: Arc::clone(&self.id),
            origin: self.origin,
            slot: Slot::Subject,
        }
    }

    /// Short, log-safe fingerprint of the gate this key belongs to.
    ///
    /// A principal key and its subject key share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.id.as_bytes());
        hex::encode(&digest[..4])
    }
}

impl fmt::Debug for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextKey({})", self.fingerprint())
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fingerprint())
    }
}

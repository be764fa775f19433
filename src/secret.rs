use std::fmt;

/// Key material that must never appear in logs or error messages.
///
/// Used by [`KeyMaterial::Secret`](crate::KeyMaterial::Secret). Formatting
/// always prints `[REDACTED]`; the value is only reachable through
/// [`expose_secret`](Self::expose_secret), which the key derivation calls
/// once at construction time.
///
/// # Examples
///
/// ```
/// use auth_gate::Secret;
///
/// let secret = Secret::new("gate-secret".to_string());
/// assert_eq!(format!("{:?}", secret), "[REDACTED]");
/// assert_eq!(secret.expose_secret(), "gate-secret");
/// ```
// Do not derive Clone or Default: a copied secret escapes redaction review.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Secret::new(value.to_string())
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Secret::new(value)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

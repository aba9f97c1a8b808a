//! Authentication gate.
//!
//! A cross-cutting combinator: wrap a handler whose first argument is a
//! [`Principal`] and the wrapped handler only runs for authenticated
//! principals. Independent of dispatch chain mechanics — any handler opts in
//! on its own.

use crate::error::AuthError;
use serde::{Deserialize, Serialize};

/// The acting principal a gated handler is invoked on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Wrap `handler` so it only runs for authenticated principals.
///
/// An unauthenticated principal yields [`AuthError::NotAuthenticated`] and
/// the wrapped handler is never invoked.
pub fn require_auth<A, R, F>(handler: F) -> impl Fn(&Principal, A) -> Result<R, AuthError>
where
    F: Fn(&Principal, A) -> R,
{
    move |principal, arg| {
        if principal.is_authenticated {
            Ok(handler(principal, arg))
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}

//! Unified error handling for ircmod.
//!
//! One error family per subsystem, with static code labels suitable for
//! metrics labeling by the host.

use crate::event::EventKind;
use thiserror::Error;

// ============================================================================
// Module Errors (load-time metadata validation)
// ============================================================================

/// Errors raised while installing a module type.
///
/// These are load-time failures: they occur when a module type is declared
/// to the dispatcher, before any instance of the module exists.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module {module} is missing required metadata: {}", .fields.join(", "))]
    MissingMetadata {
        module: String,
        fields: Vec<&'static str>,
    },
}

impl ModuleError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMetadata { .. } => "missing_metadata",
        }
    }
}

// ============================================================================
// Registry Errors (module management)
// ============================================================================

/// Errors raised by module management operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("module '{0}' is not registered")]
    ModuleNotFound(String),
}

impl RegistryError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ModuleNotFound(_) => "module_not_found",
        }
    }
}

// ============================================================================
// Dispatch Errors (payload hydration)
// ============================================================================

/// Errors raised on the dispatch path.
///
/// The only failure dispatch can surface is a payload that is structurally
/// incompatible with the event kind. A missing or fully-skipped handler
/// chain is a normal empty result, never an error.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("event {kind:?} expects {expected} payload value(s), got {got}")]
    ArityMismatch {
        kind: EventKind,
        expected: usize,
        got: usize,
    },

    #[error("failed to hydrate {kind:?} payload: {source}")]
    Hydrate {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::Hydrate { .. } => "hydrate_failed",
        }
    }
}

// ============================================================================
// Auth Errors (gated handlers)
// ============================================================================

/// Errors raised by the authentication gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("principal is not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
        }
    }
}

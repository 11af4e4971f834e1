// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for the keplerday crate.

use crate::calendar::CalendarKey;

/// Error type for all fallible operations in the keplerday crate.
///
/// Building a table can only fail with [`RotationError::Convergence`] or
/// [`RotationError::InvalidParameters`]; both are fatal and no table is
/// produced. Lookups and number rendering fail with recoverable variants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RotationError {
    /// Newton iteration for one calendar day did not converge.
    #[error("rotation for {key} did not converge after {iterations} iterations (residual {residual:e})")]
    Convergence {
        /// Day whose angle could not be solved.
        key: CalendarKey,
        /// Iterations spent before giving up.
        iterations: usize,
        /// Last swept-area residual.
        residual: f64,
    },

    /// The requested key is not one of the 366 canonical `MM-DD` values.
    #[error("no rotation entry for calendar key {key:?}")]
    NotFound {
        /// The key as supplied by the caller.
        key: String,
    },

    /// A rendered number does not match the JSON number grammar.
    #[error("cannot render {rendered:?} as a JSON number: {reason}")]
    Format {
        /// The offending rendering.
        rendered: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A format specifier could not be parsed.
    #[error("invalid number format specifier {spec:?}: {reason}")]
    InvalidSpecifier {
        /// The specifier as supplied by the caller.
        spec: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An orbit parameter is outside its valid domain.
    #[error("invalid orbit parameter {name}: {value}")]
    InvalidParameters {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

impl RotationError {
    /// `true` for errors a caller can recover from by changing its input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Format { .. } | Self::InvalidSpecifier { .. }
        )
    }
}

/// Result alias for keplerday operations.
pub type Result<T> = std::result::Result<T, RotationError>;

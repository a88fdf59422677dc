//! Fetch error types

use thiserror::Error;

/// Uniform failure for one provider operation
///
/// Covers both the "service reachable but rejected" (non-2xx) and the
/// "service unreachable" (transport) sub-cases; callers that care can read
/// the message, everything else treats the two alike. `Clone` because the
/// cache hands the same failure to every de-duplicated caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Catalog, message)
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Conversion, message)
    }
}

/// Which operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Fetching the currency catalog
    Catalog,
    /// Performing a conversion
    Conversion,
}

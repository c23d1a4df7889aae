//! # Translate module
//!
//! This module turns declared configuration blocks into the request shapes
//! of the deadline cloud api. Translation is pure: it never contacts the
//! network and never mutates its input.
//!
//! Some enumerations are lenient, an unrecognized value resolves to a
//! documented default through a single `resolve_*` function. Others are
//! strict and reject unknown values with [`Error::InvalidChoice`].

use crate::svc::deadline::model::ParseError;

pub mod fleet;
pub mod membership;
pub mod queue;
pub mod storage;

// -----------------------------------------------------------------------------
// Error enumeration

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("configuration is required")]
    MissingConfiguration,
    #[error("field '{field}' is required for {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },
    #[error("invalid value for field '{field}', {source}")]
    InvalidChoice {
        field: &'static str,
        source: ParseError,
    },
}

impl Error {
    pub fn missing(field: &'static str, context: &'static str) -> Self {
        Self::MissingField { field, context }
    }

    pub fn invalid(field: &'static str) -> impl FnOnce(ParseError) -> Self {
        move |source| Self::InvalidChoice { field, source }
    }
}

// -----------------------------------------------------------------------------
// Helpers functions

/// returns the value if it is present and not blank
pub fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty()).cloned()
}

/// returns elements of `desired` missing from `current` and elements of
/// `current` missing from `desired`, order is preserved
pub fn changes(current: &[String], desired: &[String]) -> (Vec<String>, Vec<String>) {
    let added = desired
        .iter()
        .filter(|value| !current.contains(value))
        .cloned()
        .collect();

    let removed = current
        .iter()
        .filter(|value| !desired.contains(value))
        .cloned()
        .collect();

    (added, removed)
}

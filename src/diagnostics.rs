//! Recoverable diagnostics collected during a run.
//!
//! None of these abort the conversion: the host/reporting layer decides how
//! to display them. Functions that can produce several push into a
//! `Vec<Diagnostic>` owned by the caller.

use crate::id::Id;
use thiserror::Error;

/// Member volumes of one space disagree on a room identity field.
///
/// Carries every distinct value found, so callers can recover explicitly
/// instead of guessing which one is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("volumes disagree on {field}: {candidates:?}")]
pub struct IdentityConflict {
    pub field: &'static str,
    pub candidates: Vec<String>,
}

impl IdentityConflict {
    /// An arbitrary candidate (the first one found), for callers that must
    /// produce *some* value after reporting the conflict.
    pub fn any(&self) -> &str {
        self.candidates.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    IdentityConflict(#[from] IdentityConflict),

    /// A value at the document boundary could not be used. The field is
    /// rejected; previously accepted state is untouched.
    #[error("bad value {value:?} for '{key}': {reason}")]
    MalformedInput {
        key: String,
        value: String,
        reason: String,
    },

    /// A merge group produced no usable surface; its output was dropped.
    #[error("merge group {ids:?} produced no usable surface and was dropped")]
    EmptyMergeGroup { ids: Vec<Id> },

    /// A geometry derivation failed and a fallback value was used instead.
    #[error("geometry unavailable for {what}; using fallback")]
    GeometryUnavailable { what: String },
}

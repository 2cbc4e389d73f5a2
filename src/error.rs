use thiserror::Error;

use crate::spec::DiagramFamily;

/// Fatal per-render failures. None of these leaves a partial scene behind:
/// layout either completes or returns before anything is emitted.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("diagram spec could not be parsed: {0}")]
    SpecParse(String),

    #[error("{family} spec is missing required field `{field}`")]
    MissingField {
        family: &'static str,
        field: &'static str,
    },

    #[error("{family} spec field `{field}` is invalid: {reason}")]
    InvalidField {
        family: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("theme defines no styles for {0:?} diagrams")]
    ThemeUnavailable(DiagramFamily),
}

/// Non-fatal quality losses recorded on the result instead of being
/// silently logged and forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Expected precomputed positions were absent; the deterministic
    /// radial/sector fallback was used instead.
    LayoutFallback,
    /// No usable font face could be loaded; text widths came from the
    /// average-glyph heuristic.
    HeuristicMetrics,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::LayoutFallback => {
                write!(f, "precomputed positions absent, radial fallback used")
            }
            Degradation::HeuristicMetrics => {
                write!(f, "font unavailable, heuristic text metrics used")
            }
        }
    }
}

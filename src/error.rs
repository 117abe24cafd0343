use thiserror::Error;

/// Planning errors that are allowed to surface to the caller.
///
/// Degradable conditions (no candidates, infeasible budget, a failed
/// directions leg, an unresolvable address) are *not* represented here:
/// those paths recover internally and return best-effort results instead.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Geocoding service error: {0}")]
    Geocoding(String),

    #[error("Directions service error: {0}")]
    Directions(String),

    #[error("Place search error: {0}")]
    PlaceSearch(String),

    #[error("Only {resolved} of {requested} addresses resolved reliably (need at least 2)")]
    InsufficientAddresses { resolved: usize, requested: usize },

    #[error("No device location fix within {0} seconds")]
    LocationTimeout(u64),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

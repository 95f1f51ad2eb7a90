use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Sdp4Error {
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error(
        "Kepler solver did not converge after {iterations} iterations \
         (last correction {residual:e} rad)"
    )]
    ConvergenceFailure { iterations: u32, residual: f64 },

    #[error("orbit has decayed: height {height_km:.3} km above the equatorial radius")]
    DecayedOrbit { height_km: f64 },

    #[error("unknown gravity model: {0} (use wgs72old, wgs72, wgs84)")]
    UnknownGravityModel(String),
}

/// Non-fatal conditions met while producing a [`crate::PropagationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationWarning {
    /// The eccentric anomaly is the last iterate, not a converged value.
    KeplerNotConverged { iterations: u32, residual: f64 },
    /// The propagated radius is below the Earth's surface.
    Decayed { height_km: f64 },
}

impl From<PropagationWarning> for Sdp4Error {
    fn from(warning: PropagationWarning) -> Self {
        match warning {
            PropagationWarning::KeplerNotConverged {
                iterations,
                residual,
            } => Sdp4Error::ConvergenceFailure {
                iterations,
                residual,
            },
            PropagationWarning::Decayed { height_km } => Sdp4Error::DecayedOrbit { height_km },
        }
    }
}

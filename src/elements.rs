use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, MINUTES_PER_DAY, TWOPI};
use crate::epoch::TleEpoch;
use crate::error::Sdp4Error;

/// Numeric fields of a two-line element set, in the units the element set
/// carries them.
///
/// Text parsing is left to the caller; this is what comes out of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementSet {
    /// First derivative of mean motion divided by two, rev/day^2.
    pub ndot: f64,
    /// Second derivative of mean motion divided by six, rev/day^3.
    pub nddot: f64,
    /// Drag term, 1/Earth radii.
    pub bstar: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    /// Eccentricity with an implied leading decimal point (`7318036` is 0.7318036).
    pub eccentricity_e7: u32,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    /// rev/day
    pub mean_motion: f64,
    /// `YYDDD.dddddd`
    pub epoch: f64,
}

impl ElementSet {
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_e7 as f64 * 1.0e-7
    }

    /// Checks the fields and converts them to radians and minutes.
    pub fn to_mean_elements(&self) -> Result<MeanElements, Sdp4Error> {
        let finite = [
            ("ndot", self.ndot),
            ("nddot", self.nddot),
            ("bstar", self.bstar),
            ("inclination", self.inclination_deg),
            ("raan", self.raan_deg),
            ("argument of perigee", self.arg_perigee_deg),
            ("mean anomaly", self.mean_anomaly_deg),
            ("mean motion", self.mean_motion),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Sdp4Error::InvalidElements(format!("{name} is {value}")));
        }

        let eccentricity = self.eccentricity();
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(Sdp4Error::InvalidElements(format!(
                "eccentricity {eccentricity} outside [0, 1)"
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(Sdp4Error::InvalidElements(format!(
                "inclination {} deg outside [0, 180]",
                self.inclination_deg
            )));
        }
        if self.mean_motion <= 0.0 {
            return Err(Sdp4Error::InvalidElements(format!(
                "mean motion {} rev/day is not positive",
                self.mean_motion
            )));
        }

        let epoch = TleEpoch::from_yyddd(self.epoch)?;
        let xpdotp = TWOPI / MINUTES_PER_DAY;

        Ok(MeanElements {
            epoch,
            inclination: self.inclination_deg * DEG2RAD,
            raan: self.raan_deg * DEG2RAD,
            eccentricity,
            arg_perigee: self.arg_perigee_deg * DEG2RAD,
            mean_anomaly: self.mean_anomaly_deg * DEG2RAD,
            mean_motion: self.mean_motion * xpdotp,
            ndot: self.ndot * xpdotp / MINUTES_PER_DAY,
            nddot: self.nddot * xpdotp / (MINUTES_PER_DAY * MINUTES_PER_DAY),
            bstar: self.bstar,
        })
    }
}

/// Validated elements in working units: radians, minutes, rad/min.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub epoch: TleEpoch,
    pub inclination: f64,
    pub raan: f64,
    pub eccentricity: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    /// Kozai mean motion, rad/min.
    pub mean_motion: f64,
    /// rad/min^2
    pub ndot: f64,
    /// rad/min^3
    pub nddot: f64,
    pub bstar: f64,
}

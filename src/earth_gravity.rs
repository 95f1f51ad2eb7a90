use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Sdp4Error;

/// Selects which set of geopotential constants drives the propagator.
///
/// `Wgs72Old` is the constant set Spacetrack Report #3 was published with,
/// and the one its test vectors assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityModel {
    #[default]
    Wgs72Old,
    Wgs72,
    Wgs84,
}

impl GravityModel {
    pub fn name(&self) -> &'static str {
        match self {
            GravityModel::Wgs72Old => "wgs72old",
            GravityModel::Wgs72 => "wgs72",
            GravityModel::Wgs84 => "wgs84",
        }
    }

    pub fn constants(&self) -> EarthGravity {
        EarthGravity::from_model(*self)
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GravityModel {
    type Err = Sdp4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs72old" => Ok(GravityModel::Wgs72Old),
            "wgs72" => Ok(GravityModel::Wgs72),
            "wgs84" => Ok(GravityModel::Wgs84),
            other => Err(Sdp4Error::UnknownGravityModel(other.to_string())),
        }
    }
}

/// Earth model parameters in the normalized units the theory works in
/// (distance in Earth radii, time in minutes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthGravity {
    pub model: GravityModel,
    /// Gravitational parameter, km^3/s^2.
    pub mu: f64,
    /// Equatorial radius, km.
    pub radius_km: f64,
    pub flattening: f64,
    /// sqrt(mu) in Earth radii^1.5 per minute.
    pub xke: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    /// J2 / 2
    pub ck2: f64,
    /// -3/8 J4
    pub ck4: f64,
    /// -J3 / CK2
    pub a3ovk2: f64,
    /// (q0 - s)^4 of the drag density function, q0 = 120 km, s = 78 km.
    pub qoms2t: f64,
    /// Drag reference altitude as a geocentric radius.
    pub s: f64,
}

impl EarthGravity {
    pub fn from_model(model: GravityModel) -> Self {
        let (mu, radius_km, flattening, xke, j2, j3, j4) = match model {
            GravityModel::Wgs72Old => (
                398_600.799_64_f64,
                6378.135_f64,
                1.0 / 298.26,
                0.074_366_916_1_f64,
                0.001_082_616_f64,
                -0.000_002_538_81_f64,
                -0.000_001_655_97_f64,
            ),
            GravityModel::Wgs72 => {
                let mu = 398_600.8_f64;
                let radius_km = 6378.135_f64;
                (
                    mu,
                    radius_km,
                    1.0 / 298.26,
                    60.0 / (radius_km * radius_km * radius_km / mu).sqrt(),
                    0.001_082_616_f64,
                    -0.000_002_538_81_f64,
                    -0.000_001_655_97_f64,
                )
            }
            GravityModel::Wgs84 => {
                let mu = 398_600.5_f64;
                let radius_km = 6378.137_f64;
                (
                    mu,
                    radius_km,
                    1.0 / 298.257_223_563,
                    60.0 / (radius_km * radius_km * radius_km / mu).sqrt(),
                    0.001_082_629_989_05_f64,
                    -0.000_002_532_153_06_f64,
                    -0.000_001_610_987_61_f64,
                )
            }
        };

        let ck2 = 0.5 * j2;
        let ck4 = -0.375 * j4;
        EarthGravity {
            model,
            mu,
            radius_km,
            flattening,
            xke,
            j2,
            j3,
            j4,
            ck2,
            ck4,
            a3ovk2: -j3 / ck2,
            qoms2t: ((120.0 - 78.0) / radius_km).powi(4),
            s: 1.0 + 78.0 / radius_km,
        }
    }

    /// Converts Earth radii per minute into km/s.
    pub fn velocity_scale(&self) -> f64 {
        self.radius_km / 60.0
    }
}

impl Default for EarthGravity {
    fn default() -> Self {
        EarthGravity::from_model(GravityModel::default())
    }
}

//! Fixed literals of the luni-solar and resonance perturbation theory.
//!
//! These are not model parameters: they are the coefficients the theory was
//! fitted with and must stay bit-identical for the reference vectors to hold.

use std::f64::consts::PI;

pub const TWOPI: f64 = 2.0 * PI;
pub const DEG2RAD: f64 = PI / 180.0;
pub const X2O3: f64 = 2.0 / 3.0;

pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of 1950 Jan 0.0 UT, the origin of the `ds50` day count.
pub const JD_1950_JAN_0: f64 = 2_433_281.5;

/// Orbits with an un-Kozai'd period at or above this many minutes use the
/// deep-space theory.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

/// Earth rotation rate, rad/min.
pub const THDT: f64 = 4.375_269_1e-3;

/// Kepler solver tolerance (rad) and iteration cap.
pub const KEPLER_TOLERANCE: f64 = 1.0e-6;
pub const KEPLER_MAX_ITERATIONS: u32 = 10;

/// Periodic terms are re-evaluated only when the query moves at least this
/// many minutes away from the last evaluation.
pub const PERIODIC_REFRESH_MIN: f64 = 30.0;

/// Below this inclination (rad) the node-dependent luni-solar secular term
/// is dropped.
pub const SHALLOW_INCLINATION: f64 = 5.235_987_7e-2;

/// Below this inclination (rad) periodic corrections go through the
/// Lyddane form.
pub const LYDDANE_INCLINATION: f64 = 0.2;

// Resonance integrator stepping, minutes.
pub const STEP_POSITIVE: f64 = 720.0;
pub const STEP_NEGATIVE: f64 = -720.0;
/// Half the square of a full step.
pub const STEP2: f64 = 259_200.0;

// Synchronous resonance
pub const SYNC_MEAN_MOTION_MIN: f64 = 0.003_490_658_5;
pub const SYNC_MEAN_MOTION_MAX: f64 = 0.005_235_987_7;
pub const Q22: f64 = 1.789_167_9e-6;
pub const Q31: f64 = 2.146_074_8e-6;
pub const Q33: f64 = 2.212_301_5e-7;
pub const FASX2: f64 = 0.131_309_08;
pub const FASX4: f64 = 2.884_319_8;
pub const FASX6: f64 = 0.374_480_87;

// Half-day resonance
pub const HALF_DAY_MEAN_MOTION_MIN: f64 = 8.26e-3;
pub const HALF_DAY_MEAN_MOTION_MAX: f64 = 9.24e-3;
pub const HALF_DAY_MIN_ECCENTRICITY: f64 = 0.5;
pub const ROOT22: f64 = 1.789_167_9e-6;
pub const ROOT32: f64 = 3.739_379_2e-7;
pub const ROOT44: f64 = 7.363_695_3e-9;
pub const ROOT52: f64 = 1.142_863_9e-7;
pub const ROOT54: f64 = 2.176_580_3e-9;
pub const G22: f64 = 5.768_639_6;
pub const G32: f64 = 0.952_408_98;
pub const G44: f64 = 1.801_499_8;
pub const G52: f64 = 1.050_833_0;
pub const G54: f64 = 4.410_889_8;

// Solar orbit
pub const ZNS: f64 = 1.194_59e-5;
pub const ZES: f64 = 0.016_75;
pub const C1SS: f64 = 2.986_479_7e-6;
pub const ZCOSIS: f64 = 0.917_448_67;
pub const ZSINIS: f64 = 0.397_854_16;
pub const ZCOSGS: f64 = 0.194_590_5;
pub const ZSINGS: f64 = -0.980_884_58;

// Lunar orbit
pub const ZNL: f64 = 1.583_521_8e-4;
pub const ZEL: f64 = 0.054_90;
pub const C1L: f64 = 4.796_806_5e-7;

/// Mean motion, eccentricity and amplitude factor of one perturbing body.
///
/// The solar and lunar coefficient sets are computed by the same formulas;
/// this is the part that differs between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturberConstants {
    /// Mean motion of the body, rad/min.
    pub zn: f64,
    /// Eccentricity of the body's apparent orbit.
    pub ze: f64,
    /// Amplitude coefficient.
    pub cc: f64,
}

pub const SOLAR: PerturberConstants = PerturberConstants {
    zn: ZNS,
    ze: ZES,
    cc: C1SS,
};

pub const LUNAR: PerturberConstants = PerturberConstants {
    zn: ZNL,
    ze: ZEL,
    cc: C1L,
};

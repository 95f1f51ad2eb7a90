//! Kepler's equation in equinoctial form, plus angle helpers.

use crate::constants::{KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE, TWOPI};

/// Wrap an angle to [0, 2π).
#[inline]
pub fn wrap_to_2pi(x: f64) -> f64 {
    let mut v = x % TWOPI;
    if v < 0.0 {
        v += TWOPI;
    }
    v
}

/// Outcome of [`solve_kepler`].
///
/// The trigonometric terms are those of the iterate the loop stopped on, as
/// the short-period reconstruction expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// E + ω, rad.
    pub anomaly: f64,
    pub sin_epw: f64,
    pub cos_epw: f64,
    /// e cos E
    pub ecose: f64,
    /// e sin E
    pub esine: f64,
    pub iterations: u32,
    pub converged: bool,
    /// Size of the last correction, rad.
    pub residual: f64,
}

/// Solves `U = (E + ω) - axn sin(E + ω) + ayn cos(E + ω)` for `E + ω`.
///
/// `capu` is the mean longitude minus the node, `axn = e cos ω` and
/// `ayn = e sin ω` (plus the long-period correction). Iteration starts at
/// `capu` and stops after [`KEPLER_MAX_ITERATIONS`] or once successive
/// iterates differ by no more than [`KEPLER_TOLERANCE`].
pub fn solve_kepler(capu: f64, axn: f64, ayn: f64) -> KeplerSolution {
    let mut epw = capu;
    let mut sin_epw = 0.0;
    let mut cos_epw = 1.0;
    let mut temp3 = 0.0;
    let mut temp4 = 0.0;
    let mut temp5 = 0.0;
    let mut temp6 = 0.0;
    let mut residual = f64::INFINITY;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < KEPLER_MAX_ITERATIONS {
        iterations += 1;
        sin_epw = epw.sin();
        cos_epw = epw.cos();
        temp3 = axn * sin_epw;
        temp4 = ayn * cos_epw;
        temp5 = axn * cos_epw;
        temp6 = ayn * sin_epw;
        let next = (capu - temp4 + temp3 - epw) / (1.0 - temp5 - temp6) + epw;
        residual = (next - epw).abs();
        if residual <= KEPLER_TOLERANCE {
            converged = true;
            break;
        }
        epw = next;
    }

    KeplerSolution {
        anomaly: epw,
        sin_epw,
        cos_epw,
        ecose: temp5 + temp6,
        esine: temp3 - temp4,
        iterations,
        converged,
        residual,
    }
}

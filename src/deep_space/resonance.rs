//! Geopotential resonance: classification, coupling coefficients and the
//! numerical integrator for the resonant mean longitude and mean motion.

use log::trace;
use serde::Serialize;

use crate::constants::{
    FASX2, FASX4, FASX6, G22, G32, G44, G52, G54, HALF_DAY_MEAN_MOTION_MAX,
    HALF_DAY_MEAN_MOTION_MIN, HALF_DAY_MIN_ECCENTRICITY, Q22, Q31, Q33, ROOT22, ROOT32, ROOT44,
    ROOT52, ROOT54, STEP2, STEP_NEGATIVE, STEP_POSITIVE, SYNC_MEAN_MOTION_MAX,
    SYNC_MEAN_MOTION_MIN, THDT,
};

/// Resonance class of a deep-space orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resonance {
    None,
    /// 12-hour orbits with high eccentricity (Molniya-like).
    HalfDay,
    /// One-day, geosynchronous orbits.
    Synchronous,
}

impl Resonance {
    /// Classifies by un-Kozai'd mean motion (rad/min) and eccentricity.
    pub fn classify(mean_motion: f64, eccentricity: f64) -> Self {
        if mean_motion > SYNC_MEAN_MOTION_MIN && mean_motion < SYNC_MEAN_MOTION_MAX {
            Resonance::Synchronous
        } else if (HALF_DAY_MEAN_MOTION_MIN..=HALF_DAY_MEAN_MOTION_MAX).contains(&mean_motion)
            && eccentricity >= HALF_DAY_MIN_ECCENTRICITY
        {
            Resonance::HalfDay
        } else {
            Resonance::None
        }
    }
}

/// Inputs of the resonance coefficient formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonanceInputs {
    /// Un-Kozai'd mean motion, rad/min.
    pub xnq: f64,
    /// 1 / semi-major axis.
    pub aqnv: f64,
    pub eccentricity: f64,
    pub cosio: f64,
    pub sinio: f64,
    pub mean_anomaly: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    /// Greenwich sidereal angle at epoch.
    pub thgr: f64,
    pub xmdot: f64,
    pub omgdot: f64,
    pub xnodot: f64,
    /// Luni-solar secular rates of M, ω and Ω.
    pub ssl: f64,
    pub ssg: f64,
    pub ssh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfDayCoefficients {
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynchronousCoefficients {
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResonanceCoefficients {
    HalfDay(HalfDayCoefficients),
    Synchronous(SynchronousCoefficients),
}

impl HalfDayCoefficients {
    pub fn new(inp: &ResonanceInputs) -> Self {
        let eq = inp.eccentricity;
        let eosq = eq * eq;
        let eoc = eq * eosq;

        let g201 = -0.306 - (eq - 0.64) * 0.440;
        let (g211, g310, g322, g410, g422, g520);
        if eq <= 0.65 {
            g211 = 3.616 - 13.247 * eq + 16.290 * eosq;
            g310 = -19.302 + 117.390 * eq - 228.419 * eosq + 156.591 * eoc;
            g322 = -18.9068 + 109.7927 * eq - 214.6334 * eosq + 146.5816 * eoc;
            g410 = -41.122 + 242.694 * eq - 471.094 * eosq + 313.953 * eoc;
            g422 = -146.407 + 841.880 * eq - 1629.014 * eosq + 1083.435 * eoc;
            g520 = -532.114 + 3017.977 * eq - 5740.0 * eosq + 3708.276 * eoc;
        } else {
            g211 = -72.099 + 331.819 * eq - 508.738 * eosq + 266.724 * eoc;
            g310 = -346.844 + 1582.851 * eq - 2415.925 * eosq + 1246.113 * eoc;
            g322 = -342.585 + 1554.908 * eq - 2366.899 * eosq + 1215.972 * eoc;
            g410 = -1052.797 + 4758.686 * eq - 7193.992 * eosq + 3651.957 * eoc;
            g422 = -3581.69 + 16178.11 * eq - 24462.77 * eosq + 12422.52 * eoc;
            g520 = if eq <= 0.715 {
                1464.74 - 4664.75 * eq + 3763.64 * eosq
            } else {
                -5149.66 + 29936.92 * eq - 54087.36 * eosq + 31324.56 * eoc
            };
        }
        let (g533, g521, g532) = if eq < 0.7 {
            (
                -919.2277 + 4988.61 * eq - 9064.77 * eosq + 5542.21 * eoc,
                -822.71072 + 4568.6173 * eq - 8491.4146 * eosq + 5337.524 * eoc,
                -853.666 + 4690.25 * eq - 8624.77 * eosq + 5341.4 * eoc,
            )
        } else {
            (
                -37995.78 + 161616.52 * eq - 229838.2 * eosq + 109377.94 * eoc,
                -51752.104 + 218913.95 * eq - 309468.16 * eosq + 146349.42 * eoc,
                -40023.88 + 170470.89 * eq - 242699.48 * eosq + 115605.82 * eoc,
            )
        };

        let (sinio, cosio) = (inp.sinio, inp.cosio);
        let theta2 = cosio * cosio;
        let sini2 = sinio * sinio;
        let f220 = 0.75 * (1.0 + 2.0 * cosio + theta2);
        let f221 = 1.5 * sini2;
        let f321 = 1.875 * sinio * (1.0 - 2.0 * cosio - 3.0 * theta2);
        let f322 = -1.875 * sinio * (1.0 + 2.0 * cosio - 3.0 * theta2);
        let f441 = 35.0 * sini2 * f220;
        let f442 = 39.3750 * sini2 * sini2;
        let f522 = 9.84375
            * sinio
            * (sini2 * (1.0 - 2.0 * cosio - 5.0 * theta2)
                + 0.333_333_33 * (-2.0 + 4.0 * cosio + 6.0 * theta2));
        let f523 = sinio
            * (4.921_875_12 * sini2 * (-2.0 - 4.0 * cosio + 10.0 * theta2)
                + 6.562_500_12 * (1.0 + 2.0 * cosio - 3.0 * theta2));
        let f542 = 29.53125
            * sinio
            * (2.0 - 8.0 * cosio + theta2 * (-12.0 + 8.0 * cosio + 10.0 * theta2));
        let f543 = 29.53125
            * sinio
            * (-2.0 - 8.0 * cosio + theta2 * (12.0 + 8.0 * cosio - 10.0 * theta2));

        let aqnv = inp.aqnv;
        let xno2 = inp.xnq * inp.xnq;
        let ainv2 = aqnv * aqnv;
        let mut temp1 = 3.0 * xno2 * ainv2;
        let mut temp = temp1 * ROOT22;
        let d2201 = temp * f220 * g201;
        let d2211 = temp * f221 * g211;
        temp1 *= aqnv;
        temp = temp1 * ROOT32;
        let d3210 = temp * f321 * g310;
        let d3222 = temp * f322 * g322;
        temp1 *= aqnv;
        temp = 2.0 * temp1 * ROOT44;
        let d4410 = temp * f441 * g410;
        let d4422 = temp * f442 * g422;
        temp1 *= aqnv;
        temp = temp1 * ROOT52;
        let d5220 = temp * f522 * g520;
        let d5232 = temp * f523 * g532;
        temp = 2.0 * temp1 * ROOT54;
        let d5421 = temp * f542 * g521;
        let d5433 = temp * f543 * g533;

        HalfDayCoefficients {
            d2201,
            d2211,
            d3210,
            d3222,
            d4410,
            d4422,
            d5220,
            d5232,
            d5421,
            d5433,
        }
    }

    /// Rates dn/dt and d²n/dt² / (dλ/dt) at longitude `xli`, perigee `xomi`.
    fn rates(&self, xli: f64, xomi: f64) -> (f64, f64) {
        let x2omi = xomi + xomi;
        let x2li = xli + xli;
        let xndot = self.d2201 * (x2omi + xli - G22).sin()
            + self.d2211 * (xli - G22).sin()
            + self.d3210 * (xomi + xli - G32).sin()
            + self.d3222 * (-xomi + xli - G32).sin()
            + self.d4410 * (x2omi + x2li - G44).sin()
            + self.d4422 * (x2li - G44).sin()
            + self.d5220 * (xomi + xli - G52).sin()
            + self.d5232 * (-xomi + xli - G52).sin()
            + self.d5421 * (xomi + x2li - G54).sin()
            + self.d5433 * (-xomi + x2li - G54).sin();
        let xnddt = self.d2201 * (x2omi + xli - G22).cos()
            + self.d2211 * (xli - G22).cos()
            + self.d3210 * (xomi + xli - G32).cos()
            + self.d3222 * (-xomi + xli - G32).cos()
            + self.d5220 * (xomi + xli - G52).cos()
            + self.d5232 * (-xomi + xli - G52).cos()
            + 2.0
                * (self.d4410 * (x2omi + x2li - G44).cos()
                    + self.d4422 * (x2li - G44).cos()
                    + self.d5421 * (xomi + x2li - G54).cos()
                    + self.d5433 * (-xomi + x2li - G54).cos());
        (xndot, xnddt)
    }
}

impl SynchronousCoefficients {
    pub fn new(inp: &ResonanceInputs) -> Self {
        let eosq = inp.eccentricity * inp.eccentricity;
        let cosio = inp.cosio;
        let g200 = 1.0 + eosq * (-2.5 + 0.8125 * eosq);
        let g310 = 1.0 + 2.0 * eosq;
        let g300 = 1.0 + eosq * (-6.0 + 6.60937 * eosq);
        let f220 = 0.75 * (1.0 + cosio) * (1.0 + cosio);
        let f311 = 0.9375 * inp.sinio * inp.sinio * (1.0 + 3.0 * cosio) - 0.75 * (1.0 + cosio);
        let f330 = 1.0 + cosio;
        let f330 = 1.875 * f330 * f330 * f330;
        let del1 = 3.0 * inp.xnq * inp.xnq * inp.aqnv * inp.aqnv;
        SynchronousCoefficients {
            del1: del1 * f311 * g310 * Q31 * inp.aqnv,
            del2: 2.0 * del1 * f220 * g200 * Q22,
            del3: 3.0 * del1 * f330 * g300 * Q33 * inp.aqnv,
        }
    }

    fn rates(&self, xli: f64) -> (f64, f64) {
        let xndot = self.del1 * (xli - FASX2).sin()
            + self.del2 * (2.0 * (xli - FASX4)).sin()
            + self.del3 * (3.0 * (xli - FASX6)).sin();
        let xnddt = self.del1 * (xli - FASX2).cos()
            + 2.0 * self.del2 * (2.0 * (xli - FASX4)).cos()
            + 3.0 * self.del3 * (3.0 * (xli - FASX6)).cos();
        (xndot, xnddt)
    }
}

/// Where the integrator is in answering a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorPhase {
    /// No step taken since the epoch; the next query starts from there.
    NotStarted,
    /// Full steps away from the epoch towards the target.
    SteppingForward,
    /// Full steps back towards the epoch; the target is nearer to it than
    /// the stored state.
    SteppingBackward,
    /// Within one step of the target: evaluate there without storing.
    FinalShortStep,
}

/// Resonant mean longitude and mean motion at the query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonantSolution {
    pub xl: f64,
    pub xn: f64,
}

/// Integrator for the resonant mean longitude and mean motion.
///
/// The stored state is the last full step reached; later queries resume
/// from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceIntegrator {
    coefficients: ResonanceCoefficients,
    xlamo: f64,
    xfact: f64,
    xnq: f64,
    omegaq: f64,
    omgdot: f64,
    xli: f64,
    xni: f64,
    atime: f64,
    phase: IntegratorPhase,
}

impl ResonanceIntegrator {
    /// Builds the integrator for `class`, or `None` for a non-resonant
    /// orbit.
    pub fn new(class: Resonance, inp: &ResonanceInputs) -> Option<Self> {
        let (coefficients, xlamo, bfact) = match class {
            Resonance::None => return None,
            Resonance::Synchronous => {
                let xpidot = inp.omgdot + inp.xnodot;
                let xlamo = inp.mean_anomaly + inp.raan + inp.arg_perigee - inp.thgr;
                let bfact = inp.xmdot + xpidot - THDT + inp.ssl + inp.ssg + inp.ssh;
                (
                    ResonanceCoefficients::Synchronous(SynchronousCoefficients::new(inp)),
                    xlamo,
                    bfact,
                )
            }
            Resonance::HalfDay => {
                let xlamo = inp.mean_anomaly + inp.raan + inp.raan - inp.thgr - inp.thgr;
                let bfact = inp.xmdot + inp.xnodot + inp.xnodot - THDT - THDT
                    + inp.ssl
                    + inp.ssh
                    + inp.ssh;
                (
                    ResonanceCoefficients::HalfDay(HalfDayCoefficients::new(inp)),
                    xlamo,
                    bfact,
                )
            }
        };

        Some(ResonanceIntegrator {
            coefficients,
            xlamo,
            xfact: bfact - inp.xnq,
            xnq: inp.xnq,
            omegaq: inp.arg_perigee,
            omgdot: inp.omgdot,
            xli: xlamo,
            xni: inp.xnq,
            atime: 0.0,
            phase: IntegratorPhase::NotStarted,
        })
    }

    pub fn coefficients(&self) -> &ResonanceCoefficients {
        &self.coefficients
    }

    pub fn resonance(&self) -> Resonance {
        match self.coefficients {
            ResonanceCoefficients::HalfDay(_) => Resonance::HalfDay,
            ResonanceCoefficients::Synchronous(_) => Resonance::Synchronous,
        }
    }

    /// Time of the stored state, minutes from epoch.
    pub fn atime(&self) -> f64 {
        self.atime
    }

    /// Phase the last query finished in.
    pub fn phase(&self) -> IntegratorPhase {
        self.phase
    }

    /// (dn/dt, d²n/dt², dλ/dt) at the stored state.
    fn rates(&self) -> (f64, f64, f64) {
        let (xndot, xnddt) = match &self.coefficients {
            ResonanceCoefficients::Synchronous(c) => c.rates(self.xli),
            ResonanceCoefficients::HalfDay(c) => {
                c.rates(self.xli, self.omegaq + self.omgdot * self.atime)
            }
        };
        let xldot = self.xni + self.xfact;
        (xndot, xnddt * xldot, xldot)
    }

    fn step(&mut self, delt: f64) {
        let (xndot, xnddt, xldot) = self.rates();
        self.xli += xldot * delt + xndot * STEP2;
        self.xni += xndot * delt + xnddt * STEP2;
        self.atime += delt;
    }

    fn restart(&mut self) {
        self.atime = 0.0;
        self.xni = self.xnq;
        self.xli = self.xlamo;
    }

    /// The stored state is unusable for `t` when nothing has been stepped
    /// or `t` is on the other side of the epoch.
    fn needs_restart(&self, t: f64) -> bool {
        self.atime == 0.0 || (t >= 0.0 && self.atime < 0.0) || (t < 0.0 && self.atime >= 0.0)
    }

    fn next_phase(&self, t: f64) -> IntegratorPhase {
        if t.abs() < self.atime.abs() {
            IntegratorPhase::SteppingBackward
        } else if (t - self.atime).abs() >= STEP_POSITIVE {
            IntegratorPhase::SteppingForward
        } else {
            IntegratorPhase::FinalShortStep
        }
    }

    /// Advances to `t` minutes from epoch and returns the resonant mean
    /// longitude and mean motion there.
    pub fn advance(&mut self, t: f64) -> ResonantSolution {
        let mut phase = if self.needs_restart(t) {
            IntegratorPhase::NotStarted
        } else {
            self.next_phase(t)
        };
        let mut steps = 0_u32;

        loop {
            match phase {
                IntegratorPhase::NotStarted => {
                    trace!(
                        "resonance integrator restart for t={t:.3} (stored atime {:.1})",
                        self.atime
                    );
                    self.restart();
                }
                IntegratorPhase::SteppingBackward => {
                    self.step(if t >= 0.0 { STEP_NEGATIVE } else { STEP_POSITIVE });
                    steps += 1;
                    // landing on the epoch drops the drifted state
                    if self.needs_restart(t) {
                        phase = IntegratorPhase::NotStarted;
                        continue;
                    }
                }
                IntegratorPhase::SteppingForward => {
                    self.step(if t > 0.0 { STEP_POSITIVE } else { STEP_NEGATIVE });
                    steps += 1;
                }
                IntegratorPhase::FinalShortStep => break,
            }
            phase = self.next_phase(t);
        }
        self.phase = phase;
        if steps > 0 {
            trace!("resonance integrator took {steps} steps, atime now {:.1}", self.atime);
        }

        let ft = t - self.atime;
        let (xndot, xnddt, xldot) = self.rates();
        ResonantSolution {
            xn: self.xni + xndot * ft + xnddt * ft * ft * 0.5,
            xl: self.xli + xldot * ft + xndot * ft * ft * 0.5,
        }
    }
}

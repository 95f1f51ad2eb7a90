// Propagation session: ties the near-Earth secular model, the deep-space
// engine and the Kepler solve together, then reconstructs the inertial
// state vector with the first-order J2 short-period terms.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{SECONDS_PER_DAY, X2O3};
use crate::deep_space::periodic::PeriodicElements;
use crate::deep_space::resonance::Resonance;
use crate::deep_space::DeepSpace;
use crate::earth_gravity::{EarthGravity, GravityModel};
use crate::elements::{ElementSet, MeanElements};
use crate::epoch::{jday_datetime, TleEpoch};
use crate::error::{PropagationWarning, Sdp4Error};
use crate::kepler::{solve_kepler, wrap_to_2pi};
use crate::near_earth::{CorrectedElements, DerivedSecularConstants};

/// Which theory a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelection {
    /// Deep space for un-Kozai'd periods of 225 minutes or more.
    #[default]
    Auto,
    DeepSpace,
    NearEarth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theory {
    NearEarth,
    DeepSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagatorOptions {
    pub gravity: GravityModel,
    pub model: ModelSelection,
}

/// Inertial position and velocity (true equator, mean equinox of epoch).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropagationResult {
    /// Minutes since the element epoch.
    pub tsince: f64,
    /// km
    pub position: [f64; 3],
    /// km/s
    pub velocity: [f64; 3],
    pub warnings: Vec<PropagationWarning>,
}

impl PropagationResult {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Turns the first warning, if any, into an error.
    pub fn into_strict(self) -> Result<Self, Sdp4Error> {
        match self.warnings.first() {
            Some(w) => Err((*w).into()),
            None => Ok(self),
        }
    }

    pub fn position_megameters(&self) -> [f64; 3] {
        self.position.map(|x| x * 1.0e-3)
    }

    pub fn velocity_km_per_day(&self) -> [f64; 3] {
        self.velocity.map(|v| v * SECONDS_PER_DAY)
    }
}

/// A propagation session for one element set.
///
/// Queries may come in any order. Resonant deep-space orbits keep their
/// integrator state between queries, so `propagate` takes `&mut self`; a
/// session shared across threads needs a lock around it.
#[derive(Debug, Clone)]
pub struct Propagator {
    elements: ElementSet,
    mean: MeanElements,
    options: PropagatorOptions,
    gravity: EarthGravity,
    secular: DerivedSecularConstants,
    theory: Theory,
    deep: Option<DeepSpace>,
}

impl Propagator {
    pub fn new(elements: &ElementSet, options: PropagatorOptions) -> Result<Self, Sdp4Error> {
        let mean = elements.to_mean_elements()?;
        let gravity = options.gravity.constants();
        let secular = DerivedSecularConstants::new(&mean, &gravity);

        let theory = match options.model {
            ModelSelection::Auto if secular.is_deep_space() => Theory::DeepSpace,
            ModelSelection::Auto => Theory::NearEarth,
            ModelSelection::DeepSpace => Theory::DeepSpace,
            ModelSelection::NearEarth => Theory::NearEarth,
        };
        let deep = match theory {
            Theory::DeepSpace => Some(DeepSpace::new(&mean, &secular)),
            Theory::NearEarth => None,
        };

        debug!(
            "propagator init: theory={:?} gravity={} period={:.3} min \
             perigee={:.3} km resonance={:?}",
            theory,
            gravity.model,
            secular.period_minutes(),
            secular.perigee_km,
            deep.as_ref().map(DeepSpace::resonance).unwrap_or(Resonance::None)
        );

        Ok(Propagator {
            elements: *elements,
            mean,
            options,
            gravity,
            secular,
            theory,
            deep,
        })
    }

    /// Session with the default options.
    pub fn from_elements(elements: &ElementSet) -> Result<Self, Sdp4Error> {
        Self::new(elements, PropagatorOptions::default())
    }

    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    pub fn mean_elements(&self) -> &MeanElements {
        &self.mean
    }

    pub fn options(&self) -> &PropagatorOptions {
        &self.options
    }

    pub fn gravity(&self) -> &EarthGravity {
        &self.gravity
    }

    pub fn theory(&self) -> Theory {
        self.theory
    }

    pub fn secular(&self) -> &DerivedSecularConstants {
        &self.secular
    }

    pub fn deep_space(&self) -> Option<&DeepSpace> {
        self.deep.as_ref()
    }

    /// Resonance class; `None` for near-Earth sessions.
    pub fn resonance(&self) -> Resonance {
        self.deep
            .as_ref()
            .map(DeepSpace::resonance)
            .unwrap_or(Resonance::None)
    }

    /// Time of the stored resonance integrator state, minutes from epoch.
    pub fn integrator_time(&self) -> Option<f64> {
        self.deep
            .as_ref()
            .and_then(DeepSpace::integrator)
            .map(|i| i.atime())
    }

    /// The perigee is at or below 98 km and drag uses its floor density
    /// reference.
    pub fn perigee_floor_clamped(&self) -> bool {
        self.secular.perigee_floor_clamped
    }

    pub fn epoch(&self) -> &TleEpoch {
        &self.mean.epoch
    }

    pub fn epoch_jd(&self) -> f64 {
        self.mean.epoch.julian_date()
    }

    pub fn epoch_days_since_1950(&self) -> f64 {
        self.mean.epoch.days_since_1950()
    }

    pub fn epoch_datetime(&self) -> Result<DateTime<Utc>, Sdp4Error> {
        self.mean.epoch.datetime()
    }

    /// Propagates to the split Julian date `jd + fr`.
    pub fn propagate_jd(&mut self, jd: f64, fr: f64) -> Result<PropagationResult, Sdp4Error> {
        let tsince = self.mean.epoch.minutes_until(jd, fr);
        self.propagate(tsince)
    }

    pub fn propagate_julian(&mut self, jd: f64) -> Result<PropagationResult, Sdp4Error> {
        self.propagate_jd(jd, 0.0)
    }

    pub fn propagate_datetime(
        &mut self,
        t: &DateTime<Utc>,
    ) -> Result<PropagationResult, Sdp4Error> {
        let (jd, fr) = jday_datetime(t);
        self.propagate_jd(jd, fr)
    }

    /// Propagates each offset in turn, reusing the session state.
    pub fn propagate_many(&mut self, tsinces: &[f64]) -> Vec<Result<PropagationResult, Sdp4Error>> {
        tsinces.iter().map(|&t| self.propagate(t)).collect()
    }

    /// Propagates to `tsince` minutes from the element epoch.
    pub fn propagate(&mut self, tsince: f64) -> Result<PropagationResult, Sdp4Error> {
        if !tsince.is_finite() {
            return Err(Sdp4Error::InvalidElements(format!(
                "query time {tsince} min is not finite"
            )));
        }

        let sec = self.secular.secular(&self.mean, tsince);
        let mean = match self.deep.as_mut() {
            None => self.secular.near_earth(&self.mean, &sec, tsince),
            Some(deep) => {
                let ds = deep.secular(&self.mean, &sec, tsince);
                let a = (self.gravity.xke / ds.mean_motion).powf(X2O3) * sec.tempa * sec.tempa;
                let e = ds.eccentricity - sec.tempe;
                let xmam = ds.mean_anomaly + self.secular.xnodp * sec.templ;
                let p = deep.periodic(
                    tsince,
                    PeriodicElements {
                        eccentricity: e,
                        inclination: ds.inclination,
                        arg_perigee: ds.arg_perigee,
                        raan: ds.raan,
                        mean_anomaly: xmam,
                    },
                );
                CorrectedElements {
                    a,
                    e: p.eccentricity,
                    inclination: p.inclination,
                    arg_perigee: p.arg_perigee,
                    raan: p.raan,
                    mean_longitude: p.mean_anomaly + p.arg_perigee + p.raan,
                }
            }
        };

        if !(mean.a >= 0.95) {
            return Err(Sdp4Error::DecayedOrbit {
                height_km: (mean.a - 1.0) * self.gravity.radius_km,
            });
        }
        if !(-0.001..1.0).contains(&mean.e) {
            return Err(Sdp4Error::InvalidElements(format!(
                "perturbed eccentricity {} at {tsince} min outside [0, 1)",
                mean.e
            )));
        }

        self.reconstruct(tsince, &mean)
    }

    /// Long-period terms, Kepler solve and short-period terms, then the
    /// rotation to inertial axes.
    fn reconstruct(
        &self,
        tsince: f64,
        m: &CorrectedElements,
    ) -> Result<PropagationResult, Sdp4Error> {
        let c = &self.secular;
        let xke = self.gravity.xke;
        let ck2 = self.gravity.ck2;
        let mut warnings = Vec::new();

        let (a, e) = (m.a, m.e);
        let beta = (1.0 - e * e).sqrt();
        let xn = xke / a.powf(1.5);

        // long period
        let axn = e * m.arg_perigee.cos();
        let temp = 1.0 / (a * beta * beta);
        let xll = temp * c.xlcof * axn;
        let aynl = temp * c.aycof;
        let xlt = m.mean_longitude + xll;
        let ayn = e * m.arg_perigee.sin() + aynl;

        let capu = wrap_to_2pi(xlt - m.raan);
        let kep = solve_kepler(capu, axn, ayn);
        if !kep.converged {
            warn!(
                "Kepler solver stopped after {} iterations at t={tsince} min \
                 (last correction {:e} rad)",
                kep.iterations, kep.residual
            );
            warnings.push(PropagationWarning::KeplerNotConverged {
                iterations: kep.iterations,
                residual: kep.residual,
            });
        }
        let (sinepw, cosepw) = (kep.sin_epw, kep.cos_epw);
        let (ecose, esine) = (kep.ecose, kep.esine);

        // short period preliminary quantities
        let elsq = axn * axn + ayn * ayn;
        let temp = 1.0 - elsq;
        let pl = a * temp;
        if pl < 0.0 {
            return Err(Sdp4Error::InvalidElements(format!(
                "semi-latus rectum {pl} at {tsince} min is negative"
            )));
        }
        let r = a * (1.0 - ecose);
        let temp1 = 1.0 / r;
        let rdot = xke * a.sqrt() * esine * temp1;
        let rfdot = xke * pl.sqrt() * temp1;
        let temp2 = a * temp1;
        let betal = temp.sqrt();
        let temp3 = 1.0 / (1.0 + betal);
        let cosu = temp2 * (cosepw - axn + ayn * esine * temp3);
        let sinu = temp2 * (sinepw - ayn - axn * esine * temp3);
        let u = sinu.atan2(cosu);
        let sin2u = 2.0 * sinu * cosu;
        let cos2u = 2.0 * cosu * cosu - 1.0;
        let temp = 1.0 / pl;
        let temp1 = ck2 * temp;
        let temp2 = temp1 * temp;

        // short periodics
        let rk = r * (1.0 - 1.5 * temp2 * betal * c.x3thm1) + 0.5 * temp1 * c.x1mth2 * cos2u;
        let uk = u - 0.25 * temp2 * c.x7thm1 * sin2u;
        let xnodek = m.raan + 1.5 * temp2 * c.cosio * sin2u;
        let xinck = m.inclination + 1.5 * temp2 * c.cosio * c.sinio * cos2u;
        let rdotk = rdot - xn * temp1 * c.x1mth2 * sin2u;
        let rfdotk = rfdot + xn * temp1 * (c.x1mth2 * cos2u + 1.5 * c.x3thm1);

        // orientation vectors
        let (sinuk, cosuk) = uk.sin_cos();
        let (sinik, cosik) = xinck.sin_cos();
        let (sinnok, cosnok) = xnodek.sin_cos();
        let xmx = -sinnok * cosik;
        let xmy = cosnok * cosik;
        let ux = xmx * sinuk + cosnok * cosuk;
        let uy = xmy * sinuk + sinnok * cosuk;
        let uz = sinik * sinuk;
        let vx = xmx * cosuk - cosnok * sinuk;
        let vy = xmy * cosuk - sinnok * sinuk;
        let vz = sinik * cosuk;

        let rkm = rk * self.gravity.radius_km;
        let vscale = self.gravity.velocity_scale();
        let position = [rkm * ux, rkm * uy, rkm * uz];
        let velocity = [
            (rdotk * ux + rfdotk * vx) * vscale,
            (rdotk * uy + rfdotk * vy) * vscale,
            (rdotk * uz + rfdotk * vz) * vscale,
        ];

        if rk < 1.0 {
            let height_km = (rk - 1.0) * self.gravity.radius_km;
            warn!("radius below the Earth's surface at t={tsince} min ({height_km:.3} km)");
            warnings.push(PropagationWarning::Decayed { height_km });
        }

        Ok(PropagationResult {
            tsince,
            position,
            velocity,
            warnings,
        })
    }
}

//! Deep-space perturbations: luni-solar secular and periodic terms and, for
//! 12-hour and 24-hour orbits, the geopotential resonance integrator.

pub mod lunisolar;
pub mod periodic;
pub mod resonance;

use std::f64::consts::PI;

use log::debug;

use crate::constants::THDT;
use crate::elements::MeanElements;
use crate::near_earth::{DerivedSecularConstants, SecularElements};

use self::lunisolar::{LuniSolarTerms, OrbitGeometry};
use self::periodic::{PeriodicCache, PeriodicElements};
use self::resonance::{Resonance, ResonanceCoefficients, ResonanceInputs, ResonanceIntegrator};

/// Mean elements after the deep-space secular update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeepSecular {
    pub mean_anomaly: f64,
    pub arg_perigee: f64,
    pub raan: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    /// Mean motion, rad/min; the resonant value for resonant orbits.
    pub mean_motion: f64,
}

/// Per-session deep-space state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSpace {
    lunisolar: LuniSolarTerms,
    resonance: Resonance,
    integrator: Option<ResonanceIntegrator>,
    periodic: PeriodicCache,
    /// Greenwich sidereal angle at epoch.
    thgr: f64,
    xqncl: f64,
    eo: f64,
    sinio: f64,
    cosio: f64,
    xnodp: f64,
}

impl DeepSpace {
    pub fn new(el: &MeanElements, sec: &DerivedSecularConstants) -> Self {
        let ds50 = el.epoch.days_since_1950();
        let thgr = el.epoch.gmst();
        let (sing, cosg) = el.arg_perigee.sin_cos();

        let orbit = OrbitGeometry {
            eccentricity: el.eccentricity,
            eosq: sec.eosq,
            betao: sec.betao,
            betao2: sec.betao2,
            cosio: sec.cosio,
            sinio: sec.sinio,
            sin_arg_perigee: sing,
            cos_arg_perigee: cosg,
            inclination: el.inclination,
            mean_motion: sec.xnodp,
        };
        let lunisolar = LuniSolarTerms::new(ds50, el.raan, &orbit);

        let resonance = Resonance::classify(sec.xnodp, el.eccentricity);
        let inputs = ResonanceInputs {
            xnq: sec.xnodp,
            aqnv: 1.0 / sec.aodp,
            eccentricity: el.eccentricity,
            cosio: sec.cosio,
            sinio: sec.sinio,
            mean_anomaly: el.mean_anomaly,
            raan: el.raan,
            arg_perigee: el.arg_perigee,
            thgr,
            xmdot: sec.xmdot,
            omgdot: sec.omgdot,
            xnodot: sec.xnodot,
            ssl: lunisolar.ssl,
            ssg: lunisolar.ssg,
            ssh: lunisolar.ssh,
        };
        let integrator = ResonanceIntegrator::new(resonance, &inputs);

        debug!(
            "deep-space init: ds50={:.8} thgr={:.9} resonance={:?} \
             ssl={:.3e} ssg={:.3e} ssh={:.3e}",
            ds50, thgr, resonance, lunisolar.ssl, lunisolar.ssg, lunisolar.ssh
        );

        DeepSpace {
            lunisolar,
            resonance,
            integrator,
            periodic: PeriodicCache::default(),
            thgr,
            xqncl: el.inclination,
            eo: el.eccentricity,
            sinio: sec.sinio,
            cosio: sec.cosio,
            xnodp: sec.xnodp,
        }
    }

    pub fn resonance(&self) -> Resonance {
        self.resonance
    }

    pub fn integrator(&self) -> Option<&ResonanceIntegrator> {
        self.integrator.as_ref()
    }

    pub fn lunisolar(&self) -> &LuniSolarTerms {
        &self.lunisolar
    }

    pub fn periodic_cache(&self) -> &PeriodicCache {
        &self.periodic
    }

    pub fn gmst_at_epoch(&self) -> f64 {
        self.thgr
    }

    /// Luni-solar secular drift plus, for resonant orbits, the integrated
    /// resonance terms at `t` minutes from epoch.
    pub fn secular(&mut self, el: &MeanElements, s: &SecularElements, t: f64) -> DeepSecular {
        let ls = &self.lunisolar;
        let mut xll = s.mean_anomaly + ls.ssl * t;
        let mut omgasm = s.arg_perigee + ls.ssg * t;
        let mut xnodes = s.raan + ls.ssh * t;
        let em = self.eo + ls.sse * t;
        let mut xinc = el.inclination + ls.ssi * t;
        if xinc < 0.0 {
            xinc = -xinc;
            xnodes += PI;
            omgasm -= PI;
        }

        let mut xn = self.xnodp;
        if let Some(integ) = self.integrator.as_mut() {
            let sol = integ.advance(t);
            xn = sol.xn;
            let temp = -xnodes + self.thgr + t * THDT;
            xll = match integ.coefficients() {
                ResonanceCoefficients::Synchronous(_) => sol.xl - omgasm + temp,
                ResonanceCoefficients::HalfDay(_) => sol.xl + temp + temp,
            };
        }

        DeepSecular {
            mean_anomaly: xll,
            arg_perigee: omgasm,
            raan: xnodes,
            eccentricity: em,
            inclination: xinc,
            mean_motion: xn,
        }
    }

    /// Luni-solar periodic corrections at `t`.
    pub fn periodic(&mut self, t: f64, el: PeriodicElements) -> PeriodicElements {
        self.periodic
            .apply(&self.lunisolar, t, self.xqncl, self.sinio, self.cosio, el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earth_gravity::EarthGravity;
    use crate::elements::ElementSet;

    fn molniya() -> MeanElements {
        ElementSet {
            ndot: 0.00000099,
            nddot: 0.0,
            bstar: 0.11873e-3,
            inclination_deg: 64.1586,
            raan_deg: 279.0717,
            eccentricity_e7: 6877146,
            arg_perigee_deg: 264.7651,
            mean_anomaly_deg: 20.2257,
            mean_motion: 2.00491383,
            epoch: 6176.33215444,
        }
        .to_mean_elements()
        .unwrap()
    }

    #[test]
    fn molniya_is_half_day_resonant() {
        let el = molniya();
        let sec = DerivedSecularConstants::new(&el, &EarthGravity::default());
        let ds = DeepSpace::new(&el, &sec);
        assert_eq!(ds.resonance(), Resonance::HalfDay);
        assert!(ds.integrator().is_some());
        // same element set, same classification
        assert_eq!(DeepSpace::new(&el, &sec).resonance(), ds.resonance());
    }

    #[test]
    fn integrator_class_follows_session_class() {
        let geo = ElementSet {
            ndot: -0.00000094,
            nddot: 0.0,
            bstar: 0.1e-3,
            inclination_deg: 3.8536,
            raan_deg: 80.0121,
            eccentricity_e7: 26640,
            arg_perigee_deg: 311.0977,
            mean_anomaly_deg: 48.3,
            mean_motion: 1.00778054,
            epoch: 6177.04061740,
        }
        .to_mean_elements()
        .unwrap();
        for el in [geo, molniya()] {
            let sec = DerivedSecularConstants::new(&el, &EarthGravity::default());
            let ds = DeepSpace::new(&el, &sec);
            let integ = ds.integrator().unwrap();
            assert_eq!(integ.resonance(), ds.resonance());
            let synchronous = matches!(
                integ.coefficients(),
                ResonanceCoefficients::Synchronous(_)
            );
            assert_eq!(synchronous, ds.resonance() == Resonance::Synchronous);
        }
    }

    #[test]
    fn secular_at_epoch_keeps_epoch_elements() {
        let el = molniya();
        let sec = DerivedSecularConstants::new(&el, &EarthGravity::default());
        let mut ds = DeepSpace::new(&el, &sec);
        let s = sec.secular(&el, 0.0);
        let out = ds.secular(&el, &s, 0.0);
        assert_eq!(out.eccentricity, el.eccentricity);
        assert_eq!(out.inclination, el.inclination);
        assert_eq!(out.mean_motion, sec.xnodp);
        // the resonant longitude maps back onto the epoch mean anomaly
        let dm = (out.mean_anomaly - el.mean_anomaly).rem_euclid(crate::constants::TWOPI);
        assert!(dm < 1e-9 || dm > crate::constants::TWOPI - 1e-9, "dm {dm}");
    }
}

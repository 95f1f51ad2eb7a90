//! Near-Earth secular model: one-time derivation of the J2/J4 secular rates
//! and drag coefficients, and the per-query secular and drag update.

use log::{debug, warn};

use crate::constants::{DEEP_SPACE_PERIOD_MIN, TWOPI, X2O3};
use crate::earth_gravity::EarthGravity;
use crate::elements::MeanElements;

/// Floor for the `1 + cos i` divisor of the long-period coefficient.
const RETROGRADE_EQUATORIAL_FLOOR: f64 = 1.5e-12;

/// Constants derived once per element set.
///
/// Field names follow the theory's symbols. Angles in radians, time in
/// minutes, distance in Earth radii.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSecularConstants {
    /// Un-Kozai'd semi-major axis.
    pub aodp: f64,
    /// Un-Kozai'd mean motion, rad/min.
    pub xnodp: f64,
    pub cosio: f64,
    pub sinio: f64,
    pub theta2: f64,
    pub x3thm1: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
    pub eosq: f64,
    pub betao: f64,
    pub betao2: f64,
    /// Perigee height above the equatorial radius, km.
    pub perigee_km: f64,
    /// Drag reference radius after the low-perigee adjustment.
    pub s4: f64,
    pub qoms24: f64,
    /// The perigee is at or below 98 km and `s4` sits on its 20 km floor.
    pub perigee_floor_clamped: bool,
    pub eta: f64,
    pub c1: f64,
    pub c4: f64,
    pub c5: f64,
    pub xmdot: f64,
    pub omgdot: f64,
    pub xnodot: f64,
    pub omgcof: f64,
    pub xmcof: f64,
    pub xnodcf: f64,
    pub t2cof: f64,
    pub xlcof: f64,
    pub aycof: f64,
    pub delmo: f64,
    pub sinmo: f64,
    /// Perigee below 220 km: the higher-order drag terms are dropped.
    pub simplified_drag: bool,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
}

/// Mean elements after the secular gravity and first-order drag update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecularElements {
    pub mean_anomaly: f64,
    pub arg_perigee: f64,
    pub raan: f64,
    pub tempa: f64,
    pub tempe: f64,
    pub templ: f64,
}

/// Mean elements at the query time, ready for the short-period
/// reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedElements {
    /// Semi-major axis, Earth radii.
    pub a: f64,
    pub e: f64,
    pub inclination: f64,
    pub arg_perigee: f64,
    pub raan: f64,
    /// Mean longitude (M + ω + Ω).
    pub mean_longitude: f64,
}

impl DerivedSecularConstants {
    pub fn new(el: &MeanElements, grav: &EarthGravity) -> Self {
        let eo = el.eccentricity;
        let ck2 = grav.ck2;

        // recover the original mean motion and semi-major axis
        let a1 = (grav.xke / el.mean_motion).powf(X2O3);
        let cosio = el.inclination.cos();
        let theta2 = cosio * cosio;
        let x3thm1 = 3.0 * theta2 - 1.0;
        let eosq = eo * eo;
        let betao2 = 1.0 - eosq;
        let betao = betao2.sqrt();
        let del1 = 1.5 * ck2 * x3thm1 / (a1 * a1 * betao * betao2);
        let ao = a1 * (1.0 - del1 * (0.5 * X2O3 + del1 * (1.0 + 134.0 / 81.0 * del1)));
        let delo = 1.5 * ck2 * x3thm1 / (ao * ao * betao * betao2);
        let xnodp = el.mean_motion / (1.0 + delo);
        let aodp = ao / (1.0 - delo);

        // drag density reference for low perigees
        let mut s4 = grav.s;
        let mut qoms24 = grav.qoms2t;
        let perigee_km = (aodp * (1.0 - eo) - 1.0) * grav.radius_km;
        let mut perigee_floor_clamped = false;
        if perigee_km < 156.0 {
            s4 = perigee_km - 78.0;
            if perigee_km <= 98.0 {
                s4 = 20.0;
                perigee_floor_clamped = true;
                warn!(
                    "perigee height {:.1} km is at or below 98 km; drag reference clamped to 20 km",
                    perigee_km
                );
            }
            qoms24 = ((120.0 - s4) / grav.radius_km).powi(4);
            s4 = s4 / grav.radius_km + 1.0;
        }

        let pinvsq = 1.0 / (aodp * aodp * betao2 * betao2);
        let tsi = 1.0 / (aodp - s4);
        let eta = aodp * eo * tsi;
        let etasq = eta * eta;
        let eeta = eo * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qoms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);
        let c2 = coef1
            * xnodp
            * (aodp * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.75 * ck2 * tsi / psisq * x3thm1 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let c1 = el.bstar * c2;
        let sinio = el.inclination.sin();
        let c3 = if eo > 1.0e-4 {
            coef * tsi * grav.a3ovk2 * xnodp * sinio / eo
        } else {
            0.0
        };
        let x1mth2 = 1.0 - theta2;
        let c4 = 2.0
            * xnodp
            * coef1
            * aodp
            * betao2
            * (eta * (2.0 + 0.5 * etasq) + eo * (0.5 + 2.0 * etasq)
                - 2.0 * ck2 * tsi / (aodp * psisq)
                    * (-3.0 * x3thm1 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * el.arg_perigee).cos()));
        let c5 = 2.0 * coef1 * aodp * betao2 * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // secular rates of M, ω and Ω
        let theta4 = theta2 * theta2;
        let temp1 = 3.0 * ck2 * pinvsq * xnodp;
        let temp2 = temp1 * ck2 * pinvsq;
        let temp3 = 1.25 * grav.ck4 * pinvsq * pinvsq * xnodp;
        let xmdot = xnodp
            + 0.5 * temp1 * betao * x3thm1
            + 0.0625 * temp2 * betao * (13.0 - 78.0 * theta2 + 137.0 * theta4);
        let x1m5th = 1.0 - 5.0 * theta2;
        let omgdot = -0.5 * temp1 * x1m5th
            + 0.0625 * temp2 * (7.0 - 114.0 * theta2 + 395.0 * theta4)
            + temp3 * (3.0 - 36.0 * theta2 + 49.0 * theta4);
        let xhdot1 = -temp1 * cosio;
        let xnodot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * theta2) + 2.0 * temp3 * (3.0 - 7.0 * theta2)) * cosio;

        let omgcof = el.bstar * c3 * el.arg_perigee.cos();
        let xmcof = if eo > 1.0e-4 {
            -X2O3 * coef * el.bstar / eeta
        } else {
            0.0
        };
        let xnodcf = 3.5 * betao2 * xhdot1 * c1;
        let t2cof = 1.5 * c1;
        let mut xlcof_den = 1.0 + cosio;
        if xlcof_den.abs() < RETROGRADE_EQUATORIAL_FLOOR {
            xlcof_den = RETROGRADE_EQUATORIAL_FLOOR;
        }
        let xlcof = 0.125 * grav.a3ovk2 * sinio * (3.0 + 5.0 * cosio) / xlcof_den;
        let aycof = 0.25 * grav.a3ovk2 * sinio;
        let delmo = (1.0 + eta * el.mean_anomaly.cos()).powi(3);
        let sinmo = el.mean_anomaly.sin();
        let x7thm1 = 7.0 * theta2 - 1.0;

        let simplified_drag = aodp * (1.0 - eo) < 220.0 / grav.radius_km + 1.0;
        let (mut d2, mut d3, mut d4) = (0.0, 0.0, 0.0);
        let (mut t3cof, mut t4cof, mut t5cof) = (0.0, 0.0, 0.0);
        if !simplified_drag {
            let c1sq = c1 * c1;
            d2 = 4.0 * aodp * tsi * c1sq;
            let temp = d2 * tsi * c1 / 3.0;
            d3 = (17.0 * aodp + s4) * temp;
            d4 = 0.5 * temp * aodp * tsi * (221.0 * aodp + 31.0 * s4) * c1;
            t3cof = d2 + 2.0 * c1sq;
            t4cof = 0.25 * (3.0 * d3 + c1 * (12.0 * d2 + 10.0 * c1sq));
            t5cof = 0.2
                * (3.0 * d4 + 12.0 * c1 * d3 + 6.0 * d2 * d2 + 15.0 * c1sq * (2.0 * d2 + c1sq));
        }

        debug!(
            "secular init: xnodp={:.9} rad/min aodp={:.6} er perigee={:.3} km simplified_drag={}",
            xnodp, aodp, perigee_km, simplified_drag
        );

        DerivedSecularConstants {
            aodp,
            xnodp,
            cosio,
            sinio,
            theta2,
            x3thm1,
            x1mth2,
            x7thm1,
            eosq,
            betao,
            betao2,
            perigee_km,
            s4,
            qoms24,
            perigee_floor_clamped,
            eta,
            c1,
            c4,
            c5,
            xmdot,
            omgdot,
            xnodot,
            omgcof,
            xmcof,
            xnodcf,
            t2cof,
            xlcof,
            aycof,
            delmo,
            sinmo,
            simplified_drag,
            d2,
            d3,
            d4,
            t3cof,
            t4cof,
            t5cof,
        }
    }

    /// Un-Kozai'd orbital period, minutes.
    pub fn period_minutes(&self) -> f64 {
        TWOPI / self.xnodp
    }

    /// Whether the period calls for the deep-space theory.
    pub fn is_deep_space(&self) -> bool {
        self.period_minutes() >= DEEP_SPACE_PERIOD_MIN
    }

    /// Secular gravity and first-order drag update, common to both theories.
    pub fn secular(&self, el: &MeanElements, t: f64) -> SecularElements {
        let tsq = t * t;
        SecularElements {
            mean_anomaly: el.mean_anomaly + self.xmdot * t,
            arg_perigee: el.arg_perigee + self.omgdot * t,
            raan: el.raan + self.xnodot * t + self.xnodcf * tsq,
            tempa: 1.0 - self.c1 * t,
            tempe: el.bstar * self.c4 * t,
            templ: self.t2cof * tsq,
        }
    }

    /// Completes the near-Earth update with the higher-order drag terms.
    pub fn near_earth(
        &self,
        el: &MeanElements,
        sec: &SecularElements,
        t: f64,
    ) -> CorrectedElements {
        let mut xmp = sec.mean_anomaly;
        let mut omega = sec.arg_perigee;
        let mut tempa = sec.tempa;
        let mut tempe = sec.tempe;
        let mut templ = sec.templ;

        if !self.simplified_drag {
            let delomg = self.omgcof * t;
            let delm =
                self.xmcof * ((1.0 + self.eta * sec.mean_anomaly.cos()).powi(3) - self.delmo);
            let temp = delomg + delm;
            xmp = sec.mean_anomaly + temp;
            omega = sec.arg_perigee - temp;
            let tsq = t * t;
            let tcube = tsq * t;
            let tfour = t * tcube;
            tempa = tempa - self.d2 * tsq - self.d3 * tcube - self.d4 * tfour;
            tempe += el.bstar * self.c5 * (xmp.sin() - self.sinmo);
            templ = templ + self.t3cof * tcube + tfour * (self.t4cof + t * self.t5cof);
        }

        CorrectedElements {
            a: self.aodp * tempa * tempa,
            e: el.eccentricity - tempe,
            inclination: el.inclination,
            arg_perigee: omega,
            raan: sec.raan,
            mean_longitude: xmp + omega + sec.raan + self.xnodp * templ,
        }
    }
}

//! Luni-solar periodic corrections.

use std::f64::consts::PI;

use crate::constants::{LUNAR, LYDDANE_INCLINATION, PERIODIC_REFRESH_MIN, SOLAR, TWOPI};
use crate::kepler::wrap_to_2pi;

use super::lunisolar::{BodyCoefficients, LuniSolarTerms};

/// Elements the periodic corrections are applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicElements {
    pub eccentricity: f64,
    pub inclination: f64,
    pub arg_perigee: f64,
    pub raan: f64,
    pub mean_anomaly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct BodyPeriodics {
    e: f64,
    i: f64,
    l: f64,
    gh: f64,
    h: f64,
}

impl BodyPeriodics {
    fn at(c: &BodyCoefficients, zm: f64, ze: f64) -> Self {
        let zf = zm + 2.0 * ze * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();
        BodyPeriodics {
            e: c.e2 * f2 + c.e3 * f3,
            i: c.i2 * f2 + c.i3 * f3,
            l: c.l2 * f2 + c.l3 * f3 + c.l4 * sinzf,
            gh: c.gh2 * f2 + c.gh3 * f3 + c.gh4 * sinzf,
            h: c.h2 * f2 + c.h3 * f3,
        }
    }
}

/// Periodic amplitudes, refreshed only when the query time moves by
/// [`PERIODIC_REFRESH_MIN`] or more.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicCache {
    /// Time of the last refresh; starts far from any query.
    savtsn: f64,
    pe: f64,
    pinc: f64,
    pl: f64,
    pgh: f64,
    ph: f64,
}

impl Default for PeriodicCache {
    fn default() -> Self {
        PeriodicCache {
            savtsn: 1.0e20,
            pe: 0.0,
            pinc: 0.0,
            pl: 0.0,
            pgh: 0.0,
            ph: 0.0,
        }
    }
}

impl PeriodicCache {
    /// Time of the cached evaluation, if any.
    pub fn evaluated_at(&self) -> Option<f64> {
        (self.savtsn != 1.0e20).then_some(self.savtsn)
    }

    fn refresh(&mut self, terms: &LuniSolarTerms, t: f64) {
        if (self.savtsn - t).abs() < PERIODIC_REFRESH_MIN {
            return;
        }
        self.savtsn = t;
        let sun = BodyPeriodics::at(&terms.solar, terms.zmos + SOLAR.zn * t, SOLAR.ze);
        let moon = BodyPeriodics::at(&terms.lunar, terms.zmol + LUNAR.zn * t, LUNAR.ze);
        self.pe = sun.e + moon.e;
        self.pinc = sun.i + moon.i;
        self.pl = sun.l + moon.l;
        self.pgh = sun.gh + moon.gh;
        self.ph = sun.h + moon.h;
    }

    /// Applies the corrections at `t`. `sinio`/`cosio` are of the epoch
    /// inclination, `xqncl` the epoch inclination itself.
    pub fn apply(
        &mut self,
        terms: &LuniSolarTerms,
        t: f64,
        xqncl: f64,
        sinio: f64,
        cosio: f64,
        el: PeriodicElements,
    ) -> PeriodicElements {
        let (sinis, cosis) = el.inclination.sin_cos();
        self.refresh(terms, t);

        let mut out = el;
        out.inclination += self.pinc;
        out.eccentricity += self.pe;

        if xqncl >= LYDDANE_INCLINATION {
            let ph = self.ph / sinio;
            let pgh = self.pgh - cosio * ph;
            out.arg_perigee += pgh;
            out.raan += ph;
            out.mean_anomaly += self.pl;
        } else {
            // Lyddane: node and inclination through (sin i sin Ω, sin i cos Ω)
            let (sinok, cosok) = el.raan.sin_cos();
            let mut alfdp = sinis * sinok;
            let mut betdp = sinis * cosok;
            alfdp += self.ph * cosok + self.pinc * cosis * sinok;
            betdp += -self.ph * sinok + self.pinc * cosis * cosok;
            let xnodes = wrap_to_2pi(el.raan);
            let mut xls = el.mean_anomaly + el.arg_perigee + cosis * xnodes;
            xls += self.pl + self.pgh - self.pinc * xnodes * sinis;
            let xnoh = xnodes;
            let mut node = wrap_to_2pi(alfdp.atan2(betdp));
            if (xnoh - node).abs() > PI {
                if node < xnoh {
                    node += TWOPI;
                } else {
                    node -= TWOPI;
                }
            }
            out.raan = node;
            out.mean_anomaly = el.mean_anomaly + self.pl;
            out.arg_perigee = xls - out.mean_anomaly - out.inclination.cos() * node;
        }
        out
    }
}

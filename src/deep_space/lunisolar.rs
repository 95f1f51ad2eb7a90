//! Solar and lunar perturbation coefficients at the element epoch.

use crate::constants::{
    PerturberConstants, LUNAR, SHALLOW_INCLINATION, SOLAR, ZCOSGS, ZCOSIS, ZSINGS, ZSINIS,
};
use crate::kepler::wrap_to_2pi;

/// Orientation of a perturbing body's orbit relative to the equator and
/// to the satellite's node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyGeometry {
    pub zcosg: f64,
    pub zsing: f64,
    pub zcosi: f64,
    pub zsini: f64,
    pub zcosh: f64,
    pub zsinh: f64,
}

/// Satellite quantities the coefficient formulas read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitGeometry {
    pub eccentricity: f64,
    pub eosq: f64,
    pub betao: f64,
    pub betao2: f64,
    pub cosio: f64,
    pub sinio: f64,
    pub sin_arg_perigee: f64,
    pub cos_arg_perigee: f64,
    pub inclination: f64,
    pub mean_motion: f64,
}

/// Secular rates and periodic amplitudes contributed by one body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyCoefficients {
    pub se: f64,
    pub si: f64,
    pub sl: f64,
    pub sgh: f64,
    pub sh: f64,
    pub e2: f64,
    pub e3: f64,
    pub i2: f64,
    pub i3: f64,
    pub l2: f64,
    pub l3: f64,
    pub l4: f64,
    pub gh2: f64,
    pub gh3: f64,
    pub gh4: f64,
    pub h2: f64,
    pub h3: f64,
}

impl BodyCoefficients {
    /// Coefficients of one body. The arithmetic is shared by the sun and
    /// the moon; only `body` and `geom` differ.
    pub fn compute(body: &PerturberConstants, geom: &BodyGeometry, orbit: &OrbitGeometry) -> Self {
        let BodyGeometry {
            zcosg,
            zsing,
            zcosi,
            zsini,
            zcosh,
            zsinh,
        } = *geom;
        let (cosio, sinio) = (orbit.cosio, orbit.sinio);
        let (sing, cosg) = (orbit.sin_arg_perigee, orbit.cos_arg_perigee);
        let eosq = orbit.eosq;

        let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
        let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
        let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
        let a8 = zsing * zsini;
        let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
        let a10 = zcosg * zsini;
        let a2 = cosio * a7 + sinio * a8;
        let a4 = cosio * a9 + sinio * a10;
        let a5 = -sinio * a7 + cosio * a8;
        let a6 = -sinio * a9 + cosio * a10;

        let x1 = a1 * cosg + a2 * sing;
        let x2 = a3 * cosg + a4 * sing;
        let x3 = -a1 * sing + a2 * cosg;
        let x4 = -a3 * sing + a4 * cosg;
        let x5 = a5 * sing;
        let x6 = a6 * sing;
        let x7 = a5 * cosg;
        let x8 = a6 * cosg;

        let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        let mut z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * eosq;
        let mut z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * eosq;
        let mut z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * eosq;
        let z11 = -6.0 * a1 * a5 + eosq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
        let z12 = -6.0 * (a1 * a6 + a3 * a5)
            + eosq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
        let z13 = -6.0 * a3 * a6 + eosq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
        let z21 = 6.0 * a2 * a5 + eosq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
        let z22 = 6.0 * (a4 * a5 + a2 * a6)
            + eosq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
        let z23 = 6.0 * a4 * a6 + eosq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
        z1 = z1 + z1 + orbit.betao2 * z31;
        z2 = z2 + z2 + orbit.betao2 * z32;
        z3 = z3 + z3 + orbit.betao2 * z33;

        let s3 = body.cc / orbit.mean_motion;
        let s2 = -0.5 * s3 / orbit.betao;
        let s4 = s3 * orbit.betao;
        let s1 = -15.0 * orbit.eccentricity * s4;
        let s5 = x1 * x3 + x2 * x4;
        let s6 = x2 * x3 + x1 * x4;
        let s7 = x2 * x4 - x1 * x3;
        let zn = body.zn;

        let sh = if orbit.inclination < SHALLOW_INCLINATION {
            0.0
        } else {
            -zn * s2 * (z21 + z23)
        };

        BodyCoefficients {
            se: s1 * zn * s5,
            si: s2 * zn * (z11 + z13),
            sl: -zn * s3 * (z1 + z3 - 14.0 - 6.0 * eosq),
            sgh: s4 * zn * (z31 + z33 - 6.0),
            sh,
            e2: 2.0 * s1 * s6,
            e3: 2.0 * s1 * s7,
            i2: 2.0 * s2 * z12,
            i3: 2.0 * s2 * (z13 - z11),
            l2: -2.0 * s3 * z2,
            l3: -2.0 * s3 * (z3 - z1),
            l4: -2.0 * s3 * (-21.0 - 9.0 * eosq) * body.ze,
            gh2: 2.0 * s4 * z32,
            gh3: 2.0 * s4 * (z33 - z31),
            gh4: -18.0 * s4 * body.ze,
            h2: -2.0 * s2 * z22,
            h3: -2.0 * s2 * (z23 - z21),
        }
    }
}

/// Combined luni-solar terms of a deep-space element set.
#[derive(Debug, Clone, PartialEq)]
pub struct LuniSolarTerms {
    pub solar: BodyCoefficients,
    pub lunar: BodyCoefficients,
    /// Secular rates of e, i, M, ω and Ω (per minute).
    pub sse: f64,
    pub ssi: f64,
    pub ssl: f64,
    pub ssg: f64,
    pub ssh: f64,
    /// Mean anomalies of the sun and moon at epoch.
    pub zmos: f64,
    pub zmol: f64,
}

impl LuniSolarTerms {
    /// `ds50` is the epoch in days since 1950 Jan 0.0, `raan` the
    /// satellite's node at epoch.
    pub fn new(ds50: f64, raan: f64, orbit: &OrbitGeometry) -> Self {
        let (sinq, cosq) = raan.sin_cos();

        // lunar orbit at epoch
        let day = ds50 + 18_261.5;
        let xnodce = 4.523_602_0 - 9.242_202_9e-4 * day;
        let (stem, ctem) = xnodce.sin_cos();
        let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
        let zsinil = (1.0 - zcosil * zcosil).sqrt();
        let zsinhl = 0.089_683_511 * stem / zsinil;
        let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
        let c = 4.719_967_2 + 0.229_971_50 * day;
        let gam = 5.835_151_4 + 0.001_944_368_0 * day;
        let zmol = wrap_to_2pi(c - gam);
        let zx = 0.397_854_16 * stem / zsinil;
        let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
        let zx = gam + zx.atan2(zy) - xnodce;
        let (zsingl, zcosgl) = zx.sin_cos();
        let zmos = wrap_to_2pi(6.256_583_7 + 0.017_201_977 * day);

        let solar_geom = BodyGeometry {
            zcosg: ZCOSGS,
            zsing: ZSINGS,
            zcosi: ZCOSIS,
            zsini: ZSINIS,
            zcosh: cosq,
            zsinh: sinq,
        };
        let lunar_geom = BodyGeometry {
            zcosg: zcosgl,
            zsing: zsingl,
            zcosi: zcosil,
            zsini: zsinil,
            zcosh: zcoshl * cosq + zsinhl * sinq,
            zsinh: sinq * zcoshl - cosq * zsinhl,
        };
        let solar = BodyCoefficients::compute(&SOLAR, &solar_geom, orbit);
        let lunar = BodyCoefficients::compute(&LUNAR, &lunar_geom, orbit);

        let (cosio, sinio) = (orbit.cosio, orbit.sinio);
        let mut sse = solar.se;
        let mut ssi = solar.si;
        let mut ssl = solar.sl;
        let mut ssh = 0.0;
        let mut ssg = solar.sgh;
        if sinio != 0.0 {
            ssh = solar.sh / sinio;
            ssg -= cosio * ssh;
        }
        sse += lunar.se;
        ssi += lunar.si;
        ssl += lunar.sl;
        ssg += lunar.sgh;
        if sinio != 0.0 {
            ssg -= cosio / sinio * lunar.sh;
            ssh += lunar.sh / sinio;
        }

        LuniSolarTerms {
            solar,
            lunar,
            sse,
            ssi,
            ssl,
            ssg,
            ssh,
            zmos,
            zmol,
        }
    }
}

use super::ancillary::asinz;
use super::{gave_up, EPSLN};
use crate::ProjectionError;
use std::f64::consts::FRAC_PI_2;

/// Latitude from the authalic auxiliary `qs`, Snyder (1987) eq. 3-16,
/// for the inverse Albers projection. Newton iteration, at most 25
/// steps with a tolerance of 1e-7.
pub fn phi1z(eccent: f64, qs: f64) -> Result<f64, ProjectionError> {
    let mut phi = asinz(0.5 * qs);
    if eccent < EPSLN {
        return Ok(phi);
    }

    let eccnts = eccent * eccent;
    for _ in 1..=25 {
        let (sinpi, cospi) = phi.sin_cos();
        let con = eccent * sinpi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cospi
            * (qs / (1.0 - eccnts) - sinpi / com
                + 0.5 / eccent * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() <= 1e-7 {
            return Ok(phi);
        }
    }
    Err(gave_up("phi1z", 25))
}

/// Latitude from the exponential of the negated isometric latitude,
/// Snyder (1987) eq. 7-9, for the inverse Lambert conformal conic,
/// polar stereographic and Mercator projections. At most 15 steps,
/// tolerance 1e-10.
pub fn phi2z(eccent: f64, ts: f64) -> Result<f64, ProjectionError> {
    let eccnth = 0.5 * eccent;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..=15 {
        let con = eccent * phi.sin();
        let dphi =
            FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(eccnth)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= 1e-10 {
            return Ok(phi);
        }
    }
    Err(gave_up("phi2z", 16))
}

/// Latitude from the meridian distance `ml` (for unit semimajor axis),
/// Snyder (1987) eq. 3-26, for the inverse equidistant conic.
/// At most 15 steps, tolerance 1e-10.
pub fn phi3z(ml: f64, e: [f64; 4]) -> Result<f64, ProjectionError> {
    let [e0, e1, e2, e3] = e;
    let mut phi = ml;
    for _ in 0..15 {
        let dphi = (ml + e1 * (2.0 * phi).sin() - e2 * (4.0 * phi).sin()
            + e3 * (6.0 * phi).sin())
            / e0
            - phi;
        phi += dphi;
        if dphi.abs() <= 1e-10 {
            return Ok(phi);
        }
    }
    Err(gave_up("phi3z", 15))
}

/// Latitude and the auxiliary `c = tan(𝜙) sqrt(1 - es sin²𝜙)` for the
/// inverse polyconic, Snyder (1987) eqs. 18-17 to 18-19. Full Newton
/// iteration with derivative, at most 15 steps, tolerance 1e-10.
pub fn phi4z(es: f64, e: [f64; 4], a: f64, b: f64) -> Result<(f64, f64), ProjectionError> {
    let [e0, e1, e2, e3] = e;
    let mut phi = a;
    for _ in 0..15 {
        let sinphi = phi.sin();
        let tanphi = phi.tan();
        let c = tanphi * (1.0 - es * sinphi * sinphi).sqrt();
        let sin2ph = (2.0 * phi).sin();

        let ml = e0 * phi - e1 * sin2ph + e2 * (4.0 * phi).sin() - e3 * (6.0 * phi).sin();
        let mlp = e0 - 2.0 * e1 * (2.0 * phi).cos() + 4.0 * e2 * (4.0 * phi).cos()
            - 6.0 * e3 * (6.0 * phi).cos();

        let con1 = 2.0 * ml + c * (ml * ml + b) - 2.0 * a * (c * ml + 1.0);
        let con2 = es * sin2ph * (ml * ml + b - 2.0 * a * ml) / (2.0 * c);
        let con3 = 2.0 * (a - ml) * (c * mlp - 2.0 / sin2ph) - 2.0 * mlp;
        let dphi = con1 / (con2 + con3);
        phi += dphi;
        if dphi.abs() <= 1e-10 {
            return Ok((phi, c));
        }
    }
    Err(gave_up("phi4z", 15))
}

// ----- T E S T S ---------------------------------------------------------------------

use std::f64::consts::FRAC_PI_2;

/// Arcsine with the argument clamped to [-1, 1], so round-off slightly
/// outside the domain does not turn into NaN
pub fn asinz(con: f64) -> f64 {
    con.clamp(-1.0, 1.0).asin()
}

/// Sign of `x`, with zero counted as positive (unlike `f64::signum`,
/// which treats -0.0 as negative)
pub fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Snyder (1987) eq. 14-15, the GCTP `msfnz`: The radius of the parallel
/// of latitude divided by the semimajor axis.
pub fn msfnz(eccent: f64, sinphi: f64, cosphi: f64) -> f64 {
    let con = eccent * sinphi;
    cosphi / (1.0 - con * con).sqrt()
}

/// Snyder (1987) eq. 3-12, the GCTP `qsfnz`: The authalic auxiliary q.
/// Degenerates to `2 sin 𝜙` on the sphere.
pub fn qsfnz(eccent: f64, sinphi: f64) -> f64 {
    if eccent <= 1.0e-7 {
        return 2.0 * sinphi;
    }
    let con = eccent * sinphi;
    (1.0 - eccent * eccent)
        * (sinphi / (1.0 - con * con) - (0.5 / eccent) * ((1.0 - con) / (1.0 + con)).ln())
}

/// Snyder (1987) eq. 15-9, the GCTP `tsfnz`: The exponential of the
/// negated isometric latitude, i.e. exp(-𝜓)
pub fn tsfnz(eccent: f64, phi: f64, sinphi: f64) -> f64 {
    let con = eccent * sinphi;
    let com = 0.5 * eccent;
    let con = ((1.0 - con) / (1.0 + con)).powf(com);
    (0.5 * (FRAC_PI_2 - phi)).tan() / con
}

// ----- Meridian distance series ------------------------------------------------------

// The GCTP series for the meridian distance, Snyder (1987) eq. 3-21,
// split into its four coefficients. The argument is the eccentricity
// squared.

pub fn e0fn(x: f64) -> f64 {
    1.0 - 0.25 * x * (1.0 + x / 16.0 * (3.0 + 1.25 * x))
}

pub fn e1fn(x: f64) -> f64 {
    0.375 * x * (1.0 + 0.25 * x * (1.0 + 0.46875 * x))
}

pub fn e2fn(x: f64) -> f64 {
    0.05859375 * x * x * (1.0 + 0.75 * x)
}

pub fn e3fn(x: f64) -> f64 {
    x * x * x * (35.0 / 3072.0)
}

/// Snyder (1987) eq. 21-34, used by the polar stereographic projection.
/// The argument is the eccentricity.
pub fn e4fn(x: f64) -> f64 {
    let con = 1.0 + x;
    let com = 1.0 - x;
    (con.powf(con) * com.powf(com)).sqrt()
}

/// Meridian distance for unit semimajor axis, given the four series
/// coefficients from `e0fn`..`e3fn`
pub fn mlfn(e0: f64, e1: f64, e2: f64, e3: f64, phi: f64) -> f64 {
    e0 * phi - e1 * (2.0 * phi).sin() + e2 * (4.0 * phi).sin() - e3 * (6.0 * phi).sin()
}

/// The four meridian distance coefficients in one go
pub fn meridian_coefficients(es: f64) -> [f64; 4] {
    [e0fn(es), e1fn(es), e2fn(es), e3fn(es)]
}

// ----- T E S T S ---------------------------------------------------------------------

//! Interrupted Mollweide, in six regions: three lobes north of the
//! equator and three south of it
use super::moll::{auxiliary_angle, latitude_of};
use crate::authoring::*;

const CX: f64 = 0.900316316158;
const CY: f64 = std::f64::consts::SQRT_2;

// Central meridians and false eastings (in units of R) of the regions
#[rustfmt::skip]
const REGIONS: [(f64, f64); 6] = [
    ( 1.0471975512,   -2.19988776387),
    (-2.96705972839,  -0.15713484),
    (-0.523598776,     2.04275292359),
    ( 1.57079632679,  -1.72848324304),
    (-2.44346095279,   0.31426968),
    (-0.34906585,      2.19988776387),
];

// Region boundaries, in radians
const E20: f64 = 0.34906585;
const E110: f64 = 1.91986217719;
const E140: f64 = 2.44346095279;
const W100: f64 = -1.74532925199;
const W70: f64 = -1.2217304764;

// Slack making ±180° fall in the eastern lobes
const PI_SLACK: f64 = 1.0e-14;

fn select(lat: f64, lon: f64) -> usize {
    let wraps = |east: f64, west: f64| {
        (lon >= east && lon <= PI + PI_SLACK) || (lon >= -PI - PI_SLACK && lon < west)
    };
    if lat >= 0.0 {
        if (E20..E110).contains(&lon) {
            0
        } else if wraps(E110, W100) {
            1
        } else {
            2
        }
    } else if (E20..E140).contains(&lon) {
        3
    } else if wraps(E140, W70) {
        4
    } else {
        5
    }
}

fn select_inverse(x: f64, y: f64) -> usize {
    if y >= 0.0 {
        if x <= -1.41421356248 {
            0
        } else if x <= 0.942809042 {
            1
        } else {
            2
        }
    } else if x <= -0.942809042 {
        3
    } else if x <= 1.41421356248 {
        4
    } else {
        5
    }
}

/// True if the longitude is outside the span of the region
fn in_break(index: usize, lon: f64) -> bool {
    match index {
        0 => !(E20..=E110).contains(&lon),
        1 => (lon < E110 && lon > E20) || (lon > W100 && lon < E20),
        2 => !(W100..=E20).contains(&lon),
        3 => !(E20..=E140).contains(&lon),
        4 => (lon < E140 && lon > E20) || (lon > W70 && lon < E20),
        _ => !(W70..=E20).contains(&lon),
    }
}

#[derive(Debug, Clone)]
pub struct InterruptedMollweide {
    r: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl InterruptedMollweide {
    pub fn new(r: f64) -> Result<Self, Error> {
        Ok(InterruptedMollweide { r })
    }
}

impl ProjectionTransform for InterruptedMollweide {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::InterruptedMollweide
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let (lon_center, feast) = REGIONS[select(lat, lon)];
        let mut delta_lon = adjust_lon(lon - lon_center);
        let theta = auxiliary_angle(lat)?;
        if FRAC_PI_2 - lat.abs() < EPSLN {
            delta_lon = 0.0;
        }
        let x = self.r * feast + CX * self.r * delta_lon * theta.cos();
        let y = self.r * CY * theta.sin();
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        if (y / (CY * self.r)).abs() > 1.0 {
            return Err(ProjectionError::OutOfRange("Beyond the poles"));
        }
        let index = select_inverse(x / self.r, y / self.r);
        let (lon_center, feast) = REGIONS[index];
        let x = x - self.r * feast;
        let (theta, lat) = latitude_of(y / self.r);
        let lon = adjust_lon(lon_center + x / (CX * self.r * theta.cos()));
        if in_break(index, lon) {
            trace!("Interrupted Mollweide: longitude {lon} outside region {index}");
            return Err(ProjectionError::InBreak);
        }
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new().radius(self.r).build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

//! Mollweide equal area, spherical, Snyder (1987) ch. 31
use crate::authoring::*;
use crate::math::gave_up;

// √8/π and √2
const CX: f64 = 0.900316316158;
const CY: f64 = std::f64::consts::SQRT_2;

#[derive(Debug, Clone)]
pub struct Mollweide {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

/// Solve 2θ + sin 2θ = π sin φ for the auxiliary angle θ, Snyder (1987)
/// eq. 31-4. Shared with the interrupted form.
pub(crate) fn auxiliary_angle(lat: f64) -> Result<f64, ProjectionError> {
    // Newton converges only linearly at the poles, where the root is
    // known anyway
    if FRAC_PI_2 - lat.abs() < EPSLN {
        return Ok(FRAC_PI_2.copysign(lat));
    }
    let con = PI * lat.sin();
    let mut theta = lat;
    for _ in 0..50 {
        let delta = -(theta + theta.sin() - con) / (1.0 + theta.cos());
        theta += delta;
        if delta.abs() < EPSLN {
            return Ok(theta / 2.0);
        }
    }
    Err(gave_up("Mollweide forward", 50))
}

/// The inverse of [`auxiliary_angle`], clamping map coordinates a hair
/// beyond the poles back onto them
pub(crate) fn latitude_of(y_over_r: f64) -> (f64, f64) {
    let mut arg = y_over_r / CY;
    if arg.abs() > 0.999999999999 {
        arg = 0.999999999999f64.copysign(arg);
    }
    let theta = arg.asin();
    let mut arg = (2.0 * theta + (2.0 * theta).sin()) / PI;
    if arg.abs() > 1.0 {
        arg = 1.0f64.copysign(arg);
    }
    (theta, arg.asin())
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Mollweide {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(Mollweide {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Mollweide {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Mollweide
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let mut delta_lon = adjust_lon(lon - self.lon_center);
        let theta = auxiliary_angle(lat)?;

        // cos θ is imprecise near the poles
        if FRAC_PI_2 - lat.abs() < EPSLN {
            delta_lon = 0.0;
        }
        let x = CX * self.r * delta_lon * theta.cos() + self.false_easting;
        let y = CY * self.r * theta.sin() + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let (theta, lat) = latitude_of(y / self.r);
        let lon = adjust_lon(self.lon_center + x / (CX * self.r * theta.cos())).clamp(-PI, PI);
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .center_lon(self.lon_center)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn mollweide() -> Result<(), Error> {
        let r = 6370997.;
        let p = Mollweide::new(r, 0., 0., 0.)?;

        // The bounding ellipse has semiaxes 2√2 R and √2 R
        let (x, _) = p.forward(0., PI)?;
        assert_float_eq!(x, 2.0 * CY * r, rel <= 1e-9);
        let (x, y) = p.forward(FRAC_PI_2, 1.0)?;
        assert_eq!(x, 0.);
        assert_float_eq!(y, CY * r, rel <= 1e-12);
        let (x, y) = p.forward(-FRAC_PI_2, 1.0)?;
        assert_eq!(x, 0.);
        assert_float_eq!(y, -CY * r, rel <= 1e-12);

        roundtrip(&p, &[(0., 0.), (45., 100.), (-70., -120.), (-89., 10.)], 1e-9)?;

        // Southern clamp keeps the sign
        let (lat, _) = p.inverse(0., -1.5 * r)?;
        assert_float_eq!(lat, -FRAC_PI_2, abs <= 1e-5);
        Ok(())
    }
}

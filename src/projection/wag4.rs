//! Wagner IV pseudocylindrical, spherical
use crate::authoring::*;
use crate::math::gave_up;

const CX: f64 = 0.86310;
const CY: f64 = 1.56548;
const CP: f64 = 2.9604205062;

#[derive(Debug, Clone)]
pub struct WagnerIV {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl WagnerIV {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(WagnerIV {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for WagnerIV {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::WagnerIV
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let delta_lon = adjust_lon(lon - self.lon_center);

        // Newton iteration for 2θ + sin 2θ = CP sin φ
        let con = CP * lat.sin();
        let mut theta = lat;
        let mut i = 0;
        loop {
            let delta = -(theta + theta.sin() - con) / (1.0 + theta.cos());
            theta += delta;
            if delta.abs() < EPSLN {
                break;
            }
            i += 1;
            if i >= 30 {
                return Err(gave_up("Wagner IV forward", i));
            }
        }
        let theta = theta / 2.0;

        let x = CX * self.r * delta_lon * theta.cos() + self.false_easting;
        let y = CY * self.r * theta.sin() + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let arg = y / (CY * self.r);
        if arg.abs() > 1.0 {
            return Err(ProjectionError::OutOfRange("Beyond the pole lines"));
        }
        let theta = arg.asin();
        let lon = adjust_lon(self.lon_center + x / (CX * self.r * theta.cos()));
        let lat = asinz((2.0 * theta + (2.0 * theta).sin()) / CP);
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
    fn wagner_iv() -> Result<(), Error> {
        let r = 6370997.;
        let p = WagnerIV::new(r, 0., 0., 0.)?;
        let (x, y) = p.forward(0., 1.)?;
        assert_float_eq!(x, CX * r, rel <= 1e-12);
        assert_float_eq!(y, 0., abs <= 1e-6);

        // The pole line sits at 60 degrees of the auxiliary angle
        let (_, y) = p.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(y, CY * r * 60f64.to_radians().sin(), rel <= 1e-6);

        let p = WagnerIV::new(r, -1.0, 100., 100.)?;
        roundtrip(&p, &[(0., 0.), (45., 100.), (-70., -120.), (85., 10.)], 1e-9)?;
        assert!(p.inverse(0., 2.0 * r).is_err());
        Ok(())
    }
}

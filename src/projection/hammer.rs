//! Hammer equal area, spherical
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Hammer {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Hammer {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(Hammer {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Hammer {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Hammer
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let coslat = lat.cos();
        let fac = self.r * std::f64::consts::SQRT_2 / (1.0 + coslat * (dlon / 2.0).cos()).sqrt();
        let x = self.false_easting + fac * 2.0 * coslat * (dlon / 2.0).sin();
        let y = self.false_northing + fac * lat.sin();
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let r2 = self.r * self.r;
        let radicand = 4.0 * r2 - x * x / 4.0 - y * y;
        if radicand < 0.0 {
            return Err(ProjectionError::OutOfRange("Outside the bounding ellipse"));
        }
        let fac = radicand.sqrt() / 2.0;
        let lon = adjust_lon(self.lon_center + 2.0 * (x * fac).atan2(2.0 * r2 - x * x / 4.0 - y * y));
        let lat = asinz(y * fac / r2);
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
    fn hammer() -> Result<(), Error> {
        let r = 6370997.;
        let p = Hammer::new(r, 0., 0., 0.)?;

        // The equator spans 2 sqrt(2) R to either side
        let (x, y) = p.forward(0., PI)?;
        assert_float_eq!(x, 2.0 * std::f64::consts::SQRT_2 * r, rel <= 1e-12);
        assert_float_eq!(y, 0., abs <= 1e-6);

        let (x, y) = p.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, std::f64::consts::SQRT_2 * r, rel <= 1e-12);

        let p = Hammer::new(r, 0.3, 1000., -500.)?;
        roundtrip(&p, &[(0., 0.), (45., 100.), (-70., -120.), (10., 170.)], 1e-9)?;
        assert!(p.inverse(4.0 * r, 0.).is_err());
        Ok(())
    }
}

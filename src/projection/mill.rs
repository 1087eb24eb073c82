//! Miller cylindrical, spherical form
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Miller {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Miller {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(Miller {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Miller {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Miller
    }

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let x = self.false_easting + self.r * dlon;
        let y = self.false_northing + self.r * (FRAC_PI_4 + lat / 2.5).tan().ln() * 1.25;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lon = adjust_lon(self.lon_center + x / self.r);
        let lat = 2.5 * ((y / self.r / 1.25).exp().atan() - FRAC_PI_4);
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
    fn miller() -> Result<(), Error> {
        let p = Miller::new(6370997.0, -1.0, 0., 0.)?;
        let (x, y) = p.forward(0., -1.0)?;
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // y = 1.19683 R at 60°N
        let (_, y) = p.forward(60f64.to_radians(), -1.0)?;
        assert_float_eq!(y / 6370997.0, 1.19683, abs <= 1e-5);

        roundtrip(&p, &[(80., 100.), (-45., -50.), (0.5, 178.)], 1e-12)?;
        Ok(())
    }
}

//! Equirectangular (plate carrée), spherical form
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Equirectangular {
    r: f64,
    lon_center: f64,
    lat_ts: f64,
    cos_lat_ts: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Equirectangular {
    /// Sphere of radius `r`, central meridian `lon_center` and latitude
    /// of true scale `lat_ts`, all angles in radians
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_ts: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        Ok(Equirectangular {
            r,
            lon_center,
            lat_ts,
            cos_lat_ts: lat_ts.cos(),
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Equirectangular {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Equirectangular
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let x = self.false_easting + self.r * dlon * self.cos_lat_ts;
        let y = self.false_northing + self.r * lat;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lat = y / self.r;
        if lat.abs() > FRAC_PI_2 {
            trace!("eqc: latitude out of range");
            return Err(ProjectionError::OutOfRange("equi-inv"));
        }
        let lon = adjust_lon(self.lon_center + x / (self.r * self.cos_lat_ts));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .central_meridian(self.lon_center)
            .value("Latitude of True Scale", self.lat_ts.to_degrees(), Unit::Degrees)
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
    fn quarter_turn() -> Result<(), Error> {
        let p = Equirectangular::new(6378137.0, 0., 0., 0., 0.)?;
        let (x, y) = p.forward(0., FRAC_PI_2)?;
        assert_float_eq!(x, 10018754.17, abs <= 1.0);
        assert_float_eq!(y, 0., abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn roundtrips() -> Result<(), Error> {
        let p = Equirectangular::new(6370997.0, 0.3, 0.5, 1000., 2000.)?;
        assert_eq!(p.forward(0., 0.3)?, (1000., 2000.));
        roundtrip(&p, &[(0., 0.), (45., 120.), (-89., -170.), (12., 17.)], 1e-12)?;
        assert!(p.inverse(0., 3e7).is_err());
        Ok(())
    }
}

//! Sinusoidal, spherical form
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Sinusoidal {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Sinusoidal {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(Sinusoidal {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Sinusoidal {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Sinusoidal
    }

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let x = self.r * dlon * lat.cos() + self.false_easting;
        let y = self.r * lat + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lat = y / self.r;
        if lat.abs() > FRAC_PI_2 {
            return Err(ProjectionError::OutOfRange("sinusoidal-inverse"));
        }

        // At the poles, all longitudes collapse onto the central meridian
        if (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(self.lon_center + x / (self.r * lat.cos()));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .central_meridian(self.lon_center)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

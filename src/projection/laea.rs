//! Spherical Lambert azimuthal equal area, Snyder (1987) ch. 24
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct LambertAzimuthal {
    r: f64,
    lon_center: f64,
    lat_center: f64,
    false_easting: f64,
    false_northing: f64,
    sin_lat_o: f64,
    cos_lat_o: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl LambertAzimuthal {
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_center: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let (sin_lat_o, cos_lat_o) = lat_center.sin_cos();
        Ok(LambertAzimuthal {
            r,
            lon_center,
            lat_center,
            false_easting,
            false_northing,
            sin_lat_o,
            cos_lat_o,
        })
    }
}

impl ProjectionTransform for LambertAzimuthal {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::LambertAzimuthal
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let delta_lon = adjust_lon(lon - self.lon_center);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_delta_lon, cos_delta_lon) = delta_lon.sin_cos();
        let g = self.sin_lat_o * sin_lat + self.cos_lat_o * cos_lat * cos_delta_lon;

        // The antipode maps to the whole circle of radius 2R
        if g == -1.0 {
            return Err(ProjectionError::Unprojectable("Point projects to a circle"));
        }

        // Snyder (1987) eqs. 24-2 to 24-4
        let ksp = self.r * (2.0 / (1.0 + g)).sqrt();
        let x = ksp * cos_lat * sin_delta_lon + self.false_easting;
        let y = ksp * (self.cos_lat_o * sin_lat - self.sin_lat_o * cos_lat * cos_delta_lon)
            + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        let temp = rh / (2.0 * self.r);
        if temp > 1.0 {
            return Err(ProjectionError::OutOfRange("Outside the circle of radius 2R"));
        }

        let z = 2.0 * asinz(temp);
        let (sin_z, cos_z) = z.sin_cos();
        if rh.abs() <= EPSLN {
            return Ok((self.lat_center, self.lon_center));
        }

        let lat = asinz(self.sin_lat_o * cos_z + self.cos_lat_o * sin_z * y / rh);
        let lon = if (self.lat_center.abs() - FRAC_PI_2).abs() > EPSLN {
            let temp = cos_z - self.sin_lat_o * lat.sin();
            if temp != 0.0 {
                adjust_lon(self.lon_center + (x * sin_z * self.cos_lat_o).atan2(temp * rh))
            } else {
                self.lon_center
            }
        } else if self.lat_center < 0.0 {
            adjust_lon(self.lon_center - (-x).atan2(y))
        } else {
            adjust_lon(self.lon_center + x.atan2(-y))
        };
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .center_lon(self.lon_center)
            .center_lat(self.lat_center)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

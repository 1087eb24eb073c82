//! Spherical gnomonic, Snyder (1987) ch. 22
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Gnomonic {
    r: f64,
    lon_center: f64,
    lat_center: f64,
    false_easting: f64,
    false_northing: f64,
    sin_p13: f64,
    cos_p13: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Gnomonic {
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_center: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let (sin_p13, cos_p13) = lat_center.sin_cos();
        Ok(Gnomonic {
            r,
            lon_center,
            lat_center,
            false_easting,
            false_northing,
            sin_p13,
            cos_p13,
        })
    }
}

impl ProjectionTransform for Gnomonic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Gnomonic
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p13 * sinphi + self.cos_p13 * cosphi * coslon;

        // Only the hemisphere around the center is visible
        if g <= 0.0 {
            return Err(ProjectionError::Unprojectable("Point projects into infinity"));
        }

        let ksp = 1.0 / g;
        let x = self.false_easting + self.r * ksp * cosphi * dlon.sin();
        let y = self.false_northing
            + self.r * ksp * (self.cos_p13 * sinphi - self.sin_p13 * cosphi * coslon);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        let z = (rh / self.r).atan();
        let (sinz, cosz) = z.sin_cos();
        if rh.abs() <= EPSLN {
            return Ok((self.lat_center, self.lon_center));
        }

        let lat = asinz(cosz * self.sin_p13 + (y * sinz * self.cos_p13) / rh);
        if (self.lat_center.abs() - FRAC_PI_2).abs() <= EPSLN {
            let lon = if self.lat_center >= 0.0 {
                adjust_lon(self.lon_center + x.atan2(-y))
            } else {
                adjust_lon(self.lon_center - (-x).atan2(y))
            };
            return Ok((lat, lon));
        }

        let con = cosz - self.sin_p13 * lat.sin();
        if con.abs() < EPSLN && x.abs() < EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(self.lon_center + (x * sinz * self.cos_p13).atan2(con * rh));
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

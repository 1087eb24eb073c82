//! Spherical azimuthal equidistant, Snyder (1987) ch. 25
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    r: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    sin_p12: f64,
    cos_p12: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl AzimuthalEquidistant {
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let (sin_p12, cos_p12) = lat_origin.sin_cos();
        Ok(AzimuthalEquidistant {
            r,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            sin_p12,
            cos_p12,
        })
    }
}

impl ProjectionTransform for AzimuthalEquidistant {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::AzimuthalEquidistant
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p12 * sinphi + self.cos_p12 * cosphi * coslon;

        // Snyder (1987) eqs. 25-2 and 25-3: k' = z / sin z
        let ksp = if (g.abs() - 1.0).abs() < EPSLN {
            if g < 0.0 {
                return Err(ProjectionError::Unprojectable("Point projects into a circle"));
            }
            1.0
        } else {
            let z = g.acos();
            z / z.sin()
        };

        let x = self.false_easting + self.r * ksp * cosphi * dlon.sin();
        let y = self.false_northing
            + self.r * ksp * (self.cos_p12 * sinphi - self.sin_p12 * cosphi * coslon);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        if rh > PI * self.r {
            return Err(ProjectionError::OutOfRange("Outside the circle of radius pi R"));
        }

        let z = rh / self.r;
        let (sinz, cosz) = z.sin_cos();
        if rh.abs() <= EPSLN {
            return Ok((self.lat_origin, self.lon_center));
        }

        let lat = asinz(cosz * self.sin_p12 + (y * sinz * self.cos_p12) / rh);
        if (self.lat_origin.abs() - FRAC_PI_2).abs() <= EPSLN {
            let lon = if self.lat_origin >= 0.0 {
                adjust_lon(self.lon_center + x.atan2(-y))
            } else {
                adjust_lon(self.lon_center - (-x).atan2(y))
            };
            return Ok((lat, lon));
        }

        let con = cosz - self.sin_p12 * lat.sin();
        if con.abs() < EPSLN && x.abs() < EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(self.lon_center + (x * sinz * self.cos_p12).atan2(con * rh));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .center_lon(self.lon_center)
            .center_lat(self.lat_origin)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

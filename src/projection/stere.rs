//! Spherical stereographic, Snyder (1987) ch. 21
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Stereographic {
    r: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    sin_p10: f64,
    cos_p10: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Stereographic {
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let (sin_p10, cos_p10) = lat_origin.sin_cos();
        Ok(Stereographic {
            r,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            sin_p10,
            cos_p10,
        })
    }
}

impl ProjectionTransform for Stereographic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Stereographic
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p10 * sinphi + self.cos_p10 * cosphi * coslon;

        // The antipode of the center
        if (g + 1.0).abs() <= EPSLN {
            return Err(ProjectionError::Unprojectable("Point projects into infinity"));
        }

        // Snyder (1987) eq. 21-4
        let ksp = 2.0 / (1.0 + g);
        let x = self.false_easting + self.r * ksp * cosphi * dlon.sin();
        let y = self.false_northing
            + self.r * ksp * (self.cos_p10 * sinphi - self.sin_p10 * cosphi * coslon);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        let z = 2.0 * (rh / (2.0 * self.r)).atan();
        let (sinz, cosz) = z.sin_cos();

        if rh.abs() <= EPSLN {
            return Ok((self.lat_origin, self.lon_center));
        }

        let lat = (cosz * self.sin_p10 + (y * sinz * self.cos_p10) / rh).asin();
        if (self.lat_origin.abs() - FRAC_PI_2).abs() <= EPSLN {
            let lon = if self.lat_origin >= 0.0 {
                adjust_lon(self.lon_center + x.atan2(-y))
            } else {
                adjust_lon(self.lon_center - (-x).atan2(y))
            };
            return Ok((lat, lon));
        }

        let con = cosz - self.sin_p10 * lat.sin();
        if con.abs() < EPSLN && x.abs() < EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(self.lon_center + (x * sinz * self.cos_p10).atan2(con * rh));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn stereographic() -> Result<(), Error> {
        // Unit sphere, centered at 40N 100W
        let p = Stereographic::new(1.0, -100f64.to_radians(), 40f64.to_radians(), 0., 0.)?;
        let (x, y) = p.forward(30f64.to_radians(), -110f64.to_radians())?;
        assert_float_eq!(x, -0.1523082, abs <= 1e-7);
        assert_float_eq!(y, -0.1673051, abs <= 1e-7);

        let p = Stereographic::new(6370997., 0., 0., 1000., 2000.)?;
        roundtrip(&p, &[(10., 10.), (-45., 60.), (80., -170.), (0., 0.)], 1e-9)?;

        // The antipode of the center cannot be projected
        assert!(p.forward(0., PI).is_err());
        Ok(())
    }

    #[test]
    fn polar_aspect() -> Result<(), Error> {
        let p = Stereographic::new(6370997., 0., FRAC_PI_2, 0., 0.)?;
        roundtrip(&p, &[(60., 10.), (10., -135.), (89., 90.)], 1e-9)?;
        let p = Stereographic::new(6370997., 0., -FRAC_PI_2, 0., 0.)?;
        roundtrip(&p, &[(-60., 10.), (-10., -135.)], 1e-9)?;
        Ok(())
    }
}

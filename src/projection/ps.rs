//! Polar stereographic, Snyder (1987) ch. 21
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct PolarStereographic {
    r_major: f64,
    r_minor: f64,
    lon_center: f64,
    lat_ts: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    e4: f64,
    fac: f64,
    // Scale constants at the latitude of true scale, unless it is a pole
    true_scale: Option<(f64, f64)>,
}

impl PolarStereographic {
    /// `lat_ts` is the latitude of true scale: its sign selects the
    /// pole of the aspect
    pub fn new(
        r_major: f64,
        r_minor: f64,
        lon_center: f64,
        lat_ts: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let e = es.sqrt();
        let fac = if lat_ts < 0.0 { -1.0 } else { 1.0 };

        let true_scale = if (lat_ts.abs() - FRAC_PI_2).abs() > EPSLN {
            let con1 = fac * lat_ts;
            let (sinphi, cosphi) = con1.sin_cos();
            Some((msfnz(e, sinphi, cosphi), tsfnz(e, con1, sinphi)))
        } else {
            None
        };

        Ok(PolarStereographic {
            r_major,
            r_minor,
            lon_center,
            lat_ts,
            false_easting,
            false_northing,
            e,
            e4: e4fn(e),
            fac,
            true_scale,
        })
    }
}

impl ProjectionTransform for PolarStereographic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::PolarStereographic
    }

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let fac = self.fac;
        let con1 = fac * adjust_lon(lon - self.lon_center);
        let con2 = fac * lat;
        let ts = tsfnz(self.e, con2, con2.sin());
        let rh = match self.true_scale {
            Some((mcs, tcs)) => self.r_major * mcs * ts / tcs,
            None => 2.0 * self.r_major * ts / self.e4,
        };
        let x = fac * rh * con1.sin() + self.false_easting;
        let y = -fac * rh * con1.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let fac = self.fac;
        let x = (x - self.false_easting) * fac;
        let y = (y - self.false_northing) * fac;
        let rh = x.hypot(y);
        let ts = match self.true_scale {
            Some((mcs, tcs)) => rh * tcs / (self.r_major * mcs),
            None => rh * self.e4 / (self.r_major * 2.0),
        };
        let lat = fac * phi2z(self.e, ts)?;
        let lon = if rh == 0.0 {
            fac * self.lon_center
        } else {
            adjust_lon(fac * x.atan2(-y) + self.lon_center)
        };
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .value("Longitude of Y-Axis", self.lon_center.to_degrees(), Unit::Degrees)
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
    fn north() -> Result<(), Error> {
        // NSIDC sea ice polar stereographic north (EPSG:3413 parameters)
        let p = PolarStereographic::new(
            6378137.0,
            6356752.314245,
            -45f64.to_radians(),
            70f64.to_radians(),
            0.,
            0.,
        )?;
        let (x, y) = p.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // Points on the central meridian are straight below the pole
        let (x, y) = p.forward(70f64.to_radians(), -45f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert!(y < 0.);

        roundtrip(&p, &[(70., -45.), (80., 100.), (45., -170.), (60., 10.)], 1e-9)?;
        Ok(())
    }

    #[test]
    fn south() -> Result<(), Error> {
        let p = PolarStereographic::new(6378137.0, 6356752.314245, 0., -FRAC_PI_2, 0., 0.)?;
        let (x, y) = p.forward(-FRAC_PI_2, 0.)?;
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, 0., abs <= 1e-9);
        roundtrip(&p, &[(-70., -45.), (-80., 100.), (-45., -170.)], 1e-9)?;
        Ok(())
    }
}

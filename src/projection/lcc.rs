//! Lambert conformal conic, Snyder (1987) ch. 15
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct LambertConformalConic {
    r_major: f64,
    r_minor: f64,
    lat1: f64,
    lat2: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    ns: f64,
    f0: f64,
    rh: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl LambertConformalConic {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r_major: f64,
        r_minor: f64,
        lat1: f64,
        lat2: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        if (lat1 + lat2).abs() < EPSLN {
            warn!("LCC: Equal latitudes for standard parallels on opposite sides of equator");
            return Err(Error::BadParam(
                "standard parallels".to_string(),
                format!("{}, {}", lat1.to_degrees(), lat2.to_degrees()),
            ));
        }

        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let e = es.sqrt();

        let (sin1, cos1) = lat1.sin_cos();
        let ms1 = msfnz(e, sin1, cos1);
        let ts1 = tsfnz(e, lat1, sin1);
        let (sin2, cos2) = lat2.sin_cos();
        let ms2 = msfnz(e, sin2, cos2);
        let ts2 = tsfnz(e, lat2, sin2);
        let ts0 = tsfnz(e, lat_origin, lat_origin.sin());

        // Snyder (1987) eq. 15-8, degenerating to the tangent cone
        let ns = if (lat1 - lat2).abs() > EPSLN {
            (ms1 / ms2).ln() / (ts1 / ts2).ln()
        } else {
            sin1
        };
        let f0 = ms1 / (ns * ts1.powf(ns));
        let rh = r_major * f0 * ts0.powf(ns);
        debug!("LCC: n = {ns}, F = {f0}, rho0 = {rh}");

        Ok(LambertConformalConic {
            r_major,
            r_minor,
            lat1,
            lat2,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            e,
            ns,
            f0,
            rh,
        })
    }
}

impl ProjectionTransform for LambertConformalConic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::LambertConformalConic
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let rh1 = if (lat.abs() - FRAC_PI_2).abs() > EPSLN {
            let ts = tsfnz(self.e, lat, lat.sin());
            self.r_major * self.f0 * ts.powf(self.ns)
        } else {
            // The pole opposite the apex of the cone is at infinity
            if lat * self.ns <= 0.0 {
                trace!("lcc: point can not be projected");
                return Err(ProjectionError::Unprojectable("lamcc-for"));
            }
            0.0
        };
        let theta = self.ns * adjust_lon(lon - self.lon_center);
        let x = rh1 * theta.sin() + self.false_easting;
        let y = self.rh - rh1 * theta.cos() + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = self.rh - y + self.false_northing;
        let (rh1, con) = if self.ns > 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };

        let lat = if rh1 != 0.0 || self.ns > 0.0 {
            let ts = (rh1 / (self.r_major * self.f0)).powf(1.0 / self.ns);
            phi2z(self.e, ts)?
        } else {
            -FRAC_PI_2
        };
        let lon = adjust_lon(theta / self.ns + self.lon_center);
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .standard_parallels(self.lat1, self.lat2)
            .central_meridian(self.lon_center)
            .origin(self.lat_origin)
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
    fn lambert_conformal_conic() -> Result<(), Error> {
        // Snyder (1987), p. 296: Clarke 1866, standard parallels 33° and 45°
        let p = LambertConformalConic::new(
            6378206.4,
            6356583.8,
            33f64.to_radians(),
            45f64.to_radians(),
            -96f64.to_radians(),
            23f64.to_radians(),
            0.,
            0.,
        )?;
        let (x, y) = p.forward(35f64.to_radians(), -75f64.to_radians())?;
        assert_float_eq!(x, 1894410.9, abs <= 0.1);
        assert_float_eq!(y, 1564649.5, abs <= 0.1);

        let (x, y) = p.forward(23f64.to_radians(), -96f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        roundtrip(&p, &[(35., -75.), (60., -140.), (10., -90.)], 1e-9)?;

        // The south pole is at infinity
        assert!(p.forward(-FRAC_PI_2, 0.).is_err());
        let (x, _) = p.forward(FRAC_PI_2, 0.5)?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn tangent_cone() -> Result<(), Error> {
        let lat = 40f64.to_radians();
        let p = LambertConformalConic::new(6370997., 6370997., lat, lat, 0., lat, 0., 0.)?;
        roundtrip(&p, &[(35., -7.), (60., 40.), (10., -9.)], 1e-9)?;
        Ok(())
    }
}

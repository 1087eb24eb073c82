//! Equidistant conic, Snyder (1987) ch. 16. Variant A has a single
//! standard parallel, variant B two.
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct EquidistantConic {
    r_major: f64,
    r_minor: f64,
    lat1: f64,
    lat2: Option<f64>,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    en: [f64; 4],
    ns: f64,
    g: f64,
    rh: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl EquidistantConic {
    /// Variant A, when `lat2` is `None`, otherwise variant B
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r_major: f64,
        r_minor: f64,
        lat1: f64,
        lat2: Option<f64>,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let e = es.sqrt();
        let en = meridian_coefficients(es);
        let [e0, e1, e2, e3] = en;

        let (sin1, cos1) = lat1.sin_cos();
        let ms1 = msfnz(e, sin1, cos1);
        let ml1 = mlfn(e0, e1, e2, e3, lat1);

        let ns = match lat2 {
            None => sin1,
            Some(lat2) => {
                if (lat1 + lat2).abs() < EPSLN {
                    warn!("EQDC: Standard parallels on opposite sides of equator");
                    return Err(Error::BadParam(
                        "standard parallels".to_string(),
                        format!("{}, {}", lat1.to_degrees(), lat2.to_degrees()),
                    ));
                }
                let (sin2, cos2) = lat2.sin_cos();
                let ms2 = msfnz(e, sin2, cos2);
                let ml2 = mlfn(e0, e1, e2, e3, lat2);
                if (lat1 - lat2).abs() >= EPSLN {
                    (ms1 - ms2) / (ml2 - ml1)
                } else {
                    sin2
                }
            }
        };

        let g = ml1 + ms1 / ns;
        let ml0 = mlfn(e0, e1, e2, e3, lat_origin);
        let rh = r_major * (g - ml0);
        debug!("EQDC: n = {ns}, G = {g}, rho0 = {rh}");

        Ok(EquidistantConic {
            r_major,
            r_minor,
            lat1,
            lat2,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            en,
            ns,
            g,
            rh,
        })
    }
}

impl ProjectionTransform for EquidistantConic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::EquidistantConic
    }

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let [e0, e1, e2, e3] = self.en;
        let ml = mlfn(e0, e1, e2, e3, lat);
        let rh1 = self.r_major * (self.g - ml);
        let theta = self.ns * adjust_lon(lon - self.lon_center);
        let x = self.false_easting + rh1 * theta.sin();
        let y = self.false_northing + self.rh - rh1 * theta.cos();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = self.rh - y + self.false_northing;
        let (rh1, con) = if self.ns >= 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };
        let ml = self.g - rh1 / self.r_major;
        let lat = phi3z(ml, self.en)?;
        let lon = adjust_lon(self.lon_center + theta / self.ns);
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        let report = crate::projection::Report::new().axes(self.r_major, self.r_minor);
        let report = match self.lat2 {
            Some(lat2) => report.standard_parallels(self.lat1, lat2),
            None => report.standard_parallel(self.lat1),
        };
        report
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
    fn two_parallels() -> Result<(), Error> {
        // Snyder (1987), p. 299: Clarke 1866, standard parallels 29.5° and 45.5°
        let p = EquidistantConic::new(
            6378206.4,
            6356583.8,
            29.5f64.to_radians(),
            Some(45.5f64.to_radians()),
            -96f64.to_radians(),
            23f64.to_radians(),
            0.,
            0.,
        )?;
        let (x, y) = p.forward(35f64.to_radians(), -75f64.to_radians())?;
        assert_float_eq!(x, 1885051.9, abs <= 0.1);
        assert_float_eq!(y, 1540507.6, abs <= 0.1);

        let (x, y) = p.forward(23f64.to_radians(), -96f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);
        roundtrip(&p, &[(35., -75.), (60., -130.), (-10., -96.)], 1e-9)?;
        Ok(())
    }

    #[test]
    fn one_parallel() -> Result<(), Error> {
        let p = EquidistantConic::new(6370997., 6370997., 0.7, None, 0.1, 0.5, 1e3, -1e3)?;
        let (x, y) = p.forward(0.5, 0.1)?;
        assert_float_eq!(x, 1e3, abs <= 1e-6);
        assert_float_eq!(y, -1e3, abs <= 1e-6);
        roundtrip(&p, &[(35., -7.), (60., 30.), (-10., 9.)], 1e-9)?;

        let lat = 0.5;
        assert!(
            EquidistantConic::new(6370997., 6370997., lat, Some(-lat), 0., 0., 0., 0.).is_err()
        );
        Ok(())
    }
}

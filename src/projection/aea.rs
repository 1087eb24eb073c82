//! Albers conical equal area, Snyder (1987) ch. 14
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    r_major: f64,
    r_minor: f64,
    lat1: f64,
    lat2: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    es: f64,
    e: f64,
    ns0: f64,
    c: f64,
    rh: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl AlbersEqualArea {
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
            warn!("AEA: Equal latitudes for standard parallels on opposite sides of equator");
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
        let qs1 = qsfnz(e, sin1);
        let (sin2, cos2) = lat2.sin_cos();
        let ms2 = msfnz(e, sin2, cos2);
        let qs2 = qsfnz(e, sin2);
        let qs0 = qsfnz(e, lat_origin.sin());

        // Snyder (1987) eqs. 14-14 and 14-13: The cone constant, and C
        let ns0 = if (lat1 - lat2).abs() > EPSLN {
            (ms1 * ms1 - ms2 * ms2) / (qs2 - qs1)
        } else {
            sin1
        };
        let c = ms1 * ms1 + ns0 * qs1;
        let rh = r_major * (c - ns0 * qs0).sqrt() / ns0;
        debug!("AEA: n = {ns0}, C = {c}, rho0 = {rh}");

        Ok(AlbersEqualArea {
            r_major,
            r_minor,
            lat1,
            lat2,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            es,
            e,
            ns0,
            c,
            rh,
        })
    }
}

impl ProjectionTransform for AlbersEqualArea {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Albers
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let qs = qsfnz(self.e, lat.sin());
        let rh1 = self.r_major * (self.c - self.ns0 * qs).sqrt() / self.ns0;
        let theta = self.ns0 * adjust_lon(lon - self.lon_center);
        let x = rh1 * theta.sin() + self.false_easting;
        let y = self.rh - rh1 * theta.cos() + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = self.rh - y + self.false_northing;
        let (rh1, con) = if self.ns0 >= 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };

        let con = rh1 * self.ns0 / self.r_major;
        let qs = (self.c - con * con) / self.ns0;

        let lat = if self.e >= 1e-10 {
            // The value of q at the poles, Snyder (1987) eq. 14-20
            let qp = 1.0 - 0.5 * (1.0 - self.es) * ((1.0 - self.e) / (1.0 + self.e)).ln() / self.e;
            if (qp.abs() - qs.abs()).abs() > 1e-10 {
                phi1z(self.e, qs)?
            } else {
                FRAC_PI_2.copysign(qs)
            }
        } else {
            phi1z(self.e, qs)?
        };

        let lon = adjust_lon(theta / self.ns0 + self.lon_center);
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
    fn albers() -> Result<(), Error> {
        // Snyder (1987), p. 292: Clarke 1866, conterminous US parameters
        let p = AlbersEqualArea::new(
            6378206.4,
            6356583.8,
            29.5f64.to_radians(),
            45.5f64.to_radians(),
            -96f64.to_radians(),
            23f64.to_radians(),
            0.,
            0.,
        )?;
        let (x, y) = p.forward(35f64.to_radians(), -75f64.to_radians())?;
        assert_float_eq!(x, 1885472.7, abs <= 0.1);
        assert_float_eq!(y, 1535925.0, abs <= 0.1);

        let (x, y) = p.forward(23f64.to_radians(), -96f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        roundtrip(&p, &[(35., -75.), (50., -120.), (20., -80.), (-10., -96.)], 1e-7)?;
        Ok(())
    }

    #[test]
    fn opposite_parallels() {
        let lat = 30f64.to_radians();
        assert!(AlbersEqualArea::new(6378137., 6356752.3, lat, -lat, 0., 0., 0., 0.).is_err());
    }
}

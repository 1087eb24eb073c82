//! Hotine oblique Mercator, Snyder (1987) ch. 9
use crate::authoring::*;

/// The two ways of defining the central line of the projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HotineDefinition {
    /// Format B: the azimuth of the central line, east of north, at
    /// the longitude of its center point
    Azimuth { azimuth: f64, lon_center: f64 },
    /// Format A: two points on the central line
    TwoPoints {
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    },
}

#[derive(Debug, Clone)]
pub struct HotineObliqueMercator {
    r_major: f64,
    r_minor: f64,
    scale_factor: f64,
    lat_origin: f64,
    definition: HotineDefinition,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    bl: f64,
    al: f64,
    el: f64,
    u: f64,
    lon_origin: f64,
    azimuth: f64,
    singam: f64,
    cosgam: f64,
    sinaz: f64,
    cosaz: f64,
}

fn bad(what: &str) -> Error {
    warn!("HOM: {what}");
    Error::BadParam("central line".to_string(), what.to_string())
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl HotineObliqueMercator {
    pub fn new(
        r_major: f64,
        r_minor: f64,
        scale_factor: f64,
        lat_origin: f64,
        definition: HotineDefinition,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let e = es.sqrt();
        let (sin_p20, cos_p20) = lat_origin.sin_cos();
        let con = 1.0 - es * sin_p20 * sin_p20;
        let com = (1.0 - es).sqrt();

        // Snyder (1987) eqs. 9-11 to 9-14
        let bl = (1.0 + es * cos_p20.powi(4) / (1.0 - es)).sqrt();
        let al = r_major * bl * scale_factor * com / con;
        let (d, mut f, el) = if lat_origin.abs() < EPSLN {
            (1.0, 0.0, 1.0)
        } else {
            let ts = tsfnz(e, lat_origin, sin_p20);
            let d = bl * com / (cos_p20 * con.sqrt());
            let f = if d * d - 1.0 > 0.0 {
                if lat_origin >= 0.0 {
                    d + (d * d - 1.0).sqrt()
                } else {
                    d - (d * d - 1.0).sqrt()
                }
            } else {
                d
            };
            (d, f, f * ts.powf(bl))
        };

        let (lon_origin, gama, azimuth) = match definition {
            HotineDefinition::Azimuth { azimuth, lon_center } => {
                let g = 0.5 * (f - 1.0 / f);
                let gama = asinz(azimuth.sin() / d);
                let lon_origin = lon_center - asinz(g * gama.tan()) / bl;
                let con = lat_origin.abs();
                if con <= EPSLN || (con - FRAC_PI_2).abs() <= EPSLN {
                    return Err(bad("latitude of center on the equator or at a pole"));
                }
                (lon_origin, gama, azimuth)
            }
            HotineDefinition::TwoPoints {
                lon1,
                lat1,
                mut lon2,
                lat2,
            } => {
                if (lat1 - lat2).abs() <= EPSLN {
                    return Err(bad("defining points on the same parallel"));
                }
                let con = lat1.abs();
                if con <= EPSLN || (con - FRAC_PI_2).abs() <= EPSLN {
                    return Err(bad("first point on the equator or at a pole"));
                }
                if (lat_origin.abs() - FRAC_PI_2).abs() <= EPSLN {
                    return Err(bad("latitude of origin at a pole"));
                }

                let h = tsfnz(e, lat1, lat1.sin()).powf(bl);
                let l = tsfnz(e, lat2, lat2.sin()).powf(bl);
                f = el / h;
                let g = 0.5 * (f - 1.0 / f);
                let j = (el * el - l * h) / (el * el + l * h);
                let p = (l - h) / (l + h);
                let dlon = lon1 - lon2;
                if dlon < -PI {
                    lon2 -= TAU;
                }
                if dlon > PI {
                    lon2 += TAU;
                }
                let dlon = lon1 - lon2;
                let lon_origin = 0.5 * (lon1 + lon2) - (j * (0.5 * bl * dlon).tan() / p).atan() / bl;
                let dlon = adjust_lon(lon1 - lon_origin);
                let gama = ((bl * dlon).sin() / g).atan();
                let azimuth = asinz(d * gama.sin());
                (lon_origin, gama, azimuth)
            }
        };

        let (singam, cosgam) = gama.sin_cos();
        let (sinaz, cosaz) = azimuth.sin_cos();
        let mut u = (al / bl) * ((d * d - 1.0).max(0.0).sqrt() / cosaz).atan();
        if lat_origin < 0.0 {
            u = -u;
        }
        debug!(
            "HOM: azimuth {}, longitude of origin {}, u = {u}",
            azimuth.to_degrees(),
            lon_origin.to_degrees()
        );

        Ok(HotineObliqueMercator {
            r_major,
            r_minor,
            scale_factor,
            lat_origin,
            definition,
            false_easting,
            false_northing,
            e,
            bl,
            al,
            el,
            u,
            lon_origin,
            azimuth,
            singam,
            cosgam,
            sinaz,
            cosaz,
        })
    }

    /// The azimuth of the central line at the center, east of north
    #[must_use]
    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// The longitude where the central line crosses the equator of the
    /// aposphere
    #[must_use]
    pub fn lon_origin(&self) -> f64 {
        self.lon_origin
    }
}

impl ProjectionTransform for HotineObliqueMercator {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::HotineObliqueMercator
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_origin);
        let vl = (self.bl * dlon).sin();

        let (ul, us) = if (lat.abs() - FRAC_PI_2).abs() > EPSLN {
            let q = self.el / tsfnz(self.e, lat, lat.sin()).powf(self.bl);
            let s = 0.5 * (q - 1.0 / q);
            let t = 0.5 * (q + 1.0 / q);
            let ul = (s * self.singam - vl * self.cosgam) / t;
            let con = (self.bl * dlon).cos();
            let us = if con.abs() < 1e-7 {
                self.al * self.bl * dlon
            } else {
                let us = self.al * ((s * self.cosgam + vl * self.singam) / con).atan() / self.bl;
                if con < 0.0 {
                    us + PI * self.al / self.bl
                } else {
                    us
                }
            };
            (ul, us)
        } else {
            (self.singam.copysign(lat), self.al * lat / self.bl)
        };

        if (ul.abs() - 1.0).abs() <= EPSLN {
            return Err(ProjectionError::Unprojectable("Point projects into infinity"));
        }

        let vs = 0.5 * self.al * ((1.0 - ul) / (1.0 + ul)).ln() / self.bl;
        let us = us - self.u;
        let x = self.false_easting + vs * self.cosaz + us * self.sinaz;
        let y = self.false_northing + us * self.cosaz - vs * self.sinaz;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let vs = x * self.cosaz - y * self.sinaz;
        let us = y * self.cosaz + x * self.sinaz + self.u;

        let q = (-self.bl * vs / self.al).exp();
        let s = 0.5 * (q - 1.0 / q);
        let t = 0.5 * (q + 1.0 / q);
        let vl = (self.bl * us / self.al).sin();
        let ul = (vl * self.cosgam + s * self.singam) / t;

        if (ul.abs() - 1.0).abs() <= EPSLN {
            return Ok((FRAC_PI_2.copysign(ul), self.lon_origin));
        }

        let ts1 = (self.el / ((1.0 + ul) / (1.0 - ul)).sqrt()).powf(1.0 / self.bl);
        let lat = phi2z(self.e, ts1)?;
        let con = (self.bl * us / self.al).cos();
        let lon = adjust_lon(self.lon_origin - (s * self.cosgam - vl * self.singam).atan2(con) / self.bl);
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        let report = crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .value("Scale Factor at C. Meridian", self.scale_factor, Unit::None);
        let report = match self.definition {
            HotineDefinition::Azimuth { azimuth, lon_center } => report
                .angle("Azimuth of Central Line", azimuth)
                .center_lon(lon_center),
            HotineDefinition::TwoPoints {
                lon1,
                lat1,
                lon2,
                lat2,
            } => report
                .angle("Longitude of First Point", lon1)
                .angle("Latitude of First Point", lat1)
                .angle("Longitude of Second Point", lon2)
                .angle("Latitude of Second Point", lat2),
        };
        report
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

    const A: f64 = 6378206.4;
    const B: f64 = 6356583.8;

    #[test]
    fn azimuth_form() -> Result<(), Error> {
        let definition = HotineDefinition::Azimuth {
            azimuth: 30f64.to_radians(),
            lon_center: -100f64.to_radians(),
        };
        let p = HotineObliqueMercator::new(A, B, 1.0, 40f64.to_radians(), definition, 0., 0.)?;

        // The center of the central line is the origin
        let (x, y) = p.forward(40f64.to_radians(), -100f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        let (x, y) = p.forward(45f64.to_radians(), -95f64.to_radians())?;
        assert_float_eq!(x, 394427.575, abs <= 1e-3);
        assert_float_eq!(y, 566936.862, abs <= 1e-3);

        roundtrip(&p, &[(45., -95.), (30., -110.), (50., -80.), (35., -120.)], 1e-9)?;

        // A center on the equator leaves the central line undefined
        assert!(HotineObliqueMercator::new(A, B, 1.0, 0., definition, 0., 0.).is_err());
        Ok(())
    }

    #[test]
    fn two_point_form() -> Result<(), Error> {
        let definition = HotineDefinition::TwoPoints {
            lon1: -110f64.to_radians(),
            lat1: 35f64.to_radians(),
            lon2: -90f64.to_radians(),
            lat2: 45f64.to_radians(),
        };
        let p = HotineObliqueMercator::new(A, B, 0.9996, 40f64.to_radians(), definition, 0., 0.)?;
        assert_float_eq!(p.azimuth().to_degrees(), 55.9147671, abs <= 1e-6);
        assert_float_eq!(p.lon_origin().to_degrees(), -145.0283240, abs <= 1e-6);

        // Both defining points are on the central line, where the
        // cross-track coordinate vanishes
        for (lat, lon) in [(35f64, -110f64), (45., -90.)] {
            let (x, y) = p.forward(lat.to_radians(), lon.to_radians())?;
            let (sinaz, cosaz) = p.azimuth().sin_cos();
            assert_float_eq!(x * cosaz - y * sinaz, 0., abs <= 1e-6);
        }

        roundtrip(&p, &[(35., -110.), (45., -90.), (40., -100.), (30., -80.)], 1e-9)?;

        let same_parallel = HotineDefinition::TwoPoints {
            lon1: -110f64.to_radians(),
            lat1: 35f64.to_radians(),
            lon2: -90f64.to_radians(),
            lat2: 35f64.to_radians(),
        };
        assert!(HotineObliqueMercator::new(A, B, 0.9996, 0.7, same_parallel, 0., 0.).is_err());
        Ok(())
    }

    #[test]
    fn equivalent_central_lines() -> Result<(), Error> {
        let lat_origin = 40f64.to_radians();
        let two_points = HotineDefinition::TwoPoints {
            lon1: -110f64.to_radians(),
            lat1: 35f64.to_radians(),
            lon2: -90f64.to_radians(),
            lat2: 45f64.to_radians(),
        };
        let p = HotineObliqueMercator::new(A, B, 0.9996, lat_origin, two_points, 0., 0.)?;

        // The origin is where the central line crosses the latitude of
        // origin: the center point of the azimuth form
        let (lat_center, lon_center) = p.inverse(0., 0.)?;
        assert_float_eq!(lat_center, lat_origin, abs <= 1e-10);

        let azimuth = HotineDefinition::Azimuth {
            azimuth: p.azimuth(),
            lon_center,
        };
        let q = HotineObliqueMercator::new(A, B, 0.9996, lat_origin, azimuth, 0., 0.)?;
        assert_float_eq!(q.lon_origin(), p.lon_origin(), abs <= 1e-10);

        for (lat, lon) in [(35f64, -110f64), (45., -90.), (40., -100.), (30., -80.), (55., -130.)] {
            let (lat, lon) = (lat.to_radians(), lon.to_radians());
            let (x1, y1) = p.forward(lat, lon)?;
            let (x2, y2) = q.forward(lat, lon)?;
            assert_float_eq!(x1, x2, abs <= 1e-4);
            assert_float_eq!(y1, y2, abs <= 1e-4);
        }
        Ok(())
    }
}

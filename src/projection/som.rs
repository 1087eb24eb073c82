//! Space oblique Mercator, Snyder (1987) ch. 27
use crate::authoring::*;

/// Ratio of the satellite period to the length of the earth's rotation,
/// used for selecting the correct branch of the transformed longitude
const LANDSAT_RATIO: f64 = 0.5201613;

/// The orbit along which the projection follows the ground track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SomDefinition {
    /// A Landsat satellite (1 through 5) and its path number. Landsat 1
    /// to 3 follow a 251 path cycle, Landsat 4 and 5 a 233 path cycle.
    Landsat { satellite: i64, path: i64 },
    /// An explicit orbit: inclination and longitude of the ascending
    /// node in radians, the period in minutes, and whether the track
    /// starts at the end (true) or the beginning (false) of the path
    Orbit {
        inclination: f64,
        lon_ascending: f64,
        period: f64,
        from_end: bool,
    },
}

#[derive(Debug, Clone)]
pub struct SpaceObliqueMercator {
    r_major: f64,
    r_minor: f64,
    definition: SomDefinition,
    false_easting: f64,
    false_northing: f64,
    inclination: f64,
    lon_center: f64,
    from_end: bool,
    es: f64,
    p21: f64,
    sa: f64,
    ca: f64,
    q: f64,
    t: f64,
    u: f64,
    w: f64,
    xj: f64,
    a2: f64,
    a4: f64,
    b: f64,
    c1: f64,
    c3: f64,
}

/// The Fourier terms integrated over the transformed longitude
#[derive(Debug, Default, Clone, Copy)]
struct Terms {
    b: f64,
    a2: f64,
    a4: f64,
    c1: f64,
    c3: f64,
}

impl Terms {
    fn add(self, other: Terms, weight: f64) -> Terms {
        Terms {
            b: self.b + weight * other.b,
            a2: self.a2 + weight * other.a2,
            a4: self.a4 + weight * other.a4,
            c1: self.c1 + weight * other.c1,
            c3: self.c3 + weight * other.c3,
        }
    }
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl SpaceObliqueMercator {
    pub fn new(
        r_major: f64,
        r_minor: f64,
        definition: SomDefinition,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let es = 1.0 - (r_minor / r_major).powi(2);

        let (inclination, p21, lon_center, from_end) = match definition {
            SomDefinition::Orbit {
                inclination,
                lon_ascending,
                period,
                from_end,
            } => {
                if period <= 0.0 {
                    warn!("SOM: non-positive orbital period {period}");
                    return Err(Error::BadParam("period".to_string(), period.to_string()));
                }
                (inclination, period / 1440.0, lon_ascending, from_end)
            }
            SomDefinition::Landsat { satellite, path } if satellite < 4 => {
                let lon = 128.87 - 360.0 / 251.0 * path as f64;
                (99.092f64.to_radians(), 103.2669323 / 1440.0, lon.to_radians(), false)
            }
            SomDefinition::Landsat { path, .. } => {
                let lon = -129.30557714 - 360.0 / 233.0 * path as f64;
                (98.2f64.to_radians(), 98.8841202 / 1440.0, lon.to_radians(), false)
            }
        };

        let (sa, mut ca) = inclination.sin_cos();
        if ca.abs() < 1e-9 {
            ca = 1e-9;
        }
        let e2c = es * ca * ca;
        let e2s = es * sa * sa;
        let one_es = 1.0 - es;
        let w = ((1.0 - e2c) / one_es).powi(2) - 1.0;
        let q = e2s / one_es;
        let t = e2s * (2.0 - es) / (one_es * one_es);
        let u = e2c / one_es;
        let xj = one_es.powi(3);

        let mut p = SpaceObliqueMercator {
            r_major,
            r_minor,
            definition,
            false_easting,
            false_northing,
            inclination,
            lon_center,
            from_end,
            es,
            p21,
            sa,
            ca,
            q,
            t,
            u,
            w,
            xj,
            a2: 0.0,
            a4: 0.0,
            b: 0.0,
            c1: 0.0,
            c3: 0.0,
        };

        // Simpson's rule over [0, 90] degrees in steps of 9
        let mut sum = p.series(0.0);
        for i in (9..=81).step_by(18) {
            sum = sum.add(p.series(f64::from(i)), 4.0);
        }
        for i in (18..=72).step_by(18) {
            sum = sum.add(p.series(f64::from(i)), 2.0);
        }
        sum = sum.add(p.series(90.0), 1.0);

        p.a2 = sum.a2 / 30.0;
        p.a4 = sum.a4 / 60.0;
        p.b = sum.b / 30.0;
        p.c1 = sum.c1 / 15.0;
        p.c3 = sum.c3 / 45.0;
        debug!(
            "SOM: longitude of ascending node {}, B = {}, A2 = {}, A4 = {}, C1 = {}, C3 = {}",
            lon_center.to_degrees(),
            p.b,
            p.a2,
            p.a4,
            p.c1,
            p.c3
        );
        Ok(p)
    }

    /// The `S` function of Snyder (1987) eq. 27-9
    fn s(&self, tlam: f64) -> f64 {
        let sdsq = tlam.sin().powi(2);
        self.p21 * self.sa * tlam.cos()
            * ((1.0 + self.t * sdsq) / ((1.0 + self.w * sdsq) * (1.0 + self.q * sdsq))).sqrt()
    }

    /// The integrands of the Fourier coefficients at `dlam` degrees
    fn series(&self, dlam: f64) -> Terms {
        let dlam = dlam.to_radians();
        let sdsq = dlam.sin().powi(2);
        let s = self.s(dlam);
        let h = ((1.0 + self.q * sdsq) / (1.0 + self.w * sdsq)).sqrt()
            * ((1.0 + self.w * sdsq) / (1.0 + self.q * sdsq).powi(2) - self.p21 * self.ca);
        let sq = self.xj.hypot(s);
        let fb = (h * self.xj - s * s) / sq;
        let fc = s * (h + self.xj) / sq;
        Terms {
            b: fb,
            a2: fb * (2.0 * dlam).cos(),
            a4: fb * (4.0 * dlam).cos(),
            c1: fc * dlam.cos(),
            c3: fc * (3.0 * dlam).cos(),
        }
    }

    /// The transformed longitude, iterating from the starting guess
    /// `tlamp`. Returns the transformed longitude and the corresponding
    /// longitude along the ground track.
    fn transformed_longitude(&self, lat: f64, dlon: f64, tlamp: f64) -> Result<(f64, f64), ProjectionError> {
        const CONV: f64 = 1e-7;
        let ab1 = (dlon + self.p21 * tlamp).cos();
        let scl = if ab1 >= 0.0 { 1.0 } else { -1.0 };
        let ab2 = tlamp - scl * tlamp.sin() * FRAC_PI_2;

        let mut sav = tlamp;
        for _ in 0..=50 {
            let mut xlamt = dlon + self.p21 * sav;
            let c = xlamt.cos();
            if c.abs() < 1e-7 {
                xlamt -= 1e-7;
            }
            let xlam = ((1.0 - self.es) * lat.tan() * self.sa + xlamt.sin() * self.ca) / c;
            let tlam = xlam.atan() + ab2;
            if (sav.abs() - tlam.abs()).abs() < CONV {
                return Ok((tlam, xlamt));
            }
            sav = tlam;
        }
        Err(crate::math::gave_up("SOM forward", 50))
    }

    /// The longitude of the ascending node
    #[must_use]
    pub fn lon_center(&self) -> f64 {
        self.lon_center
    }
}

impl ProjectionTransform for SpaceObliqueMercator {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::SpaceObliqueMercator
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let lat = lat.clamp(-1.570796, 1.570796);
        let dlon = lon - self.lon_center;

        let mut tlamp = if lat < 0.0 {
            1.5 * PI
        } else if self.from_end {
            2.5 * PI
        } else {
            FRAC_PI_2
        };

        // Pick the branch of the transformed longitude on the right pass
        // of the orbit, trying at most three starting points
        let rlm = PI * LANDSAT_RATIO;
        let rlm2 = rlm + TAU;
        let mut attempt = 0;
        let (tlam, xlamt) = loop {
            let (tlam, xlamt) = self.transformed_longitude(lat, dlon, tlamp)?;
            attempt += 1;
            if attempt >= 3 || (tlam > rlm && tlam < rlm2) {
                break (tlam, xlamt);
            }
            if tlam < rlm {
                tlamp = 2.5 * PI;
            }
            if tlam >= rlm2 {
                tlamp = FRAC_PI_2;
            }
        };

        let dp = lat.sin();
        let tphi = (((1.0 - self.es) * self.ca * dp - self.sa * lat.cos() * xlamt.sin())
            / (1.0 - self.es * dp * dp).sqrt())
        .asin();

        let tanlg = (FRAC_PI_4 + tphi / 2.0).tan().ln();
        let sd = tlam.sin();
        let s = self.s(tlam);
        let d = self.xj.hypot(s);
        let along = self.r_major
            * (self.b * tlam + self.a2 * (2.0 * tlam).sin() + self.a4 * (4.0 * tlam).sin() - tanlg * s / d);
        let across = self.r_major * (self.c1 * sd + self.c3 * (3.0 * tlam).sin() + tanlg * self.xj / d);

        // The track runs along the map y axis
        if !along.is_finite() || !across.is_finite() {
            return Err(ProjectionError::Unprojectable("Point projects into infinity"));
        }
        Ok((across + self.false_easting, along + self.false_northing))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let across = x - self.false_easting;
        let along = y - self.false_northing;
        let a = self.r_major;

        let mut tlon = along / (a * self.b);
        let mut s = 0.0;
        let mut converged = false;
        for _ in 0..50 {
            let sav = tlon;
            s = self.s(tlon);
            let blon = along / a + (across / a) * s / self.xj
                - self.a2 * (2.0 * tlon).sin()
                - self.a4 * (4.0 * tlon).sin()
                - (s / self.xj) * (self.c1 * tlon.sin() + self.c3 * (3.0 * tlon).sin());
            tlon = blon / self.b;
            if (tlon - sav).abs() < 1e-9 {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(crate::math::gave_up("SOM inverse", 50));
        }

        // The transformed latitude
        let st = tlon.sin();
        let defac = ((1.0 + s * s / self.xj / self.xj).sqrt()
            * (across / a - self.c1 * st - self.c3 * (3.0 * tlon).sin()))
        .exp();
        let tlat = 2.0 * (defac.atan() - FRAC_PI_4);

        let dd = st * st;
        if tlon.cos().abs() < 1e-7 {
            tlon -= 1e-7;
        }
        let bigk = tlat.sin();
        let bigk2 = bigk * bigk;
        let mut xlamt = (((1.0 - bigk2 / (1.0 - self.es)) * tlon.tan() * self.ca
            - bigk * self.sa * ((1.0 + self.q * dd) * (1.0 - bigk2) - bigk2 * self.u).sqrt() / tlon.cos())
            / (1.0 - bigk2 * (1.0 + self.u)))
            .atan();

        // Quadrant correction
        let sl = if xlamt >= 0.0 { 1.0 } else { -1.0 };
        let scl = if tlon.cos() >= 0.0 { 1.0 } else { -1.0 };
        xlamt -= FRAC_PI_2 * (1.0 - scl) * sl;
        let dlon = xlamt - self.p21 * tlon;

        let lat = if self.sa.abs() < 1e-7 {
            (bigk / ((1.0 - self.es).powi(2) + self.es * bigk2).sqrt()).asin()
        } else {
            ((tlon.tan() * xlamt.cos() - self.ca * xlamt.sin()) / ((1.0 - self.es) * self.sa)).atan()
        };
        if !lat.is_finite() || !dlon.is_finite() {
            return Err(ProjectionError::OutOfRange("No inverse for point"));
        }
        Ok((lat, adjust_lon(dlon + self.lon_center)))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        let mut report = crate::projection::Report::new().axes(self.r_major, self.r_minor);
        if let SomDefinition::Landsat { satellite, path } = self.definition {
            report = report
                .value("Path Number", path as f64, Unit::None)
                .value("Satellite Number", satellite as f64, Unit::None);
        }
        report
            .angle("Inclination of Orbit", self.inclination)
            .angle("Longitude of Ascending Orbit", self.lon_center)
            .offsets(self.false_easting, self.false_northing)
            .value("Landsat Ratio", LANDSAT_RATIO, Unit::None)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    const A: f64 = 6378137.0;
    const B: f64 = 6356752.314245;

    #[test]
    fn landsat() -> Result<(), Error> {
        let definition = SomDefinition::Landsat { satellite: 5, path: 30 };
        let p = SpaceObliqueMercator::new(A, B, definition, 0., 0.)?;
        assert_float_eq!(p.lon_center().to_degrees(), -175.6575085, abs <= 1e-6);

        let (x, y) = p.forward(40f64.to_radians(), -80f64.to_radians())?;
        assert_float_eq!(x, -6757944.590, abs <= 1e-2);
        assert_float_eq!(y, 11947102.008, abs <= 1e-2);

        roundtrip(&p, &[(40., -80.), (45., -75.), (35., -85.), (60., -100.), (-20., 100.)], 1e-7)?;

        let report = p.describe();
        assert_eq!(report[2].label, "Path Number");
        assert_float_eq!(report[2].value, 30., abs <= 0.);
        Ok(())
    }

    #[test]
    fn explicit_orbit() -> Result<(), Error> {
        let definition = SomDefinition::Orbit {
            inclination: 98.2f64.to_radians(),
            lon_ascending: -80f64.to_radians(),
            period: 98.8841202,
            from_end: false,
        };
        let p = SpaceObliqueMercator::new(A, B, definition, 1e5, 2e5)?;
        let (x, y) = p.forward(40f64.to_radians(), -80f64.to_radians())?;
        assert_float_eq!(x, -2351722.967, abs <= 1e-2);
        assert_float_eq!(y, 45147146.110, abs <= 1e-2);
        roundtrip(&p, &[(40., -80.), (45., -75.), (35., -85.)], 1e-7)?;

        let bad = SomDefinition::Orbit {
            inclination: 1.7,
            lon_ascending: 0.,
            period: 0.,
            from_end: false,
        };
        assert!(SpaceObliqueMercator::new(A, B, bad, 0., 0.).is_err());
        Ok(())
    }
}

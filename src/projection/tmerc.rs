//! Transverse Mercator, and its Universal (UTM) special case.
//!
//! The ellipsoidal form uses the classic series of Snyder (1987),
//! eqs. 8-9 to 8-10 forward, and 8-17 to 8-18 inverse. For (nearly)
//! spherical figures, the closed form spherical equations are used.
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    system: ProjectionSystem,
    zone: i32,
    r_major: f64,
    r_minor: f64,
    scale_factor: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    es: f64,
    esp: f64,
    en: [f64; 4],
    ml0: f64,
    spherical: bool,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl TransverseMercator {
    pub fn new(
        r_major: f64,
        r_minor: f64,
        scale_factor: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let en = meridian_coefficients(es);
        let [e0, e1, e2, e3] = en;
        Ok(TransverseMercator {
            system: ProjectionSystem::TransverseMercator,
            zone: 0,
            r_major,
            r_minor,
            scale_factor,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            es,
            esp: es / (1.0 - es),
            en,
            ml0: r_major * mlfn(e0, e1, e2, e3, lat_origin),
            spherical: es < 0.00001,
        })
    }

    /// UTM zone `zone`, negative for the southern hemisphere
    pub fn utm(r_major: f64, r_minor: f64, scale_factor: f64, zone: i32) -> Result<Self, Error> {
        if !(1..=60).contains(&zone.abs()) {
            warn!("UTM: Illegal zone number {zone}");
            return Err(Error::BadParam("zone".to_string(), zone.to_string()));
        }
        let lon_center = f64::from(6 * zone.abs() - 183).to_radians();
        let false_northing = if zone < 0 { 10_000_000.0 } else { 0.0 };
        let mut tm = TransverseMercator::new(
            r_major,
            r_minor,
            scale_factor,
            lon_center,
            0.0,
            500_000.0,
            false_northing,
        )?;
        tm.system = ProjectionSystem::Utm;
        tm.zone = zone;
        Ok(tm)
    }
}

impl ProjectionTransform for TransverseMercator {
    fn system(&self) -> ProjectionSystem {
        self.system
    }

    fn zone(&self) -> i32 {
        self.zone
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sin_phi, cos_phi) = lat.sin_cos();
        let k = self.r_major * self.scale_factor;

        if self.spherical {
            let b = cos_phi * dlon.sin();
            if (b.abs() - 1.0).abs() < EPSLN {
                trace!("tmerc: point projects into infinity");
                return Err(ProjectionError::Unprojectable("tm-for"));
            }
            let x = 0.5 * k * ((1.0 + b) / (1.0 - b)).ln();
            let mut con = (cos_phi * dlon.cos() / (1.0 - b * b).sqrt()).acos();
            if lat < 0.0 {
                con = -con;
            }
            let y = k * (con - self.lat_origin);
            return Ok((x + self.false_easting, y + self.false_northing));
        }

        let [e0, e1, e2, e3] = self.en;
        let esp = self.esp;
        let al = cos_phi * dlon;
        let als = al * al;
        let c = esp * cos_phi * cos_phi;
        let tq = lat.tan();
        let t = tq * tq;
        let con = 1.0 - self.es * sin_phi * sin_phi;
        let n = self.r_major / con.sqrt();
        let ml = self.r_major * mlfn(e0, e1, e2, e3, lat);

        let x = self.scale_factor
            * n
            * al
            * (1.0
                + als / 6.0
                    * (1.0 - t + c + als / 20.0 * (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * esp)))
            + self.false_easting;
        let y = self.scale_factor
            * (ml - self.ml0
                + n * tq
                    * (als
                        * (0.5
                            + als / 24.0
                                * (5.0 - t
                                    + 9.0 * c
                                    + 4.0 * c * c
                                    + als / 30.0
                                        * (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * esp)))))
            + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let k = self.r_major * self.scale_factor;

        if self.spherical {
            let f = (x / k).exp();
            let g = 0.5 * (f - 1.0 / f);
            let temp = self.lat_origin + y / k;
            let h = temp.cos();
            let con = ((1.0 - h * h) / (1.0 + g * g)).sqrt();
            let mut lat = asinz(con);
            if temp < 0.0 {
                lat = -lat;
            }
            if g == 0.0 && h == 0.0 {
                return Ok((lat, self.lon_center));
            }
            return Ok((lat, adjust_lon(g.atan2(h) + self.lon_center)));
        }

        // Footpoint latitude
        const MAX_ITER: usize = 6;
        let [e0, e1, e2, e3] = self.en;
        let con = (self.ml0 + y / self.scale_factor) / self.r_major;
        let mut phi = con;
        let mut i = 0;
        loop {
            let dphi = (con + e1 * (2.0 * phi).sin() - e2 * (4.0 * phi).sin()
                + e3 * (6.0 * phi).sin())
                / e0
                - phi;
            phi += dphi;
            if dphi.abs() <= EPSLN {
                break;
            }
            if i >= MAX_ITER {
                return Err(crate::math::gave_up("tm-inverse", MAX_ITER));
            }
            i += 1;
        }

        if phi.abs() >= FRAC_PI_2 {
            return Ok((FRAC_PI_2 * sign(y), self.lon_center));
        }

        let esp = self.esp;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();
        let c = esp * cos_phi * cos_phi;
        let cs = c * c;
        let t = tan_phi * tan_phi;
        let ts = t * t;
        let con = 1.0 - self.es * sin_phi * sin_phi;
        let n = self.r_major / con.sqrt();
        let r = n * (1.0 - self.es) / con;
        let d = x / (n * self.scale_factor);
        let ds = d * d;

        let lat = phi
            - (n * tan_phi * ds / r)
                * (0.5
                    - ds / 24.0
                        * (5.0 + 3.0 * t + 10.0 * c - 4.0 * cs - 9.0 * esp
                            - ds / 30.0
                                * (61.0 + 90.0 * t + 298.0 * c + 45.0 * ts
                                    - 252.0 * esp
                                    - 3.0 * cs)));
        let lon = adjust_lon(
            self.lon_center
                + (d * (1.0
                    - ds / 6.0
                        * (1.0 + 2.0 * t + c
                            - ds / 20.0
                                * (5.0 - 2.0 * c + 28.0 * t - 3.0 * cs + 8.0 * esp + 24.0 * ts)))
                    / cos_phi),
        );
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        let mut report = crate::projection::Report::new();
        if self.system == ProjectionSystem::Utm {
            report = report.value("Zone", f64::from(self.zone), Unit::None);
        }
        report
            .axes(self.r_major, self.r_minor)
            .value("Scale Factor at C. Meridian", self.scale_factor, Unit::None)
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

    const A: f64 = 6378137.0;
    const B: f64 = 6356752.314245;

    #[test]
    fn utm() -> Result<(), Error> {
        // 55N 12E in UTM zone 32, as given by PROJ
        let p = TransverseMercator::utm(A, B, 0.9996, 32)?;
        assert_eq!(p.system(), ProjectionSystem::Utm);
        assert_eq!(p.zone(), 32);
        let (x, y) = p.forward(55f64.to_radians(), 12f64.to_radians())?;
        assert_float_eq!(x, 691875.632, abs <= 0.01);
        assert_float_eq!(y, 6098907.825, abs <= 0.01);
        roundtrip(&p, &[(55., 12.), (60., 7.), (0.1, 9.)], 1e-9)?;

        // Southern hemisphere
        let p = TransverseMercator::utm(A, B, 0.9996, -32)?;
        let (x, y) = p.forward(-10f64.to_radians(), 9f64.to_radians())?;
        assert_float_eq!(x, 500000., abs <= 1e-6);
        assert!(y > 8e6 && y < 1e7);

        assert!(TransverseMercator::utm(A, B, 0.9996, 0).is_err());
        assert!(TransverseMercator::utm(A, B, 0.9996, 61).is_err());
        Ok(())
    }

    #[test]
    fn transverse_mercator() -> Result<(), Error> {
        let p = TransverseMercator::new(A, B, 1.0, 0.2, 0.5, 1e5, 2e5)?;
        let (x, y) = p.forward(0.5, 0.2)?;
        assert_float_eq!(x, 1e5, abs <= 1e-6);
        assert_float_eq!(y, 2e5, abs <= 1e-6);
        roundtrip(&p, &[(30., 13.), (40., 10.), (-5., 8.)], 1e-9)?;
        Ok(())
    }

    #[test]
    fn spherical() -> Result<(), Error> {
        let p = TransverseMercator::new(6370997.0, 6370997.0, 1.0, 0., 0., 1000., 2000.)?;
        assert_eq!(p.forward(0., 0.)?, (1000., 2000.));
        roundtrip(&p, &[(30., 13.), (-40., -10.), (70., 60.)], 1e-10)?;
        assert!(p.forward(0., FRAC_PI_2).is_err());
        Ok(())
    }
}

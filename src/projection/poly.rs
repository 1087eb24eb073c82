//! American polyconic, Snyder (1987) ch. 18
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Polyconic {
    r_major: f64,
    r_minor: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    es: f64,
    e: f64,
    en: [f64; 4],
    ml0: f64,
}

impl Polyconic {
    pub fn new(
        r_major: f64,
        r_minor: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let temp = r_minor / r_major;
        let es = 1.0 - temp * temp;
        let en = meridian_coefficients(es);
        let [e0, e1, e2, e3] = en;
        Ok(Polyconic {
            r_major,
            r_minor,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            es,
            e: es.sqrt(),
            en,
            ml0: mlfn(e0, e1, e2, e3, lat_origin),
        })
    }
}

impl ProjectionTransform for Polyconic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Polyconic
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let con = adjust_lon(lon - self.lon_center);

        // The equator is a straight line
        if lat.abs() <= 1e-7 {
            let x = self.false_easting + self.r_major * con;
            let y = self.false_northing - self.r_major * self.ml0;
            return Ok((x, y));
        }

        let [e0, e1, e2, e3] = self.en;
        let (sinphi, cosphi) = lat.sin_cos();
        let ml = mlfn(e0, e1, e2, e3, lat);
        let ms = msfnz(self.e, sinphi, cosphi);
        let con = con * sinphi;
        let x = self.false_easting + self.r_major * ms * con.sin() / sinphi;
        let y = self.false_northing + self.r_major * (ml - self.ml0 + ms * (1.0 - con.cos()) / sinphi);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let al = self.ml0 + y / self.r_major;
        if al.abs() <= 1e-7 {
            return Ok((0.0, x / self.r_major + self.lon_center));
        }

        let b = al * al + (x / self.r_major) * (x / self.r_major);
        let (lat, c) = phi4z(self.es, self.en, al, b)?;
        let lon = adjust_lon(asinz(x * c / self.r_major) / lat.sin() + self.lon_center);
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
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
    fn polyconic() -> Result<(), Error> {
        // Snyder (1987), p. 295: Clarke 1866, origin at 30°N, 96°W
        let p = Polyconic::new(
            6378206.4,
            6356583.8,
            -96f64.to_radians(),
            30f64.to_radians(),
            0.,
            0.,
        )?;
        let (x, y) = p.forward(40f64.to_radians(), -75f64.to_radians())?;
        assert_float_eq!(x, 1776774.5, abs <= 0.1);
        assert_float_eq!(y, 1319657.8, abs <= 0.1);

        let (x, y) = p.forward(30f64.to_radians(), -96f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        roundtrip(&p, &[(40., -75.), (35., -100.), (50., -120.), (-20., -90.)], 1e-9)?;
        Ok(())
    }
}

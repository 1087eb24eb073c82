//! Mercator, ellipsoidal form with a latitude of true scale
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct Mercator {
    r_major: f64,
    r_minor: f64,
    lon_center: f64,
    lat_ts: f64,
    e: f64,
    m1: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Mercator {
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
        let (sin_ts, cos_ts) = lat_ts.sin_cos();

        // Snyder (1987) eq. 7-8: the scale factor at the true scale latitude
        let m1 = cos_ts / (1.0 - es * sin_ts * sin_ts).sqrt();
        Ok(Mercator {
            r_major,
            r_minor,
            lon_center,
            lat_ts,
            e,
            m1,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for Mercator {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Mercator
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        if (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            trace!("merc: transformation cannot be computed at the poles");
            return Err(ProjectionError::Unprojectable("mer-forward"));
        }
        let ts = tsfnz(self.e, lat, lat.sin());
        let x = self.false_easting + self.r_major * self.m1 * adjust_lon(lon - self.lon_center);
        let y = self.false_northing - self.r_major * self.m1 * ts.ln();
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let ts = (-y / (self.r_major * self.m1)).exp();
        let lat = phi2z(self.e, ts)?;
        let lon = adjust_lon(self.lon_center + x / (self.r_major * self.m1));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .central_meridian(self.lon_center)
            .value("Latitude of True Scale", self.lat_ts.to_degrees(), Unit::Degrees)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

//! Wagner VII equal area, spherical
use crate::authoring::*;

const CX: f64 = 2.66723;
const CY: f64 = 1.24104;
const CS: f64 = 0.90631;

#[derive(Debug, Clone)]
pub struct WagnerVII {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl WagnerVII {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(WagnerVII {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for WagnerVII {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::WagnerVII
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let delta_lon = adjust_lon(lon - self.lon_center);
        let (sin_lon, cos_lon) = (delta_lon / 3.0).sin_cos();
        let s = CS * lat.sin();
        let c0 = (1.0 - s * s).sqrt();
        let c1 = (2.0 / (1.0 + c0 * cos_lon)).sqrt();
        let x = CX * self.r * c0 * c1 * sin_lon + self.false_easting;
        let y = CY * self.r * s * c1 + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let t1 = x / CX;
        let t2 = y / CY;
        let p = t1.hypot(t2);
        if p < EPSLN {
            return Ok((0.0, self.lon_center));
        }
        let c = 2.0 * asinz(p / (2.0 * self.r));
        let lat = asinz(y * c.sin() / (CY * CS * p));
        let lon = adjust_lon(self.lon_center + 3.0 * (x * c.tan()).atan2(CX * p));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .center_lon(self.lon_center)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

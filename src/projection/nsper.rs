//! General vertical near-side perspective, spherical form, Snyder (1987) ch. 23
use crate::authoring::*;
use crate::boundary::{BoundaryHandler, CutTest};
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NearsidePerspective {
    r: f64,
    height: f64,
    lon_center: f64,
    lat_center: f64,
    false_easting: f64,
    false_northing: f64,
    // Distance of the perspective point from the center of the globe,
    // in units of the radius
    p: f64,
    sin_p15: f64,
    cos_p15: f64,
    boundary: OnceCell<BoundaryHandler>,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl NearsidePerspective {
    pub fn new(
        r: f64,
        height: f64,
        lon_center: f64,
        lat_center: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        if !(height > 0.0) {
            warn!("NSPER: Height of perspective point must be positive");
            return Err(Error::BadParam("height".to_string(), height.to_string()));
        }
        let (sin_p15, cos_p15) = lat_center.sin_cos();
        Ok(NearsidePerspective {
            r,
            height,
            lon_center,
            lat_center,
            false_easting,
            false_northing,
            p: 1.0 + height / r,
            sin_p15,
            cos_p15,
            boundary: OnceCell::new(),
        })
    }
}

impl ProjectionTransform for NearsidePerspective {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::NearsidePerspective
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p15 * sinphi + self.cos_p15 * cosphi * coslon;

        // Beyond the horizon of the perspective point
        if g < 1.0 / self.p {
            return Err(ProjectionError::Unprojectable("Point beyond the horizon"));
        }

        // Snyder (1987) eq. 23-2
        let ksp = (self.p - 1.0) / (self.p - g);
        let x = self.false_easting + self.r * ksp * cosphi * dlon.sin();
        let y = self.false_northing
            + self.r * ksp * (self.cos_p15 * sinphi - self.sin_p15 * cosphi * coslon);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        let r = rh / self.r;
        let con = self.p - 1.0;
        let com = self.p + 1.0;
        if r > (con / com).sqrt() {
            return Err(ProjectionError::OutOfRange("Outside the horizon circle"));
        }
        if rh.abs() <= EPSLN {
            return Ok((self.lat_center, self.lon_center));
        }

        // Snyder (1987) eq. 23-3
        let sinz = (self.p - (1.0 - (r * r * com) / con).sqrt()) / (con / r + r / con);
        let z = asinz(sinz);
        let (sinz, cosz) = z.sin_cos();

        let lat = asinz(cosz * self.sin_p15 + (y * sinz * self.cos_p15) / rh);
        if (self.lat_center.abs() - FRAC_PI_2).abs() <= EPSLN {
            let lon = if self.lat_center >= 0.0 {
                adjust_lon(self.lon_center + x.atan2(-y))
            } else {
                adjust_lon(self.lon_center - (-x).atan2(y))
            };
            return Ok((lat, lon));
        }

        let con = cosz - self.sin_p15 * lat.sin();
        if con.abs() < EPSLN && x.abs() < EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(self.lon_center + (x * sinz * self.cos_p15).atan2(con * rh));
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .value("Height of Point Above Surface of Sphere", self.height, Unit::Meters)
            .center_lon(self.lon_center)
            .center_lat(self.lat_center)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }

    /// The horizon as seen from the perspective point
    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        let handler = self.boundary.get_or_try_init(|| {
            let r_max = self.r * ((self.p - 1.0) / (self.p + 1.0)).sqrt() * (1.0 - EPSLN);
            let offsets = (self.false_easting, self.false_northing);
            let horizon = crate::projection::trace_limb(self, r_max, offsets)?;
            let p = self.clone();
            let cut: CutTest = Arc::new(move |a, b| {
                let (lat_a, lon_a) = crate::projection::radians(a);
                let (lat_b, lon_b) = crate::projection::radians(b);
                p.forward(lat_a, lon_a).is_err() || p.forward(lat_b, lon_b).is_err()
            });
            Ok::<_, ProjectionError>(BoundaryHandler::new(cut, &[horizon]))
        });
        match handler {
            Ok(handler) => Some(handler.clone()),
            Err(e) => {
                warn!("NSPER: failed tracing the horizon: {e}");
                None
            }
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------

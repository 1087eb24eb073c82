//! Spherical orthographic, Snyder (1987) ch. 20
use crate::authoring::*;
use crate::boundary::{BoundaryHandler, CutTest};
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Orthographic {
    r: f64,
    lon_center: f64,
    lat_origin: f64,
    false_easting: f64,
    false_northing: f64,
    sin_p14: f64,
    cos_p14: f64,
    boundary: OnceCell<BoundaryHandler>,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Orthographic {
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        let (sin_p14, cos_p14) = lat_origin.sin_cos();
        Ok(Orthographic {
            r,
            lon_center,
            lat_origin,
            false_easting,
            false_northing,
            sin_p14,
            cos_p14,
            boundary: OnceCell::new(),
        })
    }
}

impl ProjectionTransform for Orthographic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Orthographic
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();

        // cos c, Snyder (1987) eq. 5-3: negative on the far side
        let g = self.sin_p14 * sinphi + self.cos_p14 * cosphi * coslon;
        if g < 0.0 && g.abs() > EPSLN {
            return Err(ProjectionError::Unprojectable("Point on the far side of the globe"));
        }

        let x = self.false_easting + self.r * cosphi * dlon.sin();
        let y = self.false_northing
            + self.r * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * coslon);
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        if rh > self.r + 1e-7 {
            return Err(ProjectionError::OutOfRange("Outside the disk of the globe"));
        }

        let z = asinz(rh / self.r);
        let (sinz, cosz) = z.sin_cos();
        if rh.abs() <= EPSLN {
            return Ok((self.lat_origin, self.lon_center));
        }

        let lat = asinz(cosz * self.sin_p14 + (y * sinz * self.cos_p14) / rh);
        if (self.lat_origin.abs() - FRAC_PI_2).abs() <= EPSLN {
            let lon = if self.lat_origin >= 0.0 {
                adjust_lon(self.lon_center + x.atan2(-y))
            } else {
                adjust_lon(self.lon_center - (-x).atan2(y))
            };
            return Ok((lat, lon));
        }

        let con = cosz - self.sin_p14 * lat.sin();
        let lon = if con.abs() >= EPSLN || x.abs() >= EPSLN {
            adjust_lon(self.lon_center + (x * sinz * self.cos_p14).atan2(con * rh))
        } else {
            self.lon_center
        };
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .central_meridian(self.lon_center)
            .origin(self.lat_origin)
            .offsets(self.false_easting, self.false_northing)
            .build()
    }

    /// The limb of the globe, with segments cut wherever either end is
    /// on the far side. Traced once, then shared.
    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        let handler = self.boundary.get_or_try_init(|| {
            let r_max = (self.r + 1e-7) * (1.0 - EPSLN);
            let offsets = (self.false_easting, self.false_northing);
            let limb = crate::projection::trace_limb(self, r_max, offsets)?;
            let p = self.clone();
            let cut: CutTest = Arc::new(move |a, b| {
                let (lat_a, lon_a) = crate::projection::radians(a);
                let (lat_b, lon_b) = crate::projection::radians(b);
                p.forward(lat_a, lon_a).is_err() || p.forward(lat_b, lon_b).is_err()
            });
            Ok::<_, ProjectionError>(BoundaryHandler::new(cut, &[limb]))
        });
        match handler {
            Ok(handler) => Some(handler.clone()),
            Err(e) => {
                warn!("Orthographic: failed tracing the limb: {e}");
                None
            }
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn orthographic() -> Result<(), Error> {
        let p = Orthographic::new(1.0, -100f64.to_radians(), 40f64.to_radians(), 0., 0.)?;
        let (x, y) = p.forward(30f64.to_radians(), -110f64.to_radians())?;
        assert_float_eq!(x, -0.1503837, abs <= 1e-7);
        assert_float_eq!(y, -0.1651911, abs <= 1e-7);

        let p = Orthographic::new(6370997., 0., 0., 0., 0.)?;
        roundtrip(&p, &[(0., 0.), (45., 45.), (-60., -80.), (10., 89.)], 1e-8)?;

        // The antipode of the center is on the far side
        assert!(matches!(p.forward(0., PI), Err(ProjectionError::Unprojectable(_))));
        assert!(p.inverse(6370997. * 1.01, 0.).is_err());
        Ok(())
    }

    #[test]
    fn limb() -> Result<(), Error> {
        let p = Orthographic::new(6370997., 0., 0., 0., 0.)?;
        let handler = p.boundary_handler().unwrap();

        // Every point of the limb is a quarter turn from the center
        let total: usize = handler.lines().iter().map(Vec::len).sum();
        assert!(total > 700);
        for line in handler.lines() {
            for loc in line {
                let cos_c = loc.lat.to_radians().cos() * loc.lon.to_radians().cos();
                assert_float_eq!(cos_c, 0., abs <= 1e-4);
            }
        }

        let near = EarthLocation::new(0., 10.);
        let far = EarthLocation::new(0., 170.);
        assert!(handler.is_boundary_cut(&near, &far));
        assert!(!handler.is_boundary_cut(&near, &EarthLocation::new(10., 20.)));

        // The limb is traced once, and the splitter built once
        assert!(handler.is_on_boundary(&handler.lines()[0][10]));
        assert!(!handler.is_on_boundary(&near));
        let again = p.boundary_handler().unwrap();
        assert!(std::ptr::eq(handler.splitter(), again.splitter()));
        Ok(())
    }
}

//! Robinson, by interpolation in the published table of parallel
//! lengths and distances, at 5 degree intervals
use crate::authoring::*;
use crate::math::gave_up;

// Entry i covers latitude 5(i - 2) degrees: the first entry mirrors
// 5 degrees south, so the interpolation needs no special case at the
// equator. Distances are in units of πR/2, lengths in units of R
// before scaling by 0.9858.
#[rustfmt::skip]
const PR: [f64; 21] = [
    0.0,    -0.062, 0.0,    0.062,  0.124,  0.186,  0.248,  0.31,   0.372,  0.434,  0.4958,
    0.5571, 0.6176, 0.6769, 0.7346, 0.7903, 0.8435, 0.8936, 0.9394, 0.9761, 1.0,
];

#[rustfmt::skip]
const XLR: [f64; 21] = [
    0.0,    0.9986, 1.0,    0.9986, 0.9954, 0.99,   0.9822, 0.973,  0.96,   0.9427, 0.9216,
    0.8962, 0.8679, 0.835,  0.7986, 0.7597, 0.7186, 0.6732, 0.6213, 0.5722, 0.5322,
];

const XLR_SCALE: f64 = 0.9858;

#[derive(Debug, Clone)]
pub struct Robinson {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
    xlr: [f64; 21],
}

/// Stirling's central difference interpolation at `p2` past node `ip1 + 2`
fn interpolate(table: &[f64; 21], ip1: usize, p2: f64) -> f64 {
    table[ip1 + 2]
        + p2 * (table[ip1 + 3] - table[ip1 + 1]) / 2.0
        + p2 * p2 * (table[ip1 + 3] - 2.0 * table[ip1 + 2] + table[ip1 + 1]) / 2.0
}

/// Table node and fraction for a latitude in degrees
fn node(lat_deg: f64) -> (usize, f64) {
    let p2 = (lat_deg / 5.0).abs();
    let ip1 = ((p2 - EPSLN).max(0.0) as usize).min(17);
    (ip1, p2 - ip1 as f64)
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Robinson {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        let xlr = XLR.map(|v| v * XLR_SCALE);
        Ok(Robinson {
            r,
            lon_center,
            false_easting,
            false_northing,
            xlr,
        })
    }

    fn y_of(&self, lat_deg: f64) -> f64 {
        let (ip1, p2) = node(lat_deg);
        let y = self.r * interpolate(&PR, ip1, p2) * FRAC_PI_2;
        y.copysign(lat_deg)
    }
}

impl ProjectionTransform for Robinson {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Robinson
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (ip1, p2) = node(lat.to_degrees());
        let x = self.r * interpolate(&self.xlr, ip1, p2) * dlon + self.false_easting;
        let y = self.y_of(lat.to_degrees()) + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let yy = 2.0 * y / PI / self.r;
        if yy.abs() > 1.0 + EPSLN {
            return Err(ProjectionError::OutOfRange("Beyond the pole lines"));
        }

        // First estimate by inverting the interpolation polynomial,
        // stepping down the table until the fraction is non-negative
        let mut ip1 = node(yy * 90.0).0.max(1);
        let p2 = loop {
            let u = PR[ip1 + 3] - PR[ip1 + 1];
            let v = PR[ip1 + 3] - 2.0 * PR[ip1 + 2] + PR[ip1 + 1];
            let t = 2.0 * (yy.abs() - PR[ip1 + 2]) / u;
            let c = v / u;
            let p2 = t * (1.0 - c * t * (1.0 - 2.0 * c * t));
            if p2 >= 0.0 || ip1 == 1 {
                break p2;
            }
            ip1 -= 1;
        };

        // Then refine until the forward interpolation reproduces y
        let mut phid = ((p2 + ip1 as f64) * 5.0).copysign(y);
        let mut i = 0;
        loop {
            let y1 = self.y_of(phid);
            phid -= 180.0 * (y1 - y) / PI / self.r;
            i += 1;
            if (y1 - y).abs() <= 1e-5 {
                break;
            }
            if i > 75 {
                return Err(gave_up("Robinson inverse", i));
            }
        }

        let (ip1, p2) = node(phid);
        let lon = adjust_lon(self.lon_center + x / self.r / interpolate(&self.xlr, ip1, p2));
        Ok((phid.to_radians(), lon))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn robinson() -> Result<(), Error> {
        let r = 6370997.;
        let p = Robinson::new(r, 0., 0., 0.)?;
        let (x, y) = p.forward(50f64.to_radians(), -80f64.to_radians())?;
        assert_float_eq!(x, -7610851.66, abs <= 0.01);
        assert_float_eq!(y, 6180655.89, abs <= 0.01);

        let (x, y) = p.forward(FRAC_PI_2, 0.)?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, r * FRAC_PI_2, rel <= 1e-12);

        // The inverse iterates to 1e-5 m in y
        roundtrip(&p, &[(0., 0.), (50., -80.), (-33., 120.), (72.5, 179.)], 1e-9)?;
        assert!(p.inverse(0., 1.1 * r * FRAC_PI_2).is_err());
        Ok(())
    }
}

//! Van der Grinten I, spherical, Snyder (1987) ch. 29
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct VanDerGrinten {
    r: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl VanDerGrinten {
    pub fn new(r: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        Ok(VanDerGrinten {
            r,
            lon_center,
            false_easting,
            false_northing,
        })
    }
}

impl ProjectionTransform for VanDerGrinten {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::VanDerGrinten
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let pr = PI * self.r;

        if lat.abs() <= EPSLN {
            return Ok((self.false_easting + self.r * dlon, self.false_northing));
        }

        let theta = asinz(2.0 * (lat / PI).abs());
        if dlon.abs() <= EPSLN || (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            let y = pr * (0.5 * theta).tan();
            return Ok((self.false_easting, self.false_northing + y.copysign(lat)));
        }

        // Snyder (1987) eqs. 29-1 to 29-6
        let al = 0.5 * (PI / dlon - dlon / PI).abs();
        let asq = al * al;
        let (sinth, costh) = theta.sin_cos();
        let g = costh / (sinth + costh - 1.0);
        let gsq = g * g;
        let m = g * (2.0 / sinth - 1.0);
        let msq = m * m;
        let mut con = pr
            * (al * (g - msq) + (asq * (g - msq) * (g - msq) - (msq + asq) * (gsq - msq)).sqrt())
            / (msq + asq);
        if dlon < 0.0 {
            con = -con;
        }
        let x = self.false_easting + con;

        let con = (con / pr).abs();
        let y = pr * (1.0 - con * con - 2.0 * al * con).sqrt();
        Ok((x, self.false_northing + y.copysign(lat)))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let con = PI * self.r;
        let xx = x / con;
        let yy = y / con;
        let xys = xx * xx + yy * yy;

        // Snyder (1987) eqs. 29-8 to 29-15: the cubic for latitude
        let c1 = -yy.abs() * (1.0 + xys);
        let c2 = c1 - 2.0 * yy * yy + xx * xx;
        let c3 = -2.0 * c1 + 1.0 + 2.0 * yy * yy + xys * xys;
        let d = yy * yy / c3
            + (2.0 * c2 * c2 * c2 / c3 / c3 / c3 - 9.0 * c1 * c2 / c3 / c3) / 27.0;
        let a1 = (c1 - c2 * c2 / 3.0 / c3) / c3;
        let m1 = 2.0 * (-a1 / 3.0).sqrt();

        let lat = if m1.abs() < EPSLN {
            0.0
        } else {
            let con = ((3.0 * d) / a1 / m1).clamp(-1.0, 1.0);
            let th1 = con.acos() / 3.0;
            let lat = (-m1 * (th1 + PI / 3.0).cos() - c2 / 3.0 / c3) * PI;
            if y >= 0.0 {
                lat
            } else {
                -lat
            }
        };

        if xx.abs() < EPSLN {
            return Ok((lat, self.lon_center));
        }
        let lon = adjust_lon(
            self.lon_center
                + PI * (xys - 1.0 + (1.0 + 2.0 * (xx * xx - yy * yy) + xys * xys).sqrt()) / 2.0 / xx,
        );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn van_der_grinten() -> Result<(), Error> {
        let p = VanDerGrinten::new(1.0, 0., 0., 0.)?;
        let (x, y) = p.forward(50f64.to_radians(), -160f64.to_radians())?;
        assert_float_eq!(x, -2.5745709, abs <= 1e-7);
        assert_float_eq!(y, 1.1538901, abs <= 1e-7);

        // The equator is true to scale, the central meridian is not
        let (x, y) = p.forward(0., 1.)?;
        assert_eq!((x, y), (1., 0.));

        let p = VanDerGrinten::new(6370997., 0.2, 0., 0.)?;
        roundtrip(&p, &[(0., 30.), (50., -160.), (-33., 120.), (70., 0.2f64.to_degrees())], 1e-8)?;
        Ok(())
    }
}

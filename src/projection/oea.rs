//! Oblated equal area, spherical, Snyder (1988)
use crate::authoring::*;

#[derive(Debug, Clone)]
pub struct OblatedEqualArea {
    r: f64,
    lon_center: f64,
    lat_o: f64,
    m: f64,
    n: f64,
    theta: f64,
    false_easting: f64,
    false_northing: f64,
    sin_lat_o: f64,
    cos_lat_o: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl OblatedEqualArea {
    /// The oval shape is given by `m` and `n`, and the rotation of the
    /// oval by `theta` (radians)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r: f64,
        lon_center: f64,
        lat_o: f64,
        m: f64,
        n: f64,
        theta: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, Error> {
        if m == 0.0 || n == 0.0 {
            warn!("OEA: Shape parameters must be non-zero");
            return Err(Error::BadParam("shape".to_string(), format!("m = {m}, n = {n}")));
        }
        let (sin_lat_o, cos_lat_o) = lat_o.sin_cos();
        Ok(OblatedEqualArea {
            r,
            lon_center,
            lat_o,
            m,
            n,
            theta,
            false_easting,
            false_northing,
            sin_lat_o,
            cos_lat_o,
        })
    }
}

impl ProjectionTransform for OblatedEqualArea {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::OblatedEqualArea
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let delta_lon = lon - self.lon_center;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_delta_lon, cos_delta_lon) = delta_lon.sin_cos();

        // Distance and azimuth from the center, then the oblique
        // Lambert azimuthal coordinates
        let z = (self.sin_lat_o * sin_lat + self.cos_lat_o * cos_lat * cos_delta_lon).acos();
        let az = (cos_lat * sin_delta_lon)
            .atan2(self.cos_lat_o * sin_lat - self.sin_lat_o * cos_lat * cos_delta_lon)
            + self.theta;
        let (sin_az, cos_az) = az.sin_cos();
        let temp = 2.0 * (z / 2.0).sin();
        let x_prime = temp * sin_az;
        let y_prime = temp * cos_az;

        let big_m = (x_prime / 2.0).asin();
        let big_n = (y_prime / 2.0 * big_m.cos() / (2.0 * big_m / self.m).cos()).asin();
        if big_n.is_nan() {
            return Err(ProjectionError::Unprojectable("Outside the oval"));
        }

        let x = self.m * self.r * (2.0 * big_m / self.m).sin() * big_n.cos()
            / (2.0 * big_n / self.n).cos()
            + self.false_easting;
        let y = self.n * self.r * (2.0 * big_n / self.n).sin() + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let big_n = (self.n / 2.0) * (y / (self.n * self.r)).asin();
        let temp = x / (self.m * self.r) * (2.0 * big_n / self.n).cos() / big_n.cos();
        let big_m = (self.m / 2.0) * temp.asin();
        let x_prime = 2.0 * big_m.sin();
        let y_prime = 2.0 * big_n.sin() * (2.0 * big_m / self.m).cos() / big_m.cos();

        let z = 2.0 * (x_prime.hypot(y_prime) / 2.0).asin();
        if z.is_nan() {
            return Err(ProjectionError::OutOfRange("Outside the oval"));
        }
        let az = x_prime.atan2(y_prime);
        let (sin_diff, cos_diff) = (az - self.theta).sin_cos();
        let (sin_z, cos_z) = z.sin_cos();

        let lat = (self.sin_lat_o * cos_z + self.cos_lat_o * sin_z * cos_diff).asin();
        let lon = adjust_lon(
            self.lon_center
                + (sin_z * sin_diff).atan2(self.cos_lat_o * cos_z - self.sin_lat_o * sin_z * cos_diff),
        );
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .radius(self.r)
            .center_lon(self.lon_center)
            .center_lat(self.lat_o)
            .value("Parameter m", self.m, Unit::None)
            .value("Parameter n", self.n, Unit::None)
            .angle("Theta", self.theta)
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
    fn oblated_equal_area() -> Result<(), Error> {
        let r = 6370997.;
        let p = OblatedEqualArea::new(r, -100f64.to_radians(), 45f64.to_radians(), 1.5, 2.5, 30f64.to_radians(), 0., 0.)?;
        let (x, y) = p.forward(30f64.to_radians(), -80f64.to_radians())?;
        assert_float_eq!(x, 938471.860, abs <= 1e-3);
        assert_float_eq!(y, -2216125.293, abs <= 1e-3);
        roundtrip(&p, &[(45., -100.), (30., -80.), (60., -130.), (20., -110.)], 1e-9)?;

        // Easting and northing offsets go where they belong
        let q = OblatedEqualArea::new(r, -100f64.to_radians(), 45f64.to_radians(), 1.5, 2.5, 30f64.to_radians(), 1000., 2000.)?;
        let (x2, y2) = q.forward(30f64.to_radians(), -80f64.to_radians())?;
        assert_float_eq!(x2 - x, 1000., abs <= 1e-6);
        assert_float_eq!(y2 - y, 2000., abs <= 1e-6);

        assert!(OblatedEqualArea::new(r, 0., 0., 0., 1., 0., 0., 0.).is_err());
        Ok(())
    }
}

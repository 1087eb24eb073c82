//! Modified stereographic conformal for Alaska, Snyder (1987) ch. 18.
//! An oblique stereographic projection of the Clarke 1866 ellipsoid,
//! followed by a sixth order complex polynomial.
use crate::authoring::*;
use crate::math::gave_up;

const N: usize = 6;

// Clarke 1866
const ES: f64 = 0.006768657997291094;

// Coefficients of the complex polynomial, real and imaginary parts.
// Index 0 is unused.
#[rustfmt::skip]
const ACOEF: [f64; N + 1] = [0.0, 0.9945303, 0.0052083, 0.0072721, -0.0151089, 0.0642675, 0.3582802];
#[rustfmt::skip]
const BCOEF: [f64; N + 1] = [0.0, 0.0, -0.0027404, 0.0048181, -0.1932526, -0.1381226, -0.2884586];

#[derive(Debug, Clone)]
pub struct AlaskaConformal {
    r_major: f64,
    r_minor: f64,
    false_easting: f64,
    false_northing: f64,
    lon_center: f64,
    lat_center: f64,
    e: f64,
    sin_p26: f64,
    cos_p26: f64,
}

/// Conformal latitude, Snyder (1987) eq. 3-1
fn conformal_latitude(e: f64, lat: f64) -> f64 {
    let esphi = e * lat.sin();
    2.0 * (((FRAC_PI_2 + lat) / 2.0).tan() * ((1.0 - esphi) / (1.0 + esphi)).powf(e / 2.0)).atan() - FRAC_PI_2
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl AlaskaConformal {
    pub fn new(r_major: f64, r_minor: f64, false_easting: f64, false_northing: f64) -> Result<Self, Error> {
        let lon_center = -152f64.to_radians();
        let lat_center = 64f64.to_radians();
        let e = ES.sqrt();
        let chi = conformal_latitude(e, lat_center);
        let (sin_p26, cos_p26) = chi.sin_cos();
        debug!("ALASKA: conformal latitude of center {}", chi.to_degrees());
        Ok(AlaskaConformal {
            r_major,
            r_minor,
            false_easting,
            false_northing,
            lon_center,
            lat_center,
            e,
            sin_p26,
            cos_p26,
        })
    }
}

impl ProjectionTransform for AlaskaConformal {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::AlaskaConformal
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let dlon = adjust_lon(lon - self.lon_center);
        let (sinlon, coslon) = dlon.sin_cos();

        // Oblique stereographic
        let chi = conformal_latitude(self.e, lat);
        let (sinphi, cosphi) = chi.sin_cos();
        let g = self.sin_p26 * sinphi + self.cos_p26 * cosphi * coslon;
        let s = 2.0 / (1.0 + g);
        let xp = s * cosphi * sinlon;
        let yp = s * (self.cos_p26 * sinphi - self.sin_p26 * cosphi * coslon);

        // Knuth's algorithm for summing the complex polynomial. The
        // summation order matters for the last bits.
        let r = xp + xp;
        let s = xp * xp + yp * yp;
        let mut ar = ACOEF[N];
        let mut ai = BCOEF[N];
        let mut br = ACOEF[N - 1];
        let mut bi = BCOEF[N - 1];
        let mut arn = 0.0;
        let mut ain = 0.0;
        for j in 2..=N {
            arn = br + r * ar;
            ain = bi + r * ai;
            if j < N {
                br = ACOEF[N - j] - s * ar;
                bi = BCOEF[N - j] - s * ai;
                ar = arn;
                ai = ain;
            }
        }
        let br = -s * ar;
        let bi = -s * ai;
        let ar = arn;
        let ai = ain;

        let x = (xp * ar - yp * ai + br) * self.r_major + self.false_easting;
        let y = (yp * ar + xp * ai + bi) * self.r_major + self.false_northing;
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let x = (x - self.false_easting) / self.r_major;
        let y = (y - self.false_northing) / self.r_major;
        let mut xp = x;
        let mut yp = y;

        // Newton iteration on the complex polynomial, evaluating the
        // polynomial and its derivative by Knuth's algorithm
        let mut nn = 0;
        loop {
            let r = xp + xp;
            let s = xp * xp + yp * yp;
            let mut ar = ACOEF[N];
            let mut ai = BCOEF[N];
            let mut br = ACOEF[N - 1];
            let mut bi = BCOEF[N - 1];
            let mut cr = N as f64 * ar;
            let mut ci = N as f64 * ai;
            let mut dr = (N - 1) as f64 * br;
            let mut di = (N - 1) as f64 * bi;
            let mut arn = 0.0;
            let mut ain = 0.0;
            for j in 2..=N {
                arn = br + r * ar;
                ain = bi + r * ai;
                if j < N {
                    br = ACOEF[N - j] - s * ar;
                    bi = BCOEF[N - j] - s * ai;
                    ar = arn;
                    ai = ain;
                    let crn = dr + r * cr;
                    let cin = di + r * ci;
                    dr = (N - j) as f64 * ACOEF[N - j] - s * cr;
                    di = (N - j) as f64 * BCOEF[N - j] - s * ci;
                    cr = crn;
                    ci = cin;
                }
            }
            let br = -s * ar;
            let bi = -s * ai;
            let ar = arn;
            let ai = ain;

            let fxyr = xp * ar - yp * ai + br - x;
            let fxyi = yp * ar + xp * ai + bi - y;
            let fpxyr = xp * cr - yp * ci + dr;
            // As published: the trailing term is ci, not di
            let fpxyi = yp * cr + xp * ci + ci;
            let den = fpxyr * fpxyr + fpxyi * fpxyi;
            let dxp = -(fxyr * fpxyr + fxyi * fpxyi) / den;
            let dyp = -(fxyi * fpxyr - fxyr * fpxyi) / den;
            xp += dxp;
            yp += dyp;
            nn += 1;
            if dxp.abs() + dyp.abs() <= EPSLN {
                break;
            }
            if nn > 20 {
                return Err(gave_up("Alaska inverse", nn));
            }
        }

        // Oblique stereographic to geodetic
        let rh = xp.hypot(yp);
        if rh.abs() <= EPSLN {
            return Ok((self.lat_center, self.lon_center));
        }
        let z = 2.0 * (rh / 2.0).atan();
        let (sinz, cosz) = z.sin_cos();
        let chi = asinz(cosz * self.sin_p26 + (yp * sinz * self.cos_p26) / rh);

        let mut phi = chi;
        let mut nn = 0;
        loop {
            let esphi = self.e * phi.sin();
            let dphi = 2.0
                * (((FRAC_PI_2 + chi) / 2.0).tan() * ((1.0 + esphi) / (1.0 - esphi)).powf(self.e / 2.0)).atan()
                - FRAC_PI_2
                - phi;
            phi += dphi;
            nn += 1;
            if dphi.abs() <= EPSLN {
                break;
            }
            if nn > 20 {
                return Err(gave_up("Alaska inverse latitude", nn));
            }
        }

        let lon = adjust_lon(
            self.lon_center + (xp * sinz).atan2(rh * self.cos_p26 * cosz - yp * self.sin_p26 * sinz),
        );
        Ok((phi, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .center_lon(self.lon_center)
            .center_lat(self.lat_center)
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
    fn alaska() -> Result<(), Error> {
        let p = AlaskaConformal::new(6378206.4, 6356583.8, 0., 0.)?;

        let (x, y) = p.forward(64f64.to_radians(), -152f64.to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        let (x, y) = p.forward(60f64.to_radians(), -150f64.to_radians())?;
        assert_float_eq!(x, 111208.675, abs <= 1e-3);
        assert_float_eq!(y, -443009.469, abs <= 1e-3);

        // The Newton iteration converges despite the published form of
        // the derivative, also far from the center
        roundtrip(&p, &[(60., -150.), (70., -160.), (55., -135.), (65., -170.), (52., -175.)], 1e-9)?;
        Ok(())
    }
}

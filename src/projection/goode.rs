//! Interrupted Goode homolosine: sinusoidal between 40°44'11.8" north
//! and south, Mollweide (homalographic) poleward of it, interrupted
//! into twelve regions with their own central meridians.
use super::moll::auxiliary_angle;
use crate::authoring::*;

// The latitude where the sinusoidal and Mollweide parallels coincide,
// 40°44'11.8"
const LAT_JOIN: f64 = 0.710987989993;

// Offset of the Mollweide parts in y, in units of R, making the two
// parts meet at LAT_JOIN
const Y_SHIFT: f64 = 0.0528035274542;

const CX: f64 = 0.900316316158;
const CY: f64 = std::f64::consts::SQRT_2;

// Meridians of the interruptions and region centers, in radians
const W160: f64 = -2.79252680319;
const W100: f64 = -1.74532925199;
const W60: f64 = -1.0471975512;
const W40: f64 = -0.698131700798;
const W20: f64 = -0.349065850399;
const E20: f64 = 0.349065850399;
const E30: f64 = 0.523598775598;
const E80: f64 = 1.3962634016;
const E140: f64 = 2.44346095279;

/// One of the twelve interrupted regions: Its central meridian (which
/// is also its false easting, in units of R) and its longitude span.
/// Even regions poleward of the join use the Mollweide equations.
#[derive(Debug, Clone, Copy)]
struct Region {
    lon_center: f64,
    west: f64,
    east: f64,
    sinusoidal: bool,
}

const fn r(lon_center: f64, west: f64, east: f64, sinusoidal: bool) -> Region {
    Region {
        lon_center,
        west,
        east,
        sinusoidal,
    }
}

#[rustfmt::skip]
const REGIONS: [Region; 12] = [
    r(W100, -PI,  W40, false),
    r(W100, -PI,  W40, true),
    r(E30,  W40,  PI,  false),
    r(E30,  W40,  PI,  true),
    r(W160, -PI,  W100, true),
    r(W60,  W100, W20, true),
    r(W160, -PI,  W100, false),
    r(W60,  W100, W20, false),
    r(E20,  W20,  E80, true),
    r(E140, E80,  PI,  true),
    r(E20,  W20,  E80, false),
    r(E140, E80,  PI,  false),
];

fn region(index: usize) -> Region {
    REGIONS[index]
}

/// Region selection from the band (by latitude, or by y in units of R)
/// and the position within the band (by longitude, or by x in units
/// of R). Since region central meridians double as false eastings, the
/// same test serves both directions.
fn select(band: f64, across: f64) -> usize {
    if band >= LAT_JOIN {
        if across <= W40 { 0 } else { 2 }
    } else if band >= 0.0 {
        if across <= W40 { 1 } else { 3 }
    } else if band >= -LAT_JOIN {
        if across <= W100 {
            4
        } else if across <= W20 {
            5
        } else if across <= E80 {
            8
        } else {
            9
        }
    } else if across <= W100 {
        6
    } else if across <= W20 {
        7
    } else if across <= E80 {
        10
    } else {
        11
    }
}

#[derive(Debug, Clone)]
pub struct InterruptedGoode {
    r: f64,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl InterruptedGoode {
    pub fn new(r: f64) -> Result<Self, Error> {
        Ok(InterruptedGoode { r })
    }
}

impl ProjectionTransform for InterruptedGoode {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::InterruptedGoode
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        let reg = region(select(lat, lon));
        let feast = self.r * reg.lon_center;
        let mut delta_lon = adjust_lon(lon - reg.lon_center);

        if reg.sinusoidal {
            return Ok((feast + self.r * delta_lon * lat.cos(), self.r * lat));
        }

        let theta = auxiliary_angle(lat)?;
        if FRAC_PI_2 - lat.abs() < EPSLN {
            delta_lon = 0.0;
        }
        let x = feast + CX * self.r * delta_lon * theta.cos();
        let y = self.r * (CY * theta.sin() - Y_SHIFT * sign(lat));
        Ok((x, y))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let index = select(y / self.r, x / self.r);
        let reg = region(index);
        let x = x - self.r * reg.lon_center;

        let (lat, mut lon) = if reg.sinusoidal {
            let lat = y / self.r;
            if lat.abs() > FRAC_PI_2 {
                return Err(ProjectionError::OutOfRange("Goode inverse"));
            }
            if (lat.abs() - FRAC_PI_2).abs() > EPSLN {
                (lat, adjust_lon(reg.lon_center + x / (self.r * lat.cos())))
            } else {
                (lat, reg.lon_center)
            }
        } else {
            let arg = (y + Y_SHIFT * self.r * sign(y)) / (CY * self.r);
            if arg.abs() > 1.0 {
                return Err(ProjectionError::InBreak);
            }
            let theta = arg.asin();
            let lon = reg.lon_center + x / (CX * self.r * theta.cos());
            if lon < -(PI + EPSLN) {
                return Err(ProjectionError::InBreak);
            }
            let arg = (2.0 * theta + (2.0 * theta).sin()) / PI;
            if arg.abs() > 1.0 {
                return Err(ProjectionError::InBreak);
            }
            (arg.asin(), lon)
        };

        // ±180° may get mixed up by rounding
        if (x < 0.0 && PI - lon < EPSLN) || (x > 0.0 && PI + lon < EPSLN) {
            lon = -lon;
        }

        let west = if reg.west <= -PI { -(PI + EPSLN) } else { reg.west };
        let east = if reg.east >= PI { PI + EPSLN } else { reg.east };
        if lon < west || lon > east {
            trace!("Goode: ({x}, {y}) in the break east or west of region {index}");
            return Err(ProjectionError::InBreak);
        }
        Ok((lat, lon))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new().radius(self.r).build()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::roundtrip;
    use float_eq::assert_float_eq;

    #[test]
    fn regions() {
        assert_eq!(select(0.8, -1.0), 0);
        assert_eq!(select(0.0, -100f64.to_radians()), 1);
        assert_eq!(select(0.5, 0.0), 3);
        assert_eq!(select(-0.1, -100f64.to_radians()), 4);
        assert_eq!(select(-0.1, -99f64.to_radians()), 5);
        assert_eq!(select(-0.8, 0.0), 10);
        assert_eq!(select(-0.8, 3.0), 11);

        // The interruptions sit at the rounded GCTP meridians, a hair
        // west of the exact 40W and 20W
        assert_eq!(select(0.5, W40), 1);
        assert_eq!(select(0.5, -40f64.to_radians()), 3);
        assert_eq!(select(-0.1, W20), 5);
        assert_eq!(select(-0.1, -20f64.to_radians()), 8);
    }

    #[test]
    fn region_boundary() -> Result<(), Error> {
        let r = 6370997.;
        let p = InterruptedGoode::new(r)?;

        // On the equator at the central meridian of regions 1 and 4
        let lon = -100f64.to_radians();
        let (x, y) = p.forward(0., lon)?;
        assert_float_eq!(x, r * lon, rel <= 1e-12);
        assert_eq!(y, 0.);
        let (lat2, lon2) = p.inverse(x, y)?;
        assert_float_eq!(lat2, 0., abs <= 1e-12);
        assert_float_eq!(lon2, lon, abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn goode() -> Result<(), Error> {
        let r = 6370997.;
        let p = InterruptedGoode::new(r)?;
        roundtrip(
            &p,
            &[(10., 10.), (60., -120.), (60., 100.), (-20., -150.), (-30., -60.), (-50., 40.), (-70., 160.), (89., 0.)],
            1e-9,
        )?;

        // The two parts meet at the join latitude
        let below = p.forward(LAT_JOIN - 1e-12, 0.5)?;
        let above = p.forward(LAT_JOIN, 0.5)?;
        assert_float_eq!(below.1, above.1, abs <= 1e-2);

        // The gap between the southern lobes at 100W
        let (x, y) = p.forward(-60f64.to_radians(), -100f64.to_radians())?;
        assert!(matches!(p.inverse(x + 0.3 * r, y), Err(ProjectionError::InBreak)));
        Ok(())
    }
}

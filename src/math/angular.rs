use super::ancillary::sign;
use crate::Error;
use std::f64::consts::{PI, TAU};

const MAXLONG: f64 = 2_147_483_647.;
const DBLLONG: f64 = 4.611_686_01e18;
const MAX_VAL: usize = 4;

/// Reduce a longitude (radians) to [-π, π].
///
/// The reduction ladder subtracts 2π directly for moderately sized
/// arguments, and integer multiples of 2π scaled by increasing powers
/// for huge ones, so the integer casts never overflow. The ladder runs
/// at most `MAX_VAL + 1` passes: pathological inputs that are still out
/// of range after that are folded by a final remainder operation, which
/// keeps the result in range (but not necessarily meaningful).
pub fn adjust_lon(mut x: f64) -> f64 {
    let mut count = 0;
    loop {
        if x.abs() <= PI {
            return x;
        }
        if ((x / PI).abs() as i64) < 2 {
            x -= sign(x) * TAU;
        } else if ((x / TAU).abs() as i64) < MAXLONG as i64 {
            x -= ((x / TAU) as i64) as f64 * TAU;
        } else if ((x / (MAXLONG * TAU)).abs() as i64) < MAXLONG as i64 {
            x -= ((x / (MAXLONG * TAU)) as i64) as f64 * (TAU * MAXLONG);
        } else if ((x / (DBLLONG * TAU)).abs() as i64) < MAXLONG as i64 {
            x -= ((x / (DBLLONG * TAU)) as i64) as f64 * (TAU * DBLLONG);
        } else {
            x -= sign(x) * TAU;
        }
        count += 1;
        if count > MAX_VAL {
            break;
        }
    }

    if x.is_finite() && x.abs() > PI {
        x = (x + PI).rem_euclid(TAU) - PI;
    }
    x
}

/// The UTM zone number of a longitude in degrees
pub fn calc_utm_zone(lon: f64) -> i32 {
    ((lon + 180.0) / 6.0 + 1.0) as i32
}

// ----- Packed angles -----------------------------------------------------------------

// The GCTP convention for angular parameters is the packed format
// DDDMMMSSS.SS, i.e. degrees*1e6 + minutes*1e3 + seconds.

/// Pack an angle in decimal degrees into DDDMMMSSS.SS format
pub fn pack_angle(angle: f64) -> f64 {
    let degrees = angle as i32;
    let minutes = (angle * 60.0 - f64::from(degrees) * 60.0) as i32;
    let seconds = angle * 3600.0 - f64::from(degrees) * 3600.0 - f64::from(minutes) * 60.0;
    f64::from(degrees) * 1e6 + f64::from(minutes) * 1e3 + seconds
}

/// Unpack an angle in DDDMMMSSS.SS format to decimal degrees
pub fn unpack_angle(angle: f64) -> f64 {
    let degrees = (angle as i32) / 1_000_000;
    let minutes = (angle as i32) / 1000 - degrees * 1000;
    let seconds = angle - f64::from(degrees) * 1e6 - f64::from(minutes) * 1e3;
    f64::from(degrees) + f64::from(minutes) / 60.0 + seconds / 3600.0
}

/// Convert a packed DDDMMMSSS.SS angle to decimal degrees, rejecting
/// packed angles with more than 360 degrees, 60 minutes, or 60 seconds
pub fn paksz(ang: f64) -> Result<f64, Error> {
    let fac = sign(ang);
    let illegal = || Error::BadParam("packed angle".to_string(), ang.to_string());

    let mut sec = ang.abs();
    let deg = (sec / 1e6) as i64;
    if deg > 360 {
        log::warn!("paksz: Illegal DMS field (degrees) in {ang}");
        return Err(illegal());
    }
    let deg = deg as f64;

    sec -= deg * 1e6;
    let min = (sec / 1e3) as i64;
    if min > 60 {
        log::warn!("paksz: Illegal DMS field (minutes) in {ang}");
        return Err(illegal());
    }
    let min = min as f64;

    sec -= min * 1e3;
    if sec > 60.0 {
        log::warn!("paksz: Illegal DMS field (seconds) in {ang}");
        return Err(illegal());
    }
    Ok(fac * unpack_angle(ang.abs()))
}

/// Convert radians to packed DDDMMMSSS.SS
pub fn pakr2dm(pak: f64) -> f64 {
    let deg = pak.to_degrees();
    let sgna = sign(deg);
    let mut con = deg.abs();
    let degs = con as i64 as f64;
    con = (con - degs) * 60.0;
    let mins = con as i64 as f64;
    let secs = (con - mins) * 60.0;
    sgna * (degs * 1e6 + mins * 1e3 + secs)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn longitude_reduction() {
        for x in [
            0.0, 1.0, -1.0, PI, -PI, 3.5, -3.5, 7.0, -7.0, 100.0, -1234.5, 1e12, -3e15, 1e19, 1e300,
        ] {
            let once = adjust_lon(x);
            assert!(once.abs() <= PI, "{x} -> {once}");
            assert_eq!(adjust_lon(once), once);
        }

        // Reduction by whole turns only
        assert_float_eq!(adjust_lon(3.5), 3.5 - TAU, abs <= 1e-15);
        assert_float_eq!(adjust_lon(-7.0), -7.0 + TAU, abs <= 1e-15);
        assert_float_eq!(adjust_lon(100.0), 100.0 - 16.0 * TAU, abs <= 1e-12);
        assert!(adjust_lon(f64::NAN).is_nan());
    }

    #[test]
    fn utm_zones() {
        assert_eq!(calc_utm_zone(-180.0), 1);
        assert_eq!(calc_utm_zone(12.0), 33);
        assert_eq!(calc_utm_zone(179.9), 60);
    }

    #[test]
    fn packed_angles() -> Result<(), Error> {
        // 55° 30' 36"
        assert_float_eq!(pack_angle(55.51), 55_030_036.0, abs <= 1e-6);
        assert_float_eq!(unpack_angle(55_030_036.0), 55.51, abs <= 1e-9);
        assert_float_eq!(paksz(55_030_036.0)?, 55.51, abs <= 1e-12);
        assert_float_eq!(paksz(-55_030_036.0)?, -55.51, abs <= 1e-12);
        assert_float_eq!(pakr2dm(55.51_f64.to_radians()), 55_030_036.0, abs <= 1e-6);

        // Out of range components are rejected
        assert!(paksz(361_000_000.0).is_err());
        assert!(paksz(10_061_000.0).is_err());
        assert!(paksz(10_000_061.0).is_err());
        Ok(())
    }
}

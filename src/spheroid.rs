//! The GCTP spheroid table and the axis selection policy
use log::debug;

/// Radius of the standard sphere, in kilometers
pub const STD_RADIUS: f64 = 6370.997;

// Spheroid codes of the GCTP table
pub const CLARKE1866: i32 = 0;
pub const CLARKE1880: i32 = 1;
pub const BESSEL: i32 = 2;
pub const INTERNATIONAL1967: i32 = 3;
pub const INTERNATIONAL1909: i32 = 4;
pub const WGS72: i32 = 5;
pub const EVEREST: i32 = 6;
pub const WGS66: i32 = 7;
pub const GRS1980: i32 = 8;
pub const AIRY: i32 = 9;
pub const MODIFIED_EVEREST: i32 = 10;
pub const MODIFIED_AIRY: i32 = 11;
pub const WGS84: i32 = 12;
pub const SOUTHEAST_ASIA: i32 = 13;
pub const AUSTRALIAN_NATIONAL: i32 = 14;
pub const KRASSOVSKY: i32 = 15;
pub const HOUGH: i32 = 16;
pub const MERCURY1960: i32 = 17;
pub const MODIFIED_MERCURY1968: i32 = 18;
pub const SPHERE: i32 = 19;

/// Number of entries in the spheroid table
pub const MAX_SPHEROIDS: usize = 20;

/// Representation of a named spheroid of the GCTP table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spheroid {
    code: i32,
    name: &'static str,
    a: f64,
    b: f64,
    rf: f64,
}

// As in the GCTP tables, the semiminor axes are tabulated, rather than
// derived from the inverse flattening: The matching by axes depends on it.
#[rustfmt::skip]
static SPHEROIDS: [Spheroid; MAX_SPHEROIDS] = [
    Spheroid {code:  0, name: "Clarke 1866",            a: 6378206.4,   b: 6356583.8,      rf: 294.9786982},
    Spheroid {code:  1, name: "Clarke 1880",            a: 6378249.145, b: 6356514.86955,  rf: 293.465},
    Spheroid {code:  2, name: "Bessel",                 a: 6377397.155, b: 6356078.96284,  rf: 299.1528128},
    Spheroid {code:  3, name: "International 1967",     a: 6378157.5,   b: 6356772.2,      rf: 298.249615390},
    Spheroid {code:  4, name: "International 1909",     a: 6378388.0,   b: 6356911.94613,  rf: 297.0},
    Spheroid {code:  5, name: "WGS 72",                 a: 6378135.0,   b: 6356750.519915, rf: 298.26},
    Spheroid {code:  6, name: "Everest",                a: 6377276.3452,b: 6356075.4133,   rf: 300.8017},
    Spheroid {code:  7, name: "WGS 66",                 a: 6378145.0,   b: 6356759.769356, rf: 298.25},
    Spheroid {code:  8, name: "GRS 1980",               a: 6378137.0,   b: 6356752.31414,  rf: 298.257222101},
    Spheroid {code:  9, name: "Airy",                   a: 6377563.396, b: 6356256.91,     rf: 299.3249646},
    Spheroid {code: 10, name: "Modified Everest",       a: 6377304.063, b: 6356103.039,    rf: 300.8017},
    Spheroid {code: 11, name: "Modified Airy",          a: 6377340.189, b: 6356034.448,    rf: 299.3249646},
    Spheroid {code: 12, name: "WGS 84",                 a: 6378137.0,   b: 6356752.314245, rf: 298.257223653},
    Spheroid {code: 13, name: "SouthEast Asia",         a: 6378155.0,   b: 6356773.3205,   rf: 298.3},
    Spheroid {code: 14, name: "Australian National",    a: 6378160.0,   b: 6356774.719,    rf: 298.25},
    Spheroid {code: 15, name: "Krassovsky",             a: 6378245.0,   b: 6356863.0188,   rf: 298.3},
    Spheroid {code: 16, name: "Hough",                  a: 6378270.0,   b: 6356794.343479, rf: 297.0},
    Spheroid {code: 17, name: "Mercury 1960",           a: 6378166.0,   b: 6356784.283666, rf: 298.3},
    Spheroid {code: 18, name: "Modified Mercury 1968",  a: 6378150.0,   b: 6356768.337303, rf: 298.3},
    Spheroid {code: 19, name: "Sphere of radius 6370997 m", a: 6370997.0, b: 6370997.0,  rf: f64::INFINITY},
];

impl Spheroid {
    /// Predefined spheroid, by GCTP code
    pub fn by_code(code: i32) -> Option<&'static Spheroid> {
        usize::try_from(code).ok().and_then(|i| SPHEROIDS.get(i))
    }

    /// Predefined spheroid, by case insensitive name
    pub fn named(name: &str) -> Option<&'static Spheroid> {
        SPHEROIDS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// The code of the spheroid whose axes match `(a, b)` best,
    /// provided the sum of the absolute axis differences is below 2 cm
    pub fn matching(a: f64, b: f64) -> Option<i32> {
        let mut best: Option<(i32, f64)> = None;
        for s in &SPHEROIDS {
            let delta = (s.a - a).abs() + (s.b - b).abs();
            if best.map_or(true, |(_, d)| delta < d) {
                best = Some((s.code, delta));
            }
        }
        match best {
            Some((code, delta)) if delta < 0.02 => Some(code),
            _ => None,
        }
    }

    /// All spheroids of the table, in code order
    pub fn all() -> &'static [Spheroid] {
        &SPHEROIDS
    }

    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.b
    }

    /// The inverse flattening, infinite for the sphere
    #[must_use]
    pub fn inverse_flattening(&self) -> f64 {
        self.rf
    }
}

/// The GCTP axis selection policy, returning `(r_major, r_minor, radius)`.
///
/// For a non-negative spheroid code, the axes come from the table (codes
/// beyond the table select Clarke 1866) and the radius is that of the
/// standard sphere. For a negative code, the axes are derived from the
/// first two projection parameters:
///
/// - major > 0, minor > 1: the two semiaxes, verbatim
/// - major > 0, 0 < minor <= 1: semimajor axis and eccentricity squared
/// - major > 0, minor = 0: a sphere of the given radius
/// - major = 0, minor > 0: Clarke 1866
/// - major = 0, minor = 0: the standard sphere
pub fn sphdz(isph: i32, parm: &[f64]) -> (f64, f64, f64) {
    let std_radius = STD_RADIUS * 1000.0;

    if isph < 0 {
        let tmaj = parm.first().copied().unwrap_or(0.0).abs();
        let tmin = parm.get(1).copied().unwrap_or(0.0).abs();
        let clarke = &SPHEROIDS[CLARKE1866 as usize];

        let axes = if tmaj > 0.0 {
            if tmin > 1.0 {
                (tmaj, tmin, tmaj)
            } else if tmin > 0.0 {
                (tmaj, (1.0 - tmin).sqrt() * tmaj, tmaj)
            } else {
                (tmaj, tmaj, tmaj)
            }
        } else if tmin > 0.0 {
            (clarke.a, clarke.b, clarke.a)
        } else {
            (std_radius, std_radius, std_radius)
        };
        debug!("sphdz: axes {axes:?} from parameters {tmaj}, {tmin}");
        return axes;
    }

    let jsph = if isph as usize >= MAX_SPHEROIDS {
        debug!("sphdz: spheroid code {isph} out of range, using Clarke 1866");
        CLARKE1866 as usize
    } else {
        isph as usize
    };
    (SPHEROIDS[jsph].a, SPHEROIDS[jsph].b, std_radius)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn table() {
        let wgs84 = Spheroid::by_code(WGS84).unwrap();
        assert_eq!(wgs84.name(), "WGS 84");
        assert_eq!(Spheroid::named("wgs 84"), Some(wgs84));
        assert_eq!(Spheroid::named("Clarke 1866").unwrap().code(), CLARKE1866);
        assert!(Spheroid::named("Bogus").is_none());
        assert!(Spheroid::by_code(-1).is_none());
        assert!(Spheroid::by_code(20).is_none());
        assert_eq!(Spheroid::all().len(), MAX_SPHEROIDS);
        assert!(Spheroid::by_code(SPHERE).unwrap().inverse_flattening().is_infinite());
    }

    #[test]
    fn matching() {
        // GRS 1980 and WGS 84 are told apart by 0.1 mm in b
        assert_eq!(Spheroid::matching(6378137.0, 6356752.31414), Some(GRS1980));
        assert_eq!(Spheroid::matching(6378137.0, 6356752.314245), Some(WGS84));
        assert_eq!(Spheroid::matching(6370997.0, 6370997.0), Some(SPHERE));
        assert_eq!(Spheroid::matching(6378137.0, 6356000.0), None);
    }

    #[test]
    fn axis_selection() {
        // The standard sphere
        assert_eq!(sphdz(-1, &[0., 0.]), (6370997.0, 6370997.0, 6370997.0));

        // Codes beyond the table fall back to Clarke 1866
        let (a, b, r) = sphdz(25, &[]);
        assert_eq!((a, b, r), (6378206.4, 6356583.8, 6370997.0));

        // Table lookup
        assert_eq!(sphdz(WGS84, &[]).0, 6378137.0);

        // Explicit axes, verbatim
        assert_eq!(sphdz(-1, &[6378137.0, 6356752.0]), (6378137.0, 6356752.0, 6378137.0));

        // Eccentricity squared
        let (a, b, r) = sphdz(-1, &[6378137.0, 0.006_694_38]);
        assert_eq!(a, 6378137.0);
        assert_eq!(r, 6378137.0);
        assert_float_eq!(b, 6356752.3, abs <= 0.1);

        // Sphere of given radius
        assert_eq!(sphdz(-1, &[6371000.0, 0.0]), (6371000.0, 6371000.0, 6371000.0));

        // Clarke 1866 when only the minor slot is set
        assert_eq!(sphdz(-1, &[0.0, 0.5]), (6378206.4, 6356583.8, 6378206.4));
    }
}

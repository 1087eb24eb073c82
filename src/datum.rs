//! Geodetic datums: A spheroid plus a three parameter shift
use crate::spheroid::{self, Spheroid, MAX_SPHEROIDS};
use crate::Error;
use log::{debug, warn};
use once_cell::sync::Lazy;

/// Representation of a geodetic datum: semimajor axis, flattening,
/// the derived squared eccentricity, and the shift `(dx, dy, dz)` in
/// meters relative to WGS 84.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    name: String,
    spheroid_name: String,
    axis: f64,
    flat: f64,
    e2: f64,
    shift: [f64; 3],
}

// The standard datums: one for each spheroid of the GCTP table, with
// a zero shift, and named after the spheroid.
static STANDARD_DATUMS: Lazy<Vec<Datum>> = Lazy::new(|| {
    Spheroid::all()
        .iter()
        .map(|s| Datum::from_spheroid(s.name(), s, [0.; 3]))
        .collect()
});

impl Datum {
    /// User defined datum from axis and inverse flattening (infinite
    /// for a sphere)
    pub fn new(name: &str, spheroid_name: &str, axis: f64, inv_flat: f64, shift: [f64; 3]) -> Datum {
        let flat = 1.0 / inv_flat;
        Datum {
            name: name.to_string(),
            spheroid_name: spheroid_name.to_string(),
            axis,
            flat,
            e2: 2.0 * flat - flat * flat,
            shift,
        }
    }

    /// Datum based on one of the spheroids of the GCTP table
    pub fn from_spheroid(name: &str, spheroid: &Spheroid, shift: [f64; 3]) -> Datum {
        Datum::new(
            name,
            spheroid.name(),
            spheroid.semimajor_axis(),
            spheroid.inverse_flattening(),
            shift,
        )
    }

    /// The standard datum of a GCTP spheroid code. Out of range codes
    /// select WGS 84.
    pub fn standard(code: i32) -> &'static Datum {
        let index = usize::try_from(code)
            .ok()
            .filter(|&i| i < MAX_SPHEROIDS)
            .unwrap_or(spheroid::WGS84 as usize);
        &STANDARD_DATUMS[index]
    }

    /// The default datum
    pub fn wgs84() -> &'static Datum {
        Datum::standard(spheroid::WGS84)
    }

    /// The standard datum for a pair of axes, if they match a spheroid
    /// of the table, otherwise a user defined datum
    pub fn from_axes(r_major: f64, r_minor: f64) -> Datum {
        if let Some(code) = Spheroid::matching(r_major, r_minor) {
            return Datum::standard(code).clone();
        }
        let inv_flat = if r_major == r_minor {
            f64::INFINITY
        } else {
            r_major / (r_major - r_minor)
        };
        debug!("Datum: user defined, axes {r_major}, {r_minor}");
        Datum::new("User defined", "User defined", r_major, inv_flat, [0.; 3])
    }

    /// The datum described by ellipsoid metadata: the semimajor axis,
    /// and either the semiminor axis or the inverse flattening, with
    /// axis lengths given in `unit`. Meters and kilometers are accepted.
    pub fn from_metadata(
        major: f64,
        minor: Option<f64>,
        inv_flat: Option<f64>,
        unit: &str,
    ) -> Result<Datum, Error> {
        let scale = match unit.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => 1.0,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => 1000.0,
            _ => {
                warn!("Datum: incompatible axis unit '{unit}'");
                return Err(Error::BadParam("unit".to_string(), unit.to_string()));
            }
        };
        if !(major.is_finite() && major > 0.0) {
            warn!("Datum: bad semimajor axis {major}");
            return Err(Error::BadParam("semi_major_axis".to_string(), major.to_string()));
        }
        let major = major * scale;

        let minor = match (minor, inv_flat) {
            (Some(minor), _) if !minor.is_nan() => minor * scale,
            (_, Some(inv_flat)) if inv_flat.is_infinite() || inv_flat == 0.0 => major,
            (_, Some(inv_flat)) if !inv_flat.is_nan() => major - major / inv_flat,
            _ => {
                warn!("Datum: neither semiminor axis nor inverse flattening given");
                return Err(Error::MissingParam("semi_minor_axis".to_string()));
            }
        };
        Ok(Datum::from_axes(major, minor))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn spheroid_name(&self) -> &str {
        &self.spheroid_name
    }

    /// The semimajor axis, *a*
    #[must_use]
    pub fn axis(&self) -> f64 {
        self.axis
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.axis * (1.0 - self.flat)
    }

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.flat
    }

    /// The squared eccentricity *e² = 2f - f²*, always derived from the
    /// flattening
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    #[must_use]
    pub fn shift(&self) -> [f64; 3] {
        self.shift
    }

    /// Earth centered, earth fixed cartesian coordinates of a point on
    /// the surface, in units of the semimajor axis. Input in degrees.
    pub fn ecf(&self, lat: f64, lon: f64) -> [f64; 3] {
        let re = self.axis;
        let rp = re * (1.0 - self.flat);
        let (sinlat, coslat) = lat.to_radians().sin_cos();
        let (sinlon, coslon) = lon.to_radians().sin_cos();
        let beta = rp * ((re * re) / (rp * rp) * coslat * coslat + sinlat * sinlat).sqrt();
        [
            re * coslat * coslon / beta,
            re * coslat * sinlon / beta,
            rp * rp * sinlat / (re * beta),
        ]
    }

    /// Abridged Molodensky transformation of `(lat, lon)` in degrees from
    /// this datum to `to`. Heights are ignored.
    pub fn molodensky(&self, lat: f64, lon: f64, to: &Datum) -> (f64, f64) {
        let from_a = self.axis;
        let from_f = self.flat;
        let from_esq = self.e2;

        let da = to.axis - self.axis;
        let df = to.flat - self.flat;
        let dx = self.shift[0] - to.shift[0];
        let dy = self.shift[1] - to.shift[1];
        let dz = self.shift[2] - to.shift[2];

        let (slat, clat) = lat.to_radians().sin_cos();
        let (slon, clon) = lon.to_radians().sin_cos();
        let ssqlat = slat * slat;

        let adb = 1.0 / (1.0 - from_f);
        let rn = from_a / (1.0 - from_esq * ssqlat).sqrt();
        let rm = from_a * (1.0 - from_esq) / (1.0 - from_esq * ssqlat).powf(1.5);

        let dlat = ((-dx * slat * clon - dy * slat * slon + dz * clat)
            + da * (rn * from_esq * slat * clat) / from_a
            + df * (rm * adb + rn / adb) * slat * clat)
            / rm;
        let dlon = (-dx * slon + dy * clon) / (rn * clat);

        (lat + dlat.to_degrees(), lon + dlon.to_degrees())
    }
}

impl Default for Datum {
    fn default() -> Datum {
        Datum::wgs84().clone()
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Datum[datumName={},spheroidName={},dx={},dy={},dz={}]",
            self.name, self.spheroid_name, self.shift[0], self.shift[1], self.shift[2]
        )
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn standard_datums() {
        let wgs84 = Datum::wgs84();
        assert_eq!(wgs84.name(), "WGS 84");
        assert_eq!(wgs84.axis(), 6378137.0);
        assert_float_eq!(wgs84.eccentricity_squared(), 0.006_694_379_990_14, abs <= 1e-10);
        assert_float_eq!(wgs84.semiminor_axis(), 6356752.314245, abs <= 1e-3);
        assert_eq!(Datum::standard(99), wgs84);
        assert_eq!(&Datum::default(), wgs84);

        let sphere = Datum::standard(spheroid::SPHERE);
        assert_eq!(sphere.flattening(), 0.0);
        assert_eq!(sphere.eccentricity_squared(), 0.0);
    }

    #[test]
    fn datum_from_axes() {
        assert_eq!(Datum::from_axes(6378206.4, 6356583.8).name(), "Clarke 1866");

        let custom = Datum::from_axes(6400000.0, 6400000.0);
        assert_eq!(custom.name(), "User defined");
        assert_eq!(custom.flattening(), 0.0);

        let custom = Datum::from_axes(6400000.0, 6380000.0);
        assert_float_eq!(custom.flattening(), 20000.0 / 6400000.0, abs <= 1e-15);
    }

    #[test]
    fn metadata() -> Result<(), Error> {
        let wgs84 = Datum::from_metadata(6378137.0, None, Some(298.257223563), "m")?;
        assert_eq!(wgs84.name(), "WGS 84");
        let wgs84 = Datum::from_metadata(6378.137, Some(6356.752314245), None, "km")?;
        assert_eq!(wgs84.name(), "WGS 84");

        let sphere = Datum::from_metadata(6370997.0, None, Some(f64::INFINITY), "meters")?;
        assert_eq!(sphere.name(), "Sphere of radius 6370997 m");

        let custom = Datum::from_metadata(6400.0, Some(f64::NAN), Some(300.0), "Kilometers")?;
        assert_eq!(custom.name(), "User defined");
        assert_float_eq!(custom.axis(), 6400000.0, abs <= 1e-6);
        assert_float_eq!(custom.flattening(), 1.0 / 300.0, abs <= 1e-12);

        assert!(Datum::from_metadata(6378137.0, None, Some(298.0), "feet").is_err());
        assert!(Datum::from_metadata(6378137.0, None, None, "m").is_err());
        assert!(Datum::from_metadata(-1.0, Some(1.0), None, "m").is_err());
        Ok(())
    }

    #[test]
    fn ecf() {
        let wgs84 = Datum::wgs84();
        let [x, y, z] = wgs84.ecf(0.0, 0.0);
        assert_float_eq!(x, 1.0, abs <= 1e-15);
        assert_eq!((y, z), (0.0, 0.0));

        let [x, y, z] = wgs84.ecf(90.0, 0.0);
        assert_float_eq!(x, 0.0, abs <= 1e-15);
        assert_eq!(y, 0.0);
        assert_float_eq!(z, 6356752.314245 / 6378137.0, abs <= 1e-9);
    }

    #[test]
    fn molodensky() {
        // No shift between identical datums
        let wgs84 = Datum::wgs84();
        let (lat, lon) = wgs84.molodensky(55.0, 12.0, wgs84);
        assert_eq!((lat, lon), (55.0, 12.0));

        // ED50 -> WGS84 with the EPSG:1134 shift moves Copenhagen by
        // a few seconds of arc, south and west
        let intl = Spheroid::by_code(spheroid::INTERNATIONAL1909).unwrap();
        let ed50 = Datum::from_spheroid("European 1950", intl, [-87., -98., -121.]);
        let (lat, lon) = ed50.molodensky(55.0, 12.0, wgs84);
        assert!(lat < 55.0 && lat > 55.0 - 10. / 3600.);
        assert!(lon < 12.0 && lon > 12.0 - 10. / 3600.);
    }
}

//! Earth and data (grid) locations
use crate::datum::Datum;
use crate::spheroid::STD_RADIUS;
use std::fmt;
use std::sync::Arc;

// ----- E A R T H   L O C A T I O N -------------------------------------------------

/// A geodetic location: latitude and longitude in degrees, tagged with
/// a datum (WGS 84 when untagged). NaN coordinates mark the location
/// as invalid.
#[derive(Clone, Debug, Default)]
pub struct EarthLocation {
    pub lat: f64,
    pub lon: f64,
    datum: Option<Arc<Datum>>,
}

/// Styles for formatting earth locations as text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatStyle {
    /// Integer degrees, "48 N"
    D,
    /// Degrees with two decimals, "48.50 N"
    DD,
    /// Degrees with four decimals, "48.5000 N"
    DDDD,
    /// Degrees and minutes, "48 30.00 N"
    DDMM,
    /// Degrees, minutes and seconds, `48d30'0.00"N`
    DDMMSS,
    /// The plain floating point value
    Raw,
}

impl EarthLocation {
    /// A location on the default datum. The longitude is brought into
    /// [-180, 180) by a single turn, if needed.
    pub fn new(lat: f64, lon: f64) -> EarthLocation {
        EarthLocation {
            lat,
            lon: lon_range(lon),
            datum: None,
        }
    }

    pub fn with_datum(lat: f64, lon: f64, datum: Arc<Datum>) -> EarthLocation {
        EarthLocation {
            lat,
            lon: lon_range(lon),
            datum: Some(datum),
        }
    }

    /// An invalid location: Both coordinates NaN
    pub fn invalid() -> EarthLocation {
        EarthLocation {
            lat: f64::NAN,
            lon: f64::NAN,
            datum: None,
        }
    }

    pub fn datum(&self) -> &Datum {
        match &self.datum {
            Some(datum) => datum,
            None => Datum::wgs84(),
        }
    }

    pub fn set_coords(&mut self, lat: f64, lon: f64) {
        self.lat = lat;
        self.lon = lon_range(lon);
    }

    pub fn is_valid(&self) -> bool {
        !(self.lat.is_nan() || self.lon.is_nan())
    }

    pub fn mark_invalid(&mut self) {
        self.lat = f64::NAN;
        self.lon = f64::NAN;
    }

    /// The same location, expressed on another datum
    pub fn shift_datum(&self, to: Arc<Datum>) -> EarthLocation {
        let (lat, lon) = self.datum().molodensky(self.lat, self.lon, &to);
        EarthLocation::with_datum(lat, lon, to)
    }

    /// Great circle distance in km, by the haversine formula on the
    /// standard sphere
    pub fn distance_between(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
        let (lat1, lon1) = (lat_a.to_radians(), lon_a.to_radians());
        let (lat2, lon2) = (lat_b.to_radians(), lon_b.to_radians());
        let dlon = lon2 - lon1;
        let dlat = lat2 - lat1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();
        STD_RADIUS * c
    }

    /// Great circle distance in km
    pub fn distance(&self, other: &EarthLocation) -> f64 {
        EarthLocation::distance_between(self.lat, self.lon, other.lat, other.lon)
    }

    /// A new location, offset by the given increments in degrees.
    /// Latitudes beyond a pole continue down the opposite meridian.
    pub fn translate(&self, lat_inc: f64, lon_inc: f64) -> EarthLocation {
        let mut loc = self.clone();
        loc.lat += lat_inc;
        if loc.lat > 90.0 {
            loc.lat = 180.0 - loc.lat;
            loc.lon += 180.0;
        } else if loc.lat < -90.0 {
            loc.lat = -180.0 - loc.lat;
            loc.lon += 180.0;
        }
        loc.lon = lon_range(loc.lon + lon_inc);
        loc
    }

    pub fn is_north(&self, other: &EarthLocation) -> bool {
        self.lat > other.lat
    }

    pub fn is_south(&self, other: &EarthLocation) -> bool {
        self.lat < other.lat
    }

    /// East along the shorter way around. Neither of two antipodal
    /// meridians is east of the other.
    pub fn is_east(&self, other: &EarthLocation) -> bool {
        let abs = (self.lon - other.lon).abs();
        if abs < 180.0 {
            self.lon > other.lon
        } else if abs > 180.0 {
            self.lon < other.lon
        } else {
            false
        }
    }

    /// West along the shorter way around
    pub fn is_west(&self, other: &EarthLocation) -> bool {
        let abs = (self.lon - other.lon).abs();
        if abs < 180.0 {
            self.lon < other.lon
        } else if abs > 180.0 {
            self.lon > other.lon
        } else {
            false
        }
    }

    /// True if the shorter path between the two locations crosses the
    /// antimeridian
    pub fn crosses_antimeridian(&self, other: &EarthLocation) -> bool {
        (self.lon - other.lon).abs() > 180.0
    }

    /// Format one coordinate: latitude if `latitude` is true, longitude
    /// otherwise
    pub fn format_single(deg: f64, style: FormatStyle, latitude: bool) -> String {
        if style == FormatStyle::Raw {
            return deg.to_string();
        }
        let hemisphere = match (latitude, deg < 0.0) {
            (true, true) => "S",
            (true, false) => "N",
            (false, true) => "W",
            (false, false) => "E",
        };
        let deg = deg.abs();
        match style {
            FormatStyle::D => format!("{} {hemisphere}", deg as i32),
            FormatStyle::DD => format!("{deg:.2} {hemisphere}"),
            FormatStyle::DDDD => format!("{deg:.4} {hemisphere}"),
            FormatStyle::DDMM => {
                let dd = deg as i32;
                let mm = (deg - f64::from(dd)) * 60.0;
                format!("{dd} {mm:.2} {hemisphere}")
            }
            FormatStyle::DDMMSS => {
                let dd = deg as i32;
                let mm = ((deg - f64::from(dd)) * 60.0) as i32;
                let ss = (deg - f64::from(dd) - f64::from(mm) / 60.0) * 3600.0;
                format!("{dd}d{mm}'{ss:.2}\"{hemisphere}")
            }
            FormatStyle::Raw => deg.to_string(),
        }
    }

    /// Format as "lat, lon"
    pub fn format(&self, style: FormatStyle) -> String {
        format!(
            "{}, {}",
            EarthLocation::format_single(self.lat, style, true),
            EarthLocation::format_single(self.lon, style, false)
        )
    }
}

impl PartialEq for EarthLocation {
    fn eq(&self, other: &EarthLocation) -> bool {
        self.lat == other.lat && self.lon == other.lon && self.datum() == other.datum()
    }
}

impl fmt::Display for EarthLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(FormatStyle::DDDD))
    }
}

/// Clamp a latitude to [-90, 90]
pub fn lat_range(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

/// Bring a longitude into [-180, 180) by at most one turn
pub fn lon_range(lon: f64) -> f64 {
    if lon < -180.0 {
        lon + 360.0
    } else if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

// ----- D A T A   L O C A T I O N ---------------------------------------------------

/// A location in a 2D data grid: fractional row and column. NaN
/// coordinates mark the location as invalid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataLocation {
    pub row: f64,
    pub col: f64,
}

impl DataLocation {
    pub fn new(row: f64, col: f64) -> DataLocation {
        DataLocation { row, col }
    }

    pub fn invalid() -> DataLocation {
        DataLocation::new(f64::NAN, f64::NAN)
    }

    pub fn is_valid(&self) -> bool {
        !(self.row.is_nan() || self.col.is_nan())
    }

    pub fn mark_invalid(&mut self) {
        *self = DataLocation::invalid();
    }

    /// Nearest grid point, with halves rounded up
    #[must_use]
    pub fn round(&self) -> DataLocation {
        let round = |c: f64| (c + 0.5).floor();
        DataLocation::new(round(self.row), round(self.col))
    }

    #[must_use]
    pub fn floor(&self) -> DataLocation {
        DataLocation::new(self.row.floor(), self.col.floor())
    }

    #[must_use]
    pub fn ceil(&self) -> DataLocation {
        DataLocation::new(self.row.ceil(), self.col.ceil())
    }

    #[must_use]
    pub fn translate(&self, row_inc: f64, col_inc: f64) -> DataLocation {
        DataLocation::new(self.row + row_inc, self.col + col_inc)
    }

    /// True if within `[0, dims - 1]` in both dimensions
    pub fn is_contained(&self, dims: [usize; 2]) -> bool {
        let inside = |c: f64, n: usize| c >= 0.0 && c <= (n as f64 - 1.0);
        inside(self.row, dims[0]) && inside(self.col, dims[1])
    }

    /// Clamp into `[0, dims - 1]` in both dimensions
    #[must_use]
    pub fn truncate(&self, dims: [usize; 2]) -> DataLocation {
        let clamp = |c: f64, n: usize| c.max(0.0).min(n as f64 - 1.0);
        DataLocation::new(clamp(self.row, dims[0]), clamp(self.col, dims[1]))
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spheroid;
    use float_eq::assert_float_eq;

    #[test]
    fn earth_location() {
        let loc = EarthLocation::new(10.0, 200.0);
        assert_eq!(loc.lon, -160.0);
        assert_eq!(EarthLocation::new(10.0, 180.0).lon, -180.0);
        assert_eq!(loc.datum(), Datum::wgs84());

        let grs = Arc::new(Datum::standard(spheroid::GRS1980).clone());
        let loc = EarthLocation::with_datum(10.0, 20.0, grs.clone());
        assert_eq!(loc.datum().name(), "GRS 1980");
        assert_ne!(loc, EarthLocation::new(10.0, 20.0));

        let mut loc = EarthLocation::new(0.0, 0.0);
        assert!(loc.is_valid());
        loc.mark_invalid();
        assert!(!loc.is_valid());
        assert!(!EarthLocation::invalid().is_valid());

        assert_eq!(lat_range(91.0), 90.0);
        assert_eq!(lon_range(-181.0), 179.0);
    }

    #[test]
    fn distance() {
        // A quarter of a great circle
        let d = EarthLocation::new(0.0, 0.0).distance(&EarthLocation::new(0.0, 90.0));
        assert_float_eq!(d, STD_RADIUS * std::f64::consts::FRAC_PI_2, rmax <= 1e-12);

        // One degree of latitude is about 111.2 km
        let d = EarthLocation::distance_between(55.0, 12.0, 56.0, 12.0);
        assert_float_eq!(d, 111.19, abs <= 0.01);
    }

    #[test]
    fn translate() {
        let loc = EarthLocation::new(85.0, 10.0).translate(10.0, 0.0);
        assert_float_eq!(loc.lat, 85.0, abs <= 1e-12);
        assert_float_eq!(loc.lon, -170.0, abs <= 1e-12);

        let loc = EarthLocation::new(-85.0, 175.0).translate(-10.0, 0.0);
        assert_float_eq!(loc.lat, -85.0, abs <= 1e-12);
        assert_float_eq!(loc.lon, -5.0, abs <= 1e-12);

        let loc = EarthLocation::new(0.0, 175.0).translate(1.0, 10.0);
        assert_eq!((loc.lat, loc.lon), (1.0, -175.0));
    }

    #[test]
    fn ordering() {
        let a = EarthLocation::new(0.0, 170.0);
        let b = EarthLocation::new(0.0, -170.0);
        assert!(b.is_east(&a));
        assert!(a.is_west(&b));
        assert!(a.crosses_antimeridian(&b));

        let c = EarthLocation::new(1.0, 10.0);
        let d = EarthLocation::new(0.0, -10.0);
        assert!(c.is_east(&d));
        assert!(c.is_north(&d));
        assert!(d.is_south(&c));
        assert!(!c.crosses_antimeridian(&d));

        // Antipodal meridians are neither east nor west of each other
        let e = EarthLocation::new(0.0, 0.0);
        let f = EarthLocation::new(0.0, -180.0);
        assert!(!e.is_east(&f) && !e.is_west(&f));
    }

    #[test]
    fn formatting() {
        let loc = EarthLocation::new(48.5, -123.25);
        assert_eq!(loc.format(FormatStyle::D), "48 N, 123 W");
        assert_eq!(loc.format(FormatStyle::DD), "48.50 N, 123.25 W");
        assert_eq!(loc.format(FormatStyle::DDDD), "48.5000 N, 123.2500 W");
        assert_eq!(loc.format(FormatStyle::DDMM), "48 30.00 N, 123 15.00 W");
        assert_eq!(loc.format(FormatStyle::DDMMSS), "48d30'0.00\"N, 123d15'0.00\"W");
        assert_eq!(loc.format(FormatStyle::Raw), "48.5, -123.25");
    }

    #[test]
    fn data_location() {
        let dims = [10, 20];
        let loc = DataLocation::new(2.5, -0.25);
        assert_eq!(loc.round(), DataLocation::new(3.0, 0.0));
        assert_eq!(DataLocation::new(-2.5, 0.0).round(), DataLocation::new(-2.0, 0.0));
        assert_eq!(loc.floor(), DataLocation::new(2.0, -1.0));
        assert_eq!(loc.ceil(), DataLocation::new(3.0, 0.0));
        assert!(!loc.is_contained(dims));
        assert!(loc.truncate(dims).is_contained(dims));
        assert_eq!(DataLocation::new(12.0, 25.0).truncate(dims), DataLocation::new(9.0, 19.0));
        assert_eq!(loc.translate(1.0, 1.0), DataLocation::new(3.5, 0.75));
        assert!(!DataLocation::invalid().is_valid());
    }
}

//! Swaths: Data on an irregular grid, geolocated by per-pixel latitude
//! and longitude arrays rather than by a closed form projection.
//!
//! The forward direction interpolates the geolocation arrays. The
//! inverse direction is a search for the data location whose earth
//! location is closest to the target: [`Swath::search`] refines a seed
//! location iteratively along the distance gradient, while
//! [`Swath::closest_exhaustive`] probes a shrinking window and finishes
//! with a full scan of a small neighborhood.
use crate::location::{lon_range, DataLocation, EarthLocation};
use crate::transform::EarthTransform;
use crate::Error;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

mod area;
mod exhaustive;
mod search;

pub use area::CoverageArea;
pub use exhaustive::median;

// ----- G E O L O C A T I O N ---------------------------------------------------------

/// Point-wise access to the geolocation of a swath
pub trait GeolocationSource: fmt::Debug + Send + Sync {
    /// The grid dimensions, `[rows, cols]`
    fn dims(&self) -> [usize; 2];

    /// Latitude in degrees at a grid point, NaN if missing
    fn lat(&self, row: usize, col: usize) -> f64;

    /// Longitude in degrees at a grid point, NaN if missing
    fn lon(&self, row: usize, col: usize) -> f64;
}

/// Geolocation arrays held in memory, in row major order
#[derive(Debug, Clone)]
pub struct GridGeolocation {
    dims: [usize; 2],
    lat: Vec<f64>,
    lon: Vec<f64>,
}

impl GridGeolocation {
    pub fn new(dims: [usize; 2], lat: Vec<f64>, lon: Vec<f64>) -> Result<GridGeolocation, Error> {
        let n = dims[0] * dims[1];
        if lat.len() != n || lon.len() != n {
            warn!(
                "GridGeolocation: {}x{} grid with {} latitudes and {} longitudes",
                dims[0],
                dims[1],
                lat.len(),
                lon.len()
            );
            return Err(Error::BadParam(
                "geolocation arrays".to_string(),
                format!("expected {n} values, got {} and {}", lat.len(), lon.len()),
            ));
        }
        Ok(GridGeolocation { dims, lat, lon })
    }

    /// Geolocation computed from a function of `(row, col)`
    pub fn from_fn<F>(dims: [usize; 2], f: F) -> GridGeolocation
    where
        F: Fn(usize, usize) -> (f64, f64),
    {
        let n = dims[0] * dims[1];
        let mut lat = Vec::with_capacity(n);
        let mut lon = Vec::with_capacity(n);
        for row in 0..dims[0] {
            for col in 0..dims[1] {
                let (la, lo) = f(row, col);
                lat.push(la);
                lon.push(lo);
            }
        }
        GridGeolocation { dims, lat, lon }
    }
}

impl GeolocationSource for GridGeolocation {
    fn dims(&self) -> [usize; 2] {
        self.dims
    }

    fn lat(&self, row: usize, col: usize) -> f64 {
        self.lat[row * self.dims[1] + col]
    }

    fn lon(&self, row: usize, col: usize) -> f64 {
        self.lon[row * self.dims[1] + col]
    }
}

// ----- C O N F I G U R A T I O N -----------------------------------------------------

/// Tuning of the swath searches
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Acceptance distance of the iterative search, as a fraction of the
    /// pixel resolution at the center of the swath
    pub tolerance_factor: f64,
    /// Iteration cap of the iterative search
    pub max_iterations: usize,
    /// Relative change in distance below which the iterative search stops
    pub stagnation: f64,
    /// The finite difference offset shrinks when the distance left falls
    /// below this many offsets
    pub shrink_trigger: f64,
    /// Size of the next exhaustive search window, in multiples of the
    /// current best distance
    pub window_growth: f64,
    /// Rows between scan discontinuities of the sensor
    pub scan_length: usize,
    /// Iteration cap of the window shrinking
    pub exhaustive_iterations: usize,
    /// Random probes per window
    pub samples: usize,
    /// Regular probes per window dimension
    pub grid_points: usize,
    /// Seed of the random probes
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            tolerance_factor: 0.1,
            max_iterations: 100,
            stagnation: 1e-6,
            shrink_trigger: 2.0,
            window_growth: 3.0,
            scan_length: 1,
            exhaustive_iterations: 20,
            samples: 10,
            grid_points: 5,
            seed: 0,
        }
    }
}

/// The result of a search for the data location of an earth location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// A data location within tolerance of the target
    Found(DataLocation),
    /// The target is outside the swath, or the search stalled
    NotFound,
    /// The closest location found is not close enough to be trusted
    Undetermined(DataLocation),
}

impl SearchOutcome {
    /// The data location if found, otherwise an invalid one
    #[must_use]
    pub fn location(&self) -> DataLocation {
        match self {
            SearchOutcome::Found(loc) => *loc,
            _ => DataLocation::invalid(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Per-caller state of a sequence of searches: The last location found,
/// which seeds the next search
#[derive(Debug, Clone, Default)]
pub struct SwathSession {
    hint: Option<DataLocation>,
}

impl SwathSession {
    pub fn new() -> SwathSession {
        SwathSession::default()
    }

    #[must_use]
    pub fn hint(&self) -> Option<DataLocation> {
        self.hint
    }

    pub fn reset(&mut self) {
        self.hint = None;
    }
}

// ----- T H E   S W A T H -------------------------------------------------------------

/// A swath: geolocation arrays plus the precomputed search aids
#[derive(Debug, Clone)]
pub struct Swath {
    source: Arc<dyn GeolocationSource>,
    dims: [usize; 2],
    config: SearchConfig,
    tolerance: f64,
    seeds: Vec<(DataLocation, EarthLocation)>,
    area: CoverageArea,
    north_is_up: bool,
}

impl Swath {
    pub fn new(source: Arc<dyn GeolocationSource>) -> Result<Swath, Error> {
        Swath::with_config(source, SearchConfig::default())
    }

    pub fn with_config(source: Arc<dyn GeolocationSource>, config: SearchConfig) -> Result<Swath, Error> {
        let dims = source.dims();
        if dims[0] < 2 || dims[1] < 2 {
            warn!("Swath: grid of {}x{} is too small", dims[0], dims[1]);
            return Err(Error::BadParam("swath dimensions".to_string(), format!("{dims:?}")));
        }
        let mut swath = Swath {
            source,
            dims,
            config,
            tolerance: 0.0,
            seeds: Vec::new(),
            area: CoverageArea::new(),
            north_is_up: false,
        };

        let center = swath.center();
        if !swath.earth_location(&center).is_valid() {
            warn!("Swath: the data center has no valid earth location");
            return Err(Error::General("swath center has no valid earth location"));
        }
        swath.reset_tolerance();
        swath.north_is_up = swath.north_flag();
        swath.area = CoverageArea::from_transform(&swath);
        debug!(
            "Swath: {}x{}, tolerance {} km, north is up: {}",
            dims[0], dims[1], swath.tolerance, swath.north_is_up
        );
        Ok(swath)
    }

    fn center(&self) -> DataLocation {
        DataLocation::new(
            (self.dims[0] as f64 - 1.0) / 2.0,
            (self.dims[1] as f64 - 1.0) / 2.0,
        )
    }

    /// Recompute the tolerance from the resolution at the center, and
    /// the seed locations
    pub fn reset_tolerance(&mut self) {
        let [rows, cols] = self.resolution(&self.center());
        self.tolerance = rows.min(cols) * self.config.tolerance_factor;
        let col = (self.dims[1] / 2) as f64;
        let rows = self.dims[0] as f64;
        self.seeds = [0.125, 0.375, 0.625, 0.875]
            .iter()
            .map(|f| {
                let loc = DataLocation::new(rows * f, col);
                (loc, self.earth_location(&loc))
            })
            .collect();
    }

    /// True if latitude increases toward the first row, judged from the
    /// first valid latitudes above and below the center
    fn north_flag(&self) -> bool {
        let center = self.center();
        let probe = |step: f64| {
            let mut loc = center.translate(step, 0.0);
            while loc.is_contained(self.dims) {
                let lat = self.earth_location(&loc).lat;
                if !lat.is_nan() {
                    return lat;
                }
                loc = loc.translate(step, 0.0);
            }
            f64::NAN
        };
        probe(-1.0) > probe(1.0)
    }

    /// Override the acceptance distance of the iterative search, in km
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn north_is_up(&self) -> bool {
        self.north_is_up
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn area(&self) -> &CoverageArea {
        &self.area
    }

    /// The geolocation at a grid point
    fn grid_point(&self, row: usize, col: usize) -> EarthLocation {
        let lat = self.source.lat(row, col);
        let lon = self.source.lon(row, col);
        if lat.is_nan() || lon.is_nan() {
            return EarthLocation::invalid();
        }
        EarthLocation::new(lat, lon)
    }
}

impl EarthTransform for Swath {
    fn dims(&self) -> [usize; 2] {
        self.dims
    }

    fn describe(&self) -> &'static str {
        "swath"
    }

    fn is_invertible(&self) -> bool {
        false
    }

    /// Bilinear interpolation between the four surrounding grid points,
    /// with longitudes unwrapped across the antimeridian
    fn earth_location(&self, loc: &DataLocation) -> EarthLocation {
        if !loc.is_contained(self.dims) {
            return EarthLocation::invalid();
        }
        let row = (loc.row.floor() as usize).min(self.dims[0] - 2);
        let col = (loc.col.floor() as usize).min(self.dims[1] - 2);
        let (fr, fc) = (loc.row - row as f64, loc.col - col as f64);

        let corners = [
            (self.grid_point(row, col), (1.0 - fr) * (1.0 - fc)),
            (self.grid_point(row, col + 1), (1.0 - fr) * fc),
            (self.grid_point(row + 1, col), fr * (1.0 - fc)),
            (self.grid_point(row + 1, col + 1), fr * fc),
        ];
        let base = corners[0].0.lon;
        let (mut lat, mut lon) = (0.0, 0.0);
        for (point, weight) in &corners {
            let mut point_lon = point.lon;
            if point_lon - base > 180.0 {
                point_lon -= 360.0;
            } else if point_lon - base < -180.0 {
                point_lon += 360.0;
            }
            lat += weight * point.lat;
            lon += weight * point_lon;
        }
        if lat.is_nan() || lon.is_nan() {
            return EarthLocation::invalid();
        }
        EarthLocation::new(lat, lon_range(lon))
    }

    /// A one-off iterative search, without a hint from earlier searches
    fn data_location_on_datum(&self, loc: &EarthLocation) -> DataLocation {
        self.search(&mut SwathSession::new(), loc).location()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    /// A 200x300 swath, skewed a little in both directions, from 30N 120W
    pub fn skewed() -> Result<Swath, Error> {
        let geo = GridGeolocation::from_fn([200, 300], |row, col| {
            let (r, c) = (row as f64, col as f64);
            (30. - 0.01 * r + 0.001 * c, -120. + 0.012 * c + 0.002 * r)
        });
        Swath::new(Arc::new(geo))
    }

    #[test]
    fn geolocation_arrays() {
        assert!(GridGeolocation::new([2, 2], vec![0.; 4], vec![0.; 4]).is_ok());
        assert!(GridGeolocation::new([2, 2], vec![0.; 4], vec![0.; 3]).is_err());
    }

    #[test]
    fn interpolation() -> Result<(), Error> {
        let swath = skewed()?;
        let loc = swath.earth_location(&DataLocation::new(10., 20.));
        assert_float_eq!(loc.lat, 29.92, abs <= 1e-12);
        assert_float_eq!(loc.lon, -119.74, abs <= 1e-12);
        let loc = swath.earth_location(&DataLocation::new(10.5, 20.25));
        assert_float_eq!(loc.lat, 30. - 0.105 + 0.02025, abs <= 1e-12);
        assert_float_eq!(loc.lon, -120. + 0.243 + 0.021, abs <= 1e-12);
        // The last row and column are reachable
        assert!(swath.earth_location(&DataLocation::new(199., 299.)).is_valid());
        assert!(!swath.earth_location(&DataLocation::new(199.5, 0.)).is_valid());
        Ok(())
    }

    #[test]
    fn antimeridian_interpolation() -> Result<(), Error> {
        let geo = GridGeolocation::from_fn([3, 3], |row, col| {
            (10. - row as f64, lon_range(179. + col as f64))
        });
        let swath = Swath::new(Arc::new(geo))?;
        let loc = swath.earth_location(&DataLocation::new(1., 0.5));
        assert_float_eq!(loc.lon, 179.5, abs <= 1e-12);
        let loc = swath.earth_location(&DataLocation::new(1., 1.5));
        assert_float_eq!(loc.lon, -179.5, abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn construction() -> Result<(), Error> {
        let swath = skewed()?;
        assert!(swath.north_is_up());
        assert!(!swath.is_invertible());
        assert_eq!(swath.describe(), "swath");
        // A tenth of the smaller resolution, about 1.13 km along rows
        assert_float_eq!(swath.tolerance(), 0.1129, abs <= 1e-3);

        let geo = GridGeolocation::from_fn([1, 10], |_, col| (0., col as f64));
        assert!(Swath::new(Arc::new(geo)).is_err());
        let geo = GridGeolocation::from_fn([4, 4], |_, _| (f64::NAN, f64::NAN));
        assert!(Swath::new(Arc::new(geo)).is_err());

        // Flipped upside down
        let geo = GridGeolocation::from_fn([20, 20], |row, col| (row as f64, col as f64));
        assert!(!Swath::new(Arc::new(geo))?.north_is_up());
        Ok(())
    }
}

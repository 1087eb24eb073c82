//! Map projections bound to a data grid: A projection family, a datum,
//! the grid dimensions, and the pair of mutually inverse affine
//! transforms between grid and map coordinates.
use crate::affine::{almost_equal, Affine};
use crate::boundary::BoundaryHandler;
use crate::datum::Datum;
use crate::location::{lon_range, DataLocation, EarthLocation};
use crate::projection::{ParameterReport, ProjectionSystem, ProjectionTransform};
use crate::spheroid::Spheroid;
use crate::transform::EarthTransform;
use crate::Error;
use log::{debug, trace, warn};
use std::sync::Arc;

/// A projection bound to a data grid
#[derive(Debug, Clone)]
pub struct MapProjection {
    projection: Arc<dyn ProjectionTransform>,
    spheroid: i32,
    datum: Arc<Datum>,
    parameters: Vec<f64>,
    dims: [usize; 2],
    grid_to_map: Affine,
    map_to_grid: Affine,
    positive_lon: bool,
}

impl MapProjection {
    /// Bind a projection to a grid of `dims = [rows, cols]`. The affine
    /// takes `(row, col)` to map `(x, y)`, and must be invertible. A
    /// negative spheroid code marks a user defined spheroid, described
    /// by `datum`. The GCTP parameters are stored for reference and
    /// comparison only.
    pub fn new(
        projection: Arc<dyn ProjectionTransform>,
        spheroid: i32,
        datum: Datum,
        parameters: &[f64],
        dims: [usize; 2],
        grid_to_map: Affine,
    ) -> Result<MapProjection, Error> {
        let map_to_grid = grid_to_map.inverse()?;
        let projection = projection.for_grid(&grid_to_map, dims)?.unwrap_or(projection);
        debug!(
            "MapProjection: {} on {} grid {}x{}",
            projection.system(),
            datum.name(),
            dims[0],
            dims[1]
        );
        Ok(MapProjection {
            projection,
            spheroid: spheroid.max(-1),
            datum: Arc::new(datum),
            parameters: parameters.to_vec(),
            dims,
            grid_to_map,
            map_to_grid,
            positive_lon: false,
        })
    }

    /// The same projection and datum, on a new grid
    fn with_grid(&self, dims: [usize; 2], grid_to_map: Affine) -> Result<MapProjection, Error> {
        let map_to_grid = grid_to_map.inverse()?;
        let projection = self
            .projection
            .for_grid(&grid_to_map, dims)?
            .unwrap_or_else(|| self.projection.clone());
        Ok(MapProjection {
            projection,
            dims,
            grid_to_map,
            map_to_grid,
            ..self.clone()
        })
    }

    // ----- G R I D   A N D   E A R T H -----------------------------------------------

    /// The `(lat, lon)` in degrees of a grid location. NaN if the map
    /// coordinates are outside the domain of the inverse projection.
    pub fn grid_to_earth(&self, row: f64, col: f64) -> (f64, f64) {
        let (x, y) = self.grid_to_map.forward(row, col);
        match self.projection.inverse(x, y) {
            Ok((lat, lon)) if self.projection.native_degrees() => (lat, lon_range(lon)),
            Ok((lat, lon)) => (lat.to_degrees(), lon.to_degrees()),
            Err(e) => {
                trace!("MapProjection: ({row}, {col}) has no earth location: {e}");
                (f64::NAN, f64::NAN)
            }
        }
    }

    /// The `(row, col)` of an earth location given in degrees. NaN if the
    /// location cannot be projected.
    pub fn earth_to_grid(&self, lat: f64, lon: f64) -> (f64, f64) {
        let projected = if self.projection.native_degrees() {
            let lon = if self.positive_lon && lon < 0.0 { lon + 360.0 } else { lon };
            self.projection.forward(lat, lon)
        } else {
            self.projection.forward(lat.to_radians(), lon.to_radians())
        };
        match projected {
            Ok((x, y)) => self.map_to_grid.forward(x, y),
            Err(e) => {
                trace!("MapProjection: ({lat}, {lon}) has no grid location: {e}");
                (f64::NAN, f64::NAN)
            }
        }
    }

    // ----- R E - P A R A M E T E R I S I N G -----------------------------------------

    /// A north-up version of the projection, centered on `center`, with
    /// pixels of `pixel_dims = [height, width]` in map units
    pub fn rebase(&self, center: &EarthLocation, pixel_dims: [f64; 2]) -> Result<MapProjection, Error> {
        let (x, y) = if self.projection.native_degrees() {
            self.projection.forward(center.lat, center.lon)?
        } else {
            self.projection
                .forward(center.lat.to_radians(), center.lon.to_radians())?
        };
        let affine = Affine::centered(x, y, pixel_dims, self.dims);
        if affine.inverse().is_err() {
            warn!("MapProjection: degenerate pixel dimensions {pixel_dims:?}");
            return Err(Error::NonInvertible);
        }
        self.with_grid(self.dims, affine)
    }

    /// The sub-grid of `dims` starting at `origin`
    pub fn subset(&self, origin: &DataLocation, dims: [usize; 2]) -> Result<MapProjection, Error> {
        self.with_grid(dims, self.grid_to_map.translated(origin.row, origin.col))
    }

    /// The grid of `length` points, starting at `start`, and taking every
    /// `stride`'th point along each dimension
    pub fn subsample(
        &self,
        start: [usize; 2],
        stride: [usize; 2],
        length: [usize; 2],
    ) -> Result<MapProjection, Error> {
        let affine = self
            .grid_to_map
            .translated(start[0] as f64, start[1] as f64)
            .scaled(stride[0] as f64, stride[1] as f64);
        self.with_grid(length, affine)
    }

    /// A version wrapping negative longitudes to positive before they
    /// reach the affine. Only affects geographic grids.
    #[must_use]
    pub fn with_positive_lon(&self, flag: bool) -> MapProjection {
        MapProjection {
            positive_lon: flag,
            ..self.clone()
        }
    }

    // ----- A C C E S S O R S ---------------------------------------------------------

    #[must_use]
    pub fn system(&self) -> ProjectionSystem {
        self.projection.system()
    }

    #[must_use]
    pub fn zone(&self) -> i32 {
        self.projection.zone()
    }

    /// The GCTP spheroid code, -1 for user defined spheroids
    #[must_use]
    pub fn spheroid(&self) -> i32 {
        self.spheroid
    }

    #[must_use]
    pub fn spheroid_name(&self) -> &str {
        match Spheroid::by_code(self.spheroid) {
            Some(s) => s.name(),
            None => "User defined",
        }
    }

    #[must_use]
    pub fn projection(&self) -> &Arc<dyn ProjectionTransform> {
        &self.projection
    }

    /// The GCTP parameters the projection was created from
    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// The affine from `(row, col)` to map `(x, y)`
    #[must_use]
    pub fn affine(&self) -> Affine {
        self.grid_to_map
    }

    /// The affine from map `(x, y)` to `(row, col)`
    #[must_use]
    pub fn inverse_affine(&self) -> Affine {
        self.map_to_grid
    }

    /// The length of a step of one row, in map units
    #[must_use]
    pub fn pixel_size(&self) -> f64 {
        self.grid_to_map.a.hypot(self.grid_to_map.d)
    }

    /// The pixel `[height, width]` of a north-up grid, in map units
    #[must_use]
    pub fn pixel_dims(&self) -> [f64; 2] {
        [-self.grid_to_map.d, self.grid_to_map.b]
    }

    #[must_use]
    pub fn positive_lon(&self) -> bool {
        self.positive_lon
    }

    /// The construction parameters of the projection family
    #[must_use]
    pub fn parameter_report(&self) -> Vec<ParameterReport> {
        self.projection.describe()
    }
}

impl PartialEq for MapProjection {
    fn eq(&self, other: &Self) -> bool {
        self.system() == other.system()
            && self.zone() == other.zone()
            && almost_equal(&self.parameters, &other.parameters)
            && self.spheroid == other.spheroid
            && self.map_to_grid.almost_eq(&other.map_to_grid)
            && self.grid_to_map.almost_eq(&other.grid_to_map)
    }
}

impl EarthTransform for MapProjection {
    fn dims(&self) -> [usize; 2] {
        self.dims
    }

    fn datum(&self) -> Arc<Datum> {
        self.datum.clone()
    }

    fn describe(&self) -> &'static str {
        "mapped"
    }

    fn earth_location(&self, loc: &DataLocation) -> EarthLocation {
        let (lat, lon) = self.grid_to_earth(loc.row, loc.col);
        if lat.is_nan() || lon.is_nan() {
            return EarthLocation::invalid();
        }
        EarthLocation::with_datum(lat, lon, self.datum.clone())
    }

    fn data_location_on_datum(&self, loc: &EarthLocation) -> DataLocation {
        let (row, col) = self.earth_to_grid(loc.lat, loc.lon);
        DataLocation::new(row, col)
    }

    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        self.projection.boundary_handler()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Geographic, Mercator, Orthographic};
    use float_eq::assert_float_eq;

    fn mercator() -> Result<MapProjection, Error> {
        let p = Mercator::new(6378137.0, 6356752.314245, 0., 0., 0., 0.)?;
        let datum = Datum::standard(crate::spheroid::WGS84).clone();
        let aff = Affine::centered(0., 0., [1000., 1000.], [512, 512]);
        let params = [6378137.0, 6356752.314245, 0., 0., 0., 0.];
        MapProjection::new(Arc::new(p), 12, datum, &params, [512, 512], aff)
    }

    #[test]
    fn grid_and_earth() -> Result<(), Error> {
        let m = mercator()?;
        let (lat, lon) = m.grid_to_earth(255.5, 255.5);
        assert_float_eq!(lat, 0., abs <= 1e-9);
        assert_float_eq!(lon, 0., abs <= 1e-9);

        for (row, col) in [(0.5, 0.5), (100., 400.), (511., 3.)] {
            let (lat, lon) = m.grid_to_earth(row, col);
            let (r, c) = m.earth_to_grid(lat, lon);
            assert_float_eq!(r, row, abs <= 1e-6);
            assert_float_eq!(c, col, abs <= 1e-6);
        }

        // Rows increase southward
        let (north, _) = m.grid_to_earth(0., 255.5);
        let (south, _) = m.grid_to_earth(511., 255.5);
        assert!(north > 0. && south < 0.);

        let loc = m.earth_location(&DataLocation::new(10., 20.));
        assert_eq!(loc.datum().name(), "WGS 84");
        assert_float_eq!(m.pixel_size(), 1000., abs <= 1e-9);
        assert_eq!(m.pixel_dims(), [1000., 1000.]);
        Ok(())
    }

    #[test]
    fn invalid_locations() -> Result<(), Error> {
        let p = Orthographic::new(6370997., 0., 0., 0., 0.)?;
        let aff = Affine::centered(0., 0., [50_000., 50_000.], [512, 512]);
        let datum = Datum::standard(crate::spheroid::SPHERE).clone();
        let m = MapProjection::new(Arc::new(p), 19, datum, &[6370997.], [512, 512], aff)?;
        let (row, col) = m.earth_to_grid(0., 180.);
        assert!(row.is_nan() && col.is_nan());
        let (lat, lon) = m.grid_to_earth(0., 0.);
        assert!(lat.is_nan() && lon.is_nan());
        assert!(!m.earth_location(&DataLocation::new(0., 0.)).is_valid());
        Ok(())
    }

    #[test]
    fn rebase() -> Result<(), Error> {
        let m = mercator()?;
        let center = EarthLocation::new(10., 20.);
        let moved = m.rebase(&center, [2000., 2000.])?;
        let (lat, lon) = moved.grid_to_earth(255.5, 255.5);
        assert_float_eq!(lat, 10., abs <= 1e-9);
        assert_float_eq!(lon, 20., abs <= 1e-9);
        assert_eq!(moved.pixel_dims(), [2000., 2000.]);

        // The original is untouched
        let (lat, _) = m.grid_to_earth(255.5, 255.5);
        assert_float_eq!(lat, 0., abs <= 1e-9);

        assert!(matches!(m.rebase(&center, [0., 1000.]), Err(Error::NonInvertible)));
        Ok(())
    }

    #[test]
    fn subset_and_subsample() -> Result<(), Error> {
        let m = mercator()?;
        let sub = m.subset(&DataLocation::new(100., 200.), [50, 60])?;
        assert_eq!(sub.dims(), [50, 60]);
        assert_eq!(sub.grid_to_earth(0., 0.), m.grid_to_earth(100., 200.));
        assert_eq!(sub.grid_to_earth(5., 7.), m.grid_to_earth(105., 207.));

        let strided = m.subsample([10, 20], [2, 3], [100, 100])?;
        let (lat, lon) = strided.grid_to_earth(4., 5.);
        let (lat2, lon2) = m.grid_to_earth(18., 35.);
        assert_float_eq!(lat, lat2, abs <= 1e-9);
        assert_float_eq!(lon, lon2, abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn equality() -> Result<(), Error> {
        let m = mercator()?;
        assert_eq!(m, m.clone());
        assert_eq!(m, m.subset(&DataLocation::new(0., 0.), [512, 512])?);
        assert_ne!(m, m.subset(&DataLocation::new(1., 0.), [512, 512])?);

        // Tiny relative differences are tolerated
        let nudged = m.rebase(&EarthLocation::new(0., 1e-12), [1000., 1000.])?;
        assert_eq!(m, nudged);
        Ok(())
    }

    #[test]
    fn geographic_grid() -> Result<(), Error> {
        // Half degree grid from 100E to 100W across the antimeridian
        let p = Geographic::new(6378137., 6356752.314245)?;
        let aff = Affine::new(0., 0.5, 100.25, -0.5, 0., 89.75);
        let datum = Datum::wgs84().clone();
        let m = MapProjection::new(Arc::new(p), 12, datum, &[], [360, 320], aff)?;

        let (row, col) = m.earth_to_grid(0., -170.);
        assert_float_eq!(row, 179.5, abs <= 1e-9);
        assert_float_eq!(col, 179.5, abs <= 1e-9);
        let (lat, lon) = m.grid_to_earth(row, col);
        assert_float_eq!(lat, 0., abs <= 1e-9);
        assert_float_eq!(lon, -170., abs <= 1e-9);

        let handler = m.boundary_handler().unwrap();
        assert!(handler.is_boundary_cut(&EarthLocation::new(0., -1.), &EarthLocation::new(0., 1.)));

        // The boundary geometry belongs to the projection, not to the call
        let again = m.boundary_handler().unwrap();
        assert!(std::ptr::eq(handler.splitter(), again.splitter()));
        Ok(())
    }
}

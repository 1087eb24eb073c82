//! The common interface of everything translating between data grid
//! locations and earth locations: map projections, sensor scan views
//! and swaths.
use crate::boundary::BoundaryHandler;
use crate::datum::Datum;
use crate::location::{DataLocation, EarthLocation};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

static WGS84: Lazy<Arc<Datum>> = Lazy::new(|| Arc::new(Datum::wgs84().clone()));

/// The shared WGS 84 datum
pub fn wgs84() -> Arc<Datum> {
    WGS84.clone()
}

/// Translation between `(row, col)` data locations in a grid of fixed
/// dimensions, and `(lat, lon)` earth locations. Failures are reported
/// as invalid (NaN) locations, so full grids can be transformed without
/// aborting on the points outside the domain.
pub trait EarthTransform: fmt::Debug + Send + Sync {
    /// The grid dimensions, `[rows, cols]`
    fn dims(&self) -> [usize; 2];

    /// The datum of the earth locations produced
    fn datum(&self) -> Arc<Datum> {
        wgs84()
    }

    /// A short description of the kind of transform: "mapped", "swath"...
    fn describe(&self) -> &'static str;

    /// True if earth locations can be converted to data locations
    fn is_invertible(&self) -> bool {
        true
    }

    /// The earth location of a data location, on [`Self::datum`]
    fn earth_location(&self, loc: &DataLocation) -> EarthLocation;

    /// The data location of an earth location already expressed on
    /// [`Self::datum`]
    fn data_location_on_datum(&self, loc: &EarthLocation) -> DataLocation;

    /// The data location of an earth location, shifting it to the datum
    /// of the transform first if needed
    fn data_location(&self, loc: &EarthLocation) -> DataLocation {
        let datum = self.datum();
        if loc.datum() == &*datum {
            return self.data_location_on_datum(loc);
        }
        self.data_location_on_datum(&loc.shift_datum(datum))
    }

    /// The grid point closest to an earth location: The data location,
    /// rounded, and invalid if outside the grid
    fn closest(&self, loc: &EarthLocation) -> DataLocation {
        let closest = self.data_location(loc).round();
        if closest.is_contained(self.dims()) {
            closest
        } else {
            DataLocation::invalid()
        }
    }

    /// The great circle distance in km between two data locations
    fn distance(&self, a: &DataLocation, b: &DataLocation) -> f64 {
        self.earth_location(a).distance(&self.earth_location(b))
    }

    /// The size in km of a pixel at a data location, along the row and
    /// the column dimension, measured across the pixel
    fn resolution(&self, loc: &DataLocation) -> [f64; 2] {
        let rows = self.distance(&loc.translate(-0.5, 0.0), &loc.translate(0.5, 0.0));
        let cols = self.distance(&loc.translate(0.0, -0.5), &loc.translate(0.0, 0.5));
        [rows, cols]
    }

    /// The handler for the discontinuities of the transform, if any
    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        None
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    /// One degree per pixel, north-up, from (0, 0) at the upper left
    #[derive(Debug)]
    struct Degrees;

    impl EarthTransform for Degrees {
        fn dims(&self) -> [usize; 2] {
            [10, 20]
        }

        fn describe(&self) -> &'static str {
            "degrees"
        }

        fn earth_location(&self, loc: &DataLocation) -> EarthLocation {
            EarthLocation::new(-loc.row, loc.col)
        }

        fn data_location_on_datum(&self, loc: &EarthLocation) -> DataLocation {
            DataLocation::new(-loc.lat, loc.lon)
        }
    }

    #[test]
    fn closest() {
        let t = Degrees;
        let loc = t.closest(&EarthLocation::new(-2.4, 3.5));
        assert_eq!(loc, DataLocation::new(2., 4.));
        assert!(!t.closest(&EarthLocation::new(2., 3.)).is_valid());
        assert!(!t.closest(&EarthLocation::new(-2., 19.6)).is_valid());
    }

    #[test]
    fn resolution() {
        let t = Degrees;
        let [rows, cols] = t.resolution(&DataLocation::new(0., 5.));
        // One degree of arc on the standard sphere
        assert_float_eq!(rows, 111.19, abs <= 0.01);
        assert_float_eq!(cols, 111.19, abs <= 0.01);
        let d = t.distance(&DataLocation::new(0., 0.), &DataLocation::new(0., 2.));
        assert_float_eq!(d, 2. * 111.195, abs <= 0.01);
    }

    #[test]
    fn datum_shift() {
        let t = Degrees;
        let nad27 = Arc::new(Datum::standard(crate::spheroid::CLARKE1866).clone());
        let loc = EarthLocation::with_datum(-5., 5., nad27);
        // Same spheroid center, different shape: a small shift
        let shifted = t.data_location(&loc);
        assert!((shifted.row - 5.).abs() < 0.01);
        assert!(shifted.row != 5.);
    }
}

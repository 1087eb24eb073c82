//! The geographic "projection": map coordinates are longitude and
//! latitude in degrees, with longitudes wrapped to suit the grid
use crate::authoring::*;
use crate::boundary::{meridian_strip, union_all, BoundaryHandler, CutTest};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Half width, in degrees, of the meridian strips of the splitter
const BOUNDARY_NUDGE: f64 = 1e-10;

/// How the longitudes of a grid relate to the prime meridian and the
/// antimeridian, which decides the continuous range that longitudes are
/// wrapped into before they reach the affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeRange {
    /// Within [-180, 180]: longitudes are used as is
    SpansPrime,
    /// Within [0, 360]: longitudes wrapped to [0, 360)
    SpansAntiPositive,
    /// Within [-360, 0]: longitudes wrapped to [-360, 0)
    SpansAntiNegative,
    /// From `alpha` <= 0 to past 180: wrapped to [alpha, alpha + 360)
    SpansPrimeAntiPositive { alpha: f64 },
    /// From below -180 to `alpha` >= 0: wrapped to [alpha - 360, alpha)
    SpansPrimeAntiNegative { alpha: f64 },
}

impl LongitudeRange {
    /// Classify the longitude extent `[min_lon, max_lon]` of a grid
    pub fn classify(min_lon: f64, mut max_lon: f64) -> Result<LongitudeRange, Error> {
        if max_lon - min_lon > 360.0 {
            max_lon = min_lon + 360.0;
        }
        debug!("Geographic: longitude extent [{min_lon}, {max_lon}]");
        let within = |v: f64, lo: f64, hi: f64| v >= lo && v <= hi;

        let range = if within(min_lon, -180., 180.) && within(max_lon, -180., 180.) {
            LongitudeRange::SpansPrime
        } else if within(min_lon, 0., 180.) && within(max_lon, 180., 360.) {
            LongitudeRange::SpansAntiPositive
        } else if within(min_lon, -360., -180.) && within(max_lon, -180., 0.) {
            LongitudeRange::SpansAntiNegative
        } else if min_lon <= 0.0 && max_lon >= 180.0 {
            LongitudeRange::SpansPrimeAntiPositive { alpha: min_lon }
        } else if min_lon <= -180.0 && max_lon >= 0.0 {
            LongitudeRange::SpansPrimeAntiNegative { alpha: max_lon }
        } else {
            warn!("Geographic: unsupported longitude extent [{min_lon}, {max_lon}]");
            return Err(Error::Unsupported(format!(
                "geographic longitude extent [{min_lon}, {max_lon}]"
            )));
        };
        debug!("Geographic: longitude range type is {range:?}");
        Ok(range)
    }

    /// Bring a longitude in [-180, 180) into the range
    #[must_use]
    pub fn wrap(self, lon: f64) -> f64 {
        match self {
            LongitudeRange::SpansPrime => lon,
            LongitudeRange::SpansAntiPositive if lon < 0.0 => lon + 360.0,
            LongitudeRange::SpansAntiNegative if lon >= 0.0 => lon - 360.0,
            LongitudeRange::SpansPrimeAntiPositive { alpha } if lon < alpha => lon + 360.0,
            LongitudeRange::SpansPrimeAntiNegative { alpha } if lon >= alpha => lon - 360.0,
            _ => lon,
        }
    }

    /// The longitude where the wrapped range is discontinuous
    #[must_use]
    pub fn boundary(self) -> f64 {
        match self {
            LongitudeRange::SpansPrime => 180.0,
            LongitudeRange::SpansAntiPositive | LongitudeRange::SpansAntiNegative => 0.0,
            LongitudeRange::SpansPrimeAntiPositive { alpha }
            | LongitudeRange::SpansPrimeAntiNegative { alpha } => alpha,
        }
    }

    /// True if the segment from `a` to `b`, taken the shorter way
    /// around, crosses the discontinuity
    pub fn is_cut(self, a: &EarthLocation, b: &EarthLocation) -> bool {
        let (east, west) = if a.is_east(b) { (a, b) } else { (b, a) };
        match self {
            LongitudeRange::SpansPrime => west.lon > east.lon,
            LongitudeRange::SpansAntiPositive | LongitudeRange::SpansAntiNegative => {
                west.lon < 0.0 && east.lon >= 0.0
            }
            LongitudeRange::SpansPrimeAntiPositive { alpha }
            | LongitudeRange::SpansPrimeAntiNegative { alpha } => west.lon < alpha && east.lon >= alpha,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geographic {
    r_major: f64,
    r_minor: f64,
    range: LongitudeRange,
    boundary: OnceCell<BoundaryHandler>,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl Geographic {
    /// Geographic coordinates on the ellipsoid of the given axes, with
    /// longitudes in [-180, 180)
    pub fn new(r_major: f64, r_minor: f64) -> Result<Self, Error> {
        Ok(Geographic {
            r_major,
            r_minor,
            range: LongitudeRange::SpansPrime,
            boundary: OnceCell::new(),
        })
    }

    /// Geographic coordinates with an explicit longitude range
    #[must_use]
    pub fn with_range(&self, range: LongitudeRange) -> Geographic {
        Geographic {
            r_major: self.r_major,
            r_minor: self.r_minor,
            range,
            boundary: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn range(&self) -> LongitudeRange {
        self.range
    }
}

impl ProjectionTransform for Geographic {
    fn system(&self) -> ProjectionSystem {
        ProjectionSystem::Geographic
    }

    fn native_degrees(&self) -> bool {
        true
    }

    // ----- F O R W A R D -------------------------------------------------------------

    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError> {
        Ok((self.range.wrap(lon), lat))
    }

    // ----- I N V E R S E -------------------------------------------------------------

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        Ok((y, x))
    }

    fn describe(&self) -> Vec<ParameterReport> {
        crate::projection::Report::new()
            .axes(self.r_major, self.r_minor)
            .value("Longitude Range Boundary", self.range.boundary(), Unit::Degrees)
            .build()
    }

    /// Classify the longitudes covered by the outer edges of the grid
    fn for_grid(
        &self,
        grid_to_map: &Affine,
        dims: [usize; 2],
    ) -> Result<Option<Arc<dyn ProjectionTransform>>, Error> {
        let range = if *grid_to_map == Affine::identity() {
            LongitudeRange::SpansPrime
        } else {
            let (start, _) = grid_to_map.forward(-0.5, -0.5);
            let (end, _) = grid_to_map.forward(dims[0] as f64 - 0.5, dims[1] as f64 - 0.5);
            LongitudeRange::classify(start.min(end), start.max(end))?
        };
        Ok(Some(Arc::new(self.with_range(range))))
    }

    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        let handler = self.boundary.get_or_init(|| {
            let range = self.range;
            let boundary = range.boundary();
            let splitter = union_all(vec![
                meridian_strip(boundary, BOUNDARY_NUDGE),
                meridian_strip(boundary + 360.0, BOUNDARY_NUDGE),
            ]);
            let cut: CutTest = Arc::new(move |a, b| range.is_cut(a, b));
            BoundaryHandler::with_splitter(cut, splitter)
        });
        Some(handler.clone())
    }
}

// ----- T E S T S ---------------------------------------------------------------------

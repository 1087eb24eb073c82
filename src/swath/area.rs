//! The earth coverage of a swath, as a set of one degree squares
use crate::location::{DataLocation, EarthLocation};
use crate::transform::EarthTransform;
use log::debug;

const SQUARES: usize = 360 * 180;

/// Interior samples taken along each grid dimension
const INTERIOR_SAMPLES: usize = 256;

/// A set of one degree squares, indexed by the integer latitude and
/// longitude of their south west corner
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageArea {
    bits: Vec<bool>,
}

impl Default for CoverageArea {
    fn default() -> Self {
        CoverageArea::new()
    }
}

impl CoverageArea {
    /// An empty area
    pub fn new() -> CoverageArea {
        CoverageArea {
            bits: vec![false; SQUARES],
        }
    }

    /// The squares touched by the earth locations of a transform: every
    /// point along the four edges of the grid, and a regular sample of
    /// the interior, then expanded by one square all around.
    pub fn from_transform(transform: &dyn EarthTransform) -> CoverageArea {
        let mut area = CoverageArea::new();
        let [rows, cols] = transform.dims();
        let mut add = |row: usize, col: usize| {
            let loc = DataLocation::new(row as f64, col as f64);
            area.add(&transform.earth_location(&loc));
        };

        for row in 0..rows {
            add(row, 0);
            add(row, cols - 1);
        }
        for col in 0..cols {
            add(0, col);
            add(rows - 1, col);
        }
        let row_step = (rows / INTERIOR_SAMPLES).max(1);
        let col_step = (cols / INTERIOR_SAMPLES).max(1);
        for row in (0..rows).step_by(row_step) {
            for col in (0..cols).step_by(col_step) {
                add(row, col);
            }
        }

        area.expand();
        debug!("CoverageArea: {} squares", area.len());
        area
    }

    /// The index of the square at integer `(lat, lon)`
    fn index(lat: i64, lon: i64) -> Option<usize> {
        if !(-90..=89).contains(&lat) || !(-180..=179).contains(&lon) {
            return None;
        }
        usize::try_from((lat + 90) * 360 + (lon + 180)).ok()
    }

    /// The index of the square containing a location. The north pole
    /// belongs to the squares just below it.
    fn index_of(loc: &EarthLocation) -> Option<usize> {
        if !loc.is_valid() {
            return None;
        }
        let lat = (loc.lat.floor() as i64).min(89);
        CoverageArea::index(lat, loc.lon.floor() as i64)
    }

    /// The integer `(lat, lon)` of the south west corner of a square
    fn square(index: usize) -> (i64, i64) {
        let index = index as i64;
        (index / 360 - 90, index % 360 - 180)
    }

    pub fn add(&mut self, loc: &EarthLocation) {
        if let Some(i) = CoverageArea::index_of(loc) {
            self.bits[i] = true;
        }
    }

    pub fn remove(&mut self, loc: &EarthLocation) {
        if let Some(i) = CoverageArea::index_of(loc) {
            self.bits[i] = false;
        }
    }

    pub fn contains(&self, loc: &EarthLocation) -> bool {
        CoverageArea::index_of(loc).is_some_and(|i| self.bits[i])
    }

    /// Add the eight neighbors of every square in the area
    pub fn expand(&mut self) {
        let base: Vec<usize> = self.squares().collect();
        for i in base {
            let (lat, lon) = CoverageArea::square(i);
            let center = EarthLocation::new(lat as f64 + 0.5, lon as f64 + 0.5);
            for dlat in [-1.0, 0.0, 1.0] {
                for dlon in [-1.0, 0.0, 1.0] {
                    self.add(&center.translate(dlat, dlon));
                }
            }
        }
    }

    /// The squares in the area, by index
    fn squares(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| i)
    }

    /// The `[north, south, east, west]` integer bounds of the squares in
    /// the area, or `None` if empty
    pub fn extremes(&self) -> Option<[i64; 4]> {
        let mut squares = self.squares().map(CoverageArea::square);
        let (lat, lon) = squares.next()?;
        let mut extremes = [lat, lat, lon, lon];
        for (lat, lon) in squares {
            extremes[0] = extremes[0].max(lat);
            extremes[1] = extremes[1].min(lat);
            extremes[2] = extremes[2].max(lon);
            extremes[3] = extremes[3].min(lon);
        }
        Some(extremes)
    }

    pub fn len(&self) -> usize {
        self.squares().count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swath::tests::skewed;
    use crate::Error;

    #[test]
    fn squares() {
        let mut area = CoverageArea::new();
        assert!(area.is_empty());
        area.add(&EarthLocation::new(10.5, -20.5));
        area.add(&EarthLocation::new(90., 0.));
        area.add(&EarthLocation::invalid());
        assert_eq!(area.len(), 2);
        assert!(area.contains(&EarthLocation::new(10.9, -20.1)));
        assert!(area.contains(&EarthLocation::new(89.5, 0.5)));
        assert!(!area.contains(&EarthLocation::new(11., -20.1)));

        area.remove(&EarthLocation::new(89.2, 0.2));
        area.expand();
        assert_eq!(area.len(), 9);
        assert_eq!(area.extremes(), Some([11, 9, -20, -22]));
        assert_eq!(CoverageArea::new().extremes(), None);
    }

    #[test]
    fn swath_coverage() -> Result<(), Error> {
        // Spans 28.0N..30.3N, 120W..116W, plus the one square margin
        let swath = skewed()?;
        let area = swath.area();
        assert_eq!(area.extremes(), Some([31, 27, -116, -121]));
        assert!(area.contains(&EarthLocation::new(29., -118.)));
        assert!(!area.contains(&EarthLocation::new(0., 0.)));
        assert!(!area.contains(&EarthLocation::new(29., -110.)));
        Ok(())
    }
}

//! Windowed exhaustive search: Probe a window of the grid, shrink it
//! around the best probe according to the local resolution, and finish
//! with a full scan of a small neighborhood.
use super::{SearchOutcome, Swath};
use crate::location::{DataLocation, EarthLocation};
use crate::transform::EarthTransform;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The median of a set of values, NaN if empty. Sorts the values.
pub fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n == 0 {
        f64::NAN
    } else if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    }
}

/// Nearest integer, with halves rounded up
fn round(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Inclusive bounds of a search window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    min_row: i64,
    max_row: i64,
    min_col: i64,
    max_col: i64,
}

impl Window {
    fn size(&self) -> i64 {
        (self.max_row - self.min_row + 1).max(self.max_col - self.min_col + 1)
    }
}

/// The smaller of two resolution estimates, ignoring a missing one
fn combine(median: f64, window: f64) -> f64 {
    if window.is_nan() {
        median
    } else if median.is_nan() {
        window
    } else {
        median.min(window)
    }
}

impl Swath {
    /// The median resolution, in km per pixel along rows and along
    /// columns, of the 3x3 neighborhood of a data location
    fn median_resolution(&self, loc: &DataLocation) -> [f64; 2] {
        let start = loc.translate(-1.0, -1.0).truncate(self.dims);
        let end = loc.translate(1.0, 1.0).truncate(self.dims);
        let mut rows = Vec::with_capacity(9);
        let mut cols = Vec::with_capacity(9);
        for row in round(start.row)..=round(end.row) {
            for col in round(start.col)..=round(end.col) {
                let [r, c] = self.resolution(&DataLocation::new(row as f64, col as f64));
                if r.is_finite() {
                    rows.push(r);
                }
                if c.is_finite() {
                    cols.push(c);
                }
            }
        }
        [median(&mut rows), median(&mut cols)]
    }

    /// The resolution along one dimension, measured between the grid
    /// points `radius` pixels to either side of `loc`
    fn window_resolution(&self, loc: &DataLocation, radius: f64, along_rows: bool) -> f64 {
        if radius.is_nan() {
            return f64::NAN;
        }
        let (dr, dc) = if along_rows { (radius, 0.0) } else { (0.0, radius) };
        let a = loc.translate(-dr, -dc).truncate(self.dims).round();
        let b = loc.translate(dr, dc).truncate(self.dims).round();
        let span = if along_rows { b.row - a.row } else { b.col - a.col };
        self.distance(&a, &b) / span
    }

    /// Closest grid point to `target` by probing a shrinking window.
    ///
    /// A location is only `Found` if the final full scan gets within the
    /// smaller of the row and column resolutions. Between the smaller
    /// and the larger, or beyond the larger, the result is
    /// `Undetermined`. If the window stops shrinking, or the resolution
    /// cannot be estimated, the target is `NotFound`.
    pub fn closest_exhaustive(&self, target: &EarthLocation) -> SearchOutcome {
        let [rows, cols] = self.dims;
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let search_size = (config.scan_length as i64 * 3).max(10);

        let mut window = Window {
            min_row: 0,
            max_row: rows as i64 - 1,
            min_col: 0,
            max_col: cols as i64 - 1,
        };
        let mut history = vec![window];
        let mut best = DataLocation::new((rows / 2) as f64, (cols / 2) as f64);
        let mut target_res = [f64::NAN; 2];
        let mut iterations = 0;

        while window.size() > search_size && iterations < config.exhaustive_iterations {
            let row_span = (window.max_row - window.min_row) as f64;
            let col_span = (window.max_col - window.min_col) as f64;

            // Random probes, and a regular grid without its center
            let mut probes = Vec::with_capacity(config.samples + config.grid_points.pow(2));
            for _ in 0..config.samples {
                probes.push((
                    window.min_row + round(rng.gen::<f64>() * row_span),
                    window.min_col + round(rng.gen::<f64>() * col_span),
                ));
            }
            let n = config.grid_points;
            let spacing = 1.0 / (n + 1) as f64;
            for i in 0..n {
                for j in 0..n {
                    if i == n / 2 && j == n / 2 {
                        continue;
                    }
                    probes.push((
                        window.min_row + round((i + 1) as f64 * spacing * row_span),
                        window.min_col + round((j + 1) as f64 * spacing * col_span),
                    ));
                }
            }
            let mut min_distance = f64::MAX;
            for (row, col) in probes {
                let loc = DataLocation::new(row as f64, col as f64);
                let d = target.distance(&self.earth_location(&loc));
                if d < min_distance {
                    min_distance = d;
                    best = loc;
                }
            }

            let [median_row, median_col] = self.median_resolution(&best);
            let row_res = combine(
                median_row,
                self.window_resolution(&best, min_distance / median_row, true),
            );
            let col_res = combine(
                median_col,
                self.window_resolution(&best, min_distance / median_col, false),
            );
            if row_res.is_nan() || col_res.is_nan() {
                trace!("Swath: no resolution estimate at {best}");
                return SearchOutcome::NotFound;
            }

            let row_span = min_distance / row_res * config.window_growth;
            let col_span = min_distance / col_res * config.window_growth;
            let start = best.translate(-row_span / 2.0, -col_span / 2.0).truncate(self.dims).round();
            let end = best.translate(row_span / 2.0, col_span / 2.0).truncate(self.dims).round();
            window = Window {
                min_row: window.min_row.max(start.row as i64),
                max_row: window.max_row.min(end.row as i64),
                min_col: window.min_col.max(start.col as i64),
                max_col: window.max_col.min(end.col as i64),
            };

            // A window equal to the one two iterations back has stalled
            history.push(window);
            if history.len() == 3 {
                if history[0] == history[2] {
                    trace!("Swath: search window stalled at {window:?}");
                    return SearchOutcome::NotFound;
                }
                history.remove(0);
            }

            iterations += 1;
            trace!(
                "Swath: iteration {iterations}, best {best} at {min_distance} km, window {window:?}"
            );
            target_res = [median_row, median_col];
        }

        // Full scan of the neighborhood
        let half = (search_size / 2) as f64;
        let start = best.translate(-half, -half).truncate(self.dims).round();
        let end = best.translate(half, half).truncate(self.dims).round();
        let mut min_distance = f64::MAX;
        for row in start.row as i64..=end.row as i64 {
            for col in start.col as i64..=end.col as i64 {
                let loc = DataLocation::new(row as f64, col as f64);
                let d = target.distance(&self.earth_location(&loc));
                if d < min_distance {
                    min_distance = d;
                    best = loc;
                }
            }
        }

        // Small grids are scanned without any window iterations
        if iterations == 0 {
            target_res = self.median_resolution(&best);
        }
        let [row_res, col_res] = target_res;
        if min_distance > row_res.max(col_res) {
            trace!("Swath: {target:?} is {min_distance} km from {best}, beyond both resolutions");
            SearchOutcome::Undetermined(best)
        } else if min_distance > row_res.min(col_res) {
            trace!("Swath: {target:?} is {min_distance} km from {best}, undetermined");
            SearchOutcome::Undetermined(best)
        } else {
            SearchOutcome::Found(best)
        }
    }

    /// Closest grid point to `target`, by computing the distance to every
    /// grid point
    pub fn closest_by_search(&self, target: &EarthLocation) -> DataLocation {
        let mut min_distance = f64::MAX;
        let mut closest = DataLocation::invalid();
        for row in 0..self.dims[0] {
            for col in 0..self.dims[1] {
                let loc = DataLocation::new(row as f64, col as f64);
                let d = target.distance(&self.earth_location(&loc));
                if d < min_distance {
                    min_distance = d;
                    closest = loc;
                }
            }
        }
        closest
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swath::tests::skewed;
    use crate::swath::{GridGeolocation, SearchConfig};
    use crate::Error;
    use std::sync::Arc;

    #[test]
    fn medians() {
        assert!(median(&mut []).is_nan());
        assert_eq!(median(&mut [3., 1., 2.]), 2.);
        assert_eq!(median(&mut [4., 1., 3., 2.]), 2.5);
        assert_eq!(median(&mut [7.]), 7.);
    }

    #[test]
    fn grid_points() -> Result<(), Error> {
        let base = skewed()?;
        for seed in 0..5 {
            let config = SearchConfig {
                seed,
                ..SearchConfig::default()
            };
            let swath = Swath::with_config(base.source.clone(), config)?;
            for (row, col) in [(57., 123.), (180., 10.)] {
                let loc = DataLocation::new(row, col);
                let target = swath.earth_location(&loc);
                assert_eq!(swath.closest_exhaustive(&target), SearchOutcome::Found(loc));
            }

            // Between grid points: the nearest one
            let target = swath.earth_location(&DataLocation::new(57.3, 123.8));
            let nearest = DataLocation::new(57., 124.);
            assert_eq!(swath.closest_exhaustive(&target), SearchOutcome::Found(nearest));
            assert_eq!(swath.closest_by_search(&target), nearest);
        }
        Ok(())
    }

    #[test]
    fn acceptance_tiers() -> Result<(), Error> {
        let swath = skewed()?;
        let edge_loc = DataLocation::new(0., 150.);
        let edge = swath.earth_location(&edge_loc);

        // Within the smaller resolution (about 1.13 km)
        let near = EarthLocation::new(edge.lat + 0.005, edge.lon);
        assert_eq!(swath.closest_exhaustive(&near), SearchOutcome::Found(edge_loc));

        // Between the row and the column resolution
        let between = EarthLocation::new(edge.lat + 0.01034, edge.lon);
        assert_eq!(swath.closest_exhaustive(&between), SearchOutcome::Undetermined(edge_loc));

        // Beyond both
        let beyond = EarthLocation::new(edge.lat + 0.02, edge.lon);
        assert_eq!(swath.closest_exhaustive(&beyond), SearchOutcome::Undetermined(edge_loc));
        assert!(!swath.closest_exhaustive(&beyond).location().is_valid());

        // Nowhere near: the window never shrinks
        let far = EarthLocation::new(0., 0.);
        assert_eq!(swath.closest_exhaustive(&far), SearchOutcome::NotFound);
        Ok(())
    }

    #[test]
    fn small_grid() -> Result<(), Error> {
        let geo = GridGeolocation::from_fn([8, 8], |row, col| {
            (45. - 0.01 * row as f64, 10. + 0.01 * col as f64)
        });
        let swath = Swath::new(Arc::new(geo))?;
        let loc = DataLocation::new(3., 6.);
        let target = swath.earth_location(&loc);
        assert_eq!(swath.closest_exhaustive(&target), SearchOutcome::Found(loc));
        assert_eq!(swath.closest_by_search(&target), loc);
        Ok(())
    }
}

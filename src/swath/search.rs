//! Iterative search: Descend the distance to the target from the best
//! seed, stepping by the remaining distance over the local resolution
use super::{SearchOutcome, Swath, SwathSession};
use crate::location::{DataLocation, EarthLocation};
use crate::transform::EarthTransform;
use log::trace;

impl Swath {
    /// The data location closest to `target`, seeded from the last
    /// location found in the session. A success updates the session
    /// hint, a failure clears it.
    pub fn search(&self, session: &mut SwathSession, target: &EarthLocation) -> SearchOutcome {
        if !self.area.contains(target) {
            trace!("Swath: {target:?} is outside the coverage area");
            session.hint = None;
            return SearchOutcome::NotFound;
        }

        // Start from the closest of the hint and the seeds
        let mut start = None;
        let mut d = f64::MAX;
        if let Some(hint) = session.hint {
            d = target.distance(&self.earth_location(&hint));
            start = Some(hint);
        }
        for (loc, earth) in &self.seeds {
            let seed_distance = target.distance(earth);
            if seed_distance < d || start.is_none() {
                d = seed_distance;
                start = Some(*loc);
            }
        }
        let Some(mut current) = start else {
            return SearchOutcome::NotFound;
        };

        let dims = self.dims;
        let config = &self.config;
        let mut last = d;
        let mut inc = [0.5, 0.5];
        let mut iterations = 0;
        while d > self.tolerance && iterations < config.max_iterations {
            let x1 = current.translate(-inc[0], 0.0).truncate(dims);
            let x2 = current.translate(inc[0], 0.0).truncate(dims);
            let y1 = current.translate(0.0, -inc[1]).truncate(dims);
            let y2 = current.translate(0.0, inc[1]).truncate(dims);
            let (x1_earth, x2_earth) = (self.earth_location(&x1), self.earth_location(&x2));
            let (y1_earth, y2_earth) = (self.earth_location(&y1), self.earth_location(&y2));

            let dx = x2.row - x1.row;
            let dy = y2.col - y1.col;
            let res = [x1_earth.distance(&x2_earth) / dx, y1_earth.distance(&y2_earth) / dy];
            let mut grad = [
                (target.distance(&x2_earth) - target.distance(&x1_earth)) / dx,
                (target.distance(&y2_earth) - target.distance(&y1_earth)) / dy,
            ];
            let magnitude = grad[0].hypot(grad[1]);
            grad[0] /= magnitude;
            grad[1] /= magnitude;

            let correction = [-(d / res[0]) * grad[0], -(d / res[1]) * grad[1]];
            if correction.iter().any(|c| c.is_nan()) {
                trace!("Swath: no usable gradient at {current}");
                break;
            }
            current = current.translate(correction[0], correction[1]).truncate(dims);
            d = target.distance(&self.earth_location(&current));
            trace!("Swath: iteration {iterations}, at {current}, {d} km from target");

            if last == 0.0 || ((last - d) / last).abs() < config.stagnation {
                break;
            }
            last = d;
            for k in 0..2 {
                if d < inc[k] * config.shrink_trigger * res[k] {
                    inc[k] = (d / 2.0) / res[k];
                }
            }
            iterations += 1;
        }

        if d > self.tolerance || d.is_nan() {
            trace!("Swath: {target:?} not found, {d} km off after {iterations} iterations");
            session.hint = None;
            return SearchOutcome::NotFound;
        }
        session.hint = Some(current);
        SearchOutcome::Found(current)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

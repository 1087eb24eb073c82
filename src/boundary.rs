//! Projection discontinuities: The test for a polyline segment crossing
//! a boundary, and the geometry used to split lines along it.
//!
//! A projection with discontinuities (the limb of a perspective view,
//! the wrap around longitude of a geographic grid) hands out a
//! [`BoundaryHandler`]. Renderers use [`BoundaryHandler::is_boundary_cut`]
//! to decide whether two consecutive earth locations may be joined by a
//! straight line on the map, and [`BoundaryHandler::splitter`] to cut
//! polygons along the boundary.
use crate::location::EarthLocation;
use geo::{BooleanOps, BoundingRect, Contains, Coord, Intersects, LineString, MultiPolygon, Polygon, Rect};
use log::{debug, trace};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Half width, in degrees, of the strip built around each boundary line
pub const BOUNDARY_EPSILON: f64 = 1e-7;

/// The test for a line segment between two earth locations crossing a
/// boundary
pub type CutTest = Arc<dyn Fn(&EarthLocation, &EarthLocation) -> bool + Send + Sync>;

/// The boundary of a projection: A cut test, and the boundary lines in
/// `(lon, lat)` space, from which the splitting geometry is derived on
/// first use.
#[derive(Clone)]
pub struct BoundaryHandler {
    cut: CutTest,
    lines: Vec<Vec<EarthLocation>>,
    splitter: Arc<OnceCell<MultiPolygon<f64>>>,
}

impl fmt::Debug for BoundaryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryHandler")
            .field("lines", &self.lines.len())
            .field("splitter", &self.splitter.get().map(|s| s.0.len()))
            .finish()
    }
}

impl BoundaryHandler {
    /// A handler for the boundary lines given. Each line is broken into
    /// segments where it crosses the antimeridian, so no segment spans
    /// the full width of the `(lon, lat)` plane. Segments of fewer than
    /// two locations are dropped.
    pub fn new(cut: CutTest, lines: &[Vec<EarthLocation>]) -> BoundaryHandler {
        let mut segments = Vec::new();
        for line in lines {
            let before = segments.len();
            segments.extend(split_at_antimeridian(line));
            debug!(
                "BoundaryHandler: line of {} locations gives {} segments",
                line.len(),
                segments.len() - before
            );
        }
        BoundaryHandler {
            cut,
            lines: segments,
            splitter: Arc::new(OnceCell::new()),
        }
    }

    /// A handler with a precomputed splitting geometry
    pub fn with_splitter(cut: CutTest, splitter: MultiPolygon<f64>) -> BoundaryHandler {
        BoundaryHandler {
            cut,
            lines: Vec::new(),
            splitter: Arc::new(OnceCell::with_value(splitter)),
        }
    }

    /// True if the straight segment from `a` to `b` crosses the boundary
    pub fn is_boundary_cut(&self, a: &EarthLocation, b: &EarthLocation) -> bool {
        (self.cut)(a, b)
    }

    /// The boundary lines, after splitting at the antimeridian
    #[must_use]
    pub fn lines(&self) -> &[Vec<EarthLocation>] {
        &self.lines
    }

    /// The splitting geometry: The union of thin buffers of half width
    /// [`BOUNDARY_EPSILON`] around the boundary lines, with square caps
    /// and bevelled joins. Built on first use, then shared by all clones
    /// of the handler.
    pub fn splitter(&self) -> &MultiPolygon<f64> {
        self.splitter.get_or_init(|| {
            let outlines: Vec<Polygon<f64>> = self
                .lines
                .iter()
                .filter_map(|line| outline(line, BOUNDARY_EPSILON))
                .collect();
            let splitter = union_all(outlines);
            debug!(
                "BoundaryHandler: splitter of {} polygons from {} lines",
                splitter.0.len(),
                self.lines.len()
            );
            splitter
        })
    }

    /// True if the location lies on the splitting geometry
    pub fn is_on_boundary(&self, loc: &EarthLocation) -> bool {
        let point = Coord {
            x: loc.lon,
            y: loc.lat,
        };
        self.splitter().contains(&point)
    }

    /// Break a polyline into pieces wherever two consecutive locations
    /// are cut by the boundary. Pieces of a single location are kept, so
    /// that no input location goes missing.
    pub fn split(&self, line: &[EarthLocation]) -> Vec<Vec<EarthLocation>> {
        let mut pieces = Vec::new();
        let mut current: Vec<EarthLocation> = Vec::new();
        for loc in line {
            if let Some(last) = current.last() {
                if self.is_boundary_cut(last, loc) {
                    trace!("BoundaryHandler: cut between {last:?} and {loc:?}");
                    pieces.push(std::mem::take(&mut current));
                }
            }
            current.push(loc.clone());
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

/// Break a line at each antimeridian crossing, starting a new segment at
/// the second location of each crossing pair
pub(crate) fn split_at_antimeridian(line: &[EarthLocation]) -> Vec<Vec<EarthLocation>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..line.len() {
        if line[i - 1].crosses_antimeridian(&line[i]) {
            segments.push(&line[start..i]);
            start = i;
        }
    }
    segments.push(&line[start..]);
    segments
        .into_iter()
        .filter(|s| s.len() > 1)
        .map(<[EarthLocation]>::to_vec)
        .collect()
}

/// The union of a set of polygons. Polygons whose bounding rectangles
/// overlap are merged, the rest are collected as they are.
pub(crate) fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut pieces: Vec<(Rect<f64>, MultiPolygon<f64>)> = Vec::new();
    for polygon in polygons {
        let Some(mut rect) = polygon.bounding_rect() else {
            continue;
        };
        let mut merged = MultiPolygon::new(vec![polygon]);
        while let Some(i) = pieces.iter().position(|(r, _)| r.intersects(&rect)) {
            let (other_rect, other) = pieces.swap_remove(i);
            merged = merged.union(&other);
            rect = Rect::new(
                Coord {
                    x: rect.min().x.min(other_rect.min().x),
                    y: rect.min().y.min(other_rect.min().y),
                },
                Coord {
                    x: rect.max().x.max(other_rect.max().x),
                    y: rect.max().y.max(other_rect.max().y),
                },
            );
        }
        pieces.push((rect, merged));
    }
    MultiPolygon::new(pieces.into_iter().flat_map(|(_, m)| m.0).collect())
}

/// Unit direction and left normal of the segment from `a` to `b`
fn frame(a: Coord<f64>, b: Coord<f64>) -> (Coord<f64>, Coord<f64>) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = dx.hypot(dy);
    let d = Coord { x: dx / len, y: dy / len };
    (d, Coord { x: -d.y, y: d.x })
}

/// The offset of a vertex to the side `side` (+1 left, -1 right of the
/// direction of travel), where the segments with left normals `n_in` and
/// `n_out` meet. The outer side of a turn is bevelled, the inner side
/// meets at the intersection of the offset lines.
fn join(
    v: Coord<f64>,
    n_in: Coord<f64>,
    n_out: Coord<f64>,
    side: f64,
    width: f64,
    reach: f64,
) -> Vec<Coord<f64>> {
    let w = side * width;
    let turn = n_in.x * n_out.y - n_in.y * n_out.x;
    let cos = n_in.x * n_out.x + n_in.y * n_out.y;
    let first = Coord { x: v.x + w * n_in.x, y: v.y + w * n_in.y };
    let second = Coord { x: v.x + w * n_out.x, y: v.y + w * n_out.y };
    if turn.abs() < 1e-12 && cos > 0.0 {
        return vec![first];
    }
    if side * turn > 0.0 && cos > -0.9 {
        let k = w / (1.0 + cos);
        let miter = Coord { x: v.x + k * (n_in.x + n_out.x), y: v.y + k * (n_in.y + n_out.y) };
        if (miter.x - v.x).hypot(miter.y - v.y) < reach {
            return vec![miter];
        }
    }
    vec![first, second]
}

/// One side of a polyline, offset by `width`: the joins at `vertices`,
/// in order
fn side(
    points: &[Coord<f64>],
    frames: &[(Coord<f64>, Coord<f64>)],
    lengths: &[f64],
    vertices: impl Iterator<Item = usize>,
    sign: f64,
    width: f64,
) -> Vec<Coord<f64>> {
    let n = frames.len();
    let mut ring = Vec::new();
    for j in vertices {
        let (i_in, i_out) = ((j + n - 1) % n, j % n);
        let reach = lengths[i_in].min(lengths[i_out]);
        ring.extend(join(points[j], frames[i_in].1, frames[i_out].1, sign, width, reach));
    }
    ring
}

/// A buffer of half width `width` around a polyline in `(lon, lat)`
/// space. Open lines get square caps. A closed line gives a ring shaped
/// polygon.
fn outline(line: &[EarthLocation], width: f64) -> Option<Polygon<f64>> {
    let mut points: Vec<Coord<f64>> = Vec::with_capacity(line.len());
    for loc in line {
        let c = Coord { x: loc.lon, y: loc.lat };
        if !(c.x.is_finite() && c.y.is_finite()) {
            continue;
        }
        match points.last() {
            Some(last) if (c.x - last.x).hypot(c.y - last.y) <= width * 1e-3 => {}
            _ => points.push(c),
        }
    }
    if points.is_empty() {
        return None;
    }
    if points.len() == 1 {
        let c = points[0];
        let square = Rect::new(
            Coord { x: c.x - width, y: c.y - width },
            Coord { x: c.x + width, y: c.y + width },
        );
        return Some(square.to_polygon());
    }

    let closed = points.len() > 3 && {
        let (first, last) = (points[0], points[points.len() - 1]);
        (first.x - last.x).hypot(first.y - last.y) <= width
    };
    if closed {
        points.pop();
    }
    let count = points.len();
    let segments = if closed { count } else { count - 1 };
    let frames: Vec<_> = (0..segments).map(|i| frame(points[i], points[(i + 1) % count])).collect();
    let lengths: Vec<f64> = (0..segments)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % count]);
            (b.x - a.x).hypot(b.y - a.y)
        })
        .collect();

    if closed {
        let mut left = side(&points, &frames, &lengths, 0..count, 1.0, width);
        let mut right = side(&points, &frames, &lengths, 0..count, -1.0, width);
        left.push(left[0]);
        right.push(right[0]);
        let (left, right) = (LineString::new(left), LineString::new(right));
        let area = |ring: &LineString<f64>| {
            ring.0.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>().abs()
        };
        return Some(if area(&left) >= area(&right) {
            Polygon::new(left, vec![right])
        } else {
            Polygon::new(right, vec![left])
        });
    }

    // Square caps, reaching `width` past each end
    let (d0, n0) = frames[0];
    let (d1, n1) = frames[segments - 1];
    let (start, end) = (points[0], points[count - 1]);
    let cap = |p: Coord<f64>, d: Coord<f64>, n: Coord<f64>, forward: f64, sign: f64| Coord {
        x: p.x + width * (forward * d.x + sign * n.x),
        y: p.y + width * (forward * d.y + sign * n.y),
    };

    let mut ring = vec![cap(start, d0, n0, -1.0, 1.0)];
    ring.extend(side(&points, &frames, &lengths, 1..count - 1, 1.0, width));
    ring.push(cap(end, d1, n1, 1.0, 1.0));
    ring.push(cap(end, d1, n1, 1.0, -1.0));
    let mut right = side(&points, &frames, &lengths, 1..count - 1, -1.0, width);
    right.reverse();
    ring.extend(right);
    ring.push(cap(start, d0, n0, -1.0, -1.0));
    ring.push(ring[0]);
    Some(Polygon::new(LineString::new(ring), vec![]))
}

/// A thin polygon of half width `nudge` along the full meridian at
/// `lon`, for splitting geometries whose longitudes need not be in
/// [-180, 180)
pub(crate) fn meridian_strip(lon: f64, nudge: f64) -> Polygon<f64> {
    let ring = vec![
        Coord { x: lon - nudge, y: 90.0 },
        Coord { x: lon + nudge, y: 90.0 },
        Coord { x: lon + nudge, y: -90.0 },
        Coord { x: lon - nudge, y: -90.0 },
        Coord { x: lon - nudge, y: 90.0 },
    ];
    Polygon::new(LineString::new(ring), vec![])
}

// ----- T E S T S ---------------------------------------------------------------------

//! The scan geometry of an imaging sensor in geostationary (or any
//! distant) orbit, looking down on the WGS 84 ellipsoid: Data locations
//! are pairs of scan angles, stepped at fixed angular increments.
//!
//! Vectors are earth centered and fixed, in units of the equatorial
//! radius, so the ellipsoid is `x² + y² + (a/b)² z² = 1`.
use crate::affine::Affine;
use crate::boundary::{BoundaryHandler, CutTest};
use crate::location::{DataLocation, EarthLocation};
use crate::projection::{ParameterReport, Unit};
use crate::transform::EarthTransform;
use crate::Error;
use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use std::f64::consts::TAU;
use std::sync::Arc;

/// Equatorial radius of WGS 84, in meters
const REM: f64 = 6378137.0;
/// Polar radius of WGS 84, in meters
const RPM: f64 = 6356752.314245;
const RP: f64 = RPM / REM;
/// The `z` coefficient of the ellipsoid quadric
const K: f64 = (REM / RPM) * (REM / RPM);

/// Number of points traced around the limb
const LIMB_POINTS: usize = 720;

type Vector = [f64; 3];
type Matrix = [[f64; 3]; 3];

fn dot(a: &Vector, b: &Vector) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &Vector, b: &Vector) -> Vector {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: &Vector) -> f64 {
    dot(v, v).sqrt()
}

fn unit(v: &Vector) -> Vector {
    let n = norm(v);
    [v[0] / n, v[1] / n, v[2] / n]
}

/// The ellipsoid matrix `diag(1, 1, K)` applied to `v`
fn quadric(v: &Vector) -> Vector {
    [v[0], v[1], K * v[2]]
}

fn apply(m: &Matrix, v: &Vector) -> Vector {
    [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
}

fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    let mut m = [[0.0; 3]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    m
}

fn transpose(m: &Matrix) -> Matrix {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Rotation of the frame by `theta` around the y axis
fn rotate_y(theta: f64) -> Matrix {
    let (s, c) = (-theta).sin_cos();
    [[c, 0., -s], [0., 1., 0.], [s, 0., c]]
}

/// Rotation of the frame by `theta` around the z axis
fn rotate_z(theta: f64) -> Matrix {
    let (s, c) = (-theta).sin_cos();
    [[c, s, 0.], [-s, c, 0.], [0., 0., 1.]]
}

/// The roots of `a t² + b t + c = 0`, computed avoiding cancellation.
/// NaN if there are no real roots.
fn quadratic(a: f64, b: f64, c: f64) -> (f64, f64) {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let alpha = -b + if b > 0.0 { -disc.sqrt() } else { disc.sqrt() };
    (alpha / (2.0 * a), 2.0 * c / alpha)
}

fn geodetic_to_geocentric(lat: f64) -> f64 {
    (RP * RP * lat.tan()).atan()
}

fn geocentric_to_geodetic(lat: f64) -> f64 {
    (lat.tan() / (RP * RP)).atan()
}

/// Geodetic `(lat, lon)` in degrees of a point on the ellipsoid
fn to_earth(v: &Vector) -> EarthLocation {
    let lat = geocentric_to_geodetic((v[2] / norm(v)).asin());
    EarthLocation::new(lat.to_degrees(), v[1].atan2(v[0]).to_degrees())
}

/// The fixed part of the view, shared with the boundary cut test
#[derive(Debug)]
struct View {
    sat: Vector,
    /// Sensor frame to earth frame
    rot: Matrix,
    /// Earth frame to sensor frame
    rot_inv: Matrix,
    gamma: f64,
    vertical: bool,
    data_to_angles: Affine,
    angles_to_data: Affine,
}

impl View {
    /// The earth location seen at a data location, invalid off the disk
    fn earth_location(&self, loc: &DataLocation) -> EarthLocation {
        let (a0, a1) = self.data_to_angles.forward(loc.row, loc.col);
        let (ry, rz) = (rotate_y(a0), rotate_z(a1));
        let m = if self.vertical {
            multiply(&ry, &rz)
        } else {
            multiply(&rz, &ry)
        };
        let dir = apply(&self.rot, &[m[0][0], m[1][0], m[2][0]]);
        let (t1, t2) = quadratic(
            dot(&dir, &quadric(&dir)),
            2.0 * dot(&dir, &quadric(&self.sat)),
            self.gamma,
        );
        let t = t1.min(t2);
        if t.is_nan() {
            return EarthLocation::invalid();
        }
        let v = [
            self.sat[0] + t * dir[0],
            self.sat[1] + t * dir[1],
            self.sat[2] + t * dir[2],
        ];
        to_earth(&v)
    }

    /// The data location of an earth location, invalid on the far side
    fn data_location(&self, loc: &EarthLocation) -> DataLocation {
        let lon = loc.lon.to_radians();
        let lat = geodetic_to_geocentric(loc.lat.to_radians());
        let d = [lon.cos() * lat.cos(), lon.sin() * lat.cos(), lat.sin()];
        let t = (1.0 / dot(&d, &quadric(&d))).sqrt();
        let surface = [d[0] * t, d[1] * t, d[2] * t];
        let dv = [
            surface[0] - self.sat[0],
            surface[1] - self.sat[1],
            surface[2] - self.sat[2],
        ];
        if dot(&dv, &quadric(&surface)) > 0.0 {
            return DataLocation::invalid();
        }
        let dp = apply(&self.rot_inv, &dv);
        let (a0, a1) = if self.vertical {
            (-dp[2].atan2(dp[0]), (dp[1] / norm(&dp)).asin())
        } else {
            (-(dp[2] / norm(&dp)).asin(), dp[1].atan2(dp[0]))
        };
        let (row, col) = self.angles_to_data.forward(a0, a1);
        DataLocation::new(row, col)
    }

    /// The limb: the ellipse where the lines of sight touch the
    /// ellipsoid, traced as a closed polyline
    fn limb(&self) -> Vec<EarthLocation> {
        let alpha = dot(&self.sat, &quadric(&self.sat));
        let c = [self.sat[0] / alpha, self.sat[1] / alpha, self.sat[2] / alpha];
        let normal = unit(&quadric(&self.sat));

        // Any axis not too close to the normal spans the plane with it
        let mut axis = [0.0; 3];
        let smallest = (0..3)
            .min_by(|&i, &j| normal[i].abs().total_cmp(&normal[j].abs()))
            .unwrap_or(0);
        axis[smallest] = 1.0;
        let u = unit(&cross(&normal, &axis));
        let v = cross(&normal, &u);

        let cac = dot(&c, &quadric(&c)) - 1.0;
        let dtheta = TAU / LIMB_POINTS as f64;
        let mut line = Vec::with_capacity(LIMB_POINTS + 1);
        for point in 0..=LIMB_POINTS {
            let (s, co) = (dtheta * point as f64).sin_cos();
            let w = [
                co * u[0] + s * v[0],
                co * u[1] + s * v[1],
                co * u[2] + s * v[2],
            ];
            let (t1, t2) = quadratic(dot(&w, &quadric(&w)), 2.0 * dot(&w, &quadric(&c)), cac);
            let t = t1.max(t2);
            let p = [c[0] + t * w[0], c[1] + t * w[1], c[2] + t * w[2]];
            line.push(to_earth(&p));
        }
        line
    }
}

/// The view of a scanning sensor from a point above the ellipsoid
#[derive(Debug)]
pub struct EllipsoidPerspective {
    view: Arc<View>,
    parameters: Vec<f64>,
    dims: [usize; 2],
    boundary: OnceCell<BoundaryHandler>,
}

// ----- C O N S T R U C T O R ---------------------------------------------------------

impl EllipsoidPerspective {
    /// A sensor view from `parameters`:
    ///
    /// 0. Geocentric latitude of the subsatellite point, degrees
    /// 1. Longitude of the subsatellite point, degrees
    /// 2. Distance of the satellite from the earth center, km
    /// 3. Scan step between rows, radians
    /// 4. Scan step between columns, radians
    /// 5. Optional: nonzero for a scanner sweeping along columns first
    ///
    /// and a grid of `dims = [rows, cols]`, centered on the subpoint.
    pub fn new(parameters: &[f64], dims: [usize; 2]) -> Result<EllipsoidPerspective, Error> {
        if parameters.len() != 5 && parameters.len() != 6 {
            warn!("EllipsoidPerspective: {} parameters given", parameters.len());
            return Err(Error::BadParam(
                "sensor parameters".to_string(),
                format!("expected 5 or 6 values, got {}", parameters.len()),
            ));
        }
        let (lat, lon, radius) = (parameters[0], parameters[1], parameters[2]);
        let (row_step, col_step) = (parameters[3], parameters[4]);
        let vertical = parameters.get(5).is_some_and(|&v| v != 0.0);

        let r = radius * 1000.0 / REM;
        if !(r > 1.0) {
            warn!("EllipsoidPerspective: satellite radius {radius} km is inside the earth");
            return Err(Error::BadParam("satellite radius".to_string(), radius.to_string()));
        }
        if !(lat.abs() < 90.0) {
            warn!("EllipsoidPerspective: subpoint latitude {lat} is at or past a pole");
            return Err(Error::BadParam("subpoint latitude".to_string(), lat.to_string()));
        }
        if row_step == 0.0 || col_step == 0.0 {
            warn!("EllipsoidPerspective: zero scan step");
            return Err(Error::BadParam(
                "scan steps".to_string(),
                format!("{row_step}, {col_step}"),
            ));
        }

        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let sat = [r * cos_lon * cos_lat, r * sin_lon * cos_lat, r * sin_lat];

        // The sensor frame: x toward the earth center, y along the
        // equator, z completing the right handed system
        let x = [-sat[0], -sat[1], -sat[2]];
        let y = cross(&[0., 0., 1.], &x);
        let z = cross(&x, &y);
        let rot_inv = [unit(&x), unit(&y), unit(&z)];
        let rot = transpose(&rot_inv);
        let gamma = dot(&sat, &quadric(&sat)) - 1.0;

        let rows = dims[0] as f64;
        let cols = dims[1] as f64;
        let data_to_angles = Affine::new(
            row_step,
            0.,
            -row_step * (rows - 1.) / 2.,
            0.,
            -col_step,
            col_step * (cols - 1.) / 2.,
        );
        let angles_to_data = data_to_angles.inverse()?;
        debug!("EllipsoidPerspective: satellite at {sat:?}, vertical scan {vertical}");

        Ok(EllipsoidPerspective {
            view: Arc::new(View {
                sat,
                rot,
                rot_inv,
                gamma,
                vertical,
                data_to_angles,
                angles_to_data,
            }),
            parameters: parameters.to_vec(),
            dims,
            boundary: OnceCell::new(),
        })
    }

    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    #[must_use]
    pub fn is_vertical_scan(&self) -> bool {
        self.view.vertical
    }

    pub fn parameter_report(&self) -> Vec<ParameterReport> {
        let p = &self.parameters;
        vec![
            ParameterReport::new("Subpoint Latitude", p[0], Unit::Degrees),
            ParameterReport::new("Subpoint Longitude", p[1], Unit::Degrees),
            ParameterReport::meters("Satellite Distance", p[2] * 1000.0),
            ParameterReport::new("Row Scan Step", p[3], Unit::None),
            ParameterReport::new("Column Scan Step", p[4], Unit::None),
        ]
    }
}

impl EarthTransform for EllipsoidPerspective {
    fn dims(&self) -> [usize; 2] {
        self.dims
    }

    fn describe(&self) -> &'static str {
        "sensor"
    }

    fn earth_location(&self, loc: &DataLocation) -> EarthLocation {
        let earth = self.view.earth_location(loc);
        if !earth.is_valid() {
            trace!("EllipsoidPerspective: {loc:?} is off the disk");
        }
        earth
    }

    fn data_location_on_datum(&self, loc: &EarthLocation) -> DataLocation {
        self.view.data_location(loc)
    }

    /// The limb of the disk, where segments with an endpoint on the far
    /// side are cut
    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        let handler = self.boundary.get_or_init(|| {
            let view = self.view.clone();
            let cut: CutTest = Arc::new(move |a, b| {
                !view.data_location(a).is_valid() || !view.data_location(b).is_valid()
            });
            BoundaryHandler::new(cut, &[self.view.limb()])
        });
        Some(handler.clone())
    }
}

// ----- T E S T S ---------------------------------------------------------------------

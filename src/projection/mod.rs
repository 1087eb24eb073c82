//! The projection families. Each family is a small value type holding
//! the constants precomputed at construction, and implementing
//! [`ProjectionTransform`].
//!
//! Unless stated otherwise, the forward direction takes geodetic
//! latitude and longitude in radians and returns map coordinates in
//! meters, including the false easting and northing.
use crate::boundary::BoundaryHandler;
use crate::math::angular::pakr2dm;
use crate::prelude::*;
use std::f64::consts::TAU;
use std::fmt;
use std::sync::Arc;

mod aea;
mod aeqd;
mod alsk;
mod eqc;
mod eqdc;
mod geo;
mod gnom;
mod goode;
mod hammer;
mod imoll;
mod laea;
mod lcc;
mod merc;
mod mill;
mod moll;
mod nsper;
mod oea;
mod omerc;
mod ortho;
mod poly;
mod ps;
mod robin;
mod sinu;
mod som;
mod stere;
mod tmerc;
mod vandg;
mod wag4;
mod wag7;

pub use aea::AlbersEqualArea;
pub use aeqd::AzimuthalEquidistant;
pub use alsk::AlaskaConformal;
pub use eqc::Equirectangular;
pub use eqdc::EquidistantConic;
pub use geo::{Geographic, LongitudeRange};
pub use gnom::Gnomonic;
pub use goode::InterruptedGoode;
pub use hammer::Hammer;
pub use imoll::InterruptedMollweide;
pub use laea::LambertAzimuthal;
pub use lcc::LambertConformalConic;
pub use merc::Mercator;
pub use mill::Miller;
pub use moll::Mollweide;
pub use nsper::NearsidePerspective;
pub use oea::OblatedEqualArea;
pub use omerc::{HotineDefinition, HotineObliqueMercator};
pub use ortho::Orthographic;
pub use poly::Polyconic;
pub use ps::PolarStereographic;
pub use robin::Robinson;
pub use sinu::Sinusoidal;
pub use som::{SomDefinition, SpaceObliqueMercator};
pub use stere::Stereographic;
pub use tmerc::TransverseMercator;
pub use vandg::VanDerGrinten;
pub use wag4::WagnerIV;
pub use wag7::WagnerVII;

// ----- T H E   T R A I T -------------------------------------------------------------

/// The forward and inverse map transform of a projection family
pub trait ProjectionTransform: fmt::Debug + Send + Sync {
    /// The GCTP projection system
    fn system(&self) -> ProjectionSystem;

    /// The UTM or State Plane zone, zero for all other systems
    fn zone(&self) -> i32 {
        0
    }

    /// Geodetic `(lat, lon)` to map `(x, y)`
    fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), ProjectionError>;

    /// Map `(x, y)` to geodetic `(lat, lon)`
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError>;

    /// The construction parameters, as `(label, value, unit)` triplets
    fn describe(&self) -> Vec<ParameterReport>;

    /// True if geodetic coordinates are given in degrees rather than
    /// radians. Only the geographic "projection" works in degrees.
    fn native_degrees(&self) -> bool {
        false
    }

    /// A version of the projection adapted to a grid given by its data to
    /// map affine and dimensions, if the projection depends on the grid
    /// at all. The geographic projection uses this to decide how to
    /// wrap longitudes.
    fn for_grid(
        &self,
        _grid_to_map: &Affine,
        _dims: [usize; 2],
    ) -> Result<Option<Arc<dyn ProjectionTransform>>, Error> {
        Ok(None)
    }

    /// The handler for the discontinuities of the projection, if it has
    /// any needing special treatment when drawing lines across them.
    fn boundary_handler(&self) -> Option<BoundaryHandler> {
        None
    }
}

// ----- S Y S T E M S -----------------------------------------------------------------

/// The GCTP projection system codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionSystem {
    Geographic = 0,
    Utm = 1,
    StatePlane = 2,
    Albers = 3,
    LambertConformalConic = 4,
    Mercator = 5,
    PolarStereographic = 6,
    Polyconic = 7,
    EquidistantConic = 8,
    TransverseMercator = 9,
    Stereographic = 10,
    LambertAzimuthal = 11,
    AzimuthalEquidistant = 12,
    Gnomonic = 13,
    Orthographic = 14,
    NearsidePerspective = 15,
    Sinusoidal = 16,
    Equirectangular = 17,
    Miller = 18,
    VanDerGrinten = 19,
    HotineObliqueMercator = 20,
    Robinson = 21,
    SpaceObliqueMercator = 22,
    AlaskaConformal = 23,
    InterruptedGoode = 24,
    Mollweide = 25,
    InterruptedMollweide = 26,
    Hammer = 27,
    WagnerIV = 28,
    WagnerVII = 29,
    OblatedEqualArea = 30,
}

#[rustfmt::skip]
const SYSTEMS: [(ProjectionSystem, &str); 31] = [
    (ProjectionSystem::Geographic,            "Geographic"),
    (ProjectionSystem::Utm,                   "Universal Transverse Mercator"),
    (ProjectionSystem::StatePlane,            "State Plane Coordinates"),
    (ProjectionSystem::Albers,                "Albers Conical Equal Area"),
    (ProjectionSystem::LambertConformalConic, "Lambert Conformal Conic"),
    (ProjectionSystem::Mercator,              "Mercator"),
    (ProjectionSystem::PolarStereographic,    "Polar Stereographic"),
    (ProjectionSystem::Polyconic,             "Polyconic"),
    (ProjectionSystem::EquidistantConic,      "Equidistant Conic"),
    (ProjectionSystem::TransverseMercator,    "Transverse Mercator"),
    (ProjectionSystem::Stereographic,         "Stereographic"),
    (ProjectionSystem::LambertAzimuthal,      "Lambert Azimuthal Equal Area"),
    (ProjectionSystem::AzimuthalEquidistant,  "Azimuthal Equidistant"),
    (ProjectionSystem::Gnomonic,              "Gnomonic"),
    (ProjectionSystem::Orthographic,          "Orthographic"),
    (ProjectionSystem::NearsidePerspective,   "General Vertical Near-Side Perspective"),
    (ProjectionSystem::Sinusoidal,            "Sinusoidal"),
    (ProjectionSystem::Equirectangular,       "Equirectangular"),
    (ProjectionSystem::Miller,                "Miller Cylindrical"),
    (ProjectionSystem::VanDerGrinten,         "Van der Grinten"),
    (ProjectionSystem::HotineObliqueMercator, "Hotine Oblique Mercator"),
    (ProjectionSystem::Robinson,              "Robinson"),
    (ProjectionSystem::SpaceObliqueMercator,  "Space Oblique Mercator"),
    (ProjectionSystem::AlaskaConformal,       "Alaska Conformal"),
    (ProjectionSystem::InterruptedGoode,      "Interrupted Goode Homolosine"),
    (ProjectionSystem::Mollweide,             "Mollweide"),
    (ProjectionSystem::InterruptedMollweide,  "Interrupted Mollweide"),
    (ProjectionSystem::Hammer,                "Hammer"),
    (ProjectionSystem::WagnerIV,              "Wagner IV"),
    (ProjectionSystem::WagnerVII,             "Wagner VII"),
    (ProjectionSystem::OblatedEqualArea,      "Oblated Equal Area"),
];

impl ProjectionSystem {
    /// The system with the given GCTP code
    pub fn from_code(code: i32) -> Option<ProjectionSystem> {
        usize::try_from(code)
            .ok()
            .and_then(|i| SYSTEMS.get(i))
            .map(|s| s.0)
    }

    /// The system with the given name, case insensitively
    pub fn named(name: &str) -> Option<ProjectionSystem> {
        SYSTEMS
            .iter()
            .find(|s| s.1.eq_ignore_ascii_case(name))
            .map(|s| s.0)
    }

    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        SYSTEMS[self as usize].1
    }

    /// All systems, in code order
    pub fn all() -> impl Iterator<Item = ProjectionSystem> {
        SYSTEMS.iter().map(|s| s.0)
    }
}

impl fmt::Display for ProjectionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ----- R E P O R T S -----------------------------------------------------------------

/// The unit of a reported parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Meters,
    Degrees,
    None,
}

impl Unit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Degrees => "degrees",
            Unit::None => "",
        }
    }
}

/// One line of a parameter description
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterReport {
    pub label: &'static str,
    pub value: f64,
    pub unit: Unit,
}

impl ParameterReport {
    #[must_use]
    pub fn new(label: &'static str, value: f64, unit: Unit) -> ParameterReport {
        ParameterReport { label, value, unit }
    }

    /// A report of an angle, given in radians, reported in degrees
    #[must_use]
    pub fn angle(label: &'static str, radians: f64) -> ParameterReport {
        ParameterReport::new(label, radians.to_degrees(), Unit::Degrees)
    }

    #[must_use]
    pub fn meters(label: &'static str, value: f64) -> ParameterReport {
        ParameterReport::new(label, value, Unit::Meters)
    }

    /// The value of an angle in packed DDDMMMSSS.SS format, the form it
    /// takes in a GCTP parameter array
    #[must_use]
    pub fn packed(&self) -> Option<f64> {
        (self.unit == Unit::Degrees).then(|| pakr2dm(self.value.to_radians()))
    }
}

impl fmt::Display for ParameterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.label, self.value, self.unit.symbol())
    }
}

/// Builder for the parameter descriptions, using the conventional
/// labels of each kind of parameter
#[derive(Debug, Default)]
pub(crate) struct Report(Vec<ParameterReport>);

impl Report {
    pub fn new() -> Report {
        Report(Vec::new())
    }

    pub fn radius(mut self, r: f64) -> Self {
        self.0.push(ParameterReport::meters("Radius of Sphere", r));
        self
    }

    pub fn axes(mut self, r_major: f64, r_minor: f64) -> Self {
        self.0.push(ParameterReport::meters("Semi-Major Axis of Ellipsoid", r_major));
        self.0.push(ParameterReport::meters("Semi-Minor Axis of Ellipsoid", r_minor));
        self
    }

    pub fn center_lon(mut self, lon: f64) -> Self {
        self.0.push(ParameterReport::angle("Longitude of Center", lon));
        self
    }

    pub fn central_meridian(mut self, lon: f64) -> Self {
        self.0.push(ParameterReport::angle("Longitude of Central Meridian", lon));
        self
    }

    pub fn center_lat(mut self, lat: f64) -> Self {
        self.0.push(ParameterReport::angle("Latitude of Center", lat));
        self
    }

    pub fn origin(mut self, lat: f64) -> Self {
        self.0.push(ParameterReport::angle("Latitude of Origin", lat));
        self
    }

    pub fn standard_parallels(mut self, lat1: f64, lat2: f64) -> Self {
        self.0.push(ParameterReport::angle("1st Standard Parallel", lat1));
        self.0.push(ParameterReport::angle("2nd Standard Parallel", lat2));
        self
    }

    pub fn standard_parallel(mut self, lat: f64) -> Self {
        self.0.push(ParameterReport::angle("Standard Parallel", lat));
        self
    }

    pub fn offsets(mut self, false_easting: f64, false_northing: f64) -> Self {
        self.0.push(ParameterReport::meters("False Easting", false_easting));
        self.0.push(ParameterReport::meters("False Northing", false_northing));
        self
    }

    pub fn value(mut self, label: &'static str, value: f64, unit: Unit) -> Self {
        self.0.push(ParameterReport::new(label, value, unit));
        self
    }

    pub fn angle(mut self, label: &'static str, radians: f64) -> Self {
        self.0.push(ParameterReport::angle(label, radians));
        self
    }

    pub fn build(self) -> Vec<ParameterReport> {
        self.0
    }
}

/// The `(lat, lon)` of an earth location, in radians
pub(crate) fn radians(loc: &EarthLocation) -> (f64, f64) {
    (loc.lat.to_radians(), loc.lon.to_radians())
}

/// Trace the limb of an azimuthal view as a closed polyline of 721
/// earth locations, by inverse projecting a circle of radius `r_max`
/// around the false origin.
pub(crate) fn trace_limb<P: ProjectionTransform + ?Sized>(
    projection: &P,
    r_max: f64,
    offsets: (f64, f64),
) -> Result<Vec<EarthLocation>, ProjectionError> {
    const POINTS: usize = 720;
    let dtheta = TAU / POINTS as f64;
    let mut line = Vec::with_capacity(POINTS + 1);
    for point in 0..=POINTS {
        let (s, c) = (dtheta * point as f64).sin_cos();
        let (lat, lon) = projection.inverse(offsets.0 + r_max * c, offsets.1 + r_max * s)?;
        line.push(EarthLocation::new(lat.to_degrees(), lon.to_degrees()));
    }
    Ok(line)
}

// ----- T E S T S ---------------------------------------------------------------------

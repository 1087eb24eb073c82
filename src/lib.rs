//! *Forward and inverse map projections, affine grid mappings, and
//! nearest-location search in irregularly geolocated swath data*.
//!
//! Projections
//! ===========
//!
//! Each projection family is a small value type implementing
//! [`ProjectionTransform`](projection::ProjectionTransform): it
//! precomputes its constants once at construction, and then converts
//! geodetic `(lat, lon)` in radians to planar `(x, y)` in meters and back.
//!
//! Grids
//! -----
//!
//! A [`MapProjection`](mapping::MapProjection) composes a projection
//! with a pair of mutually inverse affine transforms, exposing
//! `(row, col) <-> (lat, lon)` in degrees. The
//! [`MapProjectionFactory`](factory::MapProjectionFactory) builds them
//! from the traditional GCTP system code, spheroid code and 15-slot
//! parameter array.
//!
//! Swaths
//! ------
//!
//! For data without a closed form projection, the [`swath`] module
//! searches per-pixel geolocation arrays for the grid location closest
//! to a given earth location.

pub mod affine;
pub mod boundary;
pub mod datum;
pub mod factory;
pub mod location;
pub mod mapping;
pub mod math;
pub mod perspective;
pub mod projection;
pub mod spheroid;
pub mod swath;
pub mod transform;

use std::io;
use thiserror::Error;

/// Preamble for crate-internal modules, and for user defined projections
pub mod authoring {
    pub use log::debug;
    pub use log::trace;
    pub use log::warn;

    pub use crate::math::ancillary::*;
    pub use crate::math::angular::adjust_lon;
    pub use crate::math::latitude::*;
    pub use crate::math::EPSLN;

    pub use crate::prelude::*;
    pub use crate::projection::ParameterReport;
    pub use crate::projection::Unit;

    pub use std::f64::consts::FRAC_PI_2;
    pub use std::f64::consts::FRAC_PI_4;
    pub use std::f64::consts::PI;
    pub use std::f64::consts::TAU;
}

/// Preamble for application programs
pub mod prelude {
    pub use crate::Error;
    pub use crate::ProjectionError;

    pub use crate::affine::Affine;
    pub use crate::datum::Datum;
    pub use crate::factory::MapProjectionFactory;
    pub use crate::location::DataLocation;
    pub use crate::location::EarthLocation;
    pub use crate::mapping::MapProjection;
    pub use crate::projection::ProjectionSystem;
    pub use crate::projection::ProjectionTransform;
    pub use crate::spheroid::Spheroid;
    pub use crate::transform::EarthTransform;
}

/// Configuration level errors: Returned when constructing projections,
/// mappings and searches from inconsistent parameters.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] io::Error),

    #[error("error: {0}")]
    General(&'static str),

    #[error("missing required parameter {0}")]
    MissingParam(String),

    #[error("malformed value for parameter {0}: {1}")]
    BadParam(String, String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("affine transform is not invertible")]
    NonInvertible,

    #[error("projection failure: {0}")]
    Projection(#[from] ProjectionError),
}

/// Per-point failures. These are expected during routine transformation
/// of full grids, so they are cheap to produce and to check: `Copy`, and
/// free of allocation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionError {
    /// The point is geometrically outside the domain of the forward
    /// projection (back side of the globe, antipode, pole singularity)
    #[error("{0}: point cannot be projected")]
    Unprojectable(&'static str),

    /// The map coordinate is outside the range of the inverse projection
    #[error("{0}: input data error")]
    OutOfRange(&'static str),

    /// An iterative solver hit its iteration cap
    #[error("{0}: iteration failed to converge")]
    NotConverged(&'static str),

    /// Valid math, but the point falls in an interrupted area between
    /// the regions of an interrupted projection
    #[error("point lies in an interrupted area")]
    InBreak,
}

// ----- T E S T S ---------------------------------------------------------------------

//! Numerical primitives shared by the projection implementations

/// Free functions used by more than one projection: eccentricity
/// related auxiliaries and the meridian distance series.
pub mod ancillary;

/// Free functions for reducing, packing and unpacking angles.
pub mod angular;

/// Iterative solvers for latitude from the auxiliary quantities of the
/// conic, polar and polyconic projections.
pub mod latitude;

pub use angular::adjust_lon;

/// The general purpose tolerance of the GCTP family of algorithms.
/// Boundary pixels round consistently only when this is kept verbatim.
pub const EPSLN: f64 = 1.0e-10;

/// Log and report that the solver `who` gave up after `n` iterations
pub(crate) fn gave_up(who: &'static str, n: usize) -> crate::ProjectionError {
    log::trace!("{who}: no convergence after {n} iterations");
    crate::ProjectionError::NotConverged(who)
}

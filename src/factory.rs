//! Construction of map projections from the traditional GCTP
//! description: system code, zone, spheroid code and an array of 15
//! projection parameters.
//!
//! Angular parameters are given in packed DDDMMMSSS.SS format, linear
//! parameters in meters. The parameter slots used by each system follow
//! the GCTP conventions:
//!
//! | slot | meaning                                                      |
//! |------|--------------------------------------------------------------|
//! | 0, 1 | semimajor and semiminor axis (for negative spheroid codes)   |
//! | 2    | scale factor, height of perspective point, shape `m`         |
//! | 2, 3 | first and second standard parallel                           |
//! | 4    | central meridian, or longitude of center                     |
//! | 5    | latitude of origin, or latitude of center                    |
//! | 6, 7 | false easting and northing                                   |
//! | 8-11 | Hotine two point definition, SOM orbit, OEA rotation angle   |
//! | 12   | Hotine and SOM definition format selector                    |
use crate::affine::Affine;
use crate::datum::Datum;
use crate::location::{DataLocation, EarthLocation};
use crate::mapping::MapProjection;
use crate::math::angular::{calc_utm_zone, paksz};
use crate::projection as p;
use crate::projection::{HotineDefinition, ProjectionSystem, ProjectionTransform, SomDefinition};
use crate::spheroid::{sphdz, CLARKE1866};
use crate::transform::EarthTransform;
use crate::Error;
use log::{debug, warn};
use std::sync::Arc;

/// The number of slots in a GCTP parameter array
pub const PARAMETERS: usize = 15;

/// The UTM scale factor on the central meridian
const UTM_SCALE_FACTOR: f64 = 0.9996;

/// Builds projections and grid mappings from GCTP style descriptions
#[derive(Debug, Default, Clone, Copy)]
pub struct MapProjectionFactory;

/// Decode a packed DDDMMMSSS.SS angle to radians
fn packed(value: f64) -> Result<f64, Error> {
    Ok(paksz(value)?.to_radians())
}

impl MapProjectionFactory {
    #[must_use]
    pub fn new() -> Self {
        MapProjectionFactory
    }

    /// The system of a GCTP code
    pub fn system_from_code(code: i32) -> Result<ProjectionSystem, Error> {
        ProjectionSystem::from_code(code).ok_or_else(|| {
            warn!("MapProjectionFactory: unknown projection system code {code}");
            Error::Unsupported(format!("projection system code {code}"))
        })
    }

    /// The UTM zone of a location in degrees, negative in the southern
    /// hemisphere
    #[must_use]
    pub fn utm_zone(lat: f64, lon: f64) -> i32 {
        let zone = calc_utm_zone(lon);
        if lat < 0.0 {
            -zone
        } else {
            zone
        }
    }

    /// Check that a UTM zone is within 1..=60, regardless of sign
    pub fn check_utm_zone(zone: i32) -> Result<i32, Error> {
        if (1..=60).contains(&zone.abs()) {
            Ok(zone)
        } else {
            warn!("MapProjectionFactory: UTM zone {zone} out of range");
            Err(Error::BadParam("zone".to_string(), zone.to_string()))
        }
    }

    // ----- P R O J E C T I O N S -----------------------------------------------------

    /// The projection family described by a GCTP system, zone, parameter
    /// array and spheroid code. Missing trailing parameters are zero.
    pub fn projection(
        &self,
        system: ProjectionSystem,
        zone: i32,
        parameters: &[f64],
        spheroid: i32,
    ) -> Result<Arc<dyn ProjectionTransform>, Error> {
        if parameters.len() > PARAMETERS {
            warn!(
                "MapProjectionFactory: {} parameters given, at most {PARAMETERS} expected",
                parameters.len()
            );
            return Err(Error::BadParam(
                "parameters".to_string(),
                format!("{} values", parameters.len()),
            ));
        }
        let mut parm = [0.0; PARAMETERS];
        parm[..parameters.len()].copy_from_slice(parameters);

        let (r_major, r_minor, radius) = sphdz(spheroid, &parm);
        let (fe, fn_) = (parm[6], parm[7]);
        debug!("MapProjectionFactory: {system}, zone {zone}, spheroid {spheroid}");

        use ProjectionSystem as S;
        let projection: Arc<dyn ProjectionTransform> = match system {
            S::Geographic => Arc::new(p::Geographic::new(r_major, r_minor)?),

            S::Utm => {
                // User defined spheroids are not supported by UTM
                let (r_major, r_minor, _) = if spheroid < 0 {
                    sphdz(CLARKE1866, &parm)
                } else {
                    (r_major, r_minor, radius)
                };
                let zone = if zone == 0 {
                    let lon = paksz(parm[0])?;
                    let lat = paksz(parm[1])?;
                    MapProjectionFactory::utm_zone(lat, lon)
                } else {
                    zone
                };
                let zone = MapProjectionFactory::check_utm_zone(zone)?;
                Arc::new(p::TransverseMercator::utm(r_major, r_minor, UTM_SCALE_FACTOR, zone)?)
            }

            S::StatePlane => {
                warn!("MapProjectionFactory: State Plane zone {zone} requested");
                return Err(Error::Unsupported(format!("{system}")));
            }

            S::Albers => Arc::new(p::AlbersEqualArea::new(
                r_major,
                r_minor,
                packed(parm[2])?,
                packed(parm[3])?,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::LambertConformalConic => Arc::new(p::LambertConformalConic::new(
                r_major,
                r_minor,
                packed(parm[2])?,
                packed(parm[3])?,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Mercator => Arc::new(p::Mercator::new(
                r_major,
                r_minor,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::PolarStereographic => Arc::new(p::PolarStereographic::new(
                r_major,
                r_minor,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Polyconic => Arc::new(p::Polyconic::new(
                r_major,
                r_minor,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::EquidistantConic => {
                // A zero in slot 8 selects the single standard parallel form
                let lat2 = if parm[8] == 0.0 {
                    None
                } else {
                    Some(packed(parm[3])?)
                };
                Arc::new(p::EquidistantConic::new(
                    r_major,
                    r_minor,
                    packed(parm[2])?,
                    lat2,
                    packed(parm[4])?,
                    packed(parm[5])?,
                    fe,
                    fn_,
                )?)
            }

            S::TransverseMercator => Arc::new(p::TransverseMercator::new(
                r_major,
                r_minor,
                parm[2],
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Stereographic => Arc::new(p::Stereographic::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::LambertAzimuthal => Arc::new(p::LambertAzimuthal::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::AzimuthalEquidistant => Arc::new(p::AzimuthalEquidistant::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Gnomonic => Arc::new(p::Gnomonic::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Orthographic => Arc::new(p::Orthographic::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::NearsidePerspective => Arc::new(p::NearsidePerspective::new(
                radius,
                parm[2],
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Sinusoidal => Arc::new(p::Sinusoidal::new(radius, packed(parm[4])?, fe, fn_)?),

            S::Equirectangular => Arc::new(p::Equirectangular::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                fe,
                fn_,
            )?),

            S::Miller => Arc::new(p::Miller::new(radius, packed(parm[4])?, fe, fn_)?),

            S::VanDerGrinten => Arc::new(p::VanDerGrinten::new(radius, packed(parm[4])?, fe, fn_)?),

            S::HotineObliqueMercator => {
                let definition = if parm[12] != 0.0 {
                    HotineDefinition::Azimuth {
                        azimuth: packed(parm[3])?,
                        lon_center: packed(parm[4])?,
                    }
                } else {
                    HotineDefinition::TwoPoints {
                        lon1: packed(parm[8])?,
                        lat1: packed(parm[9])?,
                        lon2: packed(parm[10])?,
                        lat2: packed(parm[11])?,
                    }
                };
                Arc::new(p::HotineObliqueMercator::new(
                    r_major,
                    r_minor,
                    parm[2],
                    packed(parm[5])?,
                    definition,
                    fe,
                    fn_,
                )?)
            }

            S::Robinson => Arc::new(p::Robinson::new(radius, packed(parm[4])?, fe, fn_)?),

            S::SpaceObliqueMercator => {
                let definition = if parm[12] == 0.0 {
                    SomDefinition::Orbit {
                        inclination: packed(parm[3])?,
                        lon_ascending: packed(parm[4])?,
                        period: parm[8],
                        from_end: parm[10] as i64 != 0,
                    }
                } else {
                    SomDefinition::Landsat {
                        satellite: parm[2] as i64,
                        path: parm[3] as i64,
                    }
                };
                Arc::new(p::SpaceObliqueMercator::new(r_major, r_minor, definition, fe, fn_)?)
            }

            S::AlaskaConformal => Arc::new(p::AlaskaConformal::new(r_major, r_minor, fe, fn_)?),

            S::InterruptedGoode => Arc::new(p::InterruptedGoode::new(radius)?),

            S::Mollweide => Arc::new(p::Mollweide::new(radius, packed(parm[4])?, fe, fn_)?),

            S::InterruptedMollweide => Arc::new(p::InterruptedMollweide::new(radius)?),

            S::Hammer => Arc::new(p::Hammer::new(radius, packed(parm[4])?, fe, fn_)?),

            S::WagnerIV => Arc::new(p::WagnerIV::new(radius, packed(parm[4])?, fe, fn_)?),

            S::WagnerVII => Arc::new(p::WagnerVII::new(radius, packed(parm[4])?, fe, fn_)?),

            S::OblatedEqualArea => Arc::new(p::OblatedEqualArea::new(
                radius,
                packed(parm[4])?,
                packed(parm[5])?,
                parm[2],
                parm[3],
                packed(parm[8])?,
                fe,
                fn_,
            )?),
        };
        Ok(projection)
    }

    // ----- M A P P I N G S -----------------------------------------------------------

    /// A grid mapping from a GCTP description and an explicit affine
    /// from `(row, col)` to map `(x, y)`
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        system: ProjectionSystem,
        zone: i32,
        parameters: &[f64],
        spheroid: i32,
        dims: [usize; 2],
        affine: Affine,
    ) -> Result<MapProjection, Error> {
        let projection = self.projection(system, zone, parameters, spheroid)?;

        // UTM falls back to Clarke 1866 for user defined spheroids
        let spheroid = if system == ProjectionSystem::Utm && spheroid < 0 {
            CLARKE1866
        } else {
            spheroid
        };
        let mut parm = [0.0; PARAMETERS];
        parm[..parameters.len()].copy_from_slice(parameters);
        let (r_major, r_minor, _) = sphdz(spheroid, &parm);
        let datum = Datum::from_axes(r_major, r_minor);

        let mapping =
            MapProjection::new(projection, spheroid, datum, &parm, dims, affine)?;
        Ok(with_lon_flag(mapping))
    }

    /// A north-up grid mapping centered on an earth location, with pixels
    /// of `pixel_dims = [height, width]` in map units
    #[allow(clippy::too_many_arguments)]
    pub fn create_centered(
        &self,
        system: ProjectionSystem,
        zone: i32,
        parameters: &[f64],
        spheroid: i32,
        dims: [usize; 2],
        center: &EarthLocation,
        pixel_dims: [f64; 2],
    ) -> Result<MapProjection, Error> {
        let mapping = self.create(system, zone, parameters, spheroid, dims, Affine::identity())?;
        let mapping = mapping.rebase(center, pixel_dims)?;
        Ok(with_lon_flag(mapping))
    }
}

/// Geographic grids whose right edge maps back to a negative column
/// need longitudes wrapped to positive values
fn with_lon_flag(mapping: MapProjection) -> MapProjection {
    if mapping.system() != ProjectionSystem::Geographic {
        return mapping;
    }
    let [_, cols] = mapping.dims();
    let top_right = DataLocation::new(0.0, cols.saturating_sub(1) as f64);
    let back = mapping.data_location(&mapping.earth_location(&top_right));
    if back.col < 0.0 {
        debug!("MapProjectionFactory: geographic grid needs positive longitudes");
        return mapping.with_positive_lon(true);
    }
    mapping
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angular::pack_angle;
    use crate::spheroid::{SPHERE, WGS84};
    use float_eq::assert_float_eq;

    fn parameters(values: &[(usize, f64)]) -> [f64; PARAMETERS] {
        let mut parm = [0.0; PARAMETERS];
        for &(slot, value) in values {
            parm[slot] = value;
        }
        parm
    }

    #[test]
    fn system_codes() {
        assert_eq!(
            MapProjectionFactory::system_from_code(5).ok(),
            Some(ProjectionSystem::Mercator)
        );
        assert!(matches!(
            MapProjectionFactory::system_from_code(31),
            Err(Error::Unsupported(_))
        ));
        assert!(MapProjectionFactory::system_from_code(-1).is_err());
    }

    #[test]
    fn utm_zones() -> Result<(), Error> {
        assert_eq!(MapProjectionFactory::utm_zone(40., -105.), 13);
        assert_eq!(MapProjectionFactory::utm_zone(-33.9, 18.4), -34);
        assert_eq!(MapProjectionFactory::utm_zone(0., -180.), 1);
        assert!(MapProjectionFactory::check_utm_zone(61).is_err());
        assert!(MapProjectionFactory::check_utm_zone(0).is_err());
        assert_eq!(MapProjectionFactory::check_utm_zone(-60)?, -60);

        // Zone derived from a packed location
        let factory = MapProjectionFactory::new();
        let parm = parameters(&[(0, pack_angle(-105.)), (1, pack_angle(40.))]);
        let utm = factory.projection(ProjectionSystem::Utm, 0, &parm, WGS84)?;
        assert_eq!(utm.zone(), 13);
        let parm = parameters(&[(0, pack_angle(18.4)), (1, pack_angle(-33.9))]);
        let utm = factory.projection(ProjectionSystem::Utm, 0, &parm, WGS84)?;
        assert_eq!(utm.zone(), -34);

        assert!(factory.projection(ProjectionSystem::Utm, 61, &[], WGS84).is_err());

        // Central meridian of zone 13 is 105W
        let utm = factory.projection(ProjectionSystem::Utm, 13, &[], WGS84)?;
        let (x, y) = utm.forward(0., (-105f64).to_radians())?;
        assert_float_eq!(x, 500_000., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn unsupported_and_malformed() {
        let factory = MapProjectionFactory::new();
        let spcs = factory.projection(ProjectionSystem::StatePlane, 3101, &[], 0);
        assert!(matches!(spcs, Err(Error::Unsupported(_))));

        let too_many = [0.0; 16];
        assert!(factory.projection(ProjectionSystem::Mercator, 0, &too_many, WGS84).is_err());

        // 61 minutes is not a valid packed angle
        let parm = parameters(&[(4, 10_061_000.)]);
        assert!(matches!(
            factory.projection(ProjectionSystem::Mercator, 0, &parm, WGS84),
            Err(Error::BadParam(..))
        ));
    }

    #[test]
    fn packed_parameters() -> Result<(), Error> {
        // Lambert conformal conic with 33N and 45N standard parallels,
        // origin at 23N 96W
        let factory = MapProjectionFactory::new();
        let parm = parameters(&[
            (2, pack_angle(33.)),
            (3, pack_angle(45.)),
            (4, pack_angle(-96.)),
            (5, pack_angle(23.)),
        ]);
        let lcc = factory.projection(ProjectionSystem::LambertConformalConic, 0, &parm, WGS84)?;
        let (x, y) = lcc.forward(23f64.to_radians(), (-96f64).to_radians())?;
        assert_float_eq!(x, 0., abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-6);

        let report = lcc.describe();
        let parallel = report.iter().find(|r| r.label == "1st Standard Parallel");
        assert_float_eq!(parallel.map_or(f64::NAN, |r| r.value), 33., abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn user_defined_spheroid() -> Result<(), Error> {
        let factory = MapProjectionFactory::new();
        let aff = Affine::centered(0., 0., [1000., 1000.], [100, 100]);

        // A sphere of radius 6400 km, given through the parameters
        let parm = parameters(&[(0, 6_400_000.)]);
        let m = factory.create(ProjectionSystem::Mercator, 0, &parm, -1, [100, 100], aff)?;
        assert_eq!(m.spheroid(), -1);
        assert_eq!(m.datum().name(), "User defined");
        assert_float_eq!(m.datum().axis(), 6_400_000., abs <= 1e-9);

        // UTM falls back to Clarke 1866
        let m = factory.create(ProjectionSystem::Utm, 13, &parm, -1, [100, 100], aff)?;
        assert_eq!(m.spheroid(), CLARKE1866);
        assert_eq!(m.datum().name(), "Clarke 1866");
        Ok(())
    }

    #[test]
    fn centered_mapping() -> Result<(), Error> {
        let factory = MapProjectionFactory::new();
        let center = EarthLocation::new(35., -120.);
        let m = factory.create_centered(
            ProjectionSystem::Orthographic,
            0,
            &parameters(&[(4, pack_angle(-120.)), (5, pack_angle(35.))]),
            SPHERE,
            [401, 401],
            &center,
            [4000., 4000.],
        )?;
        let loc = m.earth_location(&DataLocation::new(200., 200.));
        assert_float_eq!(loc.lat, 35., abs <= 1e-9);
        assert_float_eq!(loc.lon, -120., abs <= 1e-9);
        assert_eq!(m.pixel_dims(), [4000., 4000.]);

        let target = EarthLocation::with_datum(36., -119., m.datum());
        let back = m.data_location(&target);
        let there = m.earth_location(&back);
        assert_float_eq!(there.lat, 36., abs <= 1e-9);
        assert_float_eq!(there.lon, -119., abs <= 1e-9);
        assert!(!m.positive_lon());
        Ok(())
    }

    #[test]
    fn geographic_grid() -> Result<(), Error> {
        let factory = MapProjectionFactory::new();
        let aff = Affine::new(0., 0.25, -179.875, -0.25, 0., 89.875);
        let m = factory.create(ProjectionSystem::Geographic, 0, &[], WGS84, [720, 1440], aff)?;
        assert!(!m.positive_lon());
        let (lat, lon) = m.grid_to_earth(0., 0.);
        assert_float_eq!(lat, 89.875, abs <= 1e-9);
        assert_float_eq!(lon, -179.875, abs <= 1e-9);
        Ok(())
    }
}

use float_eq::assert_float_eq;
use mapproj::math::angular::pack_angle;
use mapproj::perspective::EllipsoidPerspective;
use mapproj::prelude::*;
use mapproj::spheroid::{CLARKE1866, WGS84};
use mapproj::swath::{GridGeolocation, SearchOutcome, Swath, SwathSession};
use std::sync::Arc;

const DIMS: [usize; 2] = [101, 101];

/// A GCTP parameter array from `(slot, value)` pairs, with angles in
/// decimal degrees packed on the way in
struct Case {
    system: ProjectionSystem,
    zone: i32,
    spheroid: i32,
    angles: &'static [(usize, f64)],
    values: &'static [(usize, f64)],
    center: (f64, f64),
}

impl Case {
    fn parameters(&self) -> [f64; 15] {
        let mut parm = [0.0; 15];
        for &(slot, degrees) in self.angles {
            parm[slot] = pack_angle(degrees);
        }
        for &(slot, value) in self.values {
            parm[slot] = value;
        }
        parm
    }
}

const fn case(
    system: ProjectionSystem,
    angles: &'static [(usize, f64)],
    values: &'static [(usize, f64)],
    center: (f64, f64),
) -> Case {
    Case {
        system,
        zone: 0,
        spheroid: WGS84,
        angles,
        values,
        center,
    }
}

#[rustfmt::skip]
fn cases() -> Vec<Case> {
    use ProjectionSystem as S;
    vec![
        Case { zone: 33, ..case(S::Utm, &[], &[], (55., 15.)) },
        case(S::Albers, &[(2, 29.5), (3, 45.5), (4, -96.), (5, 23.)], &[], (40., -100.)),
        case(S::LambertConformalConic, &[(2, 33.), (3, 45.), (4, -96.), (5, 23.)], &[], (40., -100.)),
        case(S::Mercator, &[(4, 0.), (5, 0.)], &[], (55., 12.)),
        case(S::PolarStereographic, &[(4, -45.), (5, 70.)], &[], (75., -40.)),
        case(S::Polyconic, &[(4, -96.), (5, 30.)], &[], (40., -90.)),
        case(S::EquidistantConic, &[(2, 29.5), (3, 45.5), (4, -96.), (5, 23.)], &[(8, 1.)], (40., -100.)),
        case(S::EquidistantConic, &[(2, 40.), (4, -96.), (5, 23.)], &[], (40., -100.)),
        case(S::TransverseMercator, &[(4, 9.)], &[(2, 0.9999)], (56., 10.)),
        case(S::Stereographic, &[(4, 10.), (5, 50.)], &[], (52., 12.)),
        case(S::LambertAzimuthal, &[(4, 10.), (5, 52.)], &[], (50., 15.)),
        case(S::AzimuthalEquidistant, &[(4, 0.), (5, 90.)], &[], (80., 30.)),
        case(S::Gnomonic, &[(4, -100.), (5, 40.)], &[], (42., -98.)),
        case(S::Orthographic, &[(4, 12.), (5, 55.)], &[], (55., 12.)),
        case(S::NearsidePerspective, &[(4, 0.), (5, 0.)], &[(2, 35_786_000.)], (10., 10.)),
        case(S::Sinusoidal, &[(4, 0.)], &[], (10., 10.)),
        case(S::Equirectangular, &[(4, 0.), (5, 30.)], &[], (10., 10.)),
        case(S::Miller, &[(4, 0.)], &[], (45., 100.)),
        case(S::VanDerGrinten, &[(4, 0.)], &[], (50., -160.)),
        case(S::HotineObliqueMercator, &[(3, 45.), (4, -100.), (5, 40.)], &[(2, 0.9996), (12, 1.)], (40., -100.)),
        case(S::HotineObliqueMercator, &[(5, 40.), (8, -110.), (9, 35.), (10, -90.), (11, 45.)], &[(2, 0.9996)], (40., -100.)),
        case(S::Robinson, &[(4, 0.)], &[], (50., -80.)),
        case(S::SpaceObliqueMercator, &[], &[(2, 5.), (3, 30.), (12, 1.)], (40., -80.)),
        case(S::SpaceObliqueMercator, &[(3, 98.2), (4, -80.)], &[(8, 98.8841202)], (40., -80.)),
        Case { spheroid: CLARKE1866, ..case(S::AlaskaConformal, &[], &[], (60., -150.)) },
        case(S::InterruptedGoode, &[], &[], (10., 10.)),
        case(S::Mollweide, &[(4, 0.)], &[], (45., 100.)),
        case(S::InterruptedMollweide, &[], &[], (10., 60.)),
        case(S::Hammer, &[(4, 0.)], &[], (45., 100.)),
        case(S::WagnerIV, &[(4, 0.)], &[], (45., 100.)),
        case(S::WagnerVII, &[(4, 0.)], &[], (45., 100.)),
        case(S::OblatedEqualArea, &[(4, -100.), (5, 45.), (8, 30.)], &[(2, 1.5), (3, 2.5)], (45., -100.)),
    ]
}

// ----- G R I D   M A P P I N G S -----------------------------------------------------

#[test]
fn every_family_through_the_factory() -> Result<(), Error> {
    let factory = MapProjectionFactory::new();
    for case in cases() {
        let (lat, lon) = case.center;
        let mapping = factory.create_centered(
            case.system,
            case.zone,
            &case.parameters(),
            case.spheroid,
            DIMS,
            &EarthLocation::new(lat, lon),
            [2000., 2000.],
        )?;
        assert_eq!(mapping.system(), case.system);
        assert!(!mapping.parameter_report().is_empty(), "{}", case.system);

        // The center of the grid is the requested center
        let (clat, clon) = mapping.grid_to_earth(50., 50.);
        assert_float_eq!(clat, lat, abs <= 1e-5, "{} center lat", case.system);
        assert_float_eq!(clon, lon, abs <= 1e-5, "{} center lon", case.system);

        // Grid to earth and back, across the grid
        for (row, col) in [(0., 0.), (0., 100.), (100., 0.), (100., 100.), (25.5, 74.25)] {
            let (lat, lon) = mapping.grid_to_earth(row, col);
            assert!(lat.is_finite() && lon.is_finite(), "{} at ({row}, {col})", case.system);
            let (r, c) = mapping.earth_to_grid(lat, lon);
            assert_float_eq!(r, row, abs <= 1e-3, "{} row at ({row}, {col})", case.system);
            assert_float_eq!(c, col, abs <= 1e-3, "{} col at ({row}, {col})", case.system);
        }
    }
    Ok(())
}

#[test]
fn geographic_mapping() -> Result<(), Error> {
    let factory = MapProjectionFactory::new();
    let center = EarthLocation::new(10., 20.);
    let mapping = factory.create_centered(
        ProjectionSystem::Geographic,
        0,
        &[],
        WGS84,
        DIMS,
        &center,
        [0.01, 0.01],
    )?;
    let (lat, lon) = mapping.grid_to_earth(0., 0.);
    assert_float_eq!(lat, 10.5, abs <= 1e-9);
    assert_float_eq!(lon, 19.5, abs <= 1e-9);
    let (row, col) = mapping.earth_to_grid(9.75, 20.25);
    assert_float_eq!(row, 75., abs <= 1e-9);
    assert_float_eq!(col, 75., abs <= 1e-9);
    Ok(())
}

#[test]
fn subsets_agree_with_the_full_grid() -> Result<(), Error> {
    let factory = MapProjectionFactory::new();
    let parm = [0., 0., 0., 0., pack_angle(-96.), pack_angle(30.), 0., 0.];
    let full = factory.create_centered(
        ProjectionSystem::Polyconic,
        0,
        &parm,
        WGS84,
        [400, 400],
        &EarthLocation::new(40., -90.),
        [1000., 1000.],
    )?;
    let sub = full.subset(&DataLocation::new(100., 150.), [50, 50])?;
    let a = full.earth_location(&DataLocation::new(120., 170.));
    let b = sub.earth_location(&DataLocation::new(20., 20.));
    assert_float_eq!(a.lat, b.lat, abs <= 1e-12);
    assert_float_eq!(a.lon, b.lon, abs <= 1e-12);
    assert_eq!(sub.datum().name(), "WGS 84");
    Ok(())
}

#[test]
fn unsupported_systems() {
    let factory = MapProjectionFactory::new();
    let affine = Affine::identity();
    let spcs = factory.create(ProjectionSystem::StatePlane, 3101, &[], 0, DIMS, affine);
    assert!(matches!(spcs, Err(Error::Unsupported(_))));
    assert!(MapProjectionFactory::system_from_code(99).is_err());
}

// ----- S W A T H S -------------------------------------------------------------------

#[test]
fn swath_from_mapped_grid() -> Result<(), Error> {
    // Per-pixel geolocation taken from a mapping, then searched without it
    let factory = MapProjectionFactory::new();
    let mapping = factory.create_centered(
        ProjectionSystem::Mercator,
        0,
        &[],
        WGS84,
        [150, 150],
        &EarthLocation::new(45., 10.),
        [1000., 1000.],
    )?;
    let geo = GridGeolocation::from_fn([150, 150], |row, col| {
        mapping.grid_to_earth(row as f64, col as f64)
    });
    let swath = Swath::new(Arc::new(geo))?;

    let mut session = SwathSession::new();
    for (row, col) in [(57.3, 123.8), (10., 10.), (140., 75.)] {
        let target = mapping.earth_location(&DataLocation::new(row, col));
        let SearchOutcome::Found(loc) = swath.search(&mut session, &target) else {
            panic!("no match for ({row}, {col})");
        };
        assert_float_eq!(loc.row, row, abs <= 0.2);
        assert_float_eq!(loc.col, col, abs <= 0.2);

        let closest = swath.closest_by_search(&target);
        assert_eq!(closest, DataLocation::new(row, col).round());
    }
    Ok(())
}

#[test]
fn sensor_view() -> Result<(), Error> {
    // A geostationary view of 200 x 200 pixels of 100 microradians
    let view = EllipsoidPerspective::new(&[0., -75., 42164., 1e-4, 1e-4], [200, 200])?;
    let center = view.earth_location(&DataLocation::new(99.5, 99.5));
    assert_float_eq!(center.lat, 0., abs <= 1e-6);
    assert_float_eq!(center.lon, -75., abs <= 1e-6);

    for (row, col) in [(0., 0.), (10.5, 150.25), (199., 199.)] {
        let loc = DataLocation::new(row, col);
        let back = view.data_location(&view.earth_location(&loc));
        assert_float_eq!(back.row, row, abs <= 1e-6);
        assert_float_eq!(back.col, col, abs <= 1e-6);
    }
    assert!(view.boundary_handler().is_some());
    Ok(())
}

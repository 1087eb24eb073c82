//! mp: Map Projection. Read earth locations from stdin, and write the
//! corresponding grid locations (or the reverse, with `--inv`).
use clap::Parser;
use log::{debug, trace, warn};
use mapproj::prelude::*;
use std::io::{self, BufRead, Write};

/// The GCTP short names of the projection systems, in code order
const SHORT_NAMES: [&str; 31] = [
    "GEO", "UTM", "SPCS", "ALBERS", "LAMCC", "MERCAT", "PS", "POLYC", "EQUIDC", "TM", "STEREO",
    "LAMAZ", "AZMEQD", "GNOMON", "ORTHO", "GVNSP", "SNSOID", "EQRECT", "MILLER", "VGRINT", "HOM",
    "ROBIN", "SOM", "ALASKA", "GOOD", "MOLL", "IMOLL", "HAMMER", "WAGIV", "WAGVII", "OBEQA",
];

/// MP: Convert between earth locations, `lat lon` in degrees, and grid
/// locations, `row col`, on a north-up grid centered on a given location.
/// Angular projection parameters are given in packed DDDMMMSSS.SS format.
#[derive(Parser, Debug)]
#[clap(name = "mp")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Projection system: GCTP code, short name ("MERCAT") or full name
    #[clap(short, long, default_value = "GEO")]
    system: String,

    /// UTM zone, negative for the southern hemisphere. Zero derives the
    /// zone from the first two parameters
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    zone: i32,

    /// GCTP spheroid code, negative for axes given by the parameters
    #[clap(long, default_value_t = 12, allow_negative_numbers = true)]
    spheroid: i32,

    /// GCTP projection parameters, in slot order (at most 15)
    #[clap(short, long = "param", num_args = 1.., allow_negative_numbers = true)]
    parameters: Vec<f64>,

    /// Grid dimensions, rows and columns
    #[clap(long, num_args = 2, default_values_t = [512, 512])]
    dims: Vec<usize>,

    /// Latitude and longitude of the grid center, in degrees
    #[clap(long, num_args = 2, default_values_t = [0., 0.], allow_negative_numbers = true)]
    center: Vec<f64>,

    /// Pixel height and width, in map units
    #[clap(long, num_args = 2, default_values_t = [1000., 1000.])]
    pixel: Vec<f64>,

    /// Grid to map affine as the flat matrix `a d b e c f`, with
    /// `x = a*row + b*col + c` and `y = d*row + e*col + f`. Overrides
    /// `--center` and `--pixel`
    #[clap(long, num_args = 6, allow_negative_numbers = true)]
    affine: Option<Vec<f64>>,

    /// Inverse operation: read grid locations, write earth locations
    #[clap(long = "inv")]
    inverse: bool,

    /// Print the projection parameters and exit
    #[clap(long)]
    describe: bool,

    /// Number of decimals in the output
    #[clap(short = 'd', long, default_value_t = 6)]
    decimals: usize,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

/// The projection system named by a code, a GCTP short name, or a full
/// name, case insensitively
fn parse_system(name: &str) -> Result<ProjectionSystem, anyhow::Error> {
    if let Ok(code) = name.parse::<i32>() {
        return Ok(MapProjectionFactory::system_from_code(code)?);
    }
    let by_short_name = SHORT_NAMES
        .iter()
        .position(|s| s.eq_ignore_ascii_case(name))
        .and_then(|code| ProjectionSystem::from_code(code as i32));
    by_short_name
        .or_else(|| ProjectionSystem::named(name))
        .ok_or_else(|| anyhow::anyhow!("Unknown projection system '{name}'"))
}

/// The first two numbers of a line of input, if any
fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut numbers = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>);
    match (numbers.next(), numbers.next()) {
        (Some(Ok(a)), Some(Ok(b))) => Some((a, b)),
        _ => None,
    }
}

/// The grid mapping described by the command line
fn mapping(options: &Cli, system: ProjectionSystem) -> Result<MapProjection, anyhow::Error> {
    let factory = MapProjectionFactory::new();
    let dims = [options.dims[0], options.dims[1]];
    if let Some(flat) = &options.affine {
        let flat: [f64; 6] = flat
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("Expected 6 affine coefficients, got {}", flat.len()))?;
        let affine = Affine::from_flat(&flat);
        return Ok(factory.create(
            system,
            options.zone,
            &options.parameters,
            options.spheroid,
            dims,
            affine,
        )?);
    }
    let center = EarthLocation::new(options.center[0], options.center[1]);
    Ok(factory.create_centered(
        system,
        options.zone,
        &options.parameters,
        options.spheroid,
        dims,
        &center,
        [options.pixel[0], options.pixel[1]],
    )?)
}

/// The lines of the `--describe` output. Angles are also given in the
/// packed form used on the command line.
fn description(mapping: &MapProjection) -> Vec<String> {
    let mut lines = vec![format!("Projection system: {}", mapping.system())];
    if mapping.zone() != 0 {
        lines.push(format!("Zone: {}", mapping.zone()));
    }
    lines.push(format!("Spheroid: {}", mapping.spheroid_name()));
    for report in mapping.parameter_report() {
        match report.packed() {
            Some(packed) => lines.push(format!("{report} ({packed:.2} DDDMMMSSS.SS)")),
            None => lines.push(report.to_string()),
        }
    }
    let flat = |affine: Affine| {
        affine
            .to_flat()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    lines.push(format!("Grid to map affine: {}", flat(mapping.affine())));
    lines.push(format!("Map to grid affine: {}", flat(mapping.inverse_affine())));
    lines
}

fn main() -> Result<(), anyhow::Error> {
    let options = Cli::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();
    trace!("{options:#?}");

    let system = parse_system(&options.system)?;
    let mapping = mapping(&options, system)?;
    debug!("{system} on {}", mapping.datum());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if options.describe {
        for line in description(&mapping) {
            writeln!(out, "{line}")?;
        }
        return Ok(());
    }

    let decimals = options.decimals;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((a, b)) = parse_pair(line) else {
            warn!("Skipping malformed input: '{line}'");
            continue;
        };
        let (u, v) = if options.inverse {
            mapping.grid_to_earth(a, b)
        } else {
            mapping.earth_to_grid(a, b)
        };
        writeln!(out, "{u:.decimals$} {v:.decimals$}")?;
    }
    Ok(())
}

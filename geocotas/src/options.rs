use anyhow::{anyhow, Error as AnyError};
use clap::{Args, Parser, ValueEnum};
use cotas::{output::DECIMALS, talude::DEFAULT_ANGLE};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};

/// Elevation extraction and cut/fill sections from raster DTMs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Sample a raster at every pixel center.
    Extract(Extract),

    /// Interpolate design elevations (CotaEstaca, AlturaEstaca) along
    /// a line of stakes.
    Estacas(Estacas),

    /// Densify a line of stakes into terrain support points.
    Support(Support),

    /// Extract a terrain profile along a path.
    Profile(ProfileCmd),

    /// Close a design line against the terrain and measure cut and
    /// fill areas.
    Section(Section),
}

/// Where terrain elevations come from.
#[derive(Debug, Clone, Args)]
pub struct TerrainArgs {
    /// Raster DTM (.hgt or .asc).
    #[arg(short, long, conflicts_with = "tile_dir")]
    pub raster: Option<PathBuf>,

    /// Directory of HGT tiles, loaded as needed.
    #[arg(short, long)]
    pub tile_dir: Option<PathBuf>,

    /// Read tiles into memory instead of memory mapping them.
    #[arg(long, default_value_t = false)]
    pub in_mem: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Geojson,
    Csv,
    Json,
    Kml,
}

#[derive(Debug, Clone, Args)]
pub struct Extract {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Write pixel outlines instead of pixel centers.
    #[arg(long, default_value_t = false)]
    pub cells: bool,

    /// Number of elevation classes used to color KML cells.
    #[arg(long, default_value_t = 5)]
    pub classes: usize,

    /// Extrude KML cells to their elevation.
    #[arg(long, default_value_t = false)]
    pub extrude: bool,

    /// Decimals kept in output elevations.
    #[arg(long, default_value_t = DECIMALS)]
    pub decimals: u32,

    /// Output file, stdout if omitted (required for KML).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Raster DTM (.hgt or .asc).
    pub raster: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Estacas {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Design elevation offset at the first stake.
    #[arg(long, allow_hyphen_values = true)]
    pub delta_first: f64,

    /// Design elevation offset at the last stake.
    #[arg(long, allow_hyphen_values = true)]
    pub delta_last: f64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Decimals kept in output values.
    #[arg(long, default_value_t = DECIMALS)]
    pub decimals: u32,

    /// Output file, stdout if omitted.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// GeoJSON stakes, in order. Elevations come from each point's
    /// third coordinate or, failing that, from the terrain.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Support {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Sample spacing, defaults to the terrain's pixel size.
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Decimals kept in output values.
    #[arg(long, default_value_t = DECIMALS)]
    pub decimals: u32,

    /// Output file, stdout if omitted.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// GeoJSON stakes with an AlturaEstaca property, in order.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileOutput {
    /// Print "distance,x,y,elevation" to stdout.
    Csv,
    /// Print JSON to stdout.
    Json,
    /// Plot to terminal.
    Plot,
}

#[derive(Debug, Clone, Args)]
pub struct ProfileCmd {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Maximum distance between samples.
    #[arg(short, long, default_value_t = 1.0)]
    pub step: f64,

    /// Give up after this many seconds.
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Path vertex "x,y"; repeat for each vertex.
    #[arg(long = "at", required_unless_present = "input", allow_hyphen_values = true)]
    pub path: Vec<XY>,

    /// GeoJSON file holding the path as its first LineString.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(value_enum, default_value_t = ProfileOutput::Csv)]
    pub output: ProfileOutput,
}

#[derive(Debug, Clone, Args)]
pub struct Section {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Face inclination in degrees.
    #[arg(short, long, default_value_t = DEFAULT_ANGLE)]
    pub angle: f64,

    /// Terrain sample spacing, defaults to the terrain's pixel size.
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Decimals kept in the report.
    #[arg(long, default_value_t = DECIMALS)]
    pub decimals: u32,

    /// Plot the section to the terminal.
    #[arg(long, default_value_t = false)]
    pub plot: bool,

    /// Also draw the section to this SVG file.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// GeoJSON stakes with CotaEstaca and AlturaEstaca properties, in
    /// order.
    pub input: PathBuf,
}

/// A planar "x,y" pair.
#[derive(Clone, Debug, Copy)]
pub struct XY(pub Coord<f64>);

impl FromStr for XY {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (x_str, y_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid x,y pair"))?;
        let x = f64::from_str(x_str.trim())?;
        let y = f64::from_str(y_str.trim())?;
        Ok(Self(Coord { x, y }))
    }
}

//! Command-line argument parsing.
//!
//! Flags override values read from the config file, which in turn override
//! the built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use geoform::MapConfig;

#[derive(Parser, Debug)]
#[command(
    name = "geoform",
    about = "Build extruded map geometry from a GeoJSON feature collection"
)]
pub struct CliArgs {
    /// GeoJSON file to read.
    pub input: PathBuf,

    /// TOML map configuration.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Anchor longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Anchor latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Planet radius in meters.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Reference up axis as `x,y,z`.
    #[arg(long, value_parser = parse_axis, allow_hyphen_values = true)]
    pub up: Option<[f64; 3]>,

    /// Add a 10° graticule to the line features.
    #[arg(long)]
    pub graticule: bool,

    /// Write the generated groups as JSON to this file.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl CliArgs {
    /// Apply flag overrides on top of `config`.
    pub fn apply(&self, config: &mut MapConfig) {
        let projection = &mut config.projection;
        if let Some(lon) = self.lon {
            projection.anchor.lon = lon;
        }
        if let Some(lat) = self.lat {
            projection.anchor.lat = lat;
        }
        if let Some(radius) = self.radius {
            projection.planet_radius = radius;
        }
        if let Some(up) = self.up {
            projection.reference_up = up;
        }
        config.layers.graticule |= self.graticule;
    }
}

/// Parse an `x,y,z` triple.
fn parse_axis(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let component = |v: &str| v.parse::<f64>().map_err(|e| format!("invalid component '{v}': {e}"));
    Ok([component(*x)?, component(*y)?, component(*z)?])
}

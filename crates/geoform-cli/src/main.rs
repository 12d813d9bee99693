//! Command-line front end for geoform.
//!
//! Reads a GeoJSON feature collection, runs one map pass and prints a summary
//! of the generated groups. With `--output` the groups are also written as
//! JSON for inspection or for loading into another tool.

mod args;
mod error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use geoform::graticule::graticule10;
use geoform::{FeatureCollection, Group, MapBuilder, MapConfig, MapGroups};

use crate::args::CliArgs;
use crate::error::CliError;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(groups) => {
            print_summary(&groups);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<MapGroups, CliError> {
    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    args.apply(&mut config);

    let projector = config.projector()?;
    let features = read_features(&args.input)?;
    tracing::info!(
        path = %args.input.display(),
        features = features.len(),
        "loaded feature collection"
    );

    let builder = MapBuilder::new(&projector);
    let mut groups = builder.build(&features);
    if config.layers.graticule {
        builder.add_lines(&mut groups, &graticule10());
    }

    if let Some(path) = &args.output {
        write_groups(path, &groups)?;
        tracing::info!(path = %path.display(), "wrote map groups");
    }
    Ok(groups)
}

fn read_features(path: &Path) -> Result<FeatureCollection, CliError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| CliError::Read(path.to_path_buf(), e))?;
    content
        .parse()
        .map_err(|e| CliError::Import(path.to_path_buf(), e))
}

fn write_groups(path: &Path, groups: &MapGroups) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| CliError::Write(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, groups)?;
    writer
        .flush()
        .map_err(|e| CliError::Write(path.to_path_buf(), e))
}

fn print_summary(groups: &MapGroups) {
    for group in Group::ALL {
        println!("{:<14}{:>6}", group.name(), groups.group(group).len());
    }

    let report = &groups.report;
    if !report.skipped.is_empty() {
        let skipped: Vec<String> = report
            .skipped
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect();
        println!("{:<14}{}", "skipped", skipped.join(", "));
    }
    for failure in &report.failures {
        println!(
            "{:<14}feature {} ({}): {}",
            "failed", failure.index, failure.group, failure.error
        );
    }

    if let Some(bounds) = groups.bounds() {
        let size = bounds.size();
        println!(
            "{:<14}{:.1} x {:.1} x {:.1} m",
            "extent", size.x, size.y, size.z
        );
    }
}

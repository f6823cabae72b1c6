mod estacas;
mod extract;
mod kml_cells;
mod layer;
mod options;
mod plot;
mod profile;
mod progress;
mod section;
mod sink;
mod support;
mod terrain;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse() {
        Cli::Extract(extract) => extract.run(),
        Cli::Estacas(estacas) => estacas.run(),
        Cli::Support(support) => support.run(),
        Cli::Profile(profile) => profile.run(),
        Cli::Section(section) => section.run(),
    }
}

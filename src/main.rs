// sample-packages - Sample VM sizing packages
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sample_packages::config::{Config, Settings};
use sample_packages::generator::generate_named;
use sample_packages::output::write_json;
use sample_packages::{debug, error, info};

#[derive(Parser)]
#[command(name = "sample-packages")]
#[command(about = "Generate a sample set of VM sizing packages as JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the package list as JSON (default)
    Generate {
        /// key=value file overriding the built-in sizes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the effective settings
    Config {
        /// key=value file overriding the built-in sizes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate { config }) => generate(config),
        Some(Commands::Config { config }) => show_config(config),
        None => generate(None),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings, Box<dyn std::error::Error>> {
    let config = Config::load(path.as_deref())?;
    Ok(Settings::from_config(&config)?)
}

/// Generate packages and write them to stdout
fn generate(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(path)?;

    let pkgs = generate_named(
        &settings.name_prefix,
        &settings.top,
        &settings.scale_factors,
        settings.cpu_cap_floor,
    )?;
    debug!("Generated {} packages", pkgs.len());

    write_json(io::stdout().lock(), &pkgs)?;
    Ok(())
}

/// Print effective settings as key=value lines
fn show_config(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(path)?;

    info!(
        "{} sizes, top package {} MB RAM",
        settings.scale_factors.len(),
        settings.top.max_physical_memory
    );
    for (key, value) in settings.config_pairs() {
        println!("{}={}", key, value);
    }
    Ok(())
}

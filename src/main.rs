//! postman-from-routes - Command-line tool for exporting API routes as a Postman collection.
//!
//! Reads a route table dumped from the host web framework, keeps the routes tagged with the
//! `api` middleware and writes a Postman v2.1.0 collection grouping them into folders.
//!
//! # Usage
//!
//! ```bash
//! postman-from-routes [OPTIONS] <ROUTES_FILE>
//! ```
//!
//! # Examples
//!
//! Export a Laravel application's routes:
//! ```bash
//! php artisan route:list --json > routes.json
//! postman-from-routes routes.json -c postman.yaml
//! ```
//!
//! Fill request bodies from a Rust project's validation structs:
//! ```bash
//! postman-from-routes routes.json --source ./src -o ./postman
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! postman-from-routes routes.json -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use postman_from_routes::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("postman-from-routes starting...");

    let args = cli::parse_args_from_parsed(args)?;
    let path = cli::run(args)?;

    info!("Path: {}", path.display());
    println!("{}", path.display());

    Ok(())
}

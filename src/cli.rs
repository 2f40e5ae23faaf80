use crate::collection::build_collection;
use crate::config::{ExportConfig, IgnoreMatching};
use crate::routes::{RouteSource, RouteTableFile};
use crate::rules::{ChainedRules, NoRules, RuleProvider, StaticRules};
use crate::serializer::write_collection;
use crate::source::SourceRules;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Postman collection exporter - turns a web application's API routes into a Postman collection
#[derive(Parser, Debug)]
#[command(name = "postman-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route table file (JSON or YAML, e.g. the output of `php artisan route:list --json`)
    #[arg(value_name = "ROUTES_FILE")]
    pub routes_path: PathBuf,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Base URL for the `app_url` collection variable
    #[arg(long = "app-url", value_name = "URL")]
    pub app_url: Option<String>,

    /// Collection name
    #[arg(short = 'n', long = "name")]
    pub collection_name: Option<String>,

    /// Port appended to the base URL
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory the collection is written to
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Additional URI glob to ignore (repeatable)
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Evaluate every ignore pattern instead of only the first one
    #[arg(long = "all-ignore-patterns")]
    pub all_ignore_patterns: bool,

    /// Rust project scanned for validation structs
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source_path: Option<PathBuf>,

    /// Do not fill request bodies from validation rules
    #[arg(long = "no-fields")]
    pub no_fields: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Loads the configuration file (or defaults) and applies command-line overrides
    pub fn resolve_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config_path {
            Some(path) => ExportConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => ExportConfig::default(),
        };

        if let Some(app_url) = &self.app_url {
            config.app_url = app_url.clone();
        }
        if let Some(name) = &self.collection_name {
            config.collection_name = name.clone();
        }
        if self.port.is_some() {
            config.port = self.port;
        }
        if let Some(output) = &self.output_path {
            config.output_path = output.clone();
        }
        config.ignored_routes.extend(self.ignore.iter().cloned());
        if self.all_ignore_patterns {
            config.ignore_matching = IgnoreMatching::AllPatterns;
        }
        if let Some(source) = &self.source_path {
            config.source_path = Some(source.clone());
        }
        if self.no_fields {
            config.include_fields = false;
        }

        config.validate()?;
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.routes_path.is_file() {
        anyhow::bail!("Route table not found: {}", args.routes_path.display());
    }

    if let Some(source) = &args.source_path {
        if !source.is_dir() {
            anyhow::bail!("Source path is not a directory: {}", source.display());
        }
    }

    info!("Route table: {}", args.routes_path.display());
    if let Some(config) = &args.config_path {
        info!("Configuration: {}", config.display());
    }

    Ok(args)
}

/// Run the export and return the path of the written collection
pub fn run(args: CliArgs) -> Result<PathBuf> {
    let config = args.resolve_config()?;

    info!("Loading routes...");
    let routes = RouteTableFile::new(args.routes_path.clone())
        .routes()
        .with_context(|| format!("Failed to load routes from {}", args.routes_path.display()))?;
    info!("Loaded {} routes", routes.len());

    let static_rules = StaticRules::from(config.rules.clone());
    if !static_rules.is_empty() {
        debug!("Using {} configured validation rules", config.rules.len());
    }
    let source_rules = match (&config.source_path, config.include_fields) {
        (Some(path), true) => {
            info!("Scanning {} for validation structs...", path.display());
            let rules = SourceRules::scan(path)
                .with_context(|| format!("Failed to scan source path {}", path.display()))?;
            for warning in rules.index().warnings() {
                warn!("{}", warning);
            }
            Some(rules)
        }
        _ => None,
    };

    let mut chain = ChainedRules::new();
    if config.include_fields {
        chain = chain.with(&static_rules);
        if let Some(rules) = &source_rules {
            chain = chain.with(rules);
        }
    } else {
        info!("Request body fields disabled");
        chain = chain.with(&NoRules);
    }
    let rules: &dyn RuleProvider = &chain;

    info!("Building collection '{}'...", config.collection_name);
    let document = build_collection(&routes, &config, rules)?;

    let path = write_collection(&document, &config.output_path)?;
    info!("Postman collection exported successfully");

    Ok(path)
}

//! postman-from-routes - Postman collections from a web application's route table.
//!
//! This library turns the routes registered in a web application into a Postman v2.1.0
//! collection: requests grouped into folders that mirror the URI structure, with request
//! bodies pre-filled from the validation objects the handlers accept.
//!
//! # Pipeline
//!
//! 1. [`routes`] - Loads the route table (method, URI, handler, middleware)
//! 2. [`filter`] - Keeps api-tagged controller routes, drops `HEAD` and ignored URIs
//! 3. [`normalizer`] - Strips `api/`, version and parameter segments; names request items
//! 4. [`tree`] - Files each request into an arena-backed folder tree
//! 5. [`rules`] - Looks up validated input fields through a [`rules::RuleProvider`]
//! 6. [`collection`] - Builds the collection document from the tree
//! 7. [`serializer`] - Writes pretty-printed JSON to `<dir>/<name> <timestamp>.json`
//!
//! [`source`] provides a rule provider that reads `#[derive(Validate)]` structs and handler
//! signatures out of a Rust project; [`config`] holds the export settings.
//!
//! # Example Usage
//!
//! ```no_run
//! use postman_from_routes::{
//!     collection::build_collection,
//!     config::ExportConfig,
//!     routes::{RouteSource, RouteTableFile},
//!     rules::StaticRules,
//!     serializer::write_collection,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let routes = RouteTableFile::new(PathBuf::from("routes.json")).routes().unwrap();
//! let config = ExportConfig::default();
//! let rules = StaticRules::new().with_rule("UserController@store", ["name", "email"]);
//!
//! let document = build_collection(&routes, &config, &rules).unwrap();
//! let path = write_collection(&document, Path::new("./postman")).unwrap();
//! println!("Wrote {}", path.display());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod naming;
pub mod normalizer;
pub mod routes;
pub mod rules;
pub mod serializer;
pub mod source;
pub mod tree;

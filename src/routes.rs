//! Route table input for the export pipeline.
//!
//! The host web framework owns its router; this module only models the read-only view the
//! exporter needs of each registered route and loads that view from a route table file.
//!
//! # Route table format
//!
//! A JSON (or YAML) array of entries. The shape printed by `php artisan route:list --json`
//! is accepted as-is:
//!
//! ```json
//! [
//!   {
//!     "method": "GET|HEAD",
//!     "uri": "api/v1/users/{id}",
//!     "action": "App\\Http\\Controllers\\UserController@show",
//!     "middleware": ["api", "auth:sanctum"]
//!   }
//! ]
//! ```
//!
//! # Example
//!
//! ```no_run
//! use postman_from_routes::routes::{RouteSource, RouteTableFile};
//! use std::path::PathBuf;
//!
//! let source = RouteTableFile::new(PathBuf::from("routes.json"));
//! let routes = source.routes().unwrap();
//! println!("Loaded {} routes", routes.len());
//! ```

use crate::error::{ExportError, Result};
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Trait for anything that can enumerate the host application's routes.
///
/// Implementations must yield routes in registration order, since that order decides the
/// order of the exported collection.
pub trait RouteSource {
    /// Returns every registered route, in registration order.
    fn routes(&self) -> Result<Vec<RouteRecord>>;
}

/// A single registered route, as seen by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// The route's HTTP method (the first one when the router lists several)
    pub http_method: HttpMethod,
    /// The URI template, e.g. `api/v1/users/{id}`
    pub uri: String,
    /// Middleware tags attached to the route
    pub middleware: Vec<String>,
    /// The controller method serving the route, `None` for closures
    pub handler: Option<HandlerId>,
}

/// HTTP methods a route can be registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    /// Any verb the exporter has no special handling for
    Other(String),
}

/// Identity of a named controller-method handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId {
    /// Controller type, possibly namespaced (`App\Http\Controllers\UserController`)
    pub controller: String,
    /// Method on the controller (`index`, `store`, ...)
    pub method: String,
}

impl HttpMethod {
    /// Parses a method name, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    /// Returns the upper-case wire name of the method
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Other(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HandlerId {
    /// Create a new HandlerId
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: method.into(),
        }
    }

    /// Parses a route action string into a handler identity.
    ///
    /// Accepts `Controller@method` and Rust-style `path::to::Controller::method`.
    /// Closures, empty actions and bare class names (no method) yield `None`.
    pub fn parse(action: &str) -> Option<Self> {
        let action = action.trim();
        if action.is_empty() || action == "Closure" {
            return None;
        }

        let (controller, method) = action
            .split_once('@')
            .or_else(|| action.rsplit_once("::"))?;

        if controller.is_empty() || method.is_empty() {
            return None;
        }

        Some(Self::new(controller, method))
    }

    /// The controller's unqualified type name (`UserController`)
    pub fn controller_name(&self) -> &str {
        self.controller
            .rsplit(['\\', '/'])
            .next()
            .and_then(|tail| tail.rsplit("::").next())
            .unwrap_or(&self.controller)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.method)
    }
}

impl RouteRecord {
    /// Create a new RouteRecord with no middleware and no handler
    pub fn new(http_method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            http_method,
            uri: uri.into(),
            middleware: Vec::new(),
            handler: None,
        }
    }

    /// Attach middleware tags
    pub fn with_middleware<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Bind the route to a controller method
    pub fn with_handler(mut self, controller: &str, method: &str) -> Self {
        self.handler = Some(HandlerId::new(controller, method));
        self
    }

    /// Whether the route carries the given middleware tag (exact match)
    pub fn has_middleware(&self, tag: &str) -> bool {
        self.middleware.iter().any(|m| m == tag)
    }
}

/// One entry of the on-disk route table.
#[derive(Debug, Deserialize)]
struct RawRoute {
    method: String,
    uri: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    middleware: MiddlewareList,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MiddlewareList {
    One(String),
    Many(Vec<String>),
}

impl Default for MiddlewareList {
    fn default() -> Self {
        MiddlewareList::Many(Vec::new())
    }
}

impl From<RawRoute> for RouteRecord {
    fn from(raw: RawRoute) -> Self {
        // "GET|HEAD" lists every verb; the first one is the route's method
        let primary = raw.method.split('|').next().unwrap_or_default();

        let middleware = match raw.middleware {
            MiddlewareList::One(tag) => vec![tag],
            MiddlewareList::Many(tags) => tags,
        };

        RouteRecord {
            http_method: HttpMethod::parse(primary),
            uri: raw.uri,
            middleware,
            handler: raw.action.as_deref().and_then(HandlerId::parse),
        }
    }
}

/// Route source backed by a JSON or YAML route table file.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, anything else as JSON.
pub struct RouteTableFile {
    path: PathBuf,
}

impl RouteTableFile {
    /// Creates a route source reading from `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

impl RouteSource for RouteTableFile {
    fn routes(&self) -> Result<Vec<RouteRecord>> {
        debug!("Reading route table: {}", self.path.display());

        let content = fs::read_to_string(&self.path).map_err(|source| ExportError::Io {
            path: self.path.clone(),
            source,
        })?;

        let raw: Vec<RawRoute> = if self.is_yaml() {
            serde_yaml::from_str(&content).map_err(|e| ExportError::RouteTable {
                path: self.path.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ExportError::RouteTable {
                path: self.path.clone(),
                message: e.to_string(),
            })?
        };

        debug!("Route table holds {} entries", raw.len());
        Ok(raw.into_iter().map(RouteRecord::from).collect())
    }
}

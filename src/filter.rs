//! Route selection.
//!
//! Decides which registered routes end up in the collection: only routes tagged with the api
//! middleware, served by a named controller method, not answering `HEAD`, and not matched by
//! the configured ignore list.

use crate::config::{ExportConfig, IgnoreMatching};
use crate::error::{ExportError, Result};
use crate::normalizer::ignore_subject;
use crate::routes::{HttpMethod, RouteRecord};
use glob::Pattern;
use log::debug;

/// Compiles ignore-list globs, failing on the first invalid one.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| ExportError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

/// Route filter built from the export configuration.
pub struct RouteFilter {
    api_middleware: String,
    ignored: Vec<Pattern>,
    matching: IgnoreMatching,
}

impl RouteFilter {
    /// Creates the filter, compiling the configured ignore patterns
    pub fn new(config: &ExportConfig) -> Result<Self> {
        Ok(Self {
            api_middleware: config.api_middleware.clone(),
            ignored: compile_patterns(&config.ignored_routes)?,
            matching: config.ignore_matching,
        })
    }

    /// Keeps the routes that should be exported, in their original order.
    pub fn filter<'r>(&self, routes: &'r [RouteRecord]) -> Vec<&'r RouteRecord> {
        routes.iter().filter(|route| self.accepts(route)).collect()
    }

    /// Whether a single route should be exported.
    pub fn accepts(&self, route: &RouteRecord) -> bool {
        if !route.has_middleware(&self.api_middleware) {
            return false;
        }

        if route.http_method == HttpMethod::Head {
            debug!("Skipping HEAD route {}", route.uri);
            return false;
        }

        if route.handler.is_none() {
            debug!("Skipping route without controller handler: {}", route.uri);
            return false;
        }

        if self.is_ignored(&route.uri) {
            debug!("Skipping ignored route {}", route.uri);
            return false;
        }

        true
    }

    /// Matches a URI against the ignore list.
    ///
    /// With [`IgnoreMatching::FirstPattern`] only the first pattern is consulted, so a URI
    /// matching the second or later pattern is still exported.
    pub fn is_ignored(&self, uri: &str) -> bool {
        let subject = ignore_subject(uri);

        match self.matching {
            IgnoreMatching::FirstPattern => self
                .ignored
                .first()
                .is_some_and(|pattern| pattern.matches(&subject)),
            IgnoreMatching::AllPatterns => {
                self.ignored.iter().any(|pattern| pattern.matches(&subject))
            }
        }
    }
}

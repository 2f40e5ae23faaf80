use crate::config::ExportConfig;
use crate::filter::RouteFilter;
use crate::normalizer::{item_name, NormalizedPath};
use crate::routes::{HttpMethod, RouteRecord};
use crate::rules::{FieldEnricher, RuleProvider};
use crate::tree::CollectionTree;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Schema URL identifying the Postman collection v2.1.0 format
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Name of the collection variable holding the base URL
pub const APP_URL_VARIABLE: &str = "app_url";

/// Collection builder
pub struct CollectionBuilder<'a> {
    /// Export settings (name, base URL, port)
    config: &'a ExportConfig,
    /// Supplies request body fields for handlers
    enricher: FieldEnricher<'a>,
    /// Folders and requests collected so far
    tree: CollectionTree,
}

/// Complete Postman collection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    /// Collection variables (only `app_url`)
    pub variable: Vec<Variable>,
    /// Collection info
    pub info: Info,
    /// Top-level folders and requests
    pub item: Vec<CollectionItem>,
}

/// Collection variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

/// Collection info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Collection name
    pub name: String,
    /// Schema URL
    pub schema: String,
}

/// An entry of an `item` array: either a folder or a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionItem {
    Folder(Folder),
    Request(RequestItem),
}

/// Folder object - groups requests and nested folders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub item: Vec<CollectionItem>,
}

/// Request item - one concrete request template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    /// Display name, e.g. "Users Index"
    pub name: String,
    /// The request itself
    pub request: Request,
}

/// Request object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method
    pub method: String,
    /// Request headers (always empty on export)
    pub header: Vec<Header>,
    /// Request body
    pub body: Body,
    /// Request URL
    pub url: Url,
}

/// Header object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Body encoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMode {
    /// `multipart/form-data`
    #[serde(rename = "formdata")]
    FormData,
    /// `application/x-www-form-urlencoded`
    #[serde(rename = "urlencoded")]
    UrlEncoded,
}

/// Request body object
///
/// Exactly one of `formdata`/`urlencoded` is present, matching `mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mode: BodyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formdata: Option<Vec<BodyField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urlencoded: Option<Vec<BodyField>>,
}

/// A single form field placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyField {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// URL object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    /// Full URL template, e.g. `{{app_url}}/api/users`
    pub raw: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
}

impl BodyMode {
    /// PUT and PATCH requests are sent URL-encoded, everything else as form data
    pub fn for_method(method: &HttpMethod) -> Self {
        match method {
            HttpMethod::Put | HttpMethod::Patch => BodyMode::UrlEncoded,
            _ => BodyMode::FormData,
        }
    }
}

impl BodyField {
    /// Create an empty text placeholder for `key`
    pub fn text(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
            field_type: "text".to_string(),
        }
    }
}

impl Body {
    /// Create an empty body in the given mode
    pub fn empty(mode: BodyMode) -> Self {
        let mut body = Self {
            mode,
            formdata: None,
            urlencoded: None,
        };
        body.set_fields(Vec::new());
        body
    }

    /// Fields of the active mode
    pub fn fields(&self) -> &[BodyField] {
        let fields = match self.mode {
            BodyMode::FormData => &self.formdata,
            BodyMode::UrlEncoded => &self.urlencoded,
        };
        fields.as_deref().unwrap_or_default()
    }

    /// Replace the fields of the active mode
    pub fn set_fields(&mut self, fields: Vec<BodyField>) {
        match self.mode {
            BodyMode::FormData => self.formdata = Some(fields),
            BodyMode::UrlEncoded => self.urlencoded = Some(fields),
        }
    }
}

impl Url {
    /// Build the URL object for a route URI, relative to the `app_url` variable
    pub fn for_uri(uri: &str) -> Self {
        let host = format!("{{{{{}}}}}", APP_URL_VARIABLE);
        let trimmed = uri.trim_start_matches('/');

        Self {
            raw: format!("{}/{}", host, trimmed),
            host: vec![host],
            path: trimmed
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl RequestItem {
    /// Create a request item with an empty body
    pub fn new(name: impl Into<String>, method: &str, uri: &str, mode: BodyMode) -> Self {
        Self {
            name: name.into(),
            request: Request {
                method: method.to_string(),
                header: Vec::new(),
                body: Body::empty(mode),
                url: Url::for_uri(uri),
            },
        }
    }

    /// Create the request item for a route
    pub fn from_route(route: &RouteRecord, name: impl Into<String>) -> Self {
        Self::new(
            name,
            route.http_method.as_str(),
            &route.uri,
            BodyMode::for_method(&route.http_method),
        )
    }

    pub fn body_fields(&self) -> &[BodyField] {
        self.request.body.fields()
    }
}

impl<'a> CollectionBuilder<'a> {
    /// Create a new CollectionBuilder
    pub fn new(config: &'a ExportConfig, rules: &'a dyn RuleProvider) -> Self {
        debug!("Initializing CollectionBuilder for '{}'", config.collection_name);
        Self {
            config,
            enricher: FieldEnricher::new(rules),
            tree: CollectionTree::new(),
        }
    }

    /// Add an already-filtered route to the collection.
    ///
    /// A route without a handler gets no body fields and is named after its path alone.
    pub fn add_route(&mut self, route: &RouteRecord) {
        let path = NormalizedPath::from_uri(&route.uri);
        let handler_method = route
            .handler
            .as_ref()
            .map(|h| h.method.as_str())
            .unwrap_or_default();

        let name = item_name(&path, &route.uri, handler_method);
        debug!("Creating item: {} ({} {})", name, route.http_method, route.uri);

        let mut item = RequestItem::from_route(route, name);

        if let Some(handler) = &route.handler {
            let fields = self.enricher.body_fields(handler);
            if !fields.is_empty() {
                debug!("Adding {} body fields from {}", fields.len(), handler);
                item.request.body.set_fields(fields);
            }
        }

        self.tree.insert(&path, item);
    }

    /// Number of requests added so far
    pub fn request_count(&self) -> usize {
        self.tree.request_count()
    }

    /// Build the final collection document
    pub fn build(self) -> CollectionDocument {
        debug!("Building final collection document");

        CollectionDocument {
            variable: vec![Variable {
                key: APP_URL_VARIABLE.to_string(),
                value: self.config.app_url_value(),
            }],
            info: Info {
                name: self.config.collection_name.clone(),
                schema: SCHEMA_URL.to_string(),
            },
            item: self.tree.flatten(),
        }
    }
}

/// Runs the filter, normalizer, tree builder and field enricher over a route table.
pub fn build_collection(
    routes: &[RouteRecord],
    config: &ExportConfig,
    rules: &dyn RuleProvider,
) -> crate::error::Result<CollectionDocument> {
    let filter = RouteFilter::new(config)?;
    let accepted = filter.filter(routes);
    info!(
        "{} of {} routes selected for export",
        accepted.len(),
        routes.len()
    );

    let mut builder = CollectionBuilder::new(config, rules);
    for route in accepted {
        builder.add_route(route);
    }
    debug!("Collection holds {} requests", builder.request_count());

    Ok(builder.build())
}

//! URI normalization: turns a route's URI template into the folder path it is filed under
//! and the name its request item is shown with.

use crate::naming::ucfirst;

/// Folder path derived from a route URI.
///
/// Holds the URI's segments with the `api` prefix, an optional `v<digits>` version segment,
/// every `{parameter}` segment and empty segments (leading/trailing slashes) removed.
/// Segment order follows the original URI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedPath {
    segments: Vec<String>,
}

impl NormalizedPath {
    /// Normalizes a raw URI template.
    ///
    /// ```
    /// use postman_from_routes::normalizer::NormalizedPath;
    ///
    /// let path = NormalizedPath::from_uri("api/v1/users/{user}/posts/");
    /// assert_eq!(path.segments(), ["users", "posts"]);
    /// ```
    pub fn from_uri(uri: &str) -> Self {
        let segments = strip_api_prefix(uri)
            .into_iter()
            .filter(|segment| !is_parameter(segment))
            .map(str::to_string)
            .collect();

        Self { segments }
    }

    /// Builds a path directly from segments, dropping empty ones
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path joined with `/`
    pub fn as_uri(&self) -> String {
        self.segments.join("/")
    }
}

/// Splits a URI into non-empty segments and removes a leading `api` segment together with
/// an immediately following version segment.
fn strip_api_prefix(uri: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();

    if segments.first() == Some(&"api") {
        segments.remove(0);
        if segments.first().is_some_and(|s| is_version(s)) {
            segments.remove(0);
        }
    }

    segments
}

fn is_parameter(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// `v1`, `v2`, `v10`, ...
fn is_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// The string ignore patterns are matched against.
///
/// Only the `api/` and version prefix are removed; parameters are kept, so a pattern like
/// `users/{id}` or `users/*` targets the URI the way it is written in the route file.
pub fn ignore_subject(uri: &str) -> String {
    strip_api_prefix(uri).join("/")
}

/// Name of the request item for a route.
///
/// The last normalized segment and the handler method, each with an upper-cased first
/// letter. A route whose normalized path is empty (e.g. `api/` itself) is named after its
/// raw URI instead, and `Root` stands in when even that is empty.
///
/// An empty `handler_method` leaves the method out (`"Users"`). Filtered routes always carry
/// a named handler; this only applies to routes handed to
/// [`CollectionBuilder::add_route`](crate::collection::CollectionBuilder::add_route)
/// directly without one.
pub fn item_name(path: &NormalizedPath, raw_uri: &str, handler_method: &str) -> String {
    let subject = match path.last() {
        Some(segment) => segment.to_string(),
        None => {
            let trimmed = raw_uri.trim_matches('/');
            if trimmed.is_empty() {
                "root".to_string()
            } else {
                trimmed.to_string()
            }
        }
    };

    if handler_method.is_empty() {
        return ucfirst(&subject);
    }

    format!("{} {}", ucfirst(&subject), ucfirst(handler_method))
}

//! Export configuration.
//!
//! Loaded once at startup from a YAML or JSON file (every key optional), then adjusted by
//! command-line overrides and passed by reference to each pipeline stage.
//!
//! ```yaml
//! app_url: http://localhost
//! collection_name: Shop API
//! port: 8000
//! ignored_routes:
//!   - "sanctum/*"
//! output_path: ./postman
//! source_path: ./src
//! rules:
//!   UserController@store: [name, email]
//! ```

use crate::error::{ExportError, Result};
use crate::filter::compile_patterns;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How the ignore list is evaluated against a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreMatching {
    /// Only the first configured pattern is consulted
    #[default]
    FirstPattern,
    /// A route is ignored when any pattern matches
    AllPatterns,
}

/// Settings for one export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Base URL stored in the `app_url` collection variable
    pub app_url: String,
    /// Collection name, also the output file name prefix
    pub collection_name: String,
    /// Port appended to `app_url` when set
    pub port: Option<u16>,
    /// Glob patterns of URIs to leave out
    pub ignored_routes: Vec<String>,
    /// Which ignore patterns are evaluated
    pub ignore_matching: IgnoreMatching,
    /// Directory the collection file is written to
    pub output_path: PathBuf,
    /// Middleware tag marking routes for export
    pub api_middleware: String,
    /// Whether request bodies are filled from validation rules
    pub include_fields: bool,
    /// Rust project scanned for validation structs
    pub source_path: Option<PathBuf>,
    /// Explicit `Controller@method -> fields` rules
    pub rules: HashMap<String, Vec<String>>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost".to_string(),
            collection_name: "API".to_string(),
            port: None,
            ignored_routes: Vec::new(),
            ignore_matching: IgnoreMatching::FirstPattern,
            output_path: PathBuf::from("."),
            api_middleware: "api".to_string(),
            include_fields: true,
            source_path: None,
            rules: HashMap::new(),
        }
    }
}

impl ExportConfig {
    /// Loads a configuration file; `.yaml`/`.yml` files are read as YAML, others as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: ExportConfig = if is_yaml {
            serde_yaml::from_str(&content)
                .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))?
        };

        Ok(config)
    }

    /// Checks the settings are usable before any route is processed.
    pub fn validate(&self) -> Result<()> {
        if self.app_url.trim().is_empty() {
            return Err(ExportError::Config("app_url must not be empty".to_string()));
        }

        if self.collection_name.trim().is_empty() {
            return Err(ExportError::Config(
                "collection_name must not be empty".to_string(),
            ));
        }

        if self.collection_name.contains(['/', '\\']) {
            return Err(ExportError::Config(format!(
                "collection_name '{}' must not contain path separators",
                self.collection_name
            )));
        }

        if self.api_middleware.trim().is_empty() {
            return Err(ExportError::Config(
                "api_middleware must not be empty".to_string(),
            ));
        }

        compile_patterns(&self.ignored_routes)?;

        Ok(())
    }

    /// Value of the `app_url` variable: the base URL plus `:port` when a port is set.
    ///
    /// A trailing `/` on `app_url` is dropped first, so `http://localhost/` with port 8000
    /// yields `http://localhost:8000` rather than the literal concatenation
    /// `http://localhost/:8000`. Request URLs add their own `/` after `{{app_url}}`.
    pub fn app_url_value(&self) -> String {
        let base = self.app_url.trim_end_matches('/');
        match self.port {
            Some(port) => format!("{}:{}", base, port),
            None => base.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();

        assert_eq!(config.app_url, "http://localhost");
        assert_eq!(config.collection_name, "API");
        assert_eq!(config.port, None);
        assert_eq!(config.ignore_matching, IgnoreMatching::FirstPattern);
        assert_eq!(config.api_middleware, "api");
        assert!(config.include_fields);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_with_partial_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.yaml");
        fs::write(
            &path,
            "app_url: https://shop.test\nport: 8080\nignored_routes:\n  - \"sanctum/*\"\nignore_matching: all_patterns\nrules:\n  UserController@store: [name, email]\n",
        )
        .unwrap();

        let config = ExportConfig::load(&path).unwrap();

        assert_eq!(config.app_url, "https://shop.test");
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.ignored_routes, vec!["sanctum/*".to_string()]);
        assert_eq!(config.ignore_matching, IgnoreMatching::AllPatterns);
        assert_eq!(config.collection_name, "API");
        assert_eq!(
            config.rules.get("UserController@store"),
            Some(&vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");
        fs::write(
            &path,
            r#"{"collection_name": "Shop", "include_fields": false, "output_path": "out"}"#,
        )
        .unwrap();

        let config = ExportConfig::load(&path).unwrap();

        assert_eq!(config.collection_name, "Shop");
        assert!(!config.include_fields);
        assert_eq!(config.output_path, PathBuf::from("out"));
    }

    #[test]
    fn test_load_rejects_unknown_ignore_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.yaml");
        fs::write(&path, "ignore_matching: sometimes\n").unwrap();

        assert!(matches!(
            ExportConfig::load(&path),
            Err(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let config = ExportConfig {
            app_url: "  ".to_string(),
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            collection_name: String::new(),
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            collection_name: "../escape".to_string(),
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = ExportConfig {
            ignored_routes: vec!["users/[".to_string()],
            ..ExportConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ExportError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_app_url_value() {
        let mut config = ExportConfig {
            app_url: "http://localhost/".to_string(),
            ..ExportConfig::default()
        };
        assert_eq!(config.app_url_value(), "http://localhost");

        config.port = Some(8000);
        assert_eq!(config.app_url_value(), "http://localhost:8000");

        config.app_url = "https://api.example.com//".to_string();
        config.port = None;
        assert_eq!(config.app_url_value(), "https://api.example.com");
    }
}

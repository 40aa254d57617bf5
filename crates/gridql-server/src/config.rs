//! Server configuration.
//!
//! Loaded from `gridql.toml`. Region declarations deserialize into the
//! store's collection descriptors, so the file is the single place the
//! grid's schema-relevant metadata is declared.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [graphql]
//! enabled = true
//!
//! [[regions]]
//! name = "Person"
//! indexed = ["firstName"]
//!
//! [regions.value]
//! name = "Person"
//!
//! [[regions.value.fields]]
//! name = "firstName"
//! type = "string"
//! ```

use std::path::{Path, PathBuf};

use gridql_graphql::GraphQLConfig;
use gridql_store::{CollectionDescriptor, ScalarKind, ValueConstraint};
use serde::{Deserialize, Serialize};

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address settings.
    #[serde(default)]
    pub server: ListenConfig,

    /// GraphQL layer settings.
    #[serde(default)]
    pub graphql: GraphQLConfig,

    /// Grid region declarations.
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

/// Listen address settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// One declared grid region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Region name.
    pub name: String,

    /// Declared key scalar kind (string when omitted).
    #[serde(default)]
    pub key: Option<ScalarKind>,

    /// Declared value constraint (scalar string when omitted).
    #[serde(default)]
    pub value: Option<ValueConstraint>,

    /// Field names carrying a secondary index.
    #[serde(default)]
    pub indexed: Vec<String>,
}

impl RegionConfig {
    /// The store descriptor for this region.
    #[must_use]
    pub fn descriptor(&self) -> CollectionDescriptor {
        CollectionDescriptor {
            name: self.name.clone(),
            key: self.key,
            value: self.value.clone(),
        }
    }
}

impl ServerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.graphql.validate()?;
        for (i, region) in self.regions.iter().enumerate() {
            if region.name.is_empty() {
                return Err(format!("regions[{i}].name must not be empty"));
            }
            if self.regions[..i].iter().any(|r| r.name == region.name) {
                return Err(format!("duplicate region name: {}", region.name));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Loads configuration from the given path.
///
/// A missing file yields the default configuration so the server can start
/// without one.
///
/// # Errors
///
/// Returns an error for unreadable or malformed files.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        return Ok(ServerConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource {
    /// From `--config` CLI argument.
    CliArgument,
    /// From the `GRIDQL_CONFIG` environment variable.
    EnvironmentVariable,
    /// Default path (`gridql.toml`).
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (GRIDQL_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolves the configuration file path.
///
/// Priority order:
/// 1. CLI argument: `--config <path>`
/// 2. `GRIDQL_CONFIG` environment variable
/// 3. `gridql.toml` in the working directory
pub fn resolve_config_path() -> (PathBuf, ConfigSource) {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return (PathBuf::from(path), ConfigSource::CliArgument);
        }
    }

    if let Ok(path) = std::env::var("GRIDQL_CONFIG") {
        return (PathBuf::from(path), ConfigSource::EnvironmentVariable);
    }

    (PathBuf::from("gridql.toml"), ConfigSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridql_store::FieldType;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_full_config_round_trip() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [graphql]
            max_depth = 10

            [[regions]]
            name = "Foo"

            [[regions]]
            name = "Person"
            key = "string"
            indexed = ["firstName"]

            [regions.value]
            name = "Person"
            doc = "A person in the grid"

            [[regions.value.fields]]
            name = "firstName"
            type = "string"

            [[regions.value.fields]]
            name = "friends"
            type = "string"
            connection = "Person"

            [[regions.value.fields]]
            name = "address"

            [regions.value.fields.type]
            name = "Address"

            [[regions.value.fields.type.fields]]
            name = "city"
            type = "string"
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.graphql.max_depth, 10);
        assert_eq!(config.regions.len(), 2);

        let person = config.regions[1].descriptor();
        assert_eq!(person.name, "Person");
        assert_eq!(config.regions[1].indexed, vec!["firstName"]);

        let ValueConstraint::Composite(td) = person.value_constraint() else {
            panic!("expected composite value");
        };
        assert!(td.field("friends").unwrap().is_connection());
        assert!(matches!(
            td.field("address").unwrap().field_type,
            FieldType::Composite(_)
        ));
    }

    #[test]
    fn test_duplicate_region_names_rejected() {
        let config: ServerConfig = toml::from_str(
            r#"
            [[regions]]
            name = "Foo"

            [[regions]]
            name = "Foo"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/gridql.toml")).unwrap();
        assert!(config.regions.is_empty());
    }
}

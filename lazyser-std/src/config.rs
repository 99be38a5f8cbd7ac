//! Dispatcher configuration: the three static lookup tables.
//!
//! A [`DispatcherConfig`] is fixed once it reaches the dispatcher. Build it
//! with [`DispatcherConfigBuilder`], or load it from JSON application config:
//!
//! ```json
//! {
//!     "encoders": { "json": "svc.json_encoder" },
//!     "normalizers": { "app::User": "svc.user_normalizer" },
//!     "default_normalizers": ["svc.generic_normalizer"]
//! }
//! ```

use serde::Deserialize;
use std::{any::Any, collections::HashMap};
use thiserror::Error;

/// Errors that can occur while building or loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON source could not be parsed.
    #[error("invalid dispatcher configuration")]
    Parse(#[from] serde_json::Error),

    /// A table key or identifier is empty.
    #[error("empty {0} in dispatcher configuration")]
    Empty(&'static str),

    /// The same key was mapped twice while building.
    #[error("duplicate {table} mapping for `{key}`")]
    Duplicate {
        /// Which table the key belongs to.
        table: &'static str,
        /// The repeated key.
        key: String,
    },
}

/// Static lookup tables for a lazy serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Format name → encoder identifier.
    #[serde(rename = "encoders")]
    format_to_identifier: HashMap<String, String>,
    /// Type name → normalizer identifier.
    #[serde(rename = "normalizers")]
    class_to_identifier: HashMap<String, String>,
    /// Normalizer identifiers activated when no type mapping applies.
    #[serde(rename = "default_normalizers")]
    default_identifiers: Vec<String>,
}

impl DispatcherConfig {
    /// Start building a configuration.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::new()
    }

    /// Load and validate a configuration from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// The encoder identifier mapped to `format`.
    pub fn encoder_for(&self, format: &str) -> Option<&str> {
        self.format_to_identifier.get(format).map(String::as_str)
    }

    /// The normalizer identifier mapped to `type_name`.
    pub fn normalizer_for(&self, type_name: &str) -> Option<&str> {
        self.class_to_identifier.get(type_name).map(String::as_str)
    }

    /// Default normalizer identifiers, in preference order.
    pub fn default_normalizers(&self) -> &[String] {
        &self.default_identifiers
    }

    /// Iterate over `(format, identifier)` pairs.
    pub fn encoders(&self) -> impl Iterator<Item = (&str, &str)> {
        self.format_to_identifier
            .iter()
            .map(|(format, id)| (format.as_str(), id.as_str()))
    }

    /// Iterate over `(type name, identifier)` pairs.
    pub fn normalizers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.class_to_identifier
            .iter()
            .map(|(type_name, id)| (type_name.as_str(), id.as_str()))
    }

    /// Check if all three tables are empty.
    pub fn is_empty(&self) -> bool {
        self.format_to_identifier.is_empty()
            && self.class_to_identifier.is_empty()
            && self.default_identifiers.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (format, id) in &self.format_to_identifier {
            if format.is_empty() {
                return Err(ConfigError::Empty("format name"));
            }
            if id.is_empty() {
                return Err(ConfigError::Empty("encoder identifier"));
            }
        }
        for (type_name, id) in &self.class_to_identifier {
            if type_name.is_empty() {
                return Err(ConfigError::Empty("type name"));
            }
            if id.is_empty() {
                return Err(ConfigError::Empty("normalizer identifier"));
            }
        }
        if self.default_identifiers.iter().any(String::is_empty) {
            return Err(ConfigError::Empty("default normalizer identifier"));
        }
        Ok(())
    }
}

// ============================================================================
// DispatcherConfigBuilder
// ============================================================================

/// Builder for [`DispatcherConfig`].
///
/// # Example
/// ```ignore
/// let config = DispatcherConfig::builder()
///     .encoder("json", "svc.json_encoder")
///     .normalizer_for::<User>("svc.user_normalizer")
///     .default_normalizer("svc.generic_normalizer")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
    duplicate: Option<ConfigError>,
}

impl DispatcherConfigBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `format` to an encoder identifier.
    pub fn encoder(mut self, format: impl Into<String>, id: impl Into<String>) -> Self {
        let format = format.into();
        if self.config.format_to_identifier.contains_key(&format) {
            self.note_duplicate("encoder", format);
        } else {
            self.config.format_to_identifier.insert(format, id.into());
        }
        self
    }

    /// Map a type name to a normalizer identifier.
    pub fn normalizer(mut self, type_name: impl Into<String>, id: impl Into<String>) -> Self {
        let type_name = type_name.into();
        if self.config.class_to_identifier.contains_key(&type_name) {
            self.note_duplicate("normalizer", type_name);
        } else {
            self.config.class_to_identifier.insert(type_name, id.into());
        }
        self
    }

    /// Map `T` to a normalizer identifier.
    pub fn normalizer_for<T: Any>(self, id: impl Into<String>) -> Self {
        self.normalizer(std::any::type_name::<T>(), id)
    }

    /// Append a default normalizer identifier.
    pub fn default_normalizer(mut self, id: impl Into<String>) -> Self {
        self.config.default_identifiers.push(id.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// The first duplicate mapping, or an empty key or identifier.
    pub fn build(self) -> Result<DispatcherConfig, ConfigError> {
        if let Some(err) = self.duplicate {
            return Err(err);
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn note_duplicate(&mut self, table: &'static str, key: String) {
        if self.duplicate.is_none() {
            self.duplicate = Some(ConfigError::Duplicate { table, key });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    #[test]
    fn test_builder_populates_tables() {
        let config = DispatcherConfig::builder()
            .encoder("json", "svc.json_encoder")
            .normalizer_for::<User>("svc.user_normalizer")
            .default_normalizer("svc.a")
            .default_normalizer("svc.b")
            .build()
            .unwrap();

        assert_eq!(config.encoder_for("json"), Some("svc.json_encoder"));
        assert_eq!(config.encoder_for("xml"), None);
        assert_eq!(
            config.normalizer_for(std::any::type_name::<User>()),
            Some("svc.user_normalizer")
        );
        assert_eq!(config.default_normalizers(), ["svc.a", "svc.b"]);
    }

    #[test]
    fn test_table_iterators() {
        let config = DispatcherConfig::builder()
            .encoder("json", "svc.json_encoder")
            .encoder("csv", "svc.csv_encoder")
            .normalizer_for::<User>("svc.user_normalizer")
            .build()
            .unwrap();

        let mut encoders: Vec<_> = config.encoders().collect();
        encoders.sort_unstable();
        assert_eq!(
            encoders,
            [("csv", "svc.csv_encoder"), ("json", "svc.json_encoder")]
        );
        assert_eq!(
            config.normalizers().collect::<Vec<_>>(),
            [(std::any::type_name::<User>(), "svc.user_normalizer")]
        );
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let err = DispatcherConfig::builder()
            .encoder("json", "svc.a")
            .encoder("json", "svc.b")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Duplicate { table: "encoder", ref key } if key == "json"
        ));
    }

    #[test]
    fn test_builder_rejects_empty_identifier() {
        let err = DispatcherConfig::builder()
            .default_normalizer("")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Empty(_)));
    }

    #[test]
    fn test_from_json_str() {
        let config = DispatcherConfig::from_json_str(
            r#"{
                "encoders": { "json": "svc.json_encoder" },
                "normalizers": { "app::User": "svc.user_normalizer" },
                "default_normalizers": ["svc.generic_normalizer"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.encoder_for("json"), Some("svc.json_encoder"));
        assert_eq!(config.normalizer_for("app::User"), Some("svc.user_normalizer"));
        assert_eq!(config.default_normalizers(), ["svc.generic_normalizer"]);
    }

    #[test]
    fn test_from_json_str_defaults_missing_tables() {
        let config = DispatcherConfig::from_json_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_from_json_str_rejects_unknown_fields() {
        let err = DispatcherConfig::from_json_str(r#"{ "encoder": {} }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

//! Sort configuration
//!
//! A sort is configured the way the card configures it:
//!
//! ```yaml
//! sort:
//!   method: attribute
//!   attribute: battery:level
//!   numeric: true
//!   reverse: true
//! ```
//!
//! or with the shorthand `sort: name`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::compare::CompareOptions;
use crate::strategy::SortMethod;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a sort configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse YAML
    #[error("failed to parse sort configuration: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    /// `method: attribute` without an attribute path
    #[error("sort method 'attribute' requires an 'attribute' path")]
    MissingAttribute,

    /// Path with an empty segment (e.g. `a::b`)
    #[error("invalid attribute path '{path}': empty segment")]
    InvalidAttributePath { path: String },
}

/// Sort configuration for one sort invocation
///
/// Never modified while sorting; see [`SortSpec::compare_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SortSpecRepr")]
pub struct SortSpec {
    pub method: SortMethod,
    pub reverse: bool,
    pub ignore_case: bool,
    pub numeric: bool,
    pub ip: bool,
    /// Colon-separated attribute path for `method: attribute`
    #[serde(rename = "attribute", skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<String>,
}

impl SortSpec {
    pub fn new(method: SortMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn with_ip(mut self, ip: bool) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_attribute(mut self, path: impl Into<String>) -> Self {
        self.attribute_path = Some(path.into());
        self
    }

    /// Parse and validate a sort configuration from YAML (or JSON)
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let spec: SortSpec = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the configuration for mistakes that would make the sort a no-op
    ///
    /// Unknown methods are allowed and only logged: they sort as `none`.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.method.is_known() {
            warn!(method = %self.method, "Unknown sort method, rows keep their order");
        }

        match (&self.method, self.attribute_path.as_deref()) {
            (SortMethod::Attribute, None) => Err(ConfigError::MissingAttribute),
            (_, Some(path)) if path.split(':').any(str::is_empty) => {
                Err(ConfigError::InvalidAttributePath {
                    path: path.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Comparison flags derived from this spec
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            reverse: self.reverse,
            ignore_case: self.ignore_case,
            numeric: self.numeric,
            ip: self.ip,
        }
    }
}

/// Accepted input shapes: a bare method name or the full mapping
#[derive(Deserialize)]
#[serde(untagged)]
enum SortSpecRepr {
    Method(String),
    Full(SortSpecFields),
}

#[derive(Deserialize)]
struct SortSpecFields {
    method: String,
    #[serde(default)]
    reverse: bool,
    #[serde(default)]
    ignore_case: bool,
    #[serde(default)]
    numeric: bool,
    #[serde(default)]
    ip: bool,
    #[serde(default, alias = "attribute_path")]
    attribute: Option<String>,
}

impl From<SortSpecRepr> for SortSpec {
    fn from(repr: SortSpecRepr) -> Self {
        match repr {
            SortSpecRepr::Method(method) => SortSpec::new(method.into()),
            SortSpecRepr::Full(fields) => SortSpec {
                method: fields.method.into(),
                reverse: fields.reverse,
                ignore_case: fields.ignore_case,
                numeric: fields.numeric,
                ip: fields.ip,
                attribute_path: fields.attribute,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mapping() {
        let spec = SortSpec::from_yaml_str(
            "method: attribute\nattribute: battery:level\nnumeric: true\nreverse: true\n",
        )
        .unwrap();
        assert_eq!(spec.method, SortMethod::Attribute);
        assert_eq!(spec.attribute_path.as_deref(), Some("battery:level"));
        assert!(spec.numeric && spec.reverse);
        assert!(!spec.ignore_case && !spec.ip);
    }

    #[test]
    fn test_shorthand() {
        let spec = SortSpec::from_yaml_str("name").unwrap();
        assert_eq!(spec, SortSpec::new(SortMethod::Name));
    }

    #[test]
    fn test_json_input_and_alias() {
        let spec = SortSpec::from_yaml_str(
            r#"{"method": "attribute", "attribute_path": "ip_address", "ip": true}"#,
        )
        .unwrap();
        assert_eq!(spec.attribute_path.as_deref(), Some("ip_address"));
        assert!(spec.ip);
    }

    #[test]
    fn test_unknown_method_is_accepted() {
        let spec = SortSpec::from_yaml_str("method: random").unwrap();
        assert_eq!(spec.method, SortMethod::Unknown("random".to_string()));
    }

    #[test]
    fn test_attribute_requires_path() {
        let err = SortSpec::from_yaml_str("method: attribute").unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute));

        let err = SortSpec::from_yaml_str("method: attribute\nattribute: 'a::b'").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAttributePath { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = SortSpec::from_yaml_str("method: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_serialize_uses_config_names() {
        let spec = SortSpec::new(SortMethod::Attribute).with_attribute("a:b");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["method"], "attribute");
        assert_eq!(json["attribute"], "a:b");
    }

    #[test]
    fn test_compare_options() {
        let options = SortSpec::new(SortMethod::State)
            .with_ignore_case(true)
            .with_ip(true)
            .compare_options();
        assert!(options.ignore_case && options.ip);
        assert!(!options.reverse && !options.numeric);
    }
}

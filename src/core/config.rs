//! Logger configuration and environment presets

use super::error::{LoggerError, Result};
use super::formatter::Template;
use crate::sinks::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment tag that selects the production preset
pub const PRODUCTION: &str = "production";

/// Literal comparison against [`PRODUCTION`]
pub fn is_production(environment: &str) -> bool {
    environment == PRODUCTION
}

/// Where the worker writes lines.
///
/// Serialized as `"console"` or as the file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SinkTarget {
    Console,
    File(PathBuf),
}

impl SinkTarget {
    pub fn is_console(&self) -> bool {
        matches!(self, SinkTarget::Console)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SinkTarget::Console => None,
            SinkTarget::File(path) => Some(path),
        }
    }
}

impl From<String> for SinkTarget {
    fn from(value: String) -> Self {
        match value.as_str() {
            "console" | "stdout" => SinkTarget::Console,
            _ => SinkTarget::File(PathBuf::from(value)),
        }
    }
}

impl From<SinkTarget> for String {
    fn from(target: SinkTarget) -> Self {
        match target {
            SinkTarget::Console => "console".to_string(),
            SinkTarget::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::Console => f.write_str("console"),
            SinkTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration of one logger instance.
///
/// # Examples
///
/// ```
/// use esl_logger::core::config::{Config, SinkTarget};
/// use std::path::Path;
///
/// let config = Config::select("api", "production", Some(Path::new("/var/log/api.log")));
/// assert_eq!(config.sink(), &SinkTarget::File("/var/log/api.log".into()));
/// assert_eq!(config.rotation().unwrap().max_size_mb, 10);
///
/// let config = Config::select("api", "staging", Some(Path::new("/var/log/api.log")));
/// assert!(config.sink().is_console());
/// assert!(config.rotation().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    name: String,
    sink: SinkTarget,
    #[serde(default = "Template::simple")]
    template: Template,
    #[serde(default)]
    rotation: Option<RotationPolicy>,
}

impl Config {
    /// Console sink, simple template, no rotation
    pub fn default_preset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink: SinkTarget::Console,
            template: Template::simple(),
            rotation: None,
        }
    }

    /// File sink at `path`, bracketed template, 10 MB / 3 backups / 30 days
    pub fn production(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            sink: SinkTarget::File(path.into()),
            template: Template::bracketed(),
            rotation: Some(RotationPolicy::production()),
        }
    }

    /// Pick the preset for an environment.
    ///
    /// Only `"production"` together with a non-empty sink target yields the
    /// production preset; everything else falls back to the console default.
    pub fn select(name: impl Into<String>, environment: &str, sink_target: Option<&Path>) -> Self {
        match sink_target {
            Some(path) if is_production(environment) && !path.as_os_str().is_empty() => {
                Self::production(name, path)
            }
            _ => Self::default_preset(name),
        }
    }

    pub fn builder(name: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(name)
    }

    /// Load a configuration from JSON and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the configuration is invalid
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if let SinkTarget::File(path) = &self.sink {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("Config", "file sink path is empty"));
            }
        }
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sink(&self) -> &SinkTarget {
        &self.sink
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn rotation(&self) -> Option<&RotationPolicy> {
        self.rotation.as_ref()
    }
}

/// Builder for configurations that match neither preset
///
/// # Example
/// ```
/// use esl_logger::core::config::Config;
/// use esl_logger::sinks::RotationPolicy;
///
/// let config = Config::builder("worker")
///     .file("/tmp/worker.log")
///     .template("{} | {} | {} | {}")
///     .rotation(RotationPolicy::new().with_max_size_mb(50))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.template().as_str(), "{} | {} | {} | {}");
/// ```
pub struct ConfigBuilder {
    name: String,
    sink: SinkTarget,
    template: Option<String>,
    rotation: Option<RotationPolicy>,
}

impl ConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink: SinkTarget::Console,
            template: None,
            rotation: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self) -> Self {
        self.sink = SinkTarget::Console;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sink = SinkTarget::File(path.into());
        self
    }

    /// Line template; parsed and checked by [`ConfigBuilder::build`]
    #[must_use = "builder methods return a new value"]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = Some(policy);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the template does not have four slots, the file
    /// path is empty or the rotation policy is invalid
    pub fn build(self) -> Result<Config> {
        let template = match self.template {
            Some(source) => Template::parse(&source)?,
            None => Template::simple(),
        };
        let config = Config {
            name: self.name,
            sink: self.sink,
            template,
            rotation: self.rotation,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset() {
        let config = Config::default_preset("svc");
        assert_eq!(config.name(), "svc");
        assert_eq!(config.sink(), &SinkTarget::Console);
        assert_eq!(config.template(), &Template::simple());
        assert!(config.rotation().is_none());
    }

    #[test]
    fn test_production_preset() {
        let config = Config::production("svc", "/tmp/svc.log");
        assert_eq!(config.sink(), &SinkTarget::File(PathBuf::from("/tmp/svc.log")));
        assert_eq!(config.template(), &Template::bracketed());

        let rotation = config.rotation().unwrap();
        assert_eq!(rotation.max_size_mb, 10);
        assert_eq!(rotation.max_backups, 3);
        assert_eq!(rotation.max_age_days, 30);
    }

    #[test]
    fn test_select_requires_production_and_target() {
        let path = Path::new("/tmp/svc.log");

        assert!(!Config::select("svc", "production", Some(path)).sink().is_console());
        assert!(Config::select("svc", "production", None).sink().is_console());
        assert!(Config::select("svc", "production", Some(Path::new(""))).sink().is_console());
        assert!(Config::select("svc", "Production", Some(path)).sink().is_console());
        assert!(Config::select("svc", "development", Some(path)).sink().is_console());
        assert!(Config::select("svc", "", None).rotation().is_none());
    }

    #[test]
    fn test_sink_target_strings() {
        assert_eq!(SinkTarget::from("stdout".to_string()), SinkTarget::Console);
        assert_eq!(SinkTarget::from("console".to_string()), SinkTarget::Console);
        assert_eq!(
            SinkTarget::from("logs/app.log".to_string()),
            SinkTarget::File(PathBuf::from("logs/app.log"))
        );
        assert_eq!(String::from(SinkTarget::Console), "console");
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::production("svc", "/tmp/svc.log");
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_defaults() {
        let config = Config::from_json(r#"{ "name": "svc", "sink": "stdout" }"#).unwrap();
        assert_eq!(config, Config::default_preset("svc"));
    }

    #[test]
    fn test_from_json_rejects_bad_template() {
        let err = Config::from_json(r#"{ "name": "svc", "sink": "console", "template": "{}" }"#)
            .unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_builder_validation() {
        let err = Config::builder("svc").template("{} {}").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTemplate { slots: 2, .. }));

        let err = Config::builder("svc").file("").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Config::builder("svc")
            .file("/tmp/a.log")
            .rotation(RotationPolicy::new().with_max_size_mb(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}

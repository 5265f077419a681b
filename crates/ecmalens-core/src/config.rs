//! Configuration for parsing, input discovery and test-case naming.
//!
//! Load order: `.ecmalens/config.toml` → environment variables → defaults.

use crate::error::{AnalysisError, Result};
use crate::input::{DEFAULT_CONFIGURATION, DEFAULT_EXTENSIONS, DEFAULT_TESTS, FilePatterns};
use crate::parser::{Dialect, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub parse: ParseConfig,
    pub input: InputConfig,
    pub tests: TestsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Accept JSX syntax.
    pub jsx: bool,
    pub dialect: Dialect,
}

/// Which files in a solution directory are analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub extension_pattern: String,
    pub test_pattern: String,
    pub configuration_pattern: String,
    /// Extension of the `<slug>.<ext>` file read first.
    pub preferred_extension: String,
    /// Maximum number of sources read per input.
    pub max_sources: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestsConfig {
    /// Glue between describe names and the test name.
    pub name_separator: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension_pattern: DEFAULT_EXTENSIONS.to_string(),
            test_pattern: DEFAULT_TESTS.to_string(),
            configuration_pattern: DEFAULT_CONFIGURATION.to_string(),
            preferred_extension: "js".to_string(),
            max_sources: 1,
        }
    }
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            name_separator: " > ".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(parsed) = v.parse()
    {
        *target = parsed;
    }
}

impl LensConfig {
    /// Load config from `.ecmalens/config.toml` in the project root, with env
    /// var overrides. Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".ecmalens").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| AnalysisError::io(&config_path, e))?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        env_override("ECMALENS_JSX", &mut config.parse.jsx);
        if let Ok(dialect) = std::env::var("ECMALENS_DIALECT") {
            match Dialect::from_name(&dialect) {
                Some(dialect) => config.parse.dialect = dialect,
                None => tracing::warn!("ignoring unknown ECMALENS_DIALECT {:?}", dialect),
            }
        }
        env_override("ECMALENS_MAX_SOURCES", &mut config.input.max_sources);
        env_override(
            "ECMALENS_PREFERRED_EXTENSION",
            &mut config.input.preferred_extension,
        );
        env_override("ECMALENS_NAME_SEPARATOR", &mut config.tests.name_separator);

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.input.max_sources == 0 {
            return Err(AnalysisError::Config(
                "input.max_sources must be at least 1".to_string(),
            ));
        }
        self.file_patterns().map(|_| ())
    }

    /// Compiled file patterns.
    pub fn file_patterns(&self) -> Result<FilePatterns> {
        FilePatterns::new(
            &self.input.extension_pattern,
            &self.input.test_pattern,
            &self.input.configuration_pattern,
        )
    }

    /// Parse options for `base` with the configured dialect and JSX setting.
    pub fn parse_options(&self, base: ParseOptions) -> ParseOptions {
        base.with_dialect(self.parse.dialect).with_jsx(self.parse.jsx)
    }
}

//! Sources of program text: inline strings, single files, and directories.

use crate::error::{AnalysisError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Something that yields source texts.
pub trait Input {
    /// Read at most `n` sources.
    fn read(&self, n: usize) -> Result<Vec<String>>;
}

/// Patterns used to classify candidate files.
#[derive(Debug, Clone)]
pub struct FilePatterns {
    pub extensions: Regex,
    pub tests: Regex,
    pub configuration: Regex,
}

pub const DEFAULT_EXTENSIONS: &str = r"\.(jsx?|tsx?|mjs)$";
pub const DEFAULT_TESTS: &str = r"\.spec|test\.";
pub const DEFAULT_CONFIGURATION: &str = r"(?:babel\.config\.js|jest\.config\.js|\.eslintrc\.js)$";

impl FilePatterns {
    pub fn new(extensions: &str, tests: &str, configuration: &str) -> Result<Self> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AnalysisError::Config(format!("invalid {name} pattern {pattern:?}: {e}")))
        };
        Ok(Self {
            extensions: compile("extension", extensions)?,
            tests: compile("test file", tests)?,
            configuration: compile("configuration file", configuration)?,
        })
    }

    /// Whether `file_name` can be analyzed: expected extension, neither a
    /// test nor a configuration file.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        self.extensions.is_match(file_name)
            && !self.tests.is_match(file_name)
            && !self.configuration.is_match(file_name)
    }
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self {
            extensions: Regex::new(DEFAULT_EXTENSIONS).expect("valid extension pattern"),
            tests: Regex::new(DEFAULT_TESTS).expect("valid test file pattern"),
            configuration: Regex::new(DEFAULT_CONFIGURATION)
                .expect("valid configuration file pattern"),
        }
    }
}

/// Sources held in memory.
#[derive(Debug, Clone, Default)]
pub struct InlineInput {
    sources: Vec<String>,
}

impl InlineInput {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }
}

impl Input for InlineInput {
    fn read(&self, n: usize) -> Result<Vec<String>> {
        Ok(self.sources.iter().take(n).cloned().collect())
    }
}

/// A single file on disk.
#[derive(Debug, Clone)]
pub struct FileInput {
    path: PathBuf,
    patterns: FilePatterns,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_patterns(path, FilePatterns::default())
    }

    pub fn with_patterns(path: impl Into<PathBuf>, patterns: FilePatterns) -> Self {
        Self {
            path: path.into(),
            patterns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn is_test_file(&self) -> bool {
        self.patterns.tests.is_match(&self.path.to_string_lossy())
    }

    pub fn is_configuration_file(&self) -> bool {
        self.patterns.configuration.is_match(&self.path.to_string_lossy())
    }

    pub fn has_expected_extension(&self) -> bool {
        self.patterns.extensions.is_match(self.file_name())
    }
}

impl Input for FileInput {
    fn read(&self, _n: usize) -> Result<Vec<String>> {
        let source =
            std::fs::read_to_string(&self.path).map_err(|e| AnalysisError::io(&self.path, e))?;
        Ok(vec![source])
    }
}

/// Candidate solution files in one directory.
///
/// Files named `<slug>.<preferred extension>` are read first; the rest follow
/// in file-name order.
#[derive(Debug, Clone)]
pub struct DirectoryInput {
    path: PathBuf,
    slug: String,
    preferred_extension: String,
    patterns: FilePatterns,
}

impl DirectoryInput {
    pub fn new(path: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            slug: slug.into(),
            preferred_extension: "js".to_string(),
            patterns: FilePatterns::default(),
        }
    }

    #[must_use]
    pub fn with_preferred_extension(mut self, extension: impl Into<String>) -> Self {
        self.preferred_extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: FilePatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Up to `n` candidate files, preferred names first.
    pub fn candidates(&self, n: usize) -> Result<Vec<PathBuf>> {
        if !self.path.is_dir() {
            return Err(AnalysisError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        // Every file counts, ignore files included.
        let walker = ignore::WalkBuilder::new(&self.path)
            .standard_filters(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let candidates: Vec<(String, PathBuf)> = walker
            .flatten()
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                self.patterns
                    .is_candidate(&name)
                    .then(|| (name, entry.into_path()))
            })
            .collect();

        let preferred = format!("{}.{}", self.slug, self.preferred_extension);
        let (mut ordered, rest): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|(name, _)| *name == preferred);
        ordered.extend(rest);

        tracing::debug!(
            "{} candidate(s) in {}",
            ordered.len(),
            self.path.display()
        );

        Ok(ordered.into_iter().take(n).map(|(_, path)| path).collect())
    }
}

impl Input for DirectoryInput {
    fn read(&self, n: usize) -> Result<Vec<String>> {
        self.candidates(n)?
            .into_iter()
            .map(|path| std::fs::read_to_string(&path).map_err(|e| AnalysisError::io(&path, e)))
            .collect()
    }
}

/// Contents of a solution directory's `.meta/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfiguration {
    pub blurb: String,
    pub authors: Vec<PersonReference>,
    pub contributors: Vec<PersonReference>,
    pub files: MetaFiles,
    pub forked_from: Vec<String>,
}

/// File lists of a [`MetaConfiguration`], relative to the solution directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaFiles {
    pub solution: Vec<String>,
    pub test: Vec<String>,
    pub exemplar: Vec<String>,
    pub example: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonReference {
    pub github_username: String,
    pub exercism_username: Option<String>,
}

impl MetaConfiguration {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    /// Both the solution and the test file lists are non-empty.
    pub fn lists_files(&self) -> bool {
        !self.files.solution.is_empty() && !self.files.test.is_empty()
    }
}

/// Solution files named by a directory's `.meta/config.json`, read in the
/// order the configuration lists them.
#[derive(Debug, Clone)]
pub struct DirectoryWithConfigInput {
    path: PathBuf,
    configuration: MetaConfiguration,
}

impl DirectoryWithConfigInput {
    pub fn config_path(directory: &Path) -> PathBuf {
        directory.join(".meta").join("config.json")
    }

    /// Whether `directory` has a readable configuration that lists both
    /// solution and test files.
    pub fn is_configured(directory: &Path) -> bool {
        match Self::new(directory) {
            Ok(input) => input.configuration.lists_files(),
            Err(e) => {
                tracing::trace!("{} has no usable configuration: {e}", directory.display());
                false
            }
        }
    }

    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let path = directory.into();
        let config_path = Self::config_path(&path);
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| AnalysisError::io(&config_path, e))?;
        let configuration = MetaConfiguration::from_json(&content).map_err(|e| {
            AnalysisError::Config(format!("{}: {e}", config_path.display()))
        })?;
        Ok(Self {
            path,
            configuration,
        })
    }

    pub fn configuration(&self) -> &MetaConfiguration {
        &self.configuration
    }

    /// The first `n` configured solution files.
    pub fn files(&self, n: usize) -> Vec<PathBuf> {
        self.configuration
            .files
            .solution
            .iter()
            .take(n)
            .map(|file| self.path.join(file))
            .collect()
    }
}

impl Input for DirectoryWithConfigInput {
    fn read(&self, n: usize) -> Result<Vec<String>> {
        self.files(n)
            .into_iter()
            .map(|path| std::fs::read_to_string(&path).map_err(|e| AnalysisError::io(&path, e)))
            .collect()
    }
}

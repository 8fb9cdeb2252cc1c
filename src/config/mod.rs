//! The templating run configuration.
//!
//! This module provides:
//! - `Config`: The root configuration value, decodable from YAML
//! - `DataSource` / `Templates`: Named resources and their alias maps
//! - Merging (`Config::merge_from`), validation (`Config::validate`) and
//!   defaulting (`Config::apply_defaults`)
//!
//! A typical run decodes the config file, builds a second `Config` from
//! command-line flags, merges the flag layer over the file layer, applies
//! defaults and validates the result.

mod datasource;
mod defaults;
pub mod duration;
mod merge;
mod validate;

pub use datasource::{DataSource, Headers, Templates, merge_data_sources, merge_templates};

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::io::{
    FileSystem, InputProvider, OsFs, OutputTarget, StderrOutput, StdinInput, StdoutOutput,
};
use crate::source::SourceLocator;

fn default_stdin() -> Arc<dyn InputProvider> {
    Arc::new(StdinInput::new())
}

fn default_stdout() -> Arc<dyn OutputTarget> {
    Arc::new(StdoutOutput::new())
}

fn default_stderr() -> Arc<dyn OutputTarget> {
    Arc::new(StderrOutput::new())
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Configuration for one templating run.
///
/// String, list and boolean fields treat empty/`false` as unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "in", skip_serializing_if = "String::is_empty")]
    pub input: String,
    #[serde(rename = "inputDir", skip_serializing_if = "String::is_empty")]
    pub input_dir: String,
    #[serde(rename = "inputFiles", skip_serializing_if = "Vec::is_empty")]
    pub input_files: Vec<String>,
    #[serde(rename = "excludes", skip_serializing_if = "Vec::is_empty")]
    pub exclude_globs: Vec<String>,

    #[serde(rename = "outputDir", skip_serializing_if = "String::is_empty")]
    pub output_dir: String,
    #[serde(rename = "outputMap", skip_serializing_if = "String::is_empty")]
    pub output_map: String,
    #[serde(rename = "outputFiles", skip_serializing_if = "Vec::is_empty")]
    pub output_files: Vec<String>,
    /// Octal permission string for generated files
    #[serde(rename = "chmod", skip_serializing_if = "String::is_empty")]
    pub out_mode: String,

    #[serde(rename = "leftDelim", skip_serializing_if = "String::is_empty")]
    pub left_delim: String,
    #[serde(rename = "rightDelim", skip_serializing_if = "String::is_empty")]
    pub right_delim: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Templates>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub datasources: BTreeMap<String, DataSource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, DataSource>,
    /// Plugin alias to executable path
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, String>,

    /// Headers for aliases not defined in this config, for datasources the
    /// templates define themselves.
    #[serde(skip)]
    pub extra_headers: BTreeMap<String, Headers>,

    #[serde(rename = "postExec", skip_serializing_if = "Vec::is_empty")]
    pub post_exec: Vec<String>,

    /// Stream the post-exec command reads from; set by `apply_defaults`.
    #[serde(skip)]
    pub post_exec_input: Option<Arc<dyn InputProvider>>,

    #[serde(skip, default = "default_stdin")]
    pub stdin: Arc<dyn InputProvider>,
    #[serde(skip, default = "default_stdout")]
    pub stdout: Arc<dyn OutputTarget>,
    #[serde(skip, default = "default_stderr")]
    pub stderr: Arc<dyn OutputTarget>,

    #[serde(
        rename = "pluginTimeout",
        with = "duration",
        skip_serializing_if = "Duration::is_zero"
    )]
    pub plugin_timeout: Duration,

    #[serde(rename = "execPipe", skip_serializing_if = "is_false")]
    pub exec_pipe: bool,
    #[serde(rename = "suppressEmpty", skip_serializing_if = "is_false")]
    pub suppress_empty: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub experimental: bool,

    #[serde(skip)]
    fs: Option<Arc<dyn FileSystem>>,
    #[serde(skip)]
    locator: Option<SourceLocator>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: String::new(),
            input_dir: String::new(),
            input_files: Vec::new(),
            exclude_globs: Vec::new(),
            output_dir: String::new(),
            output_map: String::new(),
            output_files: Vec::new(),
            out_mode: String::new(),
            left_delim: String::new(),
            right_delim: String::new(),
            templates: None,
            datasources: BTreeMap::new(),
            context: BTreeMap::new(),
            plugins: BTreeMap::new(),
            extra_headers: BTreeMap::new(),
            post_exec: Vec::new(),
            post_exec_input: None,
            stdin: default_stdin(),
            stdout: default_stdout(),
            stderr: default_stderr(),
            plugin_timeout: Duration::ZERO,
            exec_pipe: false,
            suppress_empty: false,
            experimental: false,
            fs: None,
            locator: None,
        }
    }
}

impl Config {
    /// Create a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with every default applied, for call sites that
    /// were not handed one.
    pub fn resolved_default() -> Self {
        let mut cfg = Self::default();
        cfg.apply_defaults();
        cfg
    }

    /// Decode a YAML configuration document.
    ///
    /// An empty document yields an empty configuration.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(ConfigError::Read)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let node: serde_yaml::Value = serde_yaml::from_str(&text)?;
        if node.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(node)?)
    }

    /// Set the filesystem used to expand template directories.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Resolve relative locators against `dir` instead of the process
    /// working directory.
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.locator = Some(SourceLocator::new(dir));
        self
    }

    pub fn with_stdin(mut self, stdin: Arc<dyn InputProvider>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stdout(mut self, stdout: Arc<dyn OutputTarget>) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_stderr(mut self, stderr: Arc<dyn OutputTarget>) -> Self {
        self.stderr = stderr;
        self
    }

    /// The injected filesystem, or the host filesystem when none was set.
    pub(crate) fn fs(&self) -> Arc<dyn FileSystem> {
        match &self.fs {
            Some(fs) => fs.clone(),
            None => Arc::new(OsFs),
        }
    }

    pub(crate) fn locator(&self) -> SourceLocator {
        self.locator.clone().unwrap_or_default()
    }

    /// Parse `chmod` as an octal file mode.
    ///
    /// Returns the mode and whether it was set explicitly. An unset mode
    /// for an inline `in` template falls back to `0o644`.
    pub fn mode(&self) -> Result<(u32, bool)> {
        let overridden = !self.out_mode.is_empty();
        let mode = u32::from_str_radix(&format!("0{}", self.out_mode), 8).map_err(|source| {
            ConfigError::InvalidMode {
                value: self.out_mode.clone(),
                source,
            }
        })?;
        if mode == 0 && !self.input.is_empty() {
            return Ok((0o644, overridden));
        }
        Ok((mode, overridden))
    }

    /// Render the configuration as a YAML document.
    ///
    /// Long inline `in` templates are shortened for display.
    pub fn to_yaml_string(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.input.len() >= 11 {
            let head: String = shown.input.chars().take(8).collect();
            shown.input = format!("{head}...");
        }
        let body = serde_yaml::to_string(&shown)?;
        Ok(format!("---\n{body}"))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_yaml_string() {
            Ok(s) => f.write_str(&s),
            Err(e) => write!(f, "{e}"),
        }
    }
}

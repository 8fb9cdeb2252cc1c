//! Command-line flag reconciliation.
//!
//! CLI parsers hand over repeated flags as raw strings. This module turns
//! them into the alias maps a [`Config`] carries:
//!
//! - datasource/context: `alias=locator`, or a bare `file.ext` aliased as `file`
//! - template: `alias=locator`, or a bare locator aliased by itself; a
//!   directory expands to one `alias/name` entry per file it contains
//! - header: `alias=Header-Name: value`
//! - plugin: `alias=path`
//!
//! # Example with clap
//!
//! ```rust,ignore
//! use clap::Parser;
//! use tmplconf::{Config, cli::FlagArgs};
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[arg(short = 'd', long = "datasource")]
//!     datasources: Vec<String>,
//!     #[arg(short = 't', long = "template")]
//!     templates: Vec<String>,
//! }
//!
//! let cli = Cli::parse();
//! let mut cfg = Config::new();
//! FlagArgs::new()
//!     .with_datasources(cli.datasources)
//!     .with_templates(cli.templates)
//!     .apply_to(&mut cfg)?;
//! ```

use std::collections::BTreeMap;

use tracing::debug;
use url::Url;

use crate::config::{Config, DataSource, Headers, Templates, merge_templates};
use crate::error::{ConfigError, Result};
use crate::io::FileSystem;
use crate::source::{SourceLocator, base_name, clean_path, join_path, to_slash, volume_name};

/// Raw repeated flag values, as collected by a CLI parser.
#[derive(Debug, Clone, Default)]
pub struct FlagArgs {
    /// `-d/--datasource` values
    pub datasources: Vec<String>,
    /// `-c/--context` values
    pub contexts: Vec<String>,
    /// `-t/--template` values
    pub templates: Vec<String>,
    /// `-H/--datasource-header` values
    pub headers: Vec<String>,
    /// `--plugin` values
    pub plugins: Vec<String>,
}

impl FlagArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datasource(mut self, arg: impl Into<String>) -> Self {
        self.datasources.push(arg.into());
        self
    }

    pub fn with_datasources(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.datasources.extend(args);
        self
    }

    pub fn with_context(mut self, arg: impl Into<String>) -> Self {
        self.contexts.push(arg.into());
        self
    }

    pub fn with_contexts(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.contexts.extend(args);
        self
    }

    pub fn with_template(mut self, arg: impl Into<String>) -> Self {
        self.templates.push(arg.into());
        self
    }

    pub fn with_templates(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.templates.extend(args);
        self
    }

    pub fn with_header(mut self, arg: impl Into<String>) -> Self {
        self.headers.push(arg.into());
        self
    }

    pub fn with_headers(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.headers.extend(args);
        self
    }

    pub fn with_plugin(mut self, arg: impl Into<String>) -> Self {
        self.plugins.push(arg.into());
        self
    }

    pub fn with_plugins(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.plugins.extend(args);
        self
    }

    /// Fold every flag into `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) -> Result<()> {
        cfg.parse_data_source_flags(
            &self.datasources,
            &self.contexts,
            &self.templates,
            &self.headers,
        )?;
        cfg.parse_plugin_flags(&self.plugins)
    }
}

impl Config {
    /// Set `datasources`, `context` and `templates` from `alias=value`
    /// style flags, then attach header flags to the aliases they name.
    ///
    /// Headers for aliases defined nowhere end up in `extra_headers`.
    /// `templates` is replaced by whatever the template flags produce.
    pub fn parse_data_source_flags<S: AsRef<str>>(
        &mut self,
        datasources: &[S],
        contexts: &[S],
        templates: &[S],
        headers: &[S],
    ) -> Result<()> {
        let locator = self.locator();

        for arg in datasources {
            let (alias, ds) = parse_datasource_arg(&locator, arg.as_ref())?;
            self.datasources.insert(alias, ds);
        }
        for arg in contexts {
            let (alias, ds) = parse_datasource_arg(&locator, arg.as_ref())?;
            self.context.insert(alias, ds);
        }

        let fs = self.fs();
        self.templates = parse_template_args(fs.as_ref(), &locator, templates).map_err(|e| {
            ConfigError::TemplateArgs {
                args: templates.iter().map(|a| a.as_ref().to_string()).collect(),
                source: Box::new(e),
            }
        })?;

        let hdrs = parse_header_args(headers)?;
        let mut extra = BTreeMap::new();
        for (alias, header) in hdrs {
            if let Some(ds) = self.context.get_mut(&alias) {
                debug!(%alias, "attaching headers to context");
                ds.header = header;
            } else if let Some(ds) = self.datasources.get_mut(&alias) {
                debug!(%alias, "attaching headers to datasource");
                ds.header = header;
            } else if let Some(ds) = self.templates.as_mut().and_then(|t| t.get_mut(&alias)) {
                debug!(%alias, "attaching headers to template");
                ds.header = header;
            } else {
                debug!(%alias, "keeping headers for undefined alias");
                extra.insert(alias, header);
            }
        }
        if !extra.is_empty() {
            self.extra_headers = extra;
        }
        Ok(())
    }

    /// Set `plugins` from `alias=path` flags.
    pub fn parse_plugin_flags<S: AsRef<str>>(&mut self, plugins: &[S]) -> Result<()> {
        for plugin in plugins {
            let plugin = plugin.as_ref();
            let (alias, path) = plugin
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidPlugin(plugin.to_string()))?;
            self.plugins.insert(alias.to_string(), path.to_string());
        }
        Ok(())
    }
}

/// Parse a datasource or context flag.
///
/// Without an explicit alias the alias is the file name up to its first
/// `.`, and the value must name a file in the working directory.
pub fn parse_datasource_arg(locator: &SourceLocator, value: &str) -> Result<(String, DataSource)> {
    match value.split_once('=') {
        Some((alias, source)) => {
            let url = locator.resolve(source)?;
            Ok((alias.to_string(), DataSource::new(url)))
        }
        None => {
            let alias = value.split_once('.').map_or(value, |(stem, _)| stem);
            let slashed = to_slash(value);
            if base_name(&slashed) != slashed {
                return Err(ConfigError::MissingAlias(value.to_string()));
            }
            let url = locator.resolve(value)?;
            Ok((alias.to_string(), DataSource::new(url)))
        }
    }
}

/// Parse every template flag, merging the results in order.
pub fn parse_template_args<S: AsRef<str>>(
    fs: &dyn FileSystem,
    locator: &SourceLocator,
    args: &[S],
) -> Result<Option<Templates>> {
    let mut templates = None;
    for arg in args {
        let parsed = parse_template_arg(fs, locator, arg.as_ref())?;
        templates = merge_templates(templates, Some(parsed));
    }
    Ok(templates)
}

/// Parse a template flag.
///
/// Like [`parse_datasource_arg`], except a bare value is aliased by the
/// whole value. Local directories (a trailing `/`, or a path that stats
/// as a directory) expand to one entry per non-directory child, aliased
/// `alias/name`. There is no recursion into subdirectories.
///
/// Relative paths are looked up under the locator's working directory
/// when it has one, and relative to the filesystem's own base otherwise.
pub fn parse_template_arg(
    fs: &dyn FileSystem,
    locator: &SourceLocator,
    arg: &str,
) -> Result<Templates> {
    let mut templates = Templates::new();
    let (alias, raw_path) = arg.split_once('=').unwrap_or((arg, arg));

    let mut path = to_slash(raw_path).into_owned();
    let was_absolute = Url::parse(&path).is_ok();

    let url = locator.resolve(&path)?;
    if url.scheme() != "file" {
        templates.insert(alias.to_string(), DataSource::new(url));
        return Ok(templates);
    }

    if was_absolute {
        path = url.path();
    }
    let is_dir_arg = path.ends_with('/');

    // relative lookups share the base the URLs were resolved against
    if let Some(wd) = locator.working_dir() {
        if !path.starts_with('/') && volume_name(&path).is_empty() {
            path = join_path(wd, &path);
        }
    }

    if !is_dir_arg {
        let cleaned = clean_path(&path);
        let file = fs.open(&cleaned).map_err(|source| ConfigError::Filesystem {
            op: "open",
            path: cleaned.clone(),
            source,
        })?;
        let info = file.stat().map_err(|source| ConfigError::Filesystem {
            op: "stat",
            path: cleaned.clone(),
            source,
        })?;
        if !info.is_dir {
            templates.insert(alias.to_string(), DataSource::new(url));
            return Ok(templates);
        }
    }

    let dir = clean_path(&path);
    let entries = fs.read_dir(&dir).map_err(|source| ConfigError::Filesystem {
        op: "readDir",
        path: dir.clone(),
        source,
    })?;

    for entry in entries.iter().filter(|e| !e.is_dir) {
        let url = locator.resolve(&join_path(&dir, &entry.name))?;
        templates.insert(join_path(alias, &entry.name), DataSource::new(url));
    }
    debug!(%dir, %alias, count = templates.len(), "expanded template directory");

    Ok(templates)
}

/// Group `alias=Name: value` flags by alias, then by canonical header name.
///
/// Repeated names for one alias accumulate values in order.
pub fn parse_header_args<S: AsRef<str>>(args: &[S]) -> Result<BTreeMap<String, Headers>> {
    let mut headers: BTreeMap<String, Headers> = BTreeMap::new();
    for arg in args {
        let (alias, name, value) = split_header_arg(arg.as_ref())?;
        headers
            .entry(alias)
            .or_default()
            .entry(name)
            .or_default()
            .push(value.trim().to_string());
    }
    Ok(headers)
}

fn split_header_arg(arg: &str) -> Result<(String, String, String)> {
    let (alias, header) = arg
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidHeaderArg(arg.to_string()))?;
    let (name, value) = split_header(header)?;
    Ok((alias.to_string(), name, value))
}

fn split_header(header: &str) -> Result<(String, String)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(header.to_string()))?;
    Ok((canonical_header_key(name), value.to_string()))
}

/// Canonical MIME header casing: `x-api-key` becomes `X-Api-Key`.
///
/// Names containing characters that are not valid in a header token are
/// returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    fn is_token_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
    }

    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

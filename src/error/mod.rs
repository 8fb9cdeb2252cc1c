//! Error types for configuration resolution.
//!
//! This module provides:
//! - `ErrorKind`: Coarse classification of where a failure came from
//! - `ConfigError`: A single resolution error with the offending value attached
//!
//! Every fallible operation returns the first error it hits. Nothing is
//! retried or accumulated; validation stops at the first violated rule.

use std::fmt;
use std::io;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A command-line style argument was missing `=`, an alias or a header colon
    MalformedArgument,
    /// A locator string could not be turned into an absolute URL
    UrlResolution,
    /// Open/stat/list failed while expanding a template directory
    Filesystem,
    /// One of the cross-field configuration rules was violated
    Validation,
    /// The structured configuration document was malformed
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedArgument => write!(f, "MalformedArgument"),
            ErrorKind::UrlResolution => write!(f, "UrlResolution"),
            ErrorKind::Filesystem => write!(f, "Filesystem"),
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::Decode => write!(f, "Decode"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "invalid datasource ({0}): must provide an alias with files not in working directory"
    )]
    MissingAlias(String),

    #[error("invalid datasource-header option '{0}'")]
    InvalidHeaderArg(String),

    #[error("invalid HTTP Header format '{0}'")]
    InvalidHeader(String),

    #[error("invalid plugin '{0}': plugin requires both name and path")]
    InvalidPlugin(String),

    #[error("could not parse datasource URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("can't get working directory: {0}")]
    WorkingDir(#[source] io::Error),

    #[error("failed to {op} {path:?}: {source}")]
    Filesystem {
        /// Operation that failed: "open", "stat" or "readDir"
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse template args for {args:?}: {source}")]
    TemplateArgs {
        args: Vec<String>,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("only one of these options is supported at a time: '{first}', '{second}'")]
    NotTogether {
        first: &'static str,
        second: &'static str,
    },

    #[error("these options must be set together: '{left}', '{right}'")]
    MustTogether {
        left: &'static str,
        right: &'static str,
    },

    #[error(
        "must provide same number of 'outputFiles' ({outputs}) as 'in' or 'inputFiles' ({inputs}) options"
    )]
    OutputCountMismatch { outputs: usize, inputs: usize },

    #[error("execPipe may only be used with a postExec command")]
    ExecPipeWithoutPostExec,

    #[error("must not set 'outputFiles' when using 'execPipe'")]
    ExecPipeWithOutputFiles,

    #[error("failed to decode configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read configuration: {0}")]
    Read(#[source] io::Error),

    #[error("invalid output mode {value:?}: {source}")]
    InvalidMode {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ConfigError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::MissingAlias(_)
            | ConfigError::InvalidHeaderArg(_)
            | ConfigError::InvalidHeader(_)
            | ConfigError::InvalidPlugin(_) => ErrorKind::MalformedArgument,
            ConfigError::InvalidUrl { .. } | ConfigError::WorkingDir(_) => {
                ErrorKind::UrlResolution
            }
            ConfigError::Filesystem { .. } => ErrorKind::Filesystem,
            ConfigError::TemplateArgs { source, .. } => source.kind(),
            ConfigError::NotTogether { .. }
            | ConfigError::MustTogether { .. }
            | ConfigError::OutputCountMismatch { .. }
            | ConfigError::ExecPipeWithoutPostExec
            | ConfigError::ExecPipeWithOutputFiles => ErrorKind::Validation,
            ConfigError::Yaml(_)
            | ConfigError::Read(_)
            | ConfigError::InvalidMode { .. } => ErrorKind::Decode,
        }
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;

//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{ConfigError, ErrorKind};

/// A diagnostic wrapper for configuration errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ConfigDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

fn help_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MalformedArgument => {
            "Use the alias=value form, e.g. 'data=data.json' or 'data=Authorization: token'"
        }
        ErrorKind::UrlResolution => "Check the datasource path or URL",
        ErrorKind::Filesystem => "Check that the template path exists and is readable",
        ErrorKind::Validation => "Check for conflicting input/output options",
        ErrorKind::Decode => "Check the configuration file syntax",
    }
}

impl From<ConfigError> for ConfigDiagnostic {
    fn from(e: ConfigError) -> Self {
        let kind = e.kind();
        ConfigDiagnostic {
            message: format!("[{}] {}", kind, e),
            source: Some(Box::new(e)),
            help: Some(help_for(kind).into()),
            severity: Severity::Error,
        }
    }
}

impl From<ConfigError> for miette::Report {
    fn from(e: ConfigError) -> Self {
        miette::Report::new(ConfigDiagnostic::from(e))
    }
}

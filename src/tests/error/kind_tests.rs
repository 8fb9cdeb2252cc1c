//! Tests for error classification.

use std::io;

use crate::{ConfigError, ErrorKind};

#[test]
fn kinds_group_variants() {
    assert_eq!(
        ConfigError::MissingAlias("x".into()).kind(),
        ErrorKind::MalformedArgument
    );
    assert_eq!(
        ConfigError::InvalidPlugin("x".into()).kind(),
        ErrorKind::MalformedArgument
    );
    assert_eq!(
        ConfigError::WorkingDir(io::Error::other("gone")).kind(),
        ErrorKind::UrlResolution
    );
    assert_eq!(
        ConfigError::ExecPipeWithoutPostExec.kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        ConfigError::Read(io::Error::other("truncated")).kind(),
        ErrorKind::Decode
    );
}

#[test]
fn template_args_take_the_inner_kind() {
    let inner = ConfigError::Filesystem {
        op: "stat",
        path: "tpl".into(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    let err = ConfigError::TemplateArgs {
        args: vec!["tpl".into()],
        source: Box::new(inner),
    };
    assert_eq!(err.kind(), ErrorKind::Filesystem);
    assert_eq!(
        err.to_string(),
        "failed to parse template args for [\"tpl\"]: failed to stat \"tpl\": denied"
    );
}

#[test]
fn kind_display() {
    assert_eq!(ErrorKind::UrlResolution.to_string(), "UrlResolution");
    assert_eq!(ErrorKind::Validation.to_string(), "Validation");
}

#[cfg(feature = "miette")]
#[test]
fn diagnostic_carries_kind_and_help() {
    use crate::ConfigDiagnostic;

    let diag = ConfigDiagnostic::from(ConfigError::ExecPipeWithoutPostExec);
    assert_eq!(
        diag.message,
        "[Validation] execPipe may only be used with a postExec command"
    );
    assert!(diag.help.is_some());
}

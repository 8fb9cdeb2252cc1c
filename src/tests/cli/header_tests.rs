//! Tests for header flags.

use crate::cli::{canonical_header_key, parse_header_args};
use crate::{Config, ConfigError, ErrorKind};

const NONE: &[&str] = &[];

#[test]
fn groups_by_alias_and_canonical_name() {
    let headers = parse_header_args(&[
        "ds=x-api-key: secret",
        "ds=Accept: text/plain",
        "ds=accept: application/json",
        "other=Authorization:   Bearer abc  ",
    ])
    .unwrap();

    assert_eq!(headers.len(), 2);
    assert_eq!(headers["ds"]["X-Api-Key"], vec!["secret".to_string()]);
    assert_eq!(
        headers["ds"]["Accept"],
        vec!["text/plain".to_string(), "application/json".to_string()]
    );
    assert_eq!(
        headers["other"]["Authorization"],
        vec!["Bearer abc".to_string()]
    );
}

#[test]
fn value_may_contain_colons() {
    let headers = parse_header_args(&["ds=Referer: https://example.com:8080/"]).unwrap();
    assert_eq!(
        headers["ds"]["Referer"],
        vec!["https://example.com:8080/".to_string()]
    );
}

#[test]
fn malformed_header_args() {
    let err = parse_header_args(&["noequals"]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeaderArg(_)));
    assert_eq!(err.to_string(), "invalid datasource-header option 'noequals'");
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);

    let err = parse_header_args(&["ds=NoColon"]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader(_)));
    assert_eq!(err.to_string(), "invalid HTTP Header format 'NoColon'");
}

#[test]
fn canonical_keys() {
    assert_eq!(canonical_header_key("x-api-key"), "X-Api-Key");
    assert_eq!(canonical_header_key("CONTENT-TYPE"), "Content-Type");
    assert_eq!(canonical_header_key("accept"), "Accept");
    assert_eq!(canonical_header_key("bad header"), "bad header");
}

#[test]
fn headers_attach_to_defined_aliases() {
    let mut cfg = Config::new().with_working_dir("/work");
    cfg.parse_data_source_flags(
        &["data=data.json"],
        NONE,
        &["t=https://example.com/t.tmpl"],
        &["data=Accept: text/csv", "t=Authorization: token"],
    )
    .unwrap();

    assert_eq!(
        cfg.datasources["data"].header["Accept"],
        vec!["text/csv".to_string()]
    );
    let templates = cfg.templates.as_ref().unwrap();
    assert_eq!(
        templates["t"].header["Authorization"],
        vec!["token".to_string()]
    );
    assert!(cfg.extra_headers.is_empty());
}

#[test]
fn context_wins_over_datasource_with_same_alias() {
    let mut cfg = Config::new().with_working_dir("/work");
    cfg.parse_data_source_flags(
        &["shared=a.json"],
        &["shared=b.json"],
        NONE,
        &["shared=X-Token: 1"],
    )
    .unwrap();

    assert_eq!(cfg.context["shared"].header["X-Token"], vec!["1".to_string()]);
    assert!(cfg.datasources["shared"].header.is_empty());
}

#[test]
fn unknown_alias_goes_to_extra_headers() {
    let mut cfg = Config::new().with_working_dir("/work");
    cfg.parse_data_source_flags(NONE, NONE, NONE, &["ds1=X-Api-Key: secret"])
        .unwrap();

    assert_eq!(
        cfg.extra_headers["ds1"]["X-Api-Key"],
        vec!["secret".to_string()]
    );
}

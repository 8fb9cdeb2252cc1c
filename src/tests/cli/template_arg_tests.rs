//! Tests for template flags and directory expansion.

use std::sync::Arc;

use crate::cli::{parse_template_arg, parse_template_args};
use crate::{Config, ConfigError, ErrorKind, MemoryFs, SourceLocator};

fn locator() -> SourceLocator {
    SourceLocator::new("/work")
}

fn tree() -> MemoryFs {
    MemoryFs::new()
        .with_file("/work/tpl/a.txt")
        .with_file("/work/tpl/b.txt")
        .with_file("/work/tpl/sub/c.txt")
        .with_file("/work/page.tmpl")
        .with_file("/srv/tpl/x.tmpl")
}

#[test]
fn directory_with_trailing_slash_expands() {
    let templates = parse_template_arg(&tree(), &locator(), "tpl=tpl/").unwrap();

    let keys: Vec<&str> = templates.keys().map(String::as_str).collect();
    assert_eq!(keys, ["tpl/a.txt", "tpl/b.txt"]);
    assert_eq!(
        templates["tpl/a.txt"].url.as_ref().unwrap().as_str(),
        "file:///work/tpl/a.txt"
    );
}

#[test]
fn directory_without_trailing_slash_expands() {
    let templates = parse_template_arg(&tree(), &locator(), "tpl=tpl").unwrap();
    assert_eq!(templates.len(), 2);
    assert!(templates.contains_key("tpl/b.txt"));
    assert!(!templates.contains_key("tpl/sub"));
}

#[test]
fn bare_file_is_aliased_by_itself() {
    let templates = parse_template_arg(&tree(), &locator(), "page.tmpl").unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(
        templates["page.tmpl"].url.as_ref().unwrap().as_str(),
        "file:///work/page.tmpl"
    );
}

#[test]
fn remote_template_skips_filesystem() {
    let templates =
        parse_template_arg(&MemoryFs::new(), &locator(), "t=https://example.com/t.tmpl").unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates["t"].url.as_ref().unwrap().scheme(), "https");
}

#[test]
fn absolute_file_url_directory_expands() {
    let templates = parse_template_arg(&tree(), &locator(), "t=file:///srv/tpl/").unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(
        templates["t/x.tmpl"].url.as_ref().unwrap().as_str(),
        "file:///srv/tpl/x.tmpl"
    );
}

#[test]
fn missing_template_fails_to_open() {
    let err = parse_template_arg(&tree(), &locator(), "missing.tmpl").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Filesystem { op: "open", ref path, .. } if path == "/work/missing.tmpl"
    ));
    assert_eq!(err.kind(), ErrorKind::Filesystem);
}

#[test]
fn relative_paths_without_working_dir_use_filesystem_base() {
    let fs = MemoryFs::new().with_file("tpl/a.txt");
    let templates = parse_template_arg(&fs, &SourceLocator::default(), "tpl=tpl/").unwrap();
    assert_eq!(templates.len(), 1);
    assert!(templates.contains_key("tpl/a.txt"));
}

#[test]
fn trailing_slash_on_file_fails_to_list() {
    let err = parse_template_arg(&tree(), &locator(), "p=page.tmpl/").unwrap_err();
    assert!(matches!(err, ConfigError::Filesystem { op: "readDir", .. }));
}

#[test]
fn multiple_args_merge() {
    let templates = parse_template_args(
        &tree(),
        &locator(),
        &["tpl=tpl/", "t=https://example.com/t.tmpl"],
    )
    .unwrap()
    .unwrap();
    assert_eq!(templates.len(), 3);

    let none = parse_template_args(&tree(), &locator(), &[] as &[&str]).unwrap();
    assert!(none.is_none());
}

#[test]
fn config_flags_use_injected_filesystem() {
    let mut cfg = Config::new()
        .with_fs(Arc::new(tree()))
        .with_working_dir("/work");
    cfg.parse_data_source_flags(
        &[] as &[&str],
        &[],
        &["tpl=tpl/"],
        &["tpl/a.txt=Accept: text/plain"],
    )
    .unwrap();

    let templates = cfg.templates.as_ref().unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(
        templates["tpl/a.txt"].header["Accept"],
        vec!["text/plain".to_string()]
    );
}

#[test]
fn config_flag_errors_name_the_template_args() {
    let mut cfg = Config::new()
        .with_fs(Arc::new(tree()))
        .with_working_dir("/work");
    let err = cfg
        .parse_data_source_flags(&[] as &[&str], &[], &["missing.tmpl"], &[])
        .unwrap_err();

    assert!(matches!(err, ConfigError::TemplateArgs { .. }));
    assert_eq!(err.kind(), ErrorKind::Filesystem);
    assert!(
        err.to_string()
            .starts_with("failed to parse template args for [\"missing.tmpl\"]"),
        "got: {err}"
    );
}

#[cfg(unix)]
#[test]
fn expands_a_real_directory() {
    use std::fs;

    use crate::OsFs;

    let dir = tempfile::tempdir().unwrap();
    let tpl = dir.path().join("tpl");
    fs::create_dir_all(tpl.join("sub")).unwrap();
    fs::write(tpl.join("a.txt"), "a").unwrap();
    fs::write(tpl.join("b.txt"), "b").unwrap();
    fs::write(tpl.join("sub").join("c.txt"), "c").unwrap();

    let tpl_path = tpl.to_string_lossy().into_owned();
    let locator = SourceLocator::new(dir.path());
    let templates = parse_template_arg(&OsFs, &locator, &format!("tpl={tpl_path}/")).unwrap();

    let keys: Vec<&str> = templates.keys().map(String::as_str).collect();
    assert_eq!(keys, ["tpl/a.txt", "tpl/b.txt"]);
    assert_eq!(
        templates["tpl/a.txt"].url.as_ref().unwrap().path(),
        format!("{tpl_path}/a.txt")
    );

    let single =
        parse_template_arg(&OsFs, &locator, &format!("one={tpl_path}/a.txt")).unwrap();
    assert_eq!(single.len(), 1);
    assert!(single.contains_key("one"));
}

#[test]
fn injected_working_dir_locates_real_directory() {
    use std::fs;

    let dir = tempfile::tempdir().unwrap();
    let partials = dir.path().join("partials");
    fs::create_dir_all(&partials).unwrap();
    fs::write(partials.join("a.tmpl"), "a").unwrap();
    fs::write(partials.join("b.tmpl"), "b").unwrap();

    let mut cfg = Config::new().with_working_dir(dir.path());
    cfg.parse_data_source_flags(&[] as &[&str], &[], &["partials/"], &[])
        .unwrap();

    let templates = cfg.templates.as_ref().unwrap();
    let keys: Vec<&str> = templates.keys().map(String::as_str).collect();
    assert_eq!(keys, ["partials/a.tmpl", "partials/b.tmpl"]);

    let wd = dir.path().to_string_lossy().replace('\\', "/");
    let path = templates["partials/a.tmpl"].url.as_ref().unwrap().path();
    assert!(path.ends_with("/partials/a.tmpl"), "got: {path}");
    assert!(path.contains(wd.trim_start_matches('/')), "got: {path}");
}

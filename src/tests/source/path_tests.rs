//! Tests for slash-path helpers.

use crate::source::{base_name, clean_path, join_path, to_slash, volume_name};

#[test]
fn to_slash_replaces_backslashes() {
    assert_eq!(to_slash("a\\b\\c"), "a/b/c");
    assert_eq!(to_slash("a/b"), "a/b");
}

#[test]
fn volume_name_detects_drives_and_unc() {
    assert_eq!(volume_name("C:/x"), "C:");
    assert_eq!(volume_name("c:"), "c:");
    assert_eq!(volume_name("//host/share/f"), "//host/share");
    assert_eq!(volume_name("//host/share"), "//host/share");
    assert_eq!(volume_name("//host"), "");
    assert_eq!(volume_name("///x/y"), "");
    assert_eq!(volume_name("/abs/path"), "");
    assert_eq!(volume_name("rel/path"), "");
    assert_eq!(volume_name("https://example.com"), "");
}

#[test]
fn clean_path_simplifies() {
    assert_eq!(clean_path(""), ".");
    assert_eq!(clean_path("./"), ".");
    assert_eq!(clean_path("a/b/../c/"), "a/c");
    assert_eq!(clean_path("a//b"), "a/b");
    assert_eq!(clean_path("/../a"), "/a");
    assert_eq!(clean_path("../a"), "../a");
    assert_eq!(clean_path("/"), "/");
}

#[test]
fn join_path_cleans() {
    assert_eq!(join_path("tpl", "a.txt"), "tpl/a.txt");
    assert_eq!(join_path("tpl/", "a.txt"), "tpl/a.txt");
    assert_eq!(join_path("", "a.txt"), "a.txt");
    assert_eq!(join_path("tpl", ""), "tpl");
}

#[test]
fn base_name_returns_last_element() {
    assert_eq!(base_name("a/b.json"), "b.json");
    assert_eq!(base_name("b.json"), "b.json");
    assert_eq!(base_name("dir/"), "dir");
    assert_eq!(base_name(""), ".");
    assert_eq!(base_name("/"), "/");
}

//! Source locators.
//!
//! A source locator is whatever a user typed to point at a datasource or
//! template: `-` for stdin, a relative or absolute path, a Windows drive or
//! UNC path, or an absolute URL of any scheme. [`SourceLocator::resolve`]
//! turns all of them into one canonical absolute [`SourceUrl`].

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::trace;
use url::Url;

use crate::error::{ConfigError, Result};

/// An absolute, canonical datasource URL.
///
/// `file` URLs whose path starts with a drive letter (`/C:/...`) present
/// that path as `C:/...` through [`SourceUrl::path`]; the serialized form
/// keeps the standard `file:///C:/...` spelling so it re-parses to the
/// same value.
///
/// Absolute URLs are kept as parsed, which normalizes them: a bare
/// authority gains a root path (`https://example.com` becomes
/// `https://example.com/`) and special-scheme hosts are lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceUrl {
    url: Url,
}

impl SourceUrl {
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host component, empty when the URL has none.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Percent-decoded path component.
    pub fn path(&self) -> String {
        let decoded = urlencoding::decode_binary(self.url.path().as_bytes());
        let decoded = String::from_utf8_lossy(&decoded);
        if self.scheme() == "file" && has_drive_prefix(&decoded) {
            return decoded[1..].to_string();
        }
        decoded.into_owned()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for SourceUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        parse_source_url(s)
    }
}

impl Serialize for SourceUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.url.as_str())
    }
}

/// Resolves locator strings into absolute URLs.
///
/// Relative locators are resolved against the working directory given to
/// [`SourceLocator::new`]. The default locator uses the process working
/// directory, read only when a relative locator is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocator {
    working_dir: Option<String>,
}

impl SourceLocator {
    /// Create a locator that resolves relative paths against `working_dir`.
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: Some(to_slash(&working_dir.as_ref().to_string_lossy()).into_owned()),
        }
    }

    /// The injected working directory, if any.
    pub fn working_dir(&self) -> Option<&str> {
        self.working_dir.as_deref()
    }

    /// Resolve `value` into an absolute URL.
    pub fn resolve(&self, value: &str) -> Result<SourceUrl> {
        match &self.working_dir {
            Some(wd) => resolve_with(value, || Ok(wd.clone())),
            None => resolve_with(value, current_working_dir),
        }
    }
}

/// Resolve `value` against the process working directory.
pub fn parse_source_url(value: &str) -> Result<SourceUrl> {
    SourceLocator::default().resolve(value)
}

fn current_working_dir() -> Result<String> {
    let wd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
    Ok(to_slash(&wd.to_string_lossy()).into_owned())
}

fn resolve_with<F>(value: &str, working_dir: F) -> Result<SourceUrl>
where
    F: FnOnce() -> Result<String>,
{
    let value = if value == "-" { "stdin://" } else { value };
    let mut value = to_slash(value).into_owned();

    let vol_len = volume_name(&value).len();
    if vol_len > 2 {
        // UNC: the leading "//" already supplies the authority marker
        value = format!("file:{value}");
    } else if vol_len > 0 {
        value = format!("file:///{value}");
    }

    let url = match Url::parse(&value) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            abs_file_url(&value, &working_dir()?)?
        }
        Err(source) => return Err(ConfigError::InvalidUrl { value, source }),
    };

    trace!(locator = %value, url = %url, "resolved source URL");
    Ok(SourceUrl { url })
}

fn abs_file_url(value: &str, working_dir: &str) -> Result<Url> {
    let mut base_path = clean_path(&to_slash(working_dir));
    if !base_path.ends_with('/') {
        base_path.push('/');
    }

    let mut base = Url::parse("file:///").map_err(|source| ConfigError::InvalidUrl {
        value: working_dir.to_string(),
        source,
    })?;
    base.set_path(&base_path);

    base.join(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}

/// Replace every `\` separator with `/`.
pub fn to_slash(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Leading volume designator of a slash-normalized path.
///
/// Returns `C:` for drive paths, `//host/share` for UNC paths and an empty
/// string otherwise.
pub fn volume_name(path: &str) -> &str {
    let b = path.as_bytes();
    let l = b.len();
    if l >= 2 && b[1] == b':' && b[0].is_ascii_alphabetic() {
        return &path[..2];
    }

    if l >= 5 && b[0] == b'/' && b[1] == b'/' && b[2] != b'/' && b[2] != b'.' {
        let mut n = 3;
        while n < l - 1 {
            if b[n] == b'/' {
                n += 1;
                if b[n] != b'/' {
                    if b[n] == b'.' {
                        break;
                    }
                    while n < l && b[n] != b'/' {
                        n += 1;
                    }
                    return &path[..n];
                }
                break;
            }
            n += 1;
        }
    }
    ""
}

fn has_drive_prefix(path: &str) -> bool {
    let b = path.as_bytes();
    b.len() >= 3 && b[0] == b'/' && b[1].is_ascii_alphabetic() && b[2] == b':'
}

/// Lexically simplify a slash-separated path.
///
/// Collapses repeated separators, `.` and `..` elements, and drops any
/// trailing slash. An empty result becomes `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join two slash-separated path elements and clean the result.
pub fn join_path(dir: &str, name: &str) -> String {
    match (dir.is_empty(), name.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean_path(name),
        (false, true) => clean_path(dir),
        (false, false) => clean_path(&format!("{dir}/{name}")),
    }
}

/// Last element of a slash-separated path.
pub fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

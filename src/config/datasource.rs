//! Datasource entries and the alias maps built from them.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::source::{SourceUrl, parse_source_url};

/// HTTP header name to values.
pub type Headers = BTreeMap<String, Vec<String>>;

/// One named resource: where it lives and which headers to send for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataSource {
    #[serde(skip_serializing_if = "Headers::is_empty")]
    pub header: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<SourceUrl>,
}

impl DataSource {
    pub fn new(url: SourceUrl) -> Self {
        Self {
            url: Some(url),
            header: Headers::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.header.insert(name.into(), values);
        self
    }

    /// Use `self` as the defaults and override with the set fields of `other`.
    ///
    /// A present URL replaces ours. Headers are unioned by name, with
    /// `other` winning for names present in both.
    pub fn merge_from(mut self, other: DataSource) -> DataSource {
        if other.url.is_some() {
            self.url = other.url;
        }
        self.header.extend(other.header);
        self
    }
}

impl<'de> Deserialize<'de> for DataSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            header: Headers,
            #[serde(default)]
            url: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        let url = parse_source_url(&raw.url).map_err(D::Error::custom)?;
        Ok(DataSource {
            url: Some(url),
            header: raw.header,
        })
    }
}

/// Merge `other` into `base` per alias, `other` winning field by field.
pub fn merge_data_sources(
    base: &mut BTreeMap<String, DataSource>,
    other: &BTreeMap<String, DataSource>,
) {
    for (alias, ds) in other {
        let merged = match base.remove(alias) {
            Some(existing) => existing.merge_from(ds.clone()),
            None => ds.clone(),
        };
        base.insert(alias.clone(), merged);
    }
}

/// Alias map for templates.
///
/// Decodes from either a sequence of `alias=locator` strings (a bare
/// `locator` is its own alias) or a mapping of alias to datasource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Templates(BTreeMap<String, DataSource>);

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> BTreeMap<String, DataSource> {
        self.0
    }
}

impl Deref for Templates {
    type Target = BTreeMap<String, DataSource>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Templates {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<BTreeMap<String, DataSource>> for Templates {
    fn from(map: BTreeMap<String, DataSource>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, DataSource)> for Templates {
    fn from_iter<I: IntoIterator<Item = (String, DataSource)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Templates {
    type Item = (String, DataSource);
    type IntoIter = std::collections::btree_map::IntoIter<String, DataSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Merge two optional template maps.
///
/// When either side is absent the other is returned as-is.
pub fn merge_templates(base: Option<Templates>, other: Option<Templates>) -> Option<Templates> {
    match (base, other) {
        (None, other) => other,
        (base, None) => base,
        (Some(mut base), Some(other)) => {
            merge_data_sources(&mut base.0, &other.0);
            Some(base)
        }
    }
}

fn node_tag(value: &Value) -> String {
    match value {
        Value::Null => "!!null".into(),
        Value::Bool(_) => "!!bool".into(),
        Value::Number(n) if n.is_f64() => "!!float".into(),
        Value::Number(_) => "!!int".into(),
        Value::String(_) => "!!str".into(),
        Value::Sequence(_) => "!!seq".into(),
        Value::Mapping(_) => "!!map".into(),
        Value::Tagged(tagged) => tagged.tag.to_string(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Templates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;

        match node {
            Value::Sequence(items) => {
                let mut templates = Templates::new();
                for item in &items {
                    let entry = scalar_text(item).ok_or_else(|| {
                        D::Error::custom(format!(
                            "cannot unmarshal template entry of type {}",
                            node_tag(item)
                        ))
                    })?;
                    let (alias, locator) = entry
                        .split_once('=')
                        .unwrap_or((entry.as_str(), entry.as_str()));
                    let url = parse_source_url(locator).map_err(|e| {
                        D::Error::custom(format!(
                            "could not parse datasource URL from {entry:?}: {e}"
                        ))
                    })?;
                    templates.insert(alias.to_string(), DataSource::new(url));
                }
                Ok(templates)
            }
            Value::Mapping(_) => {
                let tag = node_tag(&node);
                let map: BTreeMap<String, DataSource> = serde_yaml::from_value(node)
                    .map_err(|e| D::Error::custom(format!("failed to decode {tag} node: {e}")))?;
                Ok(Templates(map))
            }
            other => Err(D::Error::custom(format!(
                "cannot unmarshal unexpected type {}",
                node_tag(&other)
            ))),
        }
    }
}

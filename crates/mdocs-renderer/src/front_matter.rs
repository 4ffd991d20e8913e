//! YAML front-matter extraction.
//!
//! A front-matter block opens with a `---` line at the very start of the
//! file and closes with the next `---` (or `...`) line:
//!
//! ```text
//! ---
//! title: Installation
//! order: 2
//! ---
//! # Installation
//! ```
//!
//! Parsing never fails. Missing, unterminated or malformed blocks yield an
//! empty [`FrontMatter`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Metadata mapping from a document's front-matter block.
///
/// Keys other than the recognized ones (`title`, `description`, `icon`,
/// `published`, `order`) are kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(BTreeMap<String, Value>);

impl FrontMatter {
    /// Value for any key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Document title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.get_str("icon")
    }

    /// Explicit `published` flag, if any.
    #[must_use]
    pub fn published(&self) -> Option<bool> {
        self.0.get("published").and_then(Value::as_bool)
    }

    /// Sort order within navigation listings.
    #[must_use]
    pub fn order(&self) -> Option<i64> {
        self.0.get("order").and_then(Value::as_i64)
    }

    /// False only when `published: false` is set.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published().unwrap_or(true)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<BTreeMap<String, Value>> for FrontMatter {
    /// Numeric and boolean values of the text fields are kept as strings,
    /// so `title: 2024` is the title `"2024"`.
    fn from(mut map: BTreeMap<String, Value>) -> Self {
        for key in TEXT_FIELDS {
            if let Some(value) = map.get_mut(*key)
                && (value.is_number() || value.is_boolean())
            {
                *value = Value::String(value.to_string());
            }
        }
        Self(map)
    }
}

const TEXT_FIELDS: &[&str] = &["title", "description", "icon"];

/// Split a Markdown file into front-matter and body.
///
/// The body is returned as a slice of `raw`: the whole input when there is
/// no complete block, otherwise everything after the closing delimiter.
#[must_use]
pub fn parse_front_matter(raw: &str) -> (FrontMatter, &str) {
    let Some((yaml, body)) = split_block(raw) else {
        return (FrontMatter::default(), raw);
    };

    if yaml.trim().is_empty() {
        return (FrontMatter::default(), body);
    }

    match serde_yaml::from_str::<BTreeMap<String, Value>>(yaml) {
        Ok(map) => (FrontMatter::from(map), body),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed front-matter");
            (FrontMatter::default(), body)
        }
    }
}

/// Locate the YAML block and the body that follows it.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let (first, rest) = text.split_once('\n')?;
    if first.trim_end() != "---" {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

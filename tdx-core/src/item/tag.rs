//! Hashtags found in summaries and descriptions.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// `#` not preceded by a word character, then one or more word characters
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\B#\w+").unwrap());

/// A `#tag`. Equality and hashing ignore case; the original spelling is kept
/// for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Build a tag, adding the leading `#` if missing.
    pub fn new(name: &str) -> Self {
        if name.starts_with('#') {
            Tag(name.to_string())
        } else {
            Tag(format!("#{}", name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags in `texts`, in order of first appearance, without case-insensitive
/// duplicates.
pub fn extract_tags<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for text in texts {
        for m in TAG_PATTERN.find_iter(text) {
            let tag = Tag::new(m.as_str());
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

//! Dot-separated identifier lists.
//!
//! Prerelease and build metadata are both sequences of identifiers joined by
//! a separator. [`SeparatedList`] normalizes the shapes such a sequence can
//! arrive in (nothing, a joined string, or a list of values) into an ordered
//! list of string tokens.

use crate::{Result, VersionError};

/// An ordered list of identifier tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeparatedList(Vec<String>);

impl SeparatedList {
    /// Separator used by SemVer prerelease and build identifiers.
    pub const DEFAULT_SEPARATOR: char = '.';

    /// Split dot-separated text. Absent or empty text yields an empty list.
    pub fn from_text(text: Option<&str>) -> Self {
        Self::split(text, Self::DEFAULT_SEPARATOR)
    }

    /// Split text on `sep`, keeping empty tokens between consecutive separators.
    pub fn split(text: Option<&str>, sep: char) -> Self {
        match text {
            None | Some("") => Self::default(),
            Some(text) => Self(text.split(sep).map(str::to_string).collect()),
        }
    }

    /// Convert each item to its string form, preserving order and count.
    pub fn from_items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self(items.into_iter().map(|item| item.to_string()).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for SeparatedList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SeparatedList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identifiers read from configuration may be a joined string or an array of
/// scalars. Any other kind of value is rejected.
impl TryFrom<&toml::Value> for SeparatedList {
    type Error = VersionError;

    fn try_from(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::String(text) => Ok(Self::from_text(Some(text))),
            toml::Value::Array(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Result<Vec<_>>>()
                .map(Self),
            other => Err(VersionError::InvalidInputKind(kind_name(other))),
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        // 1.0 would come back as "1"; quote it to keep the written form
        toml::Value::Float(_) => Err(VersionError::InvalidInputKind("a float")),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) => Err(VersionError::InvalidInputKind("a nested array")),
        toml::Value::Table(_) => Err(VersionError::InvalidInputKind("a nested table")),
    }
}

fn kind_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "a string",
        toml::Value::Integer(_) => "an integer",
        toml::Value::Float(_) => "a float",
        toml::Value::Boolean(_) => "a boolean",
        toml::Value::Datetime(_) => "a datetime",
        toml::Value::Array(_) => "an array",
        toml::Value::Table(_) => "a table",
    }
}

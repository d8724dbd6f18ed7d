//! Structured SemVer 2.0 values.
//!
//! [`Version`] parses leniently with respect to missing components (a bare
//! `"1"` is `1.0.0`, an optional `v` prefix is accepted) but strictly with
//! respect to the identifier grammar: anything that does not match the whole
//! pattern is rejected.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::separated::SeparatedList;
use crate::{Result, VersionError};

/// `[vV]? MAJOR(.MINOR(.PATCH)?)? (-PRERELEASE)? (+BUILD)?`, every part optional.
const VERSION_PATTERN: &str = r"(?x)
    ^[vV]?
    (?:
        (?P<major>0|[1-9][0-9]*)
        (?:
            \.(?P<minor>0|[1-9][0-9]*)
            (?:
                \.(?P<patch>0|[1-9][0-9]*)
            )?
        )?
    )?
    (?:-(?P<prerelease>
        (?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)
        (?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*
    ))?
    (?:\+(?P<build>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?
    $";

fn version_regex() -> &'static Regex {
    static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
    VERSION_REGEX.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// A semantic version with its prerelease and build identifiers split out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Dot-separated prerelease identifiers ("pre.1" -> ["pre", "1"])
    #[serde(default)]
    pub prerelease: Vec<String>,
    /// Dot-separated build metadata identifiers
    #[serde(default)]
    pub build: Vec<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a version string.
    ///
    /// Absent or empty text is `0.0.0`. Missing minor/patch components
    /// default to zero. Text that does not match the grammar as a whole
    /// fails with [`VersionError::InvalidVersionString`].
    ///
    /// # Example
    /// ```
    /// use gitsemver::Version;
    ///
    /// let v = Version::parse(Some("v1.2-rc.1")).unwrap();
    /// assert_eq!(v.to_string(), "1.2.0-rc.1");
    /// ```
    pub fn parse(text: Option<&str>) -> Result<Self> {
        let text = text.unwrap_or("");
        let invalid = || VersionError::InvalidVersionString(text.to_string());

        let caps = version_regex().captures(text).ok_or_else(invalid)?;
        let number = |name: &str| -> Result<u64> {
            match caps.name(name) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        Ok(Self {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            prerelease: SeparatedList::from_text(caps.name("prerelease").map(|m| m.as_str()))
                .into_vec(),
            build: SeparatedList::from_text(caps.name("build").map(|m| m.as_str())).into_vec(),
        })
    }

    /// Append identifiers to the prerelease list, in order.
    ///
    /// Identifiers are not re-validated against the grammar.
    pub fn append_prerelease<I, T>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.prerelease.extend(SeparatedList::from_items(ids));
        self
    }

    /// Append identifiers to the build metadata list, in order.
    pub fn append_build<I, T>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.build.extend(SeparatedList::from_items(ids));
        self
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

//! Output formats for versions.
//!
//! All formatters are pure and total. Plain [`Version`]s and
//! [`DerivedVersion`](crate::DerivedVersion)s both render through the
//! [`Render`] trait; derived versions additionally expose the commit
//! distance, which the cmake format appends as a fourth component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::version::Version;

/// Something that can be printed as a version.
pub trait Render {
    /// The value printed by the semver format.
    fn semver_value(&self) -> &Version;

    /// Release numbers printed by the cmake format.
    fn release(&self) -> &Version {
        self.semver_value()
    }

    /// Commits since the tag, for values derived from `git describe`.
    fn commit_distance(&self) -> Option<u64> {
        None
    }

    fn commit_id(&self) -> Option<&str> {
        None
    }
}

impl Render for Version {
    fn semver_value(&self) -> &Version {
        self
    }
}

/// `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`
pub fn semver<V: Render + ?Sized>(v: &V) -> String {
    v.semver_value().to_string()
}

/// `MAJOR.MINOR.PATCH[.DISTANCE]`, never containing letters.
pub fn cmake<V: Render + ?Sized>(v: &V) -> String {
    let release = v.release();
    let mut out = format!("{}.{}.{}", release.major, release.minor, release.patch);
    if let Some(distance) = v.commit_distance().filter(|d| *d > 0) {
        out.push_str(&format!(".{}", distance));
    }
    out
}

/// Single-line JSON object with the structured semver value.
pub fn json<V: Render + ?Sized>(v: &V) -> String {
    let version = v.semver_value();
    let mut value = serde_json::json!({
        "major": version.major,
        "minor": version.minor,
        "patch": version.patch,
        "prerelease": version.prerelease,
        "build": version.build,
    });
    if let Some(distance) = v.commit_distance() {
        value["commit_distance"] = distance.into();
        value["commit_id"] = v.commit_id().unwrap_or_default().into();
    }
    value.to_string()
}

/// Selectable output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Semver,
    Cmake,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Semver, Format::Cmake, Format::Json];

    pub fn render<V: Render + ?Sized>(self, v: &V) -> String {
        match self {
            Format::Semver => semver(v),
            Format::Cmake => cmake(v),
            Format::Json => json(v),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Semver => write!(f, "semver"),
            Format::Cmake => write!(f, "cmake"),
            Format::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown format '{}' (expected semver, cmake or json)", s))
    }
}

//! Versions derived from `git describe --long` output.
//!
//! A describe line has the shape `TAG-DISTANCE-gCOMMIT`, or just `COMMIT`
//! when no tag is reachable. The tag may itself contain hyphens (for example
//! `v1.0.0-rc.1`), so only the last two components are split off.
//!
//! Derivation rules, given the parsed tag:
//! - no tag: `0.0.0+COMMIT`
//! - distance 0: the tag unchanged
//! - tag with prerelease: append `dev.DISTANCE` to the prerelease, `COMMIT` to the build
//! - otherwise: bump patch, prerelease `dev.DISTANCE`, build `COMMIT`

use std::fmt;
use std::str::FromStr;

use crate::format::Render;
use crate::separated::SeparatedList;
use crate::version::Version;
use crate::{Result, VersionError};

static UNTAGGED: Version = Version {
    major: 0,
    minor: 0,
    patch: 0,
    prerelease: Vec::new(),
    build: Vec::new(),
};

/// One line of `git describe --long --always` output, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeLine {
    /// Tag text, `None` when git found no matching tag
    pub tag: Option<String>,
    /// Number of commits between the tag and the described commit
    pub commit_distance: u64,
    /// Abbreviated commit id as printed by git (including its `g` prefix)
    pub commit_id: String,
}

impl DescribeLine {
    /// Split a describe line on its last two hyphens.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(VersionError::InvalidDescribe(line.to_string()));
        }

        let Some((rest, commit_id)) = line.rsplit_once('-') else {
            return Ok(Self {
                tag: None,
                commit_distance: 0,
                commit_id: line.to_string(),
            });
        };

        let (tag, distance) = match rest.rsplit_once('-') {
            Some((tag, distance)) => (Some(tag), distance),
            None => (None, rest),
        };

        if distance.is_empty() || !distance.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::InvalidDescribe(line.to_string()));
        }
        let commit_distance = distance
            .parse()
            .map_err(|_| VersionError::InvalidDescribe(line.to_string()))?;

        Ok(Self {
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
            commit_distance,
            commit_id: commit_id.to_string(),
        })
    }

    pub fn derive(&self) -> Result<DerivedVersion> {
        derive(self.tag.as_deref(), self.commit_distance, &self.commit_id)
    }
}

impl FromStr for DescribeLine {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A version derived from a tag, a commit distance and a commit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVersion {
    /// The parsed tag, `None` for untagged history
    pub tag: Option<Version>,
    /// The derived version
    pub version: Version,
    pub commit_distance: u64,
    pub commit_id: String,
}

impl DerivedVersion {
    /// Tokenize and derive a raw describe line in one step.
    pub fn from_describe(line: &str) -> Result<Self> {
        DescribeLine::parse(line)?.derive()
    }

    /// Append extra build identifiers (for example a CI run number).
    pub fn with_build_metadata(mut self, ids: SeparatedList) -> Self {
        self.version.append_build(ids);
        self
    }

    /// True when the described commit is exactly a tag.
    pub fn is_exact(&self) -> bool {
        self.tag.is_some() && self.commit_distance == 0
    }
}

/// Derive a version from the parts of a describe line.
///
/// An absent or empty tag is the untagged case. A tag that is not a valid
/// version fails with [`VersionError::InvalidVersionString`].
///
/// # Example
/// ```
/// use gitsemver::{derive, format};
///
/// let v = derive(Some("v0.0.1"), 5, "gaf36311").unwrap();
/// assert_eq!(format::semver(&v), "0.0.2-dev.5+gaf36311");
/// assert_eq!(format::cmake(&v), "0.0.1.5");
/// ```
pub fn derive(tag: Option<&str>, commit_distance: u64, commit_id: &str) -> Result<DerivedVersion> {
    let Some(tag_text) = tag.filter(|t| !t.is_empty()) else {
        let mut version = Version::default();
        if !commit_id.is_empty() {
            version.append_build([commit_id]);
        }
        return Ok(DerivedVersion {
            tag: None,
            version,
            commit_distance,
            commit_id: commit_id.to_string(),
        });
    };

    let base = Version::parse(Some(tag_text))?;
    let mut version = base.clone();

    if commit_distance > 0 {
        if version.prerelease.is_empty() {
            version.patch = version
                .patch
                .checked_add(1)
                .ok_or_else(|| VersionError::InvalidVersionString(tag_text.to_string()))?;
        }
        version.append_prerelease(["dev".to_string(), commit_distance.to_string()]);
        if !commit_id.is_empty() {
            version.append_build([commit_id]);
        }
    }

    Ok(DerivedVersion {
        tag: Some(base),
        version,
        commit_distance,
        commit_id: commit_id.to_string(),
    })
}

impl Render for DerivedVersion {
    fn semver_value(&self) -> &Version {
        &self.version
    }

    // cmake keeps the tag's numbers and carries the distance separately
    fn release(&self) -> &Version {
        self.tag.as_ref().unwrap_or(&UNTAGGED)
    }

    fn commit_distance(&self) -> Option<u64> {
        Some(self.commit_distance)
    }

    fn commit_id(&self) -> Option<&str> {
        Some(&self.commit_id)
    }
}

impl fmt::Display for DerivedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.version, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{cmake, json, semver};

    // =========================================================================
    // Describe line tokenizing
    // =========================================================================

    #[test]
    fn test_parse_bare_commit() {
        let line = DescribeLine::parse("a5e0daa").unwrap();
        assert_eq!(line.tag, None);
        assert_eq!(line.commit_distance, 0);
        assert_eq!(line.commit_id, "a5e0daa");
    }

    #[test]
    fn test_parse_tagged() {
        let line = DescribeLine::parse("v0.0.1-5-gaf36311\n").unwrap();
        assert_eq!(line.tag.as_deref(), Some("v0.0.1"));
        assert_eq!(line.commit_distance, 5);
        assert_eq!(line.commit_id, "gaf36311");
    }

    #[test]
    fn test_parse_tag_with_hyphens() {
        let line = DescribeLine::parse("0.0.2-pre.1+build.6-5-gaf36311").unwrap();
        assert_eq!(line.tag.as_deref(), Some("0.0.2-pre.1+build.6"));
        assert_eq!(line.commit_distance, 5);

        let line = DescribeLine::parse("release-2024-v1-12-gdeadbee").unwrap();
        assert_eq!(line.tag.as_deref(), Some("release-2024-v1"));
        assert_eq!(line.commit_distance, 12);
        assert_eq!(line.commit_id, "gdeadbee");
    }

    #[test]
    fn test_parse_distance_without_tag() {
        let line = DescribeLine::parse("3-gabc1234").unwrap();
        assert_eq!(line.tag, None);
        assert_eq!(line.commit_distance, 3);
    }

    #[test]
    fn test_parse_rejects_empty_line() {
        assert_eq!(
            DescribeLine::parse(""),
            Err(VersionError::InvalidDescribe(String::new()))
        );
        assert!(DescribeLine::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_distance() {
        assert!(DescribeLine::parse("v1.0.0-five-gabc1234").is_err());
        assert!(DescribeLine::parse("v1.0.0-+5-gabc1234").is_err());
        assert!(DescribeLine::parse("v1.0.0--gabc1234").is_err());
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// (describe line, semver, cmake)
    const DESCRIBE_CASES: &[(&str, &str, &str)] = &[
        ("a5e0daa", "0.0.0+a5e0daa", "0.0.0"),
        ("v0.0.1-5-gaf36311", "0.0.2-dev.5+gaf36311", "0.0.1.5"),
        ("0.0.1-5-gaf36311", "0.0.2-dev.5+gaf36311", "0.0.1.5"),
        ("0.0.2-pre.1-5-gaf36311", "0.0.2-pre.1.dev.5+gaf36311", "0.0.2.5"),
        (
            "0.0.2-pre.1+build.6-5-gaf36311",
            "0.0.2-pre.1.dev.5+build.6.gaf36311",
            "0.0.2.5",
        ),
        ("v0.0.1-0-g68be31c", "0.0.1", "0.0.1"),
    ];

    #[test]
    fn test_describe_cases() {
        for (line, expected_semver, expected_cmake) in DESCRIBE_CASES {
            let derived = DerivedVersion::from_describe(line).unwrap();
            assert_eq!(semver(&derived), *expected_semver, "semver of {line:?}");
            assert_eq!(cmake(&derived), *expected_cmake, "cmake of {line:?}");
        }
    }

    #[test]
    fn test_derived_semver_is_valid_semver() {
        for (line, _, _) in DESCRIBE_CASES {
            let derived = DerivedVersion::from_describe(line).unwrap();
            assert!(
                ::semver::Version::parse(&derived.to_string()).is_ok(),
                "{derived} should be valid semver"
            );
        }
    }

    #[test]
    fn test_untagged() {
        let derived = derive(None, 0, "a5e0daa").unwrap();
        assert_eq!(derived.version.build, vec!["a5e0daa"]);
        assert_eq!(derived.tag, None);
        assert!(!derived.is_exact());

        let derived = derive(Some(""), 0, "").unwrap();
        assert_eq!(semver(&derived), "0.0.0");
    }

    #[test]
    fn test_tag_without_prerelease() {
        let derived = derive(Some("1"), 1, "abcdef").unwrap();
        assert_eq!(semver(&derived), "1.0.1-dev.1+abcdef");
        assert_eq!(cmake(&derived), "1.0.0.1");
        // The tag itself is kept untouched
        assert_eq!(derived.tag, Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_tag_with_prerelease_and_build() {
        let derived = derive(Some("1.2.3-pre.1+build.2"), 1, "abcdef").unwrap();
        assert_eq!(semver(&derived), "1.2.3-pre.1.dev.1+build.2.abcdef");
        assert_eq!(cmake(&derived), "1.2.3.1");
    }

    #[test]
    fn test_exact_tag_drops_commit_id() {
        let derived = derive(Some("1"), 0, "abcdef").unwrap();
        assert_eq!(semver(&derived), "1.0.0");
        assert_eq!(cmake(&derived), "1.0.0");
        assert!(derived.is_exact());

        let derived = derive(Some("1.2.3-pre.1+build.2"), 0, "abcdef").unwrap();
        assert_eq!(semver(&derived), "1.2.3-pre.1+build.2");
        assert_eq!(cmake(&derived), "1.2.3");
    }

    #[test]
    fn test_empty_commit_id_not_appended() {
        let derived = derive(Some("v2.0.0"), 3, "").unwrap();
        assert_eq!(semver(&derived), "2.0.1-dev.3");
    }

    #[test]
    fn test_invalid_tag_is_an_error() {
        assert_eq!(
            derive(Some("something"), 5, "gabc1234"),
            Err(VersionError::InvalidVersionString("something".to_string()))
        );
        assert!(DerivedVersion::from_describe("release-candidate-5-gabc1234").is_err());
    }

    #[test]
    fn test_patch_overflow_is_an_error() {
        let tag = format!("0.0.{}", u64::MAX);
        assert!(derive(Some(&tag), 1, "gabc").is_err());
    }

    #[test]
    fn test_with_build_metadata() {
        let derived = derive(Some("v0.0.1"), 5, "gaf36311")
            .unwrap()
            .with_build_metadata(SeparatedList::from_text(Some("ci.42")));
        assert_eq!(semver(&derived), "0.0.2-dev.5+gaf36311.ci.42");
        assert_eq!(cmake(&derived), "0.0.1.5");
    }

    #[test]
    fn test_json_includes_commit_fields() {
        let derived = DerivedVersion::from_describe("v0.0.1-5-gaf36311").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json(&derived)).unwrap();
        assert_eq!(value["patch"], 2);
        assert_eq!(value["prerelease"], serde_json::json!(["dev", "5"]));
        assert_eq!(value["commit_distance"], 5);
        assert_eq!(value["commit_id"], "gaf36311");
    }
}

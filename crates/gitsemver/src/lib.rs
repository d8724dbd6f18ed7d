//! gitsemver: semantic versions derived from `git describe`
//!
//! This crate turns the output of `git describe --always --long` into a
//! SemVer 2.0 version that stays meaningful between tagged releases:
//! - Strict SemVer parsing with defaults for missing numeric components
//! - Derivation of "N commits past tag X, at commit Y" versions
//! - Rendering to SemVer, to the dotted numeric cmake form, and to JSON
//! - Running `git describe` and stamping the result into a Cargo manifest

pub mod config;
pub mod describe;
pub mod format;
pub mod git;
pub mod manifest;
pub mod separated;
pub mod version;

// Re-export main types
pub use describe::{derive, DerivedVersion, DescribeLine};
pub use format::{Format, Render};
pub use separated::SeparatedList;
pub use version::Version;

/// Version printed when there is no git repository to describe.
pub const FALLBACK_VERSION: &str = "0.0.0+non.git.build";

/// Errors produced by the version core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Expected a string or a list of identifiers, found {0}")]
    InvalidInputKind(&'static str),

    #[error("Invalid version string: {0:?}")]
    InvalidVersionString(String),

    #[error("Malformed git describe output: {0:?}")]
    InvalidDescribe(String),
}

pub type Result<T> = std::result::Result<T, VersionError>;

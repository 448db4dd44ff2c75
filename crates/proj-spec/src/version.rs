//! `specVersion` handling.
//!
//! Configuration records declare the format revision they follow as a short
//! version string such as `"3.0"`. These are coerced to full semver versions
//! so they can be compared and matched against ranges.

use std::fmt;

use semver::{Version, VersionReq};

use crate::error::{Error, Result};

/// Oldest `specVersion` accepted by base initialization.
pub const MINIMUM_SPEC_VERSION: &str = "2.0";

/// A parsed `specVersion`.
#[derive(Debug, Clone)]
pub struct SpecVersion {
    raw: String,
    version: Version,
}

impl SpecVersion {
    /// Parse a `specVersion` string, padding missing minor/patch parts.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let padded = match trimmed.split('.').count() {
            1 => format!("{trimmed}.0.0"),
            2 => format!("{trimmed}.0"),
            _ => trimmed.to_string(),
        };
        let version = Version::parse(&padded).map_err(|source| Error::InvalidSpecVersion {
            version: raw.to_string(),
            source,
        })?;
        Ok(Self {
            raw: raw.to_string(),
            version,
        })
    }

    /// The string as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether this version matches a semver range such as `">=3.0"`.
    pub fn satisfies(&self, range: &str) -> Result<bool> {
        let req = VersionReq::parse(range).map_err(|source| Error::InvalidSpecVersion {
            version: range.to_string(),
            source,
        })?;
        Ok(req.matches(&self.version))
    }

    /// Fail with [`Error::UnsupportedSpecVersion`] below [`MINIMUM_SPEC_VERSION`].
    pub fn ensure_supported(&self) -> Result<()> {
        let minimum = Self::parse(MINIMUM_SPEC_VERSION)?;
        if self.version < minimum.version {
            return Err(Error::UnsupportedSpecVersion {
                version: self.raw.clone(),
                minimum: MINIMUM_SPEC_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

// Compared by semantic value, so `"3"` and `"3.0"` are equal.
impl PartialEq for SpecVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for SpecVersion {}

impl PartialOrd for SpecVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpecVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version.cmp(&other.version)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

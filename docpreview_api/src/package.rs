//! Package identity and version numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A three-component package version, ordered by major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError {
            input: s.to_owned(),
        };
        let mut parts = s.split('.');
        let mut next = || -> Result<u32, ParseVersionError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for Version {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// Returned when a string is not a `major.minor.patch` version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version {input:?}: expected MAJOR.MINOR.PATCH")]
pub struct ParseVersionError {
    /// Rejected input.
    pub input: String,
}

/// Registry identity of a package, written `author/project`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName {
    author: String,
    project: String,
}

impl PackageName {
    /// Construct a package name from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error when either part is empty or contains a `/`.
    pub fn new(
        author: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self, ParsePackageNameError> {
        let author = author.into();
        let project = project.into();
        let valid = |part: &str| !part.is_empty() && !part.contains('/');
        if valid(&author) && valid(&project) {
            Ok(Self { author, project })
        } else {
            Err(ParsePackageNameError {
                input: format!("{author}/{project}"),
            })
        }
    }

    /// Account that publishes the package.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Project name within the author's namespace.
    pub fn project(&self) -> &str {
        &self.project
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.project)
    }
}

impl FromStr for PackageName {
    type Err = ParsePackageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (author, project) = s.split_once('/').ok_or_else(|| ParsePackageNameError {
            input: s.to_owned(),
        })?;
        Self::new(author, project)
    }
}

impl TryFrom<String> for PackageName {
    type Error = ParsePackageNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.to_string()
    }
}

/// Returned when a string is not an `author/project` package name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid package name {input:?}: expected AUTHOR/PROJECT")]
pub struct ParsePackageNameError {
    /// Rejected input.
    pub input: String,
}

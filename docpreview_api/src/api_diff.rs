use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overall severity of an API change as reported by the compiler's diff tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Magnitude {
    /// Breaking change.
    Major,
    /// Backwards-compatible addition.
    Minor,
    /// No visible API change.
    Patch,
}

impl Magnitude {
    /// Upper-case label used in the compiler report and the wire format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Magnitude {
    type Err = UnknownMagnitude;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAJOR" => Ok(Self::Major),
            "MINOR" => Ok(Self::Minor),
            "PATCH" => Ok(Self::Patch),
            other => Err(UnknownMagnitude(other.to_owned())),
        }
    }
}

/// Returned when a magnitude label is not one of `MAJOR`, `MINOR` or `PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown change magnitude: {0}")]
pub struct UnknownMagnitude(pub String);

/// Structured API change report between the published and current package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiff {
    /// Overall change magnitude.
    pub magnitude: Magnitude,
    /// Modules newly exposed, in report order.
    #[serde(default)]
    pub added_modules: Vec<String>,
    /// Modules no longer exposed, in report order.
    #[serde(default)]
    pub removed_modules: Vec<String>,
    /// Per-module symbol changes, in report order.
    #[serde(default)]
    pub changed_modules: Vec<ModuleChanges>,
}

impl ApiDiff {
    /// An empty report carrying only its magnitude.
    pub const fn new(magnitude: Magnitude) -> Self {
        Self {
            magnitude,
            added_modules: Vec::new(),
            removed_modules: Vec::new(),
            changed_modules: Vec::new(),
        }
    }

    /// Look up the changes recorded for a module.
    pub fn module(&self, name: &str) -> Option<&ModuleChanges> {
        self.changed_modules.iter().find(|module| module.name == name)
    }

    /// True when no module or symbol change was recorded.
    pub fn is_empty(&self) -> bool {
        self.added_modules.is_empty()
            && self.removed_modules.is_empty()
            && self.changed_modules.iter().all(ModuleChanges::is_empty)
    }
}

/// Symbol-level changes within one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleChanges {
    /// Module name.
    pub name: String,
    /// Newly introduced symbols.
    #[serde(default)]
    pub added: Vec<String>,
    /// Symbols whose signature changed.
    #[serde(default)]
    pub changed: Vec<String>,
    /// Dropped symbols.
    #[serde(default)]
    pub removed: Vec<String>,
}

impl ModuleChanges {
    /// Construct an empty change set for a module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            added: Vec::new(),
            changed: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Whether `symbol` is already recorded in any of the three lists.
    pub fn contains(&self, symbol: &str) -> bool {
        [&self.added, &self.changed, &self.removed]
            .into_iter()
            .any(|list| list.iter().any(|name| name == symbol))
    }

    /// True when no symbol change was recorded.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

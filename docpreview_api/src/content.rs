use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Role of a line in a line-level diff.
///
/// Encoded on the wire as the integers `-1`, `0` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffLineKind {
    /// Line only present in the old text.
    Removed,
    /// Line present in both texts.
    Context,
    /// Line only present in the new text.
    Added,
}

impl DiffLineKind {
    /// Integer status used by the wire format.
    pub const fn status(self) -> i8 {
        match self {
            Self::Removed => -1,
            Self::Context => 0,
            Self::Added => 1,
        }
    }

    /// Inverse of [`DiffLineKind::status`].
    pub const fn from_status(status: i8) -> Option<Self> {
        match status {
            -1 => Some(Self::Removed),
            0 => Some(Self::Context),
            1 => Some(Self::Added),
            _ => None,
        }
    }
}

impl Serialize for DiffLineKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.status())
    }
}

impl<'de> Deserialize<'de> for DiffLineKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = i8::deserialize(deserializer)?;
        Self::from_status(status).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Signed(status.into()), &"-1, 0 or 1")
        })
    }
}

/// A single classified line, encoded as `[status, text]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(DiffLineKind, String)", into = "(DiffLineKind, String)")]
pub struct DiffLine {
    /// Classification of the line.
    pub kind: DiffLineKind,
    /// Line text without its terminating newline.
    pub text: String,
}

impl DiffLine {
    /// Convenience constructor.
    pub fn new(kind: DiffLineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Context line.
    pub fn context(text: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Context, text)
    }

    /// Added line.
    pub fn added(text: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Added, text)
    }

    /// Removed line.
    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Removed, text)
    }
}

impl From<(DiffLineKind, String)> for DiffLine {
    fn from((kind, text): (DiffLineKind, String)) -> Self {
        Self { kind, text }
    }
}

impl From<DiffLine> for (DiffLineKind, String) {
    fn from(line: DiffLine) -> Self {
        (line.kind, line.text)
    }
}

/// Doc-comment, signature and README changes between two documentation snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDiff {
    /// Modules with at least one changed item, keyed by module name.
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleContentDiff>,
    /// Line diff of the README, when it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_diff: Option<Vec<DiffLine>>,
}

impl ContentDiff {
    /// True when neither a module item nor the README changed.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.readme_diff.is_none()
    }
}

/// Changed items of one module, keyed by entity name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleContentDiff {
    /// Item-level changes.
    #[serde(default)]
    pub items: BTreeMap<String, ItemContentDiff>,
}

/// Change recorded for a single documented entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContentDiff {
    /// Line diff of the doc comment, when it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_diff: Option<Vec<DiffLine>>,
    /// Rendered previous declaration, when the signature changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_annotation: Option<String>,
}

impl ItemContentDiff {
    /// True when neither field is set.
    pub const fn is_empty(&self) -> bool {
        self.comment_diff.is_none() && self.old_annotation.is_none()
    }
}

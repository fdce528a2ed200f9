use serde::{Deserialize, Serialize};

use crate::{ApiDiff, ContentDiff, DocsSnapshot, PackageName, Version};

/// Result of one build cycle, delivered to the UI alongside the rebuilt docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewUpdate {
    /// Package name from the project manifest.
    #[serde(default)]
    pub name: Option<PackageName>,
    /// Version declared in the project manifest.
    #[serde(default)]
    pub version: Option<Version>,
    /// Latest published version used as the diff baseline.
    #[serde(default)]
    pub published_version: Option<Version>,
    /// Freshly built documentation.
    pub docs: DocsSnapshot,
    /// Current README text.
    #[serde(default)]
    pub readme: Option<String>,
    /// API diff against the published release; `null` when unavailable.
    #[serde(default)]
    pub diff: Option<ApiDiff>,
    /// Content diff against the published release; `null` when unavailable.
    #[serde(default)]
    pub content_diff: Option<ContentDiff>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_diffs_serialize_as_null() {
        let update = PreviewUpdate {
            name: Some("elm/json".parse().expect("name")),
            version: Some(Version::new(1, 1, 3)),
            published_version: None,
            docs: Vec::new(),
            readme: None,
            diff: None,
            content_diff: None,
        };
        let json = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(json["name"], "elm/json");
        assert_eq!(json["version"], "1.1.3");
        assert!(json["diff"].is_null());
        assert!(json["contentDiff"].is_null());
    }
}

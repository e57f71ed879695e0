use serde::{Deserialize, Serialize};

/// Placeholder replaced with the repository owner.
pub const OWNER_PLACEHOLDER: &str = "{owner}";
/// Placeholder replaced with the repository name.
pub const REPO_PLACEHOLDER: &str = "{repo}";

/// An external link definition offered on repository pages.
///
/// Builtin tools carry a static slug as `id`; custom tools get a UUID when
/// they are created. Records written before ids existed deserialize with
/// `id: None` and are backfilled on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Tool {
    pub fn new(name: &str, url: &str, description: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            url: url.to_string(),
            description: description.to_string(),
        }
    }

    /// Substitutes every `{owner}` and `{repo}` token in the URL template.
    ///
    /// Values are inserted verbatim; nothing is percent-encoded.
    pub fn resolve_url(&self, owner: &str, repo: &str) -> String {
        self.url
            .replace(OWNER_PLACEHOLDER, owner)
            .replace(REPO_PLACEHOLDER, repo)
    }
}

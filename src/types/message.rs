use serde::{Deserialize, Serialize};

use super::repository::RepoInfo;

/// Messages the page script sends to the background process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    /// Open the settings surface in a new tab.
    OpenSettings,
    /// Count one click on `tool` for `owner/repo`.
    TrackUsage {
        tool: String,
        owner: String,
        repo: String,
    },
    /// Ask for canonical repository details.
    GetRepoInfo { owner: String, repo: String },
}

/// Reply to [`ExtensionMessage::GetRepoInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RepoInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok(data: RepoInfo) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

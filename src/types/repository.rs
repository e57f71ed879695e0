use serde::{Deserialize, Serialize};

/// Base URL of the repository host.
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// An `owner/repo` pair detected on a page or supplied by a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// The usage-stats bucket key, `"owner/repo"`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn canonical_url(&self) -> String {
        format!("{}/{}/{}", GITHUB_BASE_URL, self.owner, self.repo)
    }
}

/// Repository details returned to the page script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub url: String,
}

impl From<&RepoRef> for RepoInfo {
    fn from(r: &RepoRef) -> Self {
        Self {
            owner: r.owner.clone(),
            repo: r.repo.clone(),
            url: r.canonical_url(),
        }
    }
}

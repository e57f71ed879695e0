// gittools link menu
// The entries of the repository-page dropdown: enabled tools, URLs resolved for the current repository.
// When the tool list cannot be read the dropdown still shows a few basic repository actions.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::services::tool_catalog;
use crate::types::errors::StorageError;
use crate::types::repository::RepoRef;
use crate::types::settings::Settings;

/// One row of the dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub url: String,
    /// Shown under the name when `showDetailedUrls` is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

/// Builds the dropdown for `repo` in catalog order, skipping disabled tools.
pub fn build_menu(settings: &Settings, repo: &RepoRef) -> Vec<MenuEntry> {
    tool_catalog::resolve_catalog(&settings.custom_tools)
        .into_iter()
        .enumerate()
        .filter(|(index, _)| settings.enabled_tools.is_enabled(*index))
        .map(|(index, tool)| {
            let url = tool.resolve_url(&repo.owner, &repo.repo);
            MenuEntry {
                index,
                name: tool.name,
                description: tool.description,
                detail_url: settings.config.show_detailed_urls.then(|| url.clone()),
                url,
            }
        })
        .collect()
}

/// Built-in action offered when the tool list is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BasicAction {
    CopyRepoInfo { text: String },
    CopyCloneCommand { command: String },
    OpenIssues { url: String },
}

/// What the dropdown shows for a repository page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LinkMenu {
    Tools { entries: Vec<MenuEntry> },
    Basic { actions: Vec<BasicAction> },
}

/// Copy-info, copy-clone and open-issues for `repo`.
pub fn basic_menu(repo: &RepoRef) -> Vec<BasicAction> {
    let url = repo.canonical_url();
    vec![
        BasicAction::CopyRepoInfo {
            text: format!("{}\n{}", repo.key(), url),
        },
        BasicAction::CopyCloneCommand {
            command: format!("git clone {}.git", url),
        },
        BasicAction::OpenIssues {
            url: format!("{}/issues", url),
        },
    ]
}

/// Tool menu from the stored settings, or the basic menu if they could not be read.
pub fn menu_for(stored: Result<Settings, StorageError>, repo: &RepoRef) -> LinkMenu {
    match stored {
        Ok(settings) => LinkMenu::Tools {
            entries: build_menu(&settings, repo),
        },
        Err(e) => {
            warn!("Tool list unavailable, showing basic menu: {}", e);
            LinkMenu::Basic {
                actions: basic_menu(repo),
            }
        }
    }
}

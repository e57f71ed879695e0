//! Repository page detection.
//!
//! A page is a repository page only when its path is exactly `/owner/repo`
//! (an optional trailing slash is allowed) and neither segment is one of
//! GitHub's reserved names. Anything else is simply "not a repository".

use crate::types::repository::{RepoRef, GITHUB_BASE_URL};

/// First path segments that are GitHub features, not users or organisations.
pub const EXCLUDED_OWNERS: &[&str] = &[
    "settings",
    "notifications",
    "explore",
    "marketplace",
    "sponsors",
    "orgs",
    "enterprises",
    "topics",
    "collections",
    "events",
    "new",
    "organizations",
    "users",
    "login",
    "join",
    "pricing",
    "features",
    "security",
    "team",
    "enterprise",
    "customer-stories",
    "readme",
    "site",
];

/// Second path segments that are profile tabs, not repositories.
pub const EXCLUDED_REPOS: &[&str] = &[
    "settings",
    "notifications",
    "repositories",
    "projects",
    "packages",
    "stars",
    "followers",
    "following",
];

/// Detects `owner/repo` from a URL path such as `/rust-lang/rust`.
pub fn detect_repository(path: &str) -> Option<RepoRef> {
    let rest = path.strip_prefix('/')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    let mut segments = rest.split('/');
    let owner = segments.next()?;
    let repo = segments.next()?;
    if segments.next().is_some() || owner.is_empty() || repo.is_empty() {
        return None;
    }

    if EXCLUDED_OWNERS.contains(&owner) || EXCLUDED_REPOS.contains(&repo) {
        return None;
    }

    Some(RepoRef::new(owner, repo))
}

/// Detects `owner/repo` from a full `https://github.com/...` URL.
///
/// Query strings and fragments are ignored.
pub fn detect_repository_url(url: &str) -> Option<RepoRef> {
    let rest = url.strip_prefix(GITHUB_BASE_URL)?;
    let end = rest.find(|c| c == '?' || c == '#').unwrap_or(rest.len());
    detect_repository(&rest[..end])
}

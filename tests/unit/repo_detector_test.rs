//! Table-driven tests for repository page detection.

use rstest::rstest;

use gittools::services::repo_detector::{detect_repository, detect_repository_url, EXCLUDED_OWNERS, EXCLUDED_REPOS};
use gittools::types::repository::RepoRef;

#[rstest]
#[case("/rust-lang/rust", "rust-lang", "rust")]
#[case("/rust-lang/rust/", "rust-lang", "rust")]
#[case("/a/b", "a", "b")]
#[case("/octo-org/.github", "octo-org", ".github")]
fn test_repository_paths_are_detected(#[case] path: &str, #[case] owner: &str, #[case] repo: &str) {
    assert_eq!(detect_repository(path), Some(RepoRef::new(owner, repo)));
}

#[rstest]
#[case("/")]
#[case("")]
#[case("/rust-lang")]
#[case("/rust-lang/")]
#[case("/rust-lang/rust/issues")]
#[case("/rust-lang/rust/tree/master")]
#[case("//rust")]
#[case("rust-lang/rust")]
#[case("/settings/profile")]
#[case("/orgs/rust-lang")]
#[case("/octocat/followers")]
#[case("/octocat/stars")]
fn test_non_repository_paths_are_ignored(#[case] path: &str) {
    assert_eq!(detect_repository(path), None);
}

#[test]
fn test_every_excluded_name_is_rejected() {
    for owner in EXCLUDED_OWNERS {
        assert_eq!(detect_repository(&format!("/{}/anything", owner)), None, "owner {}", owner);
    }
    for repo in EXCLUDED_REPOS {
        assert_eq!(detect_repository(&format!("/someone/{}", repo)), None, "repo {}", repo);
    }
}

#[test]
fn test_detected_repo_builds_key_and_url() {
    let repo = detect_repository_url("https://github.com/serde-rs/json").unwrap();
    assert_eq!(repo.key(), "serde-rs/json");
    assert_eq!(repo.canonical_url(), "https://github.com/serde-rs/json");
}

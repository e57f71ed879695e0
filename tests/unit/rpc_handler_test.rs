//! Unit tests for the methods dispatched by `handle_method`.
//!
//! These go through the same code path as the `gittools-rpc` binary, using a
//! temporary on-disk SQLite database.

use std::cell::Cell;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;

use gittools::app::App;
use gittools::rpc_handler::{handle_method, SETTINGS_PAGE};
use gittools::services::settings_export::EXPORT_FILE_NAME;
use gittools::services::sync_storage::{MemorySyncStorage, StorageItems, SyncStorage};
use gittools::types::errors::StorageError;

/// Create a fresh App backed by a temp directory DB.
fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let mut app = App::new(tmp.path().join("test.db")).expect("Failed to init App");
    app.startup();
    (Mutex::new(app), tmp)
}

/// In-memory storage whose reads can be switched off.
#[derive(Default)]
struct ToggleReads {
    inner: MemorySyncStorage,
    fail_reads: Cell<bool>,
}

impl SyncStorage for ToggleReads {
    fn get(&self, keys: &[&str]) -> Result<StorageItems, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("read failed".to_string()));
        }
        self.inner.get(keys)
    }

    fn get_all(&self) -> Result<StorageItems, StorageError> {
        self.inner.get_all()
    }

    fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        self.inner.set(items)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.inner.remove(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}

fn call(app: &Mutex<App>, method: &str, params: Value) -> Value {
    handle_method(app, method, &params).unwrap()
}

// ─── Basics ───

#[test]
fn test_ping() {
    let (app, _tmp) = setup();
    assert_eq!(call(&app, "ping", json!({})), json!({"pong": true}));
}

#[test]
fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Page script messages ───

#[test]
fn test_open_settings() {
    let (app, _tmp) = setup();
    let res = call(&app, "openSettings", Value::Null);
    assert_eq!(res["page"], SETTINGS_PAGE);
}

#[test]
fn test_track_usage_and_leaderboard() {
    let (app, _tmp) = setup();
    for _ in 0..3 {
        call(&app, "trackUsage", json!({"tool": "X", "owner": "a", "repo": "b"}));
    }
    let res = call(&app, "trackUsage", json!({"tool": "Y", "owner": "a", "repo": "b"}));
    assert_eq!(res["count"], 1);

    let top = call(&app, "stats.top", json!({"limit": 1}));
    assert_eq!(
        top,
        json!([{"repoKey": "a/b", "total": 4, "perTool": {"X": 3, "Y": 1}}])
    );
}

#[test]
fn test_track_usage_missing_field_is_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "trackUsage", &json!({"owner": "a", "repo": "b"}));
    assert!(res.unwrap_err().contains("invalid message"));
}

#[test]
fn test_track_usage_requires_owner_and_repo() {
    let (app, _tmp) = setup();
    for params in [
        json!({"tool": "X", "owner": "", "repo": "b"}),
        json!({"tool": "X", "owner": "a", "repo": ""}),
        json!({"tool": "X", "owner": "", "repo": ""}),
    ] {
        let res = handle_method(&app, "trackUsage", &params);
        assert!(res.unwrap_err().contains("owner and repo are required"));
    }
    assert_eq!(call(&app, "stats.top", json!({})), json!([]));
}

#[test]
fn test_get_repo_info() {
    let (app, _tmp) = setup();
    let res = call(&app, "getRepoInfo", json!({"owner": "rust-lang", "repo": "rust"}));
    assert_eq!(
        res,
        json!({
            "success": true,
            "data": {"owner": "rust-lang", "repo": "rust", "url": "https://github.com/rust-lang/rust"}
        })
    );

    let res = call(&app, "getRepoInfo", json!({"owner": "", "repo": "rust"}));
    assert_eq!(res["success"], false);
    assert!(res["error"].is_string());
}

// ─── Page binding ───

#[test]
fn test_page_detect() {
    let (app, _tmp) = setup();
    let res = call(&app, "page.detect", json!({"url": "https://github.com/a/b"}));
    assert_eq!(res["repository"], json!({"owner": "a", "repo": "b"}));

    let res = call(&app, "page.detect", json!({"path": "/explore/b"}));
    assert!(res["repository"].is_null());

    assert!(handle_method(&app, "page.detect", &json!({})).is_err());
}

#[test]
fn test_menu_follows_enabled_tools() {
    let (app, _tmp) = setup();
    call(&app, "tool.setEnabled", json!({"index": 0, "enabled": false}));

    let menu = call(&app, "menu.list", json!({"owner": "a", "repo": "b"}));
    assert_eq!(menu["kind"], "tools");
    let entries = menu["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["name"], "GitHub1s");
    assert_eq!(entries[0]["url"], "https://github1s.com/a/b");
    assert!(entries[0].get("detailUrl").is_none());

    call(&app, "config.set", json!({"showDetailedUrls": true}));
    let menu = call(&app, "menu.list", json!({"owner": "a", "repo": "b"}));
    assert_eq!(menu["entries"][0]["detailUrl"], "https://github1s.com/a/b");
}

#[test]
fn test_menu_falls_back_when_storage_unreadable() {
    let storage = Arc::new(ToggleReads::default());
    let app = Mutex::new(App::with_storage(storage.clone()));

    storage.fail_reads.set(true);
    let menu = call(&app, "menu.list", json!({"owner": "a", "repo": "b"}));
    assert_eq!(
        menu,
        json!({
            "kind": "basic",
            "actions": [
                {"action": "copyRepoInfo", "text": "a/b\nhttps://github.com/a/b"},
                {"action": "copyCloneCommand", "command": "git clone https://github.com/a/b.git"},
                {"action": "openIssues", "url": "https://github.com/a/b/issues"}
            ]
        })
    );

    storage.fail_reads.set(false);
    let menu = call(&app, "menu.list", json!({"owner": "a", "repo": "b"}));
    assert_eq!(menu["kind"], "tools");
}

// ─── Settings page ───

#[test]
fn test_add_list_and_delete_custom_tool() {
    let (app, _tmp) = setup();
    let added = call(
        &app,
        "tool.add",
        json!({"name": "DeepWiki", "url": "https://deepwiki.com/{owner}/{repo}"}),
    );
    assert_eq!(added["index"], 5);
    let id = added["id"].as_str().unwrap().to_string();

    let catalog = call(&app, "catalog.list", json!({}));
    assert_eq!(catalog[5]["name"], "DeepWiki");
    assert_eq!(catalog[5]["custom"], true);
    assert_eq!(catalog[5]["enabled"], true);
    assert_eq!(catalog[0]["custom"], false);

    let removed = call(&app, "tool.delete", json!({"id": id}));
    assert_eq!(removed["name"], "DeepWiki");
    assert_eq!(call(&app, "catalog.list", json!({})).as_array().unwrap().len(), 5);
}

#[test]
fn test_add_invalid_tool_is_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "tool.add", &json!({"name": "Foo", "url": "https://x.com/{owner}"}));
    assert!(res.unwrap_err().contains("{repo}"));
}

#[test]
fn test_delete_builtin_by_index_is_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "tool.delete", &json!({"index": 2}));
    assert!(res.unwrap_err().contains("builtin"));
}

#[test]
fn test_export_reproduces_settings() {
    let (app, _tmp) = setup();
    call(&app, "tool.add", json!({"name": "A", "url": "https://a/{owner}/{repo}", "description": "d"}));
    call(&app, "tool.setEnabled", json!({"index": 3, "enabled": false}));

    let settings = call(&app, "settings.get", json!({}));
    let export = call(&app, "settings.export", json!({}));
    assert_eq!(export["fileName"], EXPORT_FILE_NAME);
    assert!(export["dataUrl"].as_str().unwrap().starts_with("data:application/json;base64,"));

    let parsed: Value = serde_json::from_str(export["json"].as_str().unwrap()).unwrap();
    assert_eq!(parsed["enabledTools"], settings["enabledTools"]);
    assert_eq!(parsed["customTools"], settings["customTools"]);
    assert_eq!(parsed["config"], settings["config"]);
    assert!(parsed["exportDate"].is_string());
}

#[test]
fn test_reset_clears_everything() {
    let (app, _tmp) = setup();
    call(&app, "tool.add", json!({"name": "A", "url": "https://a/{owner}/{repo}"}));
    call(&app, "trackUsage", json!({"tool": "A", "owner": "a", "repo": "b"}));

    call(&app, "settings.reset", json!({}));

    let settings = call(&app, "settings.get", json!({}));
    assert_eq!(settings["enabledTools"], json!([0, 1, 2, 3, 4]));
    assert_eq!(settings["customTools"], json!([]));
    assert_eq!(settings["config"], json!({"showDetailedUrls": false}));
    assert_eq!(call(&app, "stats.top", json!({})), json!([]));
}

#[test]
fn test_reload_picks_up_external_change() {
    let (app, _tmp) = setup();
    {
        let a = app.lock().unwrap();
        let mut items = StorageItems::new();
        items.insert("enabledTools".to_string(), json!([4]));
        a.storage.set(items).unwrap();
    }
    let settings = call(&app, "settings.reload", json!({}));
    assert_eq!(settings["enabledTools"], json!([4]));
}

#[test]
fn test_numeric_params_must_be_unsigned_integers() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "tool.setEnabled", &json!({"index": -1, "enabled": true}));
    assert!(res.unwrap_err().contains("missing index"));

    let res = handle_method(&app, "stats.top", &json!({"limit": "ten"}));
    assert!(res.unwrap_err().contains("missing limit"));

    assert_eq!(call(&app, "stats.top", json!({"limit": null})), json!([]));
}

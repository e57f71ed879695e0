//! RPC method handler for the gittools background process.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches the page script's messages (`openSettings`,
//! `trackUsage`, `getRepoInfo`) and the settings page operations to the
//! components held by [`App`].

use std::sync::Mutex;

use log::warn;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::settings_controller::SettingsControllerTrait;
use crate::services::link_menu;
use crate::services::repo_detector;
use crate::services::settings_export::EXPORT_FILE_NAME;
use crate::services::tool_catalog;
use crate::services::usage_aggregator::{UsageAggregatorTrait, DEFAULT_LEADERBOARD_SIZE};
use crate::types::message::{ExtensionMessage, MessageResponse};
use crate::types::repository::{RepoInfo, RepoRef};

/// Page opened by the `openSettings` message.
pub const SETTINGS_PAGE: &str = "popup.html";

const REPO_REQUIRED: &str = "owner and repo are required";

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn index_param(params: &Value, key: &str) -> Result<usize, String> {
    let n = params
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| format!("missing {}", key))?;
    usize::try_from(n).map_err(|_| format!("{} out of range: {}", key, n))
}

fn bool_param(params: &Value, key: &str) -> Result<bool, String> {
    params
        .get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| format!("missing {}", key))
}

/// Handles one page-script message.
pub fn handle_message(app: &Mutex<App>, message: ExtensionMessage) -> Result<Value, String> {
    match message {
        ExtensionMessage::OpenSettings => Ok(json!({"ok": true, "page": SETTINGS_PAGE})),
        ExtensionMessage::TrackUsage { tool, owner, repo } => {
            if owner.is_empty() || repo.is_empty() {
                return Err(REPO_REQUIRED.to_string());
            }
            let key = RepoRef::new(&owner, &repo).key();
            let a = app.lock().map_err(|e| e.to_string())?;
            let count = a.usage.track_usage(&key, &tool).map_err(|e| {
                warn!("Failed to track usage: {}", e);
                e.to_string()
            })?;
            Ok(json!({"ok": true, "count": count}))
        }
        ExtensionMessage::GetRepoInfo { owner, repo } => {
            let response = if owner.is_empty() || repo.is_empty() {
                MessageResponse::failed(REPO_REQUIRED)
            } else {
                MessageResponse::ok(RepoInfo::from(&RepoRef::new(&owner, &repo)))
            };
            serde_json::to_value(response).map_err(|e| e.to_string())
        }
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Page script messages ───
        "openSettings" | "trackUsage" | "getRepoInfo" => {
            let mut body = match params {
                Value::Object(map) => map.clone(),
                Value::Null => serde_json::Map::new(),
                _ => return Err("params must be an object".to_string()),
            };
            body.insert("action".to_string(), json!(method));
            let message: ExtensionMessage =
                serde_json::from_value(Value::Object(body)).map_err(|e| format!("invalid message: {}", e))?;
            handle_message(app, message)
        }

        // ─── Page binding ───
        "page.detect" => {
            let repo = match (params.get("url").and_then(|v| v.as_str()), params.get("path").and_then(|v| v.as_str())) {
                (Some(url), _) => repo_detector::detect_repository_url(url),
                (None, Some(path)) => repo_detector::detect_repository(path),
                (None, None) => return Err("missing url or path".to_string()),
            };
            Ok(json!({"repository": repo}))
        }
        "menu.list" => {
            let repo = RepoRef::new(str_param(params, "owner")?, str_param(params, "repo")?);
            let a = app.lock().map_err(|e| e.to_string())?;
            let menu = link_menu::menu_for(a.settings.read_stored(), &repo);
            serde_json::to_value(menu).map_err(|e| e.to_string())
        }

        // ─── Settings page ───
        "catalog.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let settings = a.settings.get_settings();
            let arr: Vec<Value> = a
                .settings
                .catalog()
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    json!({
                        "index": i,
                        "id": t.id,
                        "name": t.name,
                        "url": t.url,
                        "description": t.description,
                        "enabled": settings.enabled_tools.is_enabled(i),
                        "custom": i >= tool_catalog::builtin_count(),
                    })
                })
                .collect();
            Ok(json!(arr))
        }
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings.get_settings()).map_err(|e| e.to_string())
        }
        "settings.reload" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let settings = a.settings.reload();
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "tool.setEnabled" => {
            let index = index_param(params, "index")?;
            let enabled = bool_param(params, "enabled")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings.set_enabled(index, enabled).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tool.add" => {
            let name = str_param(params, "name")?;
            let url = str_param(params, "url")?;
            let description = params.get("description").and_then(|v| v.as_str()).unwrap_or("");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let index = a
                .settings
                .add_custom_tool(name, url, description)
                .map_err(|e| e.to_string())?;
            let id = a.settings.catalog().get(index).and_then(|t| t.id.clone());
            Ok(json!({"index": index, "id": id}))
        }
        "tool.delete" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let removed = match params.get("id").and_then(|v| v.as_str()) {
                Some(id) => a.settings.delete_custom_tool_by_id(id),
                None => a.settings.delete_custom_tool(index_param(params, "index")?),
            }
            .map_err(|e| e.to_string())?;
            serde_json::to_value(removed).map_err(|e| e.to_string())
        }
        "config.set" => {
            let show = bool_param(params, "showDetailedUrls")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings.set_show_detailed_urls(show).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let export = a.settings.export();
            let json_text = export.to_json().map_err(|e| e.to_string())?;
            let data_url = export.to_data_url().map_err(|e| e.to_string())?;
            Ok(json!({"fileName": EXPORT_FILE_NAME, "json": json_text, "dataUrl": data_url}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings.reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "stats.top" => {
            let limit = match params.get("limit") {
                None | Some(Value::Null) => DEFAULT_LEADERBOARD_SIZE,
                Some(_) => index_param(params, "limit")?,
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.usage.top_repositories(limit)).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

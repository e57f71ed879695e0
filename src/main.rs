//! gittools: console walkthrough.
//!
//! Runs every component against an in-memory store and prints what happens.
//! The extension itself talks to `gittools-rpc`.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use gittools::managers::page_watcher::{NavigationOutcome, PageWatcher};
use gittools::managers::settings_controller::{SettingsController, SettingsControllerTrait};
use gittools::services::link_menu;
use gittools::services::repo_detector;
use gittools::services::sync_storage::MemorySyncStorage;
use gittools::services::tool_catalog;
use gittools::services::usage_aggregator::{UsageAggregator, UsageAggregatorTrait, DEFAULT_LEADERBOARD_SIZE};
use gittools::types::repository::RepoRef;
use gittools::types::settings::Settings;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!();
    println!("  gittools v{} walkthrough", env!("CARGO_PKG_VERSION"));
    println!();

    let storage = Arc::new(MemorySyncStorage::new());
    demo_catalog();
    demo_settings(storage.clone())?;
    demo_usage(storage)?;
    demo_navigation()?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_catalog() {
    section("Tool Catalog");
    for (i, tool) in tool_catalog::builtin_tools().iter().enumerate() {
        println!("  [{}] {}: {}", i, tool.name, tool.resolve_url("rust-lang", "rust"));
    }
    match tool_catalog::validate_custom_tool("Broken", "https://x.com/{owner}", "") {
        Ok(_) => println!("  unexpected: template without {{repo}} accepted"),
        Err(e) => println!("  Rejected custom tool: {}", e),
    }
    println!();
}

fn demo_settings(storage: Arc<MemorySyncStorage>) -> Result<(), Box<dyn Error>> {
    section("Settings Controller");
    let mut ctl = SettingsController::new(storage);
    ctl.subscribe(Box::new(|s: &Settings| {
        println!("    ↳ change: {} enabled, {} custom", s.enabled_tools.len(), s.custom_tools.len())
    }));
    ctl.install()?;

    let a = ctl.add_custom_tool("DeepWiki", "https://deepwiki.com/{owner}/{repo}", "AI wiki")?;
    let b = ctl.add_custom_tool("Star History", "https://star-history.com/#{owner}/{repo}", "")?;
    println!("  Added custom tools at {} and {}", a, b);

    ctl.set_enabled(1, false)?;
    ctl.delete_custom_tool(a)?;
    let enabled: Vec<usize> = ctl.get_settings().enabled_tools.indices().collect();
    println!("  After deleting index {}: enabled = {:?}", a, enabled);

    let repo = RepoRef::new("rust-lang", "rust");
    for entry in link_menu::build_menu(ctl.get_settings(), &repo) {
        println!("  menu: {} → {}", entry.name, entry.url);
    }

    let export = ctl.export();
    println!("  Exported at {} ({} bytes)", export.export_date, export.to_json()?.len());

    ctl.reset()?;
    println!("  Reset: {} enabled, {} custom", ctl.get_settings().enabled_tools.len(), ctl.get_settings().custom_tools.len());
    println!();
    Ok(())
}

fn demo_usage(storage: Arc<MemorySyncStorage>) -> Result<(), Box<dyn Error>> {
    section("Usage Aggregator");
    let usage = UsageAggregator::new(storage);
    for _ in 0..3 {
        usage.track_usage("rust-lang/rust", "GitHub1s")?;
    }
    usage.track_usage("rust-lang/rust", "Sourcegraph")?;
    usage.track_usage("tokio-rs/tokio", "GitHub.dev")?;

    for row in usage.top_repositories(DEFAULT_LEADERBOARD_SIZE) {
        println!("  {:<20} {:>3} clicks {:?}", row.repo_key, row.total, row.per_tool);
    }
    println!();
    Ok(())
}

fn demo_navigation() -> Result<(), Box<dyn Error>> {
    section("Page detection");
    for path in ["/rust-lang/rust", "/settings/profile", "/rust-lang/rust/issues"] {
        println!("  {:<24} → {:?}", path, repo_detector::detect_repository(path));
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let watcher = PageWatcher::with_delay(Duration::from_millis(50));
    let (first, second) = runtime.block_on(async {
        tokio::join!(
            watcher.on_navigation("https://github.com/serde-rs/serde"),
            watcher.on_navigation("https://github.com/serde-rs/json")
        )
    });
    println!("  burst: first = {:?}, second = {:?}", first, second);
    if let NavigationOutcome::Repository(repo) = first {
        println!("  settled on {}", repo.canonical_url());
    }
    println!();
    Ok(())
}

// gittools services
// Stateless or storage-backed building blocks: catalog, storage, usage, export, page detection.

pub mod link_menu;
pub mod repo_detector;
pub mod settings_export;
pub mod sync_storage;
pub mod tool_catalog;
pub mod usage_aggregator;

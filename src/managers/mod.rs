// gittools state managers
// Managers own mutable state: the settings controller and the navigation guard.

pub mod page_watcher;
pub mod settings_controller;

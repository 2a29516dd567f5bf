/// Application assembly: plugins, resources, and system scheduling.
pub mod app_setup;

/// Primary window configuration.
pub mod window_config;

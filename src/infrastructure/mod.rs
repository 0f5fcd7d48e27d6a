// Infrastructure layer - Configuration and adapters
pub mod config;
pub mod file_storage;
pub mod synthetic_provider;

// Application layer - Store, filtering, and query use cases
pub mod filter_engine;
pub mod metrics_provider;
pub mod query_service;
pub mod state_storage;
pub mod store;

// Domain layer - Dashboard models
pub mod filter;
pub mod metric;
pub mod state;
pub mod view;
